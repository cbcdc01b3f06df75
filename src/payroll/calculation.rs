use rust_decimal::Decimal;
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::{
    consts::{OVERTIME_MULTIPLIER, WORKDAY_HOURS},
    entity::{attendance_day, employee, sea_orm_active_enums::ComponentType},
    utils::to_money,
};

use super::{
    store, AttendanceCounts, AttendanceTally, Breakdown, DeductionLine, EarningLine, LwpBasis, PayPeriod, PayrollError,
    PayrollProfile, SalaryFigures, SalarySummary, SummaryEmployee, SummaryMeta, SummaryPeriod, MISSING_SALARY_TEMPLATE,
};

/// Computes the salary of one employee for one month without writing anything
#[tracing::instrument(skip(db))]
pub async fn calculate_monthly_salary<C: ConnectionTrait>(
    db: &C,
    employee_id: Uuid,
    period: PayPeriod,
) -> Result<SalarySummary, PayrollError> {
    let Some(profile) = store::find_employee_with_salary_template(db, employee_id).await? else {
        return Err(PayrollError::Calculation(MISSING_SALARY_TEMPLATE.to_string()));
    };

    summarize_profile(db, &profile, period).await
}

/// Same as [`calculate_monthly_salary`] for an employee row that is already loaded
#[tracing::instrument(skip(db, employee), fields(employee_id = %employee.id))]
pub(super) async fn summarize_employee<C: ConnectionTrait>(
    db: &C,
    employee: employee::Model,
    period: PayPeriod,
) -> Result<SalarySummary, PayrollError> {
    let Some(profile) = store::load_payroll_profile(db, employee).await? else {
        return Err(PayrollError::Calculation(MISSING_SALARY_TEMPLATE.to_string()));
    };

    summarize_profile(db, &profile, period).await
}

async fn summarize_profile<C: ConnectionTrait>(
    db: &C,
    profile: &PayrollProfile,
    period: PayPeriod,
) -> Result<SalarySummary, PayrollError> {
    let attendance = store::find_attendance_in_range(db, profile.employee.id, period.start(), period.end()).await?;

    let summary = compute_summary(profile, &attendance, period)?;
    tracing::debug!(net_payable = %summary.salary.net_payable, "salary calculated");

    Ok(summary)
}

/// The salary computation proper, a pure function of the profile and the month's attendance
pub fn compute_summary(
    profile: &PayrollProfile,
    attendance: &[attendance_day::Model],
    period: PayPeriod,
) -> Result<SalarySummary, PayrollError> {
    let tally = AttendanceTally::from_records(attendance);
    let total_lwp = tally.total_lwp();

    let days_in_month = period.days_in_month();
    let basis = LwpBasis::parse(profile.template.lwp_calculation_basis.as_deref());
    let days_in_calculation = basis.days_in_calculation(days_in_month, tally.weekly_offs);

    if days_in_calculation <= 0 {
        return Err(PayrollError::Calculation(format!(
            "Cannot calculate salary: {days_in_calculation} payable days in {} under the current LWP basis.",
            period.long_label(),
        )));
    }
    let days_in_calculation = Decimal::from(days_in_calculation);

    let monthly_gross = profile.template.ctc_monthly.unwrap_or_default();
    let per_day_salary = monthly_gross / days_in_calculation;
    let lwp_deduction = total_lwp * per_day_salary;

    let per_hour_salary = per_day_salary / Decimal::from(WORKDAY_HOURS);
    let overtime_amount = Decimal::from(tally.overtime_minutes) / Decimal::from(60) * per_hour_salary * OVERTIME_MULTIPLIER;

    let net_payable = (monthly_gross - lwp_deduction - tally.total_fine + overtime_amount).max(Decimal::ZERO);

    let mut breakdown = Breakdown::default();
    for line in &profile.lines {
        let base_amount = line.monthly_amount;

        match line.component.component_type {
            ComponentType::Earning => {
                let actual_amount = if line.component.is_lwp_impacted {
                    base_amount - total_lwp * (base_amount / days_in_calculation)
                } else {
                    base_amount
                };

                breakdown.earnings.push(EarningLine {
                    name: line.component.component_name.clone(),
                    base_amount: to_money(base_amount),
                    actual_amount: to_money(actual_amount),
                });
            },
            ComponentType::Deduction => {
                breakdown.deductions.push(DeductionLine {
                    name: line.component.component_name.clone(),
                    amount: to_money(base_amount),
                });
            },
        }
    }

    let employee = &profile.employee;

    Ok(SalarySummary {
        employee: SummaryEmployee {
            id: employee.id,
            name: employee.full_name(),
            code: employee.employee_code.clone(),
            template: profile.template.template_name.clone(),
        },
        period: SummaryPeriod {
            month: period.month(),
            year: period.year(),
            days_in_month,
        },
        attendance: AttendanceCounts {
            present_days: tally.present_days,
            half_days: tally.half_days,
            absent_days: tally.absent_days,
            leave_days: tally.leave_days,
            weekly_offs: tally.weekly_offs,
            holidays: tally.holidays,
            total_lwp,
        },
        salary: SalaryFigures {
            ctc_monthly: monthly_gross,
            per_day_salary: to_money(per_day_salary),
            lwp_deduction: to_money(lwp_deduction),
            total_fine: to_money(tally.total_fine),
            overtime_amount: to_money(overtime_amount),
            net_payable: to_money(net_payable),
        },
        breakdown,
        meta: SummaryMeta {
            branch_id: employee.branch_id,
            company_id: employee.company_id,
        },
    })
}
