//! Read side of payroll: stored payslips, calculation history and the months an
//! employee can be calculated for.

use std::collections::{BTreeMap, HashMap};

use chrono::Datelike;
use rust_decimal::Decimal;
use sea_orm::{prelude::DateTimeWithTimeZone, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    consts::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
    entity::{attendance_day, employee, payslip, prelude::*, sea_orm_active_enums::PayslipStatus},
    utils::to_money,
};

use super::{compute_summary, store, PayPeriod, PayrollError, PayrollProfile, SalaryFigures};

const NOT_AVAILABLE: &str = "N/A";

const NO_CALCULATION: &str = "No Calculation";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayslipListItem {
    pub id: Uuid,
    pub month: i32,
    pub year: i32,
    pub month_year_string: String,
    pub ctc: Decimal,
    pub net_payable: Decimal,
    pub status: PayslipStatus,
    pub status_text: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayslipDetail {
    pub id: Uuid,
    pub employee: PayslipEmployee,
    pub period: PayslipPeriod,
    pub attendance: SnapshotAttendance,
    pub salary: SalaryFigures,
    pub breakdown: serde_json::Value,
    pub status: PayslipStatus,
    pub status_text: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayslipEmployee {
    pub id: Uuid,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayslipPeriod {
    pub month: i32,
    pub year: i32,
    pub label: String,
    /// Last day of the month, `DD/MM/YYYY`
    pub pay_date: String,
}

/// Attendance counts as they were when the payslip was written
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotAttendance {
    #[serde(with = "rust_decimal::serde::float")]
    pub present_days: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub half_days: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub absent_days: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub leave_days: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub weekly_offs: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub holidays: Decimal,
    #[serde(rename = "totalLWP", with = "rust_decimal::serde::float")]
    pub total_lwp: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationHistory {
    pub items: Vec<HistoryItem>,
    pub page: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryItem {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub employee_name: String,
    pub employee_code: String,
    pub month: i32,
    pub year: i32,
    pub month_year_string: String,
    pub net_payable: Decimal,
    pub status: PayslipStatus,
    pub status_text: &'static str,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AvailableMonth {
    pub month: u32,
    pub year: i32,
    pub month_year_string: String,
    pub payslip_id: Option<Uuid>,
    pub ctc: Decimal,
    pub net_payable: Decimal,
    pub status: Option<PayslipStatus>,
    pub status_text: &'static str,
}

/// A stored payslip with an impossible month is a data fault, never the caller's
fn period_of(payslip: &payslip::Model) -> Result<PayPeriod, PayrollError> {
    u32::try_from(payslip.month).ok()
        .and_then(|month| PayPeriod::new(month, payslip.year).ok())
        .ok_or_else(|| {
            let message = format!("payslip {} holds an invalid period {}/{}", payslip.id, payslip.month, payslip.year);
            PayrollError::Persistence(DbErr::Custom(message))
        })
}

/// Finalized and paid payslips of an employee, newest month first
#[tracing::instrument(skip(db))]
pub async fn list_employee_payslips<C: ConnectionTrait>(db: &C, employee_id: Uuid) -> Result<Vec<PayslipListItem>, PayrollError> {
    let payslips = Payslip::find()
        .filter(payslip::Column::EmployeeId.eq(employee_id))
        .filter(payslip::Column::Status.is_in([PayslipStatus::Finalized, PayslipStatus::Paid]))
        .order_by_desc(payslip::Column::Year)
        .order_by_desc(payslip::Column::Month)
        .all(db).await?;

    payslips.into_iter()
        .map(|payslip| Ok::<_, PayrollError>(PayslipListItem {
            month_year_string: period_of(&payslip)?.short_label(),
            id: payslip.id,
            month: payslip.month,
            year: payslip.year,
            ctc: payslip.ctc_monthly,
            net_payable: payslip.net_payable,
            status: payslip.status,
            status_text: payslip.status.label(),
        }))
        .collect()
}

#[tracing::instrument(skip(db))]
pub async fn get_payslip_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<PayslipDetail, PayrollError> {
    let Some(payslip) = Payslip::find_by_id(id).one(db).await? else {
        return Err(PayrollError::NotFound("Payslip not found".to_string()));
    };

    let employee = Employee::find_by_id(payslip.employee_id).one(db).await?;
    let period = period_of(&payslip)?;

    Ok(PayslipDetail {
        id: payslip.id,
        employee: PayslipEmployee {
            id: payslip.employee_id,
            name: employee.as_ref().map_or_else(|| NOT_AVAILABLE.to_string(), employee::Model::full_name),
            code: employee.and_then(|e| e.employee_code).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        },
        period: PayslipPeriod {
            month: payslip.month,
            year: payslip.year,
            label: period.long_label(),
            pay_date: period.end().format("%d/%m/%Y").to_string(),
        },
        attendance: SnapshotAttendance {
            present_days: payslip.present_days,
            half_days: payslip.half_days,
            absent_days: payslip.absent_days,
            leave_days: payslip.leave_days,
            weekly_offs: payslip.weekly_offs,
            holidays: payslip.holidays,
            total_lwp: payslip.lwp_days,
        },
        salary: SalaryFigures {
            ctc_monthly: payslip.ctc_monthly,
            per_day_salary: to_money(payslip.per_day_salary),
            lwp_deduction: to_money(payslip.lwp_deduction),
            total_fine: to_money(payslip.total_fine),
            overtime_amount: to_money(payslip.ot_amount),
            net_payable: to_money(payslip.net_payable),
        },
        breakdown: payslip.breakdown_json,
        status: payslip.status,
        status_text: payslip.status.label(),
    })
}

/// Every payslip regardless of status, newest first.
/// `page` starts at 1; `per_page` defaults to 20 and is capped at 100.
#[tracing::instrument(skip(db))]
pub async fn get_calculation_history<C: ConnectionTrait>(
    db: &C,
    page: Option<u64>,
    per_page: Option<u64>,
) -> Result<CalculationHistory, PayrollError> {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);

    let query = Payslip::find()
        .order_by_desc(payslip::Column::CreatedAt)
        .order_by_desc(payslip::Column::Id);

    let total_items = query.clone().count(db).await?;

    let payslips = query
        .paginate(db, per_page)
        .fetch_page(page - 1).await?;

    let employees = if payslips.is_empty() {
        HashMap::new()
    } else {
        Employee::find()
            .filter(employee::Column::Id.is_in(payslips.iter().map(|p| p.employee_id)))
            .all(db).await?
            .into_iter()
            .map(|e| (e.id, e))
            .collect::<HashMap<_, _>>()
    };

    let items = payslips.into_iter()
        .map(|payslip| {
            let employee = employees.get(&payslip.employee_id);

            Ok::<_, PayrollError>(HistoryItem {
                id: payslip.id,
                employee_id: payslip.employee_id,
                employee_name: employee.map_or_else(|| NOT_AVAILABLE.to_string(), employee::Model::full_name),
                employee_code: employee
                    .and_then(|e| e.employee_code.clone())
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                month_year_string: period_of(&payslip)?.short_label(),
                month: payslip.month,
                year: payslip.year,
                net_payable: payslip.net_payable,
                status: payslip.status,
                status_text: payslip.status.label(),
                created_at: payslip.created_at,
            })
        })
        .collect::<Result<Vec<_>, PayrollError>>()?;

    Ok(CalculationHistory {
        items,
        page,
        per_page,
        total_items,
        total_pages: total_items.div_ceil(per_page),
    })
}

/// Months in which the employee has attendance, newest first, each with its payslip
/// figures or a live preview when no payslip exists yet
#[tracing::instrument(skip(db))]
pub async fn get_available_months_for_calculation<C: ConnectionTrait>(
    db: &C,
    employee_id: Uuid,
) -> Result<Vec<AvailableMonth>, PayrollError> {
    let Some(employee) = Employee::find_by_id(employee_id).one(db).await? else {
        return Err(PayrollError::NotFound("Employee not found".to_string()));
    };

    let mut months = BTreeMap::<(i32, u32), Vec<attendance_day::Model>>::new();
    for day in store::find_attendance_history(db, employee_id).await? {
        let date = day.attendance_date;
        months.entry((date.year(), date.month())).or_default().push(day);
    }

    if months.is_empty() {
        return Ok(Vec::new());
    }

    let statuses = [PayslipStatus::Draft, PayslipStatus::Finalized, PayslipStatus::Paid];
    let mut payslips = store::find_employee_payslips(db, employee_id, &statuses).await?
        .into_iter()
        .map(|payslip| ((payslip.year, payslip.month), payslip))
        .collect::<HashMap<_, _>>();

    let profile = store::load_payroll_profile(db, employee).await?;

    let mut available = Vec::with_capacity(months.len());
    for ((year, month), attendance) in months.into_iter().rev() {
        let period = PayPeriod::new(month, year)?;

        let entry = match payslips.remove(&(year, month as i32)) {
            Some(payslip) => AvailableMonth {
                month,
                year,
                month_year_string: period.short_label(),
                payslip_id: Some(payslip.id),
                ctc: to_money(payslip.ctc_monthly),
                net_payable: to_money(payslip.net_payable),
                status: Some(payslip.status),
                status_text: payslip.status.label(),
            },
            None => {
                let (ctc, net_payable) = preview(profile.as_ref(), &attendance, period)?;

                AvailableMonth {
                    month,
                    year,
                    month_year_string: period.short_label(),
                    payslip_id: None,
                    ctc,
                    net_payable,
                    status: None,
                    status_text: NO_CALCULATION,
                }
            },
        };

        available.push(entry);
    }

    Ok(available)
}

/// Gross and net for a month without a payslip, zero when the month cannot be calculated
fn preview(
    profile: Option<&PayrollProfile>,
    attendance: &[attendance_day::Model],
    period: PayPeriod,
) -> Result<(Decimal, Decimal), PayrollError> {
    let zero = || (to_money(Decimal::ZERO), to_money(Decimal::ZERO));

    let Some(profile) = profile else {
        return Ok(zero());
    };

    match compute_summary(profile, attendance, period) {
        Ok(summary) => Ok((to_money(summary.salary.ctc_monthly), summary.salary.net_payable)),
        Err(PayrollError::Calculation(_)) => Ok(zero()),
        Err(err) => Err(err),
    }
}
