//! Builders for entity models used across the payroll tests

use std::{borrow::Cow, error::Error, fmt};

use chrono::{Days, Local, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{sqlx::error::{DatabaseError, ErrorKind}, DbErr, RuntimeErr, SqlxError};
use uuid::Uuid;

use crate::entity::{
    attendance_day, employee, payslip, salary_component, salary_template, salary_template_transaction,
    sea_orm_active_enums::{ComponentType, PayslipStatus, StaffType},
};

use super::PayPeriod;

pub(crate) fn salary_template(basis: Option<&str>, ctc_monthly: Decimal) -> salary_template::Model {
    salary_template::Model {
        id: Uuid::new_v4(),
        created_at: Local::now().into(),
        updated_at: Local::now().into(),
        template_name: "Standard Staff".to_string(),
        ctc_monthly: Some(ctc_monthly),
        lwp_calculation_basis: basis.map(str::to_string),
        status: 0,
        company_id: None,
    }
}

pub(crate) fn employee(template: Option<&salary_template::Model>) -> employee::Model {
    employee::Model {
        id: Uuid::new_v4(),
        created_at: Local::now().into(),
        updated_at: Local::now().into(),
        employee_code: Some("EMP-001".to_string()),
        first_name: "Asha".to_string(),
        last_name: Some("Rao".to_string()),
        staff_type: StaffType::Regular,
        status: 0,
        salary_template_id: template.map(|t| t.id),
        branch_id: Some(Uuid::new_v4()),
        company_id: Some(Uuid::new_v4()),
    }
}

pub(crate) fn component(name: &str, component_type: ComponentType, is_lwp_impacted: bool) -> salary_component::Model {
    salary_component::Model {
        id: Uuid::new_v4(),
        created_at: Local::now().into(),
        updated_at: Local::now().into(),
        component_name: name.to_string(),
        component_type,
        is_lwp_impacted,
        company_id: None,
    }
}

pub(crate) fn template_line(
    template: &salary_template::Model,
    component: &salary_component::Model,
    position: i32,
    monthly_amount: Decimal,
) -> salary_template_transaction::Model {
    salary_template_transaction::Model {
        id: Uuid::new_v4(),
        created_at: Local::now().into(),
        updated_at: Local::now().into(),
        salary_template_id: template.id,
        component_id: component.id,
        position,
        monthly_amount: Some(monthly_amount),
        status: 0,
    }
}

pub(crate) fn attendance_day(employee_id: Uuid, date: NaiveDate, status: i16) -> attendance_day::Model {
    attendance_day::Model {
        id: Uuid::new_v4(),
        created_at: Local::now().into(),
        updated_at: Local::now().into(),
        employee_id,
        attendance_date: date,
        status,
        fine_amount: Some(Decimal::ZERO),
        overtime_minutes: Some(0),
        is_locked: false,
    }
}

/// Consecutive days from the start of `period`, `count` days per status code
pub(crate) fn attendance_month(employee_id: Uuid, period: PayPeriod, plan: &[(i16, u32)]) -> Vec<attendance_day::Model> {
    plan.iter()
        .flat_map(|&(status, count)| std::iter::repeat(status).take(count as usize))
        .enumerate()
        .map(|(offset, status)| {
            let date = period.start().checked_add_days(Days::new(offset as u64)).unwrap();
            attendance_day(employee_id, date, status)
        })
        .collect()
}

pub(crate) fn payslip(employee_id: Uuid, period: PayPeriod, status: PayslipStatus) -> payslip::Model {
    payslip::Model {
        id: Uuid::new_v4(),
        created_at: Local::now().into(),
        updated_at: Local::now().into(),
        employee_id,
        month: period.month() as i32,
        year: period.year(),
        ctc_monthly: dec!(30000.00),
        present_days: dec!(25),
        half_days: dec!(1),
        absent_days: dec!(2),
        leave_days: dec!(0),
        weekly_offs: dec!(2),
        holidays: dec!(0),
        lwp_days: dec!(2.5),
        per_day_salary: dec!(1000.00),
        lwp_deduction: dec!(2500.00),
        total_fine: dec!(0.00),
        ot_amount: dec!(0.00),
        net_payable: dec!(27500.00),
        breakdown_json: serde_json::json!({ "earnings": [], "deductions": [] }),
        status,
        user_id: None,
        branch_id: None,
        company_id: None,
    }
}

/// What Postgres reports when a second live payslip hits `idx_payslip_employee_period`
#[derive(Debug)]
struct DuplicatePayslip;

impl fmt::Display for DuplicatePayslip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Error for DuplicatePayslip {}

impl DatabaseError for DuplicatePayslip {
    fn message(&self) -> &str {
        "duplicate key value violates unique constraint \"idx_payslip_employee_period\""
    }

    fn code(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed("23505"))
    }

    fn as_error(&self) -> &(dyn Error + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn Error + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn Error + Send + Sync + 'static> {
        self
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::UniqueViolation
    }
}

pub(crate) fn unique_violation() -> DbErr {
    DbErr::Query(RuntimeErr::SqlxError(SqlxError::Database(Box::new(DuplicatePayslip))))
}
