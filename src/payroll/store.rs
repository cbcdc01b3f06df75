//! Queries the payroll engine runs against employees, templates, attendance and payslips.
//!
//! Everything takes a `ConnectionTrait` so the same query runs on the pool or inside an
//! open transaction.

use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue::{Set, Unchanged}, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use tracing::warn;
use uuid::Uuid;

use crate::{
    consts::{ACTIVE_EMPLOYEE_STATUS, ACTIVE_TEMPLATE_LINE_STATUS, PAYROLL_STAFF_TYPES, VOID_ATTENDANCE_STATUS},
    entity::{
        attendance_day, employee, payslip, prelude::*, salary_component, salary_template_transaction,
        sea_orm_active_enums::PayslipStatus,
    },
};

use super::{PayPeriod, PayrollProfile, TemplateLine};

/// The employee together with their salary template and its component lines.
/// `None` when either the employee or the template mapping is missing.
pub async fn find_employee_with_salary_template<C: ConnectionTrait>(db: &C, employee_id: Uuid) -> Result<Option<PayrollProfile>, DbErr> {
    let Some(employee) = Employee::find_by_id(employee_id).one(db).await? else {
        return Ok(None);
    };

    load_payroll_profile(db, employee).await
}

pub async fn load_payroll_profile<C: ConnectionTrait>(db: &C, employee: employee::Model) -> Result<Option<PayrollProfile>, DbErr> {
    let Some(template_id) = employee.salary_template_id else {
        return Ok(None);
    };

    let Some(template) = SalaryTemplate::find_by_id(template_id).one(db).await? else {
        return Ok(None);
    };

    let transactions = SalaryTemplateTransaction::find()
        .filter(salary_template_transaction::Column::SalaryTemplateId.eq(template.id))
        .filter(salary_template_transaction::Column::Status.eq(ACTIVE_TEMPLATE_LINE_STATUS))
        .order_by_asc(salary_template_transaction::Column::Position)
        .order_by_asc(salary_template_transaction::Column::Id)
        .all(db).await?;

    let components = if transactions.is_empty() {
        HashMap::new()
    } else {
        SalaryComponent::find()
            .filter(salary_component::Column::Id.is_in(transactions.iter().map(|t| t.component_id)))
            .all(db).await?
            .into_iter()
            .map(|component| (component.id, component))
            .collect::<HashMap<_, _>>()
    };

    let lines = transactions.into_iter()
        .filter_map(|transaction| {
            let Some(component) = components.get(&transaction.component_id) else {
                warn!(template_id = %template.id, component_id = %transaction.component_id, "salary template line references a missing component");
                return None;
            };

            Some(TemplateLine {
                component: component.clone(),
                monthly_amount: transaction.monthly_amount.unwrap_or_default(),
            })
        })
        .collect();

    Ok(Some(PayrollProfile { employee, template, lines }))
}

/// Active employees whose staff type takes part in payroll runs
pub async fn find_payroll_roster<C: ConnectionTrait>(db: &C) -> Result<Vec<employee::Model>, DbErr> {
    Employee::find()
        .filter(employee::Column::Status.eq(ACTIVE_EMPLOYEE_STATUS))
        .filter(employee::Column::StaffType.is_in(PAYROLL_STAFF_TYPES))
        .order_by_asc(employee::Column::FirstName)
        .order_by_asc(employee::Column::Id)
        .all(db).await
}

/// Attendance between `start` and `end` inclusive, void days excluded
pub async fn find_attendance_in_range<C: ConnectionTrait>(
    db: &C,
    employee_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<attendance_day::Model>, DbErr> {
    AttendanceDay::find()
        .filter(attendance_day::Column::EmployeeId.eq(employee_id))
        .filter(attendance_day::Column::AttendanceDate.between(start, end))
        .filter(attendance_day::Column::Status.ne(VOID_ATTENDANCE_STATUS))
        .order_by_asc(attendance_day::Column::AttendanceDate)
        .all(db).await
}

/// All non-void attendance of an employee, latest day first
pub async fn find_attendance_history<C: ConnectionTrait>(db: &C, employee_id: Uuid) -> Result<Vec<attendance_day::Model>, DbErr> {
    AttendanceDay::find()
        .filter(attendance_day::Column::EmployeeId.eq(employee_id))
        .filter(attendance_day::Column::Status.ne(VOID_ATTENDANCE_STATUS))
        .order_by_desc(attendance_day::Column::AttendanceDate)
        .all(db).await
}

/// Locks every attendance day in the range, void days included. Returns the number of rows locked.
pub async fn lock_attendance_in_range<C: ConnectionTrait>(
    db: &C,
    employee_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<u64, DbErr> {
    let res = AttendanceDay::update_many()
        .col_expr(attendance_day::Column::IsLocked, Expr::value(true))
        .col_expr(attendance_day::Column::UpdatedAt, Expr::value(Local::now().fixed_offset()))
        .filter(attendance_day::Column::EmployeeId.eq(employee_id))
        .filter(attendance_day::Column::AttendanceDate.between(start, end))
        .exec(db).await?;

    Ok(res.rows_affected)
}

/// The payslip for an employee and month in one of `statuses`.
/// With `lock` the row is read `FOR UPDATE`, which only means something inside a transaction.
pub async fn find_payslip_by_key<C: ConnectionTrait>(
    db: &C,
    employee_id: Uuid,
    period: PayPeriod,
    statuses: &[PayslipStatus],
    lock: bool,
) -> Result<Option<payslip::Model>, DbErr> {
    let mut query = Payslip::find()
        .filter(payslip::Column::EmployeeId.eq(employee_id))
        .filter(payslip::Column::Month.eq(period.month() as i32))
        .filter(payslip::Column::Year.eq(period.year()))
        .filter(payslip::Column::Status.is_in(statuses.iter().copied()));

    if lock {
        query = query.lock_exclusive();
    }

    query.one(db).await
}

/// Every payslip of an employee in one of `statuses`, any month
pub async fn find_employee_payslips<C: ConnectionTrait>(
    db: &C,
    employee_id: Uuid,
    statuses: &[PayslipStatus],
) -> Result<Vec<payslip::Model>, DbErr> {
    Payslip::find()
        .filter(payslip::Column::EmployeeId.eq(employee_id))
        .filter(payslip::Column::Status.is_in(statuses.iter().copied()))
        .all(db).await
}

/// Overwrites `existing` with `snapshot`, or inserts `snapshot` as a new payslip
pub async fn upsert_payslip<C: ConnectionTrait>(
    db: &C,
    existing: Option<&payslip::Model>,
    mut snapshot: payslip::ActiveModel,
) -> Result<payslip::Model, DbErr> {
    match existing {
        Some(existing) => {
            snapshot.id = Unchanged(existing.id);
            snapshot.created_at = Unchanged(existing.created_at);

            snapshot.update(db).await
        },
        None => {
            snapshot.id = Set(Uuid::new_v4());

            snapshot.insert(db).await
        },
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    use crate::{entity::sea_orm_active_enums::ComponentType, payroll::fixtures};

    use super::*;

    #[actix_web::test]
    async fn test_profile_keeps_template_order() {
        let template = fixtures::salary_template(Some("FIXED_30_DAYS"), dec!(30000));
        let employee = fixtures::employee(Some(&template));

        let basic = fixtures::component("Basic", ComponentType::Earning, true);
        let hra = fixtures::component("HRA", ComponentType::Earning, false);
        let pf = fixtures::component("PF", ComponentType::Deduction, false);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                vec![ employee.clone() ],
            ])
            .append_query_results([
                vec![ template.clone() ],
            ])
            .append_query_results([
                vec![
                    fixtures::template_line(&template, &basic, 1, dec!(18000)),
                    fixtures::template_line(&template, &hra, 2, dec!(9000)),
                    fixtures::template_line(&template, &pf, 3, dec!(1800)),
                ],
            ])
            .append_query_results([
                // The store does not promise any order here
                vec![ pf.clone(), basic.clone(), hra.clone() ],
            ])
            .into_connection();

        let profile = find_employee_with_salary_template(&db, employee.id).await.unwrap().unwrap();

        assert_eq!(profile.employee, employee);
        assert_eq!(profile.template, template);

        let names = profile.lines.iter().map(|l| l.component.component_name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, ["Basic", "HRA", "PF"]);
        assert_eq!(profile.lines[2].monthly_amount, dec!(1800));
    }

    #[actix_web::test]
    async fn test_profile_skips_lines_without_component() {
        let template = fixtures::salary_template(None, dec!(20000));
        let employee = fixtures::employee(Some(&template));

        let basic = fixtures::component("Basic", ComponentType::Earning, true);
        let removed = fixtures::component("Removed", ComponentType::Earning, false);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ vec![ template.clone() ] ])
            .append_query_results([
                vec![
                    fixtures::template_line(&template, &basic, 1, dec!(20000)),
                    fixtures::template_line(&template, &removed, 2, dec!(500)),
                ],
            ])
            .append_query_results([ vec![ basic.clone() ] ])
            .into_connection();

        let profile = load_payroll_profile(&db, employee).await.unwrap().unwrap();

        assert_eq!(profile.lines.len(), 1);
        assert_eq!(profile.lines[0].component, basic);
    }

    #[actix_web::test]
    async fn test_profile_requires_template_mapping() {
        let unmapped = fixtures::employee(None);

        // No queries are expected for an employee without a template
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        assert!(load_payroll_profile(&db, unmapped).await.unwrap().is_none());

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ Vec::<employee::Model>::new() ])
            .into_connection();
        assert!(find_employee_with_salary_template(&db, Uuid::new_v4()).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_lock_attendance_reports_rows() {
        let period = PayPeriod::new(4, 2025).unwrap();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult { last_insert_id: 0, rows_affected: 30 },
            ])
            .into_connection();

        let locked = lock_attendance_in_range(&db, Uuid::new_v4(), period.start(), period.end()).await.unwrap();
        assert_eq!(locked, 30);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("is_locked"));
    }

    #[actix_web::test]
    async fn test_find_payslip_by_key_locks_row() {
        let period = PayPeriod::new(4, 2025).unwrap();
        let employee_id = Uuid::new_v4();
        let draft = fixtures::payslip(employee_id, period, PayslipStatus::Draft);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ vec![ draft.clone() ] ])
            .into_connection();

        let found = find_payslip_by_key(&db, employee_id, period, &[PayslipStatus::Draft], true).await.unwrap();
        assert_eq!(found, Some(draft));

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("FOR UPDATE"));
    }
}
