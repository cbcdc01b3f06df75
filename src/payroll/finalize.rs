use chrono::Local;
use rust_decimal::Decimal;
use sea_orm::{ActiveValue::Set, DatabaseConnection, TransactionTrait};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{entity::{payslip, sea_orm_active_enums::PayslipStatus}, utils::to_money};

use super::{calculation, store, FinalizedPayslip, PayPeriod, PayrollError, SalarySummary};

/// Statuses a finalize request may find for the same employee and month
const LIVE_PAYSLIP_STATUSES: [PayslipStatus; 3] = [PayslipStatus::Draft, PayslipStatus::Finalized, PayslipStatus::Paid];

/// Computes the month's salary and stores it as a finalized payslip, locking the month's
/// attendance in the same transaction.
///
/// The existing payslip row is read `FOR UPDATE`, and the partial unique index on
/// `(employee_id, month, year)` turns a lost race into [`PayrollError::AlreadyFinalized`].
#[tracing::instrument(skip(db))]
pub async fn finalize_monthly_salary(
    db: &DatabaseConnection,
    actor: Uuid,
    employee_id: Uuid,
    period: PayPeriod,
) -> Result<FinalizedPayslip, PayrollError> {
    let txn = db.begin().await?;

    let summary = calculation::calculate_monthly_salary(&txn, employee_id, period).await?;

    let existing = store::find_payslip_by_key(&txn, employee_id, period, &LIVE_PAYSLIP_STATUSES, true).await?;

    if let Some(existing) = existing.as_ref().filter(|p| p.status.is_closed()) {
        txn.rollback().await?;

        warn!(payslip_id = %existing.id, status = existing.status.label(), "payroll already closed for this month");
        return Err(PayrollError::AlreadyFinalized);
    }

    let snapshot = snapshot_of(&summary, actor, period)?;
    let saved = store::upsert_payslip(&txn, existing.as_ref(), snapshot).await
        .map_err(PayrollError::from_payslip_write)?;

    let locked_days = store::lock_attendance_in_range(&txn, employee_id, period.start(), period.end()).await?;

    txn.commit().await
        .map_err(PayrollError::from_payslip_write)?;

    info!(payslip_id = %saved.id, net_payable = %summary.salary.net_payable, locked_days, "payroll finalized");

    Ok(FinalizedPayslip {
        payslip_id: saved.id,
        net_payable: summary.salary.net_payable,
        locked_days,
    })
}

fn snapshot_of(summary: &SalarySummary, actor: Uuid, period: PayPeriod) -> Result<payslip::ActiveModel, PayrollError> {
    let attendance = &summary.attendance;
    let salary = &summary.salary;

    Ok(payslip::ActiveModel {
        created_at: Set(Local::now().fixed_offset()),
        updated_at: Set(Local::now().fixed_offset()),
        employee_id: Set(summary.employee.id),
        month: Set(period.month() as i32),
        year: Set(period.year()),
        ctc_monthly: Set(to_money(salary.ctc_monthly)),
        present_days: Set(Decimal::from(attendance.present_days)),
        half_days: Set(Decimal::from(attendance.half_days)),
        absent_days: Set(Decimal::from(attendance.absent_days)),
        leave_days: Set(Decimal::from(attendance.leave_days)),
        weekly_offs: Set(Decimal::from(attendance.weekly_offs)),
        holidays: Set(Decimal::from(attendance.holidays)),
        lwp_days: Set(attendance.total_lwp),
        per_day_salary: Set(salary.per_day_salary),
        lwp_deduction: Set(salary.lwp_deduction),
        total_fine: Set(salary.total_fine),
        ot_amount: Set(salary.overtime_amount),
        net_payable: Set(salary.net_payable),
        breakdown_json: Set(serde_json::to_value(&summary.breakdown)?),
        status: Set(PayslipStatus::Finalized),
        user_id: Set(Some(actor)),
        branch_id: Set(summary.meta.branch_id),
        company_id: Set(summary.meta.company_id),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

    use crate::{
        entity::{attendance_day, employee, salary_component, salary_template, salary_template_transaction, sea_orm_active_enums::ComponentType},
        payroll::fixtures,
    };

    use super::*;

    struct Scenario {
        employee: employee::Model,
        template: salary_template::Model,
        lines: Vec<salary_template_transaction::Model>,
        components: Vec<salary_component::Model>,
        attendance: Vec<attendance_day::Model>,
        period: PayPeriod,
    }

    impl Scenario {
        fn april() -> Self {
            let period = PayPeriod::new(4, 2025).unwrap();
            let template = fixtures::salary_template(Some("FIXED_30_DAYS"), dec!(30000));
            let employee = fixtures::employee(Some(&template));
            let basic = fixtures::component("Basic", ComponentType::Earning, true);

            Self {
                lines: vec![ fixtures::template_line(&template, &basic, 1, dec!(30000)) ],
                components: vec![ basic ],
                attendance: fixtures::attendance_month(employee.id, period, &[(0, 25), (5, 2), (1, 1), (3, 2)]),
                employee,
                template,
                period,
            }
        }

        /// Queues the reads `calculate_monthly_salary` performs
        fn calculation_reads(&self) -> MockDatabase {
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([ vec![ self.employee.clone() ] ])
                .append_query_results([ vec![ self.template.clone() ] ])
                .append_query_results([ self.lines.clone() ])
                .append_query_results([ self.components.clone() ])
                .append_query_results([ self.attendance.clone() ])
        }
    }

    #[actix_web::test]
    async fn test_finalize_inserts_payslip() {
        let scenario = Scenario::april();
        let mut stored = fixtures::payslip(scenario.employee.id, scenario.period, PayslipStatus::Finalized);
        stored.net_payable = dec!(27500.00);

        let db = scenario.calculation_reads()
            .append_query_results([ Vec::<payslip::Model>::new() ])
            .append_query_results([ vec![ stored.clone() ] ])
            .append_exec_results([
                MockExecResult { last_insert_id: 0, rows_affected: 30 },
            ])
            .into_connection();

        let actor = Uuid::new_v4();
        let finalized = finalize_monthly_salary(&db, actor, scenario.employee.id, scenario.period).await.unwrap();

        assert_eq!(finalized.payslip_id, stored.id);
        assert_eq!(finalized.net_payable.to_string(), "27500.00");
        assert_eq!(finalized.locked_days, 30);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("INSERT INTO"));
        assert!(log.contains("FOR UPDATE"));
        assert!(log.contains(&actor.to_string()));
    }

    #[actix_web::test]
    async fn test_finalize_overwrites_draft() {
        let scenario = Scenario::april();
        let draft = fixtures::payslip(scenario.employee.id, scenario.period, PayslipStatus::Draft);
        let finalized_draft = payslip::Model { status: PayslipStatus::Finalized, ..draft.clone() };

        let db = scenario.calculation_reads()
            .append_query_results([ vec![ draft.clone() ] ])
            .append_query_results([ vec![ finalized_draft ] ])
            .append_exec_results([
                MockExecResult { last_insert_id: 0, rows_affected: 30 },
            ])
            .into_connection();

        let finalized = finalize_monthly_salary(&db, Uuid::new_v4(), scenario.employee.id, scenario.period).await.unwrap();

        assert_eq!(finalized.payslip_id, draft.id);

        let log = format!("{:?}", db.into_transaction_log());
        assert!(!log.contains("INSERT INTO"));
        assert!(log.contains(&draft.id.to_string()));
    }

    #[actix_web::test]
    async fn test_finalize_rejects_closed_month() {
        for status in [PayslipStatus::Finalized, PayslipStatus::Paid] {
            let scenario = Scenario::april();
            let closed = fixtures::payslip(scenario.employee.id, scenario.period, status);

            let db = scenario.calculation_reads()
                .append_query_results([ vec![ closed ] ])
                .into_connection();

            let err = finalize_monthly_salary(&db, Uuid::new_v4(), scenario.employee.id, scenario.period).await.unwrap_err();
            assert!(matches!(err, PayrollError::AlreadyFinalized));

            // Neither the payslip nor the attendance is written
            let log = format!("{:?}", db.into_transaction_log());
            assert!(!log.contains("INSERT INTO"));
            assert!(!log.contains(" SET "));
        }
    }

    #[actix_web::test]
    async fn test_finalize_losing_insert_race_is_already_finalized() {
        let scenario = Scenario::april();

        // Nothing to lock yet, then the concurrent winner's row trips the unique index
        let db = scenario.calculation_reads()
            .append_query_results([ Vec::<payslip::Model>::new() ])
            .append_query_errors([ fixtures::unique_violation() ])
            .into_connection();

        let err = finalize_monthly_salary(&db, Uuid::new_v4(), scenario.employee.id, scenario.period).await.unwrap_err();
        assert!(matches!(err, PayrollError::AlreadyFinalized));

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("INSERT INTO"));
        assert!(!log.contains(r#"UPDATE \"attendance_day\""#));
        assert!(!log.contains("COMMIT"));
    }

    #[actix_web::test]
    async fn test_finalize_rolls_back_payslip_when_lock_fails() {
        let scenario = Scenario::april();
        let stored = fixtures::payslip(scenario.employee.id, scenario.period, PayslipStatus::Finalized);

        let db = scenario.calculation_reads()
            .append_query_results([ Vec::<payslip::Model>::new() ])
            .append_query_results([ vec![ stored ] ])
            .append_exec_errors([ DbErr::Custom("lock failed".to_string()) ])
            .into_connection();

        let err = finalize_monthly_salary(&db, Uuid::new_v4(), scenario.employee.id, scenario.period).await.unwrap_err();
        assert!(matches!(err, PayrollError::Persistence(DbErr::Custom(ref message)) if message == "lock failed"));

        let log = format!("{:?}", db.into_transaction_log());
        assert!(log.contains("INSERT INTO"));
        assert!(log.contains("ROLLBACK"));
        assert!(!log.contains("COMMIT"));
    }

    #[actix_web::test]
    async fn test_finalize_without_template_writes_nothing() {
        let period = PayPeriod::new(4, 2025).unwrap();
        let unmapped = fixtures::employee(None);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([ vec![ unmapped.clone() ] ])
            .into_connection();

        let err = finalize_monthly_salary(&db, Uuid::new_v4(), unmapped.id, period).await.unwrap_err();
        assert!(matches!(err, PayrollError::Calculation(_)));

        let log = format!("{:?}", db.into_transaction_log());
        assert!(!log.contains("INSERT INTO"));
        assert!(!log.contains(" SET "));
    }

    #[test]
    fn test_snapshot_copies_summary() {
        let scenario = Scenario::april();
        let profile = crate::payroll::PayrollProfile {
            employee: scenario.employee.clone(),
            template: scenario.template.clone(),
            lines: vec![],
        };
        let summary = crate::payroll::compute_summary(&profile, &scenario.attendance, scenario.period).unwrap();
        let actor = Uuid::new_v4();

        let snapshot = snapshot_of(&summary, actor, scenario.period).unwrap();

        assert_eq!(snapshot.month, Set(4));
        assert_eq!(snapshot.year, Set(2025));
        assert_eq!(snapshot.lwp_days, Set(dec!(2.5)));
        assert_eq!(snapshot.net_payable, Set(dec!(27500.00)));
        assert_eq!(snapshot.status, Set(PayslipStatus::Finalized));
        assert_eq!(snapshot.user_id, Set(Some(actor)));
        assert_eq!(snapshot.company_id, Set(scenario.employee.company_id));
        assert_eq!(snapshot.breakdown_json, Set(serde_json::json!({ "earnings": [], "deductions": [] })));
    }
}
