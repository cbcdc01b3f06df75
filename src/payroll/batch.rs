use sea_orm::ConnectionTrait;
use tracing::warn;

use super::{calculation, store, BatchFailure, BatchOutcome, PayPeriod, PayrollError};

/// Runs the monthly calculation over every active Regular or Trainee employee.
///
/// A calculation error is recorded against the employee and the run moves on;
/// any other error aborts the whole batch.
#[tracing::instrument(skip(db))]
pub async fn calculate_batch_salary<C: ConnectionTrait>(db: &C, period: PayPeriod) -> Result<BatchOutcome, PayrollError> {
    let roster = store::find_payroll_roster(db).await?;

    let mut summaries = Vec::with_capacity(roster.len());
    let mut errors = Vec::new();

    for employee in roster {
        let employee_id = employee.id;
        let name = employee.full_name();

        match calculation::summarize_employee(db, employee, period).await {
            Ok(summary) => summaries.push(summary),
            Err(PayrollError::Calculation(message)) => {
                warn!(%employee_id, %message, "skipping employee in payroll batch");

                errors.push(BatchFailure {
                    employee_id,
                    name,
                    error: message,
                });
            },
            Err(err) => return Err(err),
        }
    }

    Ok(BatchOutcome {
        success_count: summaries.len(),
        error_count: errors.len(),
        summaries,
        errors,
    })
}
