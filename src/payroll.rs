//! Monthly payroll: attendance aggregation, salary proration, payslip finalization and batch runs.

pub use batch::calculate_batch_salary;
pub use calculation::{calculate_monthly_salary, compute_summary};
pub use error::{PayrollError, MISSING_SALARY_TEMPLATE};
pub use finalize::finalize_monthly_salary;
pub use history::{get_available_months_for_calculation, get_calculation_history, get_payslip_by_id, list_employee_payslips};
pub use model::*;

mod batch;
mod calculation;
mod error;
mod finalize;
mod history;
mod model;
mod store;

#[cfg(test)]
pub(crate) mod fixtures;
