use actix_web::{body, http::StatusCode, HttpResponse};
use sea_orm::{DbErr, RuntimeErr, SqlxError};
use serde::Serialize;
use thiserror::Error;

pub const MISSING_SALARY_TEMPLATE: &str = "Employee or Salary Template not found. Please map the employee first.";

#[derive(Debug, Error)]
pub enum PayrollError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Calculation(String),
    #[error("Payroll for this month is already finalized or paid.")]
    AlreadyFinalized,
    #[error("{0}")]
    NotFound(String),
    #[error("database error")]
    Persistence(#[from] DbErr),
    #[error("unable to snapshot salary breakdown")]
    Snapshot(#[from] serde_json::Error),
}

impl PayrollError {
    pub fn code(&self) -> &'static str {
        match self {
            PayrollError::Validation(_) => "VALIDATION_ERROR",
            PayrollError::Calculation(_) => "CALCULATION_ERROR",
            PayrollError::AlreadyFinalized => "ALREADY_FINALIZED",
            PayrollError::NotFound(_) => "NOT_FOUND",
            PayrollError::Persistence(_) | PayrollError::Snapshot(_) => "SERVER_ERROR",
        }
    }

    /// A write that lost the race against the unique payslip index means
    /// another request finalized the same period first
    pub(crate) fn from_payslip_write(err: DbErr) -> Self {
        let unique_violation = match &err {
            DbErr::Exec(RuntimeErr::SqlxError(SqlxError::Database(db_err)))
            | DbErr::Query(RuntimeErr::SqlxError(SqlxError::Database(db_err))) => db_err.is_unique_violation(),
            _ => false,
        };

        if unique_violation {
            PayrollError::AlreadyFinalized
        } else {
            PayrollError::Persistence(err)
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    status: &'a str,
    message: String,
}

impl actix_web::error::ResponseError for PayrollError {
    fn error_response(&self) -> HttpResponse<body::BoxBody> {
        let message = match self {
            PayrollError::Persistence(err) => {
                tracing::error!(error = %err, "payroll request failed on the database");
                "Internal server error".to_string()
            },
            PayrollError::Snapshot(err) => {
                tracing::error!(error = %err, "payroll request failed to serialize a snapshot");
                "Internal server error".to_string()
            },
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code())
            .json(ErrorBody {
                status: self.code(),
                message,
            })
    }

    fn status_code(&self) -> StatusCode {
        match self {
            PayrollError::Validation(_) => StatusCode::BAD_REQUEST,
            PayrollError::Calculation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PayrollError::AlreadyFinalized => StatusCode::CONFLICT,
            PayrollError::NotFound(_) => StatusCode::NOT_FOUND,
            PayrollError::Persistence(_) | PayrollError::Snapshot(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{body::MessageBody, ResponseError};

    use crate::payroll::fixtures;

    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(PayrollError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(PayrollError::Calculation("x".into()).status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(PayrollError::AlreadyFinalized.status_code(), StatusCode::CONFLICT);
        assert_eq!(PayrollError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(PayrollError::Persistence(DbErr::Custom("x".into())).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_body_hides_database_details() {
        let response = PayrollError::Persistence(DbErr::Custom("relation \"payslip\" does not exist".into())).error_response();
        let body = response.into_body().try_into_bytes().unwrap();
        let body = String::from_utf8_lossy(&body);

        assert!(body.contains("SERVER_ERROR"));
        assert!(!body.contains("payslip"));
    }

    #[test]
    fn test_calculation_message_is_verbatim() {
        let response = PayrollError::Calculation(MISSING_SALARY_TEMPLATE.to_string()).error_response();
        let body = response.into_body().try_into_bytes().unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(body["status"], "CALCULATION_ERROR");
        assert_eq!(body["message"], MISSING_SALARY_TEMPLATE);
    }

    #[test]
    fn test_non_unique_write_errors_stay_persistence() {
        let err = PayrollError::from_payslip_write(DbErr::Custom("connection reset".into()));
        assert!(matches!(err, PayrollError::Persistence(_)));
    }

    #[test]
    fn test_unique_violation_means_already_finalized() {
        let err = PayrollError::from_payslip_write(fixtures::unique_violation());
        assert!(matches!(err, PayrollError::AlreadyFinalized));
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }
}
