use actix_web::{dev, post, web, FromRequest, HttpRequest, Responder};
use futures_util::future::LocalBoxFuture;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{auth::AuthUser, payroll::{self, FinalizedPayslip, PayPeriod, PayrollError}};

use extractor::{Valid, ValidateRequest};
use model::*;

mod extractor;
mod model;

pub(super) fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .service(calculate)
        .service(calculate_batch)
        .service(finalize)
        .service(employee_payslips)
        .service(payslip_detail)
        .service(history)
        .service(available_months);
}

#[post("/calculate")]
async fn calculate(db: web::Data<DatabaseConnection>, _: AuthUser, Valid(request): Valid<EmployeeMonthRequest>) -> Result<impl Responder, PayrollError> {
    let summary = payroll::calculate_monthly_salary(db.get_ref(), request.employee_id, request.period).await?;

    Ok(web::Json(summary))
}

#[post("/calculate-batch")]
async fn calculate_batch(db: web::Data<DatabaseConnection>, _: AuthUser, Valid(period): Valid<MonthRequest>) -> Result<impl Responder, PayrollError> {
    let outcome = payroll::calculate_batch_salary(db.get_ref(), period).await?;

    Ok(web::Json(outcome))
}

#[post("/finalize")]
async fn finalize(db: web::Data<DatabaseConnection>, user: AuthUser, Valid(request): Valid<EmployeeMonthRequest>) -> Result<impl Responder, PayrollError> {
    let finalized = payroll::finalize_monthly_salary(db.get_ref(), user.id, request.employee_id, request.period).await?;

    Ok(web::Json(FinalizeResponse::from(finalized)))
}

#[post("/payslips")]
async fn employee_payslips(db: web::Data<DatabaseConnection>, _: AuthUser, Valid(employee_id): Valid<EmployeeRequest>) -> Result<impl Responder, PayrollError> {
    let payslips = payroll::list_employee_payslips(db.get_ref(), employee_id).await?;

    Ok(web::Json(payslips))
}

#[post("/payslip")]
async fn payslip_detail(db: web::Data<DatabaseConnection>, _: AuthUser, Valid(id): Valid<PayslipRequest>) -> Result<impl Responder, PayrollError> {
    let payslip = payroll::get_payslip_by_id(db.get_ref(), id).await?;

    Ok(web::Json(payslip))
}

#[post("/history")]
async fn history(db: web::Data<DatabaseConnection>, _: AuthUser, request: Option<web::Json<HistoryRequest>>) -> Result<impl Responder, PayrollError> {
    let request = request.map(web::Json::into_inner).unwrap_or_default();
    let history = payroll::get_calculation_history(db.get_ref(), request.page, request.per_page).await?;

    Ok(web::Json(history))
}

#[post("/available-months")]
async fn available_months(db: web::Data<DatabaseConnection>, _: AuthUser, Valid(employee_id): Valid<EmployeeRequest>) -> Result<impl Responder, PayrollError> {
    let months = payroll::get_available_months_for_calculation(db.get_ref(), employee_id).await?;

    Ok(web::Json(months))
}
