use std::{fmt::Display, str::FromStr};

use serde::{de, Deserializer};

use super::*;

const EMPLOYEE_MONTH_REQUIRED: &str = "Employee, Month, and Year are required";

/// Reads a number sent either bare (`4`) or quoted (`"4"`). A blank string counts as absent.
fn number_or_string<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose<T> {
        Number(T),
        Text(String),
    }

    match Option::<Loose<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Loose::Number(value)) => Ok(Some(value)),
        Some(Loose::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Loose::Text(text)) => text.trim().parse().map(Some).map_err(de::Error::custom),
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct EmployeeMonthRequest {
    pub(super) employee_id: Option<Uuid>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub(super) month: Option<u32>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub(super) year: Option<i32>,
}

pub(super) struct EmployeeMonth {
    pub(super) employee_id: Uuid,
    pub(super) period: PayPeriod,
}

impl ValidateRequest for EmployeeMonthRequest {
    type Output = EmployeeMonth;

    fn validate(self) -> Result<Self::Output, PayrollError> {
        let (Some(employee_id), Some(month), Some(year)) = (self.employee_id, self.month, self.year) else {
            return Err(PayrollError::Validation(EMPLOYEE_MONTH_REQUIRED.to_string()));
        };

        Ok(EmployeeMonth {
            employee_id,
            period: PayPeriod::new(month, year)?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct MonthRequest {
    #[serde(default, deserialize_with = "number_or_string")]
    pub(super) month: Option<u32>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub(super) year: Option<i32>,
}

impl ValidateRequest for MonthRequest {
    type Output = PayPeriod;

    fn validate(self) -> Result<Self::Output, PayrollError> {
        let (Some(month), Some(year)) = (self.month, self.year) else {
            return Err(PayrollError::Validation("Month and Year are required".to_string()));
        };

        PayPeriod::new(month, year)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct EmployeeRequest {
    pub(super) employee_id: Option<Uuid>,
}

impl ValidateRequest for EmployeeRequest {
    type Output = Uuid;

    fn validate(self) -> Result<Self::Output, PayrollError> {
        self.employee_id.ok_or_else(|| PayrollError::Validation("Employee is required".to_string()))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct PayslipRequest {
    pub(super) id: Option<Uuid>,
}

impl ValidateRequest for PayslipRequest {
    type Output = Uuid;

    fn validate(self) -> Result<Self::Output, PayrollError> {
        self.id.ok_or_else(|| PayrollError::Validation("Payslip id is required".to_string()))
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(super) struct HistoryRequest {
    pub(super) page: Option<u64>,
    pub(super) per_page: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct FinalizeResponse {
    pub(super) status: String,
    pub(super) message: String,
    pub(super) payslip_id: Uuid,
    #[serde(rename = "netPayable")]
    pub(super) net_payable: Decimal,
    pub(super) locked_days: u64,
}

impl From<FinalizedPayslip> for FinalizeResponse {
    fn from(finalized: FinalizedPayslip) -> Self {
        Self {
            status: "PAYROLL_FINALIZED".to_string(),
            message: "Payroll finalized and attendance locked".to_string(),
            payslip_id: finalized.payslip_id,
            net_payable: finalized.net_payable,
            locked_days: finalized.locked_days,
        }
    }
}
