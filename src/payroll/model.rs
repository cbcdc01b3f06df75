use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    consts::{FIXED_MONTH_DAYS, VOID_ATTENDANCE_STATUS},
    entity::{attendance_day, employee, salary_component, salary_template},
    utils,
};

use super::PayrollError;

/// A calendar month, validated on construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayPeriod {
    month: u32,
    year: i32,
    start: NaiveDate,
    end: NaiveDate,
}

impl PayPeriod {
    pub fn new(month: u32, year: i32) -> Result<Self, PayrollError> {
        if !(1..=12).contains(&month) {
            return Err(PayrollError::Validation("Month must be between 1 and 12".to_string()));
        }

        let Some((start, end)) = utils::month_range(year, month) else {
            return Err(PayrollError::Validation(format!("Year {year} is out of range")));
        };

        Ok(Self { month, year, start, end })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn days_in_month(&self) -> u32 {
        utils::count_days(self.start, self.end)
    }

    /// `Apr 2025`
    pub fn short_label(&self) -> String {
        self.start.format("%b %Y").to_string()
    }

    /// `April 2025`
    pub fn long_label(&self) -> String {
        self.start.format("%B %Y").to_string()
    }
}

/// Day-count convention used to derive the per-day salary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LwpBasis {
    DaysInMonth,
    Fixed30Days,
    WorkingDays,
}

impl LwpBasis {
    /// Unset or unknown bases count a fixed 30 day month
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("DAYS_IN_MONTH") => LwpBasis::DaysInMonth,
            Some("WORKING_DAYS") => LwpBasis::WorkingDays,
            _ => LwpBasis::Fixed30Days,
        }
    }

    /// May be zero or negative for `WORKING_DAYS`; callers must reject that
    pub fn days_in_calculation(&self, days_in_month: u32, weekly_offs: u32) -> i64 {
        match self {
            LwpBasis::DaysInMonth => days_in_month as i64,
            LwpBasis::Fixed30Days => FIXED_MONTH_DAYS,
            LwpBasis::WorkingDays => days_in_month as i64 - weekly_offs as i64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    Present,
    HalfDay,
    WeeklyOff,
    Holiday,
    Absent,
    Leave,
    Void,
}

impl AttendanceStatus {
    /// Codes outside the known set have no bucket and yield `None`
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(AttendanceStatus::Present),
            1 => Some(AttendanceStatus::HalfDay),
            3 => Some(AttendanceStatus::WeeklyOff),
            4 => Some(AttendanceStatus::Holiday),
            5 => Some(AttendanceStatus::Absent),
            6 => Some(AttendanceStatus::Leave),
            VOID_ATTENDANCE_STATUS => Some(AttendanceStatus::Void),
            _ => None,
        }
    }
}

/// Attendance records of one month folded into buckets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceTally {
    pub present_days: u32,
    pub half_days: u32,
    pub weekly_offs: u32,
    pub holidays: u32,
    pub absent_days: u32,
    pub leave_days: u32,
    pub total_fine: Decimal,
    pub overtime_minutes: i64,
}

impl AttendanceTally {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a attendance_day::Model>) -> Self {
        let mut tally = Self::default();

        for day in records {
            match AttendanceStatus::from_code(day.status) {
                Some(AttendanceStatus::Void) => continue,
                Some(AttendanceStatus::Present) => tally.present_days += 1,
                Some(AttendanceStatus::HalfDay) => tally.half_days += 1,
                Some(AttendanceStatus::WeeklyOff) => tally.weekly_offs += 1,
                Some(AttendanceStatus::Holiday) => tally.holidays += 1,
                Some(AttendanceStatus::Absent) => tally.absent_days += 1,
                Some(AttendanceStatus::Leave) => tally.leave_days += 1,
                None => {},
            }

            tally.total_fine += day.fine_amount.unwrap_or_default();
            tally.overtime_minutes += day.overtime_minutes.unwrap_or_default() as i64;
        }

        tally
    }

    /// Loss-of-pay days: absences count fully, half days count half
    pub fn total_lwp(&self) -> Decimal {
        Decimal::from(self.absent_days) + Decimal::from(self.half_days) * dec!(0.5)
    }
}

/// An employee with the salary template payroll runs against
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollProfile {
    pub employee: employee::Model,
    pub template: salary_template::Model,
    pub lines: Vec<TemplateLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateLine {
    pub component: salary_component::Model,
    pub monthly_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalarySummary {
    pub employee: SummaryEmployee,
    pub period: SummaryPeriod,
    pub attendance: AttendanceCounts,
    pub salary: SalaryFigures,
    pub breakdown: Breakdown,
    pub meta: SummaryMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEmployee {
    pub id: Uuid,
    pub name: String,
    pub code: Option<String>,
    pub template: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPeriod {
    pub month: u32,
    pub year: i32,
    pub days_in_month: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceCounts {
    pub present_days: u32,
    pub half_days: u32,
    pub absent_days: u32,
    pub leave_days: u32,
    pub weekly_offs: u32,
    pub holidays: u32,
    #[serde(rename = "totalLWP", with = "rust_decimal::serde::float")]
    pub total_lwp: Decimal,
}

/// Monetary figures; every field except the gross renders as a 2-place string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryFigures {
    #[serde(rename = "ctc_monthly", with = "rust_decimal::serde::float")]
    pub ctc_monthly: Decimal,
    pub per_day_salary: Decimal,
    pub lwp_deduction: Decimal,
    pub total_fine: Decimal,
    pub overtime_amount: Decimal,
    pub net_payable: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Breakdown {
    pub earnings: Vec<EarningLine>,
    pub deductions: Vec<DeductionLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningLine {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub actual_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductionLine {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMeta {
    pub branch_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub success_count: usize,
    pub error_count: usize,
    pub summaries: Vec<SalarySummary>,
    pub errors: Vec<BatchFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub employee_id: Uuid,
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinalizedPayslip {
    pub payslip_id: Uuid,
    pub net_payable: Decimal,
    pub locked_days: u64,
}
