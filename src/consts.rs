use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::entity::sea_orm_active_enums::StaffType;

/// Nominal working hours in a day, used to derive the hourly rate
pub const WORKDAY_HOURS: u32 = 8;

pub const OVERTIME_MULTIPLIER: Decimal = dec!(1.5);

/// Month length used by the `FIXED_30_DAYS` basis and by unknown bases
pub const FIXED_MONTH_DAYS: i64 = 30;

pub const VOID_ATTENDANCE_STATUS: i16 = 99;

pub const ACTIVE_EMPLOYEE_STATUS: i16 = 0;

pub const ACTIVE_TEMPLATE_LINE_STATUS: i16 = 0;

/// Staff types included in batch payroll runs
pub const PAYROLL_STAFF_TYPES: [StaffType; 2] = [StaffType::Regular, StaffType::Trainee];

pub const MONEY_DECIMAL_PLACES: u32 = 2;

pub const DEFAULT_PAGE_SIZE: u64 = 20;

pub const MAX_PAGE_SIZE: u64 = 100;
