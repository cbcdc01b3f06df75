use sea_orm_migration::{prelude::{extension::postgres::TypeDropStatement, *}, sea_orm::{ActiveEnum, DbBackend, DeriveActiveEnum, EnumIter, Schema}};

use crate::util::{day_count, default_table_statement, money, references};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(DbBackend::Postgres);

        manager
            .create_type(
                schema.create_enum_from_active_enum::<StaffType>()
            ).await?;

        manager
            .create_type(
                schema.create_enum_from_active_enum::<ComponentType>()
            ).await?;

        manager
            .create_table(default_table_statement()
                .table(SalaryComponent::Table)
                .col(ColumnDef::new(SalaryComponent::ComponentName)
                    .text()
                    .not_null())
                .col(ColumnDef::new(SalaryComponent::ComponentType)
                    .custom(ComponentType::name())
                    .not_null())
                .col(ColumnDef::new(SalaryComponent::IsLwpImpacted)
                    .boolean()
                    .not_null()
                    .default(false))
                .col(ColumnDef::new(SalaryComponent::CompanyId)
                    .uuid())
                .take()
            ).await?;

        manager
            .create_table(default_table_statement()
                .table(SalaryTemplate::Table)
                .col(ColumnDef::new(SalaryTemplate::TemplateName)
                    .text()
                    .not_null())
                .col(money(SalaryTemplate::CtcMonthly))
                .col(ColumnDef::new(SalaryTemplate::LwpCalculationBasis)
                    .text()) // Unknown values fall back to a fixed 30 day month, so no enum here
                .col(ColumnDef::new(SalaryTemplate::Status)
                    .small_integer()
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(SalaryTemplate::CompanyId)
                    .uuid())
                .take()
            ).await?;

        manager
            .create_table(default_table_statement()
                .table(SalaryTemplateTransaction::Table)
                .col(ColumnDef::new(SalaryTemplateTransaction::SalaryTemplateId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(SalaryTemplateTransaction::ComponentId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(SalaryTemplateTransaction::Position)
                    .integer()
                    .not_null()
                    .default(0))
                .col(money(SalaryTemplateTransaction::MonthlyAmount))
                .col(ColumnDef::new(SalaryTemplateTransaction::Status)
                    .small_integer()
                    .not_null()
                    .default(0))
                .take()
            ).await?;

        manager.create_foreign_key(
            references(SalaryTemplateTransaction::Table, SalaryTemplateTransaction::SalaryTemplateId, SalaryTemplate::Table)
                .on_delete(ForeignKeyAction::Cascade)
                .take()
        ).await?;

        manager.create_foreign_key(
            references(SalaryTemplateTransaction::Table, SalaryTemplateTransaction::ComponentId, SalaryComponent::Table)
                .on_delete(ForeignKeyAction::Restrict)
                .take()
        ).await?;

        manager.create_index(
            Index::create()
                .name("idx_salary_template_transaction_component")
                .table(SalaryTemplateTransaction::Table)
                .col(SalaryTemplateTransaction::SalaryTemplateId)
                .col(SalaryTemplateTransaction::ComponentId)
                .unique()
                .take()
        ).await?;

        manager
            .create_table(default_table_statement()
                .table(Employee::Table)
                .col(ColumnDef::new(Employee::EmployeeCode)
                    .text()
                    .unique_key())
                .col(ColumnDef::new(Employee::FirstName)
                    .text()
                    .not_null())
                .col(ColumnDef::new(Employee::LastName)
                    .text())
                .col(ColumnDef::new(Employee::StaffType)
                    .custom(StaffType::name())
                    .not_null())
                .col(ColumnDef::new(Employee::Status)
                    .small_integer()
                    .not_null()
                    .default(0))
                .col(ColumnDef::new(Employee::SalaryTemplateId)
                    .uuid())
                .col(ColumnDef::new(Employee::BranchId)
                    .uuid())
                .col(ColumnDef::new(Employee::CompanyId)
                    .uuid())
                .take()
            ).await?;

        manager.create_foreign_key(
            references(Employee::Table, Employee::SalaryTemplateId, SalaryTemplate::Table)
                .on_delete(ForeignKeyAction::SetNull)
                .take()
        ).await?;

        manager
            .create_table(default_table_statement()
                .table(AttendanceDay::Table)
                .col(ColumnDef::new(AttendanceDay::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(AttendanceDay::AttendanceDate)
                    .date()
                    .not_null())
                .col(ColumnDef::new(AttendanceDay::Status)
                    .small_integer()
                    .not_null()
                    .default(0)) // 0 present, 1 half day, 3 weekly off, 4 holiday, 5 absent, 6 leave, 99 void
                .col(ColumnDef::new(AttendanceDay::FineAmount)
                    .decimal_len(10, 2)
                    .default(0))
                .col(ColumnDef::new(AttendanceDay::OvertimeMinutes)
                    .integer()
                    .default(0))
                .col(ColumnDef::new(AttendanceDay::IsLocked)
                    .boolean()
                    .not_null()
                    .default(false))
                .take()
            ).await?;

        manager.create_foreign_key(
            references(AttendanceDay::Table, AttendanceDay::EmployeeId, Employee::Table)
                .on_delete(ForeignKeyAction::Cascade)
                .take()
        ).await?;

        manager.create_index(
            Index::create()
                .name("idx_attendance_day_employee_date")
                .table(AttendanceDay::Table)
                .col(AttendanceDay::EmployeeId)
                .col(AttendanceDay::AttendanceDate)
                .unique()
                .take()
        ).await?;

        manager
            .create_table(default_table_statement()
                .table(Payslip::Table)
                .col(ColumnDef::new(Payslip::EmployeeId)
                    .uuid()
                    .not_null())
                .col(ColumnDef::new(Payslip::Month)
                    .integer()
                    .not_null())
                .col(ColumnDef::new(Payslip::Year)
                    .integer()
                    .not_null())
                .col(money(Payslip::CtcMonthly).not_null().default(0))
                .col(day_count(Payslip::PresentDays))
                .col(day_count(Payslip::HalfDays))
                .col(day_count(Payslip::AbsentDays))
                .col(day_count(Payslip::LeaveDays))
                .col(day_count(Payslip::WeeklyOffs))
                .col(day_count(Payslip::Holidays))
                .col(day_count(Payslip::LwpDays))
                .col(money(Payslip::PerDaySalary).not_null().default(0))
                .col(money(Payslip::LwpDeduction).not_null().default(0))
                .col(money(Payslip::TotalFine).not_null().default(0))
                .col(money(Payslip::OtAmount).not_null().default(0))
                .col(money(Payslip::NetPayable).not_null().default(0))
                .col(ColumnDef::new(Payslip::BreakdownJson)
                    .json_binary()
                    .not_null())
                .col(ColumnDef::new(Payslip::Status)
                    .small_integer()
                    .not_null()
                    .default(0)) // 0 draft, 1 finalized, 2 paid, 99 cancelled
                .col(ColumnDef::new(Payslip::UserId)
                    .uuid())
                .col(ColumnDef::new(Payslip::BranchId)
                    .uuid())
                .col(ColumnDef::new(Payslip::CompanyId)
                    .uuid())
                .take()
            ).await?;

        manager.create_foreign_key(
            references(Payslip::Table, Payslip::EmployeeId, Employee::Table)
                .on_delete(ForeignKeyAction::Restrict)
                .take()
        ).await?;

        // One live payslip per employee and month. A second concurrent finalize that slipped
        // past the row lock fails here instead of writing a duplicate.
        manager
            .get_connection()
            .execute_unprepared(
                r#"CREATE UNIQUE INDEX "idx_payslip_employee_period" ON "payslip" ("employee_id", "month", "year") WHERE "status" <> 99"#
            ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(TableDropStatement::new().table(Payslip::Table).take()).await?;
        manager.drop_table(TableDropStatement::new().table(AttendanceDay::Table).take()).await?;
        manager.drop_table(TableDropStatement::new().table(Employee::Table).take()).await?;
        manager.drop_table(TableDropStatement::new().table(SalaryTemplateTransaction::Table).take()).await?;
        manager.drop_table(TableDropStatement::new().table(SalaryTemplate::Table).take()).await?;
        manager.drop_table(TableDropStatement::new().table(SalaryComponent::Table).take()).await?;

        manager
            .drop_type(
                TypeDropStatement::new()
                    .name(ComponentType::name())
                    .to_owned()
            ).await?;

        manager
            .drop_type(
                TypeDropStatement::new()
                    .name(StaffType::name())
                    .to_owned()
            ).await?;

        Ok(())
    }
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "staff_type")]
enum StaffType {
    #[sea_orm(string_value = "Regular")]
    Regular,
    #[sea_orm(string_value = "Trainee")]
    Trainee,
    #[sea_orm(string_value = "Contract")]
    Contract,
}

#[derive(EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "component_type")]
enum ComponentType {
    #[sea_orm(string_value = "EARNING")]
    Earning,
    #[sea_orm(string_value = "DEDUCTION")]
    Deduction,
}

#[derive(DeriveIden)]
enum SalaryComponent {
    Table,
    ComponentName,
    ComponentType,
    IsLwpImpacted,
    CompanyId,
}

#[derive(DeriveIden)]
enum SalaryTemplate {
    Table,
    TemplateName,
    CtcMonthly,
    LwpCalculationBasis,
    Status,
    CompanyId,
}

#[derive(DeriveIden)]
enum SalaryTemplateTransaction {
    Table,
    SalaryTemplateId,
    ComponentId,
    Position,
    MonthlyAmount,
    Status,
}

#[derive(DeriveIden)]
enum Employee {
    Table,
    EmployeeCode,
    FirstName,
    LastName,
    StaffType,
    Status,
    SalaryTemplateId,
    BranchId,
    CompanyId,
}

#[derive(DeriveIden)]
enum AttendanceDay {
    Table,
    EmployeeId,
    AttendanceDate,
    Status,
    FineAmount,
    OvertimeMinutes,
    IsLocked,
}

#[derive(DeriveIden)]
enum Payslip {
    Table,
    EmployeeId,
    Month,
    Year,
    CtcMonthly,
    PresentDays,
    HalfDays,
    AbsentDays,
    LeaveDays,
    WeeklyOffs,
    Holidays,
    LwpDays,
    PerDaySalary,
    LwpDeduction,
    TotalFine,
    OtAmount,
    NetPayable,
    BreakdownJson,
    Status,
    UserId,
    BranchId,
    CompanyId,
}
