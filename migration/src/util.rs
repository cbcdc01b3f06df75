use sea_orm_migration::prelude::*;

/// Every table carries a generated uuid key and creation/update timestamps
pub(crate) fn default_table_statement() -> TableCreateStatement {
    TableCreateStatement::new()
        .if_not_exists()
        .col(ColumnDef::new(DefaultColumn::Id)
            .uuid()
            .primary_key()
            .default(Expr::cust("GEN_RANDOM_UUID()"))
            .take())
        .col(ColumnDef::new(DefaultColumn::CreatedAt)
            .timestamp_with_time_zone()
            .not_null()
            .default(Expr::current_timestamp())
            .take())
        .col(ColumnDef::new(DefaultColumn::UpdatedAt)
            .timestamp_with_time_zone()
            .not_null()
            .default(Expr::current_timestamp())
            .take())
        .take()
}

#[derive(DeriveIden)]
pub(crate) enum DefaultColumn {
    Id,
    CreatedAt,
    UpdatedAt,
}

/// Money columns: twelve digits, two of them fractional
pub(crate) fn money(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .decimal_len(12, 2)
        .take()
}

/// Day-count columns; half days make them fractional
pub(crate) fn day_count(col: impl IntoIden) -> ColumnDef {
    ColumnDef::new(col)
        .decimal_len(10, 2)
        .not_null()
        .default(0)
        .take()
}

/// Foreign key from `table.column` to the `id` of `target`
///
/// # Example
///
/// ```rs
/// manager.create_foreign_key(
///     references(Employee::Table, Employee::SalaryTemplateId, SalaryTemplate::Table)
///         .on_delete(ForeignKeyAction::SetNull)
///         .take()
/// ).await?;
/// ```
pub(crate) fn references(table: impl IntoIden + 'static, column: impl IntoIden + 'static, target: impl IntoIden + 'static) -> ForeignKeyCreateStatement {
    ForeignKeyCreateStatement::new()
        .from(table, column)
        .to(target, DefaultColumn::Id)
        .on_update(ForeignKeyAction::Cascade)
        .take()
}
