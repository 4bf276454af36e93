//! Initial schema.
//!
//! Tables are generated from the entity definitions so the same migration
//! runs on PostgreSQL and SQLite. Creation order follows foreign keys.

use sea_orm::{DbBackend, EntityName, EntityTrait, Iterable, RelationTrait, Schema};
use sea_orm_migration::prelude::*;

use crate::entities::{
    chart_of_accounts, companies, exchange_rates, gl_journal_lines, gl_journals, history_logs,
    opening_balance_batches, opening_balance_lines, parties,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// `CREATE TABLE` for an entity on the given backend.
///
/// SQLite stores decimals without a declared precision; its column syntax
/// caps precision at 16 digits, below the `NUMERIC(19, 4)` used for amounts.
fn table_statement<E: EntityTrait>(backend: DbBackend, entity: E) -> TableCreateStatement {
    let schema = Schema::new(backend);
    let mut stmt = Table::create();
    stmt.table(entity.table_ref()).if_not_exists();

    for column in E::Column::iter() {
        let mut def = schema.get_column_def::<E>(column);
        if backend == DbBackend::Sqlite
            && matches!(def.get_column_type(), Some(ColumnType::Decimal(Some(_))))
        {
            def.decimal();
        }
        stmt.col(&mut def);
    }

    for relation in E::Relation::iter() {
        let relation = relation.def();
        if !relation.is_owner {
            stmt.foreign_key(&mut relation.into());
        }
    }

    stmt
}

async fn create_table_for<E: EntityTrait>(
    manager: &SchemaManager<'_>,
    entity: E,
) -> Result<(), DbErr> {
    manager
        .create_table(table_statement(manager.get_database_backend(), entity))
        .await
}

async fn drop_table_for<E: EntityTrait>(
    manager: &SchemaManager<'_>,
    entity: E,
) -> Result<(), DbErr> {
    manager
        .drop_table(Table::drop().table(entity).if_exists().to_owned())
        .await
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        create_table_for(manager, companies::Entity).await?;
        create_table_for(manager, chart_of_accounts::Entity).await?;
        create_table_for(manager, parties::Entity).await?;
        create_table_for(manager, exchange_rates::Entity).await?;
        create_table_for(manager, gl_journals::Entity).await?;
        create_table_for(manager, gl_journal_lines::Entity).await?;
        create_table_for(manager, opening_balance_batches::Entity).await?;
        create_table_for(manager, opening_balance_lines::Entity).await?;
        create_table_for(manager, history_logs::Entity).await?;

        // One line per party per batch
        manager
            .create_index(
                Index::create()
                    .name("uq_opening_balance_lines_party")
                    .table(opening_balance_lines::Entity)
                    .col(opening_balance_lines::Column::BatchId)
                    .col(opening_balance_lines::Column::PartyType)
                    .col(opening_balance_lines::Column::PartyId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_opening_balance_batches_company_status")
                    .table(opening_balance_batches::Entity)
                    .col(opening_balance_batches::Column::CompanyId)
                    .col(opening_balance_batches::Column::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_gl_journals_source")
                    .table(gl_journals::Entity)
                    .col(gl_journals::Column::SourceType)
                    .col(gl_journals::Column::SourceId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_chart_of_accounts_subtype")
                    .table(chart_of_accounts::Entity)
                    .col(chart_of_accounts::Column::CompanyId)
                    .col(chart_of_accounts::Column::AccountSubtype)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_exchange_rates_pair_date")
                    .table(exchange_rates::Entity)
                    .col(exchange_rates::Column::CompanyId)
                    .col(exchange_rates::Column::FromCurrency)
                    .col(exchange_rates::Column::ToCurrency)
                    .col(exchange_rates::Column::EffectiveDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_history_logs_subject")
                    .table(history_logs::Entity)
                    .col(history_logs::Column::Module)
                    .col(history_logs::Column::ModuleId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_table_for(manager, history_logs::Entity).await?;
        drop_table_for(manager, opening_balance_lines::Entity).await?;
        drop_table_for(manager, opening_balance_batches::Entity).await?;
        drop_table_for(manager, gl_journal_lines::Entity).await?;
        drop_table_for(manager, gl_journals::Entity).await?;
        drop_table_for(manager, exchange_rates::Entity).await?;
        drop_table_for(manager, parties::Entity).await?;
        drop_table_for(manager, chart_of_accounts::Entity).await?;
        drop_table_for(manager, companies::Entity).await
    }
}
