//! `SeaORM` entity definitions.

pub mod prelude;

pub mod chart_of_accounts;
pub mod companies;
pub mod exchange_rates;
pub mod gl_journal_lines;
pub mod gl_journals;
pub mod history_logs;
pub mod opening_balance_batches;
pub mod opening_balance_lines;
pub mod parties;
pub mod sea_orm_active_enums;
