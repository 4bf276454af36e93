//! Entity re-exports.

pub use super::chart_of_accounts::Entity as ChartOfAccounts;
pub use super::companies::Entity as Companies;
pub use super::exchange_rates::Entity as ExchangeRates;
pub use super::gl_journal_lines::Entity as GlJournalLines;
pub use super::gl_journals::Entity as GlJournals;
pub use super::history_logs::Entity as HistoryLogs;
pub use super::opening_balance_batches::Entity as OpeningBalanceBatches;
pub use super::opening_balance_lines::Entity as OpeningBalanceLines;
pub use super::parties::Entity as Parties;
