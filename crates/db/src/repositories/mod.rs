//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Helpers that take a generic `ConnectionTrait` run on either the pool or an
//! open transaction.

pub mod company;
pub mod exchange_rate;
pub mod history;
pub mod journal;
pub mod ledger;
pub mod opening_balance;
pub mod party;

pub use company::CompanyRepository;
pub use exchange_rate::{CreateExchangeRateInput, ExchangeRateError, ExchangeRateRepository};
pub use history::{HistoryRepository, NewHistoryEntry};
pub use journal::{JournalRepository, JournalWithLines, NewJournal, OPENING_BALANCE_SOURCE};
pub use ledger::LedgerAccessor;
pub use opening_balance::{
    ApprovedBatch, BatchDetail, BatchFilter, CreatedBatch, OpeningBalanceRepository,
};
pub use party::PartyRepository;
