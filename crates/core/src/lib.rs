//! Core business logic for Ledgerline.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `opening_balance` - Opening balance batches: validation, workflow, posting
//! - `ledger` - Double-entry journal construction
//! - `currency` - Currency codes and base-currency conversion
//! - `audit` - History actions and field diffs

pub mod audit;
pub mod currency;
pub mod ledger;
pub mod opening_balance;
