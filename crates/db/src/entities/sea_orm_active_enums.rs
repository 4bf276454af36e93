//! `SeaORM` active enums.
//!
//! Stored as plain integers and strings rather than native database enums so
//! the schema is identical on every supported backend.

use ledgerline_core::opening_balance as core;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Batch lifecycle status, stored as its legacy integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    #[sea_orm(num_value = 1)]
    Approved,
    #[sea_orm(num_value = 2)]
    Rejected,
    #[sea_orm(num_value = 3)]
    Draft,
    #[sea_orm(num_value = 8)]
    Submitted,
}

impl From<BatchStatus> for core::BatchStatus {
    fn from(status: BatchStatus) -> Self {
        match status {
            BatchStatus::Approved => Self::Approved,
            BatchStatus::Rejected => Self::Rejected,
            BatchStatus::Draft => Self::Draft,
            BatchStatus::Submitted => Self::Submitted,
        }
    }
}

impl From<core::BatchStatus> for BatchStatus {
    fn from(status: core::BatchStatus) -> Self {
        match status {
            core::BatchStatus::Approved => Self::Approved,
            core::BatchStatus::Rejected => Self::Rejected,
            core::BatchStatus::Draft => Self::Draft,
            core::BatchStatus::Submitted => Self::Submitted,
        }
    }
}

/// Edit-request sub-status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum EditRequestStatus {
    #[sea_orm(string_value = "none")]
    #[serde(rename = "none")]
    NotRequested,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "pending")]
    Pending,
}

impl From<EditRequestStatus> for core::EditRequestStatus {
    fn from(status: EditRequestStatus) -> Self {
        match status {
            EditRequestStatus::NotRequested => Self::None,
            EditRequestStatus::Approved => Self::Approved,
            EditRequestStatus::Rejected => Self::Rejected,
            EditRequestStatus::Pending => Self::Pending,
        }
    }
}

impl From<core::EditRequestStatus> for EditRequestStatus {
    fn from(status: core::EditRequestStatus) -> Self {
        match status {
            core::EditRequestStatus::None => Self::NotRequested,
            core::EditRequestStatus::Approved => Self::Approved,
            core::EditRequestStatus::Rejected => Self::Rejected,
            core::EditRequestStatus::Pending => Self::Pending,
        }
    }
}

/// Counterparty kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PartyType {
    #[sea_orm(string_value = "Customer")]
    Customer,
    #[sea_orm(string_value = "Supplier")]
    Supplier,
}

impl From<PartyType> for core::PartyType {
    fn from(party_type: PartyType) -> Self {
        match party_type {
            PartyType::Customer => Self::Customer,
            PartyType::Supplier => Self::Supplier,
        }
    }
}

impl From<core::PartyType> for PartyType {
    fn from(party_type: core::PartyType) -> Self {
        match party_type {
            core::PartyType::Customer => Self::Customer,
            core::PartyType::Supplier => Self::Supplier,
        }
    }
}
