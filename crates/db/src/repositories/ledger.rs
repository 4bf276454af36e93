//! Ledger accessor: read-only view of the chart of accounts.

use ledgerline_core::opening_balance::{ControlAccountKind, ControlAccounts, OpeningBalanceError};
use ledgerline_shared::OpeningBalanceConfig;
use sea_orm::{ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::entities::chart_of_accounts;

/// Chart-of-accounts lookups used by posting.
#[derive(Debug, Clone, Copy)]
pub struct LedgerAccessor;

/// Configured control account id for a kind, if any.
fn configured_id(config: &OpeningBalanceConfig, kind: ControlAccountKind) -> Option<i32> {
    match kind {
        ControlAccountKind::Receivable => config.receivable_account_id,
        ControlAccountKind::Payable => config.payable_account_id,
        ControlAccountKind::Equity => config.equity_account_id,
    }
}

impl LedgerAccessor {
    /// Resolves the AR, AP and Owner's Equity accounts for a company.
    ///
    /// A configured id is used when present and must name an active account
    /// of the company. Otherwise the lowest-id active account with the kind's
    /// subtype is used.
    ///
    /// # Errors
    ///
    /// Returns `MissingControlAccount` for the first kind that cannot be
    /// resolved, or `Database` if the query fails.
    pub async fn resolve_control_accounts<C: ConnectionTrait>(
        conn: &C,
        company_id: Uuid,
        config: &OpeningBalanceConfig,
    ) -> Result<ControlAccounts, OpeningBalanceError> {
        let configured: Vec<i32> = ControlAccountKind::ALL
            .iter()
            .filter_map(|kind| configured_id(config, *kind))
            .collect();
        let subtypes = ControlAccountKind::ALL.map(ControlAccountKind::subtype);

        let candidates = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::CompanyId.eq(company_id))
            .filter(chart_of_accounts::Column::IsActive.eq(true))
            .filter(
                Condition::any()
                    .add(chart_of_accounts::Column::Id.is_in(configured))
                    .add(chart_of_accounts::Column::AccountSubtype.is_in(subtypes)),
            )
            .order_by_asc(chart_of_accounts::Column::Id)
            .all(conn)
            .await
            .map_err(|e| OpeningBalanceError::Database(e.to_string()))?;

        ControlAccounts::resolve(|kind| match configured_id(config, kind) {
            Some(id) => candidates.iter().find(|a| a.id == id).map(|a| a.id),
            None => candidates
                .iter()
                .find(|a| a.account_subtype.as_deref() == Some(kind.subtype()))
                .map(|a| a.id),
        })
    }
}
