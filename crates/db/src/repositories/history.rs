//! Append-only history log.

use ledgerline_core::audit::HistoryAction;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use serde_json::Value;
use uuid::Uuid;

use crate::entities::history_logs;

/// A history entry to append.
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    /// Owning company.
    pub company_id: Uuid,
    /// Module name, e.g. `opening_balance`.
    pub module: &'static str,
    /// Subject id within the module.
    pub module_id: i32,
    /// Acting user.
    pub user_id: Uuid,
    /// Recorded action.
    pub action: HistoryAction,
    /// Action-specific details.
    pub details: Value,
}

/// History log repository.
#[derive(Debug, Clone)]
pub struct HistoryRepository {
    db: DatabaseConnection,
}

impl HistoryRepository {
    /// Creates a new history repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends an entry on the given connection or transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn append<C: ConnectionTrait>(
        conn: &C,
        entry: NewHistoryEntry,
    ) -> Result<history_logs::Model, DbErr> {
        history_logs::ActiveModel {
            company_id: Set(entry.company_id),
            module: Set(entry.module.to_string()),
            module_id: Set(entry.module_id),
            user_id: Set(entry.user_id),
            action: Set(entry.action.as_str().to_string()),
            details: Set(entry.details),
            created_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        }
        .insert(conn)
        .await
    }

    /// Entries for one subject, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        company_id: Uuid,
        module: &str,
        module_id: i32,
    ) -> Result<Vec<history_logs::Model>, DbErr> {
        history_logs::Entity::find()
            .filter(history_logs::Column::CompanyId.eq(company_id))
            .filter(history_logs::Column::Module.eq(module))
            .filter(history_logs::Column::ModuleId.eq(module_id))
            .order_by_asc(history_logs::Column::Id)
            .all(&self.db)
            .await
    }
}
