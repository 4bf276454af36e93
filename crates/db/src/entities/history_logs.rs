//! `SeaORM` Entity for history_logs table.
//!
//! Append-only. Rows reference their subject by module name and id, so they
//! outlive hard-deleted subjects.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "history_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub company_id: Uuid,
    pub module: String,
    pub module_id: i32,
    pub user_id: Uuid,
    pub action: String,
    pub details: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
