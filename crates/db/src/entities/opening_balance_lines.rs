//! `SeaORM` Entity for opening_balance_lines table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PartyType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "opening_balance_lines")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub batch_id: i32,
    pub line_no: i32,
    pub party_type: PartyType,
    pub party_id: i32,
    pub currency_code: String,
    #[sea_orm(column_type = "Decimal(Some((20, 10)))")]
    pub fx_rate_to_base: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub debit_foreign: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub credit_foreign: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub debit_base: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub credit_base: Decimal,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::opening_balance_batches::Entity",
        from = "Column::BatchId",
        to = "super::opening_balance_batches::Column::Id",
        on_delete = "Cascade"
    )]
    OpeningBalanceBatches,
}

impl Related<super::opening_balance_batches::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OpeningBalanceBatches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
