//! `SeaORM` Entity for gl_journals table.
//!
//! Journals are never deleted. A replaced journal keeps its rows and is
//! marked with `is_deleted`, `deleted_at` and the id of its replacement.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "gl_journals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub company_id: Uuid,
    pub source_type: String,
    pub source_id: i32,
    pub journal_date: Date,
    #[sea_orm(column_type = "Text")]
    pub memo: String,
    pub currency_code: String,
    #[sea_orm(column_type = "Decimal(Some((20, 10)))")]
    pub exchange_rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_debit: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_credit: Decimal,
    pub is_deleted: bool,
    pub superseded_by: Option<i32>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Companies,
    #[sea_orm(has_many = "super::gl_journal_lines::Entity")]
    GlJournalLines,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl Related<super::gl_journal_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GlJournalLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
