//! `SeaORM` Entity for opening_balance_batches table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{BatchStatus, EditRequestStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "opening_balance_batches")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub company_id: Uuid,
    #[sea_orm(unique)]
    pub batch_number: String,
    pub opening_date: Date,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub status: BatchStatus,
    pub edit_request_status: EditRequestStatus,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_debit_base: Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub total_credit_base: Decimal,
    pub line_count: i32,
    pub journal_id: Option<i32>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTimeWithTimeZone,
    pub submitted_by: Option<Uuid>,
    pub submitted_at: Option<DateTimeWithTimeZone>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "Text", nullable)]
    pub approval_comment: Option<String>,
    pub rejected_by: Option<Uuid>,
    pub rejected_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "Text", nullable)]
    pub rejection_reason: Option<String>,
    pub edit_requested_by: Option<Uuid>,
    pub edit_requested_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "Text", nullable)]
    pub edit_request_reason: Option<String>,
    pub edit_reviewed_by: Option<Uuid>,
    pub edit_reviewed_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "Text", nullable)]
    pub edit_rejection_reason: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Companies,
    #[sea_orm(
        belongs_to = "super::gl_journals::Entity",
        from = "Column::JournalId",
        to = "super::gl_journals::Column::Id"
    )]
    GlJournals,
    #[sea_orm(has_many = "super::opening_balance_lines::Entity")]
    OpeningBalanceLines,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl Related<super::gl_journals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GlJournals.def()
    }
}

impl Related<super::opening_balance_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OpeningBalanceLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
