//! General ledger journal persistence.

use std::cmp::Reverse;

use chrono::NaiveDate;
use ledgerline_core::ledger::JournalDraft;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, sea_query::Expr,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::{gl_journal_lines, gl_journals};

/// Source type recorded on journals posted from opening balance batches.
pub const OPENING_BALANCE_SOURCE: &str = "OPENING_BALANCE";

/// Header values for a journal being posted.
#[derive(Debug, Clone)]
pub struct NewJournal<'a> {
    /// Owning company.
    pub company_id: Uuid,
    /// Source document type.
    pub source_type: &'a str,
    /// Source document id.
    pub source_id: i32,
    /// Journal date.
    pub journal_date: NaiveDate,
    /// Base currency of the amounts.
    pub currency_code: &'a str,
    /// Posting user.
    pub created_by: Uuid,
}

/// A journal with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct JournalWithLines {
    /// Journal header.
    #[serde(flatten)]
    pub journal: gl_journals::Model,
    /// Lines ordered by line number.
    pub lines: Vec<gl_journal_lines::Model>,
}

/// Journal repository. Journals are inserted and superseded, never deleted.
pub struct JournalRepository;

impl JournalRepository {
    /// Persists a draft journal and its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if any insert fails.
    pub async fn insert<C: ConnectionTrait>(
        conn: &C,
        header: NewJournal<'_>,
        draft: &JournalDraft,
    ) -> Result<gl_journals::Model, DbErr> {
        let journal = gl_journals::ActiveModel {
            company_id: Set(header.company_id),
            source_type: Set(header.source_type.to_string()),
            source_id: Set(header.source_id),
            journal_date: Set(header.journal_date),
            memo: Set(draft.memo.clone()),
            currency_code: Set(header.currency_code.to_string()),
            exchange_rate: Set(Decimal::ONE),
            total_debit: Set(draft.total_debit()),
            total_credit: Set(draft.total_credit()),
            is_deleted: Set(false),
            superseded_by: Set(None),
            created_by: Set(header.created_by),
            created_at: Set(chrono::Utc::now().into()),
            deleted_at: Set(None),
            ..Default::default()
        }
        .insert(conn)
        .await?;

        let lines = draft
            .lines()
            .iter()
            .zip(1..)
            .map(|(line, line_no)| gl_journal_lines::ActiveModel {
                journal_id: Set(journal.id),
                line_no: Set(line_no),
                account_id: Set(line.account_id),
                debit: Set(line.debit()),
                credit: Set(line.credit()),
                description: Set(line.description.clone()),
                entity_type: Set(line.entity.as_ref().map(|e| e.entity_type.clone())),
                entity_id: Set(line.entity.as_ref().map(|e| e.entity_id)),
                ..Default::default()
            });
        gl_journal_lines::Entity::insert_many(lines).exec(conn).await?;

        Ok(journal)
    }

    /// Marks a journal as replaced by `replacement_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn supersede<C: ConnectionTrait>(
        conn: &C,
        journal_id: i32,
        replacement_id: i32,
    ) -> Result<u64, DbErr> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = chrono::Utc::now().into();
        let result = gl_journals::Entity::update_many()
            .col_expr(gl_journals::Column::IsDeleted, Expr::value(true))
            .col_expr(gl_journals::Column::SupersededBy, Expr::value(replacement_id))
            .col_expr(gl_journals::Column::DeletedAt, Expr::value(now))
            .filter(gl_journals::Column::Id.eq(journal_id))
            .filter(gl_journals::Column::IsDeleted.eq(false))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    /// Journals posted for a source document, active first then newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn for_source<C: ConnectionTrait>(
        conn: &C,
        company_id: Uuid,
        source_type: &str,
        source_id: i32,
        include_superseded: bool,
    ) -> Result<Vec<JournalWithLines>, DbErr> {
        let mut query = gl_journals::Entity::find()
            .filter(gl_journals::Column::CompanyId.eq(company_id))
            .filter(gl_journals::Column::SourceType.eq(source_type))
            .filter(gl_journals::Column::SourceId.eq(source_id));
        if !include_superseded {
            query = query.filter(gl_journals::Column::IsDeleted.eq(false));
        }

        let journals = query
            .order_by_asc(gl_journals::Column::IsDeleted)
            .order_by_desc(gl_journals::Column::Id)
            .find_with_related(gl_journal_lines::Entity)
            .all(conn)
            .await?;

        let mut journals: Vec<JournalWithLines> = journals
            .into_iter()
            .map(|(journal, mut lines)| {
                lines.sort_by_key(|l| l.line_no);
                JournalWithLines { journal, lines }
            })
            .collect();
        journals.sort_by_key(|j| (j.journal.is_deleted, Reverse(j.journal.id)));
        Ok(journals)
    }
}
