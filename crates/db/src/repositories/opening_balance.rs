//! Opening balance batch store.
//!
//! Every mutation runs in one transaction. The batch row is changed with a
//! conditional update keyed on the status and edit-request status it was read
//! in, so a competing transition matches zero rows and fails instead of being
//! applied twice.

use std::collections::HashMap;

use chrono::Utc;
use ledgerline_core::audit::{HistoryAction, diff_fields};
use ledgerline_core::opening_balance::{
    BatchInput, BatchSnapshot, BatchState, BatchStatus, BatchTransition, BatchWorkflow,
    EditDecision, HISTORY_MODULE, OpeningBalanceError, PostingEngine, ResolvedLine,
    ValidatedBatch, currencies_needing_rates, validate_batch,
};
use ledgerline_core::opening_balance::numbering::{
    MAX_ALLOCATION_ATTEMPTS, next_batch_number, year_prefix,
};
use ledgerline_shared::OpeningBalanceConfig;
use ledgerline_shared::types::{PageRequest, PageResponse};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
    sea_query::Expr,
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, warn};
use uuid::Uuid;

use crate::entities::{
    companies, history_logs, opening_balance_batches, opening_balance_lines,
    sea_orm_active_enums as db_enums,
};

use super::exchange_rate::ExchangeRateRepository;
use super::history::{HistoryRepository, NewHistoryEntry};
use super::journal::{JournalRepository, JournalWithLines, NewJournal, OPENING_BALANCE_SOURCE};
use super::ledger::LedgerAccessor;
use super::party::PartyRepository;

/// Identity of a newly created batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedBatch {
    /// Batch id.
    pub id: i32,
    /// Allocated batch number.
    pub batch_number: String,
}

/// Result of approving a batch.
#[derive(Debug, Clone)]
pub struct ApprovedBatch {
    /// Batch after approval.
    pub batch: opening_balance_batches::Model,
    /// Journal posted by this approval.
    pub journal_id: i32,
    /// Journal replaced by this approval, after an edit cycle.
    pub superseded_journal_id: Option<i32>,
}

/// Batch header with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct BatchDetail {
    /// Batch header.
    #[serde(flatten)]
    pub batch: opening_balance_batches::Model,
    /// Lines ordered by line number.
    pub lines: Vec<opening_balance_lines::Model>,
}

/// Filter for listing batches.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchFilter {
    /// Only batches in this status.
    pub status: Option<BatchStatus>,
}

/// Why one number allocation attempt did not produce a batch.
enum AttemptError {
    /// Another batch holds the number; try again.
    NumberTaken(String),
    /// Anything else; give up.
    Failed(OpeningBalanceError),
}

impl From<OpeningBalanceError> for AttemptError {
    fn from(err: OpeningBalanceError) -> Self {
        Self::Failed(err)
    }
}

#[allow(clippy::needless_pass_by_value)]
fn db_err(e: DbErr) -> OpeningBalanceError {
    OpeningBalanceError::Database(e.to_string())
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

fn state_of(batch: &opening_balance_batches::Model) -> BatchState {
    BatchState {
        batch_id: batch.id,
        status: batch.status.into(),
        edit_request_status: batch.edit_request_status.into(),
        has_journal: batch.journal_id.is_some(),
    }
}

fn snapshot_of(batch: &opening_balance_batches::Model) -> BatchSnapshot {
    BatchSnapshot::new(
        batch.opening_date,
        batch.notes.clone(),
        batch.status.into(),
        batch.line_count,
        batch.total_debit_base,
        batch.total_credit_base,
    )
}

fn resolved_line(line: &opening_balance_lines::Model) -> ResolvedLine {
    ResolvedLine {
        line_no: line.line_no,
        party_type: line.party_type.into(),
        party_id: line.party_id,
        currency_code: line.currency_code.clone(),
        fx_rate_to_base: line.fx_rate_to_base,
        debit_foreign: line.debit_foreign,
        credit_foreign: line.credit_foreign,
        debit_base: line.debit_base,
        credit_base: line.credit_base,
        notes: line.notes.clone(),
    }
}

/// Batch columns written by a transition.
fn transition_changes(
    transition: &BatchTransition,
    user_id: Uuid,
) -> opening_balance_batches::ActiveModel {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let mut changes = opening_balance_batches::ActiveModel {
        updated_by: Set(Some(user_id)),
        updated_at: Set(now),
        ..Default::default()
    };
    if let Some(status) = transition.new_status() {
        changes.status = Set(status.into());
    }

    match transition {
        BatchTransition::Update { .. } | BatchTransition::Cancel => {}
        BatchTransition::Submit {
            submitted_by,
            submitted_at,
            ..
        } => {
            changes.submitted_by = Set(Some(*submitted_by));
            changes.submitted_at = Set(Some((*submitted_at).into()));
        }
        BatchTransition::Approve {
            approved_by,
            approved_at,
            comment,
            edit_request_status,
            ..
        } => {
            changes.approved_by = Set(Some(*approved_by));
            changes.approved_at = Set(Some((*approved_at).into()));
            changes.approval_comment = Set(comment.clone());
            changes.edit_request_status = Set((*edit_request_status).into());
        }
        BatchTransition::Reject {
            rejected_by,
            rejected_at,
            reason,
            ..
        } => {
            changes.rejected_by = Set(Some(*rejected_by));
            changes.rejected_at = Set(Some((*rejected_at).into()));
            changes.rejection_reason = Set(Some(reason.clone()));
        }
        BatchTransition::RequestEdit {
            edit_request_status,
            requested_by,
            requested_at,
            reason,
        } => {
            changes.edit_request_status = Set((*edit_request_status).into());
            changes.edit_requested_by = Set(Some(*requested_by));
            changes.edit_requested_at = Set(Some((*requested_at).into()));
            changes.edit_request_reason = Set(Some(reason.clone()));
            changes.edit_reviewed_by = Set(None);
            changes.edit_reviewed_at = Set(None);
            changes.edit_rejection_reason = Set(None);
        }
        BatchTransition::ApproveEdit {
            edit_request_status,
            reviewed_by,
            reviewed_at,
            ..
        } => {
            changes.edit_request_status = Set((*edit_request_status).into());
            changes.edit_reviewed_by = Set(Some(*reviewed_by));
            changes.edit_reviewed_at = Set(Some((*reviewed_at).into()));
        }
        BatchTransition::RejectEdit {
            edit_request_status,
            reviewed_by,
            reviewed_at,
            reason,
        } => {
            changes.edit_request_status = Set((*edit_request_status).into());
            changes.edit_reviewed_by = Set(Some(*reviewed_by));
            changes.edit_reviewed_at = Set(Some((*reviewed_at).into()));
            changes.edit_rejection_reason = Set(Some(reason.clone()));
        }
    }
    changes
}

/// History details recorded for a transition.
fn transition_details(from: BatchState, transition: &BatchTransition) -> Value {
    let to = transition.new_status().unwrap_or(from.status);
    let mut details = json!({
        "from_status": from.status.as_str(),
        "to_status": to.as_str(),
    });
    let extra = match transition {
        BatchTransition::Reject { reason, .. }
        | BatchTransition::RequestEdit { reason, .. }
        | BatchTransition::RejectEdit { reason, .. } => Some(("reason", reason)),
        BatchTransition::Approve {
            comment: Some(comment),
            ..
        } => Some(("comment", comment)),
        _ => None,
    };
    if let (Some((key, value)), Some(map)) = (extra, details.as_object_mut()) {
        map.insert(key.to_string(), json!(value));
    }
    details
}

async fn load_company<C: ConnectionTrait>(
    conn: &C,
    company_id: Uuid,
) -> Result<companies::Model, OpeningBalanceError> {
    companies::Entity::find_by_id(company_id)
        .one(conn)
        .await
        .map_err(db_err)?
        .ok_or(OpeningBalanceError::CompanyNotFound(company_id))
}

async fn load_batch<C: ConnectionTrait>(
    conn: &C,
    company_id: Uuid,
    batch_id: i32,
) -> Result<opening_balance_batches::Model, OpeningBalanceError> {
    opening_balance_batches::Entity::find_by_id(batch_id)
        .filter(opening_balance_batches::Column::CompanyId.eq(company_id))
        .one(conn)
        .await
        .map_err(db_err)?
        .ok_or(OpeningBalanceError::BatchNotFound(batch_id))
}

async fn load_lines<C: ConnectionTrait>(
    conn: &C,
    batch_id: i32,
) -> Result<Vec<opening_balance_lines::Model>, OpeningBalanceError> {
    opening_balance_lines::Entity::find()
        .filter(opening_balance_lines::Column::BatchId.eq(batch_id))
        .order_by_asc(opening_balance_lines::Column::LineNo)
        .all(conn)
        .await
        .map_err(db_err)
}

/// Applies `changes` only if the batch is still in `expected` state.
async fn guarded_update<C: ConnectionTrait>(
    conn: &C,
    expected: BatchState,
    changes: opening_balance_batches::ActiveModel,
) -> Result<(), OpeningBalanceError> {
    let result = opening_balance_batches::Entity::update_many()
        .set(changes)
        .filter(opening_balance_batches::Column::Id.eq(expected.batch_id))
        .filter(
            opening_balance_batches::Column::Status.eq(db_enums::BatchStatus::from(expected.status)),
        )
        .filter(
            opening_balance_batches::Column::EditRequestStatus
                .eq(db_enums::EditRequestStatus::from(expected.edit_request_status)),
        )
        .exec(conn)
        .await
        .map_err(db_err)?;

    if result.rows_affected == 0 {
        warn!(batch_id = expected.batch_id, status = %expected.status, "Batch changed concurrently");
        return Err(OpeningBalanceError::ConcurrentModification(expected.batch_id));
    }
    Ok(())
}

async fn insert_lines<C: ConnectionTrait>(
    conn: &C,
    batch_id: i32,
    lines: &[ResolvedLine],
) -> Result<(), DbErr> {
    let models = lines.iter().map(|line| opening_balance_lines::ActiveModel {
        batch_id: Set(batch_id),
        line_no: Set(line.line_no),
        party_type: Set(line.party_type.into()),
        party_id: Set(line.party_id),
        currency_code: Set(line.currency_code.clone()),
        fx_rate_to_base: Set(line.fx_rate_to_base),
        debit_foreign: Set(line.debit_foreign),
        credit_foreign: Set(line.credit_foreign),
        debit_base: Set(line.debit_base),
        credit_base: Set(line.credit_base),
        notes: Set(line.notes.clone()),
        ..Default::default()
    });
    opening_balance_lines::Entity::insert_many(models)
        .exec(conn)
        .await?;
    Ok(())
}

async fn append_history<C: ConnectionTrait>(
    conn: &C,
    company_id: Uuid,
    batch_id: i32,
    user_id: Uuid,
    action: HistoryAction,
    details: Value,
) -> Result<(), OpeningBalanceError> {
    HistoryRepository::append(
        conn,
        NewHistoryEntry {
            company_id,
            module: HISTORY_MODULE,
            module_id: batch_id,
            user_id,
            action,
            details,
        },
    )
    .await
    .map_err(db_err)?;
    Ok(())
}

/// Validates input against the company's parties and stored rates.
async fn validate_input<C: ConnectionTrait>(
    conn: &C,
    company: &companies::Model,
    input: &BatchInput,
) -> Result<ValidatedBatch, OpeningBalanceError> {
    let base = company.base_currency.as_str();

    let mut rates = HashMap::new();
    if let Some(date) = input.opening_date {
        for currency in currencies_needing_rates(input, base) {
            let rate = ExchangeRateRepository::resolve_rate(conn, company.id, &currency, base, date)
                .await
                .map_err(db_err)?;
            if let Some(rate) = rate {
                rates.insert(currency, rate);
            }
        }
    }

    let keys: Vec<_> = input
        .lines
        .iter()
        .filter(|line| line.party_id > 0)
        .map(|line| (line.party_type, line.party_id))
        .collect();
    let parties = PartyRepository::existing(conn, company.id, &keys)
        .await
        .map_err(db_err)?;

    validate_batch(
        input,
        base,
        |party_type, party_id| parties.contains(&(party_type, party_id)),
        |currency, _| rates.get(currency).copied(),
    )
}

/// Opening balance batch repository.
#[derive(Debug, Clone)]
pub struct OpeningBalanceRepository {
    db: DatabaseConnection,
    config: OpeningBalanceConfig,
}

impl OpeningBalanceRepository {
    /// Creates a new repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, config: OpeningBalanceConfig) -> Self {
        Self { db, config }
    }

    /// Creates a draft batch.
    ///
    /// The batch number is allocated from the highest number already issued
    /// this year. Losing an allocation race retries the whole create.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, `CompanyNotFound`, or
    /// `BatchNumberExhausted` once every attempt has collided.
    pub async fn create(
        &self,
        company_id: Uuid,
        user_id: Uuid,
        input: &BatchInput,
    ) -> Result<CreatedBatch, OpeningBalanceError> {
        let company = load_company(&self.db, company_id).await?;
        let batch = validate_input(&self.db, &company, input).await?;

        for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
            match self.try_create(company_id, user_id, &batch).await {
                Ok(created) => {
                    info!(
                        company_id = %company_id,
                        batch_id = created.id,
                        batch_number = %created.batch_number,
                        lines = batch.totals.line_count,
                        "Opening balance batch created"
                    );
                    return Ok(created);
                }
                Err(AttemptError::NumberTaken(number)) => {
                    warn!(attempt, batch_number = %number, "Batch number taken, retrying");
                }
                Err(AttemptError::Failed(err)) => return Err(err),
            }
        }

        Err(OpeningBalanceError::BatchNumberExhausted(MAX_ALLOCATION_ATTEMPTS))
    }

    async fn try_create(
        &self,
        company_id: Uuid,
        user_id: Uuid,
        batch: &ValidatedBatch,
    ) -> Result<CreatedBatch, AttemptError> {
        let today = Utc::now().date_naive();
        let txn = self.db.begin().await.map_err(db_err)?;

        let issued: Vec<String> = opening_balance_batches::Entity::find()
            .select_only()
            .column(opening_balance_batches::Column::BatchNumber)
            .filter(
                opening_balance_batches::Column::BatchNumber
                    .starts_with(year_prefix(&self.config.batch_prefix, today)),
            )
            .into_tuple()
            .all(&txn)
            .await
            .map_err(db_err)?;
        let batch_number = next_batch_number(
            &self.config.batch_prefix,
            today,
            issued.iter().map(String::as_str),
        );

        let taken = opening_balance_batches::Entity::find()
            .filter(opening_balance_batches::Column::BatchNumber.eq(batch_number.as_str()))
            .count(&txn)
            .await
            .map_err(db_err)?;
        if taken > 0 {
            return Err(AttemptError::NumberTaken(batch_number));
        }

        let now: DateTimeWithTimeZone = Utc::now().into();
        let header = opening_balance_batches::ActiveModel {
            company_id: Set(company_id),
            batch_number: Set(batch_number.clone()),
            opening_date: Set(batch.opening_date),
            notes: Set(batch.notes.clone()),
            status: Set(db_enums::BatchStatus::Draft),
            edit_request_status: Set(db_enums::EditRequestStatus::NotRequested),
            total_debit_base: Set(batch.totals.total_debit_base),
            total_credit_base: Set(batch.totals.total_credit_base),
            line_count: Set(batch.totals.line_count),
            journal_id: Set(None),
            created_by: Set(user_id),
            created_at: Set(now),
            updated_by: Set(None),
            updated_at: Set(now),
            ..Default::default()
        };
        let header = match header.insert(&txn).await {
            Ok(header) => header,
            Err(e) if is_unique_violation(&e) => return Err(AttemptError::NumberTaken(batch_number)),
            Err(e) => return Err(db_err(e).into()),
        };

        insert_lines(&txn, header.id, &batch.lines)
            .await
            .map_err(db_err)?;

        append_history(
            &txn,
            company_id,
            header.id,
            user_id,
            HistoryAction::Created,
            json!({
                "batch_number": batch_number,
                "line_count": batch.totals.line_count,
                "total_debit_base": batch.totals.total_debit_base,
                "total_credit_base": batch.totals.total_credit_base,
            }),
        )
        .await?;

        txn.commit().await.map_err(db_err)?;

        Ok(CreatedBatch {
            id: header.id,
            batch_number,
        })
    }

    /// Replaces header and lines. The batch returns to Draft.
    ///
    /// # Errors
    ///
    /// Returns `BatchNotFound` or `InvalidTransition` (both `NOT_FOUND`) if
    /// the batch is missing or not editable, or a validation error.
    pub async fn update(
        &self,
        company_id: Uuid,
        batch_id: i32,
        user_id: Uuid,
        input: &BatchInput,
    ) -> Result<opening_balance_batches::Model, OpeningBalanceError> {
        let batch = load_batch(&self.db, company_id, batch_id).await?;
        let state = state_of(&batch);
        let transition = BatchWorkflow::update(state)?;

        let company = load_company(&self.db, company_id).await?;
        let validated = validate_input(&self.db, &company, input).await?;

        let mut changes = transition_changes(&transition, user_id);
        changes.opening_date = Set(validated.opening_date);
        changes.notes = Set(validated.notes.clone());
        changes.total_debit_base = Set(validated.totals.total_debit_base);
        changes.total_credit_base = Set(validated.totals.total_credit_base);
        changes.line_count = Set(validated.totals.line_count);

        let txn = self.db.begin().await.map_err(db_err)?;
        guarded_update(&txn, state, changes).await?;

        opening_balance_lines::Entity::delete_many()
            .filter(opening_balance_lines::Column::BatchId.eq(batch_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        insert_lines(&txn, batch_id, &validated.lines)
            .await
            .map_err(db_err)?;

        let after = BatchSnapshot::new(
            validated.opening_date,
            validated.notes.clone(),
            BatchStatus::Draft,
            validated.totals.line_count,
            validated.totals.total_debit_base,
            validated.totals.total_credit_base,
        );
        let changed = diff_fields(&snapshot_of(&batch), &after, BatchSnapshot::DIFF_FIELDS);
        append_history(
            &txn,
            company_id,
            batch_id,
            user_id,
            transition.history_action(),
            json!({ "changes": changed }),
        )
        .await?;

        txn.commit().await.map_err(db_err)?;
        info!(batch_id, fields_changed = changed.len(), "Opening balance batch updated");

        load_batch(&self.db, company_id, batch_id).await
    }

    /// Loads the batch, decides the transition and applies it with its
    /// history entry in one transaction.
    async fn run_transition<F>(
        &self,
        company_id: Uuid,
        batch_id: i32,
        user_id: Uuid,
        decide: F,
    ) -> Result<opening_balance_batches::Model, OpeningBalanceError>
    where
        F: FnOnce(BatchState) -> Result<BatchTransition, OpeningBalanceError>,
    {
        let txn = self.db.begin().await.map_err(db_err)?;
        let batch = load_batch(&txn, company_id, batch_id).await?;
        let state = state_of(&batch);
        let transition = decide(state)?;

        guarded_update(&txn, state, transition_changes(&transition, user_id)).await?;
        append_history(
            &txn,
            company_id,
            batch_id,
            user_id,
            transition.history_action(),
            transition_details(state, &transition),
        )
        .await?;
        txn.commit().await.map_err(db_err)?;

        info!(
            batch_id,
            action = %transition.history_action(),
            user_id = %user_id,
            "Opening balance batch transition applied"
        );
        load_batch(&self.db, company_id, batch_id).await
    }

    /// Submits a draft for approval.
    ///
    /// # Errors
    ///
    /// Returns a `NOT_FOUND` error unless the batch exists and is Draft.
    pub async fn submit(
        &self,
        company_id: Uuid,
        batch_id: i32,
        user_id: Uuid,
    ) -> Result<opening_balance_batches::Model, OpeningBalanceError> {
        self.run_transition(company_id, batch_id, user_id, |state| {
            BatchWorkflow::submit(state, user_id)
        })
        .await
    }

    /// Rejects a submitted batch.
    ///
    /// # Errors
    ///
    /// Returns `ReasonRequired` for a blank reason, or a `NOT_FOUND` error
    /// unless the batch is Submitted.
    pub async fn reject(
        &self,
        company_id: Uuid,
        batch_id: i32,
        user_id: Uuid,
        reason: Option<&str>,
    ) -> Result<opening_balance_batches::Model, OpeningBalanceError> {
        self.run_transition(company_id, batch_id, user_id, |state| {
            BatchWorkflow::reject(state, user_id, reason)
        })
        .await
    }

    /// Requests permission to edit an approved batch.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the reason is blank, the batch is not
    /// Approved, or a request is already pending.
    pub async fn request_edit(
        &self,
        company_id: Uuid,
        batch_id: i32,
        user_id: Uuid,
        reason: Option<&str>,
    ) -> Result<opening_balance_batches::Model, OpeningBalanceError> {
        self.run_transition(company_id, batch_id, user_id, |state| {
            BatchWorkflow::request_edit(state, user_id, reason)
        })
        .await
    }

    /// Grants or refuses a pending edit request.
    ///
    /// # Errors
    ///
    /// Returns `NoPendingEditRequest`, or `ReasonRequired` when refusing
    /// without a reason.
    pub async fn decide_edit_request(
        &self,
        company_id: Uuid,
        batch_id: i32,
        user_id: Uuid,
        decision: EditDecision,
        reason: Option<&str>,
    ) -> Result<opening_balance_batches::Model, OpeningBalanceError> {
        self.run_transition(company_id, batch_id, user_id, |state| {
            BatchWorkflow::decide_edit(state, user_id, decision, reason)
        })
        .await
    }

    /// Approves a submitted batch and posts its journal.
    ///
    /// A journal posted by an earlier approval is superseded, not deleted.
    ///
    /// # Errors
    ///
    /// Returns a `NOT_FOUND` error unless the batch is Submitted,
    /// `MissingControlAccount` if AR, AP or Owner's Equity cannot be
    /// resolved, `NothingToPost` when every line nets to zero, or
    /// `ConcurrentModification` if another request got there first.
    pub async fn approve(
        &self,
        company_id: Uuid,
        batch_id: i32,
        user_id: Uuid,
        comment: Option<&str>,
    ) -> Result<ApprovedBatch, OpeningBalanceError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let batch = load_batch(&txn, company_id, batch_id).await?;
        let state = state_of(&batch);
        let transition = BatchWorkflow::approve(state, user_id, comment)?;

        let company = load_company(&txn, company_id).await?;
        let accounts =
            LedgerAccessor::resolve_control_accounts(&txn, company_id, &self.config).await?;
        let lines: Vec<ResolvedLine> = load_lines(&txn, batch_id)
            .await?
            .iter()
            .map(resolved_line)
            .collect();
        let draft = PostingEngine::build_journal(&batch.batch_number, &lines, &accounts)?;

        guarded_update(&txn, state, transition_changes(&transition, user_id)).await?;

        let journal = JournalRepository::insert(
            &txn,
            NewJournal {
                company_id,
                source_type: OPENING_BALANCE_SOURCE,
                source_id: batch_id,
                journal_date: batch.opening_date,
                currency_code: &company.base_currency,
                created_by: user_id,
            },
            &draft,
        )
        .await
        .map_err(db_err)?;

        let superseded_journal_id = match batch.journal_id {
            Some(previous) if previous != journal.id => {
                JournalRepository::supersede(&txn, previous, journal.id)
                    .await
                    .map_err(db_err)?;
                Some(previous)
            }
            _ => None,
        };

        opening_balance_batches::Entity::update_many()
            .col_expr(opening_balance_batches::Column::JournalId, Expr::value(journal.id))
            .filter(opening_balance_batches::Column::Id.eq(batch_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        let mut details = transition_details(state, &transition);
        if let Some(map) = details.as_object_mut() {
            map.insert("journal_id".to_string(), json!(journal.id));
            map.insert("superseded_journal_id".to_string(), json!(superseded_journal_id));
        }
        append_history(
            &txn,
            company_id,
            batch_id,
            user_id,
            HistoryAction::Approved,
            details,
        )
        .await?;

        txn.commit().await.map_err(db_err)?;
        info!(
            batch_id,
            journal_id = journal.id,
            superseded_journal_id = ?superseded_journal_id,
            total = %draft.total_debit(),
            "Opening balance batch approved and posted"
        );

        Ok(ApprovedBatch {
            batch: load_batch(&self.db, company_id, batch_id).await?,
            journal_id: journal.id,
            superseded_journal_id,
        })
    }

    /// Deletes a draft batch and its lines. Its history is kept.
    ///
    /// # Errors
    ///
    /// Returns a `NOT_FOUND` error unless the batch exists and is Draft.
    pub async fn cancel(
        &self,
        company_id: Uuid,
        batch_id: i32,
        user_id: Uuid,
    ) -> Result<(), OpeningBalanceError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let batch = load_batch(&txn, company_id, batch_id).await?;
        let state = state_of(&batch);
        let transition = BatchWorkflow::cancel(state)?;

        opening_balance_lines::Entity::delete_many()
            .filter(opening_balance_lines::Column::BatchId.eq(batch_id))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        let deleted = opening_balance_batches::Entity::delete_many()
            .filter(opening_balance_batches::Column::Id.eq(batch_id))
            .filter(
                opening_balance_batches::Column::Status.eq(db_enums::BatchStatus::from(state.status)),
            )
            .filter(opening_balance_batches::Column::JournalId.is_null())
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if deleted.rows_affected == 0 {
            return Err(OpeningBalanceError::ConcurrentModification(batch_id));
        }

        append_history(
            &txn,
            company_id,
            batch_id,
            user_id,
            transition.history_action(),
            json!({ "batch_number": batch.batch_number }),
        )
        .await?;
        txn.commit().await.map_err(db_err)?;

        info!(batch_id, batch_number = %batch.batch_number, "Opening balance batch cancelled");
        Ok(())
    }

    /// Lists batches, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        company_id: Uuid,
        filter: BatchFilter,
        page: PageRequest,
    ) -> Result<PageResponse<opening_balance_batches::Model>, OpeningBalanceError> {
        let page = page.normalized();

        let mut query = opening_balance_batches::Entity::find()
            .filter(opening_balance_batches::Column::CompanyId.eq(company_id));
        if let Some(status) = filter.status {
            query = query.filter(
                opening_balance_batches::Column::Status.eq(db_enums::BatchStatus::from(status)),
            );
        }

        let total = query.clone().count(&self.db).await.map_err(db_err)?;
        let batches = query
            .order_by_desc(opening_balance_batches::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(PageResponse::new(batches, page.page, page.per_page, total))
    }

    /// Batch header with ordered lines.
    ///
    /// # Errors
    ///
    /// Returns `BatchNotFound` if the batch does not belong to the company.
    pub async fn get(
        &self,
        company_id: Uuid,
        batch_id: i32,
    ) -> Result<BatchDetail, OpeningBalanceError> {
        let batch = load_batch(&self.db, company_id, batch_id).await?;
        let lines = load_lines(&self.db, batch_id).await?;
        Ok(BatchDetail { batch, lines })
    }

    /// History entries for a batch, oldest first.
    ///
    /// Entries outlive a cancelled batch.
    ///
    /// # Errors
    ///
    /// Returns `BatchNotFound` if there is neither a batch nor any history.
    pub async fn history(
        &self,
        company_id: Uuid,
        batch_id: i32,
    ) -> Result<Vec<history_logs::Model>, OpeningBalanceError> {
        let entries = HistoryRepository::new(self.db.clone())
            .list(company_id, HISTORY_MODULE, batch_id)
            .await
            .map_err(db_err)?;
        if entries.is_empty() {
            load_batch(&self.db, company_id, batch_id).await?;
        }
        Ok(entries)
    }

    /// Journals posted for a batch, active first.
    ///
    /// # Errors
    ///
    /// Returns `BatchNotFound` if the batch does not belong to the company.
    pub async fn journal_entries(
        &self,
        company_id: Uuid,
        batch_id: i32,
        include_superseded: bool,
    ) -> Result<Vec<JournalWithLines>, OpeningBalanceError> {
        load_batch(&self.db, company_id, batch_id).await?;
        JournalRepository::for_source(
            &self.db,
            company_id,
            OPENING_BALANCE_SOURCE,
            batch_id,
            include_superseded,
        )
        .await
        .map_err(db_err)
    }
}
