//! Integration tests for batch creation, editing, cancellation and reads.

mod common;

use chrono::{NaiveDate, Utc};
use common::{batch, line, setup};
use ledgerline_core::opening_balance::numbering::{
    MAX_ALLOCATION_ATTEMPTS, format_batch_number, parse_sequence, year_prefix,
};
use ledgerline_core::opening_balance::{BatchStatus, OpeningBalanceError, PartyType};
use ledgerline_db::entities::{opening_balance_batches, sea_orm_active_enums as db_enums};
use sea_orm::{ActiveModelTrait, Set};
use ledgerline_db::repositories::{BatchFilter, CreateExchangeRateInput, ExchangeRateRepository};
use ledgerline_shared::types::PageRequest;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_create_and_get_round_trip() {
    let fx = setup().await;
    let input = batch(vec![
        line(PartyType::Customer, fx.customer_id, dec!(100), dec!(0)),
        line(PartyType::Supplier, fx.supplier_id, dec!(0), dec!(50)),
    ]);

    let created = fx
        .repo
        .create(fx.company_id, fx.user_id, &input)
        .await
        .unwrap();
    let detail = fx.repo.get(fx.company_id, created.id).await.unwrap();

    assert_eq!(detail.batch.batch_number, created.batch_number);
    assert_eq!(detail.batch.status, db_enums::BatchStatus::Draft);
    assert_eq!(
        detail.batch.edit_request_status,
        db_enums::EditRequestStatus::NotRequested
    );
    assert_eq!(detail.batch.opening_date, common::opening_date());
    assert_eq!(detail.batch.notes.as_deref(), Some("Go-live balances"));
    assert_eq!(detail.batch.line_count, 2);
    assert_eq!(detail.batch.total_debit_base, dec!(100));
    assert_eq!(detail.batch.total_credit_base, dec!(50));
    assert_eq!(detail.batch.journal_id, None);

    assert_eq!(detail.lines.len(), 2);
    assert_eq!(detail.lines[0].line_no, 1);
    assert_eq!(detail.lines[0].party_type, db_enums::PartyType::Customer);
    assert_eq!(detail.lines[0].currency_code, "AED");
    assert_eq!(detail.lines[0].fx_rate_to_base, dec!(1));
    assert_eq!(detail.lines[0].debit_base, dec!(100));
    assert_eq!(detail.lines[1].line_no, 2);
    assert_eq!(detail.lines[1].party_id, fx.supplier_id);
    assert_eq!(detail.lines[1].credit_base, dec!(50));

    let history = fx.repo.history(fx.company_id, created.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, "CREATED");
    assert_eq!(history[0].user_id, fx.user_id);
    assert_eq!(history[0].details["batch_number"], created.batch_number);
    assert_eq!(history[0].details["line_count"], 2);
}

#[tokio::test]
async fn test_batch_numbers_are_unique_and_sequential() {
    let fx = setup().await;
    let input = batch(vec![line(
        PartyType::Customer,
        fx.customer_id,
        dec!(10),
        dec!(0),
    )]);

    let first = fx.repo.create(fx.company_id, fx.user_id, &input).await.unwrap();
    let second = fx.repo.create(fx.company_id, fx.user_id, &input).await.unwrap();
    let third = fx.repo.create(fx.company_id, fx.user_id, &input).await.unwrap();

    let today = Utc::now().date_naive();
    assert!(first.batch_number.starts_with(&year_prefix("OB", today)));
    assert_eq!(first.batch_number.len(), "OB-26-010001".len());

    let sequences: Vec<u32> = [&first, &second, &third]
        .iter()
        .map(|b| parse_sequence("OB", today, &b.batch_number).unwrap())
        .collect();
    assert_eq!(sequences, vec![1, 2, 3]);
    assert_ne!(first.batch_number, second.batch_number);
}

#[tokio::test]
async fn test_taken_number_is_retried_until_exhausted() {
    let fx = setup().await;
    let existing = fx
        .repo
        .create(
            fx.company_id,
            fx.user_id,
            &batch(vec![line(PartyType::Customer, fx.customer_id, dec!(1), dec!(0))]),
        )
        .await
        .unwrap();
    // Park the highest possible sequence so every allocation lands on it.
    let prefix = ledgerline_shared::OpeningBalanceConfig::default().batch_prefix;
    let last = format_batch_number(&prefix, Utc::now().date_naive(), u32::MAX);
    opening_balance_batches::ActiveModel {
        id: Set(existing.id),
        batch_number: Set(last),
        ..Default::default()
    }
    .update(&fx.db)
    .await
    .unwrap();

    let err = fx
        .repo
        .create(
            fx.company_id,
            fx.user_id,
            &batch(vec![line(PartyType::Customer, fx.customer_id, dec!(2), dec!(0))]),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OpeningBalanceError::BatchNumberExhausted(attempts) if attempts == MAX_ALLOCATION_ATTEMPTS
    ));
    assert_eq!(err.status_code(), 500);

    let page = fx
        .repo
        .list(fx.company_id, BatchFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.meta.total, 1);
}

#[tokio::test]
async fn test_zero_amount_line_rejected() {
    let fx = setup().await;
    let input = batch(vec![line(
        PartyType::Customer,
        fx.customer_id,
        dec!(0),
        dec!(0),
    )]);

    let err = fx
        .repo
        .create(fx.company_id, fx.user_id, &input)
        .await
        .unwrap_err();
    assert!(matches!(err, OpeningBalanceError::InvalidLine { line: 1, .. }));
    assert_eq!(err.error_code(), "VALIDATION_ERROR");

    let page = fx
        .repo
        .list(fx.company_id, BatchFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.meta.total, 0);
}

#[tokio::test]
async fn test_unknown_party_rejected() {
    let fx = setup().await;
    let input = batch(vec![
        line(PartyType::Customer, fx.customer_id, dec!(10), dec!(0)),
        // The supplier id exists, but not as a customer.
        line(PartyType::Customer, fx.supplier_id, dec!(10), dec!(0)),
    ]);

    let err = fx
        .repo
        .create(fx.company_id, fx.user_id, &input)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OpeningBalanceError::UnknownParty { party_type: PartyType::Customer, party_id }
            if party_id == fx.supplier_id
    ));
}

#[tokio::test]
async fn test_duplicate_party_rejected() {
    let fx = setup().await;
    let input = batch(vec![
        line(PartyType::Customer, fx.customer_id, dec!(10), dec!(0)),
        line(PartyType::Customer, fx.customer_id, dec!(0), dec!(5)),
    ]);

    let err = fx
        .repo
        .create(fx.company_id, fx.user_id, &input)
        .await
        .unwrap_err();
    assert!(matches!(err, OpeningBalanceError::DuplicateParty { .. }));
}

#[tokio::test]
async fn test_foreign_currency_with_supplied_rate() {
    let fx = setup().await;
    let mut usd = line(PartyType::Customer, fx.customer_id, dec!(100), dec!(0));
    usd.currency_code = Some("usd".to_string());
    usd.fx_rate_to_base = Some(dec!(4));

    let created = fx
        .repo
        .create(fx.company_id, fx.user_id, &batch(vec![usd]))
        .await
        .unwrap();
    let detail = fx.repo.get(fx.company_id, created.id).await.unwrap();

    assert_eq!(detail.lines[0].currency_code, "USD");
    assert_eq!(detail.lines[0].fx_rate_to_base, dec!(4));
    assert_eq!(detail.lines[0].debit_foreign, dec!(100));
    assert_eq!(detail.lines[0].debit_base, dec!(400));
    assert_eq!(detail.batch.total_debit_base, dec!(400));
}

#[tokio::test]
async fn test_foreign_currency_rate_looked_up() {
    let fx = setup().await;
    ExchangeRateRepository::new(fx.db.clone())
        .create_or_update_rate(CreateExchangeRateInput {
            company_id: fx.company_id,
            from_currency: "EUR".to_string(),
            to_currency: "AED".to_string(),
            rate: dec!(2.5),
            effective_date: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
        })
        .await
        .unwrap();

    let mut eur = line(PartyType::Supplier, fx.supplier_id, dec!(0), dec!(10));
    eur.currency_code = Some("EUR".to_string());

    let created = fx
        .repo
        .create(fx.company_id, fx.user_id, &batch(vec![eur]))
        .await
        .unwrap();
    let detail = fx.repo.get(fx.company_id, created.id).await.unwrap();

    assert_eq!(detail.lines[0].fx_rate_to_base, dec!(2.5));
    assert_eq!(detail.lines[0].credit_base, dec!(25));
}

#[tokio::test]
async fn test_inverse_rate_is_used_when_direct_missing() {
    let fx = setup().await;
    ExchangeRateRepository::new(fx.db.clone())
        .create_or_update_rate(CreateExchangeRateInput {
            company_id: fx.company_id,
            from_currency: "AED".to_string(),
            to_currency: "GBP".to_string(),
            rate: dec!(0.2),
            effective_date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
        })
        .await
        .unwrap();

    let mut gbp = line(PartyType::Customer, fx.customer_id, dec!(3), dec!(0));
    gbp.currency_code = Some("GBP".to_string());

    let created = fx
        .repo
        .create(fx.company_id, fx.user_id, &batch(vec![gbp]))
        .await
        .unwrap();
    let detail = fx.repo.get(fx.company_id, created.id).await.unwrap();

    assert_eq!(detail.lines[0].fx_rate_to_base, dec!(5));
    assert_eq!(detail.lines[0].debit_base, dec!(15));
}

#[tokio::test]
async fn test_oversized_amount_is_rejected_before_insert() {
    let fx = setup().await;
    let mut usd = line(PartyType::Customer, fx.customer_id, rust_decimal::Decimal::MAX, dec!(0));
    usd.currency_code = Some("USD".to_string());
    usd.fx_rate_to_base = Some(dec!(3.6725));

    let err = fx
        .repo
        .create(fx.company_id, fx.user_id, &batch(vec![usd]))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_ERROR");

    let page = fx
        .repo
        .list(fx.company_id, BatchFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(page.meta.total, 0);
}

#[tokio::test]
async fn test_missing_rate_is_validation_error() {
    let fx = setup().await;
    let mut gbp = line(PartyType::Customer, fx.customer_id, dec!(10), dec!(0));
    gbp.currency_code = Some("GBP".to_string());

    let err = fx
        .repo
        .create(fx.company_id, fx.user_id, &batch(vec![gbp]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OpeningBalanceError::ExchangeRateUnavailable { ref currency, ref base, .. }
            if currency == "GBP" && base == "AED"
    ));
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_update_replaces_lines_and_records_diff() {
    let fx = setup().await;
    let created = fx
        .repo
        .create(
            fx.company_id,
            fx.user_id,
            &batch(vec![line(
                PartyType::Customer,
                fx.customer_id,
                dec!(100),
                dec!(0),
            )]),
        )
        .await
        .unwrap();

    let mut replacement = batch(vec![
        line(PartyType::Customer, fx.customer_id, dec!(100), dec!(0)),
        line(PartyType::Supplier, fx.supplier_id, dec!(0), dec!(30)),
    ]);
    replacement.notes = Some("Corrected".to_string());
    let editor = uuid::Uuid::new_v4();

    let updated = fx
        .repo
        .update(fx.company_id, created.id, editor, &replacement)
        .await
        .unwrap();
    assert_eq!(updated.status, db_enums::BatchStatus::Draft);
    assert_eq!(updated.line_count, 2);
    assert_eq!(updated.updated_by, Some(editor));

    let detail = fx.repo.get(fx.company_id, created.id).await.unwrap();
    assert_eq!(detail.lines.len(), 2);
    assert_eq!(detail.lines[1].party_type, db_enums::PartyType::Supplier);

    let history = fx.repo.history(fx.company_id, created.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].action, "UPDATED");
    let changed: Vec<&str> = history[1].details["changes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["field"].as_str().unwrap())
        .collect();
    assert_eq!(changed, vec!["notes", "line_count", "total_credit_base"]);
}

#[tokio::test]
async fn test_update_submitted_batch_returns_to_draft() {
    let fx = setup().await;
    let input = batch(vec![line(
        PartyType::Customer,
        fx.customer_id,
        dec!(100),
        dec!(0),
    )]);
    let id = fx.submitted(&input).await;

    let updated = fx
        .repo
        .update(fx.company_id, id, fx.user_id, &input)
        .await
        .unwrap();
    assert_eq!(updated.status, db_enums::BatchStatus::Draft);

    let history = fx.repo.history(fx.company_id, id).await.unwrap();
    let last = history.last().unwrap();
    assert_eq!(last.details["changes"][0]["field"], "status");
    assert_eq!(last.details["changes"][0]["old"], "submitted");
    assert_eq!(last.details["changes"][0]["new"], "draft");
}

#[tokio::test]
async fn test_update_approved_batch_not_found() {
    let fx = setup().await;
    let input = batch(vec![line(
        PartyType::Customer,
        fx.customer_id,
        dec!(100),
        dec!(0),
    )]);
    let (id, _) = fx.approved(&input).await;

    let err = fx
        .repo
        .update(fx.company_id, id, fx.user_id, &input)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_cancel_draft_keeps_history() {
    let fx = setup().await;
    let created = fx
        .repo
        .create(
            fx.company_id,
            fx.user_id,
            &batch(vec![line(
                PartyType::Customer,
                fx.customer_id,
                dec!(100),
                dec!(0),
            )]),
        )
        .await
        .unwrap();

    fx.repo
        .cancel(fx.company_id, created.id, fx.user_id)
        .await
        .unwrap();

    let err = fx.repo.get(fx.company_id, created.id).await.unwrap_err();
    assert!(matches!(err, OpeningBalanceError::BatchNotFound(id) if id == created.id));

    let history = fx.repo.history(fx.company_id, created.id).await.unwrap();
    let actions: Vec<&str> = history.iter().map(|h| h.action.as_str()).collect();
    assert_eq!(actions, vec!["CREATED", "CANCELLED"]);
}

#[tokio::test]
async fn test_cancel_requires_draft() {
    let fx = setup().await;
    let id = fx
        .submitted(&batch(vec![line(
            PartyType::Customer,
            fx.customer_id,
            dec!(100),
            dec!(0),
        )]))
        .await;

    let err = fx
        .repo
        .cancel(fx.company_id, id, fx.user_id)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);

    let detail = fx.repo.get(fx.company_id, id).await.unwrap();
    assert_eq!(detail.batch.status, db_enums::BatchStatus::Submitted);
    assert_eq!(detail.lines.len(), 1);
}

#[tokio::test]
async fn test_list_paginates_newest_first() {
    let fx = setup().await;
    let input = batch(vec![line(
        PartyType::Customer,
        fx.customer_id,
        dec!(10),
        dec!(0),
    )]);
    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(fx.repo.create(fx.company_id, fx.user_id, &input).await.unwrap().id);
    }
    fx.repo.submit(fx.company_id, ids[0], fx.user_id).await.unwrap();

    let first = fx
        .repo
        .list(
            fx.company_id,
            BatchFilter::default(),
            PageRequest { page: 1, per_page: 2 },
        )
        .await
        .unwrap();
    assert_eq!(first.meta.total, 3);
    assert_eq!(first.meta.total_pages, 2);
    let first_ids: Vec<i32> = first.data.iter().map(|b| b.id).collect();
    assert_eq!(first_ids, vec![ids[2], ids[1]]);

    let second = fx
        .repo
        .list(
            fx.company_id,
            BatchFilter::default(),
            PageRequest { page: 2, per_page: 2 },
        )
        .await
        .unwrap();
    assert_eq!(second.data.len(), 1);
    assert_eq!(second.data[0].id, ids[0]);

    let submitted = fx
        .repo
        .list(
            fx.company_id,
            BatchFilter {
                status: Some(BatchStatus::Submitted),
            },
            PageRequest::default(),
        )
        .await
        .unwrap();
    assert_eq!(submitted.meta.total, 1);
    assert_eq!(submitted.data[0].id, ids[0]);
}

#[tokio::test]
async fn test_other_company_cannot_read_batch() {
    let fx = setup().await;
    let created = fx
        .repo
        .create(
            fx.company_id,
            fx.user_id,
            &batch(vec![line(
                PartyType::Customer,
                fx.customer_id,
                dec!(10),
                dec!(0),
            )]),
        )
        .await
        .unwrap();

    let stranger = uuid::Uuid::new_v4();
    assert!(matches!(
        fx.repo.get(stranger, created.id).await,
        Err(OpeningBalanceError::BatchNotFound(_))
    ));
    assert!(matches!(
        fx.repo.history(stranger, created.id).await,
        Err(OpeningBalanceError::BatchNotFound(_))
    ));
}

#[tokio::test]
async fn test_inactive_party_is_unknown() {
    use ledgerline_db::entities::parties;
    use ledgerline_db::repositories::PartyRepository;
    use sea_orm::{ActiveModelTrait, Set};

    let fx = setup().await;
    let parties_repo = PartyRepository::new(fx.db.clone());

    assert!(
        parties_repo
            .exists(fx.company_id, PartyType::Customer, fx.customer_id)
            .await
            .unwrap()
    );
    assert!(
        !parties_repo
            .exists(fx.company_id, PartyType::Supplier, fx.customer_id)
            .await
            .unwrap()
    );
    assert!(
        !parties_repo
            .exists(uuid::Uuid::new_v4(), PartyType::Customer, fx.customer_id)
            .await
            .unwrap()
    );

    parties::ActiveModel {
        id: Set(fx.customer_id),
        is_active: Set(false),
        ..Default::default()
    }
    .update(&fx.db)
    .await
    .unwrap();

    assert!(
        !parties_repo
            .exists(fx.company_id, PartyType::Customer, fx.customer_id)
            .await
            .unwrap()
    );
    let err = fx
        .repo
        .create(
            fx.company_id,
            fx.user_id,
            &batch(vec![line(PartyType::Customer, fx.customer_id, dec!(10), dec!(0))]),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, OpeningBalanceError::UnknownParty { .. }));
}
