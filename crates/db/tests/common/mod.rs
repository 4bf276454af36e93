//! Shared fixtures: an in-memory `SQLite` database migrated to the current
//! schema and seeded with one company, its control accounts and two parties.

#![allow(dead_code)]

use chrono::NaiveDate;
use ledgerline_core::opening_balance::{BatchInput, BatchLineInput, PartyType};
use ledgerline_db::entities::chart_of_accounts;
use ledgerline_db::migration::{Migrator, MigratorTrait};
use ledgerline_db::repositories::{CompanyRepository, OpeningBalanceRepository, PartyRepository};
use ledgerline_shared::OpeningBalanceConfig;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use uuid::Uuid;

pub const BASE_CURRENCY: &str = "AED";

pub struct Fixture {
    pub db: DatabaseConnection,
    pub repo: OpeningBalanceRepository,
    pub company_id: Uuid,
    pub user_id: Uuid,
    pub approver_id: Uuid,
    pub customer_id: i32,
    pub supplier_id: i32,
    pub receivable: i32,
    pub payable: i32,
    pub equity: Option<i32>,
}

/// A single-connection pool; every connection to `sqlite::memory:` is its
/// own database.
pub async fn test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .expect("Failed to open sqlite database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn create_account(
    db: &DatabaseConnection,
    company_id: Uuid,
    code: &str,
    name: &str,
    subtype: Option<&str>,
) -> i32 {
    chart_of_accounts::ActiveModel {
        company_id: Set(company_id),
        code: Set(code.to_string()),
        name: Set(name.to_string()),
        account_subtype: Set(subtype.map(ToString::to_string)),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("Failed to create account")
    .id
}

/// Company with AR, AP and (optionally) Owner's Equity accounts.
pub async fn setup_with(with_equity: bool) -> Fixture {
    let db = test_db().await;
    let company_id = Uuid::new_v4();
    CompanyRepository::new(db.clone())
        .create(company_id, "Fixture Trading LLC", BASE_CURRENCY)
        .await
        .expect("Failed to create company");

    let receivable = create_account(
        &db,
        company_id,
        "1200",
        "Accounts Receivable",
        Some("accounts_receivable"),
    )
    .await;
    let payable = create_account(
        &db,
        company_id,
        "2100",
        "Accounts Payable",
        Some("accounts_payable"),
    )
    .await;
    let equity = if with_equity {
        Some(create_account(&db, company_id, "3000", "Owner's Equity", Some("owner_equity")).await)
    } else {
        None
    };
    create_account(&db, company_id, "1000", "Cash", Some("cash")).await;

    let parties = PartyRepository::new(db.clone());
    let customer_id = parties
        .create(company_id, PartyType::Customer, "Acme Stores")
        .await
        .expect("Failed to create customer")
        .id;
    let supplier_id = parties
        .create(company_id, PartyType::Supplier, "Gulf Supplies")
        .await
        .expect("Failed to create supplier")
        .id;

    Fixture {
        repo: OpeningBalanceRepository::new(db.clone(), OpeningBalanceConfig::default()),
        db,
        company_id,
        user_id: Uuid::new_v4(),
        approver_id: Uuid::new_v4(),
        customer_id,
        supplier_id,
        receivable,
        payable,
        equity,
    }
}

pub async fn setup() -> Fixture {
    setup_with(true).await
}

pub fn opening_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).expect("valid date")
}

pub fn line(party_type: PartyType, party_id: i32, debit: Decimal, credit: Decimal) -> BatchLineInput {
    BatchLineInput {
        party_type,
        party_id,
        currency_code: None,
        fx_rate_to_base: None,
        debit_foreign: debit,
        credit_foreign: credit,
        notes: None,
    }
}

pub fn batch(lines: Vec<BatchLineInput>) -> BatchInput {
    BatchInput {
        opening_date: Some(opening_date()),
        notes: Some("Go-live balances".to_string()),
        lines,
    }
}

impl Fixture {
    /// Creates and submits a batch, returning its id.
    pub async fn submitted(&self, input: &BatchInput) -> i32 {
        let created = self
            .repo
            .create(self.company_id, self.user_id, input)
            .await
            .expect("Failed to create batch");
        self.repo
            .submit(self.company_id, created.id, self.user_id)
            .await
            .expect("Failed to submit batch");
        created.id
    }

    /// Creates, submits and approves a batch, returning its id and journal id.
    pub async fn approved(&self, input: &BatchInput) -> (i32, i32) {
        let id = self.submitted(input).await;
        let approved = self
            .repo
            .approve(self.company_id, id, self.approver_id, None)
            .await
            .expect("Failed to approve batch");
        (id, approved.journal_id)
    }
}
