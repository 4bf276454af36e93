//! Database seeder for Ledgerline development and testing.
//!
//! Seeds a demo company with the control accounts posting needs, a few
//! customers and suppliers, and exchange rates into the base currency.
//! Running it twice leaves the data unchanged.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Duration, Utc};
use ledgerline_core::opening_balance::PartyType;
use ledgerline_db::entities::{chart_of_accounts, parties};
use ledgerline_db::repositories::{
    CompanyRepository, CreateExchangeRateInput, ExchangeRateRepository, PartyRepository,
};
use ledgerline_shared::{JwtConfig, JwtService};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

/// Demo company ID (consistent for all seeds)
const DEMO_COMPANY_ID: Uuid = Uuid::from_u128(1);
/// Demo user ID used for the printed token
const DEMO_USER_ID: Uuid = Uuid::from_u128(2);
const BASE_CURRENCY: &str = "AED";

const ACCOUNTS: [(&str, &str, Option<&str>); 5] = [
    ("1000", "Cash at Bank", Some("cash")),
    ("1200", "Accounts Receivable", Some("accounts_receivable")),
    ("2100", "Accounts Payable", Some("accounts_payable")),
    ("3000", "Owner's Equity", Some("owner_equity")),
    ("4000", "Sales", None),
];

const PARTIES: [(PartyType, &str); 4] = [
    (PartyType::Customer, "Al Noor Trading"),
    (PartyType::Customer, "Desert Rose Retail"),
    (PartyType::Supplier, "Gulf Packaging Supplies"),
    (PartyType::Supplier, "Emirates Freight Co"),
];

/// (currency, rate to AED in ten-thousandths)
const RATES: [(&str, i64); 3] = [("USD", 36_725), ("EUR", 39_850), ("GBP", 46_420)];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .or_else(|_| std::env::var("LEDGERLINE__DATABASE__URL"))
        .context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = ledgerline_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    println!("Seeding demo company...");
    seed_company(&db).await?;

    println!("Seeding chart of accounts...");
    seed_accounts(&db).await?;

    println!("Seeding parties...");
    seed_parties(&db).await?;

    println!("Seeding exchange rates...");
    seed_exchange_rates(&db).await?;

    if let Ok(secret) = std::env::var("LEDGERLINE__JWT__SECRET") {
        let jwt = JwtService::new(JwtConfig {
            secret,
            access_token_expires_minutes: 24 * 60,
        });
        let token = jwt.generate_access_token(DEMO_USER_ID, DEMO_COMPANY_ID, "accountant")?;
        println!("Demo bearer token (24h):\n{token}");
    }

    println!("Seeding complete!");
    Ok(())
}

async fn seed_company(db: &DatabaseConnection) -> anyhow::Result<()> {
    let companies = CompanyRepository::new(db.clone());
    if companies.find_by_id(DEMO_COMPANY_ID).await?.is_some() {
        println!("  Demo company already exists, skipping...");
        return Ok(());
    }
    companies
        .create(DEMO_COMPANY_ID, "Ledgerline Demo LLC", BASE_CURRENCY)
        .await?;
    println!("  Created demo company ({BASE_CURRENCY})");
    Ok(())
}

async fn seed_accounts(db: &DatabaseConnection) -> anyhow::Result<()> {
    let mut inserted = 0;
    for (code, name, subtype) in ACCOUNTS {
        let exists = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::CompanyId.eq(DEMO_COMPANY_ID))
            .filter(chart_of_accounts::Column::Code.eq(code))
            .count(db)
            .await?;
        if exists > 0 {
            continue;
        }
        chart_of_accounts::ActiveModel {
            company_id: Set(DEMO_COMPANY_ID),
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            account_subtype: Set(subtype.map(ToString::to_string)),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(db)
        .await
        .with_context(|| format!("Failed to insert account {code}"))?;
        inserted += 1;
    }
    println!("  Inserted {inserted} accounts");
    Ok(())
}

async fn seed_parties(db: &DatabaseConnection) -> anyhow::Result<()> {
    let repo = PartyRepository::new(db.clone());
    let mut inserted = 0;
    for (party_type, name) in PARTIES {
        let exists = parties::Entity::find()
            .filter(parties::Column::CompanyId.eq(DEMO_COMPANY_ID))
            .filter(parties::Column::Name.eq(name))
            .count(db)
            .await?;
        if exists > 0 {
            continue;
        }
        let party = repo.create(DEMO_COMPANY_ID, party_type, name).await?;
        println!("  {party_type} #{}: {name}", party.id);
        inserted += 1;
    }
    println!("  Inserted {inserted} parties");
    Ok(())
}

async fn seed_exchange_rates(db: &DatabaseConnection) -> anyhow::Result<()> {
    let repo = ExchangeRateRepository::new(db.clone());
    let today = Utc::now().date_naive();
    let mut written = 0;
    for days_ago in [0, 30, 365] {
        for (currency, rate) in RATES {
            repo.create_or_update_rate(CreateExchangeRateInput {
                company_id: DEMO_COMPANY_ID,
                from_currency: currency.to_string(),
                to_currency: BASE_CURRENCY.to_string(),
                rate: Decimal::new(rate, 4),
                effective_date: today - Duration::days(days_ago),
            })
            .await
            .with_context(|| format!("Failed to write {currency} rate"))?;
            written += 1;
        }
    }
    println!("  Wrote {written} exchange rates");
    Ok(())
}
