//! Exchange rate repository.
//!
//! Rates are stored per company as `from_currency * rate = to_currency`.
//! Lookups take the most recent rate effective on or before the requested
//! date, trying the direct pair first and then the inverse pair.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::exchange_rates;

/// Decimal places kept on derived (inverted) rates.
const RATE_SCALE: u32 = 10;

/// Error types for exchange rate operations.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeRateError {
    /// Rate must be positive.
    #[error("Exchange rate must be positive")]
    NonPositiveRate,

    /// Currencies must be different.
    #[error("From and to currencies must be different")]
    SameCurrency,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating or updating an exchange rate.
#[derive(Debug, Clone)]
pub struct CreateExchangeRateInput {
    /// Company ID.
    pub company_id: Uuid,
    /// Source currency code.
    pub from_currency: String,
    /// Target currency code.
    pub to_currency: String,
    /// Exchange rate (from_currency * rate = to_currency).
    pub rate: Decimal,
    /// Effective date for this rate.
    pub effective_date: NaiveDate,
}

/// Exchange rate repository.
#[derive(Debug, Clone)]
pub struct ExchangeRateRepository {
    db: DatabaseConnection,
}

impl ExchangeRateRepository {
    /// Creates a new exchange rate repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates or updates an exchange rate (upsert on company, pair and date).
    ///
    /// # Errors
    ///
    /// Returns an error if the rate is not positive, the currencies are the
    /// same, or the database write fails.
    pub async fn create_or_update_rate(
        &self,
        input: CreateExchangeRateInput,
    ) -> Result<exchange_rates::Model, ExchangeRateError> {
        if input.rate <= Decimal::ZERO {
            return Err(ExchangeRateError::NonPositiveRate);
        }

        let from_currency = input.from_currency.trim().to_ascii_uppercase();
        let to_currency = input.to_currency.trim().to_ascii_uppercase();
        if from_currency == to_currency {
            return Err(ExchangeRateError::SameCurrency);
        }

        let existing = exchange_rates::Entity::find()
            .filter(exchange_rates::Column::CompanyId.eq(input.company_id))
            .filter(exchange_rates::Column::FromCurrency.eq(&from_currency))
            .filter(exchange_rates::Column::ToCurrency.eq(&to_currency))
            .filter(exchange_rates::Column::EffectiveDate.eq(input.effective_date))
            .one(&self.db)
            .await?;

        if let Some(existing_rate) = existing {
            let mut active: exchange_rates::ActiveModel = existing_rate.into();
            active.rate = Set(input.rate);
            Ok(active.update(&self.db).await?)
        } else {
            let rate = exchange_rates::ActiveModel {
                company_id: Set(input.company_id),
                from_currency: Set(from_currency),
                to_currency: Set(to_currency),
                rate: Set(input.rate),
                effective_date: Set(input.effective_date),
                created_at: Set(chrono::Utc::now().into()),
                ..Default::default()
            };
            Ok(rate.insert(&self.db).await?)
        }
    }

    /// Rate to convert `currency` into `base_currency` on `date`, if any.
    ///
    /// Lookup priority:
    /// 1. Same currency (rate of one)
    /// 2. Direct rate (currency -> base_currency)
    /// 3. Inverse rate (base_currency -> currency, then invert)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn resolve_rate<C: ConnectionTrait>(
        conn: &C,
        company_id: Uuid,
        currency: &str,
        base_currency: &str,
        date: NaiveDate,
    ) -> Result<Option<Decimal>, DbErr> {
        if currency == base_currency {
            return Ok(Some(Decimal::ONE));
        }

        if let Some(direct) =
            Self::find_direct_rate(conn, company_id, currency, base_currency, date).await?
        {
            return Ok(Some(direct.rate));
        }

        let inverse = Self::find_direct_rate(conn, company_id, base_currency, currency, date).await?;
        Ok(inverse
            .and_then(|found| Decimal::ONE.checked_div(found.rate))
            .map(|inverted| inverted.round_dp(RATE_SCALE)))
    }

    /// Finds a direct exchange rate (most recent on or before date).
    async fn find_direct_rate<C: ConnectionTrait>(
        conn: &C,
        company_id: Uuid,
        from_currency: &str,
        to_currency: &str,
        date: NaiveDate,
    ) -> Result<Option<exchange_rates::Model>, DbErr> {
        exchange_rates::Entity::find()
            .filter(exchange_rates::Column::CompanyId.eq(company_id))
            .filter(exchange_rates::Column::FromCurrency.eq(from_currency))
            .filter(exchange_rates::Column::ToCurrency.eq(to_currency))
            .filter(exchange_rates::Column::EffectiveDate.lte(date))
            .order_by_desc(exchange_rates::Column::EffectiveDate)
            .one(conn)
            .await
    }
}
