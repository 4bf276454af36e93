//! Party directory: customers and suppliers a company trades with.

use std::collections::HashSet;

use ledgerline_core::opening_balance::PartyType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::{parties, sea_orm_active_enums};

/// Party repository.
#[derive(Debug, Clone)]
pub struct PartyRepository {
    db: DatabaseConnection,
}

impl PartyRepository {
    /// Creates a new party repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an active party.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create(
        &self,
        company_id: Uuid,
        party_type: PartyType,
        name: &str,
    ) -> Result<parties::Model, DbErr> {
        parties::ActiveModel {
            company_id: Set(company_id),
            party_type: Set(party_type.into()),
            name: Set(name.to_string()),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&self.db)
        .await
    }

    /// Returns true if the party exists, is active and belongs to the company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn exists(
        &self,
        company_id: Uuid,
        party_type: PartyType,
        party_id: i32,
    ) -> Result<bool, DbErr> {
        let found = Self::existing(&self.db, company_id, &[(party_type, party_id)]).await?;
        Ok(!found.is_empty())
    }

    /// Subset of `keys` that exist as active parties of the company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn existing<C: ConnectionTrait>(
        conn: &C,
        company_id: Uuid,
        keys: &[(PartyType, i32)],
    ) -> Result<HashSet<(PartyType, i32)>, DbErr> {
        if keys.is_empty() {
            return Ok(HashSet::new());
        }

        let ids: Vec<i32> = keys.iter().map(|(_, id)| *id).collect();
        let rows: Vec<(i32, sea_orm_active_enums::PartyType)> = parties::Entity::find()
            .select_only()
            .column(parties::Column::Id)
            .column(parties::Column::PartyType)
            .filter(
                Condition::all()
                    .add(parties::Column::CompanyId.eq(company_id))
                    .add(parties::Column::IsActive.eq(true))
                    .add(parties::Column::Id.is_in(ids)),
            )
            .into_tuple()
            .all(conn)
            .await?;

        let found: HashSet<(PartyType, i32)> = rows
            .into_iter()
            .map(|(id, party_type)| (party_type.into(), id))
            .collect();
        Ok(keys.iter().copied().filter(|key| found.contains(key)).collect())
    }
}
