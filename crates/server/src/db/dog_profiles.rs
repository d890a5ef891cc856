//! Dog profile repository.
//!
//! Profiles are created lazily: the first read for an owner inserts a
//! blank row. There is exactly one profile per account, enforced by the
//! unique constraint on `owner_id`.

use sqlx::PgPool;

use canineracks_core::{DogProfileId, UserId};

use super::RepositoryError;
use crate::models::dog_profile::{DogProfile, UpdateDogProfileInput};

/// Internal row type for dog profile queries.
#[derive(Debug, sqlx::FromRow)]
struct DogProfileRow {
    id: i32,
    owner_id: i32,
    name: String,
    breed: String,
    gender: String,
    life_stage: String,
    size: String,
    coat_type: String,
    role: String,
    health_considerations: String,
}

impl From<DogProfileRow> for DogProfile {
    fn from(row: DogProfileRow) -> Self {
        Self {
            id: DogProfileId::new(row.id),
            owner_id: UserId::new(row.owner_id),
            name: row.name,
            breed: row.breed,
            gender: row.gender,
            life_stage: row.life_stage,
            size: row.size,
            coat_type: row.coat_type,
            role: row.role,
            health_considerations: row.health_considerations,
        }
    }
}

const PROFILE_COLUMNS: &str = "id, owner_id, name, breed, gender, life_stage, size, coat_type, \
     role, health_considerations";

/// Repository for dog profile operations.
pub struct DogProfileRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DogProfileRepository<'a> {
    /// Create a new dog profile repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an owner's profile, if one exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, owner_id: UserId) -> Result<Option<DogProfile>, RepositoryError> {
        let row = sqlx::query_as::<_, DogProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM dog_profile WHERE owner_id = $1"
        ))
        .bind(owner_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Get an owner's profile, inserting a blank one on first access.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_or_create(&self, owner_id: UserId) -> Result<DogProfile, RepositoryError> {
        if let Some(profile) = self.get(owner_id).await? {
            return Ok(profile);
        }

        // ON CONFLICT DO NOTHING loses the race gracefully; the follow-up
        // read picks up whichever row won.
        let inserted = sqlx::query_as::<_, DogProfileRow>(&format!(
            "INSERT INTO dog_profile (owner_id) VALUES ($1) \
             ON CONFLICT (owner_id) DO NOTHING \
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(owner_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        if let Some(row) = inserted {
            return Ok(row.into());
        }

        self.get(owner_id).await?.ok_or(RepositoryError::NotFound)
    }

    /// Update an owner's profile. Absent fields keep their current value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no profile exists for the owner.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        owner_id: UserId,
        input: &UpdateDogProfileInput,
    ) -> Result<DogProfile, RepositoryError> {
        let row = sqlx::query_as::<_, DogProfileRow>(&format!(
            "UPDATE dog_profile SET \
                 name = COALESCE($2, name), \
                 breed = COALESCE($3, breed), \
                 gender = COALESCE($4, gender), \
                 life_stage = COALESCE($5, life_stage), \
                 size = COALESCE($6, size), \
                 coat_type = COALESCE($7, coat_type), \
                 role = COALESCE($8, role), \
                 health_considerations = COALESCE($9, health_considerations), \
                 updated_at = now() \
             WHERE owner_id = $1 \
             RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(owner_id.as_i32())
        .bind(&input.name)
        .bind(&input.breed)
        .bind(&input.gender)
        .bind(&input.life_stage)
        .bind(&input.size)
        .bind(&input.coat_type)
        .bind(&input.role)
        .bind(&input.health_considerations)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }
}
