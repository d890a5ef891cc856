//! Dog profile domain model.

use serde::{Deserialize, Serialize};

use canineracks_core::recommend::DogAttributes;
use canineracks_core::{DogProfileId, UserId};

/// A customer's dog profile.
///
/// Exactly one per account, created lazily on first access with every
/// attribute blank. The matcher treats a fully blank profile as matching
/// nothing.
#[derive(Debug, Clone, Serialize)]
pub struct DogProfile {
    /// Unique profile ID.
    pub id: DogProfileId,
    /// Owning account; profiles are only readable and writable by their owner.
    pub owner_id: UserId,
    pub name: String,
    pub breed: String,
    pub gender: String,
    pub life_stage: String,
    pub size: String,
    pub coat_type: String,
    pub role: String,
    /// Free text, comma-separated considerations (e.g. "skin allergies, arthritis").
    pub health_considerations: String,
}

impl DogProfile {
    /// Borrow the attribute fields the recommendation matcher consumes.
    #[must_use]
    pub fn attributes(&self) -> DogAttributes<'_> {
        DogAttributes {
            life_stage: &self.life_stage,
            size: &self.size,
            coat_type: &self.coat_type,
            role: &self.role,
            health_considerations: &self.health_considerations,
        }
    }
}

/// Input for updating a dog profile. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDogProfileInput {
    pub name: Option<String>,
    pub breed: Option<String>,
    pub gender: Option<String>,
    pub life_stage: Option<String>,
    pub size: Option<String>,
    pub coat_type: Option<String>,
    pub role: Option<String>,
    pub health_considerations: Option<String>,
}
