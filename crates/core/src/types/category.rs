//! Product category enums.
//!
//! Categories are a fixed two-level taxonomy. They serialize with their
//! human-readable labels (the values clients send and the database stores),
//! so `Display`/`FromStr` and serde agree on the wire format.

use serde::{Deserialize, Serialize};

/// Error parsing a category label.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// Top-level product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MainCategory {
    Food,
    Treat,
    Health,
    Grooming,
    Wellness,
}

impl MainCategory {
    /// Human-readable label, as stored and serialized.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Treat => "Treat",
            Self::Health => "Health",
            Self::Grooming => "Grooming",
            Self::Wellness => "Wellness",
        }
    }
}

impl std::fmt::Display for MainCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MainCategory {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Food" => Ok(Self::Food),
            "Treat" => Ok(Self::Treat),
            "Health" => Ok(Self::Health),
            "Grooming" => Ok(Self::Grooming),
            "Wellness" => Ok(Self::Wellness),
            other => Err(CategoryError(other.to_owned())),
        }
    }
}

/// Second-level product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubCategory {
    Dry,
    Wet,
    Raw,
    Dental,
    Training,
    Vitamins,
    #[serde(rename = "Tick & Flea")]
    TickAndFlea,
    #[serde(rename = "Recovery Collars")]
    RecoveryCollars,
    #[serde(rename = "Shampoo & Conditioner")]
    ShampooAndConditioner,
    #[serde(rename = "Pet Brush")]
    PetBrush,
    #[serde(rename = "Spritz & Wipes")]
    SpritzAndWipes,
    Toys,
    #[serde(rename = "Beds & Kennels")]
    BedsAndKennels,
    #[serde(rename = "Harness & Leashes")]
    HarnessAndLeashes,
}

impl SubCategory {
    /// Human-readable label, as stored and serialized.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dry => "Dry",
            Self::Wet => "Wet",
            Self::Raw => "Raw",
            Self::Dental => "Dental",
            Self::Training => "Training",
            Self::Vitamins => "Vitamins",
            Self::TickAndFlea => "Tick & Flea",
            Self::RecoveryCollars => "Recovery Collars",
            Self::ShampooAndConditioner => "Shampoo & Conditioner",
            Self::PetBrush => "Pet Brush",
            Self::SpritzAndWipes => "Spritz & Wipes",
            Self::Toys => "Toys",
            Self::BedsAndKennels => "Beds & Kennels",
            Self::HarnessAndLeashes => "Harness & Leashes",
        }
    }
}

impl std::fmt::Display for SubCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubCategory {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Dry" => Ok(Self::Dry),
            "Wet" => Ok(Self::Wet),
            "Raw" => Ok(Self::Raw),
            "Dental" => Ok(Self::Dental),
            "Training" => Ok(Self::Training),
            "Vitamins" => Ok(Self::Vitamins),
            "Tick & Flea" => Ok(Self::TickAndFlea),
            "Recovery Collars" => Ok(Self::RecoveryCollars),
            "Shampoo & Conditioner" => Ok(Self::ShampooAndConditioner),
            "Pet Brush" => Ok(Self::PetBrush),
            "Spritz & Wipes" => Ok(Self::SpritzAndWipes),
            "Toys" => Ok(Self::Toys),
            "Beds & Kennels" => Ok(Self::BedsAndKennels),
            "Harness & Leashes" => Ok(Self::HarnessAndLeashes),
            other => Err(CategoryError(other.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_main_category_roundtrip() {
        for cat in [
            MainCategory::Food,
            MainCategory::Treat,
            MainCategory::Health,
            MainCategory::Grooming,
            MainCategory::Wellness,
        ] {
            let parsed: MainCategory = cat.as_str().parse().unwrap();
            assert_eq!(parsed, cat);
        }
        assert!("Toys".parse::<MainCategory>().is_err());
    }

    #[test]
    fn test_sub_category_labels_with_ampersands() {
        assert_eq!(SubCategory::TickAndFlea.as_str(), "Tick & Flea");
        let parsed: SubCategory = "Shampoo & Conditioner".parse().unwrap();
        assert_eq!(parsed, SubCategory::ShampooAndConditioner);
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&SubCategory::BedsAndKennels).unwrap();
        assert_eq!(json, "\"Beds & Kennels\"");
        let back: SubCategory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SubCategory::BedsAndKennels);
    }
}
