//! Product suitability matching.
//!
//! Every product carries a `product_code`: five dash-separated segments
//! covering life stage, breed size, coat type, lifestyle, and health, in
//! that order. Each segment is a concatenation of two-letter tokens
//! (`"PUAD-BSSM-HYSH-CO-NOBRJM"` reads puppy/adult, small, short-haired or
//! hypoallergenic, companion, no-issues/breathing/joint). A dog profile is
//! matched against a code segment by segment.
//!
//! # Matching policy
//!
//! One attribute matches its segment when any of these hold:
//!
//! - the profile value's short code appears as a substring of the segment;
//! - the segment equals the attribute's wildcard token (`LI`, `BS`, `CT`,
//!   `LS`; health uses `NO`, checked as a contained token);
//! - a declared alias of the short code appears as a substring.
//!
//! Health is multi-valued: the considerations field is split on commas and
//! any one mapped code matching the fifth segment suffices.
//!
//! A product is suitable only when all five checks pass. Codes with fewer
//! than five segments are malformed: such products are never recommended,
//! and the outcome is reported distinctly so callers can log them. A
//! profile with no recognizable attribute at all matches nothing, not
//! everything.

mod code_book;

use code_book::{AttributeTable, aliases_of};

/// The immutable lookup tables driving the matcher.
///
/// Built once at startup via [`CodeBook::standard`] and passed explicitly
/// wherever matching happens.
#[derive(Debug, Clone, Copy)]
pub struct CodeBook {
    life_stage: AttributeTable,
    size: AttributeTable,
    coat_type: AttributeTable,
    role: AttributeTable,
    health: AttributeTable,
}

impl CodeBook {
    /// The standard CanineRacks code book.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            life_stage: code_book::LIFE_STAGE,
            size: code_book::SIZE,
            coat_type: code_book::COAT_TYPE,
            role: code_book::ROLE,
            health: code_book::HEALTH,
        }
    }

    /// Map a dog's profile attributes to a [`SuitabilityQuery`].
    ///
    /// Values are uppercased and trimmed before lookup; unknown values map
    /// to nothing and will only ever match wildcard segments.
    #[must_use]
    pub fn query(&self, attrs: &DogAttributes<'_>) -> SuitabilityQuery {
        let health = attrs
            .health_considerations
            .split(',')
            .filter_map(|token| self.health.code_for(&normalize(token)))
            .collect();

        SuitabilityQuery {
            life_stage: self.life_stage.code_for(&normalize(attrs.life_stage)),
            size: self.size.code_for(&normalize(attrs.size)),
            coat_type: self.coat_type.code_for(&normalize(attrs.coat_type)),
            role: self.role.code_for(&normalize(attrs.role)),
            health,
        }
    }

    /// Evaluate one product code against a query.
    #[must_use]
    pub fn evaluate(&self, query: &SuitabilityQuery, product_code: &str) -> MatchOutcome {
        if query.is_empty() {
            return MatchOutcome::NotSuitable;
        }

        let code = normalize(product_code);
        let mut segments = code.split('-').map(str::trim);
        let (Some(life), Some(size), Some(coat), Some(role), Some(health)) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return MatchOutcome::MalformedCode;
        };

        let suitable = segment_matches(query.life_stage, life, self.life_stage.wildcard)
            && segment_matches(query.size, size, self.size.wildcard)
            && segment_matches(query.coat_type, coat, self.coat_type.wildcard)
            && segment_matches(query.role, role, self.role.wildcard)
            && health_matches(&query.health, health, self.health.wildcard);

        if suitable {
            MatchOutcome::Recommended
        } else {
            MatchOutcome::NotSuitable
        }
    }
}

/// A dog profile's raw attribute values, as entered by the owner.
///
/// `health_considerations` is free text, comma-separated.
#[derive(Debug, Clone, Copy, Default)]
pub struct DogAttributes<'a> {
    pub life_stage: &'a str,
    pub size: &'a str,
    pub coat_type: &'a str,
    pub role: &'a str,
    pub health_considerations: &'a str,
}

/// Profile attributes mapped to short codes, ready for matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuitabilityQuery {
    life_stage: Option<&'static str>,
    size: Option<&'static str>,
    coat_type: Option<&'static str>,
    role: Option<&'static str>,
    health: Vec<&'static str>,
}

impl SuitabilityQuery {
    /// True when no attribute mapped to a code. An empty query matches no
    /// product, wildcarded or not.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.life_stage.is_none()
            && self.size.is_none()
            && self.coat_type.is_none()
            && self.role.is_none()
            && self.health.is_empty()
    }
}

/// Result of matching one product code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// All five attribute checks passed.
    Recommended,
    /// At least one attribute check failed.
    NotSuitable,
    /// The code has fewer than five segments. Never recommended; callers
    /// should report it rather than treat it as an error.
    MalformedCode,
}

fn normalize(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Check one singular attribute against its segment.
///
/// An unmapped attribute (no code) matches only the wildcard segment:
/// the empty string is a substring of everything, so it must never reach
/// the containment check.
fn segment_matches(code: Option<&str>, segment: &str, wildcard: &str) -> bool {
    if segment == wildcard {
        return true;
    }
    let Some(code) = code else {
        return false;
    };
    segment.contains(code) || aliases_of(code).any(|alias| segment.contains(alias))
}

/// Check the multi-valued health attribute against the fifth segment.
///
/// The `NO` wildcard is a contained token rather than a whole-segment
/// value: `NOBRJM` advertises "fine for healthy dogs too".
fn health_matches(codes: &[&str], segment: &str, wildcard: &str) -> bool {
    if segment.contains(wildcard) {
        return true;
    }
    codes
        .iter()
        .any(|code| segment.contains(code) || aliases_of(code).any(|alias| segment.contains(alias)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOOK: CodeBook = CodeBook::standard();

    fn companion_puppy() -> DogAttributes<'static> {
        DogAttributes {
            life_stage: "PUPPY",
            size: "SMALL",
            coat_type: "SHORT-HAIRED",
            role: "COMPANION DOGS",
            health_considerations: "NONE",
        }
    }

    #[test]
    fn test_example_product_is_recommended() {
        let query = BOOK.query(&companion_puppy());
        assert_eq!(
            BOOK.evaluate(&query, "PUAD-BSSM-HYSH-CO-NOBRJM"),
            MatchOutcome::Recommended
        );
    }

    #[test]
    fn test_example_product_is_rejected_on_life_stage_and_size() {
        let query = BOOK.query(&companion_puppy());
        assert_eq!(
            BOOK.evaluate(&query, "SEGI-BSLA-HYLH-WS-BR"),
            MatchOutcome::NotSuitable
        );
    }

    #[test]
    fn test_empty_profile_matches_nothing() {
        let query = BOOK.query(&DogAttributes::default());
        assert!(query.is_empty());
        // Not even a fully wildcarded product.
        assert_eq!(
            BOOK.evaluate(&query, "LI-BS-CT-LS-NO"),
            MatchOutcome::NotSuitable
        );
    }

    #[test]
    fn test_unknown_values_match_only_wildcards() {
        let attrs = DogAttributes {
            life_stage: "GERIATRIC", // not in the code book
            size: "SMALL",
            coat_type: "SHORT-HAIRED",
            role: "COMPANION DOGS",
            health_considerations: "NONE",
        };
        let query = BOOK.query(&attrs);
        assert_eq!(
            BOOK.evaluate(&query, "LI-BSSM-HYSH-CO-NO"),
            MatchOutcome::Recommended
        );
        assert_eq!(
            BOOK.evaluate(&query, "PUAD-BSSM-HYSH-CO-NO"),
            MatchOutcome::NotSuitable
        );
    }

    #[test]
    fn test_malformed_code_is_never_recommended() {
        let query = BOOK.query(&companion_puppy());
        for code in ["PUAD-BSSM-HYSH-CO", "PU", "", "---"] {
            assert_ne!(
                BOOK.evaluate(&query, code),
                MatchOutcome::Recommended,
                "{code:?}"
            );
        }
        assert_eq!(
            BOOK.evaluate(&query, "PUAD-BSSM-HYSH-CO"),
            MatchOutcome::MalformedCode
        );
    }

    #[test]
    fn test_wildcard_segments_match_any_value() {
        let attrs = DogAttributes {
            life_stage: "SENIOR",
            size: "GIANT",
            coat_type: "DOUBLE-COATED",
            role: "GUARD DOGS",
            health_considerations: "ARTHRITIS",
        };
        let query = BOOK.query(&attrs);
        assert_eq!(
            BOOK.evaluate(&query, "LI-BS-CT-LS-NO"),
            MatchOutcome::Recommended
        );
    }

    #[test]
    fn test_alias_group_matching() {
        // A working dog matches the combined working/sporting token.
        let attrs = DogAttributes {
            role: "WORKING DOGS",
            ..DogAttributes::default()
        };
        let query = BOOK.query(&attrs);
        assert_eq!(
            BOOK.evaluate(&query, "LI-BS-CT-WS-NO"),
            MatchOutcome::Recommended
        );

        // Arthritis matches joint & mobility products via its alias.
        let attrs = DogAttributes {
            health_considerations: "ARTHRITIS",
            ..DogAttributes::default()
        };
        let query = BOOK.query(&attrs);
        assert_eq!(
            BOOK.evaluate(&query, "LI-BS-CT-LS-JM"),
            MatchOutcome::Recommended
        );
    }

    #[test]
    fn test_multi_valued_health_any_token_suffices() {
        let attrs = DogAttributes {
            life_stage: "ADULT",
            size: "MEDIUM",
            coat_type: "LONG-HAIRED",
            role: "COMPANION DOGS",
            health_considerations: "skin allergies, digestive issues",
        };
        let query = BOOK.query(&attrs);
        // DI appears in the health segment; SA does not.
        assert_eq!(
            BOOK.evaluate(&query, "AD-MD-LH-CO-DIWM"),
            MatchOutcome::Recommended
        );
        // Neither token appears and NO is absent.
        assert_eq!(
            BOOK.evaluate(&query, "AD-MD-LH-CO-BR"),
            MatchOutcome::NotSuitable
        );
    }

    #[test]
    fn test_normalization_is_case_and_whitespace_insensitive() {
        let attrs = DogAttributes {
            life_stage: "  puppy ",
            size: "Small",
            coat_type: "short-haired",
            role: "companion dogs",
            health_considerations: " none ",
        };
        let query = BOOK.query(&attrs);
        assert_eq!(query, BOOK.query(&companion_puppy()));
        assert_eq!(
            BOOK.evaluate(&query, "puad-bssm-hysh-co-nobrjm"),
            MatchOutcome::Recommended
        );
    }

    #[test]
    fn test_matching_is_idempotent() {
        let query = BOOK.query(&companion_puppy());
        let first = BOOK.evaluate(&query, "PUAD-BSSM-HYSH-CO-NOBRJM");
        let second = BOOK.evaluate(&query, "PUAD-BSSM-HYSH-CO-NOBRJM");
        assert_eq!(first, second);
    }

    #[test]
    fn test_extra_segments_use_first_five() {
        let query = BOOK.query(&companion_puppy());
        assert_eq!(
            BOOK.evaluate(&query, "PUAD-BSSM-HYSH-CO-NOBRJM-EXTRA"),
            MatchOutcome::Recommended
        );
    }
}
