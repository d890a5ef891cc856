//! The suitability code book: fixed tables mapping human-readable dog
//! profile values to the short codes embedded in product codes.
//!
//! The tables are immutable configuration. They are built once at process
//! start and passed explicitly into the matcher; nothing here is mutable
//! or ambient.

/// One attribute family: its value-to-code table and its wildcard token.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AttributeTable {
    /// (normalized profile value, short code) pairs.
    pub entries: &'static [(&'static str, &'static str)],
    /// Segment value meaning "suitable for every value of this attribute".
    pub wildcard: &'static str,
}

impl AttributeTable {
    /// Look up the short code for a profile value.
    ///
    /// The value must already be normalized (uppercased, trimmed).
    /// Unknown values yield `None`.
    pub(crate) fn code_for(&self, value: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(label, _)| *label == value)
            .map(|(_, code)| *code)
    }
}

pub(crate) const LIFE_STAGE: AttributeTable = AttributeTable {
    entries: &[("PUPPY", "PU"), ("ADULT", "AD"), ("SENIOR", "SE")],
    wildcard: "LI",
};

pub(crate) const SIZE: AttributeTable = AttributeTable {
    entries: &[
        ("SMALL", "SM"),
        ("MEDIUM", "MD"),
        ("LARGE", "LA"),
        ("GIANT", "GI"),
    ],
    wildcard: "BS",
};

pub(crate) const COAT_TYPE: AttributeTable = AttributeTable {
    entries: &[
        ("SHORT-HAIRED", "SH"),
        ("LONG-HAIRED", "LH"),
        ("CURLY", "CU"),
        ("DOUBLE-COATED", "DC"),
        ("HAIRLESS", "HL"),
        ("HYPOALLERGENIC", "HY"),
    ],
    wildcard: "CT",
};

pub(crate) const ROLE: AttributeTable = AttributeTable {
    entries: &[
        ("COMPANION DOGS", "CO"),
        ("WORKING DOGS", "WK"),
        ("SPORTING DOGS", "SP"),
        ("HERDING DOGS", "HD"),
        ("GUARD DOGS", "GD"),
    ],
    wildcard: "LS",
};

pub(crate) const HEALTH: AttributeTable = AttributeTable {
    entries: &[
        ("NONE", "NO"),
        ("BREATHING ISSUES", "BR"),
        ("JOINT & MOBILITY", "JM"),
        ("ARTHRITIS", "AR"),
        ("SKIN ALLERGIES", "SA"),
        ("DIGESTIVE ISSUES", "DI"),
        ("WEIGHT MANAGEMENT", "WM"),
        ("DENTAL ISSUES", "DE"),
    ],
    wildcard: "NO",
};

/// Equivalence classes of short codes. Two codes are aliases when they
/// share a group; an alias satisfies a segment check the same way the
/// mapped code itself would.
///
/// `WS` is the combined working/sporting token that appears in catalog
/// codes but never maps from a profile value directly.
pub(crate) const ALIAS_GROUPS: &[&[&str]] = &[
    &["WK", "SP", "WS"],
    &["CU", "HL", "HY"],
    &["LA", "GI"],
    &["JM", "AR"],
];

/// Codes equivalent to `code` under [`ALIAS_GROUPS`], excluding `code`
/// itself.
pub(crate) fn aliases_of(code: &str) -> impl Iterator<Item = &'static str> + '_ {
    ALIAS_GROUPS
        .iter()
        .filter(move |group| group.contains(&code))
        .flat_map(|group| group.iter().copied())
        .filter(move |alias| *alias != code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_values() {
        assert_eq!(LIFE_STAGE.code_for("PUPPY"), Some("PU"));
        assert_eq!(SIZE.code_for("GIANT"), Some("GI"));
        assert_eq!(COAT_TYPE.code_for("SHORT-HAIRED"), Some("SH"));
        assert_eq!(ROLE.code_for("COMPANION DOGS"), Some("CO"));
        assert_eq!(HEALTH.code_for("NONE"), Some("NO"));
    }

    #[test]
    fn test_lookup_unknown_value() {
        assert_eq!(LIFE_STAGE.code_for("GERIATRIC"), None);
        assert_eq!(ROLE.code_for(""), None);
    }

    #[test]
    fn test_aliases_exclude_self() {
        let wk: Vec<_> = aliases_of("WK").collect();
        assert!(wk.contains(&"WS"));
        assert!(wk.contains(&"SP"));
        assert!(!wk.contains(&"WK"));
    }

    #[test]
    fn test_aliases_of_unknown_code_is_empty() {
        assert_eq!(aliases_of("ZZ").count(), 0);
    }
}
