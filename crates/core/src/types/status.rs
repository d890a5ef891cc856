//! Status and role enums for users, stock movements, and verification codes.

use serde::{Deserialize, Serialize};

/// Account role with different permission levels.
///
/// Customers shop and manage their own dog profile; inventory managers
/// additionally maintain the catalog and see every order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Customer,
    InventoryManager,
}

impl UserRole {
    /// Whether this role may mutate the catalog and read other users' data.
    #[must_use]
    pub const fn is_manager(self) -> bool {
        matches!(self, Self::InventoryManager)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::InventoryManager => write!(f, "inventory_manager"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "inventory_manager" => Ok(Self::InventoryManager),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

/// Classification of a stock ledger entry.
///
/// The sign of a quantity delta decides the classification: positive
/// deltas are stock-in, negative deltas are stock-out. `Update` exists
/// for ledger rows recorded without a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockAction {
    In,
    Out,
    Update,
}

impl StockAction {
    /// Classify a signed quantity delta.
    #[must_use]
    pub const fn from_delta(delta: i32) -> Self {
        if delta > 0 { Self::In } else { Self::Out }
    }
}

impl std::fmt::Display for StockAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::In => write!(f, "in"),
            Self::Out => write!(f, "out"),
            Self::Update => write!(f, "update"),
        }
    }
}

impl std::str::FromStr for StockAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(Self::In),
            "out" => Ok(Self::Out),
            "update" => Ok(Self::Update),
            _ => Err(format!("invalid stock action: {s}")),
        }
    }
}

/// What an emailed verification code is good for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationPurpose {
    /// Activate a freshly registered account.
    Register,
    /// Authorize a password reset.
    Reset,
}

impl std::fmt::Display for VerificationPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Register => write!(f, "register"),
            Self::Reset => write!(f, "reset"),
        }
    }
}

impl std::str::FromStr for VerificationPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "register" => Ok(Self::Register),
            "reset" => Ok(Self::Reset),
            _ => Err(format!("invalid verification purpose: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [UserRole::Customer, UserRole::InventoryManager] {
            let parsed: UserRole = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
        assert!("admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_serde_matches_wire_format() {
        let json = serde_json::to_string(&UserRole::InventoryManager).unwrap();
        assert_eq!(json, "\"inventory_manager\"");
    }

    #[test]
    fn test_stock_action_from_delta() {
        assert_eq!(StockAction::from_delta(5), StockAction::In);
        assert_eq!(StockAction::from_delta(-3), StockAction::Out);
        assert_eq!(StockAction::from_delta(0), StockAction::Out);
    }

    #[test]
    fn test_stock_action_roundtrip() {
        for action in [StockAction::In, StockAction::Out, StockAction::Update] {
            let parsed: StockAction = action.to_string().parse().unwrap();
            assert_eq!(parsed, action);
        }
    }

    #[test]
    fn test_purpose_roundtrip() {
        for purpose in [VerificationPurpose::Register, VerificationPurpose::Reset] {
            let parsed: VerificationPurpose = purpose.to_string().parse().unwrap();
            assert_eq!(parsed, purpose);
        }
        assert!("login".parse::<VerificationPurpose>().is_err());
    }
}
