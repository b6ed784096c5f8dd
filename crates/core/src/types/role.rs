//! Account role enumeration.

use serde::{Deserialize, Serialize};

/// The role an account holds, exactly one per account.
///
/// Canonical spellings are `customer`, `owner`, and `courier`. Earlier
/// clients of the Account Service used `user` for customers and the
/// inconsistent pair `deliveryBoy`/`deliveryboy` for couriers; those
/// spellings are still accepted on input and mapped, but never emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    #[serde(alias = "user")]
    Customer,
    Owner,
    #[serde(alias = "deliveryBoy", alias = "deliveryboy")]
    Courier,
}

impl Role {
    /// All roles, in display order.
    pub const ALL: [Self; 3] = [Self::Customer, Self::Owner, Self::Courier];

    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Owner => "owner",
            Self::Courier => "courier",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" | "user" => Ok(Self::Customer),
            "owner" => Ok(Self::Owner),
            "courier" | "deliveryBoy" | "deliveryboy" => Ok(Self::Courier),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_customer() {
        assert_eq!(Role::default(), Role::Customer);
    }

    #[test]
    fn test_canonical_serialization() {
        assert_eq!(serde_json::to_string(&Role::Customer).unwrap(), "\"customer\"");
        assert_eq!(serde_json::to_string(&Role::Owner).unwrap(), "\"owner\"");
        assert_eq!(serde_json::to_string(&Role::Courier).unwrap(), "\"courier\"");
    }

    #[test]
    fn test_legacy_aliases_accepted_on_input() {
        assert_eq!(serde_json::from_str::<Role>("\"user\"").unwrap(), Role::Customer);
        assert_eq!(
            serde_json::from_str::<Role>("\"deliveryBoy\"").unwrap(),
            Role::Courier
        );
        assert_eq!(
            serde_json::from_str::<Role>("\"deliveryboy\"").unwrap(),
            Role::Courier
        );
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!(serde_json::from_str::<Role>("\"admin\"").is_err());
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_from_str_matches_serde() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }
}
