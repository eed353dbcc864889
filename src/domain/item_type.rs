use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::CupidError;

/// The four purchasable ticket items.
///
/// Serenades (`Serenade`, `SpecialSerenade`) are disruptive classroom visits
/// that the sorter tries to spread across periods and, for the special
/// kind, isolate into their own visit. Non-serenades (`Rose`, `Chocolate`)
/// are cheap to bundle into whatever visit is already happening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemType {
    Rose,
    Chocolate,
    Serenade,
    SpecialSerenade,
}

impl ItemType {
    pub fn is_serenade(self) -> bool {
        matches!(self, ItemType::Serenade | ItemType::SpecialSerenade)
    }

    pub fn is_non_serenade(self) -> bool {
        !self.is_serenade()
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ItemType::Rose => "Rose",
            ItemType::Chocolate => "Chocolate",
            ItemType::Serenade => "Serenade",
            ItemType::SpecialSerenade => "Special Serenade",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ItemType {
    type Err = CupidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Rose" => Ok(ItemType::Rose),
            "Chocolate" => Ok(ItemType::Chocolate),
            "Serenade" => Ok(ItemType::Serenade),
            "Special Serenade" | "SpecialSerenade" => Ok(ItemType::SpecialSerenade),
            other => Err(CupidError::InvalidSortRequest(format!(
                "unknown item type '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serenade_classification() {
        assert!(ItemType::Serenade.is_serenade());
        assert!(ItemType::SpecialSerenade.is_serenade());
        assert!(!ItemType::Rose.is_serenade());
        assert!(!ItemType::Chocolate.is_serenade());
    }

    #[test]
    fn non_serenade_is_complement() {
        for item in [
            ItemType::Rose,
            ItemType::Chocolate,
            ItemType::Serenade,
            ItemType::SpecialSerenade,
        ] {
            assert_eq!(item.is_non_serenade(), !item.is_serenade());
        }
    }

    #[test]
    fn from_str_roundtrip() {
        assert_eq!(ItemType::from_str("Rose").unwrap(), ItemType::Rose);
        assert_eq!(
            ItemType::from_str("Special Serenade").unwrap(),
            ItemType::SpecialSerenade
        );
        assert!(ItemType::from_str("Bagel").is_err());
    }
}
