//! The typed gear selector.
//!
//! The transmission exposes eleven positions: Park, Reverse, Neutral, and
//! eight forward gears. On the wire each position is a single token
//! (`P`, `R`, `N`, `1`..`8`), matching what the dashboard sends and
//! displays. Parsing is strict: any other token is rejected with a
//! [`GearParseError`] rather than being stored as-is.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A transmission gear position.
///
/// Serialized as its wire token, so a snapshot carries `"gear": "3"`
/// rather than a variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Gear {
    /// Park. The vehicle cannot move; speed decays to zero.
    #[serde(rename = "P")]
    Park,
    /// Reverse.
    #[serde(rename = "R")]
    Reverse,
    /// Neutral. The engine is decoupled from the wheels.
    #[serde(rename = "N")]
    Neutral,
    /// First forward gear.
    #[serde(rename = "1")]
    First,
    /// Second forward gear.
    #[serde(rename = "2")]
    Second,
    /// Third forward gear.
    #[serde(rename = "3")]
    Third,
    /// Fourth forward gear.
    #[serde(rename = "4")]
    Fourth,
    /// Fifth forward gear.
    #[serde(rename = "5")]
    Fifth,
    /// Sixth forward gear.
    #[serde(rename = "6")]
    Sixth,
    /// Seventh forward gear.
    #[serde(rename = "7")]
    Seventh,
    /// Eighth forward gear.
    #[serde(rename = "8")]
    Eighth,
}

/// Error returned when a string is not a recognized gear token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown gear token: {token} (expected P, R, N, or 1-8)")]
pub struct GearParseError {
    /// The token that failed to parse.
    pub token: String,
}

impl Gear {
    /// Return the wire token for this gear.
    pub const fn as_token(self) -> &'static str {
        match self {
            Self::Park => "P",
            Self::Reverse => "R",
            Self::Neutral => "N",
            Self::First => "1",
            Self::Second => "2",
            Self::Third => "3",
            Self::Fourth => "4",
            Self::Fifth => "5",
            Self::Sixth => "6",
            Self::Seventh => "7",
            Self::Eighth => "8",
        }
    }

    /// Parse a wire token into a gear.
    ///
    /// The caller is expected to case-normalize first; `P` and `p` are
    /// not the same token here.
    ///
    /// # Errors
    ///
    /// Returns [`GearParseError`] if the token is not one of
    /// `P`, `R`, `N`, `1`..`8`.
    pub fn from_token(token: &str) -> Result<Self, GearParseError> {
        match token {
            "P" => Ok(Self::Park),
            "R" => Ok(Self::Reverse),
            "N" => Ok(Self::Neutral),
            "1" => Ok(Self::First),
            "2" => Ok(Self::Second),
            "3" => Ok(Self::Third),
            "4" => Ok(Self::Fourth),
            "5" => Ok(Self::Fifth),
            "6" => Ok(Self::Sixth),
            "7" => Ok(Self::Seventh),
            "8" => Ok(Self::Eighth),
            other => Err(GearParseError {
                token: other.to_owned(),
            }),
        }
    }

    /// Return the forward gear number (1-8), or `None` for P, R, and N.
    pub const fn number(self) -> Option<u8> {
        match self {
            Self::Park | Self::Reverse | Self::Neutral => None,
            Self::First => Some(1),
            Self::Second => Some(2),
            Self::Third => Some(3),
            Self::Fourth => Some(4),
            Self::Fifth => Some(5),
            Self::Sixth => Some(6),
            Self::Seventh => Some(7),
            Self::Eighth => Some(8),
        }
    }

    /// Build a forward gear from its number (1-8).
    ///
    /// Returns `None` for anything outside that range.
    pub const fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::First),
            2 => Some(Self::Second),
            3 => Some(Self::Third),
            4 => Some(Self::Fourth),
            5 => Some(Self::Fifth),
            6 => Some(Self::Sixth),
            7 => Some(Self::Seventh),
            8 => Some(Self::Eighth),
            _ => None,
        }
    }

    /// Whether the engine is coupled to the wheels in this gear.
    ///
    /// True for Reverse and every forward gear; false for Park and Neutral.
    pub const fn is_drive(self) -> bool {
        !matches!(self, Self::Park | Self::Neutral)
    }

    /// The effective gear number used by the drivetrain model.
    ///
    /// Reverse behaves like first gear for RPM purposes; P and N have
    /// no drivetrain coupling and return `None`.
    pub const fn ratio_number(self) -> Option<u8> {
        match self {
            Self::Reverse => Some(1),
            other => other.number(),
        }
    }
}

impl fmt::Display for Gear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

impl FromStr for Gear {
    type Err = GearParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn tokens_round_trip() {
        for token in ["P", "R", "N", "1", "2", "3", "4", "5", "6", "7", "8"] {
            let gear = Gear::from_token(token).unwrap();
            assert_eq!(gear.as_token(), token);
        }
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        for token in ["D", "p", "0", "9", "", "park"] {
            let result = Gear::from_token(token);
            assert!(result.is_err(), "token {token:?} should not parse");
        }
    }

    #[test]
    fn serde_uses_wire_tokens() {
        let json = serde_json::to_string(&Gear::Third).unwrap();
        assert_eq!(json, "\"3\"");
        let gear: Gear = serde_json::from_str("\"P\"").unwrap();
        assert_eq!(gear, Gear::Park);
    }

    #[test]
    fn forward_gear_numbers() {
        assert_eq!(Gear::First.number(), Some(1));
        assert_eq!(Gear::Eighth.number(), Some(8));
        assert_eq!(Gear::Park.number(), None);
        assert_eq!(Gear::Reverse.number(), None);
        assert_eq!(Gear::from_number(4), Some(Gear::Fourth));
        assert_eq!(Gear::from_number(0), None);
        assert_eq!(Gear::from_number(9), None);
    }

    #[test]
    fn reverse_counts_as_first_for_the_drivetrain() {
        assert_eq!(Gear::Reverse.ratio_number(), Some(1));
        assert_eq!(Gear::Fifth.ratio_number(), Some(5));
        assert_eq!(Gear::Neutral.ratio_number(), None);
    }

    #[test]
    fn drive_coupling() {
        assert!(Gear::Reverse.is_drive());
        assert!(Gear::First.is_drive());
        assert!(!Gear::Park.is_drive());
        assert!(!Gear::Neutral.is_drive());
    }
}
