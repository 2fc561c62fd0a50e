use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Degree used whenever the degree control holds nothing usable.
pub const DEFAULT_DEGREE: u32 = 2;

pub const DEGREE_FIELD: &str = "degree";
pub const COEFFICIENT_PREFIX: &str = "coeff";
pub const INITIAL_CONDITION_PREFIX: &str = "ic";

/// Order of the highest derivative in the equation. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Degree(u32);

impl Degree {
    pub fn new(value: u32) -> Option<Self> {
        (value >= 1).then_some(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn coefficient_count(self) -> usize {
        self.0 as usize + 1
    }

    pub fn initial_condition_count(self) -> usize {
        self.0 as usize
    }
}

impl Default for Degree {
    fn default() -> Self {
        Self(DEFAULT_DEGREE)
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Degree {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("degree must be at least 1, got {value}"))
    }
}

impl From<Degree> for u32 {
    fn from(value: Degree) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Coefficient,
    InitialCondition,
}

impl FieldKind {
    pub fn prefix(self) -> &'static str {
        match self {
            FieldKind::Coefficient => COEFFICIENT_PREFIX,
            FieldKind::InitialCondition => INITIAL_CONDITION_PREFIX,
        }
    }

    pub fn default_value(self) -> &'static str {
        match self {
            FieldKind::Coefficient => "1",
            FieldKind::InitialCondition => "0",
        }
    }

    pub fn label(self, order: u32) -> String {
        match self {
            FieldKind::Coefficient => derivative_label(order),
            FieldKind::InitialCondition => initial_condition_label(order),
        }
    }
}

/// Wire name of a generated field, `coeff<i>` or `ic<i>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldName {
    pub kind: FieldKind,
    pub order: u32,
}

impl FieldName {
    pub fn coefficient(order: u32) -> Self {
        Self {
            kind: FieldKind::Coefficient,
            order,
        }
    }

    pub fn initial_condition(order: u32) -> Self {
        Self {
            kind: FieldKind::InitialCondition,
            order,
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.prefix(), self.order)
    }
}

impl FromStr for FieldName {
    type Err = ProtocolError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (kind, digits) = if let Some(rest) = raw.strip_prefix(COEFFICIENT_PREFIX) {
            (FieldKind::Coefficient, rest)
        } else if let Some(rest) = raw.strip_prefix(INITIAL_CONDITION_PREFIX) {
            (FieldKind::InitialCondition, rest)
        } else {
            return Err(ProtocolError::UnknownFieldName(raw.to_string()));
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ProtocolError::UnknownFieldName(raw.to_string()));
        }
        let order = digits
            .parse::<u32>()
            .map_err(|_| ProtocolError::UnknownFieldName(raw.to_string()))?;
        Ok(Self { kind, order })
    }
}

/// `y`, `y'`, `y''`, ... one prime per derivative order.
pub fn derivative_label(order: u32) -> String {
    format!("y{}", "'".repeat(order as usize))
}

pub fn initial_condition_label(order: u32) -> String {
    format!("{}(0)", derivative_label(order))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_use_one_prime_per_order() {
        assert_eq!(derivative_label(0), "y");
        assert_eq!(derivative_label(1), "y'");
        assert_eq!(derivative_label(2), "y''");
        assert_eq!(derivative_label(5), "y'''''");
        assert_eq!(initial_condition_label(0), "y(0)");
        assert_eq!(initial_condition_label(1), "y'(0)");
        assert_eq!(initial_condition_label(3), "y'''(0)");
    }

    #[test]
    fn field_names_round_trip_through_display() {
        let name = FieldName::coefficient(12);
        assert_eq!(name.to_string(), "coeff12");
        assert_eq!("coeff12".parse::<FieldName>().expect("parse"), name);
        assert_eq!(
            "ic0".parse::<FieldName>().expect("parse"),
            FieldName::initial_condition(0)
        );
    }

    #[test]
    fn rejects_unknown_field_names() {
        for raw in ["degree", "coeff", "ic-1", "coeffx", "solution", "ic 2"] {
            assert!(raw.parse::<FieldName>().is_err(), "{raw} should not parse");
        }
    }

    #[test]
    fn degree_rejects_zero() {
        assert!(Degree::new(0).is_none());
        assert_eq!(Degree::default().get(), DEFAULT_DEGREE);
        let degree = Degree::new(3).expect("degree");
        assert_eq!(degree.coefficient_count(), 4);
        assert_eq!(degree.initial_condition_count(), 3);
        assert!(serde_json::from_str::<Degree>("0").is_err());
    }
}
