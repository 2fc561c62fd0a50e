use std::fmt;

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::{
    domain::{FieldKind, FieldName},
    error::ProtocolError,
};

/// Flat `name -> value` body posted to the solve endpoint.
///
/// Entries keep insertion order so the JSON object lists `degree`, then the
/// coefficients from the highest order down, then the initial conditions in
/// ascending order, exactly as the form lays them out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolveRequest {
    entries: Vec<(String, String)>,
}

impl SolveRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field, replacing the value in place when the name is already present.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Values of every `coeff<i>`/`ic<i>` entry of the given kind, keyed by order.
    /// Entries that are not generated field names (such as `degree`) are skipped.
    pub fn orders_of(&self, kind: FieldKind) -> Vec<(u32, &str)> {
        let mut found: Vec<(u32, &str)> = self
            .iter()
            .filter_map(|(name, value)| {
                let parsed = name.parse::<FieldName>().ok()?;
                (parsed.kind == kind).then_some((parsed.order, value))
            })
            .collect();
        found.sort_by_key(|(order, _)| *order);
        found
    }
}

impl Serialize for SolveRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SolveRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RequestVisitor;

        impl<'de> Visitor<'de> for RequestVisitor {
            type Value = SolveRequest;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a flat object of string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut request = SolveRequest::new();
                while let Some((name, value)) = access.next_entry::<String, String>()? {
                    request.insert(name, value);
                }
                Ok(request)
            }
        }

        deserializer.deserialize_map(RequestVisitor)
    }
}

/// Body returned by the solve endpoint. The presence of `error` alone decides
/// between the failure and success shapes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SolveResponse {
    pub fn solved(latex: impl Into<String>, plain: impl Into<String>) -> Self {
        Self {
            latex: Some(latex.into()),
            plain: Some(plain.into()),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn into_outcome(self) -> Result<SolveOutcome, ProtocolError> {
        if let Some(message) = self.error {
            return Ok(SolveOutcome::Rejected { message });
        }
        let latex = self
            .latex
            .ok_or(ProtocolError::MissingSolutionField("latex"))?;
        let plain = self
            .plain
            .ok_or(ProtocolError::MissingSolutionField("plain"))?;
        Ok(SolveOutcome::Solved { latex, plain })
    }
}

/// A well-formed answer from the solve endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    Solved { latex: String, plain: String },
    Rejected { message: String },
}
