//! Degree-driven form generation.
//!
//! The field set is always rebuilt from scratch for the effective degree: no
//! field (and no value) from a previous degree survives a regeneration.

use shared::{
    domain::{Degree, FieldName, DEGREE_FIELD},
    protocol::SolveRequest,
};
use tracing::debug;

use crate::error::FormError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: FieldName,
    pub label: String,
    pub value: String,
    pub required: bool,
}

impl Field {
    fn generated(name: FieldName) -> Self {
        Self {
            label: name.kind.label(name.order),
            value: name.kind.default_value().to_string(),
            required: true,
            name,
        }
    }

    pub fn wire_name(&self) -> String {
        self.name.to_string()
    }

    /// Whitespace-only input does not satisfy the required constraint.
    pub fn is_missing(&self) -> bool {
        self.required && self.value.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet {
    degree: Degree,
    equation: Vec<Field>,
    initial_conditions: Vec<Field>,
}

impl FieldSet {
    pub fn generate(degree: Degree) -> Self {
        let equation = (0..=degree.get())
            .rev()
            .map(|order| Field::generated(FieldName::coefficient(order)))
            .collect();
        let initial_conditions = (0..degree.get())
            .map(|order| Field::generated(FieldName::initial_condition(order)))
            .collect();
        Self {
            degree,
            equation,
            initial_conditions,
        }
    }

    pub fn degree(&self) -> Degree {
        self.degree
    }

    /// Coefficient fields, highest order first.
    pub fn equation(&self) -> &[Field] {
        &self.equation
    }

    /// Initial-condition fields, `y(0)` first.
    pub fn initial_conditions(&self) -> &[Field] {
        &self.initial_conditions
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.equation.iter().chain(self.initial_conditions.iter())
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields().map(Field::wire_name).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields().find(|field| field.wire_name() == name)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Field> {
        self.equation
            .iter_mut()
            .chain(self.initial_conditions.iter_mut())
            .find(|field| field.wire_name() == name)
    }

    /// The equation row as one line, e.g. `[1] y'' + [0] y' + [1] y = 0`.
    pub fn equation_text(&self) -> String {
        let terms: Vec<String> = self
            .equation
            .iter()
            .map(|field| format!("[{}] {}", field.value, field.label))
            .collect();
        format!("{} = 0", terms.join(" + "))
    }
}

/// Reads the degree control the way a browser `parseInt` would: surrounding
/// whitespace is ignored and trailing garbage after the leading digits is
/// dropped (`"3.5"` is 3). Returns `None` when no usable degree is present.
pub fn normalize_degree(raw: &str) -> Option<Degree> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digit_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digit_len == 0 || negative {
        return None;
    }
    let value = rest[..digit_len].parse::<u32>().ok()?;
    Degree::new(value)
}

/// Live form: the degree control plus the fields generated for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    degree_input: String,
    fields: FieldSet,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    /// Builds the form for the default degree, as on first load.
    pub fn new() -> Self {
        Self::with_degree_input(Degree::default().to_string())
    }

    pub fn with_degree_input(raw: impl Into<String>) -> Self {
        let mut form = Self {
            degree_input: raw.into(),
            fields: FieldSet::generate(Degree::default()),
        };
        form.regenerate();
        form
    }

    pub fn degree_input(&self) -> &str {
        &self.degree_input
    }

    pub fn degree(&self) -> Degree {
        self.fields.degree()
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// Handles a change of the degree control.
    pub fn set_degree_input(&mut self, raw: impl Into<String>) -> Degree {
        self.degree_input = raw.into();
        self.regenerate()
    }

    /// Normalizes the degree control, writes the effective degree back into it
    /// and replaces every field.
    pub fn regenerate(&mut self) -> Degree {
        let degree = normalize_degree(&self.degree_input).unwrap_or_else(|| {
            debug!(
                raw = %self.degree_input,
                fallback = %Degree::default(),
                "degree input unusable; falling back to default"
            );
            Degree::default()
        });
        self.degree_input = degree.to_string();
        self.fields = FieldSet::generate(degree);
        debug!(
            degree = degree.get(),
            fields = self.fields.fields().count(),
            "regenerated equation fields"
        );
        degree
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|field| field.value.as_str())
    }

    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> Result<(), FormError> {
        let field = self
            .fields
            .get_mut(name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        field.value = value.into();
        Ok(())
    }

    /// Lets a front end bind an input widget straight to one field's value.
    pub fn value_mut(&mut self, name: &str) -> Option<&mut String> {
        self.fields.get_mut(name).map(|field| &mut field.value)
    }

    /// Collects the request body from whatever fields are currently generated.
    pub fn submission(&self) -> Result<SolveRequest, FormError> {
        if let Some(missing) = self.fields.fields().find(|field| field.is_missing()) {
            return Err(FormError::MissingRequiredField {
                name: missing.wire_name(),
                label: missing.label.clone(),
            });
        }

        let mut request = SolveRequest::new();
        request.insert(DEGREE_FIELD, self.degree_input.clone());
        for field in self.fields.fields() {
            request.insert(field.wire_name(), field.value.clone());
        }
        Ok(request)
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
