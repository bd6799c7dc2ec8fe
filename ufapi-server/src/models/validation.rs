//! Validation error report
//!
//! Errors are grouped per field, in the order the fields were checked,
//! and serialize as `{"field": ["message", ...]}`.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// User-facing validation messages.
pub mod messages {
    pub const REQUIRED: &str = "Este campo é obrigatório.";
    pub const NULL: &str = "Este campo não pode ser nulo.";
    pub const BLANK: &str = "Este campo não pode ser em branco.";
    pub const INVALID_STRING: &str = "Não é uma string válida.";
    pub const NULL_CHARACTERS: &str = "Caracteres nulos não são permitidos.";
    pub const INVALID_INTEGER: &str = "Um número inteiro válido é exigido.";
    pub const SIGLA_FORMAT: &str = "Sigla deve conter apenas 2 letras maiúsculas.";

    pub fn max_length(max: usize) -> String {
        format!("Certifique-se de que este campo não tenha mais de {max} caracteres.")
    }

    pub fn min_length(min: usize) -> String {
        format!("Certifique-se de que este campo tenha mais de {min} caracteres.")
    }

    pub fn max_value(max: i64) -> String {
        format!("Certifique-se de que este valor seja inferior ou igual a {max}.")
    }

    pub fn min_value(min: i64) -> String {
        format!("Certifique-se de que este valor seja superior ou igual a {min}.")
    }

    pub fn not_a_dict(received: &str) -> String {
        format!("Dados inválidos. Esperado um dicionário, mas recebido {received}.")
    }
}

/// Key used for errors that don't belong to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Per-field validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    fields: Vec<(&'static str, Vec<String>)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report with a single error not tied to any field.
    pub fn non_field(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(NON_FIELD_ERRORS, message);
        errors
    }

    /// Append a message for `field`, keeping first-seen field order.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        let message = message.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, list)) => list.push(message),
            None => self.fields.push((field, vec![message])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, list)| list.as_slice())
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    /// `Ok(value)` when no error was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, list) in &self.fields {
            map.serialize_entry(name, list)?;
        }
        map.end()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, list) in &self.fields {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            write!(f, "{}: {}", name, list.join(" "))?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}
