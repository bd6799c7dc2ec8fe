//! Federative unit record and request payload validation
//!
//! The JSON and column names are Portuguese (`nome`, `sigla`,
//! `codigo_ibge`); the Rust fields are not.

use std::num::IntErrorKind;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::FromRow;

use super::validation::{messages, FieldErrors};

/// Maximum length for `nome`, matching the `VARCHAR(100)` column.
pub const MAX_NAME_LEN: usize = 100;

/// Exact length of `sigla`.
pub const ABBREVIATION_LEN: usize = 2;

pub const FIELD_NAME: &str = "nome";
pub const FIELD_ABBREVIATION: &str = "sigla";
pub const FIELD_IBGE_CODE: &str = "codigo_ibge";

/// Uppercase letters only (any script).
static UPPERCASE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\p{Lu}+$").expect("invalid uppercase regex"));

/// Trailing decimal zeros accepted on integer strings ("41.0").
static DECIMAL_ZEROS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.0*\s*$").expect("invalid decimal regex"));

/// A stored federative unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct FederativeUnit {
    pub id: i64,
    #[serde(rename = "nome")]
    #[sqlx(rename = "nome")]
    pub name: String,
    #[serde(rename = "sigla")]
    #[sqlx(rename = "sigla")]
    pub abbreviation: String,
    #[serde(rename = "codigo_ibge")]
    #[sqlx(rename = "codigo_ibge")]
    pub ibge_code: i32,
}

/// Validated values for an insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUf {
    pub name: String,
    pub abbreviation: String,
    pub ibge_code: i32,
}

/// Validated values for an update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UfChanges {
    pub name: Option<String>,
    pub abbreviation: Option<String>,
    pub ibge_code: Option<i32>,
}

impl UfChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.abbreviation.is_none() && self.ibge_code.is_none()
    }
}

impl From<NewUf> for UfChanges {
    fn from(new: NewUf) -> Self {
        Self {
            name: Some(new.name),
            abbreviation: Some(new.abbreviation),
            ibge_code: Some(new.ibge_code),
        }
    }
}

/// Raw request body, not yet validated.
#[derive(Debug, Clone, Default)]
pub struct UfPayload(Map<String, Value>);

impl UfPayload {
    /// Accept any JSON value; only objects are valid payloads.
    pub fn from_value(value: Value) -> Result<Self, FieldErrors> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(FieldErrors::non_field(messages::not_a_dict(
                json_type_name(&other),
            ))),
        }
    }

    /// Validate for create/PUT: every field is required.
    pub fn into_new(self) -> Result<NewUf, FieldErrors> {
        let changes = self.validate(true)?;
        match changes {
            UfChanges {
                name: Some(name),
                abbreviation: Some(abbreviation),
                ibge_code: Some(ibge_code),
            } => Ok(NewUf {
                name,
                abbreviation,
                ibge_code,
            }),
            _ => Err(FieldErrors::non_field(messages::REQUIRED)),
        }
    }

    /// Validate for PATCH: any subset of fields, including none.
    pub fn into_changes(self) -> Result<UfChanges, FieldErrors> {
        self.validate(false)
    }

    fn validate(self, require_all: bool) -> Result<UfChanges, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut changes = UfChanges::default();

        if let Some(value) = self.field(FIELD_NAME, require_all, &mut errors) {
            changes.name = validate_name(value, &mut errors);
        }
        if let Some(value) = self.field(FIELD_ABBREVIATION, require_all, &mut errors) {
            changes.abbreviation = validate_abbreviation(value, &mut errors);
        }
        if let Some(value) = self.field(FIELD_IBGE_CODE, require_all, &mut errors) {
            changes.ibge_code = validate_ibge_code(value, &mut errors);
        }

        errors.into_result(changes)
    }

    /// Present, non-null value for `name`, recording missing/null errors.
    fn field(
        &self,
        name: &'static str,
        required: bool,
        errors: &mut FieldErrors,
    ) -> Option<&Value> {
        match self.0.get(name) {
            None => {
                if required {
                    errors.add(name, messages::REQUIRED);
                }
                None
            }
            Some(Value::Null) => {
                errors.add(name, messages::NULL);
                None
            }
            Some(value) => Some(value),
        }
    }
}

fn validate_name(value: &Value, errors: &mut FieldErrors) -> Option<String> {
    let name = trimmed_string(FIELD_NAME, value, errors)?;
    if name.chars().count() > MAX_NAME_LEN {
        errors.add(FIELD_NAME, messages::max_length(MAX_NAME_LEN));
        return None;
    }
    Some(name)
}

fn validate_abbreviation(value: &Value, errors: &mut FieldErrors) -> Option<String> {
    let abbreviation = trimmed_string(FIELD_ABBREVIATION, value, errors)?;
    let len = abbreviation.chars().count();
    if len > ABBREVIATION_LEN {
        errors.add(FIELD_ABBREVIATION, messages::max_length(ABBREVIATION_LEN));
        return None;
    }
    if len < ABBREVIATION_LEN {
        errors.add(FIELD_ABBREVIATION, messages::min_length(ABBREVIATION_LEN));
        return None;
    }
    if !UPPERCASE_RE.is_match(&abbreviation) {
        errors.add(FIELD_ABBREVIATION, messages::SIGLA_FORMAT);
        return None;
    }
    Some(abbreviation)
}

fn validate_ibge_code(value: &Value, errors: &mut FieldErrors) -> Option<i32> {
    let Some(code) = parse_integer(value) else {
        errors.add(FIELD_IBGE_CODE, messages::INVALID_INTEGER);
        return None;
    };
    match i32::try_from(code) {
        Ok(code) => Some(code),
        Err(_) if code > 0 => {
            errors.add(FIELD_IBGE_CODE, messages::max_value(i32::MAX.into()));
            None
        }
        Err(_) => {
            errors.add(FIELD_IBGE_CODE, messages::min_value(i32::MIN.into()));
            None
        }
    }
}

fn trimmed_string(
    field: &'static str,
    value: &Value,
    errors: &mut FieldErrors,
) -> Option<String> {
    let Value::String(raw) = value else {
        errors.add(field, messages::INVALID_STRING);
        return None;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.add(field, messages::BLANK);
        return None;
    }
    // VARCHAR columns cannot hold NUL
    if trimmed.contains('\0') {
        errors.add(field, messages::NULL_CHARACTERS);
        return None;
    }
    Some(trimmed.to_owned())
}

/// Integers, integral floats and digit strings are all accepted.
///
/// Values beyond `i128` saturate, which is enough for the range check.
fn parse_integer(value: &Value) -> Option<i128> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i128)
            }),
        Value::String(s) => {
            let s = DECIMAL_ZEROS_RE.replace(s.trim(), "");
            match s.parse::<i128>() {
                Ok(n) => Some(n),
                Err(e) => match e.kind() {
                    IntErrorKind::PosOverflow => Some(i128::MAX),
                    IntErrorKind::NegOverflow => Some(i128::MIN),
                    _ => None,
                },
            }
        }
        _ => None,
    }
}

/// Type names as reported in the non-object body error.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
