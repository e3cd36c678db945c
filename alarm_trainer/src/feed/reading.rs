use std::fmt;

use serde_json::Value;

/// Amount of sensor channels in a feed entry.
pub const N_FIELDS: usize = 8;

/// Keys of the sensor channels, in feature order.
pub const FIELD_KEYS: [&str; N_FIELDS] = [
    "field1", "field2", "field3", "field4", "field5", "field6", "field7", "field8",
];

/// Why a feed entry could not be turned into a `Reading`.
#[derive(Debug, Clone, PartialEq)]
pub enum RowConversionError {
    /// The entry itself is not a JSON object.
    NotAnObject { found: &'static str },
    /// A field holds a string that does not parse as a float.
    NotNumeric { field: &'static str, value: String },
    /// A field holds a value that cannot be coerced into a float at all.
    WrongType {
        field: &'static str,
        found: &'static str,
    },
    /// A field holds a finite number too large for an `f32` feature.
    OutOfRange { field: &'static str, value: f64 },
}

impl fmt::Display for RowConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject { found } => write!(f, "expected an object, found {found}"),
            Self::NotNumeric { field, value } => {
                write!(f, "{field}: could not convert string to float: '{value}'")
            }
            Self::WrongType { field, found } => {
                write!(f, "{field}: expected a number or a numeric string, found {found}")
            }
            Self::OutOfRange { field, value } => {
                write!(f, "{field}: {value} does not fit in a 32-bit float")
            }
        }
    }
}

impl std::error::Error for RowConversionError {}

/// One timestep of the sensor feed: the eight channel values in field order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading([f32; N_FIELDS]);

impl Reading {
    pub fn new(values: [f32; N_FIELDS]) -> Self {
        Self(values)
    }

    /// Extracts a reading out of a feed entry.
    ///
    /// Missing fields read as `0.0`. Present fields must be numbers, numeric
    /// strings or booleans.
    ///
    /// # Errors
    /// Returns a `RowConversionError` for the first field that cannot be coerced,
    /// or if the entry is not an object.
    pub fn from_entry(entry: &Value) -> Result<Self, RowConversionError> {
        let object = entry.as_object().ok_or(RowConversionError::NotAnObject {
            found: type_name(entry),
        })?;

        let mut values = [0.0; N_FIELDS];
        for (value, field) in values.iter_mut().zip(FIELD_KEYS) {
            if let Some(raw) = object.get(field) {
                *value = coerce(field, raw)?;
            }
        }

        Ok(Self(values))
    }

    #[inline]
    pub fn values(&self) -> &[f32; N_FIELDS] {
        &self.0
    }

    /// Returns the value of channel `n`, counting from 1 like the field keys.
    ///
    /// # Panics
    /// If `n` is not in `1..=8`.
    #[inline]
    pub fn field(&self, n: usize) -> f32 {
        self.0[n - 1]
    }
}

fn coerce(field: &'static str, raw: &Value) -> Result<f32, RowConversionError> {
    let wide = match raw {
        Value::Number(n) => n.as_f64().ok_or(RowConversionError::WrongType {
            field,
            found: "an unrepresentable number",
        })?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| RowConversionError::NotNumeric {
                field,
                value: s.clone(),
            })?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        other => {
            return Err(RowConversionError::WrongType {
                field,
                found: type_name(other),
            });
        }
    };

    narrow(field, wide)
}

/// Converts to `f32`, rejecting finite values that would overflow to infinity.
fn narrow(field: &'static str, value: f64) -> Result<f32, RowConversionError> {
    let narrowed = value as f32;
    if value.is_finite() && !narrowed.is_finite() {
        return Err(RowConversionError::OutOfRange { field, value });
    }

    Ok(narrowed)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
