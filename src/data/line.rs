//! Decoding of `label: value` lines received from the sample endpoint.
//!
//! The firmware prints lines such as `(10342) hx711: -81234`. Anything that
//! does not split into exactly two parts on `:` is not a measurement (prompts,
//! help text, command echoes) and is skipped without comment.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Numeric base of the value field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    /// Signed base-10 integer (what the firmware's `%ld` produces).
    #[default]
    Decimal,
    /// Hexadecimal digits with an optional `0x`/`0X` prefix and optional sign.
    Hex,
}

/// A decoded measurement line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    pub label: String,
    pub value: i64,
}

/// Why a value field could not be turned into a sample.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error(transparent)]
    Parse(#[from] std::num::ParseIntError),
    #[error("sign must come before the digits and appear once")]
    MisplacedSign,
    #[error("value does not fit in 64 bits")]
    OutOfRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("empty value field after label {label:?}")]
    EmptyValue { label: String },
    #[error("invalid {format:?} value {value:?}: {source}")]
    InvalidValue {
        value: String,
        format: ValueFormat,
        #[source]
        source: ValueError,
    },
}

/// Split a line into `(label, value)` on `:`, requiring exactly one colon.
pub fn split_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let mut parts = line.split(':');
    let label = parts.next()?;
    let value = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((label.trim(), value.trim()))
}

/// Parse a value field in the given base.
pub fn parse_value(field: &str, format: ValueFormat) -> Result<i64, ValueError> {
    match format {
        ValueFormat::Decimal => Ok(field.parse::<i64>()?),
        ValueFormat::Hex => {
            let (negative, digits) = match field.strip_prefix('-') {
                Some(rest) => (true, rest),
                None => (false, field.strip_prefix('+').unwrap_or(field)),
            };
            let digits = digits
                .strip_prefix("0x")
                .or_else(|| digits.strip_prefix("0X"))
                .unwrap_or(digits);
            // from_str_radix accepts a sign of its own.
            if digits.starts_with(['+', '-']) {
                return Err(ValueError::MisplacedSign);
            }
            let v = i64::from_str_radix(digits, 16)?;
            if negative {
                v.checked_neg().ok_or(ValueError::OutOfRange)
            } else {
                Ok(v)
            }
        }
    }
}

/// Interpret the low 24 bits of `raw` as a two's complement number.
pub fn sign_extend_24(raw: i64) -> i64 {
    let v = raw & 0xFF_FFFF;
    if v >= 0x80_0000 {
        v - 0x100_0000
    } else {
        v
    }
}

/// Decoder settings applied to every received line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineDecoder {
    pub format: ValueFormat,
    pub sign_extend_24: bool,
}

impl LineDecoder {
    pub fn new(format: ValueFormat, sign_extend_24: bool) -> Self {
        Self {
            format,
            sign_extend_24,
        }
    }

    /// `Ok(None)` for lines that are not measurements, `Err` for measurement
    /// lines whose value does not parse.
    pub fn decode(&self, line: &str) -> Result<Option<Reading>, LineError> {
        let Some((label, field)) = split_line(line) else {
            return Ok(None);
        };
        if field.is_empty() {
            return Err(LineError::EmptyValue {
                label: label.to_string(),
            });
        }
        let mut value =
            parse_value(field, self.format).map_err(|source| LineError::InvalidValue {
                value: field.to_string(),
                format: self.format,
                source,
            })?;
        if self.sign_extend_24 && self.format == ValueFormat::Hex {
            value = sign_extend_24(value);
        }
        Ok(Some(Reading {
            label: label.to_string(),
            value,
        }))
    }
}

/// Decode one line in `format`, without sign extension.
pub fn decode_line(line: &str, format: ValueFormat) -> Result<Option<Reading>, LineError> {
    LineDecoder::new(format, false).decode(line)
}
