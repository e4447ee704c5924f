//! Page margin normalization
//!
//! Margins arrive as `<number><unit>` with unit `in`, `mm` or `cm` and are
//! stored in inches, the only unit handed to the renderer.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

static RE_MARGIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*([\d.]+)(in|mm|cm)\s*$").unwrap());

const MM_PER_INCH: f64 = 25.4;
const CM_PER_INCH: f64 = 2.54;

const EXPECTED_FORMAT: &str = "expected a number followed by in, mm or cm (e.g. '10mm')";

/// A margin in canonical inch form, e.g. `0.394in`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Margin(String);

impl Margin {
    /// Parse and normalize a margin string for the named option field
    pub fn parse(field: &str, input: &str) -> Result<Self> {
        let caps = RE_MARGIN.captures(input).ok_or_else(|| {
            AppError::validation(field, format!("{}, got '{}'", EXPECTED_FORMAT, input))
        })?;

        let number = &caps[1];
        let value: f64 = number.parse().map_err(|_| {
            AppError::validation(
                field,
                format!("malformed number '{}' in '{}', {}", number, input, EXPECTED_FORMAT),
            )
        })?;
        if !value.is_finite() {
            return Err(AppError::validation(
                field,
                format!("number '{}' is out of range, {}", number, EXPECTED_FORMAT),
            ));
        }

        let canonical = match caps[2].to_ascii_lowercase().as_str() {
            "in" => format!("{}in", number),
            "mm" => format!("{:.3}in", value / MM_PER_INCH),
            "cm" => format!("{:.3}in", value / CM_PER_INCH),
            _ => unreachable!("unit is constrained by the regex"),
        };

        Ok(Margin(canonical))
    }

    /// Build a margin from a bare number, taken as inches
    pub fn from_inches(field: &str, value: f64) -> Result<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(AppError::validation(
                field,
                format!("{}, got {}", EXPECTED_FORMAT, value),
            ));
        }
        Ok(Margin(format!("{}in", value)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Margin {
    fn default() -> Self {
        Margin("0.56in".to_string())
    }
}

impl fmt::Display for Margin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Margin as submitted on the wire
///
/// Strings carry a unit and are converted. JSON numbers have no unit and are
/// passed through as inches.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MarginInput {
    Text(String),
    Number(f64),
}

impl MarginInput {
    pub fn normalize(&self, field: &str) -> Result<Margin> {
        match self {
            MarginInput::Text(s) => Margin::parse(field, s),
            MarginInput::Number(n) => Margin::from_inches(field, *n),
        }
    }
}
