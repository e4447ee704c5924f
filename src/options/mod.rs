//! PDF layout options
//!
//! [`PdfOptions`] is the fully resolved set of renderer settings for one
//! render. It is built by layering [`OptionsPatch`] values, each of which
//! may come from the stored defaults, the query string or a JSON body.

mod margin;

pub use margin::{Margin, MarginInput};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl FromStr for Orientation {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            _ => Err(AppError::validation(
                "orientation",
                format!("expected 'Portrait' or 'Landscape', got '{}'", s),
            )),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Portrait => f.write_str("Portrait"),
            Orientation::Landscape => f.write_str("Landscape"),
        }
    }
}

/// Fully resolved renderer options
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PdfOptions {
    pub page_size: String,
    pub margin_top: Margin,
    pub margin_bottom: Margin,
    pub margin_left: Margin,
    pub margin_right: Margin,
    pub background: bool,
    pub encoding: String,
    pub orientation: Orientation,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            page_size: "Letter".to_string(),
            margin_top: Margin::default(),
            margin_bottom: Margin::default(),
            margin_left: Margin::default(),
            margin_right: Margin::default(),
            background: true,
            encoding: "UTF-8".to_string(),
            orientation: Orientation::Portrait,
        }
    }
}

/// Boolean as submitted on the wire
///
/// Query strings carry every value as text, so `background=false` arrives as
/// a string while JSON bodies send a real boolean.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FlagInput {
    Bool(bool),
    Text(String),
}

impl FlagInput {
    fn to_bool(&self, field: &str) -> Result<bool> {
        match self {
            FlagInput::Bool(b) => Ok(*b),
            FlagInput::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(true),
                "false" | "0" | "no" | "off" => Ok(false),
                _ => Err(AppError::validation(
                    field,
                    format!("expected a boolean, got '{}'", s),
                )),
            },
        }
    }
}

/// One layer of partially specified options
///
/// Field names are accepted in snake_case and hyphenated form. Unknown
/// fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OptionsPatch {
    #[serde(alias = "page-size")]
    pub page_size: Option<String>,
    #[serde(alias = "margin-top")]
    pub margin_top: Option<MarginInput>,
    #[serde(alias = "margin-bottom")]
    pub margin_bottom: Option<MarginInput>,
    #[serde(alias = "margin-left")]
    pub margin_left: Option<MarginInput>,
    #[serde(alias = "margin-right")]
    pub margin_right: Option<MarginInput>,
    pub background: Option<FlagInput>,
    pub encoding: Option<String>,
    pub orientation: Option<String>,
}

impl OptionsPatch {
    pub fn is_empty(&self) -> bool {
        *self == OptionsPatch::default()
    }
}

impl PdfOptions {
    /// Overlay a patch, validating every field it sets
    pub fn apply(mut self, patch: &OptionsPatch) -> Result<Self> {
        if let Some(page_size) = &patch.page_size {
            self.page_size = non_empty("page_size", page_size)?;
        }
        if let Some(m) = &patch.margin_top {
            self.margin_top = m.normalize("margin_top")?;
        }
        if let Some(m) = &patch.margin_bottom {
            self.margin_bottom = m.normalize("margin_bottom")?;
        }
        if let Some(m) = &patch.margin_left {
            self.margin_left = m.normalize("margin_left")?;
        }
        if let Some(m) = &patch.margin_right {
            self.margin_right = m.normalize("margin_right")?;
        }
        if let Some(flag) = &patch.background {
            self.background = flag.to_bool("background")?;
        }
        if let Some(encoding) = &patch.encoding {
            self.encoding = non_empty("encoding", encoding)?;
        }
        if let Some(orientation) = &patch.orientation {
            self.orientation = orientation.parse()?;
        }
        Ok(self)
    }

    /// Resolve the options for one render
    ///
    /// Body options win over query options, which win over the defaults.
    pub fn resolve(
        defaults: &PdfOptions,
        query: Option<&OptionsPatch>,
        body: Option<&OptionsPatch>,
    ) -> Result<Self> {
        let mut options = defaults.clone();
        for patch in [query, body].into_iter().flatten() {
            options = options.apply(patch)?;
        }
        Ok(options)
    }
}

fn non_empty(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(field, "must not be empty"));
    }
    Ok(trimmed.to_string())
}
