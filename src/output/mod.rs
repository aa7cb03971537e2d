//! Console reports for screening results

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScreenError;

pub mod report;

pub use report::ReportRenderer;

/// Report format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
    /// YAML
    Yaml,
}

impl FromStr for ReportFormat {
    type Err = ScreenError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "yaml" | "yml" => Ok(ReportFormat::Yaml),
            other => Err(ScreenError::configuration(format!(
                "invalid report format '{}'. Valid formats: text, json, yaml",
                other
            ))),
        }
    }
}
