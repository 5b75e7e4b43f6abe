//! Scan progress and export models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Progress fields of a scan document.
///
/// The server reports these as numbers or numeric strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanProgress {
    #[serde(default, deserialize_with = "int_or_string")]
    pub phase: i64,
    #[serde(default, deserialize_with = "int_or_string")]
    pub percent: i64,
}

impl ScanProgress {
    /// A scan is finished once it is back in phase 0 at 100 percent.
    pub fn is_finished(&self) -> bool {
        self.phase == 0 && self.percent == 100
    }
}

fn int_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        Float(f64),
        Str(String),
    }

    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(i) => Ok(i),
        IntOrString::Float(f) => Ok(f as i64),
        IntOrString::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Scan export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    JiraCsv,
    Pdf,
}

impl ExportFormat {
    /// Path segment of the export endpoint.
    pub fn path_segment(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csvs",
            ExportFormat::JiraCsv => "jiracsvs",
            ExportFormat::Pdf => "pdfs",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportFormat::Csv => "csv",
            ExportFormat::JiraCsv => "jira-csv",
            ExportFormat::Pdf => "pdf",
        };
        f.write_str(name)
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" | "csvs" => Ok(ExportFormat::Csv),
            "jira-csv" | "jiracsv" | "jiracsvs" => Ok(ExportFormat::JiraCsv),
            "pdf" | "pdfs" => Ok(ExportFormat::Pdf),
            other => Err(format!("unknown export format '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_from_numbers() {
        let progress: ScanProgress =
            serde_json::from_str(r#"{"id": 4, "phase": 0, "percent": 100}"#).unwrap();
        assert!(progress.is_finished());
    }

    #[test]
    fn test_progress_from_strings() {
        let progress: ScanProgress =
            serde_json::from_str(r#"{"phase": "3", "percent": "42"}"#).unwrap();
        assert_eq!(progress, ScanProgress { phase: 3, percent: 42 });
        assert!(!progress.is_finished());
    }

    #[test]
    fn test_progress_missing_fields_default() {
        let progress: ScanProgress = serde_json::from_str("{}").unwrap();
        assert_eq!(progress, ScanProgress::default());
        assert!(!progress.is_finished());
    }

    #[test]
    fn test_export_format_parse() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("JIRA-CSV".parse::<ExportFormat>().unwrap(), ExportFormat::JiraCsv);
        assert_eq!("pdfs".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert!("docx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_path_segments() {
        assert_eq!(ExportFormat::Csv.path_segment(), "csvs");
        assert_eq!(ExportFormat::JiraCsv.path_segment(), "jiracsvs");
        assert_eq!(ExportFormat::Pdf.path_segment(), "pdfs");
    }
}
