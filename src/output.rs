//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use serde_json::Value;
use tabled::builder::Builder;

use crate::{ScanProgress, Status};

/// Column values longer than this are shortened in tables.
const MAX_CELL_WIDTH: usize = 48;

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for Value {
    fn pretty_print(&self) -> String {
        match self {
            Value::Array(items) if items.iter().all(Value::is_object) && !items.is_empty() => {
                render_table(items)
            }
            Value::Array(items) if items.is_empty() => "(no results)".to_string(),
            Value::Object(map) => {
                let width = map.keys().map(String::len).max().unwrap_or(0);
                map.iter()
                    .map(|(key, value)| format!("{key:<width$}  {}", cell(value)))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            other => cell(other),
        }
    }
}

impl PrettyPrint for Status {
    fn pretty_print(&self) -> String {
        let mut lines = vec!["RIPS status".to_string(), "─".repeat(30)];

        if let Some(ref version) = self.version {
            lines.push(format!("Version:        {}", version));
        }

        match self.user.as_ref().filter(|u| !u.is_null()) {
            Some(user) => {
                let name = user
                    .get("username")
                    .or_else(|| user.get("email"))
                    .map(cell)
                    .unwrap_or_else(|| cell(user));
                lines.push(format!("Logged in as:   {}", name));
            }
            None => lines.push("Logged in:      no".to_string()),
        }

        lines.join("\n")
    }
}

impl PrettyPrint for ScanProgress {
    fn pretty_print(&self) -> String {
        let state = if self.is_finished() { "finished" } else { "running" };
        format!("Phase {} at {}% ({})", self.phase, self.percent, state)
    }
}

/// Render an array of objects with one column per key of the first object.
fn render_table(items: &[Value]) -> String {
    let columns: Vec<String> = items
        .first()
        .and_then(Value::as_object)
        .map(|first| {
            first
                .iter()
                .filter(|(_, v)| !v.is_object() && !v.is_array())
                .map(|(k, _)| k.clone())
                .collect()
        })
        .unwrap_or_default();

    let mut builder = Builder::default();
    builder.push_record(columns.clone());
    for item in items {
        builder.push_record(
            columns
                .iter()
                .map(|column| item.get(column).map(cell).unwrap_or_default()),
        );
    }

    let mut out = builder.build().to_string();
    out.push_str(&format!("\n{} item(s)", items.len()));
    out
}

fn cell(value: &Value) -> String {
    let text = match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    if text.chars().count() > MAX_CELL_WIDTH {
        let short: String = text.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{short}…")
    } else {
        text
    }
}
