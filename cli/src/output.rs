//! Text / JSON rendering of command results

use anyhow::Result;
use colored::Colorize;
use serde_json::{Map, Value};

/// Ordered label/value rows with optional warnings
#[derive(Debug, Clone)]
pub struct Report {
    title: &'static str,
    rows: Vec<(&'static str, String)>,
    notes: Vec<String>,
}

impl Report {
    pub fn new(title: &'static str) -> Self {
        Self {
            title,
            rows: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn row(mut self, label: &'static str, value: impl ToString) -> Self {
        self.rows.push((label, value.to_string()));
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        for (label, value) in &self.rows {
            object.insert(json_key(label), Value::String(value.clone()));
        }
        if !self.notes.is_empty() {
            object.insert(
                "notes".to_string(),
                Value::Array(self.notes.iter().cloned().map(Value::String).collect()),
            );
        }
        Value::Object(object)
    }

    /// Text for a terminal, or pretty JSON with nothing else on stdout
    pub fn render(&self, json: bool) -> Result<String> {
        if json {
            return Ok(serde_json::to_string_pretty(&self.to_json())?);
        }

        let mut lines = vec![format!("=== {} ===", self.title).bright_green().bold().to_string()];
        for (label, value) in &self.rows {
            lines.push(format!("{} {}", format!("{}:", label).bright_cyan(), value));
        }
        for note in &self.notes {
            lines.push(format!("\n{} {}", "⚠️".yellow(), note.yellow()));
        }
        Ok(lines.join("\n"))
    }

    pub fn print(&self, json: bool) -> Result<()> {
        println!("{}", self.render(json)?);
        Ok(())
    }
}

/// "Shares out (YES)" -> "shares_out_yes"
fn json_key(label: &str) -> String {
    let mut key = String::with_capacity(label.len());
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            key.push(c.to_ascii_lowercase());
        } else if !key.is_empty() && !key.ends_with('_') {
            key.push('_');
        }
    }
    key.trim_end_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_key() {
        assert_eq!(json_key("Shares out (YES)"), "shares_out_yes");
        assert_eq!(json_key("Fee (bps)"), "fee_bps");
        assert_eq!(json_key("Outcome"), "outcome");
    }

    #[test]
    fn test_to_json() {
        let report = Report::new("Quote")
            .row("Amount in", "100")
            .note("pool is empty");
        let json = report.to_json();
        assert_eq!(json["amount_in"], "100");
        assert_eq!(json["notes"][0], "pool is empty");
    }

    #[test]
    fn test_render_json_is_only_json() {
        let report = Report::new("Buy Quote")
            .row("Shares out (YES)", "90")
            .note("Pool is not seeded; first trade fills 1:1");
        let rendered = report.render(true).unwrap();
        let parsed: Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["shares_out_yes"], "90");
        assert!(!rendered.contains("==="));
    }

    #[test]
    fn test_render_text() {
        colored::control::set_override(false);
        let rendered = Report::new("Price").row("YES", "0.75").render(false).unwrap();
        assert_eq!(rendered, "=== Price ===\nYES: 0.75");
    }
}
