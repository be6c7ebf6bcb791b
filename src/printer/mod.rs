//! Printers for parsed R output: one value per line, or JSON.

use std::io::{self, Write};

use owo_colors::OwoColorize;

use rbridge::parser::{ParsedOutput, ParsedValue};

pub struct TextPrinter {
    /// Highlight `NA`/`NaN` markers.
    pub color: bool,
}

impl TextPrinter {
    pub fn print(&self, output: &ParsedOutput) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        for v in output.values() {
            writeln!(lock, "{}", self.render(v))?;
        }
        Ok(())
    }

    pub fn render(&self, value: &ParsedValue) -> String {
        match value {
            ParsedValue::Str(s) => s.clone(),
            ParsedValue::Number(n) => n.to_string(),
            ParsedValue::Missing if self.color => format!("{}", "NA".yellow()),
            ParsedValue::Missing => "NA".to_string(),
            ParsedValue::NaN if self.color => format!("{}", "NaN".magenta()),
            ParsedValue::NaN => "NaN".to_string(),
            ParsedValue::Structured(v) => {
                serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
            }
        }
    }
}

pub struct JsonPrinter;

impl JsonPrinter {
    pub fn print(&self, output: &ParsedOutput) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(output)?);
        Ok(())
    }
}
