use clap::ValueEnum;
use owo_colors::OwoColorize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

/// User-facing messages and data, as text or JSON lines
pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if !self.quiet {
            self.message("success", &format!("{} {}", "✓".green(), msg.as_ref()), msg.as_ref(), false);
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if !self.quiet {
            self.message("info", msg.as_ref(), msg.as_ref(), false);
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if !self.quiet {
            self.message("warning", &format!("{} {}", "⚠".yellow(), msg.as_ref()), msg.as_ref(), false);
        }
    }

    /// Errors are shown even in quiet mode
    pub fn error(&self, msg: impl AsRef<str>) {
        self.message("error", &format!("{} {}", "✗".red(), msg.as_ref()), msg.as_ref(), true);
    }

    /// Structured payload; human mode prints it as pretty JSON
    pub fn json(&self, data: &Value) {
        if self.quiet && self.is_human() {
            return;
        }
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string(data).unwrap_or_default()),
            OutputFormat::JsonPretty | OutputFormat::Human => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default())
            }
        }
    }

    /// Pre-rendered text (tables); suppressed outside human mode
    pub fn render(&self, text: impl std::fmt::Display) {
        if !self.quiet && self.is_human() {
            println!("{}", text);
        }
    }

    fn message(&self, kind: &str, human: &str, plain: &str, to_stderr: bool) {
        match self.format {
            OutputFormat::Human if to_stderr => eprintln!("{}", human),
            OutputFormat::Human => println!("{}", human),
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.json(&json!({ "type": kind, "message": plain }));
            }
        }
    }
}
