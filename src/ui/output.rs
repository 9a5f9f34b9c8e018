use crate::error::{UserFriendlyError, VarThumbError};
use crate::extractor::RunSummary;
use crate::status::{Severity, StatusEvent, StatusSink};
use console::{style, Emoji, Term};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");

pub struct OutputFormatter {
    #[allow(dead_code)]
    term: Term,
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let term = Term::stdout();
        let use_colors = match mode {
            OutputMode::Human => term.features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            term,
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    // Core messaging methods
    pub fn success(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Success, message),
                OutputMode::Json => self.print_json_message("success", message),
                OutputMode::Plain => println!("SUCCESS: {}", message),
            }
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn warning(&self, message: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Warning, message),
                OutputMode::Json => self.print_json_message("warning", message),
                OutputMode::Plain => println!("WARNING: {}", message),
            }
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    /// Prints one core status event at the level its severity maps to.
    pub fn status(&self, event: &StatusEvent) {
        if self.mode == OutputMode::Json {
            let level = match event.severity() {
                Severity::Info => 1,
                _ => 0,
            };
            if event.severity() == Severity::Error || self.should_show_message(level) {
                self.print_json_object(&serde_json::json!({
                    "type": "status",
                    "event": event.kind(),
                    "level": severity_name(event.severity()),
                    "message": event.to_string(),
                    "timestamp": chrono::Utc::now().to_rfc3339()
                }));
            }
            return;
        }

        let message = event.to_string();
        match event.severity() {
            Severity::Info => self.info(&message),
            Severity::Success => self.success(&message),
            Severity::Warning => self.warning(&message),
            Severity::Error => self.error(&message),
        }
    }

    // User-friendly error handling
    pub fn print_user_friendly_error(&self, error: &VarThumbError) {
        let user_message = error.user_message();
        self.error(&user_message);

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    eprintln!();
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    // Summary and reporting
    pub fn print_run_summary(&self, summary: &RunSummary) {
        match self.mode {
            OutputMode::Json => self.print_json_summary(summary),
            _ if self.quiet => {}
            OutputMode::Human => self.print_human_summary(summary),
            OutputMode::Plain => self.print_plain_summary(summary),
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => {
                println!("{}", "-".repeat(60));
            }
            OutputMode::Json => {}
        }
    }

    // Private helper methods
    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Success => (CHECKMARK, Box::new(|msg| style(msg).green().bold())),
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Warning => (WARNING, Box::new(|msg| style(msg).yellow().bold())),
                MessageType::Info => (INFO, Box::new(|msg| style(msg).cyan())),
            };

        if self.use_colors {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, color_fn(message)),
                _ => println!("{}{}", emoji, color_fn(message)),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Warning => "!",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn highlight<T: ToString>(&self, value: T) -> String {
        if self.use_colors {
            style(value.to_string()).cyan().bold().to_string()
        } else {
            value.to_string()
        }
    }

    fn print_human_summary(&self, summary: &RunSummary) {
        println!();
        self.print_separator();

        if self.use_colors {
            println!(
                "{} {}",
                style("Thumbnail extraction completed!").green().bold(),
                CHECKMARK
            );
        } else {
            println!("✓ Thumbnail extraction completed!");
        }

        println!();
        println!(
            "  Archives processed: {}/{}",
            self.highlight(summary.archives_processed),
            summary.archives_found
        );
        println!(
            "  Thumbnails saved:   {}",
            self.highlight(summary.thumbnails_written)
        );
        println!(
            "  Bytes written:      {}",
            self.highlight(format_bytes(summary.bytes_written))
        );
        if !summary.montages.is_empty() {
            println!("  Montages created:   {}", self.highlight(summary.montages.len()));
        }
        println!(
            "  Time taken:         {}",
            self.highlight(format_duration(summary.elapsed()))
        );

        if !summary.errors.is_empty() {
            println!("  Errors:             {}", summary.errors.len());
            for error in &summary.errors {
                println!("    - {}", error);
            }
        }

        self.print_separator();
    }

    fn print_json_summary(&self, summary: &RunSummary) {
        let report = serde_json::json!({
            "type": "summary",
            "archives_found": summary.archives_found,
            "archives_processed": summary.archives_processed,
            "thumbnails_written": summary.thumbnails_written,
            "bytes_written": summary.bytes_written,
            "creators": summary.creators,
            "montages": summary.montages,
            "duration_ms": summary.elapsed().as_millis(),
            "errors": summary.errors,
            "timestamp": chrono::Utc::now().to_rfc3339()
        });

        println!(
            "{}",
            serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_plain_summary(&self, summary: &RunSummary) {
        println!("COMPLETED: Thumbnail extraction");
        println!(
            "Archives processed: {}/{}",
            summary.archives_processed, summary.archives_found
        );
        println!("Thumbnails saved: {}", summary.thumbnails_written);
        println!("Bytes written: {}", summary.bytes_written);
        println!("Montages created: {}", summary.montages.len());
        println!("Duration: {:?}", summary.elapsed());
        if !summary.errors.is_empty() {
            println!("Errors: {}", summary.errors.len());
        }
    }
}

fn severity_name(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "info",
        Severity::Success => "success",
        Severity::Warning => "warning",
        Severity::Error => "error",
    }
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Warning,
    Info,
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}s", secs)
    } else {
        format!("{}ms", duration.as_millis())
    }
}

/// Forwards status events to the formatter, pausing any live progress bars
/// while the line is printed.
pub struct FormatterSink<'a> {
    formatter: &'a OutputFormatter,
    progress_manager: Option<&'a crate::ui::ProgressManager>,
}

impl<'a> FormatterSink<'a> {
    pub fn new(
        formatter: &'a OutputFormatter,
        progress_manager: Option<&'a crate::ui::ProgressManager>,
    ) -> Self {
        Self {
            formatter,
            progress_manager,
        }
    }
}

impl StatusSink for FormatterSink<'_> {
    fn emit(&mut self, event: StatusEvent) {
        let formatter = self.formatter;
        match self.progress_manager {
            Some(pm) => pm.suspend(|| formatter.status(&event)),
            None => formatter.status(&event),
        }
    }
}
