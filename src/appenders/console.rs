//! Console appender implementation

use crate::core::{Appender, LogLevel, LogRecord, OutputFormat, Result};
use colored::Colorize;

pub struct ConsoleAppender {
    use_colors: bool,
    output_format: OutputFormat,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            output_format: OutputFormat::default(),
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            output_format: OutputFormat::default(),
        }
    }

    /// Set the output format for this appender
    ///
    /// # Example
    ///
    /// ```
    /// use rust_hook_logger::appenders::ConsoleAppender;
    /// use rust_hook_logger::OutputFormat;
    ///
    /// let appender = ConsoleAppender::new()
    ///     .with_output_format(OutputFormat::Json);
    /// ```
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Format as text with optional colors
    fn format_text(&self, record: &LogRecord) -> String {
        if !self.use_colors {
            return OutputFormat::Text.format(record);
        }

        let level_str = format!("{:5}", record.level.to_str())
            .color(record.level.color_code())
            .to_string();
        OutputFormat::text_line(record, &level_str)
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, record: &LogRecord) -> Result<()> {
        let output = match self.output_format {
            OutputFormat::Text => self.format_text(record),
            OutputFormat::Json => self.output_format.format(record),
        };

        // Error and above go to stderr, everything else to stdout
        if record.level >= LogLevel::Error {
            eprintln!("{}", output);
        } else {
            println!("{}", output);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        use std::io::Write;
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
