//! Output formatter trait

use crate::cli::commands::OutputFormat;
use council_application::{ConsultationResult, DeliberationResult};
use serde::Serialize;

/// Trait for formatting council results
pub trait OutputFormatter {
    /// Format the complete consultation result
    fn format_consultation(&self, result: &ConsultationResult) -> String;

    /// Format the consultation's synthesis only (concise output)
    fn format_consultation_synthesis(&self, result: &ConsultationResult) -> String;

    /// Format the complete deliberation result
    fn format_deliberation(&self, result: &DeliberationResult) -> String;

    /// Format the deliberation's recommendation only
    fn format_deliberation_recommendation(&self, result: &DeliberationResult) -> String;

    /// Format any result as JSON
    fn format_json<T: Serialize>(&self, value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn render_consultation(&self, result: &ConsultationResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format_consultation(result),
            OutputFormat::Synthesis => self.format_consultation_synthesis(result),
            OutputFormat::Json => self.format_json(result),
        }
    }

    fn render_deliberation(&self, result: &DeliberationResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format_deliberation(result),
            OutputFormat::Synthesis => self.format_deliberation_recommendation(result),
            OutputFormat::Json => self.format_json(result),
        }
    }
}
