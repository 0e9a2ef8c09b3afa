//! Console output formatter for council results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use council_application::{
    ConsultationResult, DeliberationResult, EngineFailure, EngineSnapshot, FailureKind,
};
use council_domain::{EngineStatus, Insight};

/// Formats council results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Force colors off (e.g. `--no-color` or `[output] color = false`)
    pub fn set_color(enabled: bool) {
        if !enabled {
            colored::control::set_override(false);
        }
    }

    /// Format a single insight (direct engine invocation)
    pub fn format_insight(insight: &Insight) -> String {
        Self::insight_block(insight).trim_start().to_string()
    }

    /// Format the complete consultation result
    pub fn format(result: &ConsultationResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Engine Council Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n\n",
            "Question:".cyan().bold(),
            result.question
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Engines:".cyan().bold(),
            Self::list_or_none(&result.consulted)
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Strategy:".cyan().bold(),
            result.metadata.strategy
        ));

        output.push_str(&Self::section_header("Insights"));
        if result.insights.is_empty() {
            output.push_str(&format!("\n{}\n", "No insights were produced.".dimmed()));
        }
        for insight in &result.insights {
            output.push_str(&Self::insight_block(insight));
        }

        if !result.failures.is_empty() {
            output.push_str(&Self::section_header("Failures"));
            output.push_str(&Self::failures(&result.failures));
        }

        output.push_str(&Self::section_header("Synthesis"));
        match &result.synthesis {
            Some(synthesis) => output.push_str(&format!(
                "\n{}\n\n{}\n",
                format!("Confidence: {}", synthesis.confidence()).yellow().bold(),
                synthesis.content()
            )),
            None => output.push_str(&format!(
                "\n{}\n",
                result
                    .metadata
                    .note
                    .as_deref()
                    .unwrap_or("No synthesis.")
                    .dimmed()
            )),
        }

        output.push_str(&format!(
            "\n{}\n",
            format!(
                "{} succeeded, {} failed, {} timed out in {}ms",
                result.metadata.succeeded,
                result.metadata.failed,
                result.metadata.timed_out,
                result.metadata.elapsed_ms
            )
            .dimmed()
        ));

        output.push_str(&Self::footer());
        output
    }

    /// Format synthesis only (concise output)
    pub fn format_synthesis_only(result: &ConsultationResult) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Engine Council Conclusion ===".cyan().bold()
        ));
        output.push_str(&format!("{} {}\n\n", "Q:".bold(), result.question));
        output.push_str(&format!(
            "{} {}\n\n",
            "Engines consulted:".dimmed(),
            Self::list_or_none(&result.consulted)
        ));

        match &result.synthesis {
            Some(synthesis) => {
                output.push_str(synthesis.content());
                output.push_str(&format!(
                    "\n\n{} {}\n",
                    "Confidence:".dimmed(),
                    synthesis.confidence()
                ));
            }
            None => {
                output.push_str(
                    result
                        .metadata
                        .note
                        .as_deref()
                        .unwrap_or("No synthesis."),
                );
                output.push('\n');
            }
        }

        output
    }

    /// Format the complete deliberation result
    pub fn format_deliberation(result: &DeliberationResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Engine Council Deliberation"));
        output.push('\n');
        output.push_str(&format!(
            "{} {}\n",
            "Dilemma:".cyan().bold(),
            result.dilemma
        ));

        output.push_str(&Self::section_header("Positions"));
        if result.positions.is_empty() {
            output.push_str(&format!("\n{}\n", "No engine took a position.".dimmed()));
        }
        for position in &result.positions {
            output.push_str(&Self::insight_block(&position.insight));
        }

        output.push_str(&Self::section_header("Tensions"));
        if result.tensions.is_empty() {
            output.push_str(&format!("\n{}\n", "No tensions between traditions.".dimmed()));
        } else {
            output.push('\n');
            for tension in &result.tensions {
                output.push_str(&format!(
                    "  * {} ({} / {})\n",
                    tension.label().yellow(),
                    tension.first_engine,
                    tension.second_engine
                ));
            }
        }

        if !result.failures.is_empty() {
            output.push_str(&Self::section_header("Failures"));
            output.push_str(&Self::failures(&result.failures));
        }

        output.push_str(&Self::section_header("Recommendation"));
        output.push_str(&format!(
            "\n{}\n\n{}\n",
            format!("Confidence: {}", result.confidence).yellow().bold(),
            result
                .recommendation
                .as_ref()
                .map(Insight::content)
                .unwrap_or("No recommendation could be formed.")
        ));

        output.push_str(&Self::footer());
        output
    }

    /// Format the deliberation's recommendation only
    pub fn format_recommendation_only(result: &DeliberationResult) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Engine Council Recommendation ===".cyan().bold()
        ));
        output.push_str(&format!("{} {}\n\n", "Dilemma:".bold(), result.dilemma));
        output.push_str(&format!(
            "{} {}  {} {}\n\n",
            "Positions:".dimmed(),
            result.positions.len(),
            "Tensions:".dimmed(),
            result.tensions.len()
        ));
        output.push_str(
            result
                .recommendation
                .as_ref()
                .map(Insight::content)
                .unwrap_or("No recommendation could be formed."),
        );
        output.push_str(&format!(
            "\n\n{} {}\n",
            "Confidence:".dimmed(),
            result.confidence
        ));

        output
    }

    /// Engine table with status, domain and capabilities
    pub fn format_engines(engines: &[EngineSnapshot], load_order: &[String]) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Registered Engines"));
        output.push('\n');

        if engines.is_empty() {
            output.push_str(&format!("\n{}\n", "No engines registered.".dimmed()));
        }

        for snapshot in engines {
            let profile = &snapshot.profile;
            output.push_str(&format!(
                "\n{} {} {}\n",
                Self::status_badge(snapshot.status),
                profile.id().bold(),
                format!("({})", profile.name()).dimmed()
            ));
            output.push_str(&format!(
                "    domain: {}\n",
                profile.domain_labels().collect::<Vec<_>>().join(", ")
            ));
            output.push_str(&format!(
                "    capabilities: {}\n",
                profile.capabilities().join(", ")
            ));
            if let Some(tradition) = profile.tradition() {
                output.push_str(&format!("    tradition: {}\n", tradition));
            }
            if !profile.dependencies().is_empty() {
                output.push_str(&format!(
                    "    depends on: {}\n",
                    profile.dependencies().join(", ")
                ));
            }
            if snapshot.stats.invocations > 0 || snapshot.stats.failures > 0 {
                output.push_str(&format!(
                    "    invocations: {}  failures: {}  avg confidence: {:.3}\n",
                    snapshot.stats.invocations,
                    snapshot.stats.failures,
                    snapshot.stats.average_confidence()
                ));
            }
        }

        if !load_order.is_empty() {
            output.push_str(&format!(
                "\n{} {}\n",
                "Load order:".cyan().bold(),
                load_order.join(" -> ")
            ));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Engine snapshots and load order as JSON
    pub fn format_engines_json(engines: &[EngineSnapshot], load_order: &[String]) -> String {
        let value = serde_json::json!({
            "engines": engines,
            "load_order": load_order,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }

    fn insight_block(insight: &Insight) -> String {
        let mut block = format!(
            "\n{} {}\n{}\n",
            format!("── {} [{}] ──", insight.engine_id(), insight.perspective())
                .yellow()
                .bold(),
            format!("confidence {}", insight.confidence()).dimmed(),
            insight.content()
        );
        for reason in insight.reasoning() {
            block.push_str(&format!("  * {}\n", reason));
        }
        block
    }

    fn failures(failures: &[EngineFailure]) -> String {
        let mut output = String::from("\n");
        for failure in failures {
            let kind = match failure.kind {
                FailureKind::Timeout => "timeout".yellow(),
                FailureKind::Error => "error".red(),
                FailureKind::Panic => "panic".red().bold(),
            };
            output.push_str(&format!(
                "  {} {} {}\n",
                "x".red(),
                failure.engine_id.bold(),
                format!("[{}] {}", kind, failure.message)
            ));
        }
        output
    }

    fn status_badge(status: EngineStatus) -> String {
        let label = format!("[{:<10}]", status.as_str());
        match status {
            EngineStatus::Idle => label.green().to_string(),
            EngineStatus::Evaluating => label.cyan().to_string(),
            EngineStatus::Error => label.red().to_string(),
            EngineStatus::Disabled => label.dimmed().to_string(),
        }
    }

    fn list_or_none(items: &[String]) -> String {
        if items.is_empty() {
            "(none)".to_string()
        } else {
            items.join(", ")
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_consultation(&self, result: &ConsultationResult) -> String {
        Self::format(result)
    }

    fn format_consultation_synthesis(&self, result: &ConsultationResult) -> String {
        Self::format_synthesis_only(result)
    }

    fn format_deliberation(&self, result: &DeliberationResult) -> String {
        Self::format_deliberation(result)
    }

    fn format_deliberation_recommendation(&self, result: &DeliberationResult) -> String {
        Self::format_recommendation_only(result)
    }
}
