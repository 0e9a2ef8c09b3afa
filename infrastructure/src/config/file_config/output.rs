//! `[output]` section: how results are rendered when the CLI gives no flag

use council_domain::OutputFormat;
use serde::{Deserialize, Serialize};

/// Rendering defaults for consultation and deliberation results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Result format when `--output` is absent (synthesis-only if unset)
    pub format: Option<OutputFormat>,
    /// Colored terminal output; `--no-color` always wins
    pub color: bool,
}

impl FileOutputConfig {
    /// Format to render with, preferring the command-line choice
    pub fn resolve_format(&self, requested: Option<OutputFormat>) -> OutputFormat {
        requested.or(self.format).unwrap_or_default()
    }

    /// Whether to color output given the `--no-color` flag
    pub fn use_color(&self, no_color: bool) -> bool {
        self.color && !no_color
    }
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileConfig;

    #[test]
    fn test_output_section_sets_rendering_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
[output]
format = "full"
color = false
"#,
        )
        .unwrap();

        assert_eq!(config.output.format, Some(OutputFormat::Full));
        assert!(!config.output.use_color(false));
        assert_eq!(config.output.resolve_format(None), OutputFormat::Full);
        assert_eq!(
            config.output.resolve_format(Some(OutputFormat::Json)),
            OutputFormat::Json
        );
    }

    #[test]
    fn test_unset_format_falls_back_to_synthesis() {
        let output = FileOutputConfig::default();
        assert_eq!(output.resolve_format(None), OutputFormat::Synthesis);
        assert!(output.use_color(false));
        assert!(!output.use_color(true));
    }
}
