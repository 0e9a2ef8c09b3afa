//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project-level config file names, checked in order
const PROJECT_CONFIG_FILES: [&str; 2] = ["council.toml", ".council.toml"];

/// Prefix of environment overrides (`COUNCIL_ORCHESTRATOR__TIMEOUT_MS=2000`)
pub const ENV_PREFIX: &str = "COUNCIL_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `COUNCIL_`-prefixed environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./council.toml` or `./.council.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/engine-council/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        if let Some(path) = config_path {
            Self::require_exists(path)?;
        }
        let project = Self::project_config_path_in(Path::new("."));
        let global = Self::global_config_path();
        debug!(?global, ?project, explicit = ?config_path, "Loading configuration");
        Self::figment(
            global.as_deref(),
            project.as_deref(),
            config_path.map(PathBuf::as_path),
        )
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(Box::new)
    }

    /// File layers only, lowest priority first. Missing optional files are skipped.
    fn figment(global: Option<&Path>, project: Option<&Path>, explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        for path in [global, project].into_iter().flatten() {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment
    }

    /// An explicitly requested file must exist, unlike discovered ones
    fn require_exists(path: &Path) -> Result<(), Box<figment::Error>> {
        if path.exists() {
            Ok(())
        } else {
            Err(Box::new(figment::Error::from(format!(
                "config file not found: {}",
                path.display()
            ))))
        }
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/engine-council/config.toml if set,
    /// otherwise the platform config directory equivalent.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("engine-council").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        Self::project_config_path_in(Path::new("."))
    }

    fn project_config_path_in(dir: &Path) -> Option<PathBuf> {
        PROJECT_CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Describe the config sources being used, highest priority first
    pub fn config_sources(explicit: Option<&PathBuf>) -> Vec<String> {
        let mut sources = Vec::new();

        sources.push(format!("  [     ] Environment: {}*", ENV_PREFIX));

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            sources.push(format!("  [{:<5}] Explicit: {}", mark, path.display()));
        }

        match Self::project_config_path() {
            Some(path) => sources.push(format!("  [FOUND] Project: {}", path.display())),
            None => sources.push("  [     ] Project: ./council.toml or ./.council.toml".to_string()),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "" };
            sources.push(format!("  [{:<5}] Global:  {}", mark, path.display()));
        }

        sources.push("  [     ] Default: built-in defaults".to_string());
        sources
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(explicit: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");
        for line in Self::config_sources(explicit) {
            println!("{}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{OutputFormat, SynthesisStrategy};
    use std::fs;

    fn extract(figment: Figment) -> FileConfig {
        figment.extract().unwrap()
    }

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config, FileConfig::default());
        assert_eq!(config.orchestrator.max_engines, 10);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        // Should return a path (even if file doesn't exist)
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("engine-council"));
    }

    #[test]
    fn test_later_files_override_earlier() {
        let dir = tempfile::tempdir().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("council.toml");
        fs::write(
            &global,
            "[orchestrator]\ntimeout_ms = 900\nmax_engines = 3\n\n[output]\ncolor = false\n",
        )
        .unwrap();
        fs::write(&project, "[orchestrator]\nmax_engines = 7\n").unwrap();

        let config = extract(ConfigLoader::figment(Some(&global), Some(&project), None));

        assert_eq!(config.orchestrator.timeout_ms, 900);
        assert_eq!(config.orchestrator.max_engines, 7);
        assert!(!config.output.color);
        assert_eq!(config.orchestrator.strategy, SynthesisStrategy::WeightedAverage);
    }

    #[test]
    fn test_explicit_file_has_highest_file_priority() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("council.toml");
        let explicit = dir.path().join("custom.toml");
        fs::write(&project, "[orchestrator]\nstrategy = \"consensus\"\n").unwrap();
        fs::write(
            &explicit,
            "[orchestrator]\nstrategy = \"dialectic\"\n\n[output]\nformat = \"json\"\n",
        )
        .unwrap();

        let config = extract(ConfigLoader::figment(None, Some(&project), Some(&explicit)));

        assert_eq!(config.orchestrator.strategy, SynthesisStrategy::Dialectic);
        assert_eq!(config.output.format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_missing_optional_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("absent.toml");

        let config = extract(ConfigLoader::figment(Some(&absent), Some(&absent), None));
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("absent.toml");

        let err = ConfigLoader::require_exists(&absent).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
        assert!(ConfigLoader::require_exists(dir.path()).is_ok());
    }

    #[test]
    fn test_project_config_discovery() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ConfigLoader::project_config_path_in(dir.path()).is_none());

        fs::write(dir.path().join(".council.toml"), "").unwrap();
        let found = ConfigLoader::project_config_path_in(dir.path()).unwrap();
        assert!(found.ends_with(".council.toml"));

        fs::write(dir.path().join("council.toml"), "").unwrap();
        let found = ConfigLoader::project_config_path_in(dir.path()).unwrap();
        assert!(found.ends_with("council.toml"));
        assert!(!found.ends_with(".council.toml"));
    }
}
