//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;
use verity_research::TrustedSource;

/// Execute a config action, saving the file when it changes anything.
pub fn execute_config(args: ConfigArgs, config: &mut Config, path: &Path, formatter: &Formatter) -> Result<()> {
    let message = match args.action {
        ConfigAction::Show => {
            println!("{}", formatter.format_config(config)?);
            return Ok(());
        }
        ConfigAction::SetKey { key } => {
            let key = key.trim();
            if key.is_empty() {
                return Err(CliError::InvalidInput("API key cannot be empty".into()));
            }
            config.api.api_key = Some(key.to_string());
            "API key saved".to_string()
        }
        ConfigAction::SetModel { model } => {
            let model = model.trim();
            if model.is_empty() {
                return Err(CliError::InvalidInput("Model name cannot be empty".into()));
            }
            config.api.model = model.to_string();
            format!("Model set to {}", model)
        }
        ConfigAction::MaxClaims { count } => {
            if count == 0 {
                return Err(CliError::InvalidInput("max claims must be at least 1".into()));
            }
            config.research.max_claims = count;
            format!("Max claims set to {}", count)
        }
        ConfigAction::AddSource { id, name } => {
            if id.trim().is_empty() || name.trim().is_empty() {
                return Err(CliError::InvalidInput("source id and name are required".into()));
            }
            let replaced = config.add_source(TrustedSource {
                id: id.trim().to_string(),
                name: name.trim().to_string(),
            });
            if replaced {
                format!("Updated source '{}'", id.trim())
            } else {
                format!("Added source '{}'", id.trim())
            }
        }
        ConfigAction::RemoveSource { id } => {
            if !config.remove_source(&id) {
                return Err(CliError::NotFound(format!("No source with id '{}'", id)));
            }
            format!("Removed source '{}'", id)
        }
    };

    config.save_to(path)?;
    if !formatter.is_quiet() {
        println!("{}", formatter.success(&message));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use tempfile::TempDir;

    fn run(action: ConfigAction, config: &mut Config, path: &Path) -> Result<()> {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        execute_config(ConfigArgs { action }, config, path, &formatter)
    }

    #[test]
    fn test_changes_are_persisted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();

        run(ConfigAction::SetKey { key: " pplx-123 ".into() }, &mut config, &path).unwrap();
        run(ConfigAction::MaxClaims { count: 4 }, &mut config, &path).unwrap();
        run(
            ConfigAction::AddSource {
                id: "pubmed".into(),
                name: "PubMed Central".into(),
            },
            &mut config,
            &path,
        )
        .unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api.api_key.as_deref(), Some("pplx-123"));
        assert_eq!(loaded.research.max_claims, 4);
        assert_eq!(loaded.research.sources.len(), 1);
    }

    #[test]
    fn test_invalid_actions_leave_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config::default();

        assert!(matches!(
            run(ConfigAction::MaxClaims { count: 0 }, &mut config, &path),
            Err(CliError::InvalidInput(_))
        ));
        assert!(matches!(
            run(ConfigAction::RemoveSource { id: "nope".into() }, &mut config, &path),
            Err(CliError::NotFound(_))
        ));
        assert!(!path.exists());
    }
}
