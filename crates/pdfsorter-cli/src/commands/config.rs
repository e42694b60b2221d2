//! Config command implementation.

use crate::cli::ConfigArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
///
/// With `--init` the default configuration is written to `path`; otherwise the
/// effective configuration is printed as TOML.
pub fn execute_config(
    args: ConfigArgs,
    config: &Config,
    path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    if args.init {
        if path.exists() && !args.force {
            return Err(CliError::InvalidInput(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }
        Config::default().save(path)?;
        println!(
            "{}",
            formatter.success(&format!("Configuration written to {}", path.display()))
        );
        return Ok(());
    }

    print!("{}", config.to_toml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use tempfile::tempdir;

    fn formatter() -> Formatter {
        Formatter::new(OutputFormat::Table, false)
    }

    #[test]
    fn test_init_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        execute_config(
            ConfigArgs { init: true, force: false },
            &Config::default(),
            &path,
            &formatter(),
        )
        .unwrap();

        assert_eq!(Config::load(&path, true).unwrap(), Config::default());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[settings]\ncolor = false\n").unwrap();

        let result = execute_config(
            ConfigArgs { init: true, force: false },
            &Config::default(),
            &path,
            &formatter(),
        );
        assert!(matches!(result, Err(CliError::InvalidInput(_))));

        execute_config(
            ConfigArgs { init: true, force: true },
            &Config::default(),
            &path,
            &formatter(),
        )
        .unwrap();
        assert!(Config::load(&path, true).unwrap().settings.color);
    }
}
