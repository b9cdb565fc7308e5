use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use rview_types::Gvr;
use rview_util::{ManifestStore, ResourceAccess, ViewerConfig, expand_tilde};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod demo;

/// Browse resources and inspect their values in the terminal.
#[derive(Debug, Parser)]
#[command(name = "rview", version, about)]
struct Cli {
    /// Root of the manifest tree (`<group|core>/<version>/<resource>/[<namespace>/]<name>.yaml`).
    #[arg(long, default_value = ".")]
    dir: String,

    /// Resource type to list, as `group/version/resource` or `version/resource`.
    #[arg(long, default_value = "helm.sh/v3/releases")]
    resource: Gvr,

    /// Browse a built-in set of sample releases instead of `--dir`.
    #[arg(long)]
    demo: bool,

    /// Color theme (`dracula`, `nord`); overrides the config file.
    #[arg(long)]
    theme: Option<String>,

    /// Log file; defaults to `<data dir>/rview/rview.log`.
    #[arg(long)]
    log_file: Option<String>,
}

impl Cli {
    /// Applies command-line overrides on top of the loaded configuration.
    fn apply_overrides(&self, mut config: ViewerConfig) -> ViewerConfig {
        if let Some(theme) = &self.theme {
            config.theme = Some(theme.clone());
        }
        config
    }

    fn log_path(&self) -> PathBuf {
        match &self.log_file {
            Some(path) => expand_tilde(path),
            None => dirs_next::data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("rview")
                .join("rview.log"),
        }
    }

    fn access(&self) -> Arc<dyn ResourceAccess> {
        if self.demo {
            return Arc::new(demo::store(&self.resource));
        }
        Arc::new(ManifestStore::new(expand_tilde(&self.dir)))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_path())?;

    let config = cli.apply_overrides(ViewerConfig::load().context("failed to load the viewer configuration")?);
    info!(resource = %cli.resource, demo = cli.demo, dir = %cli.dir, "Starting rview");

    rview_tui::run(cli.access(), cli.resource.clone(), config).await
}

/// Installs a non-ANSI fmt subscriber writing to `path`; the terminal belongs
/// to the TUI.
fn init_tracing(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_helm_releases_in_the_current_directory() {
        let cli = Cli::try_parse_from(["rview"]).unwrap();
        assert_eq!(cli.resource, Gvr::new("helm.sh", "v3", "releases"));
        assert_eq!(cli.dir, ".");
        assert!(!cli.demo);
    }

    #[test]
    fn core_resources_parse_without_a_group() {
        let cli = Cli::try_parse_from(["rview", "--resource", "v1/configmaps"]).unwrap();
        assert!(cli.resource.is_core());
        assert!(Cli::try_parse_from(["rview", "--resource", "configmaps"]).is_err());
    }

    #[test]
    fn theme_flag_overrides_the_config_file() {
        let cli = Cli::try_parse_from(["rview", "--theme", "nord"]).unwrap();
        let config = ViewerConfig {
            theme: Some("dracula".into()),
            ..ViewerConfig::default()
        };
        assert_eq!(cli.apply_overrides(config).theme.as_deref(), Some("nord"));
    }

    #[test]
    fn log_file_flag_expands_home() {
        temp_env::with_var("HOME", Some("/home/tester"), || {
            let cli = Cli::try_parse_from(["rview", "--log-file", "~/logs/rview.log"]).unwrap();
            assert_eq!(cli.log_path(), PathBuf::from("/home/tester/logs/rview.log"));
        });
    }

    #[test]
    fn demo_store_lists_sample_releases() {
        let cli = Cli::try_parse_from(["rview", "--demo"]).unwrap();
        let releases = cli.access().list(&cli.resource).unwrap();
        assert!(!releases.is_empty());
    }
}
