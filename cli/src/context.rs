use crate::cli::GlobalArgs;
use crate::error::{CliError, Result, ResultExt};
use crate::ui;
use report_api::{MdfiveConfig, ReportClient};
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;

pub const DEFAULT_CONFIG_FILE: &str = "mdfive.toml";

/// Everything a command needs: resolved configuration and a ready client
pub struct AppContext {
    pub config: MdfiveConfig,
    pub client: ReportClient,
    pub verbose: bool,
}

impl AppContext {
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let config = resolve_config(args)?;
        let client = ReportClient::new(&config).with_context(|| "Failed to create HTTP client")?;
        ui::verbose_message(args.verbose, &format!("Backend: {}", client.base_url()));

        Ok(Self {
            config,
            client,
            verbose: args.verbose,
        })
    }

    pub fn verbose(&self, message: &str) {
        ui::verbose_message(self.verbose, message);
    }
}

/// Run a command body on a fresh multi-threaded runtime
pub fn block_on<F, T>(future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let rt = Runtime::new()
        .map_err(|e| CliError::Other(format!("Failed to create async runtime: {e}")))?;
    rt.block_on(future)
}

/// Path `mdfive init` writes to
pub fn init_target(args: &GlobalArgs) -> PathBuf {
    args.config
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Load configuration: `--config`, else `./mdfive.toml`, else the user config
/// directory, else defaults. `MDFIVE_API_BASE_URL` and `--base-url` are
/// applied on top, in that order.
pub fn resolve_config(args: &GlobalArgs) -> Result<MdfiveConfig> {
    let mut config = match args.config.as_deref() {
        Some(path) => MdfiveConfig::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {path}"))?,
        None => match discover_config_file() {
            Some(path) => {
                ui::verbose_message(args.verbose, &format!("Using configuration {}", path.display()));
                MdfiveConfig::load_from_file(&path)
                    .with_context(|| format!("Failed to load configuration from {}", path.display()))?
            }
            None => {
                ui::verbose_message(
                    args.verbose,
                    "No mdfive.toml found, using defaults (run `mdfive init` to create one)",
                );
                MdfiveConfig::default()
            }
        },
    };

    config.apply_env_override();
    if let Some(base_url) = args.base_url.as_deref() {
        config.api.base_url = Some(base_url.trim().to_string());
    }

    config.validate()?;
    Ok(config)
}

fn discover_config_file() -> Option<PathBuf> {
    let local = Path::new(DEFAULT_CONFIG_FILE);
    if local.exists() {
        return Some(local.to_path_buf());
    }

    dirs::config_dir()
        .map(|dir| dir.join("mdfive").join(DEFAULT_CONFIG_FILE))
        .filter(|path| path.exists())
}
