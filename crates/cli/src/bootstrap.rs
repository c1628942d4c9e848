use hopdns_domain::{CliOverrides, Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Loads configuration: explicit file, else `hopdns.toml` in the working
/// directory if present, else built-in defaults. CLI flags win last.
pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("cannot read config file {path}: {e}"))?;
            Config::from_toml_str(&text)?
        }
        None => match std::fs::read_to_string("hopdns.toml") {
            Ok(text) => Config::from_toml_str(&text)?,
            Err(_) => Config::default(),
        },
    };
    config.apply_overrides(&overrides);
    Ok(config)
}

pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    info!(level = %config.logging.level, "logging initialized");
}
