pub mod toml_config;

#[cfg(feature = "cli")]
use crate::config::toml_config::TomlConfig;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "parcel-availability")]
#[command(about = "Update the availability window of a parcel")]
pub struct CliConfig {
    /// 12-digit parcel barcode
    #[arg(long, default_value = "")]
    pub barcode: String,

    /// 8-digit recipient phone number
    #[arg(long, default_value = "")]
    pub phone: String,

    /// Start of the availability window (HH:MM)
    #[arg(long, default_value = "")]
    pub from: String,

    /// End of the availability window (HH:MM)
    #[arg(long, default_value = "")]
    pub to: String,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub lookup_url: Option<String>,

    #[arg(long)]
    pub update_url: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Run local validation only, without calling the service
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the configuration file (or defaults) and applies command-line overrides.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(url) = &self.lookup_url {
            config.service.lookup_url = url.clone();
        }
        if let Some(url) = &self.update_url {
            config.service.update_url = url.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            config.service.timeout_seconds = Some(timeout);
        }

        Ok(config)
    }

    pub fn verbose_with(&self, config: &TomlConfig) -> bool {
        self.verbose || config.verbose()
    }

    pub fn json_logs_with(&self, config: &TomlConfig) -> bool {
        self.json_logs || config.json_logs()
    }
}
