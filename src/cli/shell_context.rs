use std::path::PathBuf;

use crate::{
    config::{Config, ConfigManager},
    core::{utils::app_data_dir, AnalyzerSession},
    currency::{CurrencyCode, LocaleConfig},
    storage::JsonStorage,
};

use super::{commands, core::CliError, registry::CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub session: AnalyzerSession,
    pub config_manager: ConfigManager,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, app_data_dir())
    }

    /// Builds a shell whose config and snapshots live under `base`.
    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load()?;
        let storage = JsonStorage::new(Some(base), Some(config.backup_retention))?;
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);
        Ok(Self {
            mode,
            registry,
            session: AnalyzerSession::with_storage(config, Box::new(storage)),
            config_manager,
            last_command: None,
            running: true,
        })
    }

    pub fn config(&self) -> &Config {
        self.session.config()
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn prompt(&self) -> String {
        match self.session.active_category() {
            Some(name) => format!("fin_note [{}]> ", name),
            None => "fin_note> ".to_string(),
        }
    }

    pub fn format_amount(&self, amount: f64) -> String {
        let config = self.session.config();
        crate::currency::format_amount(
            amount,
            &CurrencyCode::new(config.currency.as_str()),
            &LocaleConfig::for_tag(&config.locale),
        )
    }
}
