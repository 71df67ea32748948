use config::{Config, ConfigError, Environment, File, FileFormat, Source};
use lettre::message::Mailbox;
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;
use url::Url;

pub const DEFAULT_CONFIG_PATH: &str = "config.ini";
pub const ENV_PREFIX: &str = "OLX_WATCHER";

pub const DEFAULT_TITLE_SELECTOR: &str = "a.marginright5.link";
pub const DEFAULT_PRICE_SELECTOR: &str = "p.price";
pub const DEFAULT_USER_AGENT: &str = concat!("olx-watcher/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_THRESHOLD: f64 = 1000.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(alias = "OLX")]
    pub olx: SearchConfig,
    #[serde(alias = "Email")]
    pub email: EmailConfig,
    #[serde(default, alias = "Alert")]
    pub alert: AlertConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Site root, e.g. `https://www.olx.ro/`.
    pub url: String,
    pub keywords: String,
    #[serde(default = "default_title_selector")]
    pub title_selector: String,
    #[serde(default = "default_price_selector")]
    pub price_selector: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Falls back to `email.from_address` when unset.
    #[serde(default)]
    pub recipient: Option<String>,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            recipient: None,
        }
    }
}

fn default_title_selector() -> String {
    DEFAULT_TITLE_SELECTOR.to_string()
}

fn default_price_selector() -> String {
    DEFAULT_PRICE_SELECTOR.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

impl AppConfig {
    /// Loads the INI file at `path`, then applies `OLX_WATCHER__SECTION__KEY`
    /// environment overrides. The result is not validated yet, so command-line
    /// overrides can still replace bad values before `validate()`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, Environment::with_prefix(ENV_PREFIX).separator("__"))
    }

    pub fn load_with_env(path: impl AsRef<Path>, env: Environment) -> Result<Self, ConfigError> {
        let file = Config::builder()
            .add_source(File::from(path.as_ref()).format(FileFormat::Ini).required(true))
            .build()?;
        let mut config: AppConfig = file.try_deserialize()?;

        // INI section names and env keys can differ in case, so overrides are
        // matched by lowercased name rather than merged as sources.
        for (name, value) in env.collect()? {
            let Some((section, key)) = name.split_once('.') else {
                warn!(key = %name, "Ignoring configuration override without a section");
                continue;
            };
            match value.into_string() {
                Ok(value) => config.apply_override(section, key, value)?,
                Err(e) => warn!(key = %name, "Ignoring configuration override: {}", e),
            }
        }

        Ok(config)
    }

    /// Applies `--threshold` and `--recipient` on top of the loaded `[Alert]`
    /// section.
    pub fn override_alert(&mut self, threshold: Option<f64>, recipient: Option<&str>) {
        if let Some(threshold) = threshold {
            self.alert.threshold = threshold;
        }
        if let Some(recipient) = recipient {
            self.alert.recipient = Some(recipient.to_string());
        }
    }

    fn apply_override(&mut self, section: &str, key: &str, value: String) -> Result<(), ConfigError> {
        let section = section.to_lowercase();
        let key = key.to_lowercase();
        let invalid = |value: &str| {
            ConfigError::Message(format!("Invalid override for {}.{}: '{}'", section, key, value))
        };

        match (section.as_str(), key.as_str()) {
            ("olx", "url") => self.olx.url = value,
            ("olx", "keywords") => self.olx.keywords = value,
            ("olx", "title_selector") => self.olx.title_selector = value,
            ("olx", "price_selector") => self.olx.price_selector = value,
            ("olx", "user_agent") => self.olx.user_agent = value,
            ("email", "smtp_server") => self.email.smtp_server = value,
            ("email", "smtp_port") => {
                self.email.smtp_port = value.parse().map_err(|_| invalid(&value))?
            }
            ("email", "smtp_username") => self.email.smtp_username = value,
            ("email", "smtp_password") => self.email.smtp_password = value,
            ("email", "from_address") => self.email.from_address = value,
            ("alert", "threshold") => {
                self.alert.threshold = value.parse().map_err(|_| invalid(&value))?
            }
            ("alert", "recipient") => self.alert.recipient = Some(value),
            _ => warn!(section = %section, key = %key, "Ignoring unknown configuration override"),
        }

        Ok(())
    }

    pub fn recipient(&self) -> &str {
        self.alert
            .recipient
            .as_deref()
            .unwrap_or(&self.email.from_address)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if Url::parse(&self.olx.url).is_err() {
            return Err(ConfigError::Message("Invalid OLX url format".into()));
        }

        if self.olx.keywords.split_whitespace().next().is_none() {
            return Err(ConfigError::Message("OLX keywords must not be empty".into()));
        }

        for (name, selector) in [
            ("title_selector", &self.olx.title_selector),
            ("price_selector", &self.olx.price_selector),
        ] {
            Selector::parse(selector).map_err(|e| {
                ConfigError::Message(format!("Invalid OLX {} '{}': {:?}", name, selector, e))
            })?;
        }

        if self.email.smtp_port == 0 {
            return Err(ConfigError::Message("SMTP port must be greater than 0".into()));
        }

        if self.email.from_address.parse::<Mailbox>().is_err() {
            return Err(ConfigError::Message(format!(
                "Invalid from_address '{}'",
                self.email.from_address
            )));
        }

        if self.recipient().parse::<Mailbox>().is_err() {
            return Err(ConfigError::Message(format!(
                "Invalid alert recipient '{}'",
                self.recipient()
            )));
        }

        if !self.alert.threshold.is_finite() || self.alert.threshold <= 0.0 {
            return Err(ConfigError::Message(
                "Alert threshold must be a positive number".into(),
            ));
        }

        Ok(())
    }
}
