use serde::{Deserialize, Serialize};

use std::{env, fmt, fs, path::Path, time::Duration};

const ENV_PREFIX: &str = "CONTACT_";

/// How the connection to the SMTP relay is secured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpTls {
    /// Plain connection upgraded with STARTTLS (usually port 587)
    #[default]
    Starttls,
    /// Implicit TLS from the first byte (usually port 465)
    Tls,
    /// Unencrypted, for local test relays only
    None,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    pub port: u16,
    pub sender: String,
    pub recipient: String,
    pub smtp_relay: String,
    #[serde(default)]
    pub smtp_port: Option<u16>,
    #[serde(default)]
    pub smtp_tls: SmtpTls,
    #[serde(default)]
    pub smtp_username: Option<String>,
    #[serde(default)]
    pub smtp_pass: Option<String>,
    #[serde(default, with = "humantime_serde")]
    pub smtp_timeout: Option<Duration>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("sender", &self.sender)
            .field("recipient", &self.recipient)
            .field("smtp_relay", &self.smtp_relay)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_tls", &self.smtp_tls)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_pass", &self.smtp_pass.as_ref().map(|_| "<redacted>"))
            .field("smtp_timeout", &self.smtp_timeout)
            .finish()
    }
}

fn parse_file(path: &str) -> Result<Config, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    let config = serde_yaml::from_str(&contents)?;
    Ok(apply_secret_overrides(config, env::vars()))
}

/// Credentials from the environment win over the ones in a config file, so
/// the file itself can be committed without secrets.
fn apply_secret_overrides(
    mut config: Config,
    vars: impl IntoIterator<Item = (String, String)>,
) -> Config {
    for (key, value) in vars {
        match key.strip_prefix(ENV_PREFIX) {
            Some("SMTP_USERNAME") => config.smtp_username = Some(value),
            Some("SMTP_PASS") => config.smtp_pass = Some(value),
            _ => {}
        }
    }
    config
}

fn load_from_env(vars: impl IntoIterator<Item = (String, String)>) -> Result<Config, envy::Error> {
    envy::prefixed(ENV_PREFIX).from_iter(vars)
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    // Retrieve env variable
    let config_path =
        env::var("CONTACT_SERVICE_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        return parse_file(&config_path);
    }

    // Fallback to config.yaml
    if Path::new("config.yaml").exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        return parse_file("config.yaml");
    }

    // Fallback to config.example.yaml
    if Path::new("config.example.yaml").exists() {
        tracing::warn!(
            "Config file '{}' and 'config.yaml' not found, falling back to 'config.example.yaml'\
             \n This file should not be used and should be replaced with actual data",
            config_path
        );
        return parse_file("config.example.yaml");
    }

    // Fallback to environment variables
    tracing::info!(
        "No config file found, attempting to load configuration from {}* environment variables",
        ENV_PREFIX
    );
    load_from_env(env::vars()).map_err(|e| {
        format!(
            "Config file not found and environment variables are incomplete. \
             Tried: '{config_path}', 'config.yaml', 'config.example.yaml', and environment variables. \
             Error: {e}"
        )
        .into()
    })
}
