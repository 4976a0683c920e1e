//! Application configuration management.
//!
//! Configuration is read once at startup from optional config files and the
//! process environment. Variable names are used as-is (no prefix), so
//! `EMAIL_USER` maps to `email_user`. The resulting [`AppConfig`] is immutable.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Email configuration.
    pub email: EmailConfig,
    /// Upload staging configuration.
    pub upload: UploadConfig,
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Allowed CORS origin(s). `*` allows any origin.
    pub allow_origin: String,
    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Returns the whole-request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the socket address string to bind to.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allow_origin: default_allow_origin(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Email configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfig {
    /// SMTP relay host.
    pub smtp_host: String,
    /// SMTP relay port.
    pub smtp_port: u16,
    /// SMTP username, also used as the From address.
    pub username: String,
    /// SMTP password.
    pub password: String,
    /// Recipient of owner notifications.
    pub owner_email: String,
    /// Display name on outgoing mail.
    pub from_name: String,
    /// Whether client receipts are sent at all.
    pub send_client_receipt: bool,
    /// Per-send timeout in seconds.
    pub timeout_secs: u64,
}

impl EmailConfig {
    /// Returns true when both SMTP credentials are present.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }

    /// Returns true when credentials and the owner address are all configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.has_credentials() && !self.owner_email.is_empty()
    }

    /// Returns the per-send timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            username: String::new(),
            password: String::new(),
            owner_email: String::new(),
            from_name: default_from_name(),
            send_client_receipt: true,
            timeout_secs: default_mail_timeout(),
        }
    }
}

/// Upload staging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    /// Directory where uploaded files are staged for the lifetime of a request.
    pub staging_dir: PathBuf,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            staging_dir: std::env::temp_dir(),
        }
    }
}

/// Flat view of the environment, as the variables are named.
#[derive(Debug, Deserialize)]
struct EnvSettings {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_allow_origin")]
    allow_origin: String,
    #[serde(default = "default_request_timeout")]
    request_timeout_secs: u64,
    #[serde(default = "default_smtp_host")]
    smtp_host: String,
    #[serde(default = "default_smtp_port")]
    smtp_port: u16,
    #[serde(default)]
    email_user: String,
    #[serde(default)]
    email_pass: String,
    #[serde(default)]
    owner_email: String,
    #[serde(default = "default_from_name")]
    mail_from_name: String,
    #[serde(default = "default_send_client_receipt")]
    send_client_receipt: String,
    #[serde(default = "default_mail_timeout")]
    mail_timeout_secs: u64,
    #[serde(default)]
    upload_dir: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_allow_origin() -> String {
    "*".to_string()
}

fn default_request_timeout() -> u64 {
    120
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    465
}

fn default_from_name() -> String {
    "Tax Lakay".to_string()
}

fn default_send_client_receipt() -> String {
    "true".to_string()
}

fn default_mail_timeout() -> u64 {
    60
}

/// Interprets a boolean-like string: `1`, `true`, and `yes` (any case) are true.
#[must_use]
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

impl From<EnvSettings> for AppConfig {
    fn from(env: EnvSettings) -> Self {
        Self {
            server: ServerConfig {
                host: env.host,
                port: env.port,
                allow_origin: env.allow_origin.trim().to_string(),
                request_timeout_secs: env.request_timeout_secs,
            },
            email: EmailConfig {
                smtp_host: env.smtp_host,
                smtp_port: env.smtp_port,
                username: env.email_user.trim().to_string(),
                password: env.email_pass.trim().to_string(),
                owner_email: env.owner_email.trim().to_string(),
                from_name: env.mail_from_name,
                send_client_receipt: is_truthy(&env.send_client_receipt),
                timeout_secs: env.mail_timeout_secs,
            },
            upload: UploadConfig {
                staging_dir: env
                    .upload_dir
                    .filter(|dir| !dir.as_os_str().is_empty())
                    .unwrap_or_else(std::env::temp_dir),
            },
        }
    }
}

impl AppConfig {
    /// Loads configuration from config files and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::default())
            .build()?;

        config.try_deserialize::<EnvSettings>().map(Self::from)
    }
}
