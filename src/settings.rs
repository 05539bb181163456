use serde::{Deserialize, Serialize};
use std::fs;

use crate::models::PartnerRegistration;
use crate::token::DEFAULT_TOKEN_LENGTH;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VaultlinkSettings {
    pub application: ApplicationSettings,
    pub session: SessionSettings,
    pub logging: LoggingSettings,
    pub partners: Vec<PartnerSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Length of generated session tokens, in characters
    pub token_length: usize,
    /// Seconds before an unresolved session stops being pollable and is
    /// eligible for purging. Zero keeps pending sessions alive forever.
    pub ttl_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
}

/// One pre-provisioned partner pairing, from a `[[partners]]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerSettings {
    pub partner_key: String,
    pub site_identity: String,
    pub display_name: Option<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

// Helper function for serde defaults
fn default_true() -> bool {
    true
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors_origins: "http://localhost:3000,http://localhost:8080".to_string(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            token_length: DEFAULT_TOKEN_LENGTH,
            ttl_seconds: 0, // No expiry unless a deployment opts in
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for PartnerSettings {
    fn default() -> Self {
        Self {
            partner_key: String::new(),
            site_identity: String::new(),
            display_name: None,
            enabled: true,
        }
    }
}

impl VaultlinkSettings {
    /// Load settings from configuration files and environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read or parsed
    /// - TOML parsing fails
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings = Self::load_base_settings()?;
        Self::apply_env_overrides(&mut settings);
        settings.initialize_logging();
        Ok(settings)
    }

    /// Load base settings from TOML file(s) or use defaults
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `VAULTLINK_SECRETS_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read
    /// - TOML parsing fails
    fn load_base_settings() -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings = Self::default();

        let default_config_path = std::path::PathBuf::from("Settings.toml");
        if default_config_path.exists() {
            let toml_content = fs::read_to_string(&default_config_path)?;
            settings = basic_toml::from_str(&toml_content)?;
            println!(
                "✓ Loaded base settings from {}",
                default_config_path.display()
            );
        }

        // If VAULTLINK_SECRETS_DIR is set and contains Settings.toml, those
        // settings win over the ones in the working directory
        if let Ok(secrets_dir) = std::env::var("VAULTLINK_SECRETS_DIR") {
            let secrets_path = std::path::Path::new(&secrets_dir).join("Settings.toml");
            if secrets_path.exists() {
                let secrets_toml_content = fs::read_to_string(&secrets_path)?;
                let secrets_settings: Self = basic_toml::from_str(&secrets_toml_content)?;

                println!("✓ Overriding settings from {}", secrets_path.display());
                settings = secrets_settings;
            } else {
                println!(
                    "ℹ VAULTLINK_SECRETS_DIR set but no Settings.toml found at: {}",
                    secrets_path.display()
                );
            }
        }

        Ok(settings)
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Self) {
        Self::apply_application_env_overrides(&mut settings.application);
        Self::apply_session_env_overrides(&mut settings.session);
        Self::apply_logging_env_overrides(&mut settings.logging);
    }

    fn apply_application_env_overrides(app_settings: &mut ApplicationSettings) {
        if let Ok(host) = std::env::var("HOST") {
            app_settings.host = host;
        }
        if let Ok(port_str) = std::env::var("PORT") {
            if let Ok(port) = port_str.parse::<u16>() {
                app_settings.port = port;
            }
        }
        if let Ok(cors_origins) = std::env::var("CORS_ORIGINS") {
            app_settings.cors_origins = cors_origins;
        }
    }

    fn apply_session_env_overrides(session_settings: &mut SessionSettings) {
        if let Ok(length_str) = std::env::var("TOKEN_LENGTH") {
            if let Ok(length) = length_str.parse::<usize>() {
                session_settings.token_length = length;
            }
        }
        if let Ok(ttl_str) = std::env::var("SESSION_TTL_SECONDS") {
            if let Ok(ttl) = ttl_str.parse::<u64>() {
                session_settings.ttl_seconds = ttl;
            }
        }
    }

    fn apply_logging_env_overrides(logging_settings: &mut LoggingSettings) {
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            logging_settings.level = level;
        }
    }

    /// Initialize the logger, honoring `RUST_LOG` over the configured level.
    /// Safe to call more than once; later calls are no-ops.
    fn initialize_logging(&self) {
        let env = env_logger::Env::default().default_filter_or(&self.logging.level);
        let _ = env_logger::Builder::from_env(env).try_init();
    }

    /// Get the address the HTTP server binds to
    #[must_use]
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }

    /// Get the allowed CORS origins as a list
    #[must_use]
    pub fn get_cors_origins(&self) -> Vec<String> {
        self.application
            .cors_origins
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect()
    }

    /// The enabled partner pairings to provision into the store at startup
    #[must_use]
    pub fn registered_partners(&self) -> Vec<PartnerRegistration> {
        self.partners
            .iter()
            .filter(|p| p.enabled && !p.partner_key.is_empty() && !p.site_identity.is_empty())
            .map(|p| PartnerRegistration {
                partner_key: p.partner_key.clone(),
                site_identity: p.site_identity.clone(),
            })
            .collect()
    }
}
