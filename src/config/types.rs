use std::path::PathBuf;

use serde::Deserialize;

use super::credentials::resolve_credential;

pub const DEFAULT_APOLLO_BASE_URL: &str = "https://api.apollo.io/api/v1";
pub const DEFAULT_CORESIGNAL_BASE_URL: &str = "https://api.coresignal.com";
pub const DEFAULT_TAVILY_BASE_URL: &str = "https://api.tavily.com";
pub const DEFAULT_SMTP_SERVER: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Process-wide configuration, built once at startup and shared by reference.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub apollo: ProviderConfig,
    pub coresignal: ProviderConfig,
    pub tavily: ProviderConfig,
    pub llm: LLMConfig,
    pub smtp: SmtpConfig,
    pub drive: DriveConfig,
    pub results_dir: PathBuf,
    pub pandoc_path: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LLMConfig {
    pub provider: String,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub from: Option<String>,
}

impl SmtpConfig {
    pub fn is_configured(&self) -> bool {
        self.user.is_some() && self.password.is_some()
    }

    /// Sender address, falling back to the login user.
    pub fn from_address(&self) -> Option<&str> {
        self.from.as_deref().or(self.user.as_deref())
    }
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SMTP_SERVER.to_string(),
            port: DEFAULT_SMTP_PORT,
            user: None,
            password: None,
            from: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DriveConfig {
    pub service_account_file: PathBuf,
    /// Upload folder for synchronous requests that do not name one.
    pub default_folder_id: Option<String>,
    /// Upload folder for background requests; also the default listing folder.
    pub interface_folder_id: Option<String>,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            service_account_file: PathBuf::from("service_account.json"),
            default_folder_id: None,
            interface_folder_id: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Empty values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let llm_provider = get("LLM_PROVIDER").unwrap_or_else(|| "openai".to_string());
        let llm_key = match llm_provider.as_str() {
            "anthropic" => get("ANTHROPIC_API_KEY"),
            _ => get("OPENAI_API_KEY"),
        };

        let smtp_port = get("SMTP_PORT")
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(DEFAULT_SMTP_PORT);

        Self {
            apollo: ProviderConfig {
                api_key: get("APOLLO_API_KEY"),
                base_url: get("APOLLO_BASE_URL").unwrap_or_else(|| DEFAULT_APOLLO_BASE_URL.to_string()),
            },
            coresignal: ProviderConfig {
                api_key: get("CORESIGNAL_API_KEY"),
                base_url: get("CORESIGNAL_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_CORESIGNAL_BASE_URL.to_string()),
            },
            tavily: ProviderConfig {
                api_key: get("TAVILY_API_KEY"),
                base_url: get("TAVILY_BASE_URL").unwrap_or_else(|| DEFAULT_TAVILY_BASE_URL.to_string()),
            },
            llm: LLMConfig {
                provider: llm_provider,
                api_key: llm_key,
                model: get("LLM_MODEL"),
                base_url: get("LLM_BASE_URL"),
            },
            smtp: SmtpConfig {
                server: get("SMTP_SERVER").unwrap_or_else(|| DEFAULT_SMTP_SERVER.to_string()),
                port: smtp_port,
                user: get("EMAIL_USER"),
                password: get("EMAIL_PASSWORD"),
                from: get("FROM_EMAIL"),
            },
            drive: DriveConfig {
                service_account_file: get("GOOGLE_SERVICE_ACCOUNT_FILE")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("service_account.json")),
                default_folder_id: get("GOOGLE_DRIVE_FOLDER_ID"),
                interface_folder_id: get("GOOGLE_DRIVE_INTERFACE_FOLDER_ID"),
            },
            results_dir: get("RESULTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./results")),
            pandoc_path: get("PANDOC_PATH").unwrap_or_else(|| "pandoc".to_string()),
        }
    }

    /// Directory holding cached provider responses.
    pub fn cache_dir(&self) -> PathBuf {
        self.results_dir.join("third_party_api_response")
    }

    /// Apply values from a YAML config file on top of the environment.
    pub fn apply_file(&mut self, file: FileConfig) {
        if let Some(providers) = file.providers {
            apply_provider(&mut self.apollo, providers.apollo);
            apply_provider(&mut self.coresignal, providers.coresignal);
            apply_provider(&mut self.tavily, providers.tavily);
        }
        if let Some(llm) = file.llm {
            if let Some(provider) = llm.provider {
                self.llm.provider = provider;
            }
            overlay(&mut self.llm.api_key, llm.api_key);
            overlay(&mut self.llm.model, llm.model);
            overlay(&mut self.llm.base_url, llm.base_url);
        }
        if let Some(smtp) = file.smtp {
            if let Some(server) = smtp.server {
                self.smtp.server = server;
            }
            if let Some(port) = smtp.port {
                self.smtp.port = port;
            }
            overlay(&mut self.smtp.user, smtp.user);
            overlay(&mut self.smtp.password, smtp.password);
            overlay(&mut self.smtp.from, smtp.from);
        }
        if let Some(drive) = file.drive {
            if let Some(path) = drive.service_account_file {
                self.drive.service_account_file = PathBuf::from(path);
            }
            overlay(&mut self.drive.default_folder_id, drive.default_folder_id);
            overlay(&mut self.drive.interface_folder_id, drive.interface_folder_id);
        }
        if let Some(dir) = file.results_dir {
            self.results_dir = PathBuf::from(dir);
        }
        if let Some(pandoc) = file.pandoc_path {
            self.pandoc_path = pandoc;
        }
    }
}

fn apply_provider(target: &mut ProviderConfig, file: Option<ProviderFileConfig>) {
    if let Some(file) = file {
        overlay(&mut target.api_key, file.api_key);
        if let Some(base_url) = file.base_url {
            target.base_url = base_url;
        }
    }
}

/// Replace `target` with a resolved, non-empty file value.
fn overlay(target: &mut Option<String>, value: Option<String>) {
    if let Some(v) = value.map(|v| resolve_credential(&v)).filter(|v| !v.is_empty()) {
        *target = Some(v);
    }
}

/// On-disk YAML overlay. Every field is optional; string values may be `$ENV_VAR` references.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub providers: Option<ProvidersFileConfig>,
    pub llm: Option<LLMFileConfig>,
    pub smtp: Option<SmtpFileConfig>,
    pub drive: Option<DriveFileConfig>,
    pub results_dir: Option<String>,
    pub pandoc_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvidersFileConfig {
    pub apollo: Option<ProviderFileConfig>,
    pub coresignal: Option<ProviderFileConfig>,
    pub tavily: Option<ProviderFileConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderFileConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LLMFileConfig {
    pub provider: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SmtpFileConfig {
    pub server: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub from: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DriveFileConfig {
    pub service_account_file: Option<String>,
    pub default_folder_id: Option<String>,
    pub interface_folder_id: Option<String>,
}
