//! Server configuration
//!
//! All settings are read once from the environment at startup into an
//! immutable [`Config`] that is passed into the services that need it.
//! Nothing reaches for the environment after boot.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Error type for configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },
}

/// Complete application configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub ai: AiConfig,
    pub ocr: OcrConfig,
    pub render: RenderConfig,
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen port
    pub port: u16,
    /// Allowed CORS origins. A single "*" entry allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            cors_origins: vec!["*".to_string()],
        }
    }
}

/// Upload limits
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Maximum accepted file size in bytes
    pub max_file_size: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
        }
    }
}

/// AI completion endpoint settings
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Bearer credential. Empty means not configured.
    pub api_key: String,
    /// Endpoint base URL (the client appends /chat/completions)
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Connect/read timeout for a single completion call
    pub timeout: Duration,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.cerebras.ai/v1".to_string(),
            model: "llama3.1-70b".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// OCR engine settings
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Language hint passed to the engines
    pub language: String,
    /// Ollama base URL for the vision engine
    pub ollama_url: String,
    /// Ollama vision model name
    pub ollama_model: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "llava".to_string(),
        }
    }
}

/// PDF rasterization settings
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Target resolution for page rasterization. 200 is a reasonable
    /// operating point: enough for OCR accuracy without blowing up latency.
    pub dpi: f32,
    /// Timeout covering the whole rasterization of one document
    pub timeout: Duration,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dpi: 200.0,
            timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to their defaults; a variable that is set
    /// but unparseable is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                port: parse_env("FACTURA_PORT", defaults.server.port)?,
                cors_origins: env::var("FACTURA_CORS_ORIGINS")
                    .map(|v| {
                        v.split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or(defaults.server.cors_origins),
            },
            upload: UploadConfig {
                max_file_size: parse_env(
                    "FACTURA_MAX_UPLOAD_BYTES",
                    defaults.upload.max_file_size,
                )?,
            },
            ai: AiConfig {
                api_key: env::var("CEREBRAS_API_KEY").unwrap_or_default(),
                base_url: env::var("CEREBRAS_BASE_URL").unwrap_or(defaults.ai.base_url),
                model: env::var("CEREBRAS_MODEL").unwrap_or(defaults.ai.model),
                timeout: Duration::from_secs(parse_env("FACTURA_AI_TIMEOUT_SECS", 60u64)?),
            },
            ocr: OcrConfig {
                language: env::var("FACTURA_OCR_LANGUAGE").unwrap_or(defaults.ocr.language),
                ollama_url: env::var("FACTURA_OLLAMA_URL").unwrap_or(defaults.ocr.ollama_url),
                ollama_model: env::var("FACTURA_OLLAMA_MODEL")
                    .unwrap_or(defaults.ocr.ollama_model),
            },
            render: RenderConfig {
                dpi: parse_env("FACTURA_RENDER_DPI", defaults.render.dpi)?,
                timeout: Duration::from_secs(parse_env("FACTURA_RENDER_TIMEOUT_SECS", 30u64)?),
            },
        })
    }

    /// Returns a message describing the missing AI credential, if any.
    ///
    /// The health endpoint reports this and the extraction endpoint refuses
    /// to run without it.
    pub fn missing_credential(&self) -> Option<&'static str> {
        if self.ai.api_key.is_empty() {
            Some("CEREBRAS_API_KEY not found in environment variables")
        } else {
            None
        }
    }
}

fn parse_env<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        Err(_) => Ok(default),
    }
}
