//! Configuration management
//!
//! Settings come from one JSON or YAML file. The format follows the file
//! extension. Relative paths inside the file are resolved against the
//! directory holding the file, so a deployment folder can be moved as a unit.

use crate::license::LicenseFormat;
use crate::message::MessageTemplate;
use crate::{Result, VoiceBatchError};
use log::{debug, info};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file names searched when no path is given, in order
pub const DEFAULT_FILE_NAMES: [&str; 3] = ["voicebatch.json", "voicebatch.yaml", "voicebatch.yml"];

/// Supported config file encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Ok(ConfigFormat::Json),
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            _ => Err(VoiceBatchError::Config(format!(
                "unsupported config file type: {} (use .json, .yaml or .yml)",
                path.display()
            ))),
        }
    }
}

/// A credential that never shows up in logs or debug output
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Secret(value.into())
    }

    pub fn expose(&self) -> &str {
        self.0.trim()
    }

    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "Secret(<empty>)")
        } else {
            write!(f, "Secret(***)")
        }
    }
}

/// Which cloud speech backend to call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeechProvider {
    #[default]
    #[serde(alias = "gtts", alias = "google")]
    GoogleTranslate,
    #[serde(rename = "elevenlabs", alias = "eleven_labs")]
    ElevenLabs,
}

/// Speech backend settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpeechConfig {
    pub provider: SpeechProvider,
    #[serde(alias = "api_key", alias = "eleven_api_key")]
    pub api_key: Option<String>,
    #[serde(alias = "voice_id")]
    pub voice_id: Option<String>,
    #[serde(alias = "model_id")]
    pub model_id: Option<String>,
    pub language: String,
    #[serde(alias = "output_format")]
    pub output_format: String,
    #[serde(alias = "base_url")]
    pub base_url: Option<String>,
    #[serde(alias = "timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            provider: SpeechProvider::default(),
            api_key: None,
            voice_id: None,
            model_id: None,
            language: "en".to_string(),
            output_format: "mp3_44100_128".to_string(),
            base_url: None,
            timeout_secs: 60,
        }
    }
}

impl SpeechConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// License gate settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LicenseConfig {
    pub path: String,
    pub format: LicenseFormat,
}

impl Default for LicenseConfig {
    fn default() -> Self {
        Self {
            path: "license.key".to_string(),
            format: LicenseFormat::Text,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Default message source when the command line does not choose one
    #[serde(alias = "use_ai_template")]
    pub use_ai_template: bool,

    /// Generative-text provider key
    #[serde(alias = "gemini_api_key", alias = "api_key")]
    pub api_key: Secret,

    /// Template with `{name}` and `{email}` placeholders
    #[serde(alias = "manual_message")]
    pub manual_message: Option<String>,

    /// CSV contact list
    #[serde(alias = "csv_path", alias = "input_list_path")]
    pub input_list_path: Option<String>,

    /// Text for the single-message command
    pub text: Option<String>,

    #[serde(alias = "output_dir")]
    pub output_dir: String,

    #[serde(alias = "generated_text_dir")]
    pub generated_text_dir: String,

    /// Pause after each attempted record
    #[serde(alias = "record_delay_ms")]
    pub record_delay_ms: u64,

    #[serde(alias = "llm_model")]
    pub llm_model: String,

    #[serde(alias = "llm_base_url")]
    pub llm_base_url: String,

    #[serde(alias = "llm_timeout_secs")]
    pub llm_timeout_secs: u64,

    /// Shown when the license check fails
    #[serde(alias = "support_contact")]
    pub support_contact: String,

    pub license: LicenseConfig,

    pub speech: SpeechConfig,

    /// Directory relative paths are resolved against
    #[serde(skip)]
    base_dir: PathBuf,

    /// File this config was read from
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            use_ai_template: false,
            api_key: Secret::default(),
            manual_message: None,
            input_list_path: None,
            text: None,
            output_dir: "audio_output".to_string(),
            generated_text_dir: "generated_messages".to_string(),
            record_delay_ms: 1000,
            llm_model: crate::message::gemini::DEFAULT_MODEL.to_string(),
            llm_base_url: crate::message::gemini::DEFAULT_BASE_URL.to_string(),
            llm_timeout_secs: 60,
            support_contact: "your software vendor".to_string(),
            license: LicenseConfig::default(),
            speech: SpeechConfig::default(),
            base_dir: PathBuf::from("."),
            path: None,
        }
    }
}

impl Config {
    /// Load configuration from an explicit path or the default locations
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::find_default()?,
        };
        debug!("Loading config from {:?}", path);

        if !path.exists() {
            return Err(VoiceBatchError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }

        let format = ConfigFormat::from_path(&path)?;
        let contents = fs::read_to_string(&path)?;
        let mut config = Self::parse(&contents, format)?;

        config.base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        config.path = Some(path);

        info!("Configuration loaded from {:?}", config.path);
        Ok(config)
    }

    /// Parse configuration text; relative paths resolve against the working directory
    pub fn parse(contents: &str, format: ConfigFormat) -> Result<Self> {
        let contents = contents.trim_start_matches('\u{feff}');
        let config: Config = match format {
            ConfigFormat::Json => serde_json::from_str(contents)?,
            // An empty YAML document means "all defaults"
            ConfigFormat::Yaml if contents.trim().is_empty() => Config::default(),
            ConfigFormat::Yaml => serde_yaml::from_str(contents)?,
        };
        Ok(config)
    }

    /// Directories searched for a config file when none is given
    ///
    /// Next to the executable first, then ~/.voicebatch.
    pub fn search_dirs() -> Vec<PathBuf> {
        let mut dirs_to_search = Vec::new();
        if let Some(dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            dirs_to_search.push(dir);
        }
        if let Some(home) = dirs::home_dir() {
            dirs_to_search.push(home.join(".voicebatch"));
        }
        dirs_to_search
    }

    fn find_default() -> Result<PathBuf> {
        let searched = Self::search_dirs();
        for dir in &searched {
            for name in DEFAULT_FILE_NAMES {
                let candidate = dir.join(name);
                if candidate.exists() {
                    return Ok(candidate);
                }
            }
        }

        let searched: Vec<String> = searched.iter().map(|d| d.display().to_string()).collect();
        Err(VoiceBatchError::Config(format!(
            "no {} found (searched: {})",
            DEFAULT_FILE_NAMES.join(" / "),
            searched.join(", ")
        )))
    }

    /// File this config was read from, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Resolve a path from the config file against its directory
    pub fn resolve(&self, value: &str) -> PathBuf {
        let path = PathBuf::from(value);
        if path.is_absolute() {
            path
        } else {
            self.base_dir.join(path)
        }
    }

    /// Contact list path; required for batch runs
    pub fn input_list_path(&self) -> Result<PathBuf> {
        match self.input_list_path.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => Ok(self.resolve(p)),
            _ => Err(VoiceBatchError::Config(
                "inputListPath missing in configuration".to_string(),
            )),
        }
    }

    /// Parsed manual template; required for template runs
    pub fn manual_template(&self) -> Result<MessageTemplate> {
        let source = self.manual_message.as_deref().unwrap_or("").trim();
        if source.is_empty() {
            return Err(VoiceBatchError::Config(
                "manualMessage missing in configuration".to_string(),
            ));
        }
        Ok(MessageTemplate::parse(source)?)
    }

    pub fn audio_dir(&self) -> PathBuf {
        self.resolve(&self.output_dir)
    }

    pub fn text_dir(&self) -> PathBuf {
        self.resolve(&self.generated_text_dir)
    }

    pub fn license_path(&self) -> PathBuf {
        self.resolve(&self.license.path)
    }

    pub fn record_delay(&self) -> Duration {
        Duration::from_millis(self.record_delay_ms)
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs.max(1))
    }
}
