use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";
pub const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";
pub const DEFAULT_API_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_LOG_FILE: &str = "studybot_debug.log";
pub const DEFAULT_CHAT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_QUIZ_TEMPERATURE: f32 = 0.5;
pub const DEFAULT_STATIC_DELAY_MS: u64 = 500;
pub const DEFAULT_MAX_DOCUMENT_CHARS: usize = 12_000;

#[derive(Parser, Debug)]
#[command(name = "studybot", version, about = "Terminal study companion with an AI tutor")]
pub struct Cli {
    #[arg(long, help = "Model identifier sent to the completions endpoint")]
    pub model: Option<String>,

    #[arg(long, help = "Chat completions endpoint URL, ending in /chat/completions")]
    pub api_url: Option<String>,

    #[arg(long, help = "Debug log file")]
    pub log_file: Option<PathBuf>,

    #[arg(long, help = "Start the quiz in AI mode")]
    pub ai: bool,

    #[arg(long, help = "Preload the learning context from a text file")]
    pub context_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub api_url: String,
    pub log_file: PathBuf,
    pub chat_temperature: f32,
    pub quiz_temperature: f32,
    pub static_delay: Duration,
    pub max_document_chars: usize,
    pub start_in_ai_mode: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            chat_temperature: DEFAULT_CHAT_TEMPERATURE,
            quiz_temperature: DEFAULT_QUIZ_TEMPERATURE,
            static_delay: Duration::from_millis(DEFAULT_STATIC_DELAY_MS),
            max_document_chars: DEFAULT_MAX_DOCUMENT_CHARS,
            start_in_ai_mode: false,
        }
    }
}

impl Config {
    /// Builds the runtime config. The API key is read once, here, from
    /// `OPENROUTER_API_KEY`.
    pub fn from_cli(cli: &Cli) -> Self {
        Self::from_parts(cli, std::env::var(API_KEY_VAR).ok())
    }

    pub fn from_parts(cli: &Cli, api_key: Option<String>) -> Self {
        let mut config = Config {
            api_key: api_key
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            start_in_ai_mode: cli.ai,
            ..Config::default()
        };

        if let Some(model) = &cli.model {
            config.model = model.clone();
        }
        if let Some(url) = &cli.api_url {
            config.api_url = url.clone();
        }
        if let Some(path) = &cli.log_file {
            config.log_file = path.clone();
        }

        config
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut full = vec!["studybot"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.static_delay, Duration::from_millis(500));
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_from_cli_overrides() {
        let parsed = cli(&[
            "--model",
            "openai/gpt-4o-mini",
            "--ai",
            "--log-file",
            "/tmp/x.log",
        ]);
        let config = Config::from_parts(&parsed, Some("sk-test".to_string()));
        assert_eq!(config.model, "openai/gpt-4o-mini");
        assert!(config.start_in_ai_mode);
        assert_eq!(config.log_file, PathBuf::from("/tmp/x.log"));
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_blank_api_key_is_treated_as_missing() {
        let parsed = cli(&[]);
        let config = Config::from_parts(&parsed, Some("   ".to_string()));
        assert!(!config.has_api_key());
    }
}
