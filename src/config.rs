use std::collections::HashMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub env: String,
    pub app: App,
    pub logging: Logging,
    #[serde(default)]
    pub raidguard: RaidGuardConfig,
    #[serde(default)]
    pub wordguard: WordGuardConfig,
    #[serde(default)]
    pub linkscan: LinkScanConfig,
    #[serde(default)]
    pub strikes: StrikesConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct App {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Logging {
    pub level: Option<String>,
    /// dopisuje target (moduł) do każdej linii logu
    #[serde(default)]
    pub with_target: bool,
}

/// Jeden wpis tabeli progów: `threshold` zdarzeń w `window_secs` sekund.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PolicyConfig {
    pub threshold: u32,
    pub window_secs: u64,
    #[serde(default)]
    pub per_subject: bool,
}

/// Brak wpisu → wartości domyślne bota (patrz `raidguard::policy`).
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RaidGuardConfig {
    pub join: Option<PolicyConfig>,
    pub fallback: Option<PolicyConfig>,
    /// klucz = nazwa rodzaju zdarzenia, np. "channel_delete"
    #[serde(default)]
    pub policies: HashMap<String, PolicyConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WordGuardConfig {
    #[serde(default = "default_true")]
    pub builtin: bool,
    #[serde(default)]
    pub profanity: Vec<String>,
    #[serde(default)]
    pub harassment: Vec<String>,
    pub vocabulary_file: Option<String>,
    pub regex_size_limit: Option<usize>,
}

impl Default for WordGuardConfig {
    fn default() -> Self {
        Self {
            builtin: true,
            profanity: vec![],
            harassment: vec![],
            vocabulary_file: None,
            regex_size_limit: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LinkScanConfig {
    #[serde(default)]
    pub extra_patterns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StrikesConfig {
    pub ladder_minutes: Vec<u32>,
    pub reset_hours: u32,
    pub malicious_floor_minutes: u32,
}

impl Default for StrikesConfig {
    fn default() -> Self {
        Self {
            ladder_minutes: vec![1, 2, 3, 4, 5],
            reset_hours: 24,
            malicious_floor_minutes: 5,
        }
    }
}

fn default_true() -> bool {
    true
}

impl Settings {
    /// Ustawienia bez żadnych plików/ENV – same wartości domyślne.
    pub fn defaults(env: &str) -> Self {
        Self {
            env: env.to_string(),
            app: App {
                name: "Tigris Signals".into(),
            },
            logging: Logging {
                level: Some("info".into()),
                with_target: false,
            },
            raidguard: RaidGuardConfig::default(),
            wordguard: WordGuardConfig::default(),
            linkscan: LinkScanConfig::default(),
            strikes: StrikesConfig::default(),
        }
    }

    pub fn load() -> Result<Self> {
        // Które środowisko?
        let env = std::env::var("TSS_ENV").unwrap_or_else(|_| "development".to_string());

        // Załaduj .env.<env> i .env (jeśli są)
        let _ = dotenvy::from_filename(format!(".env.{}", env));
        let _ = dotenvy::dotenv();

        Self::load_from(
            Figment::from(Serialized::defaults(Self::defaults(&env)))
                .merge(Toml::file(format!("config/{}.toml", env)))
                // TSS_WORDGUARD__VOCABULARY_FILE => wordguard.vocabulary_file itd.
                .merge(Env::prefixed("TSS_").split("__")),
            env,
        )
    }

    /// Ekstrakcja z gotowego figmenta (testy podają własne warstwy).
    pub fn load_from(figment: Figment, env: String) -> Result<Self> {
        let mut s: Settings = figment.extract()?;
        s.env = env;

        // Uzupełnij brakujące domyślne
        if s.logging.level.is_none() {
            s.logging.level = Some("info".into());
        }

        Ok(s)
    }
}
