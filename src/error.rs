use thiserror::Error;

/// Błędy konfiguracji – zgłaszane raz, przy starcie.
/// Proces z błędną konfiguracją nie powinien wystartować.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid window policy for `{kind}`: {reason}")]
    InvalidPolicy { kind: String, reason: &'static str },

    #[error("pattern for term `{term}` could not be compiled: {source}")]
    Pattern {
        term: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid malicious-content pattern `{pattern}`: {source}")]
    LinkPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("vocabulary file {path}: {source}")]
    VocabularyIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("vocabulary file {path} is not valid JSON: {source}")]
    VocabularyFormat {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid strikes config: {0}")]
    Strikes(&'static str),
}

/// Błąd parsowania linii z feedu operatora.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FeedError {
    #[error("unknown verb `{0}`")]
    UnknownVerb(String),

    #[error("missing {0}")]
    Missing(&'static str),

    #[error("invalid id `{0}`")]
    InvalidId(String),

    #[error("unknown raid switch `{0}` (expected on|off|status)")]
    RaidSwitch(String),
}
