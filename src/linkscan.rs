use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::error::ConfigError;

/* =========================================
   Scam / porn / phishing – słowa kluczowe
   ========================================= */

const DEFAULT_PATTERNS: &[&str] = &[
    // porn
    "porn", "xxx", "sex", "adult", "nude", "naked",
    // scamy discordowe
    "free.?nitro", "discord.?nitro", "steam.?gift",
    // scamy growe
    "giveaway", "free.?robux", "free.?vbucks",
    // phishing
    "account.?steal", "password.?hack", "login.?info",
    // malware wprost
    "viruslink", "malware", "trojan", "suspicious.?site",
];

static RE_DEFAULT: Lazy<Vec<(String, Regex)>> = Lazy::new(|| {
    DEFAULT_PATTERNS
        .iter()
        .map(|p| (p.to_string(), build(p).unwrap()))
        .collect()
});

/// Wzorzec zostaje taki, jak go podano (`\S` ≠ `\s`); wielkość liter ignoruje regex.
fn build(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Szybki skaner "groźnej" treści. Trafienie = poważniejsze naruszenie niż wulgaryzm.
#[derive(Debug, Clone)]
pub struct MaliciousScanner {
    patterns: Vec<(String, Regex)>,
}

impl Default for MaliciousScanner {
    fn default() -> Self {
        Self {
            patterns: RE_DEFAULT.clone(),
        }
    }
}

impl MaliciousScanner {
    /// Domyślna lista + dodatkowe wzorce z configu (błędny wzorzec → błąd startu).
    pub fn with_extra<I, S>(extra: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scanner = Self::default();
        for p in extra {
            let p = p.as_ref().trim();
            if p.is_empty() {
                continue;
            }
            let re = build(p).map_err(|source| ConfigError::LinkPattern {
                pattern: p.to_string(),
                source,
            })?;
            scanner.patterns.push((p.to_string(), re));
        }
        Ok(scanner)
    }

    /// Etykieta pierwszego pasującego wzorca.
    pub fn scan(&self, text: &str) -> Option<&str> {
        if text.is_empty() {
            return None;
        }
        self.patterns
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(label, _)| label.as_str())
    }

    pub fn is_malicious(&self, text: &str) -> bool {
        self.scan(text).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_scam_keywords() {
        let s = MaliciousScanner::default();
        assert_eq!(s.scan("get FREE NITRO here"), Some("free.?nitro"));
        assert_eq!(s.scan("Steam-Gift for you"), Some("steam.?gift"));
        assert!(s.is_malicious("check my trojan"));
    }

    #[test]
    fn clean_text_passes() {
        let s = MaliciousScanner::default();
        assert!(!s.is_malicious("hello there"));
        assert!(!s.is_malicious(""));
    }

    #[test]
    fn extra_patterns_are_appended() {
        let s = MaliciousScanner::with_extra(["grab.?ify", "  "]).unwrap();
        assert_eq!(s.scan("grabify.link/abc"), Some("grab.?ify"));
    }

    #[test]
    fn extra_pattern_keeps_uppercase_escapes() {
        let s = MaliciousScanner::with_extra([r"nitro\S+gift", r"Gift\D+card"]).unwrap();
        assert_eq!(s.scan("NITRO-gift"), Some(r"nitro\S+gift"));
        assert_eq!(s.scan("nitro gift"), None);
        assert_eq!(s.scan("gift-card"), Some(r"Gift\D+card"));
        assert_eq!(s.scan("gift7card"), None);
    }

    #[test]
    fn invalid_extra_pattern_fails() {
        let err = MaliciousScanner::with_extra(["(unclosed"]).unwrap_err();
        assert!(matches!(err, ConfigError::LinkPattern { .. }));
    }
}
