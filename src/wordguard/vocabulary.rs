use std::path::Path;

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use crate::config::WordGuardConfig;
use crate::error::ConfigError;

/// Klasa terminu – orkiestrator decyduje o surowości kary po klasie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermClass {
    Profanity,
    Harassment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VocabularyEntry {
    pub term: String,
    pub class: TermClass,
}

/// Uporządkowana lista zakazanych terminów (kolejność = kolejność reguł).
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    entries: Vec<VocabularyEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct VocabularyFile {
    #[serde(default)]
    profanity: Vec<String>,
    #[serde(default)]
    harassment: Vec<String>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dodaje termin (NFC + lowercase). Puste terminy są pomijane.
    pub fn push(&mut self, term: &str, class: TermClass) {
        let term = normalize_term(term);
        if term.is_empty() {
            return;
        }
        self.entries.push(VocabularyEntry { term, class });
    }

    pub fn extend<I, S>(&mut self, class: TermClass, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for t in terms {
            self.push(t.as_ref(), class);
        }
    }

    pub fn with_terms<I, S>(class: TermClass, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut v = Self::new();
        v.extend(class, terms);
        v
    }

    /// Wbudowana lista bota: najpierw wulgaryzmy, potem nękanie.
    pub fn builtin() -> Self {
        let mut v = Self::new();
        v.extend(TermClass::Profanity, BUILTIN_PROFANITY.iter());
        v.extend(TermClass::Harassment, BUILTIN_HARASSMENT.iter());
        v
    }

    /// Plik JSON: `{"profanity": [...], "harassment": [...]}`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::VocabularyIo {
            path: shown.clone(),
            source,
        })?;
        let file: VocabularyFile =
            serde_json::from_str(&raw).map_err(|source| ConfigError::VocabularyFormat {
                path: shown,
                source,
            })?;

        let mut v = Self::new();
        v.extend(TermClass::Profanity, file.profanity);
        v.extend(TermClass::Harassment, file.harassment);
        Ok(v)
    }

    /// Składa słownik z konfiguracji: builtin → listy z configu → plik.
    pub fn from_config(cfg: &WordGuardConfig) -> Result<Self, ConfigError> {
        let mut v = if cfg.builtin { Self::builtin() } else { Self::new() };
        v.extend(TermClass::Profanity, &cfg.profanity);
        v.extend(TermClass::Harassment, &cfg.harassment);
        if let Some(path) = &cfg.vocabulary_file {
            v.entries.extend(Self::from_json_file(path)?.entries);
        }
        Ok(v)
    }

    pub fn entries(&self) -> &[VocabularyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize_term(s: &str) -> String {
    s.trim().nfc().collect::<String>().to_lowercase()
}

pub static BUILTIN_PROFANITY: &[&str] = &[
    "fuck", "shit", "bitch", "cunt", "dick", "cock", "pussy", "asshole", "whore",
    "slut", "bastard", "damn", "nigger", "nigga", "niger", "n1gger", "n1gga", "retard", "faggot", "fag",
    "nazi", "kike", "chink", "spic", "porn", "sex", "penis", "vagina", "ass",
    "@buse", "@ss", "a$$", "abuse", "animal ka", "ape", "arse",
    "b!tch", "b!tch$", "b0b0", "b1tch", "b1tch$", "basterd", "bayut", "b**bs",
    "bich", "bj", "bjay", "blowjob", "bob0", "bobo", "bomb", "boobs", "b*tch",
    "btch", "bwisit", "b*yut",
    "c#nk", "c0ck", "c*ck", "ch!n", "ch!nk", "ch!n*k", "ch@nk", "ch1ld molester",
    "ch1nk", "ch1n*k", "child molester", "child porn", "c*hild porn", "ch*ld molester",
    "ch*ld p0rn", "ch*nk", "c*m", "cracker", "cum", "cut myself",
    "d1ck", "dam", "d*ck", "d*e", "d*mn", "dmn", "dumbass",
    "f.u.c.k", "f@ck", "f@g", "f@gger", "f@gget", "f@ggot", "f@got", "f4ggot",
    "f*ck", "fck", "f*g", "f*gg", "f*ggot", "fuk", "fuxk",
    "g!psy", "g1psy", "gaga", "gaga ka", "gago", "gago ka", "g*go", "go die", "g*psy",
    "gyp$y", "gypsy",
    "h3ll", "hayop ka", "h*e", "hell", "hentai", "hindot", "hind*t", "hindutan",
    "jizz",
    "k!ke", "k@ke", "k0ke", "k1ke", "k1ll", "kabaklaan", "k*ke", "k*ke$", "k*ll", "k*nt",
    "lantarang kabastusan", "leche", "lintik",
    "m0lest", "makibaka", "m*l3st", "m*lest", "m*l*st", "monkey",
    "n!gga", "n!gger", "n@gga", "n@gger", "n€gger", "n0gga", "n0gger", "n1gga", "n1gger",
    "n3gg3r", "n3gga", "n*gga", "n*gger", "nsfw", "nude", "nudes",
    "p-uta", "p-utangina", "p@ta", "p0rn", "p3do", "p3dophile", "pakyu", "pakyu ka",
    "paq you", "paqyu", "p*d0", "p*do", "p*dophile", "p*doporn", "pedo", "pedophile",
    "peste", "p*k", "p*k yu", "p*kyu", "p*kyu ka", "p*nis", "p*rn", "p*ssy", "p*ssy$",
    "p*sty", "p*ta", "p*tangina", "pussi", "put*", "puta", "putang ina", "putang-ina",
    "putangina", "put*ngina",
    "r@pe", "r4pe", "rapist", "rap*st", "r*pe", "r*pist", "r*tard",
    "s.hit", "s3x", "sandn!gga", "sandn@gga", "sandn@gger", "sandn*gger", "selfharm",
    "sh*t", "sht", "sl*t", "sp!c", "sp@c", "sp0c", "sp1c", "sp*c", "sp*c$", "s*x",
    "t!nny", "t@nga", "t0welhead", "tang-ina", "tanga", "tangina", "tangina mo",
    "tanginamo", "t*anny", "tarantado", "terrorist", "tits", "t*nga", "t*ngina",
    "towelhead", "tr@nn@", "tr@nny", "tr4nny", "tranny", "tr*nny", "t*ts", "t*welh3ad",
    "t*welhead",
    "ul*l", "ulol",
    "walang hiya", "walanghiya", "wh*re",
];

pub static BUILTIN_HARASSMENT: &[&str] = &[
    "kill yourself", "kys", "suicide", "hang yourself", "end yourself",
    "rape", "raping", "molest", "molesting", "sexual", "pedophile",
    "die", "hang", "neck yourself",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn push_normalizes_and_skips_empty() {
        let mut v = Vocabulary::new();
        v.push("  FUCK ", TermClass::Profanity);
        v.push("   ", TermClass::Profanity);
        // "e" + łączący akcent → jeden znak "é"
        v.push("caf\u{0065}\u{0301}", TermClass::Profanity);
        assert_eq!(v.len(), 2);
        assert_eq!(v.entries()[0].term, "fuck");
        assert_eq!(v.entries()[1].term, "café");
    }

    #[test]
    fn builtin_keeps_class_order() {
        let v = Vocabulary::builtin();
        assert_eq!(v.entries()[0].class, TermClass::Profanity);
        assert_eq!(v.entries().last().map(|e| e.class), Some(TermClass::Harassment));
        assert_eq!(v.len(), BUILTIN_PROFANITY.len() + BUILTIN_HARASSMENT.len());
    }

    #[test]
    fn loads_json_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"profanity": ["darn"], "harassment": ["go away forever"]}}"#).unwrap();
        let v = Vocabulary::from_json_file(f.path()).unwrap();
        assert_eq!(v.len(), 2);
        assert_eq!(v.entries()[1].class, TermClass::Harassment);
    }

    #[test]
    fn broken_json_is_config_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "[not json").unwrap();
        let err = Vocabulary::from_json_file(f.path()).unwrap_err();
        assert!(matches!(err, ConfigError::VocabularyFormat { .. }));
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = Vocabulary::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::VocabularyIo { .. }));
    }

    #[test]
    fn config_merges_lists_without_builtin() {
        let cfg = WordGuardConfig {
            builtin: false,
            profanity: vec!["darn".into()],
            harassment: vec!["get lost".into()],
            ..Default::default()
        };
        let v = Vocabulary::from_config(&cfg).unwrap();
        assert_eq!(v.len(), 2);
    }
}
