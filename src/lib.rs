// src/lib.rs

pub mod config;
pub mod error;
pub mod feed;
pub mod linkscan;
pub mod logging;
pub mod raidguard; // ← progi w przesuwnym oknie + flaga raid mode
pub mod signals;
pub mod strikes;
pub mod wordguard; // ← filtr słów odporny na leet/homoglify

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use config::Settings;
use linkscan::MaliciousScanner;
use raidguard::{PolicyTable, RaidGuard};
use strikes::{StrikeLedger, StrikePolicy};
use wordguard::{MatcherOptions, Vocabulary, WordGuard};

/// Granica izolacji (guild).
pub type ScopeId = u64;
/// Aktor zdarzenia (user).
pub type SubjectId = u64;

/// Globalny kontekst aplikacji.
/// Tworzony raz przy starcie i przekazywany jawnie – żadnych globalnych map.
#[derive(Debug)]
pub struct AppContext {
    pub settings: Settings,
    raidguard: RaidGuard,
    wordguard: Arc<WordGuard>,
    linkscan: MaliciousScanner,
    strikes: StrikeLedger,
}

impl AppContext {
    /// Bootstrap całej aplikacji:
    /// - logi
    /// - walidacja konfiguracji i budowa serwisów
    pub async fn bootstrap(settings: Settings) -> Result<Arc<Self>> {
        // 1) logi
        logging::init(&settings);

        // 2) serwisy – błędny config = brak startu
        let ctx = Self::build(settings)?;
        info!(
            env = %ctx.settings.env,
            rules = ctx.wordguard.rules().len(),
            "signal core ready"
        );
        Ok(ctx)
    }

    /// Budowa bez inicjalizacji logów (testy, narzędzia).
    pub fn build(settings: Settings) -> Result<Arc<Self>> {
        let policies = PolicyTable::from_config(&settings.raidguard)?;

        let vocabulary = Vocabulary::from_config(&settings.wordguard)?;
        let opts = MatcherOptions {
            size_limit: settings.wordguard.regex_size_limit,
        };
        let wordguard = WordGuard::with_options(&vocabulary, opts)?;

        let linkscan = MaliciousScanner::with_extra(&settings.linkscan.extra_patterns)?;
        let strikes = StrikePolicy::from_config(&settings.strikes)?;

        Ok(Arc::new(Self {
            raidguard: RaidGuard::new(policies),
            wordguard: Arc::new(wordguard),
            linkscan,
            strikes: StrikeLedger::new(strikes),
            settings,
        }))
    }

    pub fn raidguard(&self) -> &RaidGuard {
        &self.raidguard
    }

    /// Skompilowany słownik – tylko odczyt, można go oddać innym taskom.
    pub fn wordguard(&self) -> Arc<WordGuard> {
        self.wordguard.clone()
    }

    pub fn linkscan(&self) -> &MaliciousScanner {
        &self.linkscan
    }

    pub fn strikes(&self) -> &StrikeLedger {
        &self.strikes
    }
}

/// Start pętli feedu (stdin → werdykty JSON na stdout).
pub async fn run(ctx: Arc<AppContext>) -> Result<()> {
    feed::run_stdin(ctx).await
}
