use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use serde::Serialize;

use crate::config::StrikesConfig;
use crate::error::ConfigError;
use crate::SubjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Language,
    Malicious,
}

/// Rekomendacja dla orkiestratora – ledger sam nikogo nie wycisza.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StrikeVerdict {
    pub strike: u32,
    pub timeout_minutes: Option<u32>,
    pub severity: Severity,
}

impl StrikeVerdict {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_minutes.map(|m| Duration::minutes(m as i64))
    }
}

#[derive(Debug, Clone, Copy)]
struct StrikeRecord {
    count: u32,
    last_warning: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct StrikePolicy {
    ladder_minutes: Vec<u32>,
    reset_after: Duration,
    malicious_floor_minutes: u32,
}

impl Default for StrikePolicy {
    fn default() -> Self {
        Self {
            ladder_minutes: vec![1, 2, 3, 4, 5],
            reset_after: Duration::hours(24),
            malicious_floor_minutes: 5,
        }
    }
}

impl StrikePolicy {
    pub fn from_config(cfg: &StrikesConfig) -> Result<Self, ConfigError> {
        if cfg.ladder_minutes.is_empty() {
            return Err(ConfigError::Strikes("ladder_minutes must not be empty"));
        }
        if cfg.ladder_minutes.contains(&0) {
            return Err(ConfigError::Strikes("ladder_minutes entries must be > 0"));
        }
        if cfg.reset_hours == 0 {
            return Err(ConfigError::Strikes("reset_hours must be > 0"));
        }
        Ok(Self {
            ladder_minutes: cfg.ladder_minutes.clone(),
            reset_after: Duration::hours(cfg.reset_hours as i64),
            malicious_floor_minutes: cfg.malicious_floor_minutes,
        })
    }

    fn rung(&self, count: u32) -> u32 {
        let idx = (count.saturating_sub(1) as usize).min(self.ladder_minutes.len() - 1);
        self.ladder_minutes[idx]
    }
}

/// Licznik ostrzeżeń per użytkownik z drabinką timeoutów.
#[derive(Debug, Default)]
pub struct StrikeLedger {
    policy: StrikePolicy,
    records: DashMap<SubjectId, StrikeRecord>,
}

impl StrikeLedger {
    pub fn new(policy: StrikePolicy) -> Self {
        Self {
            policy,
            records: DashMap::new(),
        }
    }

    /// Wulgaryzm: pierwszy raz tylko ostrzeżenie, potem timeout wg drabinki.
    /// Po okresie ciszy (domyślnie 24h) licznik startuje od zera.
    pub fn record_language(&self, subject: SubjectId, now: DateTime<Utc>) -> StrikeVerdict {
        let mut rec = self.records.entry(subject).or_insert(StrikeRecord {
            count: 0,
            last_warning: now,
        });
        if now - rec.last_warning > self.policy.reset_after {
            rec.count = 0;
        }
        rec.count = rec.count.saturating_add(1);
        rec.last_warning = now;

        let timeout_minutes = (rec.count > 1).then(|| self.policy.rung(rec.count));
        StrikeVerdict {
            strike: rec.count,
            timeout_minutes,
            severity: Severity::Language,
        }
    }

    /// Scam/phishing: skok licznika o 2 (min. 3) i zawsze timeout, nie krótszy niż floor.
    pub fn record_malicious(&self, subject: SubjectId, now: DateTime<Utc>) -> StrikeVerdict {
        let mut rec = self.records.entry(subject).or_insert(StrikeRecord {
            count: 0,
            last_warning: now,
        });
        rec.count = rec.count.saturating_add(2).max(3);
        rec.last_warning = now;

        let minutes = self.policy.rung(rec.count).max(self.policy.malicious_floor_minutes);
        StrikeVerdict {
            strike: rec.count,
            timeout_minutes: Some(minutes),
            severity: Severity::Malicious,
        }
    }

    pub fn strikes(&self, subject: SubjectId) -> u32 {
        self.records.get(&subject).map(|r| r.count).unwrap_or(0)
    }

    pub fn reset(&self, subject: SubjectId) {
        self.records.remove(&subject);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_ladder_escalates_and_caps() {
        let ledger = StrikeLedger::default();
        let t0 = Utc::now();
        let first = ledger.record_language(1, t0);
        assert_eq!(first.strike, 1);
        assert_eq!(first.timeout_minutes, None);

        let second = ledger.record_language(1, t0 + Duration::minutes(1));
        assert_eq!(second.timeout_minutes, Some(2));
        assert_eq!(second.timeout(), Some(Duration::minutes(2)));

        let mut last = second;
        for i in 0..6 {
            last = ledger.record_language(1, t0 + Duration::minutes(2 + i));
        }
        assert_eq!(last.strike, 8);
        assert_eq!(last.timeout_minutes, Some(5));
    }

    #[test]
    fn quiet_period_resets_count() {
        let ledger = StrikeLedger::default();
        let t0 = Utc::now();
        ledger.record_language(1, t0);
        ledger.record_language(1, t0 + Duration::hours(1));
        assert_eq!(ledger.strikes(1), 2);
        let v = ledger.record_language(1, t0 + Duration::hours(26));
        assert_eq!(v.strike, 1);
        assert_eq!(v.timeout_minutes, None);
    }

    #[test]
    fn malicious_starts_at_three_with_floor() {
        let ledger = StrikeLedger::default();
        let t0 = Utc::now();
        let v = ledger.record_malicious(7, t0);
        assert_eq!(v.strike, 3);
        assert_eq!(v.timeout_minutes, Some(5));
        assert_eq!(v.severity, Severity::Malicious);

        let v = ledger.record_malicious(7, t0);
        assert_eq!(v.strike, 5);
    }

    #[test]
    fn count_saturates_instead_of_overflowing() {
        let ledger = StrikeLedger::default();
        let t0 = Utc::now();
        ledger.records.insert(
            9,
            StrikeRecord {
                count: u32::MAX - 1,
                last_warning: t0,
            },
        );
        assert_eq!(ledger.record_malicious(9, t0).strike, u32::MAX);
        let v = ledger.record_language(9, t0);
        assert_eq!(v.strike, u32::MAX);
        assert_eq!(v.timeout_minutes, Some(5));
    }

    #[test]
    fn reset_forgets_subject() {
        let ledger = StrikeLedger::default();
        ledger.record_language(3, Utc::now());
        ledger.reset(3);
        assert_eq!(ledger.strikes(3), 0);
    }

    #[test]
    fn config_validation() {
        let mut cfg = StrikesConfig::default();
        assert!(StrikePolicy::from_config(&cfg).is_ok());
        cfg.ladder_minutes.clear();
        assert!(StrikePolicy::from_config(&cfg).is_err());
        cfg.ladder_minutes = vec![1, 0];
        assert!(StrikePolicy::from_config(&cfg).is_err());
    }
}
