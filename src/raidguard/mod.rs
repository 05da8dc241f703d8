// src/raidguard/mod.rs

use std::collections::VecDeque;
use std::time::Instant;

use dashmap::DashMap;
use tracing::debug;

use crate::{ScopeId, SubjectId};

pub mod policy;

pub use policy::{EventKind, PolicyTable, WindowPolicy, FALLBACK_POLICY};

/// Pojedyncze zdarzenie w oknie. Scope i rodzaj siedzą w kluczu mapy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventRecord {
    pub subject: Option<SubjectId>,
    pub at: Instant,
}

/// Licznik zdarzeń w przesuwnym oknie (join-flood, spam, nuke kanałów/ról, bany).
///
/// Zwraca tylko werdykt `true/false` – żadnych akcji moderacyjnych.
/// Stan jest w pamięci, tworzony przy starcie i nigdy nie serializowany.
#[derive(Debug)]
pub struct RaidGuard {
    policies: PolicyTable,
    events: DashMap<(ScopeId, EventKind), VecDeque<EventRecord>>, // (guild, rodzaj)
    raid_mode: DashMap<ScopeId, bool>,
}

impl Default for RaidGuard {
    fn default() -> Self {
        Self::new(PolicyTable::default())
    }
}

impl RaidGuard {
    pub fn new(policies: PolicyTable) -> Self {
        Self {
            policies,
            events: DashMap::new(),
            raid_mode: DashMap::new(),
        }
    }

    pub fn policy(&self, kind: &EventKind) -> WindowPolicy {
        self.policies.get(kind)
    }

    /* ===========================
       Zdarzenia
       =========================== */

    /// Dołączenie członka. `true` gdy liczba joinów w oknie osiągnęła próg.
    pub fn record_join(&self, scope: ScopeId, subject: SubjectId) -> bool {
        self.record_join_at(scope, subject, Instant::now())
    }

    pub fn record_join_at(&self, scope: ScopeId, subject: SubjectId, at: Instant) -> bool {
        self.record_at(scope, &EventKind::Join, Some(subject), at)
    }

    /// Każde inne zdarzenie (wiadomość, kanał, rola, ban...).
    pub fn record_action(
        &self,
        scope: ScopeId,
        kind: &EventKind,
        subject: Option<SubjectId>,
    ) -> bool {
        self.record_at(scope, kind, subject, Instant::now())
    }

    pub fn record_action_at(
        &self,
        scope: ScopeId,
        kind: &EventKind,
        subject: Option<SubjectId>,
        at: Instant,
    ) -> bool {
        self.record_at(scope, kind, subject, at)
    }

    // append → evict → count → porównanie; całość pod blokadą wpisu (scope, kind)
    fn record_at(
        &self,
        scope: ScopeId,
        kind: &EventKind,
        subject: Option<SubjectId>,
        at: Instant,
    ) -> bool {
        let policy = self.policies.get(kind);

        let mut list = self.events.entry((scope, kind.clone())).or_default();
        list.push_back(EventRecord { subject, at });
        list.retain(|e| at.saturating_duration_since(e.at) < policy.window);

        let count = if policy.per_subject {
            list.iter().filter(|e| e.subject == subject).count()
        } else {
            list.len()
        };

        let breached = count >= policy.threshold as usize;
        if breached {
            debug!(
                scope,
                kind = %kind,
                subject = ?subject,
                count,
                threshold = policy.threshold,
                "window threshold reached"
            );
        }
        breached
    }

    /// Ile zdarzeń aktualnie siedzi w oknie (po ostatnim czyszczeniu).
    pub fn retained(&self, scope: ScopeId, kind: &EventKind) -> usize {
        self.events
            .get(&(scope, kind.clone()))
            .map(|l| l.len())
            .unwrap_or(0)
    }

    /* ===========================
       Raid mode (tylko flaga)
       =========================== */

    pub fn enable_raid_mode(&self, scope: ScopeId) {
        self.raid_mode.insert(scope, true);
    }

    pub fn disable_raid_mode(&self, scope: ScopeId) {
        self.raid_mode.insert(scope, false);
    }

    pub fn is_raid_mode_enabled(&self, scope: ScopeId) -> bool {
        self.raid_mode.get(&scope).map(|v| *v).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;

    fn secs(t0: Instant, s: u64) -> Instant {
        t0 + Duration::from_secs(s)
    }

    #[test]
    fn fifth_join_within_window_breaches() {
        let rg = RaidGuard::default();
        let t0 = Instant::now();
        for (i, s) in [0, 2, 4, 6].into_iter().enumerate() {
            assert!(!rg.record_join_at(1, i as u64, secs(t0, s)));
        }
        assert!(rg.record_join_at(1, 99, secs(t0, 8)));
        // dalej true, dopóki okno nie spadnie poniżej progu
        assert!(rg.record_join_at(1, 100, secs(t0, 9)));
    }

    #[test]
    fn window_elapsed_evicts_everything() {
        let rg = RaidGuard::default();
        let t0 = Instant::now();
        for i in 0..20 {
            rg.record_join_at(7, i, t0);
        }
        assert_eq!(rg.retained(7, &EventKind::Join), 20);
        assert!(!rg.record_join_at(7, 1, secs(t0, 10)));
        assert_eq!(rg.retained(7, &EventKind::Join), 1);
    }

    #[test]
    fn message_threshold_is_per_subject() {
        let rg = RaidGuard::default();
        let t0 = Instant::now();
        let msg = EventKind::Message;
        // 7 różnych osób, po jednej wiadomości – brak spamu
        for user in 0..7 {
            assert!(!rg.record_action_at(1, &msg, Some(user), t0));
        }
        for _ in 0..7 {
            assert!(!rg.record_action_at(1, &msg, Some(42), t0));
        }
        assert!(rg.record_action_at(1, &msg, Some(42), t0));
        // inny użytkownik nadal czysty
        assert!(!rg.record_action_at(1, &msg, Some(5), t0));
    }

    #[test]
    fn channel_deletes_count_across_subjects() {
        let rg = RaidGuard::default();
        let t0 = Instant::now();
        let kind = EventKind::ChannelDelete;
        assert!(!rg.record_action_at(3, &kind, Some(1), t0));
        assert!(!rg.record_action_at(3, &kind, Some(2), secs(t0, 1)));
        assert!(rg.record_action_at(3, &kind, None, secs(t0, 2)));
    }

    #[test]
    fn unknown_kind_uses_fallback_policy() {
        let rg = RaidGuard::default();
        let t0 = Instant::now();
        let kind = EventKind::Other("webhook_update".into());
        for _ in 0..9 {
            assert!(!rg.record_action_at(1, &kind, None, t0));
        }
        assert!(rg.record_action_at(1, &kind, None, secs(t0, 29)));
        // po 30s od pierwszego – pierwsze 9 wypada
        assert!(!rg.record_action_at(1, &kind, None, secs(t0, 30)));
    }

    #[test]
    fn threshold_of_one_breaches_immediately() {
        let table = PolicyTable::default().with(EventKind::Ban, WindowPolicy::new(1, 10, false));
        let rg = RaidGuard::new(table);
        assert!(rg.record_action(9, &EventKind::Ban, Some(1)));
    }

    #[test]
    fn scopes_are_isolated() {
        let rg = RaidGuard::default();
        let t0 = Instant::now();
        for i in 0..4 {
            rg.record_join_at(1, i, t0);
        }
        assert!(!rg.record_join_at(2, 1, t0));
        assert!(rg.record_join_at(1, 5, t0));
    }

    #[test]
    fn raid_mode_round_trip() {
        let rg = RaidGuard::default();
        assert!(!rg.is_raid_mode_enabled(5));
        rg.enable_raid_mode(5);
        assert!(rg.is_raid_mode_enabled(5));
        rg.disable_raid_mode(5);
        assert!(!rg.is_raid_mode_enabled(5));
    }

    #[test]
    fn breach_never_flips_raid_mode() {
        let rg = RaidGuard::default();
        let t0 = Instant::now();
        for i in 0..10 {
            rg.record_join_at(1, i, t0);
        }
        assert!(!rg.is_raid_mode_enabled(1));
    }

    proptest! {
        #[test]
        fn retained_events_stay_inside_window(gaps in proptest::collection::vec(0u64..4_000, 1..200)) {
            let rg = RaidGuard::default();
            let kind = EventKind::ChannelCreate;
            let window = rg.policy(&kind).window;
            let t0 = Instant::now();
            let mut now = t0;
            let mut times: Vec<Instant> = Vec::new();
            for gap in gaps {
                now += Duration::from_millis(gap);
                times.push(now);
                rg.record_action_at(1, &kind, Some(1), now);
                let live = times.iter().filter(|t| now.duration_since(**t) < window).count();
                prop_assert_eq!(rg.retained(1, &kind), live);
            }
        }
    }
}
