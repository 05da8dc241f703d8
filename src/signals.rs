use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::raidguard::EventKind;
use crate::strikes::StrikeVerdict;
use crate::wordguard::TermClass;
use crate::{AppContext, ScopeId, SubjectId};

/* =========================================
   Werdykty dla orkiestratora
   ========================================= */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JoinSignals {
    /// próg joinów w oknie osiągnięty
    pub raid: bool,
    /// aktualny stan flagi – ustawia ją wyłącznie orkiestrator
    pub raid_mode: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MessageSignals {
    pub spam: bool,
    pub malicious: Option<String>,
    pub matched_class: Option<TermClass>,
    pub matched_term: Option<String>,
    pub redacted: Option<String>,
    pub strike: Option<StrikeVerdict>,
}

impl MessageSignals {
    pub fn is_clean(&self) -> bool {
        !self.spam && self.malicious.is_none() && self.matched_class.is_none()
    }
}

/// Pipeline sygnałów – ta sama kolejność co w starym handlerze wiadomości:
/// spam → groźne linki → słownik.
pub struct Signals;

impl Signals {
    pub fn on_join(app: &AppContext, scope: ScopeId, subject: SubjectId) -> JoinSignals {
        let rg = app.raidguard();
        let raid = rg.record_join(scope, subject);
        let raid_mode = rg.is_raid_mode_enabled(scope);
        if raid && !raid_mode {
            info!(scope, subject, "join flood detected");
        }
        JoinSignals { raid, raid_mode }
    }

    /// Audyt: kanały, role, bany, uprawnienia...
    pub fn on_action(
        app: &AppContext,
        scope: ScopeId,
        kind: &EventKind,
        actor: Option<SubjectId>,
    ) -> bool {
        let nuke = app.raidguard().record_action(scope, kind, actor);
        if nuke {
            info!(scope, kind = %kind, actor = ?actor, "action threshold reached");
        }
        nuke
    }

    pub fn on_message(
        app: &AppContext,
        scope: ScopeId,
        subject: SubjectId,
        text: &str,
    ) -> MessageSignals {
        let mut out = MessageSignals {
            spam: app
                .raidguard()
                .record_action(scope, &EventKind::Message, Some(subject)),
            ..Default::default()
        };

        if let Some(label) = app.linkscan().scan(text) {
            out.malicious = Some(label.to_string());
            out.strike = Some(app.strikes().record_malicious(subject, Utc::now()));
            return out;
        }

        let wg = app.wordguard();
        if let Some(hit) = wg.find(text) {
            out.matched_class = Some(hit.class);
            out.matched_term = Some(hit.term.to_string());
            out.redacted = Some(wg.redact(text));
            out.strike = Some(app.strikes().record_language(subject, Utc::now()));
        }

        out
    }
}
