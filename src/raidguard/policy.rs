use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::config::{PolicyConfig, RaidGuardConfig};
use crate::error::ConfigError;

/// Rodzaje zdarzeń śledzonych przez RaidGuard.
/// `Other` trzyma nieznane nazwy – lecą na politykę domyślną, a nie na błąd.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    Join,
    Message,
    ChannelCreate,
    ChannelDelete,
    RoleCreate,
    RoleDelete,
    RoleUpdate,
    Ban,
    Kick,
    PermissionUpdate,
    Other(String),
}

impl EventKind {
    pub const KNOWN: [EventKind; 10] = [
        EventKind::Join,
        EventKind::Message,
        EventKind::ChannelCreate,
        EventKind::ChannelDelete,
        EventKind::RoleCreate,
        EventKind::RoleDelete,
        EventKind::RoleUpdate,
        EventKind::Ban,
        EventKind::Kick,
        EventKind::PermissionUpdate,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Join => "join",
            EventKind::Message => "message",
            EventKind::ChannelCreate => "channel_create",
            EventKind::ChannelDelete => "channel_delete",
            EventKind::RoleCreate => "role_create",
            EventKind::RoleDelete => "role_delete",
            EventKind::RoleUpdate => "role_update",
            EventKind::Ban => "ban",
            EventKind::Kick => "kick",
            EventKind::PermissionUpdate => "permission_update",
            EventKind::Other(name) => name,
        }
    }
}

impl FromStr for EventKind {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase();
        Ok(EventKind::KNOWN
            .iter()
            .find(|k| k.as_str() == norm)
            .cloned()
            .unwrap_or(EventKind::Other(norm)))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Próg + okno dla jednego rodzaju zdarzeń.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPolicy {
    pub threshold: u32,
    pub window: Duration,
    /// true → liczymy tylko zdarzenia danego aktora (np. spam wiadomości)
    pub per_subject: bool,
}

impl WindowPolicy {
    pub const fn new(threshold: u32, window_secs: u64, per_subject: bool) -> Self {
        Self {
            threshold,
            window: Duration::from_secs(window_secs),
            per_subject,
        }
    }

    fn from_config(kind: &str, cfg: &PolicyConfig) -> Result<Self, ConfigError> {
        if cfg.threshold == 0 {
            return Err(ConfigError::InvalidPolicy {
                kind: kind.to_string(),
                reason: "threshold must be at least 1",
            });
        }
        if cfg.window_secs == 0 {
            return Err(ConfigError::InvalidPolicy {
                kind: kind.to_string(),
                reason: "window must be longer than 0s",
            });
        }
        Ok(Self::new(cfg.threshold, cfg.window_secs, cfg.per_subject))
    }
}

/// Polityka awaryjna dla rodzajów bez wpisu.
pub const FALLBACK_POLICY: WindowPolicy = WindowPolicy::new(10, 30, false);

/// Domyślne progi bota (stare wartości z produkcji).
pub fn default_policy(kind: &EventKind) -> WindowPolicy {
    match kind {
        EventKind::Join => WindowPolicy::new(5, 10, false),
        EventKind::Message => WindowPolicy::new(8, 5, true),
        EventKind::ChannelCreate | EventKind::ChannelDelete => WindowPolicy::new(3, 20, false),
        EventKind::RoleCreate | EventKind::RoleDelete | EventKind::RoleUpdate => {
            WindowPolicy::new(3, 30, false)
        }
        EventKind::Ban | EventKind::Kick => WindowPolicy::new(4, 10, false),
        EventKind::PermissionUpdate => WindowPolicy::new(5, 15, false),
        EventKind::Other(_) => FALLBACK_POLICY,
    }
}

/// Statyczna tabela polityk – ładowana raz, potem tylko odczyt.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    policies: HashMap<EventKind, WindowPolicy>,
    fallback: WindowPolicy,
}

impl Default for PolicyTable {
    fn default() -> Self {
        let policies = EventKind::KNOWN
            .iter()
            .map(|k| (k.clone(), default_policy(k)))
            .collect();
        Self {
            policies,
            fallback: FALLBACK_POLICY,
        }
    }
}

impl PolicyTable {
    /// Buduje tabelę z konfiguracji i waliduje każdy wpis.
    pub fn from_config(cfg: &RaidGuardConfig) -> Result<Self, ConfigError> {
        let mut table = Self::default();

        if let Some(join) = &cfg.join {
            table
                .policies
                .insert(EventKind::Join, WindowPolicy::from_config("join", join)?);
        }
        if let Some(fallback) = &cfg.fallback {
            table.fallback = WindowPolicy::from_config("fallback", fallback)?;
        }
        for (name, pc) in &cfg.policies {
            let Ok(kind) = name.parse::<EventKind>();
            let policy = WindowPolicy::from_config(name, pc)?;
            table.policies.insert(kind, policy);
        }
        Ok(table)
    }

    /// Nadpisanie pojedynczej polityki (np. w testach).
    pub fn with(mut self, kind: EventKind, policy: WindowPolicy) -> Self {
        self.policies.insert(kind, policy);
        self
    }

    pub fn get(&self, kind: &EventKind) -> WindowPolicy {
        self.policies.get(kind).copied().unwrap_or(self.fallback)
    }

    pub fn fallback(&self) -> WindowPolicy {
        self.fallback
    }
}
