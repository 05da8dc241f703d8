//! Feed operatora: zdarzenia linia po linii ze stdin, werdykt jako JSON na stdout.
//!
//! ```text
//! join   <scope> <subject>
//! msg    <scope> <subject> <tekst...>
//! action <scope> <kind> <subject|->
//! raid   on|off|status <scope>
//! ```

use std::sync::Arc;

use anyhow::Result;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use crate::error::FeedError;
use crate::raidguard::EventKind;
use crate::signals::Signals;
use crate::{AppContext, ScopeId, SubjectId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaidSwitch {
    On,
    Off,
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Join {
        scope: ScopeId,
        subject: SubjectId,
    },
    Message {
        scope: ScopeId,
        subject: SubjectId,
        text: String,
    },
    Action {
        scope: ScopeId,
        kind: EventKind,
        subject: Option<SubjectId>,
    },
    Raid {
        scope: ScopeId,
        switch: RaidSwitch,
    },
}

/// `Ok(None)` dla pustych linii i komentarzy (`#`).
pub fn parse_line(line: &str) -> Result<Option<Command>, FeedError> {
    let mut rest = line.trim();
    if rest.is_empty() || rest.starts_with('#') {
        return Ok(None);
    }

    let verb = next_token(&mut rest).unwrap_or_default();
    let cmd = match verb {
        "join" => Command::Join {
            scope: parse_id(next_token(&mut rest), "scope")?,
            subject: parse_id(next_token(&mut rest), "subject")?,
        },
        "msg" => Command::Message {
            scope: parse_id(next_token(&mut rest), "scope")?,
            subject: parse_id(next_token(&mut rest), "subject")?,
            text: rest.trim_start().to_string(),
        },
        "action" => {
            let scope = parse_id(next_token(&mut rest), "scope")?;
            let kind = next_token(&mut rest).ok_or(FeedError::Missing("kind"))?;
            let Ok(kind) = kind.parse::<EventKind>();
            let subject = match next_token(&mut rest) {
                None | Some("-") => None,
                some => Some(parse_id(some, "subject")?),
            };
            Command::Action { scope, kind, subject }
        }
        "raid" => {
            let switch = match next_token(&mut rest) {
                Some("on") => RaidSwitch::On,
                Some("off") => RaidSwitch::Off,
                Some("status") => RaidSwitch::Status,
                Some(other) => return Err(FeedError::RaidSwitch(other.to_string())),
                None => return Err(FeedError::Missing("raid switch")),
            };
            Command::Raid {
                scope: parse_id(next_token(&mut rest), "scope")?,
                switch,
            }
        }
        other => return Err(FeedError::UnknownVerb(other.to_string())),
    };
    Ok(Some(cmd))
}

fn next_token<'a>(rest: &mut &'a str) -> Option<&'a str> {
    let s = rest.trim_start();
    if s.is_empty() {
        *rest = s;
        return None;
    }
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    let (tok, tail) = s.split_at(end);
    *rest = tail;
    Some(tok)
}

fn parse_id(tok: Option<&str>, what: &'static str) -> Result<u64, FeedError> {
    let tok = tok.ok_or(FeedError::Missing(what))?;
    tok.parse()
        .map_err(|_| FeedError::InvalidId(tok.to_string()))
}

/// Wykonuje komendę na rdzeniu i zwraca werdykt.
pub fn execute(app: &AppContext, cmd: Command) -> Value {
    match cmd {
        Command::Join { scope, subject } => {
            let s = Signals::on_join(app, scope, subject);
            json!({ "event": "join", "scope": scope, "subject": subject, "signals": s })
        }
        Command::Message {
            scope,
            subject,
            text,
        } => {
            let s = Signals::on_message(app, scope, subject, &text);
            json!({ "event": "msg", "scope": scope, "subject": subject, "signals": s })
        }
        Command::Action {
            scope,
            kind,
            subject,
        } => {
            let breached = Signals::on_action(app, scope, &kind, subject);
            json!({
                "event": "action",
                "scope": scope,
                "kind": kind.as_str(),
                "subject": subject,
                "breached": breached,
            })
        }
        Command::Raid { scope, switch } => {
            let rg = app.raidguard();
            match switch {
                RaidSwitch::On => rg.enable_raid_mode(scope),
                RaidSwitch::Off => rg.disable_raid_mode(scope),
                RaidSwitch::Status => {}
            }
            json!({ "event": "raid", "scope": scope, "raid_mode": rg.is_raid_mode_enabled(scope) })
        }
    }
}

/// Pętla stdin → stdout. Błędne linie są logowane i pomijane.
pub async fn run_stdin(app: Arc<AppContext>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut lineno = 0u64;

    info!(app = %app.settings.app.name, "reading events from stdin");
    while let Some(line) = lines.next_line().await? {
        lineno += 1;
        let cmd = match parse_line(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                warn!(line = lineno, error = %e, "skipping malformed line");
                continue;
            }
        };
        let verdict = execute(&app, cmd);
        let mut out = serde_json::to_vec(&verdict)?;
        out.push(b'\n');
        stdout.write_all(&out).await?;
        stdout.flush().await?;
    }
    info!(lines = lineno, "stdin closed");
    Ok(())
}
