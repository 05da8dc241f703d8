use std::io::Write;

use tigris_signals::config::{PolicyConfig, Settings};
use tigris_signals::feed::{execute, parse_line};
use tigris_signals::AppContext;

fn settings() -> Settings {
    let mut s = Settings::defaults("test");
    s.wordguard.builtin = false;
    s.wordguard.profanity = vec!["fuck".into()];
    s
}

#[test]
fn invalid_policy_refuses_to_start() {
    let mut s = settings();
    s.raidguard.join = Some(PolicyConfig {
        threshold: 0,
        window_secs: 10,
        per_subject: false,
    });
    assert!(AppContext::build(s).is_err());
}

#[test]
fn invalid_link_pattern_refuses_to_start() {
    let mut s = settings();
    s.linkscan.extra_patterns = vec!["[oops".into()];
    assert!(AppContext::build(s).is_err());
}

#[test]
fn vocabulary_file_is_merged() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(f, r#"{{"harassment": ["go away"]}}"#).unwrap();

    let mut s = settings();
    s.wordguard.vocabulary_file = Some(f.path().display().to_string());
    let app = AppContext::build(s).unwrap();
    assert!(app.wordguard().contains_match("go   away"));
    assert!(app.wordguard().contains_match("fuck"));
}

#[test]
fn feed_lines_produce_json_verdicts() {
    let app = AppContext::build(settings()).unwrap();

    let cmd = parse_line("msg 1 2 you are a fuck").unwrap().unwrap();
    let v = execute(&app, cmd);
    assert_eq!(v["event"], "msg");
    assert_eq!(v["signals"]["matched_class"], "profanity");
    assert_eq!(v["signals"]["redacted"], "you are a ****");
    assert_eq!(v["signals"]["strike"]["strike"], 1);

    let v = execute(&app, parse_line("raid on 1").unwrap().unwrap());
    assert_eq!(v["raid_mode"], true);
    let v = execute(&app, parse_line("raid status 1").unwrap().unwrap());
    assert_eq!(v["raid_mode"], true);
    let v = execute(&app, parse_line("raid off 1").unwrap().unwrap());
    assert_eq!(v["raid_mode"], false);

    let mut last = serde_json::Value::Null;
    for _ in 0..3 {
        last = execute(&app, parse_line("action 1 channel_delete 9").unwrap().unwrap());
    }
    assert_eq!(last["breached"], true);
    assert_eq!(last["kind"], "channel_delete");
}
