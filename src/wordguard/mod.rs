// src/wordguard/mod.rs

use std::ops::Range;

use regex::{Captures, Regex, RegexBuilder};
use tracing::warn;

use crate::error::ConfigError;

pub mod substitutions;
pub mod vocabulary;

pub use vocabulary::{TermClass, Vocabulary, VocabularyEntry};

use substitutions::{char_class, push_escaped, LITERAL_SEPARATORS, SEPARATORS};

/// Znak maskujący w `redact`.
pub const MASK: char = '*';

/// Jak powstała reguła: pełna ekspansja czy literalny fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Expanded,
    Literal,
}

#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub term: String,
    pub class: TermClass,
    pub kind: RuleKind,
    regex: Regex,
}

/// Trafienie: która reguła i gdzie (zakres bajtów w tekście wejściowym).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermHit<'a> {
    pub class: TermClass,
    pub term: &'a str,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MatcherOptions {
    /// Limit rozmiaru skompilowanego regexa (None → domyślny z crate `regex`).
    pub size_limit: Option<usize>,
}

/// Filtr słów odporny na leet, homoglify, "jąkanie" i separatory.
///
/// Reguły są budowane raz i potem tylko czytane, więc `WordGuard` można
/// dzielić przez `Arc` bez blokad.
#[derive(Debug, Clone)]
pub struct WordGuard {
    rules: Vec<CompiledRule>,
}

impl WordGuard {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self, ConfigError> {
        Self::with_options(vocabulary, MatcherOptions::default())
    }

    pub fn with_options(
        vocabulary: &Vocabulary,
        opts: MatcherOptions,
    ) -> Result<Self, ConfigError> {
        let rules = vocabulary
            .entries()
            .iter()
            .map(|e| compile_rule(e, opts))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Wbudowany słownik bota.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::new(&Vocabulary::builtin())
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn contains_match(&self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        self.rules.iter().any(|r| r.regex.is_match(text))
    }

    /// Wariant dla treści, której może nie być (np. wiadomość z samym załącznikiem).
    pub fn contains_match_opt(&self, text: Option<&str>) -> bool {
        text.is_some_and(|t| self.contains_match(t))
    }

    /// Pierwsza pasująca reguła w kolejności słownika.
    pub fn find(&self, text: &str) -> Option<TermHit<'_>> {
        if text.is_empty() {
            return None;
        }
        self.rules.iter().find_map(|r| {
            r.regex.find(text).map(|m| TermHit {
                class: r.class,
                term: &r.term,
                span: m.range(),
            })
        })
    }

    /// Klasy, które wystąpiły w tekście (bez powtórzeń, w kolejności reguł).
    pub fn classes_matched(&self, text: &str) -> Vec<TermClass> {
        let mut out = Vec::new();
        if text.is_empty() {
            return out;
        }
        for r in &self.rules {
            if !out.contains(&r.class) && r.regex.is_match(text) {
                out.push(r.class);
            }
        }
        out
    }

    /// Kopia tekstu z każdym trafieniem zamienionym na `*` tej samej długości.
    /// Reguły idą po kolei, każda działa na wyniku poprzednich.
    pub fn redact(&self, text: &str) -> String {
        let mut out = text.to_string();
        for r in &self.rules {
            if !r.regex.is_match(&out) {
                continue;
            }
            out = r
                .regex
                .replace_all(&out, |caps: &Captures<'_>| mask(caps[0].chars().count()))
                .into_owned();
        }
        out
    }
}

fn mask(len: usize) -> String {
    std::iter::repeat_n(MASK, len).collect()
}

/* ===========================
   Kompilacja reguł
   =========================== */

/// Pół-granice słowa: sprawdzają tylko sąsiada spoza dopasowania,
/// więc termin zaczynający się lub kończący symbolem (`@ss`, `a$$`) też trafia.
const START: &str = r"\b{start-half}";
const END: &str = r"\b{end-half}";

/// Pełna ekspansja: każda litera → klasa podmian, `+`, potem opcjonalne separatory.
/// Spacja w terminie to tylko luka na separatory.
pub fn expanded_pattern(term: &str) -> String {
    let mut p = String::from(START);
    for ch in term.chars() {
        if ch != ' ' {
            p.push_str(&char_class(ch));
            p.push('+');
        }
        p.push_str(SEPARATORS);
    }
    p.push_str(END);
    p
}

/// Fallback: znaki dosłownie, między nimi opcjonalne separatory.
pub fn literal_pattern(term: &str) -> String {
    let mut p = String::from(START);
    for ch in term.chars() {
        push_escaped(&mut p, ch);
        p.push_str(LITERAL_SEPARATORS);
    }
    p.push_str(END);
    p
}

fn build(pattern: &str, size_limit: Option<usize>) -> Result<Regex, regex::Error> {
    let mut b = RegexBuilder::new(pattern);
    b.case_insensitive(true).unicode(true);
    if let Some(limit) = size_limit {
        b.size_limit(limit).dfa_size_limit(limit);
    }
    b.build()
}

fn compile_rule(entry: &VocabularyEntry, opts: MatcherOptions) -> Result<CompiledRule, ConfigError> {
    let (kind, regex) = match build(&expanded_pattern(&entry.term), opts.size_limit) {
        Ok(re) => (RuleKind::Expanded, re),
        Err(e) => {
            warn!(term = %entry.term, error = %e, "expanded pattern failed, using literal rule");
            let re = build(&literal_pattern(&entry.term), None).map_err(|source| {
                ConfigError::Pattern {
                    term: entry.term.clone(),
                    source,
                }
            })?;
            (RuleKind::Literal, re)
        }
    };

    Ok(CompiledRule {
        term: entry.term.clone(),
        class: entry.class,
        kind,
        regex,
    })
}
