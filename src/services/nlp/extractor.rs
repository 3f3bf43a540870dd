//! Slot extraction from raw utterances.
//!
//! Doctor mentions are found first and blanked out, together with every
//! date/time span, so neither can be picked up as a patient name.

use std::collections::BTreeMap;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use super::datetime::{temporal_spans, Component, TemporalSpan};
use crate::models::{Intent, SlotName};

const MAX_NAME_WORDS: usize = 3;

static DOCTOR_ANCHOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:dr|doctor)\b\.?\s*").expect("doctor anchor must compile"));

static FOR_ANCHOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bfor\b").expect("patient anchor must compile"));

static QUERY_ANCHOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:for|about|patient|up)\b").expect("patient anchor must compile")
});

static NOTES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:regarding|reason(?:\s+is)?|notes?)\b[:\s]+(?P<notes>.+)$")
        .expect("notes pattern must compile")
});

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").expect("word pattern must compile"));

const STOPWORDS: &[&str] = &[
    "a", "about", "all", "am", "an", "and", "any", "anyone", "anything", "appointment",
    "appointments", "around", "at", "be", "by", "check", "checkup", "day", "days", "doctor", "dr",
    "evening", "everyone", "for", "from", "her", "here", "him", "his", "history", "i", "in",
    "info", "information", "is", "it", "last", "me", "midnight", "morning", "afternoon", "my",
    "new", "next", "noon", "of", "on", "or", "our", "patient", "patients", "please", "pm",
    "record", "records", "details", "some", "somebody", "someone", "something", "sometime",
    "that", "the", "their", "them", "there", "this", "to", "today", "tomorrow", "tonight", "up",
    "us", "visit", "visits", "was", "week", "what", "which", "who", "with", "yesterday", "you",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Case {
    Upper,
    Lower,
}

/// A run of name-like words and where it sits in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NameMatch {
    name: String,
    range: Range<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct EntityExtractor;

impl EntityExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Pulls the raw slot strings `intent` cares about out of `text`.
    /// A slot that is not found is simply absent from the map.
    pub fn extract(&self, text: &str, intent: Intent) -> BTreeMap<SlotName, String> {
        let sought = intent.sought_slots();
        let mut slots = BTreeMap::new();
        if sought.is_empty() {
            return slots;
        }

        // Booking notes run to the end of the utterance. They are taken
        // verbatim and hidden from every other slot.
        let notes = if sought.contains(&SlotName::Notes) {
            NOTES.captures(text).and_then(|c| Some((c.get(0)?.range(), c.name("notes")?)))
        } else {
            None
        };
        let mut scan = text.to_string();
        if let Some((range, _)) = &notes {
            blank(&mut scan, range.clone());
        }

        let spans = temporal_spans(&scan);
        let doctors = doctor_mentions(&scan);

        let mut masked = scan.clone();
        for range in doctors
            .iter()
            .map(|d| d.range.clone())
            .chain(spans.iter().map(|s| s.range.clone()))
        {
            blank(&mut masked, range);
        }

        if sought.contains(&SlotName::DoctorName) {
            if let Some(doctor) = doctors.first() {
                slots.insert(SlotName::DoctorName, format!("Dr. {}", doctor.name));
            }
        }

        if sought.contains(&SlotName::PatientName) {
            if let Some(patient) = patient_name(&masked, intent) {
                slots.insert(SlotName::PatientName, patient);
            }
        }

        if sought.contains(&SlotName::DateTime) {
            if let Some(phrase) = datetime_phrase(&scan, &spans) {
                slots.insert(SlotName::DateTime, phrase);
            }
        }

        if let Some(notes) = notes
            .map(|(_, m)| m.as_str().trim().trim_end_matches(['.', '!', '?']).trim())
            .filter(|n| !n.is_empty())
        {
            slots.insert(SlotName::Notes, notes.to_string());
        }

        slots
    }
}

/// Replaces `range` with spaces, keeping byte offsets stable.
fn blank(text: &mut String, range: Range<usize>) {
    if range.end <= text.len()
        && text.is_char_boundary(range.start)
        && text.is_char_boundary(range.end)
    {
        let spaces = " ".repeat(range.len());
        text.replace_range(range, &spaces);
    }
}

fn doctor_mentions(text: &str) -> Vec<NameMatch> {
    DOCTOR_ANCHOR
        .find_iter(text)
        .filter_map(|anchor| {
            let allow_lowercase = all_lowercase(&text[anchor.end()..]);
            name_after(text, anchor.end(), allow_lowercase).map(|m| NameMatch {
                name: m.name,
                range: anchor.start()..m.range.end,
            })
        })
        .collect()
}

/// First anchored name in text order. Only a `for` anchor followed by
/// all lower-case text accepts a lower-case name.
fn patient_name(masked: &str, intent: Intent) -> Option<String> {
    let anchors: &Regex = match intent {
        Intent::QueryPatient => &*QUERY_ANCHOR,
        _ => &*FOR_ANCHOR,
    };
    anchors
        .find_iter(masked)
        .find_map(|anchor| {
            let rest = &masked[anchor.end()..];
            let allow_lowercase =
                anchor.as_str().eq_ignore_ascii_case("for") && all_lowercase(rest);
            name_after(masked, anchor.end(), allow_lowercase)
        })
        .map(|m| m.name)
}

fn all_lowercase(text: &str) -> bool {
    !text.chars().any(char::is_uppercase)
}

fn is_stopword(word: &str) -> bool {
    let lower = word.to_lowercase();
    STOPWORDS.contains(&lower.as_str())
}

fn word_case(word: &str) -> Option<Case> {
    let mut chars = word.chars();
    let first = chars.next()?;
    if !first.is_alphabetic() || !word.chars().all(|c| c.is_alphabetic() || c == '\'' || c == '-') {
        return None;
    }
    if first.is_uppercase() {
        Some(Case::Upper)
    } else if first.is_lowercase() {
        Some(Case::Lower)
    } else {
        None
    }
}

fn title_case(word: &str) -> String {
    let mut c = word.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().to_string() + c.as_str(),
    }
}

/// Reads up to three name-like words starting at `from`.
///
/// Capitalized words are taken as written. An all lower-case run is accepted
/// and title-cased only when `allow_lowercase` is set. A run stops at the
/// first stopword, case change or trailing punctuation.
fn name_after(text: &str, from: usize, allow_lowercase: bool) -> Option<NameMatch> {
    let rest = text.get(from..)?;
    let mut words: Vec<&str> = Vec::new();
    let mut end = from;
    let mut mode: Option<Case> = None;

    for token in WORD.find_iter(rest) {
        let raw = token.as_str();
        let word = raw.trim_end_matches([',', '.', ';', ':', '!', '?']);
        let punctuated = word.len() != raw.len();

        if is_stopword(word) {
            break;
        }
        let Some(case) = word_case(word) else { break };
        if case == Case::Lower && !allow_lowercase {
            break;
        }
        match mode {
            None => mode = Some(case),
            Some(m) if m != case => break,
            Some(_) => {}
        }

        words.push(word);
        end = from + token.start() + word.len();
        if punctuated || words.len() == MAX_NAME_WORDS {
            break;
        }
    }

    if words.is_empty() {
        return None;
    }

    let name = match mode {
        Some(Case::Lower) => words.iter().map(|w| title_case(w)).collect::<Vec<_>>().join(" "),
        _ => words.join(" "),
    };

    Some(NameMatch {
        name,
        range: from..end,
    })
}

fn is_connector(gap: &str) -> bool {
    gap.replace(',', " ")
        .split_whitespace()
        .all(|w| matches!(w.to_lowercase().as_str(), "at" | "on" | "the" | "by" | "around"))
}

struct SpanGroup {
    range: Range<usize>,
    has_date: bool,
    has_time: bool,
}

/// Longest contiguous temporal phrase, completed with a date or time fragment
/// found elsewhere in the utterance when the phrase lacks one.
fn datetime_phrase(text: &str, spans: &[TemporalSpan]) -> Option<String> {
    let mut groups: Vec<SpanGroup> = Vec::new();

    for span in spans {
        let has_date = matches!(span.component, Component::Date | Component::DateTime);
        let has_time = matches!(span.component, Component::Time | Component::DateTime);

        match groups.last_mut() {
            Some(last) if is_connector(&text[last.range.end..span.range.start]) => {
                last.range.end = span.range.end;
                last.has_date |= has_date;
                last.has_time |= has_time;
            }
            _ => groups.push(SpanGroup {
                range: span.range.clone(),
                has_date,
                has_time,
            }),
        }
    }

    let mut best = 0;
    for (i, group) in groups.iter().enumerate() {
        if group.range.len() > groups[best].range.len() {
            best = i;
        }
    }
    let primary = groups.get(best)?;
    let mut phrase = text[primary.range.clone()].to_string();

    let others = groups.iter().enumerate().filter(|(i, _)| *i != best).map(|(_, g)| g);
    if !primary.has_date {
        if let Some(g) = others.clone().find(|g| g.has_date) {
            phrase = format!("{phrase} {}", &text[g.range.clone()]);
        }
    }
    if !primary.has_time {
        if let Some(g) = others.clone().find(|g| g.has_time) {
            phrase = format!("{phrase} {}", &text[g.range.clone()]);
        }
    }

    Some(phrase)
}
