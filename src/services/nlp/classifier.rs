//! Keyword-table intent classification.
//!
//! Each classifiable intent owns an ordered list of `(phrase, weight)` rules.
//! Phrases match whole words in the normalized utterance and every occurrence
//! adds its weight to the intent's score.

use regex::Regex;

use crate::models::Intent;

#[derive(Debug, Clone, PartialEq)]
pub struct KeywordRule {
    pub phrase: String,
    pub weight: f32,
}

impl KeywordRule {
    pub fn new(phrase: &str, weight: f32) -> Self {
        Self {
            phrase: phrase.to_string(),
            weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntentVocabulary {
    pub intent: Intent,
    pub rules: Vec<KeywordRule>,
}

impl IntentVocabulary {
    pub fn new(intent: Intent, rules: &[(&str, f32)]) -> Self {
        Self {
            intent,
            rules: rules
                .iter()
                .map(|(phrase, weight)| KeywordRule::new(phrase, *weight))
                .collect(),
        }
    }
}

/// The clinic's built-in vocabulary.
pub fn default_vocabulary() -> Vec<IntentVocabulary> {
    vec![
        IntentVocabulary::new(
            Intent::BookAppointment,
            &[
                ("book", 2.0),
                ("schedule", 2.0),
                ("reserve", 2.0),
                ("make an appointment", 2.0),
                ("set up", 1.5),
                ("new appointment", 1.5),
                ("appointment for", 1.0),
                ("appointment", 0.5),
            ],
        ),
        IntentVocabulary::new(
            Intent::QueryPatient,
            &[
                ("last visit", 2.0),
                ("tell me about", 2.0),
                ("look up", 2.0),
                ("what about", 1.5),
                ("history", 1.5),
                ("information", 1.5),
                ("info", 1.5),
                ("details", 1.5),
                ("record", 1.0),
                ("visit", 1.0),
                ("find", 1.0),
                ("patient", 1.0),
            ],
        ),
        IntentVocabulary::new(
            Intent::ListAppointments,
            &[
                ("todays schedule", 3.0),
                ("schedule for today", 3.0),
                ("schedule for tomorrow", 3.0),
                ("the schedule", 2.5),
                ("my schedule", 2.5),
                ("next appointment", 2.5),
                ("my appointment", 2.5),
                ("appointments", 2.0),
                ("when is", 1.5),
                ("upcoming", 1.0),
                ("agenda", 1.0),
            ],
        ),
        IntentVocabulary::new(
            Intent::ListPatients,
            &[
                ("patient list", 3.0),
                ("patients", 2.0),
                ("all patients", 1.0),
                ("registered", 0.5),
            ],
        ),
    ]
}

/// Lower-cases, drops apostrophes and turns other punctuation into spaces.
pub fn normalize(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != '\'' && *c != '\u{2019}')
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

struct CompiledRule {
    pattern: Regex,
    weight: f32,
}

pub struct IntentClassifier {
    table: Vec<(Intent, Vec<CompiledRule>)>,
}

impl IntentClassifier {
    pub fn new(vocabulary: &[IntentVocabulary]) -> anyhow::Result<Self> {
        let mut table: Vec<(Intent, Vec<CompiledRule>)> = Vec::new();

        for vocab in vocabulary {
            anyhow::ensure!(
                vocab.intent != Intent::Unknown,
                "the unknown intent cannot have keywords"
            );
            let mut rules = Vec::with_capacity(vocab.rules.len());
            for rule in &vocab.rules {
                let phrase = normalize(&rule.phrase);
                anyhow::ensure!(!phrase.is_empty(), "empty keyword for {}", vocab.intent.as_str());
                let words: Vec<String> = phrase.split(' ').map(regex::escape).collect();
                let pattern = Regex::new(&format!(r"\b{}\b", words.join(" ")))?;
                rules.push(CompiledRule {
                    pattern,
                    weight: rule.weight,
                });
            }

            match table.iter_mut().find(|(intent, _)| *intent == vocab.intent) {
                Some((_, existing)) => existing.extend(rules),
                None => table.push((vocab.intent, rules)),
            }
        }

        // Ties resolve to whichever intent is scored first.
        table.sort_by_key(|(intent, _)| {
            Intent::PRIORITY
                .iter()
                .position(|p| p == intent)
                .unwrap_or(Intent::PRIORITY.len())
        });

        Ok(Self { table })
    }

    /// Raw keyword score for every intent in the table, in priority order.
    pub fn scores(&self, text: &str) -> Vec<(Intent, f32)> {
        let normalized = normalize(text);
        self.table
            .iter()
            .map(|(intent, rules)| {
                let score = rules
                    .iter()
                    .map(|r| r.pattern.find_iter(&normalized).count() as f32 * r.weight)
                    .sum();
                (*intent, score)
            })
            .collect()
    }

    pub fn classify(&self, text: &str) -> (Intent, f32) {
        let tokens = normalize(text).split(' ').filter(|t| !t.is_empty()).count();

        let mut best = (Intent::Unknown, 0.0_f32);
        for (intent, score) in self.scores(text) {
            if score > best.1 {
                best = (intent, score);
            }
        }

        if best.0 == Intent::Unknown || tokens == 0 {
            return (Intent::Unknown, 0.0);
        }

        let confidence = (best.1 / tokens as f32).clamp(0.0, 1.0);
        (best.0, confidence)
    }
}
