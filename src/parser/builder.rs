//! Heuristic command builder.
//!
//! Orchestrates the lexicon matcher, temporal extractor, and contact
//! resolver over one line of input and assembles the final
//! [`ParsedCommand`]. Every degraded step leaves a warning; nothing here
//! can fail.

use chrono::{NaiveDateTime, NaiveTime};

use super::contacts::ContactResolver;
use super::intent::{classify_intent, score_confidence};
use super::lexicon::match_action;
use super::temporal::TemporalGrammar;
use super::types::{ParsedCommand, Resolution};
use crate::store::Contact;

/// Builds structured commands from free-form text.
pub struct CommandBuilder {
    grammar: TemporalGrammar,
    resolver: ContactResolver,
}

impl Default for CommandBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBuilder {
    /// Create a builder referenced to the current local time.
    pub fn new() -> Self {
        Self {
            grammar: TemporalGrammar::new(),
            resolver: ContactResolver::new(),
        }
    }

    /// Create a builder with a specific reference instant for relative
    /// date resolution.
    pub fn with_reference(reference: NaiveDateTime) -> Self {
        Self {
            grammar: TemporalGrammar::with_reference(reference),
            resolver: ContactResolver::new(),
        }
    }

    /// Replace the contact resolver (e.g. to adjust the fuzzy threshold).
    pub fn with_resolver(mut self, resolver: ContactResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Parse one submission into a command.
    ///
    /// The target scope identifier passes through unchanged; this module
    /// never infers scope.
    pub fn parse(
        &self,
        input: &str,
        catalog: &[Contact],
        scope_id: Option<&str>,
    ) -> ParsedCommand {
        let mut warnings = Vec::new();
        let raw_text = input.trim().to_string();

        // Step 1: action lexicon over lowercased text.
        let action_hit = match_action(&raw_text);

        // Step 2: temporal grammar over raw text, range matcher as fallback.
        let mut temporal = self.grammar.extract(&raw_text);
        if !temporal.found() {
            if let Some(range) = self.grammar.extract_range(&raw_text) {
                temporal = range;
            }
        }

        // Step 3: no date at all defaults to today, all-day. The default is
        // always surfaced as a warning, never applied silently.
        if temporal.date_start.is_none() {
            temporal.date_start = Some(self.grammar.reference().date().and_time(NaiveTime::MIN));
            temporal.all_day = true;
            warnings.push("No date specified, defaulting to today".to_string());
        }

        // Step 4: contact resolution over raw text.
        let resolutions = self.resolver.resolve(&raw_text, catalog);
        let contact_ids: Vec<String> = resolutions
            .iter()
            .filter_map(|r| r.matched())
            .map(|m| m.contact_id.clone())
            .collect();
        let contact_names: Vec<String> = resolutions
            .iter()
            .filter_map(|r| match r {
                Resolution::Unresolved { name } => Some(name.clone()),
                _ => None,
            })
            .collect();
        if !contact_names.is_empty() {
            warnings.push(format!("Unresolved contacts: {}", contact_names.join(", ")));
        }

        // Step 5: classify intent from the three signals.
        let intent = classify_intent(
            action_hit.map(|hit| hit.intent),
            temporal.date_start.is_some(),
            !contact_ids.is_empty(),
            temporal.time_specified,
        );

        // Step 6: title is the raw text minus the matched phrase.
        let title = match action_hit {
            Some(hit) => strip_phrase(&raw_text, hit.phrase),
            None => raw_text.clone(),
        };

        // Step 7: score confidence.
        let confidence = score_confidence(
            action_hit.is_some(),
            temporal.date_start.is_some(),
            !contact_ids.is_empty(),
            !contact_names.is_empty(),
        );

        ParsedCommand {
            intent,
            action: action_hit.map(|hit| hit.action),
            contact_ids,
            contact_names,
            date_start: temporal.date_start,
            date_end: temporal.date_end,
            time_specified: temporal.time_specified,
            all_day: temporal.all_day,
            priority: None,
            scope_id: scope_id.map(str::to_string),
            raw_text,
            title,
            confidence,
            warnings,
        }
    }
}

/// Remove the first case-insensitive occurrence of `phrase` and trim.
/// Falls back to the raw text when stripping would leave nothing.
fn strip_phrase(raw: &str, phrase: &str) -> String {
    let Some(pos) = raw.to_lowercase().find(phrase) else {
        return raw.to_string();
    };

    let before = raw.get(..pos).unwrap_or("");
    let after = raw.get(pos + phrase.len()..).unwrap_or("");
    let stripped = format!("{}{}", before, after);
    let stripped = stripped.trim();

    if stripped.is_empty() {
        raw.to_string()
    } else {
        stripped.to_string()
    }
}
