//! Core types for natural-language command interpretation.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::store::Priority;

// ============================================================================
// Intent and action vocabulary
// ============================================================================

/// What kind of entity a command should create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// An action item with an optional due date.
    Task,
    /// A calendar appointment with a start time.
    Event,
    /// A free-form piece of information.
    Note,
}

impl Intent {
    /// Lowercase name used in messages and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Task => "task",
            Intent::Event => "event",
            Intent::Note => "note",
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The action verb recognized in the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    FollowUp,
    Call,
    Text,
    Email,
    Introduce,
    Send,
    Schedule,
    Meeting,
    Remind,
    Note,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::FollowUp => "follow_up",
            ActionKind::Call => "call",
            ActionKind::Text => "text",
            ActionKind::Email => "email",
            ActionKind::Introduce => "introduce",
            ActionKind::Send => "send",
            ActionKind::Schedule => "schedule",
            ActionKind::Meeting => "meeting",
            ActionKind::Remind => "remind",
            ActionKind::Note => "note",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse confidence level attached to a parsed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
        };
        f.write_str(s)
    }
}

// ============================================================================
// Extraction results
// ============================================================================

/// A parsed date/time span from the temporal extractor.
///
/// Instants are naive local wall-clock datetimes; the surrounding
/// application is single-user and local.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalEntity {
    /// Start instant, if a date was recognized.
    pub date_start: Option<NaiveDateTime>,
    /// End instant for ranges.
    pub date_end: Option<NaiveDateTime>,
    /// Whether a clock time (not just a date) was explicitly present.
    pub time_specified: bool,
    /// Whole-day semantics: a date without an associated clock time.
    pub all_day: bool,
    /// Confidence in [0, 1]; 0 means nothing was recognized.
    pub confidence: f32,
}

impl TemporalEntity {
    /// The empty result: no recognizable date in the text.
    pub fn none() -> Self {
        Self {
            date_start: None,
            date_end: None,
            time_specified: false,
            all_day: false,
            confidence: 0.0,
        }
    }

    /// Whether the extractor recognized anything.
    pub fn found(&self) -> bool {
        self.confidence > 0.0
    }
}

/// A contact reference resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMatch {
    /// Identifier of the matched contact.
    pub contact_id: String,
    /// The contact's display name.
    pub name: String,
    /// Similarity score in (0, 1]; 1.0 for an exact match,
    /// otherwise one minus the fuzzy distance.
    pub score: f32,
}

/// Per-candidate resolution outcome.
///
/// The three cases are exhaustive: a candidate either matched a contact
/// exactly, matched one fuzzily, or could not be mapped at all. Unresolved
/// candidates keep their raw text so callers can surface them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Resolution {
    Exact(ContactMatch),
    Fuzzy(ContactMatch),
    Unresolved { name: String },
}

impl Resolution {
    /// The match, if the candidate resolved to a contact.
    pub fn matched(&self) -> Option<&ContactMatch> {
        match self {
            Resolution::Exact(m) | Resolution::Fuzzy(m) => Some(m),
            Resolution::Unresolved { .. } => None,
        }
    }
}

// ============================================================================
// Parsed command
// ============================================================================

/// The interpreter's output: one structured, executable command.
///
/// Constructed fresh per submission and immutable once built; the executor
/// consumes it exactly once and never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedCommand {
    /// Resolved intent.
    pub intent: Intent,
    /// Action tag from the lexicon, when one matched.
    pub action: Option<ActionKind>,
    /// Identifiers of contacts the resolver mapped.
    pub contact_ids: Vec<String>,
    /// Candidate names the resolver could not map. Disjoint from
    /// `contact_ids` in meaning: a name appears here only when no id exists.
    pub contact_names: Vec<String>,
    /// Start instant.
    pub date_start: Option<NaiveDateTime>,
    /// End instant for ranges.
    pub date_end: Option<NaiveDateTime>,
    /// Whether a clock time was explicitly present in the input.
    pub time_specified: bool,
    /// Whole-day semantics.
    pub all_day: bool,
    /// Task priority, when the classifier supplied one.
    pub priority: Option<Priority>,
    /// Target scope identifier, passed through from the caller.
    pub scope_id: Option<String>,
    /// The original input, trimmed.
    pub raw_text: String,
    /// Cleaned title. Never empty: falls back to `raw_text` when stripping
    /// the action phrase would leave nothing.
    pub title: String,
    /// Confidence level gating downstream execution.
    pub confidence: ConfidenceLevel,
    /// Ordered, non-fatal warnings accumulated during parsing.
    pub warnings: Vec<String>,
}

impl std::fmt::Display for ParsedCommand {
    /// One-line summary for logs and debugging.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Intent: {} | Action: {} | Contacts: {} matched",
            self.intent,
            self.action.map(|a| a.as_str()).unwrap_or("none"),
            self.contact_ids.len(),
        )?;
        if !self.contact_names.is_empty() {
            write!(f, ", {} unresolved", self.contact_names.len())?;
        }
        match self.date_start {
            Some(dt) => write!(f, " | Date: {}", dt.format("%Y-%m-%d %H:%M"))?,
            None => write!(f, " | Date: none")?,
        }
        write!(f, " | Confidence: {}", self.confidence)?;
        if !self.warnings.is_empty() {
            write!(f, " | Warnings: {}", self.warnings.join("; "))?;
        }
        Ok(())
    }
}
