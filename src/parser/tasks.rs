//! Task extraction from note bodies.
//!
//! Scans a note line by line for task-shaped lines: checklist markers
//! ("- [ ]", "-", "*", "1.") or a leading action verb. Each hit gets a due
//! date from the temporal grammar on the line itself, else the note's date
//! reference, else today.

use std::sync::LazyLock;

use chrono::{NaiveDateTime, NaiveTime};
use regex::Regex;

use super::contacts::ContactResolver;
use super::temporal::TemporalGrammar;
use crate::store::Contact;

/// One task-shaped line lifted out of a note.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedTask {
    /// The task title (checklist marker stripped).
    pub title: String,
    /// Resolved due date.
    pub due: NaiveDateTime,
    /// First contact resolved on the line, if any.
    pub contact_id: Option<String>,
    /// The source line, trimmed.
    pub source_line: String,
    /// 1-based line number in the note.
    pub line_number: usize,
}

/// Scans note text for embedded tasks.
pub struct TaskScanner {
    grammar: TemporalGrammar,
    resolver: ContactResolver,
}

impl Default for TaskScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskScanner {
    /// Create a scanner referenced to the current local time.
    pub fn new() -> Self {
        Self {
            grammar: TemporalGrammar::new(),
            resolver: ContactResolver::new(),
        }
    }

    /// Create a scanner with a specific reference instant.
    pub fn with_reference(reference: NaiveDateTime) -> Self {
        Self {
            grammar: TemporalGrammar::with_reference(reference),
            resolver: ContactResolver::new(),
        }
    }

    /// Extract tasks from a note body.
    pub fn scan(
        &self,
        note_text: &str,
        note_date_ref: Option<NaiveDateTime>,
        catalog: &[Contact],
    ) -> Vec<ExtractedTask> {
        let mut tasks = Vec::new();

        for (index, line) in note_text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let Some(title) = task_title(trimmed) else {
                continue;
            };

            let temporal = self.grammar.extract(&title);
            let due = temporal
                .date_start
                .filter(|_| temporal.found())
                .or(note_date_ref)
                .unwrap_or_else(|| self.grammar.reference().date().and_time(NaiveTime::MIN));

            let contact_id = self
                .resolver
                .resolve(&title, catalog)
                .iter()
                .find_map(|r| r.matched().map(|m| m.contact_id.clone()));

            tasks.push(ExtractedTask {
                title,
                due,
                contact_id,
                source_line: trimmed.to_string(),
                line_number: index + 1,
            });
        }

        tasks
    }
}

/// Decide whether a line is task-shaped and return its title.
fn task_title(line: &str) -> Option<String> {
    for pattern in CHECKLIST_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(line) {
            return Some(caps[1].trim().to_string());
        }
    }

    let lower = line.to_lowercase();
    if ACTION_VERBS.iter().any(|verb| lower.starts_with(verb)) {
        return Some(line.to_string());
    }

    None
}

static CHECKLIST_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"^[-*•]\s*\[\s*\]\s*(.+)$").expect("Invalid regex"),
        Regex::new(r"^[-*•]\s+(.+)$").expect("Invalid regex"),
        Regex::new(r"^\d+\.\s+(.+)$").expect("Invalid regex"),
    ]
});

/// Verbs that mark a plain line as actionable when they lead it.
static ACTION_VERBS: &[&str] = &[
    "call", "email", "text", "message", "send", "share", "forward", "follow up", "check in",
    "reach out", "touch base", "schedule", "book", "set up", "arrange", "prepare", "draft",
    "write", "create", "review", "read", "check", "verify", "update", "revise", "complete",
    "finish", "finalize", "ask", "discuss", "talk to", "meet with", "research", "investigate",
    "look into", "buy", "purchase", "order", "remind", "remember",
];
