//! Intent classification and confidence scoring.
//!
//! Both are pure functions of the extraction signals; neither inspects the
//! text itself.

use super::types::{ConfidenceLevel, Intent};

/// Pick an intent from the extraction signals. First applicable rule wins:
///
/// 1. An action-lexicon intent hint is used verbatim.
/// 2. An explicit clock time reads as an appointment.
/// 3. A contact plus a date, with no explicit time, reads as a to-do.
/// 4. Everything else is a note; ambiguous input is never dropped.
pub fn classify_intent(
    action_intent: Option<Intent>,
    has_date: bool,
    has_contact: bool,
    has_time: bool,
) -> Intent {
    if let Some(intent) = action_intent {
        return intent;
    }

    if has_time {
        return Intent::Event;
    }

    if has_contact && has_date {
        return Intent::Task;
    }

    Intent::Note
}

/// Score confidence from the same signals.
///
/// High requires an action, a date, a contact, and no unresolved names;
/// medium requires an action plus at least one of date or contact.
pub fn score_confidence(
    has_action: bool,
    has_date: bool,
    has_contact: bool,
    has_unresolved: bool,
) -> ConfidenceLevel {
    if has_action && has_date && has_contact && !has_unresolved {
        return ConfidenceLevel::High;
    }

    if has_action && (has_date || has_contact) {
        return ConfidenceLevel::Medium;
    }

    ConfidenceLevel::Low
}
