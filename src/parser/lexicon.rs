//! Action phrase lexicon.
//!
//! A static ordered table mapping trigger phrases to action verbs and
//! default intents. Matching is a plain substring scan: multi-word phrases
//! with punctuation variants are enumerated explicitly ("follow up",
//! "follow-up", "followup") rather than inferred from tokens.

use super::types::{ActionKind, Intent};

/// One lexicon entry: an action, its default intent, and the trigger
/// phrases that select it.
#[derive(Debug, Clone, Copy)]
pub struct ActionMapping {
    pub action: ActionKind,
    pub intent: Intent,
    pub phrases: &'static [&'static str],
}

/// The action table, ordered so longer, more specific phrases are tried
/// before shorter generic ones. First match by phrase order wins, not by
/// position in the text.
pub static ACTION_MAPPINGS: &[ActionMapping] = &[
    ActionMapping {
        action: ActionKind::FollowUp,
        intent: Intent::Task,
        phrases: &[
            "follow up with",
            "follow-up with",
            "followup with",
            "check in with",
            "reach out to",
            "touch base with",
            "follow up",
            "followup",
        ],
    },
    ActionMapping {
        action: ActionKind::Call,
        intent: Intent::Task,
        phrases: &["call", "phone", "ring", "call up"],
    },
    ActionMapping {
        action: ActionKind::Text,
        intent: Intent::Task,
        phrases: &["text", "message", "sms"],
    },
    ActionMapping {
        action: ActionKind::Email,
        intent: Intent::Task,
        phrases: &["email", "send email to", "mail"],
    },
    ActionMapping {
        action: ActionKind::Introduce,
        intent: Intent::Task,
        phrases: &["introduce", "connect", "intro"],
    },
    ActionMapping {
        action: ActionKind::Send,
        intent: Intent::Task,
        phrases: &["send", "share", "forward"],
    },
    ActionMapping {
        action: ActionKind::Schedule,
        intent: Intent::Event,
        phrases: &["schedule", "book", "set up"],
    },
    ActionMapping {
        action: ActionKind::Meeting,
        intent: Intent::Event,
        phrases: &["meeting with", "meet with", "meeting", "meet"],
    },
    ActionMapping {
        action: ActionKind::Remind,
        intent: Intent::Task,
        phrases: &["remind me to", "reminder to", "remind", "reminder"],
    },
];

/// A successful lexicon match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionHit {
    pub action: ActionKind,
    pub intent: Intent,
    /// The phrase that matched, for title stripping.
    pub phrase: &'static str,
}

/// Scan the table for the first phrase occurring in the text.
///
/// Returns `None` when nothing matches; that is a normal outcome, not an
/// error.
pub fn match_action(text: &str) -> Option<ActionHit> {
    let normalized = text.to_lowercase();
    let normalized = normalized.trim();

    for mapping in ACTION_MAPPINGS {
        for phrase in mapping.phrases {
            if normalized.contains(phrase) {
                return Some(ActionHit {
                    action: mapping.action,
                    intent: mapping.intent,
                    phrase,
                });
            }
        }
    }

    None
}
