//! Natural-language command parsing.
//!
//! The heuristic pipeline, leaves first: the action lexicon maps a phrase
//! to an action verb and a default intent; the temporal grammar finds a
//! date/time; the contact resolver maps capitalized name candidates to
//! known contacts; the intent classifier and confidence scorer combine the
//! signals; and the command builder orchestrates the whole sequence into a
//! [`ParsedCommand`].

pub mod builder;
pub mod contacts;
pub mod intent;
pub mod lexicon;
pub mod tasks;
pub mod temporal;
pub mod types;

pub use builder::CommandBuilder;
pub use contacts::{ContactResolver, FUZZY_THRESHOLD};
pub use intent::{classify_intent, score_confidence};
pub use lexicon::{match_action, ActionHit, ActionMapping, ACTION_MAPPINGS};
pub use tasks::{ExtractedTask, TaskScanner};
pub use temporal::{TemporalGrammar, GRAMMAR_CONFIDENCE, RANGE_CONFIDENCE};
pub use types::{
    ActionKind, ConfidenceLevel, ContactMatch, Intent, ParsedCommand, Resolution, TemporalEntity,
};
