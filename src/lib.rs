//! Tether: natural-language command interpretation for a relationship
//! calendar.
//!
//! Turns a single line of free-form text ("Follow up with Sarah next
//! Tuesday") into a structured command — a task, calendar event, or note —
//! resolved against a known contact catalog, with a confidence score and
//! human-readable warnings. An optional LLM-backed classifier is tried
//! first when a credential is configured, falling back to the heuristic
//! pipeline on any failure. A command executor turns the result into
//! create-operations against an entity store.

pub mod classify;
pub mod config;
pub mod error;
pub mod executor;
pub mod interpreter;
pub mod parser;
pub mod store;

pub use classify::{
    AiClassifier, ApiKeyStore, Classifier, ClassifierChain, HeuristicClassifier, ParseRequest,
};
pub use config::{AiConfig, Config, ParserConfig};
pub use error::{ClassifyError, ConfigError, Result, StoreError, TetherError};
pub use executor::{CommandExecutor, ExecutionResult};
pub use interpreter::CommandInterpreter;
pub use parser::{
    ActionKind, CommandBuilder, ConfidenceLevel, ContactMatch, ContactResolver, ExtractedTask,
    Intent, ParsedCommand, Resolution, TaskScanner, TemporalEntity, TemporalGrammar,
};
pub use store::{
    Contact, EntityStore, Event, EventContact, MemoryEntityStore, NewEvent, NewNote, NewTask,
    Note, Priority, Task,
};
