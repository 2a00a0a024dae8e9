//! Classification strategies.
//!
//! The AI path and the heuristic path are two implementations of one
//! [`Classifier`] capability, tried in a fixed priority order by
//! [`ClassifierChain`] with explicit fallback on failure. The heuristic
//! classifier never fails, so a chain ending in it always yields a command.

pub mod ai;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::error::{ClassifyError, Result};
use crate::parser::{CommandBuilder, ParsedCommand};
use crate::store::Contact;

pub use ai::{AiClassifier, ApiKeyStore};

/// One classification request: the inputs every classifier shares.
#[derive(Debug, Clone, Copy)]
pub struct ParseRequest<'a> {
    /// The raw submitted text.
    pub text: &'a str,
    /// Contact catalog for name resolution.
    pub catalog: &'a [Contact],
    /// Target scope identifier from the caller's current selection.
    pub scope_id: Option<&'a str>,
}

/// A strategy that turns one text submission into a command.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Classify the request into a command.
    async fn classify(&self, request: &ParseRequest<'_>) -> Result<ParsedCommand>;
}

// ============================================================================
// Heuristic classifier
// ============================================================================

/// The lexicon/temporal/contact pipeline as a [`Classifier`].
pub struct HeuristicClassifier {
    builder: CommandBuilder,
}

impl Default for HeuristicClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl HeuristicClassifier {
    /// Create a classifier referenced to the current local time.
    pub fn new() -> Self {
        Self {
            builder: CommandBuilder::new(),
        }
    }

    /// Create a classifier with a specific reference instant.
    pub fn with_reference(reference: NaiveDateTime) -> Self {
        Self {
            builder: CommandBuilder::with_reference(reference),
        }
    }

    /// Wrap an explicitly configured command builder.
    pub fn from_builder(builder: CommandBuilder) -> Self {
        Self { builder }
    }
}

#[async_trait]
impl Classifier for HeuristicClassifier {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn classify(&self, request: &ParseRequest<'_>) -> Result<ParsedCommand> {
        Ok(self
            .builder
            .parse(request.text, request.catalog, request.scope_id))
    }
}

// ============================================================================
// Classifier chain
// ============================================================================

/// Classifiers tried in priority order.
///
/// A failure is logged and the next classifier takes over; the error only
/// surfaces if every classifier fails.
#[derive(Default)]
pub struct ClassifierChain {
    classifiers: Vec<Arc<dyn Classifier>>,
}

impl ClassifierChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a classifier at the lowest priority so far.
    pub fn push(mut self, classifier: Arc<dyn Classifier>) -> Self {
        self.classifiers.push(classifier);
        self
    }

    /// Run the chain.
    pub async fn classify(&self, request: &ParseRequest<'_>) -> Result<ParsedCommand> {
        let mut last_error = None;

        for classifier in &self.classifiers {
            match classifier.classify(request).await {
                Ok(command) => {
                    tracing::debug!(classifier = classifier.name(), "input classified");
                    return Ok(command);
                }
                Err(error) => {
                    tracing::warn!(
                        classifier = classifier.name(),
                        %error,
                        "classification failed, falling back"
                    );
                    last_error = Some(error);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ClassifyError::Exhausted.into()))
    }
}

// ============================================================================
// Tests
// ============================================================================
