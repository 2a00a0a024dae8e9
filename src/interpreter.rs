//! The command interpreter facade.
//!
//! One submission flows through exactly one classification path (AI first
//! when a credential is configured, heuristic otherwise) and is executed
//! by exactly one call into the executor. Each invocation is pure given
//! its inputs apart from the AI path's stored credential; the interpreter
//! keeps no state between submissions and imposes no reentrancy guard, so
//! callers should serialize submissions to avoid duplicate entities.

use std::sync::Arc;

use crate::classify::{AiClassifier, ClassifierChain, HeuristicClassifier, ParseRequest};
use crate::error::Result;
use crate::executor::{CommandExecutor, ExecutionResult};
use crate::parser::ParsedCommand;
use crate::store::{Contact, EntityStore};

/// Ties the classifier chain and the executor together.
pub struct CommandInterpreter {
    chain: ClassifierChain,
    executor: CommandExecutor,
}

impl CommandInterpreter {
    /// An interpreter using only the heuristic path.
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            chain: ClassifierChain::new().push(Arc::new(HeuristicClassifier::new())),
            executor: CommandExecutor::new(store),
        }
    }

    /// An interpreter that tries the AI path before the heuristic path.
    ///
    /// The AI classifier reports a missing credential as an ordinary
    /// classification failure, so building the chain this way is safe even
    /// before any key is configured.
    pub fn with_ai(store: Arc<dyn EntityStore>, ai: AiClassifier) -> Self {
        Self {
            chain: ClassifierChain::new()
                .push(Arc::new(ai))
                .push(Arc::new(HeuristicClassifier::new())),
            executor: CommandExecutor::new(store),
        }
    }

    /// An interpreter over a custom chain, for callers that assemble their
    /// own classifiers.
    pub fn with_chain(store: Arc<dyn EntityStore>, chain: ClassifierChain) -> Self {
        Self {
            chain,
            executor: CommandExecutor::new(store),
        }
    }

    /// Parse one line of text into a command without executing it.
    pub async fn parse(
        &self,
        text: &str,
        catalog: &[Contact],
        scope_id: Option<&str>,
    ) -> Result<ParsedCommand> {
        let request = ParseRequest {
            text,
            catalog,
            scope_id,
        };
        self.chain.classify(&request).await
    }

    /// Execute an already-parsed command.
    pub async fn execute(&self, command: &ParsedCommand) -> Result<ExecutionResult> {
        self.executor.execute(command).await
    }

    /// Parse and execute in one step.
    pub async fn submit(
        &self,
        text: &str,
        catalog: &[Contact],
        scope_id: Option<&str>,
    ) -> Result<ExecutionResult> {
        let command = self.parse(text, catalog, scope_id).await?;
        tracing::debug!(%command, "executing parsed command");
        self.execute(&command).await
    }
}
