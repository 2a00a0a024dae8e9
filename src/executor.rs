//! Command execution.
//!
//! Turns a [`ParsedCommand`] into concrete create-operations against the
//! entity store, applying intent-specific defaulting and entity-linking
//! rules. Persistence failures never propagate: they come back as failed
//! [`ExecutionResult`]s for the caller to display. The one exception is
//! the missing-scope precondition, which is an error in its own right.
//!
//! Execution is deliberately not idempotent: submitting the same command
//! twice creates two entities.

use std::sync::Arc;

use chrono::{Duration, Local, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TetherError};
use crate::parser::{Intent, ParsedCommand};
use crate::store::{EntityStore, NewEvent, NewNote, NewTask, Priority};

/// Default start hour for all-day events promoted to timed ones.
const DEFAULT_EVENT_HOUR: u32 = 9;

/// Outcome of executing one command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Whether the entity was created.
    pub success: bool,
    /// Human-readable outcome, shown to the user as-is.
    pub message: String,
    /// Which entity kind was (or would have been) created.
    pub entity_kind: Intent,
    /// Warnings accumulated across parsing and execution.
    pub warnings: Vec<String>,
    /// Identifier of the created record.
    pub created_id: Option<String>,
}

/// Executes parsed commands against an entity store.
pub struct CommandExecutor {
    store: Arc<dyn EntityStore>,
}

impl CommandExecutor {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Execute one command.
    ///
    /// Returns `Err` only for the missing-scope precondition. Failures
    /// during entity creation are caught and reported as a failed
    /// [`ExecutionResult`]; the caller displays the message and stops.
    pub async fn execute(&self, command: &ParsedCommand) -> Result<ExecutionResult> {
        let warnings = command.warnings.clone();

        let Some(scope_id) = command.scope_id.as_deref() else {
            return Err(TetherError::NoScope);
        };

        match self.run(command, scope_id, warnings.clone()).await {
            Ok(result) => Ok(result),
            Err(error) => Ok(ExecutionResult {
                success: false,
                message: error.to_string(),
                entity_kind: command.intent,
                warnings,
                created_id: None,
            }),
        }
    }

    async fn run(
        &self,
        command: &ParsedCommand,
        scope_id: &str,
        mut warnings: Vec<String>,
    ) -> Result<ExecutionResult> {
        match command.intent {
            Intent::Task => {
                // Only one contact is linked per task, even when several
                // resolved.
                let contact_id = command.contact_ids.first().cloned();
                let task = self
                    .store
                    .create_task(NewTask {
                        scope_id: scope_id.to_string(),
                        title: command.title.clone(),
                        due: command.date_start,
                        contact_id,
                        priority: command.priority.unwrap_or(Priority::Medium),
                        completed: false,
                    })
                    .await?;

                let mut message = format!("Task created: \"{}\"", command.title);
                if let Some(due) = command.date_start {
                    message.push_str(&format!(" (due {})", due.format("%b %-d, %Y")));
                }

                Ok(ExecutionResult {
                    success: true,
                    message,
                    entity_kind: Intent::Task,
                    warnings,
                    created_id: Some(task.id),
                })
            }

            Intent::Event => {
                let base = command.date_start.unwrap_or_else(today_start);

                let (start, end) = if command.all_day && !command.time_specified {
                    // Expected auto-default, so no warning: 9:00, one hour.
                    let start = base.date().and_time(
                        NaiveTime::from_hms_opt(DEFAULT_EVENT_HOUR, 0, 0)
                            .unwrap_or(NaiveTime::MIN),
                    );
                    (start, start + Duration::hours(1))
                } else if let Some(end) = command.date_end {
                    (base, end)
                } else {
                    (base, base + Duration::hours(1))
                };

                let event = self
                    .store
                    .create_event(NewEvent {
                        scope_id: scope_id.to_string(),
                        title: command.title.clone(),
                        start,
                        end: Some(end),
                        all_day: command.all_day,
                    })
                    .await?;

                for contact_id in &command.contact_ids {
                    self.store
                        .link_event_contact(&event.id, contact_id, Some("attendee"))
                        .await?;
                }
                if !command.contact_ids.is_empty() {
                    warnings.push(format!("Linked to {} contact(s)", command.contact_ids.len()));
                }

                let message = format!(
                    "Event created: \"{}\" on {}",
                    command.title,
                    start.format("%b %-d, %Y, %-I:%M %p")
                );

                Ok(ExecutionResult {
                    success: true,
                    message,
                    entity_kind: Intent::Event,
                    warnings,
                    created_id: Some(event.id),
                })
            }

            Intent::Note => {
                let note = self
                    .store
                    .create_note(NewNote {
                        scope_id: scope_id.to_string(),
                        title: command.title.clone(),
                        body: Some(command.raw_text.clone()),
                        date_ref: command.date_start,
                        contact_id: command.contact_ids.first().cloned(),
                    })
                    .await?;

                Ok(ExecutionResult {
                    success: true,
                    message: format!("Note created: \"{}\"", command.title),
                    entity_kind: Intent::Note,
                    warnings,
                    created_id: Some(note.id),
                })
            }
        }
    }
}

fn today_start() -> NaiveDateTime {
    Local::now().date_naive().and_time(NaiveTime::MIN)
}
