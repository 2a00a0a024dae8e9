//! Entity store interface.
//!
//! The interpreter's only obligations toward persistence: three creation
//! calls and one link call. Implementations decide where records actually
//! live; [`MemoryEntityStore`] is the embedded default.

pub mod memory;
pub mod types;

use async_trait::async_trait;

use crate::error::Result;

pub use memory::MemoryEntityStore;
pub use types::{Contact, Event, EventContact, NewEvent, NewNote, NewTask, Note, Priority, Task};

/// The create-operations the executor needs from a record store.
///
/// Each call is an independent write; no atomicity is guaranteed across
/// the entities created for a single command.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Create a task.
    async fn create_task(&self, new: NewTask) -> Result<Task>;

    /// Create an event and return it with its new identifier.
    async fn create_event(&self, new: NewEvent) -> Result<Event>;

    /// Create a note.
    async fn create_note(&self, new: NewNote) -> Result<Note>;

    /// Link a contact to an event, optionally with a role.
    async fn link_event_contact(
        &self,
        event_id: &str,
        contact_id: &str,
        role: Option<&str>,
    ) -> Result<()>;
}
