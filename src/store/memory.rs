//! In-memory entity store.
//!
//! Keeps every record in process memory behind an async lock. Backs the
//! CLI and the integration tests; the surrounding application is expected
//! to bring its own persistent implementation of [`EntityStore`].

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::store::types::{
    Contact, Event, EventContact, NewEvent, NewNote, NewTask, Note, Task,
};
use crate::store::EntityStore;

#[derive(Debug, Default)]
struct State {
    contacts: Vec<Contact>,
    tasks: Vec<Task>,
    events: Vec<Event>,
    notes: Vec<Note>,
    event_contacts: Vec<EventContact>,
}

/// An [`EntityStore`] holding everything in memory.
#[derive(Debug, Default)]
pub struct MemoryEntityStore {
    state: RwLock<State>,
}

impl MemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a contact in the catalog.
    pub async fn add_contact(&self, contact: Contact) {
        self.state.write().await.contacts.push(contact);
    }

    /// Snapshot of the contact catalog.
    pub async fn contacts(&self) -> Vec<Contact> {
        self.state.read().await.contacts.clone()
    }

    /// Snapshot of all stored tasks.
    pub async fn tasks(&self) -> Vec<Task> {
        self.state.read().await.tasks.clone()
    }

    /// Snapshot of all stored events.
    pub async fn events(&self) -> Vec<Event> {
        self.state.read().await.events.clone()
    }

    /// Snapshot of all stored notes.
    pub async fn notes(&self) -> Vec<Note> {
        self.state.read().await.notes.clone()
    }

    /// Snapshot of all event-contact links.
    pub async fn event_contacts(&self) -> Vec<EventContact> {
        self.state.read().await.event_contacts.clone()
    }
}

#[async_trait]
impl EntityStore for MemoryEntityStore {
    async fn create_task(&self, new: NewTask) -> Result<Task> {
        let task = Task::from_new(new);
        self.state.write().await.tasks.push(task.clone());
        Ok(task)
    }

    async fn create_event(&self, new: NewEvent) -> Result<Event> {
        let event = Event::from_new(new);
        self.state.write().await.events.push(event.clone());
        Ok(event)
    }

    async fn create_note(&self, new: NewNote) -> Result<Note> {
        let note = Note::from_new(new);
        self.state.write().await.notes.push(note.clone());
        Ok(note)
    }

    async fn link_event_contact(
        &self,
        event_id: &str,
        contact_id: &str,
        role: Option<&str>,
    ) -> Result<()> {
        let mut state = self.state.write().await;

        if !state.events.iter().any(|e| e.id == event_id) {
            return Err(StoreError::NotFound(format!("event {event_id}")).into());
        }

        state.event_contacts.push(EventContact {
            event_id: event_id.to_string(),
            contact_id: contact_id.to_string(),
            role: role.map(str::to_string),
        });
        Ok(())
    }
}
