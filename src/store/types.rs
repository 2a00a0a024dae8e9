//! Entity types at the store boundary.
//!
//! The interpreter consumes a contact catalog and produces create-inputs
//! for tasks, events, and notes; the records themselves live in whatever
//! store the surrounding application provides.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// A catalog contact used for name resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Company or affiliation, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

impl Contact {
    /// Create a contact with a fresh identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            company: None,
        }
    }

    /// Create a contact with a specific identifier.
    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            company: None,
        }
    }

    /// Set the company field.
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }
}

// ============================================================================
// Create inputs
// ============================================================================

/// Input for creating a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTask {
    pub scope_id: String,
    pub title: String,
    pub due: Option<NaiveDateTime>,
    pub contact_id: Option<String>,
    pub priority: Priority,
    pub completed: bool,
}

/// Input for creating an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub scope_id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub all_day: bool,
}

/// Input for creating a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNote {
    pub scope_id: String,
    pub title: String,
    pub body: Option<String>,
    pub date_ref: Option<NaiveDateTime>,
    pub contact_id: Option<String>,
}

// ============================================================================
// Records
// ============================================================================

/// A stored task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub scope_id: String,
    pub title: String,
    pub due: Option<NaiveDateTime>,
    pub contact_id: Option<String>,
    pub priority: Priority,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Materialize a record from a create input.
    pub fn from_new(new: NewTask) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            scope_id: new.scope_id,
            title: new.title,
            due: new.due,
            contact_id: new.contact_id,
            priority: new.priority,
            completed: new.completed,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A stored calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub scope_id: String,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub all_day: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Materialize a record from a create input.
    pub fn from_new(new: NewEvent) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            scope_id: new.scope_id,
            title: new.title,
            start: new.start,
            end: new.end,
            all_day: new.all_day,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A stored note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub scope_id: String,
    pub title: String,
    pub body: Option<String>,
    pub date_ref: Option<NaiveDateTime>,
    pub contact_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Materialize a record from a create input.
    pub fn from_new(new: NewNote) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            scope_id: new.scope_id,
            title: new.title,
            body: new.body,
            date_ref: new.date_ref,
            contact_id: new.contact_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A contact linked to an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventContact {
    pub event_id: String,
    pub contact_id: String,
    /// "organizer", "attendee", etc.
    pub role: Option<String>,
}
