//! LLM-backed classification.
//!
//! Sends the raw text and the contact catalog names to an OpenAI-compatible
//! chat-completion endpoint and maps the structured JSON reply onto the
//! same [`ParsedCommand`] shape the heuristic path produces. Contact names
//! in the reply match the catalog by exact case-insensitive comparison
//! only; there is no fuzzy fallback on this path.
//!
//! Every failure mode here is recoverable by design: the classifier chain
//! catches the error and falls through to the heuristic path.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use parking_lot::RwLock;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::AiConfig;
use crate::error::{ClassifyError, Result};
use crate::parser::{ActionKind, ConfidenceLevel, Intent, ParsedCommand};
use crate::store::{Contact, Priority};

use super::{Classifier, ParseRequest};

// ============================================================================
// Credential store
// ============================================================================

/// Holds the opaque API credential.
///
/// The credential is cached in memory and optionally persisted to a file;
/// callers only ever need get/set/clear/has-value.
pub struct ApiKeyStore {
    path: Option<PathBuf>,
    cached: RwLock<Option<String>>,
}

impl ApiKeyStore {
    /// A store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            cached: RwLock::new(None),
        }
    }

    /// A store persisted at the given file, loading any existing value.
    pub fn at_path(path: PathBuf) -> Self {
        let existing = std::fs::read_to_string(&path)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        Self {
            path: Some(path),
            cached: RwLock::new(existing),
        }
    }

    /// The standard per-user location, falling back to memory-only when no
    /// config directory exists.
    pub fn default_location() -> Self {
        match dirs::config_dir() {
            Some(dir) => Self::at_path(dir.join("tether/api_key")),
            None => Self::in_memory(),
        }
    }

    /// The stored credential, if any.
    pub fn get(&self) -> Option<String> {
        self.cached.read().clone()
    }

    /// Whether a credential is configured.
    pub fn has_key(&self) -> bool {
        self.cached.read().is_some()
    }

    /// Store a credential, persisting it when a path is configured.
    pub fn set(&self, api_key: &str) -> Result<()> {
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, api_key)?;
        }
        *self.cached.write() = Some(api_key.to_string());
        Ok(())
    }

    /// Remove the credential from memory and disk.
    pub fn clear(&self) -> Result<()> {
        if let Some(path) = &self.path {
            if path.exists() {
                std::fs::remove_file(path)?;
            }
        }
        *self.cached.write() = None;
        Ok(())
    }
}

// ============================================================================
// AI classifier
// ============================================================================

/// Classifier backed by an external chat-completion API.
pub struct AiClassifier {
    client: Client,
    config: AiConfig,
    keys: Arc<ApiKeyStore>,
}

impl AiClassifier {
    /// Create a classifier from configuration and a credential store.
    pub fn new(config: AiConfig, keys: Arc<ApiKeyStore>) -> std::result::Result<Self, ClassifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            config,
            keys,
        })
    }

    /// The credential store backing this classifier.
    pub fn key_store(&self) -> &ApiKeyStore {
        &self.keys
    }

    /// Validate a candidate credential with a minimal low-cost completion.
    ///
    /// Used before persisting user-supplied keys; not part of the parsing
    /// pipeline.
    pub async fn validate_key(&self, api_key: &str) -> bool {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: "Hello".to_string(),
            }],
            temperature: self.config.temperature,
            max_tokens: 5,
        };

        match self.post_completion(api_key, &request).await {
            Ok(_) => true,
            Err(error) => {
                tracing::warn!(%error, "API key validation failed");
                false
            }
        }
    }

    async fn request_classification(
        &self,
        api_key: &str,
        text: &str,
        catalog: &[Contact],
    ) -> std::result::Result<AiReply, ClassifyError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt(catalog),
                },
                ChatMessage {
                    role: "user",
                    content: text.to_string(),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self.post_completion(api_key, &request).await?;
        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .ok_or(ClassifyError::EmptyReply)?;

        serde_json::from_str(content).map_err(|e| ClassifyError::MalformedReply(e.to_string()))
    }

    async fn post_completion(
        &self,
        api_key: &str,
        request: &ChatRequest<'_>,
    ) -> std::result::Result<ChatResponse, ClassifyError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClassifyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// Map the structured reply onto the common command shape.
    fn build_command(&self, reply: AiReply, request: &ParseRequest<'_>) -> ParsedCommand {
        let mut contact_ids = Vec::new();
        let mut contact_names = Vec::new();

        for name in reply.contact_names {
            let name_lower = name.to_lowercase();
            match request
                .catalog
                .iter()
                .find(|c| c.name.to_lowercase() == name_lower)
            {
                Some(contact) => contact_ids.push(contact.id.clone()),
                None => contact_names.push(name),
            }
        }

        let warnings = if contact_names.is_empty() {
            Vec::new()
        } else {
            vec![format!("Unresolved contacts: {}", contact_names.join(", "))]
        };

        let action = match reply.intent {
            Intent::Event => Some(ActionKind::Meeting),
            Intent::Note => Some(ActionKind::Note),
            Intent::Task => None,
        };

        let raw_text = request.text.trim().to_string();
        let title = if reply.title.trim().is_empty() {
            raw_text.clone()
        } else {
            reply.title
        };

        ParsedCommand {
            intent: reply.intent,
            action,
            contact_ids,
            contact_names,
            date_start: reply.date_start.as_deref().and_then(parse_instant),
            date_end: reply.date_end.as_deref().and_then(parse_instant),
            time_specified: !reply.all_day,
            all_day: reply.all_day,
            priority: reply.priority,
            scope_id: request.scope_id.map(str::to_string),
            raw_text,
            title,
            confidence: reply.confidence,
            warnings,
        }
    }
}

#[async_trait]
impl Classifier for AiClassifier {
    fn name(&self) -> &'static str {
        "ai"
    }

    async fn classify(&self, request: &ParseRequest<'_>) -> Result<ParsedCommand> {
        let api_key = self.keys.get().ok_or(ClassifyError::MissingCredential)?;
        let reply = self
            .request_classification(&api_key, request.text, request.catalog)
            .await?;
        Ok(self.build_command(reply, request))
    }
}

// ============================================================================
// Wire formats
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// The structured classification reply.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AiReply {
    intent: Intent,
    confidence: ConfidenceLevel,
    title: String,
    #[serde(default)]
    #[allow(dead_code)]
    description: Option<String>,
    #[serde(default)]
    date_start: Option<String>,
    #[serde(default)]
    date_end: Option<String>,
    #[serde(default)]
    all_day: bool,
    #[serde(default)]
    contact_names: Vec<String>,
    #[serde(default)]
    priority: Option<Priority>,
}

/// Convert a calendar-date-time string from the reply into an instant.
fn parse_instant(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    None
}

fn system_prompt(catalog: &[Contact]) -> String {
    let contact_names = if catalog.is_empty() {
        "None".to_string()
    } else {
        catalog
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let today = Local::now().format("%A, %B %-d, %Y");

    format!(
        r#"You are a smart calendar assistant that classifies user input into tasks, events, or notes.

Today is {today}.

Available contacts: {contact_names}

Analyze the user's input and extract:
1. Intent: Is it a task (action item), event (meeting/appointment), or note (information)?
2. Title: A concise title
3. Description: Additional details (if any)
4. Date/Time: When it should happen (convert relative dates like "tomorrow", "next Friday" to actual dates)
5. Contacts: Which people are mentioned (match against available contacts)
6. Priority: Low, medium, or high (for tasks)
7. Confidence: How confident are you in this classification?

Respond ONLY with a JSON object in this exact format:
{{
  "intent": "task" | "event" | "note",
  "confidence": "high" | "medium" | "low",
  "title": "string",
  "description": "string or null",
  "dateStart": "ISO 8601 string or null",
  "dateEnd": "ISO 8601 string or null",
  "allDay": boolean,
  "contactNames": ["array of matched contact names"],
  "priority": "low" | "medium" | "high" (for tasks only)
}}"#
    )
}

// ============================================================================
// Tests
// ============================================================================
