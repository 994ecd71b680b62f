//! Core types for the assistant layer.

use std::fmt;

use nexus_core::Project;
use serde::{Deserialize, Serialize};

/// Most turns ever sent to the backend as conversation context.
pub const MAX_CONTEXT_TURNS: usize = 5;

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Label used when a turn is written into a prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

/// A single conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    /// Create a new user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a new assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The most recent turns of a conversation, at most [`MAX_CONTEXT_TURNS`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConversationWindow {
    turns: Vec<Turn>,
}

impl ConversationWindow {
    /// Keep only the last `MAX_CONTEXT_TURNS` of `turns`, in order.
    pub fn new(mut turns: Vec<Turn>) -> Self {
        if turns.len() > MAX_CONTEXT_TURNS {
            turns.drain(..turns.len() - MAX_CONTEXT_TURNS);
        }
        Self { turns }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

/// The three user-facing assistant operations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Hints,
    Chat,
    Roadmap,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hints => "hints",
            Self::Chat => "chat",
            Self::Roadmap => "roadmap",
        })
    }
}

/// Everything one operation needs, including what the fallback needs
/// when the backend cannot be reached.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationRequest {
    Hints {
        project: Project,
    },
    Chat {
        message: String,
        project: Option<Project>,
        window: ConversationWindow,
    },
    Roadmap {
        project: Project,
    },
}

impl OperationRequest {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Hints { .. } => OperationKind::Hints,
            Self::Chat { .. } => OperationKind::Chat,
            Self::Roadmap { .. } => OperationKind::Roadmap,
        }
    }

    /// The project the request is about, if any.
    pub fn project(&self) -> Option<&Project> {
        match self {
            Self::Hints { project } | Self::Roadmap { project } => Some(project),
            Self::Chat { project, .. } => project.as_ref(),
        }
    }
}

/// Where the text of an [`OperationResult`] came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Fallback,
}

/// Text produced by an operation, tagged with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    /// Text generated by the backend
    Success(String),
    /// Substitute text produced locally
    Fallback(String),
}

impl OperationResult {
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Fallback(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Success(text) | Self::Fallback(text) => text,
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            Self::Success(_) => Outcome::Success,
            Self::Fallback(_) => Outcome::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Identifier of one operation invocation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct OperationId(uuid::Uuid);

impl OperationId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for OperationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Observable status of an operation invocation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OperationStatus {
    Idle,
    Pending,
}

/// Lifecycle notifications for the UI (loading indicators, telemetry).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OperationEvent {
    /// The operation entered Pending
    Started { id: OperationId, kind: OperationKind },
    /// The operation produced its result and is Idle again
    Resolved {
        id: OperationId,
        kind: OperationKind,
        outcome: Outcome,
    },
    /// The caller dropped the operation before it resolved
    Abandoned { id: OperationId, kind: OperationKind },
}

impl OperationEvent {
    pub fn id(&self) -> OperationId {
        match self {
            Self::Started { id, .. } | Self::Resolved { id, .. } | Self::Abandoned { id, .. } => *id,
        }
    }
}
