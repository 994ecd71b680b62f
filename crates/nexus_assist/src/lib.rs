//! # nexus_assist
//!
//! AI assistant orchestration for Nexus.
//!
//! Turns project data and conversation history into prompts, sends them to a
//! text-generation backend, and guarantees every operation resolves with
//! usable text by substituting local fallback content on any failure.
//!
//! # Features
//!
//! - **Prompt Builder**: Deterministic prompts with a fixed persona
//! - **Gateway**: HTTP client for the generation proxy, behind a trait
//! - **Fallback**: Offline substitute hints, chat replies and roadmaps
//! - **Conversation**: Append-only turn log with bounded context windows
//! - **Facade**: `generate_hints`, `chat`, `generate_roadmap` that never fail
//! - **Scripted Gateway**: For testing without a backend
//!
//! # Example
//!
//! ```rust,no_run
//! use nexus_assist::{Assistant, AssistantConfig};
//! use nexus_core::{NewProject, ProjectRegistry};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AssistantConfig::from_env()?;
//!     let assistant = Assistant::from_config(&config)?;
//!
//!     let mut registry = ProjectRegistry::new();
//!     let project = registry.create(NewProject::new("Launch"))?;
//!
//!     println!("{}", assistant.generate_hints(&project).await);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod conversation;
pub mod error;
pub mod facade;
pub mod fallback;
pub mod gateway;
pub mod mock;
pub mod persona;
pub mod prompt;
pub mod types;

pub use config::{AssistantConfig, RetryPolicy, DEFAULT_API_URL};
pub use conversation::{Conversation, GREETING};
pub use error::{ConfigError, ConfigResult, GatewayError, GatewayResult};
pub use facade::Assistant;
pub use fallback::{
    FallbackGenerator, FixedSelector, RandomSelector, RotatingSelector, TemplateSelector,
    CHAT_OFFLINE_NOTICE, HINTS_OFFLINE_NOTICE, ROADMAP_UNAVAILABLE,
};
pub use gateway::{Gateway, HttpGateway, OfflineGateway};
pub use mock::{ScriptedGateway, ScriptedReply};
pub use persona::{mentions_provider, Persona, NEXUS_PERSONA};
pub use prompt::{
    project_block, Prompt, PromptBuilder, EMPTY_HISTORY, NO_DESCRIPTION, PROJECT_CONTEXT_HEADING,
};
pub use types::{
    ConversationWindow, OperationEvent, OperationId, OperationKind, OperationRequest,
    OperationResult, OperationStatus, Outcome, Role, Turn, MAX_CONTEXT_TURNS,
};
