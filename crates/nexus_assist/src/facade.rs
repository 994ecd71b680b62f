//! The orchestration facade.
//!
//! [`Assistant`] is the single entry point the UI talks to. Each operation
//! builds a prompt, sends it through the [`Gateway`], and on any failure
//! substitutes local fallback text. Operations never return an error.
//!
//! ```text
//!            ┌──────────────┐   prompt   ┌─────────┐
//! request ──▶│PromptBuilder │───────────▶│ Gateway │── Ok(text) ──▶ Success
//!            └──────────────┘            └─────────┘
//!                                             │ Err
//!                                             ▼
//!                                  ┌───────────────────┐
//!                                  │ FallbackGenerator │───────▶ Fallback
//!                                  └───────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use nexus_core::Project;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::config::{AssistantConfig, RetryPolicy};
use crate::conversation::Conversation;
use crate::error::{GatewayError, GatewayResult};
use crate::fallback::FallbackGenerator;
use crate::gateway::{Gateway, HttpGateway};
use crate::persona::mentions_provider;
use crate::prompt::{Prompt, PromptBuilder};
use crate::types::{
    OperationEvent, OperationId, OperationKind, OperationRequest, OperationResult,
    OperationStatus, Outcome, Turn, MAX_CONTEXT_TURNS,
};

const EVENT_CAPACITY: usize = 64;

type PendingMap = Arc<Mutex<HashMap<OperationId, OperationKind>>>;

/// Orchestrates hints, chat and roadmap operations.
pub struct Assistant {
    gateway: Arc<dyn Gateway>,
    builder: PromptBuilder,
    fallback: FallbackGenerator,
    conversation: Arc<Conversation>,
    retry: RetryPolicy,
    context_window: usize,
    pending: PendingMap,
    events: broadcast::Sender<OperationEvent>,
}

impl Assistant {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            gateway,
            builder: PromptBuilder::default(),
            fallback: FallbackGenerator::default(),
            conversation: Arc::new(Conversation::new()),
            retry: RetryPolicy::default(),
            context_window: MAX_CONTEXT_TURNS,
            pending: Arc::new(Mutex::new(HashMap::new())),
            events,
        }
    }

    /// An assistant backed by the HTTP gateway described by `config`.
    pub fn from_config(config: &AssistantConfig) -> GatewayResult<Self> {
        let gateway = HttpGateway::new(config)?;
        Ok(Self::new(Arc::new(gateway))
            .with_retry(config.retry.clone())
            .with_context_window(config.context_window))
    }

    pub fn with_prompt_builder(mut self, builder: PromptBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackGenerator) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_conversation(mut self, conversation: Arc<Conversation>) -> Self {
        self.conversation = conversation;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Turns of history sent with chat prompts, capped at [`MAX_CONTEXT_TURNS`].
    pub fn with_context_window(mut self, turns: usize) -> Self {
        self.context_window = turns.min(MAX_CONTEXT_TURNS);
        self
    }

    pub fn conversation(&self) -> &Arc<Conversation> {
        &self.conversation
    }

    /// Subscribe to operation lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<OperationEvent> {
        self.events.subscribe()
    }

    pub fn status(&self, id: OperationId) -> OperationStatus {
        if self.pending.lock().contains_key(&id) {
            OperationStatus::Pending
        } else {
            OperationStatus::Idle
        }
    }

    /// Operations currently in flight.
    pub fn pending(&self) -> Vec<(OperationId, OperationKind)> {
        self.pending.lock().iter().map(|(id, kind)| (*id, *kind)).collect()
    }

    /// Whether any operation of `kind` is in flight.
    pub fn is_busy(&self, kind: OperationKind) -> bool {
        self.pending.lock().values().any(|k| *k == kind)
    }

    pub async fn generate_hints(&self, project: &Project) -> String {
        self.generate_hints_outcome(project).await.into_text()
    }

    pub async fn generate_hints_outcome(&self, project: &Project) -> OperationResult {
        let ticket = self.begin(OperationKind::Hints);
        let request = OperationRequest::Hints {
            project: project.clone(),
        };
        let result = self.run(ticket.id, &request).await;
        ticket.resolve(result.outcome());
        result
    }

    /// One chat exchange.
    ///
    /// The user turn is appended before the backend is called; the assistant
    /// turn is appended once the reply (or its fallback) is known.
    pub async fn chat(&self, message: &str, project: Option<&Project>) -> String {
        self.chat_outcome(message, project).await.into_text()
    }

    pub async fn chat_outcome(&self, message: &str, project: Option<&Project>) -> OperationResult {
        let ticket = self.begin(OperationKind::Chat);
        let window = self.conversation.push_user(message, self.context_window);
        let request = OperationRequest::Chat {
            message: message.to_string(),
            project: project.cloned(),
            window,
        };

        let result = self.run(ticket.id, &request).await;
        self.conversation.append(Turn::assistant(result.text()));
        ticket.resolve(result.outcome());
        result
    }

    pub async fn generate_roadmap(&self, project: &Project) -> String {
        self.generate_roadmap_outcome(project).await.into_text()
    }

    pub async fn generate_roadmap_outcome(&self, project: &Project) -> OperationResult {
        let ticket = self.begin(OperationKind::Roadmap);
        let request = OperationRequest::Roadmap {
            project: project.clone(),
        };
        let result = self.run(ticket.id, &request).await;
        ticket.resolve(result.outcome());
        result
    }

    /// Announce a newly created project in the conversation and post its hints.
    pub async fn analyze_project(&self, project: &Project) -> OperationResult {
        self.conversation
            .append(Turn::assistant(format!("🎉 Analyzing \"{}\"...", project.name)));
        let result = self.generate_hints_outcome(project).await;
        self.conversation.append(Turn::assistant(result.text()));
        result
    }

    /// Whether the backend currently answers its health check.
    pub async fn check_connection(&self) -> bool {
        let connected = self.gateway.probe().await;
        if connected {
            info!("Nexus AI backend reachable");
        } else {
            warn!("Nexus AI backend unreachable, operations will use local fallback");
        }
        connected
    }

    fn begin(&self, kind: OperationKind) -> OperationTicket {
        let id = OperationId::new();
        self.pending.lock().insert(id, kind);
        debug!(operation = %id, kind = %kind, "Operation started");
        let _ = self.events.send(OperationEvent::Started { id, kind });

        OperationTicket {
            id,
            kind,
            pending: Arc::clone(&self.pending),
            events: self.events.clone(),
            resolved: false,
        }
    }

    async fn run(&self, id: OperationId, request: &OperationRequest) -> OperationResult {
        let prompt = self.builder.compose(request);

        match self.send_with_retry(id, &prompt).await {
            Ok(text) => {
                if mentions_provider(&text) {
                    warn!(operation = %id, "Generated text names the underlying provider");
                }
                OperationResult::Success(text)
            }
            Err(e) => {
                warn!(operation = %id, kind = %request.kind(), "Generation failed, using fallback: {}", e);
                OperationResult::Fallback(self.fallback.fallback(request))
            }
        }
    }

    async fn send_with_retry(
        &self,
        id: OperationId,
        prompt: &Prompt,
    ) -> Result<String, GatewayError> {
        let attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.gateway.send(prompt).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt < attempts => {
                    let delay = self.retry.delay_for(attempt);
                    debug!(
                        operation = %id,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Gateway call failed, retrying: {}",
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Tracks one operation while it is Pending.
///
/// Dropping an unresolved ticket removes it from the pending set and
/// publishes [`OperationEvent::Abandoned`].
struct OperationTicket {
    id: OperationId,
    kind: OperationKind,
    pending: PendingMap,
    events: broadcast::Sender<OperationEvent>,
    resolved: bool,
}

impl OperationTicket {
    fn resolve(mut self, outcome: Outcome) {
        self.resolved = true;
        self.pending.lock().remove(&self.id);
        info!(operation = %self.id, kind = %self.kind, outcome = ?outcome, "Operation resolved");
        let _ = self.events.send(OperationEvent::Resolved {
            id: self.id,
            kind: self.kind,
            outcome,
        });
    }
}

impl Drop for OperationTicket {
    fn drop(&mut self) {
        if self.resolved {
            return;
        }
        self.pending.lock().remove(&self.id);
        debug!(operation = %self.id, kind = %self.kind, "Operation abandoned");
        let _ = self.events.send(OperationEvent::Abandoned {
            id: self.id,
            kind: self.kind,
        });
    }
}
