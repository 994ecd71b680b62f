//! Scripted gateway for testing.
//!
//! Replays a fixed list of replies and records every prompt it receives as
//! full text ([`Prompt::text`]), so operations can be exercised without a
//! running backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::Gateway;
use crate::prompt::Prompt;

/// One scripted gateway reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedReply {
    Text(String),
    Fail(GatewayError),
}

impl ScriptedReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn unreachable() -> Self {
        Self::Fail(GatewayError::Transport("connection refused".to_string()))
    }
}

/// Gateway that answers from a script.
///
/// Replies are consumed in order; once the script runs out the last reply
/// repeats. An empty script fails every call.
#[derive(Clone)]
pub struct ScriptedGateway {
    replies: Arc<RwLock<Vec<ScriptedReply>>>,
    reply_index: Arc<AtomicUsize>,
    prompts: Arc<RwLock<Vec<String>>>,
    latency: Arc<RwLock<Option<Duration>>>,
    reachable: Arc<RwLock<bool>>,
}

impl Default for ScriptedGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(RwLock::new(Vec::new())),
            reply_index: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(RwLock::new(Vec::new())),
            latency: Arc::new(RwLock::new(None)),
            reachable: Arc::new(RwLock::new(true)),
        }
    }

    /// Gateway that returns `text` for every call.
    pub fn always(text: impl Into<String>) -> Self {
        Self::new().reply(text)
    }

    /// Gateway that fails every call with a transport error.
    pub fn failing() -> Self {
        Self::new()
            .with_replies(vec![ScriptedReply::unreachable()])
            .set_reachable(false)
    }

    /// Queue a successful reply.
    pub fn reply(self, text: impl Into<String>) -> Self {
        self.replies.write().push(ScriptedReply::text(text));
        self
    }

    /// Queue a failure.
    pub fn fail(self, error: GatewayError) -> Self {
        self.replies.write().push(ScriptedReply::Fail(error));
        self
    }

    /// Replace the whole script.
    pub fn with_replies(self, replies: Vec<ScriptedReply>) -> Self {
        *self.replies.write() = replies;
        self
    }

    /// Delay every reply by `latency`.
    pub fn with_latency(self, latency: Duration) -> Self {
        *self.latency.write() = Some(latency);
        self
    }

    /// What `probe` reports.
    pub fn set_reachable(self, reachable: bool) -> Self {
        *self.reachable.write() = reachable;
        self
    }

    /// Every prompt received, in arrival order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.read().clone()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.read().last().cloned()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.read().len()
    }

    fn next_reply(&self) -> ScriptedReply {
        let replies = self.replies.read();
        if replies.is_empty() {
            return ScriptedReply::Fail(GatewayError::Malformed("no scripted reply".to_string()));
        }
        let index = self.reply_index.fetch_add(1, Ordering::SeqCst);
        replies[index.min(replies.len() - 1)].clone()
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn send(&self, prompt: &Prompt) -> GatewayResult<String> {
        self.prompts.write().push(prompt.text());
        let reply = self.next_reply();

        let latency = *self.latency.read();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }

        match reply {
            ScriptedReply::Text(text) => Ok(text),
            ScriptedReply::Fail(error) => Err(error),
        }
    }

    async fn probe(&self) -> bool {
        *self.reachable.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(body: &str) -> Prompt {
        Prompt {
            system: "S".to_string(),
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn test_replies_in_order_then_repeat_last() {
        let gateway = ScriptedGateway::new().reply("one").reply("two");

        assert_eq!(gateway.send(&prompt("a")).await.unwrap(), "one");
        assert_eq!(gateway.send(&prompt("b")).await.unwrap(), "two");
        assert_eq!(gateway.send(&prompt("c")).await.unwrap(), "two");
        assert_eq!(gateway.prompts(), vec!["S\n\na", "S\n\nb", "S\n\nc"]);
        assert_eq!(gateway.call_count(), 3);
    }

    #[tokio::test]
    async fn test_failing_gateway() {
        let gateway = ScriptedGateway::failing();

        assert!(matches!(gateway.send(&prompt("x")).await, Err(GatewayError::Transport(_))));
        assert!(!gateway.probe().await);
        assert_eq!(gateway.last_prompt().as_deref(), Some("S\n\nx"));
    }

    #[tokio::test]
    async fn test_replaced_script() {
        let gateway = ScriptedGateway::always("discarded").with_replies(vec![
            ScriptedReply::unreachable(),
            ScriptedReply::text("back online"),
        ]);

        assert!(matches!(gateway.send(&prompt("a")).await, Err(GatewayError::Transport(_))));
        assert_eq!(gateway.send(&prompt("b")).await.unwrap(), "back online");
    }

    #[tokio::test]
    async fn test_empty_script_fails() {
        let gateway = ScriptedGateway::new();
        assert!(gateway.send(&prompt("x")).await.is_err());
        assert!(gateway.probe().await);
    }

    #[test]
    fn test_usable_from_sync_code() {
        let gateway = ScriptedGateway::always("ok").set_reachable(false);
        assert_eq!(tokio_test::block_on(gateway.send(&prompt("x"))).unwrap(), "ok");
        assert!(!tokio_test::block_on(gateway.probe()));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let gateway = ScriptedGateway::always("ok");
        let clone = gateway.clone();
        clone.send(&prompt("from clone")).await.unwrap();
        assert_eq!(gateway.call_count(), 1);
    }
}
