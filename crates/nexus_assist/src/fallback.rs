//! Local substitute text for when the backend is unavailable.
//!
//! Generation is pure: the only varying input is the [`TemplateSelector`]
//! that picks among the chat templates, and tests pin it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use nexus_core::Project;

use crate::types::OperationRequest;

/// Appended to hints produced without the backend.
pub const HINTS_OFFLINE_NOTICE: &str =
    "**⚠️ Note:** Connection to Nexus AI is currently offline. Using local fallback mode.";

/// Appended to chat replies produced without the backend.
pub const CHAT_OFFLINE_NOTICE: &str =
    "**⚠️ Note:** Nexus AI is offline. Reconnect for smarter insights.";

/// The whole roadmap fallback.
pub const ROADMAP_UNAVAILABLE: &str = "Unable to generate roadmap. Please try again.";

// `{focus}` is replaced by a sentence naming the attached project, or removed.
const CHAT_TEMPLATES: &[&str] = &[
    "I can help with project planning! {focus}What challenge are you facing?",
    "Good question. {focus}A reliable approach is to split the work into small milestones and tackle the riskiest one first. Which milestone should we plan?",
    "{focus}A quick tip: review priorities with your team every week and keep a short, visible list of blockers. What is blocking you right now?",
    "Let's break this down. {focus}Write down the outcome you want, the steps to get there, and who owns each step. Where would you like to start?",
];

/// Picks which of `count` templates to use.
pub trait TemplateSelector: Send + Sync {
    /// Return an index in `0..count`. `count` is never zero.
    fn select(&self, count: usize) -> usize;
}

/// Uniformly random selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelector;

impl TemplateSelector for RandomSelector {
    fn select(&self, count: usize) -> usize {
        fastrand::usize(..count)
    }
}

/// Always the same template.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSelector(pub usize);

impl TemplateSelector for FixedSelector {
    fn select(&self, count: usize) -> usize {
        self.0 % count
    }
}

/// Cycles through templates in order.
#[derive(Debug, Default)]
pub struct RotatingSelector {
    next: AtomicUsize,
}

impl TemplateSelector for RotatingSelector {
    fn select(&self, count: usize) -> usize {
        self.next.fetch_add(1, Ordering::Relaxed) % count
    }
}

/// Produces substitute text for each operation.
#[derive(Clone)]
pub struct FallbackGenerator {
    selector: Arc<dyn TemplateSelector>,
}

impl Default for FallbackGenerator {
    fn default() -> Self {
        Self::new(Arc::new(RandomSelector))
    }
}

impl FallbackGenerator {
    pub fn new(selector: Arc<dyn TemplateSelector>) -> Self {
        Self { selector }
    }

    /// Generator that always picks the first chat template.
    pub fn deterministic() -> Self {
        Self::new(Arc::new(FixedSelector(0)))
    }

    /// Substitute text for a request. Never empty.
    pub fn fallback(&self, request: &OperationRequest) -> String {
        match request {
            OperationRequest::Hints { project } => self.hints(project),
            OperationRequest::Chat { project, .. } => self.chat(project.as_ref()),
            OperationRequest::Roadmap { .. } => self.roadmap(),
        }
    }

    pub fn hints(&self, project: &Project) -> String {
        let progress = project.progress.value();
        let first_step = match progress {
            0..=24 => "Define the scope and the success criteria before writing code",
            25..=74 => "Focus on the core features and cut anything that is not essential",
            _ => "Prioritize testing, polish and launch preparation",
        };

        format!(
            "## 🎯 Quick Hints for \"{name}\"\n\n\
             **Current Progress:** {progress}%\n\n\
             ### Next Steps\n\
             - {first_step}\n\
             - Break the remaining work into weekly milestones\n\
             - Give every milestone a clear owner across your team of {team}\n\n\
             ### Tech Recommendations\n\
             - Prefer a stack your team already knows well\n\
             - Set up version control and continuous integration early\n\
             - Add automated tests for the most important workflows\n\n\
             ### Timeline Tips\n\
             - Due {due}: keep a buffer of roughly 20% before the deadline\n\
             - Review progress at the end of every week and adjust scope early\n\n\
             {notice}",
            name = project.name,
            progress = progress,
            first_step = first_step,
            team = project.team_size,
            due = project.due_date,
            notice = HINTS_OFFLINE_NOTICE,
        )
    }

    pub fn chat(&self, project: Option<&Project>) -> String {
        let index = self.selector.select(CHAT_TEMPLATES.len()).min(CHAT_TEMPLATES.len() - 1);
        let focus = project
            .map(|p| format!("Let's focus on \"{}\". ", p.name))
            .unwrap_or_default();
        let body = CHAT_TEMPLATES[index].replace("{focus}", &focus);

        format!("{}\n\n{}", body, CHAT_OFFLINE_NOTICE)
    }

    pub fn roadmap(&self) -> String {
        ROADMAP_UNAVAILABLE.to_string()
    }

    /// Number of chat templates available to the selector.
    pub fn chat_template_count() -> usize {
        CHAT_TEMPLATES.len()
    }
}
