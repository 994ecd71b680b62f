//! Prompt construction.
//!
//! [`PromptBuilder::compose`] is a pure function of its inputs: the same
//! request always yields the same bytes. Every prompt is laid out as
//!
//! ```text
//! <persona block>          Prompt::system
//!
//! <task-specific sections> Prompt::body
//! ```
//!
//! The backend joins the two parts with a blank line, so the model sees
//! exactly [`Prompt::text`].

use nexus_core::Project;

use crate::persona::Persona;
use crate::types::{ConversationWindow, OperationRequest};

/// Rendered in place of a missing or blank project description.
pub const NO_DESCRIPTION: &str = "No description provided";

/// Rendered in place of an empty conversation history.
pub const EMPTY_HISTORY: &str = "(no previous messages)";

/// Heading of the structured project block.
pub const PROJECT_CONTEXT_HEADING: &str = "PROJECT CONTEXT:";

const HINTS_TASK: &str = "TASK: Analyze this project and respond with exactly these numbered sections:
1. **Smart Insights** - 2-3 observations about the project's current state and scope
2. **Recommended Tech Stack** - tools and technologies that fit this project, with one line of reasoning each
3. **Next Steps** - 3-5 concrete, prioritized actions for the team
4. **Potential Challenges** - the main risks and how to mitigate them";

const ROADMAP_TASK: &str = "TASK: Create a development roadmap for this project with exactly 5 phases:
**Phase 1: Discovery & Planning**
**Phase 2: Design & Architecture**
**Phase 3: Core Development**
**Phase 4: Testing & Refinement**
**Phase 5: Launch & Iteration**

For every phase list:
- **Tasks**: the key tasks
- **Duration**: an estimated duration that fits the due date and team size
- **Success Criteria**: how the team knows the phase is done";

const CHAT_INSTRUCTION: &str =
    "Respond conversationally and helpfully. Aim for under 150 words unless the user asks for detail.";

/// A built prompt, as sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Rendered persona block
    pub system: String,
    /// Task-specific sections
    pub body: String,
}

impl Prompt {
    /// The prompt as one text: persona block, blank line, task sections.
    pub fn text(&self) -> String {
        format!("{}\n\n{}", self.system, self.body)
    }
}

/// Builds backend prompts from operation requests.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    persona: Persona,
}

impl PromptBuilder {
    pub fn new(persona: Persona) -> Self {
        Self { persona }
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Full prompt text for a request, persona first.
    pub fn build(&self, request: &OperationRequest) -> String {
        self.compose(request).text()
    }

    /// The prompt split into persona block and task sections.
    pub fn compose(&self, request: &OperationRequest) -> Prompt {
        let mut sections = Vec::new();

        match request {
            OperationRequest::Hints { project } => {
                sections.push(project_block(project));
                sections.push(HINTS_TASK.to_string());
            }
            OperationRequest::Roadmap { project } => {
                sections.push(project_block(project));
                sections.push(ROADMAP_TASK.to_string());
            }
            OperationRequest::Chat {
                message,
                project,
                window,
            } => {
                sections.push(history_block(window));
                if let Some(project) = project {
                    sections.push(project_block(project));
                }
                sections.push(format!("USER MESSAGE:\n{}", message));
                sections.push(CHAT_INSTRUCTION.to_string());
            }
        }

        Prompt {
            system: self.persona.render(),
            body: sections.join("\n\n"),
        }
    }
}

/// Labeled project block shared by every prompt that carries a project.
pub fn project_block(project: &Project) -> String {
    format!(
        "{}\n- Name: {}\n- Description: {}\n- Progress: {}%\n- Team Size: {} members\n- Due Date: {}\n- Status: {}",
        PROJECT_CONTEXT_HEADING,
        project.name,
        project.description_text().unwrap_or(NO_DESCRIPTION),
        project.progress,
        project.team_size,
        project.due_date,
        project.status,
    )
}

fn history_block(window: &ConversationWindow) -> String {
    let mut block = String::from("CONVERSATION HISTORY:");
    if window.is_empty() {
        block.push('\n');
        block.push_str(EMPTY_HISTORY);
        return block;
    }
    // Continuation lines are indented so every labelled line starts a turn.
    for turn in window.turns() {
        block.push('\n');
        block.push_str(turn.role.label());
        block.push_str(": ");
        for (i, line) in turn.content.lines().enumerate() {
            if i > 0 {
                block.push_str("\n  ");
            }
            block.push_str(line);
        }
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::NEXUS_PERSONA;
    use crate::types::Turn;
    use chrono::{TimeZone, Utc};
    use nexus_core::{Progress, ProjectId, ProjectStatus};
    use std::num::NonZeroU32;

    fn launch() -> Project {
        Project {
            id: ProjectId(1),
            name: "Launch".to_string(),
            description: None,
            logo: None,
            progress: Progress::new(40).unwrap(),
            team_size: NonZeroU32::new(3).unwrap(),
            due_date: "Dec 1".to_string(),
            status: ProjectStatus::Active,
            created_at: Utc.with_ymd_and_hms(2024, 11, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_hints_prompt_layout() {
        let prompt = PromptBuilder::default().build(&OperationRequest::Hints { project: launch() });

        assert!(prompt.starts_with(&NEXUS_PERSONA.render()));
        assert!(prompt.contains("- Name: Launch"));
        assert!(prompt.contains(&format!("- Description: {}", NO_DESCRIPTION)));
        assert!(prompt.contains("- Progress: 40%"));
        assert!(prompt.contains("- Team Size: 3 members"));
        assert!(prompt.contains("- Due Date: Dec 1"));
        assert!(prompt.contains("- Status: active"));
        for section in ["Smart Insights", "Recommended Tech Stack", "Next Steps", "Potential Challenges"] {
            assert!(prompt.contains(section), "missing {}", section);
        }
    }

    #[test]
    fn test_blank_description_uses_placeholder() {
        let mut project = launch();
        project.description = Some("   ".to_string());
        let block = project_block(&project);
        assert!(block.contains(NO_DESCRIPTION));
        assert!(!block.contains("Description: \n"));
    }

    #[test]
    fn test_roadmap_prompt_has_five_phases() {
        let prompt = PromptBuilder::default().build(&OperationRequest::Roadmap { project: launch() });

        for phase in 1..=5 {
            assert!(prompt.contains(&format!("Phase {}:", phase)));
        }
        assert!(prompt.contains("**Tasks**"));
        assert!(prompt.contains("**Duration**"));
        assert!(prompt.contains("**Success Criteria**"));
    }

    #[test]
    fn test_chat_prompt_history_order() {
        let window = ConversationWindow::new(vec![
            Turn::assistant("Hello!"),
            Turn::user("Plan my sprint"),
            Turn::assistant("Sure."),
        ]);
        let prompt = PromptBuilder::default().build(&OperationRequest::Chat {
            message: "What next?".to_string(),
            project: Some(launch()),
            window,
        });

        let history = prompt.find("Assistant: Hello!").unwrap();
        let user = prompt.find("User: Plan my sprint").unwrap();
        let reply = prompt.find("Assistant: Sure.").unwrap();
        let context = prompt.find(PROJECT_CONTEXT_HEADING).unwrap();
        let message = prompt.find("USER MESSAGE:\nWhat next?").unwrap();

        assert!(history < user && user < reply && reply < context && context < message);
        assert!(prompt.ends_with(CHAT_INSTRUCTION));
    }

    #[test]
    fn test_chat_prompt_without_project() {
        let prompt = PromptBuilder::default().build(&OperationRequest::Chat {
            message: "What should I do?".to_string(),
            project: None,
            window: ConversationWindow::default(),
        });

        assert!(prompt.contains(&NEXUS_PERSONA.render()));
        assert!(prompt.contains(EMPTY_HISTORY));
        assert!(prompt.contains("What should I do?"));
        assert!(!prompt.contains(PROJECT_CONTEXT_HEADING));
    }

    #[test]
    fn test_multiline_turns_stay_labelled() {
        let window = ConversationWindow::new(vec![
            Turn::assistant("## Hints\n- Scope first\n- Ship weekly"),
            Turn::user("Thanks"),
        ]);
        let prompt = PromptBuilder::default().build(&OperationRequest::Chat {
            message: "More?".to_string(),
            project: None,
            window,
        });

        assert!(prompt.contains(
            "CONVERSATION HISTORY:\nAssistant: ## Hints\n  - Scope first\n  - Ship weekly\nUser: Thanks"
        ));
    }

    #[test]
    fn test_compose_splits_persona_from_task() {
        let builder = PromptBuilder::default();
        let request = OperationRequest::Hints { project: launch() };
        let prompt = builder.compose(&request);

        assert_eq!(prompt.system, builder.persona().render());
        assert!(prompt.body.starts_with(PROJECT_CONTEXT_HEADING));
        assert!(!prompt.body.contains(NEXUS_PERSONA.identity));
        assert_eq!(prompt.text(), builder.build(&request));
    }

    #[test]
    fn test_custom_persona() {
        let persona = Persona {
            name: "Atlas",
            ..NEXUS_PERSONA
        };
        let builder = PromptBuilder::new(persona);
        assert_eq!(builder.persona().name, "Atlas");

        let prompt = builder.compose(&OperationRequest::Roadmap { project: launch() });
        assert!(prompt.system.starts_with("You are Atlas"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let request = OperationRequest::Chat {
            message: "Status?".to_string(),
            project: Some(launch()),
            window: ConversationWindow::new(vec![Turn::user("hi"), Turn::assistant("hello")]),
        };
        let builder = PromptBuilder::default();
        assert_eq!(builder.build(&request), builder.build(&request.clone()));
        assert_eq!(builder.build(&request), PromptBuilder::default().build(&request));
    }
}
