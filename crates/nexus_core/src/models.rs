//! Project data model.
//!
//! Records serialize with the same field names the web client kept in
//! local storage (`team`, `due`, `createdAt` in epoch milliseconds), so an
//! exported project list can be loaded as-is.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Unique, creation-ordered project identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub u64);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Completion percentage, always within 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Progress(u8);

impl Progress {
    pub const MAX: u8 = 100;

    /// Create a progress value, rejecting anything above 100.
    pub fn new(value: i64) -> CoreResult<Self> {
        if (0..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(CoreError::InvalidProgress(value))
        }
    }

    /// Create a progress value, clamping into range.
    pub fn saturating(value: i64) -> Self {
        Self(value.clamp(0, Self::MAX as i64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Progress {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value as i64)
    }
}

impl From<Progress> for u8 {
    fn from(progress: Progress) -> Self {
        progress.0
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Active,
    OnHold,
    Completed,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::OnHold => "on-hold",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "on-hold" | "onhold" | "on_hold" => Ok(Self::OnHold),
            "completed" | "done" => Ok(Self::Completed),
            "archived" => Ok(Self::Archived),
            other => Err(CoreError::UnknownStatus(other.to_string())),
        }
    }
}

/// A project tracked by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Logo as a data URL or file path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default)]
    pub progress: Progress,
    #[serde(rename = "team")]
    pub team_size: NonZeroU32,
    /// Due date as displayed, e.g. "Dec 1"
    #[serde(rename = "due")]
    pub due_date: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Build a project from a creation request, filling defaults.
    pub fn create(
        id: ProjectId,
        request: NewProject,
        defaults: &dyn ProjectDefaults,
        now: DateTime<Utc>,
    ) -> CoreResult<Self> {
        let name = validate_name(&request.name)?;

        Ok(Self {
            id,
            name,
            description: normalize(request.description),
            logo: normalize(request.logo),
            progress: Progress::default(),
            team_size: defaults.team_size(),
            due_date: defaults.due_date(now),
            status: ProjectStatus::Active,
            created_at: now,
        })
    }

    /// Description, treating blank text as absent.
    pub fn description_text(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    pub fn is_active(&self) -> bool {
        self.status == ProjectStatus::Active
    }
}

/// Request to create a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewProject {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
}

impl NewProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            logo: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }
}

/// Partial update of a project. `None` leaves a field untouched; an empty
/// description or logo clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub progress: Option<Progress>,
    pub team_size: Option<NonZeroU32>,
    pub due_date: Option<String>,
    pub status: Option<ProjectStatus>,
}

impl ProjectUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.logo.is_none()
            && self.progress.is_none()
            && self.team_size.is_none()
            && self.due_date.is_none()
            && self.status.is_none()
    }

    /// Apply the update, returning the modified project.
    pub fn apply(self, project: &Project) -> CoreResult<Project> {
        let mut updated = project.clone();

        if let Some(name) = self.name {
            updated.name = validate_name(&name)?;
        }
        if let Some(description) = self.description {
            updated.description = normalize(Some(description));
        }
        if let Some(logo) = self.logo {
            updated.logo = normalize(Some(logo));
        }
        if let Some(progress) = self.progress {
            updated.progress = progress;
        }
        if let Some(team_size) = self.team_size {
            updated.team_size = team_size;
        }
        if let Some(due_date) = self.due_date {
            updated.due_date = due_date;
        }
        if let Some(status) = self.status {
            updated.status = status;
        }

        Ok(updated)
    }
}

/// Source of the values a new project starts with.
pub trait ProjectDefaults: Send + Sync {
    fn team_size(&self) -> NonZeroU32;
    fn due_date(&self, now: DateTime<Utc>) -> String;
}

/// Random team size (2..=9) and due date within the next 60 days.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomDefaults;

impl ProjectDefaults for RandomDefaults {
    fn team_size(&self) -> NonZeroU32 {
        NonZeroU32::new(fastrand::u32(2..=9)).unwrap_or(NonZeroU32::MIN)
    }

    fn due_date(&self, now: DateTime<Utc>) -> String {
        let offset = Duration::minutes(fastrand::i64(0..60 * 24 * 60));
        format_due_date(now + offset)
    }
}

/// Fixed defaults, for reproducible projects.
#[derive(Debug, Clone)]
pub struct FixedDefaults {
    pub team_size: NonZeroU32,
    pub due_in_days: i64,
}

impl ProjectDefaults for FixedDefaults {
    fn team_size(&self) -> NonZeroU32 {
        self.team_size
    }

    fn due_date(&self, now: DateTime<Utc>) -> String {
        format_due_date(now + Duration::days(self.due_in_days))
    }
}

/// Short month and day, e.g. "Dec 1".
pub fn format_due_date(date: DateTime<Utc>) -> String {
    date.format("%b %-d").to_string()
}

fn validate_name(name: &str) -> CoreResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidProject(
            "Project name must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed() -> FixedDefaults {
        FixedDefaults {
            team_size: NonZeroU32::new(3).unwrap(),
            due_in_days: 14,
        }
    }

    #[test]
    fn test_progress_bounds() {
        assert_eq!(Progress::new(0).unwrap().value(), 0);
        assert_eq!(Progress::new(100).unwrap().value(), 100);
        assert!(Progress::new(101).is_err());
        assert!(Progress::new(-1).is_err());
        assert_eq!(Progress::saturating(250).value(), 100);
        assert_eq!(Progress::saturating(-4).value(), 0);
    }

    #[test]
    fn test_progress_rejected_on_deserialize() {
        let result: Result<Progress, _> = serde_json::from_str("140");
        assert!(result.is_err());
    }

    #[test]
    fn test_create_fills_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 11, 17, 9, 0, 0).unwrap();
        let project = Project::create(
            ProjectId(1),
            NewProject::new("  Launch  ").with_description("   "),
            &fixed(),
            now,
        )
        .unwrap();

        assert_eq!(project.name, "Launch");
        assert_eq!(project.description, None);
        assert_eq!(project.progress.value(), 0);
        assert_eq!(project.team_size.get(), 3);
        assert_eq!(project.due_date, "Dec 1");
        assert!(project.is_active());
    }

    #[test]
    fn test_create_keeps_logo() {
        let now = Utc.with_ymd_and_hms(2024, 11, 17, 9, 0, 0).unwrap();
        let project = Project::create(
            ProjectId(2),
            NewProject::new("Brand")
                .with_description("Refresh the identity")
                .with_logo("data:image/png;base64,AAAA"),
            &fixed(),
            now,
        )
        .unwrap();

        assert_eq!(project.description.as_deref(), Some("Refresh the identity"));
        assert_eq!(project.logo.as_deref(), Some("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_create_rejects_blank_name() {
        let result = Project::create(ProjectId(1), NewProject::new("   "), &fixed(), Utc::now());
        assert!(matches!(result, Err(CoreError::InvalidProject(_))));
    }

    #[test]
    fn test_random_defaults_in_range() {
        for _ in 0..50 {
            let team = RandomDefaults.team_size().get();
            assert!((2..=9).contains(&team));
        }
    }

    #[test]
    fn test_storage_field_names() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let project = Project::create(ProjectId(7), NewProject::new("Api"), &fixed(), now).unwrap();
        let json = serde_json::to_value(&project).unwrap();

        assert_eq!(json["team"], 3);
        assert_eq!(json["due"], "Jan 15");
        assert_eq!(json["status"], "active");
        assert_eq!(json["createdAt"], now.timestamp_millis());
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_description_text_ignores_blank() {
        let mut project =
            Project::create(ProjectId(1), NewProject::new("Api"), &fixed(), Utc::now()).unwrap();
        project.description = Some("  ".to_string());
        assert_eq!(project.description_text(), None);
        project.description = Some("REST backend".to_string());
        assert_eq!(project.description_text(), Some("REST backend"));
    }

    #[test]
    fn test_update_apply() {
        let project =
            Project::create(ProjectId(1), NewProject::new("Api").with_description("x"), &fixed(), Utc::now())
                .unwrap();

        let update = ProjectUpdate {
            description: Some(String::new()),
            progress: Some(Progress::new(55).unwrap()),
            status: Some(ProjectStatus::OnHold),
            ..Default::default()
        };
        let updated = update.apply(&project).unwrap();

        assert_eq!(updated.description, None);
        assert_eq!(updated.progress.value(), 55);
        assert_eq!(updated.status, ProjectStatus::OnHold);
        assert_eq!(updated.name, "Api");

        let blank = ProjectUpdate {
            name: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(blank.apply(&project).is_err());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Active".parse::<ProjectStatus>().unwrap(), ProjectStatus::Active);
        assert_eq!("on-hold".parse::<ProjectStatus>().unwrap(), ProjectStatus::OnHold);
        assert!("paused-ish".parse::<ProjectStatus>().is_err());
    }
}
