//! In-memory registry of active projects.
//!
//! The registry owns the project set and tracks which project is the
//! "current" context for the assistant. It performs no I/O; callers persist
//! `projects()` through [`crate::storage::Storage`] after each mutation.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::models::{NewProject, Project, ProjectDefaults, ProjectId, ProjectUpdate, RandomDefaults};

/// Summary figures for the analytics view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub total: usize,
    pub active: usize,
    /// Mean progress rounded to the nearest integer, 0 when empty
    pub average_progress: u8,
}

/// Owner of the active project set.
pub struct ProjectRegistry {
    projects: Vec<Project>,
    current: Option<ProjectId>,
    defaults: Box<dyn ProjectDefaults>,
}

impl Default for ProjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectRegistry {
    /// Create an empty registry with randomized creation defaults.
    pub fn new() -> Self {
        Self::with_defaults(RandomDefaults)
    }

    /// Create an empty registry with the given creation defaults.
    pub fn with_defaults(defaults: impl ProjectDefaults + 'static) -> Self {
        Self {
            projects: Vec::new(),
            current: None,
            defaults: Box::new(defaults),
        }
    }

    /// Replace the project set with previously stored projects.
    pub fn load(mut self, mut projects: Vec<Project>) -> Self {
        projects.sort_by_key(|p| p.id);
        projects.dedup_by_key(|p| p.id);
        self.projects = projects;
        self.current = None;
        self
    }

    /// All projects in creation order.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn get(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Get a project or fail with `ProjectNotFound`.
    pub fn get_required(&self, id: ProjectId) -> CoreResult<&Project> {
        self.get(id).ok_or(CoreError::ProjectNotFound(id.0))
    }

    /// The project currently attached to the assistant, if any.
    pub fn current(&self) -> Option<&Project> {
        self.current.and_then(|id| self.get(id))
    }

    pub fn select(&mut self, id: ProjectId) -> CoreResult<&Project> {
        let index = self.index_of(id)?;
        self.current = Some(id);
        Ok(&self.projects[index])
    }

    pub fn clear_selection(&mut self) {
        self.current = None;
    }

    /// Create a project and make it the current one.
    pub fn create(&mut self, request: NewProject) -> CoreResult<Project> {
        let now = Utc::now();
        let id = self.next_id(now.timestamp_millis().max(0) as u64);
        let project = Project::create(id, request, self.defaults.as_ref(), now)?;

        debug!(id = %project.id, name = %project.name, "Created project");
        self.projects.push(project.clone());
        self.current = Some(project.id);
        Ok(project)
    }

    pub fn update(&mut self, id: ProjectId, update: ProjectUpdate) -> CoreResult<Project> {
        let index = self.index_of(id)?;
        let updated = update.apply(&self.projects[index])?;

        debug!(id = %id, "Updated project");
        self.projects[index] = updated.clone();
        Ok(updated)
    }

    /// Remove a project, clearing it as the current context if referenced.
    pub fn delete(&mut self, id: ProjectId) -> CoreResult<Project> {
        let index = self.index_of(id)?;
        let removed = self.projects.remove(index);

        if self.current == Some(id) {
            self.current = None;
        }

        debug!(id = %id, "Deleted project");
        Ok(removed)
    }

    /// The `n` most recently created projects, newest first.
    pub fn recent(&self, n: usize) -> Vec<&Project> {
        self.projects.iter().rev().take(n).collect()
    }

    pub fn stats(&self) -> ProjectStats {
        let total = self.projects.len();
        let active = self.projects.iter().filter(|p| p.is_active()).count();
        let average_progress = if total == 0 {
            0
        } else {
            let sum: u32 = self.projects.iter().map(|p| p.progress.value() as u32).sum();
            (sum as f64 / total as f64).round() as u8
        };

        ProjectStats {
            total,
            active,
            average_progress,
        }
    }

    fn index_of(&self, id: ProjectId) -> CoreResult<usize> {
        self.projects
            .iter()
            .position(|p| p.id == id)
            .ok_or(CoreError::ProjectNotFound(id.0))
    }

    // Millisecond timestamp, bumped past the newest id so ids stay monotonic.
    fn next_id(&self, now_ms: u64) -> ProjectId {
        let newest = self.projects.iter().map(|p| p.id.0).max().unwrap_or(0);
        ProjectId(now_ms.max(newest + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FixedDefaults, Progress, ProjectStatus};
    use std::num::NonZeroU32;

    fn registry() -> ProjectRegistry {
        ProjectRegistry::with_defaults(FixedDefaults {
            team_size: NonZeroU32::new(4).unwrap(),
            due_in_days: 30,
        })
    }

    #[test]
    fn test_create_selects_project() {
        let mut reg = registry();
        let project = reg.create(NewProject::new("Launch")).unwrap();

        assert_eq!(reg.len(), 1);
        assert_eq!(reg.current().map(|p| p.id), Some(project.id));
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut reg = registry();
        let ids: Vec<ProjectId> = (0..5)
            .map(|i| reg.create(NewProject::new(format!("p{}", i))).unwrap().id)
            .collect();

        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn test_clear_selection_keeps_projects() {
        let mut reg = registry();
        let project = reg.create(NewProject::new("Launch")).unwrap();

        reg.clear_selection();
        assert!(reg.current().is_none());
        assert_eq!(reg.len(), 1);

        reg.select(project.id).unwrap();
        assert_eq!(reg.current().map(|p| p.id), Some(project.id));
    }

    #[test]
    fn test_delete_clears_current() {
        let mut reg = registry();
        let a = reg.create(NewProject::new("A")).unwrap();
        let b = reg.create(NewProject::new("B")).unwrap();

        reg.select(a.id).unwrap();
        reg.delete(b.id).unwrap();
        assert_eq!(reg.current().map(|p| p.id), Some(a.id));

        reg.delete(a.id).unwrap();
        assert!(reg.current().is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn test_missing_project() {
        let mut reg = registry();
        assert!(matches!(
            reg.delete(ProjectId(42)),
            Err(CoreError::ProjectNotFound(42))
        ));
        assert!(reg.select(ProjectId(42)).is_err());
    }

    #[test]
    fn test_update() {
        let mut reg = registry();
        let project = reg.create(NewProject::new("A")).unwrap();

        let updated = reg
            .update(
                project.id,
                ProjectUpdate {
                    name: Some("Renamed".to_string()),
                    progress: Some(Progress::new(70).unwrap()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "Renamed");
        assert_eq!(reg.get(project.id).unwrap().progress.value(), 70);
    }

    #[test]
    fn test_recent_newest_first() {
        let mut reg = registry();
        for name in ["one", "two", "three", "four"] {
            reg.create(NewProject::new(name)).unwrap();
        }

        let names: Vec<&str> = reg.recent(3).iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["four", "three", "two"]);
    }

    #[test]
    fn test_stats() {
        let mut reg = registry();
        assert_eq!(reg.stats().average_progress, 0);

        let a = reg.create(NewProject::new("A")).unwrap();
        let b = reg.create(NewProject::new("B")).unwrap();
        reg.update(a.id, ProjectUpdate { progress: Some(Progress::new(40).unwrap()), ..Default::default() })
            .unwrap();
        reg.update(
            b.id,
            ProjectUpdate {
                progress: Some(Progress::new(75).unwrap()),
                status: Some(ProjectStatus::Completed),
                ..Default::default()
            },
        )
        .unwrap();

        let stats = reg.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.active, 1);
        assert_eq!(stats.average_progress, 58);
    }

    #[test]
    fn test_load_orders_by_id() {
        let mut source = registry();
        let a = source.create(NewProject::new("A")).unwrap();
        let b = source.create(NewProject::new("B")).unwrap();

        let reg = registry().load(vec![b.clone(), a.clone()]);
        assert_eq!(reg.projects()[0].id, a.id);
        assert!(reg.current().is_none());

        let mut reg = reg;
        let c = reg.create(NewProject::new("C")).unwrap();
        assert!(c.id > b.id);
    }
}
