//! Shared command state: the workspace store, its projects and the assistant.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use nexus_assist::{Assistant, AssistantConfig, OfflineGateway};
use nexus_core::{Project, ProjectId, ProjectRegistry, Storage};

use super::GlobalArgs;

/// A loaded workspace.
pub struct Workspace {
    root: PathBuf,
    storage: Storage,
    registry: ProjectRegistry,
}

impl Workspace {
    /// Open the workspace named by the global options and load its projects.
    pub fn open(global: &GlobalArgs) -> Result<Self> {
        let root = match &global.workspace {
            Some(path) => path.clone(),
            None => std::env::current_dir().context("Failed to resolve current directory")?,
        };
        Ok(Self::at(root))
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let storage = Storage::for_workspace(&root);
        let registry = ProjectRegistry::new().load(storage.load_projects());
        debug!("Opened workspace {:?} with {} projects", root, registry.len());

        Self {
            root,
            storage,
            registry,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn registry(&self) -> &ProjectRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ProjectRegistry {
        &mut self.registry
    }

    pub fn project(&self, id: u64) -> Result<&Project> {
        Ok(self.registry.get_required(ProjectId(id))?)
    }

    /// Write the project set back to the store.
    pub fn persist(&self) -> bool {
        let saved = self.storage.save_projects(self.registry.projects());
        if !saved {
            warn!("Projects could not be saved; changes will be lost on exit");
        }
        saved
    }

    /// Assistant configured for this workspace.
    pub fn assistant(&self, global: &GlobalArgs) -> Result<Assistant> {
        let mut config = AssistantConfig::load(&self.root)
            .context("Failed to load assistant configuration")?;
        if let Some(url) = &global.api_url {
            config.api_url = url.clone();
            config
                .validate()
                .context("Failed to load assistant configuration")?;
        }

        if global.offline {
            debug!("Offline mode, backend will not be contacted");
            return Ok(Assistant::new(Arc::new(OfflineGateway))
                .with_context_window(config.context_window));
        }

        Assistant::from_config(&config).context("Failed to create assistant backend client")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_core::NewProject;
    use tempfile::tempdir;

    #[test]
    fn test_workspace_round_trip() {
        let temp = tempdir().unwrap();

        let mut workspace = Workspace::at(temp.path());
        assert!(workspace.registry().is_empty());
        let project = workspace.registry_mut().create(NewProject::new("Launch")).unwrap();
        assert!(workspace.persist());

        let reopened = Workspace::at(temp.path());
        assert_eq!(reopened.project(project.id.0).unwrap().name, "Launch");
        assert!(reopened.project(1).is_err());
    }
}
