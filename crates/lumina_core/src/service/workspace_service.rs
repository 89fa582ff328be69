//! Workspace settings use-case service.
//!
//! # Invariants
//! - Reading settings never fails because they were never saved: defaults
//!   are persisted on first read.

use crate::model::page::now_epoch_ms;
use crate::model::workspace::{Workspace, WorkspacePatch};
use crate::repo::{RepoError, WorkspaceRepository};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum WorkspaceServiceError {
    Repo(RepoError),
}

impl Display for WorkspaceServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for WorkspaceServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for WorkspaceServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Workspace settings service facade.
pub struct WorkspaceService<R: WorkspaceRepository> {
    repo: R,
}

impl<R: WorkspaceRepository> WorkspaceService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Loads the singleton settings, creating the defaults on first read.
    pub fn get_workspace(&self) -> Result<Workspace, WorkspaceServiceError> {
        if let Some(workspace) = self.repo.load_workspace()? {
            return Ok(workspace);
        }
        let workspace = Workspace::default();
        self.repo.save_workspace(&workspace, now_epoch_ms())?;
        info!("event=workspace_init module=service status=ok");
        Ok(workspace)
    }

    /// Merges `patch` into the stored settings and returns the result.
    pub fn update_workspace(
        &self,
        patch: &WorkspacePatch,
    ) -> Result<Workspace, WorkspaceServiceError> {
        let mut workspace = self.get_workspace()?;
        patch.apply(&mut workspace);
        self.repo.save_workspace(&workspace, now_epoch_ms())?;
        info!("event=workspace_update module=service status=ok");
        Ok(workspace)
    }
}
