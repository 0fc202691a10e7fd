//! Revision-control access needed by the orchestrator.
//!
//! Resets are destructive: uncommitted changes in the working tree are lost.
//! Callers must start from a clean tree and must not run two comparisons
//! against the same repository at once.

use std::{fmt, path::Path};

use git2::{ObjectType, Oid, Repository, ResetType, StatusOptions};

use crate::CobError;

/// Stable identifier of a revision (a commit hash for git).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RevisionId(pub String);

impl RevisionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait Worktree {
    /// Resolves a symbolic reference such as `HEAD~1`.
    fn resolve(&self, rev: &str) -> Result<RevisionId, CobError>;

    /// Currently checked-out revision.
    fn head(&self) -> Result<RevisionId, CobError>;

    /// Hard reset of index and working tree to `id`.
    fn reset_hard(&self, id: &RevisionId) -> Result<(), CobError>;
}

pub struct GitWorktree {
    repo: Repository,
}

impl GitWorktree {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, CobError> {
        let repo = Repository::open(path.as_ref()).map_err(|e| {
            CobError::revision(format!(
                "unable to open the git repository at {}: {}",
                path.as_ref().display(),
                e.message()
            ))
        })?;
        Ok(Self { repo })
    }

    pub fn from_repository(repo: Repository) -> Self {
        Self { repo }
    }

    /// True when no tracked file differs from HEAD.
    pub fn is_clean(&self) -> Result<bool, CobError> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(false).include_ignored(false);
        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .map_err(|e| CobError::checkout(e.message().to_string()))?;
        Ok(statuses.is_empty())
    }
}

impl Worktree for GitWorktree {
    fn resolve(&self, rev: &str) -> Result<RevisionId, CobError> {
        let commit = self
            .repo
            .revparse_single(rev)
            .and_then(|object| object.peel_to_commit())
            .map_err(|e| CobError::revision(format!("{rev}: {}", e.message())))?;
        Ok(RevisionId(commit.id().to_string()))
    }

    fn head(&self) -> Result<RevisionId, CobError> {
        let commit = self
            .repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .map_err(|e| CobError::revision(format!("HEAD: {}", e.message())))?;
        Ok(RevisionId(commit.id().to_string()))
    }

    fn reset_hard(&self, id: &RevisionId) -> Result<(), CobError> {
        let oid = Oid::from_str(id.as_str())
            .map_err(|e| CobError::checkout(format!("{id}: {}", e.message())))?;
        let object = self
            .repo
            .find_object(oid, Some(ObjectType::Commit))
            .map_err(|e| CobError::checkout(format!("{id}: {}", e.message())))?;
        self.repo
            .reset(&object, ResetType::Hard, None)
            .map_err(|e| CobError::checkout(format!("reset to {id} failed: {}", e.message())))
    }
}
