//! On-disk document shape and atomic replacement.

use crate::workspace::{
    domain::{Workspace, WorkspaceId},
    ports::{WorkspaceRepositoryError, WorkspaceRepositoryResult},
};
use cap_std::fs_utf8::Dir;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File holding every workspace.
pub(super) const DOCUMENT_FILE: &str = "workspaces.json";

/// Scratch file renamed over [`DOCUMENT_FILE`] on commit.
const TEMP_FILE: &str = "workspaces.json.tmp";

/// Newest document layout this build understands.
pub(super) const FORMAT_VERSION: u32 = 1;

/// Root of the JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct StoreDocument {
    pub(super) version: u32,
    pub(super) last_updated: DateTime<Utc>,
    #[serde(default)]
    pub(super) workspaces: Vec<Workspace>,
}

impl StoreDocument {
    pub(super) const fn empty(now: DateTime<Utc>) -> Self {
        Self {
            version: FORMAT_VERSION,
            last_updated: now,
            workspaces: Vec::new(),
        }
    }

    pub(super) fn find(&self, id: WorkspaceId) -> Option<&Workspace> {
        self.workspaces.iter().find(|workspace| workspace.id() == id)
    }

    pub(super) fn upsert(&mut self, workspace: Workspace) {
        match self
            .workspaces
            .iter_mut()
            .find(|stored| stored.id() == workspace.id())
        {
            Some(slot) => *slot = workspace,
            None => self.workspaces.push(workspace),
        }
    }

    pub(super) fn remove(&mut self, id: WorkspaceId) -> bool {
        let before = self.workspaces.len();
        self.workspaces.retain(|workspace| workspace.id() != id);
        self.workspaces.len() != before
    }
}

/// Parses document text, rejecting malformed or newer layouts.
pub(super) fn decode(contents: &str) -> WorkspaceRepositoryResult<StoreDocument> {
    let document: StoreDocument = serde_json::from_str(contents)
        .map_err(|err| WorkspaceRepositoryError::Corrupt(err.to_string()))?;
    if document.version > FORMAT_VERSION {
        return Err(WorkspaceRepositoryError::Corrupt(format!(
            "document version {} is newer than supported version {FORMAT_VERSION}",
            document.version
        )));
    }
    Ok(document)
}

pub(super) fn encode(document: &StoreDocument) -> WorkspaceRepositoryResult<String> {
    serde_json::to_string_pretty(document).map_err(WorkspaceRepositoryError::persistence)
}

pub(super) fn read_document(dir: &Dir) -> WorkspaceRepositoryResult<StoreDocument> {
    let contents = dir
        .read_to_string(DOCUMENT_FILE)
        .map_err(WorkspaceRepositoryError::persistence)?;
    decode(&contents)
}

/// Writes `contents` to a scratch file and renames it over the document.
pub(super) fn replace_document(dir: &Dir, contents: &str) -> WorkspaceRepositoryResult<()> {
    dir.write(TEMP_FILE, contents)
        .map_err(WorkspaceRepositoryError::persistence)?;
    dir.rename(TEMP_FILE, dir, DOCUMENT_FILE)
        .map_err(WorkspaceRepositoryError::persistence)
}
