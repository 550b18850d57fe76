//! Active-workspace pointer kept between invocations.

use anyhow::{Context, Result};
use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use std::io::ErrorKind;
use taskdeck::workspace::domain::WorkspaceId;

const SESSION_FILE: &str = "active-workspace";

/// The `active-workspace` file in the data directory.
pub struct Session {
    dir: Dir,
}

impl Session {
    /// Opens the session stored in `data_dir`.
    pub fn open(data_dir: &Utf8Path) -> Result<Self> {
        let dir = Dir::open_ambient_dir(data_dir, ambient_authority())
            .with_context(|| format!("open data directory {data_dir}"))?;
        Ok(Self { dir })
    }

    /// Returns the active workspace, if one was set.
    pub fn active(&self) -> Result<Option<WorkspaceId>> {
        let contents = match self.dir.read_to_string(SESSION_FILE) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err).context("read active workspace"),
        };
        if contents.trim().is_empty() {
            return Ok(None);
        }
        let id = contents
            .parse()
            .context("active workspace file is corrupt; run `taskdeck workspace use <id>`")?;
        Ok(Some(id))
    }

    /// Makes `id` the active workspace.
    pub fn activate(&self, id: WorkspaceId) -> Result<()> {
        self.dir
            .write(SESSION_FILE, id.to_string())
            .context("write active workspace")
    }

    /// Forgets the active workspace.
    pub fn clear(&self) -> Result<()> {
        match self.dir.remove_file(SESSION_FILE) {
            Err(err) if err.kind() != ErrorKind::NotFound => {
                Err(err).context("clear active workspace")
            }
            _ => Ok(()),
        }
    }
}
