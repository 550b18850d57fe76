//! Rotating snapshots of the workspace document.

use crate::workspace::ports::{WorkspaceRepositoryError, WorkspaceRepositoryResult};
use cap_std::fs_utf8::Dir;
use chrono::{DateTime, Utc};
use std::io;

/// Directory, relative to the store root, holding snapshots.
pub(super) const BACKUP_DIR: &str = "backups";

const PREFIX: &str = "backup-";
const SUFFIX: &str = ".json";
const MAX_SEQUENCE: u32 = 9999;

/// Writes `contents` as a new snapshot and prunes all but the newest `keep`.
///
/// Names sort chronologically: a UTC timestamp with microseconds followed by
/// a sequence number for snapshots taken at the same instant. The sequence
/// continues after the highest one already on disk for that instant, so a
/// pruned slot is never reused.
pub(super) fn snapshot(
    dir: &Dir,
    contents: &str,
    now: DateTime<Utc>,
    keep: usize,
) -> io::Result<String> {
    let backups = dir.open_dir(BACKUP_DIR)?;
    let stamp = now.format("%Y%m%dT%H%M%S%6fZ").to_string();
    let seq = next_sequence(&list_in(&backups)?, &stamp)?;
    let name = format!("{PREFIX}{stamp}-{seq:04}{SUFFIX}");
    backups.write(&name, contents)?;
    prune(&backups, keep)?;
    Ok(name)
}

/// Returns snapshot names, newest first.
pub(super) fn list(dir: &Dir) -> io::Result<Vec<String>> {
    list_in(&dir.open_dir(BACKUP_DIR)?)
}

/// Reads a snapshot by name.
pub(super) fn read(dir: &Dir, name: &str) -> WorkspaceRepositoryResult<String> {
    let names = list(dir).map_err(WorkspaceRepositoryError::persistence)?;
    if !names.iter().any(|candidate| candidate == name) {
        return Err(WorkspaceRepositoryError::BackupNotFound(name.to_owned()));
    }
    dir.open_dir(BACKUP_DIR)
        .and_then(|backups| backups.read_to_string(name))
        .map_err(WorkspaceRepositoryError::persistence)
}

fn list_in(backups: &Dir) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in backups.entries()? {
        let file_name = entry?.file_name()?;
        if file_name.starts_with(PREFIX) && file_name.ends_with(SUFFIX) {
            names.push(file_name);
        }
    }
    names.sort_unstable_by(|left, right| right.cmp(left));
    Ok(names)
}

/// Returns the sequence number following the highest one stored for `stamp`.
fn next_sequence(names: &[String], stamp: &str) -> io::Result<u32> {
    let stamp_prefix = format!("{PREFIX}{stamp}-");
    names
        .iter()
        .filter_map(|name| name.strip_prefix(stamp_prefix.as_str()))
        .filter_map(|rest| rest.strip_suffix(SUFFIX))
        .filter_map(|seq| seq.parse::<u32>().ok())
        .max()
        .map_or(Ok(0), |latest| {
            latest
                .checked_add(1)
                .filter(|next| *next <= MAX_SEQUENCE)
                .ok_or_else(|| io::Error::other("too many backups for one instant"))
        })
}

fn prune(backups: &Dir, keep: usize) -> io::Result<()> {
    for stale in list_in(backups)?.iter().skip(keep) {
        backups.remove_file(stale)?;
    }
    Ok(())
}
