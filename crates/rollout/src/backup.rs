//! Backup Manager - saves a network's live rules before anything is written.
//!
//! A backup is a pretty-printed copy of exactly what the API returned for
//! the direction being changed, named
//! `<sanitized-name>_<network-id>_<direction>_backup.json`.

use crate::error::{Error, Result};
use crate::types::NetworkRef;
use dashboard::{Backend, Direction};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Fetch the live rule set for `direction` and write it into `backup_dir`.
///
/// Returns the artifact path once the file is synced. Any failure, remote or
/// local, comes back as `Err`; a partially written artifact is removed. An
/// artifact that already exists is left alone and reported as a failure.
pub fn backup<B: Backend + ?Sized>(
    backend: &B,
    network: &NetworkRef,
    direction: Direction,
    backup_dir: &Path,
) -> Result<PathBuf> {
    let current = backend.firewall_rules(&network.id, direction)?;
    let content = serde_json::to_string_pretty(&current)
        .map_err(|e| Error::io(backup_dir, io::Error::other(e)))?;

    fs::create_dir_all(backup_dir).map_err(|e| Error::io(backup_dir, e))?;

    let path = backup_dir.join(artifact_name(network, direction));
    // Never replace an existing artifact: it may hold an earlier run's
    // pre-change rules.
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| Error::io(&path, e))?;
    if let Err(e) = write_synced(&mut file, &content) {
        drop(file);
        let _ = fs::remove_file(&path);
        return Err(Error::io(&path, e));
    }

    log::debug!("Backed up {} rules for {} to {}", direction, network.id, path.display());
    Ok(path)
}

/// File name for a network's backup artifact.
pub fn artifact_name(network: &NetworkRef, direction: Direction) -> String {
    format!(
        "{}_{}_{}_backup.json",
        sanitize(&network.name),
        sanitize(&network.id),
        direction
    )
}

/// Replace anything outside `[A-Za-z0-9._-]` with `_`.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "network".to_string()
    } else {
        cleaned
    }
}

fn write_synced(file: &mut File, content: &str) -> io::Result<()> {
    file.write_all(content.as_bytes())?;
    file.write_all(b"\n")?;
    file.sync_all()
}
