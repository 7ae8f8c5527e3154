//! Crash-safe file replacement.
//!
//! The new content goes to a temporary file in the destination directory
//! (same filesystem), is synced, inherits the permissions and owner of the
//! file it replaces, and is then renamed over it. A crash at any point leaves
//! either the old file or the new one, never a truncated one.

use std::fs::{self, Metadata};
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// Atomically replaces `target` with `contents`.
pub fn write_atomic(target: &Path, contents: &[u8]) -> io::Result<()> {
    let directory: &Path = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let previous: Option<Metadata> = fs::metadata(target).ok();

    // Dropping `temp` before `persist` removes the temporary file.
    let mut temp: NamedTempFile = NamedTempFile::new_in(directory)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;

    match &previous {
        Some(metadata) => inherit_metadata(temp.path(), metadata)?,
        None => apply_default_permissions(temp.path())?,
    }

    temp.persist(target).map_err(|e| e.error)?;
    debug!("wrote {} bytes to {}", contents.len(), target.display());
    Ok(())
}

fn inherit_metadata(path: &Path, previous: &Metadata) -> io::Result<()> {
    fs::set_permissions(path, previous.permissions())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        // Only root may hand a file to another owner; keep going without it.
        if let Err(e) = std::os::unix::fs::chown(path, Some(previous.uid()), Some(previous.gid())) {
            if e.kind() == io::ErrorKind::PermissionDenied {
                warn!("could not preserve ownership of {}: {e}", path.display());
            } else {
                return Err(e);
            }
        }
    }

    Ok(())
}

/// Temporary files are created `0600`; a brand-new database gets the usual `0644`.
fn apply_default_permissions(path: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o644))?;
    }
    #[cfg(not(unix))]
    let _ = path;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn creates_and_replaces_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("db.json");

        write_atomic(&target, b"[]").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"[]");

        write_atomic(&target, b"[{}]").unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"[{}]");
        assert_eq!(entries(dir.path()), vec!["db.json".to_string()]);
    }

    #[cfg(unix)]
    #[test]
    fn keeps_permission_bits() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let target = dir.path().join("db.json");
        fs::write(&target, b"[]").unwrap();
        fs::set_permissions(&target, fs::Permissions::from_mode(0o640)).unwrap();

        write_atomic(&target, b"[ ]").unwrap();
        let mode = fs::metadata(&target).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[test]
    fn failed_write_leaves_original_untouched() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("missing-dir").join("db.json");
        assert!(write_atomic(&target, b"[]").is_err());
        assert!(!target.exists());
    }
}
