//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix appended to the file name for the in-progress copy of an atomic write.
pub const TEMP_SUFFIX: &str = ".fieldfix.tmp";

/// Read file contents as UTF-8 with standardized error handling.
///
/// Invalid UTF-8 surfaces as an `internal.io_error` like any other read failure.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Path of the temporary sibling used while atomically replacing `path`.
pub fn temp_path_for(path: &Path) -> Result<PathBuf> {
    let parent = path.parent().ok_or_else(|| {
        Error::internal_io(format!("Invalid path: {}", path.display()), None)
    })?;

    let filename = path.file_name().ok_or_else(|| {
        Error::internal_io(format!("Invalid path: {}", path.display()), None)
    })?;

    Ok(parent.join(format!("{}{}", filename.to_string_lossy(), TEMP_SUFFIX)))
}

/// The file a write to `path` should land on. A symlink resolves to its
/// target so the link itself is kept; anything else is returned as is.
pub fn write_target(path: &Path) -> Result<PathBuf> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => fs::canonicalize(path).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("resolve {}", path.display())))
        }),
        _ => Ok(path.to_path_buf()),
    }
}

/// Write content to file atomically (write to a temp sibling, then rename).
///
/// The rename is atomic on POSIX filesystems, so readers see either the old
/// content or the new content, never a partial write. A symlinked `path` is
/// written through: the temp file sits next to the link's target and replaces
/// that. When the file already exists its permissions are carried over to
/// the replacement. The temp file is removed if any step after its creation
/// fails.
pub fn write_file_atomic(path: &Path, content: &str, operation: &str) -> Result<()> {
    let target = write_target(path)
        .map_err(|e| Error::internal_io(e.detail_error(), Some(operation.to_string())))?;
    let path = target.as_path();

    let tmp_path = temp_path_for(path)
        .map_err(|e| Error::internal_io(e.message, Some(operation.to_string())))?;

    fs::write(&tmp_path, content).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        Error::internal_io(e.to_string(), Some(format!("{} (write temp)", operation)))
    })?;

    if let Ok(metadata) = fs::metadata(path) {
        if let Err(e) = fs::set_permissions(&tmp_path, metadata.permissions()) {
            let _ = fs::remove_file(&tmp_path);
            return Err(Error::internal_io(
                e.to_string(),
                Some(format!("{} (copy permissions)", operation)),
            ));
        }
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        Error::internal_io(e.to_string(), Some(format!("{} (rename)", operation)))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn read_file_succeeds_for_existing_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "test content").unwrap();

        let content = read_file(temp.path(), "test read").unwrap();
        assert!(content.contains("test content"));
    }

    #[test]
    fn read_file_returns_error_for_missing_file() {
        let result = read_file(Path::new("/nonexistent/path.ts"), "test read");
        let err = result.unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }

    #[test]
    fn read_file_rejects_invalid_utf8() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("binary.ts");
        fs::write(&path, [0x66, 0x6f, 0xff, 0xfe]).unwrap();

        let err = read_file(&path, "test read").unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }

    #[test]
    fn write_file_atomic_replaces_content_and_leaves_no_temp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.ts");
        fs::write(&path, "old").unwrap();

        write_file_atomic(&path, "new content", "test write").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new content");
        assert!(!temp_path_for(&path).unwrap().exists());
    }

    #[test]
    fn write_file_atomic_fails_for_missing_directory() {
        let err = write_file_atomic(
            Path::new("/nonexistent/dir/file.ts"),
            "content",
            "test write",
        )
        .unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }

    #[cfg(unix)]
    #[test]
    fn write_file_atomic_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("script.ts");
        fs::write(&path, "old").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        write_file_atomic(&path, "new", "test write").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[cfg(unix)]
    #[test]
    fn write_file_atomic_writes_through_symlink() {
        let dir = tempdir().unwrap();
        let shared = dir.path().join("shared");
        fs::create_dir_all(&shared).unwrap();
        let target = shared.join("types.ts");
        fs::write(&target, "old").unwrap();
        let link = dir.path().join("types.ts");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        write_file_atomic(&link, "new", "test write").unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
        assert!(!temp_path_for(&target).unwrap().exists());
        assert!(!temp_path_for(&link).unwrap().exists());
    }

    #[cfg(unix)]
    #[test]
    fn write_target_resolves_links_only() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.ts");
        fs::write(&file, "x").unwrap();
        let link = dir.path().join("b.ts");
        std::os::unix::fs::symlink(&file, &link).unwrap();

        assert_eq!(write_target(&file).unwrap(), file);
        assert_eq!(write_target(&link).unwrap(), fs::canonicalize(&file).unwrap());
        let missing = dir.path().join("missing.ts");
        assert_eq!(write_target(&missing).unwrap(), missing);
    }
}
