use crate::boundary::BoundaryWarning;
use crate::error::{GitShipError, Result};
use crate::manifest::{blob_hash, ExclusionSet, Manifest, ManifestEntry, SideTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// What to do when a file or directory cannot be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnreadablePolicy {
    /// Fail the whole build
    #[default]
    Abort,
    /// Leave the entry out and record a warning
    Skip,
}

/// Walks a directory tree into a [`Manifest`]
pub struct ManifestBuilder {
    root: PathBuf,
    exclusions: ExclusionSet,
    on_unreadable: UnreadablePolicy,
}

impl ManifestBuilder {
    /// Create a builder for `root` with only the built-in exclusions
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ManifestBuilder {
            root: root.into(),
            exclusions: ExclusionSet::default(),
            on_unreadable: UnreadablePolicy::default(),
        }
    }

    pub fn with_exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub fn with_unreadable_policy(mut self, policy: UnreadablePolicy) -> Self {
        self.on_unreadable = policy;
        self
    }

    /// Walk the tree and hash every file
    ///
    /// Entries are visited in name order. Excluded paths are skipped before
    /// they are read, and excluded directories are never entered. Symlinks
    /// are recorded with their target and not followed.
    ///
    /// # Returns
    /// * `Ok(Manifest)` - Nested entries plus the hash to path side table
    /// * `Err` - If the root cannot be listed, or any entry cannot be read
    ///   under [`UnreadablePolicy::Abort`]
    pub fn build(&self) -> Result<Manifest> {
        let mut side_table = SideTable::new();
        let mut warnings = Vec::new();

        let listing = list_dir(&self.root)?;
        let entries = self.walk(listing, "", &mut side_table, &mut warnings)?;

        let manifest = Manifest {
            entries,
            side_table,
            warnings,
        };
        info!(
            root = %self.root.display(),
            files = manifest.file_count(),
            unique = manifest.side_table.len(),
            bytes = manifest.total_size(),
            "built manifest"
        );
        Ok(manifest)
    }

    fn walk(
        &self,
        listing: Vec<(String, PathBuf)>,
        relative_dir: &str,
        side_table: &mut SideTable,
        warnings: &mut Vec<BoundaryWarning>,
    ) -> Result<BTreeMap<String, ManifestEntry>> {
        let mut entries = BTreeMap::new();

        for (name, path) in listing {
            let relative = if relative_dir.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", relative_dir, name)
            };

            if self.exclusions.is_excluded(&relative) {
                debug!(path = %relative, "excluded");
                continue;
            }

            match self.visit(&path, &relative, side_table, warnings) {
                Ok(entry) => {
                    entries.insert(name, entry);
                }
                Err(GitShipError::ManifestRead { path, source })
                    if self.on_unreadable == UnreadablePolicy::Skip =>
                {
                    warn!(path = %path.display(), error = %source, "skipping unreadable entry");
                    warnings.push(BoundaryWarning::SkippedUnreadable {
                        path,
                        reason: source.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(entries)
    }

    fn visit(
        &self,
        path: &Path,
        relative: &str,
        side_table: &mut SideTable,
        warnings: &mut Vec<BoundaryWarning>,
    ) -> Result<ManifestEntry> {
        let file_type = fs::symlink_metadata(path)
            .map_err(|e| GitShipError::manifest_read(path, e))?
            .file_type();

        if file_type.is_symlink() {
            let target = fs::read_link(path).map_err(|e| GitShipError::manifest_read(path, e))?;
            return Ok(ManifestEntry::Symlink {
                target: target.to_string_lossy().into_owned(),
            });
        }

        if file_type.is_dir() {
            let listing = list_dir(path)?;
            let entries = self.walk(listing, relative, side_table, warnings)?;
            return Ok(ManifestEntry::Directory { entries });
        }

        if file_type.is_file() {
            let bytes = fs::read(path).map_err(|e| GitShipError::manifest_read(path, e))?;
            let content_hash = blob_hash(&bytes)?;
            debug!(path = %relative, hash = %content_hash, "hashed file");

            // Identical content keeps the first path seen.
            side_table
                .entry(content_hash.clone())
                .or_insert_with(|| path.to_path_buf());

            return Ok(ManifestEntry::File {
                content_hash,
                size: bytes.len() as u64,
            });
        }

        // Sockets, FIFOs and devices have no stable content to hash.
        Err(GitShipError::manifest_read(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        ))
    }
}

/// Directory entries as `(name, path)`, sorted by name
fn list_dir(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut listing = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| GitShipError::manifest_read(dir, e))? {
        let entry = entry.map_err(|e| GitShipError::manifest_read(dir, e))?;
        listing.push((entry.file_name().to_string_lossy().into_owned(), entry.path()));
    }
    listing.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(listing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_build_nested_tree() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "index.html", "<h1>hi</h1>");
        write(dir.path(), "src/app.js", "console.log(1)");
        write(dir.path(), "src/lib/util.js", "export {}");

        let manifest = ManifestBuilder::new(dir.path()).build().unwrap();

        assert_eq!(manifest.entries.len(), 2);
        assert_eq!(
            manifest.lookup("index.html"),
            Some(&ManifestEntry::File {
                content_hash: blob_hash(b"<h1>hi</h1>").unwrap(),
                size: 11,
            })
        );
        assert!(matches!(
            manifest.lookup("src/lib"),
            Some(ManifestEntry::Directory { .. })
        ));
        assert!(manifest.lookup("src/lib/util.js").is_some());
        assert_eq!(manifest.file_count(), 3);
        assert_eq!(manifest.side_table.len(), 3);
    }

    #[test]
    fn test_side_table_points_at_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.txt", "alpha");

        let manifest = ManifestBuilder::new(dir.path()).build().unwrap();
        let hash = blob_hash(b"alpha").unwrap();
        assert_eq!(manifest.side_table.get(&hash), Some(&dir.path().join("a.txt")));
    }

    #[test]
    fn test_duplicate_content_keeps_one_path() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.txt", "same");
        write(dir.path(), "b/c.txt", "same");

        let manifest = ManifestBuilder::new(dir.path()).build().unwrap();
        assert_eq!(manifest.file_count(), 2);
        assert_eq!(manifest.side_table.len(), 1);
        let hash = blob_hash(b"same").unwrap();
        assert_eq!(manifest.side_table[&hash], dir.path().join("a.txt"));
    }

    #[test]
    fn test_empty_file() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "empty", "");

        let manifest = ManifestBuilder::new(dir.path()).build().unwrap();
        assert_eq!(
            manifest.lookup("empty"),
            Some(&ManifestEntry::File {
                content_hash: "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391".to_string(),
                size: 0,
            })
        );
    }

    #[test]
    fn test_git_directory_never_entered() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".git/HEAD", "ref: refs/heads/main");
        write(dir.path(), ".env", "SECRET=1");
        write(dir.path(), "index.html", "ok");

        let manifest = ManifestBuilder::new(dir.path()).build().unwrap();
        assert!(manifest.lookup(".git").is_none());
        assert!(manifest.lookup(".env").is_none());
        assert_eq!(manifest.file_count(), 1);
    }

    #[test]
    fn test_excluded_directory_not_recursed() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "node_modules/pkg/index.js", "x");
        write(dir.path(), "dist/app.js", "y");
        write(dir.path(), "dist/app.js.map", "z");

        let exclusions = ExclusionSet::from_comma_list(r"^node_modules,\.map$").unwrap();
        let manifest = ManifestBuilder::new(dir.path())
            .with_exclusions(exclusions)
            .build()
            .unwrap();

        assert!(manifest.lookup("node_modules").is_none());
        assert!(manifest.lookup("dist/app.js").is_some());
        assert!(manifest.lookup("dist/app.js.map").is_none());
        assert!(!manifest.side_table.contains_key(&blob_hash(b"x").unwrap()));
    }

    #[test]
    fn test_missing_root_fails() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let err = ManifestBuilder::new(&missing).build().unwrap_err();
        match err {
            GitShipError::ManifestRead { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_root_that_is_a_file_fails() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "site", "not a directory");
        let root = dir.path().join("site");

        let err = ManifestBuilder::new(&root).build().unwrap_err();
        match err {
            GitShipError::ManifestRead { path, .. } => assert_eq!(path, root),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_socket_aborts_by_default() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "index.html", "ok");
        let socket = dir.path().join("agent.sock");
        let _listener = std::os::unix::net::UnixListener::bind(&socket).unwrap();

        let err = ManifestBuilder::new(dir.path()).build().unwrap_err();
        match err {
            GitShipError::ManifestRead { path, .. } => assert_eq!(path, socket),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_socket_skipped_with_warning() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "index.html", "ok");
        write(dir.path(), "run/keep.txt", "keep");
        let socket = dir.path().join("run/agent.sock");
        let _listener = std::os::unix::net::UnixListener::bind(&socket).unwrap();

        let manifest = ManifestBuilder::new(dir.path())
            .with_unreadable_policy(UnreadablePolicy::Skip)
            .build()
            .unwrap();

        assert!(manifest.lookup("run/agent.sock").is_none());
        assert!(manifest.lookup("run/keep.txt").is_some());
        assert_eq!(manifest.file_count(), 2);
        assert_eq!(manifest.warnings.len(), 1);
        match &manifest.warnings[0] {
            BoundaryWarning::SkippedUnreadable { path, reason } => {
                assert_eq!(path, &socket);
                assert!(reason.contains("not a regular file"));
            }
            other => panic!("unexpected warning: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_recorded_not_followed() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "real/file.txt", "data");
        std::os::unix::fs::symlink("real", dir.path().join("alias")).unwrap();

        let manifest = ManifestBuilder::new(dir.path()).build().unwrap();
        assert_eq!(
            manifest.lookup("alias"),
            Some(&ManifestEntry::Symlink {
                target: "real".to_string()
            })
        );
        assert_eq!(manifest.file_count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_fine() {
        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink("missing.txt", dir.path().join("broken")).unwrap();

        let manifest = ManifestBuilder::new(dir.path()).build().unwrap();
        assert!(matches!(
            manifest.lookup("broken"),
            Some(ManifestEntry::Symlink { .. })
        ));
    }
}
