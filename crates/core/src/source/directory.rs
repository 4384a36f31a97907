use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, trace};
use walkdir::WalkDir;

use super::{ContentReader, FileResolver, ResolutionError, Scope};
use crate::model::Location;

/// Resolver over a directory on the local filesystem.
///
/// Locations are reported as absolute paths inside the tree (`/usr/bin/go`),
/// in file-name order. Name bytes that are not valid UTF-8 are written as
/// `\xNN` and a literal backslash as `\\`, so every host path keeps a unique
/// real path that maps back to it. Symlinks resolve to their target when the
/// target is a regular file inside the tree; broken links and links escaping
/// the tree are treated as absent and skipped. Only regular files are
/// reported, so FIFOs and device nodes are never opened.
///
/// A directory has no layers, so both scopes present the same view.
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    root: PathBuf,
    scope: Scope,
}

impl DirectoryResolver {
    pub fn new(root: impl AsRef<Path>, scope: Scope) -> Result<Self, ResolutionError> {
        let root = root.as_ref();
        let root = root
            .canonicalize()
            .map_err(|source| ResolutionError::Root { path: root.to_path_buf(), source })?;
        if !root.is_dir() {
            return Err(ResolutionError::NotADirectory(root));
        }
        Ok(Self { root, scope })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Host path for a location's real path.
    pub fn host_path(&self, location: &Location) -> PathBuf {
        self.root.join(decode_tree_path(location.real_path().trim_start_matches('/')))
    }

    fn tree_path(&self, host: &Path) -> Option<String> {
        let relative = host.strip_prefix(&self.root).ok()?;
        let mut out = String::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => {
                    out.push('/');
                    encode_component(part, &mut out);
                }
                _ => return None,
            }
        }
        if out.is_empty() {
            None
        } else {
            Some(out)
        }
    }

    fn resolve_link(&self, link: &Path, access_path: String) -> Option<Location> {
        let target = match fs::canonicalize(link) {
            Ok(target) => target,
            Err(err) => {
                debug!("Skipping unresolvable symlink {}: {}", link.display(), err);
                return None;
            }
        };
        let Some(real_path) = self.tree_path(&target) else {
            debug!("Skipping symlink {} pointing outside the tree", link.display());
            return None;
        };
        match fs::metadata(&target) {
            Ok(meta) if meta.is_file() => Some(Location::with_access_path(real_path, access_path)),
            Ok(_) => {
                trace!("Skipping symlink {} to a non-regular file", link.display());
                None
            }
            Err(err) => {
                debug!("Skipping symlink {} with unreadable target: {}", link.display(), err);
                None
            }
        }
    }
}

impl FileResolver for DirectoryResolver {
    fn scope(&self) -> Scope {
        self.scope
    }

    fn locations(&self) -> Result<Vec<Location>, ResolutionError> {
        let mut locations = Vec::new();
        let walker = WalkDir::new(&self.root).follow_links(false).sort_by_file_name();

        for entry in walker {
            let entry = entry
                .map_err(|source| ResolutionError::Walk { root: self.root.clone(), source })?;
            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }
            let Some(access_path) = self.tree_path(entry.path()) else { continue };

            if file_type.is_symlink() {
                if let Some(location) = self.resolve_link(entry.path(), access_path) {
                    locations.push(location);
                }
            } else if file_type.is_file() {
                locations.push(Location::new(access_path));
            } else {
                debug!("Skipping special file {}", entry.path().display());
            }
        }

        debug!("Enumerated {} locations under {}", locations.len(), self.root.display());
        Ok(locations)
    }

    fn open(&self, location: &Location) -> Result<Option<ContentReader>, ResolutionError> {
        let path = self.host_path(location);
        let file = fs::File::open(&path).map_err(|source| ResolutionError::Open {
            path: location.real_path().to_string(),
            source,
        })?;
        Ok(Some(Box::new(file)))
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        if c == '\\' {
            out.push_str("\\\\");
        } else {
            out.push(c);
        }
    }
}

#[cfg(unix)]
fn encode_component(part: &OsStr, out: &mut String) {
    use std::fmt::Write as _;
    use std::os::unix::ffi::OsStrExt;

    let mut rest = part.as_bytes();
    while !rest.is_empty() {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                push_escaped(out, valid);
                break;
            }
            Err(err) => {
                let (valid, after) = rest.split_at(err.valid_up_to());
                push_escaped(out, &String::from_utf8_lossy(valid));
                let invalid = err.error_len().unwrap_or(after.len());
                for byte in &after[..invalid] {
                    let _ = write!(out, "\\x{byte:02x}");
                }
                rest = &after[invalid..];
            }
        }
    }
}

#[cfg(not(unix))]
fn encode_component(part: &OsStr, out: &mut String) {
    push_escaped(out, &part.to_string_lossy());
}

/// Inverse of `encode_component` over a whole `/`-separated tree path.
#[cfg(unix)]
fn decode_tree_path(path: &str) -> PathBuf {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let raw = path.as_bytes();
    let mut bytes = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'\\' {
            match raw.get(i + 1) {
                Some(b'\\') => {
                    bytes.push(b'\\');
                    i += 2;
                    continue;
                }
                Some(b'x') => {
                    let byte = raw
                        .get(i + 2..i + 4)
                        .and_then(|hex| std::str::from_utf8(hex).ok())
                        .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                    if let Some(byte) = byte {
                        bytes.push(byte);
                        i += 4;
                        continue;
                    }
                }
                _ => {}
            }
        }
        bytes.push(raw[i]);
        i += 1;
    }
    PathBuf::from(OsString::from_vec(bytes))
}

#[cfg(not(unix))]
fn decode_tree_path(path: &str) -> PathBuf {
    PathBuf::from(path.replace("\\\\", "\\"))
}
