use std::path::{Path, PathBuf};

use crate::foundation::error::{ReelError, ReelResult};

/// Where frame bytes come from (disk, a CDN client, an in-memory bundle).
///
/// Implementations are called from loader worker threads.
pub trait FrameSource: Send + Sync {
    /// Encoded bytes of the frame at root-relative `path`.
    fn fetch(&self, path: &str) -> ReelResult<Vec<u8>>;
}

/// Reads frames relative to a root directory.
#[derive(Clone, Debug)]
pub struct FsFrameSource {
    root: PathBuf,
}

impl FsFrameSource {
    /// Source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory frame paths resolve against.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FrameSource for FsFrameSource {
    fn fetch(&self, path: &str) -> ReelResult<Vec<u8>> {
        let norm = normalize_rel_path(path)?;
        let abs = self.root.join(Path::new(&norm));
        std::fs::read(&abs).map_err(|err| {
            ReelError::asset(format!("read frame bytes from '{}': {err}", abs.display()))
        })
    }
}

/// Normalize and validate root-relative frame paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`). A single leading `/` is treated as site-root relative, the way page
/// assets are usually written (`/hero/frame_0001.webp`).
pub fn normalize_rel_path(source: &str) -> ReelResult<String> {
    let s = source.replace('\\', "/");
    let s = s.strip_prefix('/').unwrap_or(&s);
    if s.starts_with('/') || s.contains(':') {
        return Err(ReelError::validation(format!(
            "frame path '{source}' must be relative"
        )));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ReelError::validation(format!(
                "frame path '{source}' must not contain '..'"
            )));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ReelError::validation(format!(
            "frame path '{source}' must contain a file name"
        )));
    }
    Ok(out.join("/"))
}
