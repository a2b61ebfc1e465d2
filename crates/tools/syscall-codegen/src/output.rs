//! Writing rendered artifacts to disk.
//!
//! Every file is first staged as a temporary file next to its destination
//! and only renamed into place once all of them were written successfully.
//! A failed run therefore never leaves a truncated dispatch table behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::CodegenError;
use crate::render::Artifacts;

/// Destination paths for one generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Dispatch table source file. Its parent directory must exist.
    pub dispatch: PathBuf,
    /// Base directory for invocation stub headers, created if absent.
    pub header_dir: PathBuf,
    /// Listing header path; `None` writes the listing to the given stream.
    pub listing: Option<PathBuf>,
}

/// Paths written by [`write_artifacts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifacts {
    /// The dispatch table file.
    pub dispatch: PathBuf,
    /// The listing file, if it was not written to a stream.
    pub listing: Option<PathBuf>,
    /// Every stub header, in first-seen order.
    pub headers: Vec<PathBuf>,
}

/// A file written to a temporary location, not yet renamed into place.
struct Staged {
    temp: NamedTempFile,
    dest: PathBuf,
}

impl Staged {
    fn new(dest: PathBuf, contents: &str) -> Result<Self, CodegenError> {
        let dir = parent_dir(&dest);
        let mut temp = NamedTempFile::new_in(dir).map_err(|e| CodegenError::io(&dest, e))?;
        temp.write_all(contents.as_bytes())
            .and_then(|()| temp.flush())
            .map_err(|e| CodegenError::io(&dest, e))?;
        Ok(Self { temp, dest })
    }

    fn commit(self) -> Result<PathBuf, CodegenError> {
        self.temp
            .persist(&self.dest)
            .map_err(|e| CodegenError::io(&self.dest, e.error))?;
        Ok(self.dest)
    }
}

/// Atomically replaces `path` with `contents`.
///
/// # Errors
///
/// Returns an I/O error naming `path` if its parent directory is missing or
/// not writable.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), CodegenError> {
    Staged::new(path.to_path_buf(), contents)?.commit()?;
    Ok(())
}

/// Writes all artifacts, with the listing going to `listing_stream` unless a
/// listing path is configured.
///
/// Nothing is renamed into place until every file has been staged. Headers
/// are committed first, then the listing file, and the dispatch table last,
/// so a failed rename never leaves a new dispatch table beside stale headers.
/// A streamed listing is written after all files.
///
/// # Errors
///
/// Returns the first I/O error, naming the path involved.
pub fn write_artifacts(
    artifacts: &Artifacts,
    paths: &OutputPaths,
    listing_stream: &mut dyn Write,
) -> Result<WrittenArtifacts, CodegenError> {
    std::fs::create_dir_all(&paths.header_dir)
        .map_err(|e| CodegenError::io(&paths.header_dir, e))?;

    let dispatch = Staged::new(paths.dispatch.clone(), &artifacts.dispatch)?;
    let listing = match &paths.listing {
        Some(path) => Some(Staged::new(path.clone(), &artifacts.listing)?),
        None => None,
    };
    let mut headers = Vec::with_capacity(artifacts.headers.len());
    for header in &artifacts.headers {
        let dest = paths.header_dir.join(&header.path);
        let dir = parent_dir(&dest);
        std::fs::create_dir_all(dir).map_err(|e| CodegenError::io(dir, e))?;
        headers.push(Staged::new(dest, &header.contents)?);
    }

    let headers = headers
        .into_iter()
        .map(Staged::commit)
        .collect::<Result<Vec<_>, _>>()?;
    let listing = listing.map(Staged::commit).transpose()?;
    let dispatch = dispatch.commit()?;

    if listing.is_none() {
        listing_stream
            .write_all(artifacts.listing.as_bytes())
            .and_then(|()| listing_stream.flush())
            .map_err(|e| CodegenError::io("<stdout>", e))?;
    }

    Ok(WrittenArtifacts {
        dispatch,
        listing,
        headers,
    })
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
