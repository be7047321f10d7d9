use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use tracing::info;
use walkdir::WalkDir;

use crate::errors::CorpusError;
use crate::types::{JsonLine, SourceId};

/// Filesystem transport that lists posting files under a root.
pub struct FileStream {
    root: PathBuf,
    follow_links: bool,
}

impl FileStream {
    /// Create a stream rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            follow_links: false,
        }
    }

    /// Configure symlink traversal.
    pub fn with_follow_symlinks(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Root directory being listed.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files under the root whose `/`-joined relative path starts with `prefix`,
    /// in lexical order. Unreadable entries are skipped.
    pub fn list_files(&self, prefix: Option<&str>) -> Vec<PathBuf> {
        let mut walker = WalkDir::new(&self.root);
        if self.follow_links {
            walker = walker.follow_links(true);
        }
        let mut files: Vec<PathBuf> = walker
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| match prefix {
                Some(prefix) => relative_key(&self.root, path).starts_with(prefix),
                None => true,
            })
            .collect();
        files.sort();
        files
    }
}

/// Path relative to `root` with `/` separators, the way object-store keys read.
pub fn relative_key(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Lazily streams the non-blank lines of several files, one file at a time.
///
/// The first read failure is yielded as an error and ends the stream.
pub struct JsonLinesReader {
    source_id: SourceId,
    pending: VecDeque<PathBuf>,
    current: Option<Lines<BufReader<File>>>,
    failed: bool,
}

impl JsonLinesReader {
    /// Stream lines from `files` in order.
    pub fn new(source_id: impl Into<SourceId>, files: Vec<PathBuf>) -> Self {
        Self {
            source_id: source_id.into(),
            pending: files.into(),
            current: None,
            failed: false,
        }
    }

    fn open_next(&mut self) -> Option<Result<(), CorpusError>> {
        let path = self.pending.pop_front()?;
        info!(
            source_id = %self.source_id,
            path = %path.display(),
            "extracting job postings from file"
        );
        Some(File::open(&path).map_err(CorpusError::from).map(|file| {
            self.current = Some(BufReader::new(file).lines());
        }))
    }
}

impl Iterator for JsonLinesReader {
    type Item = Result<JsonLine, CorpusError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            if let Some(lines) = self.current.as_mut() {
                match lines.next() {
                    Some(Ok(line)) if line.trim().is_empty() => continue,
                    Some(Ok(line)) => return Some(Ok(line)),
                    Some(Err(err)) => {
                        self.failed = true;
                        return Some(Err(err.into()));
                    }
                    None => self.current = None,
                }
            }
            match self.open_next()? {
                Ok(()) => continue,
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            }
        }
    }
}
