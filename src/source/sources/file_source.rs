use std::path::PathBuf;

use crate::constants::metadata::{META_QUARTER, META_SOURCE_ID, META_SOURCE_ROOT};
use crate::errors::CorpusError;
use crate::metadata::Metadata;
use crate::source::{LineStream, RecordSource};
use crate::transport::fs::{FileStream, JsonLinesReader};
use crate::types::SourceId;

/// Configuration for a directory of JSON-lines posting dumps.
#[derive(Clone, Debug)]
pub struct JobPostingFileConfig {
    /// Stable source identifier used in metadata and logs.
    pub source_id: SourceId,
    /// Root directory holding the dumps.
    pub root: PathBuf,
    /// Optional quarter (e.g. `2015Q1`); only files whose path relative to `root`
    /// starts with it are read.
    pub quarter: Option<String>,
    /// Whether to follow symlinks while listing.
    pub follow_links: bool,
}

impl JobPostingFileConfig {
    /// Create a config for `root` covering every file beneath it.
    pub fn new(source_id: impl Into<SourceId>, root: impl Into<PathBuf>) -> Self {
        Self {
            source_id: source_id.into(),
            root: root.into(),
            quarter: None,
            follow_links: true,
        }
    }

    /// Restrict the source to one quarter.
    pub fn with_quarter(mut self, quarter: impl Into<String>) -> Self {
        self.quarter = Some(quarter.into());
        self
    }

    /// Override whether symlinks are followed while listing.
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }
}

/// Streams every posting line of a quarter's dump files.
///
/// Files are listed when a pass starts and read lazily, one at a time. Each pass
/// re-lists the directory, so the source can be replayed. Blank and
/// whitespace-only lines are skipped here and never reach the JSON decoder; every
/// other line is passed on as-is, so malformed postings still fail decoding.
pub struct JobPostingFileSource {
    config: JobPostingFileConfig,
}

impl JobPostingFileSource {
    /// Create a file source from configuration.
    pub fn new(config: JobPostingFileConfig) -> Self {
        Self { config }
    }

    /// Files the next pass will read.
    pub fn files(&self) -> Vec<PathBuf> {
        FileStream::new(&self.config.root)
            .with_follow_symlinks(self.config.follow_links)
            .list_files(self.config.quarter.as_deref())
    }
}

impl RecordSource for JobPostingFileSource {
    fn id(&self) -> &str {
        &self.config.source_id
    }

    fn lines(&mut self) -> LineStream<'_> {
        if !self.config.root.is_dir() {
            let err = CorpusError::SourceUnavailable {
                source_id: self.config.source_id.clone(),
                reason: format!("{} is not a directory", self.config.root.display()),
            };
            return Box::new(std::iter::once(Err(err)));
        }
        Box::new(JsonLinesReader::new(
            self.config.source_id.clone(),
            self.files(),
        ))
    }

    fn metadata(&self) -> Metadata {
        let mut meta = Metadata::new();
        META_SOURCE_ID.insert(&mut meta, self.config.source_id.clone());
        META_SOURCE_ROOT.insert(&mut meta, self.config.root.display().to_string());
        if let Some(quarter) = &self.config.quarter {
            META_QUARTER.insert(&mut meta, quarter.clone());
        }
        meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn file_source_reads_only_the_requested_quarter() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("2015Q1")).unwrap();
        fs::create_dir_all(root.join("2015Q2")).unwrap();
        fs::write(root.join("2015Q1/part-0.json"), "{\"id\":1}\n{\"id\":2}\n").unwrap();
        fs::write(root.join("2015Q1/part-1.json"), "{\"id\":3}\n").unwrap();
        fs::write(root.join("2015Q2/part-0.json"), "{\"id\":4}\n").unwrap();

        let mut source = JobPostingFileSource::new(
            JobPostingFileConfig::new("job_postings", root).with_quarter("2015Q1"),
        );
        let lines: Vec<String> = source.lines().map(Result::unwrap).collect();
        assert_eq!(lines, vec!["{\"id\":1}", "{\"id\":2}", "{\"id\":3}"]);

        let replay: Vec<String> = source.lines().map(Result::unwrap).collect();
        assert_eq!(replay, lines);

        let meta = source.metadata();
        assert_eq!(meta["source_id"], json!("job_postings"));
        assert_eq!(meta["quarter"], json!("2015Q1"));
        assert_eq!(meta["source_root"], json!(root.display().to_string()));
    }

    #[test]
    fn missing_root_is_reported_as_unavailable() {
        let temp = tempdir().unwrap();
        let mut source = JobPostingFileSource::new(JobPostingFileConfig::new(
            "job_postings",
            temp.path().join("absent"),
        ));
        let mut lines = source.lines();
        assert!(matches!(
            lines.next(),
            Some(Err(CorpusError::SourceUnavailable { .. }))
        ));
        assert!(lines.next().is_none());
        drop(lines);
        assert!(source.metadata().get("quarter").is_none());
    }
}
