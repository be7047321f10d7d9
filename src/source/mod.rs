//! Record source interfaces and in-process sources.
//!
//! Ownership model:
//! - `RecordSource` hands out a lazy stream of JSON lines plus provenance metadata.
//! - Restart behavior belongs to the source: `InMemorySource` can be replayed,
//!   `StreamSource` yields its lines exactly once.

use crate::constants::metadata::{META_RECORD_COUNT, META_SOURCE_ID};
use crate::errors::CorpusError;
use crate::metadata::Metadata;
use crate::types::{JsonLine, SourceId};

/// Source implementation modules.
pub mod sources;

pub use sources::file_source::{JobPostingFileConfig, JobPostingFileSource};

/// Lazy stream of JSON lines borrowed from a source.
pub type LineStream<'a> = Box<dyn Iterator<Item = Result<JsonLine, CorpusError>> + 'a>;

/// Producer of raw job-posting JSON lines.
///
/// Each item of `lines` is one JSON object. Nothing should be read until the
/// stream is pulled.
pub trait RecordSource: Send {
    /// Stable source identifier.
    fn id(&self) -> &str;

    /// Start streaming lines.
    ///
    /// Calling this again restarts the stream only when the source supports it;
    /// single-pass sources return an empty stream once drained.
    fn lines(&mut self) -> LineStream<'_>;

    /// Provenance metadata merged into corpus metadata.
    fn metadata(&self) -> Metadata {
        Metadata::new()
    }
}

impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn lines(&mut self) -> LineStream<'_> {
        (**self).lines()
    }

    fn metadata(&self) -> Metadata {
        (**self).metadata()
    }
}

/// In-memory source for tests and small samples. Replays its lines on every pass.
pub struct InMemorySource {
    id: SourceId,
    lines: Vec<JsonLine>,
    metadata: Metadata,
}

impl InMemorySource {
    /// Create an in-memory source from prebuilt JSON lines.
    pub fn new<I, L>(id: impl Into<SourceId>, lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<JsonLine>,
    {
        Self {
            id: id.into(),
            lines: lines.into_iter().map(Into::into).collect(),
            metadata: Metadata::new(),
        }
    }

    /// Attach extra provenance metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Number of lines held.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when no lines are held.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl RecordSource for InMemorySource {
    fn id(&self) -> &str {
        &self.id
    }

    fn lines(&mut self) -> LineStream<'_> {
        Box::new(self.lines.iter().cloned().map(Ok::<_, CorpusError>))
    }

    fn metadata(&self) -> Metadata {
        let mut meta = Metadata::new();
        META_SOURCE_ID.insert(&mut meta, self.id.clone());
        META_RECORD_COUNT.insert(&mut meta, self.lines.len());
        for (key, value) in &self.metadata {
            meta.insert(key.clone(), value.clone());
        }
        meta
    }
}

/// Single-pass source over any line iterator (generators, pipes, network readers).
pub struct StreamSource<I> {
    id: SourceId,
    inner: Option<I>,
    metadata: Metadata,
}

impl<I> StreamSource<I>
where
    I: Iterator<Item = JsonLine> + Send,
{
    /// Wrap `lines`; they are consumed by the first pass.
    pub fn new(id: impl Into<SourceId>, lines: I) -> Self {
        Self {
            id: id.into(),
            inner: Some(lines),
            metadata: Metadata::new(),
        }
    }

    /// Attach provenance metadata.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// True once the wrapped iterator has been handed out.
    pub fn is_drained(&self) -> bool {
        self.inner.is_none()
    }
}

impl<I> RecordSource for StreamSource<I>
where
    I: Iterator<Item = JsonLine> + Send,
{
    fn id(&self) -> &str {
        &self.id
    }

    fn lines(&mut self) -> LineStream<'_> {
        match self.inner.take() {
            Some(lines) => Box::new(lines.map(Ok::<_, CorpusError>)),
            None => Box::new(std::iter::empty::<Result<JsonLine, CorpusError>>()),
        }
    }

    fn metadata(&self) -> Metadata {
        let mut meta = Metadata::new();
        META_SOURCE_ID.insert(&mut meta, self.id.clone());
        for (key, value) in &self.metadata {
            meta.insert(key.clone(), value.clone());
        }
        meta
    }
}
