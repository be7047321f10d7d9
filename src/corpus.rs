//! Corpus creators: streaming transforms from job-posting JSON lines to training corpora.
//!
//! A `CorpusCreator` pairs a `CorpusKind` (what each posting becomes) with a
//! `CorpusConfig` (which fields, which filter) and an optional bound `RecordSource`.
//!
//! Consumption modes:
//! - `iter` reads the bound source, filters, transforms, and (for tagged documents)
//!   records each tag in the lookup table.
//! - `raw_corpora`, `tokenize_corpora`, and `label_corpora` read any source without
//!   filtering and without touching the lookup table.
//!
//! Every mode is lazy and stops after the first error.

use rand::Rng;
use tracing::debug;

use crate::config::CorpusConfig;
use crate::constants::corpus::{LABEL_PLACEHOLDER_MAX, LABEL_PLACEHOLDER_MIN};
use crate::constants::metadata::META_CORPUS_CREATOR;
use crate::constants::schema::OCCUPATIONAL_CATEGORY_FIELD;
use crate::data::{
    CorpusOutput, JobPosting, LookupTable, TaggedDocument, decode_posting, field_text,
    required_field_text, taxonomy_code,
};
use crate::errors::CorpusError;
use crate::filter::RecordFilter;
use crate::metadata::{Metadata, merge_metadata};
use crate::source::{LineStream, RecordSource};
use crate::types::{FieldName, Label, SourceId, Tag, Token};
use crate::utils::{clean_field_text, clean_str, lowercase_strip_punc, tokenize};

/// The closed set of corpus shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CorpusKind {
    /// Postings with their document fields HTML-stripped and whitespace-collapsed.
    Base,
    /// One lowercased, punctuation-free string per posting.
    Simple,
    /// Word2vec-cleaned tokens tagged with a running integer, for doc2vec training.
    TaggedDocument,
    /// Word2vec-cleaned tokens, for word2vec training.
    TokenList,
    /// The lowercased occupational category label of each posting.
    JobCategory,
}

impl CorpusKind {
    /// Type name reported in corpus metadata.
    pub const fn type_name(self) -> &'static str {
        match self {
            CorpusKind::Base => "CorpusCreator",
            CorpusKind::Simple => "SimpleCorpusCreator",
            CorpusKind::TaggedDocument => "TaggedDocumentCorpusCreator",
            CorpusKind::TokenList => "TokenListCorpusCreator",
            CorpusKind::JobCategory => "JobCategoryCorpusCreator",
        }
    }

    /// Fully qualified type name, e.g. `jobcorpus::corpus::SimpleCorpusCreator`.
    pub fn qualified_name(self) -> String {
        format!("{}::{}", module_path!(), self.type_name())
    }

    fn honors_raw(self) -> bool {
        matches!(self, CorpusKind::Base | CorpusKind::Simple)
    }

    /// Transform one accepted posting. `tag` is only used by tagged documents.
    fn transform(
        self,
        config: &CorpusConfig,
        posting: JobPosting,
        tag: Tag,
    ) -> Result<CorpusOutput, CorpusError> {
        let fields = &config.document_schema_fields;
        if config.raw && self.honors_raw() {
            return Ok(CorpusOutput::Record(posting));
        }
        match self {
            CorpusKind::Base => Ok(CorpusOutput::Record(clean_posting(fields, posting))),
            CorpusKind::Simple => simple_text(fields, &posting).map(CorpusOutput::Text),
            CorpusKind::TaggedDocument => {
                let words = tokenize(&word_text(fields, &posting)?);
                Ok(CorpusOutput::Tagged(TaggedDocument::new(words, tag)))
            }
            CorpusKind::TokenList => {
                let words = tokenize(&word_text(fields, &posting)?);
                Ok(CorpusOutput::Tokens(words))
            }
            CorpusKind::JobCategory => label_text(fields, &posting).map(CorpusOutput::Label),
        }
    }
}

/// Rewrite each configured text field as markup-free, single-spaced text.
///
/// Missing fields are skipped and non-text values are left as they are.
pub fn clean_posting(fields: &[FieldName], mut posting: JobPosting) -> JobPosting {
    for field in fields {
        if let Some(serde_json::Value::String(text)) = posting.get_mut(field) {
            *text = clean_field_text(text);
        }
    }
    posting
}

/// Space-joined `lowercase_strip_punc` of every field; missing fields count as empty.
pub fn simple_text(fields: &[FieldName], posting: &JobPosting) -> Result<String, CorpusError> {
    let mut parts = Vec::with_capacity(fields.len());
    for field in fields {
        parts.push(lowercase_strip_punc(field_text(posting, field)?.unwrap_or("")));
    }
    Ok(parts.join(" "))
}

/// Space-joined `clean_str` of every field; every field must be present.
pub fn word_text(fields: &[FieldName], posting: &JobPosting) -> Result<String, CorpusError> {
    let mut parts = Vec::with_capacity(fields.len());
    for field in fields {
        parts.push(clean_str(required_field_text(posting, field)?));
    }
    Ok(parts.join(" "))
}

fn label_text(fields: &[FieldName], posting: &JobPosting) -> Result<Label, CorpusError> {
    let mut parts = Vec::with_capacity(fields.len());
    for field in fields {
        parts.push(lowercase_strip_punc(required_field_text(posting, field)?));
    }
    Ok(parts.join(" "))
}

/// Tag counter and tag -> SOC code lookup owned by one creator.
#[derive(Clone, Debug, Default)]
struct TagState {
    next_tag: Tag,
    lookup: LookupTable,
}

impl TagState {
    fn emit(
        &mut self,
        kind: CorpusKind,
        config: &CorpusConfig,
        posting: JobPosting,
    ) -> Result<CorpusOutput, CorpusError> {
        if kind != CorpusKind::TaggedDocument {
            return kind.transform(config, posting, self.next_tag);
        }
        let tag = self.next_tag;
        let code = taxonomy_code(&posting, &config.key_field);
        let output = kind.transform(config, posting, tag)?;
        self.lookup.insert(tag, code);
        self.next_tag += 1;
        Ok(output)
    }
}

/// Streaming transformer from job-posting JSON lines to one corpus shape.
pub struct CorpusCreator {
    kind: CorpusKind,
    config: CorpusConfig,
    filter: RecordFilter,
    source: Option<Box<dyn RecordSource>>,
    tags: TagState,
}

impl CorpusCreator {
    /// Create a creator of `kind`; bind a source with `with_source` before `iter`.
    pub fn new(kind: CorpusKind, config: CorpusConfig) -> Self {
        let config = match kind {
            CorpusKind::JobCategory => {
                config.with_fields([OCCUPATIONAL_CATEGORY_FIELD.to_string()])
            }
            _ => config,
        };
        let filter = config.record_filter();
        Self {
            kind,
            config,
            filter,
            source: None,
            tags: TagState::default(),
        }
    }

    /// Cleaned postings.
    pub fn base(config: CorpusConfig) -> Self {
        Self::new(CorpusKind::Base, config)
    }

    /// One lowercased string per posting.
    pub fn simple(config: CorpusConfig) -> Self {
        Self::new(CorpusKind::Simple, config)
    }

    /// Tagged documents plus a tag lookup table.
    pub fn tagged_document(config: CorpusConfig) -> Self {
        Self::new(CorpusKind::TaggedDocument, config)
    }

    /// Token lists.
    pub fn token_list(config: CorpusConfig) -> Self {
        Self::new(CorpusKind::TokenList, config)
    }

    /// Occupational category labels. The configured field list is replaced by
    /// `occupationalCategory`.
    pub fn job_category(config: CorpusConfig) -> Self {
        Self::new(CorpusKind::JobCategory, config)
    }

    /// Bind the source read by `iter`.
    pub fn with_source(mut self, source: impl RecordSource + 'static) -> Self {
        self.bind_source(source);
        self
    }

    /// Bind (or replace) the source read by `iter`.
    pub fn bind_source(&mut self, source: impl RecordSource + 'static) {
        self.source = Some(Box::new(source));
    }

    /// Corpus shape produced by this creator.
    pub fn kind(&self) -> CorpusKind {
        self.kind
    }

    /// Effective configuration.
    pub fn config(&self) -> &CorpusConfig {
        &self.config
    }

    /// Filter applied by `iter`.
    pub fn filter(&self) -> &RecordFilter {
        &self.filter
    }

    /// Tag -> SOC code for every tagged document emitted by `iter` so far.
    ///
    /// A posting whose transform fails gets no entry, so keys stay `0..next_tag`.
    pub fn lookup(&self) -> &LookupTable {
        &self.tags.lookup
    }

    /// Tag the next emitted document will receive.
    pub fn next_tag(&self) -> Tag {
        self.tags.next_tag
    }

    /// Restart tagging from zero and forget the lookup table.
    ///
    /// Re-running `iter` without this continues numbering where the last pass stopped.
    pub fn reset_tags(&mut self) {
        self.tags = TagState::default();
    }

    /// `corpus_creator` merged with the bound source's metadata.
    ///
    /// Always builds a fresh map.
    pub fn metadata(&self) -> Metadata {
        let mut meta = Metadata::new();
        META_CORPUS_CREATOR.insert(&mut meta, self.kind.qualified_name());
        match &self.source {
            Some(source) => merge_metadata(&meta, &source.metadata()),
            None => meta,
        }
    }

    /// Filtered, transformed outputs from the bound source.
    ///
    /// Fails when no source is bound. Tagged documents are numbered from the
    /// current counter and recorded in the lookup table as they are pulled.
    pub fn iter(&mut self) -> Result<CorpusIter<'_>, CorpusError> {
        let kind = self.kind;
        let source = self.source.as_mut().ok_or_else(|| {
            CorpusError::Configuration(format!(
                "{} has no record source bound",
                kind.type_name()
            ))
        })?;
        let source_id = source.id().to_string();
        Ok(CorpusIter {
            lines: source.lines(),
            kind,
            config: &self.config,
            filter: &self.filter,
            tags: &mut self.tags,
            source_id,
            stats: CorpusStats::default(),
            finished: false,
        })
    }

    /// Transformed outputs for every posting in `source`, without filtering.
    ///
    /// Tagged documents all carry the current counter value; the counter and the
    /// lookup table are left untouched.
    pub fn raw_corpora<'a, S>(
        &'a self,
        source: &'a mut S,
    ) -> impl Iterator<Item = Result<CorpusOutput, CorpusError>> + 'a
    where
        S: RecordSource + ?Sized,
    {
        let kind = self.kind;
        let config = &self.config;
        let tag = self.tags.next_tag;
        StopOnError::new(
            postings(source.lines())
                .map(move |posting| posting.and_then(|p| kind.transform(config, p, tag))),
        )
    }

    /// `raw_corpora` split into whitespace tokens.
    ///
    /// Fails with `NonTextOutput` when this kind does not produce text.
    pub fn tokenize_corpora<'a, S>(
        &'a self,
        source: &'a mut S,
    ) -> impl Iterator<Item = Result<Vec<Token>, CorpusError>> + 'a
    where
        S: RecordSource + ?Sized,
    {
        let creator = self.kind.type_name();
        StopOnError::new(self.raw_corpora(source).map(move |output| {
            let output = output?;
            output
                .as_text()
                .map(tokenize)
                .ok_or(CorpusError::NonTextOutput { creator })
        }))
    }

    /// One pseudo-random label in `0..=23` per posting, regardless of content.
    ///
    /// Placeholder labeling kept for corpus-shape compatibility. Lines are still
    /// decoded, so malformed input fails here as well.
    pub fn label_corpora<'a, S, R>(
        &'a self,
        source: &'a mut S,
        rng: &'a mut R,
    ) -> impl Iterator<Item = Result<Label, CorpusError>> + 'a
    where
        S: RecordSource + ?Sized,
        R: Rng + ?Sized,
    {
        StopOnError::new(postings(source.lines()).map(move |posting| {
            posting.map(|_| {
                rng.random_range(LABEL_PLACEHOLDER_MIN..=LABEL_PLACEHOLDER_MAX)
                    .to_string()
            })
        }))
    }
}

/// Per-pass counters for `CorpusIter`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CorpusStats {
    /// Lines pulled from the source.
    pub seen: usize,
    /// Postings rejected by the filter.
    pub filtered: usize,
    /// Outputs emitted.
    pub emitted: usize,
}

/// Iterator returned by `CorpusCreator::iter`.
pub struct CorpusIter<'a> {
    lines: LineStream<'a>,
    kind: CorpusKind,
    config: &'a CorpusConfig,
    filter: &'a RecordFilter,
    tags: &'a mut TagState,
    source_id: SourceId,
    stats: CorpusStats,
    finished: bool,
}

impl CorpusIter<'_> {
    /// Counters for the pass so far.
    pub fn stats(&self) -> CorpusStats {
        self.stats
    }

    fn fail(&mut self, err: CorpusError) -> Option<Result<CorpusOutput, CorpusError>> {
        self.finished = true;
        Some(Err(err))
    }
}

impl Iterator for CorpusIter<'_> {
    type Item = Result<CorpusOutput, CorpusError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(err)) => return self.fail(err),
                None => {
                    self.finished = true;
                    debug!(
                        creator = self.kind.type_name(),
                        source_id = %self.source_id,
                        seen = self.stats.seen,
                        emitted = self.stats.emitted,
                        filtered = self.stats.filtered,
                        "corpus pass complete"
                    );
                    return None;
                }
            };
            self.stats.seen += 1;
            let posting = match decode_posting(&line) {
                Ok(posting) => posting,
                Err(err) => return self.fail(err),
            };
            let Some(posting) = self.filter.apply(posting) else {
                self.stats.filtered += 1;
                continue;
            };
            return match self.tags.emit(self.kind, self.config, posting) {
                Ok(output) => {
                    self.stats.emitted += 1;
                    Some(Ok(output))
                }
                Err(err) => self.fail(err),
            };
        }
    }
}

fn postings(lines: LineStream<'_>) -> impl Iterator<Item = Result<JobPosting, CorpusError>> + '_ {
    StopOnError::new(lines.map(|line| line.and_then(|line| decode_posting(&line))))
}

/// Ends a fallible stream right after its first error.
struct StopOnError<I> {
    inner: I,
    done: bool,
}

impl<I> StopOnError<I> {
    fn new(inner: I) -> Self {
        Self { inner, done: false }
    }
}

impl<I, T> Iterator for StopOnError<I>
where
    I: Iterator<Item = Result<T, CorpusError>>,
{
    type Item = Result<T, CorpusError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self.inner.next();
        match &item {
            Some(Err(_)) | None => self.done = true,
            Some(Ok(_)) => {}
        }
        item
    }
}
