#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Command line runners shared by the bundled binaries.
pub mod apps;
/// Corpus configuration.
pub mod config;
/// Centralized constants used across corpora, sources, and the taxonomy cache.
pub mod constants;
/// Corpus creators and their iterators.
pub mod corpus;
/// Posting and corpus output types.
pub mod data;
/// Record filters.
pub mod filter;
/// Metadata keys and helpers.
pub mod metadata;
/// Record source traits and built-in sources.
pub mod source;
/// Input transports used by sources (filesystem listing, taxonomy cache).
pub mod transport;
/// Shared type aliases.
pub mod types;
/// Text normalization helpers.
pub mod utils;

mod errors;

pub use config::CorpusConfig;
pub use corpus::{CorpusCreator, CorpusIter, CorpusKind, CorpusStats};
pub use data::{CorpusOutput, JobPosting, LookupTable, TaggedDocument};
pub use errors::CorpusError;
pub use filter::{FilterFn, MajorGroupFilter, RecordFilter};
pub use metadata::{Metadata, MetadataKey};
pub use source::{
    InMemorySource, JobPostingFileConfig, JobPostingFileSource, RecordSource, StreamSource,
};
pub use transport::cache::{DirectoryFetcher, ObjectFetcher, TaxonomyCache};
pub use types::{FieldName, JsonLine, Label, MajorGroup, SourceId, Tag, TaxonomyCode, Token};
