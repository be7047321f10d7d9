use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::CorpusError;
use crate::types::{Label, Tag, TaxonomyCode, Token};

/// One job posting in the common schema, decoded from a single JSON line.
///
/// Field order follows the input document. Any field may be missing.
pub type JobPosting = Map<String, Value>;

/// Tag -> O*NET SOC code of the posting that received the tag.
///
/// `None` records a tagged posting that carried no SOC code.
pub type LookupTable = BTreeMap<Tag, Option<TaxonomyCode>>;

/// Token list paired with integer tags, as consumed by doc2vec-style trainers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedDocument {
    /// Cleaned, whitespace-delimited words of the document.
    pub words: Vec<Token>,
    /// Tags identifying the document; corpus creators emit exactly one.
    pub tags: Vec<Tag>,
}

impl TaggedDocument {
    /// Build a tagged document carrying a single tag.
    pub fn new(words: Vec<Token>, tag: Tag) -> Self {
        Self {
            words,
            tags: vec![tag],
        }
    }
}

/// One unit emitted by a corpus creator.
///
/// Serializes without a variant wrapper so each unit renders as its natural JSON shape.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CorpusOutput {
    /// The (possibly cleaned) posting itself.
    Record(JobPosting),
    /// A single cleaned string.
    Text(String),
    /// Cleaned tokens.
    Tokens(Vec<Token>),
    /// Tokens plus tag.
    Tagged(TaggedDocument),
    /// A category label.
    Label(Label),
}

impl CorpusOutput {
    /// Text content for the string-shaped variants.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CorpusOutput::Text(text) | CorpusOutput::Label(text) => Some(text),
            _ => None,
        }
    }
}

/// Decode one JSON line into a job posting.
///
/// Lines that are not JSON objects are rejected; callers treat this as fatal.
pub fn decode_posting(line: &str) -> Result<JobPosting, CorpusError> {
    Ok(serde_json::from_str::<JobPosting>(line)?)
}

/// Text value of `field`, treating an absent or `null` field as missing.
pub fn field_text<'a>(
    posting: &'a JobPosting,
    field: &str,
) -> Result<Option<&'a str>, CorpusError> {
    match posting.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(_) => Err(CorpusError::NonTextField {
            field: field.to_string(),
        }),
    }
}

/// Text value of `field`, failing when the field is absent.
pub fn required_field_text<'a>(
    posting: &'a JobPosting,
    field: &str,
) -> Result<&'a str, CorpusError> {
    field_text(posting, field)?.ok_or_else(|| CorpusError::MissingField {
        field: field.to_string(),
    })
}

/// Best-effort taxonomy code lookup; never fails.
///
/// Non-string scalars are rendered to text, containers and `null` count as absent.
pub fn taxonomy_code(posting: &JobPosting, field: &str) -> Option<TaxonomyCode> {
    match posting.get(field)? {
        Value::String(code) => Some(code.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
