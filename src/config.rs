use std::fmt;
use std::sync::Arc;

use crate::constants::schema::{DEFAULT_DOCUMENT_FIELDS, ONET_SOC_CODE_FIELD};
use crate::data::JobPosting;
use crate::filter::{FilterFn, MajorGroupFilter, RecordFilter};
use crate::types::{FieldName, MajorGroup};

/// Construction-time settings shared by every corpus creator.
#[derive(Clone)]
pub struct CorpusConfig {
    /// Ordered posting fields that are cleaned and joined into corpus text.
    pub document_schema_fields: Vec<FieldName>,
    /// Optional caller-supplied filter; takes precedence over `major_groups`.
    pub filter: Option<FilterFn>,
    /// Return postings without cleaning (honored by the base and simple creators).
    pub raw: bool,
    /// Optional O*NET major groups used to filter when no custom filter is set.
    pub major_groups: Option<Vec<MajorGroup>>,
    /// Field holding the SOC code, used by the major-group filter and tag lookup.
    pub key_field: FieldName,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            document_schema_fields: DEFAULT_DOCUMENT_FIELDS
                .iter()
                .map(|field| field.to_string())
                .collect(),
            filter: None,
            raw: false,
            major_groups: None,
            key_field: ONET_SOC_CODE_FIELD.to_string(),
        }
    }
}

impl CorpusConfig {
    /// Replace the document schema fields.
    pub fn with_fields<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<FieldName>,
    {
        self.document_schema_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Install a custom filter function.
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(JobPosting) -> Option<JobPosting> + Send + Sync + 'static,
    {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Toggle raw passthrough.
    pub fn with_raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    /// Filter to the given O*NET major groups (two-digit SOC prefixes).
    pub fn with_major_groups<I, G>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: Into<MajorGroup>,
    {
        self.major_groups = Some(groups.into_iter().map(Into::into).collect());
        self
    }

    /// Read SOC codes from `key_field`.
    pub fn with_key_field(mut self, key_field: impl Into<FieldName>) -> Self {
        self.key_field = key_field.into();
        self
    }

    /// Resolve the active filter for these settings.
    pub fn record_filter(&self) -> RecordFilter {
        let major_groups = self.major_groups.as_ref().map(|groups| {
            MajorGroupFilter::new(groups.iter().cloned()).with_key_field(self.key_field.clone())
        });
        RecordFilter::resolve(self.filter.clone(), major_groups)
    }
}

impl fmt::Debug for CorpusConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CorpusConfig")
            .field("document_schema_fields", &self.document_schema_fields)
            .field("filter", &self.filter.as_ref().map(|_| ".."))
            .field("raw", &self.raw)
            .field("major_groups", &self.major_groups)
            .field("key_field", &self.key_field)
            .finish()
    }
}
