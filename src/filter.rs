//! Record filters applied before a posting is transformed.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::constants::schema::{MAJOR_GROUP_PREFIX_LEN, ONET_SOC_CODE_FIELD};
use crate::data::JobPosting;
use crate::types::{FieldName, MajorGroup};

/// User-supplied filter: return the (possibly modified) posting to keep it, `None` to skip.
pub type FilterFn = Arc<dyn Fn(JobPosting) -> Option<JobPosting> + Send + Sync + 'static>;

/// Keeps postings whose SOC code starts with one of a set of major groups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MajorGroupFilter {
    groups: BTreeSet<MajorGroup>,
    key_field: FieldName,
}

impl MajorGroupFilter {
    /// Filter on `onet_soc_code` for the given major groups.
    pub fn new<I, G>(groups: I) -> Self
    where
        I: IntoIterator<Item = G>,
        G: Into<MajorGroup>,
    {
        Self {
            groups: groups.into_iter().map(Into::into).collect(),
            key_field: ONET_SOC_CODE_FIELD.to_string(),
        }
    }

    /// Read the SOC code from `key_field` instead of `onet_soc_code`.
    pub fn with_key_field(mut self, key_field: impl Into<FieldName>) -> Self {
        self.key_field = key_field.into();
        self
    }

    /// Configured major groups.
    pub fn groups(&self) -> &BTreeSet<MajorGroup> {
        &self.groups
    }

    /// Field the SOC code is read from.
    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    /// True when the key field is a non-empty string whose major group is configured.
    ///
    /// A missing, null, or non-string key is a reject, never an error.
    pub fn accepts(&self, posting: &JobPosting) -> bool {
        let Some(Value::String(code)) = posting.get(&self.key_field) else {
            return false;
        };
        if code.is_empty() {
            return false;
        }
        let prefix: String = code.chars().take(MAJOR_GROUP_PREFIX_LEN).collect();
        self.groups.contains(&prefix)
    }
}

/// Filter resolved for a corpus creator.
#[derive(Clone, Default)]
pub enum RecordFilter {
    /// Every posting passes unmodified.
    #[default]
    PassThrough,
    /// Keep postings in the configured major groups.
    MajorGroup(MajorGroupFilter),
    /// Caller-supplied predicate.
    Custom(FilterFn),
}

impl RecordFilter {
    /// Pick the active filter: a custom function wins, then a major-group set, else none.
    pub fn resolve(custom: Option<FilterFn>, major_groups: Option<MajorGroupFilter>) -> Self {
        match (custom, major_groups) {
            (Some(filter), _) => RecordFilter::Custom(filter),
            (None, Some(groups)) => RecordFilter::MajorGroup(groups),
            (None, None) => RecordFilter::PassThrough,
        }
    }

    /// Apply the filter, returning the posting to keep or `None` to skip it.
    pub fn apply(&self, posting: JobPosting) -> Option<JobPosting> {
        match self {
            RecordFilter::PassThrough => Some(posting),
            RecordFilter::MajorGroup(filter) => filter.accepts(&posting).then_some(posting),
            RecordFilter::Custom(filter) => filter(posting),
        }
    }

    /// True when no filtering happens.
    pub fn is_pass_through(&self) -> bool {
        matches!(self, RecordFilter::PassThrough)
    }
}

impl fmt::Debug for RecordFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordFilter::PassThrough => f.write_str("PassThrough"),
            RecordFilter::MajorGroup(filter) => f.debug_tuple("MajorGroup").field(filter).finish(),
            RecordFilter::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::decode_posting;

    fn posting(json: &str) -> JobPosting {
        decode_posting(json).unwrap()
    }

    #[test]
    fn major_group_filter_matches_on_prefix() {
        let filter = MajorGroupFilter::new(["11", "13"]);
        assert!(filter.accepts(&posting(r#"{"onet_soc_code": "11-9051.00"}"#)));
        assert!(filter.accepts(&posting(r#"{"onet_soc_code": "13-1079.99"}"#)));
        assert!(!filter.accepts(&posting(r#"{"onet_soc_code": "15-2041.00"}"#)));
    }

    #[test]
    fn major_group_filter_rejects_missing_empty_and_odd_keys() {
        let filter = MajorGroupFilter::new(["11"]);
        assert!(!filter.accepts(&posting(r#"{"title": "Chef"}"#)));
        assert!(!filter.accepts(&posting(r#"{"onet_soc_code": ""}"#)));
        assert!(!filter.accepts(&posting(r#"{"onet_soc_code": null}"#)));
        assert!(!filter.accepts(&posting(r#"{"onet_soc_code": 11}"#)));
        assert!(!filter.accepts(&posting(r#"{"onet_soc_code": "1"}"#)));
    }

    #[test]
    fn major_group_filter_honors_custom_key_field() {
        let filter = MajorGroupFilter::new(["29"]).with_key_field("soc");
        assert_eq!(filter.key_field(), "soc");
        assert!(filter.accepts(&posting(r#"{"soc": "29-1141.00"}"#)));
        assert!(!filter.accepts(&posting(r#"{"onet_soc_code": "29-1141.00"}"#)));
    }

    #[test]
    fn resolve_prefers_custom_then_major_groups() {
        let custom: FilterFn = Arc::new(|_| None);
        let groups = MajorGroupFilter::new(["11"]);

        let chosen = RecordFilter::resolve(Some(custom.clone()), Some(groups.clone()));
        assert!(matches!(chosen, RecordFilter::Custom(_)));
        assert!(chosen.apply(posting(r#"{"onet_soc_code": "11-1011.00"}"#)).is_none());

        let chosen = RecordFilter::resolve(None, Some(groups));
        assert!(matches!(chosen, RecordFilter::MajorGroup(_)));

        let chosen = RecordFilter::resolve(None, None);
        assert!(chosen.is_pass_through());
        let kept = chosen.apply(posting(r#"{"a": 1}"#)).unwrap();
        assert_eq!(kept, posting(r#"{"a": 1}"#));
    }

    #[test]
    fn custom_filter_may_rewrite_postings() {
        let filter = RecordFilter::Custom(Arc::new(|mut posting: JobPosting| {
            posting.insert("seen".into(), Value::Bool(true));
            Some(posting)
        }));
        let kept = filter.apply(posting(r#"{"a": 1}"#)).unwrap();
        assert_eq!(kept["seen"], Value::Bool(true));
    }
}
