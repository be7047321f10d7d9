use std::collections::BTreeSet;

use proptest::prelude::*;
use serde_json::json;

use jobcorpus::source::InMemorySource;
use jobcorpus::utils::{clean_field_text, clean_str, lowercase_strip_punc};
use jobcorpus::{CorpusConfig, CorpusCreator, JobPosting, MajorGroupFilter};

fn posting_with_code(code: Option<&str>) -> JobPosting {
    let mut posting = JobPosting::new();
    posting.insert("description".into(), json!("Do the work"));
    if let Some(code) = code {
        posting.insert("onet_soc_code".into(), json!(code));
    }
    posting
}

proptest! {
    #[test]
    fn major_group_filter_accepts_exactly_configured_prefixes(
        groups in prop::collection::btree_set("[1-5][0-9]", 1..4),
        code in prop::option::of("([1-5][0-9]-[0-9]{4}\\.00)?"),
    ) {
        let filter = MajorGroupFilter::new(groups.iter().cloned());
        let posting = posting_with_code(code.as_deref());
        let expected = match code.as_deref() {
            Some(code) if !code.is_empty() => groups.contains(&code[..2]),
            _ => false,
        };
        prop_assert_eq!(filter.accepts(&posting), expected);
    }

    #[test]
    fn lookup_keys_are_contiguous_and_follow_accepted_order(
        codes in prop::collection::vec(prop::option::of("(11|13|15|29)-[0-9]{4}\\.00"), 0..20),
    ) {
        let groups: BTreeSet<&str> = ["11", "13"].into_iter().collect();
        let lines: Vec<String> = codes
            .iter()
            .map(|code| serde_json::to_string(&posting_with_code(code.as_deref())).unwrap())
            .collect();
        let config = CorpusConfig::default()
            .with_fields(["description"])
            .with_major_groups(groups.iter().copied());
        let mut corpus = CorpusCreator::tagged_document(config)
            .with_source(InMemorySource::new("prop", lines));
        let emitted = corpus.iter().unwrap().map(Result::unwrap).count();

        let accepted: Vec<Option<String>> = codes
            .iter()
            .filter(|code| code.as_deref().is_some_and(|c| groups.contains(&c[..2])))
            .cloned()
            .collect();
        prop_assert_eq!(emitted, accepted.len());
        prop_assert_eq!(corpus.next_tag(), accepted.len());
        let keys: Vec<usize> = corpus.lookup().keys().copied().collect();
        prop_assert_eq!(keys, (0..accepted.len()).collect::<Vec<_>>());
        let values: Vec<Option<String>> = corpus.lookup().values().cloned().collect();
        prop_assert_eq!(values, accepted);
    }

    #[test]
    fn cleaning_markup_free_text_is_a_no_op(
        text in "[A-Za-z0-9.,;:!?'()/-]{1,8}( [A-Za-z0-9.,;:!?'()/-]{1,8}){0,6}",
    ) {
        let cleaned = clean_field_text(&text);
        prop_assert_eq!(&cleaned, &text);
        prop_assert_eq!(clean_field_text(&cleaned), cleaned.clone());

        let stripped = lowercase_strip_punc(&text);
        prop_assert_eq!(lowercase_strip_punc(&stripped), stripped);
    }

    #[test]
    fn word2vec_cleaning_is_stable_on_lowercase_words(
        text in "[a-z0-9]{1,8}( [a-z0-9]{1,8}){0,6}",
    ) {
        prop_assert_eq!(clean_str(&text), text);
    }

    #[test]
    fn metadata_is_stable_across_calls(count in 0usize..5) {
        let lines: Vec<String> = (0..count).map(|_| "{}".to_string()).collect();
        let corpus = CorpusCreator::token_list(CorpusConfig::default())
            .with_source(InMemorySource::new("prop", lines));
        let first = corpus.metadata();
        prop_assert_eq!(&first, &corpus.metadata());
        prop_assert_eq!(first["record_count"].clone(), json!(count));
    }
}
