use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use tempfile::tempdir;

use jobcorpus::source::InMemorySource;
use jobcorpus::{
    CorpusConfig, CorpusCreator, CorpusError, CorpusOutput, DirectoryFetcher, JobPosting,
    JobPostingFileConfig, JobPostingFileSource, StreamSource, TaggedDocument, TaxonomyCache,
};

fn write_quarter(root: &Path, quarter: &str, part: &str, lines: &[&str]) {
    let dir = root.join(quarter);
    fs::create_dir_all(&dir).unwrap();
    let mut body = lines.join("\n");
    body.push('\n');
    fs::write(dir.join(part), body).unwrap();
}

#[test]
fn tagged_corpus_over_a_quarter_dump_matches_lookup() {
    let temp = tempdir().unwrap();
    write_quarter(
        temp.path(),
        "2015Q1",
        "part-0.json",
        &[
            r#"{"description": "<p>Manage teams</p>", "onet_soc_code": "11-9051.00"}"#,
            r#"{"description": "Analyze claims", "onet_soc_code": "15-2041.00"}"#,
        ],
    );
    write_quarter(
        temp.path(),
        "2015Q1",
        "part-1.json",
        &[r#"{"description": "Review audits", "onet_soc_code": "13-2011.00"}"#],
    );
    write_quarter(
        temp.path(),
        "2015Q2",
        "part-0.json",
        &[r#"{"description": "Other quarter", "onet_soc_code": "11-1011.00"}"#],
    );

    let source = JobPostingFileSource::new(
        JobPostingFileConfig::new("job_postings", temp.path()).with_quarter("2015Q1"),
    );
    let config = CorpusConfig::default()
        .with_fields(["description"])
        .with_major_groups(["11", "13"]);
    let mut corpus = CorpusCreator::tagged_document(config).with_source(source);

    let docs: Vec<CorpusOutput> = corpus.iter().unwrap().map(Result::unwrap).collect();
    assert_eq!(
        docs,
        vec![
            CorpusOutput::Tagged(TaggedDocument::new(
                vec!["manage".into(), "teams".into()],
                0
            )),
            CorpusOutput::Tagged(TaggedDocument::new(
                vec!["review".into(), "audits".into()],
                1
            )),
        ]
    );
    assert_eq!(corpus.next_tag(), 2);
    assert_eq!(corpus.lookup()[&0].as_deref(), Some("11-9051.00"));
    assert_eq!(corpus.lookup()[&1].as_deref(), Some("13-2011.00"));

    let meta = corpus.metadata();
    assert_eq!(
        meta["corpus_creator"],
        json!("jobcorpus::corpus::TaggedDocumentCorpusCreator")
    );
    assert_eq!(meta["quarter"], json!("2015Q1"));
}

#[test]
fn simple_corpus_cleans_markup_and_spacing() {
    let lines = vec![r#"{"description": "<p>Build APIs</p>\n\nfor  web"}"#.to_string()];
    let mut corpus = CorpusCreator::simple(CorpusConfig::default().with_fields(["description"]))
        .with_source(InMemorySource::new("sample", lines));
    let out: Vec<CorpusOutput> = corpus.iter().unwrap().map(Result::unwrap).collect();
    assert_eq!(out, vec![CorpusOutput::Text("build apis for web".into())]);
    assert_eq!(serde_json::to_value(&out[0]).unwrap(), json!("build apis for web"));
}

#[test]
fn base_corpus_tolerates_missing_schema_fields() {
    let lines = vec![r#"{"description": "Lead  <em>ops</em>", "skills": "Excel"}"#.to_string()];
    let mut corpus = CorpusCreator::base(CorpusConfig::default())
        .with_source(InMemorySource::new("sample", lines));
    let out: Vec<CorpusOutput> = corpus.iter().unwrap().map(Result::unwrap).collect();
    assert_eq!(
        serde_json::to_value(&out[0]).unwrap(),
        json!({"description": "Lead ops", "skills": "Excel"})
    );
}

#[test]
fn custom_filter_takes_precedence_over_major_groups() {
    let config = CorpusConfig::default()
        .with_fields(["description"])
        .with_major_groups(["11"])
        .with_filter(|mut posting: JobPosting| {
            let remote = posting.get("remote").and_then(|v| v.as_bool()) == Some(true);
            if remote {
                posting.insert("description".into(), json!("remote role"));
                Some(posting)
            } else {
                None
            }
        });
    let lines = vec![
        r#"{"description": "onsite", "onet_soc_code": "11-1011.00"}"#.to_string(),
        r#"{"description": "x", "onet_soc_code": "29-1141.00", "remote": true}"#.to_string(),
    ];
    let mut corpus =
        CorpusCreator::simple(config).with_source(InMemorySource::new("sample", lines));
    let out: Vec<CorpusOutput> = corpus.iter().unwrap().map(Result::unwrap).collect();
    assert_eq!(out, vec![CorpusOutput::Text("remote role".into())]);
}

#[test]
fn single_pass_sources_yield_nothing_the_second_time() {
    let lines = vec![r#"{"description": "one"}"#.to_string()];
    let mut corpus =
        CorpusCreator::token_list(CorpusConfig::default().with_fields(["description"]))
            .with_source(StreamSource::new("pipe", lines.into_iter()));
    assert_eq!(corpus.iter().unwrap().count(), 1);
    assert_eq!(corpus.iter().unwrap().count(), 0);
}

#[test]
fn missing_file_root_surfaces_source_unavailable() {
    let temp = tempdir().unwrap();
    let source = JobPostingFileSource::new(JobPostingFileConfig::new(
        "job_postings",
        temp.path().join("nope"),
    ));
    let mut corpus = CorpusCreator::simple(CorpusConfig::default()).with_source(source);
    let results: Vec<_> = corpus.iter().unwrap().collect();
    assert_eq!(results.len(), 1);
    assert!(matches!(
        &results[0],
        Err(CorpusError::SourceUnavailable { source_id, .. }) if source_id == "job_postings"
    ));
}

#[test]
fn taxonomy_cache_fetches_once_then_reuses_local_copy() {
    let mirror = tempdir().unwrap();
    let cache_dir = tempdir().unwrap();
    fs::create_dir_all(mirror.path().join("onet/db_v22")).unwrap();
    fs::write(mirror.path().join("onet/db_v22/Skills.txt"), "skills v1").unwrap();

    let cache = TaxonomyCache::new(
        cache_dir.path().join("onet"),
        "onet/db_v22",
        Arc::new(DirectoryFetcher::new(mirror.path())),
    );
    let path = cache.ensure_file("Skills.txt").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "skills v1");

    fs::write(mirror.path().join("onet/db_v22/Skills.txt"), "skills v2").unwrap();
    let again = cache.ensure_file("Skills.txt").unwrap();
    assert_eq!(again, path);
    assert_eq!(fs::read_to_string(&again).unwrap(), "skills v1");

    assert!(matches!(
        cache.ensure_file("Abilities.txt"),
        Err(CorpusError::SourceUnavailable { .. })
    ));
}
