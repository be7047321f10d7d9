/// Name of a job-posting field in the common schema.
/// Examples: `description`, `experienceRequirements`, `onet_soc_code`
pub type FieldName = String;
/// Identifier for the source that produced a stream of postings.
/// Examples: `job_postings`, `sample`, `job_postings::2015Q1`
pub type SourceId = String;
/// O*NET SOC occupation code taken from a posting.
/// Example: `11-9051.00`
pub type TaxonomyCode = String;
/// Two-character O*NET major group prefix.
/// Examples: `11`, `13`, `15`
pub type MajorGroup = String;
/// Single word produced by tokenizing cleaned text.
/// Example: `kubernetes`
pub type Token = String;
/// Category label emitted by label corpora.
/// Examples: `software developers`, `7`
pub type Label = String;
/// Integer tag assigned to a tagged document.
pub type Tag = usize;
/// Raw JSON text of one posting, as read from a source.
/// Example: `{"description": "Build APIs", "onet_soc_code": "15-1252.00"}`
pub type JsonLine = String;
