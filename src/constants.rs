use crate::metadata::MetadataKey;

/// Constants describing the job-posting common schema.
pub mod schema {
    /// Default document fields cleaned and joined into corpus text.
    pub const DEFAULT_DOCUMENT_FIELDS: [&str; 4] = [
        "description",
        "experienceRequirements",
        "qualifications",
        "skills",
    ];
    /// Field holding the O*NET SOC code used for major-group filtering and tag lookup.
    pub const ONET_SOC_CODE_FIELD: &str = "onet_soc_code";
    /// Field holding the free-text occupational category label.
    pub const OCCUPATIONAL_CATEGORY_FIELD: &str = "occupationalCategory";
    /// Number of leading SOC code characters that name a major group.
    pub const MAJOR_GROUP_PREFIX_LEN: usize = 2;
}

/// Constants used by corpus creators.
pub mod corpus {
    /// Lowest label emitted by the placeholder label corpus.
    pub const LABEL_PLACEHOLDER_MIN: u32 = 0;
    /// Highest label (inclusive) emitted by the placeholder label corpus.
    pub const LABEL_PLACEHOLDER_MAX: u32 = 23;
}

/// Constants used by metadata key encoding and canonical fields.
pub mod metadata {
    use super::MetadataKey;

    /// Metadata key naming the corpus creator type.
    pub const META_CORPUS_CREATOR: MetadataKey = MetadataKey::new("corpus_creator");
    /// Metadata key naming the record source.
    pub const META_SOURCE_ID: MetadataKey = MetadataKey::new("source_id");
    /// Metadata key holding the root directory of a file-backed source.
    pub const META_SOURCE_ROOT: MetadataKey = MetadataKey::new("source_root");
    /// Metadata key holding the quarter a file-backed source is scoped to.
    pub const META_QUARTER: MetadataKey = MetadataKey::new("quarter");
    /// Metadata key holding the number of records held by an in-memory source.
    pub const META_RECORD_COUNT: MetadataKey = MetadataKey::new("record_count");
}

/// Constants used by the taxonomy file cache.
pub mod cache {
    /// Source id reported when a cache fetch fails.
    pub const TAXONOMY_CACHE_SOURCE_ID: &str = "taxonomy_cache";
    /// Separator between the remote prefix and a cached file name.
    pub const REMOTE_KEY_SEPARATOR: &str = "/";
}
