/// Filesystem listing and line streaming for posting dumps.
pub mod fs;
/// Local cache for taxonomy reference files.
pub mod cache;
