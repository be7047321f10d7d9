/// Directory-backed source of quarterly job-posting dumps.
pub mod file_source;
