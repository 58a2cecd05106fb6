//! Tracing setup. The interactive UI owns the terminal, so it logs to a
//! file; one-shot commands log to stderr.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "JOBSEARCH_LOG";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn log_file_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("jobsearch")
        .join("jobsearch.log")
}

/// Falls back to no logging if the file cannot be created, since stderr
/// belongs to the UI.
pub fn init_file() {
    let path = log_file_path();
    if let Some(parent) = path.parent() {
        if let Err(err) = std::fs::create_dir_all(parent) {
            eprintln!("Warning: Could not create log directory {:?}: {}", parent, err);
            return;
        }
    }

    let file = match File::create(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Warning: Could not create log file at {:?}: {}", path, err);
            return;
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

pub fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_lives_in_app_dir() {
        let path = log_file_path();
        assert!(path.ends_with("jobsearch/jobsearch.log"));
    }
}
