use crate::corpus::EvictionPolicy;
use clap::Args;
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// Runtime settings. Each one can be given as a flag or via its env var.
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Directory holding uploaded logs
    #[arg(long = "blob-dir", env = "LOGSIGHT_BLOB_DIR", default_value = "logs", global = true)]
    pub blob_dir: PathBuf,

    /// Command that reads a prompt on stdin and writes the answer to stdout
    #[arg(long = "completion-cmd", env = "LOGSIGHT_COMPLETION_CMD", global = true)]
    pub completion_command: Option<String>,

    /// Keep at most this many analyzed logs in memory (least recently used
    /// are dropped). Unset keeps every log for the life of the process.
    #[arg(long = "corpus-capacity", env = "LOGSIGHT_CORPUS_CAPACITY", global = true)]
    pub corpus_capacity: Option<NonZeroUsize>,
}

impl Settings {
    pub fn eviction_policy(&self) -> EvictionPolicy {
        match self.corpus_capacity {
            Some(cap) => EvictionPolicy::Lru(cap),
            None => EvictionPolicy::Never,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            blob_dir: PathBuf::from("logs"),
            completion_command: None,
            corpus_capacity: None,
        }
    }
}
