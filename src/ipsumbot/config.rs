use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::store;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Pause before the bot starts typing, drawn uniformly from this range.
    #[serde(default = "default_reply_pause_min_ms")]
    pub reply_pause_min_ms: u64,

    #[serde(default = "default_reply_pause_max_ms")]
    pub reply_pause_max_ms: u64,

    #[serde(default = "default_corpus_file")]
    pub corpus_file: PathBuf,

    #[serde(default = "default_static_serving_dir")]
    pub static_serving_dir: PathBuf,

    #[serde(default = "default_serving_addr")]
    pub serving_addr: String,
}

fn default_reply_pause_min_ms() -> u64 {
    1000
}

fn default_reply_pause_max_ms() -> u64 {
    5000
}

fn default_corpus_file() -> PathBuf {
    store::data_dir().join("words.json")
}

fn default_static_serving_dir() -> PathBuf {
    "ui/dist".into()
}

fn default_serving_addr() -> String {
    "0.0.0.0:3000".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reply_pause_min_ms: default_reply_pause_min_ms(),
            reply_pause_max_ms: default_reply_pause_max_ms(),
            corpus_file: default_corpus_file(),
            static_serving_dir: default_static_serving_dir(),
            serving_addr: default_serving_addr(),
        }
    }
}

impl Config {
    /// Pause bounds in milliseconds, reordered when the file has them swapped.
    pub fn reply_pause_bounds(&self) -> (u64, u64) {
        if self.reply_pause_max_ms < self.reply_pause_min_ms {
            (self.reply_pause_max_ms, self.reply_pause_min_ms)
        } else {
            (self.reply_pause_min_ms, self.reply_pause_max_ms)
        }
    }
}
