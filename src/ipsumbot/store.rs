use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ipsumbot_model::{Transcript, WordDictionary};
use itertools::Itertools;
use log::info;

use super::config::Config;

fn config_file_path() -> PathBuf {
    data_dir().join("config.yaml")
}

fn transcript_file_path() -> PathBuf {
    data_dir().join("transcript.json")
}

pub fn data_dir() -> PathBuf {
    let project_dirs = directories::ProjectDirs::from("com", "ipsumbot", "ipsumbot")
        .expect("Cannot retrieve project dirs");
    project_dirs.data_dir().to_owned()
}

pub fn load_config() -> Result<Config> {
    info!("Config file: {}", config_file_path().to_string_lossy());
    if !config_file_path().exists() {
        info!("Config file does not exist, creating.");
        store_default_config()?;
    }
    let config_file = File::open(config_file_path())?;
    Ok(serde_yaml::from_reader(config_file)?)
}

pub fn store_default_config() -> Result<()> {
    ensure_dir_created(&config_file_path())?;
    let config_file = File::create(&config_file_path())?;
    Ok(serde_yaml::to_writer(config_file, &Config::default())?)
}

pub fn load_corpus(path: &Path) -> Result<WordDictionary> {
    info!("Corpus file: {}", path.to_string_lossy());
    let corpus_file =
        File::open(path).with_context(|| format!("Cannot open {}", path.to_string_lossy()))?;
    let dictionary: WordDictionary = serde_json::from_reader(corpus_file)?;
    dictionary
        .validate()
        .with_context(|| format!("Invalid corpus in {}", path.to_string_lossy()))?;
    info!(
        "Loaded {} words (lengths: {})",
        dictionary.word_count(),
        dictionary.lengths().join(", ")
    );
    Ok(dictionary)
}

pub fn store_corpus(path: &Path, dictionary: &WordDictionary) -> Result<()> {
    ensure_dir_created(path)?;
    let out_file = File::create(path)?;
    Ok(serde_json::to_writer_pretty(out_file, dictionary)?)
}

pub fn load_transcript() -> Result<Transcript> {
    let path = transcript_file_path();
    info!("Transcript file: {}", path.to_string_lossy());
    if !path.exists() {
        return Ok(Transcript::default());
    }
    let transcript_file = File::open(path)?;
    Ok(serde_json::from_reader(transcript_file)?)
}

pub fn store_transcript(transcript: &Transcript) -> Result<()> {
    ensure_dir_created(&transcript_file_path())?;
    let out_file = File::create(transcript_file_path())?;
    Ok(serde_json::to_writer_pretty(out_file, transcript)?)
}

/// Corpus used when no words.json is available yet.
pub fn seed_corpus() -> WordDictionary {
    loregen::build(SEED_TEXT)
}

const SEED_TEXT: &str = "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do \
    eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, \
    quis nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat. \
    Duis aute irure dolor in reprehenderit in voluptate velit esse cillum dolore eu \
    fugiat nulla pariatur. Excepteur sint occaecat cupidatat non proident, sunt in culpa \
    qui officia deserunt mollit anim id est laborum.";

fn ensure_dir_created(path: &Path) -> Result<()> {
    let dir = path.parent().expect("Parent directory");
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create {}", &dir.to_string_lossy()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn corpus_roundtrip() {
        let _ = env_logger::builder().is_test(true).try_init();
        let tmp = TempDir::new("ipsumbot_store").unwrap();
        let path = tmp.path().join("words.json");
        let dictionary = seed_corpus();
        store_corpus(&path, &dictionary).unwrap();
        assert_eq!(load_corpus(&path).unwrap(), dictionary);
    }

    #[test]
    fn corpus_with_violated_invariants_is_rejected() {
        let tmp = TempDir::new("ipsumbot_store").unwrap();
        let path = tmp.path().join("words.json");
        std::fs::write(&path, r#"{"4":["cat"]}"#).unwrap();
        assert!(load_corpus(&path).is_err());
    }

    #[test]
    fn missing_corpus_is_an_error() {
        let tmp = TempDir::new("ipsumbot_store").unwrap();
        assert!(load_corpus(&tmp.path().join("words.json")).is_err());
    }

    #[test]
    fn seed_corpus_is_usable() {
        let dictionary = seed_corpus();
        assert_eq!(dictionary.validate(), Ok(()));
        assert!(!dictionary.is_empty());
    }
}
