use std::collections::BTreeMap;

use ipsumbot_model::dictionary::is_word_char;
use ipsumbot_model::WordDictionary;
use itertools::Itertools;

/// Builds a word dictionary from raw free text: strips everything that is
/// not a word character, lowercases, deduplicates, sorts, and groups by
/// word length. Tokens that strip down to nothing are dropped.
pub fn build(raw_text: &str) -> WordDictionary {
    let mut groups: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    let words = raw_text
        .split_whitespace()
        .map(strip_token)
        .filter(|word| !word.is_empty())
        .sorted()
        .dedup();
    for word in words {
        groups.entry(word.len()).or_default().push(word);
    }
    WordDictionary::from(groups)
}

fn strip_token(token: &str) -> String {
    token
        .chars()
        .filter(|c| is_word_char(*c))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_by_length_sorted_and_deduplicated() {
        let dictionary = build("Hello, World! Hello again.");
        assert_eq!(dictionary.lengths().collect::<Vec<_>>(), vec![5]);
        assert_eq!(dictionary.words_of(5).unwrap(), ["again", "hello", "world"]);
    }

    #[test]
    fn built_dictionary_upholds_corpus_invariants() {
        let dictionary = build(
            "Lorem ipsum dolor sit amet, consectetur adipiscing elit, \
             sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.",
        );
        assert_eq!(dictionary.validate(), Ok(()));
        for length in dictionary.lengths() {
            for word in dictionary.words_of(length).unwrap() {
                assert_eq!(word.len(), length);
            }
        }
    }

    #[test]
    fn keeps_digits_and_underscores() {
        let dictionary = build("snake_case 42nd");
        assert_eq!(dictionary.words_of(4).unwrap(), ["42nd"]);
        assert_eq!(dictionary.words_of(10).unwrap(), ["snake_case"]);
    }

    #[test]
    fn case_folds_before_deduplication() {
        let dictionary = build("Ipsum ipsum IPSUM");
        assert_eq!(dictionary.words_of(5).unwrap(), ["ipsum"]);
        assert_eq!(dictionary.word_count(), 1);
    }

    #[test]
    fn drops_tokens_with_no_word_characters() {
        let dictionary = build("--- ... !?! word");
        assert_eq!(dictionary.word_count(), 1);
        assert_eq!(dictionary.words_of(4).unwrap(), ["word"]);
    }

    #[test]
    fn empty_input_yields_empty_dictionary() {
        assert!(build("").is_empty());
        assert!(build("   \t\n  ").is_empty());
    }

    #[test]
    fn building_twice_is_identical() {
        let text = "The quick brown fox jumps over the lazy dog.";
        assert_eq!(build(text), build(text));
    }
}
