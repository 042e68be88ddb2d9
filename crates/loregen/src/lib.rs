use std::time::Duration;

use ipsumbot_model::WordDictionary;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

mod dictionary;

pub use dictionary::build;

/// Fixed word-length prior, percent per length 1..=16. Short words common,
/// long words rare, independent of what the corpus actually contains.
const LENGTH_WEIGHTS: [u32; 16] = [5, 7, 9, 13, 20, 13, 9, 5, 4, 4, 3, 2, 2, 2, 1, 1];

/// Typing latency floor applied to every response.
const TYPING_FLOOR: Duration = Duration::from_millis(2500);

/// Responses longer than this get a comma at the halfway countdown.
const COMMA_THRESHOLD: usize = 8;

/// Attempts at avoiding an immediate word repeat before accepting one.
const MAX_REPEAT_RETRIES: usize = 32;

/// Attempts at sampling a length present in the dictionary before falling
/// back to a uniform draw over the lengths that are there.
const MAX_LENGTH_RESAMPLES: usize = 32;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerateError {
    #[error("word dictionary is empty")]
    EmptyDictionary,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    pub text: String,
    pub typing: Duration,
}

/// Synthesizes a reply to `message`: capitalized first word, single spaces,
/// an optional comma, and a terminal `.`, `?` or `!`. The typing delay
/// scales with the response length.
pub fn respond(message: &str, dictionary: &WordDictionary) -> Result<Response, GenerateError> {
    respond_with(&mut rand::thread_rng(), message, dictionary)
}

pub fn respond_with<R: Rng>(
    rng: &mut R,
    message: &str,
    dictionary: &WordDictionary,
) -> Result<Response, GenerateError> {
    if dictionary.is_empty() {
        return Err(GenerateError::EmptyDictionary);
    }

    // Short messages get short responses: at most two words more than the
    // incoming message.
    let message_words = message.split(' ').count();
    let num_words = ((rng.gen::<f64>() * (message_words + 2) as f64).ceil() as usize).max(1);
    let comma_at = (num_words > COMMA_THRESHOLD).then(|| num_words.div_ceil(2));
    let typing = TYPING_FLOOR
        + Duration::from_millis((rng.gen::<f64>() * ((num_words + 1) * 1000) as f64).ceil() as u64);

    let mut words: Vec<&str> = Vec::with_capacity(num_words);
    for _ in 0..num_words {
        let word = pick_word(rng, dictionary, words.last().copied())
            .ok_or(GenerateError::EmptyDictionary)?;
        words.push(word);
    }

    debug!("Responding with {num_words} words after {typing:?}");
    Ok(Response {
        text: assemble(&words, comma_at, sample_punctuation(rng)),
        typing,
    })
}

/// Draws a word length in 1..=16 from the fixed frequency prior: a uniform
/// integer in 0..=99 walked along the cumulative weights.
pub fn sample_length<R: Rng>(rng: &mut R) -> usize {
    let draw = rng.gen_range(0..100u32);
    let mut bound = 0;
    for (i, weight) in LENGTH_WEIGHTS.iter().enumerate() {
        bound += weight;
        if draw <= bound {
            return i + 1;
        }
    }
    LENGTH_WEIGHTS.len()
}

/// 80% period, 10% question mark, 10% exclamation mark.
pub fn sample_punctuation<R: Rng>(rng: &mut R) -> char {
    match rng.gen_range(1..=10) {
        9 => '?',
        10 => '!',
        _ => '.',
    }
}

fn pick_word<'a, R: Rng>(
    rng: &mut R,
    dictionary: &'a WordDictionary,
    previous: Option<&str>,
) -> Option<&'a str> {
    let mut candidate = None;
    for _ in 0..MAX_REPEAT_RETRIES {
        let length = sample_present_length(rng, dictionary)?;
        let word = dictionary.words_of(length)?.choose(rng)?;
        candidate = Some(word.as_str());
        if !previous.is_some_and(|p| p.eq_ignore_ascii_case(word)) {
            return candidate;
        }
    }
    // Retries exhausted on a one-word corpus: the repeat stands.
    candidate
}

fn sample_present_length<R: Rng>(rng: &mut R, dictionary: &WordDictionary) -> Option<usize> {
    for _ in 0..MAX_LENGTH_RESAMPLES {
        let length = sample_length(rng);
        if dictionary.words_of(length).is_some() {
            return Some(length);
        }
    }
    // Corpus with no words at the common lengths: draw from what is there.
    let lengths: Vec<usize> = dictionary.lengths().collect();
    lengths.choose(rng).copied()
}

fn assemble(words: &[&str], comma_at: Option<usize>, punctuation: char) -> String {
    let mut text = String::new();
    let mut countdown = words.len();
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            text.push_str(&capitalize(word));
        } else {
            text.push(' ');
            text.push_str(word);
        }
        if comma_at == Some(countdown) {
            text.push(',');
        }
        countdown -= 1;
    }
    text.push(punctuation);
    text
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn lorem_dictionary() -> WordDictionary {
        build(
            "Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do \
             eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut enim \
             ad minim veniam, quis nostrud exercitation ullamco laboris nisi ut \
             aliquip ex ea commodo consequat.",
        )
    }

    fn tiny_dictionary() -> WordDictionary {
        build("ok no cat")
    }

    #[test]
    fn length_histogram_matches_weights() {
        const DRAWS: usize = 100_000;
        let mut rng = rand::thread_rng();
        let mut counts = [0usize; 17];
        for _ in 0..DRAWS {
            let length = sample_length(&mut rng);
            assert!((1..=16).contains(&length));
            counts[length] += 1;
        }
        for (i, weight) in LENGTH_WEIGHTS.iter().enumerate() {
            let percent = counts[i + 1] as f64 * 100.0 / DRAWS as f64;
            let diff = (percent - *weight as f64).abs();
            assert!(
                diff <= 2.0,
                "length {}: {percent:.2}% vs declared {weight}%",
                i + 1
            );
        }
    }

    #[test]
    fn punctuation_distribution_is_80_10_10() {
        const DRAWS: usize = 10_000;
        let mut rng = rand::thread_rng();
        let mut periods = 0;
        let mut questions = 0;
        let mut exclamations = 0;
        for _ in 0..DRAWS {
            match sample_punctuation(&mut rng) {
                '.' => periods += 1,
                '?' => questions += 1,
                '!' => exclamations += 1,
                other => panic!("unexpected punctuation {other:?}"),
            }
        }
        assert!((7800..=8200).contains(&periods), "periods: {periods}");
        assert!((800..=1200).contains(&questions), "questions: {questions}");
        assert!(
            (800..=1200).contains(&exclamations),
            "exclamations: {exclamations}"
        );
    }

    #[test]
    fn responses_are_shaped_sentences() {
        let dictionary = lorem_dictionary();
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let response = respond_with(&mut rng, "hi", &dictionary).unwrap();

            let first = response.text.chars().next().unwrap();
            assert!(first.is_ascii_uppercase(), "text: {}", response.text);
            let last = response.text.chars().last().unwrap();
            assert!(".?!".contains(last), "text: {}", response.text);
            assert!(response.typing >= Duration::from_millis(2500));
            // "hi" is one word, so at most three words and 6500ms of typing
            assert!(response.text.split(' ').count() <= 3);
            assert!(response.typing <= Duration::from_millis(6500));
        }
    }

    #[test]
    fn every_token_is_a_dictionary_word() {
        let dictionary = lorem_dictionary();
        let known: HashSet<&str> = dictionary.words().collect();
        let message = "one two three four five six seven eight nine ten";
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let response = respond_with(&mut rng, message, &dictionary).unwrap();
            for token in response.text.split(' ') {
                let bare = token
                    .trim_end_matches(['.', '?', '!', ','])
                    .to_ascii_lowercase();
                assert!(
                    known.contains(bare.as_str()),
                    "{token:?} is not a corpus word in {:?}",
                    response.text
                );
            }
        }
    }

    #[test]
    fn no_immediate_word_repeats() {
        let dictionary = tiny_dictionary();
        let message = "a message that is long enough to force many words out";
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let response = respond_with(&mut rng, message, &dictionary).unwrap();
            let words: Vec<String> = response
                .text
                .split(' ')
                .map(|t| {
                    t.trim_end_matches(['.', '?', '!', ','])
                        .to_ascii_lowercase()
                })
                .collect();
            for pair in words.windows(2) {
                assert_ne!(pair[0], pair[1], "repeat in {:?}", response.text);
            }
        }
    }

    #[test]
    fn comma_lands_at_the_halfway_countdown() {
        let words = [
            "alpha", "bravo", "candy", "delta", "eagle", "fancy", "gamma", "happy", "india",
        ];
        let text = assemble(&words, Some(5), '.');
        assert_eq!(
            text,
            "Alpha bravo candy delta eagle, fancy gamma happy india."
        );
    }

    #[test]
    fn assemble_without_comma() {
        let text = assemble(&["lorem", "ipsum"], None, '?');
        assert_eq!(text, "Lorem ipsum?");
    }

    #[test]
    fn empty_dictionary_is_an_error() {
        let empty = WordDictionary::new();
        assert_eq!(
            respond("hi", &empty),
            Err(GenerateError::EmptyDictionary)
        );
    }

    #[test]
    fn sparse_corpus_still_responds() {
        // Both words are longer than the prior's 16-length ceiling, so only
        // the uniform fallback over present lengths can reach them.
        let dictionary = build("internationalization incomprehensibilities");
        let mut rng = StdRng::seed_from_u64(7);
        let response = respond_with(&mut rng, "hello there friend", &dictionary).unwrap();
        assert!(!response.text.is_empty());
    }
}
