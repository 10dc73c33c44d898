// Unit tests for the inference adapter pieces: padding, vocabulary lookup
// and the decision threshold.

use std::collections::HashMap;

use moodcard::sentiment::decision::Sentiment;
use moodcard::sentiment::sequence::{pad_sequence, DEFAULT_MAX_LEN, PAD_VALUE};
use moodcard::sentiment::traits::Vocabulary;
use moodcard::sentiment::vocabulary::WordIndex;

// ============================================================
// Decision threshold
// ============================================================

#[test]
fn score_of_exactly_half_is_negative() {
    assert_eq!(Sentiment::from_score(0.5), Sentiment::Negative);
}

#[test]
fn score_just_above_half_is_positive() {
    assert_eq!(Sentiment::from_score(0.50001), Sentiment::Positive);
}

#[test]
fn decision_is_monotonic_across_range() {
    let labels: Vec<Sentiment> = (0..=100)
        .map(|i| Sentiment::from_score(i as f64 / 100.0))
        .collect();
    let first_positive = labels.iter().position(|s| s.is_positive()).unwrap();
    assert_eq!(first_positive, 51);
    assert!(labels[first_positive..].iter().all(|s| s.is_positive()));
}

// ============================================================
// Padding
// ============================================================

#[test]
fn padded_length_is_always_max_len() {
    let l = DEFAULT_MAX_LEN;
    for n in [0, 1, l, 2 * l] {
        let seq: Vec<i64> = (1..=n as i64).collect();
        assert_eq!(pad_sequence(&seq, l).len(), l, "{n} tokens");
    }
}

#[test]
fn padding_goes_at_the_front() {
    let padded = pad_sequence(&[42], DEFAULT_MAX_LEN);
    assert!(padded[..DEFAULT_MAX_LEN - 1].iter().all(|&t| t == PAD_VALUE));
    assert_eq!(padded[DEFAULT_MAX_LEN - 1], 42);
}

#[test]
fn truncation_drops_the_oldest_tokens() {
    let seq: Vec<i64> = (1..=200).collect();
    let padded = pad_sequence(&seq, DEFAULT_MAX_LEN);
    assert_eq!(padded[0], 101);
    assert_eq!(padded[DEFAULT_MAX_LEN - 1], 200);
}

#[test]
fn empty_sequence_is_all_padding() {
    assert_eq!(pad_sequence(&[], 3), vec![PAD_VALUE; 3]);
}

// ============================================================
// Vocabulary
// ============================================================

fn word_index(pairs: &[(&str, i64)]) -> HashMap<String, i64> {
    pairs.iter().map(|(w, i)| (w.to_string(), *i)).collect()
}

#[test]
fn sequence_preserves_word_order() {
    let vocab = WordIndex::new(word_index(&[("a", 1), ("b", 2), ("c", 3)]), None, None);
    assert_eq!(vocab.texts_to_sequence("c a b a"), vec![3, 1, 2, 1]);
}

#[test]
fn empty_cleaned_text_gives_empty_sequence() {
    let vocab = WordIndex::new(word_index(&[("a", 1)]), None, Some("a"));
    assert!(vocab.texts_to_sequence("").is_empty());
}

#[test]
fn keras_tokenizer_json_round_trips_through_lookup() {
    let json = r##"{
        "class_name": "Tokenizer",
        "config": {
            "num_words": 3,
            "filters": "!\"#$%&()*+,-./:;<=>?@[\\]^_`{|}~\t\n",
            "lower": true,
            "split": " ",
            "char_level": false,
            "oov_token": "<OOV>",
            "document_count": 2,
            "word_index": "{\"<OOV>\": 1, \"love\": 2, \"hate\": 3}"
        }
    }"##;
    let vocab = WordIndex::from_json(json).unwrap();

    // "hate" has index 3, which is not below num_words = 3
    assert_eq!(vocab.texts_to_sequence("love hate pizza"), vec![2, 1, 1]);
}

#[test]
fn load_reads_tokenizer_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tokenizer.json");
    std::fs::write(&path, r#"{"good": 7}"#).unwrap();

    let vocab = WordIndex::load(&path).unwrap();
    assert_eq!(vocab.lookup("good"), Some(7));
    assert_eq!(vocab.lookup("bad"), None);
}
