// Unit tests for the text cleaner and stop-word handling.
//
// Property-style checks over small hand-picked input sets: inputs without
// letters, idempotence on already-cleaned text, and the built-in list.

use moodcard::text::normalize::clean_text;
use moodcard::text::stop_words::StopWords;

// ============================================================
// No letters in, nothing out
// ============================================================

#[test]
fn no_alphabetic_characters_cleans_to_empty() {
    let stops = StopWords::english();
    for input in [
        "",
        " ",
        "1234567890",
        "!!! ??? ...",
        "\t\n\r",
        "😀🎉🔥",
        "日本語のテキスト",
        "$100 @ 5% #42",
    ] {
        assert_eq!(clean_text(input, &stops), "", "input {input:?}");
    }
}

// ============================================================
// Idempotence
// ============================================================

#[test]
fn cleaning_is_idempotent_without_stop_words() {
    let stops = StopWords::empty();
    for input in [
        "I love this, it's amazing!",
        "Worst. Service. EVER!!!",
        "mixed123CASE and_underscores",
        "café naïve résumé",
    ] {
        let once = clean_text(input, &stops);
        let twice = clean_text(&once, &stops);
        assert_eq!(once, twice, "input {input:?}");
    }
}

#[test]
fn cleaning_is_idempotent_with_stop_words() {
    // Stop words are removed on the first pass, so the second finds none
    let stops = StopWords::english();
    let once = clean_text("This is the best day of the year!", &stops);
    assert_eq!(clean_text(&once, &stops), once);
}

#[test]
fn cleaned_output_is_lowercase_letters_and_single_spaces() {
    let cleaned = clean_text("  Hello,   WORLD!\n\nGreat-day_2day  ", &StopWords::empty());
    assert_eq!(cleaned, "hello world great day day");
    assert!(cleaned
        .chars()
        .all(|c| c.is_ascii_lowercase() || c == ' '));
    assert!(!cleaned.contains("  "));
}

// ============================================================
// Stop words
// ============================================================

#[test]
fn english_list_removes_function_words() {
    let cleaned = clean_text("The pizza is in the oven", &StopWords::english());
    let tokens: Vec<&str> = cleaned.split(' ').collect();
    assert!(tokens.contains(&"pizza"));
    assert!(tokens.contains(&"oven"));
    assert!(!tokens.contains(&"the"));
    assert!(!tokens.contains(&"is"));
}

#[test]
fn custom_stop_words_are_matched_after_lowercasing() {
    let stops = StopWords::from_words(["Movie"]);
    assert_eq!(clean_text("Great MOVIE", &stops), "great");
}
