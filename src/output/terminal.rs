// Colored terminal cards.
//
// One card per analyzed text: a colored header naming the sentiment, the
// text itself, and the raw score underneath.

use colored::Colorize;

use crate::sentiment::analyzer::Prediction;
use crate::sentiment::decision::Sentiment;

/// Shown when a handle lookup comes back empty, whatever the cause.
pub const NO_POSTS_WARNING: &str = "No posts found or user may not exist on the mirror.";

/// Display a single prediction as a card.
pub fn display_card(prediction: &Prediction) {
    let header = format!(" {} Sentiment ", prediction.sentiment.label());
    println!();
    println!("  {}", colorize_header(&header, prediction.sentiment));

    let text = if prediction.text.trim().is_empty() {
        "(empty text)".dimmed().to_string()
    } else {
        prediction.text.clone()
    };
    for line in text.lines() {
        println!("  {} {}", bar(prediction.sentiment), line);
    }

    println!(
        "  {} {}",
        bar(prediction.sentiment),
        format!("score {:.3}", prediction.score).dimmed()
    );
}

/// Print the positive/negative tally after a batch of cards.
pub fn display_tally(predictions: &[Prediction]) {
    if predictions.len() < 2 {
        return;
    }

    let positive = predictions
        .iter()
        .filter(|p| p.sentiment.is_positive())
        .count();
    let negative = predictions.len() - positive;
    println!();
    println!(
        "  {} positive, {} negative",
        positive.to_string().green().bold(),
        negative.to_string().red().bold()
    );
}

/// Display a card for a text whose prediction failed.
pub fn display_failed_card(text: &str, error: &anyhow::Error) {
    println!();
    println!("  {}", " Analysis failed ".on_yellow().black().bold());
    println!("  {} {}", "|".yellow(), super::truncate_chars(text, 140));
    println!("  {} {}", "|".yellow(), format!("{error:#}").dimmed());
}

/// Print the warning shown when a handle lookup produced nothing.
pub fn display_no_posts_warning() {
    println!("{} {}", "Warning:".yellow(), NO_POSTS_WARNING);
}

fn colorize_header(header: &str, sentiment: Sentiment) -> colored::ColoredString {
    match sentiment {
        Sentiment::Positive => header.white().on_green().bold(),
        Sentiment::Negative => header.white().on_red().bold(),
    }
}

fn bar(sentiment: Sentiment) -> colored::ColoredString {
    match sentiment {
        Sentiment::Positive => "|".green(),
        Sentiment::Negative => "|".red(),
    }
}
