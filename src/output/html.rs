// HTML card export.
//
// Renders predictions as a standalone HTML page of colored cards, green for
// Positive and red for Negative, so results can be shared outside the
// terminal. Post text comes from third parties and is always escaped.

use std::path::Path;

use anyhow::{Context, Result};

use crate::sentiment::analyzer::Prediction;
use crate::sentiment::decision::Sentiment;

const POSITIVE_COLOR: &str = "#4CAF50";
const NEGATIVE_COLOR: &str = "#F44336";

/// Card background color for a label.
pub fn card_color(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => POSITIVE_COLOR,
        Sentiment::Negative => NEGATIVE_COLOR,
    }
}

/// Escape text for use in HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render one card.
pub fn render_card(text: &str, sentiment: Sentiment) -> String {
    format!(
        r#"<div style="background-color: {color}; padding: 10px; border-radius: 10px; margin-bottom: 10px;">
    <h5 style="color: white;">{label} Sentiment</h5>
    <p style="color: white;">{text}</p>
</div>
"#,
        color = card_color(sentiment),
        label = sentiment.label(),
        text = escape_html(text),
    )
}

/// Render a full page of cards, in the order given.
pub fn render_page(title: &str, predictions: &[Prediction]) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    html.push_str("</head>\n<body style=\"max-width: 720px; margin: 2em auto; font-family: sans-serif;\">\n");
    html.push_str(&format!("<h1>{}</h1>\n", escape_html(title)));
    html.push_str(&format!(
        "<p style=\"color: #666;\">Generated {}</p>\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));

    if predictions.is_empty() {
        html.push_str("<p>No texts analyzed.</p>\n");
    }
    for prediction in predictions {
        html.push_str(&render_card(&prediction.text, prediction.sentiment));
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Write a card page to `path`, creating parent directories as needed.
/// Returns the path written, for display.
pub fn write_report(path: &Path, title: &str, predictions: &[Prediction]) -> Result<String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(path, render_page(title, predictions))
        .with_context(|| format!("Failed to write HTML report to {}", path.display()))?;

    Ok(path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(text: &str, score: f64) -> Prediction {
        Prediction {
            text: text.to_string(),
            cleaned: text.to_lowercase(),
            score,
            sentiment: Sentiment::from_score(score),
        }
    }

    #[test]
    fn test_card_colors() {
        assert!(render_card("yay", Sentiment::Positive).contains("#4CAF50"));
        assert!(render_card("boo", Sentiment::Negative).contains("#F44336"));
        assert!(render_card("boo", Sentiment::Negative).contains("Negative Sentiment"));
    }

    #[test]
    fn test_card_escapes_text() {
        let card = render_card("<script>alert('x')</script> & more", Sentiment::Positive);
        assert!(!card.contains("<script>"));
        assert!(card.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; more"));
    }

    #[test]
    fn test_page_preserves_order() {
        let page = render_page("Posts", &[prediction("first", 0.9), prediction("second", 0.2)]);
        let first = page.find("first").unwrap();
        let second = page.find("second").unwrap();
        assert!(first < second);
        assert_eq!(page.matches("<div style=").count(), 2);
    }

    #[test]
    fn test_empty_page_says_so() {
        assert!(render_page("Posts", &[]).contains("No texts analyzed."));
    }

    #[test]
    fn test_write_report_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("cards.html");
        write_report(&path, "Cards", &[prediction("fine", 0.6)]).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Positive Sentiment"));
    }
}
