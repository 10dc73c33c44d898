// System status display: model artifacts, mirror and pipeline settings.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;

/// Display system status to the terminal.
pub fn show(config: &Config) -> Result<()> {
    println!("Model directory: {}", config.model_dir.display());
    println!("  Classifier: {}", describe_file(&config.model_path()));
    println!("  Vocabulary: {}", describe_file(&config.vocabulary_path()));
    if !crate::model::download::model_files_present(&config.model_dir) {
        println!("  Run `moodcard download-model` to fetch the missing files");
    }

    match &config.model_url {
        Some(url) => println!("Model download URL: {url}"),
        None => println!("Model download URL: not set"),
    }

    println!("Model input: {} x {}", config.input_dtype, config.max_len);

    match &config.stop_words_path {
        Some(path) => println!("Stop words: {} ({})", path.display(), describe_file(path)),
        None => println!("Stop words: built-in English list"),
    }

    println!(
        "Mirror: {} (timeout {}s)",
        config.mirror_url,
        config.fetch_timeout.as_secs()
    );

    Ok(())
}

fn describe_file(path: &Path) -> String {
    match std::fs::metadata(path) {
        Ok(meta) => format_bytes(meta.len()),
        Err(_) => "missing".to_string(),
    }
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_describe_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(describe_file(&dir.path().join("nope")), "missing");
    }
}
