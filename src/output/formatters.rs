//! Formatting utilities for terminal output

use std::time::Duration;

/// Lay words out in left-aligned columns no wider than `width`
#[must_use]
pub fn columns(words: &[String], width: usize) -> Vec<String> {
    let Some(cell) = words.iter().map(String::len).max().map(|len| len + 2) else {
        return Vec::new();
    };
    let per_line = (width / cell).max(1);

    words
        .chunks(per_line)
        .map(|row| {
            row.iter()
                .map(|w| format!("{w:<cell$}"))
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect()
}

/// Seconds with millisecond precision
#[must_use]
pub fn seconds(elapsed: Duration) -> String {
    format!("{:.3}", elapsed.as_secs_f64())
}
