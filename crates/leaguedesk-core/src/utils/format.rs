use chrono::NaiveDate;

/// Format a height in inches for display, e.g. 73 -> 6'1"
pub fn format_height(inches: Option<i64>) -> String {
    match inches {
        Some(total) if total > 0 => format!("{}'{}\"", total / 12, total % 12),
        _ => String::new(),
    }
}

/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a schedule date string (YYYY-MM-DD) for sheet headers.
/// Anything unparseable is returned as-is.
pub fn format_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d") {
        Ok(d) => d.format("%a, %b %-d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Lowercase, dash-separated form of a label, safe for filenames
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}
