use colored::Colorize;

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Render an optional value, dimmed "-" when unset
pub fn or_dash(value: Option<impl ToString>) -> String {
    value.map_or_else(|| "-".dimmed().to_string(), |v| v.to_string())
}

/// Join tags as `key=value` pairs
pub fn format_tags(tags: &azkit::Tags) -> String {
    tags.iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(Some(32)), "32");
        assert!(or_dash(None::<i32>).contains('-'));
    }

    #[test]
    fn test_format_tags() {
        let tags = azkit::Tags::from([
            ("b".to_string(), "2".to_string()),
            ("a".to_string(), "1".to_string()),
        ]);
        assert_eq!(format_tags(&tags), "a=1, b=2");
        assert_eq!(format_tags(&azkit::Tags::new()), "");
    }
}
