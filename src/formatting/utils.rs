use colored::*;

use crate::models::IssuePriority;

pub fn format_priority(priority: IssuePriority) -> ColoredString {
    match priority {
        IssuePriority::High => "High".red(),
        IssuePriority::Medium => "Medium".yellow(),
        IssuePriority::Low => "Low".normal(),
    }
}

pub fn format_priority_indicator(priority: IssuePriority) -> ColoredString {
    match priority {
        IssuePriority::High => "!".red().bold(),
        IssuePriority::Medium => "!".yellow(),
        IssuePriority::Low => " ".normal(),
    }
}

/// Cuts `s` to at most `max_len` characters, ending in "..." when shortened.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let head: String = s.chars().take(keep).collect();
    format!("{}...", head)
}

/// Pads or truncates to an exact display width.
pub fn fit(s: &str, width: usize) -> String {
    let cut = truncate(s, width);
    format!("{:<width$}", cut, width = width)
}

pub fn clean_description(desc: &str) -> String {
    let first_line = desc
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("");

    let cleaned: String = first_line
        .trim()
        .chars()
        .filter(|c| !matches!(c, '*' | '_' | '`' | '#' | '>'))
        .collect();
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if trimmed.ends_with('.') || trimmed.ends_with('!') || trimmed.ends_with('?') {
        trimmed.to_string()
    } else {
        format!("{}.", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer title", 10), "a much ...");
        assert_eq!(truncate("ünïcödé title", 8), "ünïcö...");
    }

    #[test]
    fn test_fit_pads() {
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(fit("abcdefgh", 6), "abc...");
    }

    #[test]
    fn test_clean_description() {
        assert_eq!(clean_description("\n# Heading here\nmore"), "Heading here.");
        assert_eq!(clean_description("**Done!**"), "Done!");
        assert_eq!(clean_description("   "), "");
    }
}
