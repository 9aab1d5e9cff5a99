//! Retention store display formatting
//!
//! Formats the versions present in a retention store as a table.

use std::fs;

use crate::models::RetentionEntry;

/// Format the listing of one store, one row per stored version
pub fn format_store_listing(listing: &[(String, Vec<RetentionEntry>)]) -> String {
    if listing.is_empty() {
        return "  (nothing tracked)\n".to_string();
    }

    let name_width = listing
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "  {:<name_width$}  {:<10}  {:>10}\n",
        "Item",
        "Generation",
        "Size",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "  {:-<name_width$}  {:-<10}  {:->10}\n",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for (name, entries) in listing {
        if entries.is_empty() {
            output.push_str(&format!(
                "  {:<name_width$}  {:<10}  {:>10}\n",
                name,
                "-",
                "-",
                name_width = name_width,
            ));
            continue;
        }

        for entry in entries {
            let size = fs::metadata(&entry.path)
                .map(|m| format_size(m.len()))
                .unwrap_or_else(|_| "?".to_string());
            output.push_str(&format!(
                "  {:<name_width$}  {:<10}  {:>10}\n",
                name,
                entry.generation.to_string(),
                size,
                name_width = name_width,
            ));
        }
    }

    output
}

/// Format a byte count for humans
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Generation;
    use std::path::PathBuf;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_listing_shows_missing_items() {
        let listing = vec![
            (
                "notes.txt".to_string(),
                vec![RetentionEntry {
                    base_name: "notes.txt".into(),
                    generation: Generation::Number(0),
                    path: PathBuf::from("/nonexistent/notes.txt.0"),
                }],
            ),
            ("site".to_string(), Vec::new()),
        ];

        let output = format_store_listing(&listing);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].contains("notes.txt") && lines[2].contains('0'));
        assert!(lines[3].starts_with("  site"));
    }
}
