//! Offline range computation.
//!
//! Runs the range mapper on a template file and a document file, printing
//! the byte ranges of the document that are unchanged template content.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use template_overlay_core::{LineIndex, OffsetRange, Template, compute_template_ranges};

/// Execute the ranges command.
pub fn execute(template_path: &Path, document_path: &Path, json: bool) -> Result<()> {
    let template_text = std::fs::read_to_string(template_path)
        .with_context(|| format!("Failed to read template {}", template_path.display()))?;
    let document_text = std::fs::read_to_string(document_path)
        .with_context(|| format!("Failed to read document {}", document_path.display()))?;

    let name = template_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let template = Template::new(name, template_text);
    let ranges = compute_template_ranges(&template, &document_text);
    debug!(template = %template.name, count = ranges.len(), "Computed template ranges");

    if json {
        println!("{}", serde_json::to_string_pretty(&ranges)?);
    } else {
        print!("{}", format_ranges(&document_text, &ranges));
    }
    Ok(())
}

/// One line per range: the byte range, then its 1-based `line:column` span.
fn format_ranges(document_text: &str, ranges: &[OffsetRange]) -> String {
    let lines = LineIndex::new(document_text);
    let mut out = String::new();
    for range in ranges {
        let span = lines.range(document_text, *range);
        let _ = writeln!(
            out,
            "{range}\t{}:{}-{}:{}",
            span.start.line + 1,
            span.start.character + 1,
            span.end.line + 1,
            span.end.character + 1,
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_lists_byte_and_line_spans() {
        let ranges = vec![OffsetRange::new(0, 2), OffsetRange::new(4, 6)];
        assert_eq!(
            format_ranges("A\nX\nC\n", &ranges),
            "0..2\t1:1-2:1\n4..6\t3:1-4:1\n"
        );
    }

    #[test]
    fn format_counts_columns_in_utf16_units() {
        let ranges = vec![OffsetRange::new(0, 3), OffsetRange::new(5, 8)];
        assert_eq!(
            format_ranges("é\nx\nñ\n", &ranges),
            "0..3\t1:1-2:1\n5..8\t3:1-4:1\n"
        );
    }

    #[test]
    fn format_without_ranges_is_empty() {
        assert_eq!(format_ranges("A\n", &[]), "");
    }
}
