//! Printable HTML block for the summary.
//!
//! The print stylesheet hides everything on the page except `#printable`, so
//! the browser's print dialog outputs only the summary.

const PRINT_STYLE: &str = r#"<style>
  body { font-family: Arial, Helvetica, sans-serif; margin: 2em; }
  @media print {
    body * { visibility: hidden; }
    #printable, #printable * { visibility: visible; }
    #printable { position: absolute; left: 0; top: 0; }
  }
</style>"#;

/// Wrap summary text in a standalone printable HTML document.
pub fn printable_html(summary: &str) -> String {
    let body = escape_html(summary).replace('\n', "<br>\n");
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<title>AVS Summary</title>\n{PRINT_STYLE}\n</head>\n<body>\n<div id=\"printable\">\n<h3>Generated AVS Summary</h3>\n<p>{body}</p>\n</div>\n</body>\n</html>\n"
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newlines_become_breaks() {
        let html = printable_html("Line one\nLine two");
        assert!(html.contains("<div id=\"printable\">"));
        assert!(html.contains("<h3>Generated AVS Summary</h3>"));
        assert!(html.contains("<p>Line one<br>\nLine two</p>"));
        assert!(html.contains("@media print"));
    }

    #[test]
    fn summary_text_is_escaped() {
        let html = printable_html("Potassium <5.0 & \"stable\"");
        assert!(html.contains("Potassium &lt;5.0 &amp; &quot;stable&quot;"));
        assert!(!html.contains("<5.0"));
    }
}
