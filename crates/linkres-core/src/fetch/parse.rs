//! Parse HTTP response header lines.

/// Keeps only the header block of the last response.
///
/// With redirect following on, curl reports every response in the chain; each
/// block starts with a `HTTP/` status line.
pub fn final_response_headers(lines: &[String]) -> Vec<String> {
    let start = lines
        .iter()
        .rposition(|l| l.trim_start().starts_with("HTTP/"))
        .unwrap_or(0);
    lines[start..]
        .iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Case-insensitive lookup of a header value; the last occurrence wins.
pub fn header_value<'a>(lines: &'a [String], name: &str) -> Option<&'a str> {
    lines
        .iter()
        .rev()
        .filter_map(|line| line.split_once(':'))
        .find(|(n, _)| n.trim().eq_ignore_ascii_case(name))
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
}
