/// Reduce a raw query to the term to search for.
///
/// Returns `None` when there is nothing to search, in which case the caller
/// must skip the search entirely. A configured `keyword` prefix is stripped
/// case-insensitively, together with one following space.
pub fn normalize(raw: Option<&str>, keyword: Option<&str>) -> Option<String> {
    let mut term = raw?.trim();
    if term.is_empty() {
        return None;
    }

    if let Some(keyword) = keyword.filter(|k| !k.is_empty()) {
        term = strip_keyword(term, keyword).trim();
    }

    if term.is_empty() {
        None
    } else {
        Some(term.to_string())
    }
}

fn strip_keyword<'a>(term: &'a str, keyword: &str) -> &'a str {
    match strip_prefix_ignore_case(term, keyword) {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => term,
    }
}

fn strip_prefix_ignore_case<'a>(term: &'a str, prefix: &str) -> Option<&'a str> {
    let mut rest = term;
    for expected in prefix.chars() {
        let mut chars = rest.chars();
        let actual = chars.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
        rest = chars.as_str();
    }
    Some(rest)
}
