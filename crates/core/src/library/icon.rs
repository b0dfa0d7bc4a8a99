use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

static URI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://\S+$").expect("invalid icon uri regex")
});

/// Whether `reference` looks like an absolute URI such as `https://host/icon.png`.
pub fn is_uri(reference: &str) -> bool {
    URI_RE.is_match(reference)
}

/// Whether `reference` is something a host can load without further context:
/// an absolute URI or an absolute filesystem path.
pub fn is_absolute_reference(reference: &str) -> bool {
    if reference.trim().is_empty() || reference.contains('\0') {
        return false;
    }
    is_uri(reference) || Path::new(reference).is_absolute()
}
