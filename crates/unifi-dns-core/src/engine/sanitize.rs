//! Display name → DNS label conversion

/// Maximum length of a single DNS label (RFC 1035)
pub const MAX_LABEL_LEN: usize = 63;

/// Characters dropped outright instead of becoming a separator,
/// so "O'Brien" reads "obrien" rather than "o-brien"
const APOSTROPHES: [char; 2] = ['\'', '\u{2019}'];

/// Convert a free-text client name into a DNS label
///
/// The name is lower-cased, apostrophes are removed, and every run of
/// characters outside `[a-z0-9]` collapses into a single hyphen. Leading and
/// trailing hyphens are trimmed and the result is cut to 63 characters.
///
/// Any input is accepted. The result may be empty (e.g. for `" "` or `"!!"`);
/// callers decide what an empty label means.
///
/// ```
/// use unifi_dns_core::engine::sanitize_label;
///
/// assert_eq!(sanitize_label("O'Brien's PC!!"), "obriens-pc");
/// assert_eq!(sanitize_label(" "), "");
/// ```
pub fn sanitize_label(name: &str) -> String {
    let mut label = String::with_capacity(name.len().min(MAX_LABEL_LEN));
    let mut pending_hyphen = false;

    // one char in, at most one char out: 'İ' lowers to plain 'i'
    for c in name.chars().map(|c| c.to_lowercase().next().unwrap_or(c)) {
        if APOSTROPHES.contains(&c) {
            continue;
        }

        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            // a hyphen is only emitted between two kept characters
            if pending_hyphen && !label.is_empty() {
                label.push('-');
            }
            pending_hyphen = false;
            label.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    // label is pure ASCII here, so byte truncation is safe
    if label.len() > MAX_LABEL_LEN {
        label.truncate(MAX_LABEL_LEN);
        while label.ends_with('-') {
            label.pop();
        }
    }

    label
}
