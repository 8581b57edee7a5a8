//! Pure matchers deciding whether two companies share an address or phone.
//!
//! Address comparison keys on the plot number: "Plot 45, Mombasa Road" and
//! "Plot 45B, Mombasa Rd" refer to the same plot, while street spelling and
//! suffix letters vary freely in registry data.

use once_cell::sync::Lazy;
use regex::Regex;

static PLOT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)plot\s*(\d+)").expect("plot pattern is valid"));

/// Extract the leading plot number from an address, if present. Letter
/// suffixes ("45A") are not part of the capture.
pub fn plot_number(address: &str) -> Option<u64> {
    PLOT_RE
        .captures(address)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Two addresses match iff both carry a plot number and the numbers are
/// equal. Symmetric by construction.
pub fn addresses_similar(a: &str, b: &str) -> bool {
    match (plot_number(a), plot_number(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Strip everything but digits.
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// Digit-exact phone equality. Phone fields with no digits at all never
/// match anything, themselves included.
pub fn phones_match(a: &str, b: &str) -> bool {
    let a = normalize_phone(a);
    !a.is_empty() && a == normalize_phone(b)
}
