//! HTTP header names and lookup.
//!
//! Header maps come straight from the crawler, so their keys keep whatever case the
//! browser reported. Lookups here are case-insensitive.

use std::collections::BTreeMap;

/// Location header (redirect target)
pub const HEADER_LOCATION: &str = "Location";
/// Link header (carries the `donotnegotiate` marker)
pub const HEADER_LINK: &str = "Link";

/// Returns the value of `name` in `headers`, ignoring case.
///
/// An exact-case match wins over a case-insensitive one.
pub fn header_value<'a>(headers: &'a BTreeMap<String, String>, name: &str) -> Option<&'a str> {
    if let Some(value) = headers.get(name) {
        return Some(value.as_str());
    }
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}
