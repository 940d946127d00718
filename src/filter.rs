//! Blacklist filtering of out-of-band resources.
//!
//! Archives inject resources that were never part of the original page (analytics
//! beacons) and mark replayed resources that must not be negotiated with a `Link`
//! header. Neither says anything about capture quality, so both are removed before
//! scoring.

use crate::config::{header_value, DONOTNEGOTIATE_LINK, HEADER_LINK};
use crate::logs::Resource;

/// Whether a record is out-of-band.
///
/// A record is blacklisted when its URL starts with one of `prefixes`, or when its
/// `Link` header is exactly the `donotnegotiate` marker.
pub fn is_blacklisted<T: Resource>(log: &T, prefixes: &[String]) -> bool {
    if prefixes
        .iter()
        .any(|prefix| log.url().starts_with(prefix.as_str()))
    {
        return true;
    }
    header_value(log.headers(), HEADER_LINK) == Some(DONOTNEGOTIATE_LINK)
}

/// Removes blacklisted records, preserving the order of the rest.
///
/// # Arguments
///
/// * `logs` - Records of one log (images or stylesheets)
/// * `prefixes` - Blacklisted URL prefixes
///
/// # Returns
///
/// The surviving records and the number removed.
pub fn filter_blacklisted<T: Resource>(logs: Vec<T>, prefixes: &[String]) -> (Vec<T>, usize) {
    let before = logs.len();
    let kept: Vec<T> = logs
        .into_iter()
        .filter(|log| {
            let blacklisted = is_blacklisted(log, prefixes);
            if blacklisted {
                log::debug!("Blacklisted {}", log.url());
            }
            !blacklisted
        })
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}
