//! HTTP redirect chain resolution.
//!
//! The crawler logs every exchange separately, so a resource fetched through a
//! redirect shows up under its request URL with a 302 status while the content lives
//! under another URL. This module follows the logged `Location` headers and moves
//! each record onto the final URL of its chain, carrying the final status.

use std::collections::{HashMap, HashSet};

use url::Url;

use crate::config::{header_value, HEADER_LOCATION, REDIRECT_STATUS};
use crate::logs::{GenericLog, Resource};

/// All logged exchanges, indexed by URL.
///
/// Keeps first-seen order for `Location` suffix lookup; a URL logged twice keeps its
/// last record.
pub struct RedirectUniverse<'a> {
    order: Vec<&'a str>,
    by_url: HashMap<&'a str, &'a GenericLog>,
}

impl<'a> RedirectUniverse<'a> {
    pub fn new(logs: &'a [GenericLog]) -> Self {
        let mut order = Vec::with_capacity(logs.len());
        let mut by_url = HashMap::with_capacity(logs.len());
        for log in logs {
            if by_url.insert(log.url.as_str(), log).is_none() {
                order.push(log.url.as_str());
            }
        }
        RedirectUniverse { order, by_url }
    }

    pub fn get(&self, url: &str) -> Option<&'a GenericLog> {
        self.by_url.get(url).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Maps a `Location` value onto a known URL.
    ///
    /// The first known URL (other than `current`) ending with `location` wins. Failing
    /// that, a relative `location` joined onto `current` is used if that URL is known.
    /// Otherwise the literal `location` is returned.
    pub fn resolve_location(&self, current: &str, location: &str) -> String {
        if let Some(known) = self
            .order
            .iter()
            .find(|url| **url != current && url.ends_with(location))
        {
            return known.to_string();
        }

        if let Ok(joined) = Url::parse(current).and_then(|base| base.join(location)) {
            if self.by_url.contains_key(joined.as_str()) {
                return joined.to_string();
            }
        }

        location.to_string()
    }
}

/// One step of a redirect chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectHop {
    pub url: String,
    /// `None` when the URL was never logged
    pub status_code: Option<u16>,
}

/// Hops from a request URL to where its redirects end.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RedirectChain {
    pub hops: Vec<RedirectHop>,
    /// The walk stopped because a URL came back around
    pub looped: bool,
}

impl RedirectChain {
    pub fn first(&self) -> Option<&RedirectHop> {
        self.hops.first()
    }

    pub fn last(&self) -> Option<&RedirectHop> {
        self.hops.last()
    }

    /// Whether the chain ends somewhere other than where it started.
    pub fn is_redirected(&self) -> bool {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => first.url != last.url,
            _ => false,
        }
    }
}

/// Follows logged redirects from `start`.
///
/// A hop is followed only when its status is 302 and it has a non-empty `Location`.
/// A URL missing from the universe ends the chain as a hop with unknown status. A
/// URL seen twice ends the walk at the current hop, so the walk visits each known URL
/// at most once.
pub fn follow_redirects(start: &str, universe: &RedirectUniverse<'_>) -> RedirectChain {
    let mut chain = RedirectChain::default();
    let mut visited: HashSet<String> = HashSet::new();
    let mut current = start.to_string();

    loop {
        if !visited.insert(current.clone()) {
            log::warn!(
                "Redirect loop from {} back to {}, stopping at {}",
                start,
                current,
                chain.last().map(|hop| hop.url.as_str()).unwrap_or(start)
            );
            chain.looped = true;
            break;
        }

        let Some(log) = universe.get(&current) else {
            if !current.is_empty() {
                chain.hops.push(RedirectHop {
                    url: current,
                    status_code: None,
                });
            }
            break;
        };

        chain.hops.push(RedirectHop {
            url: current.clone(),
            status_code: log.status_code,
        });

        if log.status_code != Some(REDIRECT_STATUS) {
            break;
        }

        match header_value(&log.headers, HEADER_LOCATION).map(str::trim) {
            Some(location) if !location.is_empty() => {
                current = universe.resolve_location(&current, location);
            }
            _ => {
                log::debug!("Redirect status for {} but no Location header", current);
                break;
            }
        }
    }

    chain
}

/// Records after redirect resolution.
#[derive(Debug)]
pub struct ResolvedLogs<T> {
    pub records: Vec<T>,
    /// Records moved onto another URL
    pub collapsed: usize,
    /// Walks stopped by a redirect loop
    pub loops: usize,
}

/// Collapses redirect chains in `targets` onto their final URLs.
///
/// Targets are de-duplicated by URL (the last record wins, at the first position).
/// Every redirected record takes the final URL and status of its chain, and the
/// target that was logged under that final URL is dropped so the resource is counted
/// once. When several chains end at the same URL, only the first of their records
/// (in target order) is kept. A final URL whose own record was moved elsewhere (only
/// possible in a loop) is kept.
///
/// # Arguments
///
/// * `targets` - Image, multimedia or stylesheet records
/// * `universe` - Every logged exchange
pub fn resolve_redirects<T: Resource>(
    targets: Vec<T>,
    universe: &RedirectUniverse<'_>,
) -> ResolvedLogs<T> {
    let mut order: Vec<String> = Vec::with_capacity(targets.len());
    let mut by_url: HashMap<String, T> = HashMap::with_capacity(targets.len());
    for target in targets {
        let url = target.url().to_string();
        if by_url.insert(url.clone(), target).is_none() {
            order.push(url);
        }
    }

    let mut final_urls: Vec<String> = Vec::new();
    let mut rewritten: HashSet<String> = HashSet::new();
    let mut loops = 0;

    for url in &order {
        let chain = follow_redirects(url, universe);
        if chain.looped {
            loops += 1;
        }
        if !chain.is_redirected() {
            continue;
        }
        let Some(last) = chain.last() else {
            continue;
        };
        if let Some(record) = by_url.get_mut(url) {
            log::debug!(
                "Resolved {} -> {} ({} hops, final status {:?})",
                url,
                last.url,
                chain.hops.len(),
                last.status_code
            );
            record.redirect_to(last.url.clone(), last.status_code);
            rewritten.insert(url.clone());
            final_urls.push(last.url.clone());
        }
    }

    for final_url in &final_urls {
        if !rewritten.contains(final_url) {
            by_url.remove(final_url);
        }
    }

    // Chains that converge leave several records on one final URL; the first stays.
    let mut claimed: HashSet<String> = HashSet::new();
    let mut records: Vec<T> = Vec::with_capacity(order.len());
    for url in order {
        let Some(record) = by_url.remove(&url) else {
            continue;
        };
        if claimed.insert(record.url().to_string()) {
            records.push(record);
        } else {
            log::debug!("Dropping {}, already resolved onto {}", url, record.url());
        }
    }

    ResolvedLogs {
        records,
        collapsed: rewritten.len(),
        loops,
    }
}
