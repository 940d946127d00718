//! Utility functions.
//!
//! This module provides:
//! - String sanitization for error messages reported with results
//! - MD5 hashing of URIs, used to name cache files

pub mod sanitize;

use md5::{Digest, Md5};

/// Hex MD5 digest of a URI, the key of every cache file the crawler writes for it.
pub fn hash_uri(uri: &str) -> String {
    hex::encode(Md5::digest(uri.as_bytes()))
}
