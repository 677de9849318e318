//! Some useful tools for the project.
//!
//! Usually, you don't need to use this module directly.
//! [`crate::client::RequestHandler`] will automatically use these tools.

use std::env::consts::{ARCH, OS};
use std::sync::LazyLock;

/// The default `User-Agent`, e.g. `safebooru/0.1.0 (linux x86_64)`.
///
/// You can consider this as cache of the crate name, version and host platform.
pub static USER_AGENT: LazyLock<String> = LazyLock::new(|| {
    format!(
        "{}/{} ({OS} {ARCH})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
    )
});

/// Return the first value of `key` in the query string of `url`.
pub(crate) fn query_value(url: &reqwest::Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}
