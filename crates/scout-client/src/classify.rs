//! Rate-limit detection for free-text failures.
//!
//! The scouting service forwards upstream model errors as plain strings in
//! `error` events, so a quota failure arrives without a 429 status. These
//! markers are the ones the upstream emits; matching is case-sensitive.

const RATE_LIMIT_MARKERS: [&str; 3] = ["429", "RESOURCE_EXHAUSTED", "quota"];

/// `true` if `message` carries one of the upstream quota markers.
#[must_use]
pub fn is_rate_limit_message(message: &str) -> bool {
    RATE_LIMIT_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}
