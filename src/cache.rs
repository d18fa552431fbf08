use chrono::Utc;
use sha2::{Digest, Sha256};

use crate::feed::{build_episode, Episode};

/// Last-known-good parse of the feed plus the fingerprint of the raw
/// bytes it came from. Exactly one instance lives in `AppState`, behind
/// a mutex held across the whole fetch-compare-reparse cycle.
pub struct FeedSnapshot {
    pub fingerprint: String,
    pub episodes: Vec<Episode>,
    /// Unix seconds of the last successful reparse, for `Last-Modified`.
    pub refreshed_at: i64,
}

impl FeedSnapshot {
    pub fn empty() -> Self {
        // Epoch until the first successful parse, so `Last-Modified`
        // never advertises content the process has not produced yet.
        FeedSnapshot {
            fingerprint: String::new(),
            episodes: Vec::new(),
            refreshed_at: 0,
        }
    }

    /// Runs one change-detection cycle over freshly fetched feed bytes.
    ///
    /// Returns `true` when the content changed and a reparse replaced the
    /// episode list. Returns `false` when the bytes were identical to the
    /// last cycle, or when they failed to parse as a feed. In both cases
    /// the stored episodes are left untouched, so callers always get the
    /// best data available.
    pub fn apply(&mut self, body: &[u8]) -> bool {
        let fingerprint = fingerprint(body);
        if fingerprint == self.fingerprint && !self.episodes.is_empty() {
            log::debug!(
                "feed unchanged, serving {} cached episodes",
                self.episodes.len()
            );
            return false;
        }

        let channel = match rss::Channel::read_from(body) {
            Ok(channel) => channel,
            Err(e) => {
                log::warn!("feed did not parse, keeping previous episodes: {}", e);
                return false;
            }
        };

        let episodes: Vec<Episode> = channel.items().iter().filter_map(build_episode).collect();
        log::info!("reparsed feed: {} episodes", episodes.len());

        self.fingerprint = fingerprint;
        self.episodes = episodes;
        self.refreshed_at = Utc::now().timestamp();
        true
    }
}

pub fn fingerprint(body: &[u8]) -> String {
    format!("{:x}", Sha256::digest(body))
}
