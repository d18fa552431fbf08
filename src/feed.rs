use std::error::Error;
use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use reqwest::header::{HeaderMap, USER_AGENT};
use serde::Serialize;

use crate::chapters::{extract_chapters, Chapter};
use crate::duration::normalize_duration;

/// Only feed items whose title starts with this marker are show episodes;
/// the feed also carries trailers and announcements.
pub const EPISODE_PREFIX: &str = "Hito 大聯盟 第";

lazy_static! {
    // The publisher embeds the display date in the show notes behind a
    // fixed label. When present it is ground truth; the feed-level date
    // can drift in timezone and formatting.
    static ref DATE_LABEL: Regex = Regex::new(r"日期：\s*([^<\n|]+)").unwrap();
}

fn build_user_agent() -> HeaderMap {
    let custom_user_agent =
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/133.0.0.0 Safari/537.36";

    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, custom_user_agent.parse().unwrap());
    headers
}

/// Fetches the raw feed document. The timeout bounds the whole request
/// so a hung remote cannot stall callers; a timeout is an ordinary fetch
/// failure and the cache serves the last known result.
pub async fn fetch_feed(url: &str, timeout_secs: u64) -> Result<Vec<u8>, Box<dyn Error>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    let body = client
        .get(url)
        .headers(build_user_agent())
        .send()
        .await?
        .bytes()
        .await?;

    Ok(body.to_vec())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub title: String,
    pub link: String,
    pub pub_date: String,
    pub audio_url: String,
    pub duration: String,
    pub full_description: String,
    pub chapters: Vec<Chapter>,
}

/// Maps one feed item to an [`Episode`], or `None` for items that are
/// not show episodes. Every field failure degrades to its default; no
/// item is ever dropped for bad metadata.
pub fn build_episode(item: &rss::Item) -> Option<Episode> {
    let title = item.title().unwrap_or("");
    if !title.trim().starts_with(EPISODE_PREFIX) {
        return None;
    }

    let html = item.description().unwrap_or("");
    let raw_duration = item
        .itunes_ext()
        .and_then(|ext| ext.duration())
        .unwrap_or("");

    Some(Episode {
        title: title.to_string(),
        link: item.link().unwrap_or("").to_string(),
        pub_date: extract_pub_date(html, item.pub_date()),
        audio_url: item
            .enclosure()
            .map(|e| e.url().to_string())
            .unwrap_or_default(),
        duration: normalize_duration(raw_duration),
        full_description: html.to_string(),
        chapters: extract_chapters(html),
    })
}

fn extract_pub_date(html: &str, feed_date: Option<&str>) -> String {
    if let Some(caps) = DATE_LABEL.captures(html) {
        let labeled = caps[1].trim();
        if !labeled.is_empty() {
            return labeled.to_string();
        }
    }
    feed_date.unwrap_or("").trim().to_string()
}
