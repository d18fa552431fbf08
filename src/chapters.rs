use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::duration::time_to_seconds;

/// Sponsor link that precedes the chapter listing in most show notes.
pub const SPONSOR_LINK: &str = "www.zeczec.com/projects/hitomlb";
/// Header of the discussion section, used when the sponsor link is absent.
pub const TOPIC_ANCHOR: &str = "本集討論";

// A chapter title must be strictly longer than this many characters.
const MIN_TITLE_CHARS: usize = 1;

lazy_static! {
    static ref BR_TAG: Regex = Regex::new(r"<br\s*/?>").unwrap();
    static ref ANY_TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref TIMESTAMP: Regex = Regex::new(r"\(((?:\d{1,2}:)?\d{1,2}:\d{2})\)").unwrap();
    static ref LEADING_PUNCT: Regex = Regex::new(r"^[，。、；;：:\s]+").unwrap();
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub title: String,
    pub timestamp: String,
    pub start_seconds: u32,
}

/// Extracts timestamped chapters from raw show-notes HTML.
///
/// Chapters are parenthesized clock values like `(12:34)` or `(1:02:03)`;
/// the title of each is the free text between it and the previous one.
/// Output order is appearance order in the text; out-of-order timestamps
/// are kept as written, with no chronological validation.
pub fn extract_chapters(html: &str) -> Vec<Chapter> {
    let clean = strip_markup(html);

    // The chapter listing reliably follows the sponsor link or the
    // discussion header; scanning earlier text would pick up timestamps
    // from ad reads.
    let window = match clean.find(SPONSOR_LINK) {
        Some(pos) => &clean[pos + SPONSOR_LINK.len()..],
        None => match clean.find(TOPIC_ANCHOR) {
            Some(pos) => &clean[pos..],
            None => clean.as_str(),
        },
    };

    let mut chapters = Vec::new();
    let mut last_end = 0;
    for caps in TIMESTAMP.captures_iter(window) {
        let matched = caps.get(0).unwrap();
        let clock = &caps[1];

        let title = clean_title(&window[last_end..matched.start()]);
        last_end = matched.end();

        // Link-only fragments and stray punctuation in front of a
        // timestamp are noise, not a chapter.
        if title.chars().count() > MIN_TITLE_CHARS && !title.starts_with("http") {
            chapters.push(Chapter {
                title,
                timestamp: clock.to_string(),
                start_seconds: time_to_seconds(clock),
            });
        }
    }
    chapters
}

/// Reduces HTML to plain text, keeping relative ordering: `<br>` becomes
/// a newline, every other tag a space, `&nbsp;` a literal space.
fn strip_markup(html: &str) -> String {
    let text = BR_TAG.replace_all(html, "\n");
    let text = ANY_TAG.replace_all(&text, " ");
    text.replace("&nbsp;", " ")
}

fn clean_title(fragment: &str) -> String {
    let mut title = fragment.replace('\n', " ").trim().to_string();
    if let Some(pos) = title.find(TOPIC_ANCHOR) {
        title = title[pos + TOPIC_ANCHOR.len()..].trim().to_string();
    }
    LEADING_PUNCT.replace(&title, "").trim().to_string()
}
