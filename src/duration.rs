/// Normalizes a feed duration string to `HH:MM:SS`.
///
/// The feed delivers durations in three shapes: raw total seconds
/// ("5025"), `MM:SS`, or `H:MM:SS`. Anything unrecognizable collapses
/// to `"00:00:00"`; duration is best-effort metadata and must never
/// drop an episode.
pub fn normalize_duration(raw: &str) -> String {
    if raw.is_empty() {
        return "00:00:00".to_string();
    }

    if raw.bytes().all(|b| b.is_ascii_digit()) {
        return match raw.parse::<u64>() {
            Ok(total) => format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60),
            Err(_) => "00:00:00".to_string(),
        };
    }

    let parts: Vec<&str> = raw.split(':').collect();
    let valid = (parts.len() == 2 || parts.len() == 3)
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()));
    if !valid {
        return "00:00:00".to_string();
    }

    let mut fields: Vec<String> = parts
        .iter()
        .map(|p| {
            if p.len() < 2 {
                format!("0{}", p)
            } else {
                p.to_string()
            }
        })
        .collect();
    while fields.len() < 3 {
        fields.insert(0, "00".to_string());
    }
    fields.join(":")
}

/// Converts a `MM:SS` or `H:MM:SS` clock string to total seconds.
/// Any other shape, or a non-numeric part, yields 0.
pub fn time_to_seconds(text: &str) -> u32 {
    let parts: Option<Vec<u32>> = text.split(':').map(|p| p.parse().ok()).collect();
    match parts.as_deref() {
        Some([m, s]) => m.saturating_mul(60).saturating_add(*s),
        Some([h, m, s]) => h
            .saturating_mul(3600)
            .saturating_add(m.saturating_mul(60))
            .saturating_add(*s),
        _ => 0,
    }
}
