use actix_web::{
    http::{header, Method},
    route, web, HttpRequest, HttpResponse, Responder,
};
use clap::Parser;
use std::time::SystemTime;
use tokio::sync::Mutex;

pub mod cache;
pub mod chapters;
pub mod duration;
pub mod feed;

use cache::FeedSnapshot;
use feed::Episode;

#[derive(Parser, Debug)]
#[clap(about, version, author)]
pub struct Args {
    #[clap(short, long, default_value = "127.0.0.1")]
    pub ip: String,

    #[clap(short, long, default_value = "3000")]
    pub port: u16,

    #[clap(short, long, default_value = "https://media.rss.com/hitomlb/feed.xml")]
    pub feed_url: String,

    /// Upper bound in seconds on the upstream feed request.
    #[clap(short = 't', long, default_value = "15")]
    pub fetch_timeout: u64,
}

pub struct AppState {
    pub config: Args,
    pub snapshot: Mutex<FeedSnapshot>,
}

#[route("/api/episodes", method = "GET", method = "HEAD")]
async fn episodes(app_data: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    // The lock spans fetch, compare and reparse so concurrent requests
    // never see a half-updated snapshot or reparse the same bytes twice.
    let mut snapshot = app_data.snapshot.lock().await;

    match feed::fetch_feed(&app_data.config.feed_url, app_data.config.fetch_timeout).await {
        Ok(body) => {
            snapshot.apply(&body);
        }
        Err(e) => {
            log::warn!("feed fetch failed, serving last known episodes: {}", e);
        }
    }

    create_response(&req, &snapshot.episodes, snapshot.refreshed_at)
}

// Curated search suggestions for the frontend. Pure configuration.
const RECOMMENDED_KEYWORDS: [&str; 24] = [
    "洋基", "紅襪", "道奇", "大都會", "教士", "太空人",
    "勇士", "光芒", "水手", "雙城", "巨人", "白襪",
    "大谷翔平", "Judge", "Raleigh", "Soto", "Devers", "山本由伸",
    "Crochet", "Skubal", "Skenes", "Cole", "張育成", "鄭宗哲",
];

#[route("/api/recommended-keywords", method = "GET")]
async fn recommended_keywords() -> impl Responder {
    web::Json(RECOMMENDED_KEYWORDS)
}

fn create_response(req: &HttpRequest, list: &[Episode], refreshed_at: i64) -> HttpResponse {
    let last_modified = header::HttpDate::from(
        SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(refreshed_at.max(0) as u64),
    );
    let body = serde_json::to_string(list).unwrap_or_else(|_| "[]".to_string());

    let mut response = HttpResponse::Ok();
    response.insert_header((header::CONTENT_TYPE, "application/json"));
    response.insert_header((header::LAST_MODIFIED, last_modified.to_string()));

    if req.method() == Method::HEAD {
        response
            .insert_header((header::CONTENT_LENGTH, body.len()))
            .finish()
    } else {
        response.body(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn fetch_failure_serves_last_known_episodes() {
        let stale = Episode {
            title: "Hito 大聯盟 第 99 集".to_string(),
            link: String::new(),
            pub_date: "Feb 24, 2026 (Tue)".to_string(),
            audio_url: String::new(),
            duration: "00:00:00".to_string(),
            full_description: String::new(),
            chapters: Vec::new(),
        };
        let mut snapshot = FeedSnapshot::empty();
        snapshot.episodes = vec![stale.clone()];

        let app_state = web::Data::new(AppState {
            config: Args {
                ip: "127.0.0.1".to_string(),
                port: 0,
                // Nothing listens on port 1, so every fetch fails fast.
                feed_url: "http://127.0.0.1:1/feed.xml".to_string(),
                fetch_timeout: 1,
            },
            snapshot: Mutex::new(snapshot),
        });

        let app = test::init_service(App::new().app_data(app_state).service(episodes)).await;
        let req = test::TestRequest::get().uri("/api/episodes").to_request();
        let body = test::call_and_read_body(&app, req).await;

        let expected = serde_json::to_string(&vec![stale]).unwrap();
        assert_eq!(body.as_ref(), expected.as_bytes());
    }

    #[actix_web::test]
    async fn recommended_keywords_are_served_as_json() {
        let app = test::init_service(App::new().service(recommended_keywords)).await;
        let req = test::TestRequest::get()
            .uri("/api/recommended-keywords")
            .to_request();
        let keywords: Vec<String> = test::call_and_read_body_json(&app, req).await;

        assert_eq!(keywords.len(), 24);
        assert!(keywords.contains(&"大谷翔平".to_string()));
    }
}
