//! Drives the real update loop against a mock backend, going through the
//! same effect planning and event mapping the terminal front end uses.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use portal_app::platform::{map_event, plan, Planned};
use portal_core::{update, AppState, ExportKind, GateView, Msg, Notification};
use portal_engine::{execute, ExportSaver, GatewaySettings, HttpGateway};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    gateway: HttpGateway,
    saver: ExportSaver,
    notes: Vec<Notification>,
}

impl Harness {
    /// Applies `msg` and runs every resulting effect until nothing is left.
    async fn drive(&mut self, state: AppState, msg: Msg) -> AppState {
        let mut state = state;
        let mut inbox = VecDeque::from([msg]);
        while let Some(msg) = inbox.pop_front() {
            let (next, effects) = update(state, msg);
            state = next;
            for effect in effects {
                match plan(effect) {
                    Planned::Engine(command) => {
                        let event = execute(&self.gateway, &self.saver, command).await;
                        inbox.push_back(map_event(event));
                    }
                    Planned::Debounce(text) => inbox.push_back(Msg::SearchSettled(text)),
                    Planned::Notify(note) => self.notes.push(note),
                }
            }
        }
        state
    }
}

fn news_item(id: u32) -> Value {
    json!({
        "_id": format!("n{id}"),
        "title": format!("Story {id}"),
        "content": "...",
        "sourceName": if id % 2 == 0 { "Reuters" } else { "AP" },
        "publishedAt": format!("2024-04-{:02}T08:00:00Z", id % 28 + 1),
        "type": if id % 5 == 0 { "original" } else { "scraped" },
    })
}

fn stats_body(total: u64, scraped: u64) -> Value {
    json!({
        "success": true,
        "data": {
            "totalNews": total,
            "originalNews": total - scraped,
            "scrapedNews": scraped,
            "totalCategories": 3
        }
    })
}

async fn backend() -> MockServer {
    let server = MockServer::start().await;
    for page in 1..=3u32 {
        let first = (page - 1) * 12 + 1;
        let last = (page * 12).min(25);
        Mock::given(method("GET"))
            .and(path("/api/news"))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {
                    "news": (first..=last).map(news_item).collect::<Vec<_>>(),
                    "pagination": {"total": 25, "page": page, "totalPages": 3}
                }
            })))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                {"_id": "c1", "name": "World"},
                {"_id": "c2", "name": "Sports"},
                {"_id": "c3", "name": "Tech"}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/profile"))
        .and(header("authorization", "Bearer admin-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"user": {"_id": "u1", "username": "editor", "role": "admin"}}
        })))
        .mount(&server)
        .await;
    server
}

fn harness(server: &MockServer, export_dir: &std::path::Path) -> Harness {
    let gateway = HttpGateway::new(GatewaySettings {
        base_url: format!("{}/api", server.uri()),
        bearer_token: Some("admin-token".to_string()),
        ..GatewaySettings::default()
    })
    .unwrap();
    let clock = Arc::new(|| Utc.timestamp_millis_opt(1_714_000_000_000).unwrap());
    Harness {
        gateway,
        saver: ExportSaver::new(export_dir.to_path_buf(), clock),
        notes: Vec::new(),
    }
}

#[tokio::test]
async fn start_loads_first_page_categories_and_session() {
    let server = backend().await;
    let temp = tempfile::TempDir::new().unwrap();
    let mut harness = harness(&server, temp.path());

    let state = harness.drive(AppState::new(12), Msg::Started).await;
    let view = state.view();

    assert_eq!(view.listing.visible.len(), 12);
    assert_eq!(view.listing.page_info.total_pages, 3);
    assert_eq!(view.listing.page_info.total, 25);
    assert_eq!(view.categories.len(), 3);
    assert_eq!(view.listing.facet, vec!["AP".to_string(), "Reuters".to_string()]);
    assert!(state.auth().status().is_admin);

    let state = harness.drive(state, Msg::PageRequested(3)).await;
    let view = state.view();
    assert_eq!(view.listing.visible.len(), 1);
    assert_eq!(view.listing.visible[0].id, "n25");
    assert!(!view.listing.page_info.has_next);
}

#[tokio::test]
async fn scraping_job_refreshes_stats_from_the_server() {
    let server = backend().await;
    Mock::given(method("GET"))
        .and(path("/api/scraper/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stats_body(25, 20)))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/scraper/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stats_body(29, 24)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/scraper/run"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Scraping completed",
            "data": {"newsScraped": 4}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let temp = tempfile::TempDir::new().unwrap();
    let mut harness = harness(&server, temp.path());
    let state = harness.drive(AppState::new(12), Msg::Started).await;
    let state = harness.drive(state, Msg::DashboardOpened).await;

    let view = state.view();
    let Some(GateView::Granted(dashboard)) = &view.admin else {
        panic!("dashboard should be granted, got {:?}", view.admin);
    };
    assert_eq!(dashboard.stats.map(|stats| stats.total_articles), Some(25));

    let state = harness.drive(state, Msg::RunJobClicked).await;
    let view = state.view();
    let dashboard = view.admin.as_ref().and_then(GateView::granted).unwrap();
    assert_eq!(dashboard.stats.map(|stats| stats.total_articles), Some(29));
    assert_eq!(dashboard.stats.map(|stats| stats.scraped_count), Some(24));
    assert!(harness
        .notes
        .iter()
        .any(|note| note.text == "Scraping finished: 4 new articles"));
}

#[tokio::test]
async fn export_is_saved_under_a_timestamped_name() {
    let server = backend().await;
    Mock::given(method("GET"))
        .and(path("/api/scraper/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stats_body(25, 20)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/export/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_string("id,name\nc1,World\n"))
        .mount(&server)
        .await;

    let temp = tempfile::TempDir::new().unwrap();
    let mut harness = harness(&server, temp.path());
    let state = harness.drive(AppState::new(12), Msg::Started).await;
    let state = harness.drive(state, Msg::DashboardOpened).await;
    let state = harness
        .drive(state, Msg::ExportClicked(ExportKind::Categories))
        .await;

    let saved = temp.path().join("categories_1714000000000.csv");
    assert_eq!(
        std::fs::read_to_string(&saved).unwrap(),
        "id,name\nc1,World\n"
    );
    assert!(state.view().exports_pending.is_empty());
    assert!(harness
        .notes
        .iter()
        .any(|note| note.text.starts_with("Exported categories to")));
}

#[tokio::test]
async fn typed_search_is_sent_once_settled() {
    let server = backend().await;
    Mock::given(method("GET"))
        .and(path("/api/news"))
        .and(query_param("search", "harbour"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "news": [news_item(7)],
                "pagination": {"total": 1, "page": 1, "totalPages": 1}
            }
        })))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    let temp = tempfile::TempDir::new().unwrap();
    let mut harness = harness(&server, temp.path());
    let state = harness.drive(AppState::new(12), Msg::Started).await;
    let state = harness
        .drive(state, Msg::SearchTyped("harbour".to_string()))
        .await;

    let view = state.view();
    assert_eq!(view.listing.query.search_text(), "harbour");
    assert_eq!(view.listing.visible.len(), 1);
    assert_eq!(view.listing.page_info.total_pages, 1);
}
