use std::fmt::Write as _;

use portal_core::{
    source_name, AppViewModel, Article, DashboardView, GateView, JobOutcome, JobRunState,
    ListingStatus, ListingView, Notification, NotificationLevel,
};

const SUMMARY_CHARS: usize = 96;

pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    render_listing(&mut out, view);
    if let Some(article) = &view.detail {
        render_detail(&mut out, article);
    }
    match &view.admin {
        None => {}
        Some(GateView::Pending) => out.push_str("\n[dashboard] checking session...\n"),
        Some(GateView::Redirect(target)) => {
            let _ = writeln!(out, "\n[dashboard] not available, back to {target}");
        }
        Some(GateView::Granted(dashboard)) => render_dashboard(&mut out, dashboard, view),
    }
    out
}

pub fn render_notification(notification: &Notification) -> String {
    let tag = match notification.level {
        NotificationLevel::Info => "info",
        NotificationLevel::Success => "ok",
        NotificationLevel::Warning => "warn",
        NotificationLevel::Error => "error",
    };
    format!("[{tag}] {}", notification.text)
}

fn render_listing(out: &mut String, view: &AppViewModel) {
    let listing = &view.listing;
    let _ = writeln!(out, "== News ({}) ==", status_label(listing));
    let _ = writeln!(out, "{}", filter_line(listing, view));

    if let Some(error) = &listing.last_error {
        let _ = writeln!(out, "! {error}");
    }
    if listing.visible.is_empty() && listing.status == ListingStatus::Ready {
        out.push_str("  (no articles)\n");
    }
    for article in &listing.visible {
        let date = article
            .timeline_date()
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "----------".to_string());
        let _ = writeln!(
            out,
            "  {date}  {:<24} {}  [{}]",
            truncate(&article.title, 24),
            source_name(article),
            article.id
        );
    }

    let page = listing.page_info;
    let _ = writeln!(
        out,
        "Page {} of {} ({} total){}{}",
        page.current_page,
        page.total_pages,
        page.total,
        if page.has_previous { "  prev" } else { "" },
        if page.has_next { "  next" } else { "" },
    );
}

fn status_label(listing: &ListingView) -> &'static str {
    match listing.status {
        ListingStatus::Idle => "idle",
        ListingStatus::Fetching => "loading",
        ListingStatus::Ready => "ready",
        ListingStatus::Error => "error",
    }
}

fn filter_line(listing: &ListingView, view: &AppViewModel) -> String {
    let category = listing
        .query
        .category_id()
        .map(|id| {
            view.categories
                .iter()
                .find(|category| category.id == id)
                .map(|category| category.name.clone())
                .unwrap_or_else(|| id.to_string())
        })
        .unwrap_or_else(|| "all".to_string());
    let source = listing
        .view_state
        .selected_source
        .as_deref()
        .unwrap_or("all");
    let sources = if listing.facet.is_empty() {
        String::new()
    } else {
        format!(" ({})", listing.facet.join(", "))
    };
    format!(
        "search: \"{}\" | category: {category} | source: {source}{sources} | sort: {}",
        listing.raw_search,
        listing.view_state.sort_order.as_str()
    )
}

fn render_detail(out: &mut String, article: &Article) {
    let _ = writeln!(out, "\n-- {} --", article.title);
    let _ = writeln!(out, "source: {}", source_name(article));
    if let Some(date) = article.timeline_date() {
        let _ = writeln!(out, "date: {}", date.format("%Y-%m-%d %H:%M"));
    }
    if let Some(category) = &article.category {
        let _ = writeln!(out, "category: {}", category.name);
    }
    if let Some(summary) = article.summary.as_deref().filter(|text| !text.is_empty()) {
        let _ = writeln!(out, "{}", truncate(summary, SUMMARY_CHARS));
    }
    let _ = writeln!(out, "{}", article.content);
    if let Some(url) = &article.source_url {
        let _ = writeln!(out, "read more: {url}");
    }
}

fn render_dashboard(out: &mut String, dashboard: &DashboardView, view: &AppViewModel) {
    out.push_str("\n== Dashboard ==\n");
    match &dashboard.stats {
        Some(stats) => {
            let _ = writeln!(
                out,
                "articles: {} (original {}, scraped {}) | categories: {}",
                stats.total_articles,
                stats.original_count,
                stats.scraped_count,
                stats.category_count
            );
        }
        None if dashboard.stats_loading => out.push_str("loading stats...\n"),
        None => out.push_str("stats unavailable\n"),
    }
    if dashboard.stats_loading && dashboard.stats.is_some() {
        out.push_str("refreshing stats...\n");
    }

    let job = match dashboard.job {
        JobRunState::Idle => "idle".to_string(),
        JobRunState::Running => "running".to_string(),
        JobRunState::Settled(outcome) => format!("finished, {}", outcome_label(outcome)),
    };
    let _ = writeln!(out, "scraping job: {job}");
    if let (JobRunState::Idle, Some(outcome)) = (dashboard.job, dashboard.last_outcome) {
        let _ = writeln!(out, "last run: {}", outcome_label(outcome));
    }

    if !view.exports_pending.is_empty() {
        let pending: Vec<&str> = view.exports_pending.iter().map(|kind| kind.as_str()).collect();
        let _ = writeln!(out, "exporting: {}", pending.join(", "));
    }
}

fn outcome_label(outcome: JobOutcome) -> String {
    match outcome {
        JobOutcome::Success { accepted } => format!("{accepted} new articles"),
        JobOutcome::Failure => "failed".to_string(),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use portal_core::{update, AppState, CurrentUser, Msg, ResultPage, StatsSnapshot};
    use serde_json::json;

    fn article(id: &str, title: &str, source: &str) -> Article {
        serde_json::from_value(json!({
            "_id": id,
            "title": title,
            "content": "body",
            "sourceName": source,
            "publishedAt": "2024-03-01T10:00:00Z"
        }))
        .unwrap()
    }

    fn loaded_state() -> AppState {
        let (state, effects) = update(AppState::new(12), Msg::Started);
        let seq = effects
            .iter()
            .find_map(|effect| match effect {
                portal_core::Effect::FetchArticles { seq, .. } => Some(*seq),
                _ => None,
            })
            .unwrap();
        let (state, _) = update(
            state,
            Msg::ArticlesLoaded {
                seq,
                result: Ok(ResultPage {
                    items: vec![article("a1", "Harbour reopens", "Reuters")],
                    total_pages: 2,
                    current_page: 1,
                    total: 13,
                }),
            },
        );
        state
    }

    #[test]
    fn listing_shows_rows_and_pagination() {
        let text = render(&loaded_state().view());
        assert!(text.contains("Harbour reopens"));
        assert!(text.contains("Reuters"));
        assert!(text.contains("Page 1 of 2 (13 total)  next"));
        assert!(!text.contains("Dashboard"));
    }

    #[test]
    fn granted_dashboard_shows_stats() {
        let (state, _) = update(
            loaded_state(),
            Msg::AuthResolved(Ok(Some(CurrentUser {
                id: None,
                name: Some("root".to_string()),
                role: "admin".to_string(),
            }))),
        );
        let (state, effects) = update(state, Msg::DashboardOpened);
        let seq = effects
            .iter()
            .find_map(|effect| match effect {
                portal_core::Effect::FetchStats { seq } => Some(*seq),
                _ => None,
            })
            .unwrap();
        let (state, _) = update(
            state,
            Msg::StatsLoaded {
                seq,
                result: Ok(StatsSnapshot {
                    total_articles: 25,
                    original_count: 10,
                    scraped_count: 15,
                    category_count: 3,
                }),
            },
        );
        let text = render(&state.view());
        assert!(text.contains("articles: 25 (original 10, scraped 15) | categories: 3"));
        assert!(text.contains("scraping job: idle"));
    }

    #[test]
    fn notifications_are_tagged_by_level() {
        assert_eq!(
            render_notification(&Notification::error("boom")),
            "[error] boom"
        );
    }

    #[test]
    fn long_titles_are_truncated() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
