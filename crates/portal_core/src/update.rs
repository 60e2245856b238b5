use crate::{
    AppState, Effect, FetchTicket, GateState, JobSettlement, Msg, MutationAction, Notification,
    PageApplied, RemoteFailure, StatsApplied,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => {
            let ticket = state.listing_mut().refresh();
            state.mark_dirty();
            vec![Effect::ResolveAuth, Effect::FetchCategories, fetch(ticket)]
        }
        Msg::AuthResolved(result) => {
            let mut effects = Vec::new();
            let user = match result {
                Ok(user) => user,
                Err(failure) => {
                    effects.push(Effect::Notify(Notification::warning(format!(
                        "Could not verify session: {failure}"
                    ))));
                    None
                }
            };
            // A result arriving after logout belongs to a torn-down session.
            if !state.auth_mut().resolve(user) {
                return (state, Vec::new());
            }
            if state.is_dashboard_open() {
                match state.auth().gate() {
                    GateState::Granted => {
                        let seq = state.dashboard_mut().request_stats();
                        effects.push(Effect::FetchStats { seq });
                    }
                    GateState::Denied => state.set_dashboard_open(false),
                    GateState::Resolving => {}
                }
            }
            state.mark_dirty();
            effects
        }
        Msg::LoggedOut => {
            state.logout();
            state.mark_dirty();
            vec![Effect::Notify(Notification::info("Logged out"))]
        }

        Msg::SearchTyped(raw) => {
            if raw == state.listing().raw_search() {
                return (state, Vec::new());
            }
            state.listing_mut().type_search(&raw);
            state.mark_dirty();
            vec![Effect::DebounceSearch(raw)]
        }
        Msg::SearchSettled(settled) => {
            let ticket = state.listing_mut().settle_search(&settled);
            fetch_if_changed(&mut state, ticket)
        }
        Msg::CategorySelected(category_id) => {
            let ticket = state.listing_mut().select_category(category_id);
            fetch_if_changed(&mut state, ticket)
        }
        Msg::PageRequested(page) => match state.listing_mut().go_to_page(page) {
            Ok(ticket) => fetch_if_changed(&mut state, ticket),
            Err(err) => vec![Effect::Notify(Notification::error(err.to_string()))],
        },
        Msg::NextPageClicked => {
            let ticket = state.listing_mut().next_page();
            fetch_if_changed(&mut state, ticket)
        }
        Msg::PreviousPageClicked => {
            let ticket = state.listing_mut().previous_page();
            fetch_if_changed(&mut state, ticket)
        }
        Msg::SourceSelected(source) => {
            if state.listing_mut().select_source(source) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SortOrderChanged(order) => {
            if state.listing_mut().set_sort_order(order) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::FiltersReset => {
            let ticket = state.listing_mut().reset_filters();
            state.mark_dirty();
            ticket.map(fetch).into_iter().collect()
        }
        Msg::RefreshRequested => {
            let ticket = state.listing_mut().refresh();
            state.mark_dirty();
            vec![fetch(ticket)]
        }
        Msg::ArticlesLoaded { seq, result } => match state.listing_mut().apply_page(seq, result) {
            PageApplied::Stale => Vec::new(),
            PageApplied::Loaded => {
                state.mark_dirty();
                Vec::new()
            }
            PageApplied::Failed(failure) => {
                state.mark_dirty();
                vec![notify_failure("Failed to load articles", &failure)]
            }
        },
        Msg::CategoriesLoaded(result) => match result {
            Ok(categories) => {
                state.set_categories(categories);
                state.mark_dirty();
                Vec::new()
            }
            Err(failure) => vec![notify_failure("Failed to load categories", &failure)],
        },

        Msg::ArticleOpened(id) => {
            let seq = state.detail_mut().open(id.clone());
            state.mark_dirty();
            vec![Effect::FetchArticle { seq, id }]
        }
        Msg::ArticleLoaded { seq, result } => {
            if !state.detail_mut().accept(seq) {
                return (state, Vec::new());
            }
            match result {
                Ok(article) => {
                    state.detail_mut().show(article);
                    state.mark_dirty();
                    Vec::new()
                }
                Err(failure) => {
                    state.detail_mut().close();
                    state.mark_dirty();
                    vec![notify_failure("Failed to load article", &failure)]
                }
            }
        }
        Msg::ArticleClosed => {
            state.detail_mut().close();
            state.mark_dirty();
            Vec::new()
        }

        Msg::DashboardOpened => {
            if state.is_dashboard_open() {
                return (state, Vec::new());
            }
            state.mark_dirty();
            match state.auth().gate() {
                GateState::Granted => {
                    state.set_dashboard_open(true);
                    let seq = state.dashboard_mut().request_stats();
                    vec![Effect::FetchStats { seq }]
                }
                // Stats are requested once the session resolves.
                GateState::Resolving => {
                    state.set_dashboard_open(true);
                    Vec::new()
                }
                GateState::Denied => vec![Effect::Notify(Notification::error(
                    "Administrator access required",
                ))],
            }
        }
        Msg::DashboardClosed => {
            if state.is_dashboard_open() {
                state.set_dashboard_open(false);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RunJobClicked => {
            if !state.is_admin() {
                return (state, Vec::new());
            }
            match state.dashboard_mut().run_job() {
                Ok(()) => {
                    state.mark_dirty();
                    vec![
                        Effect::Notify(Notification::info("Scraping job started")),
                        Effect::TriggerJob,
                    ]
                }
                Err(_) => Vec::new(),
            }
        }
        Msg::JobSettled(result) => match state.dashboard_mut().settle_job(result) {
            JobSettlement::Ignored => Vec::new(),
            JobSettlement::Succeeded {
                accepted,
                stats_seq,
            } => {
                state.mark_dirty();
                vec![
                    Effect::Notify(Notification::success(format!(
                        "Scraping finished: {accepted} new articles"
                    ))),
                    Effect::FetchStats { seq: stats_seq },
                ]
            }
            JobSettlement::Failed(failure) => {
                state.mark_dirty();
                vec![notify_failure("Scraping failed", &failure)]
            }
        },
        Msg::StatsLoaded { seq, result } => {
            let applied = state.dashboard_mut().apply_stats(seq, result);
            state.mark_dirty();
            match applied {
                StatsApplied::Stale | StatsApplied::Loaded => Vec::new(),
                StatsApplied::Failed(failure) => {
                    vec![notify_failure("Failed to load statistics", &failure)]
                }
            }
        }
        Msg::ExportClicked(kind) => {
            if !state.is_admin() || !state.begin_export(kind) {
                return (state, Vec::new());
            }
            state.mark_dirty();
            vec![Effect::ExportCsv(kind)]
        }
        Msg::ExportSettled { kind, result } => {
            state.finish_export(kind);
            state.mark_dirty();
            match result {
                Ok(path) => vec![Effect::Notify(Notification::success(format!(
                    "Exported {kind} to {}",
                    path.display()
                )))],
                Err(failure) => vec![notify_failure(&format!("Export of {kind} failed"), &failure)],
            }
        }
        Msg::ArticleMutationRequested(mutation) => {
            if !state.is_admin() {
                return (state, Vec::new());
            }
            vec![Effect::MutateArticle(mutation)]
        }
        Msg::ArticleMutated { action, result } => match result {
            Ok(_) => {
                let ticket = state.listing_mut().refresh();
                state.mark_dirty();
                vec![
                    Effect::Notify(Notification::success(format!("Article {action}"))),
                    fetch(ticket),
                ]
            }
            Err(failure) => vec![notify_failure(&mutation_context("article", action), &failure)],
        },
        Msg::CategoryMutationRequested(mutation) => {
            if !state.is_admin() {
                return (state, Vec::new());
            }
            vec![Effect::MutateCategory(mutation)]
        }
        Msg::CategoryMutated { action, result } => match result {
            Ok(_) => vec![
                Effect::Notify(Notification::success(format!("Category {action}"))),
                Effect::FetchCategories,
            ],
            Err(failure) => vec![notify_failure(&mutation_context("category", action), &failure)],
        },
    };

    (state, effects)
}

fn fetch(ticket: FetchTicket) -> Effect {
    Effect::FetchArticles {
        seq: ticket.seq,
        query: ticket.query,
    }
}

fn fetch_if_changed(state: &mut AppState, ticket: Option<FetchTicket>) -> Vec<Effect> {
    match ticket {
        Some(ticket) => {
            state.mark_dirty();
            vec![fetch(ticket)]
        }
        None => Vec::new(),
    }
}

fn notify_failure(context: &str, failure: &RemoteFailure) -> Effect {
    Effect::Notify(Notification::error(format!("{context}: {failure}")))
}

fn mutation_context(entity: &str, action: MutationAction) -> String {
    let verb = match action {
        MutationAction::Create => "create",
        MutationAction::Update => "update",
        MutationAction::Delete => "delete",
    };
    format!("Could not {verb} {entity}")
}
