use std::sync::Once;

use portal_core::{
    update, AppState, ArticleMutation, CategoryDraft, CategoryMutation, CurrentUser, Effect,
    ExportKind, GateState, GateView, MutationAction, Msg, RemoteFailure, RemoteFailureKind,
    PUBLIC_ENTRY,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(portal_logging::initialize_for_tests);
}

fn user(role: &str) -> CurrentUser {
    CurrentUser {
        id: Some("7".to_string()),
        name: None,
        role: role.to_string(),
    }
}

fn resolved(user: Option<CurrentUser>) -> AppState {
    let (state, _) = update(AppState::default(), Msg::Started);
    let (state, _) = update(state, Msg::AuthResolved(Ok(user)));
    state
}

#[test]
fn dashboard_waits_for_session_then_loads_stats() {
    init_logging();
    let (state, _) = update(AppState::default(), Msg::Started);
    assert_eq!(state.view().gate, GateState::Resolving);

    let (state, effects) = update(state, Msg::DashboardOpened);
    assert!(effects.is_empty());
    assert_eq!(state.view().admin, Some(GateView::Pending));

    let (state, effects) = update(state, Msg::AuthResolved(Ok(Some(user("admin")))));
    assert!(matches!(effects.as_slice(), [Effect::FetchStats { .. }]));
    assert!(matches!(state.view().admin, Some(GateView::Granted(_))));
}

#[test]
fn non_admin_is_sent_back_to_public_entry() {
    init_logging();
    let (state, _) = update(AppState::default(), Msg::Started);
    let (state, _) = update(state, Msg::DashboardOpened);
    let (state, effects) = update(state, Msg::AuthResolved(Ok(Some(user("editor")))));

    assert!(effects.is_empty());
    assert_eq!(state.view().gate, GateState::Denied);
    assert_eq!(state.view().admin, None);

    let (state, effects) = update(state, Msg::DashboardOpened);
    assert!(matches!(effects.as_slice(), [Effect::Notify(_)]));
    assert!(!state.is_dashboard_open());
    assert_eq!(PUBLIC_ENTRY, "/");
}

#[test]
fn failed_session_lookup_resolves_anonymous() {
    init_logging();
    let (state, _) = update(AppState::default(), Msg::Started);
    let failure = RemoteFailure::new(RemoteFailureKind::Rejected(401), "expired");
    let (state, effects) = update(state, Msg::AuthResolved(Err(failure)));

    assert!(matches!(effects.as_slice(), [Effect::Notify(_)]));
    assert_eq!(state.view().gate, GateState::Denied);
    assert!(state.auth().user().is_none());
}

#[test]
fn admin_commands_are_ignored_without_grant() {
    init_logging();
    let state = resolved(None);
    let (state, effects) = update(state, Msg::RunJobClicked);
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::ExportClicked(ExportKind::News));
    assert!(effects.is_empty());
    let (_, effects) = update(
        state,
        Msg::ArticleMutationRequested(ArticleMutation::Delete {
            id: "a".to_string(),
        }),
    );
    assert!(effects.is_empty());
}

#[test]
fn logout_closes_dashboard_and_revokes_grant() {
    init_logging();
    let state = resolved(Some(user("admin")));
    let (state, _) = update(state, Msg::DashboardOpened);
    assert!(state.is_dashboard_open());

    let (state, _) = update(state, Msg::LoggedOut);
    assert!(!state.is_dashboard_open());
    assert_eq!(state.view().gate, GateState::Denied);
    let (_, effects) = update(state, Msg::RunJobClicked);
    assert!(effects.is_empty());
}

#[test]
fn late_session_result_after_logout_is_ignored() {
    init_logging();
    let (state, _) = update(AppState::default(), Msg::Started);
    let (state, _) = update(state, Msg::LoggedOut);

    let (state, effects) = update(state, Msg::AuthResolved(Ok(Some(user("admin")))));
    assert!(effects.is_empty());
    assert_eq!(state.view().gate, GateState::Denied);
    let (state, effects) = update(state, Msg::RunJobClicked);
    assert!(effects.is_empty());

    let failure = RemoteFailure::new(RemoteFailureKind::NetworkFailure, "timed out");
    let (_, effects) = update(state, Msg::AuthResolved(Err(failure)));
    assert!(effects.is_empty());
}

#[test]
fn article_mutation_refreshes_listing() {
    init_logging();
    let state = resolved(Some(user("admin")));
    let mutation = ArticleMutation::Delete {
        id: "a".to_string(),
    };
    let (state, effects) = update(state, Msg::ArticleMutationRequested(mutation.clone()));
    assert_eq!(effects, vec![Effect::MutateArticle(mutation)]);

    let (_, effects) = update(
        state,
        Msg::ArticleMutated {
            action: MutationAction::Delete,
            result: Ok(None),
        },
    );
    assert!(matches!(
        effects.as_slice(),
        [Effect::Notify(_), Effect::FetchArticles { .. }]
    ));
}

#[test]
fn category_mutation_reloads_categories() {
    init_logging();
    let state = resolved(Some(user("admin")));
    let mutation = CategoryMutation::Create(CategoryDraft {
        name: "Economía".to_string(),
        description: None,
    });
    let (state, effects) = update(state, Msg::CategoryMutationRequested(mutation.clone()));
    assert_eq!(effects, vec![Effect::MutateCategory(mutation)]);

    let (_, effects) = update(
        state,
        Msg::CategoryMutated {
            action: MutationAction::Create,
            result: Ok(None),
        },
    );
    assert!(matches!(
        effects.as_slice(),
        [Effect::Notify(_), Effect::FetchCategories]
    ));
}
