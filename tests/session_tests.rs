// Session storage and forced-logout behavior.

use series_tracker::api::ApiClient;
use series_tracker::session::{Session, SessionStore};
use series_tracker::tui::app::App;
use series_tracker::tui::models::Screen;
use tempfile::tempdir;

fn session() -> Session {
    Session {
        token: "eyJ0oken".to_string(),
        username: "sofie".to_string(),
    }
}

#[test]
fn test_round_trip_through_store() {
    let dir = tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("session.json"));

    store.save(&session()).unwrap();
    assert_eq!(store.load(), Some(session()));
}

#[test]
fn test_missing_and_cleared_sessions_read_as_signed_out() {
    let dir = tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("session.json"));

    assert!(store.load().is_none());

    store.save(&session()).unwrap();
    store.clear().unwrap();
    store.clear().unwrap();
    assert!(store.load().is_none());
}

#[test]
fn test_app_without_session_starts_unauthenticated() {
    let dir = tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("session.json"));
    let app = App::new(ApiClient::new("http://localhost:4000"), store);

    assert_eq!(app.screen, Screen::Unauthenticated);
}

#[test]
fn test_forced_logout_ends_the_session_everywhere() {
    // What an authorization failure on any call triggers: credentials
    // gone, unauthenticated screen shown, open work discarded.
    let dir = tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("session.json"));
    store.save(&session()).unwrap();
    let mut app = App::new(ApiClient::new("http://localhost:4000"), store);
    app.open_create_form();
    assert_eq!(app.screen, Screen::SeriesForm);

    app.logout();

    assert_eq!(app.screen, Screen::Unauthenticated);
    assert!(app.session.is_none());
    assert!(app.form.is_none());
    assert!(app.session_store.load().is_none());
}

#[test]
fn test_reload_session_picks_up_a_new_record() {
    let dir = tempdir().unwrap();
    let store = SessionStore::new(dir.path().join("session.json"));
    let mut app = App::new(ApiClient::new("http://localhost:4000"), store);
    assert_eq!(app.screen, Screen::Unauthenticated);

    assert!(!app.reload_session());

    app.session_store.save(&session()).unwrap();
    assert!(app.reload_session());
    assert_eq!(app.screen, Screen::SeriesList);
    assert_eq!(app.session, Some(session()));
}
