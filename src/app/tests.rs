use std::time::Duration;

use super::*;
use crate::store::mock::MockStore;
use crate::store::Progress;

const QUESTION_BANK: &str = "\
Topic,Question,OptionA,OptionB,OptionC,OptionD,CorrectAnswer,Difficulty
Physics,What is the SI unit of force?,Newton,Pascal,Joule,Watt,Newton,Easy
Physics,What particle carries a negative electric charge?,Proton,Neutron,Electron,Photon,Electron,Easy
Movies,Who directed Inception?,Spielberg,Nolan,Cameron,Scott,Nolan,Easy
";

fn test_app() -> (App<MockStore>, MockStore) {
    let store = MockStore::new();
    let app = App::new(Catalog::parse(QUESTION_BANK), store.clone());
    (app, store)
}

fn login(app: &mut App<MockStore>) {
    assert!(app.login("johndoe@gmail.com", "123abc!@").is_some());
}

#[test]
fn login_hydrates_persisted_progress() {
    let (mut app, store) = test_app();
    store.save_progress(
        "1",
        Progress {
            score: 50,
            completed_count: 5,
        },
    );
    login(&mut app);
    let user = app.current_user().unwrap();
    assert_eq!(user.score, 50);
    assert_eq!(user.quizzes_completed, 5);
    // The session marker was written.
    assert_eq!(store.saved_session().unwrap().id, "1");
}

#[test]
fn first_login_starts_from_zero() {
    let (mut app, _store) = test_app();
    login(&mut app);
    let user = app.current_user().unwrap();
    assert_eq!(user.score, 0);
    assert_eq!(user.quizzes_completed, 0);
}

#[test]
fn rejected_credentials_leave_no_user() {
    let (mut app, store) = test_app();
    assert!(app.login("johndoe@gmail.com", "wrong").is_none());
    assert!(app.current_user().is_none());
    assert!(store.saved_session().is_none());
}

#[test]
fn restores_a_persisted_session_at_startup() {
    let store = MockStore::new();
    {
        let mut app = App::new(Catalog::parse(QUESTION_BANK), store.clone());
        login(&mut app);
    }
    let app = App::new(Catalog::parse(QUESTION_BANK), store);
    assert_eq!(app.current_user().unwrap().name, "John Doe");
}

#[test]
fn submitting_a_quiz_updates_and_persists_progress() {
    let (mut app, store) = test_app();
    login(&mut app);
    app.start_quiz("1").unwrap();
    app.record_answer("q1", "Newton").unwrap();
    app.record_answer("q2", "Electron").unwrap();
    let attempt = app.submit_quiz().unwrap();
    assert_eq!(attempt.correct_count, 2);

    let user = app.current_user().unwrap();
    assert_eq!(user.score, 20);
    assert_eq!(user.quizzes_completed, 1);
    assert_eq!(
        store.saved_progress("1"),
        Some(Progress {
            score: 20,
            completed_count: 1,
        })
    );
    // The persisted profile reflects the new totals too.
    assert_eq!(store.saved_session().unwrap().score, 20);
}

#[test]
fn progress_accumulates_across_logout_login_cycles() {
    let (mut app, _store) = test_app();
    for _ in 0..2 {
        login(&mut app);
        app.start_quiz("1").unwrap();
        app.record_answer("q1", "Newton").unwrap();
        app.submit_quiz().unwrap();
        app.logout();
    }
    login(&mut app);
    let user = app.current_user().unwrap();
    assert_eq!(user.score, 20);
    assert_eq!(user.quizzes_completed, 2);
}

#[test]
fn quiz_timeout_grades_through_the_same_path() {
    let (mut app, store) = test_app();
    login(&mut app);
    app.start_quiz("1").unwrap();
    app.record_answer("q1", "Newton").unwrap();
    app.tick(Duration::from_secs(180));
    assert!(app.active_quiz().is_none());
    assert_eq!(app.last_attempt().unwrap().correct_count, 1);
    assert_eq!(
        store.saved_progress("1"),
        Some(Progress {
            score: 10,
            completed_count: 1,
        })
    );
}

#[test]
fn starting_an_unknown_quiz_is_an_error() {
    let (mut app, _store) = test_app();
    assert!(app.start_quiz("99").is_err());
}

#[test]
fn logout_clears_session_state() {
    let (mut app, store) = test_app();
    login(&mut app);
    app.start_quiz("1").unwrap();
    app.create_room(Default::default()).unwrap();
    app.logout();
    assert!(app.current_user().is_none());
    assert!(app.active_quiz().is_none());
    assert!(app.room().is_none());
    assert!(store.saved_session().is_none());
    // The abandoned quiz was not graded.
    assert!(store.saved_progress("1").is_none());
}

#[test]
fn attempts_without_a_signed_in_user_touch_no_records() {
    let (mut app, store) = test_app();
    app.start_quiz("2").unwrap();
    app.record_answer("q1", "Nolan").unwrap();
    let attempt = app.submit_quiz().unwrap();
    assert_eq!(attempt.correct_count, 1);
    assert!(store.saved_progress("1").is_none());
}

#[test]
fn room_countdown_launches_the_configured_quiz() {
    let (mut app, _store) = test_app();
    login(&mut app);
    app.create_room(RoomSettings {
        topic: "Physics".to_owned(),
        ..Default::default()
    })
    .unwrap();
    app.room_mut().unwrap().start_countdown(Duration::from_secs(3));
    app.tick(Duration::from_secs(3));
    assert!(app.room().is_none());
    assert_eq!(app.active_quiz().unwrap().title, "Physics");
}

#[test]
fn creating_a_room_requires_a_user() {
    let (mut app, _store) = test_app();
    assert!(app.create_room(Default::default()).is_err());
    login(&mut app);
    let code_len = app.create_room(Default::default()).unwrap().code().len();
    assert_eq!(code_len, 6);
}

#[test]
fn custom_quizzes_run_outside_the_catalog() {
    let (mut app, _store) = test_app();
    let quiz = app.quizzes()[0].clone();
    let custom = Quiz {
        id: "custom".to_owned(),
        title: "Custom round".to_owned(),
        ..quiz
    };
    app.start_custom_quiz(custom);
    assert_eq!(app.active_quiz().unwrap().id, "custom");
}
