//! Property-based tests for the chat view state machine.
//!
//! Verifies that invariants hold under arbitrary event sequences: the
//! transcript bound, the composer's trim/length laws, and the nickname
//! resolution rules.

use std::time::{Duration, Instant};

use parley_app::{
    App, AppAction, AppEvent, ViewConfig,
    composer::{self, ComposeError, GUEST_PREFIX, MAX_MESSAGE_CHARS, MAX_NICKNAME_CHARS},
    sanitize,
};
use proptest::prelude::*;

/// Generate random inbound service and transport events.
fn event_strategy() -> impl Strategy<Value = AppEvent> {
    prop_oneof![
        3 => (any::<String>(), any::<String>()).prop_map(|(username, message)| {
            AppEvent::MessageReceived { username, message, timestamp: None }
        }),
        2 => ("\\PC{0,40}", prop::option::of(0u64..100)).prop_map(|(msg, user_count)| {
            AppEvent::StatusReceived { msg, user_count }
        }),
        1 => prop::collection::vec("\\PC{0,12}", 0..5)
            .prop_map(|users| AppEvent::UserListReceived { users }),
        1 => prop::option::of("\\PC{0,40}")
            .prop_map(|msg| AppEvent::ServiceError { msg }),
        1 => (1u32..10).prop_map(|attempt| AppEvent::ReconnectAttempt { attempt }),
        1 => Just(AppEvent::Connected),
        1 => Just(AppEvent::Disconnected { reason: None }),
    ]
}

proptest! {
    #[test]
    fn prop_transcript_bound_holds(events in prop::collection::vec(event_strategy(), 0..80)) {
        let config = ViewConfig { max_entries: 16, ..ViewConfig::default() };
        let mut app = App::new(config);

        for event in events {
            let _ = app.handle(event);
            prop_assert!(app.transcript().len() <= 16);
        }
    }

    #[test]
    fn prop_transcript_contains_no_control_characters(
        events in prop::collection::vec(event_strategy(), 0..40),
    ) {
        let mut app = App::new(ViewConfig::default());

        for event in events {
            let _ = app.handle(event);
        }

        for entry in app.transcript().entries() {
            let text = match entry {
                parley_app::LogEntry::Chat(line) => {
                    format!("{}{}", line.username, line.body)
                },
                parley_app::LogEntry::Notice(notice) => notice.text.clone(),
            };
            prop_assert!(text.chars().all(|c| !c.is_control()));
        }
    }

    #[test]
    fn prop_compose_respects_bounds(draft in ".{0,600}") {
        let trimmed = draft.trim().to_string();

        match composer::compose(&draft, "tester") {
            Ok(message) => {
                prop_assert!(!trimmed.is_empty());
                prop_assert!(trimmed.chars().count() <= MAX_MESSAGE_CHARS);
                prop_assert_eq!(message.message, trimmed);
                prop_assert!(message.timestamp.is_some());
            },
            Err(ComposeError::Empty) => prop_assert!(trimmed.is_empty()),
            Err(ComposeError::TooLong { len }) => {
                prop_assert_eq!(len, trimmed.chars().count());
                prop_assert!(len > MAX_MESSAGE_CHARS);
            },
        }
    }

    #[test]
    fn prop_resolved_nickname_is_capped(input in ".{0,60}") {
        let resolved = composer::resolve_nickname(&input);

        prop_assert!(resolved.chars().count() <= MAX_NICKNAME_CHARS);
        prop_assert!(!resolved.is_empty());

        if input.trim().is_empty() {
            prop_assert!(resolved.starts_with(GUEST_PREFIX));
        }
    }

    #[test]
    fn prop_sanitize_strips_all_controls(text in "\\PC{0,120}") {
        prop_assert!(sanitize(&text).chars().all(|c| !c.is_control()));
    }

    #[test]
    fn prop_key_events_never_send_without_enter(text in "[a-z ]{0,30}") {
        let mut app = App::new(ViewConfig::default());

        for c in text.chars() {
            let actions = app.handle(AppEvent::Key(parley_app::KeyInput::Char(c)));
            prop_assert!(!actions.iter().any(|a| matches!(a, AppAction::Send { .. })));
        }
    }
}

#[test]
fn notice_expiry_respects_configured_ttl() {
    let config = ViewConfig { notice_ttl: Duration::from_secs(3), ..ViewConfig::default() };
    let mut app = App::new(config);
    let start = Instant::now();

    let _ = app.handle(AppEvent::Tick { now: start });
    let _ = app.handle(AppEvent::StatusReceived { msg: "hi".into(), user_count: None });

    let _ = app.handle(AppEvent::Tick { now: start + Duration::from_secs(2) });
    assert_eq!(app.transcript().visible().count(), 1);

    let actions = app.handle(AppEvent::Tick { now: start + Duration::from_secs(4) });
    assert!(actions.contains(&AppAction::Render), "hiding a notice should repaint");
    assert_eq!(app.transcript().visible().count(), 0);
}
