//! Property tests for matchmaking under arbitrary join/leave interleavings.

use alice_board::Color;
use alice_session::{Matchmaker, SessionRegistry};
use alice_transport::ConnectionId;
use proptest::prelude::*;

/// One step of a random schedule over a fixed pool of connections.
#[derive(Debug, Clone)]
enum Step {
    Join(usize),
    Leave(usize),
}

const POOL: usize = 8;

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => (0..POOL).prop_map(Step::Join),
        1 => (0..POOL).prop_map(Step::Leave),
    ]
}

proptest! {
    /// No session ever holds more than two players, every binding agrees
    /// with the session it points at, and at most one session is waiting.
    #[test]
    fn prop_sessions_never_exceed_two_players(
        steps in prop::collection::vec(step(), 1..64),
    ) {
        let pool: Vec<ConnectionId> = (0..POOL).map(|_| ConnectionId::mint()).collect();
        let mut registry = SessionRegistry::new();

        for step in steps {
            match step {
                Step::Join(i) => {
                    let _ = Matchmaker::find_or_create(&mut registry, pool[i]);
                }
                Step::Leave(i) => {
                    if let Ok(binding) = registry.lookup_binding(pool[i]) {
                        registry.remove_session(binding.session_id);
                    }
                }
            }

            prop_assert!(registry.waiting_count() <= 1);
            let mut seated = 0;
            for conn in &pool {
                if let Ok(binding) = registry.lookup_binding(*conn) {
                    let session = registry.session(binding.session_id);
                    prop_assert!(session.is_some());
                    let session = session.unwrap();
                    prop_assert!(session.participants().count() <= 2);
                    prop_assert_eq!(session.role_of(*conn), Some(binding.role));
                    seated += 1;
                }
            }
            prop_assert_eq!(seated, registry.binding_count());
        }
    }

    /// Two fresh connections joining back to back always share one active
    /// session, first as white and second as black.
    #[test]
    fn prop_consecutive_joins_pair_white_then_black(prefix in 0usize..6) {
        let mut registry = SessionRegistry::new();
        // Fill any number of complete games first.
        for _ in 0..prefix * 2 {
            Matchmaker::find_or_create(&mut registry, ConnectionId::mint()).unwrap();
        }

        let a = Matchmaker::find_or_create(&mut registry, ConnectionId::mint()).unwrap();
        let b = Matchmaker::find_or_create(&mut registry, ConnectionId::mint()).unwrap();

        prop_assert_eq!(a.session_id, b.session_id);
        prop_assert_eq!(a.role, Color::White);
        prop_assert_eq!(b.role, Color::Black);
        prop_assert!(b.started);
        prop_assert_eq!(registry.session_count(), prefix + 1);
    }
}
