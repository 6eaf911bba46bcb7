//! Test assertion helpers - fluent API for verifying rendered round events
#![allow(dead_code)] // Test utilities may not all be used in every test

use std::time::Duration;

use teacorner::{event::RoundEvent, round::RoundResolved};

use super::setup::TestSetup;

// ============================================================================
// Assertion Helpers
// ============================================================================

const WAIT_LIMIT: Duration = Duration::from_secs(600);

pub struct EventAssertion<'a> {
    setup: &'a TestSetup,
    round_id: String,
}

impl<'a> EventAssertion<'a> {
    pub fn for_round(setup: &'a TestSetup, round_id: &str) -> Self {
        Self {
            setup,
            round_id: round_id.to_string(),
        }
    }

    async fn events(&self) -> Vec<RoundEvent> {
        self.setup
            .renderer
            .events()
            .await
            .into_iter()
            .filter(|e| e.round_id() == self.round_id)
            .collect()
    }

    /// Waits (on tokio time) until the round's result has been rendered
    pub async fn resolved(self) -> RoundResolved {
        let wait = async {
            loop {
                let changed = self.setup.renderer.changed();
                if let Some(resolved) = self.events().await.into_iter().find_map(|e| match e {
                    RoundEvent::Resolved(resolved) => Some(resolved),
                    _ => None,
                }) {
                    return resolved;
                }
                changed.await;
            }
        };

        tokio::time::timeout(WAIT_LIMIT, wait)
            .await
            .unwrap_or_else(|_| panic!("round {} was never resolved", self.round_id))
    }

    /// Event types seen for the round so far, in order
    pub async fn event_types(&self) -> Vec<&'static str> {
        self.events().await.iter().map(|e| e.event_type()).collect()
    }

    pub async fn was_rendered_once(self) {
        let resolved_count = self
            .event_types()
            .await
            .into_iter()
            .filter(|t| *t == "round_resolved")
            .count();
        assert_eq!(
            resolved_count, 1,
            "round {} should be resolved exactly once",
            self.round_id
        );
    }
}
