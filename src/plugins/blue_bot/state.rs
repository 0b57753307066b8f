//! Conversational memory for BlueBot

use chrono::{DateTime, Duration, Utc};

/// Two decaying timestamps; windows expire by comparison against "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversationState {
    pub last_mention_at: DateTime<Utc>,
    pub last_escalation_at: DateTime<Utc>,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self {
            last_mention_at: DateTime::<Utc>::MIN_UTC,
            last_escalation_at: DateTime::<Utc>::MIN_UTC,
        }
    }
}

impl ConversationState {
    pub fn mentioned_within(&self, now: DateTime<Utc>, window: Duration) -> bool {
        within(self.last_mention_at, now, window)
    }

    pub fn escalated_within(&self, now: DateTime<Utc>, window: Duration) -> bool {
        within(self.last_escalation_at, now, window)
    }

    /// Timestamps only move forward
    pub fn record_mention(&mut self, now: DateTime<Utc>) {
        self.last_mention_at = self.last_mention_at.max(now);
    }

    pub fn record_escalation(&mut self, now: DateTime<Utc>) {
        self.last_escalation_at = self.last_escalation_at.max(now);
    }
}

fn within(since: DateTime<Utc>, now: DateTime<Utc>, window: Duration) -> bool {
    now.signed_duration_since(since) <= window
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_outside_every_window() {
        let state = ConversationState::default();
        let now = Utc::now();

        assert!(!state.mentioned_within(now, Duration::minutes(2)));
        assert!(!state.escalated_within(now, Duration::minutes(1)));
    }

    #[test]
    fn window_boundary_is_inclusive() {
        let start = Utc::now();
        let mut state = ConversationState::default();
        state.record_mention(start);

        assert!(state.mentioned_within(start + Duration::minutes(2), Duration::minutes(2)));
        assert!(!state.mentioned_within(
            start + Duration::minutes(2) + Duration::milliseconds(1),
            Duration::minutes(2)
        ));
    }

    #[test]
    fn records_never_move_backwards() {
        let start = Utc::now();
        let mut state = ConversationState::default();
        state.record_mention(start);
        state.record_mention(start - Duration::seconds(30));

        assert_eq!(state.last_mention_at, start);
    }
}
