//! Timed sign-in prompt

use std::time::Duration;

use arranke_common::LedgerConfig;
use tokio::time::Instant;

/// Shown for a fixed duration after an unauthenticated press
#[derive(Debug, Clone)]
pub struct LoginPrompt {
    duration: Duration,
    visible_until: Option<Instant>,
}

impl LoginPrompt {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            visible_until: None,
        }
    }

    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::new(Duration::from_millis(config.login_prompt_ms))
    }

    /// Show (or re-arm) the prompt
    pub fn show(&mut self) {
        self.visible_until = Some(Instant::now() + self.duration);
    }

    pub fn dismiss(&mut self) {
        self.visible_until = None;
    }

    pub fn is_visible(&self) -> bool {
        self.remaining().is_some()
    }

    /// Time left before the prompt hides itself
    pub fn remaining(&self) -> Option<Duration> {
        let until = self.visible_until?;
        let left = until.saturating_duration_since(Instant::now());
        (!left.is_zero()).then_some(left)
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}
