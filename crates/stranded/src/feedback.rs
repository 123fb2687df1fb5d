//! # Feedback Queue
//!
//! Player-facing messages ("Crafted axe!", "Magazine empty! Reload.").
//! FIFO, one visible at a time, each for a fixed duration. The HUD reads
//! `current()`; the simulation only pushes and advances.

use std::collections::VecDeque;

/// Outbound message queue for the HUD.
#[derive(Clone, Debug)]
pub struct FeedbackQueue {
    queue: VecDeque<String>,
    visible: Option<(String, f32)>,
    duration: f32,
    history: u64,
}

impl FeedbackQueue {
    /// Creates a queue showing each message for `duration` seconds.
    #[must_use]
    pub fn new(duration: f32) -> Self {
        Self {
            queue: VecDeque::new(),
            visible: None,
            duration,
            history: 0,
        }
    }

    /// Queues a message. It is shown at once if nothing is visible.
    pub fn push(&mut self, message: impl Into<String>) {
        self.queue.push_back(message.into());
        self.history += 1;
        self.show_next();
    }

    /// Message on screen, if any.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.visible.as_ref().map(|(message, _)| message.as_str())
    }

    /// Messages waiting behind the visible one.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Total messages ever pushed.
    #[must_use]
    pub const fn pushed(&self) -> u64 {
        self.history
    }

    /// Iterates the visible message followed by the waiting ones.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.current()
            .into_iter()
            .chain(self.queue.iter().map(String::as_str))
    }

    /// Counts down the visible message and rotates expired ones out.
    ///
    /// A long `dt` can expire several messages in one call.
    pub fn advance(&mut self, dt: f32) {
        let mut remaining = dt;
        while let Some((_, time_left)) = self.visible.as_mut() {
            if *time_left > remaining {
                *time_left -= remaining;
                return;
            }
            remaining -= *time_left;
            self.visible = None;
            self.show_next();
        }
    }

    fn show_next(&mut self) {
        if self.visible.is_none() {
            if let Some(next) = self.queue.pop_front() {
                self.visible = Some((next, self.duration));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_visible_at_a_time() {
        let mut feedback = FeedbackQueue::new(1.0);
        feedback.push("first");
        feedback.push("second");

        assert_eq!(feedback.current(), Some("first"));
        assert_eq!(feedback.pending(), 1);
    }

    #[test]
    fn test_fifo_rotation() {
        let mut feedback = FeedbackQueue::new(1.0);
        feedback.push("first");
        feedback.push("second");

        feedback.advance(0.5);
        assert_eq!(feedback.current(), Some("first"));
        feedback.advance(0.6);
        assert_eq!(feedback.current(), Some("second"));
        feedback.advance(1.0);
        assert_eq!(feedback.current(), None);
    }

    #[test]
    fn test_long_delta_expires_several() {
        let mut feedback = FeedbackQueue::new(1.0);
        for message in ["a", "b", "c"] {
            feedback.push(message);
        }
        feedback.advance(2.5);
        assert_eq!(feedback.current(), Some("c"));
        assert_eq!(feedback.pending(), 0);
        assert_eq!(feedback.pushed(), 3);
    }

    #[test]
    fn test_iter_in_display_order() {
        let mut feedback = FeedbackQueue::new(1.0);
        feedback.push("a");
        feedback.push("b");
        let all: Vec<_> = feedback.iter().collect();
        assert_eq!(all, vec!["a", "b"]);
    }
}
