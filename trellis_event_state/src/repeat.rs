// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-stage key repeat.
//!
//! The press itself is handled by the caller on the press edge. While the key
//! stays held, the first repeat fires once `initial_delay` has elapsed since the
//! press, then one repeat every `interval`. Releasing the key, or pressing
//! another one, restarts the timer.
//!
//! ```
//! use trellis_event_state::repeat::{KeyRepeat, RepeatConfig};
//!
//! let mut repeat = KeyRepeat::new(RepeatConfig::default());
//! repeat.press('x', 0);
//! assert_eq!(repeat.poll(499, |_| true), None);
//! assert_eq!(repeat.poll(500, |_| true), Some('x'));
//! assert_eq!(repeat.poll(520, |_| true), None);
//! assert_eq!(repeat.poll(550, |_| true), Some('x'));
//! ```

/// Key repeat timing, in host milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RepeatConfig {
    /// Hold time before the first repeat.
    pub initial_delay: u64,
    /// Time between subsequent repeats.
    pub interval: u64,
}

impl Default for RepeatConfig {
    fn default() -> Self {
        Self {
            initial_delay: 500,
            interval: 50,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Held<T> {
    key: T,
    start: u64,
    last: u64,
}

/// Repeat timer for the most recently pressed key.
#[derive(Clone, Debug)]
pub struct KeyRepeat<T> {
    config: RepeatConfig,
    held: Option<Held<T>>,
}

impl<T> Default for KeyRepeat<T> {
    fn default() -> Self {
        Self {
            config: RepeatConfig::default(),
            held: None,
        }
    }
}

impl<T: Copy + Eq> KeyRepeat<T> {
    /// Idle timer with `config`.
    pub fn new(config: RepeatConfig) -> Self {
        Self { config, held: None }
    }

    /// Timing in use.
    pub fn config(&self) -> RepeatConfig {
        self.config
    }

    /// Start timing `key`, pressed at `now`. Replaces any key being timed.
    pub fn press(&mut self, key: T, now: u64) {
        self.held = Some(Held {
            key,
            start: now,
            last: now,
        });
    }

    /// Stop timing `key` if it is the key being timed.
    pub fn release(&mut self, key: T) {
        if self.held.is_some_and(|h| h.key == key) {
            self.held = None;
        }
    }

    /// Key being timed.
    pub fn key(&self) -> Option<T> {
        self.held.map(|h| h.key)
    }

    /// Advance to `now`. Returns the key if a repeat fires.
    ///
    /// `is_held` reports whether a key is still down; a key found released is
    /// dropped without firing.
    pub fn poll(&mut self, now: u64, is_held: impl Fn(T) -> bool) -> Option<T> {
        let held = self.held.as_mut()?;
        if !is_held(held.key) {
            self.held = None;
            return None;
        }
        let ready = now.saturating_sub(held.start) >= self.config.initial_delay
            && now.saturating_sub(held.last) >= self.config.interval;
        if !ready {
            return None;
        }
        held.last = now;
        Some(held.key)
    }
}
