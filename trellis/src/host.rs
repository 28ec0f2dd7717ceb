// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The polled input contract between [`Ui`](crate::Ui) and its host.
//!
//! Hosts answer synchronous, non-blocking queries once per tick. Everything is
//! reported as a *level* (is this held now?); edges are derived by the input
//! manager.
//!
//! [`FrameInput`] is a plain snapshot that implements [`InputSource`]. It is
//! handy for hosts that gather input up front, and for tests.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Point, Vec2};
use trellis_responder::event::{Key, PointerButton};

/// Best-effort clipboard access.
pub trait Clipboard {
    /// Current clipboard text, if any is available.
    fn read_text(&mut self) -> Option<String>;
    /// Replace the clipboard text. Returns whether the host accepted it.
    fn write_text(&mut self, text: &str) -> bool;
}

/// Polled host input.
pub trait InputSource {
    /// Cursor position in surface coordinates.
    fn cursor_position(&self) -> Point;
    /// Whether `button` is held.
    fn is_button_pressed(&self, button: PointerButton) -> bool;
    /// Wheel delta accumulated since the previous tick.
    fn wheel(&self) -> Vec2;
    /// Characters typed since the previous tick, in order.
    fn typed_chars(&self) -> &[char];
    /// Whether `key` is held.
    fn is_key_pressed(&self, key: Key) -> bool;
    /// Monotonic timestamp in milliseconds.
    fn timestamp(&self) -> u64;
    /// Clipboard, if the host has one.
    fn clipboard(&mut self) -> Option<&mut dyn Clipboard> {
        None
    }
}

/// In-memory clipboard.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    /// Stored text.
    pub text: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn read_text(&mut self) -> Option<String> {
        self.text.clone()
    }

    fn write_text(&mut self, text: &str) -> bool {
        self.text = Some(text.into());
        true
    }
}

/// A snapshot of one tick's input.
///
/// ```
/// use kurbo::Point;
/// use trellis::host::{FrameInput, InputSource};
/// use trellis::PointerButton;
///
/// let frame = FrameInput::at(Point::new(10.0, 20.0), 16).press(PointerButton::Primary);
/// assert!(frame.is_button_pressed(PointerButton::Primary));
/// assert!(!frame.is_button_pressed(PointerButton::Secondary));
/// ```
#[derive(Clone, Debug, Default)]
pub struct FrameInput {
    /// Cursor position.
    pub cursor: Point,
    /// Held buttons.
    pub buttons: Vec<PointerButton>,
    /// Wheel delta.
    pub wheel: Vec2,
    /// Characters typed this tick.
    pub typed: Vec<char>,
    /// Held keys.
    pub keys: Vec<Key>,
    /// Timestamp in milliseconds.
    pub timestamp: u64,
    /// Clipboard exposed to handlers.
    pub clipboard: Option<MemoryClipboard>,
}

impl FrameInput {
    /// Cursor at `cursor`, nothing held, at `timestamp`.
    pub fn at(cursor: Point, timestamp: u64) -> Self {
        Self {
            cursor,
            timestamp,
            ..Self::default()
        }
    }

    /// Also hold `button`.
    #[must_use]
    pub fn press(mut self, button: PointerButton) -> Self {
        if !self.buttons.contains(&button) {
            self.buttons.push(button);
        }
        self
    }

    /// Also hold `key`.
    #[must_use]
    pub fn key(mut self, key: Key) -> Self {
        if !self.keys.contains(&key) {
            self.keys.push(key);
        }
        self
    }

    /// Also report `wheel`.
    #[must_use]
    pub fn with_wheel(mut self, wheel: Vec2) -> Self {
        self.wheel = wheel;
        self
    }

    /// Also report typed `text`.
    #[must_use]
    pub fn typing(mut self, text: &str) -> Self {
        self.typed.extend(text.chars());
        self
    }

    /// Expose `clipboard` to handlers.
    #[must_use]
    pub fn with_clipboard(mut self, clipboard: MemoryClipboard) -> Self {
        self.clipboard = Some(clipboard);
        self
    }
}

impl InputSource for FrameInput {
    fn cursor_position(&self) -> Point {
        self.cursor
    }

    fn is_button_pressed(&self, button: PointerButton) -> bool {
        self.buttons.contains(&button)
    }

    fn wheel(&self) -> Vec2 {
        self.wheel
    }

    fn typed_chars(&self) -> &[char] {
        &self.typed
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn clipboard(&mut self) -> Option<&mut dyn Clipboard> {
        self.clipboard.as_mut().map(|c| c as &mut dyn Clipboard)
    }
}

/// Levels read from an [`InputSource`] at the start of a tick.
#[derive(Clone, Debug)]
pub(crate) struct Levels {
    pub(crate) cursor: Point,
    pub(crate) buttons: Vec<PointerButton>,
    pub(crate) wheel: Vec2,
    pub(crate) typed: Vec<char>,
    pub(crate) keys: Vec<Key>,
    pub(crate) now: u64,
}

/// Named keys polled each tick. Printable characters arrive as typed text.
pub(crate) const TRACKED_KEYS: [Key; 17] = [
    Key::Tab,
    Key::Escape,
    Key::Enter,
    Key::Space,
    Key::Backspace,
    Key::Delete,
    Key::ArrowUp,
    Key::ArrowDown,
    Key::ArrowLeft,
    Key::ArrowRight,
    Key::PageUp,
    Key::PageDown,
    Key::Home,
    Key::End,
    Key::Shift,
    Key::Control,
    Key::Alt,
];

impl Levels {
    pub(crate) fn poll(source: &impl InputSource) -> Self {
        Self {
            cursor: source.cursor_position(),
            buttons: PointerButton::ALL
                .into_iter()
                .filter(|b| source.is_button_pressed(*b))
                .collect(),
            wheel: source.wheel(),
            typed: source.typed_chars().to_vec(),
            keys: TRACKED_KEYS
                .into_iter()
                .filter(|k| source.is_key_pressed(*k))
                .collect(),
            now: source.timestamp(),
        }
    }
}
