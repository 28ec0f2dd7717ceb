// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synthetic event record.
//!
//! An [`Event`] is created per dispatch and discarded afterwards. The router fills in
//! its [`path`](Event::path); the dispatch loop updates [`phase`](Event::phase) and
//! [`current_target`](Event::current_target) as it walks the sequence.

use kurbo::{Point, Vec2};

use crate::types::{EventPath, Phase};

/// Kind of a synthetic event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Pointer started hovering a node.
    Enter,
    /// Pointer stopped hovering a node.
    Leave,
    /// A pointer button was pressed.
    Down,
    /// A pointer button was released.
    Up,
    /// Pointer moved while hovering a node.
    Move,
    /// Press and release recognised as a click.
    Click,
    /// Wheel delta over a scrollable.
    Wheel,
    /// Primary button held over a node; the node may accept to become the drag source.
    DragStart,
    /// Pointer moved during a drag. Always targets the source.
    Drag,
    /// Pointer is over a different node during a drag. Related target is the source.
    DragOver,
    /// Drag ended. Targets the source.
    DragEnd,
    /// Released over a different node. Related target is the source.
    Drop,
    /// Node gained focus. Related target is the previous focus.
    Focus,
    /// Node lost focus. Related target is the new focus.
    Blur,
    /// Key pressed (or auto-repeated) while a node has focus.
    KeyDown,
    /// Key released while a node has focus.
    KeyUp,
    /// A character typed while a node has focus.
    TextInput,
}

impl EventType {
    /// Whether events of this type run the bubble phase.
    ///
    /// Hover and focus transitions are about one node and do not bubble.
    pub const fn bubbles(self) -> bool {
        !matches!(self, Self::Enter | Self::Leave | Self::Focus | Self::Blur)
    }
}

/// Pointer button identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PointerButton {
    /// Left / primary button.
    Primary,
    /// Right / secondary button.
    Secondary,
    /// Middle / auxiliary button.
    Auxiliary,
}

impl PointerButton {
    /// Buttons tracked by edge detection, in reporting order.
    pub const ALL: [Self; 3] = [Self::Primary, Self::Secondary, Self::Auxiliary];
}

/// Keys the toolkit distinguishes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Tab.
    Tab,
    /// Escape.
    Escape,
    /// Enter / Return.
    Enter,
    /// Space bar.
    Space,
    /// Backspace.
    Backspace,
    /// Forward delete.
    Delete,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Home.
    Home,
    /// End.
    End,
    /// Either Shift key.
    Shift,
    /// Either Control key.
    Control,
    /// Either Alt key.
    Alt,
    /// A printable key, identified by its unshifted character.
    Character(char),
}

bitflags::bitflags! {
    /// Modifier keys held when an event was produced.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 0b001;
        /// Control.
        const CTRL  = 0b010;
        /// Alt.
        const ALT   = 0b100;
    }
}

/// A synthetic UI event.
#[derive(Clone, Debug)]
pub struct Event<K> {
    /// What happened.
    pub kind: EventType,
    /// Node the event is aimed at.
    pub target: K,
    /// Node whose listeners are currently running. Set by the dispatch loop.
    pub current_target: Option<K>,
    /// The "other side" for leave/enter, focus/blur, drag-over and drop.
    pub related_target: Option<K>,
    /// Current propagation phase. Set by the dispatch loop.
    pub phase: Phase,
    /// Interactive ancestors from root to target, inclusive.
    pub path: EventPath<K>,
    /// Whether the bubble phase runs.
    pub bubbles: bool,
    /// Pointer position in surface coordinates.
    pub position: Point,
    /// Pointer movement since the previous tick.
    pub delta: Vec2,
    /// Wheel delta.
    pub wheel: Vec2,
    /// Button for down/up/click.
    pub button: Option<PointerButton>,
    /// Key for key events.
    pub key: Option<Key>,
    /// Character for text input.
    pub text: Option<char>,
    /// Modifiers held.
    pub modifiers: Modifiers,
    /// Whether a key-down was produced by auto-repeat.
    pub repeat: bool,
    /// Host timestamp in milliseconds.
    pub timestamp: u64,
    default_prevented: bool,
}

impl<K: Copy> Event<K> {
    /// A new event of `kind` aimed at `target`, with `bubbles` derived from the kind.
    pub fn new(kind: EventType, target: K) -> Self {
        Self {
            kind,
            target,
            current_target: None,
            related_target: None,
            phase: Phase::Target,
            path: EventPath::new(),
            bubbles: kind.bubbles(),
            position: Point::ZERO,
            delta: Vec2::ZERO,
            wheel: Vec2::ZERO,
            button: None,
            key: None,
            text: None,
            modifiers: Modifiers::empty(),
            repeat: false,
            timestamp: 0,
            default_prevented: false,
        }
    }

    /// Sets the related target.
    #[must_use]
    pub fn with_related(mut self, related: Option<K>) -> Self {
        self.related_target = related;
        self
    }

    /// Sets the pointer position and delta.
    #[must_use]
    pub fn with_pointer(mut self, position: Point, delta: Vec2) -> Self {
        self.position = position;
        self.delta = delta;
        self
    }

    /// Sets the button.
    #[must_use]
    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = Some(button);
        self
    }

    /// Sets the wheel delta.
    #[must_use]
    pub fn with_wheel(mut self, wheel: Vec2) -> Self {
        self.wheel = wheel;
        self
    }

    /// Sets the key and whether it is an auto-repeat.
    #[must_use]
    pub fn with_key(mut self, key: Key, repeat: bool) -> Self {
        self.key = Some(key);
        self.repeat = repeat;
        self
    }

    /// Sets the typed character.
    #[must_use]
    pub fn with_text(mut self, ch: char) -> Self {
        self.text = Some(ch);
        self
    }

    /// Sets the modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Sets the timestamp.
    #[must_use]
    pub fn at(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Ask the toolkit to skip its default action for this event.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether a handler called [`prevent_default`](Self::prevent_default).
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transitions_do_not_bubble() {
        for kind in [EventType::Enter, EventType::Leave, EventType::Focus, EventType::Blur] {
            assert!(!Event::new(kind, 1_u32).bubbles, "{kind:?} must not bubble");
        }
        for kind in [EventType::Down, EventType::Wheel, EventType::Drop, EventType::KeyDown] {
            assert!(Event::new(kind, 1_u32).bubbles, "{kind:?} must bubble");
        }
    }

    #[test]
    fn prevent_default_is_sticky() {
        let mut ev = Event::new(EventType::Down, 7_u32).with_button(PointerButton::Primary);
        assert!(!ev.default_prevented());
        ev.prevent_default();
        ev.prevent_default();
        assert!(ev.default_prevented());
        assert_eq!(ev.button, Some(PointerButton::Primary));
    }
}
