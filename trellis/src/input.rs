// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-tick input state machine.
//!
//! Each tick compares the host's levels with the previous tick and turns the
//! differences into events, in this order:
//!
//! 1. An active exclusive gesture (window move, scroll bar thumb drag, element
//!    drag) consumes pointer motion and the releasing `up`; steps 2 and 3 are
//!    skipped. An element drag sends `drag` to its source, `drag-over` to the
//!    interactive node under the cursor, and on release `up` and `drag-end` to
//!    the source followed by `drop` to the node under the cursor.
//! 2. Hover: `leave` then `enter` when the topmost interactive node changes,
//!    and `move` to the hovered node when the cursor moved.
//! 3. Button edges: `down` / `up` / `click` to the hovered node. A primary press
//!    also updates focus, raises the window under the cursor and may start a
//!    gesture.
//! 4. Wheel, routed to the topmost scrollable viewport under the cursor.
//! 5. Element drag start: `drag-start` to the pressed node once the pointer
//!    moves with the primary button held.
//! 6. Keyboard: focus traversal, `key-down` / `key-up` / `text-input` to the
//!    focused node, keyboard scrolling, and key repeat.

use kurbo::{Point, Vec2};
use trellis_event_state::click::{ClickResult, ClickState};
use trellis_event_state::drag::DragState;
use trellis_event_state::edges::{EdgeTracker, Edges};
use trellis_event_state::repeat::KeyRepeat;
use trellis_focus::Navigation;
use trellis_responder::adapters::tree::{interactive_at, scrollable_at};
use trellis_responder::event::{Event, EventType, Key, Modifiers, PointerButton};
use trellis_responder::hover::{HoverState, HoverTransition};
use trellis_tree::{NodeId, QueryFilter, Tree};

use crate::config::InputConfig;
use crate::cx::EventCx;
use crate::focus::FocusManager;
use crate::host::Levels;

/// An exclusive pointer gesture driven by the toolkit itself.
///
/// While one is active, pointer motion drives it and hover, `down`, `up` and
/// `click` processing is suspended. It ends on the primary button's release.
/// Element drags are exclusive in the same way but are reported through
/// [`Ui::drag_source`](crate::Ui::drag_source).
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Gesture {
    /// Moving a window by its header.
    WindowMove {
        /// The window.
        window: NodeId,
        /// Cursor offset from the window's origin at the press.
        grab: Vec2,
    },
    /// Dragging a viewport's scroll bar thumb.
    ThumbDrag {
        /// The viewport.
        viewport: NodeId,
    },
}

impl Gesture {
    /// Node that owns the gesture and receives its `up`.
    pub fn owner(&self) -> NodeId {
        match self {
            Self::WindowMove { window, .. } => *window,
            Self::ThumbDrag { viewport } => *viewport,
        }
    }
}

/// Pointer facts for one tick.
#[derive(Copy, Clone, Debug)]
struct Pointer {
    pos: Point,
    delta: Vec2,
    moved: bool,
    now: u64,
    modifiers: Modifiers,
}

impl Pointer {
    fn event(&self, kind: EventType, target: NodeId) -> Event<NodeId> {
        Event::new(kind, target)
            .with_pointer(self.pos, self.delta)
            .with_modifiers(self.modifiers)
            .at(self.now)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct InputManager {
    hover: HoverState<NodeId>,
    buttons: EdgeTracker<PointerButton>,
    keys: EdgeTracker<Key>,
    repeat: KeyRepeat<Key>,
    click: ClickState<NodeId, PointerButton>,
    drag: DragState<NodeId>,
    /// Node pressed with the primary button that may still start a drag.
    drag_candidate: Option<NodeId>,
    gesture: Option<Gesture>,
    last_cursor: Option<Point>,
}

impl InputManager {
    pub(crate) fn new(config: &InputConfig) -> Self {
        Self {
            hover: HoverState::new(),
            buttons: EdgeTracker::new(),
            keys: EdgeTracker::new(),
            repeat: KeyRepeat::new(config.repeat),
            click: ClickState::with_thresholds(config.click_distance, config.click_time),
            drag: DragState::default(),
            drag_candidate: None,
            gesture: None,
            last_cursor: None,
        }
    }

    pub(crate) fn hovered(&self) -> Option<NodeId> {
        self.hover.current()
    }

    pub(crate) fn gesture(&self) -> Option<Gesture> {
        self.gesture
    }

    pub(crate) fn drag_source(&self) -> Option<NodeId> {
        self.drag.source()
    }

    /// Run one tick.
    pub(crate) fn process(
        &mut self,
        cx: &mut EventCx<'_>,
        focus: &mut FocusManager,
        root: NodeId,
        levels: &Levels,
    ) {
        let now = levels.now;
        self.forget_removed(cx.tree());
        focus.validate(cx, root, now);

        let key_edges = self.keys.update(levels.keys.iter().copied());
        let pointer = Pointer {
            pos: levels.cursor,
            delta: self.last_cursor.map_or(Vec2::ZERO, |last| levels.cursor - last),
            moved: self.last_cursor.is_some_and(|last| last != levels.cursor),
            now,
            modifiers: self.modifiers(),
        };
        self.last_cursor = Some(levels.cursor);
        let button_edges = self.buttons.update(levels.buttons.iter().copied());

        if let Some(gesture) = self.gesture {
            self.continue_gesture(cx, gesture, &pointer, &button_edges);
        } else if let Some(source) = self.drag.source() {
            self.continue_drag(cx, root, source, &pointer, &button_edges);
        } else {
            self.update_hover(cx, root, &pointer);
            self.handle_buttons(cx, focus, root, &pointer, &button_edges);
        }
        focus.apply_requests(cx, root, now);

        self.handle_wheel(cx, root, &pointer, levels.wheel);
        self.start_drag(cx, &pointer, &button_edges);
        focus.apply_requests(cx, root, now);

        self.handle_keys(cx, focus, root, &key_edges, levels);
    }

    /// Drop references to nodes that no longer exist.
    fn forget_removed(&mut self, tree: &Tree) {
        if self.hover.current().is_some_and(|n| !tree.is_alive(n)) {
            self.hover.clear();
        }
        if let Some(source) = self.drag.source()
            && !tree.is_alive(source)
        {
            tracing::debug!(?source, "drag source removed, ending drag");
            self.drag.end();
        }
        if self.drag_candidate.is_some_and(|n| !tree.is_alive(n)) {
            self.drag_candidate = None;
        }
        if let Some(gesture) = self.gesture
            && !tree.is_alive(gesture.owner())
        {
            tracing::debug!(?gesture, "gesture owner removed, ending gesture");
            self.gesture = None;
        }
    }

    fn modifiers(&self) -> Modifiers {
        let mut modifiers = Modifiers::empty();
        for (key, flag) in [
            (Key::Shift, Modifiers::SHIFT),
            (Key::Control, Modifiers::CTRL),
            (Key::Alt, Modifiers::ALT),
        ] {
            modifiers.set(flag, self.keys.is_down(key));
        }
        modifiers
    }

    // --- step 1 ---

    fn continue_gesture(
        &mut self,
        cx: &mut EventCx<'_>,
        gesture: Gesture,
        pointer: &Pointer,
        edges: &Edges<PointerButton>,
    ) {
        if pointer.moved {
            match gesture {
                Gesture::WindowMove { window, grab } => {
                    cx.tree_mut().move_window_to(window, pointer.pos - grab);
                }
                Gesture::ThumbDrag { viewport } => {
                    cx.tree_mut()
                        .with_scroll(viewport, |s, m| s.drag_thumb_to(pointer.pos.y, m));
                }
            }
        }
        let owner = gesture.owner();
        for &button in &edges.released {
            cx.dispatch(pointer.event(EventType::Up, owner).with_button(button));
            if button == PointerButton::Primary {
                self.end_gesture(cx.tree_mut(), gesture);
            }
        }
    }

    fn end_gesture(&mut self, tree: &mut Tree, gesture: Gesture) {
        if let Gesture::ThumbDrag { viewport } = gesture {
            tree.with_scroll(viewport, |s, _| s.end_thumb_drag());
        }
        tracing::debug!(?gesture, "gesture ended");
        self.gesture = None;
    }

    /// Element drag in progress. The source owns the pointer; other nodes only
    /// see `drag-over` and `drop`.
    fn continue_drag(
        &mut self,
        cx: &mut EventCx<'_>,
        root: NodeId,
        source: NodeId,
        pointer: &Pointer,
        edges: &Edges<PointerButton>,
    ) {
        let under = interactive_at(cx.tree(), root, pointer.pos).filter(|n| *n != source);
        if pointer.moved {
            cx.dispatch(pointer.event(EventType::Drag, source));
            if let Some(over) = self.drag.hover(under) {
                cx.dispatch(pointer.event(EventType::DragOver, over).with_related(Some(source)));
            }
        }
        for &button in &edges.released {
            cx.dispatch(pointer.event(EventType::Up, source).with_button(button));
            if button != PointerButton::Primary {
                continue;
            }
            self.drag.end();
            tracing::debug!(?source, "drag ended");
            cx.dispatch(pointer.event(EventType::DragEnd, source));
            if let Some(target) = under {
                cx.dispatch(pointer.event(EventType::Drop, target).with_related(Some(source)));
            }
        }
    }

    // --- step 2 ---

    fn update_hover(&mut self, cx: &mut EventCx<'_>, root: NodeId, pointer: &Pointer) {
        let hit = interactive_at(cx.tree(), root, pointer.pos);
        if let Some(HoverTransition { leave, enter }) = self.hover.update(hit) {
            if let Some(old) = leave {
                cx.dispatch(pointer.event(EventType::Leave, old).with_related(enter));
            }
            if let Some(new) = enter {
                cx.dispatch(pointer.event(EventType::Enter, new).with_related(leave));
            }
        }
        if pointer.moved {
            if let Some(hovered) = self.hover.current() {
                cx.dispatch(pointer.event(EventType::Move, hovered));
            }
            self.click.on_move(pointer.pos).for_each(|node| {
                tracing::trace!(?node, "press moved beyond click distance");
            });
        }
    }

    // --- step 3 ---

    fn handle_buttons(
        &mut self,
        cx: &mut EventCx<'_>,
        focus: &mut FocusManager,
        root: NodeId,
        pointer: &Pointer,
        edges: &Edges<PointerButton>,
    ) {
        for &button in &edges.pressed {
            let target = self.hover.current();
            let down = target.map(|t| {
                self.click.on_down(button, t, pointer.pos, pointer.now);
                cx.dispatch(pointer.event(EventType::Down, t).with_button(button))
            });
            if button != PointerButton::Primary {
                continue;
            }
            focus.set_focus(cx, root, target, pointer.now);
            if let Some(hit) = cx.tree().hit_test(root, pointer.pos, QueryFilter::new().window()) {
                cx.tree_mut().raise_to_front(hit.node);
            }
            if down.is_some_and(|d| d.default_prevented) {
                continue;
            }
            self.begin_gesture(cx, root, target, pointer);
        }

        for &button in &edges.released {
            let target = self.hover.current();
            if let Some(t) = target {
                cx.dispatch(pointer.event(EventType::Up, t).with_button(button));
            }
            let result = self
                .click
                .on_up(button, target.as_ref(), pointer.pos, pointer.now);
            if let ClickResult::Click(clicked) = result {
                cx.dispatch(pointer.event(EventType::Click, clicked).with_button(button));
            }
        }
    }

    /// Start a thumb drag or window move at a primary press, or remember the
    /// pressed node as a drag candidate.
    fn begin_gesture(
        &mut self,
        cx: &mut EventCx<'_>,
        root: NodeId,
        target: Option<NodeId>,
        pointer: &Pointer,
    ) {
        let pos = pointer.pos;
        let tree = cx.tree();

        let gesture = if let Some(viewport) = scrollable_at(tree, root, pos)
            .filter(|v| is_uncovered(tree, *v, target) && tree.is_over_thumb(*v, pos))
        {
            Some(Gesture::ThumbDrag { viewport })
        } else if let Some(window) = tree
            .hit_test(root, pos, QueryFilter::new().window())
            .map(|hit| hit.node)
            .filter(|w| {
                is_uncovered(tree, *w, target)
                    && tree.window_state(*w).is_some_and(|s| s.movable)
                    && tree.is_over_header(*w, pos)
            })
        {
            tree.absolute_position(window).map(|origin| Gesture::WindowMove {
                window,
                grab: pos - origin,
            })
        } else {
            None
        };

        match gesture {
            Some(gesture) => {
                if let Gesture::ThumbDrag { viewport } = gesture {
                    cx.tree_mut()
                        .with_scroll(viewport, |s, _| s.begin_thumb_drag(pos.y));
                }
                self.click.cancel(PointerButton::Primary);
                self.gesture = Some(gesture);
                tracing::debug!(?gesture, "gesture started");
            }
            None => self.drag_candidate = target,
        }
    }

    // --- step 4 ---

    fn handle_wheel(&mut self, cx: &mut EventCx<'_>, root: NodeId, pointer: &Pointer, wheel: Vec2) {
        if wheel == Vec2::ZERO {
            return;
        }
        let Some(viewport) = scrollable_at(cx.tree(), root, pointer.pos) else {
            return;
        };
        let result = cx.dispatch(pointer.event(EventType::Wheel, viewport).with_wheel(wheel));
        if !result.default_prevented {
            cx.tree_mut()
                .with_scroll(viewport, |s, m| s.wheel(wheel.y, m));
        }
    }

    // --- step 5 ---

    fn start_drag(&mut self, cx: &mut EventCx<'_>, pointer: &Pointer, edges: &Edges<PointerButton>) {
        let Some(candidate) = self.drag_candidate else {
            return;
        };
        let primary = PointerButton::Primary;
        if edges.released.contains(&primary) || !self.buttons.is_down(primary) {
            self.drag_candidate = None;
        } else if pointer.moved && !edges.pressed.contains(&primary) {
            self.drag_candidate = None;
            let result = cx.dispatch(pointer.event(EventType::DragStart, candidate));
            if result.accepted() {
                self.drag.begin(candidate, pointer.pos);
                self.click.cancel(primary);
                tracing::debug!(source = ?candidate, "drag started");
            }
        }
    }

    // --- step 6 ---

    fn handle_keys(
        &mut self,
        cx: &mut EventCx<'_>,
        focus: &mut FocusManager,
        root: NodeId,
        edges: &Edges<Key>,
        levels: &Levels,
    ) {
        let now = levels.now;
        let modifiers = self.modifiers();
        for &key in &edges.released {
            self.repeat.release(key);
            if let Some(focused) = focus.current() {
                cx.dispatch(
                    Event::new(EventType::KeyUp, focused)
                        .with_key(key, false)
                        .with_modifiers(modifiers)
                        .at(now),
                );
            }
        }
        for &key in &edges.pressed {
            if !is_modifier(key) {
                self.repeat.press(key, now);
            }
            key_action(cx, focus, root, key, false, modifiers, now);
        }
        let keys = &self.keys;
        if let Some(key) = self.repeat.poll(now, |k| keys.is_down(k)) {
            key_action(cx, focus, root, key, true, modifiers, now);
        }
        for &ch in &levels.typed {
            if let Some(focused) = focus.current() {
                cx.dispatch(
                    Event::new(EventType::TextInput, focused)
                        .with_text(ch)
                        .with_modifiers(modifiers)
                        .at(now),
                );
                focus.apply_requests(cx, root, now);
            }
        }
    }
}

fn key_action(
    cx: &mut EventCx<'_>,
    focus: &mut FocusManager,
    root: NodeId,
    key: Key,
    repeat: bool,
    modifiers: Modifiers,
    now: u64,
) {
    match key {
        Key::Tab => {
            let direction = if modifiers.contains(Modifiers::SHIFT) {
                Navigation::Prev
            } else {
                Navigation::Next
            };
            focus.navigate(cx, root, direction, now);
        }
        Key::Escape => focus.clear(cx, now),
        _ => {
            let Some(focused) = focus.current() else {
                return;
            };
            let result = cx.dispatch(
                Event::new(EventType::KeyDown, focused)
                    .with_key(key, repeat)
                    .with_modifiers(modifiers)
                    .at(now),
            );
            if !result.default_prevented {
                scroll_by_key(cx.tree_mut(), focused, key, modifiers);
            }
        }
    }
    focus.apply_requests(cx, root, now);
}

/// Keyboard scrolling of a focused viewport.
fn scroll_by_key(tree: &mut Tree, viewport: NodeId, key: Key, modifiers: Modifiers) {
    let (Some(state), Some(metrics)) = (tree.scroll_state(viewport), tree.scroll_metrics(viewport))
    else {
        return;
    };
    let config = *state.config();
    let line = if modifiers.contains(Modifiers::SHIFT) {
        config.fast_line_step
    } else {
        config.line_step
    };
    match key {
        Key::ArrowUp => tree.scroll_by(viewport, -line),
        Key::ArrowDown => tree.scroll_by(viewport, line),
        Key::PageUp => tree.scroll_by(viewport, -metrics.viewport),
        Key::PageDown => tree.scroll_by(viewport, metrics.viewport),
        Key::Home => tree.scroll_to_top(viewport),
        Key::End => tree.scroll_to_bottom(viewport),
        _ => None,
    };
}

fn is_modifier(key: Key) -> bool {
    matches!(key, Key::Shift | Key::Control | Key::Alt)
}

/// Whether no interactive node covers `node` at the pressed point, i.e. the
/// pressed interactive node is `node` itself or one of its ancestors.
fn is_uncovered(tree: &Tree, node: NodeId, pressed: Option<NodeId>) -> bool {
    pressed.is_none_or(|p| tree.find_ancestor(node, |_, n| n == p).is_some())
}
