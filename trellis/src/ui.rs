// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Ui`] entry point.

use alloc::boxed::Box;
use alloc::vec;

use hashbrown::HashMap;
use trellis_responder::event::{Event, EventType};
use trellis_responder::listeners::ListenerId;
use trellis_responder::types::Outcome;
use trellis_tree::{NodeDesc, NodeId, Tree};

use crate::config::InputConfig;
use crate::cx::{self, Dispatched, EventCx, HandlerRegistry};
use crate::draw::{self, Surface};
use crate::error::Result;
use crate::focus::FocusManager;
use crate::host::{InputSource, Levels};
use crate::input::{Gesture, InputManager};

/// Per-node update hook, run once per [`Ui::update`] after input processing.
pub type UpdateHook = Box<dyn FnMut(&mut Tree, NodeId) -> Result<()>>;

/// A retained UI: the node tree plus everything needed to turn polled input
/// into events.
///
/// The host calls [`update`](Self::update) once per frame, then
/// [`draw`](Self::draw).
pub struct Ui {
    tree: Tree,
    root: NodeId,
    listeners: HandlerRegistry,
    hooks: HashMap<NodeId, UpdateHook>,
    input: InputManager,
    focus: FocusManager,
    /// Timestamp of the most recent tick, used for events raised between ticks.
    last_tick: u64,
}

impl core::fmt::Debug for Ui {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Ui")
            .field("tree", &self.tree)
            .field("root", &self.root)
            .field("listeners", &self.listeners)
            .field("hooks", &self.hooks.len())
            .field("input", &self.input)
            .field("focus", &self.focus)
            .field("last_tick", &self.last_tick)
            .finish()
    }
}

impl Ui {
    /// A UI whose root node is described by `root`.
    pub fn new(root: NodeDesc) -> Self {
        Self::with_config(root, InputConfig::default())
    }

    /// Like [`new`](Self::new), with custom input tunables.
    pub fn with_config(root: NodeDesc, config: InputConfig) -> Self {
        let mut tree = Tree::new();
        let root = tree.insert(None, root);
        Self {
            tree,
            root,
            listeners: HandlerRegistry::new(),
            hooks: HashMap::new(),
            input: InputManager::new(&config),
            focus: FocusManager::new(config.wrap),
            last_tick: 0,
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The node tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The node tree, mutably.
    ///
    /// Nodes removed through this handle keep their listeners and hooks until the
    /// next [`update`](Self::update); prefer [`remove`](Self::remove).
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// Insert a node under `parent`.
    pub fn insert(&mut self, parent: NodeId, desc: NodeDesc) -> NodeId {
        self.tree.insert(Some(parent), desc)
    }

    /// Remove `node` and its subtree, with their listeners and hooks.
    ///
    /// The root cannot be removed.
    pub fn remove(&mut self, node: NodeId) {
        if node == self.root {
            tracing::warn!(?node, "refusing to remove the root");
            return;
        }
        self.tree.remove(node);
        self.prune();
    }

    /// Register `handler` for `kind` events at `node`.
    pub fn add_event_listener(
        &mut self,
        node: NodeId,
        kind: EventType,
        handler: impl FnMut(&mut EventCx<'_>, &mut Event<NodeId>) -> Outcome + 'static,
    ) -> ListenerId {
        cx::add_listener(&self.tree, &mut self.listeners, node, kind, Box::new(handler))
    }

    /// Unregister a listener. Returns whether it existed.
    pub fn remove_event_listener(&mut self, node: NodeId, kind: EventType, id: ListenerId) -> bool {
        self.listeners.remove(node, kind, id)
    }

    /// Attach `hook` to `node`, replacing any previous hook.
    pub fn set_update_hook(
        &mut self,
        node: NodeId,
        hook: impl FnMut(&mut Tree, NodeId) -> Result<()> + 'static,
    ) {
        self.hooks.insert(node, Box::new(hook));
    }

    /// Detach the hook of `node`. Returns whether there was one.
    pub fn remove_update_hook(&mut self, node: NodeId) -> bool {
        self.hooks.remove(&node).is_some()
    }

    /// Topmost interactive node under the cursor as of the last tick.
    pub fn hovered(&self) -> Option<NodeId> {
        self.input.hovered()
    }

    /// Source of the element drag in progress.
    pub fn drag_source(&self) -> Option<NodeId> {
        self.input.drag_source()
    }

    /// The exclusive pointer gesture in progress.
    pub fn active_gesture(&self) -> Option<Gesture> {
        self.input.gesture()
    }

    /// Focused node.
    pub fn focused(&self) -> Option<NodeId> {
        self.focus.current()
    }

    /// Whether focus handling is enabled.
    pub fn is_focus_enabled(&self) -> bool {
        self.focus.is_enabled()
    }

    /// Focus `node`, or clear focus with `None`. Nodes that cannot take focus
    /// clear it. Dispatches blur/focus as usual.
    pub fn set_focus(&mut self, node: Option<NodeId>) {
        let (root, now) = (self.root, self.last_tick);
        let mut cx = EventCx::new(&mut self.tree, &mut self.listeners, None);
        self.focus.set_focus(&mut cx, root, node, now);
        self.focus.apply_requests(&mut cx, root, now);
    }

    /// Enable or disable focus handling. Disabling blurs the focused node and
    /// ignores focus operations until re-enabled.
    pub fn set_focus_enabled(&mut self, enabled: bool) {
        let (root, now) = (self.root, self.last_tick);
        let mut cx = EventCx::new(&mut self.tree, &mut self.listeners, None);
        self.focus.set_enabled(&mut cx, enabled, now);
        self.focus.apply_requests(&mut cx, root, now);
    }

    /// Dispatch an application-made event along its target's interactive path.
    pub fn dispatch(&mut self, event: Event<NodeId>) -> Dispatched {
        let root = self.root;
        let mut cx = EventCx::new(&mut self.tree, &mut self.listeners, None);
        let result = cx.dispatch(event);
        self.focus.apply_requests(&mut cx, root, self.last_tick);
        self.prune();
        result
    }

    /// Run one tick: poll `host`, dispatch the resulting events, then run update
    /// hooks depth-first in child order.
    ///
    /// Stops at the first failing hook and returns its error unchanged.
    pub fn update(&mut self, host: &mut impl InputSource) -> Result<()> {
        let levels = Levels::poll(host);
        self.last_tick = levels.now;
        {
            let mut cx = EventCx::new(&mut self.tree, &mut self.listeners, host.clipboard());
            self.input
                .process(&mut cx, &mut self.focus, self.root, &levels);
        }
        self.prune();
        let result = self.run_hooks();
        self.prune();
        result
    }

    /// Hand the visible tree to `surface` in paint order.
    pub fn draw(&self, surface: &mut impl Surface) {
        draw::draw_tree(&self.tree, self.root, surface);
    }

    fn run_hooks(&mut self) -> Result<()> {
        if self.hooks.is_empty() {
            return Ok(());
        }
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if !self.tree.is_alive(id) {
                continue;
            }
            if let Some(hook) = self.hooks.get_mut(&id) {
                hook(&mut self.tree, id).inspect_err(|err| {
                    tracing::debug!(node = ?id, %err, "update hook failed");
                })?;
            }
            if self.tree.is_alive(id) {
                stack.extend(self.tree.children_of(id).iter().rev().copied());
            }
        }
        Ok(())
    }

    /// Drop listeners and hooks of removed nodes.
    fn prune(&mut self) {
        let tree = &self.tree;
        self.listeners.retain_nodes(|n| tree.is_alive(n));
        self.hooks.retain(|n, _| tree.is_alive(*n));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UpdateError;
    use crate::host::FrameInput;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use kurbo::{Point, Size};
    use trellis_tree::Position;

    fn ui() -> Ui {
        Ui::new(NodeDesc::new(
            Position::absolute(0.0, 0.0),
            Size::new(400.0, 300.0),
        ))
    }

    fn boxed(x: f64, y: f64) -> NodeDesc {
        NodeDesc::new(Position::relative(x, y), Size::new(50.0, 50.0))
    }

    #[test]
    fn hooks_run_depth_first_in_child_order() {
        let mut ui = ui();
        let root = ui.root();
        let a = ui.insert(root, boxed(0.0, 0.0));
        let a1 = ui.insert(a, boxed(0.0, 0.0));
        let b = ui.insert(root, boxed(60.0, 0.0));
        let seen = Rc::new(RefCell::new(Vec::new()));
        for node in [b, a1, root, a] {
            let seen = seen.clone();
            ui.set_update_hook(node, move |_, id| {
                seen.borrow_mut().push(id);
                Ok(())
            });
        }
        ui.update(&mut FrameInput::default()).unwrap();
        assert_eq!(*seen.borrow(), [root, a, a1, b]);
    }

    #[test]
    fn first_failing_hook_stops_the_walk() {
        let mut ui = ui();
        let root = ui.root();
        let a = ui.insert(root, boxed(0.0, 0.0));
        let b = ui.insert(root, boxed(60.0, 0.0));
        let ran_b = Rc::new(RefCell::new(false));
        ui.set_update_hook(a, |_, id| Err(UpdateError::node(id, "broken")));
        let flag = ran_b.clone();
        ui.set_update_hook(b, move |_, _| {
            *flag.borrow_mut() = true;
            Ok(())
        });
        let err = ui.update(&mut FrameInput::default()).unwrap_err();
        assert!(
            matches!(err, UpdateError::Node { node, .. } if node == a),
            "the failing node's error is returned unchanged"
        );
        assert!(!*ran_b.borrow(), "later hooks do not run after a failure");
    }

    #[test]
    fn removing_a_node_drops_its_listeners_and_hooks() {
        let mut ui = ui();
        let root = ui.root();
        let a = ui.insert(root, boxed(0.0, 0.0).interactive());
        let child = ui.insert(a, boxed(0.0, 0.0).interactive());
        ui.add_event_listener(child, EventType::Click, |_, _| Outcome::Continue);
        ui.set_update_hook(child, |_, _| Ok(()));
        ui.remove(a);
        assert!(ui.listeners.is_empty(), "listeners of removed subtree are dropped");
        assert!(ui.hooks.is_empty(), "hooks of removed subtree are dropped");

        ui.remove(root);
        assert!(ui.tree().is_alive(root), "the root cannot be removed");
    }

    #[test]
    fn set_focus_dispatches_blur_then_focus() {
        let mut ui = ui();
        let root = ui.root();
        let a = ui.insert(root, boxed(0.0, 0.0).interactive().focusable(0));
        let b = ui.insert(root, boxed(60.0, 0.0).interactive().focusable(0));
        let log = Rc::new(RefCell::new(Vec::new()));
        for node in [a, b] {
            for kind in [EventType::Focus, EventType::Blur] {
                let log = log.clone();
                ui.add_event_listener(node, kind, move |_, ev| {
                    log.borrow_mut().push((ev.kind, ev.target, ev.related_target));
                    Outcome::Continue
                });
            }
        }
        ui.set_focus(Some(a));
        ui.set_focus(Some(b));
        assert_eq!(
            *log.borrow(),
            [
                (EventType::Focus, a, None),
                (EventType::Blur, a, Some(b)),
                (EventType::Focus, b, Some(a)),
            ]
        );

        ui.set_focus_enabled(false);
        assert_eq!(ui.focused(), None, "disabling blurs");
        ui.set_focus(Some(a));
        assert_eq!(ui.focused(), None, "ignored while disabled");
        ui.set_focus_enabled(true);
        ui.set_focus(Some(a));
        assert_eq!(ui.focused(), Some(a));
    }

    #[test]
    fn focus_requests_from_listeners_apply_after_dispatch() {
        let mut ui = ui();
        let root = ui.root();
        let button = ui.insert(root, boxed(0.0, 0.0).interactive());
        let field = ui.insert(root, boxed(60.0, 0.0).interactive().focusable(0));
        ui.add_event_listener(button, EventType::Click, move |cx, _| {
            cx.request_focus(field);
            Outcome::Continue
        });
        ui.dispatch(Event::new(EventType::Click, button));
        assert_eq!(ui.focused(), Some(field));
    }

    #[test]
    fn focused_node_is_blurred_when_disabled() {
        let mut ui = ui();
        let root = ui.root();
        let field = ui.insert(root, boxed(0.0, 0.0).interactive().focusable(0));
        ui.set_focus(Some(field));
        ui.tree_mut().set_disabled(field, true);
        ui.update(&mut FrameInput::at(Point::new(300.0, 300.0), 16)).unwrap();
        assert_eq!(ui.focused(), None, "a disabled node cannot keep focus");
    }
}
