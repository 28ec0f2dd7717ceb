// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handler context and event dispatch.

use alloc::boxed::Box;

use trellis_responder::adapters::tree::event_path;
use trellis_responder::event::{Event, EventType};
use trellis_responder::listeners::{self, ListenerId, Listeners};
use trellis_responder::router::emit_path;
use trellis_responder::types::Outcome;
use trellis_tree::{NodeId, Tree};

use crate::host::Clipboard;

/// An event listener.
///
/// Listeners receive the [`EventCx`] of the running tick and the event, and
/// return whether propagation should continue.
pub type Handler = Box<dyn FnMut(&mut EventCx<'_>, &mut Event<NodeId>) -> Outcome>;

/// Registry of every listener in a [`Ui`](crate::Ui).
pub type HandlerRegistry = Listeners<NodeId, Handler>;

/// What a dispatch did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Dispatched {
    /// At least one listener ran.
    pub handled: bool,
    /// A listener called [`Event::prevent_default`].
    pub default_prevented: bool,
}

impl Dispatched {
    /// A listener ran and nobody prevented the default action.
    pub fn accepted(&self) -> bool {
        self.handled && !self.default_prevented
    }
}

/// Context handed to listeners.
///
/// Gives mutable access to the tree and the listener registry, so a listener may
/// restructure the UI or (un)register listeners mid-dispatch. Focus changes are
/// requested rather than applied: the request is honored once the current
/// dispatch finishes, with the usual blur/focus events.
pub struct EventCx<'a> {
    tree: &'a mut Tree,
    listeners: &'a mut HandlerRegistry,
    clipboard: Option<&'a mut dyn Clipboard>,
    focus_request: Option<Option<NodeId>>,
}

impl core::fmt::Debug for EventCx<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventCx")
            .field("tree", &self.tree)
            .field("listeners", &self.listeners)
            .field("clipboard", &self.clipboard.is_some())
            .field("focus_request", &self.focus_request)
            .finish()
    }
}

impl AsMut<HandlerRegistry> for EventCx<'_> {
    fn as_mut(&mut self) -> &mut HandlerRegistry {
        self.listeners
    }
}

impl<'a> EventCx<'a> {
    pub(crate) fn new(
        tree: &'a mut Tree,
        listeners: &'a mut HandlerRegistry,
        clipboard: Option<&'a mut dyn Clipboard>,
    ) -> Self {
        Self {
            tree,
            listeners,
            clipboard,
            focus_request: None,
        }
    }

    /// The UI tree.
    pub fn tree(&self) -> &Tree {
        self.tree
    }

    /// The UI tree, mutably.
    pub fn tree_mut(&mut self) -> &mut Tree {
        self.tree
    }

    /// Register a listener. Takes effect for the next dispatch.
    pub fn add_listener(
        &mut self,
        node: NodeId,
        kind: EventType,
        handler: impl FnMut(&mut EventCx<'_>, &mut Event<NodeId>) -> Outcome + 'static,
    ) -> ListenerId {
        add_listener(self.tree, self.listeners, node, kind, Box::new(handler))
    }

    /// Unregister a listener. Removing the running listener is allowed.
    pub fn remove_listener(&mut self, node: NodeId, kind: EventType, id: ListenerId) -> bool {
        self.listeners.remove(node, kind, id)
    }

    /// Ask for `node` to be focused once the current dispatch completes.
    ///
    /// Requests for nodes that are not focusable are dropped.
    pub fn request_focus(&mut self, node: NodeId) {
        self.focus_request = Some(Some(node));
    }

    /// Ask for focus to be cleared once the current dispatch completes.
    pub fn request_blur(&mut self) {
        self.focus_request = Some(None);
    }

    /// The host clipboard, if there is one.
    pub fn clipboard(&mut self) -> Option<&mut dyn Clipboard> {
        match &mut self.clipboard {
            Some(c) => Some(&mut **c),
            None => None,
        }
    }

    /// Dispatch `event` along its target's interactive path.
    ///
    /// The path is computed now, from the live tree. Events aimed at removed
    /// nodes are dropped.
    pub fn dispatch(&mut self, mut event: Event<NodeId>) -> Dispatched {
        if !self.tree.is_alive(event.target) {
            tracing::warn!(target = ?event.target, kind = ?event.kind, "dropping event for removed node");
            return Dispatched::default();
        }
        event.path = event_path(self.tree, event.target);
        let seq = emit_path(&event.path, event.bubbles);
        let handled = listeners::dispatch(&seq, &mut event, self, |handler: &mut Handler, cx, event| {
            handler(cx, event)
        });
        Dispatched {
            handled,
            default_prevented: event.default_prevented(),
        }
    }

    pub(crate) fn take_focus_request(&mut self) -> Option<Option<NodeId>> {
        self.focus_request.take()
    }
}

pub(crate) fn add_listener(
    tree: &Tree,
    listeners: &mut HandlerRegistry,
    node: NodeId,
    kind: EventType,
    handler: Handler,
) -> ListenerId {
    if !tree.is_alive(node) {
        tracing::warn!(?node, ?kind, "listener added to a removed node");
    }
    listeners.add(node, kind, handler)
}
