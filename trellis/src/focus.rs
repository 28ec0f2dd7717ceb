// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard focus glued to the tree and the dispatcher.

use trellis_focus::{FocusChange, FocusOrder, FocusState, Navigation, TabOrderPolicy, WrapMode};
use trellis_responder::event::{Event, EventType};
use trellis_tree::{NodeId, Tree};

use crate::cx::EventCx;

/// Bound on focus requests chained through blur/focus listeners in one step.
const MAX_CHAINED_REQUESTS: usize = 8;

#[derive(Clone, Debug)]
pub(crate) struct FocusManager {
    state: FocusState<NodeId>,
    policy: TabOrderPolicy,
}

impl FocusManager {
    pub(crate) fn new(wrap: WrapMode) -> Self {
        Self {
            state: FocusState::new(),
            policy: TabOrderPolicy { wrap },
        }
    }

    pub(crate) fn current(&self) -> Option<NodeId> {
        self.state.current()
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }

    /// Focus `next`, or clear focus if `next` is `None` or cannot take focus.
    pub(crate) fn set_focus(
        &mut self,
        cx: &mut EventCx<'_>,
        root: NodeId,
        next: Option<NodeId>,
        now: u64,
    ) {
        let next = next.filter(|n| can_focus(cx.tree(), root, *n));
        let change = self.state.set_focus(next);
        self.emit(cx, change, now);
    }

    pub(crate) fn clear(&mut self, cx: &mut EventCx<'_>, now: u64) {
        let change = self.state.clear();
        self.emit(cx, change, now);
    }

    /// Tab / Shift+Tab. The order is rebuilt from the live tree on every call.
    pub(crate) fn navigate(
        &mut self,
        cx: &mut EventCx<'_>,
        root: NodeId,
        direction: Navigation,
        now: u64,
    ) {
        let order = FocusOrder::from_discovery(cx.tree().focusable_nodes(root));
        let change = self.state.navigate(direction, &order, &self.policy);
        self.emit(cx, change, now);
    }

    pub(crate) fn set_enabled(&mut self, cx: &mut EventCx<'_>, enabled: bool, now: u64) {
        let change = self.state.set_enabled(enabled);
        self.emit(cx, change, now);
    }

    /// Drop focus from a node that was removed, or blur one that can no longer
    /// take focus (disabled, hidden, detached).
    pub(crate) fn validate(&mut self, cx: &mut EventCx<'_>, root: NodeId, now: u64) {
        let Some(current) = self.state.current() else {
            return;
        };
        if !cx.tree().is_alive(current) {
            self.state.forget();
            tracing::debug!(node = ?current, "focused node removed");
        } else if !can_focus(cx.tree(), root, current) {
            self.clear(cx, now);
        }
    }

    /// Honor focus requests made by listeners, including requests made by the
    /// blur/focus listeners that honoring a request runs.
    pub(crate) fn apply_requests(&mut self, cx: &mut EventCx<'_>, root: NodeId, now: u64) {
        for _ in 0..MAX_CHAINED_REQUESTS {
            let Some(request) = cx.take_focus_request() else {
                return;
            };
            if let Some(node) = request
                && !can_focus(cx.tree(), root, node)
            {
                tracing::warn!(?node, "ignoring focus request for a node that cannot take focus");
                continue;
            }
            self.set_focus(cx, root, request, now);
        }
        if cx.take_focus_request().is_some() {
            tracing::warn!("dropping focus request: too many chained requests");
        }
    }

    fn emit(&self, cx: &mut EventCx<'_>, change: Option<FocusChange<NodeId>>, now: u64) {
        let Some(FocusChange { blur, focus }) = change else {
            return;
        };
        tracing::debug!(?blur, ?focus, "focus changed");
        if let Some(old) = blur {
            cx.dispatch(Event::new(EventType::Blur, old).with_related(focus).at(now));
        }
        if let Some(new) = focus {
            cx.dispatch(Event::new(EventType::Focus, new).with_related(blur).at(now));
        }
    }
}

fn can_focus(tree: &Tree, root: NodeId, node: NodeId) -> bool {
    tree.is_focusable(node) && tree.find_ancestor(node, |_, n| n == root).is_some()
}
