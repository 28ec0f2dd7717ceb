// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener registry and the listener-aware dispatch loop.
//!
//! ## Registry
//!
//! [`Listeners`] keeps, per `(node, event type)`, an ordered list of handlers.
//! Registration returns a [`ListenerId`]; removal is by id only. Ids increase
//! monotonically and are never reused.
//!
//! ## Reentrancy
//!
//! Handlers may register or remove listeners (their own included) while an event
//! is being dispatched. [`dispatch`] snapshots the ids of a node's listeners before
//! running them and takes each handler out of its slot for the duration of the
//! call, so:
//!
//! - listeners added during dispatch do not run for the current event;
//! - listeners removed during dispatch do not run if they had not run yet;
//! - a handler that removes itself is dropped once it returns.
//!
//! ```
//! use trellis_responder::event::{Event, EventType};
//! use trellis_responder::listeners::{Listeners, dispatch};
//! use trellis_responder::router::emit_path;
//! use trellis_responder::types::Outcome;
//!
//! type Handler = fn(&mut Vec<u32>, &mut Event<u32>) -> Outcome;
//!
//! struct Cx {
//!     listeners: Listeners<u32, Handler>,
//!     log: Vec<u32>,
//! }
//! impl AsMut<Listeners<u32, Handler>> for Cx {
//!     fn as_mut(&mut self) -> &mut Listeners<u32, Handler> {
//!         &mut self.listeners
//!     }
//! }
//!
//! let mut cx = Cx { listeners: Listeners::new(), log: Vec::new() };
//! cx.listeners.add(1, EventType::Down, |log, ev| {
//!     log.push(ev.current_target.unwrap());
//!     Outcome::Continue
//! });
//! cx.listeners.add(2, EventType::Down, |log, ev| {
//!     log.push(ev.current_target.unwrap());
//!     Outcome::Continue
//! });
//!
//! let mut ev = Event::new(EventType::Down, 2);
//! let seq = emit_path(&[1, 2], ev.bubbles);
//! let handled = dispatch(&seq, &mut ev, &mut cx, |h, cx, ev| h(&mut cx.log, ev));
//! assert!(handled);
//! assert_eq!(cx.log, vec![1, 2, 1]);
//! ```

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::dispatcher;
use crate::event::{Event, EventType};
use crate::types::{Dispatch, Outcome};

/// Opaque handle returned when registering a listener.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

struct Slot<H> {
    id: ListenerId,
    /// `None` while the handler is running.
    handler: Option<H>,
}

/// Per-node, per-event-type listener registry.
pub struct Listeners<K, H> {
    next_id: u64,
    map: HashMap<(K, EventType), Vec<Slot<H>>>,
}

impl<K, H> core::fmt::Debug for Listeners<K, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let listeners: usize = self.map.values().map(Vec::len).sum();
        f.debug_struct("Listeners")
            .field("keys", &self.map.len())
            .field("listeners", &listeners)
            .finish_non_exhaustive()
    }
}

impl<K: Copy + Eq + Hash, H> Default for Listeners<K, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash, H> Listeners<K, H> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            next_id: 0,
            map: HashMap::new(),
        }
    }

    /// Register `handler` for `kind` events on `node`. Runs after previously
    /// registered listeners of the same node and type.
    ///
    /// # Panics
    ///
    /// Panics if the listener id space is exhausted.
    pub fn add(&mut self, node: K, kind: EventType, handler: H) -> ListenerId {
        self.next_id = self
            .next_id
            .checked_add(1)
            .expect("listener id counter overflowed");
        let id = ListenerId(self.next_id);
        self.map.entry((node, kind)).or_default().push(Slot {
            id,
            handler: Some(handler),
        });
        id
    }

    /// Remove the listener `id` registered for `kind` on `node`.
    ///
    /// Returns `false` if no such listener exists.
    pub fn remove(&mut self, node: K, kind: EventType, id: ListenerId) -> bool {
        let Some(list) = self.map.get_mut(&(node, kind)) else {
            return false;
        };
        let Some(pos) = list.iter().position(|s| s.id == id) else {
            return false;
        };
        list.remove(pos);
        if list.is_empty() {
            self.map.remove(&(node, kind));
        }
        true
    }

    /// Drop every listener registered on `node`. Returns how many were removed.
    pub fn remove_node(&mut self, node: K) -> usize {
        let mut removed = 0;
        self.map.retain(|(n, _), list| {
            if *n == node {
                removed += list.len();
                false
            } else {
                true
            }
        });
        removed
    }

    /// Keep only the listeners of nodes for which `keep` returns true.
    pub fn retain_nodes(&mut self, mut keep: impl FnMut(K) -> bool) {
        self.map.retain(|(n, _), _| keep(*n));
    }

    /// Whether `node` has at least one listener for `kind`.
    pub fn has_listeners(&self, node: K, kind: EventType) -> bool {
        self.map.contains_key(&(node, kind))
    }

    /// Total number of registered listeners.
    pub fn len(&self) -> usize {
        self.map.values().map(Vec::len).sum()
    }

    /// Whether no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Ids of the listeners for `kind` on `node`, in registration order.
    pub fn snapshot(&self, node: K, kind: EventType) -> SmallVec<[ListenerId; 4]> {
        self.map
            .get(&(node, kind))
            .map(|list| list.iter().map(|s| s.id).collect())
            .unwrap_or_default()
    }

    /// Take the handler `id` out of its slot. Returns `None` if it was removed or
    /// is already running.
    pub fn take(&mut self, node: K, kind: EventType, id: ListenerId) -> Option<H> {
        self.map
            .get_mut(&(node, kind))?
            .iter_mut()
            .find(|s| s.id == id)?
            .handler
            .take()
    }

    /// Put a handler back after it ran. If the listener was removed meanwhile the
    /// handler is dropped and `false` is returned.
    pub fn restore(&mut self, node: K, kind: EventType, id: ListenerId, handler: H) -> bool {
        let slot = self
            .map
            .get_mut(&(node, kind))
            .and_then(|list| list.iter_mut().find(|s| s.id == id));
        match slot {
            Some(slot) => {
                slot.handler = Some(handler);
                true
            }
            None => false,
        }
    }
}

/// Run every listener along `seq` for `event`.
///
/// For each entry the event's `phase` and `current_target` are updated, then
/// the node's listeners for `event.kind` run in registration order through
/// `call`, which receives the handler, the context `cx`, and the event. An
/// [`Outcome::Stop`] ends propagation immediately.
///
/// Returns whether at least one listener ran.
pub fn dispatch<K, H, C>(
    seq: &[Dispatch<K>],
    event: &mut Event<K>,
    cx: &mut C,
    mut call: impl FnMut(&mut H, &mut C, &mut Event<K>) -> Outcome,
) -> bool
where
    K: Copy + Eq + Hash,
    C: AsMut<Listeners<K, H>>,
{
    let kind = event.kind;
    let mut handled = false;
    let stopped = dispatcher::run(seq, event, |d, event| {
        event.phase = d.phase;
        event.current_target = Some(d.node);
        for id in cx.as_mut().snapshot(d.node, kind) {
            let Some(mut handler) = cx.as_mut().take(d.node, kind, id) else {
                continue;
            };
            handled = true;
            let outcome = call(&mut handler, cx, event);
            cx.as_mut().restore(d.node, kind, id, handler);
            if outcome == Outcome::Stop {
                return Outcome::Stop;
            }
        }
        Outcome::Continue
    });
    tracing::trace!(?kind, handled, stopped = stopped.is_some(), "event dispatched");
    event.current_target = None;
    handled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::emit_path;
    use crate::types::Phase;
    use alloc::boxed::Box;
    use alloc::vec;

    type Handler = Box<dyn FnMut(&mut Cx, &mut Event<u32>) -> Outcome>;

    #[derive(Default)]
    struct Cx {
        listeners: Listeners<u32, Handler>,
        log: Vec<(Phase, u32, &'static str)>,
    }

    impl AsMut<Listeners<u32, Handler>> for Cx {
        fn as_mut(&mut self) -> &mut Listeners<u32, Handler> {
            &mut self.listeners
        }
    }

    fn logger(tag: &'static str) -> Handler {
        Box::new(move |cx, ev| {
            cx.log.push((ev.phase, ev.current_target.unwrap(), tag));
            Outcome::Continue
        })
    }

    fn fire(cx: &mut Cx, kind: EventType, path: &[u32]) -> bool {
        let mut ev = Event::new(kind, *path.last().unwrap());
        ev.path = path.iter().copied().collect();
        let seq = emit_path(path, ev.bubbles);
        dispatch(&seq, &mut ev, cx, |h, cx, ev| h(cx, ev))
    }

    #[test]
    fn ids_are_unique_and_removal_is_by_id() {
        let mut cx = Cx::default();
        let a = cx.listeners.add(1, EventType::Down, logger("a"));
        let b = cx.listeners.add(1, EventType::Down, logger("b"));
        assert_ne!(a, b);
        assert!(cx.listeners.remove(1, EventType::Down, a));
        assert!(!cx.listeners.remove(1, EventType::Down, a), "second removal is a no-op");
        assert!(!cx.listeners.remove(1, EventType::Up, b), "wrong type does not match");
        fire(&mut cx, EventType::Down, &[1]);
        assert_eq!(cx.log, vec![(Phase::Target, 1, "b")]);
    }

    #[test]
    fn listeners_run_per_phase_in_registration_order() {
        let mut cx = Cx::default();
        cx.listeners.add(1, EventType::Up, logger("root-1"));
        cx.listeners.add(1, EventType::Up, logger("root-2"));
        cx.listeners.add(2, EventType::Up, logger("leaf"));
        assert!(fire(&mut cx, EventType::Up, &[1, 2]));
        assert_eq!(
            cx.log,
            vec![
                (Phase::Capture, 1, "root-1"),
                (Phase::Capture, 1, "root-2"),
                (Phase::Target, 2, "leaf"),
                (Phase::Bubble, 1, "root-1"),
                (Phase::Bubble, 1, "root-2"),
            ]
        );
    }

    #[test]
    fn unhandled_when_no_listener_runs() {
        let mut cx = Cx::default();
        cx.listeners.add(1, EventType::Up, logger("other type"));
        assert!(!fire(&mut cx, EventType::Down, &[1, 2]));
        assert!(cx.log.is_empty());
    }

    #[test]
    fn handler_can_remove_itself_and_siblings_during_dispatch() {
        let mut cx = Cx::default();
        let first = cx.listeners.add(
            1,
            EventType::Click,
            Box::new(|cx: &mut Cx, _ev: &mut Event<u32>| {
                // Remove everything on this node, including ourselves.
                cx.listeners.remove_node(1);
                cx.log.push((Phase::Target, 1, "first"));
                Outcome::Continue
            }),
        );
        cx.listeners.add(1, EventType::Click, logger("second"));
        fire(&mut cx, EventType::Click, &[1]);
        assert_eq!(cx.log, vec![(Phase::Target, 1, "first")]);
        assert!(cx.listeners.is_empty());
        assert!(!cx.listeners.remove(1, EventType::Click, first));
    }

    #[test]
    fn listeners_added_during_dispatch_wait_for_next_event() {
        let mut cx = Cx::default();
        cx.listeners.add(
            1,
            EventType::Down,
            Box::new(|cx: &mut Cx, _ev: &mut Event<u32>| {
                cx.listeners.add(1, EventType::Down, logger("late"));
                Outcome::Continue
            }),
        );
        fire(&mut cx, EventType::Down, &[1]);
        assert!(cx.log.is_empty());
        fire(&mut cx, EventType::Down, &[1]);
        assert_eq!(cx.log, vec![(Phase::Target, 1, "late")]);
    }

    #[test]
    fn stop_skips_remaining_listeners_and_phases() {
        let mut cx = Cx::default();
        cx.listeners.add(
            1,
            EventType::Down,
            Box::new(|cx: &mut Cx, ev: &mut Event<u32>| {
                cx.log.push((ev.phase, 1, "stopper"));
                Outcome::Stop
            }),
        );
        cx.listeners.add(1, EventType::Down, logger("never"));
        cx.listeners.add(2, EventType::Down, logger("never"));
        assert!(fire(&mut cx, EventType::Down, &[1, 2]));
        assert_eq!(cx.log, vec![(Phase::Capture, 1, "stopper")]);
    }

    #[test]
    fn remove_node_and_retain() {
        let mut listeners: Listeners<u32, ()> = Listeners::new();
        listeners.add(1, EventType::Down, ());
        listeners.add(1, EventType::Up, ());
        listeners.add(2, EventType::Up, ());
        assert_eq!(listeners.len(), 3);
        assert_eq!(listeners.remove_node(1), 2);
        assert!(!listeners.has_listeners(1, EventType::Down));
        listeners.retain_nodes(|n| n != 2);
        assert!(listeners.is_empty());
    }
}
