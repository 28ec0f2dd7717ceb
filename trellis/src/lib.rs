// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis --heading-base-level=0

//! Trellis: the event core of a retained-mode UI.
//!
//! Trellis ties the lower-level crates together behind one type, [`Ui`]:
//!
//! - [`trellis_tree`] owns the nodes, their geometry and hit testing.
//! - [`trellis_responder`] routes events through capture, target and bubble phases.
//! - [`trellis_focus`] decides where Tab and Shift+Tab go.
//! - [`trellis_event_state`] turns polled levels into edges, repeats, clicks and drags.
//!
//! A host drives the UI with two calls per frame:
//!
//! 1. [`Ui::update`] polls an [`InputSource`](host::InputSource), dispatches the
//!    events the input implies (hover, press, click, wheel, drag, keys, focus),
//!    runs exclusive gestures (moving a window by its header, dragging a scroll
//!    bar thumb), then runs per-node update hooks.
//! 2. [`Ui::draw`] walks the visible tree in paint order for a [`Surface`].
//!
//! ## Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use kurbo::{Point, Size};
//! use trellis::host::FrameInput;
//! use trellis::{EventType, NodeDesc, Outcome, PointerButton, Position, Ui};
//!
//! let mut ui = Ui::new(NodeDesc::new(Position::absolute(0.0, 0.0), Size::new(300.0, 200.0)));
//! let button = ui.insert(
//!     ui.root(),
//!     NodeDesc::new(Position::relative(10.0, 10.0), Size::new(80.0, 24.0)).interactive(),
//! );
//!
//! let clicks = Rc::new(Cell::new(0));
//! let counter = clicks.clone();
//! ui.add_event_listener(button, EventType::Click, move |_, _| {
//!     counter.set(counter.get() + 1);
//!     Outcome::Continue
//! });
//!
//! let at = Point::new(20.0, 20.0);
//! ui.update(&mut FrameInput::at(at, 0)).unwrap();
//! ui.update(&mut FrameInput::at(at, 16).press(PointerButton::Primary)).unwrap();
//! ui.update(&mut FrameInput::at(at, 32)).unwrap();
//! assert_eq!(clicks.get(), 1);
//! ```
//!
//! ## Events
//!
//! Events travel along the *interactive* ancestors of their target: nodes that
//! merely group or decorate are skipped. Enter, leave, focus and blur do not
//! bubble. Pointer events go to the topmost interactive node under the cursor,
//! wheel events to the topmost scrollable viewport, keyboard events to the
//! focused node, and drag events to the drag source.
//!
//! Listeners may call [`Event::prevent_default`] to suppress the toolkit's own
//! reaction: a prevented `down` starts no window move or thumb drag, a prevented
//! `wheel` or `key-down` does not scroll.
//!
//! ## Logging
//!
//! State transitions (gestures, drags, focus) are reported with `tracing` at
//! `debug`, each dispatch at `trace`. Installing a subscriber is up to the host.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod cx;
mod draw;
mod error;
mod focus;
pub mod host;
mod input;
mod ui;

pub use config::InputConfig;
pub use cx::{Dispatched, EventCx, Handler, HandlerRegistry};
pub use draw::Surface;
pub use error::{Result, UpdateError};
pub use input::Gesture;
pub use ui::{Ui, UpdateHook};

pub use trellis_event_state::repeat::RepeatConfig;
pub use trellis_focus::WrapMode;
pub use trellis_responder::event::{Event, EventType, Key, Modifiers, PointerButton};
pub use trellis_responder::listeners::ListenerId;
pub use trellis_responder::types::{Outcome, Phase};
pub use trellis_tree::{
    ChildOrder, NodeDesc, NodeFlags, NodeId, Position, ScrollConfig, ScrollState, Tree,
    WindowState,
};

pub use trellis_event_state;
pub use trellis_focus;
pub use trellis_responder;
pub use trellis_tree;
