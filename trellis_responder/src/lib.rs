// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=trellis_responder --heading-base-level=0

//! Trellis Responder: a deterministic, `no_std` event model for UI.
//!
//! ## Overview
//!
//! This crate turns "an event aimed at node T" into a DOM-like capture → target → bubble
//! walk over T's ancestors and runs the listeners registered along the way.
//! It does not perform hit testing; the target is chosen by the caller (a hit test,
//! the focused node, or the source of an active drag).
//!
//! ## Pieces
//!
//! - [`event`]: the [`Event`](event::Event) record, [`EventType`](event::EventType), buttons,
//!   keys, and modifiers. Events carry a `bubbles` flag derived from their type, and a
//!   default-prevented flag handlers can set.
//! - [`router`]: reconstructs the root→target path through a
//!   [`ParentLookup`](types::ParentLookup) and emits the dispatch sequence.
//! - [`dispatcher`]: walks a sequence and honors [`Outcome::Stop`](types::Outcome::Stop).
//! - [`listeners`]: per-node, per-type listener registry with id-based removal, and the
//!   reentrancy-safe [`dispatch`](listeners::dispatch) loop.
//! - [`hover`]: edge-triggered enter/leave tracking.
//!
//! ## Ordering guarantees
//!
//! For a target T with path `[R, A, B, T]`:
//! - capture visits R, A, B in that order;
//! - the target phase fires once, on T;
//! - bubble visits B, A, R, and only if the event bubbles.
//!
//! Enter, leave, focus and blur do not bubble. Everything else does.
//!
//! ## Adapters
//!
//! The [`adapters`] module provides integration with other Trellis crates:
//!
//! - **Tree Adapter** (`tree_adapter` feature): derives interactive-only event paths
//!   from a `trellis_tree::Tree`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod dispatcher;
pub mod event;
pub mod hover;
pub mod listeners;
pub mod router;
pub mod types;
