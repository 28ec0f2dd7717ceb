// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Event State: small state machines that turn polled input into events.
//!
//! Hosts that poll input once per frame report *levels* (is this button down right
//! now?). UI events are *edges* (the button went down). The helpers in this crate keep
//! the cross-tick state needed to derive one from the other:
//!
//! - [`edges`]: press/release edges for buttons and keys.
//! - [`repeat`]: two-stage key repeat (initial delay, then fixed interval).
//! - [`click`]: click recognition with movement and time tolerance.
//! - [`drag`]: the generic element drag session.
//!
//! All timestamps are host-provided milliseconds; nothing here reads a clock.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod click;
pub mod drag;
pub mod edges;
pub mod repeat;
