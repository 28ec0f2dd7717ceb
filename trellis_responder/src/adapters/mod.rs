// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Trellis crates.
//!
//! Each adapter is gated behind a feature flag to keep the core responder lightweight.
//!
//! ## Available Adapters
//!
//! - [`tree`] (`tree_adapter` feature): Integration with [`trellis_tree`]. Derives
//!   interactive event paths from the node tree and wraps its hit queries.

#[cfg(feature = "tree_adapter")]
pub mod tree;
