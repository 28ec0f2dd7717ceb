// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The one propagated error path: per-node update hooks.

use alloc::borrow::Cow;
use alloc::boxed::Box;

use trellis_tree::NodeId;

/// Failure reported by a node's update hook.
///
/// [`Ui::update`](crate::Ui::update) stops at the first failing hook and returns
/// its error unchanged.
#[derive(Debug, thiserror::Error)]
pub enum UpdateError {
    /// A node rejected the update with a message.
    #[error("node {node:?} failed to update: {reason}")]
    Node {
        /// The failing node.
        node: NodeId,
        /// Human-readable reason.
        reason: Cow<'static, str>,
    },
    /// Any other error surfaced by application code.
    #[error(transparent)]
    Other(#[from] Box<dyn core::error::Error + Send + Sync>),
}

impl UpdateError {
    /// Shorthand for [`UpdateError::Node`].
    pub fn node(node: NodeId, reason: impl Into<Cow<'static, str>>) -> Self {
        Self::Node {
            node,
            reason: reason.into(),
        }
    }
}

/// Result alias used by update hooks and [`Ui::update`](crate::Ui::update).
pub type Result<T, E = UpdateError> = core::result::Result<T, E>;
