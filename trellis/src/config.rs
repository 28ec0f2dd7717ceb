// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input configuration.

use trellis_event_state::repeat::RepeatConfig;
use trellis_focus::WrapMode;

/// Tunables for the input manager.
///
/// Scroll steps live on each viewport's [`ScrollConfig`](trellis_tree::ScrollConfig)
/// since they are per-node.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InputConfig {
    /// Two-stage repeat timing for held keys (Tab, arrows, paging keys).
    pub repeat: RepeatConfig,
    /// Max pointer travel for a release on a different node to still click.
    pub click_distance: Option<f64>,
    /// Max press duration in milliseconds for a release on a different node to still click.
    pub click_time: Option<u64>,
    /// Tab order wrapping.
    pub wrap: WrapMode,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            repeat: RepeatConfig::default(),
            click_distance: Some(5.0),
            click_time: Some(100),
            wrap: WrapMode::Wrap,
        }
    }
}
