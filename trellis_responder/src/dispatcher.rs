// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Phase walker: visit a dispatch sequence in order and honor [`Outcome::Stop`].
//!
//! [`run`] knows nothing about listeners or events; it calls one closure per
//! [`Dispatch`] entry and stops as soon as that closure returns [`Outcome::Stop`].
//! [`listeners::dispatch`](crate::listeners::dispatch) builds on it to run every
//! registered listener of each entry.
//!
//! ```
//! use trellis_responder::dispatcher;
//! use trellis_responder::router::emit_path;
//! use trellis_responder::types::{Outcome, Phase};
//!
//! let seq = emit_path(&[1_u32, 2, 3], true);
//! let mut seen = Vec::new();
//! let stopped = dispatcher::run(&seq, &mut seen, |d, seen| {
//!     seen.push((d.phase, d.node));
//!     Outcome::Continue
//! });
//! assert!(stopped.is_none());
//! assert_eq!(seen, vec![
//!     (Phase::Capture, 1), (Phase::Capture, 2),
//!     (Phase::Target, 3),
//!     (Phase::Bubble, 2), (Phase::Bubble, 1),
//! ]);
//! ```

use crate::types::{Dispatch, Outcome};

/// Run `handler` over `seq` in order.
///
/// Returns `None` if every entry was visited, or the entry whose handler
/// returned [`Outcome::Stop`]. Entries after it are skipped, so stopping in
/// capture means neither target nor bubble runs.
pub fn run<'a, K, E>(
    seq: &'a [Dispatch<K>],
    event: &mut E,
    mut handler: impl FnMut(&Dispatch<K>, &mut E) -> Outcome,
) -> Option<&'a Dispatch<K>> {
    seq.iter().find(|d| handler(d, event) == Outcome::Stop)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::emit_path;
    use crate::types::Phase;
    use alloc::vec;
    use alloc::vec::Vec;

    fn stop_at(phase: Phase, node: u32) -> (Option<Dispatch<u32>>, Vec<(Phase, u32)>) {
        let seq = emit_path(&[1_u32, 2], true);
        let mut seen = Vec::new();
        let stopped = run(&seq, &mut seen, |d, seen| {
            seen.push((d.phase, d.node));
            if d.phase == phase && d.node == node {
                Outcome::Stop
            } else {
                Outcome::Continue
            }
        })
        .copied();
        (stopped, seen)
    }

    #[test]
    fn stop_in_capture_skips_target_and_bubble() {
        let (stopped, seen) = stop_at(Phase::Capture, 1);
        assert_eq!(stopped, Some(Dispatch::capture(1)));
        assert_eq!(seen, vec![(Phase::Capture, 1)]);
    }

    #[test]
    fn stop_in_bubble_reports_location() {
        let (stopped, seen) = stop_at(Phase::Bubble, 1);
        assert_eq!(stopped, Some(Dispatch::bubble(1)));
        assert_eq!(seen.len(), 3, "capture, target, bubble all visited");
    }

    #[test]
    fn event_payload_carries_state_across_entries() {
        let seq = emit_path(&[1_u32, 2], false);
        let mut count = 0_usize;
        let stopped = run(&seq, &mut count, |_, count| {
            *count += 1;
            Outcome::Continue
        });
        assert!(stopped.is_none());
        assert_eq!(count, 2, "capture(1) and target(2) only, no bubble");
    }
}
