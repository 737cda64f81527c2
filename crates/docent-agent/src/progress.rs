//! Progress snapshot delivery.
//!
//! The orchestrator emits an immutable snapshot of the in-progress turn at
//! each state transition: once at creation, once after every completed tool
//! invocation, and once at the terminal state. Every emission clones the
//! turn, so a consumer rendering asynchronously can never observe a
//! half-written structure. Delivery is non-blocking; a dropped receiver is
//! tolerated so a dead consumer cannot stall the turn.

use tokio::sync::mpsc;

use crate::types::Turn;

/// Sender half of the snapshot channel.
pub type SnapshotSender = mpsc::UnboundedSender<Turn>;

/// Receiver half of the snapshot channel.
pub type SnapshotReceiver = mpsc::UnboundedReceiver<Turn>;

/// Create a snapshot channel pair.
pub fn snapshot_channel() -> (SnapshotSender, SnapshotReceiver) {
    mpsc::unbounded_channel()
}

/// Emit a snapshot of the turn to the sink.
pub(crate) fn emit(sink: &SnapshotSender, turn: &Turn) {
    if sink.send(turn.clone()).is_err() {
        tracing::trace!(turn_id = %turn.turn_id, "Snapshot receiver dropped; emission skipped");
    }
}
