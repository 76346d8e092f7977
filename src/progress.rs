//! Streaming progress for the optimizer (C9 point 5).
//!
//! The sink is an in-process, latest-wins channel: the optimizer never
//! blocks on a slow observer. `std::sync::mpsc::sync_channel(1)` gives us
//! that for free — a full channel means the consumer hasn't drained yet, so
//! a send that would block is simply dropped (we only ever care about the
//! newest record).

use serde::Serialize;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TrySendError};

/// One snapshot of the optimizer's progress, streamed at tier/round
/// boundaries. Field names follow the progress record shape used at the
/// library boundary.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressRecord {
    pub generation: i32,
    pub total_generations: i32,
    pub progress: f64,
    pub builds_tested: i32,
    pub builds_in_gen: i32,
    pub builds_per_gen: i32,
    pub total_sims: i64,
    pub elapsed: f64,
    pub sims_per_sec: f64,
    pub tier_name: String,
    pub best_stage: i32,
    pub generation_complete: Option<bool>,
}

pub struct ProgressSink {
    tx: SyncSender<ProgressRecord>,
}

impl ProgressSink {
    /// Construct a connected `(sink, receiver)` pair. The receiver is meant
    /// to be polled or `try_recv`'d by an observer (e.g. the CLI rendering
    /// to stderr); it is never required for the optimizer to make progress.
    pub fn channel() -> (Self, Receiver<ProgressRecord>) {
        let (tx, rx) = sync_channel(1);
        (Self { tx }, rx)
    }

    /// Best-effort send: a full channel (slow consumer) or a dropped
    /// receiver both just mean "nobody is watching right now" — progress is
    /// never load-bearing for optimization to proceed, so we swallow both.
    pub fn send(&self, record: ProgressRecord) {
        match self.tx.try_send(record) {
            Ok(()) | Err(TrySendError::Full(_)) => {}
            Err(TrySendError::Disconnected(_)) => {
                log::debug!("progress sink has no observer, dropping record");
            }
        }
    }
}
