use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Returns a document-unique clip-path id: `clip-path-<unix ms>-<seq>`.
///
/// The millisecond stamp alone collides when two overlays are drawn within
/// the same tick, so a process-wide sequence number is appended.
#[must_use]
pub fn next_clip_id() -> String {
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("clip-path-{}-{sequence}", Utc::now().timestamp_millis())
}
