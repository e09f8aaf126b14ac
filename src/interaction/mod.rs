//! Viewport events delivered by the hosting surface.

use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};

/// How the host reacts to a burst of resize events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ResizePolicy {
    /// One reflow and one overlay redraw per event.
    #[default]
    Immediate,
    /// Only the last size seen within `window_ms` is applied.
    Coalesce { window_ms: u64 },
}

impl ResizePolicy {
    pub fn validate(self) -> ChartResult<()> {
        if let Self::Coalesce { window_ms: 0 } = self {
            return Err(ChartError::Config(
                "coalescing resize window must be > 0 ms".to_owned(),
            ));
        }
        Ok(())
    }
}

/// One resize notification from the display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeEvent {
    pub viewport: Viewport,
}

impl ResizeEvent {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: Viewport::new(width, height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ResizePolicy;

    #[test]
    fn policy_round_trips_through_json() {
        let policy = ResizePolicy::Coalesce { window_ms: 50 };
        let json = serde_json::to_string(&policy).expect("json");
        assert_eq!(json, r#"{"mode":"coalesce","window_ms":50}"#);
        let parsed: ResizePolicy = serde_json::from_str(&json).expect("parse");
        assert_eq!(parsed, policy);
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(ResizePolicy::Coalesce { window_ms: 0 }.validate().is_err());
        assert!(ResizePolicy::Immediate.validate().is_ok());
    }
}
