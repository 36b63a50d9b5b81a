//! Per-subject overlay of pushed and pulled telemetry.

use assetmon_core::TelemetryRecord;
use parking_lot::RwLock;

#[derive(Debug, Default)]
struct OverlayState {
    latest_pushed: Option<TelemetryRecord>,
    baseline: Option<TelemetryRecord>,
    closed: bool,
}

/// Latest pushed value and pull baseline for one subject.
///
/// Pushed records replace each other whole. Once closed, pushes are
/// rejected; the baseline stays writable since it belongs to the view.
#[derive(Debug, Default)]
pub struct LiveOverlay {
    state: RwLock<OverlayState>,
}

impl LiveOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pushed value. Returns false if the overlay is closed.
    pub fn apply_push(&self, record: TelemetryRecord) -> bool {
        let mut state = self.state.write();
        if state.closed {
            return false;
        }
        state.latest_pushed = Some(record);
        true
    }

    pub fn set_baseline(&self, baseline: Option<TelemetryRecord>) {
        self.state.write().baseline = baseline;
    }

    pub fn latest_pushed(&self) -> Option<TelemetryRecord> {
        self.state.read().latest_pushed.clone()
    }

    pub fn baseline(&self) -> Option<TelemetryRecord> {
        self.state.read().baseline.clone()
    }

    /// Pushed value if any, else the baseline.
    pub fn effective(&self) -> Option<TelemetryRecord> {
        let state = self.state.read();
        state
            .latest_pushed
            .as_ref()
            .or(state.baseline.as_ref())
            .cloned()
    }

    /// True once a pushed value exists.
    pub fn is_live(&self) -> bool {
        self.state.read().latest_pushed.is_some()
    }

    /// Stop accepting pushes. Returns true on the first call.
    pub fn close(&self) -> bool {
        let mut state = self.state.write();
        !std::mem::replace(&mut state.closed, true)
    }

    pub fn is_closed(&self) -> bool {
        self.state.read().closed
    }
}
