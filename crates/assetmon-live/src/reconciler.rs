//! Push subscriptions and the live handle.
//!
//! [`ChannelReconciler::open`] spawns one task per subject. The task owns
//! the socket and is the only writer of pushed values; the returned
//! [`LiveHandle`] reads snapshots and closes the subscription when dropped.

use crate::error::{LiveError, LiveResult};
use crate::message::{classify, PushOutcome};
use crate::overlay::LiveOverlay;
use assetmon_core::TelemetryRecord;
use assetmon_telemetry::Metrics;
use futures_util::{SinkExt, StreamExt};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_tungstenite::{connect_async_tls_with_config, tungstenite::Message};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Reconnect policy for push subscriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveConfig {
    /// Reconnect attempts after a failure (0 = stay degraded).
    pub max_reconnect_attempts: u32,
    /// Base delay for exponential backoff.
    pub reconnect_base_delay_ms: u64,
    /// Maximum delay for exponential backoff.
    pub reconnect_max_delay_ms: u64,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            max_reconnect_attempts: 0,
            reconnect_base_delay_ms: 1000,
            reconnect_max_delay_ms: 30_000,
        }
    }
}

/// Connection state of one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Connecting,
    Live,
    /// Connection failed or ended; the view shows pull data only.
    Degraded,
    Closed,
}

impl std::fmt::Display for ChannelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Connecting => "connecting",
            Self::Live => "live",
            Self::Degraded => "degraded",
            Self::Closed => "closed",
        };
        write!(f, "{s}")
    }
}

/// Opens push subscriptions against one telemetry channel URL.
#[derive(Debug, Clone)]
pub struct ChannelReconciler {
    url: String,
    config: LiveConfig,
}

impl ChannelReconciler {
    pub fn new(url: impl Into<String>, config: LiveConfig) -> Self {
        Self {
            url: url.into(),
            config,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Subscribe to pushed telemetry for `subject`.
    ///
    /// Each call gets a fresh overlay and its own connection. Outside a tokio
    /// runtime no connection is attempted and the handle starts `Degraded`,
    /// serving the baseline only.
    pub fn open(&self, subject: impl Into<String>) -> LiveHandle {
        let subject = subject.into();
        let (updates, updates_rx) = watch::channel(0u64);
        let shared = Arc::new(Shared {
            subject: subject.clone(),
            overlay: LiveOverlay::new(),
            state: RwLock::new(ChannelState::Connecting),
            updates,
            cancel: CancellationToken::new(),
        });

        Metrics::live_channel_opened();
        debug!(asset_id = %subject, url = %self.url, "Opening push subscription");
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(run_channel(
                    shared.clone(),
                    self.url.clone(),
                    self.config.clone(),
                ));
            }
            Err(_) => {
                warn!(asset_id = %subject, "No async runtime, push subscription not started");
                Metrics::live_connection("no_runtime");
                shared.set_state(ChannelState::Degraded);
            }
        }

        LiveHandle {
            shared,
            updates: updates_rx,
        }
    }
}

struct Shared {
    subject: String,
    overlay: LiveOverlay,
    state: RwLock<ChannelState>,
    updates: watch::Sender<u64>,
    cancel: CancellationToken,
}

impl Shared {
    fn notify(&self) {
        self.updates.send_modify(|version| *version = version.wrapping_add(1));
    }

    /// Set the state unless the handle has been closed.
    fn set_state(&self, next: ChannelState) {
        {
            let mut state = self.state.write();
            if *state == ChannelState::Closed || *state == next {
                return;
            }
            *state = next;
        }
        self.notify();
    }
}

/// Scoped subscription to one subject's live telemetry.
///
/// Dropping the handle closes the subscription.
pub struct LiveHandle {
    shared: Arc<Shared>,
    updates: watch::Receiver<u64>,
}

impl LiveHandle {
    pub fn subject(&self) -> &str {
        &self.shared.subject
    }

    pub fn state(&self) -> ChannelState {
        *self.shared.state.read()
    }

    /// Latest pushed record, if any arrived.
    pub fn current_overlay(&self) -> Option<TelemetryRecord> {
        self.shared.overlay.latest_pushed()
    }

    /// Supply the pull value used until a push arrives.
    ///
    /// A record for a different asset is ignored.
    pub fn set_baseline(&self, baseline: Option<TelemetryRecord>) {
        if let Some(record) = &baseline {
            if record.asset_id != self.shared.subject {
                warn!(
                    asset_id = %self.shared.subject,
                    baseline_asset_id = %record.asset_id,
                    "Ignoring baseline for another asset"
                );
                return;
            }
        }
        self.shared.overlay.set_baseline(baseline);
        self.shared.notify();
    }

    /// Pushed value, else baseline, else `None`.
    pub fn effective_value(&self) -> Option<TelemetryRecord> {
        self.shared.overlay.effective()
    }

    /// True once a pushed value is being shown.
    pub fn is_live(&self) -> bool {
        self.shared.overlay.is_live()
    }

    /// Wait for the next overlay or state change.
    ///
    /// Returns false once the handle is closed.
    pub async fn changed(&mut self) -> bool {
        if self.is_closed() {
            return false;
        }
        tokio::select! {
            res = self.updates.changed() => res.is_ok() && !self.is_closed(),
            () = self.shared.cancel.cancelled() => false,
        }
    }

    /// End the subscription. Idempotent; no pushes apply after it returns.
    pub fn close(&self) {
        if !self.shared.overlay.close() {
            return;
        }
        *self.shared.state.write() = ChannelState::Closed;
        self.shared.cancel.cancel();
        self.shared.notify();
        Metrics::live_channel_closed();
        debug!(asset_id = %self.shared.subject, "Push subscription closed");
    }

    pub fn is_closed(&self) -> bool {
        self.shared.overlay.is_closed()
    }
}

impl Drop for LiveHandle {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for LiveHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveHandle")
            .field("subject", &self.shared.subject)
            .field("state", &self.state())
            .field("live", &self.is_live())
            .finish()
    }
}

async fn run_channel(shared: Arc<Shared>, url: String, config: LiveConfig) {
    let mut attempt = 0u32;

    loop {
        if shared.cancel.is_cancelled() {
            return;
        }
        shared.set_state(ChannelState::Connecting);

        let result = tokio::select! {
            () = shared.cancel.cancelled() => return,
            result = connect_and_pump(&shared, &url) => result,
        };

        if shared.cancel.is_cancelled() {
            return;
        }
        let was_live = *shared.state.read() == ChannelState::Live;
        match result {
            Ok(()) => warn!(asset_id = %shared.subject, "Push channel ended"),
            Err(LiveError::ConnectionClosed { code, reason }) => {
                warn!(asset_id = %shared.subject, code, %reason, "Push channel closed by server");
            }
            Err(e) => warn!(asset_id = %shared.subject, error = %e, "Push channel unavailable"),
        }
        if was_live {
            Metrics::live_connection("closed_by_server");
            attempt = 0;
        } else {
            Metrics::live_connection("failed");
        }
        shared.set_state(ChannelState::Degraded);

        attempt += 1;
        if attempt > config.max_reconnect_attempts {
            info!(asset_id = %shared.subject, "Showing pull data only");
            return;
        }

        let delay = backoff_delay(&config, attempt);
        debug!(asset_id = %shared.subject, attempt, delay_ms = delay.as_millis(), "Reconnecting");
        tokio::select! {
            () = tokio::time::sleep(delay) => {}
            () = shared.cancel.cancelled() => return,
        }
    }
}

/// Connect and process messages until the connection ends.
async fn connect_and_pump(shared: &Shared, url: &str) -> LiveResult<()> {
    let (ws_stream, _response) = connect_async_tls_with_config(url, None, true, None)
        .await
        .map_err(|e| LiveError::ConnectionFailed(e.to_string()))?;
    let (mut write, mut read) = ws_stream.split();

    Metrics::live_connection("connected");
    shared.set_state(ChannelState::Live);
    info!(asset_id = %shared.subject, "Push channel connected");

    loop {
        tokio::select! {
            biased;

            () = shared.cancel.cancelled() => {
                if let Err(e) = write.send(Message::Close(None)).await {
                    debug!(error = %e, "Failed to send Close frame");
                }
                return Ok(());
            }

            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => handle_text(shared, &text),
                    Some(Ok(Message::Binary(_))) => {
                        debug!(asset_id = %shared.subject, "Ignoring binary push message");
                        Metrics::push_message(PushOutcome::Malformed.label());
                    }
                    Some(Ok(Message::Ping(data))) => {
                        write.send(Message::Pong(data)).await?;
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let (code, reason) = frame
                            .map(|f| (f.code.into(), f.reason.to_string()))
                            .unwrap_or((1000, "Normal close".to_string()));
                        return Err(LiveError::ConnectionClosed { code, reason });
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(()),
                }
            }
        }
    }
}

fn handle_text(shared: &Shared, text: &str) {
    let outcome = classify(text, &shared.subject);
    Metrics::push_message(outcome.label());
    match outcome {
        PushOutcome::Applied(record) => {
            if shared.overlay.apply_push(record) {
                shared.notify();
            }
        }
        PushOutcome::Malformed => {
            debug!(asset_id = %shared.subject, len = text.len(), "Dropping malformed push message");
        }
        PushOutcome::OtherSubject | PushOutcome::Ignored => {}
    }
}

/// Exponential backoff: base * 2^(attempt-1), capped, plus up to 25% jitter.
fn backoff_delay(config: &LiveConfig, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(10);
    let delay = config
        .reconnect_base_delay_ms
        .saturating_mul(1u64 << exponent)
        .min(config.reconnect_max_delay_ms);
    Duration::from_millis(delay + rand_jitter(delay / 4))
}

/// Random jitter in `[0, bound]`.
fn rand_jitter(bound: u64) -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    u64::from(nanos) % (bound + 1)
}
