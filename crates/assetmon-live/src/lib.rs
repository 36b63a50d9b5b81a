//! Live telemetry overlay for assetmon.
//!
//! A [`ChannelReconciler`] opens one push subscription per subject. Each
//! [`LiveHandle`] merges pushed readings with the view's pull baseline:
//! - The latest pushed record for the subject wins once one has arrived
//! - Otherwise the baseline is shown
//! - Unrecognised or malformed messages never end the subscription
//! - A failed or closed connection degrades the view to pull-only data

pub mod error;
pub mod message;
pub mod overlay;
pub mod reconciler;

pub use error::{LiveError, LiveResult};
pub use message::{classify, PushEnvelope, PushOutcome, TELEMETRY_UPDATE};
pub use overlay::LiveOverlay;
pub use reconciler::{ChannelReconciler, ChannelState, LiveConfig, LiveHandle};
