//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use std::sync::Arc;
use swipelearn_core::{
    ports::{CompletionService, TranscriptionService},
    prompt::ProviderProfile,
};

/// The shared application state, created once at startup and passed to all handlers.
///
/// The handlers themselves are stateless; everything here is immutable after
/// startup, so the state is safe to share across any number of concurrent
/// requests without further synchronization.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub profile: ProviderProfile,
    pub completion: Arc<dyn CompletionService>,
    /// Absent when no transcription-capable provider is configured; the
    /// transcription route answers 501 in that case.
    pub transcription: Option<Arc<dyn TranscriptionService>>,
}
