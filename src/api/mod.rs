//! HTTP handlers of the local server the OAuth redirect lands on.

mod callback;
mod health;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{convert::PlaylistAssembler, types::PlaylistCreationOutcome};

pub use callback::CallbackParams;
pub use callback::callback;
pub use health::health;

/// Result of the conversion resumed by the callback, as seen by whoever is
/// waiting for it.
pub type CallbackOutcome = Result<PlaylistCreationOutcome, String>;

/// Shared between the callback handler and the process waiting for it.
#[derive(Clone)]
pub struct CallbackState {
    pub assembler: Arc<PlaylistAssembler>,
    pub outcome: Arc<Mutex<Option<CallbackOutcome>>>,
}

impl CallbackState {
    pub fn new(assembler: Arc<PlaylistAssembler>) -> Self {
        Self {
            assembler,
            outcome: Arc::new(Mutex::new(None)),
        }
    }
}
