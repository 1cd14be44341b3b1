//! Infrastructure implementation of the `PollDelay` port.

use std::time::Duration;

use crate::application::ports::PollDelay;

/// Production delay backed by the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioDelay;

impl PollDelay for TokioDelay {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
