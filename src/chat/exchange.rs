use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::chat::client::ChatBackend;
use crate::chat::ChatError;
use crate::chat::types::Submission;

/// Outcome of one exchange, posted back to the UI inbox.
#[derive(Debug)]
pub struct Settled {
    pub id: u64,
    pub outcome: Result<String, ChatError>,
}

/// Run the exchange for `submission` in the background. Nothing is posted if
/// `cancel` fires first.
pub fn spawn_exchange(
    backend: Arc<dyn ChatBackend>,
    submission: Submission,
    inbox: UnboundedSender<Settled>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let Submission { id, prompt } = submission;
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(id, "exchange cancelled");
                return;
            }
            res = backend.send_prompt(&prompt) => res,
        };
        debug!(id, ok = outcome.is_ok(), "exchange settled");
        // The receiver is gone once the view is torn down.
        let _ = inbox.send(Settled { id, outcome });
    })
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedBackend;
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn posts_settlement_for_submission() {
        let backend = Arc::new(ScriptedBackend::replying(&["pong"]));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sub = Submission {
            id: 7,
            prompt: "ping".into(),
        };
        spawn_exchange(backend.clone(), sub, tx, CancellationToken::new())
            .await
            .unwrap();

        let settled = rx.recv().await.unwrap();
        assert_eq!(settled.id, 7);
        assert_eq!(settled.outcome.unwrap(), "pong");
        assert_eq!(*backend.prompts.lock().unwrap(), vec!["ping".to_string()]);
    }

    #[tokio::test]
    async fn cancelled_exchange_posts_nothing() {
        let backend = Arc::new(ScriptedBackend {
            delay: Some(Duration::from_secs(5)),
            ..ScriptedBackend::replying(&["late"])
        });
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let handle = spawn_exchange(
            backend,
            Submission {
                id: 1,
                prompt: "x".into(),
            },
            tx,
            cancel.clone(),
        );
        cancel.cancel();
        handle.await.unwrap();
        assert!(rx.recv().await.is_none());
    }
}
