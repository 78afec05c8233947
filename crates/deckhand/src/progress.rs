//! Synthetic progress for the long-running generation upload.
//!
//! The server gives no progress signal while it generates cards, so the
//! client shows a scripted sequence of messages keyed on elapsed time. The
//! script is a pure function of elapsed time ([`ProgressScript::message_at`]),
//! which keeps it testable without real delays; the ticker wraps it in a
//! periodic task that is aborted on drop, so it cannot outlive the upload
//! on any exit path, including caller abandonment.
//!
//! Purely decorative: the ticker has no effect on the real request and no
//! failure mode of its own.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// An ascending-by-threshold list of `(elapsed, message)` pairs.
#[derive(Debug, Clone)]
pub struct ProgressScript {
    entries: Vec<(Duration, String)>,
}

impl ProgressScript {
    /// Build a script from `(seconds, message)` pairs. Entries must be
    /// ascending by threshold.
    #[must_use]
    pub fn from_seconds(entries: &[(u64, &str)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(secs, msg)| (Duration::from_secs(*secs), (*msg).to_string()))
                .collect(),
        }
    }

    /// The script shown during card generation uploads.
    #[must_use]
    pub fn for_upload() -> Self {
        Self::from_seconds(&[
            (0, "Importing your document…"),
            (5, "Checking the document…"),
            (12, "Uploading content…"),
            (19, "Preparing the material…"),
            (35, "Generating cards…"),
            (45, "Still generating cards…"),
            (50, "Updating your stack…"),
            (60, "Almost done…"),
        ])
    }

    /// The message of the entry with the greatest threshold `<= elapsed`.
    ///
    /// Past the last threshold the final message is held indefinitely;
    /// before the first threshold (or on an empty script) there is none.
    #[must_use]
    pub fn message_at(&self, elapsed: Duration) -> Option<&str> {
        self.entries
            .iter()
            .take_while(|(threshold, _)| *threshold <= elapsed)
            .last()
            .map(|(_, message)| message.as_str())
    }
}

/// A running progress ticker.
///
/// Publishes the current script message through a watch channel on a fixed
/// period. Dropping the ticker aborts its task; start it when the upload
/// request begins and let RAII tear it down however that request settles.
pub struct ProgressTicker {
    rx: watch::Receiver<String>,
    task: JoinHandle<()>,
}

impl ProgressTicker {
    /// Spawn the ticker. The channel starts at the script's zero-elapsed
    /// message.
    #[must_use]
    pub fn start(script: ProgressScript, period: Duration) -> Self {
        let initial = script
            .message_at(Duration::ZERO)
            .unwrap_or_default()
            .to_string();
        let (tx, rx) = watch::channel(initial);

        let task = tokio::spawn(async move {
            let started = Instant::now();
            let mut ticker = tokio::time::interval(period);
            // interval fires immediately once; the zero message is already
            // published, so consume that tick.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if let Some(message) = script.message_at(started.elapsed()) {
                    tx.send_if_modified(|current| {
                        if current != message {
                            tracing::debug!(%message, "progress message");
                            *current = message.to_string();
                            true
                        } else {
                            false
                        }
                    });
                }
            }
        });

        Self { rx, task }
    }

    /// Watch the message stream. The receiver outlives the ticker but stops
    /// updating once it is dropped.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.rx.clone()
    }

    /// The message currently on display.
    #[must_use]
    pub fn message(&self) -> String {
        self.rx.borrow().clone()
    }
}

impl Drop for ProgressTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
