//! Tokio driver for the renderer
//!
//! One spawned task owns a [`Renderer`] on a [`DelayQueueScheduler`], so its
//! ticks run one at a time on that task. Views talk to it through a
//! [`RevealHandle`].

use super::{Renderer, RevealError};
use crate::scheduler::DelayQueueScheduler;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio_util::sync::CancellationToken;

/// Updates published to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealUpdate {
    /// A new prefix is on screen. An empty prefix marks a restart.
    Prefix(String),
    /// The current text is fully shown
    Settled,
}

enum RevealCommand {
    Render {
        text: Arc<str>,
        speed: Duration,
        done: oneshot::Sender<()>,
    },
}

/// Resolves once the reveal it was returned for settles
#[derive(Debug)]
pub struct Completion(oneshot::Receiver<()>);

impl Completion {
    /// Wait for the reveal to settle.
    ///
    /// Fails with [`RevealError::Superseded`] when a newer render or a
    /// disposal got there first.
    pub async fn wait(self) -> Result<(), RevealError> {
        self.0.await.map_err(|_| RevealError::Superseded)
    }
}

/// Handle to a running reveal task. Dropping it disposes the renderer.
pub struct RevealHandle {
    commands: mpsc::UnboundedSender<RevealCommand>,
    updates: broadcast::Sender<RevealUpdate>,
    cancel: CancellationToken,
}

impl RevealHandle {
    /// Reveal `text`, restarting any reveal in progress
    pub fn render(
        &self,
        text: impl Into<Arc<str>>,
        speed: Duration,
    ) -> Result<Completion, RevealError> {
        if self.cancel.is_cancelled() {
            return Err(RevealError::Disposed);
        }
        let (done, rx) = oneshot::channel();
        self.commands
            .send(RevealCommand::Render {
                text: text.into(),
                speed,
                done,
            })
            .map_err(|_| RevealError::Disposed)?;
        Ok(Completion(rx))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RevealUpdate> {
        self.updates.subscribe()
    }

    /// Stop the renderer. Takes effect before the task handles anything else.
    pub fn dispose(&self) {
        self.cancel.cancel();
    }

    pub fn is_disposed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for RevealHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct RevealTask {
    renderer: Renderer<DelayQueueScheduler>,
    commands: mpsc::UnboundedReceiver<RevealCommand>,
    updates: broadcast::Sender<RevealUpdate>,
    cancel: CancellationToken,
}

impl RevealTask {
    async fn run(mut self) {
        loop {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                command = self.commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                Some(tick) = self.renderer.scheduler_mut().next_expired() => {
                    self.renderer.on_tick(tick);
                }
            }
        }

        self.renderer.dispose();
        tracing::debug!("Reveal task stopped");
    }

    fn handle_command(&mut self, command: RevealCommand) {
        match command {
            RevealCommand::Render { text, speed, done } => {
                let updates = self.updates.clone();
                let on_complete = move || {
                    let _ = updates.send(RevealUpdate::Settled);
                    let _ = done.send(());
                };
                if let Err(e) = self.renderer.render(text, speed, on_complete) {
                    tracing::warn!(error = %e, "Reveal rejected");
                }
            }
        }
    }
}

/// Spawn a reveal task on the current tokio runtime.
///
/// `capacity` bounds the update backlog per subscriber.
pub fn spawn_reveal(capacity: usize) -> RevealHandle {
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();
    let (updates, _) = broadcast::channel(capacity.max(1));
    let cancel = CancellationToken::new();

    let sink_updates = updates.clone();
    let renderer = Renderer::new(DelayQueueScheduler::new(), move |prefix: &str| {
        let _ = sink_updates.send(RevealUpdate::Prefix(prefix.to_string()));
    });

    let task = RevealTask {
        renderer,
        commands: commands_rx,
        updates: updates.clone(),
        cancel: cancel.clone(),
    };
    tokio::spawn(task.run());

    RevealHandle {
        commands: commands_tx,
        updates,
        cancel,
    }
}
