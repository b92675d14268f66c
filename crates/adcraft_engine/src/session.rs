use std::sync::Arc;

use adcraft_core::{update, Effect, GenerationRequest, GenerationSession, Msg, Outcome, SessionConfig};
use adcraft_logging::{adcraft_debug, adcraft_warn};
use chrono::Utc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::{AbortHandle, JoinHandle};

use crate::{JobBackend, TimerLines};

/// Receives session notifications. Called from the session task; must not block.
pub trait SessionObserver: Send + Sync {
    fn on_progress(&self, percent: u8, message: &str);
    fn on_terminal(&self, outcome: &Outcome);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Progress { percent: u8, message: String },
    Terminal(Outcome),
}

/// Forwards notifications into a channel.
pub struct ChannelObserver {
    tx: UnboundedSender<SessionEvent>,
}

impl ChannelObserver {
    pub fn new(tx: UnboundedSender<SessionEvent>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl SessionObserver for ChannelObserver {
    fn on_progress(&self, percent: u8, message: &str) {
        let _ = self.tx.send(SessionEvent::Progress {
            percent,
            message: message.to_string(),
        });
    }

    fn on_terminal(&self, outcome: &Outcome) {
        let _ = self.tx.send(SessionEvent::Terminal(outcome.clone()));
    }
}

/// Caller-side controls for a running session task.
///
/// Dropping the handle ends the task, which releases its timers and aborts
/// any in-flight backend call.
pub struct SessionHandle {
    commands: UnboundedSender<Msg>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    /// Spawns the session task on the current tokio runtime.
    pub fn spawn(
        backend: Arc<dyn JobBackend>,
        config: SessionConfig,
        observer: Arc<dyn SessionObserver>,
    ) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (inbox, inbox_rx) = mpsc::unbounded_channel();
        let runner = SessionRunner {
            session: GenerationSession::new(config),
            backend,
            observer,
            inbox,
            timers: TimerLines::default(),
            in_flight: Vec::new(),
        };
        let task = tokio::spawn(runner.run(command_rx, inbox_rx));
        Self { commands, task }
    }

    /// Starts a generation, resetting whatever the session was doing.
    pub fn start(&self, request: GenerationRequest) {
        if self.commands.send(Msg::Submit(request)).is_err() {
            adcraft_warn!("Session task is gone; start ignored");
        }
    }

    pub fn cancel(&self) {
        let _ = self.commands.send(Msg::Cancel);
    }

    /// Stops the session task and waits for it to release its resources.
    pub async fn shutdown(self) {
        let Self { commands, task } = self;
        drop(commands);
        if let Err(err) = task.await {
            adcraft_warn!("Session task ended abnormally: {}", err);
        }
    }
}

struct SessionRunner {
    session: GenerationSession,
    backend: Arc<dyn JobBackend>,
    observer: Arc<dyn SessionObserver>,
    inbox: UnboundedSender<Msg>,
    timers: TimerLines,
    in_flight: Vec<AbortHandle>,
}

impl SessionRunner {
    async fn run(
        mut self,
        mut commands: UnboundedReceiver<Msg>,
        mut inbox: UnboundedReceiver<Msg>,
    ) {
        loop {
            // One message at a time: each is fully applied before the next is read.
            let msg = tokio::select! {
                biased;
                command = commands.recv() => match command {
                    Some(msg) => msg,
                    None => break,
                },
                Some(msg) = inbox.recv() => msg,
            };
            self.dispatch(msg);
        }
        self.release();
        adcraft_debug!("Session task stopped");
    }

    fn dispatch(&mut self, msg: Msg) {
        let session = std::mem::take(&mut self.session);
        let (session, effects) = update(session, msg);
        self.session = session;
        for effect in effects {
            self.apply(effect);
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::CreateJob { ticket, request } => {
                let backend = self.backend.clone();
                let inbox = self.inbox.clone();
                let handle = tokio::spawn(async move {
                    let msg = match backend.create_job(&request).await {
                        Ok(accepted) => Msg::JobAccepted {
                            ticket,
                            job_id: accepted.job_id,
                            accepted_at: accepted.created_at.unwrap_or_else(Utc::now),
                        },
                        Err(err) => Msg::SubmitFailed {
                            ticket,
                            error: err.to_string(),
                        },
                    };
                    let _ = inbox.send(msg);
                });
                self.track(handle);
            }
            Effect::ArmTimers {
                ticket,
                poll_interval,
                narration_interval,
            } => {
                self.timers
                    .arm(ticket, poll_interval, narration_interval, &self.inbox);
            }
            Effect::FetchStatus { ticket, job_id } => {
                let backend = self.backend.clone();
                let inbox = self.inbox.clone();
                let handle = tokio::spawn(async move {
                    let result = backend
                        .fetch_status(&job_id)
                        .await
                        .map_err(|err| err.to_string());
                    let _ = inbox.send(Msg::StatusFetched { ticket, result });
                });
                self.track(handle);
            }
            Effect::Disarm => self.release(),
            Effect::Progress { percent, message } => self.observer.on_progress(percent, &message),
            Effect::Terminal(outcome) => self.observer.on_terminal(&outcome),
        }
    }

    fn track(&mut self, handle: JoinHandle<()>) {
        self.in_flight.retain(|call| !call.is_finished());
        self.in_flight.push(handle.abort_handle());
    }

    fn release(&mut self) {
        self.timers.disarm();
        for call in self.in_flight.drain(..) {
            call.abort();
        }
    }
}
