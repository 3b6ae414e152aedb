//! Allocator actor and its handle

use banker_engine::{verify_sequence, Allocator, WitnessError};
use banker_errors::{Error, RequestError, ServiceError};
use banker_events::{EventEmitter, EventSender, FailureContext};
use banker_types::{AllocationSnapshot, ProcessId, RequestOutcome, SafetyReport};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace};

/// Pending commands before senders start waiting
const COMMAND_BUFFER: usize = 64;

enum Command {
    CheckSafety {
        reply: oneshot::Sender<SafetyReport>,
    },
    Request {
        process: ProcessId,
        request: Vec<u32>,
        reply: oneshot::Sender<Result<(RequestOutcome, AllocationSnapshot), RequestError>>,
    },
    Snapshot {
        reply: oneshot::Sender<AllocationSnapshot>,
    },
    Verify {
        sequence: Vec<ProcessId>,
        reply: oneshot::Sender<Result<(), WitnessError>>,
    },
}

/// Cloneable handle to an allocator owned by a background task
#[derive(Clone)]
pub struct AllocatorHandle {
    commands: mpsc::Sender<Command>,
    processes: usize,
    resources: usize,
}

struct AllocatorActor {
    allocator: Allocator,
    events: Option<EventSender>,
}

impl EventEmitter for AllocatorActor {
    fn event_sender(&self) -> Option<&EventSender> {
        self.events.as_ref()
    }
}

/// Move `allocator` into a new task on the current tokio runtime.
///
/// Every operation is reported on `events` when a sender is given. The task
/// stops once every handle has been dropped.
#[must_use]
pub fn spawn(allocator: Allocator, events: Option<EventSender>) -> AllocatorHandle {
    let (commands, receiver) = mpsc::channel(COMMAND_BUFFER);
    let handle = AllocatorHandle {
        commands,
        processes: allocator.process_count(),
        resources: allocator.resource_count(),
    };
    let actor = AllocatorActor { allocator, events };
    tokio::spawn(actor.run(receiver));
    handle
}

impl AllocatorActor {
    async fn run(mut self, mut commands: mpsc::Receiver<Command>) {
        debug!("allocator actor started");
        while let Some(command) = commands.recv().await {
            self.handle(command);
        }
        debug!("allocator actor stopped");
    }

    fn handle(&mut self, command: Command) {
        // A dropped reply receiver means the caller gave up; nothing to undo.
        match command {
            Command::CheckSafety { reply } => {
                let report = self.allocator.check_safety();
                self.emit_safety_checked(&report);
                let _ = reply.send(report);
            }
            Command::Request {
                process,
                request,
                reply,
            } => {
                let result = self.allocator.evaluate_request(process, &request);
                match &result {
                    Ok(outcome) => self.emit_request_evaluated(process, &request, outcome),
                    Err(err) => self.emit_request_rejected(
                        process,
                        &request,
                        FailureContext::from_error(err),
                    ),
                }
                // Snapshot before the next command can run
                let _ = reply.send(result.map(|outcome| (outcome, self.allocator.snapshot())));
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.allocator.snapshot());
            }
            Command::Verify { sequence, reply } => {
                let result = verify_sequence(&self.allocator.snapshot(), &sequence);
                trace!(valid = result.is_ok(), "witness verified");
                let _ = reply.send(result);
            }
        }
    }
}

impl AllocatorHandle {
    /// Number of processes (n)
    #[must_use]
    pub fn process_count(&self) -> usize {
        self.processes
    }

    /// Number of resource classes (m)
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.resources
    }

    async fn call<T>(
        &self,
        operation: &str,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, ServiceError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| ServiceError::Stopped)?;
        response.await.map_err(|_| ServiceError::ReplyDropped {
            operation: operation.to_string(),
        })
    }

    /// Run a safety check against the committed state
    ///
    /// # Errors
    ///
    /// Returns an error if the actor has stopped.
    pub async fn check_safety(&self) -> Result<SafetyReport, Error> {
        Ok(self
            .call("check_safety", |reply| Command::CheckSafety { reply })
            .await?)
    }

    /// Evaluate a request; see [`Allocator::evaluate_request`]
    ///
    /// # Errors
    ///
    /// Returns an error if the actor has stopped or the arguments are
    /// malformed.
    pub async fn request(
        &self,
        process: ProcessId,
        request: Vec<u32>,
    ) -> Result<RequestOutcome, Error> {
        let (outcome, _) = self.request_with_state(process, request).await?;
        Ok(outcome)
    }

    /// Evaluate a request and return the committed state right after it.
    ///
    /// No other command runs between the evaluation and the snapshot, so the
    /// state reflects this request alone even when handles are shared.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor has stopped or the arguments are
    /// malformed.
    pub async fn request_with_state(
        &self,
        process: ProcessId,
        request: Vec<u32>,
    ) -> Result<(RequestOutcome, AllocationSnapshot), Error> {
        let result = self
            .call("request", |reply| Command::Request {
                process,
                request,
                reply,
            })
            .await?;
        Ok(result?)
    }

    /// Copy of the committed state
    ///
    /// # Errors
    ///
    /// Returns an error if the actor has stopped.
    pub async fn snapshot(&self) -> Result<AllocationSnapshot, Error> {
        Ok(self
            .call("snapshot", |reply| Command::Snapshot { reply })
            .await?)
    }

    /// Check a proposed finishing order against the committed state.
    ///
    /// The outer result reports service failures; the inner one whether the
    /// order is a valid witness.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor has stopped.
    pub async fn verify(
        &self,
        sequence: Vec<ProcessId>,
    ) -> Result<Result<(), WitnessError>, Error> {
        Ok(self
            .call("verify", |reply| Command::Verify { sequence, reply })
            .await?)
    }
}
