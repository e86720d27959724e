//! Drives agent producers against the shared board.
//!
//! Every routed prompt starts one worker thread per addressed agent. The
//! worker owns the agent's [`AgentSession`] and is the only writer of that
//! message, so producers never wait on each other or on the display.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use agent_board::{AgentSession, Message, MessageStore, Receivers};
use agent_provider::{PromptId, PromptRequest, StreamEvent, Turn};
use tracing::{debug, warn};

use crate::providers::Agent;

struct AgentSlot {
    agent: Agent,
    history: Mutex<Vec<Turn>>,
}

struct ActiveRun {
    prompt_id: PromptId,
    agent: String,
    cancel: Arc<AtomicBool>,
    join_handle: JoinHandle<()>,
}

/// Snapshot of one agent for the `agents` panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSummary {
    pub name: String,
    pub model: String,
    pub turns: usize,
    pub streaming: bool,
}

pub struct Dispatcher {
    store: Arc<MessageStore>,
    agents: Vec<Arc<AgentSlot>>,
    next_prompt_id: AtomicU64,
    active_runs: Mutex<Vec<ActiveRun>>,
}

impl Dispatcher {
    pub fn new(store: Arc<MessageStore>, agents: Vec<Agent>) -> Arc<Self> {
        Arc::new(Self {
            store,
            agents: agents
                .into_iter()
                .map(|agent| {
                    Arc::new(AgentSlot {
                        agent,
                        history: Mutex::new(Vec::new()),
                    })
                })
                .collect(),
            next_prompt_id: AtomicU64::new(1),
            active_runs: Mutex::new(Vec::new()),
        })
    }

    pub fn agent_names(&self) -> Vec<String> {
        self.agents
            .iter()
            .map(|slot| slot.agent.name.clone())
            .collect()
    }

    pub fn summaries(&self) -> Vec<AgentSummary> {
        let active = self.lock_active_runs();
        self.agents
            .iter()
            .map(|slot| AgentSummary {
                name: slot.agent.name.clone(),
                model: slot.agent.model.clone(),
                turns: lock_unpoisoned(&slot.history).len(),
                streaming: active.iter().any(|run| {
                    run.agent == slot.agent.name && !run.join_handle.is_finished()
                }),
            })
            .collect()
    }

    /// Starts a reply from every agent the message is addressed to, except
    /// its own sender. Returns the prompt ids that were started.
    pub fn route(self: &Arc<Self>, message: &Message) -> Result<Vec<PromptId>, String> {
        self.reap_finished();

        let mut started = Vec::new();
        for slot in &self.agents {
            let name = &slot.agent.name;
            if name == &message.sender || !message.is_for(name) {
                continue;
            }

            let prompt_id = self.next_prompt_id.fetch_add(1, Ordering::SeqCst);
            let request = PromptRequest {
                prompt_id,
                agent: name.clone(),
                from: message.sender.clone(),
                text: message.content.clone(),
                history: lock_unpoisoned(&slot.history).clone(),
            };
            let cancel = Arc::new(AtomicBool::new(false));
            let join_handle = self.spawn_worker(Arc::clone(slot), request, Arc::clone(&cancel))?;

            self.lock_active_runs().push(ActiveRun {
                prompt_id,
                agent: name.clone(),
                cancel,
                join_handle,
            });
            started.push(prompt_id);
        }

        debug!(
            message_id = message.id.get(),
            receivers = %message.receiver_display(),
            started = started.len(),
            "message routed"
        );
        Ok(started)
    }

    fn spawn_worker(
        &self,
        slot: Arc<AgentSlot>,
        request: PromptRequest,
        cancel: Arc<AtomicBool>,
    ) -> Result<JoinHandle<()>, String> {
        let store = Arc::clone(&self.store);
        thread::Builder::new()
            .name(format!("agent-{}-{}", slot.agent.name, request.prompt_id))
            .spawn(move || run_worker(store, slot, request, cancel))
            .map_err(|error| format!("Failed to spawn agent worker: {error}"))
    }

    /// Number of workers that have not returned yet.
    pub fn active_count(&self) -> usize {
        self.lock_active_runs()
            .iter()
            .filter(|run| !run.join_handle.is_finished())
            .count()
    }

    /// Signals every running producer to stop. Their messages stay streaming.
    pub fn cancel_all(&self) {
        for run in self.lock_active_runs().iter() {
            if !run.join_handle.is_finished() {
                debug!(prompt_id = run.prompt_id, agent = %run.agent, "cancelling run");
                run.cancel.store(true, Ordering::SeqCst);
            }
        }
    }

    /// Blocks until every started worker has returned.
    pub fn join_all(&self) {
        let runs = std::mem::take(&mut *self.lock_active_runs());
        for run in runs {
            if run.join_handle.join().is_err() {
                warn!(prompt_id = run.prompt_id, agent = %run.agent, "agent worker panicked");
            }
        }
    }

    /// Forgets what every agent has heard and said.
    pub fn clear_histories(&self) {
        for slot in &self.agents {
            lock_unpoisoned(&slot.history).clear();
        }
    }

    fn reap_finished(&self) {
        let mut active = self.lock_active_runs();
        let (finished, running): (Vec<_>, Vec<_>) = std::mem::take(&mut *active)
            .into_iter()
            .partition(|run| run.join_handle.is_finished());
        *active = running;
        drop(active);

        for run in finished {
            let _ = run.join_handle.join();
        }
    }

    fn lock_active_runs(&self) -> MutexGuard<'_, Vec<ActiveRun>> {
        lock_unpoisoned(&self.active_runs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RunOutcome {
    Finished,
    Failed(String),
    Cancelled,
}

/// Applies one run's events to its board message.
struct RunSink {
    session: AgentSession,
    prompt_id: PromptId,
    reply: String,
    outcome: Option<RunOutcome>,
}

impl RunSink {
    fn apply(&mut self, event: StreamEvent) {
        if event.prompt_id() != self.prompt_id {
            warn!(
                expected = self.prompt_id,
                got = event.prompt_id(),
                "dropping event for another prompt"
            );
            return;
        }
        if self.outcome.is_some() {
            warn!(prompt_id = self.prompt_id, "dropping event after terminal event");
            return;
        }

        match event {
            StreamEvent::Chunk { text, .. } => {
                if self.session.push(&text).is_ok() {
                    self.reply.push_str(&text);
                }
            }
            StreamEvent::Finished { .. } => self.outcome = Some(RunOutcome::Finished),
            StreamEvent::Failed { error, .. } => self.outcome = Some(RunOutcome::Failed(error)),
            StreamEvent::Cancelled { .. } => self.outcome = Some(RunOutcome::Cancelled),
        }
    }

    fn fail(&mut self, error: String) {
        if self.outcome.is_none() {
            self.outcome = Some(RunOutcome::Failed(error));
        }
    }
}

fn run_worker(
    store: Arc<MessageStore>,
    slot: Arc<AgentSlot>,
    request: PromptRequest,
    cancel: Arc<AtomicBool>,
) {
    let prompt_id = request.prompt_id;
    let agent = &slot.agent;
    let session = AgentSession::begin(
        store,
        agent.name.clone(),
        Receivers::only([request.from.as_str()]),
    );
    debug!(prompt_id, agent = %agent.name, message_id = session.id().get(), "run started");

    // Recorded together with the reply once the run finishes, so overlapping
    // runs never interleave their halves in the history.
    let prompt = Turn::Prompt {
        from: request.from.clone(),
        text: request.text.clone(),
    };

    let mut sink = RunSink {
        session,
        prompt_id,
        reply: String::new(),
        outcome: None,
    };
    let producer = Arc::clone(&agent.producer);
    let run_outcome = catch_unwind(AssertUnwindSafe(|| {
        producer.produce(request, Arc::clone(&cancel), &mut |event| sink.apply(event))
    }));

    match run_outcome {
        Ok(Ok(())) => {}
        Ok(Err(error)) => sink.fail(error),
        Err(_) => sink.fail("Producer panicked".to_string()),
    }
    sink.fail("Producer exited without terminal event".to_string());

    let RunSink {
        mut session,
        reply,
        outcome,
        ..
    } = sink;

    match outcome {
        Some(RunOutcome::Finished) => {
            if let Err(error) = session.finish() {
                warn!(prompt_id, %error, "could not complete reply");
            }
            lock_unpoisoned(&slot.history).extend([prompt, Turn::Reply { text: reply }]);
            debug!(prompt_id, agent = %agent.name, "run finished");
        }
        Some(RunOutcome::Failed(error)) => {
            warn!(prompt_id, agent = %agent.name, %error, "run failed");
            let _ = session.push(&format!("\n\n[Error: {error}]"));
            if let Err(error) = session.finish() {
                warn!(prompt_id, %error, "could not complete failed reply");
            }
        }
        Some(RunOutcome::Cancelled) | None => {
            warn!(
                prompt_id,
                agent = %agent.name,
                message_id = session.id().get(),
                "run cancelled; message left streaming"
            );
        }
    }
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
