use std::any::Any;
use std::io::Write;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::{FutureExt, StreamExt};
use uuid::Uuid;

use crate::checkpoint::{CheckpointHandle, CheckpointRecord, CheckpointStore, StanzaLock};
use crate::error::InputError;
use crate::events_out::{Event, EventDefaults, EventStream, EventWriter};
use crate::handshake::{parse_run, GlobalSettings, Stanza};
use crate::scheduler::RunScheduler;

use super::exit::{EXIT_CONFIG, EXIT_OK, EXIT_STANZA_FAILED};
use super::input::RunContext;
use super::{error_chain, Controller};

/// Counts for one run cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ran: usize,
    pub skipped: usize,
    pub failed: usize,
    pub events: u64,
}

impl RunSummary {
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 {
            EXIT_STANZA_FAILED
        } else {
            EXIT_OK
        }
    }
}

struct RunEnv<'a> {
    run_id: &'a str,
    store: CheckpointStore,
    scheduler: RunScheduler,
    globals: &'a GlobalSettings,
    timeout: Option<Duration>,
}

#[derive(Debug, Clone, Copy)]
enum SkipReason {
    Disabled,
    Invalid,
    Busy,
    NotDue,
}

impl SkipReason {
    fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Disabled => "disabled",
            SkipReason::Invalid => "invalid parameters",
            SkipReason::Busy => "running elsewhere",
            SkipReason::NotDue => "not due",
        }
    }
}

/// A run that returned `Ok` but whose events are not written yet. The stanza lock is
/// held until the checkpoint is saved.
struct PendingSuccess {
    events: Vec<Event>,
    previous: CheckpointRecord,
    state: serde_json::Value,
    _lock: StanzaLock,
}

enum StanzaOutcome {
    Skipped(SkipReason),
    Failed,
    Succeeded(PendingSuccess),
}

impl Controller {
    pub(super) async fn run_mode<W: Write>(&self, handshake: &str, out: W) -> i32 {
        self.run_cycle(handshake, out, Utc::now()).await
    }

    /// One run cycle with the clock fixed at `now`.
    pub async fn run_cycle<W: Write>(&self, handshake: &str, out: W, now: DateTime<Utc>) -> i32 {
        let started = Instant::now();
        let run_id = Uuid::new_v4().to_string();

        let cfg = match parse_run(handshake) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::error!(
                    target: "modinput.controller",
                    run_id = %run_id,
                    error = %e,
                    "failed to parse run configuration"
                );
                return EXIT_CONFIG;
            }
        };

        let Some(dir) = self.checkpoint_dir(&cfg.globals) else {
            tracing::error!(
                target: "modinput.controller",
                run_id = %run_id,
                "no checkpoint directory configured or sent by the host"
            );
            return EXIT_CONFIG;
        };

        let writer = EventWriter::new(out, self.scheme.streaming_mode());
        let mut stream = match EventStream::open(writer) {
            Ok(stream) => stream,
            Err(e) => {
                tracing::error!(
                    target: "modinput.controller",
                    run_id = %run_id,
                    error = %e,
                    "failed to open event stream"
                );
                return EXIT_CONFIG;
            }
        };

        tracing::info!(
            target: "modinput.controller",
            run_id = %run_id,
            stanzas = cfg.stanzas.len(),
            checkpoint_dir = %dir.display(),
            concurrency = self.config.run.effective_concurrency(),
            "run cycle started"
        );

        let env = RunEnv {
            run_id: &run_id,
            store: CheckpointStore::new(dir),
            scheduler: RunScheduler::new(now),
            globals: &cfg.globals,
            timeout: self.config.run.stanza_timeout(),
        };
        let summary = self.run_stanzas(&env, &cfg.stanzas, &mut stream).await;

        let writer = match stream.finish() {
            Ok(writer) => writer,
            Err(e) => {
                tracing::error!(
                    target: "modinput.controller",
                    run_id = %run_id,
                    error = %e,
                    "failed to close event stream"
                );
                return EXIT_CONFIG;
            }
        };

        tracing::info!(
            target: "modinput.controller",
            run_id = %run_id,
            ran = summary.ran,
            skipped = summary.skipped,
            failed = summary.failed,
            events = summary.events,
            bytes = writer.bytes_written(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "run cycle finished"
        );
        summary.exit_code()
    }

    /// The framework config overrides the directory sent in the handshake.
    fn checkpoint_dir(&self, globals: &GlobalSettings) -> Option<PathBuf> {
        self.config
            .checkpoint
            .dir
            .clone()
            .or_else(|| globals.checkpoint_dir.clone())
    }

    async fn run_stanzas<W: Write>(
        &self,
        env: &RunEnv<'_>,
        stanzas: &[Stanza],
        stream: &mut EventStream<W>,
    ) -> RunSummary {
        let mut summary = RunSummary::default();

        let mut outcomes = futures::stream::iter(stanzas)
            .map(|stanza| async move { (stanza, self.prepare_stanza(env, stanza).await) })
            .buffer_unordered(self.config.run.effective_concurrency());

        while let Some((stanza, outcome)) = outcomes.next().await {
            match outcome {
                StanzaOutcome::Skipped(reason) => {
                    tracing::debug!(
                        target: "modinput.controller",
                        run_id = %env.run_id,
                        stanza = %stanza.name,
                        reason = reason.as_str(),
                        "stanza skipped"
                    );
                    summary.skipped += 1;
                }
                StanzaOutcome::Failed => summary.failed += 1,
                StanzaOutcome::Succeeded(pending) => {
                    if self.commit_success(env, stanza, pending, stream).await {
                        summary.ran += 1;
                    } else {
                        summary.failed += 1;
                    }
                }
            }
        }

        summary.events = stream.events_written();
        summary
    }

    /// Everything up to and including the business logic. Failures are checkpointed
    /// here; successes are returned so the caller can write their events first.
    async fn prepare_stanza(&self, env: &RunEnv<'_>, stanza: &Stanza) -> StanzaOutcome {
        let name = stanza.name.as_str();
        if stanza.is_disabled() {
            return StanzaOutcome::Skipped(SkipReason::Disabled);
        }

        let params = match self.scheme.clean_params(&stanza.params) {
            Ok(params) => params,
            Err(errors) => {
                for e in errors.iter() {
                    tracing::warn!(
                        target: "modinput.controller",
                        run_id = %env.run_id,
                        stanza = %name,
                        field = %e.field,
                        error = %e.message,
                        "invalid parameter"
                    );
                }
                return StanzaOutcome::Skipped(SkipReason::Invalid);
            }
        };
        let interval = match stanza.interval() {
            Ok(interval) => interval,
            Err(e) => {
                tracing::warn!(
                    target: "modinput.controller",
                    run_id = %env.run_id,
                    stanza = %name,
                    field = %e.field,
                    error = %e.message,
                    "invalid interval"
                );
                return StanzaOutcome::Skipped(SkipReason::Invalid);
            }
        };

        let lock = match env.store.lock(name) {
            Ok(lock) => lock,
            Err(e) if e.is_busy() => {
                tracing::info!(
                    target: "modinput.controller",
                    run_id = %env.run_id,
                    stanza = %name,
                    "stanza is running in another process"
                );
                return StanzaOutcome::Skipped(SkipReason::Busy);
            }
            Err(e) => {
                tracing::error!(
                    target: "modinput.controller",
                    run_id = %env.run_id,
                    stanza = %name,
                    error = %error_chain(&e),
                    "failed to lock stanza"
                );
                return StanzaOutcome::Failed;
            }
        };

        let previous = match env.store.load(name).await {
            Ok(previous) => previous,
            Err(e) => {
                tracing::error!(
                    target: "modinput.controller",
                    run_id = %env.run_id,
                    stanza = %name,
                    error = %error_chain(&e),
                    "failed to load checkpoint"
                );
                return StanzaOutcome::Failed;
            }
        };

        if !env.scheduler.should_run(name, &interval, previous.as_ref()) {
            return StanzaOutcome::Skipped(SkipReason::NotDue);
        }

        let mut handle = CheckpointHandle::new(previous.clone());
        let ctx = RunContext {
            stanza,
            params: &params,
            globals: env.globals,
            checkpoint: &mut handle,
            now: env.scheduler.now(),
            timeout: env.timeout,
        };
        let guarded = AssertUnwindSafe(self.input.run(ctx))
            .catch_unwind()
            .map(|caught| caught.unwrap_or_else(|payload| Err(panic_error(payload))));
        let result = match env.timeout {
            Some(limit) => tokio::time::timeout(limit, guarded)
                .await
                .unwrap_or(Err(InputError::Timeout {
                    secs: limit.as_secs(),
                })),
            None => guarded.await,
        };

        let previous = previous.unwrap_or_default();
        match result {
            Ok(events) => StanzaOutcome::Succeeded(PendingSuccess {
                events,
                previous,
                state: handle.into_state(),
                _lock: lock,
            }),
            Err(e) => {
                tracing::error!(
                    target: "modinput.controller",
                    run_id = %env.run_id,
                    stanza = %name,
                    error = %e,
                    "stanza failed"
                );
                self.save_failure(env, name, previous, e.to_string()).await;
                StanzaOutcome::Failed
            }
        }
    }

    async fn commit_success<W: Write>(
        &self,
        env: &RunEnv<'_>,
        stanza: &Stanza,
        pending: PendingSuccess,
        stream: &mut EventStream<W>,
    ) -> bool {
        let PendingSuccess {
            events,
            previous,
            state,
            _lock,
        } = pending;
        let name = stanza.name.as_str();
        let defaults = EventDefaults::for_stanza(stanza, env.globals);

        for event in &events {
            if let Err(e) = stream.emit(event, &defaults) {
                tracing::error!(
                    target: "modinput.controller",
                    run_id = %env.run_id,
                    stanza = %name,
                    error = %e,
                    "failed to write events"
                );
                self.save_failure(env, name, previous, format!("event output failed: {e}"))
                    .await;
                return false;
            }
        }

        let mut record = previous;
        record.state = state;
        record.record_success(env.scheduler.now());
        if let Err(e) = env.store.save(name, &record).await {
            tracing::error!(
                target: "modinput.controller",
                run_id = %env.run_id,
                stanza = %name,
                error = %error_chain(&e),
                "failed to save checkpoint"
            );
            return false;
        }

        tracing::info!(
            target: "modinput.controller",
            run_id = %env.run_id,
            stanza = %name,
            events = events.len(),
            "stanza completed"
        );
        true
    }

    /// Keeps the previous `last_run` and state so the next cycle retries.
    async fn save_failure(
        &self,
        env: &RunEnv<'_>,
        name: &str,
        mut record: CheckpointRecord,
        error: String,
    ) {
        record.record_failure(env.scheduler.now(), error);
        if let Err(e) = env.store.save(name, &record).await {
            tracing::error!(
                target: "modinput.controller",
                run_id = %env.run_id,
                stanza = %name,
                error = %error_chain(&e),
                "failed to save checkpoint"
            );
        }
    }
}

fn panic_error(payload: Box<dyn Any + Send>) -> InputError {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    InputError::Panicked(message)
}
