//! Session runtime: one thread owns the controller, everything else sends
//! commands.
//!
//! The two heartbeats (elapsed clock and rest countdown) are separate ticker
//! threads that post `Command::Tick` into the same channel as user intents,
//! so every mutation is applied in arrival order on the owning thread.
//! A tick that arrives in a state where its timer is inactive is a no-op.

use crate::{Error, Result, SessionController, SessionSnapshot, TimerKind, WeeklyPlan};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Messages processed by the session thread
#[derive(Debug)]
pub enum Command {
    Start(usize),
    StartByLabel(String),
    CompleteExercise(usize),
    Finish,
    Pause,
    Resume,
    Reset,
    Abandon,
    Regenerate(Box<WeeklyPlan>),
    Tick(TimerKind),
    Snapshot(Sender<SessionSnapshot>),
    Shutdown,
}

/// Cloneable sender side of the runtime
#[derive(Clone, Debug)]
pub struct SessionHandle {
    tx: Sender<Command>,
}

impl SessionHandle {
    fn send(&self, command: Command) -> Result<()> {
        self.tx
            .send(command)
            .map_err(|_| Error::Runtime("session thread has stopped".into()))
    }

    pub fn start(&self, day_index: usize) -> Result<()> {
        self.send(Command::Start(day_index))
    }

    pub fn start_by_label(&self, label: &str) -> Result<()> {
        self.send(Command::StartByLabel(label.to_string()))
    }

    pub fn complete_exercise(&self, index: usize) -> Result<()> {
        self.send(Command::CompleteExercise(index))
    }

    pub fn finish(&self) -> Result<()> {
        self.send(Command::Finish)
    }

    pub fn pause(&self) -> Result<()> {
        self.send(Command::Pause)
    }

    pub fn resume(&self) -> Result<()> {
        self.send(Command::Resume)
    }

    pub fn reset(&self) -> Result<()> {
        self.send(Command::Reset)
    }

    pub fn abandon(&self) -> Result<()> {
        self.send(Command::Abandon)
    }

    pub fn regenerate(&self, plan: WeeklyPlan) -> Result<()> {
        self.send(Command::Regenerate(Box::new(plan)))
    }

    pub fn tick(&self, kind: TimerKind) -> Result<()> {
        self.send(Command::Tick(kind))
    }

    /// Current state, after every command this handle sent earlier
    pub fn snapshot(&self) -> Result<SessionSnapshot> {
        let (reply_tx, reply_rx) = channel();
        self.send(Command::Snapshot(reply_tx))?;
        reply_rx
            .recv()
            .map_err(|_| Error::Runtime("session thread dropped snapshot reply".into()))
    }
}

/// The session-owning thread
pub struct SessionRuntime {
    handle: SessionHandle,
    worker: JoinHandle<SessionController>,
}

impl SessionRuntime {
    /// Move the controller onto its own thread
    pub fn spawn(controller: SessionController) -> Result<Self> {
        let (tx, rx) = channel();
        let worker = thread::Builder::new()
            .name("fitplan-session".into())
            .spawn(move || run(controller, rx))?;

        Ok(Self {
            handle: SessionHandle { tx },
            worker,
        })
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Start both heartbeats at the given period
    pub fn start_heartbeats(&self, period: Duration) -> Result<Heartbeats> {
        Ok(Heartbeats {
            elapsed: Ticker::spawn(self.handle(), TimerKind::Elapsed, period)?,
            rest: Ticker::spawn(self.handle(), TimerKind::Rest, period)?,
        })
    }

    /// Stop the thread and hand back the controller
    pub fn shutdown(self) -> Result<SessionController> {
        // The thread may already be gone; join reports that below
        let _ = self.handle.send(Command::Shutdown);
        self.worker
            .join()
            .map_err(|_| Error::Runtime("session thread panicked".into()))
    }
}

fn run(mut controller: SessionController, rx: Receiver<Command>) -> SessionController {
    tracing::debug!("Session thread started");

    for command in rx {
        match command {
            Command::Start(index) => {
                controller.start(index);
            }
            Command::StartByLabel(label) => {
                controller.start_by_label(&label);
            }
            Command::CompleteExercise(index) => {
                controller.complete_exercise(index);
            }
            Command::Finish => {
                controller.finish();
            }
            Command::Pause => {
                controller.pause();
            }
            Command::Resume => {
                controller.resume();
            }
            Command::Reset => {
                controller.reset();
            }
            Command::Abandon => {
                controller.abandon();
            }
            Command::Regenerate(plan) => controller.regenerate(*plan),
            Command::Tick(kind) => {
                controller.tick(kind);
            }
            Command::Snapshot(reply) => {
                // Requester may have given up waiting
                let _ = reply.send(controller.snapshot());
            }
            Command::Shutdown => break,
        }
    }

    tracing::debug!("Session thread stopped");
    controller
}

/// A periodic tick source. Dropping its stop sender wakes the thread at once;
/// ticks already queued need no drain.
pub struct Ticker {
    kind: TimerKind,
    stop: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn(handle: SessionHandle, kind: TimerKind, period: Duration) -> Result<Self> {
        let (stop_tx, stop_rx) = channel::<()>();

        let thread = thread::Builder::new()
            .name(format!("fitplan-{:?}-ticker", kind).to_lowercase())
            .spawn(move || loop {
                match stop_rx.recv_timeout(period) {
                    Err(RecvTimeoutError::Timeout) => {
                        if handle.tick(kind).is_err() {
                            break;
                        }
                    }
                    // Explicit stop or the Ticker was dropped
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;

        Ok(Self {
            kind,
            stop: Some(stop_tx),
            thread: Some(thread),
        })
    }

    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    pub fn stop(mut self) {
        self.signal();
        self.join();
    }

    fn signal(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }

    fn join(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.signal();
        self.join();
    }
}

/// The elapsed and rest tickers, stopped together
pub struct Heartbeats {
    pub elapsed: Ticker,
    pub rest: Ticker,
}

impl Heartbeats {
    /// Signal both tickers before joining either
    pub fn stop(mut self) {
        self.elapsed.signal();
        self.rest.signal();
        self.elapsed.join();
        self.rest.join();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_default_catalog, generate_plan_seeded, PlanParameters, SessionPhase};
    use std::time::Instant;

    fn controller(rest_seconds: u32) -> SessionController {
        let plan = generate_plan_seeded(&build_default_catalog(), &PlanParameters::default(), 21);
        SessionController::new(plan).with_rest_seconds(rest_seconds)
    }

    fn wait_for<F>(handle: &SessionHandle, mut done: F) -> SessionSnapshot
    where
        F: FnMut(&SessionSnapshot) -> bool,
    {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            let snap = handle.snapshot().unwrap();
            if done(&snap) || Instant::now() > deadline {
                return snap;
            }
            thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn test_commands_applied_in_order() {
        let runtime = SessionRuntime::spawn(controller(60)).unwrap();
        let handle = runtime.handle();

        handle.start(0).unwrap();
        handle.complete_exercise(0).unwrap();
        for _ in 0..60 {
            handle.tick(TimerKind::Rest).unwrap();
        }
        handle.tick(TimerKind::Elapsed).unwrap();

        let snap = handle.snapshot().unwrap();
        assert_eq!(snap.phase, SessionPhase::Running);
        let session = snap.session.unwrap();
        assert_eq!(session.current_exercise_index(), 1);
        assert_eq!(session.elapsed_seconds(), 1);

        let ctl = runtime.shutdown().unwrap();
        assert_eq!(ctl.phase(), SessionPhase::Running);
    }

    #[test]
    fn test_heartbeats_drive_a_whole_day() {
        let runtime = SessionRuntime::spawn(controller(3)).unwrap();
        let handle = runtime.handle();
        let heartbeats = runtime.start_heartbeats(Duration::from_millis(1)).unwrap();

        handle.start_by_label("Monday").unwrap();
        let count = handle
            .snapshot()
            .unwrap()
            .session
            .map_or(0, |s| s.exercise_count());
        assert_eq!(count, 3);

        for i in 0..count {
            handle.complete_exercise(i).unwrap();
            wait_for(&handle, |s| s.phase != SessionPhase::Resting);
        }

        let snap = wait_for(&handle, |s| s.phase == SessionPhase::Completed);
        assert_eq!(snap.phase, SessionPhase::Completed);

        handle.finish().unwrap();
        let snap = handle.snapshot().unwrap();
        assert_eq!(snap.phase, SessionPhase::Idle);
        assert_eq!(snap.completed_day_labels, vec!["Monday".to_string()]);
        assert_eq!(snap.progress_percent, 33);

        heartbeats.stop();
        let ctl = runtime.shutdown().unwrap();
        assert!(ctl.plan().days[0].completed);
        assert_eq!(
            ctl.progress().cumulative_energy(),
            ctl.plan().days[0].total_energy_budget
        );
    }

    #[test]
    fn test_regenerate_through_handle() {
        let runtime = SessionRuntime::spawn(controller(60)).unwrap();
        let handle = runtime.handle();
        handle.start(0).unwrap();

        let plan = generate_plan_seeded(&build_default_catalog(), &PlanParameters::default(), 2);
        let id = plan.id;
        handle.regenerate(plan).unwrap();

        let snap = handle.snapshot().unwrap();
        assert_eq!(snap.plan_id, id);
        assert_eq!(snap.phase, SessionPhase::Idle);
        runtime.shutdown().unwrap();
    }

    #[test]
    fn test_heartbeats_stop_without_waiting_a_period() {
        let runtime = SessionRuntime::spawn(controller(60)).unwrap();
        let heartbeats = runtime.start_heartbeats(Duration::from_secs(30)).unwrap();

        let begun = Instant::now();
        heartbeats.stop();
        assert!(begun.elapsed() < Duration::from_secs(5));

        let ticker = Ticker::spawn(runtime.handle(), TimerKind::Rest, Duration::from_secs(30)).unwrap();
        assert_eq!(ticker.kind(), TimerKind::Rest);
        let begun = Instant::now();
        drop(ticker);
        assert!(begun.elapsed() < Duration::from_secs(5));

        runtime.shutdown().unwrap();
    }

    #[test]
    fn test_send_after_shutdown_is_error() {
        let runtime = SessionRuntime::spawn(controller(60)).unwrap();
        let handle = runtime.handle();
        runtime.shutdown().unwrap();

        assert!(matches!(handle.start(0), Err(Error::Runtime(_))));
        assert!(handle.snapshot().is_err());
    }
}
