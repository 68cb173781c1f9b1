//! Background store worker
//!
//! SQLite I/O runs on a dedicated thread with its own current-thread tokio
//! runtime. Jobs are executed strictly in submission order, and results are
//! handed back to the main thread through the [`TaskSender`], so callbacks
//! run with exclusive access to the plugin state.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::thread::JoinHandle;

use crossbeam_channel::{bounded, unbounded, Sender};
use tracing::{debug, error, info, warn};

use cs2prac_sdk::SteamId;

use super::db::{Database, StoreError};
use super::queries::PlayerData;
use crate::tasks::TaskSender;

type JobFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;
type JobFn = Box<dyn FnOnce(Database) -> JobFuture + Send + 'static>;

enum Job {
    Run(JobFn),
    Shutdown,
}

enum Target {
    File(PathBuf),
    Memory,
}

/// Owns the store thread; shuts it down and joins on drop
pub struct StoreWorker<S> {
    handle: StoreHandle<S>,
    thread: Option<JoinHandle<()>>,
}

/// Cloneable submission handle
pub struct StoreHandle<S> {
    jobs: Sender<Job>,
    tasks: TaskSender<S>,
}

impl<S> Clone for StoreHandle<S> {
    fn clone(&self) -> Self {
        Self {
            jobs: self.jobs.clone(),
            tasks: self.tasks.clone(),
        }
    }
}

impl<S: 'static> StoreWorker<S> {
    /// Start the worker on the database file at `path`
    ///
    /// Returns once the database is open, so open failures surface here.
    pub fn spawn(path: PathBuf, tasks: TaskSender<S>) -> Result<Self, StoreError> {
        Self::start(Target::File(path), tasks)
    }

    /// Start the worker on an in-memory database (for testing)
    pub fn spawn_in_memory(tasks: TaskSender<S>) -> Result<Self, StoreError> {
        Self::start(Target::Memory, tasks)
    }

    fn start(target: Target, tasks: TaskSender<S>) -> Result<Self, StoreError> {
        let (jobs, receiver) = unbounded::<Job>();
        let (ready_tx, ready_rx) = bounded::<Result<(), StoreError>>(1);

        let thread = std::thread::Builder::new()
            .name("cs2prac-store".to_string())
            .spawn(move || {
                let rt = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(e) => {
                        let _ = ready_tx.send(Err(StoreError::Io(e.to_string())));
                        return;
                    }
                };

                let opened = rt.block_on(async {
                    match &target {
                        Target::File(path) => Database::open(path).await,
                        Target::Memory => Database::open_in_memory().await,
                    }
                });

                let db = match opened {
                    Ok(db) => {
                        let _ = ready_tx.send(Ok(()));
                        db
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };

                for job in receiver.iter() {
                    match job {
                        Job::Run(run) => rt.block_on(run(db.clone())),
                        Job::Shutdown => break,
                    }
                }

                rt.block_on(db.close());
                debug!("Store worker stopped");
            })
            .map_err(|e| StoreError::Io(e.to_string()))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = thread.join();
                return Err(e);
            }
            Err(_) => {
                let _ = thread.join();
                return Err(StoreError::WorkerGone);
            }
        }

        info!("Store worker started");
        Ok(Self {
            handle: StoreHandle { jobs, tasks },
            thread: Some(thread),
        })
    }

    /// Get a handle that can be stored alongside the plugin state
    pub fn handle(&self) -> StoreHandle<S> {
        self.handle.clone()
    }

    /// Finish queued jobs and stop the thread
    pub fn shutdown(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        let _ = self.handle.jobs.send(Job::Shutdown);
        if thread.join().is_err() {
            error!("Store worker panicked");
        }
    }
}

impl<S> Drop for StoreWorker<S> {
    fn drop(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = self.handle.jobs.send(Job::Shutdown);
            let _ = thread.join();
        }
    }
}

impl<S: 'static> StoreHandle<S> {
    fn submit<T, W, Fut, R>(&self, op: &'static str, work: W, reply: Option<R>)
    where
        T: Send + 'static,
        W: FnOnce(Database) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, StoreError>> + Send + 'static,
        R: FnOnce(&mut S, Result<T, StoreError>) + Send + 'static,
    {
        let tasks = self.tasks.clone();
        let run: JobFn = Box::new(move |db| {
            Box::pin(async move {
                let result = work(db).await;
                if let Err(e) = &result {
                    warn!(op, error = %e, "Store operation failed");
                }
                if let Some(reply) = reply {
                    tasks.queue_blocking(move |state| reply(state, result));
                }
            })
        });

        if self.jobs.send(Job::Run(run)).is_err() {
            warn!(op, "Store worker is not running, dropping job");
        }
    }

    fn fire<W, Fut>(&self, op: &'static str, work: W)
    where
        W: FnOnce(Database) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), StoreError>> + Send + 'static,
    {
        self.submit::<(), _, _, fn(&mut S, Result<(), StoreError>)>(op, work, None);
    }

    pub fn upsert_player(&self, id: SteamId, name: String) {
        self.fire("upsert_player", move |db| async move {
            db.upsert_player(id, &name).await
        });
    }

    /// Load language and total playtime; `reply` runs on the main thread
    pub fn player_data<R>(&self, id: SteamId, reply: R)
    where
        R: FnOnce(&mut S, Result<Option<PlayerData>, StoreError>) + Send + 'static,
    {
        self.submit(
            "player_data",
            move |db| async move { db.player_data(id).await },
            Some(reply),
        );
    }

    pub fn create_session(&self, id: SteamId) {
        self.fire("create_session", move |db| async move {
            db.create_session(id).await
        });
    }

    pub fn add_playtime(&self, id: SteamId, seconds: u64) {
        let seconds = i64::try_from(seconds).unwrap_or(i64::MAX);
        self.fire("add_playtime", move |db| async move {
            db.add_playtime(id, seconds).await
        });
    }

    pub fn close_session(&self, id: SteamId, session_seconds: u64) {
        let seconds = i64::try_from(session_seconds).unwrap_or(i64::MAX);
        self.fire("close_session", move |db| async move {
            db.close_session(id, seconds).await
        });
    }

    pub fn update_language(&self, id: SteamId, language: String) {
        self.fire("update_language", move |db| async move {
            db.update_language(id, &language).await
        });
    }

    pub fn session_count<R>(&self, id: SteamId, reply: R)
    where
        R: FnOnce(&mut S, Result<i64, StoreError>) + Send + 'static,
    {
        self.submit(
            "session_count",
            move |db| async move { db.session_count(id).await },
            Some(reply),
        );
    }

    pub fn player_count<R>(&self, reply: R)
    where
        R: FnOnce(&mut S, Result<i64, StoreError>) + Send + 'static,
    {
        self.submit(
            "player_count",
            move |db| async move { db.player_count().await },
            Some(reply),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::tasks::TaskQueue;

    const PLAYER: SteamId = SteamId::new(76561198000000001);

    #[derive(Default)]
    struct State {
        data: Option<PlayerData>,
        sessions: Option<i64>,
    }

    fn pump_until(queue: &TaskQueue<State>, state: &mut State, done: impl Fn(&State) -> bool) {
        for _ in 0..500 {
            queue.process(state);
            if done(state) {
                return;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("store reply never arrived");
    }

    #[test]
    fn test_jobs_run_in_order_and_reply_on_main_thread() {
        let queue: TaskQueue<State> = TaskQueue::new();
        let worker = StoreWorker::spawn_in_memory(queue.sender()).unwrap();
        let store = worker.handle();

        store.upsert_player(PLAYER, "Alice".to_string());
        store.create_session(PLAYER);
        store.add_playtime(PLAYER, 60);
        store.update_language(PLAYER, "zh".to_string());
        store.player_data(PLAYER, |state: &mut State, result| {
            state.data = result.unwrap();
        });
        store.session_count(PLAYER, |state: &mut State, result| {
            state.sessions = Some(result.unwrap());
        });

        let mut state = State::default();
        pump_until(&queue, &mut state, |s| s.sessions.is_some());

        let data = state.data.unwrap();
        assert_eq!(data.language, "zh");
        assert_eq!(data.total_playtime_seconds, 60);
        assert_eq!(state.sessions, Some(1));
    }

    #[test]
    fn test_jobs_after_shutdown_are_dropped() {
        let queue: TaskQueue<Option<bool>> = TaskQueue::new();
        let mut worker = StoreWorker::spawn_in_memory(queue.sender()).unwrap();
        let store = worker.handle();
        worker.shutdown();

        // Jobs submitted after shutdown are dropped without a reply
        store.player_count(|state: &mut Option<bool>, result| {
            *state = Some(result.is_ok());
        });

        let mut state = None;
        std::thread::sleep(Duration::from_millis(50));
        queue.process(&mut state);
        assert_eq!(state, None);
    }

    #[test]
    fn test_unknown_player_has_no_data() {
        let queue: TaskQueue<Option<bool>> = TaskQueue::new();
        let worker = StoreWorker::spawn_in_memory(queue.sender()).unwrap();
        let store = worker.handle();

        store.player_data(PLAYER, |state: &mut Option<bool>, result| {
            *state = Some(result.unwrap().is_none());
        });

        let mut state = None;
        for _ in 0..500 {
            queue.process(&mut state);
            if state.is_some() {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(state, Some(true));
    }

    #[test]
    fn test_shutdown_drains_queue() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.db");
        let queue: TaskQueue<()> = TaskQueue::new();

        let mut worker = StoreWorker::spawn(path.clone(), queue.sender()).unwrap();
        let store = worker.handle();
        store.upsert_player(PLAYER, "Alice".to_string());
        worker.shutdown();

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let count = rt.block_on(async {
            let db = Database::open(&path).await.unwrap();
            db.player_count().await.unwrap()
        });
        assert_eq!(count, 1);
    }

    #[test]
    fn test_open_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be
        let queue: TaskQueue<()> = TaskQueue::new();
        let result = StoreWorker::spawn(dir.path().to_path_buf(), queue.sender());
        assert!(result.is_err());
    }
}
