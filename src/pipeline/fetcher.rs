// src/pipeline/fetcher.rs

//! Single-slot post fetcher: at most one fetch in flight, observable state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::AppError;
use crate::models::PostResult;
use crate::pipeline::fetch::PostPipeline;

/// Observable state of a [`PostFetcher`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Fetching {
        id: u64,
    },
    Success(Arc<PostResult>),
    Failed {
        id: u64,
        reason: String,
    },
}

impl FetchStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Success(_) | Self::Failed { .. })
    }
}

struct ActiveFetch {
    id: u64,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Runs post fetches one at a time.
///
/// Starting a fetch cancels the previous one and waits for its task to
/// finish, so a superseded run never writes to the status slot.
pub struct PostFetcher {
    pipeline: Arc<PostPipeline>,
    state: Arc<watch::Sender<FetchStatus>>,
    generation: Arc<AtomicU64>,
    active: Option<ActiveFetch>,
}

impl PostFetcher {
    pub fn new(pipeline: PostPipeline) -> Self {
        let (state, _) = watch::channel(FetchStatus::Idle);
        Self {
            pipeline: Arc::new(pipeline),
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
            active: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchStatus> {
        self.state.subscribe()
    }

    pub fn status(&self) -> FetchStatus {
        self.state.borrow().clone()
    }

    /// Start fetching `id`, replacing whatever was in flight.
    ///
    /// Returns once the new run is spawned and the status reads `Fetching`.
    pub async fn fetch(&mut self, id: u64) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.teardown().await;
        self.state.send_replace(FetchStatus::Fetching { id });

        let token = CancellationToken::new();
        let run_token = token.clone();
        let pipeline = Arc::clone(&self.pipeline);
        let state = Arc::clone(&self.state);
        let current = Arc::clone(&self.generation);

        let handle = tokio::spawn(async move {
            let outcome = tokio::select! {
                biased;
                _ = run_token.cancelled() => Err(AppError::Cancelled),
                result = pipeline.fetch_post(id) => result,
            };

            let status = match outcome {
                Ok(post) => FetchStatus::Success(Arc::new(post)),
                Err(AppError::Cancelled) => {
                    log::debug!("Fetch for {} cancelled", id);
                    return;
                }
                Err(error) => {
                    log::warn!("Fetch for {} failed: {}", id, error);
                    FetchStatus::Failed {
                        id,
                        reason: error.reason(),
                    }
                }
            };

            state.send_if_modified(|slot| {
                if run_token.is_cancelled() || current.load(Ordering::SeqCst) != generation {
                    return false;
                }
                *slot = status;
                true
            });
        });

        self.active = Some(ActiveFetch { id, token, handle });
    }

    /// Cancel the fetch in flight, if any, and return to `Idle`.
    pub async fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if self.teardown().await {
            self.state.send_replace(FetchStatus::Idle);
        }
    }

    /// Wait for the fetch in flight to finish and return the final status.
    pub async fn wait(&mut self) -> FetchStatus {
        if let Some(active) = self.active.take() {
            if let Err(error) = active.handle.await {
                log::error!("Fetch task for {} ended abnormally: {}", active.id, error);
            }
        }
        self.status()
    }

    /// Cancel and join the current run. Returns whether one was active.
    async fn teardown(&mut self) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };
        if !active.handle.is_finished() {
            log::debug!("Cancelling fetch for {}", active.id);
        }
        active.token.cancel();
        if let Err(error) = active.handle.await {
            log::error!("Fetch task for {} ended abnormally: {}", active.id, error);
        }
        true
    }
}

impl Drop for PostFetcher {
    fn drop(&mut self) {
        if let Some(active) = &self.active {
            active.token.cancel();
        }
    }
}
