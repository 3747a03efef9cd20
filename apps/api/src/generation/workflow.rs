//! Aggregation workflow — turns one `ContentRequest` into one `GeneratedPost`.
//!
//! Flow: submit → Generating → fan out content / hashtags / times / image →
//!       fail-fast join → Ready(post) or Failed(message).
//!
//! The four calls run as separate tokio tasks. When one fails, the join returns at once
//! and the remaining tasks are detached: they keep running to completion, their
//! results are dropped. Provider calls are never aborted.
//!
//! `ContentStore` is the only write surface for the state. It is owned by `AppState`
//! and handed to handlers by reference; there is no global store.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::generation::generator::{
    generate_content, generate_hashtags, generate_image_suggestion, suggest_posting_times,
    ContentRequest, ImageSuggestion,
};
use crate::generation::sanitizer::sanitize;
use crate::llm_client::{CompletionProvider, LlmError};

const ABANDONED_CYCLE: &str = "Generation was interrupted before it completed";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Composite result of one generation cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedPost {
    pub content: String,
    pub hashtags: Vec<String>,
    /// Insertion-ordered; not required to be a subset of `hashtags`.
    pub selected_hashtags: Vec<String>,
    pub images: Vec<ImageSuggestion>,
    pub best_times: Vec<String>,
}

impl GeneratedPost {
    /// Flips `tag` in the selection. Returns whether it is now selected.
    pub fn toggle_hashtag(&mut self, tag: &str) -> bool {
        match self.selected_hashtags.iter().position(|t| t == tag) {
            Some(idx) => {
                self.selected_hashtags.remove(idx);
                false
            }
            None => {
                self.selected_hashtags.push(tag.to_string());
                true
            }
        }
    }

    /// Appends the selection to the content after a blank line and re-sanitizes.
    /// Neither the selection nor the hashtag list is cleared, so a second call
    /// appends the same tags again.
    pub fn apply_selected(&mut self) {
        let joined = self.selected_hashtags.join(" ");
        self.content = sanitize(&format!("{}\n\n{}", self.content, joined));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowState {
    Idle,
    /// The last ready post, if any, stays readable while a new cycle runs.
    Generating { previous: Option<GeneratedPost> },
    Ready(GeneratedPost),
    Failed(String),
}

impl WorkflowState {
    pub fn is_generating(&self) -> bool {
        matches!(self, WorkflowState::Generating { .. })
    }

    pub fn post(&self) -> Option<&GeneratedPost> {
        match self {
            WorkflowState::Ready(post) => Some(post),
            WorkflowState::Generating { previous } => previous.as_ref(),
            WorkflowState::Idle | WorkflowState::Failed(_) => None,
        }
    }
}

/// Flat view for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSnapshot {
    pub loading: bool,
    pub error: Option<String>,
    pub generated_post: Option<GeneratedPost>,
}

impl From<&WorkflowState> for StateSnapshot {
    fn from(state: &WorkflowState) -> Self {
        StateSnapshot {
            loading: state.is_generating(),
            error: match state {
                WorkflowState::Failed(message) => Some(message.clone()),
                _ => None,
            },
            generated_post: state.post().cloned(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum WorkflowError {
    #[error("A generation cycle is already in flight")]
    CycleInFlight,

    #[error("{0}")]
    Generation(String),
}

// ────────────────────────────────────────────────────────────────────────────
// State holder
// ────────────────────────────────────────────────────────────────────────────

pub struct ContentStore {
    llm: Arc<dyn CompletionProvider>,
    image_host: String,
    state: watch::Sender<WorkflowState>,
}

impl ContentStore {
    pub fn new(llm: Arc<dyn CompletionProvider>, image_host: impl Into<String>) -> Self {
        let (state, _) = watch::channel(WorkflowState::Idle);
        Self {
            llm,
            image_host: image_host.into(),
            state,
        }
    }

    #[cfg(test)]
    pub fn current(&self) -> WorkflowState {
        self.state.borrow().clone()
    }

    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::from(&*self.state.borrow())
    }

    /// Receives every state transition from now on.
    #[cfg(test)]
    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.state.subscribe()
    }

    /// Runs one generation cycle to completion.
    ///
    /// The state is written exactly twice: on entry (`Generating`) and on resolution
    /// (`Ready` or `Failed`). A submission while a cycle is in flight is refused.
    /// If this future is dropped mid-cycle the state resolves to `Failed`, so a
    /// later submission is never locked out by a stale `Generating`.
    pub async fn generate_post(
        &self,
        request: ContentRequest,
    ) -> Result<GeneratedPost, WorkflowError> {
        let entered = self.state.send_if_modified(|state| {
            if state.is_generating() {
                return false;
            }
            let previous = state.post().cloned();
            *state = WorkflowState::Generating { previous };
            true
        });
        if !entered {
            warn!("Rejected submission: a generation cycle is already in flight");
            return Err(WorkflowError::CycleInFlight);
        }
        let guard = CycleGuard {
            state: &self.state,
            resolved: false,
        };

        let cycle_id = Uuid::new_v4();
        info!(
            "Generation cycle {} started: platform={} tone={}",
            cycle_id, request.platform, request.tone
        );

        match self.fan_out(request).await {
            Ok(post) => {
                info!(
                    "Generation cycle {} ready: {} hashtags, {} posting times",
                    cycle_id,
                    post.hashtags.len(),
                    post.best_times.len()
                );
                guard.resolve(WorkflowState::Ready(post.clone()));
                Ok(post)
            }
            Err(message) => {
                warn!("Generation cycle {} failed: {}", cycle_id, message);
                guard.resolve(WorkflowState::Failed(message.clone()));
                Err(WorkflowError::Generation(message))
            }
        }
    }

    /// Flips `tag` in the ready post's selection. No-op unless a post is `Ready`.
    pub fn toggle_hashtag(&self, tag: &str) -> bool {
        self.state.send_if_modified(|state| match state {
            WorkflowState::Ready(post) => {
                post.toggle_hashtag(tag);
                true
            }
            _ => false,
        })
    }

    /// Merges the selected hashtags into the ready post's content. No-op unless `Ready`.
    pub fn apply_selected(&self) -> bool {
        self.state.send_if_modified(|state| match state {
            WorkflowState::Ready(post) => {
                post.apply_selected();
                true
            }
            _ => false,
        })
    }

    /// Launches the four generation calls and joins them fail-fast.
    async fn fan_out(&self, request: ContentRequest) -> Result<GeneratedPost, String> {
        let content_task = {
            let llm = Arc::clone(&self.llm);
            let request = request.clone();
            tokio::spawn(async move { generate_content(llm.as_ref(), &request).await })
        };
        let hashtag_task = {
            let llm = Arc::clone(&self.llm);
            let topic = request.topic.clone();
            let platform = request.platform;
            tokio::spawn(async move { generate_hashtags(llm.as_ref(), &topic, platform).await })
        };
        let times_task = {
            let llm = Arc::clone(&self.llm);
            let platform = request.platform;
            tokio::spawn(async move { suggest_posting_times(llm.as_ref(), platform).await })
        };
        let image_task = {
            let llm = Arc::clone(&self.llm);
            let topic = request.topic.clone();
            let platform = request.platform;
            let image_host = self.image_host.clone();
            tokio::spawn(async move {
                Ok::<_, LlmError>(
                    generate_image_suggestion(llm.as_ref(), &topic, platform, &image_host).await,
                )
            })
        };

        // try_join! drops the unfinished joins on the first error; dropping a
        // JoinHandle detaches its task instead of aborting it.
        let (content, hashtags, best_times, image) = tokio::try_join!(
            joined(content_task),
            joined(hashtag_task),
            joined(times_task),
            joined(image_task)
        )?;

        Ok(GeneratedPost {
            content: sanitize(&content),
            hashtags: hashtags.iter().map(|tag| sanitize(tag)).collect(),
            selected_hashtags: Vec::new(),
            images: vec![image],
            best_times: best_times.iter().map(|time| sanitize(time)).collect(),
        })
    }
}

/// Owns the `Generating` state of one cycle until it is resolved.
/// Dropped unresolved, it writes `Failed(ABANDONED_CYCLE)`.
struct CycleGuard<'a> {
    state: &'a watch::Sender<WorkflowState>,
    resolved: bool,
}

impl CycleGuard<'_> {
    fn resolve(mut self, outcome: WorkflowState) {
        self.state.send_replace(outcome);
        self.resolved = true;
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        if !self.resolved {
            warn!("Generation cycle dropped before resolving, marking it failed");
            self.state
                .send_replace(WorkflowState::Failed(ABANDONED_CYCLE.to_string()));
        }
    }
}

/// Awaits a spawned generation call, flattening panics and provider errors into a message.
async fn joined<T>(task: JoinHandle<Result<T, LlmError>>) -> Result<T, String> {
    match task.await {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(e) => Err(format!("Generation task failed: {e}")),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
