//! Review threads: where report comments live.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    #[serde(default)]
    pub body: String,
}

/// Comments attached to a review context (a pull request number).
pub trait ReviewThread {
    /// All comments on `context`, oldest first.
    fn list_comments(&self, context: u64)
    -> impl Future<Output = Result<Vec<Comment>, ReportError>> + Send;

    fn create_comment(
        &self,
        context: u64,
        body: &str,
    ) -> impl Future<Output = Result<Comment, ReportError>> + Send;

    fn update_comment(
        &self,
        comment_id: u64,
        body: &str,
    ) -> impl Future<Output = Result<Comment, ReportError>> + Send;
}

/// Thread kept in memory. Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct InMemoryThread {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: u64,
    /// comment id -> (context, body)
    comments: BTreeMap<u64, (u64, String)>,
}

impl InMemoryThread {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the comments on `context`.
    #[must_use]
    pub fn comments(&self, context: u64) -> Vec<Comment> {
        self.with_state(|state| collect(state, context))
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut MemoryState) -> T) -> T {
        let mut guard = match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard)
    }
}

fn collect(state: &MemoryState, context: u64) -> Vec<Comment> {
    state
        .comments
        .iter()
        .filter(|(_, (owner, _))| *owner == context)
        .map(|(id, (_, body))| Comment {
            id: *id,
            body: body.clone(),
        })
        .collect()
}

impl ReviewThread for InMemoryThread {
    async fn list_comments(&self, context: u64) -> Result<Vec<Comment>, ReportError> {
        Ok(self.comments(context))
    }

    async fn create_comment(&self, context: u64, body: &str) -> Result<Comment, ReportError> {
        Ok(self.with_state(|state| {
            state.next_id += 1;
            let id = state.next_id;
            state.comments.insert(id, (context, body.to_string()));
            Comment {
                id,
                body: body.to_string(),
            }
        }))
    }

    async fn update_comment(&self, comment_id: u64, body: &str) -> Result<Comment, ReportError> {
        self.with_state(|state| {
            let (_, stored) = state
                .comments
                .get_mut(&comment_id)
                .ok_or(ReportError::CommentNotFound(comment_id))?;
            body.clone_into(stored);
            Ok(Comment {
                id: comment_id,
                body: body.to_string(),
            })
        })
    }
}
