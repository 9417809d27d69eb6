// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Issue tracker adapter.
//!
//! The review thread lives on GitHub: the open pull request whose head is
//! the working branch. This system only reads comment bodies, appends new
//! ones, and overwrites its own ledger comments; it never deletes or
//! reorders anything.

use async_trait::async_trait;
use octocrab::models::CommentId;
use octocrab::Octocrab;
use thiserror::Error;

/// A resolved review thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub number: u64,
    pub url: String,
}

/// One comment on a review thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewComment {
    pub id: u64,
    pub body: String,
}

/// Errors from tracker operations
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Zero or multiple open reviews matched. Picking "the first match"
    /// could rewrite the wrong thread's ledger, so this is always fatal.
    #[error("review not found or ambiguous: {matches} open reviews for branch '{branch}'")]
    Ambiguous { branch: String, matches: u64 },
    #[error("tracker request failed: {0}")]
    Api(String),
}

/// Adapter for the review-thread service
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Find the single open review whose head is `branch`.
    async fn find_open_review(&self, branch: &str) -> Result<Review, TrackerError>;

    /// All comments on a review, oldest first, across every page.
    async fn list_comments(&self, review: u64) -> Result<Vec<ReviewComment>, TrackerError>;

    /// Append a comment; returns its id.
    async fn create_comment(&self, review: u64, body: &str) -> Result<u64, TrackerError>;

    /// Replace a comment's body in full.
    async fn update_comment(&self, comment_id: u64, body: &str) -> Result<(), TrackerError>;
}

/// GitHub-backed tracker using octocrab.
pub struct GithubTracker {
    client: Octocrab,
    owner: String,
    repo: String,
}

impl GithubTracker {
    pub fn new(
        token: String,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Result<Self, TrackerError> {
        let client = Octocrab::builder()
            .personal_token(token)
            .build()
            .map_err(|e| TrackerError::Api(format!("client setup failed: {e}")))?;
        Ok(Self { client, owner: owner.into(), repo: repo.into() })
    }
}

fn api_err(e: octocrab::Error) -> TrackerError {
    TrackerError::Api(e.to_string())
}

#[async_trait]
impl IssueTracker for GithubTracker {
    async fn find_open_review(&self, branch: &str) -> Result<Review, TrackerError> {
        let query =
            format!("is:pr is:open repo:{}/{} head:{}", self.owner, self.repo, branch);
        tracing::debug!(%query, "searching for open review");
        let page = self
            .client
            .search()
            .issues_and_pull_requests(&query)
            .send()
            .await
            .map_err(api_err)?;

        let matches = page.total_count.unwrap_or(0);
        if matches != 1 {
            return Err(TrackerError::Ambiguous { branch: branch.to_string(), matches });
        }
        let item = page
            .items
            .into_iter()
            .next()
            .ok_or_else(|| TrackerError::Api("search returned an empty page".to_string()))?;
        Ok(Review { number: item.number as u64, url: item.html_url.to_string() })
    }

    async fn list_comments(&self, review: u64) -> Result<Vec<ReviewComment>, TrackerError> {
        let page = self
            .client
            .issues(&self.owner, &self.repo)
            .list_comments(review)
            .per_page(100)
            .send()
            .await
            .map_err(api_err)?;
        let comments = self.client.all_pages(page).await.map_err(api_err)?;
        Ok(comments
            .into_iter()
            .map(|c| ReviewComment { id: c.id.0, body: c.body.unwrap_or_default() })
            .collect())
    }

    async fn create_comment(&self, review: u64, body: &str) -> Result<u64, TrackerError> {
        let comment = self
            .client
            .issues(&self.owner, &self.repo)
            .create_comment(review, body)
            .await
            .map_err(api_err)?;
        Ok(comment.id.0)
    }

    async fn update_comment(&self, comment_id: u64, body: &str) -> Result<(), TrackerError> {
        self.client
            .issues(&self.owner, &self.repo)
            .update_comment(CommentId(comment_id), body)
            .await
            .map_err(api_err)?;
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
mod fake {
    use super::{IssueTracker, Review, ReviewComment, TrackerError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    struct FakeTrackerState {
        reviews: HashMap<String, Review>,
        extra_matches: HashMap<String, u64>,
        comments: HashMap<u64, Vec<ReviewComment>>,
        next_comment_id: u64,
        create_calls: usize,
        update_calls: Vec<u64>,
        fail_writes: bool,
    }

    /// In-memory tracker for testing
    #[derive(Clone)]
    pub struct FakeTracker {
        inner: Arc<Mutex<FakeTrackerState>>,
    }

    impl Default for FakeTracker {
        fn default() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeTrackerState {
                    reviews: HashMap::new(),
                    extra_matches: HashMap::new(),
                    comments: HashMap::new(),
                    next_comment_id: 100,
                    create_calls: 0,
                    update_calls: Vec::new(),
                    fail_writes: false,
                })),
            }
        }
    }

    impl FakeTracker {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register an open review for a branch.
        pub fn with_review(self, branch: &str, number: u64) -> Self {
            {
                let mut state = self.inner.lock();
                state.reviews.insert(
                    branch.to_string(),
                    Review {
                        number,
                        url: format!("https://github.example.com/pull/{number}"),
                    },
                );
                state.comments.entry(number).or_default();
            }
            self
        }

        /// Make a branch resolve to multiple open reviews.
        pub fn with_duplicate_reviews(self, branch: &str) -> Self {
            self.inner.lock().extra_matches.insert(branch.to_string(), 2);
            self
        }

        /// Seed an existing comment; returns its id.
        pub fn seed_comment(&self, review: u64, body: &str) -> u64 {
            let mut state = self.inner.lock();
            state.next_comment_id += 1;
            let id = state.next_comment_id;
            state
                .comments
                .entry(review)
                .or_default()
                .push(ReviewComment { id, body: body.to_string() });
            id
        }

        /// Make subsequent create/update calls fail.
        pub fn fail_writes(&self) {
            self.inner.lock().fail_writes = true;
        }

        /// Current body of a comment, if it exists.
        pub fn comment_body(&self, comment_id: u64) -> Option<String> {
            let state = self.inner.lock();
            state
                .comments
                .values()
                .flatten()
                .find(|c| c.id == comment_id)
                .map(|c| c.body.clone())
        }

        /// Number of create_comment calls observed.
        pub fn create_calls(&self) -> usize {
            self.inner.lock().create_calls
        }

        /// Ids passed to update_comment, in call order.
        pub fn update_calls(&self) -> Vec<u64> {
            self.inner.lock().update_calls.clone()
        }
    }

    #[async_trait]
    impl IssueTracker for FakeTracker {
        async fn find_open_review(&self, branch: &str) -> Result<Review, TrackerError> {
            let state = self.inner.lock();
            if let Some(matches) = state.extra_matches.get(branch) {
                return Err(TrackerError::Ambiguous {
                    branch: branch.to_string(),
                    matches: *matches,
                });
            }
            state
                .reviews
                .get(branch)
                .cloned()
                .ok_or_else(|| TrackerError::Ambiguous { branch: branch.to_string(), matches: 0 })
        }

        async fn list_comments(&self, review: u64) -> Result<Vec<ReviewComment>, TrackerError> {
            Ok(self.inner.lock().comments.get(&review).cloned().unwrap_or_default())
        }

        async fn create_comment(&self, review: u64, body: &str) -> Result<u64, TrackerError> {
            let mut state = self.inner.lock();
            state.create_calls += 1;
            if state.fail_writes {
                return Err(TrackerError::Api("write refused".to_string()));
            }
            state.next_comment_id += 1;
            let id = state.next_comment_id;
            state
                .comments
                .entry(review)
                .or_default()
                .push(ReviewComment { id, body: body.to_string() });
            Ok(id)
        }

        async fn update_comment(&self, comment_id: u64, body: &str) -> Result<(), TrackerError> {
            let mut state = self.inner.lock();
            state.update_calls.push(comment_id);
            if state.fail_writes {
                return Err(TrackerError::Api("write refused".to_string()));
            }
            for comments in state.comments.values_mut() {
                if let Some(comment) = comments.iter_mut().find(|c| c.id == comment_id) {
                    comment.body = body.to_string();
                    return Ok(());
                }
            }
            Err(TrackerError::Api(format!("no such comment: {comment_id}")))
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeTracker;

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
