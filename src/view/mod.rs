//! Post view - one post page and its comment form
//!
//! A `PostView` pairs a fetched post with the reader's submission state. The
//! server builds one per request, restoring `Submitted` from the session so the
//! acknowledgment survives re-renders.

mod form;
mod render;
mod state;

use std::sync::Arc;

pub use form::{CommentForm, FieldErrors, COMMENT_REQUIRED, EMAIL_REQUIRED, NAME_REQUIRED};
pub use render::{PageRenderer, RenderSettings};
pub use state::SubmissionState;

use crate::content::Post;
use crate::submit::CommentSink;

/// What happened to a form post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A required field was empty; nothing was sent
    Invalid,
    /// The comment was already accepted in this session; nothing was sent
    AlreadySubmitted,
    /// The endpoint accepted the comment
    Accepted,
    /// The endpoint call failed
    Failed,
}

impl SubmitOutcome {
    /// Whether a request was issued to the comment endpoint
    pub fn sent_request(self) -> bool {
        matches!(self, SubmitOutcome::Accepted | SubmitOutcome::Failed)
    }
}

pub struct PostView {
    post: Arc<Post>,
    state: SubmissionState,
    form: CommentForm,
    errors: FieldErrors,
}

impl PostView {
    pub fn new(post: Arc<Post>) -> Self {
        Self {
            post,
            state: SubmissionState::NotSubmitted,
            form: CommentForm::default(),
            errors: FieldErrors::default(),
        }
    }

    /// A view whose reader already had a comment accepted
    pub fn submitted(post: Arc<Post>) -> Self {
        Self {
            state: SubmissionState::Submitted,
            ..Self::new(post)
        }
    }

    pub fn post(&self) -> &Post {
        &self.post
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn form(&self) -> &CommentForm {
        &self.form
    }

    pub fn errors(&self) -> FieldErrors {
        self.errors
    }

    pub fn failure(&self) -> Option<&str> {
        match &self.state {
            SubmissionState::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    /// Validate the form and, if complete, send it through `sink`
    ///
    /// At most one request is issued per call. Failures are logged and leave
    /// the form filled in for another attempt.
    pub async fn submit(&mut self, form: CommentForm, sink: &dyn CommentSink) -> SubmitOutcome {
        if self.state == SubmissionState::Submitted {
            return SubmitOutcome::AlreadySubmitted;
        }

        let input = match form.validate(&self.post.id) {
            Ok(input) => input,
            Err(errors) => {
                tracing::debug!(slug = self.post.slug(), "Comment form incomplete");
                self.errors = errors;
                self.form = form;
                return SubmitOutcome::Invalid;
            }
        };

        self.errors = FieldErrors::default();
        if !self.state.begin() {
            return SubmitOutcome::AlreadySubmitted;
        }

        let result = sink.submit(&input).await;
        let outcome = match &result {
            Ok(()) => {
                tracing::info!(slug = self.post.slug(), "Comment submitted");
                self.form = CommentForm::default();
                SubmitOutcome::Accepted
            }
            Err(e) => {
                tracing::warn!(slug = self.post.slug(), "Comment submission failed: {}", e);
                self.form = form;
                SubmitOutcome::Failed
            }
        };
        self.state.finish(result);
        outcome
    }
}
