//! Comment form input and presence validation

use serde::{Deserialize, Serialize};

use crate::submit::CommentInput;

pub const NAME_REQUIRED: &str = "The name field is required";
pub const EMAIL_REQUIRED: &str = "The email field is required";
pub const COMMENT_REQUIRED: &str = "The comment field is required";

/// Raw form fields as posted by the browser
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    pub name: String,
    pub email: String,
    pub comment: String,
}

/// Which required fields were missing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors {
    pub name: bool,
    pub email: bool,
    pub comment: bool,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        !(self.name || self.email || self.comment)
    }

    /// Messages in field order
    pub fn messages(&self) -> Vec<&'static str> {
        let mut messages = Vec::new();
        if self.name {
            messages.push(NAME_REQUIRED);
        }
        if self.email {
            messages.push(EMAIL_REQUIRED);
        }
        if self.comment {
            messages.push(COMMENT_REQUIRED);
        }
        messages
    }
}

impl CommentForm {
    /// Check that every field is present; whitespace-only counts as missing
    pub fn validate(&self, post_id: &str) -> Result<CommentInput, FieldErrors> {
        let errors = FieldErrors {
            name: self.name.trim().is_empty(),
            email: self.email.trim().is_empty(),
            comment: self.comment.trim().is_empty(),
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(CommentInput {
            post_id: post_id.to_string(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            comment: self.comment.trim().to_string(),
        })
    }
}
