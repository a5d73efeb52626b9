//! Comment submission state machine

/// Where the reader is in submitting a comment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    /// Form visible, nothing sent yet
    #[default]
    NotSubmitted,
    /// Request in flight; the submit control is disabled
    Submitting,
    /// Terminal: the form is replaced by the acknowledgment
    Submitted,
    /// The last attempt failed; the form is shown again with a notice
    Failed(String),
}

impl SubmissionState {
    /// Move to `Submitting`; false if a submission cannot start from here
    pub fn begin(&mut self) -> bool {
        match self {
            SubmissionState::NotSubmitted | SubmissionState::Failed(_) => {
                *self = SubmissionState::Submitting;
                true
            }
            SubmissionState::Submitting | SubmissionState::Submitted => false,
        }
    }

    /// Settle an in-flight submission
    pub fn finish<E: std::fmt::Display>(&mut self, outcome: Result<(), E>) {
        if *self != SubmissionState::Submitting {
            return;
        }
        *self = match outcome {
            Ok(()) => SubmissionState::Submitted,
            Err(e) => SubmissionState::Failed(e.to_string()),
        };
    }

    pub fn shows_form(&self) -> bool {
        !matches!(self, SubmissionState::Submitted)
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, SubmissionState::Submitting)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_path() {
        let mut state = SubmissionState::default();
        assert!(state.shows_form());
        assert!(state.begin());
        assert!(state.is_submitting());
        state.finish::<String>(Ok(()));
        assert_eq!(state, SubmissionState::Submitted);
        assert!(!state.shows_form());
    }

    #[test]
    fn test_failure_allows_retry() {
        let mut state = SubmissionState::default();
        state.begin();
        state.finish(Err("connection refused"));
        assert_eq!(state, SubmissionState::Failed("connection refused".to_string()));
        assert!(state.shows_form());
        assert!(state.begin());
    }

    #[test]
    fn test_submitted_is_terminal() {
        let mut state = SubmissionState::Submitted;
        assert!(!state.begin());
        state.finish(Err("late failure"));
        assert_eq!(state, SubmissionState::Submitted);
    }

    #[test]
    fn test_no_double_begin() {
        let mut state = SubmissionState::default();
        assert!(state.begin());
        assert!(!state.begin());
    }
}
