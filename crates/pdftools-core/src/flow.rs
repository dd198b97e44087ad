//! Page-level flow of a file tool
//!
//! ```text
//! Empty -> FilesSelected -> Processing -> Result
//!                ^   ^                \-> Error
//!                |    \______________________/ (acknowledge)
//!                 \__ Result (edit) ___/
//! ```
//!
//! `Processing` is only entered when the caller's preconditions hold and is
//! always left, whatever the outcome of the operation. It can be entered
//! again straight from `Result`, so a finished job can be re-run.

use crate::error::PdfToolsError;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlowState {
    Empty,
    FilesSelected,
    Processing,
    Result,
    Error,
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowState::Empty => "empty",
            FlowState::FilesSelected => "files-selected",
            FlowState::Processing => "processing",
            FlowState::Result => "result",
            FlowState::Error => "error",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct Flow {
    state: FlowState,
    last_error: Option<String>,
}

impl Default for Flow {
    fn default() -> Self {
        Self::new()
    }
}

impl Flow {
    pub fn new() -> Self {
        Self {
            state: FlowState::Empty,
            last_error: None,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Message of the most recent failure, cleared once acknowledged
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The working set changed. Moves to `FilesSelected` or back to `Empty`.
    pub fn files_changed(&mut self, has_files: bool) -> Result<FlowState, PdfToolsError> {
        if self.state == FlowState::Processing {
            return Err(self.invalid("files cannot change while processing"));
        }
        self.last_error = None;
        self.state = if has_files {
            FlowState::FilesSelected
        } else {
            FlowState::Empty
        };
        Ok(self.state)
    }

    /// Enter `Processing` from `FilesSelected` or `Result`. `ready` is the
    /// operation's own precondition, e.g. at least two queued files for a
    /// merge.
    pub fn begin(&mut self, ready: bool) -> Result<(), PdfToolsError> {
        if !matches!(self.state, FlowState::FilesSelected | FlowState::Result) {
            return Err(self.invalid("nothing selected to process"));
        }
        if !ready {
            return Err(PdfToolsError::Validation(
                "Selected files are not ready to process".to_string(),
            ));
        }
        self.state = FlowState::Processing;
        Ok(())
    }

    /// Leave `Processing` with the operation's outcome
    pub fn complete<T, E: fmt::Display>(
        &mut self,
        outcome: &Result<T, E>,
    ) -> Result<FlowState, PdfToolsError> {
        if self.state != FlowState::Processing {
            return Err(self.invalid("no operation in progress"));
        }
        match outcome {
            Ok(_) => {
                self.state = FlowState::Result;
                self.last_error = None;
            }
            Err(e) => {
                self.state = FlowState::Error;
                self.last_error = Some(e.to_string());
            }
        }
        Ok(self.state)
    }

    /// Dismiss an error and return to the selected files
    pub fn acknowledge_error(&mut self) -> Result<(), PdfToolsError> {
        if self.state != FlowState::Error {
            return Err(self.invalid("no error to acknowledge"));
        }
        self.state = FlowState::FilesSelected;
        self.last_error = None;
        Ok(())
    }

    /// Run `operation` inside `Processing`.
    ///
    /// Precondition failures leave the state untouched. Once started the
    /// flow always ends in `Result` or `Error`.
    pub fn run<T>(
        &mut self,
        ready: bool,
        operation: impl FnOnce() -> Result<T, PdfToolsError>,
    ) -> Result<T, PdfToolsError> {
        self.begin(ready)?;
        let outcome = operation();
        self.complete(&outcome)?;
        outcome
    }

    fn invalid(&self, reason: &str) -> PdfToolsError {
        PdfToolsError::InvalidTransition(format!("{} (state: {})", reason, self.state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected() -> Flow {
        let mut flow = Flow::new();
        flow.files_changed(true).unwrap();
        flow
    }

    #[test]
    fn test_new_flow_is_empty() {
        assert_eq!(Flow::new().state(), FlowState::Empty);
    }

    #[test]
    fn test_files_changed_toggles_selection() {
        let mut flow = Flow::new();
        assert_eq!(flow.files_changed(true).unwrap(), FlowState::FilesSelected);
        assert_eq!(flow.files_changed(false).unwrap(), FlowState::Empty);
    }

    #[test]
    fn test_begin_requires_files() {
        let mut flow = Flow::new();
        assert!(matches!(
            flow.begin(true),
            Err(PdfToolsError::InvalidTransition(_))
        ));
        assert_eq!(flow.state(), FlowState::Empty);
    }

    #[test]
    fn test_begin_requires_precondition() {
        let mut flow = selected();
        assert!(matches!(flow.begin(false), Err(PdfToolsError::Validation(_))));
        assert_eq!(flow.state(), FlowState::FilesSelected);
    }

    #[test]
    fn test_successful_run_ends_in_result() {
        let mut flow = selected();
        let value = flow.run(true, || Ok(42)).unwrap();
        assert_eq!(value, 42);
        assert_eq!(flow.state(), FlowState::Result);
        assert_eq!(flow.last_error(), None);
    }

    #[test]
    fn test_failed_run_ends_in_error_then_back_to_selection() {
        let mut flow = selected();
        let result: Result<(), _> =
            flow.run(true, || Err(PdfToolsError::OperationError("boom".into())));
        assert!(result.is_err());
        assert_eq!(flow.state(), FlowState::Error);
        assert_eq!(flow.last_error(), Some("PDF operation failed: boom"));

        flow.acknowledge_error().unwrap();
        assert_eq!(flow.state(), FlowState::FilesSelected);
        assert_eq!(flow.last_error(), None);
    }

    #[test]
    fn test_files_cannot_change_while_processing() {
        let mut flow = selected();
        flow.begin(true).unwrap();
        assert!(flow.files_changed(false).is_err());
        assert_eq!(flow.state(), FlowState::Processing);
    }

    #[test]
    fn test_complete_outside_processing_rejected() {
        let mut flow = selected();
        let outcome: Result<(), String> = Ok(());
        assert!(flow.complete(&outcome).is_err());
    }

    #[test]
    fn test_new_files_after_result_start_over() {
        let mut flow = selected();
        flow.run(true, || Ok(())).unwrap();
        assert_eq!(flow.files_changed(true).unwrap(), FlowState::FilesSelected);
    }

    #[test]
    fn test_rerun_from_result() {
        let mut flow = selected();
        flow.run(true, || Ok(1)).unwrap();
        assert_eq!(flow.run(true, || Ok(2)).unwrap(), 2);
        assert_eq!(flow.state(), FlowState::Result);
    }

    #[test]
    fn test_begin_from_error_rejected() {
        let mut flow = selected();
        let failed: Result<(), _> =
            flow.run(true, || Err(PdfToolsError::OperationError("boom".into())));
        assert!(failed.is_err());
        assert!(matches!(
            flow.begin(true),
            Err(PdfToolsError::InvalidTransition(_))
        ));
        assert_eq!(flow.state(), FlowState::Error);
    }

    #[test]
    fn test_acknowledge_without_error_rejected() {
        let mut flow = selected();
        assert!(flow.acknowledge_error().is_err());
    }
}
