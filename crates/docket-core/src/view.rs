//! Which case is selected and whether its update form is open.

use crate::error::ErrorCode;

pub const MSG_SELECT_CASE_FIRST: &str = "Please select a case first.";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ViewError {
    #[error("{}", MSG_SELECT_CASE_FIRST)]
    NoCaseSelected,
}

impl ViewError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NoCaseSelected => ErrorCode::NoCaseSelected,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    selected_case_id: Option<String>,
    form_open: bool,
}

impl ViewState {
    #[must_use]
    pub fn selected_case_id(&self) -> Option<&str> {
        self.selected_case_id.as_deref()
    }

    #[must_use]
    pub const fn form_open(&self) -> bool {
        self.form_open
    }

    /// Selecting another case discards any open form.
    pub fn select_case(&mut self, case_id: impl Into<String>) {
        self.selected_case_id = Some(case_id.into());
        self.form_open = false;
    }

    pub fn clear_selection(&mut self) {
        self.selected_case_id = None;
        self.form_open = false;
    }

    /// # Errors
    ///
    /// Returns [`ViewError::NoCaseSelected`] when no case is selected.
    pub fn open_form(&mut self) -> Result<&str, ViewError> {
        let case_id = self
            .selected_case_id
            .as_deref()
            .ok_or(ViewError::NoCaseSelected)?;
        self.form_open = true;
        Ok(case_id)
    }

    pub fn close_form(&mut self) {
        self.form_open = false;
    }

    pub fn submit_succeeded(&mut self) {
        self.form_open = false;
    }
}
