//! User confirmation for destructive actions

/// Asks the user to approve a destructive action
///
/// Implemented for any `FnMut(&str) -> bool`, so tests can pass a closure
/// and a front end can prompt however it likes.
pub trait Confirm {
    /// Returns true when the user approves `prompt`
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Result of an action gated on confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Declined,
}

impl Outcome {
    pub fn is_applied(self) -> bool {
        self == Outcome::Applied
    }
}
