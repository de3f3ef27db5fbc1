//! Ordered requirement checks for one command.
//!
//! ```ignore
//! let req = Requirements::new(&command);
//! req.require("no inputs should be consumed", tx.inputs.is_empty())?;
//! let out = req.single("one output should be produced", &tx.outputs)?;
//! ```
//!
//! Checks are evaluated in source order and `?` stops at the first one
//! that fails.

use crate::command::Command;
use crate::error::Violation;

/// Requirement checker bound to the command being validated.
#[derive(Debug, Clone, Copy)]
pub struct Requirements {
    command: &'static str,
}

impl Requirements {
    pub fn new(command: &Command) -> Self {
        Self {
            command: command.name(),
        }
    }

    /// Fail with `reason` unless `holds`.
    pub fn require(&self, reason: &str, holds: bool) -> Result<(), Violation> {
        if holds {
            Ok(())
        } else {
            Err(self.violation(reason))
        }
    }

    /// Unwrap `value`, failing with `reason` when absent.
    pub fn present<T>(&self, reason: &str, value: Option<T>) -> Result<T, Violation> {
        value.ok_or_else(|| self.violation(reason))
    }

    /// The only element of `items`, failing with `reason` unless there is
    /// exactly one.
    pub fn single<'a, T>(&self, reason: &str, items: &'a [T]) -> Result<&'a T, Violation> {
        match items {
            [only] => Ok(only),
            _ => Err(self.violation(reason)),
        }
    }

    pub fn violation(&self, reason: &str) -> Violation {
        Violation::new(self.command, reason)
    }
}
