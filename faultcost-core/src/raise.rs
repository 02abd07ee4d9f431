// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Raising and intercepting failures by unwinding.
//!
//! A raised failure travels as an unwind payload: [`raise`] and
//! [`raise_singleton`] start unwinding without running the panic hook, and
//! [`catch_raised`] stops it in the caller. Unwinding payloads that are not
//! a [`RaisedError`] are real bugs and keep unwinding.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::LazyLock;

use crate::failure::BusinessFailure;

static SUPPRESSED_SINGLETON: LazyLock<RaisedError> = LazyLock::new(RaisedError::suppressed);

/// Zero-sized payload standing in for [`SUPPRESSED_SINGLETON`]. Boxing it
/// does not allocate.
struct SingletonRaised;

/// A business failure raised by unwinding, with or without a stack trace.
#[derive(Debug)]
pub struct RaisedError {
    failure: BusinessFailure,
    backtrace: Backtrace,
}

impl RaisedError {
    /// Fresh error with the full call stack captured, regardless of
    /// `RUST_BACKTRACE`.
    pub fn captured() -> Self {
        Self {
            failure: BusinessFailure::new(),
            backtrace: Backtrace::force_capture(),
        }
    }

    /// Fresh error with stack capture disabled.
    pub fn suppressed() -> Self {
        Self {
            failure: BusinessFailure::new(),
            backtrace: Backtrace::disabled(),
        }
    }

    /// The process-wide stackless error, built on first use.
    pub fn suppressed_singleton() -> &'static RaisedError {
        &SUPPRESSED_SINGLETON
    }

    pub fn failure(&self) -> &BusinessFailure {
        &self.failure
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    /// Whether a stack trace was captured at construction.
    pub fn has_stack_trace(&self) -> bool {
        self.backtrace.status() == BacktraceStatus::Captured
    }
}

impl fmt::Display for RaisedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.failure, f)
    }
}

impl std::error::Error for RaisedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.failure)
    }
}

/// An intercepted failure.
#[derive(Debug)]
pub enum Caught {
    /// A freshly built error, moved out of the unwind payload.
    Owned(Box<RaisedError>),
    /// The shared singleton.
    Shared(&'static RaisedError),
}

impl Caught {
    pub fn error(&self) -> &RaisedError {
        match self {
            Caught::Owned(error) => error.as_ref(),
            Caught::Shared(error) => *error,
        }
    }
}

/// Unwind with a freshly built error.
#[cold]
pub fn raise(error: RaisedError) -> ! {
    panic::resume_unwind(Box::new(error))
}

/// Unwind with the shared stackless error. The payload is zero-sized, so
/// the only allocation is the unwinder's own exception record.
#[cold]
pub fn raise_singleton() -> ! {
    panic::resume_unwind(Box::new(SingletonRaised))
}

/// Run `f`, intercepting any failure it raises.
pub fn catch_raised<T>(f: impl FnOnce() -> T) -> Result<T, Caught> {
    let payload = match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => return Ok(value),
        Err(payload) => payload,
    };

    let payload = match payload.downcast::<RaisedError>() {
        Ok(error) => return Err(Caught::Owned(error)),
        Err(other) => other,
    };

    match payload.downcast::<SingletonRaised>() {
        Ok(_) => Err(Caught::Shared(RaisedError::suppressed_singleton())),
        Err(other) => panic::resume_unwind(other),
    }
}
