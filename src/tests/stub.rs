use std::{
    future::pending,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
};

use crate::{
    config::credential::{CredentialFuture, FileHandle},
    errors::{CredentialError, ToriiError},
};

enum Outcome {
    Contents(Vec<u8>),
    Fail(ToriiError),
    FailClose(Vec<u8>, ToriiError),
    Hang,
}

/// In-memory file handle counting reads and closes.
pub(crate) struct StubFile {
    outcome: Outcome,
    reads: AtomicUsize,
    closes: AtomicUsize,
    closed: AtomicBool,
}

impl StubFile {
    fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            reads: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        }
    }

    pub(crate) fn with_contents(contents: &[u8]) -> Self {
        Self::new(Outcome::Contents(contents.to_vec()))
    }

    pub(crate) fn failing(error: ToriiError) -> Self {
        Self::new(Outcome::Fail(error))
    }

    /// Read succeeds, close is rejected with `error`.
    pub(crate) fn failing_close(contents: &[u8], error: ToriiError) -> Self {
        Self::new(Outcome::FailClose(contents.to_vec(), error))
    }

    /// Read never completes.
    pub(crate) fn hanging() -> Self {
        Self::new(Outcome::Hang)
    }

    pub(crate) fn reads(&self) -> usize {
        self.reads
            .load(Ordering::SeqCst)
    }

    pub(crate) fn closes(&self) -> usize {
        self.closes
            .load(Ordering::SeqCst)
    }
}

impl FileHandle for StubFile {
    fn read_all(&self) -> CredentialFuture<'_, Vec<u8>> {
        Box::pin(async move {
            if self
                .closed
                .load(Ordering::SeqCst)
            {
                return Err(CredentialError::Closed.into());
            }

            self.reads
                .fetch_add(1, Ordering::SeqCst);
            match &self.outcome {
                Outcome::Contents(contents) | Outcome::FailClose(contents, _) => Ok(contents.clone()),
                Outcome::Fail(error) => Err(error.clone()),
                Outcome::Hang => pending().await,
            }
        })
    }

    fn close(&self) -> CredentialFuture<'_, ()> {
        Box::pin(async move {
            if self
                .closed
                .swap(true, Ordering::SeqCst)
            {
                return Err(CredentialError::Closed.into());
            }

            self.closes
                .fetch_add(1, Ordering::SeqCst);
            match &self.outcome {
                Outcome::FailClose(_, error) => Err(error.clone()),
                _ => Ok(()),
            }
        })
    }
}
