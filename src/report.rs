//! Side channel for recoverable persistence failures

use crate::error::PersistError;

/// Receives failures a [`PersistentValue`](crate::PersistentValue) recovered from
pub trait Reporter {
    fn report(&self, error: &PersistError);
}

/// Default reporter: `log::warn!`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&self, error: &PersistError) {
        log::warn!("{}", error);
    }
}

impl<F: Fn(&PersistError)> Reporter for F {
    fn report(&self, error: &PersistError) {
        self(error)
    }
}
