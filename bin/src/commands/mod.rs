//! CLI command implementations.

pub(crate) mod auth;
pub(crate) mod browse;
pub(crate) mod history;
pub(crate) mod reference;

use crate::ConnectionArgs;
use anyhow::{Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use moexiss_lib::prelude::*;
use std::time::Duration;

/// Spinner on stderr, hidden in quiet mode.
pub(crate) fn spinner(quiet: bool, message: impl Into<String>) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    let template = "{spinner:.green} [{elapsed_precise}] {pos} rows {msg}";
    if let Ok(style) = ProgressStyle::default_spinner().template(template) {
        pb.set_style(style);
    }
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Logs in and refuses to continue without a real-time passport.
pub(crate) async fn real_time_session(
    connection: &ConnectionArgs,
    config: &ClientConfig,
) -> Result<Session> {
    let credentials = connection.credentials()?;
    let auth = Authenticator::new(config)?;
    let mut session = auth.authenticate(credentials).await;

    if !auth.is_real_time(&mut session).await {
        bail!(
            "Cannot access real-time and historical data. Try to reauthenticate. ({})",
            session.auth_result()
        );
    }
    Ok(session)
}

/// Forwards rows to an inner sink while ticking a progress bar.
#[derive(Debug)]
pub(crate) struct ProgressSink<'a, S: ?Sized> {
    inner: &'a mut S,
    progress: &'a ProgressBar,
}

impl<'a, S: ResultSink + ?Sized> ProgressSink<'a, S> {
    pub(crate) const fn new(inner: &'a mut S, progress: &'a ProgressBar) -> Self {
        Self { inner, progress }
    }
}

impl<S: ResultSink + ?Sized> ResultSink for ProgressSink<'_, S> {
    fn reset_history(&mut self) {
        self.progress.set_position(0);
        self.inner.reset_history();
    }

    fn reset_engines(&mut self) {
        self.inner.reset_engines();
    }

    fn reset_markets(&mut self) {
        self.inner.reset_markets();
    }

    fn reset_boards(&mut self) {
        self.inner.reset_boards();
    }

    fn push_history(&mut self, row: HistoryRow) {
        self.progress.inc(1);
        self.inner.push_history(row);
    }

    fn push_engine(&mut self, code: String, title: String) {
        self.progress.inc(1);
        self.inner.push_engine(code, title);
    }

    fn push_market(&mut self, code: String, title: String) {
        self.progress.inc(1);
        self.inner.push_market(code, title);
    }

    fn push_board(&mut self, code: String, title: String) {
        self.progress.inc(1);
        self.inner.push_board(code, title);
    }
}
