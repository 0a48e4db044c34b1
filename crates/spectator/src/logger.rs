// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Logger capability handed to the metrics client.
//!
//! Applications that already route their logs somewhere can pass their own
//! [`Logger`]. Everything else gets [`DefaultLogger`], which emits through
//! `tracing` under the `spectator` target so any installed subscriber picks
//! it up.

use std::fmt::Debug;
use std::sync::Arc;

/// Target used by [`DefaultLogger`] events.
pub const LOG_TARGET: &str = "spectator";

pub trait Logger: Debug + Send + Sync {
    fn debug(&self, msg: &str);
    fn info(&self, msg: &str);
    fn error(&self, msg: &str);
}

/// Logger backed by `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLogger;

impl DefaultLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for DefaultLogger {
    fn debug(&self, msg: &str) {
        tracing::debug!(target: LOG_TARGET, "{}", msg);
    }

    fn info(&self, msg: &str) {
        tracing::info!(target: LOG_TARGET, "{}", msg);
    }

    fn error(&self, msg: &str) {
        tracing::error!(target: LOG_TARGET, "{}", msg);
    }
}

/// Returns `logger`, or a [`DefaultLogger`] when none was supplied.
pub(crate) fn resolve_logger(logger: Option<Arc<dyn Logger>>) -> Arc<dyn Logger> {
    logger.unwrap_or_else(|| Arc::new(DefaultLogger::new()))
}
