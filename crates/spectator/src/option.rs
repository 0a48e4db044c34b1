// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Extra customization applied while a [`Config`] is being built.

use std::fmt;
use std::sync::Arc;

use crate::config::Config;
use crate::location::OutputLocation;
use crate::writer::Writer;

/// Mutation applied once, in order, by [`Config::new`].
pub trait ConfigOption {
    fn apply(&self, config: &mut Config);
}

impl<T: ConfigOption + ?Sized> ConfigOption for Box<T> {
    fn apply(&self, config: &mut Config) {
        (**self).apply(config);
    }
}

impl<T: ConfigOption + ?Sized> ConfigOption for Arc<T> {
    fn apply(&self, config: &mut Config) {
        (**self).apply(config);
    }
}

/// An absent option leaves the configuration untouched.
impl<T: ConfigOption> ConfigOption for Option<T> {
    fn apply(&self, config: &mut Config) {
        if let Some(option) = self {
            option.apply(config);
        }
    }
}

type ApplyFn = Box<dyn Fn(&mut Config) + Send + Sync>;

/// Option backed by a closure. Built without one, it does nothing.
#[derive(Default)]
pub struct ConfigOptionFn(Option<ApplyFn>);

impl ConfigOptionFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Config) + Send + Sync + 'static,
    {
        Self(Some(Box::new(f)))
    }

    pub fn noop() -> Self {
        Self(None)
    }
}

impl ConfigOption for ConfigOptionFn {
    fn apply(&self, config: &mut Config) {
        if let Some(f) = &self.0 {
            f(config);
        }
    }
}

impl fmt::Debug for ConfigOptionFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConfigOptionFn({})", if self.0.is_some() { "set" } else { "noop" })
    }
}

/// Replaces the transport with `writer`.
///
/// The location becomes `custom` no matter what was resolved before.
pub fn with_writer(writer: Arc<dyn Writer>) -> ConfigOptionFn {
    ConfigOptionFn::new(move |config| {
        config.location = OutputLocation::Custom;
        config.writer = Some(Arc::clone(&writer));
    })
}
