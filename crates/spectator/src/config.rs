// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Resolved configuration for the metrics registry.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::env::EnvSnapshot;
use crate::error::ConfigError;
use crate::location::{resolve_location, OutputLocation};
use crate::logger::{resolve_logger, Logger};
use crate::option::ConfigOption;
use crate::tags::merge_common_tags;
use crate::writer::Writer;

/// Configuration consumed by the registry.
///
/// Built once through [`Config::new`] (or [`ConfigBuilder`]) and read-only
/// afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) location: OutputLocation,
    pub(crate) common_tags: HashMap<String, String>,
    pub(crate) logger: Arc<dyn Logger>,
    pub(crate) writer: Option<Arc<dyn Writer>>,
}

impl Config {
    /// Creates a configuration from the caller's inputs and the current
    /// process environment.
    ///
    /// `location` may be empty to use the default (`udp`). The extra
    /// `common_tags` are added to every metric, on top of the common tags
    /// spectatord adds itself. `logger` defaults to
    /// [`DefaultLogger`](crate::logger::DefaultLogger). `options` are applied
    /// in order once the base configuration is assembled.
    ///
    /// `SPECTATOR_OUTPUT_LOCATION` overrides `location` when set.
    pub fn new<I>(
        location: &str,
        common_tags: &HashMap<String, String>,
        logger: Option<Arc<dyn Logger>>,
        options: I,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator,
        I::Item: ConfigOption,
    {
        Self::from_env(
            location,
            common_tags,
            logger,
            options,
            &EnvSnapshot::capture(),
        )
    }

    /// Same as [`Config::new`], reading the environment from `env` instead of
    /// the process.
    pub fn from_env<I>(
        location: &str,
        common_tags: &HashMap<String, String>,
        logger: Option<Arc<dyn Logger>>,
        options: I,
        env: &EnvSnapshot,
    ) -> Result<Self, ConfigError>
    where
        I: IntoIterator,
        I::Item: ConfigOption,
    {
        let location = resolve_location(location, env)?;
        let common_tags = merge_common_tags(common_tags, env);
        let logger = resolve_logger(logger);

        let mut config = Config {
            location,
            common_tags,
            logger,
            writer: None,
        };

        for option in options {
            option.apply(&mut config);
        }

        debug!(
            "Resolved spectator config: location={} common_tags={}",
            config.location,
            config.common_tags.len()
        );
        Ok(config)
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn location(&self) -> &OutputLocation {
        &self.location
    }

    pub fn common_tags(&self) -> &HashMap<String, String> {
        &self.common_tags
    }

    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    /// The custom writer, present only when
    /// [`with_writer`](crate::option::with_writer) was applied.
    pub fn writer(&self) -> Option<&Arc<dyn Writer>> {
        self.writer.as_ref()
    }
}

/// Fluent front end for [`Config::new`].
#[derive(Default)]
pub struct ConfigBuilder {
    location: String,
    common_tags: HashMap<String, String>,
    logger: Option<Arc<dyn Logger>>,
    options: Vec<Box<dyn ConfigOption>>,
    env: Option<EnvSnapshot>,
}

impl ConfigBuilder {
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn common_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.common_tags.insert(key.into(), value.into());
        self
    }

    pub fn common_tags(mut self, tags: HashMap<String, String>) -> Self {
        self.common_tags.extend(tags);
        self
    }

    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn option(mut self, option: impl ConfigOption + 'static) -> Self {
        self.options.push(Box::new(option));
        self
    }

    /// Reads the environment from `env` instead of capturing the process
    /// environment at build time.
    pub fn env(mut self, env: EnvSnapshot) -> Self {
        self.env = Some(env);
        self
    }

    pub fn build(self) -> Result<Config, ConfigError> {
        let env = self.env.unwrap_or_else(EnvSnapshot::capture);
        Config::from_env(
            &self.location,
            &self.common_tags,
            self.logger,
            self.options,
            &env,
        )
    }
}
