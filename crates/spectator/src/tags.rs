// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Common tags attached to every metric.

use std::collections::HashMap;

use tracing::debug;

use crate::env::EnvSnapshot;

/// Environment variables mapped to tag keys, checked in order.
const ENV_TAGS: [(&str, &str); 2] = [
    ("nf.container", "TITUS_CONTAINER_NAME"),
    ("nf.process", "NETFLIX_PROCESS_NAME"),
];

/// Derives common tags from the environment.
///
/// Each known variable contributes a tag when its trimmed value is non-empty,
/// so every returned key and value is non-empty.
pub fn tags_from_env_vars(env: &EnvSnapshot) -> HashMap<String, String> {
    ENV_TAGS
        .iter()
        .filter_map(|(tag, var)| {
            let value = env.get(var)?.trim();
            (!value.is_empty()).then(|| (tag.to_string(), value.to_string()))
        })
        .collect()
}

/// Merges caller supplied tags with tags derived from the environment.
///
/// Caller entries with an empty key or value are dropped. Environment tags are
/// written last and win on key collisions.
pub fn merge_common_tags(
    common_tags: &HashMap<String, String>,
    env: &EnvSnapshot,
) -> HashMap<String, String> {
    let mut merged: HashMap<String, String> = common_tags
        .iter()
        .filter(|(k, v)| {
            let keep = !k.is_empty() && !v.is_empty();
            if !keep {
                debug!("Dropping common tag with empty key or value: '{}'='{}'", k, v);
            }
            keep
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    for (k, v) in tags_from_env_vars(env) {
        if let Some(previous) = merged.insert(k.clone(), v) {
            debug!("Environment tag '{}' replaces common tag value '{}'", k, previous);
        }
    }

    merged
}
