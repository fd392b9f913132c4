use std::{collections::HashMap, env, path::PathBuf};

use crate::fetch::Api;

// Set to "1" to read fixtures instead of calling the APIs
const OFFLINE_VAR: &str = "_suntimes_offline";

/// Runtime settings taken from the environment
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Serve fixture files instead of making network calls
    pub offline: bool,
    /// Fixture file for each api, when one is configured
    pub fixtures: HashMap<Api, PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let offline = lookup(OFFLINE_VAR).is_some_and(|value| value == "1");
        let fixtures = Api::ALL
            .into_iter()
            .filter_map(|api| lookup(&api.fixture_var()).map(|path| (api, PathBuf::from(path))))
            .collect();

        Self { offline, fixtures }
    }
}
