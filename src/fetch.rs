use std::{collections::HashMap, fmt, path::PathBuf};

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::FetchError;

// Some endpoints answer bare clients differently, so present as a browser
const DEFAULT_USER_AGENT: &str =
    "Opera/9.80 (X11; Linux i686; U; ru) Presto/2.8.131 Version/11.11";

/// Logical data source, used to pick a fixture in offline mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Api {
    /// IP geolocation (ip-api.com)
    IpApi,
    /// Sunrise and sunset times (api.sunrise-sunset.org)
    SunTimes,
}

impl Api {
    pub const ALL: [Api; 2] = [Api::IpApi, Api::SunTimes];

    pub fn name(self) -> &'static str {
        match self {
            Api::IpApi => "ipapi",
            Api::SunTimes => "suntimes",
        }
    }

    /// Environment variable holding the fixture path for this source.
    pub fn fixture_var(self) -> String {
        format!("_dummy_data_{}", self.name())
    }
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Retrieves the raw body for a named source.
///
/// Implementations make a single attempt and never retry.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, api: Api, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Fetches over HTTP with a plain GET request.
pub struct HttpFetcher {
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_USER_AGENT)
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, api: Api, url: &str) -> Result<Vec<u8>, FetchError> {
        info!("Fetching {} data: {}", api, url);

        // One client per request, nothing is reused between calls
        let client = reqwest::Client::new();
        let response = client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;

        if response.status().is_success() {
            let body = response.bytes().await?;
            debug!("Fetched {} bytes of {} data", body.len(), api);
            Ok(body.to_vec())
        } else {
            error!("Failed to fetch {} data: {}", api, response.status());
            Err(FetchError::Status {
                api,
                status: response.status(),
            })
        }
    }
}

/// Serves local files in place of network responses.
pub struct FixtureFetcher {
    fixtures: HashMap<Api, PathBuf>,
}

impl FixtureFetcher {
    pub fn new(fixtures: HashMap<Api, PathBuf>) -> Self {
        Self { fixtures }
    }
}

#[async_trait]
impl Fetch for FixtureFetcher {
    async fn fetch(&self, api: Api, url: &str) -> Result<Vec<u8>, FetchError> {
        let path = self
            .fixtures
            .get(&api)
            .ok_or_else(|| FetchError::FixtureNotConfigured(api.fixture_var()))?;

        if !path.is_file() {
            error!("Fixture for {} not found at {}", api, path.display());
            return Err(FetchError::FixtureMissing(path.clone()));
        }

        info!("Reading {} fixture {} instead of {}", api, path.display(), url);
        Ok(tokio::fs::read(path).await?)
    }
}

/// Builds the fetcher selected by the configuration.
pub fn fetcher(config: &Config) -> Box<dyn Fetch> {
    if config.offline {
        debug!("Offline mode, using fixtures: {:?}", config.fixtures);
        Box::new(FixtureFetcher::new(config.fixtures.clone()))
    } else {
        Box::new(HttpFetcher::default())
    }
}

/// In-memory fetcher for tests. Unknown sources fail like a refused connection.
#[cfg(test)]
pub(crate) mod stub {
    use std::{collections::HashMap, io, sync::Mutex};

    use async_trait::async_trait;

    use super::{Api, Fetch};
    use crate::error::FetchError;

    #[derive(Default)]
    pub struct StubFetcher {
        bodies: HashMap<Api, Vec<u8>>,
        requests: Mutex<Vec<(Api, String)>>,
    }

    impl StubFetcher {
        pub fn with(mut self, api: Api, body: impl Into<Vec<u8>>) -> Self {
            self.bodies.insert(api, body.into());
            self
        }

        pub fn requests(&self) -> Vec<(Api, String)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetch for StubFetcher {
        async fn fetch(&self, api: Api, url: &str) -> Result<Vec<u8>, FetchError> {
            self.requests.lock().unwrap().push((api, url.to_string()));
            self.bodies.get(&api).cloned().ok_or_else(|| {
                FetchError::Io(io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused"))
            })
        }
    }
}
