mod codec;
mod config;
mod error;
mod fetch;
mod geo_location;
mod report;
mod times;

use std::io::Write;

use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::AppError;
use crate::fetch::Fetch;
use crate::geo_location::LocationSource;

/// Sunrise, sunset and twilight times for a place and date
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// City name to be used
    #[arg(long, default_value = "Unknown")]
    city: String,

    /// Timezone to be used, by default the $TZ environment variable
    #[arg(long, env = "TZ", default_value = "UTC")]
    timezone: String,

    /// Coordinates in lat,lon format
    #[arg(long, default_value = "24.85468,67.02071", allow_hyphen_values = true)]
    coordinates: String,

    /// Date to get times for in YYYY-MM-DD format, today if omitted
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// Detect location by using the IP address
    #[arg(long)]
    detect_location: bool,
}

impl Cli {
    fn location_source(&self) -> LocationSource {
        if self.detect_location {
            LocationSource::Detect
        } else {
            LocationSource::Explicit {
                city: self.city.clone(),
                timezone: self.timezone.clone(),
                coordinates: self.coordinates.clone(),
            }
        }
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
}

/// Resolves the location, fetches the times and writes the report.
///
/// Nothing is written unless every step succeeds.
async fn run(cli: &Cli, fetcher: &dyn Fetch, out: &mut impl Write) -> Result<(), AppError> {
    let date = cli.date.unwrap_or_else(|| Local::now().date_naive());
    let location = geo_location::resolve(cli.location_source(), fetcher).await?;
    let response = times::get_times(fetcher, &location, date).await?;

    report::render(out, &location, date, &response.report)?;
    Ok(())
}

/// Parses the command line, then runs one query. Requests are made one after
/// another, so a single-threaded runtime is enough.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they never mix with the report
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    debug!("Running with {:?} and {:?}", cli, config);

    let fetcher = fetch::fetcher(&config);
    let mut stdout = std::io::stdout().lock();

    if let Err(e) = run(&cli, fetcher.as_ref(), &mut stdout).await {
        error!("Failed to report sun times: {}", e);
        return Err(e.into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::fetch::Api;
    use crate::fetch::stub::StubFetcher;
    use std::collections::HashMap;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("suntimes").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_to_explicit_coordinates() {
        let cli = parse(&[]);

        assert_eq!(cli.city, "Unknown");
        assert_eq!(cli.coordinates, "24.85468,67.02071");
        assert_eq!(cli.date, None);
        assert!(matches!(cli.location_source(), LocationSource::Explicit { .. }));
    }

    #[test]
    fn accepts_negative_coordinates_and_date() {
        let cli = parse(&["--coordinates", "-33.92,18.42", "--date", "2025-12-21"]);

        assert_eq!(cli.coordinates, "-33.92,18.42");
        assert_eq!(cli.date, NaiveDate::from_ymd_opt(2025, 12, 21));
    }

    #[test]
    fn rejects_malformed_date() {
        for date in ["21/06/2025", "2025-13-01", "2025-02-30", "today"] {
            let result = Cli::try_parse_from(["suntimes", "--date", date]);
            assert!(result.is_err(), "{date}");
        }
    }

    #[test]
    fn detect_flag_selects_ip_lookup() {
        let cli = parse(&["--detect-location", "--city", "ignored"]);

        assert!(matches!(cli.location_source(), LocationSource::Detect));
    }

    #[tokio::test]
    async fn reports_times_for_explicit_location() {
        let cli = parse(&[
            "--city",
            "Karachi",
            "--timezone",
            "Asia/Karachi",
            "--coordinates",
            "24.8546,67.0207",
            "--date",
            "2025-06-21",
        ]);
        let fetcher = StubFetcher::default()
            .with(Api::SunTimes, include_str!("../fixtures/suntimes.json"));
        let mut out = Vec::new();

        run(&cli, &fetcher, &mut out).await.unwrap();
        let output = String::from_utf8(out).unwrap();

        assert!(output.starts_with("Karachi 24.855,67.021 (Asia/Karachi)\nSaturday, Jun 21, 2025\n"));
        assert!(output.contains("Sunrise                       05:12:03\n"));
        assert!(output.contains("Day length                    12h 30m 0s\n"));
        assert_eq!(fetcher.requests().len(), 1);
    }

    #[tokio::test]
    async fn reports_times_for_detected_location() {
        let cli = parse(&["--detect-location", "--date", "2025-06-21"]);
        let fetcher = StubFetcher::default()
            .with(Api::IpApi, include_str!("../fixtures/ipapi.json"))
            .with(Api::SunTimes, include_str!("../fixtures/suntimes.json"));
        let mut out = Vec::new();

        run(&cli, &fetcher, &mut out).await.unwrap();
        let output = String::from_utf8(out).unwrap();

        assert!(output.starts_with("Karachi 24.855,67.021 (Asia/Karachi)\n"));
        let apis: Vec<Api> = fetcher.requests().into_iter().map(|(api, _)| api).collect();
        assert_eq!(apis, vec![Api::IpApi, Api::SunTimes]);
    }

    #[tokio::test]
    async fn offline_mode_reads_fixture_files() {
        let fixtures = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");
        let config = Config::from_lookup(|key| match key {
            "_suntimes_offline" => Some("1".to_string()),
            "_dummy_data_ipapi" => Some(format!("{fixtures}/ipapi.json")),
            "_dummy_data_suntimes" => Some(format!("{fixtures}/suntimes.json")),
            _ => None,
        });
        let cli = parse(&["--detect-location", "--date", "2025-06-21"]);
        let mut out = Vec::new();

        run(&cli, fetch::fetcher(&config).as_ref(), &mut out).await.unwrap();

        assert!(String::from_utf8(out).unwrap().contains("Sunset                        17:42:03\n"));
    }

    #[tokio::test]
    async fn failed_decode_writes_nothing() {
        let cli = parse(&["--date", "2025-06-21"]);
        let fetcher = StubFetcher::default().with(Api::SunTimes, "{\"results\": ");
        let mut out = Vec::new();

        let err = run(&cli, &fetcher, &mut out).await.unwrap_err();

        assert!(matches!(err, AppError::DecodeFailed(DecodeError::Json(_))));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn invalid_coordinates_stop_before_any_request() {
        let cli = parse(&["--coordinates", "24.85"]);
        let fetcher = StubFetcher::default();
        let mut out = Vec::new();

        let err = run(&cli, &fetcher, &mut out).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidCoordinateFormat(_)));
        assert!(fetcher.requests().is_empty());
    }

    #[tokio::test]
    async fn offline_mode_without_fixture_is_fetch_failed() {
        let config = Config {
            offline: true,
            fixtures: HashMap::new(),
        };
        let cli = parse(&["--date", "2025-06-21"]);
        let mut out = Vec::new();

        let err = run(&cli, fetch::fetcher(&config).as_ref(), &mut out)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::FetchFailed(_)));
    }
}
