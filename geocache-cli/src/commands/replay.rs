//! Replay a recorded request trace against the standard caches.
//!
//! A trace is a file of JSON lines, one request per line, tagged by kind:
//!
//! ```text
//! {"request":"viewport_clusters","zoom_level":14,"bounds":{"north":51.6,"south":51.4,"east":-0.05,"west":-0.25}}
//! {"request":"viewport_clusters","zoom_level":8,"bounds":{"north":52.0,"south":51.0,"east":0.0,"west":-1.0}}
//! {"request":"summary"}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Each request goes
//! through the cached-fetch path with a simulated backend, so the output
//! shows which requests would have reached the real one.

use std::convert::Infallible;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use geocache::app::CacheApp;
use geocache::cache::{fetch_request, SharedCache};
use geocache::config::{default_config_path, CacheConfig};
use geocache::request::{
    CacheRequest, PointsByDateRequest, PointsRequest, SummaryRequest, ViewportClustersRequest,
    ViewportPointsRequest,
};
use serde::Deserialize;
use tracing::info;

use crate::error::CliError;

/// One request in a trace.
#[derive(Debug, Deserialize)]
#[serde(tag = "request", rename_all = "snake_case")]
pub enum TraceRequest {
    Points(PointsRequest),
    ViewportPoints(ViewportPointsRequest),
    ViewportClusters(ViewportClustersRequest),
    Summary(SummaryRequest),
    PointsByDate(PointsByDateRequest),
}

/// Result of replaying one trace line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub line: usize,
    pub method: &'static str,
    pub hit: bool,
}

type Caches = CacheApp<String, String>;

/// Replay the trace at `path` and print per-request outcomes and final stats.
pub async fn run(path: &Path, capacity: Option<usize>) -> Result<(), CliError> {
    let mut config = CacheConfig::load_or_default(&default_config_path())?;
    if let Some(capacity) = capacity {
        config = config.with_data_capacity(capacity);
    }

    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let app: Caches = CacheApp::start(config)?;
    let outcomes = replay(BufReader::new(file), &app, path).await;

    if let Ok(outcomes) = &outcomes {
        for outcome in outcomes {
            let status = if outcome.hit { "HIT " } else { "MISS" };
            println!("{:>5}  {}  {}", outcome.line, status, outcome.method);
        }

        let fetched = outcomes.iter().filter(|o| !o.hit).count();
        println!();
        println!(
            "{} requests, {} fetched from backend",
            outcomes.len(),
            fetched
        );
        println!("Data cache:    {}", app.data_cache().lock().stats());
        println!("Summary cache: {}", app.summary_cache().lock().stats());
    }

    app.shutdown().await;
    outcomes.map(|_| ())
}

/// Run every request in `reader` through the app's caches.
///
/// Summary requests use the summary cache, all others the data cache.
pub async fn replay<R: BufRead>(
    reader: R,
    app: &Caches,
    path: &Path,
) -> Result<Vec<Outcome>, CliError> {
    let data = app.data_cache();
    let summary = app.summary_cache();
    let mut outcomes = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let number = index + 1;
        let line = line.map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let request: TraceRequest = serde_json::from_str(line).map_err(|source| {
            CliError::Trace {
                line: number,
                source,
            }
        })?;

        let outcome = match &request {
            TraceRequest::Points(r) => simulate(&data, r, number).await,
            TraceRequest::ViewportPoints(r) => simulate(&data, r, number).await,
            TraceRequest::ViewportClusters(r) => simulate(&data, r, number).await,
            TraceRequest::Summary(r) => simulate(&summary, r, number).await,
            TraceRequest::PointsByDate(r) => simulate(&data, r, number).await,
        };
        outcomes.push(outcome);
    }

    info!(requests = outcomes.len(), "Trace replay complete");
    Ok(outcomes)
}

/// Serve one request, recording whether the backend would have been called.
async fn simulate<R: CacheRequest>(
    cache: &SharedCache<String>,
    request: &R,
    line: usize,
) -> Outcome {
    let mut fetched = false;
    let fetch = || {
        fetched = true;
        async move { Ok::<_, Infallible>(format!("{} from line {}", R::METHOD, line)) }
    };

    match fetch_request(cache, request, fetch).await {
        Ok(_) => {}
        Err(never) => match never {},
    }

    Outcome {
        line,
        method: R::METHOD,
        hit: !fetched,
    }
}
