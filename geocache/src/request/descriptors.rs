//! Typed request descriptors.
//!
//! Each descriptor names one kind of geospatial query and knows how to turn
//! itself into a method name and [`RequestParams`]. Using descriptors instead
//! of hand-built parameter bags keeps key generation consistent across call
//! sites.

use serde::Deserialize;

use super::RequestParams;
use crate::bounds::ViewportBounds;

/// Default maximum number of points returned by point queries.
pub const DEFAULT_POINT_LIMIT: u32 = 1000;

fn default_limit() -> u32 {
    DEFAULT_POINT_LIMIT
}

/// A request that can be cached.
pub trait CacheRequest {
    /// Method name used as the key prefix and to scope hierarchical matches.
    const METHOD: &'static str;

    /// The parameters identifying this request.
    fn params(&self) -> RequestParams;
}

/// All points, capped at `limit`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PointsRequest {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl Default for PointsRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_POINT_LIMIT,
        }
    }
}

impl CacheRequest for PointsRequest {
    const METHOD: &'static str = "points";

    fn params(&self) -> RequestParams {
        RequestParams::new().with("limit", self.limit)
    }
}

/// Points inside a viewport.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewportPointsRequest {
    pub bounds: ViewportBounds,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub zoom_level: Option<u8>,
}

impl ViewportPointsRequest {
    pub fn new(bounds: ViewportBounds) -> Self {
        Self {
            bounds,
            limit: DEFAULT_POINT_LIMIT,
            time: None,
            zoom_level: None,
        }
    }
}

impl CacheRequest for ViewportPointsRequest {
    const METHOD: &'static str = "viewport_points";

    fn params(&self) -> RequestParams {
        let mut params = RequestParams::new()
            .with_bounds(self.bounds)
            .with("limit", self.limit);
        if let Some(zoom) = self.zoom_level {
            params = params.with_zoom_level(zoom);
        }
        if let Some(time) = &self.time {
            params = params.with_time(time.clone());
        }
        params
    }
}

/// Pre-aggregated clusters for a viewport at a zoom level.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ViewportClustersRequest {
    pub zoom_level: u8,
    pub bounds: ViewportBounds,
    #[serde(default)]
    pub time: Option<String>,
}

impl ViewportClustersRequest {
    pub fn new(zoom_level: u8, bounds: ViewportBounds) -> Self {
        Self {
            zoom_level,
            bounds,
            time: None,
        }
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }
}

impl CacheRequest for ViewportClustersRequest {
    const METHOD: &'static str = "viewport_clusters";

    fn params(&self) -> RequestParams {
        let params = RequestParams::new()
            .with_bounds(self.bounds)
            .with_zoom_level(self.zoom_level);
        match &self.time {
            Some(time) => params.with_time(time.clone()),
            None => params,
        }
    }
}

/// Dataset-wide summary. Carries no parameters.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SummaryRequest {}

impl CacheRequest for SummaryRequest {
    const METHOD: &'static str = "summary";

    fn params(&self) -> RequestParams {
        RequestParams::new()
    }
}

/// Points for a single date.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PointsByDateRequest {
    pub date: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

impl CacheRequest for PointsByDateRequest {
    const METHOD: &'static str = "points_by_date";

    fn params(&self) -> RequestParams {
        RequestParams::new()
            .with("date", self.date.as_str())
            .with("limit", self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::ParamValue;

    fn london() -> ViewportBounds {
        ViewportBounds::new(51.6, 51.4, -0.05, -0.25).unwrap()
    }

    #[test]
    fn test_points_request_default_limit() {
        let params = PointsRequest::default().params();
        assert_eq!(params.get("limit"), Some(&ParamValue::Int(1000)));
    }

    #[test]
    fn test_clusters_request_carries_viewport() {
        let request = ViewportClustersRequest::new(14, london()).with_time("2024-03-01");
        let params = request.params();

        assert_eq!(params.viewport(), Some((&london(), 14)));
        assert_eq!(params.time(), Some("2024-03-01"));
    }

    #[test]
    fn test_viewport_points_without_zoom_has_no_viewport() {
        let params = ViewportPointsRequest::new(london()).params();
        assert!(params.bounds().is_some());
        assert!(params.viewport().is_none());
    }

    #[test]
    fn test_methods_are_distinct() {
        let methods = [
            PointsRequest::METHOD,
            ViewportPointsRequest::METHOD,
            ViewportClustersRequest::METHOD,
            SummaryRequest::METHOD,
            PointsByDateRequest::METHOD,
        ];
        for (i, a) in methods.iter().enumerate() {
            for b in &methods[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_deserialize_clusters_request() {
        let request: ViewportClustersRequest = serde_json::from_str(
            r#"{"zoom_level":8,"bounds":{"north":52,"south":51,"east":0,"west":-1}}"#,
        )
        .unwrap();
        assert_eq!(request.zoom_level, 8);
        assert!(request.time.is_none());
    }

    #[test]
    fn test_deserialize_points_by_date_defaults_limit() {
        let request: PointsByDateRequest =
            serde_json::from_str(r#"{"date":"2024-03-01"}"#).unwrap();
        assert_eq!(request.limit, DEFAULT_POINT_LIMIT);
    }
}
