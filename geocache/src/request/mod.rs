//! Request parameters and cache key derivation.
//!
//! A logical request is a method name plus a [`RequestParams`] bag. The bag
//! has three well-known fields that drive hierarchical matching (bounds, zoom
//! level, time) and any number of extra scalar parameters.
//!
//! # Key Format
//!
//! Keys are `"{method}:{json}"`, where `json` is an object holding every
//! present parameter with names in lexicographic order. Bounds are quantized
//! for the request's zoom level before serialization, so nearby viewports
//! collide on the same key:
//!
//! ```text
//! viewport_clusters:{"bounds":{"east":0.0,"north":52.0,"south":51.0,"west":-1.0},"zoom_level":8}
//! ```

mod descriptors;

pub use descriptors::{
    CacheRequest, PointsByDateRequest, PointsRequest, SummaryRequest, ViewportClustersRequest,
    ViewportPointsRequest, DEFAULT_POINT_LIMIT,
};

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::bounds::{quantize, ViewportBounds};

/// Parameter name under which bounds appear in a key.
pub const BOUNDS_PARAM: &str = "bounds";
/// Parameter name under which the zoom level appears in a key.
pub const ZOOM_LEVEL_PARAM: &str = "zoom_level";
/// Parameter name under which the time appears in a key.
pub const TIME_PARAM: &str = "time";

/// A scalar request parameter value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Int(i64::from(v))
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl From<&ParamValue> for Value {
    fn from(v: &ParamValue) -> Self {
        match v {
            ParamValue::Bool(b) => Value::from(*b),
            ParamValue::Int(i) => Value::from(*i),
            ParamValue::Float(f) => Value::from(*f),
            ParamValue::Text(s) => Value::from(s.as_str()),
        }
    }
}

/// Parameters of a logical request.
///
/// Built with the `with_*` methods:
///
/// ```
/// use geocache::bounds::ViewportBounds;
/// use geocache::request::RequestParams;
///
/// let bounds = ViewportBounds::new(52.0, 51.0, 0.0, -1.0).unwrap();
/// let params = RequestParams::new()
///     .with_bounds(bounds)
///     .with_zoom_level(8)
///     .with("limit", 1000u32);
///
/// assert_eq!(params.zoom_level(), Some(8));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParams {
    bounds: Option<ViewportBounds>,
    zoom_level: Option<u8>,
    time: Option<String>,
    extra: BTreeMap<String, ParamValue>,
}

impl RequestParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the viewport bounds.
    pub fn with_bounds(mut self, bounds: ViewportBounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Set the zoom level.
    pub fn with_zoom_level(mut self, zoom_level: u8) -> Self {
        self.zoom_level = Some(zoom_level);
        self
    }

    /// Set the time (date) the request is scoped to.
    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    /// Add an extra named parameter.
    ///
    /// Extra parameters named `bounds`, `zoom_level` or `time` are shadowed
    /// by the dedicated fields when present.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }

    pub fn bounds(&self) -> Option<&ViewportBounds> {
        self.bounds.as_ref()
    }

    pub fn zoom_level(&self) -> Option<u8> {
        self.zoom_level
    }

    pub fn time(&self) -> Option<&str> {
        self.time.as_deref()
    }

    /// Look up an extra parameter by name.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.extra.get(name)
    }

    /// Bounds and zoom level together, if both are present.
    pub fn viewport(&self) -> Option<(&ViewportBounds, u8)> {
        Some((self.bounds.as_ref()?, self.zoom_level?))
    }

    /// Derive the cache key for this request under `method`.
    pub fn cache_key(&self, method: &str) -> CacheKey {
        let mut fields: Map<String, Value> = self
            .extra
            .iter()
            .map(|(name, value)| (name.clone(), Value::from(value)))
            .collect();

        if let Some(bounds) = &self.bounds {
            let q = quantize(bounds, self.zoom_level);
            fields.insert(
                BOUNDS_PARAM.to_string(),
                json!({
                    "north": q.north(),
                    "south": q.south(),
                    "east": q.east(),
                    "west": q.west(),
                }),
            );
        }
        if let Some(zoom) = self.zoom_level {
            fields.insert(ZOOM_LEVEL_PARAM.to_string(), Value::from(zoom));
        }
        if let Some(time) = &self.time {
            fields.insert(TIME_PARAM.to_string(), Value::from(time.as_str()));
        }

        CacheKey(format!("{}:{}", method, Value::Object(fields)))
    }
}

/// Deterministic key identifying a logical request in a cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
