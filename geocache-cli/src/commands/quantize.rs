//! Show how a viewport is quantized into a cache key.

use geocache::bounds::{precision_for_zoom, quantize, ViewportBounds};

use crate::error::CliError;

/// Quantize the given bounds and print the result.
pub fn run(
    north: f64,
    south: f64,
    east: f64,
    west: f64,
    zoom: Option<u8>,
) -> Result<(), CliError> {
    let bounds = ViewportBounds::new(north, south, east, west)?;
    print!("{}", describe(&bounds, zoom));
    Ok(())
}

fn describe(bounds: &ViewportBounds, zoom: Option<u8>) -> String {
    let precision = precision_for_zoom(zoom);
    let quantized = quantize(bounds, zoom);
    let zoom = zoom.map_or_else(|| "none".to_string(), |z| z.to_string());

    format!(
        "Zoom:      {}\nPrecision: {} decimal places\nInput:     {}\nQuantized: {}\n",
        zoom, precision, bounds, quantized
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_reports_precision() {
        let bounds = ViewportBounds::new(51.6, 51.4, -0.05, -0.25).unwrap();
        let text = describe(&bounds, Some(12));
        assert!(text.contains("Zoom:      12"));
        assert!(text.contains("Precision: 4 decimal places"));
    }

    #[test]
    fn test_describe_without_zoom() {
        let bounds = ViewportBounds::new(10.0, 0.0, 10.0, 0.0).unwrap();
        let text = describe(&bounds, None);
        assert!(text.contains("Zoom:      none"));
        assert!(text.contains("Precision: 3 decimal places"));
    }

    #[test]
    fn test_run_rejects_inverted_bounds() {
        let result = run(10.0, 20.0, 5.0, 0.0, Some(4));
        assert!(matches!(result, Err(CliError::Bounds(_))));
    }
}
