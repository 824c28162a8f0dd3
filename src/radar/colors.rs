//! Metric layers and gradient color mapping for the radar grid.
//!
//! Every metric has a four-stop gradient (min, mid1, mid2, max) spread over a
//! declared value range. A value is first turned into a percentage of that
//! range, then interpolated inside one of three segments split at 0.33 and
//! 0.66.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb`
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// The four color stops of a layer gradient
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientStops {
    pub min: Rgb,
    pub mid1: Rgb,
    pub mid2: Rgb,
    pub max: Rgb,
}

/// Declared value range of a layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

/// Display configuration for one radar metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricLayer {
    pub name: &'static str,
    pub unit: &'static str,
    pub colors: GradientStops,
    pub range: ValueRange,
}

/// The metrics a radar grid can be colored by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    #[serde(rename = "temp")]
    Temperature,
    Wind,
    Pressure,
    Humidity,
    Clouds,
}

pub const TEMPERATURE_LAYER: MetricLayer = MetricLayer {
    name: "Temperature",
    unit: "°F",
    colors: GradientStops {
        min: Rgb::new(0x00, 0x00, 0xff),
        mid1: Rgb::new(0x00, 0xff, 0xff),
        mid2: Rgb::new(0xff, 0xff, 0x00),
        max: Rgb::new(0xff, 0x00, 0x00),
    },
    range: ValueRange {
        min: -10.0,
        max: 100.0,
    },
};

pub const WIND_LAYER: MetricLayer = MetricLayer {
    name: "Wind Speed",
    unit: "mph",
    colors: GradientStops {
        min: Rgb::new(0x00, 0xff, 0x00),
        mid1: Rgb::new(0xff, 0xff, 0x00),
        mid2: Rgb::new(0xff, 0x99, 0x00),
        max: Rgb::new(0xff, 0x00, 0x00),
    },
    range: ValueRange { min: 0.0, max: 50.0 },
};

pub const PRESSURE_LAYER: MetricLayer = MetricLayer {
    name: "Pressure",
    unit: "hPa",
    colors: GradientStops {
        min: Rgb::new(0xff, 0x99, 0x00),
        mid1: Rgb::new(0xff, 0x00, 0x00),
        mid2: Rgb::new(0xcc, 0x00, 0xcc),
        max: Rgb::new(0x99, 0x00, 0x99),
    },
    range: ValueRange {
        min: 970.0,
        max: 1030.0,
    },
};

pub const HUMIDITY_LAYER: MetricLayer = MetricLayer {
    name: "Humidity",
    unit: "%",
    colors: GradientStops {
        min: Rgb::new(0xff, 0xcc, 0x00),
        mid1: Rgb::new(0x66, 0xcc, 0x00),
        mid2: Rgb::new(0x00, 0x99, 0xff),
        max: Rgb::new(0x00, 0x00, 0xff),
    },
    range: ValueRange {
        min: 0.0,
        max: 100.0,
    },
};

pub const CLOUDS_LAYER: MetricLayer = MetricLayer {
    name: "Cloud Cover",
    unit: "%",
    colors: GradientStops {
        min: Rgb::new(0xff, 0xff, 0xff),
        mid1: Rgb::new(0xcc, 0xcc, 0xcc),
        mid2: Rgb::new(0x66, 0x66, 0x66),
        max: Rgb::new(0x33, 0x33, 0x33),
    },
    range: ValueRange {
        min: 0.0,
        max: 100.0,
    },
};

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Temperature,
        Metric::Wind,
        Metric::Pressure,
        Metric::Humidity,
        Metric::Clouds,
    ];

    #[must_use]
    pub fn layer(self) -> &'static MetricLayer {
        match self {
            Self::Temperature => &TEMPERATURE_LAYER,
            Self::Wind => &WIND_LAYER,
            Self::Pressure => &PRESSURE_LAYER,
            Self::Humidity => &HUMIDITY_LAYER,
            Self::Clouds => &CLOUDS_LAYER,
        }
    }
}

/// How the segment factor is treated outside `[0, 1]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extrapolation {
    /// Clamp the factor, so out-of-range values saturate at the end colors
    #[default]
    Clamp,
    /// Leave the factor unclamped and extrapolate linearly past the stops;
    /// only the resulting channel bytes are clamped
    Linear,
}

/// Share of the layer range covered by `value`; not clamped
#[must_use]
pub fn percentage(value: f64, layer: &MetricLayer) -> f64 {
    (value - layer.range.min) / (layer.range.max - layer.range.min)
}

/// Per-channel linear blend of two colors
#[must_use]
pub fn interpolate(from: Rgb, to: Rgb, factor: f64) -> Rgb {
    let channel = |c1: u8, c2: u8| -> u8 {
        let c1 = f64::from(c1);
        let c2 = f64::from(c2);
        (c1 + (c2 - c1) * factor).round().clamp(0.0, 255.0) as u8
    };

    Rgb::new(
        channel(from.r, to.r),
        channel(from.g, to.g),
        channel(from.b, to.b),
    )
}

/// Gradient color of `value` within `layer`
#[must_use]
pub fn rgb_for(value: f64, layer: &MetricLayer, extrapolation: Extrapolation) -> Rgb {
    let stops = &layer.colors;
    let p = percentage(value, layer);

    let (from, to, factor) = if p <= 0.33 {
        (stops.min, stops.mid1, p * 3.0)
    } else if p <= 0.66 {
        (stops.mid1, stops.mid2, (p - 0.33) * 3.0)
    } else {
        (stops.mid2, stops.max, (p - 0.66) * 3.0)
    };

    let factor = match extrapolation {
        Extrapolation::Clamp => factor.clamp(0.0, 1.0),
        Extrapolation::Linear => factor,
    };

    interpolate(from, to, factor)
}

/// `#rrggbb` color of `value` within `layer`.
///
/// The segment factor is clamped, so `range.min` and `range.max` give exactly
/// the end stops and values outside the range saturate at them. Use
/// [`color_for_with`] with [`Extrapolation::Linear`] to keep the unclamped
/// segment arithmetic, where values near or past the ends overshoot the stops.
#[must_use]
pub fn color_for(value: f64, layer: &MetricLayer) -> String {
    rgb_for(value, layer, Extrapolation::Clamp).to_hex()
}

/// `#rrggbb` color of `value` with an explicit extrapolation mode
#[must_use]
pub fn color_for_with(value: f64, layer: &MetricLayer, extrapolation: Extrapolation) -> String {
    rgb_for(value, layer, extrapolation).to_hex()
}
