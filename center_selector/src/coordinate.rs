use std::fmt;
use std::str::FromStr;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::event::MalformedMapEvent;

/// Center of São Paulo, used when the host supplies neither a value nor an
/// initial coordinate.
pub const DEFAULT_CENTER: Coordinate = Coordinate {
    latitude: -23.5505199,
    longitude: -46.6333094,
};

/// A latitude/longitude pair in degrees. Values are passed through as given,
/// out of range values included.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new<T: Into<f64>>(latitude: T, longitude: T) -> Self {
        Self {
            latitude: latitude.into(),
            longitude: longitude.into(),
        }
    }

    /// Builds a coordinate from a `[longitude, latitude, ..]` position, the
    /// order map libraries use. Trailing elements (altitude) are ignored.
    pub fn from_lon_lat(position: &[f64]) -> Result<Self, MalformedMapEvent> {
        match position {
            [longitude, latitude, ..] => Ok(Self::new(*latitude, *longitude)),
            _ => Err(MalformedMapEvent::InvalidCenter {
                len: position.len(),
            }),
        }
    }

    pub fn to_lon_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

impl FromStr for Coordinate {
    type Err = anyhow::Error;

    /// Parses `"lat,lon"`, whitespace around either number is allowed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((lat, lon)) = s.split_once(',') else {
            anyhow::bail!("Expected `latitude,longitude`, got `{s}`");
        };

        let latitude = lat
            .trim()
            .parse::<f64>()
            .with_context(|| format!("Invalid latitude `{}`", lat.trim()))?;
        let longitude = lon
            .trim()
            .parse::<f64>()
            .with_context(|| format!("Invalid longitude `{}`", lon.trim()))?;

        Ok(Self::new(latitude, longitude))
    }
}

#[test]
fn test_from_lon_lat_order() {
    let c = Coordinate::from_lon_lat(&[-46.6, -23.5]).unwrap();
    assert_eq!(c, Coordinate::new(-23.5, -46.6));
    assert_eq!(c.to_lon_lat(), [-46.6, -23.5]);

    // Altitude is dropped
    let c = Coordinate::from_lon_lat(&[1.0, 2.0, 850.0]).unwrap();
    assert_eq!(c, Coordinate::new(2.0, 1.0));

    assert!(matches!(
        Coordinate::from_lon_lat(&[1.0]),
        Err(MalformedMapEvent::InvalidCenter { len: 1 })
    ));
}

#[test]
fn test_parse() {
    let c: Coordinate = " -23.55 , -46.63".parse().unwrap();
    assert_eq!(c, Coordinate::new(-23.55, -46.63));

    // No range check
    let c: Coordinate = "123,500".parse().unwrap();
    assert_eq!(c, Coordinate::new(123.0, 500.0));

    assert!("-23.55".parse::<Coordinate>().is_err());
    assert!("north,-46.63".parse::<Coordinate>().is_err());
}
