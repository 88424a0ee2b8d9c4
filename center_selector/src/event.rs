//! Payloads delivered by the map library.
//!
//! The idle payload follows the GeoJSON feature the map emits once a camera
//! movement settles, with the viewport center stored as `[lon, lat]` under
//! `properties.center`. Every field is optional on the wire. A payload that
//! lacks what the reconciler needs is reported as a [`MalformedMapEvent`].

use macros::Payload;
use serde::{Deserialize, Serialize};

use crate::Coordinate;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MalformedMapEvent {
    #[error("Map event has no center")]
    MissingCenter,
    #[error("Map center must be a [longitude, latitude] pair, got {len} value(s)")]
    InvalidCenter { len: usize },
    #[error("Location update has no coordinates")]
    MissingCoords,
    #[error("Cannot decode map event: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for MalformedMapEvent {
    fn from(e: serde_json::Error) -> MalformedMapEvent {
        MalformedMapEvent::Decode(e.to_string())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdleProperties {
    pub center: Option<Vec<f64>>,
    pub zoom: Option<f64>,
    pub heading: Option<f64>,
    pub pitch: Option<f64>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Payload)]
pub struct IdleEvent {
    pub properties: Option<IdleProperties>,
}

impl IdleEvent {
    /// Idle event for a map handle that exposes its center directly instead
    /// of emitting a feature.
    pub fn from_viewport(center: Coordinate, zoom: Option<f64>) -> Self {
        Self {
            properties: Some(IdleProperties {
                center: Some(center.to_lon_lat().to_vec()),
                zoom,
                ..Default::default()
            }),
        }
    }

    pub fn center(&self) -> Result<Coordinate, MalformedMapEvent> {
        let center = self
            .properties
            .as_ref()
            .and_then(|p| p.center.as_deref())
            .ok_or(MalformedMapEvent::MissingCenter)?;

        Coordinate::from_lon_lat(center)
    }

    pub fn zoom(&self) -> Option<f64> {
        self.properties.as_ref().and_then(|p| p.zoom)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCoords {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    pub heading: Option<f64>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Payload)]
pub struct UserLocationEvent {
    pub coords: Option<LocationCoords>,
    /// Milliseconds since the epoch, as reported by the device
    pub timestamp: Option<f64>,
}

impl UserLocationEvent {
    pub fn coordinate(&self) -> Result<Coordinate, MalformedMapEvent> {
        self.coords
            .as_ref()
            .map(|c| Coordinate::new(c.latitude, c.longitude))
            .ok_or(MalformedMapEvent::MissingCoords)
    }
}
