use std::env;
use std::str::FromStr;

use crate::{Coordinate, DEFAULT_CENTER};

pub const DEFAULT_ZOOM_LEVEL: f64 = 10.0;
pub const DEFAULT_MAP_STYLE: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

/// How an idle report is compared with the current center.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDetection {
    /// Accept a report only when latitude and longitude both differ. A move
    /// along a single axis is ignored.
    #[default]
    BothAxes,
    /// Accept a report when either axis differs.
    EitherAxis,
}

impl ChangeDetection {
    pub fn is_change(&self, current: &Coordinate, reported: &Coordinate) -> bool {
        let lat_differs = reported.latitude != current.latitude;
        let lon_differs = reported.longitude != current.longitude;
        match self {
            ChangeDetection::BothAxes => lat_differs && lon_differs,
            ChangeDetection::EitherAxis => lat_differs || lon_differs,
        }
    }
}

impl FromStr for ChangeDetection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "both" | "both-axes" => Ok(ChangeDetection::BothAxes),
            "either" | "either-axis" => Ok(ChangeDetection::EitherAxis),
            other => anyhow::bail!("Unknown change detection `{other}`, expected `both` or `either`"),
        }
    }
}

/// Settings shared by every selector instance. Values can be overridden
/// through environment variables, see [`SelectorConfig::from_env`].
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorConfig {
    /// Center used when the host supplies neither a value nor initial coordinates
    pub default_center: Coordinate,
    pub initial_zoom_level: f64,
    /// Tile URL template handed to the map
    pub map_style: String,
    pub interactive: bool,
    pub user_location: bool,
    pub change_detection: ChangeDetection,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            default_center: DEFAULT_CENTER,
            initial_zoom_level: DEFAULT_ZOOM_LEVEL,
            map_style: DEFAULT_MAP_STYLE.to_string(),
            interactive: true,
            user_location: false,
            change_detection: ChangeDetection::default(),
        }
    }
}

impl SelectorConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`SelectorConfig::from_env`] with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let latitude = read_var(
            &lookup,
            "CENTER_SELECTOR_DEFAULT_LAT",
            defaults.default_center.latitude,
        );
        let longitude = read_var(
            &lookup,
            "CENTER_SELECTOR_DEFAULT_LON",
            defaults.default_center.longitude,
        );
        let initial_zoom_level =
            read_var(&lookup, "CENTER_SELECTOR_ZOOM", defaults.initial_zoom_level);
        let change_detection = read_var(
            &lookup,
            "CENTER_SELECTOR_CHANGE_DETECTION",
            defaults.change_detection,
        );
        let interactive = read_var(&lookup, "CENTER_SELECTOR_INTERACTIVE", defaults.interactive);
        let user_location = read_var(
            &lookup,
            "CENTER_SELECTOR_USER_LOCATION",
            defaults.user_location,
        );
        let map_style = lookup("CENTER_SELECTOR_MAP_STYLE").unwrap_or(defaults.map_style);

        Self {
            default_center: Coordinate::new(latitude, longitude),
            initial_zoom_level,
            map_style,
            interactive,
            user_location,
            change_detection,
        }
    }
}

fn read_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(value) => match value.parse() {
            Ok(v) => v,
            Err(e) => {
                log::error!("Invalid {key} `{value}`: {e}");
                log::info!("Using default {key} {default:?}");
                default
            }
        },
        None => {
            log::debug!("{key} not set, using default {default:?}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = SelectorConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, SelectorConfig::default());
        assert_eq!(config.default_center, Coordinate::new(-23.5505199, -46.6333094));
    }

    #[test]
    fn env_overrides() {
        let config = SelectorConfig::from_lookup(lookup_from(&[
            ("CENTER_SELECTOR_DEFAULT_LAT", "48.8566"),
            ("CENTER_SELECTOR_DEFAULT_LON", "2.3522"),
            ("CENTER_SELECTOR_ZOOM", "14"),
            ("CENTER_SELECTOR_CHANGE_DETECTION", "either"),
            ("CENTER_SELECTOR_MAP_STYLE", "https://tiles.example/{z}/{x}/{y}.png"),
            ("CENTER_SELECTOR_INTERACTIVE", "false"),
            ("CENTER_SELECTOR_USER_LOCATION", "true"),
        ]));

        assert_eq!(config.default_center, Coordinate::new(48.8566, 2.3522));
        assert_eq!(config.initial_zoom_level, 14.0);
        assert_eq!(config.change_detection, ChangeDetection::EitherAxis);
        assert_eq!(config.map_style, "https://tiles.example/{z}/{x}/{y}.png");
        assert!(!config.interactive);
        assert!(config.user_location);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = SelectorConfig::from_lookup(lookup_from(&[
            ("CENTER_SELECTOR_DEFAULT_LAT", "south"),
            ("CENTER_SELECTOR_CHANGE_DETECTION", "sometimes"),
            ("CENTER_SELECTOR_INTERACTIVE", "maybe"),
        ]));

        assert_eq!(config.default_center, DEFAULT_CENTER);
        assert_eq!(config.change_detection, ChangeDetection::BothAxes);
        assert!(config.interactive);
    }

    #[test]
    fn change_detection_axes() {
        let current = Coordinate::new(10.0, 20.0);

        let both = ChangeDetection::BothAxes;
        assert!(!both.is_change(&current, &Coordinate::new(10.0, 30.0)));
        assert!(!both.is_change(&current, &Coordinate::new(11.0, 20.0)));
        assert!(both.is_change(&current, &Coordinate::new(11.0, 30.0)));

        let either = ChangeDetection::EitherAxis;
        assert!(either.is_change(&current, &Coordinate::new(10.0, 30.0)));
        assert!(either.is_change(&current, &Coordinate::new(11.0, 20.0)));
        assert!(!either.is_change(&current, &current));
    }
}
