//! Keeps track of where the center pin points.
//!
//! Three sources move the center: the host's controlled value, the map
//! settling after a user gesture, and a one-time device location fix. Only a
//! map movement is reported back to the host through the change handler. The
//! other two sources are either already known to the host or a silent
//! default.
//!
//! Every handler runs to completion and returns an [`Update`] so the caller
//! can refresh its view only when the center actually moved.

use crate::event::{IdleEvent, MalformedMapEvent, UserLocationEvent};
use crate::{ChangeDetection, Coordinate, SelectorConfig};

pub type ChangeHandler = Box<dyn FnMut(Coordinate)>;

/// Picks the starting center: the controlled value, then the initial
/// coordinates, then `default`.
pub fn initialize(
    controlled: Option<Coordinate>,
    initial: Option<Coordinate>,
    default: Coordinate,
) -> Coordinate {
    controlled.or(initial).unwrap_or(default)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    /// The selector owns its center until the host supplies a value
    #[default]
    SelfManaged,
    /// The host supplied a value at least once. There is no way back.
    HostControlled,
}

/// Outcome of a single event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Update {
    Unchanged,
    /// Center replaced by the host's controlled value
    Synced(Coordinate),
    /// Center replaced by the map and reported to the host
    Moved(Coordinate),
    /// Center seeded from the device location
    Seeded(Coordinate),
}

impl Update {
    pub fn center(&self) -> Option<Coordinate> {
        match self {
            Update::Unchanged => None,
            Update::Synced(c) | Update::Moved(c) | Update::Seeded(c) => Some(*c),
        }
    }

    pub fn is_changed(&self) -> bool {
        !matches!(self, Update::Unchanged)
    }
}

pub struct Reconciler {
    current: Coordinate,
    mode: ControlMode,
    has_initial_coords: bool,
    location_seeded: bool,
    change_detection: ChangeDetection,
    on_change: ChangeHandler,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("current", &self.current)
            .field("mode", &self.mode)
            .field("has_initial_coords", &self.has_initial_coords)
            .field("location_seeded", &self.location_seeded)
            .field("change_detection", &self.change_detection)
            .finish_non_exhaustive()
    }
}

impl Reconciler {
    pub fn new(
        controlled: Option<Coordinate>,
        initial: Option<Coordinate>,
        on_change: impl FnMut(Coordinate) + 'static,
        config: &SelectorConfig,
    ) -> Self {
        let current = initialize(controlled, initial, config.default_center);
        let mode = match controlled {
            Some(_) => ControlMode::HostControlled,
            None => ControlMode::SelfManaged,
        };
        log::debug!("Center selector starting at {current} ({mode:?})");

        Self {
            current,
            mode,
            has_initial_coords: initial.is_some(),
            location_seeded: false,
            change_detection: config.change_detection,
            on_change: Box::new(on_change),
        }
    }

    pub fn center(&self) -> Coordinate {
        self.current
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    /// Mirrors a new value from the host. The host set it, so it is not
    /// reported back.
    pub fn on_controlled_value_changed(&mut self, value: Coordinate) -> Update {
        if self.mode == ControlMode::SelfManaged {
            log::debug!("Host took control of the center");
        }
        self.mode = ControlMode::HostControlled;
        self.current = value;
        Update::Synced(value)
    }

    /// Handles the map settling after a movement. A payload without a
    /// usable center is logged and ignored.
    pub fn on_map_idle(&mut self, event: &IdleEvent) -> Update {
        let reported = match event.center() {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Cannot read map center from idle event: {e}");
                return Update::Unchanged;
            }
        };

        if !self.change_detection.is_change(&self.current, &reported) {
            log::trace!(
                "Map idle at {reported} (zoom {:?}), center unchanged",
                event.zoom()
            );
            return Update::Unchanged;
        }

        log::debug!("Map moved from {} to {reported}", self.current);
        self.current = reported;
        (self.on_change)(reported);
        Update::Moved(reported)
    }

    /// Same as [`Reconciler::on_map_idle`] for a payload that has not been
    /// decoded yet.
    pub fn on_map_idle_value(&mut self, value: &serde_json::Value) -> Update {
        match serde_json::from_value::<IdleEvent>(value.clone()) {
            Ok(event) => self.on_map_idle(&event),
            Err(e) => {
                log::warn!("Ignoring map idle event: {}", MalformedMapEvent::from(e));
                Update::Unchanged
            }
        }
    }

    /// Seeds the center from the device location. Applied at most once and
    /// only when the host supplied neither a value nor initial coordinates.
    pub fn on_user_location_fix(&mut self, coords: Coordinate) -> Update {
        if self.mode == ControlMode::HostControlled {
            log::trace!("Ignoring location fix, center is host controlled");
            return Update::Unchanged;
        }
        if self.has_initial_coords {
            log::trace!("Ignoring location fix, initial coordinates were supplied");
            return Update::Unchanged;
        }
        if self.location_seeded {
            log::trace!("Ignoring location fix, center already seeded");
            return Update::Unchanged;
        }

        log::debug!("Seeding center from device location {coords}");
        self.location_seeded = true;
        self.current = coords;
        Update::Seeded(coords)
    }

    pub fn on_user_location_event(&mut self, event: &UserLocationEvent) -> Update {
        match event.coordinate() {
            Ok(c) => self.on_user_location_fix(c),
            Err(e) => {
                log::warn!("Cannot read device location: {e}");
                Update::Unchanged
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use serde_json::json;

    use super::*;

    fn recording(
        controlled: Option<Coordinate>,
        initial: Option<Coordinate>,
    ) -> (Reconciler, Rc<RefCell<Vec<Coordinate>>>) {
        let calls = Rc::new(RefCell::new(vec![]));
        let calls_clone = calls.clone();
        let reconciler = Reconciler::new(
            controlled,
            initial,
            move |c| calls_clone.borrow_mut().push(c),
            &SelectorConfig::default(),
        );
        (reconciler, calls)
    }

    #[test]
    fn initialize_priority() {
        let default = Coordinate::new(0.0, 0.0);
        let controlled = Coordinate::new(1.0, 1.0);
        let initial = Coordinate::new(2.0, 2.0);

        assert_eq!(initialize(Some(controlled), Some(initial), default), controlled);
        assert_eq!(initialize(Some(controlled), None, default), controlled);
        assert_eq!(initialize(None, Some(initial), default), initial);
        assert_eq!(initialize(None, None, default), default);
    }

    #[test]
    fn default_center_is_configurable() {
        let config = SelectorConfig {
            default_center: Coordinate::new(51.5, -0.12),
            ..Default::default()
        };
        let reconciler = Reconciler::new(None, None, |_| {}, &config);
        assert_eq!(reconciler.center(), Coordinate::new(51.5, -0.12));
    }

    #[test]
    fn mode_follows_controlled_value() {
        let (reconciler, _) = recording(Some(Coordinate::new(1.0, 1.0)), None);
        assert_eq!(reconciler.mode(), ControlMode::HostControlled);

        let (mut reconciler, calls) = recording(None, None);
        assert_eq!(reconciler.mode(), ControlMode::SelfManaged);

        let update = reconciler.on_controlled_value_changed(Coordinate::new(3.0, 4.0));
        assert_eq!(update, Update::Synced(Coordinate::new(3.0, 4.0)));
        assert_eq!(reconciler.mode(), ControlMode::HostControlled);
        assert_eq!(reconciler.center(), Coordinate::new(3.0, 4.0));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn raw_idle_payload() {
        let (mut reconciler, calls) = recording(None, Some(Coordinate::new(10.0, 20.0)));

        let update = reconciler.on_map_idle_value(&json!({ "properties": { "center": [30.0, 11.0] } }));
        assert_eq!(update, Update::Moved(Coordinate::new(11.0, 30.0)));

        let update = reconciler.on_map_idle_value(&json!({ "properties": { "center": { "lng": 1 } } }));
        assert_eq!(update, Update::Unchanged);
        assert_eq!(reconciler.center(), Coordinate::new(11.0, 30.0));
        assert_eq!(*calls.borrow(), vec![Coordinate::new(11.0, 30.0)]);
    }

    #[test]
    fn location_event_without_coords() {
        let (mut reconciler, _) = recording(None, None);
        let update = reconciler.on_user_location_event(&UserLocationEvent::default());
        assert_eq!(update, Update::Unchanged);
        assert_eq!(reconciler.center(), crate::DEFAULT_CENTER);
    }

    #[test]
    fn update_accessors() {
        assert_eq!(Update::Unchanged.center(), None);
        assert!(!Update::Unchanged.is_changed());
        let c = Coordinate::new(1.0, 2.0);
        assert_eq!(Update::Seeded(c).center(), Some(c));
        assert!(Update::Moved(c).is_changed());
    }
}
