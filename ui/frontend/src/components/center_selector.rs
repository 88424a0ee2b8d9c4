use center_selector::{Coordinate, IdleEvent, Reconciler, SelectorConfig, Update};
use leptos::*;
use leptos_leaflet::leaflet;
use leptos_leaflet::*;
use leptos_use::{use_geolocation, UseGeolocationReturn};

use crate::components::center_pin::CenterPin;

/// Centers a pin wrapper of 24x48 on the middle of the map.
pub const PIN_WRAPPER_STYLE: &str =
    "position: absolute; top: 50%; left: 50%; transform: translate(-12px, -24px); z-index: 1000; pointer-events: none;";

const TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

pub fn container_style(extra: &str) -> String {
    format!("position: relative; flex: 1; height: 100%; {extra}")
}

/// What the view does after the reconciler handled an event.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ViewChange {
    /// New value of the displayed center
    pub center: Option<Coordinate>,
    /// Coordinate to report through `on_change`
    pub notify: Option<Coordinate>,
    /// Coordinate the map has to pan to so the pin stays over the center
    pub pan_to: Option<Coordinate>,
}

/// Only a map movement reaches the host. Host and device centers pan the
/// map so the pin stays over them.
pub fn view_change(update: Update) -> ViewChange {
    let center = update.center();
    match update {
        Update::Unchanged => ViewChange::default(),
        Update::Moved(c) => ViewChange {
            center,
            notify: Some(c),
            pan_to: None,
        },
        Update::Synced(c) | Update::Seeded(c) => ViewChange {
            center,
            notify: None,
            pan_to: Some(c),
        },
    }
}

fn pan_to(map: &leaflet::Map, c: Coordinate) {
    map.set_view(&leaflet::LatLng::new(c.latitude, c.longitude), map.get_zoom());
}

/// Turns every user gesture of the map on or off.
fn set_gestures(map: &leaflet::Map, enabled: bool) {
    let handlers = [
        map.dragging(),
        map.scroll_wheel_zoom(),
        map.touch_zoom(),
        map.double_click_zoom(),
        map.box_zoom(),
        map.keyboard(),
    ];

    for handler in handlers {
        if enabled {
            handler.enable();
        } else {
            handler.disable();
        }
    }
}

/// Map with a fixed pin in the middle. The user pans the map until the pin
/// points at the place they want; `on_change` receives the new center each
/// time the map settles somewhere else.
///
/// Passing `value` makes the selector follow the host from then on. Without
/// `value` and `initial_coords`, and with `user_location` set, the first
/// device location fix becomes the starting center.
#[component]
pub fn CenterSelector(
    #[prop(into)] on_change: Callback<Coordinate>,
    #[prop(optional)] initial_coords: Option<Coordinate>,
    #[prop(optional, into)] value: MaybeSignal<Option<Coordinate>>,
    /// Defaults to `SelectorConfig::user_location`
    #[prop(optional)]
    user_location: Option<bool>,
    /// Tile URL template
    #[prop(optional, into)]
    map_style: Option<String>,
    #[prop(optional)] initial_zoom_level: Option<f64>,
    #[prop(optional, into)] style: String,
    /// Defaults to `SelectorConfig::interactive`
    #[prop(optional)]
    interactive: Option<bool>,
    #[prop(optional, into)] center_pin_style: String,
    /// Replaces the built in pin
    #[prop(optional, into)]
    render_center_pin: Option<ViewFn>,
    #[prop(optional)] config: Option<SelectorConfig>,
) -> impl IntoView {
    let config = config.unwrap_or_default();
    let map_style = map_style.unwrap_or_else(|| config.map_style.clone());
    let zoom = initial_zoom_level.unwrap_or(config.initial_zoom_level);
    let interactive = interactive.unwrap_or(config.interactive);
    let user_location = user_location.unwrap_or(config.user_location);

    // The host is notified below, once the reconciler is no longer borrowed
    let reconciler = Reconciler::new(value.get_untracked(), initial_coords, |_| {}, &config);
    let start = reconciler.center();
    let reconciler = store_value(reconciler);

    let (center, set_center) = create_signal(start);
    let (user_position, set_user_position) = create_signal(None::<Coordinate>);
    let (map, set_map) = create_signal(None::<leaflet::Map>);

    let follow = move |update: Update| {
        let change = view_change(update);
        if let Some(c) = change.center {
            set_center.set(c);
        }
        if let Some(c) = change.pan_to {
            // Applied by the map effect below when the map is not ready yet
            if let Some(m) = map.get_untracked() {
                pan_to(&m, c);
            }
        }
        if let Some(c) = change.notify {
            on_change.call(c);
        }
    };

    create_effect(move |_| {
        if let Some(v) = value.get() {
            let update = reconciler
                .try_update_value(|r| r.on_controlled_value_changed(v))
                .unwrap_or(Update::Unchanged);
            follow(update);
        }
    });

    create_effect(move |_| {
        if let Some(m) = map.get() {
            set_gestures(&m, interactive);
            // A center synced or seeded before the map existed
            let c = center.get_untracked();
            let current = m.get_center();
            if current.lat() != c.latitude || current.lng() != c.longitude {
                pan_to(&m, c);
            }
        }
    });

    if user_location {
        let UseGeolocationReturn { coords, error, .. } = use_geolocation();

        create_effect(move |_| {
            if let Some(c) = coords.get() {
                let fix = Coordinate::new(c.latitude(), c.longitude());
                set_user_position.set(Some(fix));
                let update = reconciler
                    .try_update_value(|r| r.on_user_location_fix(fix))
                    .unwrap_or(Update::Unchanged);
                follow(update);
            }
        });

        create_effect(move |_| {
            if let Some(e) = error.get() {
                log::warn!("Device location unavailable: {}", e.message());
            }
        });
    }

    let events = MapEvents::new().move_end(move |_| {
        let Some(m) = map.get_untracked() else {
            log::warn!("Map moved before it was ready, ignoring");
            return;
        };

        let c = m.get_center();
        let event = IdleEvent::from_viewport(Coordinate::new(c.lat(), c.lng()), Some(m.get_zoom()));
        let update = reconciler
            .try_update_value(|r| r.on_map_idle(&event))
            .unwrap_or(Update::Unchanged);
        follow(update);
    });

    let pin = match render_center_pin {
        Some(render) => render.run(),
        None => view! { <CenterPin style=center_pin_style/> }.into_view(),
    };

    view! {
        <div class="center-selector" style=container_style(&style)>
            <MapContainer
                style="height: 100%; width: 100%"
                center=Position::new(start.latitude, start.longitude)
                zoom=zoom
                set_view=true
                map=set_map
                events=events
            >
                <TileLayer url=map_style attribution=TILE_ATTRIBUTION/>
                {move || {
                    user_position
                        .get()
                        .map(|p| view! { <Marker position=Position::new(p.latitude, p.longitude)/> })
                }}
            </MapContainer>
            <div
                class="center-pin-wrapper"
                style=PIN_WRAPPER_STYLE
                title=move || center.get().to_string()
            >
                {pin}
            </div>
        </div>
    }
}

#[test]
fn test_view_change() {
    let c = Coordinate::new(11.0, 30.0);

    assert_eq!(view_change(Update::Unchanged), ViewChange::default());

    let change = view_change(Update::Moved(c));
    assert_eq!(change.center, Some(c));
    assert_eq!(change.notify, Some(c));
    assert_eq!(change.pan_to, None);

    for update in [Update::Synced(c), Update::Seeded(c)] {
        let change = view_change(update);
        assert_eq!(change.center, Some(c));
        assert_eq!(change.notify, None);
        assert_eq!(change.pan_to, Some(c));
    }
}

#[test]
fn test_container_style() {
    assert_eq!(
        container_style("border: 1px solid;"),
        "position: relative; flex: 1; height: 100%; border: 1px solid;"
    );
}
