use leptos::*;

pub const DEFAULT_PIN_SRC: &str = "/public/pins/default_pin.svg";
pub const DEFAULT_PIN_SIZE: u32 = 32;

/// Places the pin image so that its tip, not its top left corner, sits on
/// the point it is given.
pub fn marker_style(extra: &str) -> String {
    let half = DEFAULT_PIN_SIZE / 2;
    format!(
        "position: absolute; top: 50%; left: 50%; margin-left: -{half}px; margin-top: -{DEFAULT_PIN_SIZE}px; align-items: center; {extra}"
    )
}

/// Built in pin drawn over the middle of the map
#[component]
pub fn CenterPin(#[prop(optional, into)] style: String) -> impl IntoView {
    view! {
        <div class="center-pin" style=marker_style(&style)>
            <div style="border-radius: 20px; padding: 4px;">
                <img
                    class="center-pin-image"
                    src=DEFAULT_PIN_SRC
                    width=DEFAULT_PIN_SIZE
                    height=DEFAULT_PIN_SIZE
                    alt="Selected location"
                />
            </div>
        </div>
    }
}

#[test]
fn test_marker_style() {
    let style = marker_style("");
    assert!(style.contains("margin-left: -16px"));
    assert!(style.contains("margin-top: -32px"));

    assert!(marker_style("opacity: 0.5;").ends_with("opacity: 0.5;"));
}
