use center_selector::{Coordinate, DEFAULT_CENTER};
use leptos::*;
use leptos_meta::*;

pub mod components;

pub use components::center_pin::CenterPin;
pub use components::center_selector::CenterSelector;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let (selected, set_selected) = create_signal(None::<Coordinate>);
    let (value, set_value) = create_signal(None::<Coordinate>);

    let on_change = move |c: Coordinate| {
        log::info!("Selected {c}");
        set_selected.set(Some(c));
    };

    let reset = move |_| {
        set_value.set(Some(DEFAULT_CENTER));
        set_selected.set(None);
    };

    view! {
        <Title text="Center Selector"/>

        <Meta charset="UTF-8"/>
        <Meta name="viewport" content="width=device-width, initial-scale=1.0"/>

        <div style="display: flex; flex-direction: column; height: 100vh;">
            <CenterSelector on_change=on_change value=value user_location=true/>
            <div style="display: flex; justify-content: space-between; padding: 1rem;">
                <span>
                    {move || match selected.get() {
                        Some(c) => format!("Selected {c}"),
                        None => "Pan the map to place the pin".to_string(),
                    }}
                </span>
                <button on:click=reset>"Reset"</button>
            </div>
        </div>
    }
}
