pub mod center_pin;
pub mod center_selector;
