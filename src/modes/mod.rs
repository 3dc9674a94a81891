// TapWatch - Screens
//
// Each screen is an `impl Watch` block that runs until it knows the next
// mode. Nothing here keeps state between visits beyond `DeviceState`.

mod ambient;
mod calendar;
mod compass;
mod editor;
mod menu;
mod wifi;

pub use menu::MenuItem;
