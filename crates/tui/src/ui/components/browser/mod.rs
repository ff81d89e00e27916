mod browser_component;
pub mod state;

pub use browser_component::BrowserComponent;
pub use state::BrowserState;
