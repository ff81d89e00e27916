pub mod select;
pub mod text_input;

pub use select::{SelectOption, SelectState};
pub use text_input::TextInputState;
