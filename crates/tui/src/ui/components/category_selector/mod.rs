mod category_selector_component;
mod state;

pub use category_selector_component::CategorySelectorComponent;
pub use state::{CategorySelectorState, CursorDirection};
