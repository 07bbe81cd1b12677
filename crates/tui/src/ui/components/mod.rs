pub mod category_selector;
pub mod component;

pub use category_selector::CategorySelectorComponent;
