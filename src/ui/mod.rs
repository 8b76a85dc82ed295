//! egui widgets that render the derived views and feed selection changes
//! back into [`crate::state::AppState`].
pub mod panels;
pub mod plot;
pub mod table;
