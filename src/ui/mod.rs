//! egui rendering. Reads [`crate::state::AppState`]; panels also mutate it
//! through its setters so every change recomputes the views.

pub mod charts;
pub mod panels;
pub mod table;
