pub mod actions;
pub mod launcher;
pub mod picker;
