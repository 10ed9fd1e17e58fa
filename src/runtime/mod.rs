pub mod effect;
pub mod event;
pub mod reducer;
