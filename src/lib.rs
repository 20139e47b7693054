pub mod action;
pub mod api;
pub mod artwork;
pub mod effect;
pub mod favorites;
pub mod format;
pub mod logging;
pub mod reducer;
pub mod sprite_backend;
pub mod state;
pub mod ui;
