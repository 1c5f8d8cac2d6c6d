pub mod actions;
pub mod api;
pub mod config;
pub mod csrf;
pub mod page;
pub mod render;
pub mod validation;
pub mod widgets;

#[cfg(feature = "cli")]
pub mod app;
#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod output;

#[cfg(feature = "wasm")]
pub mod wasm;

#[cfg(test)]
mod tests;
