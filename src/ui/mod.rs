//! GUI module for the Enclose game
//!
//! Native front-end built with egui/eframe. All game logic goes through
//! [`MatchSession`](crate::session::MatchSession).

mod app;
mod board_view;
mod theme;

pub use app::EncloseApp;
pub use board_view::nearest_open_edge;
