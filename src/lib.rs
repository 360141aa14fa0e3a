//! websync: a terminal bookmark manager.
//!
//! Websites are grouped into user-ordered categories. The [`store`] owns the
//! document and persists every change through a [`storage::Storage`]
//! backend; [`search`] derives filtered views and [`drag`] turns
//! drag-and-drop gestures into store operations. The [`ui`] module drives
//! all of it from a ratatui front end.

pub mod app;
pub mod config;
pub mod document;
pub mod drag;
pub mod keybindings;
pub mod links;
pub mod preferences;
pub mod search;
pub mod storage;
pub mod store;
pub mod theme;
pub mod transfer;
pub mod ui;
pub mod util;
