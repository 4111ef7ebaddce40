//! `temp-matrix` library crate.
//!
//! Loads daily max/min temperature readings, aggregates them into a dense
//! year × month grid, and presents the grid as a terminal UI, an SVG heatmap,
//! or JSON/CSV exports. The binary (`tmx`) is a thin wrapper around this library.

pub mod aggregate;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod render;
pub mod report;
pub mod scale;
pub mod tui;
