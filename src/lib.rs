//! kgviz - force-directed layout and lightweight analytics for knowledge graphs.
//!
//! The [`layout`] module owns the simulation; [`analytics`] derives summary
//! numbers from the same node and edge lists. [`io`], [`model`] and [`sample`]
//! get graphs in and out, and [`server`] exposes one live layout over HTTP.

pub mod analytics;
pub mod cache;
pub mod config;
pub mod io;
pub mod layout;
pub mod model;
pub mod sample;
pub mod server;
