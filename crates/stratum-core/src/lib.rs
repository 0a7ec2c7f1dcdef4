#![forbid(unsafe_code)]
//! stratum-core: dependency graph engine and implementation planner.
//!
//! # Overview
//!
//! Turns symbol relationship tables (inheritance, calls, parameter, return
//! and field types, plus public API declarations) into a directed dependency
//! graph, then answers one question: in what order can these symbols be
//! implemented?
//!
//! - [`ingest`] reads the CSV sources into a [`graph::GraphStore`].
//! - [`graph`] holds the store and the analysis passes (leaves and roots,
//!   dependency-first order, transitive dependencies, layers, statistics).
//! - [`plan`] assembles the full-run plan and per-API reports.
//! - [`summary`] renders the bounded text summary.
//! - [`config`] loads `stratum.toml`.
//! - [`error`] defines stable machine-readable error codes.

pub mod config;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod plan;
pub mod summary;
