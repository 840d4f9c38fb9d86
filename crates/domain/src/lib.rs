//! # dryplug-domain
//!
//! Pure domain model for the dryplug humidity-controlled outlet.
//!
//! ## Responsibilities
//! - Foundational types: controller keys, error conventions, timestamps
//! - Define the **controller configuration** (entity references, thresholds, schedule)
//! - Define the **readings** the engine consumes (switch states, numeric sensor values)
//! - Define the **engine state** that survives restarts
//! - Define the **tick snapshot** published after each evaluation, and the
//!   human-readable status derived from it
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod controller;
pub mod engine_state;
pub mod entity;
pub mod schedule;
pub mod snapshot;
