// SPDX-License-Identifier: AGPL-3.0-or-later

//! # formportal
//!
//! Dynamic form definitions, submissions and reference data behind a REST API. Forms are
//! composed from reusable fields, submissions are stored as answers per placed field and get
//! their form derived when read.
#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]

pub mod bus;
pub mod composition;
mod config;
mod context;
pub mod db;
pub mod http;
pub mod hydration;
pub mod manager;
mod node;
mod persistence;
pub mod reserved;
pub mod validation;

#[cfg(test)]
mod test_utils;

pub use crate::config::{Configuration, DEFAULT_BUS_CAPACITY, DEFAULT_HTTP_PORT};
pub use crate::context::Context;
pub use crate::db::MemoryStore;
pub use node::Node;
