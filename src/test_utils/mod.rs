// SPDX-License-Identifier: AGPL-3.0-or-later

mod client;
mod fixtures;

pub use client::{http_test_client, TestClient};
pub use fixtures::{name_clearance, store, submit, NameClearance};
