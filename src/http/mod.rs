// SPDX-License-Identifier: AGPL-3.0-or-later

mod api;
mod context;
mod service;

pub use api::{ApiError, ApiResult};
pub use context::HttpServiceContext;
pub use service::{build_server, http_service, API_ROUTE};
