// SPDX-License-Identifier: AGPL-3.0-or-later

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::Result;
use axum::extract::Extension;
use axum::http::Method;
use axum::routing::get;
use axum::Router;
use http::header::CONTENT_TYPE;
use log::{debug, info};
use tower_http::cors::{Any, CorsLayer};

use crate::bus::ServiceSender;
use crate::context::Context;
use crate::db::models::{
    Collection, CollectionItem, DataType, Field, Form, FormAnswer, FormField, FormGroup, Group,
    ReservedName, Service, User,
};
use crate::db::Record;
use crate::http::api::{
    handle_check_reserved_name, handle_collection_items_by_collection, handle_create,
    handle_create_submission, handle_delete, handle_delete_submission, handle_fields_by_group,
    handle_form_answers_by_submission, handle_form_fields_by_form, handle_form_layout,
    handle_forms_by_service, handle_get, handle_health, handle_list, handle_submission,
    handle_submissions, handle_submissions_by_service, handle_unknown_route, handle_update,
    handle_update_submission, handle_validate_submission,
};
use crate::http::context::HttpServiceContext;
use crate::manager::Shutdown;

/// Prefix of all REST routes.
pub const API_ROUTE: &str = "/api";

/// Adds list, create, get, update and delete routes of one table under `path`.
fn resource<R: Record>(router: Router, path: &str) -> Router {
    router
        .route(path, get(handle_list::<R>).post(handle_create::<R>))
        .route(
            &format!("{}/:id", path),
            get(handle_get::<R>)
                .put(handle_update::<R>)
                .patch(handle_update::<R>)
                .delete(handle_delete::<R>),
        )
}

/// Build HTTP server with REST API.
pub fn build_server(http_context: HttpServiceContext) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(false)
        .allow_origin(Any);

    let api = |path: &str| format!("{}{}", API_ROUTE, path);

    let mut router = Router::new().route("/health", get(handle_health));

    router = resource::<Group>(router, &api("/groups"));
    router = resource::<DataType>(router, &api("/data-types"));
    router = resource::<Field>(router, &api("/fields"));
    router = resource::<Collection>(router, &api("/collections"));
    router = resource::<CollectionItem>(router, &api("/collection-items"));
    router = resource::<Service>(router, &api("/services"));
    router = resource::<Form>(router, &api("/forms"));
    router = resource::<FormGroup>(router, &api("/form-groups"));
    router = resource::<FormField>(router, &api("/form-fields"));
    router = resource::<User>(router, &api("/users"));
    router = resource::<FormAnswer>(router, &api("/form-answers"));
    router = resource::<ReservedName>(router, &api("/reserved-names"));

    router
        // Submissions are always answered hydrated and written together with their answers
        .route(
            &api("/submissions"),
            get(handle_submissions).post(handle_create_submission),
        )
        .route(
            &api("/submissions/:id"),
            get(handle_submission)
                .put(handle_update_submission)
                .patch(handle_update_submission)
                .delete(handle_delete_submission),
        )
        .route(
            &api("/submissions/:id/validation"),
            get(handle_validate_submission),
        )
        .route(
            &api("/submissions/by-service/:service_id"),
            get(handle_submissions_by_service),
        )
        // Derived read-only routes
        .route(&api("/fields/by-group/:group_id"), get(handle_fields_by_group))
        .route(
            &api("/forms/by-service/:service_id"),
            get(handle_forms_by_service),
        )
        .route(&api("/forms/:id/layout"), get(handle_form_layout))
        .route(
            &api("/form-fields/by-form/:form_id"),
            get(handle_form_fields_by_form),
        )
        .route(
            &api("/form-answers/by-submission/:submission_id"),
            get(handle_form_answers_by_submission),
        )
        .route(
            &api("/collection-items/by-collection/:collection_id"),
            get(handle_collection_items_by_collection),
        )
        .route(
            &api("/reserved-names/check"),
            get(handle_check_reserved_name),
        )
        .fallback(handle_unknown_route)
        // Add middlewares
        .layer(cors)
        // Add shared context
        .layer(Extension(http_context))
}

/// Start HTTP server.
pub async fn http_service(context: Context, signal: Shutdown, tx: ServiceSender) -> Result<()> {
    let http_port = context.config.http_port;
    let http_address = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), http_port);

    // Introduce a new context for all HTTP routes
    let http_context = HttpServiceContext::new(context.store.clone(), tx);

    axum::Server::try_bind(&http_address)?
        .serve(build_server(http_context).into_make_service())
        .with_graceful_shutdown(async {
            info!("HTTP API listening on {}", http_address);
            signal.await.ok();
            debug!("HTTP service received shutdown signal");
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use rstest::rstest;
    use serde_json::json;

    use crate::bus::{create_service_sender, ServiceMessage};
    use crate::db::{MemoryStore, TableName};
    use crate::http::context::HttpServiceContext;
    use crate::test_utils::{name_clearance, store, NameClearance, TestClient};

    use super::build_server;

    #[rstest]
    #[tokio::test]
    async fn announces_writes_on_bus(store: MemoryStore) {
        let tx = create_service_sender(16);
        let mut rx = tx.subscribe();
        let client = TestClient::new(build_server(HttpServiceContext::new(store, tx)));

        let response = client
            .post("/api/services")
            .json(&json!({ "service_name": "Name Clearance" }))
            .send()
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        assert_eq!(
            rx.recv().await.unwrap(),
            ServiceMessage::TableChanged(TableName::Services)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn reads_do_not_announce_anything(name_clearance: NameClearance) {
        let tx = create_service_sender(16);
        let mut rx = tx.subscribe();
        let client = TestClient::new(build_server(HttpServiceContext::new(
            name_clearance.store.clone(),
            tx,
        )));

        let response = client.get("/api/forms").send().await;
        assert_eq!(response.status(), StatusCode::OK);

        assert!(rx.try_recv().is_err());
    }

    #[rstest]
    #[tokio::test]
    async fn answers_cors_preflight(store: MemoryStore) {
        let client = TestClient::new(build_server(HttpServiceContext::new(
            store,
            create_service_sender(16),
        )));

        let response = client
            .options("/api/forms")
            .header("Origin", "http://localhost:3000")
            .header("Access-Control-Request-Method", "PATCH")
            .send()
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["access-control-allow-origin"], "*");
    }
}
