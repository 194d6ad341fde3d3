// SPDX-License-Identifier: AGPL-3.0-or-later

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Extension, Path, Query};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::composition::FormLayout;
use crate::db::errors::StoreError;
use crate::db::models::{
    CollectionItem, Field, Form, FormAnswer, FormField, NewSubmission, ReservedName,
    SubmissionUpdate,
};
use crate::db::{Id, Record, TableName};
use crate::http::context::HttpServiceContext;
use crate::hydration::HydratedSubmission;
use crate::validation::ValidationIssue;

pub type ApiResult<T> = Result<T, ApiError>;

/// Id taken from the request path, a non-numeric id is a malformed request.
type IdPath = Result<Path<Id>, PathRejection>;

/// Errors answered by the REST API, serialized as `{ "error": "<message>" }`.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("Malformed request: {0}")]
    Malformed(String),

    #[error("Invalid payload: {0}")]
    BadRequest(String),

    #[error("Something went wrong: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Malformed(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            StoreError::InvalidRecord { .. } => ApiError::BadRequest(err.to_string()),
            StoreError::Snapshot(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Malformed(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Malformed(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Liveness probe.
pub async fn handle_health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Answers requests to paths without route.
pub async fn handle_unknown_route(uri: Uri) -> ApiError {
    ApiError::Malformed(format!("No route for {}", uri.path()))
}

pub async fn handle_list<R: Record>(
    Extension(context): Extension<HttpServiceContext>,
) -> Json<Vec<R>> {
    Json(context.store.get_all::<R>())
}

pub async fn handle_get<R: Record>(
    Extension(context): Extension<HttpServiceContext>,
    id: IdPath,
) -> ApiResult<Json<R>> {
    let Path(id) = id?;
    Ok(Json(context.store.get::<R>(id)?))
}

pub async fn handle_create<R: Record>(
    Extension(context): Extension<HttpServiceContext>,
    payload: Result<Json<R::New>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<R>)> {
    let Json(new) = payload?;
    let record = context.store.create::<R>(new)?;
    context.notify(R::TABLE);
    Ok((StatusCode::CREATED, Json(record)))
}

/// Merges the given fields over the stored record, `PUT` and `PATCH` behave the same.
pub async fn handle_update<R: Record>(
    Extension(context): Extension<HttpServiceContext>,
    id: IdPath,
    payload: Result<Json<R::Patch>, JsonRejection>,
) -> ApiResult<Json<R>> {
    let Path(id) = id?;
    let Json(patch) = payload?;
    let record = context.store.update::<R>(id, patch)?;
    context.notify(R::TABLE);
    Ok(Json(record))
}

pub async fn handle_delete<R: Record>(
    Extension(context): Extension<HttpServiceContext>,
    id: IdPath,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    context.store.delete::<R>(id)?;
    context.notify(R::TABLE);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn handle_fields_by_group(
    Extension(context): Extension<HttpServiceContext>,
    group_id: IdPath,
) -> ApiResult<Json<Vec<Field>>> {
    let Path(group_id) = group_id?;
    Ok(Json(context.store.fields_by_group(group_id)))
}

pub async fn handle_forms_by_service(
    Extension(context): Extension<HttpServiceContext>,
    service_id: IdPath,
) -> ApiResult<Json<Vec<Form>>> {
    let Path(service_id) = service_id?;
    Ok(Json(context.store.forms_by_service(service_id)))
}

pub async fn handle_form_layout(
    Extension(context): Extension<HttpServiceContext>,
    form_id: IdPath,
) -> ApiResult<Json<FormLayout>> {
    let Path(form_id) = form_id?;
    Ok(Json(context.store.form_layout(form_id)?))
}

pub async fn handle_form_fields_by_form(
    Extension(context): Extension<HttpServiceContext>,
    form_id: IdPath,
) -> ApiResult<Json<Vec<FormField>>> {
    let Path(form_id) = form_id?;
    Ok(Json(context.store.form_fields_by_form(form_id)))
}

#[derive(Debug, Deserialize)]
pub struct ParentFilter {
    parent: Option<Id>,
}

pub async fn handle_collection_items_by_collection(
    Extension(context): Extension<HttpServiceContext>,
    collection_id: IdPath,
    filter: Result<Query<ParentFilter>, QueryRejection>,
) -> ApiResult<Json<Vec<CollectionItem>>> {
    let Path(collection_id) = collection_id?;
    let Query(filter) = filter?;
    Ok(Json(
        context
            .store
            .collection_items_by_collection(collection_id, filter.parent),
    ))
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    #[serde(default)]
    name: String,
}

pub async fn handle_check_reserved_name(
    Extension(context): Extension<HttpServiceContext>,
    query: Result<Query<NameQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ReservedName>>> {
    let Query(query) = query?;
    Ok(Json(context.store.check_reserved_name(&query.name)))
}

pub async fn handle_form_answers_by_submission(
    Extension(context): Extension<HttpServiceContext>,
    submission_id: IdPath,
) -> ApiResult<Json<Vec<FormAnswer>>> {
    let Path(submission_id) = submission_id?;
    Ok(Json(context.store.form_answers_by_submission(submission_id)))
}

pub async fn handle_submissions(
    Extension(context): Extension<HttpServiceContext>,
) -> Json<Vec<HydratedSubmission>> {
    Json(context.store.submissions())
}

pub async fn handle_submissions_by_service(
    Extension(context): Extension<HttpServiceContext>,
    service_id: IdPath,
) -> ApiResult<Json<Vec<HydratedSubmission>>> {
    let Path(service_id) = service_id?;
    Ok(Json(context.store.submissions_by_service(service_id)))
}

pub async fn handle_submission(
    Extension(context): Extension<HttpServiceContext>,
    id: IdPath,
) -> ApiResult<Json<HydratedSubmission>> {
    let Path(id) = id?;
    Ok(Json(context.store.submission(id)?))
}

/// Stores a submission together with its nested `formAnswers`.
pub async fn handle_create_submission(
    Extension(context): Extension<HttpServiceContext>,
    payload: Result<Json<NewSubmission>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<HydratedSubmission>)> {
    let Json(submission) = payload?;
    let submission = context.store.create_submission(submission)?;
    context.notify(TableName::Submissions);
    context.notify(TableName::FormAnswers);
    Ok((StatusCode::CREATED, Json(submission)))
}

/// Patches a submission, nested `formAnswers` replace all stored answers.
pub async fn handle_update_submission(
    Extension(context): Extension<HttpServiceContext>,
    id: IdPath,
    payload: Result<Json<SubmissionUpdate>, JsonRejection>,
) -> ApiResult<Json<HydratedSubmission>> {
    let Path(id) = id?;
    let Json(update) = payload?;
    let replaces_answers = update.form_answers.is_some();

    let submission = context.store.update_submission(id, update)?;
    context.notify(TableName::Submissions);
    if replaces_answers {
        context.notify(TableName::FormAnswers);
    }

    Ok(Json(submission))
}

pub async fn handle_delete_submission(
    Extension(context): Extension<HttpServiceContext>,
    id: IdPath,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    context.store.delete_submission(id)?;
    context.notify(TableName::Submissions);
    context.notify(TableName::FormAnswers);
    Ok(StatusCode::NO_CONTENT)
}

/// Reports answers of a submission which fail their form field's validation. Nothing gets
/// rejected or modified.
pub async fn handle_validate_submission(
    Extension(context): Extension<HttpServiceContext>,
    id: IdPath,
) -> ApiResult<Json<Vec<ValidationIssue>>> {
    let Path(id) = id?;
    Ok(Json(
        context.store.validate_submission(id, &context.validators)?,
    ))
}

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use rstest::rstest;
    use serde_json::{json, Value};

    use crate::db::models::{Field, Group};
    use crate::db::MemoryStore;
    use crate::test_utils::{http_test_client, name_clearance, store, NameClearance};

    #[rstest]
    #[tokio::test]
    async fn crud_round_trip(store: MemoryStore) {
        let client = http_test_client(&store);

        let response = client
            .post("/api/groups")
            .json(&json!({ "group_name": "Person" }))
            .send()
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: Group = response.json().await;
        assert_eq!(created.id, 1);

        let response = client
            .patch(&format!("/api/groups/{}", created.id))
            .json(&json!({ "group_name": "Individual" }))
            .send()
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated: Group = response.json().await;
        assert_eq!(updated.group_name, "Individual");

        let response = client.get("/api/groups").send().await;
        let groups: Vec<Group> = response.json().await;
        assert_eq!(groups, vec![updated.clone()]);

        let response = client
            .delete(&format!("/api/groups/{}", created.id))
            .send()
            .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.text().await, "");

        let response = client.get(&format!("/api/groups/{}", created.id)).send().await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: Value = response.json().await;
        assert_eq!(body["error"], "No record with id 1 found in table groups");
    }

    #[rstest]
    #[tokio::test]
    async fn put_merges_like_patch(name_clearance: NameClearance) {
        let client = http_test_client(&name_clearance.store);

        let response = client
            .put(&format!("/api/fields/{}", name_clearance.country.id))
            .json(&json!({ "label": "Country of Registration" }))
            .send()
            .await;
        let field: Field = response.json().await;

        assert_eq!(field.label, "Country of Registration");
        assert_eq!(field.collection_id, name_clearance.country.collection_id);
        assert_eq!(field.group_id, name_clearance.country.group_id);
    }

    #[rstest]
    #[case::unknown_route("/api/unknown", StatusCode::BAD_REQUEST)]
    #[case::malformed_id("/api/forms/not-a-number", StatusCode::BAD_REQUEST)]
    #[case::missing_record("/api/forms/404", StatusCode::NOT_FOUND)]
    #[case::missing_layout("/api/forms/404/layout", StatusCode::NOT_FOUND)]
    #[case::missing_submission("/api/submissions/404", StatusCode::NOT_FOUND)]
    #[case::health("/health", StatusCode::OK)]
    #[tokio::test]
    async fn status_codes(
        name_clearance: NameClearance,
        #[case] path: &str,
        #[case] expected: StatusCode,
    ) {
        let client = http_test_client(&name_clearance.store);
        let response = client.get(path).send().await;
        assert_eq!(response.status(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn wrong_verb_is_not_allowed(store: MemoryStore) {
        let client = http_test_client(&store);
        let response = client.post("/api/groups/1").send().await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[rstest]
    #[tokio::test]
    async fn rejects_malformed_payload(store: MemoryStore) {
        let client = http_test_client(&store);
        let response = client
            .post("/api/groups")
            .json(&json!({ "name": "Person" }))
            .send()
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(store.get_all::<Group>().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn derived_routes(name_clearance: NameClearance) {
        let client = http_test_client(&name_clearance.store);

        let response = client
            .get(&format!(
                "/api/collection-items/by-collection/{}?parent={}",
                name_clearance.province.id, name_clearance.malawi.id
            ))
            .send()
            .await;
        let items: Value = response.json().await;
        assert_eq!(items.as_array().unwrap().len(), 1);
        assert_eq!(items[0]["collection_item"], "Southern Region");

        let response = client
            .get(&format!("/api/forms/by-service/{}", name_clearance.service.id))
            .send()
            .await;
        let forms: Value = response.json().await;
        assert_eq!(forms[0]["form_name"], "Name Clearance");

        let response = client
            .get(&format!("/api/form-fields/by-form/{}", name_clearance.form.id))
            .send()
            .await;
        let form_fields: Value = response.json().await;
        assert_eq!(form_fields.as_array().unwrap().len(), 4);

        let response = client
            .get(&format!("/api/fields/by-group/{}", name_clearance.company.id))
            .send()
            .await;
        let fields: Value = response.json().await;
        assert_eq!(fields.as_array().unwrap().len(), 2);

        let response = client
            .get("/api/reserved-names/check?name=pacra%20holdings")
            .send()
            .await;
        let conflicts: Value = response.json().await;
        assert_eq!(conflicts[0]["reserved_name"], "PACRA");

        let response = client.get("/api/reserved-names/check").send().await;
        let conflicts: Value = response.json().await;
        assert_eq!(conflicts, json!([]));

        let response = client
            .get(&format!("/api/forms/{}/layout", name_clearance.form.id))
            .send()
            .await;
        let layout: Value = response.json().await;
        assert_eq!(layout["groups"][1]["fields"][0]["label"], "Country");
    }

    #[rstest]
    #[tokio::test]
    async fn submission_life_cycle(name_clearance: NameClearance) {
        let client = http_test_client(&name_clearance.store);
        let first = name_clearance.form_fields[0].id;
        let second = name_clearance.form_fields[1].id;

        let response = client
            .post("/api/submissions")
            .json(&json!({
                "services_id": name_clearance.service.id,
                "created_by": 3,
                "formAnswers": [
                    { "form_field_id": first, "answer": "PACRA Holdings" },
                    { "form_field_id": second, "answer": "Lusaka Traders" }
                ]
            }))
            .send()
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: Value = response.json().await;
        let id = created["id"].as_u64().unwrap();
        assert!(created["case_number"]
            .as_str()
            .unwrap()
            .ends_with("-000001"));
        assert_eq!(created["form_id"], name_clearance.form.id);
        assert_eq!(created["formFields"].as_array().unwrap().len(), 4);
        assert_eq!(created["formAnswers"].as_array().unwrap().len(), 2);

        let response = client
            .get(&format!("/api/submissions/{}/validation", id))
            .send()
            .await;
        let issues: Value = response.json().await;
        assert_eq!(issues.as_array().unwrap().len(), 1);
        assert_eq!(issues[0]["form_field_id"], first);

        let response = client
            .patch(&format!("/api/submissions/{}", id))
            .json(&json!({
                "formAnswers": [{ "form_field_id": second, "answer": "Kitwe Traders" }]
            }))
            .send()
            .await;
        let updated: Value = response.json().await;
        assert_eq!(updated["formAnswers"].as_array().unwrap().len(), 1);
        assert_eq!(updated["formAnswers"][0]["answer"], "Kitwe Traders");
        assert_eq!(updated["created_by"], 3);

        let response = client
            .get(&format!(
                "/api/submissions/by-service/{}",
                name_clearance.service.id
            ))
            .send()
            .await;
        let submissions: Value = response.json().await;
        assert_eq!(submissions[0]["formAnswers"], updated["formAnswers"]);

        let response = client
            .delete(&format!("/api/submissions/{}", id))
            .send()
            .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = client
            .get(&format!("/api/form-answers/by-submission/{}", id))
            .send()
            .await;
        let answers: Value = response.json().await;
        assert_eq!(answers, json!([]));
    }
}
