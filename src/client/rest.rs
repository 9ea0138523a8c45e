use async_trait::async_trait;
use log::warn;
use serde_json::Value;

use crate::domain::shipment::{parse_shipment, Shipment};
use crate::domain::study::{parse_study, parse_study_counts};
use crate::domain::user::{parse_user, User};
use crate::domain::{AnnotationType, PagedReply, SearchParams, Study, StudyCounts, StudyToAdd};
use crate::{EntityApi, Error, Result};

const STATE_ACTIONS: [&str; 4] = ["disable", "enable", "retire", "unretire"];

/// HTTP client for the backend's JSON envelope API.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
}

impl RestClient {
    /// Creates a client rooted at `base_url`, e.g. `http://localhost:9000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_data(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let response = self.http.get(self.url(path)).query(query).send().await?;
        Self::unwrap_envelope(response).await
    }

    async fn post_data(&self, path: &str, body: &Value) -> Result<Value> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::unwrap_envelope(response).await
    }

    async fn delete_data(&self, path: &str) -> Result<Value> {
        let response = self.http.delete(self.url(path)).send().await?;
        Self::unwrap_envelope(response).await
    }

    /// Unwraps the `{data: ...}` success envelope. Failures are translated
    /// from the `{error: {message}}` envelope, falling back to the status
    /// text when the body is not JSON.
    async fn unwrap_envelope(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let fallback = || status.canonical_reason().unwrap_or("request failed").to_string();
            let message = match response.json::<Value>().await {
                Ok(body) => body
                    .pointer("/error/message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(fallback),
                Err(err) => {
                    warn!("error reply body was not JSON: {}", err);
                    fallback()
                }
            };
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }
        let mut body: Value = response.json().await?;
        match body.get_mut("data") {
            Some(data) => Ok(data.take()),
            None => Err(Error::Reply("expected a data envelope".to_string())),
        }
    }

    /// Runs a paged search against `<plural>/search`.
    pub async fn search_entities<T>(
        &self,
        plural: &str,
        params: &SearchParams,
        parse: fn(Value) -> Result<T>,
    ) -> Result<PagedReply<T>> {
        let data = self
            .get_data(&format!("{}/search", plural), &params.query_pairs())
            .await?;
        let items = data
            .get("items")
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| Error::Reply("expected a paged reply".to_string()))?;
        let entities = items.into_iter().map(parse).collect::<Result<Vec<T>>>()?;
        Ok(PagedReply {
            search_params: params.clone(),
            entities,
            offset: field_u64(&data, "offset")?,
            total: field_u64(&data, "total")?,
            max_pages: field_u64(&data, "maxPages")?,
        })
    }

    /// Retrieves one entity by slug.
    pub async fn get_entity<T>(
        &self,
        plural: &str,
        slug: &str,
        parse: fn(Value) -> Result<T>,
    ) -> Result<T> {
        let data = self.get_data(&format!("{}/{}", plural, slug), &[]).await?;
        parse(data)
    }
}

fn field_u64(data: &Value, name: &str) -> Result<u64> {
    data.get(name)
        .and_then(Value::as_u64)
        .ok_or_else(|| Error::Reply(format!("expected a numeric {} field", name)))
}

/// Service for the `/api/studies` endpoints.
#[derive(Debug, Clone)]
pub struct StudyService {
    client: RestClient,
}

impl StudyService {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    /// Retrieves the counts of all studies indexed by state.
    pub async fn counts(&self) -> Result<StudyCounts> {
        let data = self.client.get_data("studies/counts", &[]).await?;
        parse_study_counts(data)
    }

    /// Adds a new study.
    pub async fn add(&self, to_add: &StudyToAdd) -> Result<Study> {
        let body = serde_json::to_value(to_add)?;
        let data = self.client.post_data("studies/", &body).await?;
        parse_study(data)
    }

    /// Updates one attribute of a study, echoing the study's version.
    ///
    /// `attribute` is `name`, `description`, or `state`; for `state` the
    /// value must be one of the allowed transition actions. Anything else is
    /// a programmer error and fails immediately, before any network call.
    pub async fn update(&self, study: &Study, attribute: &str, value: &str) -> Result<Study> {
        let path = match attribute {
            "name" => format!("studies/name/{}", study.id),
            "description" => format!("studies/description/{}", study.id),
            "state" => {
                if !STATE_ACTIONS.contains(&value) {
                    return Err(Error::InvalidStateAction(value.to_string()));
                }
                format!("studies/{}/{}", value, study.id)
            }
            _ => return Err(Error::InvalidAttribute(attribute.to_string())),
        };

        let mut body = serde_json::json!({ "expectedVersion": study.version });
        if attribute != "state" {
            body[attribute] = Value::String(value.to_string());
        }
        let data = self.client.post_data(&path, &body).await?;
        parse_study(data)
    }

    /// Adds a new annotation type to the study, or updates an existing one.
    pub async fn add_or_update_annotation_type(
        &self,
        study: &Study,
        annotation_type: &AnnotationType,
    ) -> Result<Study> {
        let mut body = serde_json::to_value(annotation_type)?;
        body["expectedVersion"] = Value::from(study.version);

        let mut path = format!("studies/pannottype/{}", study.id);
        if let Some(id) = &annotation_type.id {
            path = format!("{}/{}", path, id);
        }
        let data = self.client.post_data(&path, &body).await?;
        parse_study(data)
    }

    /// Removes an annotation type from the study.
    pub async fn remove_annotation_type(
        &self,
        study: &Study,
        annotation_type_id: &str,
    ) -> Result<Study> {
        let path = format!(
            "studies/pannottype/{}/{}/{}",
            study.id, study.version, annotation_type_id
        );
        let data = self.client.delete_data(&path).await?;
        parse_study(data)
    }

    /// Whether the study has the definitions needed to be enabled.
    pub async fn enable_allowed(&self, study_id: &str) -> Result<bool> {
        let data = self
            .client
            .get_data(&format!("studies/enableAllowed/{}", study_id), &[])
            .await?;
        data.as_bool()
            .ok_or_else(|| Error::Reply("expected a boolean reply".to_string()))
    }
}

#[async_trait]
impl EntityApi<Study> for StudyService {
    async fn search(&self, params: &SearchParams) -> Result<PagedReply<Study>> {
        self.client.search_entities("studies", params, parse_study).await
    }

    async fn get(&self, slug: &str) -> Result<Study> {
        self.client.get_entity("studies", slug, parse_study).await
    }
}

/// Service for the `/api/users` endpoints.
#[derive(Debug, Clone)]
pub struct UserService {
    client: RestClient,
}

impl UserService {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EntityApi<User> for UserService {
    async fn search(&self, params: &SearchParams) -> Result<PagedReply<User>> {
        self.client.search_entities("users", params, parse_user).await
    }

    async fn get(&self, slug: &str) -> Result<User> {
        self.client.get_entity("users", slug, parse_user).await
    }
}

/// Service for the `/api/shipments` endpoints.
#[derive(Debug, Clone)]
pub struct ShipmentService {
    client: RestClient,
}

impl ShipmentService {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EntityApi<Shipment> for ShipmentService {
    async fn search(&self, params: &SearchParams) -> Result<PagedReply<Shipment>> {
        self.client
            .search_entities("shipments", params, parse_shipment)
            .await
    }

    async fn get(&self, slug: &str) -> Result<Shipment> {
        self.client.get_entity("shipments", slug, parse_shipment).await
    }
}
