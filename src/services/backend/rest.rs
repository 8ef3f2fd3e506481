//! Hosted backend spoken to over a PostgREST-style HTTP API.
//!
//! Table rows live under `/rest/v1/{table}` and objects under
//! `/storage/v1/object/{bucket}/{path}`. The service pushes no changes to
//! this client, so notifications are fanned out locally after our own writes.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde_json::Value;

use super::{
    into_object, stamp_new_row, Backend, ChangeCallback, ChangeEvent, ChangeFeed, ChangeKind,
    Collection, Subscription, ID_FIELD, SINGLETON_ID,
};

pub struct RestBackend {
    client: Client,
    base_url: String,
    api_key: String,
    feed: ChangeFeed,
}

impl RestBackend {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .context("Failed to build backend HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            feed: ChangeFeed::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `/rest/v1/{table}` with an already-encoded query string
    pub(crate) fn table_url(&self, collection: Collection, query: &[(&str, String)]) -> String {
        let mut url = format!("{}/rest/v1/{}", self.base_url, collection.table_name());
        if !query.is_empty() {
            let pairs: Vec<String> = query
                .iter()
                .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
                .collect();
            url.push('?');
            url.push_str(&pairs.join("&"));
        }
        url
    }

    pub(crate) fn fetch_url(&self, collection: Collection, order_by: Option<&str>) -> String {
        let mut query = vec![("select", "*".to_string())];
        if let Some(field) = order_by {
            query.push(("order", format!("{}.asc", field)));
        }
        self.table_url(collection, &query)
    }

    pub(crate) fn row_url(&self, collection: Collection, id: &str) -> String {
        self.table_url(collection, &[(ID_FIELD, format!("eq.{}", id))])
    }

    pub(crate) fn object_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, encode_path(path))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn notify(&self, collection: Collection, kind: ChangeKind, id: Option<String>) {
        self.feed.publish(ChangeEvent {
            collection,
            kind,
            id,
        });
    }
}

/// Percent-encode each segment of an object path, keeping the slashes.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn check(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(anyhow!("{} failed with HTTP status {}: {}", what, status, body))
}

fn rows_of(response: Response, what: &str) -> Result<Vec<Value>> {
    check(response, what)?
        .json::<Vec<Value>>()
        .with_context(|| format!("{}: unexpected response body", what))
}

impl Backend for RestBackend {
    fn fetch_all(&self, collection: Collection, order_by: Option<&'static str>) -> Result<Vec<Value>> {
        let what = format!("Fetch {}", collection);
        let response = self
            .authorized(self.client.get(self.fetch_url(collection, order_by)))
            .send()
            .with_context(|| format!("Network error during {}", what))?;
        rows_of(response, &what)
    }

    fn insert(&self, collection: Collection, rows: Vec<Value>) -> Result<Vec<Value>> {
        let rows = rows
            .into_iter()
            .map(|row| {
                let mut body = into_object(row)?;
                stamp_new_row(&mut body);
                Ok(Value::Object(body))
            })
            .collect::<Result<Vec<_>>>()?;

        let what = format!("Insert into {}", collection);
        let response = self
            .authorized(self.client.post(self.table_url(collection, &[])))
            .header("Prefer", "return=representation")
            .json(&rows)
            .send()
            .with_context(|| format!("Network error during {}", what))?;
        let stored = rows_of(response, &what)?;

        for row in &stored {
            self.notify(collection, ChangeKind::Insert, super::row_id(row));
        }
        Ok(stored)
    }

    fn update(&self, collection: Collection, id: &str, patch: Value) -> Result<Vec<Value>> {
        let what = format!("Update {} row {}", collection, id);
        let response = self
            .authorized(self.client.patch(self.row_url(collection, id)))
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()
            .with_context(|| format!("Network error during {}", what))?;
        let updated = rows_of(response, &what)?;

        if !updated.is_empty() {
            self.notify(collection, ChangeKind::Update, Some(id.to_string()));
        }
        Ok(updated)
    }

    fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let what = format!("Delete {} row {}", collection, id);
        let response = self
            .authorized(self.client.delete(self.row_url(collection, id)))
            .send()
            .with_context(|| format!("Network error during {}", what))?;
        check(response, &what)?;

        self.notify(collection, ChangeKind::Delete, Some(id.to_string()));
        Ok(())
    }

    fn upsert_singleton(&self, collection: Collection, row: Value) -> Result<()> {
        let mut body = into_object(row)?;
        body.insert(ID_FIELD.to_string(), Value::String(SINGLETON_ID.to_string()));

        let what = format!("Upsert {}", collection);
        let response = self
            .authorized(self.client.post(self.table_url(collection, &[])))
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&Value::Object(body))
            .send()
            .with_context(|| format!("Network error during {}", what))?;
        check(response, &what)?;

        self.notify(collection, ChangeKind::Update, Some(SINGLETON_ID.to_string()));
        Ok(())
    }

    fn subscribe(&self, collection: Collection, callback: ChangeCallback) -> Subscription {
        self.feed.subscribe(collection, callback)
    }

    fn upload(&self, bucket: &str, path: &str, bytes: &[u8]) -> Result<()> {
        let what = format!("Upload {}/{}", bucket, path);
        let response = self
            .authorized(self.client.post(self.object_url(bucket, path)))
            .header("x-upsert", "false")
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes.to_vec())
            .send()
            .with_context(|| format!("Network error during {}", what))?;
        check(response, &what)?;
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            bucket,
            encode_path(path)
        )
    }
}
