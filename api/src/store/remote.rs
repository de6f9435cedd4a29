use super::{PostStore, StoreError, StoreKind, SubscriberStore, select_related};
use crate::{
    config::RemoteConfig,
    models::{Post, Subscriber},
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, header};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Client for the hosted data store's PostgREST interface.
///
/// Constructed once at startup and handed to the services; it is never
/// reached through global state.
pub struct RemoteStore {
    client: Client,
    base_url: String,
    api_key: String,
    posts_table: String,
    subscribers_table: String,
}

impl RemoteStore {
    pub fn new(config: &RemoteConfig) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            posts_table: config.posts_table.clone(),
            subscribers_table: config.subscribers_table.clone(),
        })
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
    }

    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, StoreError> {
        let request = self.authorized(self.client.get(self.endpoint(table)).query(query));
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(StoreError::Status { status, body });
        }

        Ok(response.json::<Vec<T>>().await?)
    }
}

/// PostgREST array literal: `{"a","b"}`.
fn array_literal(values: &[String]) -> String {
    let quoted: Vec<String> = values
        .iter()
        .map(|v| format!("\"{}\"", v.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("{{{}}}", quoted.join(","))
}

#[async_trait]
impl PostStore for RemoteStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Remote
    }

    async fn find_post(&self, id: &str) -> Result<Option<Post>, StoreError> {
        let rows: Vec<Post> = self
            .fetch_rows(
                &self.posts_table,
                &[
                    ("select", "*".to_string()),
                    ("id", format!("eq.{id}")),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        self.fetch_rows(&self.posts_table, &[("select", "*".to_string())])
            .await
    }

    async fn related_posts(
        &self,
        post: &Post,
        exclude_id: &str,
        limit: usize,
    ) -> Result<Vec<Post>, StoreError> {
        if post.categories.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let mut query = vec![
            ("select", "*".to_string()),
            ("categories", format!("ov.{}", array_literal(&post.categories))),
            ("id", format!("neq.{}", post.id)),
            ("limit", limit.to_string()),
        ];
        if exclude_id != post.id {
            query.push(("id", format!("neq.{exclude_id}")));
        }

        let rows: Vec<Post> = self.fetch_rows(&self.posts_table, &query).await?;
        debug!("Remote store returned {} related rows for {}", rows.len(), post.id);

        // Cap and exclusion hold regardless of what the backend returned.
        Ok(select_related(rows, post, exclude_id, limit))
    }
}

#[async_trait]
impl SubscriberStore for RemoteStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Remote
    }

    async fn find_subscriber(&self, email: &str) -> Result<Option<Subscriber>, StoreError> {
        let rows: Vec<Subscriber> = self
            .fetch_rows(
                &self.subscribers_table,
                &[
                    ("select", "*".to_string()),
                    ("email", format!("eq.{email}")),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_subscriber(&self, subscriber: &Subscriber) -> Result<(), StoreError> {
        let request = self
            .authorized(self.client.post(self.endpoint(&self.subscribers_table)))
            .header("Prefer", "return=minimal")
            .json(subscriber);
        let response = request.send().await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::CONFLICT => Err(StoreError::Conflict),
            status => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                Err(StoreError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}
