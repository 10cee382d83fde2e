// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use std::marker::PhantomData;
use std::time::Duration;
use stockroom_app::{DriverReviewInput, RemoteCollection, RemoteError, Resource};
use tracing::debug;
use url::Url;

/// Blocking JSON client for the store's REST API.
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: Url,
    timeout: Duration,
    token: Option<String>,
    http: HttpClient,
}

impl RestClient {
    pub fn new(base_url: &str, timeout: Duration, token: Option<String>) -> Result<Self> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            bail!("server.base_url must not be empty");
        }
        let base_url = Url::parse(trimmed)
            .with_context(|| format!("server.base_url {trimmed:?} is not a valid URL"))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            bail!(
                "server.base_url must use http or https, got {:?}",
                base_url.scheme()
            );
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            token: token.filter(|token| !token.trim().is_empty()),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn collection<R: Resource>(&self) -> RestCollection<R> {
        RestCollection {
            client: self.clone(),
            _record: PhantomData,
        }
    }

    /// Rates the driver of a delivered order.
    pub fn submit_review(&self, review: &DriverReviewInput) -> Result<(), RemoteError> {
        let request = self
            .request(Method::POST, &["review", "driver"])
            .json(review);
        self.send(request).map(drop)
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.endpoint(segments);
        debug!(%method, %url, "sending request");
        let request = self.http.request(method, url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        let response = request
            .send()
            .map_err(|error| connection_error(self.base_url.as_str(), &error))?;
        let status = response.status();
        debug!(status = status.as_u16(), "response received");
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }
        Ok(response)
    }
}

/// One REST collection bound to a record type.
#[derive(Debug, Clone)]
pub struct RestCollection<R> {
    client: RestClient,
    _record: PhantomData<fn() -> R>,
}

impl<R: Resource> RemoteCollection<R> for RestCollection<R> {
    fn list(&mut self, filter: Option<&str>) -> Result<Vec<R>, RemoteError> {
        let mut request = self.client.request(Method::GET, &[R::COLLECTION]);
        if let Some(filter) = filter {
            request = request.query(&[("filter", filter)]);
        }
        let response = self.client.send(request)?;
        let status = response.status();
        response.json::<Vec<R>>().map_err(|error| {
            RemoteError::rejected(
                status.as_u16(),
                format!("response body is not a valid {} list: {error}", R::PLURAL),
            )
        })
    }

    fn create(&mut self, draft: &R::Draft) -> Result<(), RemoteError> {
        let request = self
            .client
            .request(Method::POST, &[R::COLLECTION])
            .json(draft);
        self.client.send(request).map(drop)
    }

    fn update(&mut self, id: &R::Id, draft: &R::Draft) -> Result<(), RemoteError> {
        let id = id.to_string();
        let request = self
            .client
            .request(Method::PUT, &[R::COLLECTION, &id])
            .json(draft);
        self.client.send(request).map(drop)
    }

    fn delete(&mut self, id: &R::Id) -> Result<(), RemoteError> {
        let id = id.to_string();
        let request = self.client.request(Method::DELETE, &[R::COLLECTION, &id]);
        self.client.send(request).map(drop)
    }
}

fn connection_error(base_url: &str, error: &reqwest::Error) -> RemoteError {
    if error.is_timeout() {
        return RemoteError::Unavailable(format!("{base_url} (request timed out)"));
    }
    RemoteError::Unavailable(format!("{base_url} ({error})"))
}

fn clean_error_response(status: StatusCode, body: &str) -> RemoteError {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(message) = parsed.message.or(parsed.error)
        && !message.trim().is_empty()
    {
        return RemoteError::rejected(status.as_u16(), message);
    }

    let body = body.trim();
    if !body.is_empty() && body.len() < 100 && !body.contains('{') && !body.contains('<') {
        return RemoteError::rejected(status.as_u16(), body);
    }

    RemoteError::rejected(status.as_u16(), format!("server returned {}", status.as_u16()))
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    message: Option<String>,
    error: Option<String>,
}
