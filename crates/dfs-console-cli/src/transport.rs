//! `reqwest` implementation of the core [`Transport`].

use std::time::Duration;

use dfs_console_core::{ClientConfig, HttpRequest, HttpResponse, Method, Transport, TransportError};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

/// Async HTTP transport for the command line.
///
/// The request ceiling from [`ClientConfig::timeout_ms`] is applied to the
/// whole exchange, body included.
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ReqwestTransport {
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(u64::from(config.timeout_ms)))
            .build()
            .map_err(|e| TransportError::RequestBuild(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

fn method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_builder() {
        TransportError::RequestBuild(e.to_string())
    } else {
        TransportError::Network(e.to_string())
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.config.url(&request.path);
        let mut builder = self.http.request(method(request.method), url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(bearer) = &request.bearer {
            builder = builder.header(AUTHORIZATION, bearer);
        }
        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(classify)?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_methods_map_one_to_one() {
        assert_eq!(method(Method::Get), reqwest::Method::GET);
        assert_eq!(method(Method::Post), reqwest::Method::POST);
        assert_eq!(method(Method::Put), reqwest::Method::PUT);
        assert_eq!(method(Method::Delete), reqwest::Method::DELETE);
    }

    #[test]
    fn test_new_keeps_config() {
        let config = ClientConfig {
            api_base: "http://namenode:8081".to_string(),
            file_server_base: "http://files:8081".to_string(),
            timeout_ms: 1500,
        };
        let transport = ReqwestTransport::new(config.clone()).unwrap();
        assert_eq!(transport.config(), &config);
    }
}
