//! Fetch API transport with timeout support.

use dfs_console_core::{ClientConfig, HttpRequest, HttpResponse, Transport, TransportError};
use js_sys::{Array, Promise};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response, Url};

// =============================================================================
// Promise Racing Utilities
// =============================================================================

/// Result of a promise race with timeout.
#[derive(Debug)]
enum RaceResult {
    /// The promise completed before timeout.
    Completed(JsValue),
    /// Timeout occurred before promise completed.
    TimedOut,
    /// Promise rejected with an error.
    Error(String),
}

/// Race a promise against a timeout using `Promise.race`.
///
/// The timeout promise resolves to `undefined`, which is how a timeout is
/// told apart from a completed fetch.
async fn race_with_timeout(promise: Promise, timeout_ms: i32) -> RaceResult {
    let Some(window) = web_sys::window() else {
        return RaceResult::Error("Window not available".to_string());
    };

    let timeout_promise = Promise::new(&mut |resolve, _| {
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout_ms);
    });

    let race_array = Array::new();
    race_array.push(&promise);
    race_array.push(&timeout_promise);
    let race_promise = Promise::race(&race_array);

    match JsFuture::from(race_promise).await {
        Ok(result) if result.is_undefined() => RaceResult::TimedOut,
        Ok(result) => RaceResult::Completed(result),
        Err(e) => RaceResult::Error(js_error_message(&e)),
    }
}

fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| "Unknown error".to_string())
}

// =============================================================================
// FetchTransport
// =============================================================================

/// [`Transport`] over `window.fetch`.
#[derive(Clone, Debug)]
pub struct FetchTransport {
    config: ClientConfig,
}

impl FetchTransport {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    fn build(&self, request: &HttpRequest) -> Result<Request, TransportError> {
        let url = Url::new(&self.config.url(&request.path))
            .map_err(|e| TransportError::RequestBuild(js_error_message(&e)))?;
        let params = url.search_params();
        for (key, value) in &request.query {
            params.append(key, value);
        }

        let headers = Headers::new().map_err(|e| TransportError::RequestBuild(js_error_message(&e)))?;
        if let Some(bearer) = &request.bearer {
            headers
                .set("Authorization", bearer)
                .map_err(|e| TransportError::RequestBuild(js_error_message(&e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method(request.method.as_str());
        opts.set_mode(RequestMode::Cors);
        if let Some(body) = &request.body {
            headers
                .set("Content-Type", "application/json")
                .map_err(|e| TransportError::RequestBuild(js_error_message(&e)))?;
            opts.set_body(&JsValue::from_str(body));
        }
        opts.set_headers(&headers);

        Request::new_with_str_and_init(&url.href(), &opts)
            .map_err(|e| TransportError::RequestBuild(js_error_message(&e)))
    }
}

impl Transport for FetchTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let window = web_sys::window()
            .ok_or_else(|| TransportError::Network("Browser window not available".to_string()))?;
        let js_request = self.build(&request)?;
        let fetch_promise = window.fetch_with_request(&js_request);

        match race_with_timeout(fetch_promise, self.config.timeout_ms as i32).await {
            RaceResult::TimedOut => Err(TransportError::Timeout),
            RaceResult::Error(msg) => Err(TransportError::Network(msg)),
            RaceResult::Completed(result) => {
                let resp: Response = result
                    .dyn_into()
                    .map_err(|_| TransportError::Network("Invalid response object".to_string()))?;
                let status = resp.status();

                let text_promise = resp
                    .text()
                    .map_err(|e| TransportError::Network(js_error_message(&e)))?;
                let body = JsFuture::from(text_promise)
                    .await
                    .map_err(|e| TransportError::Network(js_error_message(&e)))?
                    .as_string()
                    .unwrap_or_default();

                Ok(HttpResponse { status, body })
            }
        }
    }
}
