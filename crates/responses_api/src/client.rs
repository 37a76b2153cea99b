use chat_provider::{CancelSignal, ChatCallbacks, ChatMessage, ClassifiedError};
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde_json::Value;

use crate::cancel::{await_or_cancel, is_cancelled};
use crate::config::ResponsesConfig;
use crate::error::{classify_http_error, classify_request_error};
use crate::headers::build_headers;
use crate::payload::{build_request_body, is_streaming_body, ChatOptions};
use crate::response::finish_response;
use crate::stream::{consume_stream, StreamOutcome};
use crate::url::normalize_responses_url;

/// Client for one Responses API server.
///
/// Methods take `&self`; concurrent requests share the connection pool but
/// no per-request state.
#[derive(Debug)]
pub struct ResponsesClient {
    http: Client,
    config: ResponsesConfig,
}

impl ResponsesClient {
    pub fn new(config: ResponsesConfig) -> Result<Self, ClassifiedError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|error| classify_request_error(&error))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ResponsesConfig {
        &self.config
    }

    pub fn normalized_endpoint(&self) -> String {
        normalize_responses_url(&self.config.base_url)
    }

    pub fn build_headers(&self, streaming: bool) -> Result<HeaderMap, ClassifiedError> {
        let mut out = HeaderMap::new();
        for (key, value) in build_headers(&self.config, streaming) {
            out.insert(
                HeaderName::from_bytes(key.as_bytes()).map_err(|_| {
                    ClassifiedError::unknown(format!("invalid header key: {key}"))
                })?,
                HeaderValue::from_str(&value).map_err(|_| {
                    ClassifiedError::unknown(format!("invalid header value for {key}"))
                })?,
            );
        }
        Ok(out)
    }

    /// Prepare the POST for an already-built JSON body.
    pub fn build_request(&self, body: &Value) -> Result<reqwest::RequestBuilder, ClassifiedError> {
        let headers = self.build_headers(is_streaming_body(body))?;
        Ok(self
            .http
            .post(self.normalized_endpoint())
            .headers(headers)
            .json(body))
    }

    /// Send one chat request and deliver its progress to `callbacks`.
    ///
    /// Returns the full assistant text on completion and `None` when the
    /// request was cancelled. Failures are reported once through
    /// `on_error` and then returned; cancellation is never reported.
    pub async fn send<C>(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
        conversation_id: Option<&str>,
        cancellation: Option<&CancelSignal>,
        callbacks: &mut C,
    ) -> Result<Option<String>, ClassifiedError>
    where
        C: ChatCallbacks + ?Sized,
    {
        let result = self
            .execute(messages, options, conversation_id, cancellation, callbacks)
            .await;
        settle(result, callbacks)
    }

    async fn execute<C>(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
        conversation_id: Option<&str>,
        cancellation: Option<&CancelSignal>,
        callbacks: &mut C,
    ) -> Result<Option<String>, ClassifiedError>
    where
        C: ChatCallbacks + ?Sized,
    {
        let body = build_request_body(messages, options, conversation_id)?;
        let streaming = is_streaming_body(&body);
        let request = self.build_request(&body)?;

        tracing::debug!(
            endpoint = %self.normalized_endpoint(),
            streaming,
            messages = messages.len(),
            "sending responses request"
        );

        if is_cancelled(cancellation) {
            return Ok(None);
        }
        let response = await_or_cancel(request.send(), cancellation)
            .await?
            .map_err(|error| classify_request_error(&error))?;

        let status = response.status();
        if !status.is_success() {
            let body = await_or_cancel(response.text(), cancellation)
                .await?
                .unwrap_or_default();
            return Err(classify_http_error(status, &body));
        }

        if streaming {
            let chunks = response
                .bytes_stream()
                .map(|chunk| chunk.map_err(|error| classify_request_error(&error)));
            return match consume_stream(chunks, callbacks, cancellation).await? {
                StreamOutcome::Completed(completion) => Ok(Some(completion.content)),
                StreamOutcome::Cancelled => Ok(None),
            };
        }

        let body = await_or_cancel(response.text(), cancellation)
            .await?
            .map_err(|error| classify_request_error(&error))?;
        if is_cancelled(cancellation) {
            return Ok(None);
        }
        finish_response(&body, callbacks).map(|completion| Some(completion.content))
    }
}

/// Funnel a request result to the caller.
///
/// Cancellation resolves to `Ok(None)` silently; any other error is handed to
/// `on_error` exactly once and returned.
pub fn settle<T, C>(
    result: Result<Option<T>, ClassifiedError>,
    callbacks: &mut C,
) -> Result<Option<T>, ClassifiedError>
where
    C: ChatCallbacks + ?Sized,
{
    match result {
        Err(error) if error.is_aborted() => {
            tracing::debug!("request cancelled");
            Ok(None)
        }
        Err(error) => {
            tracing::debug!(kind = %error.kind(), status = ?error.status(), %error, "request failed");
            callbacks.on_error(&error);
            Err(error)
        }
        Ok(value) => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use chat_provider::{ChatCallbacks, ClassifiedError};

    use super::settle;

    #[derive(Default)]
    struct Errors(Vec<ClassifiedError>);

    impl ChatCallbacks for Errors {
        fn on_error(&mut self, error: &ClassifiedError) {
            self.0.push(error.clone());
        }
    }

    #[test]
    fn settle_swallows_cancellation() {
        let mut errors = Errors::default();
        let result: Result<Option<String>, _> =
            settle(Err(ClassifiedError::aborted()), &mut errors);

        assert_eq!(result, Ok(None));
        assert!(errors.0.is_empty());
    }

    #[test]
    fn settle_reports_failures_once() {
        let mut errors = Errors::default();
        let result: Result<Option<String>, _> =
            settle(Err(ClassifiedError::network("down")), &mut errors);

        assert_eq!(result, Err(ClassifiedError::network("down")));
        assert_eq!(errors.0, vec![ClassifiedError::network("down")]);
    }

    #[test]
    fn settle_passes_success_through_without_callbacks() {
        let mut errors = Errors::default();
        let result = settle(Ok(Some("hi".to_owned())), &mut errors);

        assert_eq!(result, Ok(Some("hi".to_owned())));
        assert!(errors.0.is_empty());
    }
}
