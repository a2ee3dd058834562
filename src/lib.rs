#![doc = include_str!("../README.md")]

pub mod command;
pub mod http_request;
pub mod openai;
pub mod session;

use std::sync::Arc;

use crate::{http_request::HttpRequest, openai::ChatBody};

/// A chat completion API configuration.
#[derive(Debug)]
pub struct Api {
    /// The bearer token sent with every request.
    api_key: Arc<str>,
    /// The endpoint URL requests are sent to.
    endpoint: Arc<str>,
    /// The default model to use for requests.
    default_model: Arc<str>,
    /// The default sampling temperature.
    default_temperature: f64,
}

impl Api {
    /// Creates a new API instance.
    ///
    /// Requires a valid API key for the configured endpoint.
    pub fn new<S: Into<Arc<str>>>(api_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: Arc::from(openai::DEFAULT_ENDPOINT),
            default_model: Arc::from(openai::DEFAULT_MODEL),
            default_temperature: openai::DEFAULT_TEMPERATURE,
        }
    }

    /// Sets the endpoint URL.
    ///
    /// If not set, [`openai::DEFAULT_ENDPOINT`] will be used. Any server
    /// speaking the `chat/completions` wire format is acceptable.
    pub fn endpoint<S: Into<Arc<str>>>(mut self, endpoint: S) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the default model for requests.
    ///
    /// If not set, [`openai::DEFAULT_MODEL`] will be used.
    pub fn default_model<S: Into<Arc<str>>>(mut self, model: S) -> Self {
        self.default_model = model.into();
        self
    }

    /// Sets the default sampling temperature for requests.
    ///
    /// If not set, [`openai::DEFAULT_TEMPERATURE`] will be used.
    pub fn default_temperature(mut self, temperature: f64) -> Self {
        self.default_temperature = temperature;
        self
    }

    /// Creates the required headers for any API request.
    fn create_default_headers(&self) -> Vec<(&'static str, Arc<str>)> {
        vec![
            ("content-type", Arc::from("application/json")),
            (
                "authorization",
                Arc::from(format!("Bearer {}", self.api_key)),
            ),
        ]
    }
}

/// Builder for a request to the chat completions endpoint.
#[derive(Debug)]
pub struct ChatRequestBuilder {
    /// The model to use for the request.
    ///
    /// If none is provided, the default model will be used.
    model: Option<String>,
    /// The sampling temperature for the request.
    ///
    /// If none is provided, the default temperature will be used.
    temperature: Option<f64>,
    /// The messages to send.
    messages: im::Vector<openai::Message>,
}

impl Default for ChatRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatRequestBuilder {
    /// Creates a new chat request builder.
    pub fn new() -> Self {
        Self {
            model: None,
            temperature: None,
            messages: im::Vector::new(),
        }
    }

    /// Sets the model for the request.
    pub fn model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the sampling temperature for the request.
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Constructs and appends a message to the request.
    pub fn push_message<S: Into<String>>(mut self, role: openai::Role, text: S) -> Self {
        self.messages
            .push_back(openai::Message::from_text(role, text));
        self
    }

    /// Replaces all messages in the request with the given messages.
    pub fn set_messages(mut self, messages: im::Vector<openai::Message>) -> Self {
        self.messages = messages;
        self
    }

    /// Builds the HTTP request.
    pub fn build(&self, api: &Api) -> HttpRequest {
        let body = {
            let model = self.model.as_deref().unwrap_or(&api.default_model);

            let body = ChatBody {
                model,
                messages: &self.messages,
                temperature: self.temperature.unwrap_or(api.default_temperature),
            };

            serde_json::to_string(&body).expect("failed to serialize chat body")
        };

        HttpRequest {
            url: api.endpoint.to_string(),
            method: "POST",
            headers: api.create_default_headers(),
            body,
        }
    }
}

/// An error interpreting a completion response.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The response body was not a well-formed chat completion.
    #[error("malformed response: {0}")]
    Serde(#[from] serde_json::Error),
    /// The response was well-formed but contained no choices.
    #[error("no response from assistant")]
    NoChoices,
}
