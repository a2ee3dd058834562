//! Session management for an ongoing chat.
//!
//! A [`Session`] holds the ordered turn sequence of one chat run. Callers
//! append turns with [`Session::append`], call [`Session::request`] to obtain
//! an HTTP request covering the whole history, and feed the raw body of a
//! successful response back through [`Session::handle_response`].
//!
//! The session never touches the network itself; which turns exist and how a
//! response changes them is therefore fully testable with canned JSON.
//!
//! ## State management
//!
//! The completion API does not persist any state remotely, so the session is
//! the single source of truth for the transcript. Every session owns its own
//! history vector; [`Session::reset`] installs a fresh empty one rather than
//! pointing back at any shared default.
//!
//! ## Example
//!
//! ```no_run
//! use parley::{Api, openai::Role, session::Session};
//!
//! let api = Api::new("sk-...");
//! let mut session = Session::new();
//!
//! // Seed the transcript.
//! session.append(Role::System, "You are a helpful assistant.");
//! session.append(Role::User, "Hello!");
//!
//! // Build a request covering the whole history.
//! let http_request = session.request(&api);
//!
//! // ... send http_request and get response_json ...
//! # let response_json = r#"{"id":"chatcmpl-1","object":"chat.completion","created":1700000000,"model":"gpt-3.5-turbo","choices":[{"index":0,"message":{"role":"assistant","content":"Hello!"},"finish_reason":"stop"}],"usage":{"prompt_tokens":10,"completion_tokens":5,"total_tokens":15}}"#;
//!
//! // Handle the response.
//! match session.handle_response(response_json) {
//!     Ok(reply) => println!("{reply}"),
//!     Err(err) => eprintln!("Error: {err}"),
//! }
//! ```

use crate::{
    Api, ChatRequestBuilder, Error,
    http_request::HttpRequest,
    openai::{self, Message, Role},
};

/// A session that manages the conversation history.
#[derive(Debug)]
pub struct Session {
    /// The session's turn sequence.
    messages: im::Vector<Message>,
}

impl Session {
    /// Creates a new session with an empty history.
    pub fn new() -> Self {
        Self {
            messages: im::Vector::new(),
        }
    }

    /// Appends one turn with the given role to the history.
    ///
    /// Content is taken as-is; appending empty content is allowed.
    pub fn append<S: Into<String>>(&mut self, role: Role, text: S) {
        self.messages.push_back(Message::from_text(role, text));
    }

    /// Builds an HTTP request covering the entire history.
    ///
    /// The history is not modified; a failed exchange can simply be retried
    /// by building another request.
    pub fn request(&self, api: &Api) -> HttpRequest {
        ChatRequestBuilder::new()
            .set_messages(self.messages.clone())
            .build(api)
    }

    /// Handles the body of a successful response from the API.
    ///
    /// On a response with at least one choice, the first choice's message is
    /// appended to the history and its content returned for display. A
    /// response without choices, or one that does not parse, leaves the
    /// history untouched.
    pub fn handle_response(&mut self, response_json: &str) -> Result<String, Error> {
        let response = openai::deserialize_response(response_json)?;

        let Some(choice) = response.choices.into_iter().next() else {
            return Err(Error::NoChoices);
        };

        let content = choice.message.content.clone();
        self.messages.push_back(choice.message);

        Ok(content)
    }

    /// Replaces the history with a fresh empty sequence.
    pub fn reset(&mut self) {
        self.messages = im::Vector::new();
    }

    /// Returns the turn sequence.
    pub fn history(&self) -> &im::Vector<Message> {
        &self.messages
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Session;
    use crate::openai::Role;

    fn response_with_one_choice(content: &str) -> String {
        format!(
            r#"{{
  "id": "chatcmpl-1",
  "object": "chat.completion",
  "created": 1700000000,
  "model": "gpt-3.5-turbo",
  "choices": [
    {{
      "index": 0,
      "message": {{"role": "assistant", "content": "{content}"}},
      "finish_reason": "stop"
    }}
  ],
  "usage": {{"prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2}}
}}"#
        )
    }

    #[test]
    fn test_appends_keep_order_and_roles() {
        let mut session = Session::new();

        session.append(Role::User, "one");
        session.append(Role::Assistant, "two");
        session.append(Role::System, "three");

        let history = session.history();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[0].content, "one");
        assert_eq!(history[1].role, Role::Assistant);
        assert_eq!(history[1].content, "two");
        assert_eq!(history[2].role, Role::System);
        assert_eq!(history[2].content, "three");
    }

    #[test]
    fn test_append_allows_empty_content() {
        let mut session = Session::new();

        session.append(Role::User, "");

        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].content, "");
    }

    #[test]
    fn test_reset_always_empties_the_history() {
        let mut session = Session::new();
        session.reset();
        assert!(session.history().is_empty());

        session.append(Role::User, "hello");
        session.append(Role::Assistant, "hi");
        session.reset();
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_request_covers_whole_history_without_mutating_it() {
        let api = crate::Api::new("test-api-key");
        let mut session = Session::new();

        session.append(Role::System, "be brief");
        session.append(Role::User, "hello");

        let http_request = session.request(&api);

        assert!(http_request.body.contains("\"be brief\""));
        assert!(http_request.body.contains("\"hello\""));
        // Building a request appends nothing.
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_response_with_one_choice_appends_assistant_turn() {
        let mut session = Session::new();
        session.append(Role::User, "say hi");

        let reply = session
            .handle_response(&response_with_one_choice("hi"))
            .expect("should accept the response");

        assert_eq!(reply, "hi");
        assert_eq!(session.history().len(), 2);
        assert_eq!(session.history()[1].role, Role::Assistant);
        assert_eq!(session.history()[1].content, "hi");
    }

    #[test]
    fn test_response_without_choices_leaves_history_unchanged() {
        let mut session = Session::new();
        session.append(Role::User, "say hi");

        let json = r#"{
  "id": "chatcmpl-empty",
  "object": "chat.completion",
  "created": 1700000000,
  "model": "gpt-3.5-turbo",
  "choices": [],
  "usage": {"prompt_tokens": 1, "completion_tokens": 0, "total_tokens": 1}
}"#;
        let result = session.handle_response(json);

        assert!(matches!(result, Err(crate::Error::NoChoices)));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_malformed_response_leaves_history_unchanged() {
        let mut session = Session::new();
        session.append(Role::User, "say hi");

        let result = session.handle_response("<html>502 Bad Gateway</html>");

        assert!(matches!(result, Err(crate::Error::Serde(_))));
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_sessions_do_not_share_state() {
        let mut first = Session::new();
        let second = Session::new();

        first.append(Role::User, "only in the first");

        assert_eq!(first.history().len(), 1);
        assert!(second.history().is_empty());
    }
}
