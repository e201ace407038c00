use crate::{Book, BookUsage, ChatMessage, Role, UserActivity};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Credential an endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// No `Authorization` header.
    None,
    /// Bearer token of any signed-in account.
    Bearer,
    /// Bearer token; the backend additionally requires the admin role.
    Admin,
}

impl Auth {
    pub fn requires_token(&self) -> bool {
        !matches!(self, Auth::None)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest: Serialize + DeserializeOwned {
    /// The response type returned by this request.
    type Response: Serialize + DeserializeOwned;
    /// The URL path.
    const PATH: &'static str;
    /// The HTTP method. `Get` requests are sent without a body.
    const METHOD: HttpMethod;
    /// The credential the endpoint expects.
    const AUTH: Auth;
}

/// Path of the multipart upload endpoint. Not an [`ApiRequest`] because its
/// body is form data rather than JSON.
pub const UPLOAD_BOOKS_PATH: &str = "/admin/books/upload";

// =========================================================
// Response Definitions
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Generic `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetTicket {
    pub token: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistory {
    pub chat_history: Vec<ChatMessage>,
    /// Latest assistant answer, only present on send.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

// =========================================================
// Request Definitions
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = TokenResponse;
    const PATH: &'static str = "/login";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTH: Auth = Auth::None;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl ApiRequest for SignupRequest {
    type Response = TokenResponse;
    const PATH: &'static str = "/signup";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTH: Auth = Auth::None;
}

/// Ask the backend to issue a password reset token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetTokenRequest {
    pub username: String,
}

impl ApiRequest for ResetTokenRequest {
    type Response = ResetTicket;
    const PATH: &'static str = "/password-reset-request";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTH: Auth = Auth::None;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetRequest {
    pub username: String,
    pub token: String,
    pub new_password: String,
}

impl ApiRequest for PasswordResetRequest {
    type Response = MessageResponse;
    const PATH: &'static str = "/password-reset";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTH: Auth = Auth::None;
}

/// Read the caller's chat history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatHistoryRequest;

impl ApiRequest for ChatHistoryRequest {
    type Response = ChatHistory;
    const PATH: &'static str = "/chat";
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTH: Auth = Auth::Bearer;
}

/// Send a message; the response carries the full history, not a delta.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendChatRequest {
    pub user_input: String,
}

impl ApiRequest for SendChatRequest {
    type Response = ChatHistory;
    const PATH: &'static str = "/chat";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTH: Auth = Auth::Bearer;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListBooksRequest;

impl ApiRequest for ListBooksRequest {
    type Response = Vec<Book>;
    const PATH: &'static str = "/admin/books";
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTH: Auth = Auth::Admin;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleBookRequest {
    pub id: i64,
    pub active: bool,
}

impl ApiRequest for ToggleBookRequest {
    type Response = MessageResponse;
    const PATH: &'static str = "/admin/books/toggle";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTH: Auth = Auth::Admin;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBookRequest {
    pub id: i64,
}

impl ApiRequest for DeleteBookRequest {
    type Response = MessageResponse;
    const PATH: &'static str = "/admin/books/delete";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTH: Auth = Auth::Admin;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAnalyticsRequest;

impl ApiRequest for UserAnalyticsRequest {
    type Response = Vec<UserActivity>;
    const PATH: &'static str = "/admin/analytics/users";
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTH: Auth = Auth::Admin;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAnalyticsRequest;

impl ApiRequest for BookAnalyticsRequest {
    type Response = Vec<BookUsage>;
    const PATH: &'static str = "/admin/analytics/books";
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTH: Auth = Auth::Admin;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ChatRole;

    #[test]
    fn test_signup_serializes_role_lowercase() {
        let req = SignupRequest {
            username: "ana".to_string(),
            password: "pw".to_string(),
            role: Role::User,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["role"], "user");
    }

    #[test]
    fn test_token_response_defaults_token_type() {
        let resp: TokenResponse = serde_json::from_str(r#"{"access_token":"abc"}"#).unwrap();
        assert_eq!(resp.access_token, "abc");
        assert_eq!(resp.token_type, "bearer");
    }

    #[test]
    fn test_chat_history_parses_send_reply() {
        let body = r#"{
            "response": "hello",
            "chat_history": [
                {"role": "user", "content": "hi"},
                {"role": "assistant", "content": "hello"}
            ]
        }"#;
        let history: ChatHistory = serde_json::from_str(body).unwrap();
        assert_eq!(history.chat_history.len(), 2);
        assert_eq!(history.chat_history[1].role, ChatRole::Assistant);
        assert_eq!(history.response.as_deref(), Some("hello"));
    }

    #[test]
    fn test_endpoint_table() {
        assert_eq!(ListBooksRequest::PATH, "/admin/books");
        assert_eq!(ChatHistoryRequest::METHOD, HttpMethod::Get);
        assert_eq!(SendChatRequest::METHOD, HttpMethod::Post);
        assert!(!LoginRequest::AUTH.requires_token());
        assert!(SendChatRequest::AUTH.requires_token());
        assert_eq!(DeleteBookRequest::AUTH, Auth::Admin);
    }
}
