use crate::error::{ApiError, ApiResult};
use crate::token::TokenStore;
use crate::web::{BrowserTokenStore, FetchClient, HttpBody, HttpClient, HttpRequest};
use supportbot_shared::protocol::{
    ApiRequest, BookAnalyticsRequest, ChatHistoryRequest, DeleteBookRequest, HttpMethod,
    ListBooksRequest, LoginRequest, MessageResponse, PasswordResetRequest, ResetTicket,
    ResetTokenRequest, SendChatRequest, SignupRequest, ToggleBookRequest, TokenResponse,
    UPLOAD_BOOKS_PATH, UserAnalyticsRequest,
};
use supportbot_shared::{
    BEARER_PREFIX, Book, BookUsage, ChatMessage, HEADER_AUTHORIZATION, Role, UPLOAD_FIELD_NAME,
    UploadPart, UserActivity,
};

/// 浏览器中使用的具体网关类型
pub type AppApi = SupportApi<FetchClient, BrowserTokenStore>;

/// 从 Context 获取 API 网关
pub fn use_api() -> AppApi {
    leptos::prelude::use_context::<AppApi>().expect("AppApi should be provided")
}

/// API 网关
///
/// 每个方法对应后端的一个接口，一次请求一次响应，不重试、不缓存。
/// 需要鉴权的接口会从 `TokenStore` 读取 token 并附加 `Authorization: Bearer` 头。
#[derive(Clone, Debug, PartialEq)]
pub struct SupportApi<C, S> {
    base_url: String,
    client: C,
    tokens: S,
}

impl<C: HttpClient, S: TokenStore> SupportApi<C, S> {
    pub fn new(base_url: impl Into<String>, client: C, tokens: S) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client,
            tokens,
        }
    }

    pub fn tokens(&self) -> &S {
        &self.tokens
    }

    #[cfg(test)]
    pub fn client(&self) -> &C {
        &self.client
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn authorize(&self, req: HttpRequest) -> ApiResult<HttpRequest> {
        let token = self.tokens.get().ok_or(ApiError::MissingToken)?;
        Ok(req.with_header(
            HEADER_AUTHORIZATION,
            &format!("{}{}", BEARER_PREFIX, token),
        ))
    }

    async fn dispatch<T: serde::de::DeserializeOwned>(&self, req: HttpRequest) -> ApiResult<T> {
        let method = req.method;
        let url = req.url.clone();
        log::debug!("[Api] {:?} {}", method, url);

        let resp = self.client.send(req).await.map_err(|e| {
            log::warn!("[Api] {:?} {} failed: {}", method, url, e);
            ApiError::from(e)
        })?;

        if !resp.ok() {
            let err = ApiError::from_response(&resp);
            log::warn!("[Api] {:?} {} -> {:?}: {}", method, url, err.status(), err);
            return Err(err);
        }

        Ok(resp.json::<T>()?)
    }

    /// 按 `ApiRequest` 描述的元数据发送一个 JSON 请求
    pub async fn call<R: ApiRequest>(&self, payload: &R) -> ApiResult<R::Response> {
        let mut req = HttpRequest::new(&self.url(R::PATH), R::METHOD);
        if R::AUTH.requires_token() {
            req = self.authorize(req)?;
        }
        if R::METHOD != HttpMethod::Get {
            req = req.with_body(HttpBody::Json(serde_json::to_string(payload)?));
        }
        self.dispatch(req).await
    }

    // --- 无需鉴权 ---

    pub async fn login(&self, username: &str, password: &str) -> ApiResult<String> {
        let req = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let TokenResponse { access_token, .. } = self.call(&req).await?;
        Ok(access_token)
    }

    pub async fn signup(&self, username: &str, password: &str, role: Role) -> ApiResult<String> {
        let req = SignupRequest {
            username: username.to_string(),
            password: password.to_string(),
            role,
        };
        let TokenResponse { access_token, .. } = self.call(&req).await?;
        Ok(access_token)
    }

    /// 申请重置令牌（后端目前直接在响应中返回令牌）
    pub async fn request_password_reset(&self, username: &str) -> ApiResult<ResetTicket> {
        self.call(&ResetTokenRequest {
            username: username.to_string(),
        })
        .await
    }

    pub async fn reset_password(
        &self,
        username: &str,
        token: &str,
        new_password: &str,
    ) -> ApiResult<MessageResponse> {
        self.call(&PasswordResetRequest {
            username: username.to_string(),
            token: token.to_string(),
            new_password: new_password.to_string(),
        })
        .await
    }

    // --- 聊天 ---

    pub async fn chat_history(&self) -> ApiResult<Vec<ChatMessage>> {
        Ok(self.call(&ChatHistoryRequest).await?.chat_history)
    }

    /// 发送消息，返回服务端的完整历史
    pub async fn send_chat(&self, text: &str) -> ApiResult<Vec<ChatMessage>> {
        let req = SendChatRequest {
            user_input: text.to_string(),
        };
        Ok(self.call(&req).await?.chat_history)
    }

    // --- 管理 ---

    pub async fn list_books(&self) -> ApiResult<Vec<Book>> {
        self.call(&ListBooksRequest).await
    }

    pub async fn upload_books(&self, parts: Vec<UploadPart>) -> ApiResult<String> {
        let req = HttpRequest::new(&self.url(UPLOAD_BOOKS_PATH), HttpMethod::Post);
        let req = self.authorize(req)?.with_body(HttpBody::Multipart {
            field: UPLOAD_FIELD_NAME,
            parts,
        });
        let resp: MessageResponse = self.dispatch(req).await?;
        Ok(resp.message)
    }

    pub async fn toggle_book(&self, id: i64, active: bool) -> ApiResult<String> {
        Ok(self.call(&ToggleBookRequest { id, active }).await?.message)
    }

    pub async fn delete_book(&self, id: i64) -> ApiResult<String> {
        Ok(self.call(&DeleteBookRequest { id }).await?.message)
    }

    pub async fn user_analytics(&self) -> ApiResult<Vec<UserActivity>> {
        self.call(&UserAnalyticsRequest).await
    }

    pub async fn book_analytics(&self) -> ApiResult<Vec<BookUsage>> {
        self.call(&BookAnalyticsRequest).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::MemoryTokenStore;
    use crate::web::{HttpError, MockHttpClient};
    use serde_json::json;
    use supportbot_shared::ChatRole;

    const BASE: &str = "http://backend.test";

    fn api(tokens: MemoryTokenStore) -> SupportApi<MockHttpClient, MemoryTokenStore> {
        SupportApi::new(format!("{}/", BASE), MockHttpClient::new(), tokens)
    }

    fn url(path: &str) -> String {
        format!("{}{}", BASE, path)
    }

    #[tokio::test]
    async fn test_login_sends_credentials_without_auth_header() {
        let api = api(MemoryTokenStore::with_token("stale"));
        api.client().mock_response(
            HttpMethod::Post,
            &url("/login"),
            200,
            json!({"access_token": "jwt-1", "token_type": "bearer"}),
        );

        let token = api.login("alice", "secret").await.unwrap();
        assert_eq!(token, "jwt-1");

        let req = api.client().last_request().unwrap();
        assert_eq!(req.url, url("/login"));
        assert_eq!(req.header("Authorization"), None);
        let Some(HttpBody::Json(body)) = req.body else {
            panic!("login must send a JSON body");
        };
        let body: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body, json!({"username": "alice", "password": "secret"}));
    }

    #[tokio::test]
    async fn test_signup_sends_role() {
        let api = api(MemoryTokenStore::new());
        api.client().mock_response(
            HttpMethod::Post,
            &url("/signup"),
            200,
            json!({"access_token": "jwt-2"}),
        );

        assert_eq!(api.signup("bob", "pw", Role::User).await.unwrap(), "jwt-2");
        let Some(HttpBody::Json(body)) = api.client().last_request().unwrap().body else {
            panic!("signup must send a JSON body");
        };
        assert!(body.contains(r#""role":"user""#));
    }

    #[tokio::test]
    async fn test_authenticated_call_attaches_bearer() {
        let api = api(MemoryTokenStore::with_token("jwt-3"));
        api.client().mock_response(
            HttpMethod::Get,
            &url("/chat"),
            200,
            json!({"chat_history": [{"role": "user", "content": "hi"}]}),
        );

        let history = api.chat_history().await.unwrap();
        assert_eq!(history, vec![ChatMessage::user("hi")]);

        let req = api.client().last_request().unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.header("authorization"), Some("Bearer jwt-3"));
        assert!(req.body.is_none(), "GET requests carry no body");
    }

    #[tokio::test]
    async fn test_missing_token_fails_without_request() {
        let api = api(MemoryTokenStore::new());
        let err = api.list_books().await.unwrap_err();
        assert_eq!(err, ApiError::MissingToken);
        assert_eq!(api.client().request_count(), 0);
    }

    #[tokio::test]
    async fn test_send_chat_returns_full_history() {
        let api = api(MemoryTokenStore::with_token("jwt"));
        api.client().mock_response(
            HttpMethod::Post,
            &url("/chat"),
            200,
            json!({
                "response": "Hello!",
                "chat_history": [
                    {"role": "user", "content": "earlier"},
                    {"role": "assistant", "content": "reply"},
                    {"role": "user", "content": "hi"},
                    {"role": "assistant", "content": "Hello!"}
                ]
            }),
        );

        let history = api.send_chat("hi").await.unwrap();
        assert_eq!(history.len(), 4);
        assert_eq!(history[3].role, ChatRole::Assistant);

        let Some(HttpBody::Json(body)) = api.client().last_request().unwrap().body else {
            panic!("chat send must send a JSON body");
        };
        assert_eq!(body, r#"{"user_input":"hi"}"#);
    }

    #[tokio::test]
    async fn test_error_detail_and_rate_limit() {
        let api = api(MemoryTokenStore::new());
        api.client().mock_response(
            HttpMethod::Post,
            &url("/login"),
            429,
            json!({"error": "Rate limit exceeded: 5 per 1 minute"}),
        );
        assert!(api.login("a", "b").await.unwrap_err().is_rate_limited());

        api.client().mock_response(
            HttpMethod::Post,
            &url("/password-reset-request"),
            404,
            json!({"detail": "User not Found"}),
        );
        let err = api.request_password_reset("ghost").await.unwrap_err();
        assert_eq!(err.to_string(), "User not Found");
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_retried() {
        let api = api(MemoryTokenStore::with_token("jwt"));
        api.client().mock_failure(
            HttpMethod::Get,
            &url("/admin/analytics/users"),
            HttpError::NetworkError("connection refused".into()),
        );

        let err = api.user_analytics().await.unwrap_err();
        assert_eq!(err, ApiError::Network("connection refused".into()));
        assert_eq!(api.client().request_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_success_body() {
        let api = api(MemoryTokenStore::with_token("jwt"));
        api.client()
            .mock_response(HttpMethod::Get, &url("/chat"), 200, json!({"history": []}));
        assert!(matches!(
            api.chat_history().await.unwrap_err(),
            ApiError::InvalidResponse(_)
        ));
    }

    #[tokio::test]
    async fn test_upload_sends_one_part_per_file() {
        let api = api(MemoryTokenStore::with_token("jwt"));
        api.client().mock_response(
            HttpMethod::Post,
            &url("/admin/books/upload"),
            200,
            json!({"message": "Book 'a.pdf, b.pdf' uploaded successfully"}),
        );

        let parts = vec![
            UploadPart {
                file_name: "a.pdf".into(),
                bytes: b"%PDF-a".to_vec(),
            },
            UploadPart {
                file_name: "b.pdf".into(),
                bytes: b"%PDF-b".to_vec(),
            },
        ];
        let message = api.upload_books(parts.clone()).await.unwrap();
        assert_eq!(message, "Book 'a.pdf, b.pdf' uploaded successfully");

        let req = api.client().last_request().unwrap();
        assert_eq!(req.header("Authorization"), Some("Bearer jwt"));
        assert_eq!(
            req.body,
            Some(HttpBody::Multipart {
                field: "files",
                parts,
            })
        );
    }

    #[tokio::test]
    async fn test_admin_mutations_and_analytics() {
        let api = api(MemoryTokenStore::with_token("jwt"));
        api.client().mock_response(
            HttpMethod::Post,
            &url("/admin/books/toggle"),
            200,
            json!({"message": "Book 'a.pdf' toggled to active"}),
        );
        api.client().mock_response(
            HttpMethod::Post,
            &url("/admin/books/delete"),
            200,
            json!({"message": "Book 'a.pdf' deleted successfully"}),
        );
        api.client().mock_response(
            HttpMethod::Get,
            &url("/admin/analytics/books"),
            200,
            json!([{"name": "a.pdf", "usage_count": 7}]),
        );

        assert_eq!(
            api.toggle_book(1, true).await.unwrap(),
            "Book 'a.pdf' toggled to active"
        );
        let Some(HttpBody::Json(body)) = api.client().last_request().unwrap().body else {
            panic!("toggle must send a JSON body");
        };
        assert_eq!(body, r#"{"id":1,"active":true}"#);

        assert!(api.delete_book(1).await.unwrap().contains("deleted"));
        let usage = api.book_analytics().await.unwrap();
        assert_eq!(usage[0].usage_count, 7);
    }
}
