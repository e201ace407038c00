//! 认证模块
//!
//! 管理会话状态，与路由系统解耦：路由服务只读取注入的会话信号。
//!
//! 会话只有这个模块会写入（`init_auth` / `login` / `signup` / `logout`），
//! 视图通过 `AuthContext` 读取。token 中的 claim 在客户端不校验签名，
//! 只用于界面上的路由与展示，后端在每次请求时重新鉴权。

use crate::api::AppApi;
use crate::error::{ApiError, ApiResult};
use crate::token::TokenStore;
use leptos::prelude::*;
use supportbot_shared::{Role, Session, decode_token};

// =========================================================
// 会话状态机 (与 Leptos 无关，便于测试)
// =========================================================

/// 启动时从 TokenStore 恢复会话
///
/// token 无法解码时将其删除，保持未登录状态。
pub(crate) fn restore_session(store: &impl TokenStore) -> Option<Session> {
    let token = store.get()?;
    match decode_token(&token) {
        Ok(session) => {
            log::info!("[Auth] restored session for '{}'", session.subject);
            Some(session)
        }
        Err(e) => {
            log::warn!("[Auth] discarding stored token: {}", e);
            store.clear();
            None
        }
    }
}

/// 登录/注册成功后建立会话：先解码，成功才持久化
pub(crate) fn open_session(store: &impl TokenStore, token: &str) -> ApiResult<Session> {
    match decode_token(token) {
        Ok(session) => {
            store.set(token);
            log::info!(
                "[Auth] signed in as '{}' ({})",
                session.subject,
                session.role.as_str()
            );
            Ok(session)
        }
        Err(e) => {
            log::warn!("[Auth] backend issued an undecodable token: {}", e);
            store.clear();
            Err(ApiError::from(e))
        }
    }
}

/// 无条件清除 token
pub(crate) fn close_session(store: &impl TokenStore) {
    store.clear();
    log::info!("[Auth] signed out");
}

// =========================================================
// Leptos 上下文
// =========================================================

/// 认证状态
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    pub session: Option<Session>,
}

/// 认证上下文
///
/// 只对外暴露读信号；写入口集中在本模块的函数中。
#[derive(Clone, Copy)]
pub struct AuthContext {
    state: ReadSignal<AuthState>,
    set_state: WriteSignal<AuthState>,
}

impl AuthContext {
    /// 创建新的认证上下文
    pub fn new() -> Self {
        let (state, set_state) = signal(AuthState::default());
        Self { state, set_state }
    }

    /// 当前会话（响应式）
    pub fn session(&self) -> Option<Session> {
        self.state.get().session
    }

    /// 获取会话信号（用于路由服务注入）
    pub fn session_signal(&self) -> Signal<Option<Session>> {
        let state = self.state;
        Signal::derive(move || state.get().session)
    }

    fn replace(&self, session: Option<Session>) {
        self.set_state.set(AuthState { session });
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 初始化认证状态（应用启动时调用一次）
pub fn init_auth(ctx: &AuthContext, api: &AppApi) {
    ctx.replace(restore_session(api.tokens()));
}

/// 登录并建立会话
pub async fn login(ctx: &AuthContext, api: &AppApi, username: &str, password: &str) -> ApiResult<Session> {
    let token = api.login(username, password).await?;
    let session = open_session(api.tokens(), &token)?;
    ctx.replace(Some(session.clone()));
    Ok(session)
}

/// 注册并建立会话
pub async fn signup(
    ctx: &AuthContext,
    api: &AppApi,
    username: &str,
    password: &str,
    role: Role,
) -> ApiResult<Session> {
    let token = api.signup(username, password, role).await?;
    let session = open_session(api.tokens(), &token)?;
    ctx.replace(Some(session.clone()));
    Ok(session)
}

/// 注销并清除状态
///
/// 导航由路由服务的会话监听自动处理。
pub fn logout(ctx: &AuthContext, api: &AppApi) {
    close_session(api.tokens());
    ctx.replace(None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::MemoryTokenStore;
    use base64::Engine;

    fn jwt(payload: &str) -> String {
        let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        format!(
            "{}.{}.sig",
            engine.encode(r#"{"alg":"HS256"}"#),
            engine.encode(payload)
        )
    }

    #[test]
    fn test_restore_without_token_is_anonymous() {
        let store = MemoryTokenStore::new();
        assert_eq!(restore_session(&store), None);
    }

    #[test]
    fn test_restore_valid_token() {
        let store = MemoryTokenStore::with_token(&jwt(r#"{"sub":"alice","role":"admin"}"#));
        let session = restore_session(&store).unwrap();
        assert_eq!(session, Session::new("alice", Role::Admin));
        assert!(store.get().is_some(), "valid token stays stored");
    }

    #[test]
    fn test_restore_malformed_token_clears_it() {
        let store = MemoryTokenStore::with_token("definitely-not-a-jwt");
        assert_eq!(restore_session(&store), None);
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_open_session_persists_token() {
        let store = MemoryTokenStore::new();
        let token = jwt(r#"{"sub":"bob"}"#);
        let session = open_session(&store, &token).unwrap();
        assert_eq!(session.role, Role::User);
        assert_eq!(store.get(), Some(token));
    }

    #[test]
    fn test_open_session_rejects_bad_token() {
        let store = MemoryTokenStore::with_token(&jwt(r#"{"sub":"old"}"#));
        let err = open_session(&store, "garbage").unwrap_err();
        assert!(matches!(err, ApiError::InvalidToken(_)));
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_close_session_clears_for_any_role() {
        for payload in [r#"{"sub":"u"}"#, r#"{"sub":"a","role":"admin"}"#] {
            let store = MemoryTokenStore::with_token(&jwt(payload));
            close_session(&store);
            assert_eq!(store.get(), None);
            assert_eq!(restore_session(&store), None);
        }
    }
}
