//! SupportBot 前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义与守卫（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 会话状态管理
//! - `api`: 后端接口网关
//! - `components`: UI 组件层

mod api;
mod auth;
mod config;
mod error;
mod token;
mod validation;
mod components {
    pub mod admin_dashboard;
    pub mod chat;
    pub mod login;
    pub mod navbar;
    pub mod notification;
    pub mod password_reset;
    pub mod signup;
}

use crate::api::{AppApi, SupportApi};
use crate::auth::{AuthContext, init_auth};
use crate::components::admin_dashboard::AdminDashboardPage;
use crate::components::chat::ChatPage;
use crate::components::login::LoginPage;
use crate::components::navbar::Navbar;
use crate::components::password_reset::PasswordResetPage;
use crate::components::signup::SignupPage;
use crate::config::AppConfig;

use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装（fetch、LocalStorage、History、console）。
pub(crate) mod web {
    pub mod console;
    pub mod file;
    mod http;
    pub mod route;
    pub mod router;
    mod storage;

    #[cfg(test)]
    pub use http::MockHttpClient;
    pub use http::{FetchClient, HttpBody, HttpClient, HttpError, HttpRequest, HttpResponse};
    pub use storage::BrowserTokenStore;
}

use web::route::AppRoute;
use web::router::{Link, Router, RouterOutlet};
use web::{BrowserTokenStore, FetchClient};

/// 按构建配置安装 console 日志
pub fn init_logging() {
    web::console::init(AppConfig::from_build_env().log_level);
}

#[component]
fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="text-center space-y-4">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl">"Page not found"</p>
                <Link to=AppRoute::Root class="btn btn-primary">"Go home"</Link>
            </div>
        </div>
    }
}

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Signup => view! { <SignupPage /> }.into_any(),
        AppRoute::PasswordReset => view! { <PasswordResetPage /> }.into_any(),
        AppRoute::Chat => view! { <ChatPage /> }.into_any(),
        AppRoute::Admin => view! { <AdminDashboardPage /> }.into_any(),
        // 守卫总会把根路径重定向走
        AppRoute::Root => ().into_any(),
        AppRoute::NotFound => view! { <NotFoundPage /> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::from_build_env();
    log::debug!("[App] backend at {}", config.api_base);

    // 1. 创建 API 网关
    let api: AppApi = SupportApi::new(
        config.api_base,
        FetchClient,
        BrowserTokenStore::new(config.token_key),
    );
    provide_context(api.clone());

    // 2. 创建认证上下文，并从 LocalStorage 恢复会话
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);
    init_auth(&auth_ctx, &api);

    // 3. 获取会话信号，用于注入路由服务
    let session = auth_ctx.session_signal();

    view! {
        <Router session=session>
            <Navbar />
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
