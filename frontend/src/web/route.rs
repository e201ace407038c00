//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、每个路由需要的权限，以及守卫的判定函数。

use std::fmt::Display;
use supportbot_shared::Session;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AppRoute {
    /// 根路径，只做重定向
    Root,
    /// 登录页面 (默认路由)
    #[default]
    Login,
    Signup,
    PasswordReset,
    /// 聊天 (需要登录)
    Chat,
    /// 管理面板 (需要管理员)
    Admin,
    /// 页面未找到
    NotFound,
}

/// 访问一个路由所需的能力
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// 仅限未登录用户，已登录时重定向
    Public,
    /// 需要任意会话
    Session,
    /// 需要管理员角色
    Admin,
    /// 所有人都可以看到，不做重定向
    Open,
}

/// 守卫的判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Render(AppRoute),
    Redirect(AppRoute),
}

impl GuardOutcome {
    /// 最终落地的路由
    pub fn route(&self) -> AppRoute {
        match self {
            GuardOutcome::Render(r) | GuardOutcome::Redirect(r) => *r,
        }
    }
}

impl AppRoute {
    #[cfg(test)]
    pub const ALL: [AppRoute; 7] = [
        AppRoute::Root,
        AppRoute::Login,
        AppRoute::Signup,
        AppRoute::PasswordReset,
        AppRoute::Chat,
        AppRoute::Admin,
        AppRoute::NotFound,
    ];

    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or("/");
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::Root,
            "/login" => Self::Login,
            "/signup" => Self::Signup,
            "/password-reset" => Self::PasswordReset,
            "/chat" => Self::Chat,
            "/admin" => Self::Admin,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Root => "/",
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::PasswordReset => "/password-reset",
            Self::Chat => "/chat",
            Self::Admin => "/admin",
            Self::NotFound => "/404",
        }
    }

    /// **核心守卫表：定义每个路由需要的能力**
    pub fn access(&self) -> Access {
        match self {
            Self::Login | Self::Signup | Self::PasswordReset => Access::Public,
            Self::Chat => Access::Session,
            Self::Admin => Access::Admin,
            Self::Root | Self::NotFound => Access::Open,
        }
    }

    /// 未登录访问受保护页面时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 已登录用户的默认页面
    pub fn default_authenticated() -> Self {
        Self::Chat
    }

    /// 登录/注册成功后进入的页面：管理员进管理面板，其余进聊天
    pub fn landing_for(session: &Session) -> Self {
        if session.is_admin() {
            Self::Admin
        } else {
            Self::Chat
        }
    }
}

/// 守卫判定：纯函数，每次导航都重新计算
pub fn guard(target: AppRoute, session: Option<&Session>) -> GuardOutcome {
    if target == AppRoute::Root {
        return GuardOutcome::Redirect(match session {
            Some(_) => AppRoute::default_authenticated(),
            None => AppRoute::auth_failure_redirect(),
        });
    }

    match (target.access(), session) {
        (Access::Public, Some(_)) => GuardOutcome::Redirect(AppRoute::default_authenticated()),
        (Access::Session | Access::Admin, None) => {
            GuardOutcome::Redirect(AppRoute::auth_failure_redirect())
        }
        (Access::Admin, Some(s)) if !s.is_admin() => {
            GuardOutcome::Redirect(AppRoute::default_authenticated())
        }
        _ => GuardOutcome::Render(target),
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use supportbot_shared::Role;

    fn user() -> Session {
        Session::new("bob", Role::User)
    }

    fn admin() -> Session {
        Session::new("alice", Role::Admin)
    }

    #[test]
    fn test_path_round_trip() {
        for route in AppRoute::ALL {
            if route == AppRoute::NotFound {
                continue;
            }
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
        assert_eq!(AppRoute::from_path("/chat/"), AppRoute::Chat);
        assert_eq!(AppRoute::from_path("/login?next=chat"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path(""), AppRoute::Root);
    }

    #[test]
    fn test_anonymous_table() {
        use AppRoute::*;
        let expected = [
            (Root, GuardOutcome::Redirect(Login)),
            (Login, GuardOutcome::Render(Login)),
            (Signup, GuardOutcome::Render(Signup)),
            (PasswordReset, GuardOutcome::Render(PasswordReset)),
            (Chat, GuardOutcome::Redirect(Login)),
            (Admin, GuardOutcome::Redirect(Login)),
            (NotFound, GuardOutcome::Render(NotFound)),
        ];
        for (route, outcome) in expected {
            assert_eq!(guard(route, None), outcome, "route {}", route);
        }
    }

    #[test]
    fn test_user_table() {
        use AppRoute::*;
        let session = user();
        let expected = [
            (Root, GuardOutcome::Redirect(Chat)),
            (Login, GuardOutcome::Redirect(Chat)),
            (Signup, GuardOutcome::Redirect(Chat)),
            (PasswordReset, GuardOutcome::Redirect(Chat)),
            (Chat, GuardOutcome::Render(Chat)),
            (Admin, GuardOutcome::Redirect(Chat)),
            (NotFound, GuardOutcome::Render(NotFound)),
        ];
        for (route, outcome) in expected {
            assert_eq!(guard(route, Some(&session)), outcome, "route {}", route);
        }
    }

    #[test]
    fn test_admin_table() {
        use AppRoute::*;
        let session = admin();
        let expected = [
            (Root, GuardOutcome::Redirect(Chat)),
            (Login, GuardOutcome::Redirect(Chat)),
            (Signup, GuardOutcome::Redirect(Chat)),
            (PasswordReset, GuardOutcome::Redirect(Chat)),
            (Chat, GuardOutcome::Render(Chat)),
            (Admin, GuardOutcome::Render(Admin)),
            (NotFound, GuardOutcome::Render(NotFound)),
        ];
        for (route, outcome) in expected {
            assert_eq!(guard(route, Some(&session)), outcome, "route {}", route);
        }
    }

    #[test]
    fn test_guard_is_idempotent() {
        for session in [None, Some(user()), Some(admin())] {
            for route in AppRoute::ALL {
                let landed = guard(route, session.as_ref()).route();
                assert_eq!(
                    guard(landed, session.as_ref()),
                    GuardOutcome::Render(landed),
                    "{} did not settle",
                    route
                );
            }
        }
    }

    #[test]
    fn test_landing_depends_on_role() {
        assert_eq!(AppRoute::landing_for(&admin()), AppRoute::Admin);
        assert_eq!(AppRoute::landing_for(&user()), AppRoute::Chat);
    }
}
