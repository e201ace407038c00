use serde::{Deserialize, Serialize};

pub mod protocol;
pub mod session;

pub use session::{DecodeError, Session, decode_token};

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const BEARER_PREFIX: &str = "Bearer ";
/// 上传接口的 multipart 字段名
pub const UPLOAD_FIELD_NAME: &str = "files";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 账户角色，来自 token 的 `role` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

/// 聊天消息的发送方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == ChatRole::User
    }
}

/// 知识库中的一本书（PDF），由服务端持有
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub name: String,
    pub active: bool,
}

/// 单个用户的活动统计
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserActivity {
    pub username: String,
    pub logins: u64,
    pub chats: u64,
    pub password_resets: u64,
}

impl UserActivity {
    /// 三项之和，超出 `u64` 时取最大值
    pub fn total(&self) -> u64 {
        self.logins
            .saturating_add(self.chats)
            .saturating_add(self.password_resets)
    }
}

/// 单本书在对话中被引用的次数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookUsage {
    pub name: String,
    pub usage_count: u64,
}

/// 待上传的文件内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPart {
    pub file_name: String,
    pub bytes: Vec<u8>,
}
