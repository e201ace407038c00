//! 会话解码模块
//!
//! 从后端签发的 JWT 中读取 `sub` 与 `role` claim。
//!
//! 注意：客户端 **不校验签名**。解码出来的 claim 只用于界面上的路由与展示，
//! 真正的鉴权由后端在每次请求时完成。

use crate::Role;
use base64::Engine;
use base64::alphabet::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::Deserialize;

/// base64url，解码时接受有无 `=` 填充两种形式
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("token must have three dot-separated segments, found {0}")]
    Malformed(usize),
    #[error("token payload is not valid base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("token payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("token has no subject claim")]
    MissingSubject,
}

/// 已登录用户的身份
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub subject: String,
    pub role: Role,
}

impl Session {
    pub fn new(subject: impl Into<String>, role: Role) -> Self {
        Self {
            subject: subject.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Deserialize)]
struct Claims {
    #[serde(default)]
    sub: Option<String>,
    /// 任意 JSON 值，非字符串时按普通用户处理
    #[serde(default)]
    role: Option<serde_json::Value>,
}

/// 解码 token 的 payload 段
///
/// `role` 缺失或不是 `"admin"` 时一律视为普通用户。
pub fn decode_token(token: &str) -> Result<Session, DecodeError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(DecodeError::Malformed(segments.len()));
    }

    let payload = PAYLOAD_ENGINE.decode(segments[1])?;
    let claims: Claims = serde_json::from_slice(&payload)?;

    let subject = claims
        .sub
        .filter(|s| !s.is_empty())
        .ok_or(DecodeError::MissingSubject)?;
    let role = match claims.role {
        Some(serde_json::Value::String(r)) if r == "admin" => Role::Admin,
        _ => Role::User,
    };

    Ok(Session { subject, role })
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};

    fn token_with_payload(payload: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload);
        format!("{}.{}.signature", header, body)
    }

    #[test]
    fn test_decode_reads_subject_and_role() {
        let token = token_with_payload(r#"{"sub":"alice","role":"admin"}"#);
        let session = decode_token(&token).unwrap();
        assert_eq!(session.subject, "alice");
        assert_eq!(session.role, Role::Admin);
        assert!(session.is_admin());
    }

    #[test]
    fn test_role_defaults_to_user() {
        let token = token_with_payload(r#"{"sub":"bob"}"#);
        let session = decode_token(&token).unwrap();
        assert_eq!(session, Session::new("bob", Role::User));
    }

    #[test]
    fn test_unknown_or_null_role_is_user() {
        let token = token_with_payload(r#"{"sub":"bob","role":"moderator"}"#);
        assert_eq!(decode_token(&token).unwrap().role, Role::User);

        let token = token_with_payload(r#"{"sub":"bob","role":null}"#);
        assert_eq!(decode_token(&token).unwrap().role, Role::User);
    }

    #[test]
    fn test_extra_claims_ignored() {
        let token = token_with_payload(r#"{"sub":"carol","role":"user","exp":1700000000}"#);
        assert_eq!(decode_token(&token).unwrap().subject, "carol");
    }

    #[test]
    fn test_padded_payload_accepted() {
        let header = STANDARD.encode("{}");
        // 长度不是 3 的倍数，编码后带 `=`
        let body = base64::engine::general_purpose::URL_SAFE.encode(r#"{"sub":"dan"}"#);
        assert!(body.ends_with('='));
        let token = format!("{}.{}.sig", header, body);
        assert_eq!(decode_token(&token).unwrap().subject, "dan");
    }

    #[test]
    fn test_malformed_structure() {
        assert!(matches!(decode_token(""), Err(DecodeError::Malformed(1))));
        assert!(matches!(
            decode_token("only.two"),
            Err(DecodeError::Malformed(2))
        ));
        assert!(matches!(
            decode_token("a.b.c.d"),
            Err(DecodeError::Malformed(4))
        ));
    }

    #[test]
    fn test_bad_payload() {
        assert!(matches!(
            decode_token("head.!!!not-base64!!!.sig"),
            Err(DecodeError::Base64(_))
        ));

        let not_json = URL_SAFE_NO_PAD.encode("hello");
        assert!(matches!(
            decode_token(&format!("h.{}.s", not_json)),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn test_missing_subject() {
        let token = token_with_payload(r#"{"role":"admin"}"#);
        assert!(matches!(
            decode_token(&token),
            Err(DecodeError::MissingSubject)
        ));

        let token = token_with_payload(r#"{"sub":""}"#);
        assert!(matches!(
            decode_token(&token),
            Err(DecodeError::MissingSubject)
        ));
    }

    #[test]
    fn test_non_string_role_falls_back_to_user() {
        for payload in [
            r#"{"sub":"bob","role":1}"#,
            r#"{"sub":"bob","role":null}"#,
            r#"{"sub":"bob","role":["admin"]}"#,
        ] {
            let session = decode_token(&token_with_payload(payload)).unwrap();
            assert_eq!(session, Session::new("bob", Role::User));
        }
    }
}
