//! 表单校验：在发出任何请求之前拦截缺失字段

/// 所有字段都非空（忽略首尾空白）时通过，否则返回 `message`
pub fn require_all(fields: &[&str], message: &str) -> Result<(), String> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        Err(message.to_string())
    } else {
        Ok(())
    }
}

/// 去掉用户名中的 `<` 和 `>`
pub fn sanitize_username(input: &str) -> String {
    input.chars().filter(|c| !matches!(c, '<' | '>')).collect()
}

/// 只接受 `.pdf` 文件，返回第一个不符合的文件名
pub fn first_non_pdf<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    names
        .into_iter()
        .find(|name| !name.to_ascii_lowercase().ends_with(".pdf"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_all() {
        assert!(require_all(&["alice", "pw"], "missing").is_ok());
        assert_eq!(
            require_all(&["alice", "  "], "Please fill in all fields"),
            Err("Please fill in all fields".to_string())
        );
        assert!(require_all(&[""], "missing").is_err());
    }

    #[test]
    fn test_sanitize_username() {
        assert_eq!(sanitize_username("<script>bob</script>"), "scriptbob/script");
        assert_eq!(sanitize_username("plain"), "plain");
    }

    #[test]
    fn test_first_non_pdf() {
        assert_eq!(first_non_pdf(["a.pdf", "B.PDF"]), None);
        assert_eq!(first_non_pdf(["a.pdf", "notes.txt"]), Some("notes.txt"));
    }
}
