//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 提供简洁的本地存储接口，并在其上实现 token 存储。

use crate::token::TokenStore;

/// 本地存储操作封装
///
/// 提供静态方法访问浏览器 LocalStorage API。
pub struct LocalStorage;

impl LocalStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// 获取存储的字符串值
    ///
    /// # 返回
    /// - `Some(String)` 如果键存在且有值
    /// - `None` 如果键不存在或发生错误
    pub fn get(key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    /// 设置存储值，返回操作是否成功
    pub fn set(key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    /// 删除存储的键值对，返回操作是否成功
    pub fn delete(key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

/// 基于 LocalStorage 的 token 存储，只占用一个键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowserTokenStore {
    key: &'static str,
}

impl BrowserTokenStore {
    pub fn new(key: &'static str) -> Self {
        Self { key }
    }
}

impl TokenStore for BrowserTokenStore {
    fn get(&self) -> Option<String> {
        LocalStorage::get(self.key).filter(|t| !t.is_empty())
    }

    fn set(&self, token: &str) {
        if !LocalStorage::set(self.key, token) {
            log::warn!("[Storage] failed to persist token under '{}'", self.key);
        }
    }

    fn clear(&self) {
        if !LocalStorage::delete(self.key) {
            log::warn!("[Storage] failed to remove '{}'", self.key);
        }
    }
}
