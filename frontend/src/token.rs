//! Bearer token 的持久化抽象。
//!
//! 客户端唯一持久化的状态就是这一个 token 字符串，不记录过期时间。

/// get / set / clear 三个操作；`set` 覆盖旧值。
pub trait TokenStore {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str);
    fn clear(&self);
}

#[cfg(test)]
pub use memory::MemoryTokenStore;
