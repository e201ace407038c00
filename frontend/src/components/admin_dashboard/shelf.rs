//! 书库管理操作
//!
//! 每次变更（上传、启用/停用、删除）成功后都重新拉取完整列表，
//! 列表始终以服务端为准，不在本地修补。

use crate::api::SupportApi;
use crate::error::ApiResult;
use crate::token::TokenStore;
use crate::web::HttpClient;
use std::collections::HashSet;
use supportbot_shared::{Book, UploadPart};

/// 一次变更的结果：后端返回的提示和刷新后的列表
#[derive(Debug, Clone, PartialEq)]
pub struct ShelfUpdate {
    pub message: String,
    pub books: Vec<Book>,
}

async fn refreshed<C: HttpClient, S: TokenStore>(
    api: &SupportApi<C, S>,
    message: String,
) -> ApiResult<ShelfUpdate> {
    let books = api.list_books().await?;
    Ok(ShelfUpdate { message, books })
}

/// 切换启用状态
pub async fn toggle<C: HttpClient, S: TokenStore>(
    api: &SupportApi<C, S>,
    book: &Book,
) -> ApiResult<ShelfUpdate> {
    let message = api.toggle_book(book.id, !book.active).await?;
    refreshed(api, message).await
}

pub async fn delete<C: HttpClient, S: TokenStore>(
    api: &SupportApi<C, S>,
    id: i64,
) -> ApiResult<ShelfUpdate> {
    let message = api.delete_book(id).await?;
    refreshed(api, message).await
}

pub async fn upload<C: HttpClient, S: TokenStore>(
    api: &SupportApi<C, S>,
    parts: Vec<UploadPart>,
) -> ApiResult<ShelfUpdate> {
    let message = api.upload_books(parts).await?;
    refreshed(api, message).await
}

/// 正在处理中的书籍 id，处理期间该行的按钮禁用
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingBooks(HashSet<i64>);

impl PendingBooks {
    /// 标记开始处理，已经在处理中时返回 false
    pub fn begin(&mut self, id: i64) -> bool {
        self.0.insert(id)
    }

    pub fn finish(&mut self, id: i64) {
        self.0.remove(&id);
    }

    pub fn contains(&self, id: i64) -> bool {
        self.0.contains(&id)
    }
}
