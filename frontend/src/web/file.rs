//! 文件输入框的读取
//!
//! 上传前把选中的文件读成字节，API 网关只处理 `UploadPart`。

use super::http::HttpError;
use supportbot_shared::UploadPart;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, HtmlInputElement};

/// 输入框中当前选中的文件
pub fn selected_files(input: &HtmlInputElement) -> Vec<File> {
    let Some(list) = input.files() else {
        return Vec::new();
    };
    (0..list.length()).filter_map(|i| list.get(i)).collect()
}

/// 逐个读取文件内容
pub async fn read_parts(files: &[File]) -> Result<Vec<UploadPart>, HttpError> {
    let mut parts = Vec::with_capacity(files.len());
    for file in files {
        let buffer = JsFuture::from(file.array_buffer()).await.map_err(|e| {
            HttpError::RequestBuildFailed(format!("读取文件 {} 失败: {:?}", file.name(), e))
        })?;
        parts.push(UploadPart {
            file_name: file.name(),
            bytes: js_sys::Uint8Array::new(&buffer).to_vec(),
        });
    }
    Ok(parts)
}
