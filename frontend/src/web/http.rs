//! HTTP 请求封装模块
//!
//! `HttpClient` trait 抽象了传输层：浏览器中由 [`FetchClient`]（`web_sys::fetch`）实现，
//! 测试中由 `MockHttpClient` 实现，从而让 API 网关可以在宿主机上测试。

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use supportbot_shared::protocol::HttpMethod;
use supportbot_shared::{PDF_CONTENT_TYPE, UploadPart};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Headers, Request, RequestInit, Response};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::collections::HashMap;

fn method_str(method: HttpMethod) -> &'static str {
    match method {
        HttpMethod::Get => "GET",
        HttpMethod::Post => "POST",
    }
}

/// HTTP 错误类型
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HttpError {
    /// 请求构建失败
    #[error("请求构建失败: {0}")]
    RequestBuildFailed(String),
    /// 网络请求失败
    #[error("网络错误: {0}")]
    NetworkError(String),
    /// 响应解析失败
    #[error("响应解析失败: {0}")]
    ResponseParseFailed(String),
}

/// 请求体
#[derive(Debug, Clone, PartialEq)]
pub enum HttpBody {
    /// 已序列化的 JSON 文本
    Json(String),
    /// multipart/form-data，每个文件一个 part，共用同一个字段名
    Multipart {
        field: &'static str,
        parts: Vec<UploadPart>,
    },
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<HttpBody>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: HttpBody) -> Self {
        self.body = Some(body);
        self
    }

    #[cfg(test)]
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// HTTP 响应（已读取完整响应体）
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    /// 检查响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

#[async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError>;
}

// =========================================================
// 实现层: 浏览器 fetch 客户端
// =========================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchClient;

impl FetchClient {
    fn build_form(field: &str, parts: &[UploadPart]) -> Result<FormData, HttpError> {
        let form = FormData::new()
            .map_err(|e| HttpError::RequestBuildFailed(format!("创建 FormData 失败: {:?}", e)))?;

        for part in parts {
            let bytes = js_sys::Uint8Array::from(part.bytes.as_slice());
            let sequence = js_sys::Array::of1(&bytes);
            let bag = BlobPropertyBag::new();
            bag.set_type(PDF_CONTENT_TYPE);
            let blob = Blob::new_with_u8_array_sequence_and_options(&sequence, &bag)
                .map_err(|e| HttpError::RequestBuildFailed(format!("创建 Blob 失败: {:?}", e)))?;
            form.append_with_blob_and_filename(field, &blob, &part.file_name)
                .map_err(|e| {
                    HttpError::RequestBuildFailed(format!("追加文件 {} 失败: {:?}", part.file_name, e))
                })?;
        }

        Ok(form)
    }
}

#[async_trait(?Send)]
impl HttpClient for FetchClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let headers = Headers::new()
            .map_err(|e| HttpError::RequestBuildFailed(format!("创建 Headers 失败: {:?}", e)))?;

        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| HttpError::RequestBuildFailed(format!("设置 Header 失败: {:?}", e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method(method_str(req.method));

        match &req.body {
            Some(HttpBody::Json(json)) => {
                headers
                    .set("Content-Type", "application/json")
                    .map_err(|e| HttpError::RequestBuildFailed(format!("{:?}", e)))?;
                opts.set_body(&JsValue::from_str(json));
            }
            // 不手动设置 Content-Type，由浏览器补全 boundary
            Some(HttpBody::Multipart { field, parts }) => {
                let form = Self::build_form(field, parts)?;
                opts.set_body(&form.into());
            }
            None => {}
        }
        opts.set_headers(&headers.into());

        let request = Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| HttpError::RequestBuildFailed(format!("{:?}", e)))?;

        let window = web_sys::window()
            .ok_or_else(|| HttpError::NetworkError("无法获取 window 对象".to_string()))?;

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| HttpError::NetworkError(format!("{:?}", e)))?;

        let response: Response = resp_value.dyn_into().map_err(|e| {
            HttpError::ResponseParseFailed(format!("Response 类型转换失败: {:?}", e))
        })?;

        let promise = response
            .text()
            .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;
        let text = JsFuture::from(promise)
            .await
            .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;

        Ok(HttpResponse {
            status: response.status(),
            status_text: response.status_text(),
            body: text.as_string().unwrap_or_default(),
        })
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
pub struct MockHttpClient {
    // ("METHOD url", 结果)
    responses: RefCell<HashMap<String, Result<(u16, String), HttpError>>>,
    /// 记录发出的请求
    pub requests: RefCell<Vec<HttpRequest>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn key(method: HttpMethod, url: &str) -> String {
        format!("{} {}", method_str(method), url)
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.responses
            .borrow_mut()
            .insert(Self::key(method, url), Ok((status, body.to_string())));
    }

    pub fn mock_failure(&self, method: HttpMethod, url: &str, error: HttpError) {
        self.responses
            .borrow_mut()
            .insert(Self::key(method, url), Err(error));
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }
}

#[cfg(test)]
#[async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let key = Self::key(req.method, &req.url);
        self.requests.borrow_mut().push(req);

        match self.responses.borrow().get(&key) {
            Some(Ok((status, body))) => Ok(HttpResponse {
                status: *status,
                status_text: String::new(),
                body: body.clone(),
            }),
            Some(Err(e)) => Err(e.clone()),
            None => Ok(HttpResponse {
                status: 404,
                status_text: "Not Found".to_string(),
                body: r#"{"detail":"Not Found"}"#.to_string(),
            }),
        }
    }
}
