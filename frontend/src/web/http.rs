//! fetch 封装模块
//!
//! 把 `campus_shared::client::HttpRequest` 原样交给浏览器 `fetch`，
//! 取回状态码与响应文本。`RestBean` 的拆包由 `campus_shared::client` 完成。

use campus_shared::client::{HttpRequest, HttpResponse};
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, Response};

/// HTTP 错误类型
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("请求构建失败: {0}")]
    RequestBuildFailed(String),
    #[error("网络错误: {0}")]
    NetworkError(String),
    #[error("响应解析失败: {0}")]
    ResponseParseFailed(String),
}

fn build_request(req: &HttpRequest) -> Result<Request, HttpError> {
    let headers = Headers::new()
        .map_err(|e| HttpError::RequestBuildFailed(format!("创建 Headers 失败: {:?}", e)))?;
    for (key, value) in &req.headers {
        headers
            .set(key, value)
            .map_err(|e| HttpError::RequestBuildFailed(format!("设置 Header {} 失败: {:?}", key, e)))?;
    }

    let opts = RequestInit::new();
    opts.set_method(req.method.as_str());
    opts.set_headers(&headers.into());
    if let Some(body) = &req.body {
        opts.set_body(&JsValue::from_str(body));
    }

    Request::new_with_str_and_init(&req.url, &opts)
        .map_err(|e| HttpError::RequestBuildFailed(format!("{:?}", e)))
}

async fn read_text(response: &Response) -> Result<String, HttpError> {
    let promise = response
        .text()
        .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?;
    JsFuture::from(promise)
        .await
        .map_err(|e| HttpError::ResponseParseFailed(format!("{:?}", e)))?
        .as_string()
        .ok_or_else(|| HttpError::ResponseParseFailed("响应体不是文本".to_string()))
}

/// 发送请求；非 2xx 状态同样返回 `Ok`，由调用方按响应体判定
pub async fn fetch(req: &HttpRequest) -> Result<HttpResponse, HttpError> {
    let request = build_request(req)?;
    let window = web_sys::window()
        .ok_or_else(|| HttpError::NetworkError("无法获取 window 对象".to_string()))?;

    let value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| HttpError::NetworkError(format!("{} {}: {:?}", req.method.as_str(), req.url, e)))?;
    let response: Response = value
        .dyn_into()
        .map_err(|e| HttpError::ResponseParseFailed(format!("Response 类型转换失败: {:?}", e)))?;

    Ok(HttpResponse {
        status: response.status(),
        body: read_text(&response).await?,
    })
}
