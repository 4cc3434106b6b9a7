use crate::web::{HttpError, fetch};
use campus_shared::client::{CampusClient, HttpRequest, HttpResponse, Transport};
use campus_shared::{ApiError, ApiResult};

/// 基于浏览器 fetch 的传输层
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FetchTransport;

#[async_trait::async_trait(?Send)]
impl Transport for FetchTransport {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        Ok(fetch(&req).await?)
    }
}

impl From<HttpError> for ApiError {
    fn from(e: HttpError) -> Self {
        match e {
            HttpError::ResponseParseFailed(msg) => ApiError::Decode(msg),
            other => ApiError::Network(other.to_string()),
        }
    }
}

pub type CampusApi = CampusClient<FetchTransport>;
