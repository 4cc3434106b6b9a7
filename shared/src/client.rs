use crate::HEADER_AUTHORIZATION;
use crate::error::{ApiError, ApiResult};
use crate::protocol::{ApiRequest, HttpMethod, RestBean};

// =========================================================
// 传输抽象层 (Transport Abstraction)
// =========================================================

/// 发往传输层的原始请求
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// 传输层返回的原始响应
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 传输层特性
///
/// 浏览器中由 fetch 实现；(?Send) 是因为 wasm 下的 JS 句柄不是 Send 的。
#[async_trait::async_trait(?Send)]
pub trait Transport {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse>;
}

// =========================================================
// API 客户端
// =========================================================

/// 校园社区后端客户端
#[derive(Debug, Clone, PartialEq)]
pub struct CampusClient<T> {
    transport: T,
    base_url: String,
    token: Option<String>,
}

impl<T: Transport> CampusClient<T> {
    pub fn new(transport: T, base_url: &str) -> Self {
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 组装请求（不发送）
    pub fn build<R: ApiRequest>(&self, req: &R) -> ApiResult<HttpRequest> {
        let body = req.body()?;
        let mut headers = Vec::new();
        if let Some(token) = &self.token {
            headers.push((HEADER_AUTHORIZATION.to_string(), format!("Bearer {token}")));
        }
        if let Some(content_type) = body.content_type() {
            headers.push(("Content-Type".to_string(), content_type.to_string()));
        }
        Ok(HttpRequest {
            url: self.url(&req.path()),
            method: R::METHOD,
            headers,
            body: body.into_string(),
        })
    }

    /// 发送请求并拆包 `RestBean`
    pub async fn call<R: ApiRequest>(&self, req: &R) -> ApiResult<R::Response> {
        let request = self.build(req)?;
        let response = self.transport.send(request).await?;
        decode_response(response).or_else(R::recover)
    }
}

/// 非 2xx 时优先解析响应体中的 RestBean，解析不了再报 HTTP 状态
pub fn decode_response<D: serde::de::DeserializeOwned>(response: HttpResponse) -> ApiResult<D> {
    match serde_json::from_str::<RestBean>(&response.body) {
        Ok(bean) => bean.into_result(),
        Err(_) if !response.ok() => Err(ApiError::Http {
            status: response.status,
        }),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{
        AccountInfoRequest, DeleteLoveWallRequest, ListCategoriesRequest, LoginRequest,
        StatisticsByDateRequest,
    };
    use std::cell::RefCell;

    struct MockTransport {
        requests: RefCell<Vec<HttpRequest>>,
        responses: RefCell<Vec<ApiResult<HttpResponse>>>,
    }

    impl MockTransport {
        fn new(responses: Vec<ApiResult<HttpResponse>>) -> Self {
            Self {
                requests: RefCell::new(Vec::new()),
                responses: RefCell::new(responses),
            }
        }

        fn reply(status: u16, body: &str) -> ApiResult<HttpResponse> {
            Ok(HttpResponse {
                status,
                body: body.to_string(),
            })
        }
    }

    #[async_trait::async_trait(?Send)]
    impl Transport for MockTransport {
        async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
            self.requests.borrow_mut().push(req);
            self.responses.borrow_mut().remove(0)
        }
    }

    #[tokio::test]
    async fn test_call_attaches_bearer_token() {
        let transport = MockTransport::new(vec![MockTransport::reply(
            200,
            r#"{"id":1,"code":200,"data":[{"id":1,"name":"日常"}],"message":"请求成功"}"#,
        )]);
        let client = CampusClient::new(transport, "http://localhost:8080/")
            .with_token(Some("abc".into()));

        let categories = client.call(&ListCategoriesRequest).await.unwrap();
        assert_eq!(categories.len(), 1);

        let requests = client.transport.requests.borrow();
        assert_eq!(requests[0].url, "http://localhost:8080/api/forum/types");
        assert_eq!(requests[0].method, HttpMethod::Get);
        assert_eq!(requests[0].header("authorization"), Some("Bearer abc"));
        assert_eq!(requests[0].body, None);
    }

    #[tokio::test]
    async fn test_login_sends_form_without_token() {
        let transport = MockTransport::new(vec![MockTransport::reply(
            200,
            r#"{"code":200,"data":{"id":3,"username":"u","role":"user","token":"t","expire":"2030-01-01T00:00:00Z"}}"#,
        )]);
        let client = CampusClient::new(transport, "http://api");
        let info = client
            .call(&LoginRequest {
                username: "u".into(),
                password: "p".into(),
                remember: false,
            })
            .await
            .unwrap();
        assert_eq!(info.id, 3);
        assert_eq!(info.token, "t");

        let requests = client.transport.requests.borrow();
        assert_eq!(requests[0].header(HEADER_AUTHORIZATION), None);
        assert_eq!(
            requests[0].header("Content-Type"),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[tokio::test]
    async fn test_business_rejection_and_http_errors() {
        let transport = MockTransport::new(vec![
            MockTransport::reply(200, r#"{"code":400,"data":null,"message":"无权删除"}"#),
            MockTransport::reply(401, r#"{"code":401,"data":null,"message":"登录已过期"}"#),
            MockTransport::reply(502, "<html>Bad Gateway</html>"),
            Err(ApiError::Network("offline".into())),
        ]);
        let client = CampusClient::new(transport, "http://api");

        let rejected = client.call(&DeleteLoveWallRequest { id: 1 }).await;
        assert_eq!(
            rejected,
            Err(ApiError::Rejected {
                code: 400,
                message: "无权删除".into()
            })
        );

        let expired = client.call(&AccountInfoRequest).await.unwrap_err();
        assert!(expired.is_unauthorized());

        let gateway = client.call(&AccountInfoRequest).await;
        assert_eq!(gateway, Err(ApiError::Http { status: 502 }));

        let offline = client.call(&AccountInfoRequest).await;
        assert_eq!(offline, Err(ApiError::Network("offline".into())));
    }

    #[tokio::test]
    async fn test_missing_day_and_bad_payload() {
        let transport = MockTransport::new(vec![
            MockTransport::reply(200, r#"{"code":200,"data":null}"#),
            MockTransport::reply(
                200,
                r#"{"id":1,"code":404,"data":null,"message":"未找到指定日期的统计数据"}"#,
            ),
            MockTransport::reply(200, r#"{"code":403,"data":null,"message":"权限不足"}"#),
            MockTransport::reply(200, "not json"),
        ]);
        let client = CampusClient::new(transport, "http://api");
        let date = chrono::NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        let empty = client.call(&StatisticsByDateRequest { date }).await.unwrap();
        assert!(empty.is_none());

        let missing = client.call(&StatisticsByDateRequest { date }).await.unwrap();
        assert!(missing.is_none());

        let denied = client.call(&StatisticsByDateRequest { date }).await;
        assert!(matches!(denied, Err(ApiError::Forbidden(_))));

        let broken = client.call(&StatisticsByDateRequest { date }).await;
        assert!(matches!(broken, Err(ApiError::Decode(_))));
    }
}
