//! REST 接口定义
//!
//! 每个请求类型通过 `ApiRequest` 声明自己的方法、路径、请求体与响应类型，
//! 传输细节由 `client::Transport` 负责。

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::date::format_date;
use crate::error::{ApiError, ApiResult};
use crate::{
    AccountInfo, AccountPage, Activity, ActivityForm, ActivityStatus, AuthorizeInfo, Category,
    CodeType, ConfirmReset, EmailRegister, EmailReset, LostFound, LostFoundForm, LostFoundQuery,
    LostFoundStatus, LoveWall, LoveWallForm, ReviewStatus, TopicDetail, TopicPreview,
    VisitStatistics, VisitSummary,
};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// 请求体
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    /// `application/x-www-form-urlencoded` 编码后的字符串
    Form(String),
}

impl RequestBody {
    pub fn json<T: Serialize>(value: &T) -> ApiResult<Self> {
        Ok(RequestBody::Json(serde_json::to_value(value)?))
    }

    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            RequestBody::Empty => None,
            RequestBody::Json(_) => Some("application/json"),
            RequestBody::Form(_) => Some("application/x-www-form-urlencoded"),
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            RequestBody::Empty => None,
            RequestBody::Json(v) => Some(v.to_string()),
            RequestBody::Form(s) => Some(s),
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
pub trait ApiRequest {
    /// `RestBean.data` 的类型
    type Response: DeserializeOwned;
    const METHOD: HttpMethod;

    /// 相对于 API 根地址的路径（含查询串）
    fn path(&self) -> String;

    fn body(&self) -> ApiResult<RequestBody> {
        Ok(RequestBody::Empty)
    }

    /// 拆包失败时的兜底，个别接口把特定业务码当作正常结果
    fn recover(err: ApiError) -> ApiResult<Self::Response> {
        Err(err)
    }
}

// =========================================================
// 响应包装 (RestBean)
// =========================================================

pub const CODE_SUCCESS: i32 = 200;
pub const CODE_UNAUTHORIZED: i32 = 401;
pub const CODE_FORBIDDEN: i32 = 403;
pub const CODE_NOT_FOUND: i32 = 404;

/// 后端统一响应结构 `{ id, code, data, message }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestBean {
    #[serde(default)]
    pub id: i64,
    pub code: i32,
    #[serde(default)]
    pub data: Value,
    #[serde(default)]
    pub message: String,
}

impl RestBean {
    pub fn failure(code: i32, message: impl Into<String>) -> Self {
        Self {
            id: 0,
            code,
            data: Value::Null,
            message: message.into(),
        }
    }

    /// 按 `code` 拆包：200 解析 `data`，其余映射为对应错误
    pub fn into_result<T: DeserializeOwned>(self) -> ApiResult<T> {
        match self.code {
            CODE_SUCCESS => Ok(serde_json::from_value(self.data)?),
            CODE_UNAUTHORIZED => Err(ApiError::Unauthorized(self.message)),
            CODE_FORBIDDEN => Err(ApiError::Forbidden(self.message)),
            code => Err(ApiError::Rejected {
                code,
                message: self.message,
            }),
        }
    }
}

// =========================================================
// 查询串工具
// =========================================================

/// 拼接查询串，键值均做百分号编码；`params` 为空时原样返回路径
pub fn with_query(path: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    format!("{}?{}", path, encode_pairs(params))
}

fn encode_pairs(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

// =========================================================
// 认证 (Auth)
// =========================================================

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub remember: bool,
}

impl ApiRequest for LoginRequest {
    type Response = AuthorizeInfo;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/auth/login".into()
    }

    fn body(&self) -> ApiResult<RequestBody> {
        Ok(RequestBody::Form(encode_pairs(&[
            ("username", self.username.clone()),
            ("password", self.password.clone()),
            ("remember", self.remember.to_string()),
        ])))
    }
}

#[derive(Debug, Clone)]
pub struct LogoutRequest;

impl ApiRequest for LogoutRequest {
    type Response = Option<String>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/auth/logout".into()
    }
}

#[derive(Debug, Clone)]
pub struct AskCodeRequest {
    pub email: String,
    pub code_type: CodeType,
}

impl ApiRequest for AskCodeRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        with_query(
            "/api/auth/ask-code",
            &[
                ("email", self.email.clone()),
                ("type", self.code_type.as_str().to_string()),
            ],
        )
    }
}

impl ApiRequest for EmailRegister {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/auth/register".into()
    }

    fn body(&self) -> ApiResult<RequestBody> {
        RequestBody::json(self)
    }
}

impl ApiRequest for ConfirmReset {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/auth/reset-confirm".into()
    }

    fn body(&self) -> ApiResult<RequestBody> {
        RequestBody::json(self)
    }
}

impl ApiRequest for EmailReset {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/auth/reset-password".into()
    }

    fn body(&self) -> ApiResult<RequestBody> {
        RequestBody::json(self)
    }
}

#[derive(Debug, Clone)]
pub struct AccountInfoRequest;

impl ApiRequest for AccountInfoRequest {
    type Response = AccountInfo;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/user/info".into()
    }
}

// =========================================================
// 论坛 (Forum)
// =========================================================

#[derive(Debug, Clone)]
pub struct ListCategoriesRequest;

impl ApiRequest for ListCategoriesRequest {
    type Response = Vec<Category>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/forum/types".into()
    }
}

/// `category` 为 0 表示全部分类
#[derive(Debug, Clone)]
pub struct ListTopicsRequest {
    pub page: u32,
    pub category: i32,
}

impl ApiRequest for ListTopicsRequest {
    type Response = Vec<TopicPreview>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        with_query(
            "/api/forum/list-topic",
            &[
                ("page", self.page.to_string()),
                ("type", self.category.to_string()),
            ],
        )
    }
}

#[derive(Debug, Clone)]
pub struct TopicDetailRequest {
    pub tid: i32,
}

impl ApiRequest for TopicDetailRequest {
    type Response = TopicDetail;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        with_query("/api/forum/topic", &[("tid", self.tid.to_string())])
    }
}

// =========================================================
// 活动 (Activity)
// =========================================================

#[derive(Debug, Clone, Default)]
pub struct ListActivitiesRequest {
    pub status: Option<ActivityStatus>,
}

impl ApiRequest for ListActivitiesRequest {
    type Response = Vec<Activity>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        match self.status {
            Some(status) => format!("/api/activity/list/{}", status.code()),
            None => "/api/activity/list".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActivityDetailRequest {
    pub id: i32,
}

impl ApiRequest for ActivityDetailRequest {
    type Response = Activity;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/api/activity/{}", self.id)
    }
}

impl ApiRequest for ActivityForm {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/admin/activity/create".into()
    }

    fn body(&self) -> ApiResult<RequestBody> {
        RequestBody::json(self)
    }
}

#[derive(Debug, Clone)]
pub struct AdminListActivitiesRequest;

impl ApiRequest for AdminListActivitiesRequest {
    type Response = Vec<Activity>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/admin/activity/list".into()
    }
}

#[derive(Debug, Clone)]
pub struct AdminActivityDetailRequest {
    pub id: i32,
}

impl ApiRequest for AdminActivityDetailRequest {
    type Response = Activity;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/api/admin/activity/{}", self.id)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateActivityRequest {
    pub id: i32,
    pub form: ActivityForm,
}

impl ApiRequest for UpdateActivityRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/api/admin/activity/{}/update", self.id)
    }

    fn body(&self) -> ApiResult<RequestBody> {
        RequestBody::json(&self.form)
    }
}

#[derive(Debug, Clone)]
pub struct ActivityStatusRequest {
    pub id: i32,
    pub status: ActivityStatus,
}

impl ApiRequest for ActivityStatusRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/api/admin/activity/{}/status", self.id)
    }

    fn body(&self) -> ApiResult<RequestBody> {
        Ok(RequestBody::Json(json!({ "status": self.status.code() })))
    }
}

#[derive(Debug, Clone)]
pub struct DeleteActivityRequest {
    pub id: i32,
}

impl ApiRequest for DeleteActivityRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/api/admin/activity/{}/delete", self.id)
    }

    fn body(&self) -> ApiResult<RequestBody> {
        Ok(RequestBody::Json(json!({})))
    }
}

// =========================================================
// 失物招领 (Lost & Found)
// =========================================================

impl ApiRequest for LostFoundForm {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/lost-found/create".into()
    }

    fn body(&self) -> ApiResult<RequestBody> {
        RequestBody::json(self)
    }
}

impl ApiRequest for LostFoundQuery {
    type Response = Vec<LostFound>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        let mut params = Vec::new();
        if let Some(location) = self.location.as_ref().filter(|l| !l.is_empty()) {
            params.push(("location", location.clone()));
        }
        if let Some(start) = self.start_time {
            params.push(("startTime", format_date(start)));
        }
        if let Some(end) = self.end_time {
            params.push(("endTime", format_date(end)));
        }
        if let Some(status) = self.status {
            params.push(("status", status.code().to_string()));
        }
        with_query("/api/lost-found/list", &params)
    }
}

#[derive(Debug, Clone)]
pub struct LostFoundDetailRequest {
    pub id: i32,
}

impl ApiRequest for LostFoundDetailRequest {
    type Response = LostFound;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/api/lost-found/{}", self.id)
    }
}

#[derive(Debug, Clone)]
pub struct LostFoundStatusRequest {
    pub id: i32,
    pub status: LostFoundStatus,
}

impl ApiRequest for LostFoundStatusRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/api/lost-found/{}/status", self.id)
    }

    fn body(&self) -> ApiResult<RequestBody> {
        Ok(RequestBody::Json(json!({ "status": self.status.code() })))
    }
}

#[derive(Debug, Clone)]
pub struct DeleteLostFoundRequest {
    pub id: i32,
}

impl ApiRequest for DeleteLostFoundRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/api/lost-found/{}/delete", self.id)
    }

    fn body(&self) -> ApiResult<RequestBody> {
        Ok(RequestBody::Json(json!({})))
    }
}

// =========================================================
// 表白墙 (Love Wall)
// =========================================================

impl ApiRequest for LoveWallForm {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/love-wall/create".into()
    }

    fn body(&self) -> ApiResult<RequestBody> {
        RequestBody::json(self)
    }
}

/// 表白墙列表筛选方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoveWallFilter {
    #[default]
    All,
    Gender(i32),
    AgeRange { min: i32, max: i32 },
    Mine,
}

#[derive(Debug, Clone, Default)]
pub struct ListLoveWallRequest {
    pub filter: LoveWallFilter,
}

impl ApiRequest for ListLoveWallRequest {
    type Response = Vec<LoveWall>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        match self.filter {
            LoveWallFilter::All => "/api/love-wall/list".into(),
            LoveWallFilter::Gender(gender) => format!("/api/love-wall/list/gender/{gender}"),
            LoveWallFilter::AgeRange { min, max } => with_query(
                "/api/love-wall/list/age",
                &[("minAge", min.to_string()), ("maxAge", max.to_string())],
            ),
            LoveWallFilter::Mine => "/api/love-wall/my".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoveWallDetailRequest {
    pub id: i32,
}

impl ApiRequest for LoveWallDetailRequest {
    type Response = LoveWall;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/api/love-wall/{}", self.id)
    }
}

#[derive(Debug, Clone)]
pub struct LikeLoveWallRequest {
    pub id: i32,
}

impl ApiRequest for LikeLoveWallRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/api/love-wall/like/{}", self.id)
    }

    fn body(&self) -> ApiResult<RequestBody> {
        Ok(RequestBody::Json(json!({})))
    }
}

#[derive(Debug, Clone)]
pub struct DeleteLoveWallRequest {
    pub id: i32,
}

impl ApiRequest for DeleteLoveWallRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/api/love-wall/delete/{}", self.id)
    }

    fn body(&self) -> ApiResult<RequestBody> {
        Ok(RequestBody::Json(json!({})))
    }
}

#[derive(Debug, Clone)]
pub struct UpdateLoveWallRequest {
    pub id: i32,
    pub form: LoveWallForm,
}

impl ApiRequest for UpdateLoveWallRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/api/love-wall/update/{}", self.id)
    }

    fn body(&self) -> ApiResult<RequestBody> {
        RequestBody::json(&self.form)
    }
}

#[derive(Debug, Clone)]
pub struct PendingLoveWallRequest;

impl ApiRequest for PendingLoveWallRequest {
    type Response = Vec<LoveWall>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/admin/love-wall/pending".into()
    }
}

#[derive(Debug, Clone)]
pub struct ReviewLoveWallRequest {
    pub id: i32,
    pub status: ReviewStatus,
}

impl ApiRequest for ReviewLoveWallRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        with_query(
            &format!("/api/admin/love-wall/approve/{}", self.id),
            &[("status", self.status.code().to_string())],
        )
    }

    fn body(&self) -> ApiResult<RequestBody> {
        Ok(RequestBody::Json(json!({})))
    }
}

// =========================================================
// 访问统计 (Statistics)
// =========================================================

#[derive(Debug, Clone)]
pub struct RecordVisitRequest;

impl ApiRequest for RecordVisitRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/api/statistics/visit".into()
    }

    fn body(&self) -> ApiResult<RequestBody> {
        Ok(RequestBody::Json(json!({})))
    }
}

#[derive(Debug, Clone)]
pub struct SummaryRequest;

impl ApiRequest for SummaryRequest {
    type Response = VisitSummary;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/api/statistics/summary".into()
    }
}

#[derive(Debug, Clone)]
pub struct StatisticsByDateRequest {
    pub date: NaiveDate,
}

/// 当日无数据时后端返回业务码 404，视为 `None`
impl ApiRequest for StatisticsByDateRequest {
    type Response = Option<VisitStatistics>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        with_query("/api/statistics/date", &[("date", format_date(self.date))])
    }

    fn recover(err: ApiError) -> ApiResult<Self::Response> {
        match err {
            ApiError::Rejected {
                code: CODE_NOT_FOUND,
                ..
            } => Ok(None),
            other => Err(other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatisticsRangeRequest {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ApiRequest for StatisticsRangeRequest {
    type Response = Vec<VisitStatistics>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        with_query(
            "/api/statistics/range",
            &[
                ("startDate", format_date(self.start)),
                ("endDate", format_date(self.end)),
            ],
        )
    }
}

pub const DEFAULT_RECENT_DAYS: u32 = 7;

#[derive(Debug, Clone)]
pub struct RecentStatisticsRequest {
    pub days: u32,
}

impl Default for RecentStatisticsRequest {
    fn default() -> Self {
        Self {
            days: DEFAULT_RECENT_DAYS,
        }
    }
}

impl ApiRequest for RecentStatisticsRequest {
    type Response = Vec<VisitStatistics>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        with_query("/api/statistics/recent", &[("days", self.days.to_string())])
    }
}

// =========================================================
// 用户管理 (Admin Accounts)
// =========================================================

#[derive(Debug, Clone)]
pub struct ListAccountsRequest {
    pub page: u32,
    pub size: u32,
}

impl ApiRequest for ListAccountsRequest {
    type Response = AccountPage;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        with_query(
            "/api/admin/user/list",
            &[("page", self.page.to_string()), ("size", self.size.to_string())],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rest_bean_success_decodes_data() {
        let bean: RestBean = serde_json::from_value(json!({
            "id": 1, "code": 200, "data": [{"id": 1, "name": "日常"}], "message": "请求成功"
        }))
        .unwrap();
        let categories: Vec<Category> = bean.into_result().unwrap();
        assert_eq!(categories[0].name, "日常");
    }

    #[test]
    fn test_rest_bean_void_accepts_null_data() {
        let bean: RestBean = serde_json::from_value(json!({"code": 200, "data": null})).unwrap();
        let unit: () = bean.into_result().unwrap();
        assert_eq!(unit, ());
    }

    #[test]
    fn test_rest_bean_error_codes() {
        let unauthorized = RestBean::failure(401, "请先登录").into_result::<()>();
        assert_eq!(unauthorized, Err(ApiError::Unauthorized("请先登录".into())));

        let forbidden = RestBean::failure(403, "此账户已被封禁").into_result::<()>();
        assert_eq!(forbidden, Err(ApiError::Forbidden("此账户已被封禁".into())));

        let rejected = RestBean::failure(400, "参数错误").into_result::<()>();
        assert_eq!(
            rejected,
            Err(ApiError::Rejected {
                code: 400,
                message: "参数错误".into()
            })
        );
    }

    #[test]
    fn test_login_is_form_encoded() {
        let req = LoginRequest {
            username: "a b".into(),
            password: "p&w=1".into(),
            remember: true,
        };
        let body = req.body().unwrap();
        assert_eq!(body.content_type(), Some("application/x-www-form-urlencoded"));
        assert_eq!(
            body.into_string().as_deref(),
            Some("username=a%20b&password=p%26w%3D1&remember=true")
        );
        assert_eq!(LoginRequest::METHOD, HttpMethod::Post);
    }

    #[test]
    fn test_lost_found_query_only_sends_set_filters() {
        assert_eq!(LostFoundQuery::default().path(), "/api/lost-found/list");

        let query = LostFoundQuery {
            location: Some("图书馆".into()),
            start_time: NaiveDate::from_ymd_opt(2024, 1, 5),
            end_time: None,
            status: Some(LostFoundStatus::Searching),
        };
        assert_eq!(
            query.path(),
            "/api/lost-found/list?location=%E5%9B%BE%E4%B9%A6%E9%A6%86&startTime=2024-01-05&status=0"
        );

        let empty_location = LostFoundQuery {
            location: Some(String::new()),
            ..LostFoundQuery::default()
        };
        assert_eq!(empty_location.path(), "/api/lost-found/list");
    }

    #[test]
    fn test_path_shapes() {
        assert_eq!(ListActivitiesRequest::default().path(), "/api/activity/list");
        assert_eq!(
            ListActivitiesRequest {
                status: Some(ActivityStatus::Finished)
            }
            .path(),
            "/api/activity/list/2"
        );
        assert_eq!(
            DeleteActivityRequest { id: 5 }.path(),
            "/api/admin/activity/5/delete"
        );
        assert_eq!(
            ListLoveWallRequest {
                filter: LoveWallFilter::AgeRange { min: 18, max: 22 }
            }
            .path(),
            "/api/love-wall/list/age?minAge=18&maxAge=22"
        );
        assert_eq!(
            ReviewLoveWallRequest {
                id: 3,
                status: ReviewStatus::Rejected
            }
            .path(),
            "/api/admin/love-wall/approve/3?status=2"
        );
        assert_eq!(
            RecentStatisticsRequest::default().path(),
            "/api/statistics/recent?days=7"
        );
    }

    #[test]
    fn test_status_body() {
        let req = ActivityStatusRequest {
            id: 1,
            status: ActivityStatus::Cancelled,
        };
        assert_eq!(req.body().unwrap(), RequestBody::Json(json!({"status": 3})));
    }
}
