//! 校园社区前后端共享层
//!
//! 不依赖 DOM，可在宿主机直接测试：
//! - `session`: 会话/角色状态
//! - `route`: 路由表与导航守卫
//! - `protocol`: REST 接口定义
//! - `client`: 基于 `Transport` 抽象的 API 客户端
//! - `date`: 时间序列化与统计格式化工具

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod client;
pub mod date;
pub mod error;
pub mod protocol;
pub mod route;
pub mod session;

pub use error::{ApiError, ApiResult};
pub use session::{Session, User};

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_DEFAULT: &str = "user";
/// 未登录时 `User::id` 的哨兵值
pub const UNAUTHENTICATED_ID: i64 = -1;
pub const IMAGE_PREFIX: &str = "/images";
pub const DEFAULT_AVATAR: &str = "/avatar.jpg";

// =========================================================
// 账户 (Account)
// =========================================================

/// 登录成功后返回的授权信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeInfo {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub token: String,
    pub expire: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub register_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub mute: bool,
    #[serde(default)]
    pub banned: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountPage {
    pub total: i64,
    pub list: Vec<AccountInfo>,
}

/// 邮件验证码用途
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeType {
    Register,
    Reset,
    Modify,
}

impl CodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeType::Register => "register",
            CodeType::Reset => "reset",
            CodeType::Modify => "modify",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRegister {
    pub email: String,
    pub code: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmReset {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailReset {
    pub email: String,
    pub code: String,
    pub password: String,
}

// =========================================================
// 论坛 (Forum)
// =========================================================

/// 论坛分类（主题类型）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TopicPreview {
    pub id: i32,
    pub title: String,
    pub text: String,
    #[serde(rename = "type")]
    pub category: i32,
    pub time: Option<DateTime<Utc>>,
    pub username: String,
    pub avatar: Option<String>,
    pub like: i32,
    pub collect: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicAuthor {
    pub uid: i32,
    pub username: String,
    pub avatar: Option<String>,
    pub desc: Option<String>,
    pub gender: Option<i32>,
    pub qq: Option<String>,
    pub wechat: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicDetail {
    pub id: i32,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub category: i32,
    pub time: Option<DateTime<Utc>>,
    pub user: TopicAuthor,
}

// =========================================================
// 状态码枚举 (Status Codes)
// =========================================================

/// 为整数状态码生成双向转换，未知值保留在 `Other` 中
macro_rules! int_status {
    ($name:ident { $($variant:ident = $code:literal => $text:literal),* $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(from = "i32", into = "i32")]
        pub enum $name {
            $($variant,)*
            Other(i32),
        }

        impl $name {
            pub fn code(&self) -> i32 {
                match self {
                    $($name::$variant => $code,)*
                    $name::Other(code) => *code,
                }
            }

            pub fn text(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)*
                    $name::Other(_) => "未知状态",
                }
            }
        }

        impl From<i32> for $name {
            fn from(code: i32) -> Self {
                match code {
                    $($code => $name::$variant,)*
                    other => $name::Other(other),
                }
            }
        }

        impl From<$name> for i32 {
            fn from(status: $name) -> Self {
                status.code()
            }
        }
    };
}

int_status!(ActivityStatus {
    NotStarted = 0 => "未开始",
    Ongoing = 1 => "进行中",
    Finished = 2 => "已结束",
    Cancelled = 3 => "已取消",
});

int_status!(LostFoundStatus {
    Searching = 0 => "寻找中",
    Found = 1 => "已找到",
    Expired = 2 => "已过期",
});

int_status!(ReviewStatus {
    Pending = 0 => "待审核",
    Approved = 1 => "已通过",
    Rejected = 2 => "已拒绝",
});

// =========================================================
// 活动 (Activity)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: i32,
    #[serde(default)]
    pub admin_id: Option<i32>,
    #[serde(default)]
    pub admin_username: Option<String>,
    pub title: String,
    pub content: String,
    pub location: String,
    pub activity_time: NaiveDateTime,
    #[serde(default)]
    pub end_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub max_participants: Option<i32>,
    #[serde(default)]
    pub current_participants: Option<i32>,
    pub status: ActivityStatus,
    #[serde(default)]
    pub create_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub update_time: Option<NaiveDateTime>,
}

/// 创建/更新活动的表单，`max_participants` 为 0 表示不限人数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityForm {
    pub title: String,
    pub content: String,
    pub location: String,
    pub activity_time: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<i32>,
}

// =========================================================
// 失物招领 (Lost & Found)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LostFound {
    pub id: i32,
    pub uid: i32,
    #[serde(default)]
    pub username: Option<String>,
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(default)]
    pub lost_time: Option<DateTime<Utc>>,
    pub contact_info: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub status: LostFoundStatus,
    #[serde(default)]
    pub create_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LostFoundForm {
    pub title: String,
    pub description: String,
    pub location: String,
    pub lost_time: DateTime<Utc>,
    pub contact_info: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// 失物招领列表筛选条件，未设置的字段不会出现在查询串中
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LostFoundQuery {
    pub location: Option<String>,
    pub start_time: Option<NaiveDate>,
    pub end_time: Option<NaiveDate>,
    pub status: Option<LostFoundStatus>,
}

// =========================================================
// 表白墙 (Love Wall)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoveWall {
    pub id: i32,
    pub uid: i32,
    pub nickname: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    pub introduction: String,
    pub contact: String,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub gender: Option<i32>,
    #[serde(default)]
    pub gender_text: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: ReviewStatus,
    #[serde(default)]
    pub like_count: i32,
    #[serde(default, with = "date::local_datetime_opt")]
    pub create_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub is_mine: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoveWallForm {
    pub nickname: String,
    pub avatar: String,
    #[serde(default)]
    pub photos: Vec<String>,
    pub introduction: String,
    pub contact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<i32>,
    #[serde(default)]
    pub tags: Vec<String>,
}

// =========================================================
// 访问统计 (Visit Statistics)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitStatistics {
    pub statistics_date: NaiveDate,
    pub page_views: i64,
    pub unique_visitors: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VisitSummary {
    pub today_pv: i64,
    pub today_uv: i64,
    pub yesterday_pv: i64,
    pub yesterday_uv: i64,
    pub week_pv: i64,
    pub week_uv: i64,
    pub month_pv: i64,
    pub month_uv: i64,
    pub recent_days: Vec<VisitStatistics>,
    pub recent_month: Vec<VisitStatistics>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_codes_roundtrip_unknown() {
        let status: ActivityStatus = serde_json::from_value(json!(3)).unwrap();
        assert_eq!(status, ActivityStatus::Cancelled);
        assert_eq!(status.text(), "已取消");

        let unknown: LostFoundStatus = serde_json::from_value(json!(9)).unwrap();
        assert_eq!(unknown, LostFoundStatus::Other(9));
        assert_eq!(unknown.text(), "未知状态");
        assert_eq!(serde_json::to_value(unknown).unwrap(), json!(9));
    }

    #[test]
    fn test_activity_decodes_backend_shape() {
        let activity: Activity = serde_json::from_value(json!({
            "id": 4,
            "adminId": 1,
            "adminUsername": "root",
            "title": "迎新晚会",
            "content": "...",
            "location": "礼堂",
            "activityTime": "2024-09-01T19:00:00",
            "endTime": null,
            "status": 1,
            "statusText": "进行中"
        }))
        .unwrap();
        assert_eq!(activity.status, ActivityStatus::Ongoing);
        assert_eq!(activity.admin_username.as_deref(), Some("root"));
        assert!(activity.end_time.is_none());
    }

    #[test]
    fn test_love_wall_create_time_format() {
        let wall: LoveWall = serde_json::from_value(json!({
            "id": 1,
            "uid": 2,
            "nickname": "n",
            "introduction": "hello there friend",
            "contact": "qq",
            "status": 0,
            "createTime": "2024-05-20 13:14:00"
        }))
        .unwrap();
        assert_eq!(wall.status, ReviewStatus::Pending);
        assert_eq!(
            wall.create_time.map(|t| t.to_string()),
            Some("2024-05-20 13:14:00".to_string())
        );
    }

    #[test]
    fn test_activity_form_skips_empty_optionals() {
        let form = ActivityForm {
            title: "t".into(),
            content: "c".into(),
            location: "l".into(),
            activity_time: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            end_time: None,
            cover_image: None,
            max_participants: None,
        };
        let value = serde_json::to_value(&form).unwrap();
        assert_eq!(value["activityTime"], json!("2024-01-02T08:00:00"));
        assert!(value.get("endTime").is_none());
        assert!(value.get("maxParticipants").is_none());
    }
}
