//! 会话模块
//!
//! 把 `campus_shared::Session` 包装为响应式上下文，负责：
//! - 登录 / 注销 / 启动时恢复
//! - 访问令牌的持久化（记住我 -> localStorage，否则 sessionStorage）
//! - 任意请求返回 401 时强制注销
//!
//! 路由服务只通过 `access_signal` 观察会话，不直接依赖本模块。

use crate::api::{CampusApi, FetchTransport};
use crate::config::AppConfig;
use crate::web::Storage;
use campus_shared::protocol::{
    AccountInfoRequest, ApiRequest, ListCategoriesRequest, LoginRequest, LogoutRequest,
    RecordVisitRequest,
};
use campus_shared::route::Access;
use campus_shared::{ApiResult, AuthorizeInfo, Session, User};
use chrono::{DateTime, Utc};
use leptos::logging;
use leptos::prelude::*;
use leptos::task::spawn_local;

pub const STORAGE_AUTHORIZE_KEY: &str = "authorize";

/// 会话上下文
#[derive(Clone, Copy)]
pub struct SessionContext {
    /// 会话状态（只读）
    pub state: ReadSignal<Session>,
    set_state: WriteSignal<Session>,
    token: RwSignal<Option<String>>,
    config: StoredValue<AppConfig>,
    visit_recorded: StoredValue<bool>,
}

impl SessionContext {
    pub fn new(config: AppConfig) -> Self {
        let (state, set_state) = signal(Session::new());
        Self {
            state,
            set_state,
            token: RwSignal::new(None),
            config: StoredValue::new(config),
            visit_recorded: StoredValue::new(false),
        }
    }

    /// 注入路由服务的访问谓词
    pub fn access_signal(&self) -> Signal<Access> {
        let state = self.state;
        Signal::derive(move || state.with(Access::of))
    }

    pub fn is_admin(&self) -> bool {
        self.state.with(Session::is_admin)
    }

    pub fn avatar_url(&self) -> String {
        let api_base = self.config.with_value(|c| c.api_base.clone());
        self.state.with(|s| s.avatar_url(&api_base))
    }

    pub fn image_url(&self, path: &str) -> String {
        self.config.with_value(|c| c.image_url(path))
    }

    /// 当前令牌下的 API 客户端
    pub fn api(&self) -> CampusApi {
        let base = self.config.with_value(|c| c.api_base.clone());
        CampusApi::new(FetchTransport, &base).with_token(self.token.get_untracked())
    }

    /// 调用接口；登录失效时顺带清空会话
    pub async fn call<R: ApiRequest>(self, req: &R) -> ApiResult<R::Response> {
        let result = self.api().call(req).await;
        if let Err(e) = &result {
            if e.is_unauthorized() {
                self.force_logout();
            } else {
                logging::warn!("[Session] Request {} failed: {}", req.path(), e);
            }
        }
        result
    }

    fn force_logout(&self) {
        if self.state.with_untracked(Session::is_unauthorized) {
            return;
        }
        logging::warn!("[Session] Token rejected by server, clearing session.");
        self.reset();
    }

    fn reset(&self) {
        forget_authorize();
        self.token.set(None);
        self.set_state.update(Session::clear);
    }

    fn apply_authorize(&self, info: &AuthorizeInfo) {
        self.token.set(Some(info.token.clone()));
        self.set_state
            .update(|s| s.set_user(User::from_authorize(info)));
    }
}

/// 从 Context 获取会话上下文
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>().expect("SessionContext should be provided")
}

// =========================================================
// 令牌持久化
// =========================================================

/// 解析存储的授权记录，损坏或已过期时返回 `None`
fn parse_authorize(raw: &str, now: DateTime<Utc>) -> Option<AuthorizeInfo> {
    let info: AuthorizeInfo = serde_json::from_str(raw).ok()?;
    (info.expire > now && !info.token.is_empty()).then_some(info)
}

fn store_authorize(info: &AuthorizeInfo, remember: bool) {
    let Ok(raw) = serde_json::to_string(info) else {
        return;
    };
    let area = if remember {
        Storage::Local
    } else {
        Storage::Session
    };
    area.set(STORAGE_AUTHORIZE_KEY, &raw);
}

fn forget_authorize() {
    Storage::Local.delete(STORAGE_AUTHORIZE_KEY);
    Storage::Session.delete(STORAGE_AUTHORIZE_KEY);
}

fn load_authorize() -> Option<AuthorizeInfo> {
    let now = Utc::now();
    for area in [Storage::Local, Storage::Session] {
        if let Some(raw) = area.get(STORAGE_AUTHORIZE_KEY) {
            match parse_authorize(&raw, now) {
                Some(info) => return Some(info),
                None => {
                    logging::log!("[Session] Dropping expired or corrupt authorize record.");
                    area.delete(STORAGE_AUTHORIZE_KEY);
                }
            }
        }
    }
    None
}

// =========================================================
// 会话流程
// =========================================================

/// 初始化会话
///
/// 同步恢复存储的授权记录（路由首次守卫前完成），随后异步补全账户详情。
/// 每次进入已登录状态时加载一次分类，并在本次启动中记录一次访问。
pub fn init_session(ctx: &SessionContext) {
    if let Some(info) = load_authorize() {
        logging::log!("[Session] Restored session for {}.", info.username);
        ctx.apply_authorize(&info);
        let ctx = *ctx;
        spawn_local(async move { refresh_account(ctx).await });
    }

    let ctx = *ctx;
    Effect::new(move |_| {
        let unauthorized = ctx.state.with(Session::is_unauthorized);
        if unauthorized {
            return;
        }
        if ctx.state.with_untracked(|s| s.categories().is_empty()) {
            spawn_local(async move { load_categories(ctx).await });
        }
        if !ctx.visit_recorded.get_value() {
            ctx.visit_recorded.set_value(true);
            spawn_local(async move {
                let _ = ctx.call(&RecordVisitRequest).await;
            });
        }
    });
}

/// 登录
///
/// 仅在后端确认成功后才写入会话，路由服务随之把用户从登录区带到主应用。
pub async fn login(
    ctx: &SessionContext,
    username: String,
    password: String,
    remember: bool,
) -> ApiResult<()> {
    let req = LoginRequest {
        username,
        password,
        remember,
    };
    let info = ctx.api().call(&req).await?;

    logging::log!("[Session] Logged in as {} ({}).", info.username, info.role);
    store_authorize(&info, remember);
    ctx.apply_authorize(&info);

    let ctx = *ctx;
    spawn_local(async move { refresh_account(ctx).await });
    Ok(())
}

/// 注销
///
/// 无论后端是否响应成功都清空本地会话；导航由路由服务自动处理。
pub async fn logout(ctx: &SessionContext) {
    if let Err(e) = ctx.api().call(&LogoutRequest).await {
        logging::warn!("[Session] Logout request failed: {}", e);
    }
    ctx.reset();
    logging::log!("[Session] Logged out.");
}

/// 用 `/api/user/info` 补全邮箱、头像等信息
pub async fn refresh_account(ctx: SessionContext) {
    if let Ok(account) = ctx.call(&AccountInfoRequest).await {
        ctx.set_state.update(|s| {
            let user = s.user().clone().with_account(account);
            s.set_user(user);
        });
    }
}

pub async fn load_categories(ctx: SessionContext) {
    if let Ok(categories) = ctx.call(&ListCategoriesRequest).await {
        ctx.set_state.update(|s| s.set_categories(categories));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(expire: DateTime<Utc>, token: &str) -> String {
        serde_json::to_string(&AuthorizeInfo {
            id: 4,
            username: "alice".into(),
            role: "user".into(),
            token: token.into(),
            expire,
        })
        .unwrap()
    }

    #[test]
    fn test_parse_authorize_accepts_live_record() {
        let now = Utc::now();
        let info = parse_authorize(&record(now + Duration::days(1), "tok"), now).unwrap();
        assert_eq!(info.id, 4);
        assert_eq!(info.token, "tok");
    }

    #[test]
    fn test_parse_authorize_rejects_stale_or_broken() {
        let now = Utc::now();
        assert!(parse_authorize(&record(now - Duration::seconds(1), "tok"), now).is_none());
        assert!(parse_authorize(&record(now + Duration::days(1), ""), now).is_none());
        assert!(parse_authorize("{not json", now).is_none());
    }
}
