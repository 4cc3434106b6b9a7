//! 校园社区前端应用
//!
//! - `session`: 会话状态与令牌持久化
//! - `web::router`: 路由服务，根据会话身份守卫跳转
//! - `api`: 基于浏览器 fetch 的接口传输
//! - `components`: 页面与 UI 组件

mod api;
mod config;
mod session;
mod components {
    pub mod activity;
    pub mod admin;
    pub mod common;
    pub mod forum;
    pub mod layout;
    pub mod lost_found;
    pub mod love_wall;
    pub mod settings;
    pub mod welcome;
}

// 原生 Web API 封装模块
pub(crate) mod web {
    mod http;
    pub mod router;
    mod storage;
    mod timer;

    pub use http::{HttpError, fetch};
    pub use storage::Storage;
    pub use timer::Interval;
}

use crate::components::activity::{ActivityDetailPage, ActivityPage};
use crate::components::admin::{
    AdminActivityPage, AdminForumPage, AdminLoveWallPage, AdminUserPage, AdminWelcomePage,
};
use crate::components::forum::{TopicDetailPage, TopicListPage};
use crate::components::layout::{AdminLayout, MainLayout};
use crate::components::lost_found::{LostFoundCreatePage, LostFoundDetailPage, LostFoundPage};
use crate::components::love_wall::LoveWallPage;
use crate::components::settings::{PrivacySettingPage, UserSettingPage};
use crate::components::welcome::{ForgetPage, LoginPage, RegisterPage};
use crate::config::AppConfig;
use crate::session::{SessionContext, init_session};
use campus_shared::route::{AppRoute, Area};
use leptos::prelude::*;
use web::router::{Link, Router, RouterOutlet};

fn page(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Forget => view! { <ForgetPage /> }.into_any(),
        AppRoute::TopicList => view! { <TopicListPage /> }.into_any(),
        AppRoute::TopicDetail(tid) => view! { <TopicDetailPage tid=tid /> }.into_any(),
        AppRoute::LostFound => view! { <LostFoundPage /> }.into_any(),
        AppRoute::LostFoundCreate => view! { <LostFoundCreatePage /> }.into_any(),
        AppRoute::LostFoundDetail(id) => view! { <LostFoundDetailPage id=id /> }.into_any(),
        AppRoute::Activity => view! { <ActivityPage /> }.into_any(),
        AppRoute::ActivityDetail(id) => view! { <ActivityDetailPage id=id /> }.into_any(),
        AppRoute::LoveWall => view! { <LoveWallPage /> }.into_any(),
        AppRoute::UserSetting => view! { <UserSettingPage /> }.into_any(),
        AppRoute::PrivacySetting => view! { <PrivacySettingPage /> }.into_any(),
        AppRoute::AdminWelcome => view! { <AdminWelcomePage /> }.into_any(),
        AppRoute::AdminUser => view! { <AdminUserPage /> }.into_any(),
        AppRoute::AdminForum => view! { <AdminForumPage /> }.into_any(),
        AppRoute::AdminActivity => view! { <AdminActivityPage /> }.into_any(),
        AppRoute::AdminLoveWall => view! { <AdminLoveWallPage /> }.into_any(),
        AppRoute::NotFound(_) => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"页面未找到"</p>
                    <Link to=AppRoute::Login class="btn btn-primary mt-6">"返回首页"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

/// 路由匹配函数：按所属区域套上对应布局，404 页面不带布局
fn route_matcher(route: AppRoute) -> AnyView {
    match route.area() {
        _ if matches!(route, AppRoute::NotFound(_)) => page(route),
        Area::Main => view! { <MainLayout>{page(route)}</MainLayout> }.into_any(),
        Area::Admin => view! { <AdminLayout>{page(route)}</AdminLayout> }.into_any(),
        _ => page(route),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 会话上下文
    let ctx = SessionContext::new(AppConfig::load());
    provide_context(ctx);

    // 2. 恢复本地令牌，加载账户详情
    init_session(&ctx);

    // 3. 身份信号注入路由服务
    view! {
        <Router access=ctx.access_signal()>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
