//! 主应用与后台的外框布局

use crate::session::{logout, use_session};
use crate::web::router::{Link, use_router};
use campus_shared::route::AppRoute;
use leptos::prelude::*;
use leptos::task::spawn_local;

const MAIN_MENU: &[(&str, AppRoute)] = &[
    ("校园论坛", AppRoute::TopicList),
    ("失物招领", AppRoute::LostFound),
    ("校园活动", AppRoute::Activity),
    ("表白墙", AppRoute::LoveWall),
    ("个人信息设置", AppRoute::UserSetting),
    ("账号安全设置", AppRoute::PrivacySetting),
];

const ADMIN_MENU: &[(&str, AppRoute)] = &[
    ("管理员主页", AppRoute::AdminWelcome),
    ("用户管理", AppRoute::AdminUser),
    ("论坛管理", AppRoute::AdminForum),
    ("活动管理", AppRoute::AdminActivity),
    ("表白墙审核", AppRoute::AdminLoveWall),
];

/// 当前路由是否属于某个菜单项（详情页归属于其列表页）
fn menu_active(item: &AppRoute, current: &AppRoute) -> bool {
    match (item, current) {
        (AppRoute::TopicList, AppRoute::TopicDetail(_)) => true,
        (AppRoute::LostFound, AppRoute::LostFoundCreate | AppRoute::LostFoundDetail(_)) => true,
        (AppRoute::Activity, AppRoute::ActivityDetail(_)) => true,
        _ => item == current,
    }
}

#[component]
fn Menu(items: &'static [(&'static str, AppRoute)]) -> impl IntoView {
    let router = use_router();
    items
        .iter()
        .map(|(label, route)| {
            // 布局随路由整体重建，这里读取一次即可
            let active = router
                .current_route()
                .with_untracked(|current| menu_active(route, current));
            view! {
                <li>
                    <Link to=route.clone() class=if active { "active" } else { "" }>{*label}</Link>
                </li>
            }
        })
        .collect_view()
}

#[component]
fn UserBadge() -> impl IntoView {
    let ctx = use_session();

    let on_logout = move |_| {
        spawn_local(async move { logout(&ctx).await });
    };

    view! {
        <div class="dropdown dropdown-end">
            <div tabindex="0" role="button" class="btn btn-ghost gap-2">
                <div class="avatar">
                    <div class="w-8 rounded-full">
                        <img src=move || ctx.avatar_url() alt="avatar" />
                    </div>
                </div>
                <span>{move || ctx.state.with(|s| s.user().username.clone())}</span>
            </div>
            <ul tabindex="0" class="dropdown-content z-[1] menu p-2 shadow bg-base-200 rounded-box w-52">
                <li class="menu-title">{move || ctx.state.with(|s| s.user().email.clone())}</li>
                <li>
                    <a on:click=on_logout class="text-error hover:bg-error/10">"退出登录"</a>
                </li>
            </ul>
        </div>
    }
}

/// 主应用布局，后台入口只对管理员显示
#[component]
pub fn MainLayout(children: Children) -> impl IntoView {
    let ctx = use_session();

    view! {
        <div class="min-h-screen bg-base-200">
            <div class="navbar bg-base-100 shadow">
                <div class="flex-1 gap-2">
                    <Link to=AppRoute::TopicList class="btn btn-ghost text-xl">"校园社区"</Link>
                </div>
                <div class="flex-none gap-2">
                    <Show when=move || ctx.is_admin()>
                        <Link to=AppRoute::AdminWelcome class="btn btn-outline btn-sm">"管理后台"</Link>
                    </Show>
                    <UserBadge />
                </div>
            </div>
            <div class="max-w-7xl mx-auto flex gap-4 p-4">
                <ul class="menu bg-base-100 rounded-box w-56 shrink-0 self-start">
                    <Menu items=MAIN_MENU />
                </ul>
                <main class="flex-1 min-w-0">{children()}</main>
            </div>
        </div>
    }
}

#[component]
pub fn AdminLayout(children: Children) -> impl IntoView {
    view! {
        <div class="min-h-screen bg-base-200">
            <div class="navbar bg-neutral text-neutral-content">
                <div class="flex-1">
                    <span class="text-xl font-bold px-4">"校园社区后台"</span>
                </div>
                <div class="flex-none gap-2">
                    <Link to=AppRoute::TopicList class="btn btn-ghost btn-sm">"返回前台"</Link>
                    <UserBadge />
                </div>
            </div>
            <div class="flex gap-4 p-4">
                <ul class="menu bg-base-100 rounded-box w-56 shrink-0 self-start">
                    <Menu items=ADMIN_MENU />
                </ul>
                <main class="flex-1 min-w-0">{children()}</main>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_pages_highlight_their_list() {
        assert!(menu_active(&AppRoute::TopicList, &AppRoute::TopicDetail(3)));
        assert!(menu_active(&AppRoute::LostFound, &AppRoute::LostFoundCreate));
        assert!(menu_active(&AppRoute::AdminUser, &AppRoute::AdminUser));
        assert!(!menu_active(&AppRoute::Activity, &AppRoute::LoveWall));
    }
}
