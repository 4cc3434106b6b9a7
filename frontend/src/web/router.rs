//! 路由服务模块 - 核心引擎
//!
//! 所有对 window.history 的操作都集中在此模块。
//! 导航流程："请求 -> 守卫(resolve) -> 写入 History -> 更新路由信号"。
//! 守卫规则本身在 `campus_shared::route` 中，这里只负责把裁决落到浏览器上。

use campus_shared::route::{Access, AppRoute, resolve};
use leptos::logging;
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 通过注入的访问谓词信号与会话系统解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    access: Signal<Access>,
}

impl RouterService {
    fn new(access: Signal<Access>) -> Self {
        let requested = AppRoute::from_path(&current_path());
        let initial = resolve(requested.clone(), &access.get_untracked());
        if initial != requested {
            logging::log!("[Router] Initial route {} redirected to {}", requested, initial);
            replace_history_state(&initial.to_path());
        }
        let (current_route, set_route) = signal(initial);

        Self {
            current_route,
            set_route,
            access,
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    ///
    /// 守卫在写入 History 之前执行，被拒绝的目标不会出现在历史记录里。
    pub fn navigate_to(&self, target: AppRoute) {
        let settled = resolve(target.clone(), &self.access.get_untracked());
        if settled != target {
            logging::log!("[Router] Access to {} denied. Redirecting to {}.", target, settled);
        }
        push_history_state(&settled.to_path());
        self.set_route.set(settled);
    }

    /// 浏览器后退/前进同样经过守卫
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let access = self.access;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target = AppRoute::from_path(&current_path());
            let settled = resolve(target.clone(), &access.get_untracked());
            if settled != target {
                logging::log!("[Router] History entry {} redirected to {}.", target, settled);
                replace_history_state(&settled.to_path());
            }
            set_route.set(settled);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 登录、注销、角色变化后重新守卫当前路由
    fn setup_access_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let access = self.access;

        Effect::new(move |_| {
            let access = access.get();
            let route = current_route.get_untracked();
            let settled = resolve(route.clone(), &access);

            if settled != route {
                logging::log!(
                    "[Router] Access changed (unauthorized: {}, admin: {}), redirecting {} -> {}.",
                    access.unauthorized,
                    access.admin,
                    route,
                    settled
                );
                replace_history_state(&settled.to_path());
                set_route.set(settled);
            }
        });
    }
}

fn provide_router(access: Signal<Access>) -> RouterService {
    let router = RouterService::new(access);

    router.init_popstate_listener();
    router.setup_access_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
#[component]
pub fn Router(
    /// 访问谓词信号
    access: Signal<Access>,
    children: Children,
) -> impl IntoView {
    provide_router(access);

    children()
}

/// 路由出口组件
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接，点击时走路由服务而不是整页跳转
#[component]
pub fn Link(
    to: AppRoute,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let href = to.to_path();

    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate_to(to.clone());
    };

    view! {
        <a href=href class=class on:click=on_click>
            {children()}
        </a>
    }
}
