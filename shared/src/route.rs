//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、所属区域以及导航守卫。

use std::fmt::Display;

/// 路由所属区域，三个区域的路径命名空间互不相交
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    /// 登录/注册/找回密码，面向未登录访客
    Welcome,
    /// `/index` 下的主应用
    Main,
    /// `/admin` 下的管理后台
    Admin,
    /// 不属于任何区域（404）
    Outside,
}

impl Area {
    /// 按首个路径段划分区域，未登记的子路径同样受所在区域的守卫约束
    pub fn of_segment(first: Option<&str>) -> Self {
        match first {
            Some("index") => Area::Main,
            Some("admin") => Area::Admin,
            _ => Area::Outside,
        }
    }
}

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    Register,
    Forget,
    TopicList,
    TopicDetail(i32),
    LostFound,
    LostFoundCreate,
    LostFoundDetail(i32),
    Activity,
    ActivityDetail(i32),
    LoveWall,
    UserSetting,
    PrivacySetting,
    AdminWelcome,
    AdminUser,
    AdminForum,
    AdminActivity,
    AdminLoveWall,
    /// 页面未找到，保留原路径所在的区域
    NotFound(Area),
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举（忽略查询串与末尾斜杠）
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let id = |s: &str| s.parse::<i32>().ok();
        let not_found = Self::NotFound(Area::of_segment(segments.first().copied()));

        match segments.as_slice() {
            [] => Self::Login,
            ["register"] => Self::Register,
            ["forget"] => Self::Forget,
            ["index"] => Self::TopicList,
            ["index", "topic-detail", tid] => id(*tid).map_or(not_found.clone(), Self::TopicDetail),
            ["index", "lost-found"] => Self::LostFound,
            ["index", "lost-found", "create"] => Self::LostFoundCreate,
            ["index", "lost-found", lid] => id(*lid).map_or(not_found.clone(), Self::LostFoundDetail),
            ["index", "activity"] => Self::Activity,
            ["index", "activity", aid] => id(*aid).map_or(not_found.clone(), Self::ActivityDetail),
            ["index", "love-wall"] => Self::LoveWall,
            ["index", "user-setting"] => Self::UserSetting,
            ["index", "privacy-setting"] => Self::PrivacySetting,
            ["admin"] => Self::AdminWelcome,
            ["admin", "user"] => Self::AdminUser,
            ["admin", "forum"] => Self::AdminForum,
            ["admin", "activity"] => Self::AdminActivity,
            ["admin", "love-wall"] => Self::AdminLoveWall,
            _ => not_found,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/".into(),
            Self::Register => "/register".into(),
            Self::Forget => "/forget".into(),
            Self::TopicList => "/index".into(),
            Self::TopicDetail(tid) => format!("/index/topic-detail/{tid}"),
            Self::LostFound => "/index/lost-found".into(),
            Self::LostFoundCreate => "/index/lost-found/create".into(),
            Self::LostFoundDetail(id) => format!("/index/lost-found/{id}"),
            Self::Activity => "/index/activity".into(),
            Self::ActivityDetail(id) => format!("/index/activity/{id}"),
            Self::LoveWall => "/index/love-wall".into(),
            Self::UserSetting => "/index/user-setting".into(),
            Self::PrivacySetting => "/index/privacy-setting".into(),
            Self::AdminWelcome => "/admin".into(),
            Self::AdminUser => "/admin/user".into(),
            Self::AdminForum => "/admin/forum".into(),
            Self::AdminActivity => "/admin/activity".into(),
            Self::AdminLoveWall => "/admin/love-wall".into(),
            Self::NotFound(_) => "/404".into(),
        }
    }

    pub fn area(&self) -> Area {
        match self {
            Self::Login | Self::Register | Self::Forget => Area::Welcome,
            Self::TopicList
            | Self::TopicDetail(_)
            | Self::LostFound
            | Self::LostFoundCreate
            | Self::LostFoundDetail(_)
            | Self::Activity
            | Self::ActivityDetail(_)
            | Self::LoveWall
            | Self::UserSetting
            | Self::PrivacySetting => Area::Main,
            Self::AdminWelcome
            | Self::AdminUser
            | Self::AdminForum
            | Self::AdminActivity
            | Self::AdminLoveWall => Area::Admin,
            Self::NotFound(area) => *area,
        }
    }

    /// 登录区根路由（认证失败时的重定向目标）
    pub fn welcome_root() -> Self {
        Self::Login
    }

    /// 主应用根路由（已登录访问登录页、或越权访问后台时的重定向目标）
    pub fn main_root() -> Self {
        Self::TopicList
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

// =========================================================
// 导航守卫 (Navigation Guard)
// =========================================================

/// 守卫所需的两个访问谓词
pub trait Viewer {
    fn is_unauthorized(&self) -> bool;
    fn is_admin(&self) -> bool;
}

/// 预先计算好的访问谓词
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Access {
    pub unauthorized: bool,
    pub admin: bool,
}

impl Access {
    pub fn of<V: Viewer + ?Sized>(viewer: &V) -> Self {
        Self {
            unauthorized: viewer.is_unauthorized(),
            admin: viewer.is_admin(),
        }
    }
}

impl Viewer for Access {
    fn is_unauthorized(&self) -> bool {
        self.unauthorized
    }

    fn is_admin(&self) -> bool {
        self.admin
    }
}

/// 守卫裁决
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Allow,
    Redirect(AppRoute),
}

/// **核心守卫逻辑**
///
/// 按固定顺序求值，仅第一个命中的规则生效：
/// 1. 已登录访问登录区 -> 主应用
/// 2. 非管理员访问后台 -> 主应用
/// 3. 未登录访问主应用 -> 登录区
/// 4. 其余放行
pub fn guard<V: Viewer + ?Sized>(target: &AppRoute, viewer: &V) -> Navigation {
    match target.area() {
        Area::Welcome if !viewer.is_unauthorized() => Navigation::Redirect(AppRoute::main_root()),
        Area::Admin if !viewer.is_admin() => Navigation::Redirect(AppRoute::main_root()),
        Area::Main if viewer.is_unauthorized() => Navigation::Redirect(AppRoute::welcome_root()),
        _ => Navigation::Allow,
    }
}

/// 重定向链的最大跳数（登录区/主应用/后台三者之间至多两跳即可稳定）
const MAX_REDIRECTS: usize = 4;

/// 反复应用守卫直到放行，返回最终落地的路由
///
/// 例如未登录访问后台：后台 -> 主应用 -> 登录页。
pub fn resolve<V: Viewer + ?Sized>(target: AppRoute, viewer: &V) -> AppRoute {
    let mut current = target;
    for _ in 0..MAX_REDIRECTS {
        match guard(&current, viewer) {
            Navigation::Allow => return current,
            Navigation::Redirect(next) => current = next,
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANON: Access = Access {
        unauthorized: true,
        admin: false,
    };
    const MEMBER: Access = Access {
        unauthorized: false,
        admin: false,
    };
    const ADMIN: Access = Access {
        unauthorized: false,
        admin: true,
    };

    fn all_routes() -> Vec<AppRoute> {
        vec![
            AppRoute::Login,
            AppRoute::Register,
            AppRoute::Forget,
            AppRoute::TopicList,
            AppRoute::TopicDetail(3),
            AppRoute::LostFound,
            AppRoute::LostFoundCreate,
            AppRoute::LostFoundDetail(8),
            AppRoute::Activity,
            AppRoute::ActivityDetail(2),
            AppRoute::LoveWall,
            AppRoute::UserSetting,
            AppRoute::PrivacySetting,
            AppRoute::AdminWelcome,
            AppRoute::AdminUser,
            AppRoute::AdminForum,
            AppRoute::AdminActivity,
            AppRoute::AdminLoveWall,
        ]
    }

    #[test]
    fn test_paths_roundtrip() {
        for route in all_routes() {
            assert_eq!(AppRoute::from_path(&route.to_path()), route);
        }
    }

    #[test]
    fn test_from_path_edge_cases() {
        assert_eq!(AppRoute::from_path(""), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/index/"), AppRoute::TopicList);
        assert_eq!(AppRoute::from_path("/admin/user/"), AppRoute::AdminUser);
        assert_eq!(AppRoute::from_path("/index/activity/12?tab=1"), AppRoute::ActivityDetail(12));
        assert_eq!(
            AppRoute::from_path("/index/activity/abc"),
            AppRoute::NotFound(Area::Main)
        );
        assert_eq!(AppRoute::from_path("/index/lost-found/create"), AppRoute::LostFoundCreate);
        assert_eq!(AppRoute::from_path("/indexes"), AppRoute::NotFound(Area::Outside));
        assert_eq!(AppRoute::from_path("/administrator"), AppRoute::NotFound(Area::Outside));
        assert_eq!(AppRoute::from_path("/admin/user/9"), AppRoute::NotFound(Area::Admin));
    }

    #[test]
    fn test_areas() {
        assert_eq!(AppRoute::Forget.area(), Area::Welcome);
        assert_eq!(AppRoute::TopicDetail(1).area(), Area::Main);
        assert_eq!(AppRoute::AdminLoveWall.area(), Area::Admin);
        assert_eq!(AppRoute::NotFound(Area::Outside).area(), Area::Outside);
        assert_eq!(AppRoute::from_path("/index/bogus").area(), Area::Main);
    }

    #[test]
    fn test_authenticated_leaves_welcome_area() {
        for viewer in [MEMBER, ADMIN] {
            for target in [AppRoute::Login, AppRoute::Register, AppRoute::Forget] {
                assert_eq!(guard(&target, &viewer), Navigation::Redirect(AppRoute::TopicList));
            }
        }
    }

    #[test]
    fn test_non_admin_denied_admin_area() {
        assert_eq!(
            guard(&AppRoute::AdminUser, &MEMBER),
            Navigation::Redirect(AppRoute::TopicList)
        );
        // 规则 2 先于规则 3
        assert_eq!(
            guard(&AppRoute::AdminWelcome, &ANON),
            Navigation::Redirect(AppRoute::TopicList)
        );
    }

    #[test]
    fn test_anonymous_denied_main_area() {
        assert_eq!(
            guard(&AppRoute::LoveWall, &ANON),
            Navigation::Redirect(AppRoute::Login)
        );
    }

    #[test]
    fn test_admin_allowed_admin_area() {
        for target in all_routes().into_iter().filter(|r| r.area() == Area::Admin) {
            assert_eq!(guard(&target, &ADMIN), Navigation::Allow);
        }
    }

    #[test]
    fn test_anonymous_allowed_welcome_area() {
        assert_eq!(guard(&AppRoute::Register, &ANON), Navigation::Allow);
        assert_eq!(guard(&AppRoute::Login, &ANON), Navigation::Allow);
    }

    #[test]
    fn test_unlisted_path_outside_areas_allowed() {
        for viewer in [ANON, MEMBER, ADMIN] {
            assert_eq!(guard(&AppRoute::from_path("/nowhere"), &viewer), Navigation::Allow);
        }
    }

    #[test]
    fn test_unlisted_paths_guarded_by_prefix() {
        let bogus_main = AppRoute::from_path("/index/bogus");
        let bogus_admin = AppRoute::from_path("/admin/bogus");

        assert_eq!(resolve(bogus_main.clone(), &ANON), AppRoute::Login);
        assert_eq!(
            resolve(AppRoute::from_path("/index/topic-detail/abc"), &ANON),
            AppRoute::Login
        );
        assert_eq!(resolve(bogus_admin.clone(), &MEMBER), AppRoute::TopicList);
        assert_eq!(resolve(AppRoute::from_path("/admin/user/9"), &MEMBER), AppRoute::TopicList);
        assert_eq!(resolve(bogus_admin.clone(), &ANON), AppRoute::Login);

        // 放行后才显示 404
        assert_eq!(resolve(bogus_main.clone(), &MEMBER), bogus_main);
        assert_eq!(resolve(bogus_admin.clone(), &ADMIN), bogus_admin);
    }

    #[test]
    fn test_redirect_target_is_stable() {
        // 重定向目标本身不会再次被同一规则拦截，最终落点总是被放行
        for viewer in [ANON, MEMBER, ADMIN] {
            for target in all_routes() {
                let landed = resolve(target, &viewer);
                assert_eq!(guard(&landed, &viewer), Navigation::Allow, "{landed} for {viewer:?}");
            }
        }
        assert_eq!(resolve(AppRoute::AdminForum, &ANON), AppRoute::Login);
        assert_eq!(resolve(AppRoute::AdminForum, &MEMBER), AppRoute::TopicList);
    }

    #[test]
    fn test_guard_reads_session_predicates() {
        let session = crate::Session::new();
        assert_eq!(guard(&AppRoute::TopicList, &session), Navigation::Redirect(AppRoute::Login));
        assert_eq!(Access::of(&session), ANON);
    }
}
