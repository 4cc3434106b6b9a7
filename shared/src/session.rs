//! 会话状态模块
//!
//! 保存当前用户身份与论坛分类缓存。这是一个普通的拥有型值，
//! 由前端包装为响应式上下文后注入到视图与路由服务中。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::route::Viewer;
use crate::{
    AccountInfo, AuthorizeInfo, Category, DEFAULT_AVATAR, IMAGE_PREFIX, ROLE_ADMIN,
    UNAUTHENTICATED_ID,
};

/// 当前用户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// `UNAUTHENTICATED_ID` 表示未登录
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    /// 头像路径，空字符串表示未设置
    pub avatar: String,
    pub register_time: Option<DateTime<Utc>>,
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: UNAUTHENTICATED_ID,
            username: String::new(),
            email: String::new(),
            role: String::new(),
            avatar: String::new(),
            register_time: None,
        }
    }
}

impl User {
    /// 由登录响应构造，邮箱/头像等详情需随后通过账户信息补全
    pub fn from_authorize(info: &AuthorizeInfo) -> Self {
        Self {
            id: info.id,
            username: info.username.clone(),
            role: info.role.clone(),
            ..Self::default()
        }
    }

    /// 合并账户详情，保留已知的 id
    pub fn with_account(mut self, account: AccountInfo) -> Self {
        if let Some(id) = account.id {
            self.id = id;
        }
        self.username = account.username;
        self.email = account.email;
        if !account.role.is_empty() {
            self.role = account.role;
        }
        self.avatar = account.avatar.unwrap_or_default();
        self.register_time = account.register_time;
        self
    }
}

/// 会话状态
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    user: User,
    categories: Vec<Category>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    // --- 派生状态 ---

    pub fn is_unauthorized(&self) -> bool {
        self.user.id == UNAUTHENTICATED_ID
    }

    pub fn is_admin(&self) -> bool {
        self.user.role == ROLE_ADMIN
    }

    /// 头像地址：已设置时拼接后端图片前缀，否则使用默认头像
    pub fn avatar_url(&self, api_base: &str) -> String {
        if self.user.avatar.is_empty() {
            DEFAULT_AVATAR.to_string()
        } else {
            format!("{}{}{}", api_base, IMAGE_PREFIX, self.user.avatar)
        }
    }

    /// 按 id 查找分类，按插入顺序返回第一个匹配
    pub fn find_category_by_id(&self, id: i32) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    // --- 写入接口（整体替换） ---

    pub fn set_user(&mut self, user: User) {
        self.user = user;
    }

    /// 替换分类列表，重复 id 只保留第一次出现的条目
    pub fn set_categories(&mut self, categories: Vec<Category>) {
        let mut unique: Vec<Category> = Vec::with_capacity(categories.len());
        for category in categories {
            if !unique.iter().any(|c| c.id == category.id) {
                unique.push(category);
            }
        }
        self.categories = unique;
    }

    /// 注销：重置用户为哨兵值，分类属于公共数据，保留
    pub fn clear(&mut self) {
        self.user = User::default();
    }
}

impl Viewer for Session {
    fn is_unauthorized(&self) -> bool {
        Session::is_unauthorized(self)
    }

    fn is_admin(&self) -> bool {
        Session::is_admin(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ROLE_DEFAULT;

    fn category(id: i32, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            desc: String::new(),
            color: String::new(),
        }
    }

    fn user(id: i64, role: &str) -> User {
        User {
            id,
            username: "alice".into(),
            role: role.into(),
            ..User::default()
        }
    }

    #[test]
    fn test_new_session_is_unauthorized() {
        let session = Session::new();
        assert!(session.is_unauthorized());
        assert!(!session.is_admin());
        assert_eq!(session.user().id, UNAUTHENTICATED_ID);
        assert!(session.categories().is_empty());
    }

    #[test]
    fn test_unauthorized_tracks_sentinel_id() {
        let mut session = Session::new();
        for id in [0, 1, 42, i64::MAX, -2] {
            session.set_user(user(id, ROLE_DEFAULT));
            assert!(!session.is_unauthorized(), "id {id}");
        }
        session.set_user(user(UNAUTHENTICATED_ID, ROLE_ADMIN));
        assert!(session.is_unauthorized());
    }

    #[test]
    fn test_is_admin_only_for_admin_tag() {
        let mut session = Session::new();
        for role in ["", ROLE_DEFAULT, "Admin", "ADMIN", "admin ", "root"] {
            session.set_user(user(1, role));
            assert!(!session.is_admin(), "role {role:?}");
        }
        session.set_user(user(1, ROLE_ADMIN));
        assert!(session.is_admin());
    }

    #[test]
    fn test_avatar_url() {
        let mut session = Session::new();
        assert_eq!(session.avatar_url("http://localhost:8080"), DEFAULT_AVATAR);

        let mut u = user(1, ROLE_DEFAULT);
        u.avatar = "/avatar/abc.png".into();
        session.set_user(u);
        assert_eq!(
            session.avatar_url("http://localhost:8080"),
            "http://localhost:8080/images/avatar/abc.png"
        );
    }

    #[test]
    fn test_find_category_by_id() {
        let mut session = Session::new();
        assert!(session.find_category_by_id(1).is_none());

        session.set_categories(vec![category(1, "日常"), category(2, "学习")]);
        assert_eq!(session.find_category_by_id(2).map(|c| c.name.as_str()), Some("学习"));
        assert!(session.find_category_by_id(3).is_none());
    }

    #[test]
    fn test_set_categories_keeps_first_duplicate() {
        let mut session = Session::new();
        session.set_categories(vec![category(1, "first"), category(2, "b"), category(1, "second")]);
        assert_eq!(session.categories().len(), 2);
        assert_eq!(session.find_category_by_id(1).map(|c| c.name.as_str()), Some("first"));
    }

    #[test]
    fn test_clear_resets_user_keeps_categories() {
        let mut session = Session::new();
        session.set_user(user(7, ROLE_ADMIN));
        session.set_categories(vec![category(1, "日常")]);

        session.clear();
        assert!(session.is_unauthorized());
        assert!(!session.is_admin());
        assert_eq!(session.categories().len(), 1);
    }

    #[test]
    fn test_user_from_authorize_then_account() {
        let info = AuthorizeInfo {
            id: 9,
            username: "bob".into(),
            role: ROLE_ADMIN.into(),
            token: "t".into(),
            expire: Utc::now(),
        };
        let u = User::from_authorize(&info).with_account(AccountInfo {
            username: "bob".into(),
            email: "bob@example.com".into(),
            avatar: Some("/a.png".into()),
            ..AccountInfo::default()
        });
        assert_eq!(u.id, 9);
        assert_eq!(u.role, ROLE_ADMIN);
        assert_eq!(u.email, "bob@example.com");
        assert_eq!(u.avatar, "/a.png");
    }
}
