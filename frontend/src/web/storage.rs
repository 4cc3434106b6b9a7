//! Web Storage 封装模块
//!
//! 使用 `web_sys::Storage` 访问 localStorage / sessionStorage。

/// 浏览器存储区域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    /// 持久保存，关闭浏览器后仍在
    Local,
    /// 仅当前标签页会话有效
    Session,
}

impl Storage {
    fn area(self) -> Option<web_sys::Storage> {
        let window = web_sys::window()?;
        match self {
            Storage::Local => window.local_storage().ok()?,
            Storage::Session => window.session_storage().ok()?,
        }
    }

    /// 键不存在或存储不可用时返回 `None`
    pub fn get(self, key: &str) -> Option<String> {
        self.area()?.get_item(key).ok()?
    }

    pub fn set(self, key: &str, value: &str) -> bool {
        self.area()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    pub fn delete(self, key: &str) -> bool {
        self.area()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}
