//! 运行时配置
//!
//! 后端地址按以下优先级确定：
//! 1. localStorage `campus_api_base`（便于部署后临时切换）
//! 2. 编译期环境变量 `CAMPUS_API_BASE`
//! 3. `http://localhost:8080`

use crate::web::Storage;
use campus_shared::IMAGE_PREFIX;

pub const STORAGE_API_BASE_KEY: &str = "campus_api_base";
pub const DEFAULT_API_BASE: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// 不带末尾斜杠
    pub api_base: String,
}

impl AppConfig {
    pub fn load() -> Self {
        Self::from_sources(
            Storage::Local.get(STORAGE_API_BASE_KEY),
            option_env!("CAMPUS_API_BASE"),
        )
    }

    fn from_sources(stored: Option<String>, compiled: Option<&str>) -> Self {
        let raw = stored
            .filter(|s| !s.trim().is_empty())
            .or_else(|| compiled.filter(|s| !s.trim().is_empty()).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Self {
            api_base: raw.trim().trim_end_matches('/').to_string(),
        }
    }

    /// 后端图片地址，`path` 为后端返回的相对路径
    pub fn image_url(&self, path: &str) -> String {
        format!("{}{}{}", self.api_base, IMAGE_PREFIX, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence() {
        let cfg = AppConfig::from_sources(Some("https://a.example/".into()), Some("https://b"));
        assert_eq!(cfg.api_base, "https://a.example");

        let cfg = AppConfig::from_sources(None, Some("https://b//"));
        assert_eq!(cfg.api_base, "https://b");

        let cfg = AppConfig::from_sources(Some("  ".into()), None);
        assert_eq!(cfg.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_image_url() {
        let cfg = AppConfig::from_sources(None, None);
        assert_eq!(
            cfg.image_url("/cache/x.png"),
            "http://localhost:8080/images/cache/x.png"
        );
    }
}
