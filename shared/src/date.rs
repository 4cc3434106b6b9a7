//! 时间工具模块
//!
//! 提供两类工具：
//! - 后端非 ISO 时间格式的 serde 适配
//! - 统计面板使用的数字/日期/增长率格式化

use chrono::{Datelike, NaiveDate};

// =========================================================
// serde 适配
// =========================================================

/// `yyyy-MM-dd HH:mm:ss` 格式的可选本地时间
pub mod local_datetime_opt {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => serializer.serialize_str(&t.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom))
            .transpose()
    }
}

// =========================================================
// 统计格式化
// =========================================================

/// 保留一位小数（四舍五入，.5 进位）
fn one_decimal(num: i64, unit: i64) -> String {
    let tenths = (num * 10 + unit / 2) / unit;
    format!("{}.{}", tenths / 10, tenths % 10)
}

/// 大数简写：`>= 10000` 用 `w`，`>= 1000` 用 `k`
pub fn format_number(num: i64) -> String {
    if num >= 10_000 {
        format!("{}w", one_decimal(num, 10_000))
    } else if num >= 1_000 {
        format!("{}k", one_decimal(num, 1_000))
    } else {
        num.to_string()
    }
}

/// `yyyy-MM-dd`，同时也是统计接口的查询日期格式
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `M/D`，不补零，用于趋势图横轴
pub fn format_month_day(date: NaiveDate) -> String {
    format!("{}/{}", date.month(), date.day())
}

/// 环比增长率（百分比）
///
/// 前值为 0 时：当前值大于 0 视为 100%，否则 0%
pub fn growth_rate(current: i64, previous: i64) -> f64 {
    if previous == 0 {
        return if current > 0 { 100.0 } else { 0.0 };
    }
    (current - previous) as f64 / previous as f64 * 100.0
}

pub fn format_growth_rate(rate: f64) -> String {
    if rate >= 0.0 {
        // -0.0 也走这里，先归一化避免输出 "+-0.0"
        format!("+{:.1}%", rate.abs())
    } else {
        format!("{:.1}%", rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_thresholds() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1.0k");
        assert_eq!(format_number(1250), "1.3k");
        assert_eq!(format_number(9999), "10.0k");
        assert_eq!(format_number(10_000), "1.0w");
        assert_eq!(format_number(123_456), "12.3w");
    }

    #[test]
    fn test_format_dates() {
        let d = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(format_date(d), "2024-03-07");
        assert_eq!(format_month_day(d), "3/7");
    }

    #[test]
    fn test_growth_rate() {
        assert_eq!(growth_rate(5, 0), 100.0);
        assert_eq!(growth_rate(0, 0), 0.0);
        assert_eq!(growth_rate(150, 100), 50.0);
        assert_eq!(growth_rate(50, 100), -50.0);
    }

    #[test]
    fn test_format_growth_rate() {
        assert_eq!(format_growth_rate(12.34), "+12.3%");
        assert_eq!(format_growth_rate(0.0), "+0.0%");
        assert_eq!(format_growth_rate(-0.0), "+0.0%");
        assert_eq!(format_growth_rate(-7.24), "-7.2%");
    }
}
