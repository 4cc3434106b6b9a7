//! 页面共用的小组件

use campus_shared::ApiError;
use chrono::{NaiveDate, NaiveDateTime};
use leptos::prelude::*;

/// 提示消息：内容与是否为错误
#[derive(Clone, Copy)]
pub struct Notice {
    message: RwSignal<Option<(String, bool)>>,
}

impl Notice {
    pub fn new() -> Self {
        let message = RwSignal::new(None::<(String, bool)>);

        // 3秒后清除通知
        Effect::new(move |_| {
            if message.get().is_some() {
                set_timeout(move || message.set(None), std::time::Duration::from_secs(3));
            }
        });

        Self { message }
    }

    pub fn success(&self, text: impl Into<String>) {
        self.message.set(Some((text.into(), false)));
    }

    pub fn error(&self, text: impl Into<String>) {
        self.message.set(Some((text.into(), true)));
    }

    pub fn api_error(&self, prefix: &str, e: &ApiError) {
        self.error(format!("{}: {}", prefix, e.user_message()));
    }
}

#[component]
pub fn NoticeToast(notice: Notice) -> impl IntoView {
    let message = notice.message;
    view! {
        <Show when=move || message.with(Option::is_some)>
            <div class="toast toast-top toast-end z-50">
                <div class=move || {
                    if message.with(|m| m.as_ref().is_some_and(|(_, is_err)| *is_err)) {
                        "alert alert-error shadow-lg"
                    } else {
                        "alert alert-success shadow-lg"
                    }
                }>
                    <span>{move || message.with(|m| m.as_ref().map(|(text, _)| text.clone()))}</span>
                </div>
            </div>
        </Show>
    }
}

#[component]
pub fn Spinner() -> impl IntoView {
    view! {
        <div class="flex justify-center py-8 text-base-content/50">
            <span class="loading loading-spinner loading-md"></span>
            " 加载中..."
        </div>
    }
}

#[component]
pub fn Empty(#[prop(into)] text: String) -> impl IntoView {
    view! { <div class="text-center py-8 text-base-content/50">{text}</div> }
}

/// 表单行：标签 + 文本输入
#[component]
pub fn TextField(
    #[prop(into)] label: String,
    value: RwSignal<String>,
    #[prop(optional, into)] kind: Option<String>,
    #[prop(optional, into)] placeholder: String,
) -> impl IntoView {
    view! {
        <label class="form-control w-full">
            <div class="label">
                <span class="label-text">{label}</span>
            </div>
            <input
                type=kind.unwrap_or_else(|| "text".to_string())
                placeholder=placeholder
                class="input input-bordered w-full"
                prop:value=value
                on:input=move |ev| value.set(event_target_value(&ev))
            />
        </label>
    }
}

/// 逗号/空白分隔的输入拆成列表
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split([',', '，', ' ', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// `<input type="datetime-local">` 的取值，秒可省略
pub fn parse_datetime_local(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

/// `<input type="date">` 的取值，空串视为未设置
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list("a, b，c\n\n d"),
            vec!["a", "b", "c", "d"]
        );
        assert!(split_list("  ").is_empty());
    }

    #[test]
    fn test_parse_inputs() {
        let t = parse_datetime_local("2024-05-01T08:30").unwrap();
        assert_eq!(t.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-05-01 08:30:00");
        assert!(parse_datetime_local("2024-05-01T08:30:15").is_some());
        assert!(parse_datetime_local("").is_none());

        assert_eq!(parse_date("2024-05-01"), NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(parse_date(""), None);
    }
}
