//! 校园论坛：帖子列表与详情

use crate::components::common::{Empty, Notice, NoticeToast, Spinner};
use crate::session::use_session;
use crate::web::router::Link;
use campus_shared::protocol::{ListTopicsRequest, TopicDetailRequest};
use campus_shared::route::AppRoute;
use campus_shared::{Category, TopicDetail, TopicPreview};
use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::Value;

/// 帖子正文是 Quill Delta（`{"ops":[{"insert":...}]}`），这里只取文本插入
pub fn delta_to_text(content: &str) -> String {
    let Ok(delta) = serde_json::from_str::<Value>(content) else {
        return content.to_string();
    };
    delta
        .get("ops")
        .and_then(Value::as_array)
        .map(|ops| {
            ops.iter()
                .filter_map(|op| op.get("insert").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default()
}

#[component]
fn CategoryBadge(category: Option<Category>) -> impl IntoView {
    match category {
        Some(c) => view! {
            <span class="badge badge-outline" style=format!("color: {}", c.color)>{c.name}</span>
        }
        .into_any(),
        None => view! { <span class="badge badge-ghost">"未分类"</span> }.into_any(),
    }
}

#[component]
pub fn TopicListPage() -> impl IntoView {
    let ctx = use_session();
    let notice = Notice::new();

    let (topics, set_topics) = signal(Vec::<TopicPreview>::new());
    let (category, set_category) = signal(0i32);
    let (page, set_page) = signal(0u32);
    let (loading, set_loading) = signal(false);
    let (exhausted, set_exhausted) = signal(false);

    // 追加加载下一页，切换分类时先清空
    let load_page = move || {
        if loading.get_untracked() || exhausted.get_untracked() {
            return;
        }
        set_loading.set(true);
        let req = ListTopicsRequest {
            page: page.get_untracked(),
            category: category.get_untracked(),
        };
        spawn_local(async move {
            match ctx.call(&req).await {
                Ok(list) if list.is_empty() => set_exhausted.set(true),
                Ok(list) => {
                    set_topics.update(|t| t.extend(list));
                    set_page.update(|p| *p += 1);
                }
                Err(e) => notice.api_error("加载帖子失败", &e),
            }
            set_loading.set(false);
        });
    };

    let select_category = move |id: i32| {
        set_category.set(id);
        set_page.set(0);
        set_exhausted.set(false);
        set_topics.set(Vec::new());
        load_page();
    };

    load_page();

    view! {
        <NoticeToast notice=notice />
        <div class="card bg-base-100 shadow mb-4">
            <div class="card-body py-4">
                <div class="flex flex-wrap gap-2">
                    <button
                        class=move || if category.get() == 0 { "btn btn-sm btn-primary" } else { "btn btn-sm" }
                        on:click=move |_| select_category(0)
                    >
                        "全部"
                    </button>
                    <For
                        each=move || ctx.state.with(|s| s.categories().to_vec())
                        key=|c| c.id
                        children=move |c| {
                            let id = c.id;
                            view! {
                                <button
                                    class=move || if category.get() == id { "btn btn-sm btn-primary" } else { "btn btn-sm" }
                                    title=c.desc
                                    on:click=move |_| select_category(id)
                                >
                                    {c.name}
                                </button>
                            }
                        }
                    />
                </div>
            </div>
        </div>

        <div class="space-y-3">
            <For
                each=move || topics.get()
                key=|t| t.id
                children=move |topic| {
                    let category = ctx.state.with_untracked(|s| s.find_category_by_id(topic.category).cloned());
                    view! {
                        <div class="card bg-base-100 shadow">
                            <div class="card-body py-4">
                                <div class="flex items-center gap-2 text-sm opacity-70">
                                    <span>{topic.username}</span>
                                    <span>{topic.time.map(|t| t.format("%Y-%m-%d %H:%M").to_string())}</span>
                                    <CategoryBadge category=category />
                                </div>
                                <Link to=AppRoute::TopicDetail(topic.id) class="card-title link link-hover">
                                    {topic.title}
                                </Link>
                                <p class="line-clamp-2 opacity-80">{topic.text}</p>
                                <div class="text-xs opacity-60">
                                    {format!("{} 点赞 · {} 收藏", topic.like, topic.collect)}
                                </div>
                            </div>
                        </div>
                    }
                }
            />
            <Show when=move || loading.get()>
                <Spinner />
            </Show>
            <Show when=move || !loading.get() && topics.with(Vec::is_empty)>
                <Empty text="这个分类下还没有帖子" />
            </Show>
            <Show when=move || !exhausted.get() && !topics.with(Vec::is_empty)>
                <button class="btn btn-ghost w-full" on:click=move |_| load_page()>"加载更多"</button>
            </Show>
        </div>
    }
}

#[component]
pub fn TopicDetailPage(tid: i32) -> impl IntoView {
    let ctx = use_session();
    let notice = Notice::new();
    let (topic, set_topic) = signal(None::<TopicDetail>);

    spawn_local(async move {
        match ctx.call(&TopicDetailRequest { tid }).await {
            Ok(detail) => set_topic.set(Some(detail)),
            Err(e) => notice.api_error("加载帖子失败", &e),
        }
    });

    view! {
        <NoticeToast notice=notice />
        <div class="mb-4">
            <Link to=AppRoute::TopicList class="btn btn-ghost btn-sm">"← 返回列表"</Link>
        </div>
        {move || match topic.get() {
            None => view! { <Spinner /> }.into_any(),
            Some(detail) => {
                let category = ctx.state.with(|s| s.find_category_by_id(detail.category).cloned());
                let avatar = detail
                    .user
                    .avatar
                    .as_deref()
                    .map(|a| ctx.image_url(a))
                    .unwrap_or_else(|| campus_shared::DEFAULT_AVATAR.to_string());
                view! {
                    <div class="card bg-base-100 shadow">
                        <div class="card-body">
                            <h2 class="card-title text-2xl">{detail.title}</h2>
                            <div class="flex items-center gap-2 text-sm opacity-70">
                                <CategoryBadge category=category />
                                <span>{detail.time.map(|t| t.format("%Y-%m-%d %H:%M").to_string())}</span>
                            </div>
                            <div class="divider my-1"></div>
                            <div class="flex gap-6">
                                <div class="w-32 shrink-0 text-center space-y-1">
                                    <div class="avatar">
                                        <div class="w-16 rounded-full"><img src=avatar alt="avatar" /></div>
                                    </div>
                                    <div class="font-bold">{detail.user.username}</div>
                                    <div class="text-xs opacity-60">
                                        {detail.user.desc.unwrap_or_else(|| "这个用户很懒，没有填写简介".to_string())}
                                    </div>
                                </div>
                                <div class="whitespace-pre-wrap flex-1">{delta_to_text(&detail.content)}</div>
                            </div>
                        </div>
                    </div>
                }
                .into_any()
            }
        }}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_to_text() {
        let delta = r#"{"ops":[{"insert":"你好"},{"insert":{"image":"/a.png"}},{"insert":"\n世界"}]}"#;
        assert_eq!(delta_to_text(delta), "你好\n世界");
        assert_eq!(delta_to_text("plain"), "plain");
        assert_eq!(delta_to_text(r#"{"x":1}"#), "");
    }
}
