//! 校园活动：按状态浏览与详情

use crate::components::common::{Empty, Notice, NoticeToast, Spinner};
use crate::session::use_session;
use crate::web::router::Link;
use campus_shared::protocol::{ActivityDetailRequest, ListActivitiesRequest};
use campus_shared::route::AppRoute;
use campus_shared::{Activity, ActivityStatus};
use chrono::NaiveDateTime;
use leptos::prelude::*;
use leptos::task::spawn_local;

pub const ACTIVITY_STATUSES: [ActivityStatus; 4] = [
    ActivityStatus::NotStarted,
    ActivityStatus::Ongoing,
    ActivityStatus::Finished,
    ActivityStatus::Cancelled,
];

pub fn status_badge(status: ActivityStatus) -> &'static str {
    match status {
        ActivityStatus::NotStarted => "badge badge-info",
        ActivityStatus::Ongoing => "badge badge-success",
        ActivityStatus::Finished => "badge badge-ghost",
        _ => "badge badge-error",
    }
}

pub fn format_time(t: &NaiveDateTime) -> String {
    t.format("%Y-%m-%d %H:%M").to_string()
}

/// 人数显示，未设上限时只显示已报名人数
pub fn participants_text(activity: &Activity) -> String {
    let current = activity.current_participants.unwrap_or(0);
    match activity.max_participants {
        Some(max) if max > 0 => format!("{current}/{max} 人"),
        _ => format!("{current} 人（不限）"),
    }
}

#[component]
pub fn ActivityPage() -> impl IntoView {
    let ctx = use_session();
    let notice = Notice::new();

    let (activities, set_activities) = signal(Vec::<Activity>::new());
    let (filter, set_filter) = signal(None::<ActivityStatus>);
    let (loading, set_loading) = signal(false);

    let load = move |status: Option<ActivityStatus>| {
        set_filter.set(status);
        set_loading.set(true);
        spawn_local(async move {
            match ctx.call(&ListActivitiesRequest { status }).await {
                Ok(list) => set_activities.set(list),
                Err(e) => notice.api_error("加载活动失败", &e),
            }
            set_loading.set(false);
        });
    };

    load(None);

    let tab = move |label: &'static str, status: Option<ActivityStatus>| {
        view! {
            <a
                role="tab"
                class=move || if filter.get() == status { "tab tab-active" } else { "tab" }
                on:click=move |_| load(status)
            >
                {label}
            </a>
        }
    };

    view! {
        <NoticeToast notice=notice />
        <div role="tablist" class="tabs tabs-boxed mb-4 bg-base-100">
            {tab("全部", None)}
            {ACTIVITY_STATUSES.iter().map(|s| tab(s.text(), Some(*s))).collect_view()}
        </div>

        <Show when=move || loading.get()>
            <Spinner />
        </Show>
        <Show when=move || !loading.get() && activities.with(Vec::is_empty)>
            <Empty text="暂无活动" />
        </Show>
        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
            <For
                each=move || activities.get()
                key=|a| a.id
                children=move |activity| {
                    let cover = activity.cover_image.as_deref().map(|p| ctx.image_url(p));
                    let participants = participants_text(&activity);
                    view! {
                        <div class="card bg-base-100 shadow">
                            {cover.map(|src| view! { <figure><img class="h-40 w-full object-cover" src=src /></figure> })}
                            <div class="card-body py-4">
                                <div class="flex items-center gap-2">
                                    <Link to=AppRoute::ActivityDetail(activity.id) class="card-title link link-hover">
                                        {activity.title}
                                    </Link>
                                    <span class=status_badge(activity.status)>{activity.status.text()}</span>
                                </div>
                                <div class="text-sm opacity-70">
                                    {format!("{} · {}", activity.location, format_time(&activity.activity_time))}
                                </div>
                                <div class="text-xs opacity-60">{participants}</div>
                            </div>
                        </div>
                    }
                }
            />
        </div>
    }
}

#[component]
pub fn ActivityDetailPage(id: i32) -> impl IntoView {
    let ctx = use_session();
    let notice = Notice::new();
    let (activity, set_activity) = signal(None::<Activity>);

    spawn_local(async move {
        match ctx.call(&ActivityDetailRequest { id }).await {
            Ok(found) => set_activity.set(Some(found)),
            Err(e) => notice.api_error("加载活动失败", &e),
        }
    });

    view! {
        <NoticeToast notice=notice />
        <div class="mb-4">
            <Link to=AppRoute::Activity class="btn btn-ghost btn-sm">"← 返回活动列表"</Link>
        </div>
        {move || match activity.get() {
            None => view! { <Spinner /> }.into_any(),
            Some(a) => {
                let cover = a.cover_image.as_deref().map(|p| ctx.image_url(p));
                let participants = participants_text(&a);
                let end = a.end_time.as_ref().map(format_time).unwrap_or_else(|| "未定".to_string());
                view! {
                    <div class="card bg-base-100 shadow">
                        {cover.map(|src| view! { <figure><img class="max-h-72 w-full object-cover" src=src /></figure> })}
                        <div class="card-body">
                            <div class="flex items-center gap-2">
                                <h2 class="card-title text-2xl">{a.title}</h2>
                                <span class=status_badge(a.status)>{a.status.text()}</span>
                            </div>
                            <div class="grid grid-cols-2 gap-2 text-sm">
                                <div>"地点：" {a.location}</div>
                                <div>"人数：" {participants}</div>
                                <div>"开始：" {format_time(&a.activity_time)}</div>
                                <div>"结束：" {end}</div>
                            </div>
                            <div class="divider my-1"></div>
                            <p class="whitespace-pre-wrap">{a.content}</p>
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
    use chrono::NaiveDate;

    fn activity(max: Option<i32>, current: Option<i32>) -> Activity {
        Activity {
            id: 1,
            admin_id: None,
            admin_username: None,
            title: "t".into(),
            content: String::new(),
            location: "操场".into(),
            activity_time: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            end_time: None,
            cover_image: None,
            max_participants: max,
            current_participants: current,
            status: ActivityStatus::NotStarted,
            create_time: None,
            update_time: None,
        }
    }

    #[test]
    fn test_participants_text() {
        assert_eq!(participants_text(&activity(Some(50), Some(12))), "12/50 人");
        assert_eq!(participants_text(&activity(Some(0), None)), "0 人（不限）");
        assert_eq!(participants_text(&activity(None, Some(3))), "3 人（不限）");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(&activity(None, None).activity_time), "2024-06-01 09:00");
    }
}
