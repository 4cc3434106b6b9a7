//! 失物招领：列表筛选、发布、详情

use crate::components::common::{
    Empty, Notice, NoticeToast, Spinner, TextField, parse_date, parse_datetime_local, split_list,
};
use crate::session::use_session;
use crate::web::router::{Link, use_router};
use campus_shared::protocol::{
    DeleteLostFoundRequest, LostFoundDetailRequest, LostFoundStatusRequest,
};
use campus_shared::route::AppRoute;
use campus_shared::{LostFound, LostFoundForm, LostFoundQuery, LostFoundStatus};
use chrono::{Local, TimeZone, Utc};
use leptos::prelude::*;
use leptos::task::spawn_local;

const STATUS_OPTIONS: [LostFoundStatus; 3] = [
    LostFoundStatus::Searching,
    LostFoundStatus::Found,
    LostFoundStatus::Expired,
];

fn status_badge(status: LostFoundStatus) -> &'static str {
    match status {
        LostFoundStatus::Searching => "badge badge-warning",
        LostFoundStatus::Found => "badge badge-success",
        _ => "badge badge-ghost",
    }
}

fn format_local(t: Option<chrono::DateTime<Utc>>) -> String {
    t.map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

#[component]
pub fn LostFoundPage() -> impl IntoView {
    let ctx = use_session();
    let notice = Notice::new();

    let (items, set_items) = signal(Vec::<LostFound>::new());
    let (loading, set_loading) = signal(false);

    let location = RwSignal::new(String::new());
    let start = RwSignal::new(String::new());
    let end = RwSignal::new(String::new());
    let status = RwSignal::new(String::new());

    let search = move || {
        let query = LostFoundQuery {
            location: Some(location.get_untracked().trim().to_string()),
            start_time: parse_date(&start.get_untracked()),
            end_time: parse_date(&end.get_untracked()),
            status: status
                .get_untracked()
                .parse::<i32>()
                .ok()
                .map(LostFoundStatus::from),
        };
        set_loading.set(true);
        spawn_local(async move {
            match ctx.call(&query).await {
                Ok(list) => set_items.set(list),
                Err(e) => notice.api_error("加载失物招领失败", &e),
            }
            set_loading.set(false);
        });
    };

    let reset = move |_| {
        location.set(String::new());
        start.set(String::new());
        end.set(String::new());
        status.set(String::new());
        search();
    };

    search();

    view! {
        <NoticeToast notice=notice />
        <div class="card bg-base-100 shadow mb-4">
            <div class="card-body py-4">
                <div class="flex flex-wrap items-end gap-2">
                    <TextField label="地点" value=location placeholder="如：图书馆" />
                    <TextField label="开始日期" value=start kind="date" />
                    <TextField label="结束日期" value=end kind="date" />
                    <label class="form-control">
                        <div class="label"><span class="label-text">"状态"</span></div>
                        <select
                            class="select select-bordered"
                            prop:value=status
                            on:change=move |ev| status.set(event_target_value(&ev))
                        >
                            <option value="">"全部"</option>
                            {STATUS_OPTIONS
                                .iter()
                                .map(|s| view! { <option value=s.code().to_string()>{s.text()}</option> })
                                .collect_view()}
                        </select>
                    </label>
                    <button class="btn btn-primary" on:click=move |_| search()>"搜索"</button>
                    <button class="btn" on:click=reset>"重置"</button>
                    <div class="flex-1"></div>
                    <Link to=AppRoute::LostFoundCreate class="btn btn-success">"发布信息"</Link>
                </div>
            </div>
        </div>

        <Show when=move || loading.get()>
            <Spinner />
        </Show>
        <Show when=move || !loading.get() && items.with(Vec::is_empty)>
            <Empty text="暂无失物招领信息" />
        </Show>
        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
            <For
                each=move || items.get()
                key=|item| item.id
                children=move |item| {
                    let cover = item.images.first().map(|p| ctx.image_url(p));
                    view! {
                        <div class="card bg-base-100 shadow">
                            {cover.map(|src| view! { <figure><img class="h-40 w-full object-cover" src=src /></figure> })}
                            <div class="card-body py-4">
                                <div class="flex items-center gap-2">
                                    <Link to=AppRoute::LostFoundDetail(item.id) class="card-title link link-hover">
                                        {item.title}
                                    </Link>
                                    <span class=status_badge(item.status)>{item.status.text()}</span>
                                </div>
                                <p class="line-clamp-2 opacity-80">{item.description}</p>
                                <div class="text-xs opacity-60">
                                    {format!("{} · {}", item.location, format_local(item.lost_time))}
                                </div>
                            </div>
                        </div>
                    }
                }
            />
        </div>
    }
}

#[component]
pub fn LostFoundCreatePage() -> impl IntoView {
    let ctx = use_session();
    let router = use_router();
    let notice = Notice::new();

    let title = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let location = RwSignal::new(String::new());
    let lost_time = RwSignal::new(String::new());
    let contact = RwSignal::new(String::new());
    let images = RwSignal::new(String::new());
    let (submitting, set_submitting) = signal(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if title.get().trim().is_empty() || location.get().trim().is_empty() {
            notice.error("请填写标题和地点");
            return;
        }
        if contact.get().trim().is_empty() {
            notice.error("请填写联系方式");
            return;
        }
        let Some(lost_time) = parse_datetime_local(&lost_time.get())
            .and_then(|t| Local.from_local_datetime(&t).single())
            .map(|t| t.with_timezone(&Utc))
        else {
            notice.error("请选择丢失/拾取时间");
            return;
        };

        let form = LostFoundForm {
            title: title.get(),
            description: description.get(),
            location: location.get(),
            lost_time,
            contact_info: contact.get(),
            images: split_list(&images.get()),
        };
        set_submitting.set(true);
        spawn_local(async move {
            match ctx.call(&form).await {
                Ok(()) => router.navigate_to(AppRoute::LostFound),
                Err(e) => notice.api_error("发布失败", &e),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <NoticeToast notice=notice />
        <div class="card bg-base-100 shadow">
            <form class="card-body" on:submit=on_submit>
                <h2 class="card-title">"发布失物招领"</h2>
                <TextField label="标题" value=title />
                <label class="form-control">
                    <div class="label"><span class="label-text">"描述"</span></div>
                    <textarea
                        class="textarea textarea-bordered h-24"
                        prop:value=description
                        on:input=move |ev| description.set(event_target_value(&ev))
                    ></textarea>
                </label>
                <TextField label="地点" value=location />
                <TextField label="时间" value=lost_time kind="datetime-local" />
                <TextField label="联系方式" value=contact />
                <TextField label="图片路径（逗号分隔）" value=images />
                <div class="card-actions justify-end mt-4">
                    <Link to=AppRoute::LostFound class="btn">"取消"</Link>
                    <button class="btn btn-primary" disabled=move || submitting.get()>"发布"</button>
                </div>
            </form>
        </div>
    }
}

#[component]
pub fn LostFoundDetailPage(id: i32) -> impl IntoView {
    let ctx = use_session();
    let router = use_router();
    let notice = Notice::new();
    let (item, set_item) = signal(None::<LostFound>);

    let load = move || {
        spawn_local(async move {
            match ctx.call(&LostFoundDetailRequest { id }).await {
                Ok(found) => set_item.set(Some(found)),
                Err(e) => notice.api_error("加载失败", &e),
            }
        });
    };

    let change_status = move |status: LostFoundStatus| {
        spawn_local(async move {
            match ctx.call(&LostFoundStatusRequest { id, status }).await {
                Ok(()) => {
                    notice.success("状态已更新");
                    load();
                }
                Err(e) => notice.api_error("更新状态失败", &e),
            }
        });
    };

    let delete = move |_| {
        spawn_local(async move {
            match ctx.call(&DeleteLostFoundRequest { id }).await {
                Ok(()) => router.navigate_to(AppRoute::LostFound),
                Err(e) => notice.api_error("删除失败", &e),
            }
        });
    };

    load();

    view! {
        <NoticeToast notice=notice />
        <div class="mb-4">
            <Link to=AppRoute::LostFound class="btn btn-ghost btn-sm">"← 返回列表"</Link>
        </div>
        {move || match item.get() {
            None => view! { <Spinner /> }.into_any(),
            Some(found) => {
                let owned = i64::from(found.uid) == ctx.state.with(|s| s.user().id);
                let images = found.images.iter().map(|p| ctx.image_url(p)).collect::<Vec<_>>();
                view! {
                    <div class="card bg-base-100 shadow">
                        <div class="card-body">
                            <div class="flex items-center gap-2">
                                <h2 class="card-title text-2xl">{found.title}</h2>
                                <span class=status_badge(found.status)>{found.status.text()}</span>
                            </div>
                            <p class="whitespace-pre-wrap">{found.description}</p>
                            <div class="grid grid-cols-2 gap-2 text-sm">
                                <div>"地点：" {found.location}</div>
                                <div>"时间：" {format_local(found.lost_time)}</div>
                                <div>"联系方式：" {found.contact_info}</div>
                                <div>"发布者：" {found.username.unwrap_or_default()}</div>
                            </div>
                            <div class="flex flex-wrap gap-2">
                                {images.into_iter().map(|src| view! { <img class="h-32 rounded" src=src /> }).collect_view()}
                            </div>
                            <Show when=move || owned>
                                <div class="card-actions justify-end">
                                    {STATUS_OPTIONS
                                        .iter()
                                        .map(|s| {
                                            let s = *s;
                                            view! { <button class="btn btn-sm" on:click=move |_| change_status(s)>{format!("标记为{}", s.text())}</button> }
                                        })
                                        .collect_view()}
                                    <button class="btn btn-sm btn-error" on:click=delete>"删除"</button>
                                </div>
                            </Show>
                        </div>
                    </div>
                }
                .into_any()
            }
        }}
    }
}
