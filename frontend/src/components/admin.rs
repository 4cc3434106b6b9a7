//! 管理后台：访问统计、用户、论坛分类、活动、表白墙审核

use crate::components::activity::{ACTIVITY_STATUSES, format_time, participants_text, status_badge};
use crate::components::common::{
    Empty, Notice, NoticeToast, Spinner, TextField, parse_date, parse_datetime_local,
};
use crate::components::love_wall::gender_text;
use crate::session::{load_categories, use_session};
use crate::web::Interval;
use campus_shared::date::{
    format_date, format_growth_rate, format_month_day, format_number, growth_rate,
};
use campus_shared::protocol::{
    ActivityStatusRequest, AdminListActivitiesRequest, DeleteActivityRequest, ListAccountsRequest,
    PendingLoveWallRequest, RecentStatisticsRequest, ReviewLoveWallRequest,
    StatisticsByDateRequest, StatisticsRangeRequest, SummaryRequest, UpdateActivityRequest,
};
use campus_shared::{
    AccountInfo, Activity, ActivityForm, ActivityStatus, LoveWall, ROLE_ADMIN, ReviewStatus,
    VisitStatistics, VisitSummary,
};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 统计面板自动刷新间隔
const STATISTICS_REFRESH_MS: u32 = 60_000;
const ACCOUNT_PAGE_SIZE: u32 = 10;

// =========================================================
// 访问统计
// =========================================================

#[component]
fn StatCard(
    #[prop(into)] title: String,
    value: Signal<i64>,
    previous: Signal<i64>,
    #[prop(into)] hint: String,
) -> impl IntoView {
    let rate = move || growth_rate(value.get(), previous.get());
    view! {
        <div class="stat">
            <div class="stat-title">{title}</div>
            <div class="stat-value text-primary">{move || format_number(value.get())}</div>
            <div class=move || { if rate() >= 0.0 { "stat-desc text-success" } else { "stat-desc text-error" } }>
                {hint} " " {move || format_growth_rate(rate())}
            </div>
        </div>
    }
}

#[component]
fn TrendTable(rows: Signal<Vec<VisitStatistics>>) -> impl IntoView {
    let peak = move || rows.with(|r| r.iter().map(|s| s.page_views).max().unwrap_or(0).max(1));
    view! {
        <table class="table table-sm">
            <thead>
                <tr><th>"日期"</th><th>"浏览量"</th><th>"访客数"</th><th class="w-1/2"></th></tr>
            </thead>
            <tbody>
                <For
                    each=move || rows.get()
                    key=|s| s.statistics_date
                    children=move |s| {
                        let width = s.page_views * 100 / peak();
                        view! {
                            <tr>
                                <td>{format_month_day(s.statistics_date)}</td>
                                <td>{format_number(s.page_views)}</td>
                                <td>{format_number(s.unique_visitors)}</td>
                                <td>
                                    <progress class="progress progress-primary" value=width.to_string() max="100"></progress>
                                </td>
                            </tr>
                        }
                    }
                />
            </tbody>
        </table>
    }
}

#[component]
pub fn AdminWelcomePage() -> impl IntoView {
    let ctx = use_session();
    let notice = Notice::new();

    let (summary, set_summary) = signal(VisitSummary::default());
    let (recent, set_recent) = signal(Vec::<VisitStatistics>::new());
    let (range_rows, set_range_rows) = signal(Vec::<VisitStatistics>::new());
    let (day, set_day) = signal(None::<Option<VisitStatistics>>);
    let day_input = RwSignal::new(String::new());
    let range_start = RwSignal::new(String::new());
    let range_end = RwSignal::new(String::new());

    let load = move || {
        spawn_local(async move {
            match ctx.call(&SummaryRequest).await {
                Ok(data) => set_summary.set(data),
                Err(e) => notice.api_error("加载统计失败", &e),
            }
            if let Ok(days) = ctx.call(&RecentStatisticsRequest::default()).await {
                set_recent.set(days);
            }
        });
    };

    let lookup_day = move |_| {
        let Some(date) = parse_date(&day_input.get()) else {
            notice.error("请选择日期");
            return;
        };
        spawn_local(async move {
            match ctx.call(&StatisticsByDateRequest { date }).await {
                Ok(found) => set_day.set(Some(found)),
                Err(e) => notice.api_error("查询失败", &e),
            }
        });
    };

    let lookup_range = move |_| {
        let (Some(start), Some(end)) = (parse_date(&range_start.get()), parse_date(&range_end.get()))
        else {
            notice.error("请选择起止日期");
            return;
        };
        if start > end {
            notice.error("开始日期不能晚于结束日期");
            return;
        }
        spawn_local(async move {
            match ctx.call(&StatisticsRangeRequest { start, end }).await {
                Ok(rows) => set_range_rows.set(rows),
                Err(e) => notice.api_error("查询失败", &e),
            }
        });
    };

    load();
    // 随页面销毁而清除
    let _refresh = StoredValue::new_local(Interval::new(STATISTICS_REFRESH_MS, load));

    let pick = move |f: fn(&VisitSummary) -> i64| Signal::derive(move || summary.with(f));

    view! {
        <NoticeToast notice=notice />
        <div class="flex items-center justify-between mb-4">
            <h2 class="text-2xl font-bold">
                {move || format!("欢迎回来，{}", ctx.state.with(|s| s.user().username.clone()))}
            </h2>
            <button class="btn btn-ghost btn-sm" on:click=move |_| load()>"刷新"</button>
        </div>

        <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100 mb-4">
            <StatCard title="今日浏览量" value=pick(|s| s.today_pv) previous=pick(|s| s.yesterday_pv) hint="较昨日" />
            <StatCard title="今日访客" value=pick(|s| s.today_uv) previous=pick(|s| s.yesterday_uv) hint="较昨日" />
            <div class="stat">
                <div class="stat-title">"近七日"</div>
                <div class="stat-value">{move || format_number(summary.with(|s| s.week_pv))}</div>
                <div class="stat-desc">{move || format!("访客 {}", format_number(summary.with(|s| s.week_uv)))}</div>
            </div>
            <div class="stat">
                <div class="stat-title">"近三十日"</div>
                <div class="stat-value">{move || format_number(summary.with(|s| s.month_pv))}</div>
                <div class="stat-desc">{move || format!("访客 {}", format_number(summary.with(|s| s.month_uv)))}</div>
            </div>
        </div>

        <div class="grid grid-cols-1 lg:grid-cols-2 gap-4">
            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h3 class="card-title">"最近七日趋势"</h3>
                    <TrendTable rows=Signal::derive(move || recent.get()) />
                </div>
            </div>
            <div class="card bg-base-100 shadow">
                <div class="card-body">
                    <h3 class="card-title">"按日期查询"</h3>
                    <div class="flex items-end gap-2">
                        <TextField label="日期" value=day_input kind="date" />
                        <button class="btn btn-primary" on:click=lookup_day>"查询"</button>
                    </div>
                    {move || day.get().map(|found| match found {
                        Some(s) => format!(
                            "{}：浏览量 {}，访客 {}",
                            format_date(s.statistics_date),
                            s.page_views,
                            s.unique_visitors
                        ),
                        None => "该日期暂无统计数据".to_string(),
                    })}

                    <h3 class="card-title mt-4">"区间查询"</h3>
                    <div class="flex items-end gap-2">
                        <TextField label="开始" value=range_start kind="date" />
                        <TextField label="结束" value=range_end kind="date" />
                        <button class="btn btn-primary" on:click=lookup_range>"查询"</button>
                    </div>
                    <Show when=move || !range_rows.with(Vec::is_empty)>
                        <TrendTable rows=Signal::derive(move || range_rows.get()) />
                    </Show>
                </div>
            </div>
        </div>
    }
}

// =========================================================
// 用户管理
// =========================================================

#[component]
pub fn AdminUserPage() -> impl IntoView {
    let ctx = use_session();
    let notice = Notice::new();

    let (accounts, set_accounts) = signal(Vec::<AccountInfo>::new());
    let (total, set_total) = signal(0i64);
    let (page, set_page) = signal(1u32);
    let (loading, set_loading) = signal(false);

    let load = move |target: u32| {
        set_loading.set(true);
        spawn_local(async move {
            let req = ListAccountsRequest {
                page: target,
                size: ACCOUNT_PAGE_SIZE,
            };
            match ctx.call(&req).await {
                Ok(data) => {
                    set_total.set(data.total);
                    set_accounts.set(data.list);
                    set_page.set(target);
                }
                Err(e) => notice.api_error("加载用户失败", &e),
            }
            set_loading.set(false);
        });
    };

    let page_count = move || {
        let total = total.get().max(0) as u32;
        total.div_ceil(ACCOUNT_PAGE_SIZE).max(1)
    };

    load(1);

    view! {
        <NoticeToast notice=notice />
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h3 class="card-title">{move || format!("用户列表（共 {} 人）", total.get())}</h3>
                <div class="overflow-x-auto">
                    <table class="table table-zebra">
                        <thead>
                            <tr><th>"ID"</th><th>"用户名"</th><th>"邮箱"</th><th>"角色"</th><th>"注册时间"</th><th>"状态"</th></tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || accounts.get()
                                key=|a| (a.id, a.username.clone())
                                children=move |a| view! {
                                    <tr>
                                        <td>{a.id.map(|id| id.to_string()).unwrap_or_default()}</td>
                                        <td>{a.username}</td>
                                        <td>{a.email}</td>
                                        <td>
                                            {if a.role == ROLE_ADMIN {
                                                view! { <span class="badge badge-primary">"管理员"</span> }.into_any()
                                            } else {
                                                view! { <span class="badge badge-ghost">"普通用户"</span> }.into_any()
                                            }}
                                        </td>
                                        <td>{a.register_time.map(|t| t.format("%Y-%m-%d").to_string())}</td>
                                        <td>
                                            {a.banned.then(|| view! { <span class="badge badge-error">"已封禁"</span> })}
                                            {a.mute.then(|| view! { <span class="badge badge-warning">"已禁言"</span> })}
                                        </td>
                                    </tr>
                                }
                            />
                        </tbody>
                    </table>
                </div>
                <Show when=move || loading.get()>
                    <Spinner />
                </Show>
                <div class="join justify-center">
                    <button class="join-item btn" disabled=move || { page.get() <= 1 } on:click=move |_| load(page.get_untracked().saturating_sub(1).max(1))>"«"</button>
                    <button class="join-item btn">{move || format!("{} / {}", page.get(), page_count())}</button>
                    <button class="join-item btn" disabled=move || { page.get() >= page_count() } on:click=move |_| load(page.get_untracked() + 1)>"»"</button>
                </div>
            </div>
        </div>
    }
}

// =========================================================
// 论坛管理
// =========================================================

#[component]
pub fn AdminForumPage() -> impl IntoView {
    let ctx = use_session();

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <div class="flex items-center justify-between">
                    <h3 class="card-title">"帖子分类"</h3>
                    <button class="btn btn-ghost btn-sm" on:click=move |_| spawn_local(load_categories(ctx))>"刷新"</button>
                </div>
                <Show when=move || ctx.state.with(|s| s.categories().is_empty())>
                    <Empty text="暂无分类" />
                </Show>
                <table class="table">
                    <thead>
                        <tr><th>"ID"</th><th>"名称"</th><th>"描述"</th><th>"颜色"</th></tr>
                    </thead>
                    <tbody>
                        <For
                            each=move || ctx.state.with(|s| s.categories().to_vec())
                            key=|c| c.id
                            children=move |c| view! {
                                <tr>
                                    <td>{c.id}</td>
                                    <td>{c.name}</td>
                                    <td>{c.desc}</td>
                                    <td><span class="badge" style=format!("background: {}", c.color)>{c.color.clone()}</span></td>
                                </tr>
                            }
                        />
                    </tbody>
                </table>
            </div>
        </div>
    }
}

// =========================================================
// 活动管理
// =========================================================

/// 活动编辑表单的输入状态
#[derive(Clone, Copy)]
struct ActivityDraft {
    editing: RwSignal<Option<i32>>,
    title: RwSignal<String>,
    content: RwSignal<String>,
    location: RwSignal<String>,
    start: RwSignal<String>,
    end: RwSignal<String>,
    cover: RwSignal<String>,
    max: RwSignal<String>,
}

impl ActivityDraft {
    fn new() -> Self {
        Self {
            editing: RwSignal::new(None),
            title: RwSignal::new(String::new()),
            content: RwSignal::new(String::new()),
            location: RwSignal::new(String::new()),
            start: RwSignal::new(String::new()),
            end: RwSignal::new(String::new()),
            cover: RwSignal::new(String::new()),
            max: RwSignal::new(String::new()),
        }
    }

    fn reset(&self) {
        self.editing.set(None);
        for field in [
            self.title,
            self.content,
            self.location,
            self.start,
            self.end,
            self.cover,
            self.max,
        ] {
            field.set(String::new());
        }
    }

    fn fill(&self, a: &Activity) {
        let input = |t: &chrono::NaiveDateTime| t.format("%Y-%m-%dT%H:%M").to_string();
        self.editing.set(Some(a.id));
        self.title.set(a.title.clone());
        self.content.set(a.content.clone());
        self.location.set(a.location.clone());
        self.start.set(input(&a.activity_time));
        self.end.set(a.end_time.as_ref().map(input).unwrap_or_default());
        self.cover.set(a.cover_image.clone().unwrap_or_default());
        self.max
            .set(a.max_participants.map(|m| m.to_string()).unwrap_or_default());
    }

    fn to_form(self) -> Result<ActivityForm, &'static str> {
        let title = self.title.get_untracked().trim().to_string();
        let location = self.location.get_untracked().trim().to_string();
        if title.is_empty() || location.is_empty() {
            return Err("请填写活动标题和地点");
        }
        let activity_time =
            parse_datetime_local(&self.start.get_untracked()).ok_or("请选择活动开始时间")?;
        let end_time = parse_datetime_local(&self.end.get_untracked());
        if end_time.is_some_and(|end| end < activity_time) {
            return Err("结束时间不能早于开始时间");
        }
        let cover = self.cover.get_untracked().trim().to_string();
        Ok(ActivityForm {
            title,
            content: self.content.get_untracked(),
            location,
            activity_time,
            end_time,
            cover_image: (!cover.is_empty()).then_some(cover),
            max_participants: self.max.get_untracked().trim().parse().ok(),
        })
    }
}

#[component]
pub fn AdminActivityPage() -> impl IntoView {
    let ctx = use_session();
    let notice = Notice::new();
    let draft = ActivityDraft::new();

    let (activities, set_activities) = signal(Vec::<Activity>::new());
    let (loading, set_loading) = signal(false);

    let load = move || {
        set_loading.set(true);
        spawn_local(async move {
            match ctx.call(&AdminListActivitiesRequest).await {
                Ok(list) => set_activities.set(list),
                Err(e) => notice.api_error("加载活动失败", &e),
            }
            set_loading.set(false);
        });
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let form = match draft.to_form() {
            Ok(form) => form,
            Err(msg) => {
                notice.error(msg);
                return;
            }
        };
        let editing = draft.editing.get_untracked();
        spawn_local(async move {
            let result = match editing {
                Some(id) => ctx.call(&UpdateActivityRequest { id, form }).await,
                None => ctx.call(&form).await,
            };
            match result {
                Ok(()) => {
                    notice.success(if editing.is_some() { "活动已更新" } else { "活动已创建" });
                    draft.reset();
                    load();
                }
                Err(e) => notice.api_error("保存活动失败", &e),
            }
        });
    };

    let change_status = move |id: i32, status: ActivityStatus| {
        spawn_local(async move {
            match ctx.call(&ActivityStatusRequest { id, status }).await {
                Ok(()) => set_activities.update(|list| {
                    if let Some(a) = list.iter_mut().find(|a| a.id == id) {
                        a.status = status;
                    }
                }),
                Err(e) => notice.api_error("更新状态失败", &e),
            }
        });
    };

    let delete = move |id: i32| {
        spawn_local(async move {
            match ctx.call(&DeleteActivityRequest { id }).await {
                Ok(()) => {
                    notice.success("活动已删除");
                    set_activities.update(|list| list.retain(|a| a.id != id));
                }
                Err(e) => notice.api_error("删除活动失败", &e),
            }
        });
    };

    load();

    view! {
        <NoticeToast notice=notice />
        <div class="card bg-base-100 shadow mb-4">
            <form class="card-body" on:submit=on_submit>
                <h3 class="card-title">
                    {move || match draft.editing.get() {
                        Some(id) => format!("编辑活动 #{id}"),
                        None => "发布新活动".to_string(),
                    }}
                </h3>
                <div class="grid grid-cols-1 md:grid-cols-2 gap-x-4">
                    <TextField label="标题" value=draft.title />
                    <TextField label="地点" value=draft.location />
                    <TextField label="开始时间" value=draft.start kind="datetime-local" />
                    <TextField label="结束时间" value=draft.end kind="datetime-local" />
                    <TextField label="封面图片路径" value=draft.cover />
                    <TextField label="人数上限（0 为不限）" value=draft.max kind="number" />
                </div>
                <label class="form-control">
                    <div class="label"><span class="label-text">"活动内容"</span></div>
                    <textarea
                        class="textarea textarea-bordered h-24"
                        prop:value=draft.content
                        on:input=move |ev| draft.content.set(event_target_value(&ev))
                    ></textarea>
                </label>
                <div class="card-actions justify-end mt-4">
                    <Show when=move || draft.editing.get().is_some()>
                        <button type="button" class="btn" on:click=move |_| draft.reset()>"取消编辑"</button>
                    </Show>
                    <button class="btn btn-primary">"保存"</button>
                </div>
            </form>
        </div>

        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <h3 class="card-title">"全部活动"</h3>
                <Show when=move || loading.get()>
                    <Spinner />
                </Show>
                <div class="overflow-x-auto">
                    <table class="table">
                        <thead>
                            <tr><th>"标题"</th><th>"时间"</th><th>"地点"</th><th>"人数"</th><th>"状态"</th><th></th></tr>
                        </thead>
                        <tbody>
                            <For
                                each=move || activities.get()
                                key=|a| (a.id, a.status.code())
                                children=move |a| {
                                    let id = a.id;
                                    let participants = participants_text(&a);
                                    let editable = a.clone();
                                    view! {
                                        <tr>
                                            <td>{a.title}</td>
                                            <td>{format_time(&a.activity_time)}</td>
                                            <td>{a.location}</td>
                                            <td>{participants}</td>
                                            <td><span class=status_badge(a.status)>{a.status.text()}</span></td>
                                            <td>
                                                <div class="flex gap-1">
                                                    <select
                                                        class="select select-bordered select-xs"
                                                        on:change=move |ev| {
                                                            if let Ok(code) = event_target_value(&ev).parse::<i32>() {
                                                                change_status(id, ActivityStatus::from(code));
                                                            }
                                                        }
                                                    >
                                                        {ACTIVITY_STATUSES
                                                            .iter()
                                                            .map(|s| view! {
                                                                <option value=s.code().to_string() selected={*s == a.status}>{s.text()}</option>
                                                            })
                                                            .collect_view()}
                                                    </select>
                                                    <button class="btn btn-xs" on:click=move |_| draft.fill(&editable)>"编辑"</button>
                                                    <button class="btn btn-xs btn-error" on:click=move |_| delete(id)>"删除"</button>
                                                </div>
                                            </td>
                                        </tr>
                                    }
                                }
                            />
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}

// =========================================================
// 表白墙审核
// =========================================================

#[component]
pub fn AdminLoveWallPage() -> impl IntoView {
    let ctx = use_session();
    let notice = Notice::new();

    let (pending, set_pending) = signal(Vec::<LoveWall>::new());
    let (loading, set_loading) = signal(false);

    let load = move || {
        set_loading.set(true);
        spawn_local(async move {
            match ctx.call(&PendingLoveWallRequest).await {
                Ok(list) => set_pending.set(list),
                Err(e) => notice.api_error("加载待审核列表失败", &e),
            }
            set_loading.set(false);
        });
    };

    let review = move |id: i32, status: ReviewStatus| {
        spawn_local(async move {
            match ctx.call(&ReviewLoveWallRequest { id, status }).await {
                Ok(()) => {
                    notice.success(status.text());
                    set_pending.update(|list| list.retain(|p| p.id != id));
                }
                Err(e) => notice.api_error("审核失败", &e),
            }
        });
    };

    load();

    view! {
        <NoticeToast notice=notice />
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <div class="flex items-center justify-between">
                    <h3 class="card-title">"待审核"</h3>
                    <button class="btn btn-ghost btn-sm" on:click=move |_| load()>"刷新"</button>
                </div>
                <Show when=move || loading.get()>
                    <Spinner />
                </Show>
                <Show when=move || !loading.get() && pending.with(Vec::is_empty)>
                    <Empty text="没有需要审核的内容" />
                </Show>
                <For
                    each=move || pending.get()
                    key=|p| p.id
                    children=move |p| {
                        let id = p.id;
                        view! {
                            <div class="border border-base-200 rounded-box p-4 mb-2">
                                <div class="flex items-center gap-2">
                                    <span class="font-bold">{p.nickname}</span>
                                    <span class="text-xs opacity-60">
                                        {format!("{} · {}", gender_text(p.gender), p.age.map(|a| a.to_string()).unwrap_or_default())}
                                    </span>
                                </div>
                                <p class="whitespace-pre-wrap my-2">{p.introduction}</p>
                                <div class="text-sm opacity-70">"联系方式：" {p.contact}</div>
                                <div class="flex gap-2 justify-end">
                                    <button class="btn btn-sm btn-success" on:click=move |_| review(id, ReviewStatus::Approved)>"通过"</button>
                                    <button class="btn btn-sm btn-error" on:click=move |_| review(id, ReviewStatus::Rejected)>"拒绝"</button>
                                </div>
                            </div>
                        }
                    }
                />
            </div>
        </div>
    }
}
