//! 表白墙：浏览、筛选、点赞、发布与管理自己的帖子

use crate::components::common::{Empty, Notice, NoticeToast, Spinner, TextField, split_list};
use crate::session::use_session;
use campus_shared::protocol::{
    DeleteLoveWallRequest, LikeLoveWallRequest, ListLoveWallRequest, LoveWallDetailRequest,
    LoveWallFilter, UpdateLoveWallRequest,
};
use campus_shared::{DEFAULT_AVATAR, LoveWall, LoveWallForm, ReviewStatus};
use leptos::prelude::*;
use leptos::task::spawn_local;

pub static GENDERS: [(i32, &str); 3] = [(0, "女"), (1, "男"), (2, "其他")];

pub fn gender_text(gender: Option<i32>) -> &'static str {
    gender
        .and_then(|g| GENDERS.iter().find(|(code, _)| *code == g))
        .map_or("未知", |(_, text)| *text)
}

/// 发布前的本地校验，与后端约束保持一致
pub fn validate_form(form: &LoveWallForm) -> Result<(), &'static str> {
    let len = |s: &str| s.chars().count();
    if !(1..=50).contains(&len(&form.nickname)) {
        return Err("昵称长度需在1-50个字符之间");
    }
    if !(10..=1000).contains(&len(&form.introduction)) {
        return Err("自我介绍需在10-1000个字符之间");
    }
    if !(1..=200).contains(&len(&form.contact)) {
        return Err("联系方式需在1-200个字符之间");
    }
    if form.age.is_some_and(|a| !(16..=60).contains(&a)) {
        return Err("年龄需在16-60之间");
    }
    if form.gender.is_some_and(|g| !(0..=2).contains(&g)) {
        return Err("性别选项无效");
    }
    Ok(())
}

#[component]
fn LoveWallCard(
    post: LoveWall,
    on_like: impl Fn(i32) + Copy + Send + Sync + 'static,
    on_delete: impl Fn(i32) + Copy + Send + Sync + 'static,
    on_edit: impl Fn(i32) + Copy + Send + Sync + 'static,
) -> impl IntoView {
    let ctx = use_session();
    let id = post.id;
    let avatar = post
        .avatar
        .as_deref()
        .filter(|a| !a.is_empty())
        .map_or_else(|| DEFAULT_AVATAR.to_string(), |a| ctx.image_url(a));
    let photos = post.photos.iter().map(|p| ctx.image_url(p)).collect::<Vec<_>>();
    let mine = post.is_mine.unwrap_or(false);
    let pending = post.status != ReviewStatus::Approved;
    let status = post.status;
    let meta = format!(
        "{} · {}",
        gender_text(post.gender),
        post.age.map_or_else(|| "年龄保密".to_string(), |a| format!("{a} 岁"))
    );
    let created = post
        .create_time
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body py-4">
                <div class="flex items-center gap-3">
                    <div class="avatar">
                        <div class="w-12 rounded-full"><img src=avatar alt="avatar" /></div>
                    </div>
                    <div class="flex-1">
                        <div class="font-bold">{post.nickname}</div>
                        <div class="text-xs opacity-60">{meta}</div>
                    </div>
                    <Show when=move || pending>
                        <span class="badge badge-warning">{status.text()}</span>
                    </Show>
                </div>
                <p class="whitespace-pre-wrap">{post.introduction}</p>
                <div class="flex flex-wrap gap-1">
                    {post.tags.into_iter().map(|t| view! { <span class="badge badge-secondary badge-outline">{t}</span> }).collect_view()}
                </div>
                <div class="flex flex-wrap gap-2">
                    {photos.into_iter().map(|src| view! { <img class="h-28 rounded" src=src /> }).collect_view()}
                </div>
                <div class="text-sm opacity-70">"联系方式：" {post.contact}</div>
                <div class="card-actions items-center justify-between">
                    <span class="text-xs opacity-50">{created}</span>
                    <div class="flex gap-2">
                        <button class="btn btn-sm btn-ghost text-error" on:click=move |_| on_like(id)>
                            {format!("♥ {}", post.like_count)}
                        </button>
                        <Show when=move || mine>
                            <button class="btn btn-sm btn-outline" on:click=move |_| on_edit(id)>"修改"</button>
                            <button class="btn btn-sm btn-outline btn-error" on:click=move |_| on_delete(id)>"删除"</button>
                        </Show>
                    </div>
                </div>
            </div>
        </div>
    }
}

/// 编辑器的输入状态，`editing` 为正在修改的帖子
#[derive(Clone, Copy)]
struct LoveWallDraft {
    editing: RwSignal<Option<i32>>,
    nickname: RwSignal<String>,
    avatar: RwSignal<String>,
    introduction: RwSignal<String>,
    contact: RwSignal<String>,
    age: RwSignal<String>,
    gender: RwSignal<String>,
    tags: RwSignal<String>,
    photos: RwSignal<String>,
}

impl LoveWallDraft {
    fn new() -> Self {
        Self {
            editing: RwSignal::new(None),
            nickname: RwSignal::new(String::new()),
            avatar: RwSignal::new(String::new()),
            introduction: RwSignal::new(String::new()),
            contact: RwSignal::new(String::new()),
            age: RwSignal::new(String::new()),
            gender: RwSignal::new(String::new()),
            tags: RwSignal::new(String::new()),
            photos: RwSignal::new(String::new()),
        }
    }

    fn fields(&self) -> [RwSignal<String>; 8] {
        [
            self.nickname,
            self.avatar,
            self.introduction,
            self.contact,
            self.age,
            self.gender,
            self.tags,
            self.photos,
        ]
    }

    fn reset(&self) {
        self.editing.set(None);
        for field in self.fields() {
            field.set(String::new());
        }
    }

    fn fill(&self, post: LoveWall) {
        let text = |v: Option<i32>| v.map(|v| v.to_string()).unwrap_or_default();
        self.editing.set(Some(post.id));
        self.nickname.set(post.nickname);
        self.avatar.set(post.avatar.unwrap_or_default());
        self.introduction.set(post.introduction);
        self.contact.set(post.contact);
        self.age.set(text(post.age));
        self.gender.set(text(post.gender));
        self.tags.set(post.tags.join(", "));
        self.photos.set(post.photos.join(", "));
    }

    fn to_form(self) -> LoveWallForm {
        LoveWallForm {
            nickname: self.nickname.get_untracked().trim().to_string(),
            avatar: self.avatar.get_untracked().trim().to_string(),
            photos: split_list(&self.photos.get_untracked()),
            introduction: self.introduction.get_untracked(),
            contact: self.contact.get_untracked().trim().to_string(),
            age: self.age.get_untracked().trim().parse().ok(),
            gender: self.gender.get_untracked().parse().ok(),
            tags: split_list(&self.tags.get_untracked()),
        }
    }
}

#[component]
fn LoveWallEditor(
    draft: LoveWallDraft,
    on_saved: impl Fn() + Copy + Send + Sync + 'static,
    notice: Notice,
) -> impl IntoView {
    let ctx = use_session();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let form = draft.to_form();
        if let Err(msg) = validate_form(&form) {
            notice.error(msg);
            return;
        }
        let editing = draft.editing.get_untracked();
        spawn_local(async move {
            let result = match editing {
                Some(id) => ctx.call(&UpdateLoveWallRequest { id, form }).await,
                None => ctx.call(&form).await,
            };
            match result {
                Ok(()) => {
                    notice.success("已提交，等待管理员审核");
                    draft.reset();
                    on_saved();
                }
                Err(e) => notice.api_error("提交失败", &e),
            }
        });
    };

    view! {
        <div class="collapse collapse-arrow bg-base-100 shadow mb-4">
            <input type="checkbox" prop:checked=move || draft.editing.get().is_some() />
            <div class="collapse-title font-medium">
                {move || match draft.editing.get() {
                    Some(_) => "修改我的表白墙",
                    None => "发布表白墙",
                }}
            </div>
            <div class="collapse-content">
                <form on:submit=on_submit>
                    <div class="grid grid-cols-1 md:grid-cols-2 gap-x-4">
                        <TextField label="昵称" value=draft.nickname />
                        <TextField label="头像路径" value=draft.avatar />
                        <TextField label="年龄" value=draft.age kind="number" />
                        <label class="form-control">
                            <div class="label"><span class="label-text">"性别"</span></div>
                            <select
                                class="select select-bordered"
                                prop:value=draft.gender
                                on:change=move |ev| draft.gender.set(event_target_value(&ev))
                            >
                                <option value="">"不填写"</option>
                                {GENDERS.iter().map(|(code, text)| view! { <option value=code.to_string()>{*text}</option> }).collect_view()}
                            </select>
                        </label>
                        <TextField label="联系方式" value=draft.contact />
                        <TextField label="标签（逗号分隔）" value=draft.tags />
                    </div>
                    <label class="form-control">
                        <div class="label"><span class="label-text">"自我介绍"</span></div>
                        <textarea
                            class="textarea textarea-bordered h-24"
                            prop:value=draft.introduction
                            on:input=move |ev| draft.introduction.set(event_target_value(&ev))
                        ></textarea>
                    </label>
                    <TextField label="照片路径（逗号分隔）" value=draft.photos />
                    <div class="flex gap-2 mt-4">
                        <button class="btn btn-primary">"提交审核"</button>
                        <Show when=move || draft.editing.get().is_some()>
                            <button type="button" class="btn" on:click=move |_| draft.reset()>"取消修改"</button>
                        </Show>
                    </div>
                </form>
            </div>
        </div>
    }
}

#[component]
pub fn LoveWallPage() -> impl IntoView {
    let ctx = use_session();
    let notice = Notice::new();
    let draft = LoveWallDraft::new();

    let (posts, set_posts) = signal(Vec::<LoveWall>::new());
    let (filter, set_filter) = signal(LoveWallFilter::All);
    let (loading, set_loading) = signal(false);
    let min_age = RwSignal::new("18".to_string());
    let max_age = RwSignal::new("25".to_string());

    let load = move |next: LoveWallFilter| {
        set_filter.set(next);
        set_loading.set(true);
        spawn_local(async move {
            match ctx.call(&ListLoveWallRequest { filter: next }).await {
                Ok(list) => set_posts.set(list),
                Err(e) => notice.api_error("加载表白墙失败", &e),
            }
            set_loading.set(false);
        });
    };
    let reload = move || load(filter.get_untracked());

    let on_like = move |id: i32| {
        spawn_local(async move {
            match ctx.call(&LikeLoveWallRequest { id }).await {
                Ok(()) => set_posts.update(|list| {
                    if let Some(post) = list.iter_mut().find(|p| p.id == id) {
                        post.like_count += 1;
                    }
                }),
                Err(e) => notice.api_error("点赞失败", &e),
            }
        });
    };

    let on_delete = move |id: i32| {
        spawn_local(async move {
            match ctx.call(&DeleteLoveWallRequest { id }).await {
                Ok(()) => {
                    notice.success("已删除");
                    set_posts.update(|list| list.retain(|p| p.id != id));
                }
                Err(e) => notice.api_error("删除失败", &e),
            }
        });
    };

    // 以服务端最新内容为准
    let on_edit = move |id: i32| {
        spawn_local(async move {
            match ctx.call(&LoveWallDetailRequest { id }).await {
                Ok(post) => draft.fill(post),
                Err(e) => notice.api_error("加载帖子失败", &e),
            }
        });
    };

    let filter_by_age = move |_| {
        match (min_age.get().parse::<i32>(), max_age.get().parse::<i32>()) {
            (Ok(min), Ok(max)) if min <= max => load(LoveWallFilter::AgeRange { min, max }),
            _ => notice.error("请输入有效的年龄范围"),
        }
    };

    let tab = move |label: &'static str, target: LoveWallFilter| {
        view! {
            <a
                role="tab"
                class=move || if filter.get() == target { "tab tab-active" } else { "tab" }
                on:click=move |_| load(target)
            >
                {label}
            </a>
        }
    };

    load(LoveWallFilter::All);

    view! {
        <NoticeToast notice=notice />
        <LoveWallEditor draft=draft on_saved=reload notice=notice />
        <div class="flex flex-wrap items-center gap-2 mb-4">
            <div role="tablist" class="tabs tabs-boxed bg-base-100">
                {tab("全部", LoveWallFilter::All)}
                {GENDERS.iter().map(|(code, text)| tab(*text, LoveWallFilter::Gender(*code))).collect_view()}
                {tab("我的发布", LoveWallFilter::Mine)}
            </div>
            <div class="join">
                <input
                    type="number"
                    class="input input-bordered input-sm join-item w-20"
                    prop:value=min_age
                    on:input=move |ev| min_age.set(event_target_value(&ev))
                />
                <input
                    type="number"
                    class="input input-bordered input-sm join-item w-20"
                    prop:value=max_age
                    on:input=move |ev| max_age.set(event_target_value(&ev))
                />
                <button class="btn btn-sm join-item" on:click=filter_by_age>"按年龄筛选"</button>
            </div>
        </div>

        <Show when=move || loading.get()>
            <Spinner />
        </Show>
        <Show when=move || !loading.get() && posts.with(Vec::is_empty)>
            <Empty text="这里还空空如也" />
        </Show>
        <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
            <For
                each=move || posts.get()
                key=|p| (p.id, p.like_count)
                children=move |post| view! { <LoveWallCard post=post on_like=on_like on_delete=on_delete on_edit=on_edit /> }
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> LoveWallForm {
        LoveWallForm {
            nickname: "小红".into(),
            avatar: "/avatar/a.png".into(),
            photos: Vec::new(),
            introduction: "喜欢读书和跑步，周末常去图书馆".into(),
            contact: "wx: abc".into(),
            age: Some(20),
            gender: Some(0),
            tags: vec!["读书".into()],
        }
    }

    #[test]
    fn test_validate_form() {
        assert!(validate_form(&form()).is_ok());

        let mut short = form();
        short.introduction = "太短".into();
        assert!(validate_form(&short).is_err());

        let mut young = form();
        young.age = Some(15);
        assert!(validate_form(&young).is_err());

        let mut unknown = form();
        unknown.gender = Some(3);
        assert!(validate_form(&unknown).is_err());

        let mut anonymous = form();
        anonymous.age = None;
        anonymous.gender = None;
        assert!(validate_form(&anonymous).is_ok());
    }

    #[test]
    fn test_gender_text() {
        assert_eq!(gender_text(Some(1)), "男");
        assert_eq!(gender_text(Some(9)), "未知");
        assert_eq!(gender_text(None), "未知");
    }
}
