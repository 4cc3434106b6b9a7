//! 个人信息与账号安全设置

use crate::components::common::{Notice, NoticeToast, TextField};
use crate::components::welcome::{AskCodeButton, check_password};
use crate::session::{logout, refresh_account, use_session};
use campus_shared::{CodeType, ConfirmReset, EmailReset, ROLE_ADMIN};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn UserSettingPage() -> impl IntoView {
    let ctx = use_session();
    let (refreshing, set_refreshing) = signal(false);

    let refresh = move |_| {
        set_refreshing.set(true);
        spawn_local(async move {
            refresh_account(ctx).await;
            set_refreshing.set(false);
        });
    };

    let field = move |label: &'static str, value: Signal<String>| {
        view! {
            <div class="flex py-2 border-b border-base-200">
                <div class="w-32 opacity-60">{label}</div>
                <div class="flex-1">{move || value.get()}</div>
            </div>
        }
    };

    let user = ctx.state;
    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <div class="flex items-center gap-4">
                    <div class="avatar">
                        <div class="w-20 rounded-full"><img src=move || ctx.avatar_url() alt="avatar" /></div>
                    </div>
                    <div class="flex-1">
                        <h2 class="card-title">{move || user.with(|s| s.user().username.clone())}</h2>
                        <span class="badge badge-outline">
                            {move || if user.with(|s| s.user().role == ROLE_ADMIN) { "管理员" } else { "普通用户" }}
                        </span>
                    </div>
                    <button class="btn btn-ghost btn-sm" disabled=move || refreshing.get() on:click=refresh>
                        "刷新"
                    </button>
                </div>
                <div class="divider my-1"></div>
                {field("用户 ID", Signal::derive(move || user.with(|s| s.user().id.to_string())))}
                {field("电子邮件", Signal::derive(move || user.with(|s| s.user().email.clone())))}
                {field(
                    "注册时间",
                    Signal::derive(move || {
                        user.with(|s| {
                            s.user()
                                .register_time
                                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                                .unwrap_or_default()
                        })
                    }),
                )}
            </div>
        </div>
    }
}

/// 通过邮箱验证码修改密码，成功后需要重新登录
#[component]
pub fn PrivacySettingPage() -> impl IntoView {
    let ctx = use_session();
    let notice = Notice::new();

    let email = RwSignal::new(ctx.state.with_untracked(|s| s.user().email.clone()));
    let code = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let repeat = RwSignal::new(String::new());

    // 账户详情可能晚于页面到达
    Effect::new(move |_| {
        let current = ctx.state.with(|s| s.user().email.clone());
        if email.get_untracked().is_empty() {
            email.set(current);
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if let Err(msg) = check_password(&password.get(), &repeat.get()) {
            notice.error(msg);
            return;
        }
        let confirm = ConfirmReset {
            email: email.get(),
            code: code.get(),
        };
        let reset = EmailReset {
            email: email.get(),
            code: code.get(),
            password: password.get(),
        };
        spawn_local(async move {
            let result = match ctx.call(&confirm).await {
                Ok(()) => ctx.call(&reset).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(()) => {
                    notice.success("密码已修改，请重新登录");
                    logout(&ctx).await;
                }
                Err(e) => notice.api_error("修改密码失败", &e),
            }
        });
    };

    view! {
        <NoticeToast notice=notice />
        <div class="card bg-base-100 shadow">
            <form class="card-body" on:submit=on_submit>
                <h2 class="card-title">"修改密码"</h2>
                <div class="flex items-end gap-2">
                    <div class="flex-1">
                        <TextField label="电子邮件" value=email kind="email" />
                    </div>
                    <AskCodeButton email=email code_type=CodeType::Reset notice=notice />
                </div>
                <TextField label="验证码" value=code />
                <TextField label="新密码" value=password kind="password" />
                <TextField label="重复新密码" value=repeat kind="password" />
                <div class="card-actions justify-end mt-4">
                    <button class="btn btn-error">"立即修改"</button>
                </div>
            </form>
        </div>
    }
}
