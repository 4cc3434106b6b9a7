//! 登录区：登录、注册、找回密码

use crate::components::common::{Notice, NoticeToast, TextField};
use crate::session::{login, use_session};
use crate::web::router::{Link, use_router};
use crate::web::Interval;
use campus_shared::protocol::AskCodeRequest;
use campus_shared::route::AppRoute;
use campus_shared::{CodeType, ConfirmReset, EmailRegister, EmailReset};
use leptos::prelude::*;
use leptos::task::spawn_local;

const CODE_COOLDOWN_SECS: u32 = 60;

// =========================================================
// 表单校验
// =========================================================

fn check_username(username: &str) -> Result<(), &'static str> {
    let len = username.chars().count();
    if len == 0 {
        Err("请输入用户名")
    } else if len > 10 {
        Err("用户名长度不能大于10个字符")
    } else if !username.chars().all(|c| c.is_alphanumeric()) {
        Err("用户名不能包含特殊字符，只能是中文/英文")
    } else {
        Ok(())
    }
}

pub(crate) fn check_password(password: &str, repeat: &str) -> Result<(), &'static str> {
    let len = password.chars().count();
    if !(6..=16).contains(&len) {
        Err("密码的长度必须在6-16个字符之间")
    } else if password != repeat {
        Err("两次输入的密码不一致")
    } else {
        Ok(())
    }
}

fn check_email(email: &str) -> Result<(), &'static str> {
    let valid = email
        .split_once('@')
        .is_some_and(|(name, domain)| !name.is_empty() && domain.contains('.') && !domain.ends_with('.'));
    if valid { Ok(()) } else { Err("请输入合法的电子邮件地址") }
}

// =========================================================
// 布局
// =========================================================

#[component]
fn WelcomeCard(#[prop(into)] title: String, children: Children) -> impl IntoView {
    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"校园社区"</h1>
                    <p class="text-base-content/70">{title}</p>
                </div>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <div class="card-body">{children()}</div>
                </div>
            </div>
        </div>
    }
}

/// 验证码发送按钮，发送后进入冷却
#[component]
pub(crate) fn AskCodeButton(email: RwSignal<String>, code_type: CodeType, notice: Notice) -> impl IntoView {
    let ctx = use_session();
    let cooldown = RwSignal::new(0u32);
    let ticker = StoredValue::new_local(None::<Interval>);

    let on_click = move |_| {
        let address = email.get_untracked();
        if let Err(msg) = check_email(&address) {
            notice.error(msg);
            return;
        }
        spawn_local(async move {
            let req = AskCodeRequest {
                email: address,
                code_type,
            };
            match ctx.call(&req).await {
                Ok(()) => {
                    notice.success("验证码已发送到邮箱，请注意查收");
                    cooldown.set(CODE_COOLDOWN_SECS);
                    let interval = Interval::new(1000, move || {
                        cooldown.update(|c| *c = c.saturating_sub(1));
                    });
                    ticker.set_value(interval);
                }
                Err(e) => notice.api_error("验证码发送失败", &e),
            }
        });
    };

    view! {
        <button type="button" class="btn btn-outline" disabled=move || { cooldown.get() > 0 } on:click=on_click>
            {move || match cooldown.get() {
                0 => "获取验证码".to_string(),
                secs => format!("{secs} 秒后重试"),
            }}
        </button>
    }
}

// =========================================================
// 登录
// =========================================================

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = use_session();
    let notice = Notice::new();

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let (remember, set_remember) = signal(false);
    let (is_submitting, set_is_submitting) = signal(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if username.get().is_empty() || password.get().is_empty() {
            notice.error("请输入用户名和密码");
            return;
        }

        set_is_submitting.set(true);
        spawn_local(async move {
            let result = login(
                &ctx,
                username.get_untracked(),
                password.get_untracked(),
                remember.get_untracked(),
            )
            .await;
            if let Err(e) = result {
                notice.api_error("登录失败", &e);
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <NoticeToast notice=notice />
        <WelcomeCard title="登录以继续">
            <form on:submit=on_submit>
                <TextField label="用户名/邮箱" value=username />
                <TextField label="密码" value=password kind="password" />
                <div class="flex items-center justify-between mt-2">
                    <label class="label cursor-pointer gap-2">
                        <input
                            type="checkbox"
                            class="checkbox checkbox-sm"
                            prop:checked=remember
                            on:change=move |ev| set_remember.set(event_target_checked(&ev))
                        />
                        <span class="label-text">"记住我"</span>
                    </label>
                    <Link to=AppRoute::Forget class="link link-hover text-sm">"忘记密码？"</Link>
                </div>
                <div class="form-control mt-6">
                    <button class="btn btn-primary" disabled=move || is_submitting.get()>
                        {move || if is_submitting.get() {
                            view! { <span class="loading loading-spinner"></span> "登录中..." }.into_any()
                        } else {
                            "立即登录".into_any()
                        }}
                    </button>
                </div>
            </form>
            <div class="divider">"没有账号"</div>
            <Link to=AppRoute::Register class="btn btn-outline btn-warning">"注册账号"</Link>
        </WelcomeCard>
    }
}

// =========================================================
// 注册
// =========================================================

#[component]
pub fn RegisterPage() -> impl IntoView {
    let ctx = use_session();
    let router = use_router();
    let notice = Notice::new();

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let repeat = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let code = RwSignal::new(String::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let form = EmailRegister {
            username: username.get(),
            password: password.get(),
            email: email.get(),
            code: code.get(),
        };
        let checked = check_username(&form.username)
            .and_then(|_| check_password(&form.password, &repeat.get()))
            .and_then(|_| check_email(&form.email));
        if let Err(msg) = checked {
            notice.error(msg);
            return;
        }
        if form.code.len() != 6 {
            notice.error("请输入6位验证码");
            return;
        }

        spawn_local(async move {
            match ctx.call(&form).await {
                Ok(()) => router.navigate_to(AppRoute::Login),
                Err(e) => notice.api_error("注册失败", &e),
            }
        });
    };

    view! {
        <NoticeToast notice=notice />
        <WelcomeCard title="欢迎注册校园社区">
            <form on:submit=on_submit>
                <TextField label="用户名" value=username />
                <TextField label="密码" value=password kind="password" />
                <TextField label="重复密码" value=repeat kind="password" />
                <TextField label="电子邮件" value=email kind="email" />
                <div class="flex items-end gap-2">
                    <div class="flex-1">
                        <TextField label="验证码" value=code />
                    </div>
                    <AskCodeButton email=email code_type=CodeType::Register notice=notice />
                </div>
                <div class="form-control mt-6">
                    <button class="btn btn-warning">"立即注册"</button>
                </div>
            </form>
            <div class="text-sm text-center">
                "已有账号？ " <Link to=AppRoute::Login class="link link-primary">"立即登录"</Link>
            </div>
        </WelcomeCard>
    }
}

// =========================================================
// 找回密码
// =========================================================

#[component]
pub fn ForgetPage() -> impl IntoView {
    let ctx = use_session();
    let router = use_router();
    let notice = Notice::new();

    let (confirmed, set_confirmed) = signal(false);
    let email = RwSignal::new(String::new());
    let code = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let repeat = RwSignal::new(String::new());

    let on_confirm = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if let Err(msg) = check_email(&email.get()) {
            notice.error(msg);
            return;
        }
        let req = ConfirmReset {
            email: email.get(),
            code: code.get(),
        };
        spawn_local(async move {
            match ctx.call(&req).await {
                Ok(()) => set_confirmed.set(true),
                Err(e) => notice.api_error("验证失败", &e),
            }
        });
    };

    let on_reset = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if let Err(msg) = check_password(&password.get(), &repeat.get()) {
            notice.error(msg);
            return;
        }
        let req = EmailReset {
            email: email.get(),
            code: code.get(),
            password: password.get(),
        };
        spawn_local(async move {
            match ctx.call(&req).await {
                Ok(()) => router.navigate_to(AppRoute::Login),
                Err(e) => notice.api_error("重置失败", &e),
            }
        });
    };

    view! {
        <NoticeToast notice=notice />
        <WelcomeCard title="重置密码">
            <ul class="steps w-full mb-4">
                <li class="step step-primary">"验证电子邮件"</li>
                <li class=move || if confirmed.get() { "step step-primary" } else { "step" }>"重新设定密码"</li>
            </ul>
            <Show
                when=move || confirmed.get()
                fallback=move || view! {
                    <form on:submit=on_confirm>
                        <TextField label="电子邮件" value=email kind="email" />
                        <div class="flex items-end gap-2">
                            <div class="flex-1">
                                <TextField label="验证码" value=code />
                            </div>
                            <AskCodeButton email=email code_type=CodeType::Reset notice=notice />
                        </div>
                        <button class="btn btn-primary w-full mt-6">"开始重置密码"</button>
                    </form>
                }
            >
                <form on:submit=on_reset>
                    <TextField label="新密码" value=password kind="password" />
                    <TextField label="重复新密码" value=repeat kind="password" />
                    <button class="btn btn-error w-full mt-6">"立即重置密码"</button>
                </form>
            </Show>
            <div class="text-sm text-center">
                <Link to=AppRoute::Login class="link link-primary">"返回登录"</Link>
            </div>
        </WelcomeCard>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(check_username("小明abc").is_ok());
        assert!(check_username("").is_err());
        assert!(check_username("abcdefghijk").is_err());
        assert!(check_username("a_b").is_err());
    }

    #[test]
    fn test_password_rules() {
        assert!(check_password("123456", "123456").is_ok());
        assert!(check_password("12345", "12345").is_err());
        assert!(check_password("1234567", "7654321").is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(check_email("a@b.cn").is_ok());
        assert!(check_email("a@b").is_err());
        assert!(check_email("@b.cn").is_err());
        assert!(check_email("ab.cn").is_err());
    }
}
