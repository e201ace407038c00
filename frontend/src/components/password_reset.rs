use crate::api::use_api;
use crate::components::notification::{ErrorBanner, Notice, Toast};
use crate::config::RESET_REDIRECT_DELAY;
use crate::validation::require_all;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 重置流程的两个阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResetStep {
    /// 按用户名申请令牌
    Request,
    /// 提交令牌和新密码
    Reset,
}

#[component]
pub fn PasswordResetPage() -> impl IntoView {
    let api = use_api();
    let router = use_router();

    let (step, set_step) = signal(ResetStep::Request);
    let (username, set_username) = signal(String::new());
    let (token, set_token) = signal(String::new());
    let (new_password, set_new_password) = signal(String::new());
    let (is_loading, set_is_loading) = signal(false);
    let error_msg = RwSignal::new(Option::<String>::None);
    let notice = RwSignal::new(Option::<Notice>::None);

    let fail = move |msg: String| {
        error_msg.set(Some(msg.clone()));
        notice.set(Some(Notice::error(msg)));
    };

    let on_request = {
        let api = api.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            let user = username.get_untracked();
            if let Err(msg) = require_all(&[&user], "Please enter a username") {
                fail(msg);
                return;
            }

            set_is_loading.set(true);
            error_msg.set(None);

            let api = api.clone();
            spawn_local(async move {
                match api.request_password_reset(&user).await {
                    Ok(ticket) => {
                        set_token.set(ticket.token);
                        set_step.set(ResetStep::Reset);
                        let text = ticket
                            .message
                            .unwrap_or_else(|| "Reset token generated".to_string());
                        notice.set(Some(Notice::info(text)));
                    }
                    Err(e) => fail(format!("Failed: {}", e)),
                }
                set_is_loading.set(false);
            });
        }
    };

    let on_reset = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let user = username.get_untracked();
        let ticket = token.get_untracked();
        let pass = new_password.get_untracked();
        if let Err(msg) = require_all(&[&ticket, &pass], "Please fill in all fields") {
            fail(msg);
            return;
        }

        set_is_loading.set(true);
        error_msg.set(None);

        let api = api.clone();
        spawn_local(async move {
            match api.reset_password(&user, &ticket, &pass).await {
                Ok(_) => {
                    notice.set(Some(Notice::success(
                        "Password reset successful! Redirecting to login...",
                    )));
                    set_timeout(
                        move || router.navigate_to(AppRoute::Login),
                        RESET_REDIRECT_DELAY,
                    );
                }
                Err(e) => fail(format!("Reset failed: {}", e)),
            }
            set_is_loading.set(false);
        });
    };

    let submit_label = move |idle: &'static str| {
        move || {
            if is_loading.get() {
                view! { <span class="loading loading-spinner"></span> }.into_any()
            } else {
                idle.into_any()
            }
        }
    };

    view! {
        <Toast notice=notice />
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold mb-4">"Reset Password"</h1>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <div class="card-body">
                        <ErrorBanner error=error_msg />
                        <Show
                            when=move || step.get() == ResetStep::Reset
                            fallback=move || view! {
                                <form on:submit=on_request.clone()>
                                    <div class="form-control">
                                        <label class="label" for="reset-username">
                                            <span class="label-text">"Username"</span>
                                        </label>
                                        <input
                                            id="reset-username"
                                            type="text"
                                            placeholder="Enter username"
                                            on:input=move |ev| set_username.set(event_target_value(&ev))
                                            prop:value=username
                                            class="input input-bordered w-full"
                                        />
                                    </div>
                                    <button class="btn btn-primary w-full mt-6" disabled=move || is_loading.get()>
                                        {submit_label("Request Reset")}
                                    </button>
                                </form>
                            }
                        >
                            <form on:submit=on_reset.clone()>
                                <div class="form-control">
                                    <label class="label" for="reset-token">
                                        <span class="label-text">"Reset Token"</span>
                                    </label>
                                    <input
                                        id="reset-token"
                                        type="text"
                                        placeholder="Enter reset token"
                                        on:input=move |ev| set_token.set(event_target_value(&ev))
                                        prop:value=token
                                        class="input input-bordered w-full font-mono"
                                    />
                                </div>
                                <div class="form-control">
                                    <label class="label" for="reset-password">
                                        <span class="label-text">"New Password"</span>
                                    </label>
                                    <input
                                        id="reset-password"
                                        type="password"
                                        autocomplete="new-password"
                                        placeholder="Enter new password"
                                        on:input=move |ev| set_new_password.set(event_target_value(&ev))
                                        prop:value=new_password
                                        class="input input-bordered w-full"
                                    />
                                </div>
                                <button class="btn btn-primary w-full mt-6" disabled=move || is_loading.get()>
                                    {submit_label("Reset Password")}
                                </button>
                            </form>
                        </Show>
                        <div class="text-center text-sm mt-3">
                            <Link to=AppRoute::Login class="link link-primary">"Back to Login"</Link>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
