use crate::api::use_api;
use crate::auth::{login, use_auth};
use crate::components::notification::{ErrorBanner, Notice, Toast};
use crate::error::ApiError;
use crate::validation::{require_all, sanitize_username};
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 登录失败时展示给用户的文案
pub(crate) fn login_failure_message(err: &ApiError) -> String {
    if err.is_rate_limited() {
        "Too many login attempts. Please try again later.".to_string()
    } else {
        format!("Login failed: {}", err)
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let router = use_router();

    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (show_password, set_show_password) = signal(false);
    let (is_submitting, set_is_submitting) = signal(false);
    let error_msg = RwSignal::new(Option::<String>::None);
    let notice = RwSignal::new(Option::<Notice>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let user = sanitize_username(&username.get_untracked());
        let pass = password.get_untracked();
        if let Err(msg) = require_all(&[&user, &pass], "Please fill in all fields") {
            error_msg.set(Some(msg));
            return;
        }

        set_is_submitting.set(true);
        error_msg.set(None);

        let api = api.clone();
        spawn_local(async move {
            match login(&auth, &api, &user, &pass).await {
                Ok(session) => {
                    router.navigate_to(AppRoute::landing_for(&session));
                }
                Err(e) => {
                    let msg = login_failure_message(&e);
                    error_msg.set(Some(msg.clone()));
                    notice.set(Some(Notice::error(msg)));
                }
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <Toast notice=notice />
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Sign In"</h1>
                    <p class="text-base-content/70">"Log in to chat with the support assistant"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <ErrorBanner error=error_msg />

                        <div class="form-control">
                            <label class="label" for="username">
                                <span class="label-text">"Username"</span>
                            </label>
                            <input
                                id="username"
                                type="text"
                                autocomplete="username"
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                prop:value=username
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <div class="join w-full">
                                <input
                                    id="password"
                                    type=move || if show_password.get() { "text" } else { "password" }
                                    autocomplete="current-password"
                                    on:input=move |ev| set_password.set(event_target_value(&ev))
                                    prop:value=password
                                    class="input input-bordered join-item w-full"
                                />
                                <button
                                    type="button"
                                    class="btn join-item"
                                    on:click=move |_| set_show_password.update(|v| *v = !*v)
                                >
                                    {move || if show_password.get() { "Hide" } else { "Show" }}
                                </button>
                            </div>
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Signing in..." }.into_any()
                                } else {
                                    "Login".into_any()
                                }}
                            </button>
                        </div>
                        <div class="flex justify-between text-sm mt-2">
                            <Link to=AppRoute::PasswordReset class="link link-hover">"Forgot password?"</Link>
                            <Link to=AppRoute::Signup class="link link-primary">"Create an account"</Link>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_message() {
        let err = ApiError::RateLimited {
            message: "Too Many Requests".into(),
        };
        assert_eq!(
            login_failure_message(&err),
            "Too many login attempts. Please try again later."
        );
    }

    #[test]
    fn test_detail_is_surfaced() {
        let err = ApiError::Status {
            status: 401,
            message: "Invalid username or password".into(),
        };
        assert_eq!(
            login_failure_message(&err),
            "Login failed: Invalid username or password"
        );
    }
}
