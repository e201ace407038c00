use crate::api::use_api;
use crate::auth::{signup, use_auth};
use crate::components::notification::{ErrorBanner, Notice, Toast};
use crate::validation::{require_all, sanitize_username};
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;
use supportbot_shared::Role;

/// 注册页，只能注册普通用户
#[component]
pub fn SignupPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let router = use_router();

    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
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
            match signup(&auth, &api, &user, &pass, Role::User).await {
                Ok(session) => {
                    router.navigate_to(AppRoute::landing_for(&session));
                }
                Err(e) => {
                    let msg = format!("Signup failed: {}", e);
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
                    <h1 class="text-3xl font-bold">"Create Account"</h1>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <ErrorBanner error=error_msg />

                        <div class="form-control">
                            <label class="label" for="signup-username">
                                <span class="label-text">"Username"</span>
                            </label>
                            <input
                                id="signup-username"
                                type="text"
                                autocomplete="username"
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                prop:value=username
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="signup-password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="signup-password"
                                type="password"
                                autocomplete="new-password"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Creating account..." }.into_any()
                                } else {
                                    "Sign Up".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center mt-2">
                            "Already have an account? "
                            <Link to=AppRoute::Login class="link link-primary">"Log in"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
