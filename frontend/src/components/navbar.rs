use crate::api::use_api;
use crate::auth::{logout, use_auth};
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;

/// 顶部导航栏
#[component]
pub fn Navbar() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();

    move || {
        let api = api.clone();
        match auth.session() {
            Some(session) => {
                let is_admin = session.is_admin();
                view! {
                    <div class="navbar bg-neutral text-neutral-content shadow-sm px-4">
                        <div class="flex-1">
                            <span class="text-xl font-bold">"AI Chatbot"</span>
                        </div>
                        <div class="flex-none gap-2 items-center">
                            <span class="hidden md:inline">"Welcome, " {session.subject}</span>
                            <Link to=AppRoute::Chat class="btn btn-ghost btn-sm">"Chat"</Link>
                            <Show when=move || is_admin>
                                <Link to=AppRoute::Admin class="btn btn-ghost btn-sm">"Admin Dashboard"</Link>
                            </Show>
                            <button class="btn btn-outline btn-sm" on:click=move |_| logout(&auth, &api)>
                                "Logout"
                            </button>
                        </div>
                    </div>
                }
                .into_any()
            }
            None => view! {
                <div class="navbar bg-neutral text-neutral-content shadow-sm px-4">
                    <div class="flex-1">
                        <span class="text-xl font-bold">"AI Chatbot"</span>
                    </div>
                    <div class="flex-none gap-2">
                        <Link to=AppRoute::Login class="btn btn-ghost btn-sm">"Login"</Link>
                        <Link to=AppRoute::Signup class="btn btn-ghost btn-sm">"Sign Up"</Link>
                    </div>
                </div>
            }
            .into_any(),
        }
    }
}
