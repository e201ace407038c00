mod thread;

use crate::api::use_api;
use crate::auth::{logout, use_auth};
use crate::components::notification::{ErrorBanner, Notice, Toast};
use leptos::prelude::*;
use leptos::task::spawn_local;
use supportbot_shared::ChatMessage;

pub use thread::ChatThread;

#[component]
fn MessageBubble(message: ChatMessage) -> impl IntoView {
    let (row, bubble) = if message.is_user() {
        ("chat chat-end", "chat-bubble chat-bubble-primary whitespace-pre-wrap")
    } else {
        ("chat chat-start", "chat-bubble whitespace-pre-wrap")
    };
    let author = if message.is_user() { "You" } else { "AI" };

    view! {
        <div class=row>
            <div class="chat-header text-xs opacity-60">{author}</div>
            <div class=bubble>{message.content}</div>
        </div>
    }
}

#[component]
pub fn ChatPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();

    let thread = RwSignal::new(ChatThread::default());
    let (input, set_input) = signal(String::new());
    let error_msg = RwSignal::new(Option::<String>::None);
    let notice = RwSignal::new(Option::<Notice>::None);
    let chat_end = NodeRef::<leptos::html::Div>::new();

    let fail = move |text: String| {
        error_msg.set(Some(text.clone()));
        notice.set(Some(Notice::error(text)));
    };

    // 挂载时加载历史
    {
        let api = api.clone();
        spawn_local(async move {
            match api.chat_history().await {
                Ok(history) => thread.update(|t| t.load(history)),
                Err(e) => fail(format!("Failed to load chat history: {}", e)),
            }
        });
    }

    // 新消息或输入提示出现时滚动到底部
    Effect::new(move |_| {
        thread.track();
        if let Some(el) = chat_end.get() {
            el.scroll_into_view();
        }
    });

    let on_send = {
        let api = api.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            let mut text = None;
            thread.update(|t| text = t.begin_send(&input.get_untracked()));
            let Some(text) = text else {
                return;
            };

            set_input.set(String::new());
            error_msg.set(None);

            let api = api.clone();
            spawn_local(async move {
                let result = api.send_chat(&text).await;
                let mut outcome = Ok(());
                thread.update(|t| outcome = t.finish_send(result));
                if let Err(e) = outcome {
                    fail(format!("Failed to get response from server: {}", e));
                }
            });
        }
    };

    let on_logout = move |_| logout(&auth, &api);

    let is_pending = move || thread.with(|t| t.is_pending());

    view! {
        <Toast notice=notice />
        <div class="min-h-screen bg-base-200 p-4 md:p-8">
            <div class="card w-full max-w-3xl mx-auto shadow-xl bg-base-100">
                <div class="card-title flex justify-between items-center bg-primary text-primary-content rounded-t-box px-6 py-4">
                    <h2 class="text-lg">"AI Support Assistant"</h2>
                    <button class="btn btn-sm btn-outline" on:click=on_logout>
                        "Logout"
                    </button>
                </div>

                <div class="card-body h-[70vh] overflow-y-auto bg-base-200/50">
                    {move || {
                        thread.with(|t| {
                            t.messages()
                                .iter()
                                .cloned()
                                .map(|message| view! { <MessageBubble message=message /> })
                                .collect_view()
                        })
                    }}
                    <Show when=is_pending>
                        <div class="chat chat-start">
                            <div class="chat-bubble">
                                <span class="loading loading-dots loading-sm"></span>
                            </div>
                        </div>
                    </Show>
                    <div node_ref=chat_end></div>
                </div>

                <form class="flex gap-2 p-4 border-t border-base-300" on:submit=on_send>
                    <input
                        type="text"
                        placeholder="Type your message..."
                        on:input=move |ev| set_input.set(event_target_value(&ev))
                        prop:value=input
                        class="input input-bordered flex-1"
                    />
                    <button type="submit" class="btn btn-primary" disabled=is_pending>
                        "Send"
                    </button>
                </form>
            </div>

            <div class="max-w-3xl mx-auto mt-4">
                <ErrorBanner error=error_msg />
            </div>
        </div>
    }
}
