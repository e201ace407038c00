mod analytics;
mod shelf;

use crate::api::use_api;
use crate::components::notification::{ErrorBanner, Notice, Toast};
use crate::error::ApiResult;
use crate::validation::first_non_pdf;
use crate::web::file::{read_parts, selected_files};
use analytics::{BookUsageTable, UserActivityTable};
use leptos::prelude::*;
use leptos::task::spawn_local;
use shelf::{PendingBooks, ShelfUpdate};
use supportbot_shared::{Book, BookUsage, UserActivity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Books,
    Analytics,
}

#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    let api = use_api();

    let (tab, set_tab) = signal(Tab::Books);
    let books = RwSignal::new(Vec::<Book>::new());
    let pending = RwSignal::new(PendingBooks::default());
    let user_rows = RwSignal::new(Vec::<UserActivity>::new());
    let book_rows = RwSignal::new(Vec::<BookUsage>::new());
    let (is_uploading, set_is_uploading) = signal(false);
    let error_msg = RwSignal::new(Option::<String>::None);
    let notice = RwSignal::new(Option::<Notice>::None);
    let file_input = NodeRef::<leptos::html::Input>::new();

    let fail = move |text: String| {
        error_msg.set(Some(text.clone()));
        notice.set(Some(Notice::error(text)));
    };

    let apply = move |update: ShelfUpdate| {
        books.set(update.books);
        notice.set(Some(Notice::success(update.message)));
    };

    // 初始加载：书籍列表与两份统计
    {
        let api = api.clone();
        spawn_local(async move {
            match api.list_books().await {
                Ok(list) => books.set(list),
                Err(e) => fail(format!("Failed to load books: {}", e)),
            }
        });
    }
    {
        let api = api.clone();
        spawn_local(async move {
            let (users, usage) = analytics::load(&api).await;
            match users {
                Ok(rows) => user_rows.set(rows),
                Err(e) => fail(format!("Failed to load user analytics: {}", e)),
            }
            match usage {
                Ok(rows) => book_rows.set(rows),
                Err(e) => fail(format!("Failed to load book analytics: {}", e)),
            }
        });
    }

    let on_upload = {
        let api = api.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            let Some(input) = file_input.get() else {
                return;
            };
            let files = selected_files(&input);
            if files.is_empty() {
                fail("Please select at least one file".to_string());
                return;
            }
            let names: Vec<String> = files.iter().map(|f| f.name()).collect();
            if let Some(name) = first_non_pdf(names.iter().map(String::as_str)) {
                fail(format!("Only PDF files can be uploaded: '{}'", name));
                return;
            }

            set_is_uploading.set(true);
            error_msg.set(None);

            let api = api.clone();
            spawn_local(async move {
                let result: ApiResult<ShelfUpdate> = async {
                    let parts = read_parts(&files).await?;
                    shelf::upload(&api, parts).await
                }
                .await;
                match result {
                    Ok(update) => {
                        apply(update);
                        input.set_value("");
                    }
                    Err(e) => fail(format!("Upload failed: {}", e)),
                }
                set_is_uploading.set(false);
            });
        }
    };

    let on_toggle = {
        let api = api.clone();
        move |book: Book| {
            if !pending.try_update(|p| p.begin(book.id)).unwrap_or(false) {
                return;
            }
            let api = api.clone();
            spawn_local(async move {
                match shelf::toggle(&api, &book).await {
                    Ok(update) => apply(update),
                    Err(e) => fail(format!("Toggle failed: {}", e)),
                }
                pending.update(|p| p.finish(book.id));
            });
        }
    };

    let on_delete = {
        let api = api.clone();
        move |book: Book| {
            let prompt = format!("Are you sure you want to delete '{}'?", book.name);
            if !window().confirm_with_message(&prompt).unwrap_or(false) {
                return;
            }
            if !pending.try_update(|p| p.begin(book.id)).unwrap_or(false) {
                return;
            }
            let api = api.clone();
            spawn_local(async move {
                match shelf::delete(&api, book.id).await {
                    Ok(update) => apply(update),
                    Err(e) => fail(format!("Delete failed: {}", e)),
                }
                pending.update(|p| p.finish(book.id));
            });
        }
    };

    let tab_class = move |t: Tab| {
        move || {
            if tab.get() == t {
                "tab tab-active"
            } else {
                "tab"
            }
        }
    };

    let book_row = move |book: Book| {
        let busy = move || pending.with(|p| p.contains(book.id));
        let (toggle_label, toggle_class) = if book.active {
            ("Deactivate", "btn btn-sm btn-warning")
        } else {
            ("Activate", "btn btn-sm btn-success")
        };
        let on_toggle = on_toggle.clone();
        let on_delete = on_delete.clone();
        let for_toggle = book.clone();
        let for_delete = book.clone();

        view! {
            <tr>
                <td>{book.name.clone()}</td>
                <td>{if book.active { "Yes" } else { "No" }}</td>
                <td class="flex gap-2">
                    <button
                        class=toggle_class
                        disabled=busy
                        on:click=move |_| on_toggle(for_toggle.clone())
                    >
                        {toggle_label}
                    </button>
                    <button
                        class="btn btn-sm btn-error"
                        disabled=busy
                        on:click=move |_| on_delete(for_delete.clone())
                    >
                        "Delete"
                    </button>
                    <Show when=busy>
                        <span class="loading loading-spinner loading-sm"></span>
                    </Show>
                </td>
            </tr>
        }
    };

    view! {
        <Toast notice=notice />
        <div class="min-h-screen bg-base-200 p-4 md:p-8">
            <div class="max-w-6xl mx-auto card bg-base-100 shadow-xl">
                <div class="card-body space-y-4">
                    <h2 class="card-title text-2xl">"Admin Dashboard"</h2>

                    <div role="tablist" class="tabs tabs-bordered">
                        <a role="tab" class=tab_class(Tab::Books) on:click=move |_| set_tab.set(Tab::Books)>
                            "Books"
                        </a>
                        <a role="tab" class=tab_class(Tab::Analytics) on:click=move |_| set_tab.set(Tab::Analytics)>
                            "Analytics"
                        </a>
                    </div>

                    <ErrorBanner error=error_msg />

                    <Show
                        when=move || tab.get() == Tab::Books
                        fallback=move || view! {
                            <section class="space-y-6">
                                <div>
                                    <h3 class="text-lg font-semibold mb-2">"User Activity"</h3>
                                    <UserActivityTable rows=user_rows />
                                </div>
                                <div>
                                    <h3 class="text-lg font-semibold mb-2">"Book Usage"</h3>
                                    <BookUsageTable rows=book_rows />
                                </div>
                            </section>
                        }
                    >
                        <section class="space-y-6">
                            <form class="flex flex-col md:flex-row gap-2 items-start md:items-end" on:submit=on_upload.clone()>
                                <label class="form-control w-full max-w-md">
                                    <span class="label-text mb-1">"Upload PDFs"</span>
                                    <input
                                        node_ref=file_input
                                        type="file"
                                        accept=".pdf"
                                        multiple
                                        class="file-input file-input-bordered w-full"
                                    />
                                </label>
                                <button type="submit" class="btn btn-primary" disabled=move || is_uploading.get()>
                                    {move || if is_uploading.get() {
                                        view! { <span class="loading loading-spinner"></span> "Uploading..." }.into_any()
                                    } else {
                                        "Upload".into_any()
                                    }}
                                </button>
                            </form>

                            <div class="overflow-x-auto">
                                <table class="table table-zebra">
                                    <thead>
                                        <tr>
                                            <th>"Name"</th>
                                            <th>"Active"</th>
                                            <th>"Actions"</th>
                                        </tr>
                                    </thead>
                                    <tbody>
                                        {let book_row = book_row.clone(); move || books.get().into_iter().map(book_row.clone()).collect_view()}
                                    </tbody>
                                </table>
                            </div>
                        </section>
                    </Show>
                </div>
            </div>
        </div>
    }
}
