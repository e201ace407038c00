//! 使用统计：用户活跃度与书籍引用次数，用表格加比例条展示

use crate::api::SupportApi;
use crate::error::ApiResult;
use crate::token::TokenStore;
use crate::web::HttpClient;
use leptos::prelude::*;
use supportbot_shared::{BookUsage, UserActivity};

/// 同时请求两份统计，各自返回结果
pub async fn load<C: HttpClient, S: TokenStore>(
    api: &SupportApi<C, S>,
) -> (ApiResult<Vec<UserActivity>>, ApiResult<Vec<BookUsage>>) {
    futures::join!(api.user_analytics(), api.book_analytics())
}

/// `value` 占 `max` 的百分比（0..=100），`max` 为 0 时为 0
pub fn share(value: u64, max: u64) -> u32 {
    if max == 0 {
        return 0;
    }
    ((value.min(max) as f64 / max as f64) * 100.0).round() as u32
}

/// 所有书籍的引用总数，溢出时取最大值
pub fn total_usage(rows: &[BookUsage]) -> u64 {
    rows.iter().fold(0u64, |acc, b| acc.saturating_add(b.usage_count))
}

#[component]
fn Bar(percent: u32) -> impl IntoView {
    view! {
        <progress class="progress progress-primary w-40" value=percent max="100"></progress>
    }
}

#[component]
pub fn UserActivityTable(rows: RwSignal<Vec<UserActivity>>) -> impl IntoView {
    move || {
        let rows = rows.get();
        let busiest = rows.iter().map(UserActivity::total).max().unwrap_or(0);
        if rows.is_empty() {
            return view! { <p class="text-base-content/60">"No user activity yet."</p> }.into_any();
        }

        view! {
            <div class="overflow-x-auto">
                <table class="table table-zebra">
                    <thead>
                        <tr>
                            <th>"Username"</th>
                            <th>"Logins"</th>
                            <th>"Chats"</th>
                            <th>"Password Resets"</th>
                            <th>"Activity"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {rows
                            .into_iter()
                            .map(|u| {
                                let percent = share(u.total(), busiest);
                                view! {
                                    <tr>
                                        <td>{u.username}</td>
                                        <td>{u.logins}</td>
                                        <td>{u.chats}</td>
                                        <td>{u.password_resets}</td>
                                        <td><Bar percent=percent /></td>
                                    </tr>
                                }
                            })
                            .collect_view()}
                    </tbody>
                </table>
            </div>
        }
        .into_any()
    }
}

#[component]
pub fn BookUsageTable(rows: RwSignal<Vec<BookUsage>>) -> impl IntoView {
    move || {
        let rows = rows.get();
        let total = total_usage(&rows);
        if rows.is_empty() {
            return view! { <p class="text-base-content/60">"No book usage recorded."</p> }.into_any();
        }

        view! {
            <div class="overflow-x-auto">
                <table class="table table-zebra">
                    <thead>
                        <tr>
                            <th>"Book"</th>
                            <th>"Used in Chats"</th>
                            <th>"Share"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {rows
                            .into_iter()
                            .map(|b| {
                                let percent = share(b.usage_count, total);
                                view! {
                                    <tr>
                                        <td>{b.name}</td>
                                        <td>{b.usage_count}</td>
                                        <td class="flex items-center gap-2">
                                            <Bar percent=percent />
                                            <span class="text-xs">{format!("{}%", percent)}</span>
                                        </td>
                                    </tr>
                                }
                            })
                            .collect_view()}
                    </tbody>
                </table>
            </div>
        }
        .into_any()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::token::MemoryTokenStore;
    use crate::web::MockHttpClient;
    use serde_json::json;
    use supportbot_shared::protocol::HttpMethod;

    #[test]
    fn test_share() {
        assert_eq!(share(0, 0), 0);
        assert_eq!(share(5, 0), 0);
        assert_eq!(share(1, 3), 33);
        assert_eq!(share(2, 3), 67);
        assert_eq!(share(10, 10), 100);
        assert_eq!(share(11, 10), 100);
    }

    #[test]
    fn test_large_counts_saturate() {
        let busy = UserActivity {
            username: "bot".into(),
            logins: u64::MAX,
            chats: 1,
            password_resets: 1,
        };
        assert_eq!(busy.total(), u64::MAX);

        let rows = vec![
            BookUsage {
                name: "a.pdf".into(),
                usage_count: u64::MAX,
            },
            BookUsage {
                name: "b.pdf".into(),
                usage_count: 5,
            },
        ];
        assert_eq!(total_usage(&rows), u64::MAX);
        assert_eq!(share(u64::MAX, total_usage(&rows)), 100);
        assert_eq!(total_usage(&[]), 0);
    }

    #[tokio::test]
    async fn test_load_reports_each_slice_independently() {
        let api = SupportApi::new(
            "http://backend.test",
            MockHttpClient::new(),
            MemoryTokenStore::with_token("admin-jwt"),
        );
        api.client().mock_response(
            HttpMethod::Get,
            "http://backend.test/admin/analytics/users",
            200,
            json!([{"username": "alice", "logins": 3, "chats": 10, "password_resets": 1}]),
        );
        api.client().mock_response(
            HttpMethod::Get,
            "http://backend.test/admin/analytics/books",
            500,
            json!({"detail": "analytics unavailable"}),
        );

        let (users, books) = load(&api).await;
        let users = users.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].total(), 14);
        assert_eq!(
            books.unwrap_err(),
            ApiError::Status {
                status: 500,
                message: "analytics unavailable".into()
            }
        );
        assert_eq!(api.client().request_count(), 2);
    }
}
