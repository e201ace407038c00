use crate::config::NOTIFICATION_TTL;
use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Info,
    Error,
}

/// 一条短暂显示的通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    fn alert_class(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "alert alert-success shadow-lg",
            NoticeKind::Info => "alert alert-info shadow-lg",
            NoticeKind::Error => "alert alert-error shadow-lg",
        }
    }
}

/// 提示框的定时清除
///
/// 每条新通知领取一个新的序号，只有最新序号的定时器到期时才清除，
/// 旧定时器不会提前清掉后来的通知。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Expiry {
    generation: u64,
}

impl Expiry {
    fn arm(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation == ticket
    }
}

/// 右上角提示框，显示 `NOTIFICATION_TTL` 后自动清除
#[component]
pub fn Toast(notice: RwSignal<Option<Notice>>) -> impl IntoView {
    let expiry = RwSignal::new(Expiry::default());

    Effect::new(move |_| {
        if notice.get().is_some() {
            let Some(ticket) = expiry.try_update(|e| e.arm()) else {
                return;
            };
            set_timeout(
                move || {
                    if expiry.try_with_untracked(|e| e.is_current(ticket)) == Some(true) {
                        notice.set(None);
                    }
                },
                NOTIFICATION_TTL,
            );
        }
    });

    move || {
        notice.get().map(|n| {
            view! {
                <div class="toast toast-top toast-end z-50">
                    <div class=n.alert_class()>
                        <span>{n.text.clone()}</span>
                    </div>
                </div>
            }
        })
    }
}

/// 表单内的错误横幅
#[component]
pub fn ErrorBanner(error: RwSignal<Option<String>>) -> impl IntoView {
    move || {
        error.get().map(|msg| {
            view! {
                <div role="alert" class="alert alert-error text-sm py-2">
                    <svg xmlns="http://www.w3.org/2000/svg" class="stroke-current shrink-0 h-6 w-6" fill="none" viewBox="0 0 24 24"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M10 14l2-2m0 0l2-2m-2 2l-2-2m2 2l2 2m7-2a9 9 0 11-18 0 9 9 0 0118 0z" /></svg>
                    <span>{msg}</span>
                </div>
            }
        })
    }
}
