//! 聊天记录的乐观更新
//!
//! 发送时先把用户消息追加到本地并记下此刻的列表，成功后用服务端返回的完整历史
//! 整体替换，失败时恢复记下的列表。同一时间只允许一条消息在途。

use crate::error::ApiResult;
use supportbot_shared::ChatMessage;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatThread {
    messages: Vec<ChatMessage>,
    /// 在途发送开始时的列表（历史 + 刚发出的消息）
    in_flight: Option<Vec<ChatMessage>>,
    /// 本页面已经发送过消息，之后到达的挂载历史不再覆盖
    has_sent: bool,
}

impl ChatThread {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// 等待助手回复中（显示输入提示，禁用发送）
    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// 挂载时加载的历史；已经开始发送后到达的结果被忽略
    pub fn load(&mut self, history: Vec<ChatMessage>) {
        if self.has_sent {
            log::debug!("[Chat] history arrived after first send, ignored");
            return;
        }
        self.messages = history;
    }

    /// 开始发送。输入为空（或只有空白）、或上一条还在途时返回 `None`，不改变状态；
    /// 否则原样追加用户消息并返回要发送的文本。
    pub fn begin_send(&mut self, input: &str) -> Option<String> {
        if input.trim().is_empty() || self.is_pending() {
            return None;
        }
        self.messages.push(ChatMessage::user(input));
        self.in_flight = Some(self.messages.clone());
        self.has_sent = true;
        Some(input.to_string())
    }

    /// 处理发送结果，失败时把错误交还给调用方展示
    pub fn finish_send(&mut self, result: ApiResult<Vec<ChatMessage>>) -> ApiResult<()> {
        let snapshot = self.in_flight.take();
        match result {
            Ok(history) => {
                self.messages = history;
                Ok(())
            }
            Err(e) => {
                if let Some(snapshot) = snapshot {
                    self.messages = snapshot;
                }
                Err(e)
            }
        }
    }
}
