//! 会话历史：有序 Turn 序列，超出上限时从最旧端成对剪枝
//!
//! 每条 Turn 含角色（user/model）与若干 Part（文本或内联图片）。插入顺序即
//! 模型上下文顺序（最旧在前）。截图以内联字节存储，上限按条数而非字节数计。

use serde::{Deserialize, Serialize};

/// 消息角色（与 Gemini contents API 一致：user / model）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Model,
}

/// 单个内容片段：纯文本，或带 MIME 类型的内联图片
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Part {
    Text(String),
    InlineImage { mime_type: String, data: Vec<u8> },
}

impl Part {
    pub fn text(content: impl Into<String>) -> Self {
        Part::Text(content.into())
    }

    pub fn png(data: Vec<u8>) -> Self {
        Part::InlineImage {
            mime_type: "image/png".to_string(),
            data,
        }
    }
}

/// 单条历史记录：角色 + 有序 Part 列表
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Turn {
    pub fn user_text(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::text(content)],
        }
    }

    pub fn model_text(content: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            parts: vec![Part::text(content)],
        }
    }

    pub fn user_parts(parts: Vec<Part>) -> Self {
        Self {
            role: Role::User,
            parts,
        }
    }
}

/// 会话历史：每个 Session 独占一份（不做进程级共享），append 后检查上限
#[derive(Clone, Debug)]
pub struct History {
    turns: Vec<Turn>,
    cap: usize,
}

impl History {
    pub fn new(cap: usize) -> Self {
        Self {
            turns: Vec::new(),
            cap: cap.max(2),
        }
    }

    /// 追加到末尾；超出上限时从最前端成对丢弃（user/model 大致配对），直到不超
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
        self.prune();
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    fn prune(&mut self) {
        while self.turns.len() > self.cap {
            let drop = 2.min(self.turns.len());
            self.turns.drain(..drop);
        }
    }
}
