//! はい/いいえ確認
//!
//! 取り消せない操作（履歴の全削除）の前に呼ぶ。

use dialoguer::Confirm as ConfirmPrompt;
use tracing::warn;

pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

/// 固定の回答（`--yes` やテストで使う）
impl Confirm for bool {
    fn confirm(&self, _prompt: &str) -> bool {
        *self
    }
}

/// 端末で対話的に確認する
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        match ConfirmPrompt::new().with_prompt(prompt).default(false).interact() {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "confirmation prompt failed, treating as no");
                false
            }
        }
    }
}
