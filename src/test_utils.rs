//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]

use crate::host::{
    Block,
    Choice,
};
use crate::input::TranslationTable;
use crate::marker::gettext;

/// テスト用の TranslationTable を作成する
///
/// # Arguments
/// * `entries` - (言語コード, 原文, 訳文) の組
pub(crate) fn create_table(entries: &[(&str, &str, &str)]) -> TranslationTable {
    let mut table = TranslationTable::new();
    for (lang, key, value) in entries {
        table.insert(*lang, *key, *value);
    }
    table
}

/// ラベル、ボタン、選択肢を含むテスト用のフォームを作成する
pub(crate) fn create_form() -> Block {
    Block::column()
        .child(Block::markdown(gettext("Welcome")))
        .child(Block::textbox(gettext("Name")).prop("value", "Ada"))
        .child(Block::radio(gettext("Answer"), [
            Choice::from(gettext("Yes")),
            Choice::pair(gettext("No"), "no"),
            Choice::from("Maybe"),
        ]))
        .child(Block::button(gettext("Submit")))
}
