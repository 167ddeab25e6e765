//! 設定ファイルの読み込み関数

use std::path::Path;

use super::{
    ConfigError,
    I18nSettings,
};

/// ワークスペース直下の設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".ui-i18n.json";

/// ワークスペースから設定を読み込む
///
/// `.ui-i18n.json` ファイルを探して読み込む
///
/// # Arguments
/// * `workspace_root` - ワークスペースのルートパス
///
/// # Returns
/// - `Ok(Some(settings))`: 設定ファイルが見つかり、読み込みに成功
/// - `Ok(None)`: 設定ファイルが見つからない
/// - `Err(ConfigError)`: ファイル読み込みまたはパースエラー
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<I18nSettings>, ConfigError> {
    let config_path = workspace_root.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("Configuration file not found: {:?}", config_path);
        return Ok(None);
    }

    tracing::debug!("Loading configuration from: {:?}", config_path);

    let content = std::fs::read_to_string(&config_path)?;
    let mut settings: I18nSettings = serde_json::from_str(&content)?;

    // 相対パスはワークスペース基準で解決する
    if let Some(file) = settings.translation_file.as_mut()
        && file.is_relative()
    {
        *file = workspace_root.join(&*file);
    }

    Ok(Some(settings))
}
