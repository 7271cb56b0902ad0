//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `FILTERBAR__*` 覆盖（双下划线表示嵌套，如 `FILTERBAR__TOOLBAR__PER_PAGE=20`）。

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub app: AppSection,
    pub dispatch: DispatchSection,
    pub toolbar: ToolbarSection,
}

/// [app] 段
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppSection {
    pub name: Option<String>,
}

/// [dispatch] 段：两个防抖派发器的静默窗口（毫秒）
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchSection {
    #[serde(default = "default_debounce_ms")]
    pub refresh_debounce_ms: u64,
    #[serde(default = "default_debounce_ms")]
    pub tag_catalog_debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    800
}

impl Default for DispatchSection {
    fn default() -> Self {
        Self {
            refresh_debounce_ms: default_debounce_ms(),
            tag_catalog_debounce_ms: default_debounce_ms(),
        }
    }
}

impl DispatchSection {
    pub fn refresh_window(&self) -> Duration {
        Duration::from_millis(self.refresh_debounce_ms)
    }

    pub fn tag_catalog_window(&self) -> Duration {
        Duration::from_millis(self.tag_catalog_debounce_ms)
    }
}

/// [toolbar] 段：分页、标签分面开关、分面隐藏
#[derive(Debug, Clone, Deserialize)]
pub struct ToolbarSection {
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    #[serde(default)]
    pub show_tags: bool,
    #[serde(default)]
    pub hide_filters: HideFilters,
}

fn default_per_page() -> u32 {
    50
}

impl Default for ToolbarSection {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
            show_tags: false,
            hide_filters: HideFilters::default(),
        }
    }
}

/// [toolbar.hide_filters] 段：三态（未设置 / true / false），`all` 可被单个分面的 false 覆盖
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct HideFilters {
    pub all: Option<bool>,
    pub name: Option<bool>,
    pub stale: Option<bool>,
    pub registered_with: Option<bool>,
    pub tags: Option<bool>,
}

/// 从 config 目录加载配置，环境变量 FILTERBAR__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 FILTERBAR__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    for name in ["config/default", "../config/default", "default"] {
        if std::path::Path::new(&format!("{}.toml", name)).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("FILTERBAR")
            .separator("__")
            .try_parsing(true),
    );

    builder.build()?.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.dispatch.refresh_window(), Duration::from_millis(800));
        assert_eq!(cfg.dispatch.tag_catalog_window(), Duration::from_millis(800));
        assert_eq!(cfg.toolbar.per_page, 50);
        assert!(!cfg.toolbar.show_tags);
        assert_eq!(cfg.toolbar.hide_filters, HideFilters::default());
    }

    #[test]
    fn test_file_overrides() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[dispatch]
refresh_debounce_ms = 300

[toolbar]
show_tags = true

[toolbar.hide_filters]
all = true
name = false
"#
        )
        .unwrap();

        let cfg = load_config(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(cfg.dispatch.refresh_debounce_ms, 300);
        assert_eq!(cfg.dispatch.tag_catalog_debounce_ms, 800);
        assert!(cfg.toolbar.show_tags);
        assert_eq!(cfg.toolbar.hide_filters.all, Some(true));
        assert_eq!(cfg.toolbar.hide_filters.name, Some(false));
        assert_eq!(cfg.toolbar.hide_filters.tags, None);
    }
}
