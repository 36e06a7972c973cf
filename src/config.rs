use crate::error::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// 运行配置
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// 加载完成后立即运行所有用例
    pub run_now: bool,

    /// 导出 JSON 的缩进空格数，0 为紧凑格式
    pub json_indent: usize,

    /// 渲染耗时使用的小数位数
    pub time_precision: usize,

    /// RUST_LOG 未设置时的默认日志级别
    pub log_level: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            run_now: false,
            json_indent: 2,
            time_precision: 4,
            log_level: "info".to_string(),
        }
    }
}

/// 配置文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置文件名
    const CONFIG_FILE: &'static str = "caseflow.toml";

    /// 从指定路径加载配置文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<HarnessConfig> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::load_from_str(&content)
    }

    pub fn load_from_str(content: &str) -> Result<HarnessConfig> {
        Ok(toml::from_str(content)?)
    }

    /// 查找并加载配置文件
    /// 查找顺序：
    /// 1. 当前目录及其父目录
    /// 2. 用户配置目录 ~/.config/caseflow/
    ///
    /// 都没有时返回默认配置。存在但无法解析的文件会记录警告后跳过。
    pub fn find_and_load() -> HarnessConfig {
        std::env::current_dir()
            .ok()
            .and_then(|dir| Self::try_load_from_dir(&dir))
            .or_else(Self::try_load_from_user_dir)
            .unwrap_or_default()
    }

    /// 从 `start` 开始向上查找，使用遇到的第一个配置文件
    fn try_load_from_dir(start: &Path) -> Option<HarnessConfig> {
        let mut current = start.to_path_buf();

        loop {
            let config_path = current.join(Self::CONFIG_FILE);
            if config_path.exists() {
                return Self::load_existing(&config_path);
            }

            // 尝试父目录
            if !current.pop() {
                break;
            }
        }

        None
    }

    /// 尝试从用户配置目录加载
    fn try_load_from_user_dir() -> Option<HarnessConfig> {
        let config_path = Self::user_config_path()?;

        if config_path.exists() {
            Self::load_existing(&config_path)
        } else {
            None
        }
    }

    fn user_config_path() -> Option<PathBuf> {
        let home = dirs::home_dir()?;
        Some(home.join(".config").join("caseflow").join(Self::CONFIG_FILE))
    }

    fn load_existing(config_path: &Path) -> Option<HarnessConfig> {
        debug!(path = %config_path.display(), "Loading config");
        match Self::load_from_path(config_path) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(
                    path = %config_path.display(),
                    error = %e,
                    "Ignoring unreadable config file"
                );
                None
            }
        }
    }
}
