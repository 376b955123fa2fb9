use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

/// pugjsx.toml 配置
#[derive(Debug, Default, Deserialize)]
pub struct CodegenConfig {
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub log: LogConfig,
    /// 原样传给改写器的选项，本阶段不解读
    #[serde(default)]
    pub options: Options,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    /// require 模式下运行时模块所在路径
    #[serde(default = "default_module")]
    pub module: String,
    #[serde(default)]
    pub mode: HelperMode,
    /// each 未指定 key 时使用的索引名
    #[serde(default = "default_index_name")]
    pub index_name: String,
}

/// 辅助函数的声明方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HelperMode {
    /// `var __map = require('<module>/map.js');`
    #[default]
    Require,
    /// 直接写入函数源码
    Inline,
}

#[derive(Debug, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 透传给改写器的不透明选项
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Options(pub serde_json::Value);

impl Options {
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }
}

impl CodegenConfig {
    /// 读取配置文件；文件不存在时使用默认配置
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("{} 不存在，使用默认配置", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("读取 {} 失败：{}", path.display(), e))?;
        Self::from_toml(&content)
            .map_err(|e| anyhow::anyhow!("解析 {} 失败：{}", path.display(), e))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

// 默认值函数
fn default_module() -> String { "pugjsx/runtimes".into() }
fn default_index_name() -> String { "$index".into() }
fn default_log_level() -> String { "info".into() }

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            module: default_module(),
            mode: HelperMode::default(),
            index_name: default_index_name(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
