use crate::config::{HelperMode, RuntimeConfig};
use crate::runtime::Helper;

/// 单次编译中已声明的运行时辅助函数
///
/// 每个辅助函数最多声明一次，声明顺序即首次注册的顺序。
#[derive(Debug, Default)]
pub struct HelperSet {
    declared: Vec<Helper>,
}

impl HelperSet {
    /// 注册辅助函数，首次注册返回 true
    pub fn register(&mut self, helper: Helper) -> bool {
        if self.declared.contains(&helper) {
            return false;
        }
        tracing::debug!(helper = helper.ident(), "声明运行时辅助函数");
        self.declared.push(helper);
        true
    }

    pub fn contains(&self, helper: Helper) -> bool {
        self.declared.contains(&helper)
    }

    pub fn helpers(&self) -> &[Helper] {
        &self.declared
    }

    /// 生成声明语句
    ///
    /// 内联模式下会补齐被依赖的辅助函数，被依赖者排在前面。
    pub fn declarations(&self, runtime: &RuntimeConfig) -> Vec<String> {
        match runtime.mode {
            HelperMode::Require => self
                .declared
                .iter()
                .map(|h| {
                    format!(
                        "var {} = require('{}/{}');",
                        h.ident(),
                        runtime.module.trim_end_matches('/'),
                        h.file_name()
                    )
                })
                .collect(),
            HelperMode::Inline => {
                let mut ordered: Vec<Helper> = Vec::new();
                for &helper in &self.declared {
                    for &dep in helper.requires() {
                        if !ordered.contains(&dep) {
                            ordered.push(dep);
                        }
                    }
                    if !ordered.contains(&helper) {
                        ordered.push(helper);
                    }
                }
                ordered.iter().map(|h| h.js_source().to_string()).collect()
            }
        }
    }
}
