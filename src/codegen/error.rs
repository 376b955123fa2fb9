use crate::ast::Location;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("{}", format_error(file, *line, *col, &format!("不支持的语法结构：{construct}"), hint))]
    Unsupported {
        construct: &'static str,
        file: String,
        line: usize,
        col: usize,
        hint: Option<String>,
    },
}

fn format_error(file: &str, line: usize, col: usize, message: &str, hint: &Option<String>) -> String {
    let mut out = format!("pugjsx 编译错误\n  → {file}:{line}:{col}\n\n");
    out.push_str(&format!("  错误：{message}"));
    if let Some(h) = hint {
        out.push_str(&format!("\n  提示：{h}"));
    }
    out
}

impl CodegenError {
    /// 被拒绝的节点种类，附带替代写法提示
    pub fn unsupported(construct: &'static str, loc: &Location) -> Self {
        let hint = match construct {
            "Case" | "When" => Some("改用 if / else if / else 条件分支".to_string()),
            "Mixin" => Some("将可复用片段拆成组件".to_string()),
            "Filter" => Some("在模板外预处理内容后再以文本或代码传入".to_string()),
            "Doctype" => Some("组件模板不需要文档类型声明，删除即可".to_string()),
            _ => None,
        };
        Self::Unsupported {
            construct,
            file: loc.filename.clone().unwrap_or_else(|| "<template>".to_string()),
            line: loc.line.unwrap_or(0),
            col: loc.column.unwrap_or(0),
            hint,
        }
    }

    pub fn construct(&self) -> &'static str {
        match self {
            Self::Unsupported { construct, .. } => construct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_carries_location_and_hint() {
        let loc = Location {
            line: Some(4),
            column: Some(3),
            filename: Some("list.pug".into()),
        };
        let err = CodegenError::unsupported("Case", &loc);
        let msg = err.to_string();
        assert!(msg.contains("list.pug:4:3"));
        assert!(msg.contains("Case"));
        assert!(msg.contains("提示"));
        assert_eq!(err.construct(), "Case");
    }

    #[test]
    fn missing_location_uses_placeholder() {
        let err = CodegenError::unsupported("Filter", &Location::default());
        assert!(err.to_string().contains("<template>:0:0"));
    }
}
