//! 模板编译器的代码生成阶段
//!
//! 输入模板解析器产出的节点树，生成带哨兵的中间程序，经改写器替换哨兵、
//! 打印器序列化后，与运行时辅助函数声明一起组成最终源码。

pub mod ast;
pub mod codegen;
pub mod config;
pub mod ir;
pub mod printer;
pub mod rewrite;
pub mod runtime;

use anyhow::Result;

use crate::ast::Node;
use crate::config::CodegenConfig;
use crate::printer::Printer;
use crate::rewrite::Rewriter;

/// 编译节点树：生成 → 改写 → 打印，辅助函数声明放在最前面
///
/// 改写器与打印器的错误原样向上传递。
pub fn compile(
    root: &Node,
    config: &CodegenConfig,
    rewriter: &mut dyn Rewriter,
    printer: &dyn Printer,
) -> Result<String> {
    let generated = codegen::generate(root, config)?;
    let program = rewriter.rewrite(generated.program, &config.options)?;
    let source = printer.print(&program)?;

    let mut output = generated.helpers.join("\n");
    if !output.is_empty() {
        output.push('\n');
    }
    output.push_str(&source);
    Ok(output)
}
