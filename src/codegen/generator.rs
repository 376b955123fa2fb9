use super::attrs;
use super::error::CodegenError;
use super::helpers::HelperSet;
use super::interpolate::interpolate;
use crate::ast::{self, Alternate, Block, Node};
use crate::config::RuntimeConfig;
use crate::ir::{EachCall, Else, IfChain, Loop, Program, Sentinel, Stmt, TextExpr};
use crate::printer::JsPrinter;
use crate::runtime::Helper;

type Result<T> = std::result::Result<T, CodegenError>;

/// 生成结果：中间程序与需要前置的辅助函数声明
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub program: Program,
    pub helpers: Vec<String>,
}

impl Generated {
    /// 以 `TEXT` / `UNESCAPE` / `ELEMENT` 哨兵调用打印的中间代码
    pub fn intermediate_text(&self) -> String {
        JsPrinter::default().render(&self.program)
    }
}

/// 遍历节点树生成中间程序
///
/// 实例持有本次编译的辅助函数声明状态，`generate` 消耗实例，
/// 因此一个实例只能服务一次编译。
#[derive(Debug)]
pub struct Generator {
    runtime: RuntimeConfig,
    helpers: HelperSet,
}

impl Generator {
    pub fn new(runtime: RuntimeConfig) -> Self {
        Self {
            runtime,
            helpers: HelperSet::default(),
        }
    }

    pub fn generate(mut self, root: &Node) -> Result<Generated> {
        let mut body = Vec::new();
        self.visit(root, &mut body)?;
        let helpers = self.helpers.declarations(&self.runtime);
        tracing::debug!(
            statements = body.len(),
            helpers = helpers.len(),
            "中间程序生成完成"
        );
        Ok(Generated {
            program: Program { body },
            helpers,
        })
    }

    fn visit(&mut self, node: &Node, out: &mut Vec<Stmt>) -> Result<()> {
        match node {
            Node::Block(block) => self.visit_block(block, out),
            Node::Tag(tag) => self.visit_tag(tag, out),
            Node::Text(text) => {
                out.extend(interpolate(&text.val).into_iter().map(Stmt::Sentinel));
                Ok(())
            }
            Node::Literal(lit) => {
                out.push(Stmt::text(TextExpr::literal(&lit.text)));
                Ok(())
            }
            Node::Code(code) => self.visit_code(code, out),
            Node::Conditional(cond) => {
                let chain = self.visit_conditional(cond)?;
                out.push(Stmt::If(chain));
                Ok(())
            }
            Node::While(lp) => self.visit_while(lp, out),
            Node::Each(each) => self.visit_each(each, out),
            Node::Comment(comment) => {
                if comment.buffer {
                    out.push(Stmt::LineComment(comment.val.clone()));
                }
                Ok(())
            }
            Node::BlockComment(comment) => {
                if comment.buffer {
                    let mut body = Vec::new();
                    self.visit_block(&comment.block, &mut body)?;
                    out.push(Stmt::BlockComment {
                        text: comment.val.clone(),
                        body,
                    });
                }
                Ok(())
            }
            Node::MixinBlock(_) => {
                out.push(Stmt::MixinBlock);
                Ok(())
            }
            Node::Case(rejected)
            | Node::When(rejected)
            | Node::Doctype(rejected)
            | Node::Mixin(rejected)
            | Node::Filter(rejected) => Err(CodegenError::unsupported(node.kind(), &rejected.loc)),
        }
    }

    fn visit_block(&mut self, block: &Block, out: &mut Vec<Stmt>) -> Result<()> {
        for node in &block.nodes {
            self.visit(node, out)?;
        }
        Ok(())
    }

    fn visit_tag(&mut self, tag: &ast::Tag, out: &mut Vec<Stmt>) -> Result<()> {
        let attrs = attrs::normalize(&tag.attrs, &tag.attribute_blocks, &mut self.helpers);
        let mut children = Vec::new();
        if let Some(code) = &tag.code {
            self.visit_code(code, &mut children)?;
        }
        self.visit_block(&tag.block, &mut children)?;
        out.push(Stmt::Sentinel(Sentinel::Element {
            tag: tag.name.clone(),
            attrs,
            children,
        }));
        Ok(())
    }

    /// 输出型代码生成 `TEXT` / `UNESCAPE`；非输出型代码原样输出，
    /// 其子块包在显式作用域里，使代码中的流程控制作用于子内容
    fn visit_code(&mut self, code: &ast::Code, out: &mut Vec<Stmt>) -> Result<()> {
        let val = code.val.trim();
        if code.buffer {
            if code.must_escape {
                out.push(Stmt::text(TextExpr::expr(val)));
            } else {
                out.push(Stmt::unescape(val));
            }
        } else {
            out.push(Stmt::Code(val.to_string()));
        }

        if let Some(block) = &code.block {
            if code.buffer {
                self.visit_block(block, out)?;
            } else {
                let mut scope = Vec::new();
                self.visit_block(block, &mut scope)?;
                out.push(Stmt::Scope(scope));
            }
        }
        Ok(())
    }

    /// else-if 链展开为扁平的 `else if`，不增加嵌套
    fn visit_conditional(&mut self, cond: &ast::Conditional) -> Result<IfChain> {
        let mut consequent = Vec::new();
        self.visit_block(&cond.consequent, &mut consequent)?;
        let alternate = match &cond.alternate {
            Some(Alternate::Conditional(next)) => Some(Else::If(Box::new(self.visit_conditional(next)?))),
            Some(Alternate::Block(block)) => {
                let mut body = Vec::new();
                self.visit_block(block, &mut body)?;
                Some(Else::Block(body))
            }
            None => None,
        };
        Ok(IfChain {
            test: cond.test.trim().to_string(),
            consequent,
            alternate,
        })
    }

    /// 循环体的每条顶层语句各自编译为一个闭包，循环每轮依次调用并收集结果
    fn visit_while(&mut self, lp: &ast::While, out: &mut Vec<Stmt>) -> Result<()> {
        let mut bodies = Vec::with_capacity(lp.block.nodes.len());
        for node in &lp.block.nodes {
            let mut body = Vec::new();
            self.visit(node, &mut body)?;
            bodies.push(body);
        }
        out.push(Stmt::Loop(Loop {
            test: lp.test.trim().to_string(),
            bodies,
        }));
        Ok(())
    }

    fn visit_each(&mut self, each: &ast::Each, out: &mut Vec<Stmt>) -> Result<()> {
        self.helpers.register(Helper::Map);

        let mut body = Vec::new();
        self.visit_block(&each.block, &mut body)?;
        let alternate = match &each.alternate {
            Some(block) => {
                let mut alt = Vec::new();
                self.visit_block(block, &mut alt)?;
                Some(alt)
            }
            None => None,
        };
        let key = each
            .key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or(self.runtime.index_name.as_str())
            .to_string();

        out.push(Stmt::Each(EachCall {
            helper: Helper::Map.ident().to_string(),
            obj: each.obj.trim().to_string(),
            val: each.val.trim().to_string(),
            key,
            body,
            alternate,
        }));
        Ok(())
    }
}
