use crate::config::Options;
use crate::ir::{Else, IfChain, Program, Sentinel, Stmt};
use anyhow::Result;

/// 把哨兵替换为目标 UI 运行时的构造形式
///
/// 默认的 [`Rewriter::rewrite`] 按源顺序深度优先遍历程序，只把哨兵交给
/// [`Rewriter::rewrite_sentinel`]，其余代码保持不变。`Element` 的子内容会先于
/// 元素本身被改写。
pub trait Rewriter {
    fn rewrite_sentinel(&mut self, sentinel: Sentinel, options: &Options) -> Result<Stmt>;

    fn rewrite(&mut self, program: Program, options: &Options) -> Result<Program> {
        Ok(Program {
            body: rewrite_stmts(self, program.body, options)?,
        })
    }
}

/// 保留哨兵原样的改写器，用于输出中间代码
#[derive(Debug, Default)]
pub struct PassThrough;

impl Rewriter for PassThrough {
    fn rewrite_sentinel(&mut self, sentinel: Sentinel, _options: &Options) -> Result<Stmt> {
        Ok(Stmt::Sentinel(sentinel))
    }
}

pub fn rewrite_stmts<R: Rewriter + ?Sized>(rewriter: &mut R, stmts: Vec<Stmt>, options: &Options) -> Result<Vec<Stmt>> {
    stmts
        .into_iter()
        .map(|stmt| rewrite_stmt(rewriter, stmt, options))
        .collect()
}

fn rewrite_stmt<R: Rewriter + ?Sized>(rewriter: &mut R, stmt: Stmt, options: &Options) -> Result<Stmt> {
    Ok(match stmt {
        Stmt::Sentinel(Sentinel::Element {
            tag,
            attrs,
            children,
        }) => {
            let children = rewrite_stmts(rewriter, children, options)?;
            rewriter.rewrite_sentinel(
                Sentinel::Element {
                    tag,
                    attrs,
                    children,
                },
                options,
            )?
        }
        Stmt::Sentinel(sentinel) => rewriter.rewrite_sentinel(sentinel, options)?,
        Stmt::Scope(body) => Stmt::Scope(rewrite_stmts(rewriter, body, options)?),
        Stmt::If(chain) => Stmt::If(rewrite_if(rewriter, chain, options)?),
        Stmt::Loop(mut lp) => {
            lp.bodies = lp
                .bodies
                .into_iter()
                .map(|body| rewrite_stmts(rewriter, body, options))
                .collect::<Result<_>>()?;
            Stmt::Loop(lp)
        }
        Stmt::Each(mut each) => {
            each.body = rewrite_stmts(rewriter, each.body, options)?;
            each.alternate = each
                .alternate
                .map(|alt| rewrite_stmts(rewriter, alt, options))
                .transpose()?;
            Stmt::Each(each)
        }
        Stmt::BlockComment { text, body } => Stmt::BlockComment {
            text,
            body: rewrite_stmts(rewriter, body, options)?,
        },
        other @ (Stmt::Code(_) | Stmt::LineComment(_) | Stmt::MixinBlock) => other,
    })
}

fn rewrite_if<R: Rewriter + ?Sized>(rewriter: &mut R, chain: IfChain, options: &Options) -> Result<IfChain> {
    let consequent = rewrite_stmts(rewriter, chain.consequent, options)?;
    let alternate = match chain.alternate {
        Some(Else::If(next)) => Some(Else::If(Box::new(rewrite_if(rewriter, *next, options)?))),
        Some(Else::Block(body)) => Some(Else::Block(rewrite_stmts(rewriter, body, options)?)),
        None => None,
    };
    Ok(IfChain {
        test: chain.test,
        consequent,
        alternate,
    })
}
