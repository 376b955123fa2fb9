//! 代码生成阶段产出的中间程序
//!
//! 中间程序直接以内存中的树表示，三种哨兵形式（`TEXT` / `UNESCAPE` /
//! `ELEMENT`）是 [`Sentinel`] 节点，由改写器按种类识别，而不是按调用名匹配文本。

/// 完整的中间程序
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
}

/// 哨兵形式
#[derive(Debug, Clone, PartialEq)]
pub enum Sentinel {
    /// 自动转义输出
    Text(TextExpr),
    /// 原样输出
    Unescape(String),
    /// 元素构造，子内容位于嵌套作用域中
    Element {
        tag: String,
        attrs: Option<AttrsExpr>,
        children: Vec<Stmt>,
    },
}

/// 按顺序拼接的字符串表达式
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextExpr {
    pub pieces: Vec<Piece>,
    /// 以 `""` 开头拼接，保证结果是字符串（插值文本）
    pub coerce: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Piece {
    Literal(String),
    Expr(String),
}

impl TextExpr {
    /// 插值文本的起始缓冲
    pub fn interpolated() -> Self {
        Self {
            pieces: Vec::new(),
            coerce: true,
        }
    }

    /// 单个表达式，原样输出不做字符串化
    pub fn expr(src: &str) -> Self {
        Self {
            pieces: vec![Piece::Expr(src.to_string())],
            coerce: false,
        }
    }

    pub fn literal(text: &str) -> Self {
        let mut expr = Self::default();
        expr.push_literal(text);
        expr
    }

    /// 追加字面量，与前一个字面量相邻时合并
    pub fn push_literal(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Piece::Literal(last)) = self.pieces.last_mut() {
            last.push_str(text);
        } else {
            self.pieces.push(Piece::Literal(text.to_string()));
        }
    }

    pub fn push_expr(&mut self, src: &str) {
        self.pieces.push(Piece::Expr(src.to_string()));
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

/// 元素的属性表达式
#[derive(Debug, Clone, PartialEq)]
pub enum AttrsExpr {
    /// 编译期确定的对象字面量
    Object(ObjectLit),
    /// 运行时合并：`__attr(a, b, ...)`
    Merge(Vec<MergeArg>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MergeArg {
    Object(ObjectLit),
    Source(String),
}

/// 属性对象字面量，键的顺序即输出顺序
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectLit {
    pub props: Vec<(String, PropValue)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Source(String),
    /// `className` 的各个部分，以空格拼接
    Classes(Vec<ClassPart>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassPart {
    /// 编译期求值得到的类名
    Static(String),
    /// 交给运行时 `__class(...)` 处理的表达式
    Dynamic(String),
}

/// 语句
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Sentinel(Sentinel),
    /// 原样输出的代码
    Code(String),
    /// 显式作用域 `{ ... }`
    Scope(Vec<Stmt>),
    If(IfChain),
    Loop(Loop),
    Each(EachCall),
    LineComment(String),
    BlockComment { text: String, body: Vec<Stmt> },
    /// `block ? block() : null;`
    MixinBlock,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfChain {
    pub test: String,
    pub consequent: Vec<Stmt>,
    pub alternate: Option<Else>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Else {
    If(Box<IfChain>),
    Block(Vec<Stmt>),
}

/// 降级后的 while 循环：每条顶层语句各自成为一个闭包
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    pub test: String,
    pub bodies: Vec<Vec<Stmt>>,
}

impl Loop {
    /// 第 `index` 个闭包的名字
    pub fn body_name(index: usize) -> String {
        format!("__body{index}")
    }
}

/// 迭代辅助函数调用 `__map(obj, (val, key) => {...}, () => {...})`
#[derive(Debug, Clone, PartialEq)]
pub struct EachCall {
    pub helper: String,
    pub obj: String,
    pub val: String,
    pub key: String,
    pub body: Vec<Stmt>,
    pub alternate: Option<Vec<Stmt>>,
}

impl Stmt {
    pub fn text(expr: TextExpr) -> Self {
        Stmt::Sentinel(Sentinel::Text(expr))
    }

    pub fn unescape(src: impl Into<String>) -> Self {
        Stmt::Sentinel(Sentinel::Unescape(src.into()))
    }

    pub fn as_sentinel(&self) -> Option<&Sentinel> {
        match self {
            Stmt::Sentinel(s) => Some(s),
            _ => None,
        }
    }
}

impl Program {
    /// 深度优先、按源顺序收集所有哨兵
    pub fn sentinels(&self) -> Vec<&Sentinel> {
        let mut out = Vec::new();
        collect_sentinels(&self.body, &mut out);
        out
    }
}

fn collect_sentinels<'a>(stmts: &'a [Stmt], out: &mut Vec<&'a Sentinel>) {
    for stmt in stmts {
        match stmt {
            Stmt::Sentinel(s) => {
                out.push(s);
                if let Sentinel::Element { children, .. } = s {
                    collect_sentinels(children, out);
                }
            }
            Stmt::Scope(body) | Stmt::BlockComment { body, .. } => collect_sentinels(body, out),
            Stmt::If(chain) => collect_if(chain, out),
            Stmt::Loop(lp) => {
                for body in &lp.bodies {
                    collect_sentinels(body, out);
                }
            }
            Stmt::Each(each) => {
                collect_sentinels(&each.body, out);
                if let Some(alt) = &each.alternate {
                    collect_sentinels(alt, out);
                }
            }
            Stmt::Code(_) | Stmt::LineComment(_) | Stmt::MixinBlock => {}
        }
    }
}

fn collect_if<'a>(chain: &'a IfChain, out: &mut Vec<&'a Sentinel>) {
    collect_sentinels(&chain.consequent, out);
    match &chain.alternate {
        Some(Else::If(next)) => collect_if(next, out),
        Some(Else::Block(body)) => collect_sentinels(body, out),
        None => {}
    }
}
