use crate::ir::{
    AttrsExpr, ClassPart, EachCall, Else, IfChain, Loop, MergeArg, ObjectLit, Piece, Program, PropValue,
    Sentinel, Stmt, TextExpr,
};
use crate::runtime::Helper;
use anyhow::Result;

/// 把改写后的程序序列化为最终源码
pub trait Printer {
    fn print(&self, program: &Program) -> Result<String>;
}

/// 花括号语法的文本打印器，哨兵打印为 `TEXT(...)`、`UNESCAPE(...)`、`ELEMENT(...)` 调用
#[derive(Debug, Clone)]
pub struct JsPrinter {
    pub indent: String,
}

impl Default for JsPrinter {
    fn default() -> Self {
        Self {
            indent: "  ".into(),
        }
    }
}

impl Printer for JsPrinter {
    fn print(&self, program: &Program) -> Result<String> {
        Ok(self.render(program))
    }
}

impl JsPrinter {
    pub fn render(&self, program: &Program) -> String {
        let mut w = Writer {
            out: String::new(),
            indent: &self.indent,
            depth: 0,
        };
        w.stmts(&program.body);
        w.out
    }
}

/// JSON 字符串转义，结果同时是合法的 JavaScript 字符串字面量
pub fn quote(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("{s:?}"))
}

/// 拼接表达式：单个字面量直接输出，不做字符串化的单个表达式也直接输出；
/// 其余以 `+` 连接，首项为表达式时前置 `""` 保证字符串拼接
pub fn render_text(expr: &TextExpr) -> String {
    match expr.pieces.as_slice() {
        [] => "\"\"".into(),
        [Piece::Literal(s)] => quote(s),
        [Piece::Expr(src)] if !expr.coerce => src.clone(),
        pieces => {
            let mut terms = Vec::with_capacity(pieces.len() + 1);
            if matches!(pieces.first(), Some(Piece::Expr(_))) {
                terms.push("\"\"".to_string());
            }
            for piece in pieces {
                terms.push(match piece {
                    Piece::Literal(s) => quote(s),
                    Piece::Expr(src) => format!("({src})"),
                });
            }
            terms.join(" + ")
        }
    }
}

pub fn render_attrs(attrs: &Option<AttrsExpr>) -> String {
    match attrs {
        None => "null".into(),
        Some(AttrsExpr::Object(obj)) => render_object(obj),
        Some(AttrsExpr::Merge(args)) => {
            let args: Vec<String> = args
                .iter()
                .map(|arg| match arg {
                    MergeArg::Object(obj) => render_object(obj),
                    MergeArg::Source(src) => src.clone(),
                })
                .collect();
            format!("{}({})", Helper::Attr.ident(), args.join(", "))
        }
    }
}

pub fn render_object(obj: &ObjectLit) -> String {
    let props: Vec<String> = obj
        .props
        .iter()
        .map(|(key, value)| {
            let value = match value {
                PropValue::Source(src) => src.clone(),
                PropValue::Classes(parts) => render_classes(parts),
            };
            format!("{}: {}", quote(key), value)
        })
        .collect();
    format!("{{{}}}", props.join(", "))
}

fn render_classes(parts: &[ClassPart]) -> String {
    parts
        .iter()
        .map(|part| match part {
            ClassPart::Static(s) => quote(s),
            ClassPart::Dynamic(src) => format!("{}({})", Helper::Class.ident(), src),
        })
        .collect::<Vec<_>>()
        .join(" + \" \" + ")
}

struct Writer<'a> {
    out: String,
    indent: &'a str,
    depth: usize,
}

impl Writer<'_> {
    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str(self.indent);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn nested(&mut self, stmts: &[Stmt]) {
        self.depth += 1;
        self.stmts(stmts);
        self.depth -= 1;
    }

    fn stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Sentinel(sentinel) => self.sentinel(sentinel),
            Stmt::Code(src) => self.line(src),
            Stmt::Scope(body) => {
                self.line("{");
                self.nested(body);
                self.line("}");
            }
            Stmt::If(chain) => self.if_chain(chain, false),
            Stmt::Loop(lp) => self.while_loop(lp),
            Stmt::Each(each) => self.each(each),
            Stmt::LineComment(text) => self.line(&format!("//{text}")),
            Stmt::BlockComment { text, body } => {
                self.line(&format!("/*{text}"));
                self.nested(body);
                self.line("*/");
            }
            Stmt::MixinBlock => self.line("block ? block() : null;"),
        }
    }

    fn sentinel(&mut self, sentinel: &Sentinel) {
        match sentinel {
            Sentinel::Text(expr) => self.line(&format!("TEXT({});", render_text(expr))),
            Sentinel::Unescape(src) => self.line(&format!("UNESCAPE({src});")),
            Sentinel::Element {
                tag,
                attrs,
                children,
            } => {
                self.line(&format!("ELEMENT({}, {});", quote(tag), render_attrs(attrs)));
                self.line("{");
                self.nested(children);
                self.line("}");
            }
        }
    }

    fn if_chain(&mut self, chain: &IfChain, chained: bool) {
        let head = format!("if ({}) {{", chain.test);
        if chained {
            // 接在上一分支的 `} else ` 之后
            self.out.push_str(&head);
            self.out.push('\n');
        } else {
            self.line(&head);
        }
        self.nested(&chain.consequent);
        match &chain.alternate {
            None => self.line("}"),
            Some(Else::If(next)) => {
                for _ in 0..self.depth {
                    self.out.push_str(self.indent);
                }
                self.out.push_str("} else ");
                self.if_chain(next, true);
            }
            Some(Else::Block(body)) => {
                self.line("} else {");
                self.nested(body);
                self.line("}");
            }
        }
    }

    fn while_loop(&mut self, lp: &Loop) {
        self.line("(function () {");
        self.depth += 1;
        self.line("var __return = [];");
        for (i, body) in lp.bodies.iter().enumerate() {
            self.line(&format!("var {} = function () {{", Loop::body_name(i)));
            self.nested(body);
            self.line("};");
        }
        self.line(&format!("while ({}) {{", lp.test));
        self.depth += 1;
        for i in 0..lp.bodies.len() {
            self.line(&format!("__return.push({}.call(this));", Loop::body_name(i)));
        }
        self.depth -= 1;
        self.line("}");
        self.line("return __return;");
        self.depth -= 1;
        self.line("}).call(this);");
    }

    fn each(&mut self, each: &EachCall) {
        self.line(&format!(
            "{}({}, ({}, {}) => {{",
            each.helper, each.obj, each.val, each.key
        ));
        self.nested(&each.body);
        match &each.alternate {
            Some(alt) => {
                self.line("}, () => {");
                self.nested(alt);
                self.line("});");
            }
            None => self.line("});"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_rendering() {
        assert_eq!(render_text(&TextExpr::default()), r#""""#);
        assert_eq!(render_text(&TextExpr::literal("a\"b")), r#""a\"b""#);

        let mut expr = TextExpr::literal("a");
        expr.push_expr("1+1");
        expr.push_literal("b");
        assert_eq!(render_text(&expr), r#""a" + (1+1) + "b""#);

        let mut leading = TextExpr::default();
        leading.push_expr("a");
        leading.push_expr("b");
        assert_eq!(render_text(&leading), r#""" + (a) + (b)"#);
    }

    #[test]
    fn lone_expression_coerced_only_when_interpolated() {
        assert_eq!(render_text(&TextExpr::expr("label")), "label");

        let mut interpolated = TextExpr::interpolated();
        interpolated.push_expr("flag");
        assert_eq!(render_text(&interpolated), r#""" + (flag)"#);
    }

    #[test]
    fn class_name_parts_join_with_space() {
        let obj = ObjectLit {
            props: vec![
                ("id".into(), PropValue::Source("'x'".into())),
                (
                    "className".into(),
                    PropValue::Classes(vec![ClassPart::Static("a".into()), ClassPart::Dynamic("b".into())]),
                ),
            ],
        };
        assert_eq!(render_object(&obj), r#"{"id": 'x', "className": "a" + " " + __class(b)}"#);
    }

    #[test]
    fn else_if_chain_is_flat() {
        let leaf = |s: &str| vec![Stmt::text(TextExpr::literal(s))];
        let program = Program {
            body: vec![Stmt::If(IfChain {
                test: "a".into(),
                consequent: leaf("A"),
                alternate: Some(Else::If(Box::new(IfChain {
                    test: "b".into(),
                    consequent: leaf("B"),
                    alternate: Some(Else::Block(leaf("C"))),
                }))),
            })],
        };
        assert_eq!(
            JsPrinter::default().render(&program),
            "if (a) {\n  TEXT(\"A\");\n} else if (b) {\n  TEXT(\"B\");\n} else {\n  TEXT(\"C\");\n}\n"
        );
    }

    #[test]
    fn element_opens_scope() {
        let program = Program {
            body: vec![Stmt::Sentinel(Sentinel::Element {
                tag: "div".into(),
                attrs: None,
                children: vec![Stmt::unescape("html")],
            })],
        };
        assert_eq!(
            JsPrinter::default().render(&program),
            "ELEMENT(\"div\", null);\n{\n  UNESCAPE(html);\n}\n"
        );
    }
}
