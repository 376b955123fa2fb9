use std::ops::ControlFlow;

/// 扫描结果
#[derive(Debug, PartialEq, Eq)]
enum Walk {
    /// 回调在该偏移处要求停止
    Stopped(usize),
    /// 扫描到结尾
    Finished,
    /// 括号不匹配
    Broken,
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Code,
    Str(char),
    Template,
    LineComment,
    BlockComment,
}

#[derive(Debug, Clone, Copy)]
enum Frame {
    Bracket(char),
    /// 模板字符串中的 `${ ... }`
    TemplateExpr,
}

fn closer_of(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

/// 逐字符扫描，只对字符串与注释之外的字符回调；回调拿到的深度是处理该字符之后的括号深度
fn walk_code(src: &str, mut visit: impl FnMut(usize, char, usize) -> ControlFlow<()>) -> Walk {
    let mut stack: Vec<Frame> = Vec::new();
    let mut mode = Mode::Code;
    let mut chars = src.char_indices().peekable();

    while let Some((at, c)) = chars.next() {
        let next = chars.peek().map(|&(_, n)| n);
        match mode {
            Mode::Code => match c {
                '"' | '\'' => mode = Mode::Str(c),
                '`' => mode = Mode::Template,
                '/' if next == Some('/') => {
                    chars.next();
                    mode = Mode::LineComment;
                }
                '/' if next == Some('*') => {
                    chars.next();
                    mode = Mode::BlockComment;
                }
                '(' | '[' | '{' => {
                    if let Some(close) = closer_of(c) {
                        stack.push(Frame::Bracket(close));
                    }
                    if visit(at, c, stack.len()).is_break() {
                        return Walk::Stopped(at);
                    }
                }
                ')' | ']' | '}' => {
                    match stack.pop() {
                        Some(Frame::Bracket(expected)) if expected == c => {}
                        Some(Frame::TemplateExpr) if c == '}' => {
                            mode = Mode::Template;
                            continue;
                        }
                        _ => return Walk::Broken,
                    }
                    if visit(at, c, stack.len()).is_break() {
                        return Walk::Stopped(at);
                    }
                }
                _ => {
                    if visit(at, c, stack.len()).is_break() {
                        return Walk::Stopped(at);
                    }
                }
            },
            Mode::Str(quote) => {
                if c == '\\' {
                    chars.next();
                } else if c == quote {
                    mode = Mode::Code;
                }
            }
            Mode::Template => match c {
                '\\' => {
                    chars.next();
                }
                '`' => mode = Mode::Code,
                '$' if next == Some('{') => {
                    chars.next();
                    stack.push(Frame::TemplateExpr);
                    mode = Mode::Code;
                }
                _ => {}
            },
            Mode::LineComment => {
                if c == '\n' {
                    mode = Mode::Code;
                }
            }
            Mode::BlockComment => {
                if c == '*' && next == Some('/') {
                    chars.next();
                    mode = Mode::Code;
                }
            }
        }
    }
    Walk::Finished
}

/// 给定以开括号开头的文本，返回与之匹配的闭括号的字节偏移
///
/// 感知嵌套括号、字符串（含模板字符串插值）与注释；找不到时返回 `None`。
pub fn find_close(src: &str) -> Option<usize> {
    let open = src.chars().next()?;
    closer_of(open)?;
    match walk_code(src, |_, c, depth| {
        if depth == 0 && matches!(c, ')' | ']' | '}') {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }) {
        Walk::Stopped(at) => Some(at),
        Walk::Finished | Walk::Broken => None,
    }
}

/// 在顶层（不在任何括号、字符串或注释内）按 `sep` 切分
///
/// 括号不平衡时返回 `None`。
pub fn split_top_level(src: &str, sep: char) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut start = 0;
    match walk_code(src, |at, c, depth| {
        if depth == 0 && c == sep {
            parts.push(&src[start..at]);
            start = at + c.len_utf8();
        }
        ControlFlow::Continue(())
    }) {
        Walk::Finished => {}
        Walk::Stopped(_) | Walk::Broken => return None,
    }
    parts.push(&src[start..]);
    Some(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_simple_close() {
        assert_eq!(find_close("{1+1}b"), Some(4));
        assert_eq!(find_close("(a)"), Some(2));
    }

    #[test]
    fn skips_nested_brackets() {
        let src = "{fn({a: [1, 2]})} tail";
        assert_eq!(find_close(src), Some(16));
    }

    #[test]
    fn ignores_delimiters_in_strings_and_comments() {
        let src = r#"{"}" + '}' /* } */ + x}"#;
        assert_eq!(find_close(src), Some(src.len() - 1));

        let src = "{a // }\n}";
        assert_eq!(find_close(src), Some(src.len() - 1));
    }

    #[test]
    fn handles_template_literal_interpolation() {
        let src = "{`a ${ {b: 1}.b } }`}";
        assert_eq!(find_close(src), Some(src.len() - 1));
    }

    #[test]
    fn unterminated_returns_none() {
        assert_eq!(find_close("{a + (b"), None);
        assert_eq!(find_close("{a ]"), None);
        assert_eq!(find_close("x"), None);
    }

    #[test]
    fn splits_only_at_top_level() {
        let parts = split_top_level(r#"a, f(b, c), "d,e", [1, 2]"#, ',').unwrap();
        assert_eq!(parts, vec!["a", " f(b, c)", r#" "d,e""#, " [1, 2]"]);
    }

    #[test]
    fn split_rejects_unbalanced() {
        assert_eq!(split_top_level("a, b)", ','), None);
    }
}
