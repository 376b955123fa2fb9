use super::scan;
use serde_json::Value;

/// 可在编译期求值的字面量
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
}

impl Literal {
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Str(s) => Value::String(s.clone()),
            Literal::Num(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Null => Value::Null,
        }
    }

    /// 去掉首尾空白后是否为空；`null` 视为空
    pub fn is_blank(&self) -> bool {
        match self {
            Literal::Str(s) => s.trim().is_empty(),
            Literal::Null => true,
            Literal::Num(_) | Literal::Bool(_) => false,
        }
    }
}

/// 识别单个字面量表达式，其它形状一律返回 `None`
pub fn parse_literal(src: &str) -> Option<Literal> {
    let src = src.trim();
    match src {
        "true" => return Some(Literal::Bool(true)),
        "false" => return Some(Literal::Bool(false)),
        "null" => return Some(Literal::Null),
        _ => {}
    }
    let first = src.chars().next()?;
    match first {
        '"' | '\'' | '`' => parse_string(src, first).map(Literal::Str),
        _ => parse_number(src).map(Literal::Num),
    }
}

/// 数组字面量 `[a, b]` 的元素源码；不是数组字面量时返回 `None`
///
/// 空位与末尾逗号不计入元素。
pub fn array_elements(src: &str) -> Option<Vec<&str>> {
    let src = src.trim();
    if !src.starts_with('[') || scan::find_close(src)? != src.len() - 1 {
        return None;
    }
    let inner = &src[1..src.len() - 1];
    let elements = scan::split_top_level(inner, ',')?
        .into_iter()
        .map(str::trim)
        .filter(|el| !el.is_empty())
        .collect();
    Some(elements)
}

fn parse_string(src: &str, quote: char) -> Option<String> {
    let body = src.strip_prefix(quote)?;
    let mut out = String::new();
    let mut chars = body.char_indices();

    while let Some((at, c)) = chars.next() {
        match c {
            '\\' => {
                let (_, esc) = chars.next()?;
                match esc {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    'r' => out.push('\r'),
                    'b' => out.push('\u{8}'),
                    'f' => out.push('\u{c}'),
                    'v' => out.push('\u{b}'),
                    '0' => out.push('\0'),
                    '\n' => {}
                    'x' => {
                        let hex: String = chars.by_ref().take(2).map(|(_, h)| h).collect();
                        out.push(char::from_u32(u32::from_str_radix(&hex, 16).ok()?)?);
                    }
                    'u' => {
                        let rest = &body[at + 2..];
                        let (code, used) = if let Some(braced) = rest.strip_prefix('{') {
                            let end = braced.find('}')?;
                            (&braced[..end], end + 2)
                        } else {
                            (rest.get(..4)?, 4)
                        };
                        out.push(char::from_u32(u32::from_str_radix(code, 16).ok()?)?);
                        for _ in 0..used {
                            chars.next();
                        }
                    }
                    other => out.push(other),
                }
            }
            '$' if quote == '`' && body[at..].starts_with("${") => return None,
            c if c == quote => {
                // 结束引号之后不能再有内容，否则是拼接表达式
                return (at + c.len_utf8() == body.len()).then_some(out);
            }
            c => out.push(c),
        }
    }
    None
}

fn parse_number(src: &str) -> Option<f64> {
    let (negative, digits) = match src.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, src),
    };
    let first = digits.chars().next()?;
    if !(first.is_ascii_digit() || first == '.') {
        return None;
    }
    let value = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()? as f64
    } else {
        digits.parse::<f64>().ok()?
    };
    Some(if negative { -value } else { value })
}
