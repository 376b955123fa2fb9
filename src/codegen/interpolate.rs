use super::scan;
use crate::ir::{Sentinel, TextExpr};
use regex::Regex;
use std::sync::LazyLock;

/// `#{` 转义插值，`!{` 原样插值，前置反斜杠表示字面量
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\\)?([#!])\{").unwrap());

/// 将含插值标记的文本拆成有序的哨兵序列
///
/// 相邻的字面量与 `#{}` 表达式拼接为同一个 `Text`；`!{}` 总是单独成为
/// `Unescape`，并在它之前把已积累的内容刷出。空文本得到一个包裹空串的 `Text`。
/// 生成的 `Text` 都以 `""` 开头拼接，`#{flag}` 中的 `false`、`null` 也会输出为字符串。
pub fn interpolate(text: &str) -> Vec<Sentinel> {
    let mut result = Vec::new();
    let mut buf = TextExpr::interpolated();
    let mut rest = text;

    while let Some(caps) = MARKER_RE.captures(rest) {
        let Some(marker) = caps.get(0) else {
            break;
        };
        buf.push_literal(&rest[..marker.start()]);
        let sigil = &caps[2];

        if caps.get(1).is_some() {
            buf.push_literal(sigil);
            buf.push_literal("{");
            rest = &rest[marker.end()..];
            continue;
        }

        let open_at = marker.end() - 1;
        let Some(close) = scan::find_close(&rest[open_at..]) else {
            tracing::warn!(text = %rest, "插值缺少闭合的 '}}'，按字面量处理");
            buf.push_literal(&rest[marker.start()..]);
            rest = "";
            break;
        };
        let src = rest[open_at + 1..open_at + close].trim();

        if !src.is_empty() {
            if sigil == "!" {
                if !buf.is_empty() {
                    result.push(Sentinel::Text(std::mem::replace(&mut buf, TextExpr::interpolated())));
                }
                result.push(Sentinel::Unescape(src.to_string()));
            } else {
                buf.push_expr(src);
            }
        }
        rest = &rest[open_at + close + 1..];
    }

    buf.push_literal(rest);
    if !buf.is_empty() || result.is_empty() {
        result.push(Sentinel::Text(buf));
    }
    result
}
