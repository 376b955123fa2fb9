//! 生成代码在运行时依赖的辅助函数
//!
//! 内联模式下写入输出的 JavaScript 源码，以及编译期求值字面量 class 时
//! 使用的 Rust 版本 `class_join`，两者语义一致。

use serde_json::Value;

/// 运行时辅助函数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Helper {
    /// 迭代：`__map(obj, fn, alt)`
    Map,
    /// 属性合并：`__attr(...objs)`
    Attr,
    /// class 拼接：`__class(...args)`
    Class,
}

impl Helper {
    pub const ALL: [Helper; 3] = [Helper::Map, Helper::Attr, Helper::Class];

    /// 生成代码中引用的标识符
    pub fn ident(self) -> &'static str {
        match self {
            Helper::Map => "__map",
            Helper::Attr => "__attr",
            Helper::Class => "__class",
        }
    }

    /// 运行时模块目录下的文件名
    pub fn file_name(self) -> &'static str {
        match self {
            Helper::Map => "map.js",
            Helper::Attr => "attr.js",
            Helper::Class => "class.js",
        }
    }

    pub fn js_source(self) -> &'static str {
        match self {
            Helper::Map => MAP_JS,
            Helper::Attr => ATTR_JS,
            Helper::Class => CLASS_JS,
        }
    }

    /// 内联模式下该辅助函数依赖的其它辅助函数
    pub fn requires(self) -> &'static [Helper] {
        match self {
            Helper::Attr => &[Helper::Class],
            Helper::Map | Helper::Class => &[],
        }
    }

    pub fn from_name(name: &str) -> Option<Helper> {
        Helper::ALL
            .into_iter()
            .find(|h| h.file_name().trim_end_matches(".js") == name || h.ident() == name)
    }
}

const MAP_JS: &str = r#"function __map(obj, each, alt) {
  var result = [];
  if (obj != null && typeof obj.length === 'number') {
    result = [].map.call(obj, each);
  } else if (obj != null) {
    for (var key in obj) {
      if (Object.prototype.hasOwnProperty.call(obj, key)) result.push(each(obj[key], key));
    }
  }
  return result.length || !alt ? result : alt();
}"#;

const CLASS_JS: &str = r#"function __class() {
  var out = [];
  function add(it) {
    if (it == null || it === '') return;
    if (typeof it !== 'string' && typeof it.length === 'number') {
      [].forEach.call(it, function (el) {
        if (el != null && el !== '') out.push(String(el));
      });
    } else {
      out.push(String(it));
    }
  }
  [].forEach.call(arguments, add);
  return out.join(' ');
}"#;

const ATTR_JS: &str = r#"function __attr() {
  var classes = [];
  var attrs = {};
  [].forEach.call(arguments, function (it) {
    for (var key in it) {
      var val = it[key];
      if (key === 'class' || key === 'className') {
        classes.push(val);
        continue;
      }
      if (key === 'for') {
        key = 'htmlFor';
      } else if (key.indexOf('data-') === 0) {
        if (val == null || val === 'null') continue;
      } else if (key.indexOf('aria-') !== 0 && key.indexOf('-') !== -1) {
        key = key.split('-').map(function (part, i) {
          return i === 0 ? part : part.charAt(0).toUpperCase() + part.substr(1);
        }).join('');
      }
      attrs[key] = val;
    }
  });
  if (classes.length) attrs.className = __class.apply(null, classes);
  return attrs;
}"#;

/// 属性名的处理规则，编译期与运行时共用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrKey {
    /// `class` / `className`，并入同一个 `className`
    Class,
    /// `data-*`，值为 null 时省略
    Data(String),
    /// 原样保留或改名后的键
    Plain(String),
}

impl AttrKey {
    pub fn classify(name: &str) -> Self {
        match name {
            "class" | "className" => AttrKey::Class,
            "for" => AttrKey::Plain("htmlFor".into()),
            _ if name.starts_with("data-") => AttrKey::Data(name.into()),
            _ if name.starts_with("aria-") => AttrKey::Plain(name.into()),
            _ if name.contains('-') => AttrKey::Plain(camel_case(name)),
            _ => AttrKey::Plain(name.into()),
        }
    }
}

/// `my-custom-attr` → `myCustomAttr`
pub fn camel_case(name: &str) -> String {
    let mut segments = name.split('-');
    let mut out = segments.next().unwrap_or_default().to_string();
    for seg in segments {
        let mut chars = seg.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// 按 JavaScript `String(value)` 的规则转换为字符串
pub fn js_string(value: &Value) -> String {
    match value {
        Value::Null => "null".into(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) => js_number(f),
            None => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|v| if v.is_null() { String::new() } else { js_string(v) })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".into(),
    }
}

/// `Number.prototype.toString`：1e21 及以上、1e-6 以下改用指数形式，指数带符号
fn js_number(f: f64) -> String {
    if f.is_nan() {
        return "NaN".into();
    }
    if f.is_infinite() {
        let text = if f > 0.0 { "Infinity" } else { "-Infinity" };
        return text.into();
    }
    if f == 0.0 {
        return "0".into();
    }
    let abs = f.abs();
    if abs >= 1e21 || abs < 1e-6 {
        let exp = format!("{f:e}");
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        };
    }
    if f.fract() == 0.0 && abs < 9.0e15 {
        return format!("{}", f as i64);
    }
    f.to_string()
}

fn is_empty_arg(value: &Value) -> bool {
    matches!(value, Value::Null) || value.as_str() == Some("")
}

/// 类数组：数组，或带数值 `length` 的对象
fn array_like(value: &Value) -> Option<Vec<(usize, &Value)>> {
    match value {
        Value::Array(items) => Some(items.iter().enumerate().collect()),
        Value::Object(map) => {
            let len = map.get("length")?.as_u64()? as usize;
            Some(
                (0..len)
                    .filter_map(|i| map.get(&i.to_string()).map(|v| (i, v)))
                    .collect(),
            )
        }
        _ => None,
    }
}

/// class 拼接：丢弃 null 与空串，展开类数组参数，以单个空格连接
pub fn class_join(args: &[Value]) -> String {
    let mut out: Vec<String> = Vec::new();
    for arg in args {
        if is_empty_arg(arg) {
            continue;
        }
        match array_like(arg) {
            Some(items) => out.extend(
                items
                    .into_iter()
                    .map(|(_, v)| v)
                    .filter(|v| !is_empty_arg(v))
                    .map(js_string),
            ),
            None => out.push(js_string(arg)),
        }
    }
    out.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn class_join_drops_empty_and_flattens() {
        assert_eq!(class_join(&[json!("a"), json!(null), json!(""), json!(["b", "c"])]), "a b c");
        assert_eq!(class_join(&[json!(["x", null, ""]), json!(1)]), "x 1");
        assert_eq!(class_join(&[json!({"length": 2, "0": "p", "1": "q"})]), "p q");
        assert_eq!(class_join(&[]), "");
    }

    #[test]
    fn js_string_formats_numbers_like_javascript() {
        assert_eq!(js_string(&json!(1.0)), "1");
        assert_eq!(js_string(&json!(2.5)), "2.5");
        assert_eq!(js_string(&json!(true)), "true");
        assert_eq!(js_string(&json!([1, null, "a"])), "1,,a");
        assert_eq!(js_string(&json!(1e21)), "1e+21");
        assert_eq!(js_string(&json!(1.5e22)), "1.5e+22");
        assert_eq!(js_string(&json!(1e20)), "100000000000000000000");
        assert_eq!(js_string(&json!(1e-7)), "1e-7");
        assert_eq!(js_string(&json!(0.000001)), "0.000001");
        assert_eq!(js_string(&json!(-0.0)), "0");
    }

    #[test]
    fn classifies_attribute_keys() {
        assert_eq!(AttrKey::classify("class"), AttrKey::Class);
        assert_eq!(AttrKey::classify("className"), AttrKey::Class);
        assert_eq!(AttrKey::classify("for"), AttrKey::Plain("htmlFor".into()));
        assert_eq!(AttrKey::classify("data-foo"), AttrKey::Data("data-foo".into()));
        assert_eq!(AttrKey::classify("aria-hidden"), AttrKey::Plain("aria-hidden".into()));
        assert_eq!(AttrKey::classify("my-custom-attr"), AttrKey::Plain("myCustomAttr".into()));
        assert_eq!(AttrKey::classify("href"), AttrKey::Plain("href".into()));
    }

    #[test]
    fn camel_case_tolerates_empty_segments() {
        assert_eq!(camel_case("a--b"), "aB");
        assert_eq!(camel_case("on-click-"), "onClick");
    }

    #[test]
    fn map_helper_falls_back_only_on_empty_result() {
        assert!(MAP_JS.starts_with("function __map(obj, each, alt)"));
        assert!(MAP_JS.contains("typeof obj.length === 'number'"));
        assert!(MAP_JS.contains("hasOwnProperty.call(obj, key)) result.push(each(obj[key], key))"));
        assert!(MAP_JS.contains("return result.length || !alt ? result : alt();"));
    }

    #[test]
    fn attr_helper_applies_compile_time_key_rules() {
        assert!(ATTR_JS.contains("key === 'class' || key === 'className'"));
        assert!(ATTR_JS.contains("key = 'htmlFor'"));
        assert!(ATTR_JS.contains("if (val == null || val === 'null') continue;"));
        assert!(ATTR_JS.contains("key.indexOf('aria-') !== 0 && key.indexOf('-') !== -1"));
        assert!(ATTR_JS.contains("attrs.className = __class.apply(null, classes)"));
        assert_eq!(camel_case("tab-index"), "tabIndex");
    }

    #[test]
    fn class_helper_drops_empty_like_class_join() {
        assert!(CLASS_JS.contains("if (it == null || it === '') return;"));
        assert!(CLASS_JS.contains("if (el != null && el !== '') out.push(String(el));"));
        assert_eq!(class_join(&[json!(["a", null, ""]), json!(""), json!("b")]), "a b");
    }

    #[test]
    fn inline_sources_declare_their_identifiers() {
        for helper in Helper::ALL {
            assert!(helper.js_source().starts_with(&format!("function {}(", helper.ident())));
        }
        assert!(ATTR_JS.contains(Helper::Class.ident()));
        assert_eq!(Helper::Attr.requires(), &[Helper::Class]);
    }

    #[test]
    fn helper_lookup_by_name() {
        assert_eq!(Helper::from_name("map"), Some(Helper::Map));
        assert_eq!(Helper::from_name("__class"), Some(Helper::Class));
        assert_eq!(Helper::from_name("nope"), None);
    }
}
