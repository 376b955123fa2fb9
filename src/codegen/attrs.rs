use super::helpers::HelperSet;
use super::literal::{self, parse_literal};
use crate::ast::{Attr, AttrBlock};
use crate::ir::{AttrsExpr, ClassPart, MergeArg, ObjectLit, PropValue};
use crate::runtime::{self, AttrKey, Helper};

/// 编译元素的静态属性与动态属性块
///
/// 两者皆无时返回 `None`；有动态属性块时交给运行时 `__attr` 合并，
/// 静态属性先编译成对象字面量放在最前面。
pub fn normalize(attrs: &[Attr], blocks: &[AttrBlock], helpers: &mut HelperSet) -> Option<AttrsExpr> {
    if blocks.is_empty() {
        if attrs.is_empty() {
            return None;
        }
        return Some(AttrsExpr::Object(compile_object(attrs, helpers)));
    }

    let mut args = Vec::with_capacity(blocks.len() + 1);
    if !attrs.is_empty() {
        args.push(MergeArg::Object(compile_object(attrs, helpers)));
    }
    args.extend(blocks.iter().map(|b| MergeArg::Source(b.source().trim().to_string())));
    helpers.register(Helper::Attr);
    helpers.register(Helper::Class);
    Some(AttrsExpr::Merge(args))
}

/// 静态属性列表 → 对象字面量，所有 class 类键并入末尾的 `className`
pub fn compile_object(attrs: &[Attr], helpers: &mut HelperSet) -> ObjectLit {
    let mut object = ObjectLit::default();
    let mut classes = Vec::new();

    for attr in attrs {
        let val = attr.val.source();
        match AttrKey::classify(&attr.name) {
            AttrKey::Class => compile_class(&val, &mut classes, helpers),
            AttrKey::Data(key) => {
                if is_null_source(&val) {
                    continue;
                }
                object.props.push((key, PropValue::Source(val)));
            }
            AttrKey::Plain(key) => object.props.push((key, PropValue::Source(val))),
        }
    }

    if !classes.is_empty() {
        object.props.push(("className".into(), PropValue::Classes(classes)));
    }
    object
}

fn is_null_source(src: &str) -> bool {
    matches!(src.trim(), "null" | "undefined" | "\"null\"" | "'null'")
}

/// 数组字面量逐个元素处理，空数组整体省略；其它值按单个元素处理
fn compile_class(src: &str, classes: &mut Vec<ClassPart>, helpers: &mut HelperSet) {
    match literal::array_elements(src) {
        Some(elements) => {
            for element in elements {
                add_class(element, classes, helpers);
            }
        }
        None => add_class(src, classes, helpers),
    }
}

/// 字面量在编译期求值，空白字面量丢弃，其余交给运行时 `__class`
fn add_class(src: &str, classes: &mut Vec<ClassPart>, helpers: &mut HelperSet) {
    match parse_literal(src) {
        Some(lit) if lit.is_blank() => {}
        Some(lit) => {
            let joined = runtime::class_join(&[lit.to_value()]);
            if !joined.trim().is_empty() {
                classes.push(ClassPart::Static(joined));
            }
        }
        None => {
            helpers.register(Helper::Class);
            classes.push(ClassPart::Dynamic(src.trim().to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::AttrValue;

    fn attr(name: &str, val: &str) -> Attr {
        Attr {
            name: name.into(),
            val: AttrValue::Source(val.into()),
            must_escape: true,
        }
    }

    fn object(attrs: &[Attr]) -> (ObjectLit, HelperSet) {
        let mut helpers = HelperSet::default();
        let obj = compile_object(attrs, &mut helpers);
        (obj, helpers)
    }

    fn classes_of(obj: &ObjectLit) -> Option<&Vec<ClassPart>> {
        obj.props.iter().find_map(|(k, v)| match v {
            PropValue::Classes(parts) if k == "className" => Some(parts),
            _ => None,
        })
    }

    #[test]
    fn nothing_yields_none() {
        let mut helpers = HelperSet::default();
        assert_eq!(normalize(&[], &[], &mut helpers), None);
        assert!(helpers.helpers().is_empty());
    }

    #[test]
    fn literal_class_array_is_evaluated() {
        let (obj, helpers) = object(&[attr("class", r#"["a", "b"]"#)]);
        assert_eq!(
            classes_of(&obj),
            Some(&vec![ClassPart::Static("a".into()), ClassPart::Static("b".into())])
        );
        assert!(!helpers.contains(Helper::Class));
    }

    #[test]
    fn mixed_class_array_defers_dynamic_parts() {
        let (obj, helpers) = object(&[attr("class", r#"[x, "y"]"#)]);
        assert_eq!(
            classes_of(&obj),
            Some(&vec![ClassPart::Dynamic("x".into()), ClassPart::Static("y".into())])
        );
        assert!(helpers.contains(Helper::Class));
    }

    #[test]
    fn large_numeric_classes_use_exponent_form() {
        let (obj, helpers) = object(&[attr("class", "[1e21, 0.1]")]);
        assert_eq!(
            classes_of(&obj),
            Some(&vec![ClassPart::Static("1e+21".into()), ClassPart::Static("0.1".into())])
        );
        assert!(!helpers.contains(Helper::Class));
    }

    #[test]
    fn empty_classes_are_omitted() {
        let (obj, _) = object(&[attr("class", "[]"), attr("className", "'   '"), attr("class", r#"["", null]"#)]);
        assert!(obj.props.is_empty());
    }

    #[test]
    fn class_keys_collapse_into_trailing_class_name() {
        let (obj, _) = object(&[attr("class", "'a'"), attr("id", "'x'"), attr("className", "active && 'on'")]);
        let keys: Vec<_> = obj.props.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["id", "className"]);
        assert_eq!(
            classes_of(&obj),
            Some(&vec![
                ClassPart::Static("a".into()),
                ClassPart::Dynamic("active && 'on'".into())
            ])
        );
    }

    #[test]
    fn key_rules() {
        let (obj, _) = object(&[
            attr("for", "\"id1\""),
            attr("data-foo", "null"),
            attr("data-bar", "\"bar\""),
            attr("data-baz", "\"null\""),
            attr("aria-hidden", "\"true\""),
            attr("my-custom-attr", "\"v\""),
        ]);
        assert_eq!(
            obj.props,
            vec![
                ("htmlFor".into(), PropValue::Source("\"id1\"".into())),
                ("data-bar".into(), PropValue::Source("\"bar\"".into())),
                ("aria-hidden".into(), PropValue::Source("\"true\"".into())),
                ("myCustomAttr".into(), PropValue::Source("\"v\"".into())),
            ]
        );
    }

    #[test]
    fn boolean_attribute_becomes_true() {
        let mut helpers = HelperSet::default();
        let flag = Attr {
            name: "disabled".into(),
            val: AttrValue::Flag(true),
            must_escape: false,
        };
        let obj = compile_object(&[flag], &mut helpers);
        assert_eq!(obj.props, vec![("disabled".into(), PropValue::Source("true".into()))]);
    }

    #[test]
    fn attribute_blocks_use_merge_helper() {
        let mut helpers = HelperSet::default();
        let expr = normalize(
            &[attr("id", "'a'")],
            &[AttrBlock::Source("props".into()), AttrBlock::Node { val: " extra ".into() }],
            &mut helpers,
        );
        let Some(AttrsExpr::Merge(args)) = expr else {
            panic!("expected merge");
        };
        assert_eq!(args.len(), 3);
        assert!(matches!(&args[0], MergeArg::Object(obj) if obj.props.len() == 1));
        assert_eq!(args[1], MergeArg::Source("props".into()));
        assert_eq!(args[2], MergeArg::Source("extra".into()));
        assert_eq!(helpers.helpers(), &[Helper::Attr, Helper::Class]);
    }

    #[test]
    fn blocks_without_static_attrs() {
        let mut helpers = HelperSet::default();
        let expr = normalize(&[], &[AttrBlock::Source("p".into())], &mut helpers);
        assert_eq!(expr, Some(AttrsExpr::Merge(vec![MergeArg::Source("p".into())])));
    }
}
