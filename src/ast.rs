use anyhow::{Context, Result};
use serde::Deserialize;

/// 模板解析器输出的节点，按 `type` 字段区分种类
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    Block(Block),
    Tag(Tag),
    Text(Text),
    Literal(Literal),
    Code(Code),
    Conditional(Conditional),
    While(While),
    Each(Each),
    Comment(Comment),
    BlockComment(BlockComment),
    MixinBlock(Marker),

    // 以下种类在解析阶段合法，但代码生成阶段一律拒绝
    Case(Rejected),
    When(Rejected),
    Doctype(Rejected),
    Mixin(Rejected),
    Filter(Rejected),
}

/// 节点在模板源文件中的位置
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub line: Option<usize>,
    #[serde(default)]
    pub column: Option<usize>,
    #[serde(default)]
    pub filename: Option<String>,
}

/// 有序的子节点序列
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(flatten)]
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub attrs: Vec<Attr>,
    #[serde(default)]
    pub attribute_blocks: Vec<AttrBlock>,
    #[serde(default)]
    pub code: Option<Box<Code>>,
    #[serde(default)]
    pub block: Block,
    #[serde(flatten)]
    pub loc: Location,
}

/// 单个静态属性，`val` 为表达式源码
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attr {
    pub name: String,
    pub val: AttrValue,
    #[serde(default)]
    pub must_escape: bool,
}

/// 属性值：表达式源码，或布尔属性（如 `disabled`）的 `true`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Source(String),
    Flag(bool),
}

impl AttrValue {
    pub fn source(&self) -> String {
        match self {
            AttrValue::Source(src) => src.clone(),
            AttrValue::Flag(flag) => flag.to_string(),
        }
    }
}

/// `&attributes(...)` 动态属性块
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AttrBlock {
    Source(String),
    Node { val: String },
}

impl AttrBlock {
    pub fn source(&self) -> &str {
        match self {
            AttrBlock::Source(src) => src,
            AttrBlock::Node { val } => val,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Text {
    #[serde(default)]
    pub val: String,
    #[serde(flatten)]
    pub loc: Location,
}

/// 不做插值的原样文本，如 `|` 之后的 HTML 片段
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Literal {
    #[serde(rename = "str", default)]
    pub text: String,
    #[serde(flatten)]
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Code {
    pub val: String,
    /// 是否产生输出
    #[serde(default)]
    pub buffer: bool,
    /// 输出时是否转义
    #[serde(default, alias = "escape")]
    pub must_escape: bool,
    #[serde(default)]
    pub block: Option<Block>,
    #[serde(flatten)]
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Conditional {
    pub test: String,
    #[serde(default)]
    pub consequent: Block,
    #[serde(default)]
    pub alternate: Option<Alternate>,
    #[serde(flatten)]
    pub loc: Location,
}

/// else 分支：要么是下一个 Conditional（else if），要么是普通块
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum Alternate {
    Conditional(Box<Conditional>),
    Block(Block),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct While {
    pub test: String,
    #[serde(default)]
    pub block: Block,
    #[serde(flatten)]
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Each {
    pub obj: String,
    pub val: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub block: Block,
    #[serde(default, alias = "alternative")]
    pub alternate: Option<Block>,
    #[serde(flatten)]
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Comment {
    #[serde(default)]
    pub val: String,
    /// 可见注释（`//`）为 true，静默注释（`//-`）为 false
    #[serde(default)]
    pub buffer: bool,
    #[serde(flatten)]
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BlockComment {
    #[serde(default)]
    pub val: String,
    #[serde(default)]
    pub buffer: bool,
    #[serde(default)]
    pub block: Block,
    #[serde(flatten)]
    pub loc: Location,
}

/// 不携带内容的节点（mixin 的 `block` 关键字）
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Marker {
    #[serde(flatten)]
    pub loc: Location,
}

/// 被拒绝的节点只保留位置信息，其余字段忽略
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Rejected {
    #[serde(flatten)]
    pub loc: Location,
}

impl Node {
    /// 节点种类名，与输入中的 `type` 一致
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Block(_) => "Block",
            Node::Tag(_) => "Tag",
            Node::Text(_) => "Text",
            Node::Literal(_) => "Literal",
            Node::Code(_) => "Code",
            Node::Conditional(_) => "Conditional",
            Node::While(_) => "While",
            Node::Each(_) => "Each",
            Node::Comment(_) => "Comment",
            Node::BlockComment(_) => "BlockComment",
            Node::MixinBlock(_) => "MixinBlock",
            Node::Case(_) => "Case",
            Node::When(_) => "When",
            Node::Doctype(_) => "Doctype",
            Node::Mixin(_) => "Mixin",
            Node::Filter(_) => "Filter",
        }
    }
}

/// 从解析器输出的 JSON 读取节点树
pub fn parse(json: &str) -> Result<Node> {
    serde_json::from_str(json).context("解析模板节点树失败")
}
