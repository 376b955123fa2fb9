pub mod attrs;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod interpolate;
pub mod literal;
pub mod scan;

pub use error::CodegenError;
pub use generator::{Generated, Generator};

use crate::ast::Node;
use crate::config::CodegenConfig;

/// 以新的 Generator 实例编译节点树
pub fn generate(root: &Node, config: &CodegenConfig) -> Result<Generated, CodegenError> {
    Generator::new(config.runtime.clone()).generate(root)
}
