//! AWS Lambda descriptors.
use std::collections::BTreeMap;

use snafu::prelude::*;

use crate::{
    self as sky, attr::Attr, aws::iam::PolicyStatement, utils, EmbedReadSnafu, Error,
    HasDependencies, Resource,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Runtime {
    #[serde(rename = "nodejs12.x")]
    Nodejs12X,
    #[serde(rename = "python3.7")]
    Python37,
}

impl HasDependencies for Runtime {}

/// Function source embedded into the template.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Code {
    /// The source, verbatim.
    pub inline: String,
    /// Hex encoded sha256 of the source, so the deployment engine can
    /// detect source changes cheaply.
    pub source_hash: String,
}

impl HasDependencies for Code {}

impl Code {
    /// Embeds the source file at the given path.
    ///
    /// The file must exist at synthesis time. A stack whose function
    /// sources cannot be read must not synthesize.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        log::debug!("embedding function source {path:?}");
        let source = std::fs::read_to_string(path).context(EmbedReadSnafu {
            path: path.to_path_buf(),
        })?;
        Ok(Self::from_inline(source))
    }

    /// Embeds the given source verbatim.
    pub fn from_inline(source: impl Into<String>) -> Self {
        let inline = source.into();
        let source_hash = utils::sha256_hex(&inline);
        Code {
            inline,
            source_hash,
        }
    }
}

#[derive(HasDependencies, Debug, Clone, PartialEq, serde::Serialize)]
pub struct Function {
    pub runtime: Runtime,
    /// Handler entrypoint, eg `index.handler`.
    pub handler: String,
    pub code: Code,
    /// Execution timeout in seconds.
    pub timeout_secs: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_size: Option<u32>,
    /// Environment variables passed to the function.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
    /// Statements appended to the function's execution role.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub statements: Vec<PolicyStatement>,
}

pub struct FunctionAttrs {
    /// The engine-generated function name.
    pub name: Attr<String>,
    pub arn: Attr<String>,
}

impl Resource for Function {
    const KIND: &'static str = "AWS::Lambda::Function";

    type Attrs = FunctionAttrs;

    fn attrs(id: &str) -> Self::Attrs {
        FunctionAttrs {
            name: Attr::new(id, "name"),
            arn: Attr::new(id, "arn"),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn code_from_missing_file_is_fatal() {
        let result = Code::from_file("/definitely/not/a/real/source.js");
        assert!(matches!(result, Err(Error::EmbedRead { .. })));
    }

    #[test]
    fn code_hash_tracks_source() {
        let a = Code::from_inline("exports.handler = async () => {};");
        let b = Code::from_inline("exports.handler = async () => { return 1; };");
        assert_ne!(a.source_hash, b.source_hash);
        assert_eq!(a.source_hash, Code::from_inline(a.inline.clone()).source_hash);
    }
}
