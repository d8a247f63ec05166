//! AWS S3 Bucket descriptors.
use crate::{self as sky, attr::Attr, HasDependencies, Resource};

/// What the deployment engine should do with a bucket when it leaves
/// the template.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Keep the bucket and its contents.
    #[default]
    Retain,
    /// Delete the bucket.
    Destroy,
}

impl HasDependencies for RemovalPolicy {}

#[derive(HasDependencies, Debug, Default, Clone, PartialEq, serde::Serialize)]
pub struct Bucket {
    /// Whether object versioning is enabled.
    pub versioned: bool,
    pub removal_policy: RemovalPolicy,
}

pub struct BucketAttrs {
    /// The engine-generated bucket name.
    pub name: Attr<String>,
    pub arn: Attr<String>,
}

impl Resource for Bucket {
    const KIND: &'static str = "AWS::S3::Bucket";

    type Attrs = BucketAttrs;

    fn attrs(id: &str) -> Self::Attrs {
        BucketAttrs {
            name: Attr::new(id, "name"),
            arn: Attr::new(id, "arn"),
        }
    }
}
