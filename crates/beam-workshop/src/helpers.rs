//! Workshop-specific helper resources.
//!
//! These synthesize as `Custom::*` nodes. The deployment engine is
//! expected to have a collaborator registered for each kind. From the
//! stack's point of view they are ordinary descriptors with ordinary
//! dependency edges.

use sky::{attr::Attr, HasDependencies, Resource};

/// Empties the bucket before the engine deletes it, since a bucket with
/// contents cannot be deleted.
#[derive(HasDependencies, Debug, Clone, PartialEq, serde::Serialize)]
pub struct EmptyBucketOnDelete {
    pub bucket: Attr<String>,
}

impl Resource for EmptyBucketOnDelete {
    const KIND: &'static str = "Custom::EmptyBucketOnDelete";

    type Attrs = ();

    fn attrs(_: &str) -> Self::Attrs {}
}

/// Fetches a source archive from Github, builds it and drops the build
/// output into the bucket.
#[derive(HasDependencies, Debug, Clone, PartialEq, serde::Serialize)]
pub struct GithubBuildPipeline {
    /// Url of the source archive.
    pub url: String,
    /// Bucket receiving the build output.
    pub bucket: Attr<String>,
    /// Whether the archive is extracted before building.
    pub extract: bool,
}

impl Resource for GithubBuildPipeline {
    const KIND: &'static str = "Custom::GithubBuildPipeline";

    type Attrs = ();

    fn attrs(_: &str) -> Self::Attrs {}
}

/// The windows dev environment workshop attendees remote into.
#[derive(HasDependencies, Debug, Clone, PartialEq, serde::Serialize)]
pub struct DevEnvironment {
    pub vpc: Attr<String>,
    pub subnet: Attr<String>,
    pub security_group: Attr<String>,
    /// Bucket holding the trip events the replay tool reads.
    pub bucket: Attr<String>,
    /// Release of the kinesis replay tool installed on the instance.
    pub kinesis_replay_version: String,
}

impl Resource for DevEnvironment {
    const KIND: &'static str = "Custom::DevEnvironment";

    type Attrs = ();

    fn attrs(_: &str) -> Self::Attrs {}
}
