//! AWS EMR descriptors.
use crate::{self as sky, attr::Attr, HasDependencies, Resource};

#[derive(HasDependencies, Debug, Clone, PartialEq, serde::Serialize)]
pub struct InstanceGroup {
    /// The EC2 instance type, eg `m5.xlarge`.
    pub instance_type: String,
    pub count: u32,
}

#[derive(HasDependencies, Debug, Clone, PartialEq, serde::Serialize)]
pub struct Cluster {
    /// The EMR release, eg `emr-5.29.0`.
    pub release_label: String,
    /// Names of the applications installed on the cluster.
    pub applications: Vec<String>,
    pub master: InstanceGroup,
    pub core: InstanceGroup,
    /// The subnet the cluster nodes are placed in.
    pub ec2_subnet: Attr<String>,
    /// Additional security group attached to the master node.
    pub security_group: Attr<String>,
    /// The instance profile assumed by cluster nodes.
    pub job_flow_role: Attr<String>,
    /// The role assumed by the EMR service itself.
    pub service_role: Attr<String>,
}

pub struct ClusterAttrs {
    pub id: Attr<String>,
    pub master_public_dns: Attr<String>,
}

impl Resource for Cluster {
    const KIND: &'static str = "AWS::EMR::Cluster";

    type Attrs = ClusterAttrs;

    fn attrs(id: &str) -> Self::Attrs {
        ClusterAttrs {
            id: Attr::new(id, "id"),
            master_public_dns: Attr::new(id, "master_public_dns"),
        }
    }
}
