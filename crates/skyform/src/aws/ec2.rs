//! AWS EC2 networking descriptors.
use crate::{self as sky, attr::Attr, HasDependencies, Resource};

/// The well-known remote desktop port.
pub const RDP_PORT: u16 = 3389;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubnetType {
    Public,
    Private,
}

impl HasDependencies for SubnetType {}

#[derive(HasDependencies, Debug, Clone, PartialEq, serde::Serialize)]
pub struct SubnetSpec {
    pub name: String,
    pub subnet_type: SubnetType,
}

#[derive(HasDependencies, Debug, Clone, PartialEq, serde::Serialize)]
pub struct Vpc {
    /// The address space, eg `10.0.0.0/16`.
    pub cidr: String,
    pub subnets: Vec<SubnetSpec>,
}

pub struct VpcAttrs {
    pub id: Attr<String>,
    /// The id of the first public subnet.
    pub public_subnet: Attr<String>,
}

impl Resource for Vpc {
    const KIND: &'static str = "AWS::EC2::VPC";

    type Attrs = VpcAttrs;

    fn attrs(id: &str) -> Self::Attrs {
        VpcAttrs {
            id: Attr::new(id, "id"),
            public_subnet: Attr::new(id, "public_subnet"),
        }
    }
}

/// Who an ingress rule admits.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Peer {
    /// Any IPv4 address.
    AnyIpv4,
    /// Members of the security group itself.
    Own,
    /// A specific address block.
    Cidr(String),
}

impl HasDependencies for Peer {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Port {
    /// A single TCP port.
    Tcp(u16),
    /// Every port of every protocol.
    AllTraffic,
}

impl HasDependencies for Port {}

#[derive(HasDependencies, Debug, Clone, PartialEq, serde::Serialize)]
pub struct IngressRule {
    pub peer: Peer,
    pub port: Port,
}

impl IngressRule {
    pub fn new(peer: Peer, port: Port) -> Self {
        IngressRule { peer, port }
    }
}

#[derive(HasDependencies, Debug, Clone, PartialEq, serde::Serialize)]
pub struct SecurityGroup {
    pub vpc: Attr<String>,
    pub description: String,
    pub ingress: Vec<IngressRule>,
}

pub struct SecurityGroupAttrs {
    pub id: Attr<String>,
}

impl Resource for SecurityGroup {
    const KIND: &'static str = "AWS::EC2::SecurityGroup";

    type Attrs = SecurityGroupAttrs;

    fn attrs(id: &str) -> Self::Attrs {
        SecurityGroupAttrs {
            id: Attr::new(id, "id"),
        }
    }
}
