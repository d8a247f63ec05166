//! AWS IAM descriptors.
use crate::{
    self as sky,
    attr::{Attr, Expr, Pseudo},
    HasDependencies, Resource,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    #[default]
    Allow,
    Deny,
}

impl HasDependencies for Effect {}

/// One statement of an identity policy.
#[derive(HasDependencies, Debug, Clone, PartialEq, serde::Serialize)]
pub struct PolicyStatement {
    pub effect: Effect,
    pub actions: Vec<String>,
    pub resources: Vec<Expr>,
}

impl PolicyStatement {
    /// An allow statement over the given actions and resources.
    pub fn allow<A>(actions: A, resources: impl IntoIterator<Item = Expr>) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
    {
        PolicyStatement {
            effect: Effect::Allow,
            actions: actions.into_iter().map(Into::into).collect(),
            resources: resources.into_iter().collect(),
        }
    }
}

/// The ARN of an AWS managed policy, eg
/// `aws_managed_policy("service-role/AmazonElasticMapReduceRole")`.
pub fn aws_managed_policy(name: &str) -> Expr {
    Expr::new()
        .lit("arn:")
        .pseudo(Pseudo::Partition)
        .lit(":iam::aws:policy/")
        .lit(name)
}

#[derive(HasDependencies, Debug, Clone, PartialEq, serde::Serialize)]
pub struct Role {
    /// The service principal allowed to assume this role, eg
    /// `lambda.amazonaws.com`.
    pub assumed_by: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub managed_policies: Vec<Expr>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub statements: Vec<PolicyStatement>,
}

pub struct RoleAttrs {
    pub name: Attr<String>,
    pub arn: Attr<String>,
}

impl Resource for Role {
    const KIND: &'static str = "AWS::IAM::Role";

    type Attrs = RoleAttrs;

    fn attrs(id: &str) -> Self::Attrs {
        RoleAttrs {
            name: Attr::new(id, "name"),
            arn: Attr::new(id, "arn"),
        }
    }
}

/// Wraps roles for services that attach them at the instance level,
/// such as EMR cluster nodes.
#[derive(HasDependencies, Debug, Clone, PartialEq, serde::Serialize)]
pub struct InstanceProfile {
    pub roles: Vec<Attr<String>>,
}

pub struct InstanceProfileAttrs {
    pub name: Attr<String>,
    pub arn: Attr<String>,
}

impl Resource for InstanceProfile {
    const KIND: &'static str = "AWS::IAM::InstanceProfile";

    type Attrs = InstanceProfileAttrs;

    fn attrs(id: &str) -> Self::Attrs {
        InstanceProfileAttrs {
            name: Attr::new(id, "name"),
            arn: Attr::new(id, "arn"),
        }
    }
}
