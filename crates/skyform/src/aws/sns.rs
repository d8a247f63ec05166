//! AWS SNS descriptors.
use crate::{self as sky, attr::Attr, HasDependencies, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Protocol {
    Lambda,
}

impl HasDependencies for Protocol {}

#[derive(HasDependencies, Debug, Clone, PartialEq, serde::Serialize)]
pub struct Subscription {
    pub protocol: Protocol,
    pub endpoint: Attr<String>,
}

impl Subscription {
    /// Subscribe a lambda function by its ARN.
    pub fn lambda(function_arn: Attr<String>) -> Self {
        Subscription {
            protocol: Protocol::Lambda,
            endpoint: function_arn,
        }
    }
}

#[derive(HasDependencies, Debug, Default, Clone, PartialEq, serde::Serialize)]
pub struct Topic {
    pub subscriptions: Vec<Subscription>,
}

pub struct TopicAttrs {
    /// The engine-generated topic name.
    pub name: Attr<String>,
    pub arn: Attr<String>,
}

impl Resource for Topic {
    const KIND: &'static str = "AWS::SNS::Topic";

    type Attrs = TopicAttrs;

    fn attrs(id: &str) -> Self::Attrs {
        TopicAttrs {
            name: Attr::new(id, "name"),
            arn: Attr::new(id, "arn"),
        }
    }
}
