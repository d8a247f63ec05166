//! The streaming-analytics workshop declarations.

use std::collections::BTreeMap;

use sky::{
    attr::{Expr, Pseudo},
    aws::{ec2, emr, iam, lambda, s3, sns},
    Stack,
};

use crate::{
    config::WorkshopConfig,
    helpers::{DevEnvironment, EmptyBucketOnDelete, GithubBuildPipeline},
};

/// Release archive of the Beam consumer the build pipeline fetches.
fn consumer_archive_url(version: &str) -> String {
    format!(
        "https://github.com/aws-samples/amazon-kinesis-analytics-beam-taxi-consumer\
         /archive/release-{version}.zip"
    )
}

/// Path of the bundled consumer jar inside the build output, relative to
/// the bucket root.
fn consumer_jar_path(config: &WorkshopConfig) -> String {
    format!(
        "amazon-kinesis-analytics-beam-taxi-consumer-release-{version}/target/{jar}",
        version = config.beam_application_version,
        jar = config.beam_application_jar_file,
    )
}

/// The ARN of the Kinesis Data Analytics application the termination
/// lambda is allowed to stop.
fn application_arn(application_name: &str) -> Expr {
    Expr::new()
        .lit("arn:")
        .pseudo(Pseudo::Partition)
        .lit(":kinesisanalytics:")
        .pseudo(Pseudo::Region)
        .lit(":")
        .pseudo(Pseudo::AccountId)
        .lit(":application/")
        .lit(application_name)
}

/// Declares the whole workshop onto a fresh stack.
pub fn declare_workshop(stack_name: &str, config: &WorkshopConfig) -> Result<Stack, sky::Error> {
    log::info!("declaring workshop stack '{stack_name}'");
    let mut stack = Stack::new(stack_name);

    let bucket = stack.resource(
        "bucket",
        s3::Bucket {
            versioned: true,
            removal_policy: s3::RemovalPolicy::Destroy,
        },
    )?;
    stack.resource(
        "empty-bucket",
        EmptyBucketOnDelete {
            bucket: bucket.name.clone(),
        },
    )?;

    let vpc = stack.resource(
        "vpc",
        ec2::Vpc {
            cidr: "10.0.0.0/16".to_owned(),
            subnets: vec![ec2::SubnetSpec {
                name: "public".to_owned(),
                subnet_type: ec2::SubnetType::Public,
            }],
        },
    )?;

    // The workshop is deliberately loose here so attendees can remote in
    // from anywhere and the instances can talk to each other freely.
    let security_group = stack.resource(
        "security-group",
        ec2::SecurityGroup {
            vpc: vpc.id.clone(),
            description: "Workshop dev environment access".to_owned(),
            ingress: vec![
                ec2::IngressRule::new(ec2::Peer::AnyIpv4, ec2::Port::Tcp(ec2::RDP_PORT)),
                ec2::IngressRule::new(ec2::Peer::Own, ec2::Port::AllTraffic),
            ],
        },
    )?;

    stack.resource(
        "dev-environment",
        DevEnvironment {
            vpc: vpc.id.clone(),
            subnet: vpc.public_subnet.clone(),
            security_group: security_group.id.clone(),
            bucket: bucket.name.clone(),
            kinesis_replay_version: config.kinesis_replay_version.clone(),
        },
    )?;

    stack.resource(
        "beam-build-pipeline",
        GithubBuildPipeline {
            url: consumer_archive_url(&config.beam_application_version),
            bucket: bucket.name.clone(),
            extract: true,
        },
    )?;

    let enrich = stack.resource(
        "enrich-events",
        lambda::Function {
            runtime: lambda::Runtime::Nodejs12X,
            handler: "index.handler".to_owned(),
            code: lambda::Code::from_file(&config.enrich_lambda_source)?,
            timeout_secs: 60,
            memory_size: None,
            environment: BTreeMap::new(),
            statements: vec![],
        },
    )?;

    let stop = stack.resource(
        "stop-application",
        lambda::Function {
            runtime: lambda::Runtime::Python37,
            handler: "index.handler".to_owned(),
            code: lambda::Code::from_file(&config.stop_lambda_source)?,
            timeout_secs: 900,
            memory_size: None,
            environment: BTreeMap::from([(
                "application_name".to_owned(),
                config.application_name.clone(),
            )]),
            statements: vec![iam::PolicyStatement::allow(
                ["kinesisanalytics:StopApplication"],
                [application_arn(&config.application_name)],
            )],
        },
    )?;

    let topic = stack.resource(
        "application-terminated",
        sns::Topic {
            subscriptions: vec![sns::Subscription::lambda(stop.arn.clone())],
        },
    )?;

    // Kinesis Data Analytics reads the consumer jar and the trip events
    // out of the bucket.
    stack.resource(
        "kda-role",
        iam::Role {
            assumed_by: "kinesisanalytics.amazonaws.com".to_owned(),
            managed_policies: vec![],
            statements: vec![iam::PolicyStatement::allow(
                ["s3:GetObject", "s3:GetBucketLocation", "s3:ListBucket"],
                [
                    Expr::from(&bucket.arn),
                    Expr::new().attr(&bucket.arn).lit("/*"),
                ],
            )],
        },
    )?;

    let emr_role = stack.resource(
        "emr-role",
        iam::Role {
            assumed_by: "elasticmapreduce.amazonaws.com".to_owned(),
            managed_policies: vec![
                iam::aws_managed_policy("service-role/AmazonElasticMapReduceRole"),
                iam::aws_managed_policy("service-role/AmazonElasticMapReduceforEC2Role"),
            ],
            statements: vec![],
        },
    )?;
    let emr_profile = stack.resource(
        "emr-profile",
        iam::InstanceProfile {
            roles: vec![emr_role.name.clone()],
        },
    )?;

    stack.resource(
        "emr-cluster",
        emr::Cluster {
            release_label: "emr-5.29.0".to_owned(),
            applications: vec!["Flink".to_owned(), "Ganglia".to_owned()],
            master: emr::InstanceGroup {
                instance_type: "m5.xlarge".to_owned(),
                count: 1,
            },
            core: emr::InstanceGroup {
                instance_type: "r5.xlarge".to_owned(),
                count: 2,
            },
            ec2_subnet: vpc.public_subnet.clone(),
            security_group: security_group.id.clone(),
            job_flow_role: emr_profile.name.clone(),
            service_role: emr_role.name.clone(),
        },
    )?;

    stack.output("S3Bucket", &bucket.name)?;
    stack.output(
        "InputS3Pattern",
        Expr::new()
            .lit("s3://")
            .attr(&bucket.name)
            .lit("/historic-trip-events/*/*/*/*/*"),
    )?;
    stack.output("BeamConsumerJarPath", consumer_jar_path(config))?;
    stack.output("EnrichEventsLambda", &enrich.name)?;
    stack.output("ApplicationTerminatedTopic", &topic.name)?;

    Ok(stack)
}
