//! Skyform descriptors for AWS.
pub mod ec2;
pub mod emr;
pub mod iam;
pub mod lambda;
pub mod s3;
pub mod sns;
