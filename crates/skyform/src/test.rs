use pretty_assertions::assert_eq;

use crate::{self as sky, attr::Attr, aws::s3, *};

/// A stand-in for the kind of helper resources downstream stacks define
/// themselves and register with their deployment engine.
#[derive(HasDependencies, Clone, Debug, PartialEq, serde::Serialize)]
struct Uploader {
    bucket: Attr<String>,
    payload: String,
}

impl Resource for Uploader {
    const KIND: &'static str = "Test::Uploader";

    type Attrs = ();

    fn attrs(_: &str) -> Self::Attrs {}
}

fn declare_bucket_and_uploaders(stack: &mut Stack) {
    let bucket = stack
        .resource(
            "bucket",
            s3::Bucket {
                versioned: true,
                removal_policy: s3::RemovalPolicy::Destroy,
            },
        )
        .unwrap();
    let _uploader_a = stack
        .resource(
            "uploader-a",
            Uploader {
                bucket: bucket.name.clone(),
                payload: "alpha".to_owned(),
            },
        )
        .unwrap();
    let _uploader_b = stack
        .resource(
            "uploader-b",
            Uploader {
                bucket: bucket.name.clone(),
                payload: "beta".to_owned(),
            },
        )
        .unwrap();
    stack
        .output(
            "BucketPath",
            attr::Expr::new().lit("s3://").attr(&bucket.name).lit("/data"),
        )
        .unwrap();
}

#[test]
fn synthesis_orders_dependents_after_references() {
    let _ = env_logger::builder().try_init();

    let mut stack = Stack::new("test");
    declare_bucket_and_uploaders(&mut stack);
    let synthesis = stack.synthesize().unwrap();

    assert_eq!(
        2,
        synthesis.order().len(),
        "declarations should be scheduled into 2 steps: \
        the bucket in one and both uploaders in another"
    );
    assert_eq!(vec!["bucket".to_string()], synthesis.order()[0]);
    assert_eq!(
        vec!["uploader-a".to_string(), "uploader-b".to_string()],
        synthesis.order()[1]
    );

    let uploader = &synthesis.template.resources["uploader-a"];
    assert_eq!("Test::Uploader", &uploader.kind);
    assert_eq!(vec!["bucket".to_string()], uploader.depends_on);
    assert_eq!(
        serde_json::json!("${bucket.name}"),
        uploader.properties["bucket"]
    );
}

#[test]
fn outputs_render_attr_tokens() {
    let _ = env_logger::builder().try_init();

    let mut stack = Stack::new("test");
    declare_bucket_and_uploaders(&mut stack);
    let synthesis = stack.synthesize().unwrap();
    assert_eq!(
        "s3://${bucket.name}/data",
        synthesis.template.outputs["BucketPath"]
    );
}

#[test]
fn declarations_expose_their_ids_and_tokens() {
    let _ = env_logger::builder().try_init();

    let mut stack = Stack::new("test");
    assert_eq!("test", stack.name());

    let bucket = stack.resource("bucket", s3::Bucket::default()).unwrap();
    assert_eq!("bucket", bucket.logical_id());
    assert_eq!("bucket", bucket.name.resource_id());
    assert_eq!("${bucket.name}", &bucket.name.token());

    // Handles are minted for every attribute a kind exposes, whether or
    // not this stack wires them anywhere.
    let cluster = aws::emr::Cluster::attrs("cluster");
    assert_eq!("${cluster.id}", &cluster.id.token());
    assert_eq!(
        "${cluster.master_public_dns}",
        &cluster.master_public_dns.token()
    );
}

#[test]
fn duplicate_declaration_errs() {
    let _ = env_logger::builder().try_init();

    let mut stack = Stack::new("test");
    stack.resource("bucket", s3::Bucket::default()).unwrap();
    let result = stack.resource("bucket", s3::Bucket::default());
    assert!(matches!(result, Err(Error::DuplicateResource { .. })));
}

#[test]
fn duplicate_output_errs() {
    let _ = env_logger::builder().try_init();

    let mut stack = Stack::new("test");
    stack.output("Name", "first").unwrap();
    let result = stack.output("Name", "second");
    assert!(matches!(result, Err(Error::DuplicateOutput { .. })));
}

#[test]
fn foreign_attr_errs() {
    let _ = env_logger::builder().try_init();

    let mut stack_a = Stack::new("a");
    let bucket = stack_a.resource("bucket", s3::Bucket::default()).unwrap();

    // `bucket` was declared on `stack_a`, so referencing it from
    // `stack_b` must fail rather than produce a dangling edge.
    let mut stack_b = Stack::new("b");
    let result = stack_b.resource(
        "uploader",
        Uploader {
            bucket: bucket.name.clone(),
            payload: "gamma".to_owned(),
        },
    );
    assert!(matches!(result, Err(Error::MissingResource { .. })));

    let result = stack_b.output("BucketName", &bucket.name);
    assert!(matches!(result, Err(Error::MissingResource { .. })));
}

#[test]
fn synthesis_is_deterministic() {
    let _ = env_logger::builder().try_init();

    let synthesize = || {
        let mut stack = Stack::new("test");
        declare_bucket_and_uploaders(&mut stack);
        stack.synthesize().unwrap()
    };
    let here = synthesize();
    let there = synthesize();
    assert_eq!(
        serde_json::to_value(&here.template).unwrap(),
        serde_json::to_value(&there.template).unwrap()
    );
    assert_eq!(here.order(), there.order());
}

#[test]
fn synthesis_display_lists_steps() {
    let _ = env_logger::builder().try_init();

    let mut stack = Stack::new("test");
    declare_bucket_and_uploaders(&mut stack);
    let synthesis = stack.synthesize().unwrap();
    let display = synthesis.to_string();
    assert_eq!(
        "--- step 1\n  bucket\n---\n--- step 2\n  uploader-a\n  uploader-b\n---\n",
        &display
    );

    let empty = Stack::new("empty").synthesize().unwrap();
    assert_eq!("--- No resources.\n", &empty.to_string());
}

#[test]
fn write_template_and_graph() {
    let _ = env_logger::builder().try_init();

    let dir = std::env::temp_dir().join("skyform-test-write");
    if dir.exists() {
        std::fs::remove_dir_all(&dir).unwrap();
    }
    std::fs::create_dir_all(&dir).unwrap();

    let mut stack = Stack::new("test");
    declare_bucket_and_uploaders(&mut stack);

    let dot_path = dir.join("stack.dot");
    stack.save_graph_dot(&dot_path).unwrap();
    assert!(dot_path.exists());

    let synthesis = stack.synthesize().unwrap();
    let template_path = dir.join("template.json");
    synthesis.write_template(&template_path).unwrap();

    let contents = std::fs::read_to_string(&template_path).unwrap();
    let read_back: Template = serde_json::from_str(&contents).unwrap();
    assert_eq!(synthesis.template, read_back);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn cycle_errs_at_synthesis() {
    let _ = env_logger::builder().try_init();

    // Stacks cannot express a forward reference, so a cycle requires
    // smuggling in an attr of a resource declared later under the same
    // id as one declared earlier. The registry refuses the redeclaration
    // long before scheduling could trip on it.
    let mut stack = Stack::new("test");
    let bucket = stack.resource("bucket", s3::Bucket::default()).unwrap();
    stack
        .resource(
            "uploader",
            Uploader {
                bucket: bucket.name.clone(),
                payload: "delta".to_owned(),
            },
        )
        .unwrap();
    let result = stack.resource("bucket", s3::Bucket::default());
    assert!(matches!(result, Err(Error::DuplicateResource { .. })));

    let synthesis = stack.synthesize().unwrap();
    assert_eq!(2, synthesis.order().len());
}
