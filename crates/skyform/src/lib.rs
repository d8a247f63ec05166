//! # Skyform
//!
//! Skyform is a library for declaring cloud infrastructure as Rust code.
//! It describes infrastructure as a Directed Acyclic Graph (DAG) of typed
//! resource descriptors, but unlike tools that talk to platform APIs
//! directly, Skyform's job ends at synthesis. Declarations are pure
//! descriptions, and synthesizing them produces a deterministic template
//! along with a batched creation order. Deploying the template is the job
//! of a separate deployment engine, which keeps the declaration side free
//! of credentials, network calls and partial state.
//!
//! ## Key Features
//!
//! - **Typed declarations**: Define resources directly through Rust code,
//!   with attribute references checked at compile time.
//! - **Dependency Tracking**: Automatically track dependencies between
//!   resources to ensure correct order of operations.
//! - **Deterministic Synthesis**: The same declarations always produce the
//!   same template, making synthesis output diffable and reviewable.
//!
//! ## Usage
//!
//! Skyform is typically used by developers to write custom infrastructure
//! command line programs executed at a developer workstation.
//!
//! These programs are meant to be fluid, changing as often as the
//! infrastructure, with changes committed and tracked with version control.
//!
//! ### Concepts
//!
//! Skyform operates on the split between descriptors and attributes:
//!
//! - **Descriptor**: The desired configuration of a resource as defined in
//!   your Rust code. Descriptors are plain data and never touch a platform
//!   API.
//! - **Attribute**: A value the deployment engine determines when it
//!   creates the resource (a generated name, an ARN, an id). Locally an
//!   attribute is a symbolic `${id.attribute}` token, and referencing one
//!   records a dependency edge in the graph.
//!
//! Declaring resources on a [`Stack`] accumulates graph nodes. Calling
//! [`Stack::synthesize`] schedules the graph and emits a [`Synthesis`]
//! holding the [`Template`] and the creation order.
//!
//! An example usage can be found in `crates/skyform/src/test.rs`,
//! demonstrating how to define and synthesize resources using the
//! library's primitives.
//!
//! ## Error Handling
//!
//! Skyform exposes a comprehensive error enum [`Error`], which encompasses
//! all possible errors that may occur during operations. Functions that can
//! result in errors return a `Result` type with this [`Error`], ensuring
//! robust error handling throughout the library.

use std::{collections::BTreeMap, ops::Deref};

use dagga::dot::DagLegend;
use snafu::prelude::*;

pub use skyform_derive::HasDependencies;

pub mod attr;
pub mod aws;
mod has_dependencies_impl;
#[cfg(test)]
mod test;
pub mod utils;

use attr::{Expr, Registry};

/// Top-level error enum that encompasses all errors.
#[derive(snafu::Snafu, Debug)]
pub enum Error {
    #[snafu(display("Resource '{id}' has already been declared"))]
    DuplicateResource { id: String },

    #[snafu(display("Output '{name}' has already been declared"))]
    DuplicateOutput { name: String },

    #[snafu(display("Could not find a resource by the name '{name}'"))]
    MissingResource { name: String },

    #[snafu(display("Could not serialize '{name}': {source}"))]
    Serialize {
        name: String,
        source: serde_json::Error,
    },

    #[snafu(display("Could not build schedule: {msg}"))]
    Schedule { msg: String },

    #[snafu(display("Could not read source file {path:?} for embedding: {source}"))]
    EmbedRead {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Could not create file {path:?}: {source}"))]
    CreateFile {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Could not write file {path:?}: {source}"))]
    WriteFile {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Could not save the resource graph: {source}"))]
    Dot { source: dagga::dot::DotError },

    #[snafu(display(
        "Could not render the resource graph because of a missing resource name for '{missing}'"
    ))]
    MissingName { missing: usize },
}

impl From<dagga::dot::DotError> for Error {
    fn from(source: dagga::dot::DotError) -> Self {
        Self::Dot { source }
    }
}

type Result<T, E = Error> = core::result::Result<T, E>;

/// Infrastructure resource descriptors.
///
/// Represents the desired configuration of a resource on a platform
/// (ie AWS, Digital Ocean, etc). Descriptors are pure data, so declaring
/// one never touches a platform API. The deployment engine receiving the
/// synthesized [`Template`] dispatches on [`Resource::KIND`] to decide
/// what to do with each node.
pub trait Resource:
    core::fmt::Debug + Clone + PartialEq + HasDependencies + serde::Serialize + 'static
{
    /// The kind tag the deployment engine dispatches on.
    ///
    /// For example `"AWS::S3::Bucket"`, or `"Custom::..."` for resources
    /// handled by a collaborator registered with the engine.
    const KIND: &'static str;

    /// The attributes this resource exposes to other declarations.
    ///
    /// Attribute values only exist engine-side. Locally each one is a
    /// symbolic [`attr::Attr`] token, so this type is pure plumbing and
    /// carries no data beyond the resource id.
    type Attrs;

    /// Mints the attribute handles for a declaration with the given id.
    fn attrs(id: &str) -> Self::Attrs;
}

#[derive(Clone, Default, Debug)]
pub struct Dependencies {
    /// Specifies a dependency on a `Resource`.
    inner: Vec<String>,
}

impl IntoIterator for Dependencies {
    type Item = String;

    type IntoIter = <Vec<String> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl core::fmt::Display for Dependencies {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(
            &self
                .inner
                .iter()
                .map(|u| u.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

impl Dependencies {
    pub fn merge(self, other: Self) -> Self {
        Dependencies {
            inner: [self.inner, other.inner].concat(),
        }
    }
}

/// Tracks dependencies between resources.
///
/// This trait can be derived, and has a default implementation that
/// reports zero dependencies.
pub trait HasDependencies {
    fn dependencies(&self) -> Dependencies {
        Dependencies::default()
    }
}

/// A resource that has been declared on a [`Stack`].
///
/// Derefs to the resource's attribute handles, so fields of
/// [`Resource::Attrs`] are reachable directly, eg `bucket.name`.
pub struct Declared<T: Resource> {
    logical_id: String,
    attrs: T::Attrs,
}

impl<T: Resource> Deref for Declared<T> {
    type Target = T::Attrs;

    fn deref(&self) -> &Self::Target {
        &self.attrs
    }
}

impl<T: Resource> Declared<T> {
    /// The logical id this resource was declared under.
    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }
}

/// Graph payload for one declared resource.
struct SynthNode {
    id: String,
    kind: &'static str,
    depends_on: Vec<String>,
    properties: serde_json::Value,
}

/// One resource entry in a synthesized [`Template`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TemplateResource {
    /// The kind tag, from [`Resource::KIND`].
    pub kind: String,
    /// Logical ids of the resources this one references, sorted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    /// The serialized descriptor, with attribute references rendered as
    /// `${id.attribute}` tokens.
    pub properties: serde_json::Value,
}

/// The synthesis artifact handed to the deployment engine.
///
/// Maps are ordered so that serializing the same declarations always
/// produces the same bytes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Template {
    /// Name of the stack this template was synthesized from.
    pub stack: String,
    /// All declared resources by logical id.
    pub resources: BTreeMap<String, TemplateResource>,
    /// Published values by output name, rendered.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, String>,
}

/// The result of [`Stack::synthesize`].
pub struct Synthesis {
    /// The synthesized template.
    pub template: Template,
    /// Logical ids batched into creation steps.
    order: Vec<Vec<String>>,
}

impl core::fmt::Display for Synthesis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.order.is_empty() {
            f.write_str("--- No resources.\n")?;
        }
        for (i, batch) in self.order.iter().enumerate() {
            let i = i + 1;
            f.write_str("--- step ")?;
            f.write_fmt(format_args!("{i}\n"))?;
            for id in batch.iter() {
                f.write_str("  ")?;
                f.write_str(id)?;
                f.write_str("\n")?;
            }
            f.write_str("---\n")?;
        }
        Ok(())
    }
}

impl Synthesis {
    /// The creation order, batched into steps.
    ///
    /// Every resource in a step only references resources from earlier
    /// steps, so the engine may create the resources of a step in any
    /// order, or concurrently.
    pub fn order(&self) -> &[Vec<String>] {
        &self.order
    }

    /// Write the template as pretty JSON.
    pub fn write_template(&self, path: impl AsRef<std::path::Path>) -> Result<(), Error> {
        let path = path.as_ref();
        log::info!("storing template '{}' to {path:?}", self.template.stack);

        let contents = serde_json::to_string_pretty(&self.template).context(SerializeSnafu {
            name: self.template.stack.clone(),
        })?;

        // Ensure the parent directory exists
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context(CreateFileSnafu { path: parent })?;
        }

        std::fs::write(path, contents).context(WriteFileSnafu {
            path: path.to_path_buf(),
        })?;
        Ok(())
    }
}

/// An accumulating set of resource declarations.
///
/// Declaring a resource records a graph node and hands back the
/// resource's attribute tokens. Nothing is created anywhere until the
/// deployment engine receives the synthesized [`Template`].
pub struct Stack {
    name: String,
    registry: Registry,
    graph: dagga::Dag<SynthNode, usize>,
    outputs: BTreeMap<String, String>,
}

impl Stack {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            registry: Registry::default(),
            graph: dagga::Dag::default(),
            outputs: BTreeMap::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declares a resource.
    ///
    /// Serializes the descriptor into the template properties, records a
    /// graph node with an edge for every resource the descriptor
    /// references, and returns the declaration's attribute handles for
    /// wiring into later declarations.
    ///
    /// ## Errors
    /// Errs if the id has already been declared, or if the descriptor
    /// references a resource that has not been declared yet.
    pub fn resource<T>(&mut self, id: impl AsRef<str>, descriptor: T) -> Result<Declared<T>, Error>
    where
        T: Resource,
    {
        let id = id.as_ref();
        log::debug!("declaring '{id}' as {}", T::KIND);

        let properties = serde_json::to_value(&descriptor).context(SerializeSnafu {
            name: id.to_owned(),
        })?;

        let mut reads = vec![];
        let mut depends_on: Vec<String> = vec![];
        for dep in descriptor.dependencies() {
            let entry = self
                .registry
                .get(&dep)
                .context(MissingResourceSnafu { name: dep.clone() })?;
            if !depends_on.contains(&dep) {
                reads.push(entry.key);
                depends_on.push(dep);
            }
        }
        depends_on.sort();

        let key = self.registry.insert(id, T::KIND)?;
        log::debug!("  with result {key}");
        let node = dagga::Node::new(SynthNode {
            id: id.to_owned(),
            kind: T::KIND,
            depends_on,
            properties,
        })
        .with_name(id.to_owned())
        .with_reads(reads)
        .with_result(key);
        self.graph.add_node(node);

        Ok(Declared {
            logical_id: id.to_owned(),
            attrs: T::attrs(id),
        })
    }

    /// Publishes a value under the given output name.
    ///
    /// ## Errors
    /// Errs if the name has already been published, or if the expression
    /// references a resource that has not been declared.
    pub fn output(&mut self, name: impl Into<String>, value: impl Into<Expr>) -> Result<(), Error> {
        let name = name.into();
        let expr = value.into();
        log::debug!("declaring output '{name}' = {expr}");
        for dep in expr.dependencies() {
            snafu::ensure!(
                self.registry.get(&dep).is_some(),
                MissingResourceSnafu { name: dep }
            );
        }
        snafu::ensure!(
            !self.outputs.contains_key(&name),
            DuplicateOutputSnafu { name }
        );
        self.outputs.insert(name, expr.render());
        Ok(())
    }

    fn get_graph_legend(&self) -> Result<DagLegend<usize>> {
        let mut missing_resource_name = None;
        let legend = self.graph.legend()?.with_resources_named(|key| {
            let maybe_id = self.registry.get_id_by_key(*key);
            if maybe_id.is_none() {
                missing_resource_name = Some(*key);
            }
            maybe_id
        });
        if let Some(missing) = missing_resource_name {
            log::error!(
                "Missing resource {missing}, current resources:\n{}",
                self.registry
            );
            return MissingNameSnafu { missing }.fail();
        }
        Ok(legend)
    }

    /// Save the resource graph as graphviz dot.
    pub fn save_graph_dot(&self, path: impl AsRef<std::path::Path>) -> Result<(), Error> {
        if self.graph.is_empty() {
            log::warn!("Resource DAG is empty, writing an empty dot file");
        }
        let legend = self.get_graph_legend()?;
        dagga::dot::save_as_dot(&legend, path).context(DotSnafu)?;

        Ok(())
    }

    /// Synthesizes the stack into a [`Template`] and its creation order.
    ///
    /// Consumes the stack. Scheduling fails if the declarations contain a
    /// reference cycle.
    pub fn synthesize(self) -> Result<Synthesis, Error> {
        log::info!("synthesizing stack '{}'", self.name);
        let Stack {
            name,
            registry: _,
            graph,
            outputs,
        } = self;

        let schedule = graph
            .build_schedule()
            .map_err(|e| Error::Schedule { msg: e.to_string() })?;

        let mut resources = BTreeMap::new();
        let mut order = vec![];
        for batch in schedule.batches.into_iter() {
            let mut step = vec![];
            for node in batch.into_iter() {
                let synth = node.into_inner();
                step.push(synth.id.clone());
                resources.insert(
                    synth.id,
                    TemplateResource {
                        kind: synth.kind.to_owned(),
                        depends_on: synth.depends_on,
                        properties: synth.properties,
                    },
                );
            }
            // In-batch order carries no meaning, so keep it stable.
            step.sort();
            order.push(step);
        }

        Ok(Synthesis {
            template: Template {
                stack: name,
                resources,
                outputs,
            },
            order,
        })
    }
}
