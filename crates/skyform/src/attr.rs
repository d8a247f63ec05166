//! Attribute tokens.
//!
//! Attributes are values that are only determined once the deployment
//! engine has created a resource. Locally they are symbolic: an
//! [`Attr`] renders as a `${id.attribute}` token that the engine
//! substitutes at deploy time, and referencing one records a dependency
//! on the resource that produces it.

use std::{collections::HashMap, marker::PhantomData};

use crate::HasDependencies;

use super::{Dependencies, DuplicateResourceSnafu, Error};

/// A typed attribute of a declared resource.
///
/// The type parameter is a phantom: it documents and enforces what the
/// attribute resolves to on the engine side, but no value of that type
/// ever exists locally.
pub struct Attr<X> {
    resource_id: String,
    attribute: &'static str,
    _phantom: PhantomData<fn() -> X>,
}

impl<X> Clone for Attr<X> {
    fn clone(&self) -> Self {
        Self {
            resource_id: self.resource_id.clone(),
            attribute: self.attribute,
            _phantom: PhantomData,
        }
    }
}

impl<X> std::fmt::Debug for Attr<X> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attr")
            .field("resource_id", &self.resource_id)
            .field("attribute", &self.attribute)
            .finish()
    }
}

impl<X> PartialEq for Attr<X> {
    fn eq(&self, other: &Self) -> bool {
        self.resource_id == other.resource_id && self.attribute == other.attribute
    }
}

impl<X> Eq for Attr<X> {}

impl<X> core::fmt::Display for Attr<X> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "${{{id}.{attribute}}}",
            id = self.resource_id,
            attribute = self.attribute
        ))
    }
}

impl<X> serde::Serialize for Attr<X> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<X> HasDependencies for Attr<X> {
    fn dependencies(&self) -> Dependencies {
        Dependencies {
            inner: vec![self.resource_id.clone()],
        }
    }
}

impl<X> Attr<X> {
    /// A token for the given attribute of the given resource.
    ///
    /// Descriptors mint these in [`crate::Resource::attrs`].
    pub fn new(resource_id: impl Into<String>, attribute: &'static str) -> Self {
        Self {
            resource_id: resource_id.into(),
            attribute,
            _phantom: PhantomData,
        }
    }

    /// The logical id of the resource this attribute belongs to.
    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    /// The `${id.attribute}` token the deployment engine substitutes.
    pub fn token(&self) -> String {
        self.to_string()
    }
}

/// Values the deployment engine substitutes from its own environment
/// rather than from any declared resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pseudo {
    Partition,
    Region,
    AccountId,
}

impl Pseudo {
    pub fn token(&self) -> &'static str {
        match self {
            Pseudo::Partition => "${aws:partition}",
            Pseudo::Region => "${aws:region}",
            Pseudo::AccountId => "${aws:account}",
        }
    }
}

impl core::fmt::Display for Pseudo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Part {
    Lit(String),
    Attr {
        resource_id: String,
        attribute: &'static str,
    },
    Pseudo(Pseudo),
}

/// A string expression interpolating literals, [`Attr`] tokens and
/// [`Pseudo`] tokens.
///
/// Expressions render into template strings like
/// `arn:${aws:partition}:s3:::${bucket.name}/*` and carry a dependency
/// on every resource whose attribute they mention.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Expr {
    parts: Vec<Part>,
}

impl Expr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a literal fragment.
    pub fn lit(mut self, s: impl Into<String>) -> Self {
        self.parts.push(Part::Lit(s.into()));
        self
    }

    /// Append an attribute token.
    pub fn attr<X>(mut self, attr: &Attr<X>) -> Self {
        self.parts.push(Part::Attr {
            resource_id: attr.resource_id.clone(),
            attribute: attr.attribute,
        });
        self
    }

    /// Append a pseudo token.
    pub fn pseudo(mut self, pseudo: Pseudo) -> Self {
        self.parts.push(Part::Pseudo(pseudo));
        self
    }

    /// Render the expression into its template string.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl core::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for part in self.parts.iter() {
            match part {
                Part::Lit(s) => f.write_str(s)?,
                Part::Attr {
                    resource_id,
                    attribute,
                } => f.write_fmt(format_args!("${{{resource_id}.{attribute}}}"))?,
                Part::Pseudo(pseudo) => f.write_str(pseudo.token())?,
            }
        }
        Ok(())
    }
}

impl serde::Serialize for Expr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl HasDependencies for Expr {
    fn dependencies(&self) -> Dependencies {
        Dependencies {
            inner: self
                .parts
                .iter()
                .filter_map(|part| match part {
                    Part::Attr { resource_id, .. } => Some(resource_id.clone()),
                    _ => None,
                })
                .collect(),
        }
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::new().lit(s)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Expr::new().lit(s)
    }
}

impl<X> From<&Attr<X>> for Expr {
    fn from(attr: &Attr<X>) -> Self {
        Expr::new().attr(attr)
    }
}

impl From<Pseudo> for Expr {
    fn from(pseudo: Pseudo) -> Self {
        Expr::new().pseudo(pseudo)
    }
}

pub(crate) struct Entry {
    pub(crate) key: usize,
    pub(crate) kind: &'static str,
}

#[derive(Default)]
pub(crate) struct Registry {
    /// Map of resource id to key + kind
    entries: HashMap<String, Entry>,
}

impl core::fmt::Display for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (id, entry) in self.entries.iter() {
            f.write_fmt(format_args!(
                "id:'{id}' key:{key} kind:{kind}\n",
                key = entry.key,
                kind = entry.kind,
            ))?;
        }
        Ok(())
    }
}

impl Registry {
    /// Registers a new resource id and returns its graph key.
    ///
    /// ## Errors
    /// Errs if the id has already been registered.
    pub fn insert(&mut self, id: &str, kind: &'static str) -> Result<usize, Error> {
        log::trace!("registering '{id}' of kind {kind}");
        snafu::ensure!(
            !self.entries.contains_key(id),
            DuplicateResourceSnafu { id: id.to_owned() }
        );
        let key = self.entries.len();
        self.entries.insert(id.to_owned(), Entry { key, kind });
        Ok(key)
    }

    /// Returns the entry of the resource with the given id.
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.get(id)
    }

    /// Returns the id of a resource by key
    pub fn get_id_by_key(&self, key: usize) -> Option<String> {
        for (id, entry) in self.entries.iter() {
            if key == entry.key {
                return Some(id.clone());
            }
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn attr_ser() {
        let attr: Attr<String> = Attr::new("bucket", "name");
        let s = serde_json::to_string(&attr).unwrap();
        assert_eq!("\"${bucket.name}\"", &s);
    }

    #[test]
    fn expr_render() {
        let arn: Attr<String> = Attr::new("bucket", "arn");
        let expr = Expr::new()
            .lit("arn:")
            .pseudo(Pseudo::Partition)
            .lit(":s3:::objects/")
            .attr(&arn)
            .lit("/*");
        assert_eq!("arn:${aws:partition}:s3:::objects/${bucket.arn}/*", &expr.render());
    }

    #[test]
    fn expr_dependencies() {
        let name: Attr<String> = Attr::new("bucket", "name");
        let expr = Expr::new().lit("s3://").attr(&name).lit("/prefix");
        let deps: Vec<String> = expr.dependencies().into_iter().collect();
        assert_eq!(vec!["bucket".to_string()], deps);
    }
}
