//! Runtime type facilities: lookup of a type by name and type-tagged values.
//!
//! Rust has no runtime class loader, so "load a type by name" is a lookup in
//! a static table of known names and constructors.

use crate::fault::Fault;
use std::any::{type_name, Any};
use std::collections::HashMap;

/// Produces a fresh default instance of a registered type.
pub type Constructor = fn() -> DynamicValue;

lazy_static::lazy_static! {
    static ref TYPE_REGISTRY: HashMap<&'static str, Constructor> = {
        let mut types: HashMap<&'static str, Constructor> = HashMap::new();
        types.insert("String", || DynamicValue::new(String::new()));
        types.insert("i32", || DynamicValue::new(0i32));
        types.insert("f64", || DynamicValue::new(0.0f64));
        types.insert("Vec<u8>", || DynamicValue::new(Vec::<u8>::new()));
        types
    };
}

/// Look up a registered type by name.
pub fn resolve_type(name: &str) -> Result<Constructor, Fault> {
    TYPE_REGISTRY
        .get(name)
        .copied()
        .ok_or_else(|| Fault::TypeResolution {
            name: name.to_string(),
            known: registered_type_names(),
        })
}

fn registered_type_names() -> Vec<&'static str> {
    let mut names: Vec<_> = TYPE_REGISTRY.keys().copied().collect();
    names.sort_unstable();
    names
}

/// `type_name::<T>()` with every module path removed, so
/// `alloc::vec::Vec<alloc::string::String>` becomes `Vec<String>`.
pub fn short_type_name<T: ?Sized>() -> String {
    let full = type_name::<T>();
    let mut short = String::with_capacity(full.len());
    let mut path_start = 0;
    let mut chars = full.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            short.truncate(path_start);
        } else {
            short.push(c);
            if !(c.is_alphanumeric() || c == '_') {
                path_start = short.len();
            }
        }
    }
    short
}

/// A boxed value that remembers the name of its concrete type.
pub struct DynamicValue {
    value: Box<dyn Any>,
    type_name: String,
}

impl DynamicValue {
    pub fn new<T: Any>(value: T) -> Self {
        Self {
            value: Box::new(value),
            type_name: short_type_name::<T>(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Checked cast to `T`; a mismatch is a fault, not a panic.
    pub fn downcast<T: Any>(self) -> Result<T, Fault> {
        let actual = self.type_name;
        self.value
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| Fault::TypeMismatch {
                actual,
                expected: short_type_name::<T>(),
            })
    }
}

impl std::fmt::Debug for DynamicValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicValue")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}
