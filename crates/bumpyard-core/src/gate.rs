//! Structural safety gate: the indirection-free predicate.
//!
//! [`is_indirection_free`] walks a [`TypeDesc`] graph and answers whether
//! any reference, pointer, sequence, map, channel, function, trait object
//! or text handle appears anywhere in the layout. [`find_indirection`]
//! performs the same walk and reports the first offending member.
//!
//! The walk is conservative. A pointer field that is never dereferenced
//! still disqualifies its type.

use std::any::TypeId;
use std::fmt;

use indexmap::IndexSet;

use crate::desc::{Indirection, TypeDesc, TypeKind};

/// The first indirection found inside a type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndirectionReport {
    /// Name of the type that was checked.
    pub root: &'static str,
    /// Field path from the root to the offending member.
    ///
    /// Struct fields contribute their name; array elements contribute `[]`.
    /// Empty when the root itself is the indirection.
    pub path: Vec<&'static str>,
    /// Name of the offending member's type.
    pub offender: &'static str,
    /// What kind of indirection the offender is.
    pub kind: Indirection,
}

impl IndirectionReport {
    /// The field path joined with `.`, e.g. `inner.items.[]`.
    pub fn dotted_path(&self) -> String {
        self.path.join(".")
    }
}

impl fmt::Display for IndirectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "`{}` is a {}", self.root, self.kind)
        } else {
            write!(
                f,
                "`{}` contains a {} at `{}` (type `{}`)",
                self.root,
                self.kind,
                self.dotted_path(),
                self.offender
            )
        }
    }
}

/// Return `true` if `desc` contains no indirection at any depth.
pub fn is_indirection_free(desc: &TypeDesc) -> bool {
    find_indirection(desc).is_none()
}

/// Return the first indirection found in `desc`, or `None` if it is
/// indirection-free.
///
/// Types already visited during this walk are treated as indirection-free
/// on later occurrences. Every indirect kind is rejected before recursion,
/// so the guard only stops re-entry into a struct or array that is already
/// being checked; it never hides a pointer elsewhere in the cycle.
pub fn find_indirection(desc: &TypeDesc) -> Option<IndirectionReport> {
    let mut walk = Walk {
        root: desc.name,
        visited: IndexSet::new(),
        path: Vec::new(),
    };
    walk.visit(desc)
}

struct Walk {
    root: &'static str,
    visited: IndexSet<TypeId>,
    path: Vec<&'static str>,
}

impl Walk {
    fn visit(&mut self, desc: &TypeDesc) -> Option<IndirectionReport> {
        if !self.visited.insert(desc.id) {
            return None;
        }
        match &desc.kind {
            TypeKind::Scalar => None,
            TypeKind::Indirect(kind) => Some(IndirectionReport {
                root: self.root,
                path: self.path.clone(),
                offender: desc.name,
                kind: *kind,
            }),
            TypeKind::Array { elem, .. } => self.visit_member("[]", elem),
            TypeKind::Struct { fields } => fields
                .iter()
                .find_map(|field| self.visit_member(field.name, &field.ty)),
        }
    }

    fn visit_member(
        &mut self,
        name: &'static str,
        describe: &fn() -> TypeDesc,
    ) -> Option<IndirectionReport> {
        self.path.push(name);
        let found = self.visit(&describe());
        self.path.pop();
        found
    }
}
