//! Type descriptors: [`TypeDesc`], [`TypeKind`] and the [`Describe`] trait.
//!
//! A descriptor is a shallow, lazily expanded view of a type's layout.
//! Array elements and struct fields are stored as `fn() -> TypeDesc` so a
//! descriptor graph may refer back to a type that is still being described;
//! [`crate::gate`] walks that graph with a cycle guard.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::ffi::{CStr, CString, OsStr, OsString};
use std::fmt;
use std::ptr::NonNull;
use std::rc::Rc;
use std::sync::{mpsc, Arc};

use indexmap::{IndexMap, IndexSet};

/// The kind of indirection a type carries.
///
/// Any of these anywhere in a type's layout disqualifies it from typed
/// arena allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Indirection {
    /// A borrowed reference (`&T`, `&mut T`).
    Reference,
    /// An owning or reference-counted pointer (`Box`, `Rc`, `Arc`, weak handles).
    SmartPointer,
    /// A dynamically sized or growable sequence (`[T]`, `Vec`, `VecDeque`).
    Sequence,
    /// An associative container (`HashMap`, `BTreeMap`, `IndexMap`, sets).
    Map,
    /// A communication channel endpoint.
    Channel,
    /// A function pointer or closure value.
    Function,
    /// A dynamically dispatched trait object.
    TraitObject,
    /// An opaque low-level pointer (`*const T`, `*mut T`, `NonNull<T>`).
    RawPointer,
    /// A text handle (`str`, `String`, `CString`, `OsString`).
    Text,
}

impl fmt::Display for Indirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Reference => "reference",
            Self::SmartPointer => "smart pointer",
            Self::Sequence => "dynamic sequence",
            Self::Map => "map",
            Self::Channel => "channel",
            Self::Function => "function",
            Self::TraitObject => "trait object",
            Self::RawPointer => "raw pointer",
            Self::Text => "text handle",
        };
        f.write_str(name)
    }
}

/// Structural classification of a type.
#[derive(Clone, Debug)]
pub enum TypeKind {
    /// A fixed-size numeric, boolean, character or unit value.
    Scalar,
    /// A fixed-size array `[elem; len]`.
    Array {
        /// Descriptor of the element type.
        elem: fn() -> TypeDesc,
        /// Number of elements.
        len: usize,
    },
    /// A struct. Every field is listed, public or not.
    Struct {
        /// Field descriptors in declaration order.
        fields: Vec<FieldDesc>,
    },
    /// A type that is itself a form of indirection.
    Indirect(Indirection),
}

/// A named struct field and a way to describe its type.
#[derive(Clone, Debug)]
pub struct FieldDesc {
    /// Field name as written in the struct declaration.
    pub name: &'static str,
    /// Descriptor of the field's type.
    pub ty: fn() -> TypeDesc,
}

impl FieldDesc {
    /// Describe a field named `name` of type `T`.
    pub fn new<T: Describe + ?Sized>(name: &'static str) -> Self {
        Self {
            name,
            ty: T::describe,
        }
    }
}

/// Layout descriptor for a single type.
#[derive(Clone, Debug)]
pub struct TypeDesc {
    /// Fully qualified type name, for diagnostics.
    pub name: &'static str,
    /// Identity used by the gate's cycle guard.
    pub id: TypeId,
    /// Structural kind.
    pub kind: TypeKind,
}

impl TypeDesc {
    /// Descriptor for a scalar type.
    pub fn scalar<T: ?Sized + 'static>() -> Self {
        Self::of::<T>(TypeKind::Scalar)
    }

    /// Descriptor for a fixed-size array of `len` elements of `E`.
    pub fn array<T: ?Sized + 'static, E: Describe + ?Sized>(len: usize) -> Self {
        Self::of::<T>(TypeKind::Array {
            elem: E::describe,
            len,
        })
    }

    /// Descriptor for a struct with the given fields.
    pub fn structure<T: ?Sized + 'static>(fields: Vec<FieldDesc>) -> Self {
        Self::of::<T>(TypeKind::Struct { fields })
    }

    /// Descriptor for a type that is itself an indirection.
    pub fn indirect<T: ?Sized + 'static>(kind: Indirection) -> Self {
        Self::of::<T>(TypeKind::Indirect(kind))
    }

    fn of<T: ?Sized + 'static>(kind: TypeKind) -> Self {
        Self {
            name: std::any::type_name::<T>(),
            id: TypeId::of::<T>(),
            kind,
        }
    }
}

/// Types that can report their own layout.
///
/// Implemented here for the primitive scalars, arrays, and the standard
/// library's indirection types. Structs implement it with
/// [`describe_struct!`](crate::describe_struct).
pub trait Describe: 'static {
    /// Return this type's descriptor.
    fn describe() -> TypeDesc;
}

macro_rules! describe_scalars {
    ($($t:ty),* $(,)?) => {
        $(
            impl Describe for $t {
                fn describe() -> TypeDesc {
                    TypeDesc::scalar::<Self>()
                }
            }
        )*
    };
}

describe_scalars!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64, bool, char, ()
);

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe() -> TypeDesc {
        TypeDesc::array::<Self, T>(N)
    }
}

macro_rules! describe_indirect {
    ($kind:ident => $($t:ty),* $(,)?) => {
        $(
            impl Describe for $t {
                fn describe() -> TypeDesc {
                    TypeDesc::indirect::<Self>(Indirection::$kind)
                }
            }
        )*
    };
}

macro_rules! describe_unsized_generic {
    ($kind:ident => $(<$($g:ident),+> $t:ty),* $(,)?) => {
        $(
            impl<$($g: ?Sized + 'static),+> Describe for $t {
                fn describe() -> TypeDesc {
                    TypeDesc::indirect::<Self>(Indirection::$kind)
                }
            }
        )*
    };
}

describe_indirect!(Text => str, String, CStr, CString, OsStr, OsString);
describe_indirect!(TraitObject =>
    dyn Any,
    dyn Any + Send,
    dyn Any + Send + Sync,
);
describe_unsized_generic!(Reference => <T> &'static T, <T> &'static mut T);
describe_unsized_generic!(RawPointer => <T> *const T, <T> *mut T, <T> NonNull<T>);
describe_unsized_generic!(SmartPointer =>
    <T> Box<T>,
    <T> Rc<T>,
    <T> Arc<T>,
    <T> std::rc::Weak<T>,
    <T> std::sync::Weak<T>,
);

impl<T: 'static> Describe for [T] {
    fn describe() -> TypeDesc {
        TypeDesc::indirect::<Self>(Indirection::Sequence)
    }
}

macro_rules! describe_sized_generic {
    ($kind:ident => $(<$($g:ident),+> $t:ty),* $(,)?) => {
        $(
            impl<$($g: 'static),+> Describe for $t {
                fn describe() -> TypeDesc {
                    TypeDesc::indirect::<Self>(Indirection::$kind)
                }
            }
        )*
    };
}

describe_sized_generic!(Sequence => <T> Vec<T>, <T> VecDeque<T>);
describe_sized_generic!(Map =>
    <K, V, S> HashMap<K, V, S>,
    <K, S> HashSet<K, S>,
    <K, V> BTreeMap<K, V>,
    <K> BTreeSet<K>,
    <K, V, S> IndexMap<K, V, S>,
    <K, S> IndexSet<K, S>,
);
describe_sized_generic!(Channel =>
    <T> mpsc::Sender<T>,
    <T> mpsc::SyncSender<T>,
    <T> mpsc::Receiver<T>,
);

macro_rules! describe_fn_pointers {
    ($(($($arg:ident),*)),* $(,)?) => {
        $(
            impl<R: 'static, $($arg: 'static),*> Describe for fn($($arg),*) -> R {
                fn describe() -> TypeDesc {
                    TypeDesc::indirect::<Self>(Indirection::Function)
                }
            }
        )*
    };
}

describe_fn_pointers!((), (A), (A, B), (A, B, C), (A, B, C, D));

#[cfg(test)]
mod tests {
    use super::*;

    fn kind_of<T: Describe + ?Sized>() -> TypeKind {
        T::describe().kind
    }

    #[test]
    fn scalars_are_scalar() {
        assert!(matches!(kind_of::<u8>(), TypeKind::Scalar));
        assert!(matches!(kind_of::<f64>(), TypeKind::Scalar));
        assert!(matches!(kind_of::<bool>(), TypeKind::Scalar));
        assert!(matches!(kind_of::<()>(), TypeKind::Scalar));
    }

    #[test]
    fn array_reports_len_and_element() {
        match kind_of::<[u16; 7]>() {
            TypeKind::Array { elem, len } => {
                assert_eq!(len, 7);
                assert_eq!(elem().id, TypeId::of::<u16>());
            }
            other => panic!("expected Array, got {other:?}"),
        }
    }

    #[test]
    fn indirection_kinds() {
        let cases: Vec<(TypeDesc, Indirection)> = vec![
            (<&'static u32>::describe(), Indirection::Reference),
            (<*const u8>::describe(), Indirection::RawPointer),
            (<NonNull<u64>>::describe(), Indirection::RawPointer),
            (<Box<u32>>::describe(), Indirection::SmartPointer),
            (<Arc<str>>::describe(), Indirection::SmartPointer),
            (<Vec<u8>>::describe(), Indirection::Sequence),
            (<[u8]>::describe(), Indirection::Sequence),
            (String::describe(), Indirection::Text),
            (str::describe(), Indirection::Text),
            (<HashMap<u32, u32>>::describe(), Indirection::Map),
            (<IndexMap<u32, u32>>::describe(), Indirection::Map),
            (<mpsc::Sender<u8>>::describe(), Indirection::Channel),
            (<fn(u32) -> u32>::describe(), Indirection::Function),
            (<dyn Any + Send>::describe(), Indirection::TraitObject),
        ];
        for (desc, expected) in cases {
            match desc.kind {
                TypeKind::Indirect(kind) => assert_eq!(kind, expected, "{}", desc.name),
                other => panic!("{}: expected Indirect, got {other:?}", desc.name),
            }
        }
    }

    #[test]
    fn descriptor_names_are_qualified() {
        assert_eq!(u32::describe().name, "u32");
        assert!(String::describe().name.ends_with("String"));
    }

    #[test]
    fn indirection_display() {
        assert_eq!(Indirection::Text.to_string(), "text handle");
        assert_eq!(Indirection::RawPointer.to_string(), "raw pointer");
    }
}
