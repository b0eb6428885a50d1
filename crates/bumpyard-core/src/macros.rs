//! The [`describe_struct!`](crate::describe_struct) macro.

/// Implement [`Describe`](crate::Describe) for a braced struct by listing
/// every field with its type.
///
/// The expansion destructures the struct without `..`, so leaving a field
/// out (or misspelling one) is a compile error, and it borrows each listed
/// field at its declared type, so a wrong type is a compile error too.
/// Private fields must be listed like public ones.
///
/// ```
/// use bumpyard_core::{describe_struct, gate, Describe};
///
/// struct Particle {
///     pos: [f32; 3],
///     mass: f32,
///     id: u32,
/// }
/// describe_struct!(Particle { pos: [f32; 3], mass: f32, id: u32 });
///
/// assert!(gate::is_indirection_free(&Particle::describe()));
/// ```
///
/// ```compile_fail
/// use bumpyard_core::describe_struct;
///
/// struct Pair {
///     a: u32,
///     b: u32,
/// }
/// // `b` is missing.
/// describe_struct!(Pair { a: u32 });
/// ```
#[macro_export]
macro_rules! describe_struct {
    ($ty:ident { $($field:ident : $fty:ty),* $(,)? }) => {
        impl $crate::Describe for $ty {
            fn describe() -> $crate::TypeDesc {
                #[allow(dead_code, clippy::needless_pass_by_value)]
                fn every_field_listed(value: &$ty) {
                    let $ty { $($field: _),* } = value;
                    $( let _: &$fty = &value.$field; )*
                }
                $crate::TypeDesc::structure::<$ty>(::std::vec![
                    $( $crate::FieldDesc::new::<$fty>(::core::stringify!($field)) ),*
                ])
            }
        }
    };
}
