//! Macros for ergonomic identifier definitions.

/// Generate a closed set of state identifiers.
///
/// Expands to a fieldless enum deriving `Clone`, `Copy`, `PartialEq`, `Eq`,
/// `Hash`, `Debug`, `serde::Serialize` and `serde::Deserialize`, plus a
/// [`StateId`](crate::core::StateId) implementation naming each variant.
/// The serde derives go through this crate's re-export, so callers need no
/// direct `serde` dependency.
///
/// # Example
///
/// ```
/// use tickfsm::core::StateId;
/// use tickfsm::state_ids;
///
/// state_ids! {
///     pub enum Behavior {
///         Wait,
///         RandomChange,
///     }
/// }
///
/// assert_eq!(Behavior::RandomChange.name(), "RandomChange");
/// ```
#[macro_export]
macro_rules! state_ids {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            Debug,
            $crate::__serde::Serialize,
            $crate::__serde::Deserialize,
        )]
        #[serde(crate = "tickfsm::__serde")]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::StateId for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}
