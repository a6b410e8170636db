//! Macros for ergonomic state machine construction.

/// Generate a state enum and its `State` implementation.
///
/// The generated enum derives everything the engine needs (`Copy`, `Eq`,
/// `Hash`, `Debug`, serde). The optional `final:`, `error:` and `unknown:`
/// lists mark variants for `is_final`, `is_error` and `is_unknown`.
///
/// # Example
///
/// ```
/// use lockstep::core::State;
/// use lockstep::state_enum;
///
/// state_enum! {
///     pub enum Light {
///         Unset,
///         Red,
///         Green,
///         Broken,
///     }
///     final: [Broken]
///     error: [Broken]
///     unknown: [Unset]
/// }
///
/// assert_eq!(Light::Red.name(), "Red");
/// assert!(Light::Broken.is_error());
/// assert!(Light::Unset.is_unknown());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
        $(error: [$($error:ident),* $(,)?])?
        $(unknown: [$($unknown:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> ::std::borrow::Cow<'_, str> {
                match self {
                    $(Self::$variant => ::std::borrow::Cow::Borrowed(stringify!($variant))),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }

            fn is_error(&self) -> bool {
                match self {
                    $($(Self::$error => true,)*)?
                    _ => false,
                }
            }

            fn is_unknown(&self) -> bool {
                match self {
                    $($(Self::$unknown => true,)*)?
                    _ => false,
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::State;

    state_enum! {
        enum TestState {
            Unknown,
            Initial,
            Processing,
            Complete,
            Failed,
        }
        final: [Complete, Failed]
        error: [Failed]
        unknown: [Unknown]
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        let state = TestState::Initial;
        assert_eq!(state.name(), "Initial");
        assert!(!state.is_final());
        assert!(!state.is_error());
        assert!(!state.is_unknown());

        let complete = TestState::Complete;
        assert!(complete.is_final());
        assert!(!complete.is_error());

        let failed = TestState::Failed;
        assert!(failed.is_final());
        assert!(failed.is_error());

        assert!(TestState::Unknown.is_unknown());
        assert!(!TestState::Processing.is_unknown());
    }

    #[test]
    fn state_enum_supports_visibility() {
        state_enum! {
            pub enum PublicState {
                A,
                B,
            }
            final: [B]
        }

        let _state = PublicState::A;
    }

    #[test]
    fn state_enum_works_without_lists() {
        state_enum! {
            enum MinimalState {
                One,
                Two,
            }
        }

        let state = MinimalState::One;
        assert!(!state.is_final());
        assert!(!state.is_error());
        assert!(!state.is_unknown());
        assert_ne!(state, MinimalState::Two);
    }
}
