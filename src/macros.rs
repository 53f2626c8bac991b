//! Macros for ergonomic machine configuration.

/// Generate a state identifier enum and its `State` implementation.
///
/// # Example
///
/// ```
/// use statewatch::state_enum;
/// use statewatch::core::State;
///
/// state_enum! {
///     pub enum FormState {
///         Empty,
///         Middle,
///         Filled,
///     }
/// }
///
/// assert_eq!(FormState::Middle.name(), "Middle");
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
    ) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            Debug,
            serde::Serialize,
            serde::Deserialize
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

/// Build a read/write [`Property`](crate::subject::Property) token for a
/// struct field.
///
/// The field name becomes the property name, so it must appear in the
/// subject's `PROPERTIES`. Reads clone the field.
///
/// # Example
///
/// ```
/// use statewatch::property;
/// use statewatch::subject::Subject;
///
/// struct Form {
///     login: String,
/// }
///
/// impl Subject for Form {
///     const PROPERTIES: &'static [&'static str] = &["login"];
/// }
///
/// let login = property!(Form, login: String);
/// assert_eq!(login.name(), "login");
/// assert!(login.is_writable());
/// ```
#[macro_export]
macro_rules! property {
    ($subject:ty, $field:ident : $ty:ty) => {
        $crate::subject::Property::<$subject, $ty>::read_write(
            stringify!($field),
            |subject: &$subject| subject.$field.clone(),
            |subject: &mut $subject, value: $ty| subject.$field = value,
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::core::State;
    use crate::subject::Subject;

    state_enum! {
        enum TestState {
            Empty,
            Middle,
            Filled,
        }
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        assert_eq!(TestState::Empty.name(), "Empty");
        assert_eq!(TestState::Middle.name(), "Middle");
        assert_eq!(TestState::Filled.name(), "Filled");
    }

    #[test]
    fn state_enum_supports_visibility_and_attributes() {
        state_enum! {
            /// Documented.
            pub enum PublicState {
                A,
                #[allow(dead_code)]
                B,
            }
        }

        let state = PublicState::A;
        assert_eq!(state, state.clone());
        assert_eq!(state.name(), "A");
    }

    #[derive(Default)]
    struct Counter {
        count: u32,
    }

    impl Subject for Counter {
        const PROPERTIES: &'static [&'static str] = &["count"];
    }

    #[test]
    fn property_macro_reads_and_writes_field() {
        let count = property!(Counter, count: u32);
        let mut counter = Counter::default();

        (count.setter().unwrap())(&mut counter, 7);

        assert_eq!(count.get(&counter), 7);
        assert_eq!(count.key(), Ok("count"));
    }
}
