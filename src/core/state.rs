//! State identity trait.
//!
//! States are identified by values of a closed, caller-supplied enumeration.
//! The trait only describes identity; what a state *does* when it becomes
//! active lives in the machine's registry.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state identifiers.
///
/// # Required Traits
///
/// - `Clone`: ids are copied into the registry, the subscription table and history
/// - `Eq` + `Hash`: ids key the state registry
/// - `Debug`: ids appear in diagnostics
/// - `Serialize` + `Deserialize`: ids appear in serializable history
///
/// # Example
///
/// ```rust
/// use statewatch::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum FormState {
///     Empty,
///     Filled,
/// }
///
/// impl State for FormState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Empty => "Empty",
///             Self::Filled => "Filled",
///         }
///     }
/// }
///
/// assert_eq!(FormState::Filled.name(), "Filled");
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}
