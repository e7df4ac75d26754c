#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub(crate) mod any;
pub(crate) mod container;
pub(crate) mod descriptor;
pub(crate) mod errors;
pub(crate) mod instantiator;
pub(crate) mod lifecycle;
pub(crate) mod name;
pub(crate) mod registry;
pub(crate) mod scope;
pub(crate) mod session;
pub(crate) mod sink;

pub use any::{Resolved, TypeInfo};
pub use container::Container;
pub use descriptor::Descriptor;
pub use errors::{InstantiateErrorKind, PendingNames, ResolveErrorKind, ValidationErrorKind};
pub use lifecycle::Lifecycle;
pub use name::{normalize, Name};
pub use scope::Scope;
pub use session::Session;
pub use sink::{MessageSink, TracingSink};
