mod instantiate;
mod resolve;
mod validation;

pub use instantiate::InstantiateErrorKind;
pub use resolve::{PendingNames, ResolveErrorKind};
pub use validation::ValidationErrorKind;
