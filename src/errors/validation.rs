use alloc::string::String;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    #[error("Name must not be blank")]
    BlankName,
    #[error("Unknown scope '{value}'. Expected one of: singleton, prototype")]
    UnknownScope { value: String },
}
