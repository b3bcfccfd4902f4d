mod error;
pub use self::error::{
    FieldError, RequestError, CODE_ALREADY_EXISTS, CODE_INVALID, CODE_MISSING, CODE_MISSING_FIELD,
};
