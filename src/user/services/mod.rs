//! Application services for the user directory.

mod directory;

pub use directory::{
    RegisterUserRequest, RequestContext, UserDirectoryError, UserDirectoryResult,
    UserDirectoryService,
};
