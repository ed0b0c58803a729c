//! Domain model (keys, fallback policy, errors, request value objects).

pub mod key;
pub mod policy;
pub mod errors;
pub mod request;

pub use self::key::{BATCH_PROCESS_PREFIX, BizOperation, Category, ServiceKey, ToolName};
pub use self::policy::FallbackPolicy;
pub use self::errors::{ErrorKind, RegistryError, ServiceError};
