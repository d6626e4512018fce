pub mod classifier;
pub mod config;
pub mod delay_manager;
pub mod errors;
pub mod input_loader;
pub mod linkedin;
pub mod logger;
pub mod operator;
pub mod provider;
pub mod registry;
pub mod resolver;
pub mod resume_manager;

// Exporting types for convenience
pub use classifier::{classify, SizeCode, StaffCount};
pub use config::Config;
pub use errors::{LookupError, ResolveError, StoreError};
pub use linkedin::LinkedinClient;
pub use operator::{ConsoleOperator, Operator};
pub use provider::{CompanyDetails, CompanyInfoProvider, StaffCountRange, StaffLookup};
pub use registry::{CompanyRecord, CompanyRegistry, PageId};
pub use resolver::{Resolver, RunSummary};
pub use resume_manager::ProgressStore;
