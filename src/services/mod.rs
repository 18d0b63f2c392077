pub mod auth;
pub mod batch_test;
pub mod poller;
pub mod report;
pub mod run_registry;
pub mod storage;
pub mod validator;

pub use api_tests::ApiTester;
pub use auth::Signer;
pub use batch_test::{file_types_from_str, BatchTester};
pub use poller::{poll_task, PollOutcome, Probe, ProbeError};
pub use run_registry::{ProgressHandle, RunRegistry, RunSnapshot, RunStatus};
pub use storage::{LocalPlaceholderStore, PlaceholderStore, StorageError};
pub use validator::{run_validators, ValidationReport, ValidationResult, Validator};
