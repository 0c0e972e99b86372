pub mod api_client;
pub mod gateway;
pub mod memory;

pub use api_client::{ApiClient, UnauthorizedHandler};
pub use gateway::{AuthGateway, IssueGateway, ProjectGateway};
pub use memory::{Failure, InMemoryGateway, Operation, ResponseGate};
