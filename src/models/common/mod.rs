pub mod mutation;
pub mod pagination;
pub mod response;

pub use mutation::{MutationOutcome, MutationResult, RecordId};
pub use pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use response::ApiResponse;
