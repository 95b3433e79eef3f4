//! Referee service client abstraction.

mod http;
mod mock;
mod traits;

pub use http::HttpRefereeClient;
pub use mock::MockRefereeClient;
pub use traits::{RefereeClient, RefereeError};
