// Service exports
pub mod events;
pub mod session;

pub use events::{EventStoreClient, StoreCollections, StoreError};
pub use session::{SessionCoordinator, SessionError};
