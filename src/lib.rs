pub mod cache;
pub mod config;
pub mod crm;
pub mod dispatch;
pub mod error;
pub mod inventory;
pub mod server;

pub use error::ApiError;
pub use inventory::InventoryService;
