//! Recurring module - lazy, access-triggered monthly materialization of the
//! standing income/expense profile.

mod recurring_model;
mod recurring_service;
mod recurring_traits;


pub use recurring_model::SyncJob;
pub use recurring_service::RecurringSyncService;
pub use recurring_traits::{RecurringSyncServiceTrait, SyncJobRepositoryTrait};
