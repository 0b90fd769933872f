//! Charges module - scheduled bills and their Upcoming→Due→Paid lifecycle.

mod charges_model;
mod charges_service;
mod charges_traits;


pub use charges_model::{ChargeStatus, ChargeUpdate, NewCharge, UpcomingCharge};
pub use charges_service::ChargeService;
pub use charges_traits::{ChargeRepositoryTrait, ChargeServiceTrait};
