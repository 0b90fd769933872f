//! Users module - accounts, financial profiles, and OTP state.

mod users_model;
mod users_service;
mod users_traits;


pub use users_model::{
    IncomeSource, IncomeType, NewIncomeSource, NewRecurringExpense, NewUser, ProfileUpdate,
    RecurringExpense, User, UserProfile,
};
pub use users_service::UserService;
pub use users_traits::{UserRepositoryTrait, UserServiceTrait};
