//! Transactions module - immutable financial events, listings, and summaries.

mod transactions_model;
mod transactions_service;
mod transactions_traits;

#[cfg(test)]
mod transactions_service_tests;

pub use transactions_model::{
    NewTransaction, NewTransactionRecord, SpendingPoint, Transaction, TransactionPage,
    TransactionSummary, TransactionType, TransactionUpdate,
};
pub use transactions_service::TransactionService;
pub use transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
