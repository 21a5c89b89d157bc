pub mod transactions_model;
pub mod transactions_repository;
pub mod transactions_service;
pub mod transactions_traits;

pub use transactions_model::{
    AmountWithCount, CategoryExpenseTotal, MonthTypeTotals, NewTransaction, Transaction,
    TransactionDB, TransactionType, TransactionUpdate,
};
pub use transactions_repository::TransactionRepository;
pub use transactions_service::TransactionService;
pub use transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
