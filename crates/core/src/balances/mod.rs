pub mod balance_calculator;
pub mod balances_model;
pub mod balances_repository;
pub mod balances_service;
pub mod balances_traits;

pub use balances_model::{DailyBalance, DailyBalanceDB};
pub use balances_repository::DailyBalanceRepository;
pub use balances_service::DailyBalanceService;
pub use balances_traits::{DailyBalanceRepositoryTrait, DailyBalanceServiceTrait};

pub(crate) use balances_repository::recompute_on_conn;
