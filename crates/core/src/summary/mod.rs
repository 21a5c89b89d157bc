pub mod summary_model;
pub mod summary_service;
pub mod summary_traits;


pub use summary_model::{
    BudgetUsage, CategorySummary, LedgerTotals, MonthlySummary, PrimaryGoalSummary,
    SavingsOverview, SummaryPeriod, TransactionCount,
};
pub use summary_service::SummaryService;
pub use summary_traits::SummaryServiceTrait;
