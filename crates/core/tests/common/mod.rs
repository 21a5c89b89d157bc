//! Shared wiring for integration tests: a throwaway SQLite database with
//! migrations applied, plus the full service graph on top of it.

use std::sync::Arc;

use tempfile::TempDir;

use ledgerbook_core::balances::{DailyBalanceRepository, DailyBalanceService};
use ledgerbook_core::budgets::{BudgetRepository, BudgetService};
use ledgerbook_core::categories::{CategoryRepository, CategoryService};
use ledgerbook_core::db::{self, DbPool, WriteHandle};
use ledgerbook_core::goals::{SavingsGoalRepository, SavingsGoalService};
use ledgerbook_core::summary::SummaryService;
use ledgerbook_core::transactions::{TransactionRepository, TransactionService};

pub struct TestApp {
    pub pool: Arc<DbPool>,
    pub writer: WriteHandle,
    pub transactions: TransactionService,
    pub categories: CategoryService,
    pub budgets: BudgetService,
    pub goals: SavingsGoalService,
    pub balances: DailyBalanceService,
    pub summary: SummaryService,
    _tmp: TempDir,
}

/// Must run inside a tokio runtime; the write actor spawns onto it.
pub fn setup() -> TestApp {
    let tmp = TempDir::new().expect("create temp dir");
    let db_path = tmp
        .path()
        .join("ledgerbook.db")
        .to_str()
        .expect("utf-8 temp path")
        .to_string();

    db::init(&db_path).expect("init database");
    let pool = db::create_pool(&db_path).expect("create pool");
    db::run_migrations(&pool).expect("run migrations");
    let writer = db::spawn_writer(pool.clone()).expect("spawn writer");

    let transaction_repository =
        Arc::new(TransactionRepository::new(pool.clone(), writer.clone()));
    let category_repository = Arc::new(CategoryRepository::new(pool.clone(), writer.clone()));
    let budget_repository = Arc::new(BudgetRepository::new(pool.clone(), writer.clone()));
    let goal_repository = Arc::new(SavingsGoalRepository::new(pool.clone(), writer.clone()));
    let balance_repository =
        Arc::new(DailyBalanceRepository::new(pool.clone(), writer.clone()));

    TestApp {
        transactions: TransactionService::new(
            transaction_repository.clone(),
            category_repository.clone(),
            goal_repository.clone(),
        ),
        categories: CategoryService::new(category_repository.clone()),
        budgets: BudgetService::new(budget_repository.clone(), category_repository.clone()),
        goals: SavingsGoalService::new(goal_repository.clone()),
        balances: DailyBalanceService::new(balance_repository),
        summary: SummaryService::new(
            transaction_repository,
            category_repository,
            budget_repository,
            goal_repository,
        ),
        pool,
        writer,
        _tmp: tmp,
    }
}
