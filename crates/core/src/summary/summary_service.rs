use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::summary_model::*;
use super::summary_traits::SummaryServiceTrait;
use crate::budgets::{Budget, BudgetRepositoryTrait};
use crate::categories::CategoryRepositoryTrait;
use crate::errors::Result;
use crate::goals::SavingsGoalRepositoryTrait;
use crate::transactions::TransactionRepositoryTrait;
use crate::utils::time_utils::{month_bounds, month_key};

/// Read-time engine assembling the month dashboard out of ledger
/// aggregates, category metadata, budget rows and savings goals. Its one
/// side effect is materializing default budgets for the queried month
/// before usage is computed.
pub struct SummaryService {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    category_repository: Arc<dyn CategoryRepositoryTrait>,
    budget_repository: Arc<dyn BudgetRepositoryTrait>,
    goal_repository: Arc<dyn SavingsGoalRepositoryTrait>,
}

impl SummaryService {
    pub fn new(
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        category_repository: Arc<dyn CategoryRepositoryTrait>,
        budget_repository: Arc<dyn BudgetRepositoryTrait>,
        goal_repository: Arc<dyn SavingsGoalRepositoryTrait>,
    ) -> Self {
        SummaryService {
            transaction_repository,
            category_repository,
            budget_repository,
            goal_repository,
        }
    }
}

/// round(numerator / denominator * 100), None when the denominator is not
/// a usable cap.
fn usage_percent(numerator: i64, denominator: i64) -> Option<i64> {
    if denominator <= 0 {
        return None;
    }
    let percent = Decimal::from(numerator) / Decimal::from(denominator) * dec!(100);
    percent.round().to_i64()
}

fn progress_percent(current: i64, target: i64) -> i64 {
    usage_percent(current, target).unwrap_or(0)
}

#[async_trait]
impl SummaryServiceTrait for SummaryService {
    async fn get_monthly_summary(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> Result<MonthlySummary> {
        let (start, end) = month_bounds(year, month)?;
        let key = month_key(year, month);

        // Lazy instantiation first, so the usage figures below see the
        // carried-forward caps.
        let created = self
            .budget_repository
            .ensure_default_budgets(user_id, &key)
            .await?;
        if created > 0 {
            debug!(
                "materialized {} default budgets for user {} in {}",
                created, user_id, key
            );
        }

        let totals = match self.transaction_repository.month_type_totals(user_id, start, end) {
            Ok(totals) => totals,
            Err(e) => {
                error!(
                    "failed to aggregate ledger totals for user {} in {}: {:?}",
                    user_id, key, e
                );
                return Err(e);
            }
        };
        let contributions = self
            .transaction_repository
            .savings_contributions(user_id, start, end)?;
        let category_totals = self
            .transaction_repository
            .expense_totals_by_category(user_id, start, end)?;
        let budgets = self.budget_repository.list_budgets(user_id, &key)?;
        let goals = self.goal_repository.list_goals(user_id)?;

        let net_amount = totals.income.total - totals.expense.total;
        let balance = net_amount - contributions.total;

        // Category breakdown: resolve metadata, attach the effective
        // budget (explicit row first, category default second), sort by
        // spend.
        let category_ids: Vec<String> = category_totals
            .iter()
            .filter_map(|t| t.category_id.clone())
            .collect();
        let categories_by_id: HashMap<String, _> = self
            .category_repository
            .get_categories_by_ids(user_id, &category_ids)?
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();
        let budget_by_category: HashMap<&str, &Budget> = budgets
            .iter()
            .filter_map(|b| b.category_id.as_deref().map(|id| (id, b)))
            .collect();

        let mut categories: Vec<CategorySummary> = category_totals
            .iter()
            .filter_map(|t| {
                let category_id = t.category_id.as_deref()?;
                // Rows whose category no longer exists at all are dropped.
                let category = categories_by_id.get(category_id)?;
                let effective_budget = budget_by_category
                    .get(category_id)
                    .map(|b| b.amount)
                    .or(category.default_budget);
                Some(CategorySummary {
                    id: category.id.clone(),
                    name: category.name.clone(),
                    icon: category.icon.clone(),
                    color: category.color.clone(),
                    count: t.count,
                    total: t.total,
                    budget: effective_budget,
                    budget_usage_percent: effective_budget
                        .and_then(|cap| usage_percent(t.total, cap)),
                })
            })
            .collect();
        categories.sort_by(|a, b| b.total.cmp(&a.total));

        // Overall cap: the month's single category-less budget row.
        let used = totals.expense.total;
        let overall = budgets.iter().find(|b| b.category_id.is_none());
        let budget = match overall {
            Some(row) => BudgetUsage {
                amount: row.amount,
                used,
                remaining: (row.amount - used).max(0),
                usage_percent: usage_percent(used, row.amount).map(|p| p.clamp(0, 100)),
            },
            None => BudgetUsage {
                amount: 0,
                used,
                remaining: 0,
                usage_percent: None,
            },
        };

        let active_goals: Vec<_> = goals.iter().filter(|g| g.is_active(year, month)).collect();
        let primary_goal = active_goals.iter().find(|g| g.is_primary).map(|g| {
            PrimaryGoalSummary {
                id: g.id.clone(),
                name: g.name.clone(),
                current_amount: g.current_amount,
                target_amount: g.target_amount,
                progress_percent: progress_percent(g.current_amount, g.target_amount),
            }
        });
        let savings = SavingsOverview {
            total_amount: active_goals.iter().map(|g| g.current_amount).sum(),
            target_amount: active_goals.iter().map(|g| g.target_amount).sum(),
            count: contributions.count,
            primary_goal,
        };

        Ok(MonthlySummary {
            period: SummaryPeriod { year, month },
            summary: LedgerTotals {
                total_income: totals.income.total,
                total_expense: totals.expense.total,
                total_savings: contributions.total,
                net_amount,
                balance,
            },
            budget,
            categories,
            transaction_count: TransactionCount {
                income: totals.income.count,
                expense: totals.expense.count,
                total: totals.income.count + totals.expense.count,
            },
            savings,
        })
    }
}
