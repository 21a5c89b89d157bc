use serde::{Deserialize, Serialize};

/// Complete dashboard summary for one calendar month.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub period: SummaryPeriod,
    pub summary: LedgerTotals,
    pub budget: BudgetUsage,
    pub categories: Vec<CategorySummary>,
    pub transaction_count: TransactionCount,
    pub savings: SavingsOverview,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPeriod {
    pub year: i32,
    pub month: u32,
}

/// Month totals. Savings contributions are carved out of the plain expense
/// figures and reported on their own, so `balance` is the disposable
/// remainder: `net_amount - total_savings`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTotals {
    pub total_income: i64,
    pub total_expense: i64,
    pub total_savings: i64,
    pub net_amount: i64,
    pub balance: i64,
}

/// Usage of the overall monthly cap. `usage_percent` is clamped to
/// [0, 100] and `remaining` never goes negative; `usage_percent` is absent
/// when no overall cap exists for the month.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUsage {
    pub amount: i64,
    pub used: i64,
    pub remaining: i64,
    pub usage_percent: Option<i64>,
}

/// One expense category's month activity, sorted descending by spend.
/// `budget` is the month's explicit row if one exists, else the category's
/// default; per-category usage is deliberately unclamped so over-budget
/// categories read above 100.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub count: i64,
    pub total: i64,
    pub budget: Option<i64>,
    pub budget_usage_percent: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCount {
    pub income: i64,
    pub expense: i64,
    pub total: i64,
}

/// Savings snapshot: aggregate amounts over the user's active goals plus
/// the count of this month's contributions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SavingsOverview {
    pub total_amount: i64,
    pub target_amount: i64,
    pub count: i64,
    pub primary_goal: Option<PrimaryGoalSummary>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryGoalSummary {
    pub id: String,
    pub name: String,
    pub current_amount: i64,
    pub target_amount: i64,
    pub progress_percent: i64,
}
