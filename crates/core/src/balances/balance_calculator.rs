//! Pure folding of ledger rows into per-day balance rows. Shared by the
//! snapshot maintainer and the non-persisting monthly fallback so both
//! produce identical numbers.

use chrono::{NaiveDate, NaiveDateTime};

use super::balances_model::DailyBalance;
use crate::transactions::TransactionType;

/// A single day's income/expense totals, before cumulative balances are
/// applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayActivity {
    pub date: NaiveDate,
    pub income: i64,
    pub expense: i64,
}

/// Collapses ledger rows (ordered or not) into one `DayActivity` per
/// calendar day, ascending.
pub fn group_by_day(rows: &[(NaiveDateTime, TransactionType, i64)]) -> Vec<DayActivity> {
    let mut days: Vec<DayActivity> = Vec::new();
    let mut sorted: Vec<_> = rows.to_vec();
    sorted.sort_by_key(|(at, _, _)| *at);

    for (at, transaction_type, amount) in sorted {
        let date = at.date();
        if days.last().map(|d| d.date) != Some(date) {
            days.push(DayActivity {
                date,
                income: 0,
                expense: 0,
            });
        }
        // last() just ensured the entry exists
        if let Some(day) = days.last_mut() {
            match transaction_type {
                TransactionType::Income => day.income += amount,
                TransactionType::Expense => day.expense += amount,
            }
        }
    }

    days
}

/// Walks day activities (ascending) and produces snapshot rows whose
/// balance carries the running total forward from `opening_balance`, the
/// net of all ledger history before the first day.
pub fn fold_daily_balances(
    user_id: &str,
    opening_balance: i64,
    days: &[DayActivity],
) -> Vec<DailyBalance> {
    let mut running = opening_balance;
    days.iter()
        .map(|day| {
            running += day.income - day.expense;
            DailyBalance {
                user_id: user_id.to_string(),
                date: day.date,
                income: day.income,
                expense: day.expense,
                balance: running,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn groups_rows_into_days() {
        let rows = vec![
            (at(2024, 1, 16), TransactionType::Expense, 30_000),
            (at(2024, 1, 15), TransactionType::Income, 100_000),
            (at(2024, 1, 15), TransactionType::Expense, 20_000),
        ];
        let days = group_by_day(&rows);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(days[0].income, 100_000);
        assert_eq!(days[0].expense, 20_000);
        assert_eq!(days[1].expense, 30_000);
    }

    #[test]
    fn fold_carries_the_running_balance() {
        let days = vec![
            DayActivity {
                date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                income: 100_000,
                expense: 30_000,
            },
            DayActivity {
                date: NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
                income: 0,
                expense: 50_000,
            },
        ];
        let rows = fold_daily_balances("u1", 10_000, &days);
        assert_eq!(rows[0].balance, 80_000);
        assert_eq!(rows[1].balance, 30_000);
    }

    #[test]
    fn consecutive_balances_differ_by_the_day_net() {
        let days = vec![
            DayActivity {
                date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                income: 5,
                expense: 3,
            },
            DayActivity {
                date: NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
                income: 7,
                expense: 11,
            },
        ];
        let rows = fold_daily_balances("u1", 0, &days);
        assert_eq!(rows[1].balance - rows[0].balance, 7 - 11);
    }
}
