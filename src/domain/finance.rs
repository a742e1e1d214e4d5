//! Money in and out, stored as integer cents

use crate::domain::record::{merge, Record, RecordId, Timestamps};
use crate::domain::store::{Persisted, Store};
use crate::domain::tags::normalize_tags;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    Income,
    Expense,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: RecordId,
    pub description: String,
    /// Always positive; `flow` carries the sign
    pub amount_cents: i64,
    pub flow: Flow,
    pub category: String,
    pub date: NaiveDate,
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub stamps: Timestamps,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransactionDraft {
    pub description: String,
    #[serde(deserialize_with = "amount")]
    pub amount_cents: i64,
    pub flow: Flow,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_category() -> String {
    "uncategorized".to_string()
}

/// Amounts must have a representable magnitude; `i64::MIN` does not
fn amount<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let cents = i64::deserialize(deserializer)?;
    if cents == i64::MIN {
        return Err(de::Error::custom(format!("amount_cents {} is out of range", cents)));
    }
    Ok(cents)
}

fn optional_amount<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    amount(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransactionPatch {
    pub description: Option<String>,
    #[serde(default, deserialize_with = "optional_amount")]
    pub amount_cents: Option<i64>,
    pub flow: Option<Flow>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub tags: Option<Vec<String>>,
}

impl Transaction {
    /// Amount with sign applied (expenses negative)
    pub fn signed_cents(&self) -> i64 {
        match self.flow {
            Flow::Income => self.amount_cents,
            Flow::Expense => self.amount_cents.saturating_neg(),
        }
    }
}

impl Record for Transaction {
    type Draft = TransactionDraft;
    type Patch = TransactionPatch;
    const KIND: &'static str = "transaction";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn create(id: RecordId, draft: TransactionDraft, now: DateTime<Utc>) -> Self {
        Transaction {
            id,
            description: draft.description,
            amount_cents: draft.amount_cents.saturating_abs(),
            flow: draft.flow,
            category: draft.category,
            date: draft.date.unwrap_or_else(|| now.date_naive()),
            tags: normalize_tags(draft.tags),
            stamps: Timestamps::new(now),
        }
    }

    fn apply(&mut self, patch: TransactionPatch) {
        merge(&mut self.description, patch.description);
        merge(&mut self.amount_cents, patch.amount_cents.map(i64::saturating_abs));
        merge(&mut self.flow, patch.flow);
        merge(&mut self.category, patch.category);
        merge(&mut self.date, patch.date);
        merge(&mut self.tags, patch.tags.map(normalize_tags));
    }

    fn timestamps(&self) -> &Timestamps {
        &self.stamps
    }

    fn timestamps_mut(&mut self) -> &mut Timestamps {
        &mut self.stamps
    }

    fn summary(&self) -> String {
        format!(
            "{}  {:>12}  {} [{}]",
            self.date.format("%d-%m-%Y"),
            Cents(self.signed_cents()).to_string(),
            self.description,
            self.category
        )
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Cents rendered as a decimal amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cents(pub i64);

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// Totals over a set of transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Balance {
    pub income_cents: i64,
    pub expense_cents: i64,
}

impl Balance {
    pub fn net_cents(&self) -> i64 {
        self.income_cents.saturating_sub(self.expense_cents)
    }
}

pub type FinanceStore = Store<Transaction>;

impl Persisted for Store<Transaction> {
    const KEY: &'static str = "finance";

    fn seed(now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let tx = |description: &str, amount_cents, flow, category: &str, days_ago: i64| {
            TransactionDraft {
                description: description.to_string(),
                amount_cents,
                flow,
                category: category.to_string(),
                date: Some(today - Duration::days(days_ago)),
                tags: Vec::new(),
            }
        };
        let drafts = vec![
            tx("Salary", 420_000, Flow::Income, "salary", 12),
            tx("Rent", 145_000, Flow::Expense, "housing", 10),
            tx("Groceries", 8_645, Flow::Expense, "food", 3),
            tx("Electricity", 6_210, Flow::Expense, "utilities", 2),
            tx("Book sale", 1_500, Flow::Income, "side", 1),
        ];
        Store::seeded(drafts, now)
    }

    fn record_count(&self) -> usize {
        self.len()
    }
}

impl Store<Transaction> {
    /// Totals for transactions dated within the inclusive range
    pub fn balance(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Balance {
        self.iter()
            .filter(|t| from.map_or(true, |f| t.date >= f) && to.map_or(true, |e| t.date <= e))
            .fold(Balance::default(), |mut acc, t| {
                let total = match t.flow {
                    Flow::Income => &mut acc.income_cents,
                    Flow::Expense => &mut acc.expense_cents,
                };
                *total = total.saturating_add(t.amount_cents);
                acc
            })
    }

    pub fn by_category(&self, category: &str) -> Vec<&Transaction> {
        self.filter(|t| t.category.eq_ignore_ascii_case(category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 20, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_cents_display() {
        assert_eq!(Cents(123_456).to_string(), "1234.56");
        assert_eq!(Cents(-5).to_string(), "-0.05");
        assert_eq!(Cents(0).to_string(), "0.00");
    }

    #[test]
    fn test_negative_draft_amount_is_normalized() {
        let draft: TransactionDraft = serde_json::from_value(serde_json::json!({
            "description": "Coffee",
            "amount_cents": -450,
            "flow": "expense"
        }))
        .unwrap();
        let mut store = FinanceStore::new();
        let tx = store.add(draft, now());
        assert_eq!(tx.amount_cents, 450);
        assert_eq!(tx.signed_cents(), -450);
        assert_eq!(tx.category, "uncategorized");
    }

    #[test]
    fn test_balance_over_everything() {
        let store = FinanceStore::seed(now());
        let balance = store.balance(None, None);
        assert_eq!(balance.income_cents, 421_500);
        assert_eq!(balance.expense_cents, 159_855);
        assert_eq!(balance.net_cents(), 261_645);
    }

    #[test]
    fn test_balance_range_is_inclusive() {
        let store = FinanceStore::seed(now());
        let today = now().date_naive();
        let balance = store.balance(Some(today - Duration::days(3)), Some(today - Duration::days(2)));
        assert_eq!(balance.income_cents, 0);
        assert_eq!(balance.expense_cents, 8_645 + 6_210);
    }

    #[test]
    fn test_by_category_ignores_case() {
        let store = FinanceStore::seed(now());
        assert_eq!(store.by_category("FOOD").len(), 1);
    }

    #[test]
    fn test_unrepresentable_amount_is_rejected() {
        let draft = serde_json::from_value::<TransactionDraft>(serde_json::json!({
            "description": "Bogus",
            "amount_cents": i64::MIN,
            "flow": "expense"
        }));
        assert!(draft.unwrap_err().to_string().contains("out of range"));

        let patch = serde_json::from_value::<TransactionPatch>(serde_json::json!({
            "amount_cents": i64::MIN
        }));
        assert!(patch.is_err());

        let patch: TransactionPatch =
            serde_json::from_value(serde_json::json!({"amount_cents": -75})).unwrap();
        assert_eq!(patch.amount_cents, Some(-75));
        let omitted: TransactionPatch = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(omitted.amount_cents, None);
    }

    #[test]
    fn test_balance_saturates_on_huge_totals() {
        let mut store = FinanceStore::new();
        let huge = [
            (Flow::Income, i64::MAX),
            (Flow::Income, i64::MAX),
            (Flow::Expense, -i64::MAX),
        ];
        for (flow, cents) in huge {
            store.add(
                TransactionDraft {
                    description: "Huge".to_string(),
                    amount_cents: cents,
                    flow,
                    category: default_category(),
                    date: None,
                    tags: Vec::new(),
                },
                now(),
            );
        }
        let balance = store.balance(None, None);
        assert_eq!(balance.income_cents, i64::MAX);
        assert_eq!(balance.expense_cents, i64::MAX);
        assert_eq!(balance.net_cents(), 0);

        let lopsided = Balance {
            income_cents: 0,
            expense_cents: i64::MAX,
        };
        assert_eq!(lopsided.net_cents(), -i64::MAX);
    }
}
