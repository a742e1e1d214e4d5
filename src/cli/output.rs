//! Output formatting utilities

use crate::application::{AgendaItem, Overview, RecordRow};
use crate::domain::finance::{Balance, Cents};
use crate::domain::intelligence::{Signal, SignalCategory};
use crate::domain::{Record, StoreKind};

const SHORT_ID_LEN: usize = 8;

/// Leading characters of an id, enough to address it in most workspaces
pub fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

/// Format record rows for display
pub fn format_rows(rows: &[RecordRow]) -> String {
    if rows.is_empty() {
        return "No records found".to_string();
    }

    let mut output = String::new();
    for row in rows {
        output.push_str(&format!("{}  {}\n", short_id(&row.id), row.summary));
    }
    output
}

pub fn format_records<R: Record>(records: &[R]) -> String {
    let rows: Vec<RecordRow> = records.iter().map(RecordRow::of).collect();
    format_rows(&rows)
}

pub fn format_kinds() -> String {
    let mut output = String::new();
    for kind in StoreKind::ALL {
        output.push_str(&format!("{:<14} {}\n", kind.name(), kind.description()));
    }
    output
}

pub fn format_agenda(items: &[AgendaItem]) -> String {
    if items.is_empty() {
        return "Nothing upcoming".to_string();
    }

    let mut output = String::new();
    for item in items {
        let time = item.time.as_deref().unwrap_or("     ");
        output.push_str(&format!(
            "{} {}  {}\n",
            item.date.format("%d-%m-%Y"),
            time,
            item.label
        ));
    }
    output
}

pub fn format_signals(groups: &[(SignalCategory, Vec<Signal>)]) -> String {
    if groups.is_empty() {
        return "No signals found".to_string();
    }

    let mut output = String::new();
    for (category, signals) in groups {
        output.push_str(&format!("#{}\n", category));
        for signal in signals {
            output.push_str(&format!("  {}  {}\n", short_id(signal.id.as_str()), signal.summary()));
        }
    }
    output
}

pub fn format_balance(balance: &Balance) -> String {
    format!(
        "Income:  {}\nExpense: {}\nNet:     {}\n",
        Cents(balance.income_cents),
        Cents(balance.expense_cents),
        Cents(balance.net_cents())
    )
}

pub fn format_overview(overview: &Overview) -> String {
    let mut output = format!("lifeos for {}\n\n", overview.owner);
    for (kind, count) in &overview.counts {
        output.push_str(&format!("{:<14} {:>5}\n", kind.name(), count));
    }
    output.push_str(&format!(
        "\nOpen tasks: {}\nUnanswered prayers: {}\nUnacknowledged signals: {}\n",
        overview.open_tasks, overview.unanswered_prayers, overview.unacknowledged_signals
    ));
    output
}
