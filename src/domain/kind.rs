//! Addressable record collections

use crate::error::LifeosError;
use std::fmt;
use std::str::FromStr;

/// One record collection as addressed from the command line.
///
/// Several kinds may share a snapshot (family members and family events
/// both persist under `family`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    Tasks,
    Health,
    Transactions,
    FamilyMembers,
    FamilyEvents,
    Prayers,
    Books,
    Relationships,
    Interactions,
    Signals,
    Files,
    Events,
    Devices,
    Legacy,
    Guards,
    Logs,
}

impl StoreKind {
    pub const ALL: [StoreKind; 16] = [
        StoreKind::Tasks,
        StoreKind::Health,
        StoreKind::Transactions,
        StoreKind::FamilyMembers,
        StoreKind::FamilyEvents,
        StoreKind::Prayers,
        StoreKind::Books,
        StoreKind::Relationships,
        StoreKind::Interactions,
        StoreKind::Signals,
        StoreKind::Files,
        StoreKind::Events,
        StoreKind::Devices,
        StoreKind::Legacy,
        StoreKind::Guards,
        StoreKind::Logs,
    ];

    /// Canonical command-line name
    pub fn name(&self) -> &'static str {
        match self {
            StoreKind::Tasks => "tasks",
            StoreKind::Health => "health",
            StoreKind::Transactions => "transactions",
            StoreKind::FamilyMembers => "members",
            StoreKind::FamilyEvents => "family-events",
            StoreKind::Prayers => "prayers",
            StoreKind::Books => "books",
            StoreKind::Relationships => "relationships",
            StoreKind::Interactions => "interactions",
            StoreKind::Signals => "signals",
            StoreKind::Files => "files",
            StoreKind::Events => "events",
            StoreKind::Devices => "devices",
            StoreKind::Legacy => "legacy",
            StoreKind::Guards => "guards",
            StoreKind::Logs => "logs",
        }
    }

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            StoreKind::Tasks => &["task", "productivity"],
            StoreKind::Health => &["metrics", "metric"],
            StoreKind::Transactions => &["transaction", "finance", "tx"],
            StoreKind::FamilyMembers => &["member", "family", "family-members"],
            StoreKind::FamilyEvents => &["family-event"],
            StoreKind::Prayers => &["prayer", "spirituality"],
            StoreKind::Books => &["book", "knowledge", "reading"],
            StoreKind::Relationships => &["relationship", "contacts", "network", "people"],
            StoreKind::Interactions => &["interaction"],
            StoreKind::Signals => &["signal", "intelligence"],
            StoreKind::Files => &["file"],
            StoreKind::Events => &["event", "calendar"],
            StoreKind::Devices => &["device", "environment"],
            StoreKind::Legacy => &["legacy-entries"],
            StoreKind::Guards => &["guard", "mind-guard", "rules"],
            StoreKind::Logs => &["log", "system-logs"],
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StoreKind::Tasks => "to-dos with priority and due date",
            StoreKind::Health => "health measurements (weight, sleep, steps, ...)",
            StoreKind::Transactions => "income and expenses in cents",
            StoreKind::FamilyMembers => "family members and birthdays",
            StoreKind::FamilyEvents => "family occasions",
            StoreKind::Prayers => "prayer journal",
            StoreKind::Books => "reading list",
            StoreKind::Relationships => "people in your network",
            StoreKind::Interactions => "calls, messages and meetings with people",
            StoreKind::Signals => "world-intelligence signals by category",
            StoreKind::Files => "file catalogue",
            StoreKind::Events => "calendar events",
            StoreKind::Devices => "home environment devices",
            StoreKind::Legacy => "letters, wishes and instructions",
            StoreKind::Guards => "distraction blocking rules",
            StoreKind::Logs => "system log entries",
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StoreKind {
    type Err = LifeosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        StoreKind::ALL
            .into_iter()
            .find(|k| k.name() == wanted || k.aliases().contains(&wanted.as_str()))
            .ok_or_else(|| LifeosError::UnknownKind(s.to_string()))
    }
}
