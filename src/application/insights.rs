//! Derived views across stores
//!
//! Read-mostly use cases that combine or aggregate records: the agenda,
//! signal digest, finance balance, contacts gone quiet, device toggling,
//! host checks and the system log.

use crate::application::records::RecordService;
use crate::domain::calendar::CalendarStore;
use crate::domain::environment::{Device, DeviceStore};
use crate::domain::family::FamilyState;
use crate::domain::finance::{Balance, FinanceStore};
use crate::domain::intelligence::{Signal, SignalCategory, SignalStore};
use crate::domain::mind_guard::{GuardRule, GuardStore};
use crate::domain::network::{NetworkState, Relationship};
use crate::domain::productivity::TaskStore;
use crate::domain::spirituality::PrayerStore;
use crate::domain::system_logs::{LogEntry, LogLevel, LogStore};
use crate::domain::StoreKind;
use crate::error::Result;
use crate::infrastructure::{FileSystemRepository, WorkspaceRepository};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use log::info;

/// Default quiet period before a contact counts as stale
pub const STALE_CONTACT_DAYS: u32 = 30;

/// One line of the combined agenda
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaItem {
    pub date: NaiveDate,
    /// `HH:MM` for timed calendar events
    pub time: Option<String>,
    pub label: String,
}

/// Dashboard counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overview {
    pub owner: String,
    pub counts: Vec<(StoreKind, usize)>,
    pub open_tasks: usize,
    pub unanswered_prayers: usize,
    pub unacknowledged_signals: usize,
}

pub struct InsightService {
    repository: FileSystemRepository,
}

impl InsightService {
    pub fn new(repository: FileSystemRepository) -> Self {
        InsightService { repository }
    }

    /// Calendar events, family events and birthdays within `days` of `now`.
    /// Without `days`, the configured window applies.
    pub fn upcoming(&self, days: Option<u32>, now: DateTime<Utc>) -> Result<Vec<AgendaItem>> {
        let days = match days {
            Some(days) => days,
            None => self.repository.load_config()?.upcoming_days,
        };
        let today = now.date_naive();

        let calendar: CalendarStore = self.repository.load()?;
        let family: FamilyState = self.repository.load()?;

        let mut items: Vec<AgendaItem> = calendar
            .upcoming(now, days)
            .into_iter()
            .map(|event| AgendaItem {
                date: event.starts_at.date_naive(),
                time: Some(event.starts_at.format("%H:%M").to_string()),
                label: match &event.location {
                    Some(location) => format!("{} @ {}", event.title, location),
                    None => event.title.clone(),
                },
            })
            .collect();

        items.extend(
            family
                .upcoming_events(today, days)
                .into_iter()
                .map(|event| AgendaItem {
                    date: event.date,
                    time: None,
                    label: format!("Family: {}", event.title),
                }),
        );

        for (date, member) in family.upcoming_birthdays(today, days) {
            let label = match member.birthday {
                Some(born) => format!("Birthday: {} (turns {})", member.name, date.year() - born.year()),
                None => format!("Birthday: {}", member.name),
            };
            items.push(AgendaItem {
                date,
                time: None,
                label,
            });
        }

        items.sort_by(|a, b| (a.date, &a.time).cmp(&(b.date, &b.time)));
        Ok(items)
    }

    /// Signals grouped by category, or one category alone
    pub fn signals(&self, category: Option<SignalCategory>) -> Result<Vec<(SignalCategory, Vec<Signal>)>> {
        let store: SignalStore = self.repository.load()?;
        let groups = match category {
            Some(category) => {
                let found: Vec<Signal> = store.by_category(category).into_iter().cloned().collect();
                if found.is_empty() {
                    Vec::new()
                } else {
                    vec![(category, found)]
                }
            }
            None => store
                .grouped()
                .into_iter()
                .map(|(category, signals)| (category, signals.into_iter().cloned().collect()))
                .collect(),
        };
        Ok(groups)
    }

    pub fn balance(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Balance> {
        let store: FinanceStore = self.repository.load()?;
        Ok(store.balance(from, to))
    }

    /// Relationships with no contact in the last `days` (30 by default)
    pub fn stale_contacts(&self, days: Option<u32>, now: DateTime<Utc>) -> Result<Vec<Relationship>> {
        let state: NetworkState = self.repository.load()?;
        let days = days.unwrap_or(STALE_CONTACT_DAYS);
        Ok(state
            .due_for_contact(now.date_naive(), days)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Flip a device's power and persist it
    pub fn toggle(&self, id: &str) -> Result<Device> {
        self.repository.mutate(|store: &mut DeviceStore| {
            let id = store.resolve(id)?;
            let device = store.modify(id.as_str(), Utc::now(), |d| {
                d.toggle();
            })?;
            info!("event=toggle kind=device powered={}", device.powered);
            Ok(device.clone())
        })
    }

    /// Active rules that block `host`; empty means allowed
    pub fn check_host(&self, host: &str) -> Result<Vec<GuardRule>> {
        let store: GuardStore = self.repository.load()?;
        Ok(store.matching(host).into_iter().cloned().collect())
    }

    pub fn logs(&self, min_level: LogLevel) -> Result<Vec<LogEntry>> {
        let store: LogStore = self.repository.load()?;
        Ok(store.at_or_above(min_level).into_iter().cloned().collect())
    }

    /// Drop every system log entry, returning how many were removed
    pub fn clear_logs(&self) -> Result<usize> {
        self.repository.mutate(|store: &mut LogStore| {
            let removed = store.clear();
            info!("event=clear key=system-logs removed={}", removed);
            Ok(removed)
        })
    }

    pub fn overview(&self) -> Result<Overview> {
        let config = self.repository.load_config()?;
        let records = RecordService::new(self.repository.clone());

        let counts = StoreKind::ALL
            .into_iter()
            .map(|kind| records.count(kind).map(|n| (kind, n)))
            .collect::<Result<Vec<_>>>()?;

        let tasks: TaskStore = self.repository.load()?;
        let prayers: PrayerStore = self.repository.load()?;
        let signals: SignalStore = self.repository.load()?;

        Ok(Overview {
            owner: config.owner,
            counts,
            open_tasks: tasks.open_tasks().len(),
            unanswered_prayers: prayers.unanswered().len(),
            unacknowledged_signals: signals.unacknowledged().len(),
        })
    }
}
