//! Sample data use case

use crate::domain::calendar::CalendarStore;
use crate::domain::environment::DeviceStore;
use crate::domain::family::FamilyState;
use crate::domain::files::FileStore;
use crate::domain::finance::FinanceStore;
use crate::domain::health::HealthStore;
use crate::domain::intelligence::SignalStore;
use crate::domain::knowledge::BookStore;
use crate::domain::legacy::LegacyStore;
use crate::domain::mind_guard::GuardStore;
use crate::domain::network::NetworkState;
use crate::domain::productivity::TaskStore;
use crate::domain::spirituality::PrayerStore;
use crate::domain::system_logs::LogStore;
use crate::domain::Persisted;
use crate::error::Result;
use crate::infrastructure::FileSystemRepository;
use chrono::{DateTime, Utc};
use log::{debug, info};

/// Which snapshots were written and which were left alone
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub seeded: Vec<&'static str>,
    pub skipped: Vec<&'static str>,
}

/// Write sample data for every store.
///
/// With `only_empty`, stores that already hold records are skipped.
pub fn seed_workspace(
    repository: &FileSystemRepository,
    only_empty: bool,
    now: DateTime<Utc>,
) -> Result<SeedReport> {
    let mut report = SeedReport::default();
    let mut seeder = Seeder {
        repository,
        only_empty,
        now,
        report: &mut report,
    };

    seeder.seed::<TaskStore>()?;
    seeder.seed::<HealthStore>()?;
    seeder.seed::<FinanceStore>()?;
    seeder.seed::<FamilyState>()?;
    seeder.seed::<PrayerStore>()?;
    seeder.seed::<BookStore>()?;
    seeder.seed::<NetworkState>()?;
    seeder.seed::<SignalStore>()?;
    seeder.seed::<FileStore>()?;
    seeder.seed::<CalendarStore>()?;
    seeder.seed::<DeviceStore>()?;
    seeder.seed::<LegacyStore>()?;
    seeder.seed::<GuardStore>()?;
    seeder.seed::<LogStore>()?;

    info!(
        "event=seed seeded={} skipped={}",
        report.seeded.len(),
        report.skipped.len()
    );
    Ok(report)
}

struct Seeder<'a> {
    repository: &'a FileSystemRepository,
    only_empty: bool,
    now: DateTime<Utc>,
    report: &'a mut SeedReport,
}

impl Seeder<'_> {
    fn seed<S: Persisted>(&mut self) -> Result<()> {
        if self.only_empty {
            let current: S = self.repository.load()?;
            if !current.is_empty() {
                debug!("event=seed key={} status=skipped", S::KEY);
                self.report.skipped.push(S::KEY);
                return Ok(());
            }
        }

        self.repository.save(&S::seed(self.now))?;
        self.report.seeded.push(S::KEY);
        Ok(())
    }
}
