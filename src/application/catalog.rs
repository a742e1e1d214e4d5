//! Maps a `StoreKind` to its persisted state and record collection

use crate::domain::calendar::CalendarEvent;
use crate::domain::environment::Device;
use crate::domain::family::FamilyState;
use crate::domain::files::FileItem;
use crate::domain::finance::Transaction;
use crate::domain::health::HealthMetric;
use crate::domain::intelligence::Signal;
use crate::domain::knowledge::Book;
use crate::domain::legacy::LegacyEntry;
use crate::domain::mind_guard::GuardRule;
use crate::domain::network::NetworkState;
use crate::domain::productivity::Task;
use crate::domain::spirituality::Prayer;
use crate::domain::system_logs::LogEntry;
use crate::domain::{Persisted, Record, Store, StoreKind};
use crate::error::Result;

/// Operation run against one record collection inside a persisted state
pub trait CollectionVisitor {
    type Output;

    fn visit<S, R>(self, select: fn(&mut S) -> &mut Store<R>) -> Result<Self::Output>
    where
        S: Persisted,
        R: Record;
}

/// Selector for states that are a single record list
pub fn whole<R>(store: &mut Store<R>) -> &mut Store<R> {
    store
}

/// Run `visitor` against the collection `kind` names
pub fn dispatch<V: CollectionVisitor>(kind: StoreKind, visitor: V) -> Result<V::Output> {
    match kind {
        StoreKind::Tasks => visitor.visit(whole::<Task>),
        StoreKind::Health => visitor.visit(whole::<HealthMetric>),
        StoreKind::Transactions => visitor.visit(whole::<Transaction>),
        StoreKind::FamilyMembers => visitor.visit(FamilyState::members_mut),
        StoreKind::FamilyEvents => visitor.visit(FamilyState::events_mut),
        StoreKind::Prayers => visitor.visit(whole::<Prayer>),
        StoreKind::Books => visitor.visit(whole::<Book>),
        StoreKind::Relationships => visitor.visit(NetworkState::relationships_mut),
        StoreKind::Interactions => visitor.visit(NetworkState::interactions_mut),
        StoreKind::Signals => visitor.visit(whole::<Signal>),
        StoreKind::Files => visitor.visit(whole::<FileItem>),
        StoreKind::Events => visitor.visit(whole::<CalendarEvent>),
        StoreKind::Devices => visitor.visit(whole::<Device>),
        StoreKind::Legacy => visitor.visit(whole::<LegacyEntry>),
        StoreKind::Guards => visitor.visit(whole::<GuardRule>),
        StoreKind::Logs => visitor.visit(whole::<LogEntry>),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Describe;

    impl CollectionVisitor for Describe {
        type Output = (&'static str, &'static str);

        fn visit<S, R>(self, _select: fn(&mut S) -> &mut Store<R>) -> Result<Self::Output>
        where
            S: Persisted,
            R: Record,
        {
            Ok((S::KEY, R::KIND))
        }
    }

    #[test]
    fn test_every_kind_maps_to_a_collection() {
        for kind in StoreKind::ALL {
            let (key, record) = dispatch(kind, Describe).unwrap();
            assert!(!key.is_empty());
            assert!(!record.is_empty());
        }
    }

    #[test]
    fn test_shared_snapshots() {
        assert_eq!(dispatch(StoreKind::FamilyMembers, Describe).unwrap(), ("family", "family member"));
        assert_eq!(dispatch(StoreKind::FamilyEvents, Describe).unwrap(), ("family", "family event"));
        assert_eq!(dispatch(StoreKind::Interactions, Describe).unwrap(), ("network", "interaction"));
        assert_eq!(dispatch(StoreKind::Guards, Describe).unwrap(), ("mind-guard", "guard rule"));
    }
}
