use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::{ArgMatchers, Interaction};

/// Append-only record of the calls made to one mock function.
///
/// Cloning the log clones the handle, not the entries: the mock function,
/// its session and any verifier all see the same record. Entries are never
/// removed; verification only flips their `verified` flag.
#[derive(Clone, Default)]
pub struct InteractionLog {
    entries: Rc<RefCell<Vec<Interaction>>>,
}

impl fmt::Debug for InteractionLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionLog")
            .field("entries", &self.len())
            .finish()
    }
}

impl InteractionLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&self, interaction: Interaction) {
        self.entries.borrow_mut().push(interaction);
    }

    /// Returns the number of recorded calls.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns true if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Returns a copy of every recorded call, in call order.
    pub fn snapshot(&self) -> Vec<Interaction> {
        self.entries.borrow().clone()
    }

    /// Returns the calls satisfying `matchers`, with their positions in the log.
    ///
    /// Matchers run against a snapshot, so a predicate may itself call into
    /// a mock without tripping over the log's borrow.
    pub(crate) fn matching(&self, matchers: &ArgMatchers) -> Vec<(usize, Interaction)> {
        self.snapshot()
            .into_iter()
            .enumerate()
            .filter(|(_, e)| matchers.matches(e.context(), e.args()))
            .collect()
    }

    /// Flags the entries at the given positions as verified.
    pub(crate) fn mark_verified(&self, positions: impl IntoIterator<Item = usize>) {
        let mut entries = self.entries.borrow_mut();
        for position in positions {
            if let Some(entry) = entries.get_mut(position) {
                entry.mark_verified();
            }
        }
    }

    /// Returns the number of calls no count verification has matched yet.
    pub fn unverified_count(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|e| !e.is_verified())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InvocationOrder, MemberId, Value, anything};

    fn record(log: &InteractionLog, order: u64, args: Vec<Value>) {
        log.append(Interaction::new(
            MemberId::new("func"),
            Value::Undefined,
            args,
            InvocationOrder::from(order),
        ));
    }

    fn sample_log() -> InteractionLog {
        let log = InteractionLog::new();
        record(&log, 1, vec![42.into(), "hi".into()]);
        record(&log, 2, vec![42.into()]);
        record(&log, 5, vec!["foo".into()]);
        log
    }

    #[test]
    fn snapshot_preserves_call_order() {
        let log = sample_log();
        let orders: Vec<u64> = log.snapshot().iter().map(|e| e.order().value()).collect();
        assert_eq!(orders, vec![1, 2, 5]);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn clones_share_entries() {
        let log = InteractionLog::new();
        let view = log.clone();
        record(&log, 1, vec![]);
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn matching_returns_positions() {
        let log = sample_log();
        let matchers = ArgMatchers::new(anything(), vec![42.into()]);
        let positions: Vec<usize> = log.matching(&matchers).into_iter().map(|(i, _)| i).collect();
        assert_eq!(positions, vec![0, 1]);
    }

    #[test]
    fn mark_verified_reduces_unverified_count() {
        let log = sample_log();
        assert_eq!(log.unverified_count(), 3);
        log.mark_verified([0, 2]);
        assert_eq!(log.unverified_count(), 1);
        assert!(log.snapshot()[0].is_verified());
        assert!(!log.snapshot()[1].is_verified());
    }

    #[test]
    fn mark_verified_ignores_unknown_positions() {
        let log = sample_log();
        log.mark_verified([10]);
        assert_eq!(log.unverified_count(), 3);
    }
}
