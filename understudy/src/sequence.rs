//! In-order verification across functions and doubles.
//!
//! A [`Sequence`] keeps a cursor into the session's invocation order. Each
//! successful [`InSequence`] verification moves the cursor to the call it
//! consumed, so the next verification only sees later calls.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::{
    ArgMatchers, Error, InvocationOrder, MemberId, MockFunction, Result, SequenceFailure,
    SequenceMismatch, Session, Verifier, WantedCall,
};

/// The last call a sequence consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Cursor {
    order: InvocationOrder,
    /// `None` while nothing has been consumed.
    function: Option<MemberId>,
}

/// An ordered verification over the calls of one session.
///
/// Clones share the same cursor.
///
/// ```rust
/// use understudy::{Session, args};
///
/// # fn main() -> understudy::Result {
/// let session = Session::default();
/// let a = session.mock_function("a");
/// let b = session.mock_function("b");
/// let order = session.sequence();
///
/// a.call(args![]);
/// b.call(args![]);
///
/// a.verify(order.at_least(1)?, args![])?;
/// b.verify(order.at_least(1)?, args![])?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Sequence {
    session: Session,
    cursor: Rc<RefCell<Cursor>>,
    created_at: InvocationOrder,
}

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("cursor", &self.cursor.borrow())
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl Sequence {
    pub(crate) fn new(session: Session) -> Self {
        let created_at = session.last_order();
        Self {
            session,
            cursor: Rc::new(RefCell::new(Cursor {
                order: InvocationOrder::ORIGIN,
                function: None,
            })),
            created_at,
        }
    }

    /// A verifier wanting at least `count` matching calls after the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSequenceCount`] if `count` is zero.
    pub fn at_least(&self, count: usize) -> Result<InSequence> {
        if count == 0 {
            return Err(Error::InvalidSequenceCount);
        }
        Ok(InSequence {
            sequence: self.clone(),
            count,
        })
    }

    /// Order of the last consumed call, or [`InvocationOrder::ORIGIN`].
    pub fn position(&self) -> InvocationOrder {
        self.cursor.borrow().order
    }

    /// Label of the function whose call was consumed last.
    pub fn last_consumed(&self) -> Option<MemberId> {
        self.cursor.borrow().function.clone()
    }
}

/// Verifier produced by [`Sequence::at_least`].
///
/// Passes when at least `count` matching calls happened after the
/// sequence's cursor. The cursor then moves to the `count`-th of them; later
/// calls remain available to the next verification. Sequence verification
/// never marks calls verified.
#[derive(Debug, Clone)]
pub struct InSequence {
    sequence: Sequence,
    count: usize,
}

impl InSequence {
    pub fn count(&self) -> usize {
        self.count
    }
}

impl Verifier for InSequence {
    fn verify_interactions(
        &self,
        function: &MockFunction,
        matchers: &ArgMatchers,
        describe_context: bool,
    ) -> Result {
        if !function.session().same_session(&self.sequence.session) {
            return Err(Error::ForeignSession);
        }

        let cursor = self.sequence.cursor.borrow().clone();
        let candidates: Vec<_> = function
            .log()
            .matching(matchers)
            .into_iter()
            .map(|(_, interaction)| interaction)
            .collect();
        let start = candidates.iter().position(|e| e.order() > cursor.order);

        let kind = match start {
            _ if candidates.is_empty() => SequenceFailure::NeverInvoked,
            Some(start) => match candidates[start..].get(self.count - 1) {
                Some(target) => {
                    tracing::debug!(
                        function = %function.label(),
                        count = self.count,
                        from = %cursor.order,
                        to = %target.order(),
                        "sequence advanced"
                    );
                    *self.sequence.cursor.borrow_mut() = Cursor {
                        order: target.order(),
                        function: Some(target.function().clone()),
                    };
                    return Ok(());
                }
                None => SequenceFailure::Insufficient {
                    count: self.count,
                    after: cursor.function.clone(),
                    actual: candidates.len() - start,
                },
            },
            None => match cursor.function.clone() {
                Some(after) => SequenceFailure::NotInvokedAfter {
                    count: self.count,
                    after,
                },
                None => SequenceFailure::Insufficient {
                    count: self.count,
                    after: None,
                    actual: 0,
                },
            },
        };

        tracing::debug!(
            function = %function.label(),
            count = self.count,
            cursor = %cursor.order,
            "sequence verification failed"
        );
        Err(SequenceMismatch {
            kind,
            wanted: WantedCall::of(function.label(), matchers, describe_context),
            interactions: self
                .sequence
                .session
                .interactions_after(self.sequence.created_at),
        }
        .into())
    }
}
