//! Structured verification failures.
//!
//! Each failure carries what a reporter needs to explain it: the function
//! label, the wanted call rendered as matcher descriptions, and everything
//! that did happen. [`headline`](CountMismatch::headline) gives the one-line
//! message; `Display` adds the interaction listing.

use std::fmt;

use crate::{ArgMatchers, Interaction, MemberId};

/// Why a count verification failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountFailure {
    /// No call matched.
    WantedButNotInvoked,
    /// Zero calls were wanted but some matched.
    NeverWantedButInvoked { actual: usize },
    /// One call was wanted.
    WantedOnce { actual: usize },
    /// `wanted` calls were wanted.
    WantedTimes { wanted: usize, actual: usize },
}

impl CountFailure {
    pub(crate) fn classify(wanted: usize, actual: usize) -> Self {
        match (wanted, actual) {
            (_, 0) => CountFailure::WantedButNotInvoked,
            (0, actual) => CountFailure::NeverWantedButInvoked { actual },
            (1, actual) => CountFailure::WantedOnce { actual },
            (wanted, actual) => CountFailure::WantedTimes { wanted, actual },
        }
    }
}

impl fmt::Display for CountFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountFailure::WantedButNotInvoked => write!(f, "Wanted but not invoked"),
            CountFailure::NeverWantedButInvoked { .. } => write!(f, "Never wanted but invoked"),
            CountFailure::WantedOnce { actual } => {
                write!(f, "Wanted 1 invocation but got {actual}")
            }
            CountFailure::WantedTimes { wanted, actual } => {
                write!(f, "Wanted {wanted} invocations but got {actual}")
            }
        }
    }
}

/// The wanted call: `function(<matcher>, ...)`, optionally with the receiver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WantedCall {
    pub function: MemberId,
    pub args: Vec<String>,
    /// Set when the call was verified through an explicit-context form.
    pub context: Option<String>,
}

impl WantedCall {
    pub(crate) fn of(function: &MemberId, matchers: &ArgMatchers, describe_context: bool) -> Self {
        Self {
            function: function.clone(),
            args: matchers.describe_args(),
            context: describe_context.then(|| matchers.context().description().to_string()),
        }
    }
}

impl fmt::Display for WantedCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.function)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "<{arg}>")?;
        }
        write!(f, ")")?;
        if let Some(context) = &self.context {
            write!(f, ", 'this' being {context}")?;
        }
        Ok(())
    }
}

fn write_interactions(f: &mut fmt::Formatter<'_>, interactions: &[Interaction]) -> fmt::Result {
    write!(f, "\n\nInteractions are:")?;
    for interaction in interactions {
        write!(f, "\n\t{interaction}")?;
    }
    Ok(())
}

/// A `times`/`once`/`never` verification did not hold.
#[derive(Debug, Clone, PartialEq)]
pub struct CountMismatch {
    pub kind: CountFailure,
    pub wanted: WantedCall,
    /// Every call made to the function, matching or not.
    pub interactions: Vec<Interaction>,
}

impl CountMismatch {
    pub fn headline(&self) -> String {
        format!("{}: {}", self.kind, self.wanted)
    }
}

impl fmt::Display for CountMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.wanted)?;
        write_interactions(f, &self.interactions)
    }
}

/// Unverified calls remained on a function.
#[derive(Debug, Clone, PartialEq)]
pub struct RemainingInteractions {
    pub function: MemberId,
    pub remaining: usize,
    pub interactions: Vec<Interaction>,
}

impl RemainingInteractions {
    pub fn headline(&self) -> String {
        format!(
            "No interactions wanted, but {} remains: {}()",
            self.remaining, self.function
        )
    }
}

impl fmt::Display for RemainingInteractions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.headline())?;
        write_interactions(f, &self.interactions)
    }
}

/// Why a sequence verification failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceFailure {
    /// No call matched at all.
    NeverInvoked,
    /// Every matching call happened at or before the sequence cursor.
    NotInvokedAfter { count: usize, after: MemberId },
    /// Fewer than `count` matching calls happened after the cursor.
    /// `after` is `None` while the cursor is still at the start.
    Insufficient {
        count: usize,
        after: Option<MemberId>,
        actual: usize,
    },
}

/// An in-sequence verification did not hold.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceMismatch {
    pub kind: SequenceFailure,
    pub wanted: WantedCall,
    /// Every call recorded in the session since the sequence was created.
    pub interactions: Vec<Interaction>,
}

impl SequenceMismatch {
    pub fn headline(&self) -> String {
        let wanted = &self.wanted;
        match &self.kind {
            SequenceFailure::NeverInvoked => format!("Expected but never invoked: {wanted}"),
            SequenceFailure::NotInvokedAfter { count, after } => format!(
                "Expected {wanted} to be invoked at least {count} times after invoking {after}()"
            ),
            SequenceFailure::Insufficient {
                count,
                after: None,
                actual,
            } => format!("Expected {wanted} to be invoked at least {count} times but got {actual}"),
            SequenceFailure::Insufficient {
                count,
                after: Some(after),
                actual,
            } => format!(
                "Expected {wanted} to be invoked at least {count} times \
                 after invoking {after}() but got {actual}"
            ),
        }
    }
}

impl fmt::Display for SequenceMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.headline())?;
        if self.interactions.is_empty() {
            write!(
                f,
                "\n\nNo interactions were recorded since the sequence was created.\
                 \nHint: create the sequence before exercising the code under test."
            )
        } else {
            write_interactions(f, &self.interactions)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InvocationOrder, Value};

    fn wanted(function: &str, args: &[&str]) -> WantedCall {
        WantedCall {
            function: MemberId::new(function),
            args: args.iter().map(|a| a.to_string()).collect(),
            context: None,
        }
    }

    #[test]
    fn classify_covers_every_kind() {
        assert_eq!(CountFailure::classify(3, 0), CountFailure::WantedButNotInvoked);
        assert_eq!(
            CountFailure::classify(0, 2),
            CountFailure::NeverWantedButInvoked { actual: 2 }
        );
        assert_eq!(CountFailure::classify(1, 3), CountFailure::WantedOnce { actual: 3 });
        assert_eq!(
            CountFailure::classify(2, 1),
            CountFailure::WantedTimes { wanted: 2, actual: 1 }
        );
    }

    #[test]
    fn count_headline_renders_matchers() {
        let mismatch = CountMismatch {
            kind: CountFailure::NeverWantedButInvoked { actual: 1 },
            wanted: wanted("func", &["equal to 42", "equal to \"hi\""]),
            interactions: Vec::new(),
        };
        assert_eq!(
            mismatch.headline(),
            "Never wanted but invoked: func(<equal to 42>, <equal to \"hi\">)"
        );
    }

    #[test]
    fn wanted_call_mentions_context() {
        let mut call = wanted("obj.greeting", &[]);
        call.context = Some("same instance as [object obj]".to_string());
        assert_eq!(
            call.to_string(),
            "obj.greeting(), 'this' being same instance as [object obj]"
        );
    }

    #[test]
    fn display_lists_interactions() {
        let mismatch = CountMismatch {
            kind: CountFailure::WantedButNotInvoked,
            wanted: wanted("func", &["equal to \"foo\""]),
            interactions: vec![Interaction::new(
                MemberId::new("func"),
                Value::Undefined,
                vec![Value::Int(42)],
                InvocationOrder::from(1),
            )],
        };
        assert_eq!(
            mismatch.to_string(),
            "Wanted but not invoked: func(<equal to \"foo\">)\n\nInteractions are:\n\tfunc(42)"
        );
    }

    #[test]
    fn remaining_headline() {
        let remaining = RemainingInteractions {
            function: MemberId::new("obj.farewell"),
            remaining: 1,
            interactions: Vec::new(),
        };
        assert_eq!(
            remaining.headline(),
            "No interactions wanted, but 1 remains: obj.farewell()"
        );
    }

    #[test]
    fn sequence_headlines() {
        let after = MemberId::new("obj.b");
        let cases = [
            (SequenceFailure::NeverInvoked, "Expected but never invoked: obj.a()"),
            (
                SequenceFailure::NotInvokedAfter {
                    count: 1,
                    after: after.clone(),
                },
                "Expected obj.a() to be invoked at least 1 times after invoking obj.b()",
            ),
            (
                SequenceFailure::Insufficient {
                    count: 2,
                    after: None,
                    actual: 1,
                },
                "Expected obj.a() to be invoked at least 2 times but got 1",
            ),
            (
                SequenceFailure::Insufficient {
                    count: 2,
                    after: Some(after),
                    actual: 1,
                },
                "Expected obj.a() to be invoked at least 2 times after invoking obj.b() but got 1",
            ),
        ];
        for (kind, expected) in cases {
            let mismatch = SequenceMismatch {
                kind,
                wanted: wanted("obj.a", &[]),
                interactions: Vec::new(),
            };
            assert_eq!(mismatch.headline(), expected);
        }
    }

    #[test]
    fn sequence_display_hints_when_nothing_recorded() {
        let mismatch = SequenceMismatch {
            kind: SequenceFailure::NeverInvoked,
            wanted: wanted("obj.c", &[]),
            interactions: Vec::new(),
        };
        assert!(mismatch.to_string().contains("Hint: create the sequence"));
    }
}
