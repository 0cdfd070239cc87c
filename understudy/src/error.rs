use crate::{CountMismatch, RemainingInteractions, SequenceMismatch};

/// The single error type for all understudy operations.
///
/// Every fallible API returns `understudy::Result<T>` (alias for
/// `Result<T, understudy::Error>`). Verification failures carry their
/// structured payload boxed, so a test runner can inspect the failure kind,
/// the wanted call and the recorded interactions, or simply print the error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("The sequence verifier cannot verify sequences of length 0")]
    InvalidSequenceCount,

    #[error("{0}")]
    CountMismatch(Box<CountMismatch>),

    #[error("{0}")]
    SequenceMismatch(Box<SequenceMismatch>),

    #[error("{0}")]
    RemainingInteractions(Box<RemainingInteractions>),

    #[error("'{double}' has no member '{member}'")]
    UnknownMember { double: String, member: String },

    #[error("'{double}' declares member '{member}' more than once")]
    DuplicateMember { double: String, member: String },

    #[error("Sequence belongs to a different session than the verified function")]
    ForeignSession,
}

impl Error {
    pub(crate) fn unknown_member(double: &str, member: &str) -> Self {
        Error::UnknownMember {
            double: double.to_string(),
            member: member.to_string(),
        }
    }

    /// One-line summary of the failure, without the interaction listing.
    pub fn headline(&self) -> String {
        match self {
            Error::CountMismatch(m) => m.headline(),
            Error::SequenceMismatch(m) => m.headline(),
            Error::RemainingInteractions(m) => m.headline(),
            other => other.to_string(),
        }
    }
}

impl From<CountMismatch> for Error {
    fn from(mismatch: CountMismatch) -> Self {
        Error::CountMismatch(Box::new(mismatch))
    }
}

impl From<SequenceMismatch> for Error {
    fn from(mismatch: SequenceMismatch) -> Self {
        Error::SequenceMismatch(Box::new(mismatch))
    }
}

impl From<RemainingInteractions> for Error {
    fn from(remaining: RemainingInteractions) -> Self {
        Error::RemainingInteractions(Box::new(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CountFailure, MemberId, WantedCall};

    #[test]
    fn headline_of_plain_errors_is_display() {
        assert_eq!(
            Error::InvalidSequenceCount.headline(),
            "The sequence verifier cannot verify sequences of length 0"
        );
        assert_eq!(
            Error::unknown_member("obj", "wave").to_string(),
            "'obj' has no member 'wave'"
        );
    }

    #[test]
    fn headline_of_mismatch_omits_listing() {
        let err = Error::from(CountMismatch {
            kind: CountFailure::WantedButNotInvoked,
            wanted: WantedCall {
                function: MemberId::new("func"),
                args: Vec::new(),
                context: None,
            },
            interactions: Vec::new(),
        });
        assert_eq!(err.headline(), "Wanted but not invoked: func()");
        assert!(err.to_string().contains("Interactions are:"));
    }
}
