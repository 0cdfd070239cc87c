//! Verification strategies.
//!
//! A [`Verifier`] decides whether the calls recorded on a mock function
//! satisfy a matcher set. [`Times`] counts matching calls; the in-order
//! verifier lives in [`sequence`](crate::Sequence). The aggregate checks
//! [`verify_zero_interactions`] and [`verify_no_more_interactions`] work on
//! anything implementing [`Mock`].

use crate::{
    ArgMatchers, CountFailure, CountMismatch, Double, MockFunction, RemainingInteractions,
    Result, WantedCall,
};

/// Checks the calls of one mock function against a matcher set.
///
/// `describe_context` is set when the caller supplied an explicit receiver
/// matcher, so failure messages can mention it.
pub trait Verifier {
    /// # Errors
    ///
    /// Returns a verification failure when the recorded calls do not satisfy
    /// the verifier.
    fn verify_interactions(
        &self,
        function: &MockFunction,
        matchers: &ArgMatchers,
        describe_context: bool,
    ) -> Result;
}

impl<V: Verifier + ?Sized> Verifier for &V {
    fn verify_interactions(
        &self,
        function: &MockFunction,
        matchers: &ArgMatchers,
        describe_context: bool,
    ) -> Result {
        (**self).verify_interactions(function, matchers, describe_context)
    }
}

/// Exactly `wanted` matching calls.
///
/// On success every matching call is marked verified, which is what
/// [`verify_no_more_interactions`] checks against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Times {
    wanted: usize,
}

impl Times {
    pub fn wanted(&self) -> usize {
        self.wanted
    }
}

/// Exactly `n` matching calls.
pub fn times(n: usize) -> Times {
    Times { wanted: n }
}

/// Exactly one matching call.
pub fn once() -> Times {
    times(1)
}

/// No matching call.
pub fn never() -> Times {
    times(0)
}

impl Verifier for Times {
    fn verify_interactions(
        &self,
        function: &MockFunction,
        matchers: &ArgMatchers,
        describe_context: bool,
    ) -> Result {
        let log = function.log();
        let matched = log.matching(matchers);

        if matched.len() == self.wanted {
            log.mark_verified(matched.iter().map(|(position, _)| *position));
            tracing::debug!(
                function = %function.label(),
                wanted = self.wanted,
                "count verified"
            );
            return Ok(());
        }

        let mismatch = CountMismatch {
            kind: CountFailure::classify(self.wanted, matched.len()),
            wanted: WantedCall::of(function.label(), matchers, describe_context),
            interactions: log.snapshot(),
        };
        tracing::debug!(
            function = %function.label(),
            wanted = self.wanted,
            actual = matched.len(),
            "count verification failed"
        );
        Err(mismatch.into())
    }
}

/// Something made of mock functions: a [`Double`] or a single
/// [`MockFunction`].
pub trait Mock {
    /// The mock functions to check, in declaration order.
    fn mock_functions(&self) -> Vec<MockFunction>;
}

impl Mock for MockFunction {
    fn mock_functions(&self) -> Vec<MockFunction> {
        vec![self.clone()]
    }
}

/// Direct members only; nested doubles are checked on their own.
impl Mock for Double {
    fn mock_functions(&self) -> Vec<MockFunction> {
        self.members().map(|(_, f)| f.clone()).collect()
    }
}

impl<M: Mock + ?Sized> Mock for &M {
    fn mock_functions(&self) -> Vec<MockFunction> {
        (**self).mock_functions()
    }
}

/// Fails if any function of `mock` was called at all.
///
/// Equivalent to verifying `never()` with any receiver and any arguments on
/// each function; matching nothing, it marks nothing verified.
///
/// # Errors
///
/// Returns [`Error::CountMismatch`](crate::Error::CountMismatch) for the
/// first function that was called.
pub fn verify_zero_interactions(mock: impl Mock) -> Result {
    let any = ArgMatchers::any();
    for function in mock.mock_functions() {
        never().verify_interactions(&function, &any, false)?;
    }
    Ok(())
}

/// Fails if any function of `mock` has calls no count verification matched.
///
/// # Errors
///
/// Returns [`Error::RemainingInteractions`](crate::Error::RemainingInteractions)
/// for the first function with unverified calls.
pub fn verify_no_more_interactions(mock: impl Mock) -> Result {
    for function in mock.mock_functions() {
        let remaining = function.log().unverified_count();
        if remaining > 0 {
            tracing::debug!(
                function = %function.label(),
                remaining,
                "unverified interactions remain"
            );
            return Err(RemainingInteractions {
                function: function.label().clone(),
                remaining,
                interactions: function.interactions(),
            }
            .into());
        }
    }
    Ok(())
}
