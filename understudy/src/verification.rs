//! Member-addressed stubbing and verification for doubles.
//!
//! [`when`] and [`verify`] select a double; the returned view then names a
//! member and its argument matchers:
//!
//! ```rust
//! use understudy::{Session, Template, Value, anything, args, never, verify, verify_with, when};
//!
//! # fn main() -> understudy::Result {
//! let session = Session::default();
//! let obj = session.double(Template::new("obj").method("greeting").method("farewell"))?;
//!
//! when(&obj).call("farewell", args!["hunter", anything()])?.then_return("bye");
//!
//! assert_eq!(obj.call("farewell", args!["hunter", "thompson"])?, Value::from("bye"));
//! verify(&obj).call("farewell", args!["hunter", "thompson"])?;
//! verify_with(&obj, never()).call("greeting", args![])?;
//! # Ok(())
//! # }
//! ```

use crate::{Double, Matcher, Result, StubBuilder, Times, Verifier, once};

/// Stubbing view over a double. Created by [`when`].
#[derive(Debug, Clone, Copy)]
pub struct When<'a> {
    double: &'a Double,
}

/// Start stubbing a member of `double`.
pub fn when(double: &Double) -> When<'_> {
    When { double }
}

impl When<'_> {
    /// Stub calls to `member` made with the double as receiver.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMember`](crate::Error::UnknownMember) if the
    /// double has no such member.
    pub fn call(&self, member: &str, args: Vec<Matcher>) -> Result<StubBuilder> {
        Ok(self.double.member(member)?.when(args))
    }

    /// Stub calls to `member` whose receiver matches `context`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMember`](crate::Error::UnknownMember) if the
    /// double has no such member.
    pub fn call_on(
        &self,
        context: impl Into<Matcher>,
        member: &str,
        args: Vec<Matcher>,
    ) -> Result<StubBuilder> {
        Ok(self.double.member(member)?.when_on(context, args))
    }
}

/// Verification view over a double. Created by [`verify`] and
/// [`verify_with`].
#[derive(Debug, Clone)]
pub struct Verification<'a, V> {
    double: &'a Double,
    verifier: V,
}

/// Verify that a member of `double` was called exactly once.
pub fn verify(double: &Double) -> Verification<'_, Times> {
    verify_with(double, once())
}

/// Verify a member of `double` with an explicit verifier, such as
/// [`times`](crate::times) or [`Sequence::at_least`](crate::Sequence::at_least).
pub fn verify_with<V: Verifier>(double: &Double, verifier: V) -> Verification<'_, V> {
    Verification { double, verifier }
}

impl<V: Verifier> Verification<'_, V> {
    /// Verify calls to `member` made with the double as receiver.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMember`](crate::Error::UnknownMember) or the
    /// verifier's failure.
    pub fn call(&self, member: &str, args: Vec<Matcher>) -> Result {
        self.double.member(member)?.verify(&self.verifier, args)
    }

    /// Verify calls to `member` whose receiver matches `context`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMember`](crate::Error::UnknownMember) or the
    /// verifier's failure.
    pub fn call_on(&self, context: impl Into<Matcher>, member: &str, args: Vec<Matcher>) -> Result {
        self.double
            .member(member)?
            .verify_on(&self.verifier, context, args)
    }
}
