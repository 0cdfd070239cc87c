use std::fmt;
use std::rc::Rc;

use crate::{
    ArgMatchers, Behavior, Interaction, InteractionLog, Matcher, MemberId, Result, Session,
    StubBuilder, StubTable, Value, Verifier,
};

/// A callable test double: records every call, answers from its stubs and
/// can be verified afterwards.
///
/// Members of a [`Double`](crate::Double) are mock functions labelled
/// `double.member`; [`Session::mock_function`] creates standalone ones.
/// Cloning yields another handle to the same function.
///
/// ```rust
/// use understudy::{Session, Value, args, once};
///
/// let session = Session::default();
/// let func = session.mock_function("func");
///
/// func.when(args![42]).then_return("answer");
/// assert_eq!(func.call(args![42]), Value::from("answer"));
/// assert!(func.call(args![7]).is_undefined());
///
/// assert!(func.verify(once(), args![42]).is_ok());
/// ```
#[derive(Clone)]
pub struct MockFunction {
    inner: Rc<MockFunctionInner>,
}

struct MockFunctionInner {
    label: MemberId,
    session: Session,
    /// Receiver used by [`MockFunction::call`].
    this: Value,
    /// Context matcher used when stubbing or verifying without one.
    default_context: Matcher,
    log: InteractionLog,
    stubs: StubTable,
    delegate: Option<Behavior>,
}

impl fmt::Debug for MockFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockFunction")
            .field("label", &self.inner.label)
            .field("calls", &self.inner.log.len())
            .field("stubs", &self.inner.stubs.len())
            .field("spy", &self.inner.delegate.is_some())
            .finish()
    }
}

impl MockFunction {
    pub(crate) fn new(
        session: Session,
        label: MemberId,
        this: Value,
        default_context: Matcher,
        delegate: Option<Behavior>,
    ) -> Self {
        let log = InteractionLog::new();
        session.register_log(log.clone());
        Self {
            inner: Rc::new(MockFunctionInner {
                label,
                session,
                this,
                default_context,
                log,
                stubs: StubTable::default(),
                delegate,
            }),
        }
    }

    pub fn label(&self) -> &MemberId {
        &self.inner.label
    }

    /// The session this function records into.
    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Handle to the function's call log.
    pub fn log(&self) -> &InteractionLog {
        &self.inner.log
    }

    /// Every call made so far, in call order.
    pub fn interactions(&self) -> Vec<Interaction> {
        self.inner.log.snapshot()
    }

    /// Call with the function's default receiver.
    ///
    /// For a member of a double that is the double itself; for a standalone
    /// function it is [`Value::Undefined`].
    pub fn call(&self, args: Vec<Value>) -> Value {
        self.call_on(self.inner.this.clone(), args)
    }

    /// Call with an explicit receiver.
    ///
    /// The call is recorded before anything else happens. The most recently
    /// registered matching stub answers it; failing that, a spy forwards it
    /// to the real implementation; otherwise it returns
    /// [`Value::Undefined`].
    pub fn call_on(&self, context: impl Into<Value>, args: Vec<Value>) -> Value {
        let context = context.into();
        let order = self.inner.session.next_order();
        tracing::trace!(
            function = %self.inner.label,
            order = %order,
            args = args.len(),
            "call recorded"
        );
        self.inner.log.append(Interaction::new(
            self.inner.label.clone(),
            context.clone(),
            args.clone(),
            order,
        ));

        if let Some(action) = self.inner.stubs.resolve(&context, &args) {
            tracing::trace!(function = %self.inner.label, action = ?action, "stub matched");
            return action.perform(&context, &args);
        }
        match &self.inner.delegate {
            Some(implementation) => implementation(&context, &args),
            None => Value::Undefined,
        }
    }

    /// Stub calls whose arguments match `args`, made with the default receiver.
    pub fn when(&self, args: Vec<Matcher>) -> StubBuilder {
        self.when_on(self.inner.default_context.clone(), args)
    }

    /// Stub calls matching both `context` and `args`.
    pub fn when_on(&self, context: impl Into<Matcher>, args: Vec<Matcher>) -> StubBuilder {
        StubBuilder::new(self.clone(), ArgMatchers::new(context.into(), args))
    }

    /// Verify calls whose arguments match `args`, made with the default receiver.
    ///
    /// # Errors
    ///
    /// Returns the verifier's failure, e.g.
    /// [`Error::CountMismatch`](crate::Error::CountMismatch).
    pub fn verify(&self, verifier: impl Verifier, args: Vec<Matcher>) -> Result {
        let matchers = ArgMatchers::new(self.inner.default_context.clone(), args);
        verifier.verify_interactions(self, &matchers, false)
    }

    /// Verify calls matching both `context` and `args`. Failure messages
    /// mention the wanted receiver.
    ///
    /// # Errors
    ///
    /// Returns the verifier's failure.
    pub fn verify_on(
        &self,
        verifier: impl Verifier,
        context: impl Into<Matcher>,
        args: Vec<Matcher>,
    ) -> Result {
        let matchers = ArgMatchers::new(context.into(), args);
        verifier.verify_interactions(self, &matchers, true)
    }

    pub(crate) fn stubs(&self) -> &StubTable {
        &self.inner.stubs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, ObjectRef, anything, args, less_than, never, once, same_as, times};

    #[test]
    fn unstubbed_call_returns_undefined_and_is_recorded() {
        let session = Session::default();
        let func = session.mock_function("func");

        assert!(func.call(args![42, "hi"]).is_undefined());

        let calls = func.interactions();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].args(), &[Value::Int(42), Value::from("hi")]);
        assert!(calls[0].context().is_undefined());
        assert_eq!(calls[0].order().value(), 1);
    }

    #[test]
    fn stub_with_behavior_sees_context_and_args() {
        let session = Session::default();
        let func = session.mock_function("func");
        func.when(args![anything()])
            .then(|this, args| Value::from(vec![this.clone(), args[0].clone()]));

        let receiver = ObjectRef::new("receiver");
        let result = func.call_on(&receiver, args![5]);
        assert_eq!(result, Value::from(vec![Value::from(&receiver), Value::Int(5)]));
    }

    #[test]
    fn stub_without_clause_returns_undefined() {
        let session = Session::default();
        let func = session.spy_function("func", |_, _| Value::from("real"));
        drop(func.when(args![1]));

        assert!(func.call(args![1]).is_undefined());
        assert_eq!(func.call(args![2]), Value::from("real"));
    }

    #[test]
    fn standalone_function_accepts_any_context() {
        let session = Session::default();
        let func = session.mock_function("func");
        func.when(args![]).then_return(1);

        assert_eq!(func.call_on(ObjectRef::new("a"), args![]), Value::Int(1));
        assert_eq!(func.call(args![]), Value::Int(1));
        assert!(func.verify(times(2), args![]).is_ok());
    }

    #[test]
    fn explicit_context_stubs() {
        let session = Session::default();
        let func = session.mock_function("func");
        let target = ObjectRef::new("target");
        func.when_on(same_as(&target), args![]).then_return("bound");

        assert_eq!(func.call_on(&target, args![]), Value::from("bound"));
        assert!(func.call_on(ObjectRef::new("other"), args![]).is_undefined());
    }

    #[test]
    fn verify_on_describes_context() {
        let session = Session::default();
        let func = session.mock_function("func");
        let target = ObjectRef::new("target");

        let err = func.verify_on(once(), same_as(&target), args![]).unwrap_err();
        assert_eq!(
            err.headline(),
            "Wanted but not invoked: func(), 'this' being same instance as [object target]"
        );
    }

    #[test]
    fn verify_with_matchers() {
        let session = Session::default();
        let func = session.mock_function("func");
        func.call(args![3]);
        func.call(args![300]);

        assert!(func.verify(once(), args![less_than(100)]).is_ok());
        assert!(func.verify(never(), args!["3"]).is_ok());
        assert!(matches!(
            func.verify(times(2), args![less_than(100)]),
            Err(Error::CountMismatch(_))
        ));
    }
}
