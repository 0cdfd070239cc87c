use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::{ArgMatchers, MockFunction, Value};

/// A function standing in for a real implementation: receives the call's
/// context and arguments, returns the call's result.
pub type Behavior = Rc<dyn Fn(&Value, &[Value]) -> Value>;

/// What a matching stub does when called.
#[derive(Clone)]
pub enum StubAction {
    /// Declared without a clause: return [`Value::Undefined`], never delegate.
    Nothing,
    /// Return a fixed value.
    Return(Value),
    /// Invoke a behavior with the original context and arguments.
    Invoke(Behavior),
}

impl StubAction {
    pub(crate) fn perform(&self, context: &Value, args: &[Value]) -> Value {
        match self {
            StubAction::Nothing => Value::Undefined,
            StubAction::Return(value) => value.clone(),
            StubAction::Invoke(behavior) => behavior(context, args),
        }
    }
}

impl fmt::Debug for StubAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StubAction::Nothing => write!(f, "Nothing"),
            StubAction::Return(value) => f.debug_tuple("Return").field(value).finish(),
            StubAction::Invoke(_) => f.debug_tuple("Invoke").finish_non_exhaustive(),
        }
    }
}

/// One `when(...)` declaration. Immutable once registered.
#[derive(Clone, Debug)]
pub(crate) struct StubRegistration {
    matchers: ArgMatchers,
    action: StubAction,
}

/// The registrations of one mock function.
#[derive(Clone, Default)]
pub(crate) struct StubTable {
    registrations: Rc<RefCell<Vec<StubRegistration>>>,
}

impl fmt::Debug for StubTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubTable")
            .field("registrations", &self.registrations.borrow().len())
            .finish()
    }
}

impl StubTable {
    pub(crate) fn register(&self, matchers: ArgMatchers, action: StubAction) {
        self.registrations
            .borrow_mut()
            .push(StubRegistration { matchers, action });
    }

    /// The action of the most recently registered stub matching the call.
    ///
    /// A later, narrower registration overrides an earlier, broader one.
    pub(crate) fn resolve(&self, context: &Value, args: &[Value]) -> Option<StubAction> {
        let registrations = self.registrations.borrow().clone();
        registrations
            .into_iter()
            .rev()
            .find(|r| r.matchers.matches(context, args))
            .map(|r| r.action)
    }

    pub(crate) fn len(&self) -> usize {
        self.registrations.borrow().len()
    }
}

/// Declares what a mock function does for calls matching a matcher set.
///
/// Returned by [`When::call`](crate::When::call) and [`MockFunction::when`].
/// The stub is registered when the builder is consumed by a clause or
/// dropped; a builder dropped without a clause registers a stub that
/// returns [`Value::Undefined`] and keeps a spy from delegating.
///
/// ```rust,ignore
/// when(&greeter).call("greeting", args![])?.then_return("hello");
/// when(&greeter)
///     .call("farewell", args!["hunter", anything()])?
///     .then(|_this, args| format!("bye {}", args[1]).into());
/// ```
pub struct StubBuilder {
    function: MockFunction,
    matchers: ArgMatchers,
    action: Option<StubAction>,
}

impl fmt::Debug for StubBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StubBuilder")
            .field("function", self.function.label())
            .field("matchers", &self.matchers)
            .finish_non_exhaustive()
    }
}

impl StubBuilder {
    pub(crate) fn new(function: MockFunction, matchers: ArgMatchers) -> Self {
        Self {
            function,
            matchers,
            action: None,
        }
    }

    /// Matching calls return `value`.
    pub fn then_return(mut self, value: impl Into<Value>) {
        self.action = Some(StubAction::Return(value.into()));
    }

    /// Matching calls run `behavior` with the call's context and arguments
    /// and return its result.
    pub fn then<F>(mut self, behavior: F)
    where
        F: Fn(&Value, &[Value]) -> Value + 'static,
    {
        self.action = Some(StubAction::Invoke(Rc::new(behavior)));
    }
}

impl Drop for StubBuilder {
    fn drop(&mut self) {
        let action = self.action.take().unwrap_or(StubAction::Nothing);
        tracing::trace!(
            function = %self.function.label(),
            action = ?action,
            "stub registered"
        );
        self.function
            .stubs()
            .register(self.matchers.clone(), action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{anything, less_than};

    fn no_args() -> Vec<Value> {
        Vec::new()
    }

    #[test]
    fn resolve_without_registrations_is_none() {
        let table = StubTable::default();
        assert!(table.resolve(&Value::Undefined, &no_args()).is_none());
    }

    #[test]
    fn last_registration_wins() {
        let table = StubTable::default();
        table.register(ArgMatchers::any(), StubAction::Return("broad".into()));
        table.register(
            ArgMatchers::new(anything(), vec![less_than(10)]),
            StubAction::Return("narrow".into()),
        );

        let narrow = table.resolve(&Value::Undefined, &[Value::Int(3)]).unwrap();
        assert_eq!(narrow.perform(&Value::Undefined, &[]), Value::from("narrow"));

        let broad = table.resolve(&Value::Undefined, &[Value::Int(30)]).unwrap();
        assert_eq!(broad.perform(&Value::Undefined, &[]), Value::from("broad"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn broad_registration_after_narrow_shadows_it() {
        let table = StubTable::default();
        table.register(
            ArgMatchers::new(anything(), vec![less_than(10)]),
            StubAction::Return("narrow".into()),
        );
        table.register(ArgMatchers::any(), StubAction::Return("broad".into()));

        let action = table.resolve(&Value::Undefined, &[Value::Int(3)]).unwrap();
        assert_eq!(action.perform(&Value::Undefined, &[]), Value::from("broad"));
    }

    #[test]
    fn invoke_passes_context_and_arguments() {
        let action = StubAction::Invoke(Rc::new(|this: &Value, args: &[Value]| {
            Value::from(vec![this.clone(), Value::Int(args.len() as i64)])
        }));
        let result = action.perform(&Value::Null, &[Value::Int(1), Value::Undefined]);
        assert_eq!(result, Value::from(vec![Value::Null, Value::Int(2)]));
    }

    #[test]
    fn nothing_returns_undefined() {
        assert!(StubAction::Nothing.perform(&Value::Null, &[]).is_undefined());
    }
}
