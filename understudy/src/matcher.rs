//! Argument and context matching.
//!
//! A [`Matcher`] is a predicate over a single [`Value`] plus a description
//! used in failure messages. Literal values convert into [`equal_to`]
//! matchers, so `args!["x", less_than(100)]` mixes both freely.
//!
//! [`ArgMatchers`] is the matcher set used by both stub resolution and
//! verification: an explicit context matcher plus one matcher per argument.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use crate::{ObjectRef, Value};

type MatchFn = Rc<dyn Fn(&Value) -> bool>;

/// A predicate over one argument or receiver.
///
/// # Example
///
/// ```ignore
/// use understudy::{Matcher, anything, less_than};
///
/// let small = less_than(10);
/// let named = Matcher::new("an even number", |v| v.as_f64().is_some_and(|x| x % 2.0 == 0.0));
/// let literal: Matcher = "hi".into(); // equal to "hi"
/// ```
#[derive(Clone)]
pub struct Matcher {
    predicate: MatchFn,
    description: Cow<'static, str>,
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matcher")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description)
    }
}

impl Matcher {
    /// A matcher from a described predicate.
    pub fn new<F>(description: impl Into<Cow<'static, str>>, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + 'static,
    {
        Self {
            predicate: Rc::new(predicate),
            description: description.into(),
        }
    }

    /// Equality with the given value. This is what literals convert into.
    pub fn by_value(value: impl Into<Value>) -> Self {
        let expected = value.into();
        Self::new(format!("equal to {expected}"), move |actual| *actual == expected)
    }

    /// Returns true if `value` satisfies this matcher.
    pub fn matches(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Matches every value, including [`Value::Undefined`].
pub fn anything() -> Matcher {
    Matcher::new("anything", |_| true)
}

/// Matches values equal to `value`.
pub fn equal_to(value: impl Into<Value>) -> Matcher {
    Matcher::by_value(value)
}

/// Matches the very same object, compared by identity.
pub fn same_as(object: &ObjectRef) -> Matcher {
    let expected = Value::from(object);
    Matcher::new(format!("same instance as {expected}"), move |actual| {
        actual.same_object(&expected)
    })
}

/// Matches numbers or strings ordered strictly before `bound`.
pub fn less_than(bound: impl Into<Value>) -> Matcher {
    let bound = bound.into();
    Matcher::new(format!("less than {bound}"), move |actual| {
        actual.compare(&bound) == Some(Ordering::Less)
    })
}

/// Matches numbers or strings ordered strictly after `bound`.
pub fn greater_than(bound: impl Into<Value>) -> Matcher {
    let bound = bound.into();
    Matcher::new(format!("greater than {bound}"), move |actual| {
        actual.compare(&bound) == Some(Ordering::Greater)
    })
}

/// Inverts a matcher.
pub fn not(matcher: impl Into<Matcher>) -> Matcher {
    let inner = matcher.into();
    Matcher::new(format!("not {}", inner.description), move |actual| {
        !inner.matches(actual)
    })
}

macro_rules! literal_matchers {
    ($($literal:ty),* $(,)?) => {
        $(
            impl From<$literal> for Matcher {
                fn from(value: $literal) -> Self {
                    Matcher::by_value(value)
                }
            }
        )*
    };
}

literal_matchers!(Value, (), bool, i32, i64, u32, f64, &str, String, ObjectRef, &ObjectRef);

/// The matcher set of one stub registration or verification.
///
/// `context` matches the receiver; `args[i]` matches argument `i`. A call
/// with fewer arguments than matchers has its missing slots read as
/// [`Value::Undefined`]; arguments beyond the last matcher are not checked.
#[derive(Clone, Debug)]
pub struct ArgMatchers {
    context: Matcher,
    args: Vec<Matcher>,
}

impl ArgMatchers {
    pub fn new(context: Matcher, args: Vec<Matcher>) -> Self {
        Self { context, args }
    }

    /// Any receiver, any arguments.
    pub fn any() -> Self {
        Self::new(anything(), Vec::new())
    }

    pub fn context(&self) -> &Matcher {
        &self.context
    }

    pub fn args(&self) -> &[Matcher] {
        &self.args
    }

    /// Returns true if the call `(context, args)` satisfies every matcher.
    pub fn matches(&self, context: &Value, args: &[Value]) -> bool {
        self.context.matches(context)
            && self.args.iter().enumerate().all(|(i, matcher)| {
                matcher.matches(args.get(i).unwrap_or(&Value::Undefined))
            })
    }

    /// Argument matcher descriptions, in order.
    pub(crate) fn describe_args(&self) -> Vec<String> {
        self.args.iter().map(|m| m.description.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;

    #[test]
    fn literal_converts_to_equality() {
        let matcher: Matcher = "hi".into();
        assert!(matcher.matches(&"hi".into()));
        assert!(!matcher.matches(&"ho".into()));
        assert_eq!(matcher.description(), "equal to \"hi\"");
    }

    #[test]
    fn anything_matches_undefined() {
        assert!(anything().matches(&Value::Undefined));
        assert!(anything().matches(&Value::Null));
    }

    #[test]
    fn ordering_matchers() {
        assert!(less_than(100).matches(&67.into()));
        assert!(!less_than(100).matches(&100.into()));
        assert!(!less_than(100).matches(&"67".into()));
        assert!(greater_than(2).matches(&2.5.into()));
        assert_eq!(less_than(100).description(), "less than 100");
    }

    #[test]
    fn not_inverts() {
        let matcher = not(42);
        assert!(matcher.matches(&41.into()));
        assert!(!matcher.matches(&42.into()));
        assert_eq!(matcher.description(), "not equal to 42");
    }

    #[test]
    fn same_as_compares_identity() {
        let object = ObjectRef::new("obj");
        let matcher = same_as(&object);
        assert!(matcher.matches(&Value::from(&object)));
        assert!(!matcher.matches(&Value::from(ObjectRef::new("obj"))));
        assert!(!matcher.matches(&Value::Undefined));
    }

    // ==================== ArgMatchers ====================

    fn call(args: Vec<Value>) -> Vec<Value> {
        args
    }

    #[test]
    fn missing_arguments_read_as_undefined() {
        let matchers = ArgMatchers::new(anything(), args!["foo", 9]);
        assert!(matchers.matches(&Value::Undefined, &call(args!["foo", 9])));
        assert!(!matchers.matches(&Value::Undefined, &call(args!["foo"])));

        let wants_undefined = ArgMatchers::new(anything(), args!["foo", Value::Undefined]);
        assert!(wants_undefined.matches(&Value::Undefined, &call(args!["foo"])));
    }

    #[test]
    fn extra_arguments_are_ignored() {
        let matchers = ArgMatchers::new(anything(), args!["hunter", "thompson"]);
        assert!(matchers.matches(&Value::Undefined, &call(args!["hunter", "thompson", 67])));
        assert!(ArgMatchers::any().matches(&Value::Null, &call(args![1, 2, 3])));
    }

    #[test]
    fn context_is_checked() {
        let this = ObjectRef::new("obj");
        let matchers = ArgMatchers::new(same_as(&this), Vec::new());
        assert!(matchers.matches(&Value::from(&this), &[]));
        assert!(!matchers.matches(&Value::Undefined, &[]));
    }

    #[test]
    fn describe_args_lists_descriptions() {
        let matchers = ArgMatchers::new(anything(), args!["x", less_than(100)]);
        assert_eq!(
            matchers.describe_args(),
            vec!["equal to \"x\"".to_string(), "less than 100".to_string()]
        );
    }
}
