use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::{
    Behavior, Config, Double, DoubleBuilder, DoubleConfig, Interaction, InteractionLog,
    InvocationOrder, MemberId, MockFunction, ObjectId, Result, Sequence, Template, Value,
    anything,
};

/// Owns the invocation order of one test case and creates its test doubles.
///
/// Every double, mock function and sequence created from a session shares
/// its order counter, so calls across all of them are totally ordered. Keep
/// one session per test case: orders from different sessions are unrelated.
///
/// # Creating doubles
///
/// ```ignore
/// let session = Session::default();
///
/// // A double over an explicit interface
/// let greeter = session.double(Template::new("obj").method("greeting").method("farewell"))?;
///
/// // With per-double options
/// let spy = session.build_double(template).spy(true).deep(true).build()?;
///
/// // A standalone mock function
/// let func = session.mock_function("func");
/// ```
///
/// # Ordering
///
/// - [`interactions()`](Self::interactions) merges every log of the session
///   in invocation order.
/// - [`sequence()`](Self::sequence) starts an in-order verification cursor.
///
/// Sessions use `Rc` internally and are `!Send`; they are meant for a single
/// test thread.
#[derive(Clone)]
pub struct Session {
    state: Rc<SessionState>,
}

struct SessionState {
    id: ObjectId,
    config: Config,
    last_order: Cell<InvocationOrder>,
    logs: RefCell<Vec<InteractionLog>>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.state.id)
            .field("last_order", &self.state.last_order.get())
            .field("functions", &self.state.logs.borrow().len())
            .finish()
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new(Config::default())
    }
}

impl Session {
    /// Create a new session with the given defaults.
    pub fn new(config: Config) -> Self {
        let id = ObjectId::new();
        tracing::trace!(session = %id, "session created");
        Self {
            state: Rc::new(SessionState {
                id,
                config,
                last_order: Cell::new(InvocationOrder::ORIGIN),
                logs: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.state.id
    }

    pub fn config(&self) -> &Config {
        &self.state.config
    }

    /// Build a double over `template` with the session defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateMember`](crate::Error::DuplicateMember) if
    /// the template declares a member twice.
    pub fn double(&self, template: Template) -> Result<Double> {
        Double::build(self, template, DoubleConfig::new(self.config()))
    }

    /// Start building a double with per-double options.
    pub fn build_double(&self, template: Template) -> DoubleBuilder<'_> {
        DoubleBuilder::new(self, template)
    }

    /// Create a standalone mock function labelled `label`.
    ///
    /// Plain calls carry [`Value::Undefined`] as their context, and stubs or
    /// verifications without an explicit context accept any context.
    pub fn mock_function(&self, label: &str) -> MockFunction {
        MockFunction::new(
            self.clone(),
            MemberId::new(label),
            Value::Undefined,
            anything(),
            None,
        )
    }

    /// Create a standalone mock function that spies on `implementation`:
    /// calls no stub matches are forwarded to it.
    pub fn spy_function<F>(&self, label: &str, implementation: F) -> MockFunction
    where
        F: Fn(&Value, &[Value]) -> Value + 'static,
    {
        let implementation: Behavior = Rc::new(implementation);
        MockFunction::new(
            self.clone(),
            MemberId::new(label),
            Value::Undefined,
            anything(),
            Some(implementation),
        )
    }

    /// Start an in-order verification over the calls of this session.
    ///
    /// Create the sequence before exercising the code under test so its
    /// failure messages can list what happened.
    pub fn sequence(&self) -> Sequence {
        Sequence::new(self.clone())
    }

    /// Order of the most recent call, or [`InvocationOrder::ORIGIN`].
    pub fn last_order(&self) -> InvocationOrder {
        self.state.last_order.get()
    }

    /// Every call recorded by this session, in invocation order.
    pub fn interactions(&self) -> Vec<Interaction> {
        self.interactions_after(InvocationOrder::ORIGIN)
    }

    /// Calls recorded strictly after `order`, in invocation order.
    pub fn interactions_after(&self, order: InvocationOrder) -> Vec<Interaction> {
        let mut interactions: Vec<Interaction> = self
            .state
            .logs
            .borrow()
            .iter()
            .flat_map(|log| log.snapshot())
            .filter(|e| e.order() > order)
            .collect();
        interactions.sort_by_key(|e| e.order());
        interactions
    }

    /// Returns true if both handles refer to the same session.
    pub fn same_session(&self, other: &Session) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    pub(crate) fn next_order(&self) -> InvocationOrder {
        let order = self.state.last_order.get().next();
        self.state.last_order.set(order);
        order
    }

    pub(crate) fn register_log(&self, log: InteractionLog) {
        self.state.logs.borrow_mut().push(log);
    }
}

#[cfg(feature = "serde")]
impl Session {
    /// Export every call of the session as JSON, in invocation order.
    ///
    /// Each entry carries the function label, the context, the arguments,
    /// the invocation order and the `verified` flag.
    ///
    /// # Errors
    ///
    /// Returns any serialization error produced by `serde_json`.
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.interactions())
    }
}
