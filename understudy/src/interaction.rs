use std::{fmt, hash};

use crate::{MemberId, Value};

/// Position of a call in the session-wide invocation order.
///
/// Assigned from a single counter owned by the [`Session`](crate::Session),
/// so orders are unique and strictly increasing across every double of the
/// session. Zero is reserved for "before any call".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, hash::Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InvocationOrder(u64);

impl InvocationOrder {
    /// The order before any call was recorded.
    pub const ORIGIN: InvocationOrder = InvocationOrder(0);

    pub fn value(&self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        InvocationOrder(self.0 + 1)
    }
}

impl From<u64> for InvocationOrder {
    fn from(value: u64) -> Self {
        InvocationOrder(value)
    }
}

impl fmt::Display for InvocationOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One recorded call to a mock function.
///
/// - `function`: label of the mock function that was called.
/// - `context`: the receiver the call was made with.
/// - `args`: the arguments, arity-preserving.
/// - `order`: position in the session-wide invocation order.
/// - `verified`: set once a count verification matched this call. Sequence
///   verification never sets it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interaction {
    function: MemberId,
    context: Value,
    args: Vec<Value>,
    order: InvocationOrder,
    verified: bool,
}

impl Interaction {
    pub(crate) fn new(
        function: MemberId,
        context: Value,
        args: Vec<Value>,
        order: InvocationOrder,
    ) -> Self {
        Self {
            function,
            context,
            args,
            order,
            verified: false,
        }
    }

    #[inline]
    pub fn function(&self) -> &MemberId {
        &self.function
    }

    #[inline]
    pub fn context(&self) -> &Value {
        &self.context
    }

    #[inline]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Argument at `index`, or [`Value::Undefined`] past the end of the call.
    pub fn arg(&self, index: usize) -> &Value {
        const UNDEFINED: &Value = &Value::Undefined;
        self.args.get(index).unwrap_or(UNDEFINED)
    }

    #[inline]
    pub fn order(&self) -> InvocationOrder {
        self.order
    }

    #[inline]
    pub fn is_verified(&self) -> bool {
        self.verified
    }

    pub(crate) fn mark_verified(&mut self) {
        self.verified = true;
    }
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.function)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{arg}")?;
        }
        write!(f, ")")
    }
}
