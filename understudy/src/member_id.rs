use std::{fmt, sync::Arc};

/// Label of a mock function.
///
/// A member of a double is labelled `"{double}.{member}"`, e.g.
/// `"obj.greeting"`; nested doubles extend the owner, as in
/// `"obj.address.street"`. A standalone function keeps the label it was
/// created with. Every recorded [`Interaction`](crate::Interaction) carries
/// the label of the function that received it, failure messages print it as
/// `obj.greeting(<matchers>)`, and a sequence reports the last consumed call
/// as "after invoking obj.a()".
///
/// Labels are not unique: two doubles built from the same template share
/// member labels. Identity lives in the [`MockFunction`](crate::MockFunction)
/// handle, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemberId(Arc<str>);

impl MemberId {
    pub fn new(label: &str) -> Self {
        Self(Arc::from(label))
    }

    pub(crate) fn qualified(owner: &str, member: &str) -> Self {
        Self(Arc::from(format!("{owner}.{member}")))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for MemberId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for MemberId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_label_is_prefixed_by_owner() {
        assert_eq!(MemberId::qualified("obj", "greeting"), "obj.greeting");
        assert_eq!(
            MemberId::qualified("obj.address", "street").to_string(),
            "obj.address.street"
        );
    }

    #[test]
    fn labels_compare_by_text() {
        assert_eq!(MemberId::qualified("obj", "a"), MemberId::new("obj.a"));
        assert_ne!(MemberId::new("func"), MemberId::new("obj.func"));
    }
}
