use std::fmt;
use std::rc::Rc;

use crate::{Behavior, Double, ObjectRef, Value};

/// Built-in collection shapes a template can borrow its method set from.
///
/// A double built from a template carrying a shape exposes one mock
/// function per method of the shape, in addition to the template's own
/// members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NativeShape {
    /// A growable list.
    Vec,
    /// A double-ended queue.
    Deque,
    /// A key/value map.
    Map,
    /// A set of unique values.
    Set,
    /// A pattern matcher over strings.
    Pattern,
}

impl NativeShape {
    /// Method names the shape contributes, in declaration order.
    pub fn methods(&self) -> &'static [&'static str] {
        match self {
            NativeShape::Vec => &[
                "clear", "contains", "extend", "get", "insert", "is_empty", "join", "len", "pop",
                "push", "remove", "reverse", "sort", "split_off", "truncate",
            ],
            NativeShape::Deque => &[
                "back", "clear", "front", "is_empty", "len", "pop_back", "pop_front", "push_back",
                "push_front",
            ],
            NativeShape::Map => &[
                "clear", "contains_key", "get", "insert", "is_empty", "keys", "len", "remove",
                "values",
            ],
            NativeShape::Set => &["clear", "contains", "insert", "is_empty", "len", "remove"],
            NativeShape::Pattern => &["captures", "find", "is_match", "replace", "split"],
        }
    }
}

#[derive(Clone)]
pub(crate) struct MemberSpec {
    pub(crate) name: String,
    pub(crate) implementation: Option<Behavior>,
}

/// The interface a [`Double`] is built from.
///
/// A template names the double, lists its callable members (optionally with
/// a real implementation a spy can delegate to), nested object members and
/// native shapes. Templates have a receiver identity of their own: spy
/// delegation rebinds calls made on the double to it, so real
/// implementations never see the double as their receiver.
///
/// ```rust
/// use understudy::{NativeShape, Template, Value};
///
/// let template = Template::new("obj")
///     .method("greeting")
///     .method_with("farewell", |_this, args| {
///         Value::from(format!("bye {}", args.len()))
///     })
///     .object("address", Template::new("address").method("street"))
///     .shape(NativeShape::Set);
///
/// assert_eq!(template.name(), "obj");
/// assert!(template.member_names().contains(&"farewell"));
/// ```
#[derive(Clone)]
pub struct Template {
    name: String,
    receiver: ObjectRef,
    members: Vec<MemberSpec>,
    objects: Vec<(String, Template)>,
    shapes: Vec<NativeShape>,
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("name", &self.name)
            .field("members", &self.member_names())
            .field(
                "objects",
                &self.objects.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(),
            )
            .field("shapes", &self.shapes)
            .finish()
    }
}

impl Template {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            receiver: ObjectRef::new(name.as_str()),
            name,
            members: Vec::new(),
            objects: Vec::new(),
            shapes: Vec::new(),
        }
    }

    /// Declare a member with no implementation.
    pub fn method(mut self, name: impl Into<String>) -> Self {
        self.members.push(MemberSpec {
            name: name.into(),
            implementation: None,
        });
        self
    }

    /// Declare a member with a real implementation.
    pub fn method_with<F>(mut self, name: impl Into<String>, implementation: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Value + 'static,
    {
        self.members.push(MemberSpec {
            name: name.into(),
            implementation: Some(Rc::new(implementation)),
        });
        self
    }

    /// Declare a nested object member.
    pub fn object(mut self, name: impl Into<String>, template: Template) -> Self {
        self.objects.push((name.into(), template));
        self
    }

    /// Add the method set of a native shape.
    pub fn shape(mut self, shape: NativeShape) -> Self {
        if !self.shapes.contains(&shape) {
            self.shapes.push(shape);
        }
        self
    }

    /// A template mirroring an existing double.
    ///
    /// Every member of the new template forwards to the matching member of
    /// `double`, keeping the call's receiver, and nested doubles become
    /// nested templates. A spy built from it records its own calls and the
    /// underlying double records them too.
    pub fn from_double(double: &Double) -> Self {
        let mut template = Template::new(double.name());
        template.receiver = double.this().clone();
        for (name, function) in double.members() {
            let target = function.clone();
            template.members.push(MemberSpec {
                name: name.to_string(),
                implementation: Some(Rc::new(move |this: &Value, args: &[Value]| {
                    target.call_on(this.clone(), args.to_vec())
                })),
            });
        }
        for (field, nested) in double.nested_doubles() {
            template
                .objects
                .push((field.to_string(), Template::from_double(nested)));
        }
        template
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The identity real implementations see as their receiver.
    pub fn receiver(&self) -> &ObjectRef {
        &self.receiver
    }

    /// Names of the explicitly declared members, in declaration order.
    pub fn member_names(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.name.as_str()).collect()
    }

    pub(crate) fn members(&self) -> &[MemberSpec] {
        &self.members
    }

    pub(crate) fn objects(&self) -> &[(String, Template)] {
        &self.objects
    }

    pub(crate) fn shapes(&self) -> &[NativeShape] {
        &self.shapes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes_are_added_once() {
        let template = Template::new("list")
            .shape(NativeShape::Vec)
            .shape(NativeShape::Vec);
        assert_eq!(template.shapes(), &[NativeShape::Vec]);
    }

    #[test]
    fn each_template_has_its_own_receiver() {
        let a = Template::new("obj");
        let b = Template::new("obj");
        assert_ne!(a.receiver(), b.receiver());
        assert_eq!(a.clone().receiver(), a.receiver());
    }

    #[test]
    fn members_keep_declaration_order() {
        let template = Template::new("obj")
            .method("greeting")
            .method_with("farewell", |_, _| Value::Null);
        assert_eq!(template.member_names(), vec!["greeting", "farewell"]);
        assert!(template.members()[0].implementation.is_none());
        assert!(template.members()[1].implementation.is_some());
    }

    #[test]
    fn shape_method_tables_are_non_empty() {
        for shape in [
            NativeShape::Vec,
            NativeShape::Deque,
            NativeShape::Map,
            NativeShape::Set,
            NativeShape::Pattern,
        ] {
            assert!(!shape.methods().is_empty());
        }
        assert!(NativeShape::Pattern.methods().contains(&"is_match"));
    }
}
