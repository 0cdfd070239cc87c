use std::fmt;
use std::rc::Rc;

use crate::{
    Behavior, DoubleConfig, Error, MemberId, MockFunction, ObjectRef, Result, Session, Template,
    Value, same_as,
};

/// A test double standing in for an object.
///
/// Built by a [`Session`] from a [`Template`]: every callable member of the
/// template, and every method of its native shapes, becomes a
/// [`MockFunction`] labelled `name.member`. The double has an identity of
/// its own, exposed through [`this()`](Self::this); calls made through
/// [`call`](Self::call) carry it as their receiver and stubs or
/// verifications without an explicit context require it.
///
/// With `deep` enabled, nested object members of the template become doubles
/// too, reachable through [`nested`](Self::nested). With `spy` enabled,
/// members delegate unmatched calls to the template's implementation; nested
/// doubles never do.
///
/// ```rust
/// use understudy::{Session, Template, Value, args, verify, when};
///
/// # fn main() -> understudy::Result {
/// let session = Session::default();
/// let obj = session.double(Template::new("obj").method("greeting").method("farewell"))?;
///
/// when(&obj).call("greeting", args![])?.then_return("hello");
///
/// assert_eq!(obj.call("greeting", args![])?, Value::from("hello"));
/// verify(&obj).call("greeting", args![])?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Double {
    inner: Rc<DoubleInner>,
}

struct DoubleInner {
    name: String,
    this: ObjectRef,
    members: Vec<(String, MockFunction)>,
    nested: Vec<(String, Double)>,
}

impl fmt::Debug for Double {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Double")
            .field("name", &self.inner.name)
            .field("this", &self.inner.this.id())
            .field("members", &self.member_names())
            .field(
                "nested",
                &self.inner.nested.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Double {
    pub(crate) fn build(session: &Session, template: Template, config: DoubleConfig) -> Result<Self> {
        Self::build_named(session, &template, template.name(), config)
    }

    fn build_named(
        session: &Session,
        template: &Template,
        name: &str,
        config: DoubleConfig,
    ) -> Result<Self> {
        let this = ObjectRef::new(name);
        let this_value = Value::from(&this);

        let declared = template
            .members()
            .iter()
            .map(|m| (m.name.as_str(), m.implementation.clone(), false));
        let shaped = template
            .shapes()
            .iter()
            .flat_map(|shape| shape.methods().iter().map(|m| (*m, None, true)));

        let mut members: Vec<(String, MockFunction)> = Vec::new();
        for (member, implementation, from_shape) in declared.chain(shaped) {
            if members.iter().any(|(existing, _)| existing == member) {
                if from_shape {
                    continue;
                }
                return Err(Error::DuplicateMember {
                    double: name.to_string(),
                    member: member.to_string(),
                });
            }
            let delegate = if config.spy() {
                implementation.map(|imp| rebind(imp, &this, template.receiver()))
            } else {
                None
            };
            let function = MockFunction::new(
                session.clone(),
                MemberId::qualified(name, member),
                this_value.clone(),
                same_as(&this),
                delegate,
            );
            members.push((member.to_string(), function));
        }

        let mut nested = Vec::new();
        if config.deep() {
            // Nested doubles are deep but never spies.
            let nested_config = config.with_spy(false);
            for (field, object) in template.objects() {
                let nested_name = format!("{name}.{field}");
                let double = Double::build_named(session, object, &nested_name, nested_config)?;
                nested.push((field.clone(), double));
            }
        }

        tracing::debug!(
            double = %name,
            members = members.len(),
            nested = nested.len(),
            spy = config.spy(),
            "double created"
        );

        Ok(Self {
            inner: Rc::new(DoubleInner {
                name: name.to_string(),
                this,
                members,
                nested,
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The double's own identity, used as the receiver of its calls.
    pub fn this(&self) -> &ObjectRef {
        &self.inner.this
    }

    /// The mock function behind `member`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMember`] if the double has no such member.
    pub fn member(&self, member: &str) -> Result<&MockFunction> {
        self.inner
            .members
            .iter()
            .find(|(name, _)| name == member)
            .map(|(_, function)| function)
            .ok_or_else(|| Error::unknown_member(&self.inner.name, member))
    }

    /// Member names and their mock functions, in declaration order.
    pub fn members(&self) -> impl Iterator<Item = (&str, &MockFunction)> {
        self.inner.members.iter().map(|(n, f)| (n.as_str(), f))
    }

    pub fn member_names(&self) -> Vec<&str> {
        self.inner.members.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Call `member` with the double as receiver.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMember`] if the double has no such member.
    pub fn call(&self, member: &str, args: Vec<Value>) -> Result<Value> {
        Ok(self.member(member)?.call(args))
    }

    /// Call `member` with an explicit receiver.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMember`] if the double has no such member.
    pub fn call_on(&self, context: impl Into<Value>, member: &str, args: Vec<Value>) -> Result<Value> {
        Ok(self.member(member)?.call_on(context, args))
    }

    /// The double standing in for the nested object `field`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMember`] if the template has no such object or
    /// the double was not built deep.
    pub fn nested(&self, field: &str) -> Result<&Double> {
        self.inner
            .nested
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, double)| double)
            .ok_or_else(|| Error::unknown_member(&self.inner.name, field))
    }

    /// Nested object doubles, in declaration order.
    pub fn nested_doubles(&self) -> impl Iterator<Item = (&str, &Double)> {
        self.inner.nested.iter().map(|(n, d)| (n.as_str(), d))
    }
}

/// Wrap a real implementation so calls made on the double reach it with the
/// template's receiver instead.
fn rebind(implementation: Behavior, this: &ObjectRef, receiver: &ObjectRef) -> Behavior {
    let this = this.clone();
    let receiver = Value::from(receiver);
    Rc::new(move |context: &Value, args: &[Value]| {
        if context.as_object() == Some(&this) {
            implementation(&receiver, args)
        } else {
            implementation(context, args)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NativeShape, args};

    fn greeter() -> Template {
        Template::new("obj")
            .method("greeting")
            .method_with("farewell", |this, args| {
                Value::from(vec![this.clone(), Value::Int(args.len() as i64)])
            })
    }

    #[test]
    fn members_are_labelled_with_the_double_name() {
        let session = Session::default();
        let obj = session.double(greeter()).unwrap();
        assert_eq!(obj.member("greeting").unwrap().label(), "obj.greeting");
        assert_eq!(obj.member_names(), vec!["greeting", "farewell"]);
    }

    #[test]
    fn unknown_member_is_an_error() {
        let session = Session::default();
        let obj = session.double(greeter()).unwrap();
        assert_eq!(
            obj.call("wave", args![]).unwrap_err(),
            Error::unknown_member("obj", "wave")
        );
    }

    #[test]
    fn duplicate_member_is_an_error() {
        let session = Session::default();
        let result = session.double(Template::new("obj").method("greeting").method("greeting"));
        assert!(matches!(result, Err(Error::DuplicateMember { .. })));
    }

    #[test]
    fn calls_carry_the_double_as_receiver() {
        let session = Session::default();
        let obj = session.double(greeter()).unwrap();
        obj.call("greeting", args![]).unwrap();

        let calls = obj.member("greeting").unwrap().interactions();
        assert_eq!(calls[0].context().as_object(), Some(obj.this()));
    }

    #[test]
    fn non_spy_never_reaches_the_implementation() {
        let session = Session::default();
        let obj = session.double(greeter()).unwrap();
        assert!(obj.call("farewell", args![1]).unwrap().is_undefined());
    }

    #[test]
    fn spy_rebinds_the_receiver_to_the_template() {
        let session = Session::default();
        let template = greeter();
        let receiver = template.receiver().clone();
        let obj = session.build_double(template).spy(true).build().unwrap();

        let result = obj.call("farewell", args![1, 2]).unwrap();
        assert_eq!(result, Value::from(vec![Value::from(&receiver), Value::Int(2)]));

        let other = ObjectRef::new("other");
        let result = obj.call_on(&other, "farewell", args![]).unwrap();
        assert_eq!(result, Value::from(vec![Value::from(&other), Value::Int(0)]));
    }

    #[test]
    fn shapes_contribute_members_without_clashing() {
        let session = Session::default();
        let obj = session
            .double(Template::new("list").method("push").shape(NativeShape::Vec))
            .unwrap();
        let names = obj.member_names();
        assert_eq!(names.iter().filter(|n| **n == "push").count(), 1);
        assert!(names.contains(&"pop"));
    }

    #[test]
    fn deep_doubles_wrap_nested_objects() {
        let session = Session::default();
        let template = Template::new("obj")
            .method("greeting")
            .object("address", Template::new("address").method("street"));

        let shallow = session.double(template.clone()).unwrap();
        assert!(shallow.nested("address").is_err());

        let deep = session.build_double(template).deep(true).build().unwrap();
        let address = deep.nested("address").unwrap();
        assert_eq!(address.member("street").unwrap().label(), "obj.address.street");
        assert_ne!(address.this(), deep.this());
    }

    #[test]
    fn nested_doubles_of_a_spy_do_not_delegate() {
        let session = Session::default();
        let template = Template::new("obj")
            .method_with("greeting", |_, _| Value::from("hello"))
            .object(
                "address",
                Template::new("address").method_with("street", |_, _| Value::from("Main St")),
            );
        let obj = session
            .build_double(template)
            .spy(true)
            .deep(true)
            .build()
            .unwrap();

        assert_eq!(obj.call("greeting", args![]).unwrap(), Value::from("hello"));
        let address = obj.nested("address").unwrap();
        assert!(address.call("street", args![]).unwrap().is_undefined());
    }
}
