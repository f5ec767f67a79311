use crate::value::Value;
use anyhow::Result;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

type MemberFn = dyn Fn(&[Value]) -> Result<Value>;

/// A callable member of an [`Instance`].
///
/// Cloning a `Method` clones the reference, not the closure: both handles run the
/// same code against the same captured state. Use [`Method::same`] to check
/// whether two handles point at one closure.
#[derive(Clone)]
pub struct Method(Rc<MemberFn>);

impl Method {
    pub fn new(f: impl Fn(&[Value]) -> Result<Value> + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Wrap a closure taking no arguments. Arguments passed anyway are ignored.
    pub fn thunk(f: impl Fn() -> Result<Value> + 'static) -> Self {
        Self::new(move |_| f())
    }

    pub fn call(&self, args: &[Value]) -> Result<Value> {
        (self.0)(args)
    }

    /// Reference identity: true iff both handles share one closure allocation.
    pub fn same(&self, other: &Method) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Method({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

/// An object-like value: member names mapped to methods.
///
/// An instance carries no state of its own. Whatever state it has lives in the
/// closures its constructor built, so two instances from separate constructor
/// calls never observe each other, while all members of one instance see the
/// same bindings.
#[derive(Clone, Default)]
pub struct Instance {
    members: BTreeMap<String, Method>,
}

impl Instance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a derived instance from `base`: every member is forwarded unchanged,
    /// i.e. the derived entry is the very same method as the base entry.
    /// Replace entries afterwards with [`Instance::with_member`] to override.
    pub fn extend(base: &Instance) -> Self {
        base.clone()
    }

    /// Add `method` under `name`, replacing any previous entry.
    pub fn with_member(mut self, name: impl Into<String>, method: Method) -> Self {
        self.members.insert(name.into(), method);
        self
    }

    pub fn member(&self, name: &str) -> Option<&Method> {
        self.members.get(name)
    }

    /// Look `name` up and call it.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        let method = self
            .member(name)
            .ok_or_else(|| anyhow::anyhow!("no member named {}", name))?;
        tracing::trace!(member = name, ?args, "dispatch");
        method.call(args)
    }

    /// Member names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True when both instances hold the very same method under `name`.
    pub fn shares_member(&self, other: &Instance, name: &str) -> bool {
        match (self.member(name), other.member(name)) {
            (Some(a), Some(b)) => a.same(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_call_unknown_member_errors() {
        let obj = Instance::new().with_member("one", Method::thunk(|| Ok(Value::Int(1))));

        assert_eq!(obj.call("one", &[]).unwrap(), Value::Int(1));
        let err = obj.call("two", &[]).unwrap_err();
        assert_eq!(err.to_string(), "no member named two");
    }

    #[test]
    fn test_extend_forwards_same_methods() {
        let base = Instance::new()
            .with_member("a", Method::thunk(|| Ok(Value::Int(1))))
            .with_member("b", Method::thunk(|| Ok(Value::Int(2))));
        let derived =
            Instance::extend(&base).with_member("a", Method::thunk(|| Ok(Value::Int(10))));

        assert!(!derived.shares_member(&base, "a"));
        assert!(derived.shares_member(&base, "b"));
        assert!(!derived.shares_member(&base, "c"));
        assert_eq!(derived.call("a", &[]).unwrap(), Value::Int(10));
        assert_eq!(derived.call("b", &[]).unwrap(), Value::Int(2));
    }

    #[test]
    fn test_cloned_method_runs_same_closure() {
        let hits = Rc::new(Cell::new(0));
        let seen = hits.clone();
        let m = Method::thunk(move || {
            seen.set(seen.get() + 1);
            Ok(Value::Int(seen.get()))
        });
        let copy = m.clone();

        m.call(&[]).unwrap();
        assert_eq!(copy.call(&[]).unwrap(), Value::Int(2));
        assert!(m.same(&copy));
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn test_names_are_sorted() {
        let obj = Instance::new()
            .with_member("zeta", Method::thunk(|| Ok(Value::Missing)))
            .with_member("alpha", Method::thunk(|| Ok(Value::Missing)));

        assert_eq!(obj.names().collect::<Vec<_>>(), vec!["alpha", "zeta"]);
        assert_eq!(obj.len(), 2);
        assert!(!obj.is_empty());
    }
}
