//! Stateless tiers: plain functions, deferred values and bundles of closures
//! sharing one captured argument.

use crate::instance::{Instance, Method};
use crate::value::{Value, int_arg};

/// Returns its argument. The smallest example of a function being a value.
pub fn identity<T>(a: T) -> T {
    a
}

/// Captures `a` and returns a closure that hands it back on every call.
///
/// ```
/// use closure_objects::deferred_identity;
/// let later = deferred_identity(7);
/// assert_eq!(later(), 7);
/// assert_eq!(later(), 7);
/// ```
pub fn deferred_identity<T: Clone>(a: T) -> impl Fn() -> T {
    move || a.clone()
}

/// `Int` of the result, or `Missing` when it does not fit in an `i64`.
fn fitted(result: Option<i64>) -> Value {
    result.map_or(Value::Missing, Value::Int)
}

fn plus_five(a: i64) -> Method {
    Method::thunk(move || Ok(fitted(a.checked_add(5))))
}

fn just(a: i64) -> Method {
    Method::thunk(move || Ok(Value::Int(a)))
}

fn minus(a: i64) -> Method {
    Method::new(move |args| {
        Ok(match int_arg(args, 0) {
            Some(x) => fitted(a.checked_sub(x)),
            None => Value::Missing,
        })
    })
}

/// Three closures over the same `a`, reachable by position only:
/// `[0]() == a + 5`, `[1]() == a`, `[2](x) == a - x`.
pub fn some_functions(a: i64) -> Vec<Method> {
    vec![plus_five(a), just(a), minus(a)]
}

/// The same three closures keyed by name: `plusFive`, `just` and `minus`.
pub fn some_named_functions(a: i64) -> Instance {
    Instance::new()
        .with_member("plusFive", plus_five(a))
        .with_member("just", just(a))
        .with_member("minus", minus(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_returns_argument() {
        assert_eq!(identity(1), 1);
        assert_eq!(identity("hello"), "hello");
        assert_eq!(identity(vec![1, 2]), vec![1, 2]);
    }

    #[test]
    fn test_deferred_identity_delays_value() {
        let deferred = deferred_identity(String::from("later"));
        assert_eq!(deferred(), "later");
        // calling again yields the same captured value
        assert_eq!(deferred(), "later");
    }

    #[test]
    fn test_some_functions_by_position() {
        let fns = some_functions(10);
        assert_eq!(fns.len(), 3);
        assert_eq!(fns[0].call(&[]).unwrap(), Value::Int(15));
        assert_eq!(fns[1].call(&[]).unwrap(), Value::Int(10));
        assert_eq!(fns[2].call(&[Value::Int(5)]).unwrap(), Value::Int(5));
    }

    #[test]
    fn test_some_named_functions_by_name() {
        let obj = some_named_functions(10);
        assert_eq!(obj.call("plusFive", &[]).unwrap(), Value::Int(15));
        assert_eq!(obj.call("just", &[]).unwrap(), Value::Int(10));
        assert_eq!(obj.call("minus", &[Value::Int(5)]).unwrap(), Value::Int(5));
        assert_eq!(obj.names().collect::<Vec<_>>(), vec!["just", "minus", "plusFive"]);
    }

    #[test]
    fn test_minus_out_of_contract_is_missing() {
        let obj = some_named_functions(10);
        assert_eq!(obj.call("minus", &[]).unwrap(), Value::Missing);
        assert_eq!(obj.call("minus", &[Value::Missing]).unwrap(), Value::Missing);
        // surplus arguments are ignored
        assert_eq!(
            obj.call("minus", &[Value::Int(3), Value::Int(100)]).unwrap(),
            Value::Int(7)
        );
        assert_eq!(obj.call("just", &[Value::Int(99)]).unwrap(), Value::Int(10));
    }

    #[test]
    fn test_overflow_is_missing_not_wrapped() {
        let big = some_named_functions(i64::MAX);
        assert_eq!(big.call("plusFive", &[]).unwrap(), Value::Missing);
        assert_eq!(big.call("just", &[]).unwrap(), Value::Int(i64::MAX));
        assert_eq!(big.call("minus", &[Value::Int(-1)]).unwrap(), Value::Missing);

        let small = some_functions(i64::MIN);
        assert_eq!(small[2].call(&[Value::Int(1)]).unwrap(), Value::Missing);
        assert_eq!(small[2].call(&[Value::Int(-1)]).unwrap(), Value::Int(i64::MIN + 1));
    }
}
