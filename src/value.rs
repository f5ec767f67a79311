use std::fmt;
use std::str::FromStr;

/// Argument and result type of members invoked through an [`Instance`](crate::Instance).
///
/// Members are called with a slice of values so that thunks, unary functions and
/// counters can live in the same mapping. A call that is outside a member's
/// contract (e.g. `minus` without an argument) yields [`Value::Missing`] instead
/// of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Value {
    /// A plain integer. Counters are unbounded in spirit and may go negative.
    Int(i64),
    /// Sentinel for "no meaningful value", printed as `undefined`.
    Missing,
}

impl Value {
    /// Returns the integer if this is [`Value::Int`].
    pub fn as_int(self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(n),
            Value::Missing => None,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Missing => f.write_str("undefined"),
        }
    }
}

impl FromStr for Value {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        if s == "undefined" {
            return Ok(Value::Missing);
        }
        s.parse::<i64>()
            .map(Value::Int)
            .map_err(|e| anyhow::anyhow!("not an integer: {}: {}", s, e))
    }
}

/// Reads the `index`-th argument as an integer, or `None` when it is absent or missing.
pub(crate) fn int_arg(args: &[Value], index: usize) -> Option<i64> {
    args.get(index).and_then(|v| v.as_int())
}
