/// Builds an argument list, converting each element with `Into`.
///
/// The target type comes from the call site: call arguments become
/// `Vec<Value>`, stub and verification arguments become `Vec<Matcher>`.
///
/// ```rust
/// use understudy::{Matcher, Value, args, less_than};
///
/// let call: Vec<Value> = args!["hunter", 67, 2.5];
/// let wanted: Vec<Matcher> = args!["hunter", less_than(100)];
/// let none: Vec<Value> = args![];
///
/// assert_eq!(call.len(), 3);
/// assert_eq!(wanted[1].description(), "less than 100");
/// assert!(none.is_empty());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        ::std::vec::Vec::new()
    };
    ($($arg:expr),+ $(,)?) => {
        ::std::vec![$(::std::convert::Into::into($arg)),+]
    };
}
