use std::borrow::Cow;

use regex::Regex;
use std::sync::LazyLock;

static MODULE_MATCHER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:\w+::)").unwrap());

/// `std::any::type_name` without the module paths, used to name optimizations in diagnostics.
pub fn pretty_type_name<T: ?Sized>() -> Cow<'static, str> {
  let type_name = std::any::type_name::<T>();
  MODULE_MATCHER_RE.replace_all(type_name, "")
}

#[test]
fn test_pretty_type_name() {
  struct LimitChunkCount;
  assert_eq!(pretty_type_name::<LimitChunkCount>(), "LimitChunkCount");
  assert_eq!(pretty_type_name::<std::option::Option<LimitChunkCount>>(), "Option<LimitChunkCount>");
  assert_eq!(pretty_type_name::<std::vec::Vec<std::string::String>>(), "Vec<String>");
}
