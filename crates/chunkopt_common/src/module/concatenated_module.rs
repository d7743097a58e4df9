use arcstr::ArcStr;
use itertools::Itertools;

/// A root module with the modules hoisted into its scope.
#[derive(Debug)]
pub struct ConcatenatedModule {
  pub root_identifier: ArcStr,
  pub identifier: ArcStr,
  /// Every concatenated module, root included, with its size.
  pub inner: Vec<(ArcStr, u64)>,
  pub size: u64,
}

impl ConcatenatedModule {
  pub fn new(root_identifier: ArcStr, inner: Vec<(ArcStr, u64)>) -> Self {
    let identifier = std::iter::once(root_identifier.as_str())
      .chain(
        inner
          .iter()
          .map(|(identifier, _)| identifier.as_str())
          .filter(|identifier| *identifier != root_identifier.as_str()),
      )
      .join(" ");
    let size = inner.iter().map(|(_, size)| size).sum();
    Self { root_identifier, identifier: identifier.into(), inner, size }
  }
}

#[test]
fn test_concatenated_identity() {
  let module = ConcatenatedModule::new(
    arcstr::literal!("./index.js"),
    vec![(arcstr::literal!("./index.js"), 10), (arcstr::literal!("./util.js"), 5)],
  );
  assert_eq!(module.identifier, "./index.js ./util.js");
  assert_eq!(module.size, 15);
}
