use arcstr::ArcStr;

#[derive(Debug)]
pub struct NormalModule {
  /// The full request including loaders; doubles as the module identifier.
  pub request: ArcStr,
  pub resource: ArcStr,
  pub size: u64,
}

impl NormalModule {
  pub fn new(request: ArcStr, resource: ArcStr, size: u64) -> Self {
    Self { request, resource, size }
  }
}
