use arcstr::ArcStr;

#[derive(Debug)]
pub struct ExternalModule {
  pub request: ArcStr,
  pub identifier: ArcStr,
}

impl ExternalModule {
  /// Externals render to a one-line reference; a rough fixed estimate is enough.
  pub const SIZE: u64 = 42;

  pub fn new(request: ArcStr) -> Self {
    let identifier = arcstr::format!("external {request:?}");
    Self { request, identifier }
  }
}

#[test]
fn test_external_identifier() {
  let module = ExternalModule::new(arcstr::literal!("react"));
  assert_eq!(module.identifier, "external \"react\"");
}
