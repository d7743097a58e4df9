pub mod concatenated_module;
pub mod external_module;
pub mod module_table;
pub mod normal_module;

use crate::{Chunk, ChunkIdx, ConcatenatedModule, ExternalModule, ModuleIdx, NormalModule, Reason};

/// What kind of module this is. The graph only ever asks a kind for its identity and size.
#[derive(Debug)]
pub enum ModuleKind {
  Normal(Box<NormalModule>),
  External(Box<ExternalModule>),
  Concatenated(Box<ConcatenatedModule>),
}

impl ModuleKind {
  /// Unique and stable across builds. Used for identity and every tie-break.
  pub fn identifier(&self) -> &str {
    match self {
      Self::Normal(v) => &v.request,
      Self::External(v) => &v.identifier,
      Self::Concatenated(v) => &v.identifier,
    }
  }

  pub fn size(&self) -> u64 {
    match self {
      Self::Normal(v) => v.size,
      Self::External(_) => ExternalModule::SIZE,
      Self::Concatenated(v) => v.size,
    }
  }

  /// Whether the module may be moved into `chunk` by commons extraction.
  pub fn chunk_condition(&self, chunk: &Chunk) -> bool {
    match self {
      Self::External(_) => chunk.has_entry_module(),
      Self::Normal(_) | Self::Concatenated(_) => true,
    }
  }
}

impl From<NormalModule> for ModuleKind {
  fn from(module: NormalModule) -> Self {
    Self::Normal(Box::new(module))
  }
}

impl From<ExternalModule> for ModuleKind {
  fn from(module: ExternalModule) -> Self {
    Self::External(Box::new(module))
  }
}

impl From<ConcatenatedModule> for ModuleKind {
  fn from(module: ConcatenatedModule) -> Self {
    Self::Concatenated(Box::new(module))
  }
}

#[derive(Debug)]
pub struct Module {
  pub idx: ModuleIdx,
  pub debug_id: u32,
  /// Assigned after module ordering.
  pub id: Option<u32>,
  pub last_id: Option<u32>,
  pub kind: ModuleKind,
  pub chunks: Vec<ChunkIdx>,
  pub reasons: Vec<Reason>,
}

impl Module {
  pub fn new(idx: ModuleIdx, debug_id: u32, kind: ModuleKind) -> Self {
    Self { idx, debug_id, id: None, last_id: None, kind, chunks: Vec::new(), reasons: Vec::new() }
  }

  pub fn identifier(&self) -> &str {
    self.kind.identifier()
  }

  pub fn size(&self) -> u64 {
    self.kind.size()
  }

  pub fn is_in_chunk(&self, chunk: ChunkIdx) -> bool {
    self.chunks.contains(&chunk)
  }

  pub fn add_reason(&mut self, module: Option<ModuleIdx>, dependency: arcstr::ArcStr) {
    self.reasons.push(Reason::new(module, dependency));
  }

  pub fn remove_reason(&mut self, module: Option<ModuleIdx>, dependency: &str) -> bool {
    if let Some(idx) = self.reasons.iter().position(|r| r.is_from(module, dependency)) {
      self.reasons.remove(idx);
      true
    } else {
      false
    }
  }

  /// Forgets everything derived from the current build. The identity survives.
  ///
  /// Only call this on a module whose chunks no longer list it.
  pub fn disconnect(&mut self) {
    self.reasons.clear();
    self.unseal();
  }

  pub fn unseal(&mut self) {
    if self.id.is_some() {
      self.last_id = self.id;
    }
    self.id = None;
    self.chunks.clear();
  }
}

impl std::fmt::Display for Module {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self.id {
      Some(id) => write!(f, "Module[{id}]"),
      None => write!(f, "Module[{}]", self.debug_id),
    }
  }
}

#[test]
fn test_disconnect_keeps_identity() {
  let mut module = Module::new(
    ModuleIdx::from_raw(0),
    1000,
    NormalModule::new("./a.js".into(), "/src/a.js".into(), 120).into(),
  );
  module.id = Some(7);
  module.chunks.push(ChunkIdx::from_raw(3));
  module.add_reason(None, arcstr::literal!("entry"));

  module.disconnect();
  assert_eq!(module.id, None);
  assert_eq!(module.last_id, Some(7));
  assert!(module.chunks.is_empty());
  assert!(module.reasons.is_empty());
  assert_eq!(module.identifier(), "./a.js");
  assert_eq!(module.to_string(), "Module[1000]");
}

#[test]
fn test_remove_reason() {
  let mut module = Module::new(
    ModuleIdx::from_raw(1),
    1001,
    NormalModule::new("./b.js".into(), "/src/b.js".into(), 1).into(),
  );
  let importer = Some(ModuleIdx::from_raw(0));
  module.add_reason(importer, arcstr::literal!("import './b'"));
  assert!(!module.remove_reason(importer, "require('./b')"));
  assert!(module.remove_reason(importer, "import './b'"));
  assert!(module.reasons.is_empty());
}
