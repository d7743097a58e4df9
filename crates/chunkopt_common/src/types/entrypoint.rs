use arcstr::ArcStr;

use crate::ChunkIdx;

/// The chunks that have to be loaded, in order, before the entry named `name` can run.
#[derive(Debug, Clone)]
pub struct Entrypoint {
  pub name: ArcStr,
  pub chunks: Vec<ChunkIdx>,
}

impl Entrypoint {
  pub fn new(name: ArcStr) -> Self {
    Self { name, chunks: Vec::new() }
  }

  /// The first chunk carries the runtime.
  pub fn runtime_chunk(&self) -> Option<ChunkIdx> {
    self.chunks.first().copied()
  }

  /// Returns `true` if `chunk` was not part of the entrypoint before.
  pub fn unshift_chunk(&mut self, chunk: ChunkIdx) -> bool {
    if let Some(idx) = self.chunks.iter().position(|c| *c == chunk) {
      self.chunks.remove(idx);
      self.chunks.insert(0, chunk);
      false
    } else {
      self.chunks.insert(0, chunk);
      true
    }
  }

  /// Places `chunk` right before `before` unless it is already loaded earlier.
  ///
  /// Returns `None` if `before` is not part of the entrypoint, otherwise whether `chunk` joined
  /// the entrypoint.
  pub fn insert_chunk(&mut self, chunk: ChunkIdx, before: ChunkIdx) -> Option<bool> {
    let idx = self.chunks.iter().position(|c| *c == before)?;
    match self.chunks.iter().position(|c| *c == chunk) {
      Some(old_idx) if old_idx > idx => {
        self.chunks.remove(old_idx);
        self.chunks.insert(idx, chunk);
        Some(false)
      }
      Some(_) => Some(false),
      None => {
        self.chunks.insert(idx, chunk);
        Some(true)
      }
    }
  }

  pub fn remove_chunk(&mut self, chunk: ChunkIdx) -> bool {
    let len = self.chunks.len();
    self.chunks.retain(|c| *c != chunk);
    self.chunks.len() != len
  }
}

#[test]
fn test_insert_chunk() {
  let [a, b, c] = [ChunkIdx::from_raw(0), ChunkIdx::from_raw(1), ChunkIdx::from_raw(2)];
  let mut entrypoint = Entrypoint::new(arcstr::literal!("main"));
  entrypoint.chunks = vec![a, b];

  assert_eq!(entrypoint.insert_chunk(c, b), Some(true));
  assert_eq!(entrypoint.chunks, vec![a, c, b]);

  // Already loaded earlier: stays where it is.
  assert_eq!(entrypoint.insert_chunk(a, b), Some(false));
  assert_eq!(entrypoint.chunks, vec![a, c, b]);

  // Loaded later: moved in front.
  assert_eq!(entrypoint.insert_chunk(b, a), Some(false));
  assert_eq!(entrypoint.chunks, vec![b, a, c]);

  assert_eq!(entrypoint.insert_chunk(a, ChunkIdx::from_raw(9)), None);
  assert_eq!(entrypoint.runtime_chunk(), Some(b));
}

#[test]
fn test_unshift_chunk() {
  let [a, b] = [ChunkIdx::from_raw(0), ChunkIdx::from_raw(1)];
  let mut entrypoint = Entrypoint::new(arcstr::literal!("main"));
  assert!(entrypoint.unshift_chunk(a));
  assert!(entrypoint.unshift_chunk(b));
  assert!(!entrypoint.unshift_chunk(a));
  assert_eq!(entrypoint.chunks, vec![a, b]);
  assert!(entrypoint.remove_chunk(b));
  assert!(!entrypoint.remove_chunk(b));
}
