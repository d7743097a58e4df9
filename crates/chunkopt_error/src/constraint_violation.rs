/// A broken graph invariant. Chunks are named by their debug id.
///
/// These never describe user mistakes: an optimization that produces one has a bug.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstraintViolation {
  #[error("checkConstraints: duplicate child in chunk {chunk} {child}")]
  DuplicateChild { chunk: u32, child: u32 },
  #[error("checkConstraints: child missing parent {chunk} -> {child}")]
  ChildMissingParent { chunk: u32, child: u32 },
  #[error("checkConstraints: duplicate parent in chunk {chunk} {parent}")]
  DuplicateParent { chunk: u32, parent: u32 },
  #[error("checkConstraints: parent missing child {parent} <- {chunk}")]
  ParentMissingChild { chunk: u32, parent: u32 },
  #[error("checkConstraints: chunk {chunk} references itself")]
  SelfReference { chunk: u32 },
  #[error("checkConstraints: module {module} missing chunk {chunk}")]
  ModuleMissingChunk { chunk: u32, module: String },
  #[error("checkConstraints: chunk {chunk} missing module {module}")]
  ChunkMissingModule { chunk: u32, module: String },
  #[error("insertChunk: chunk {before} is not part of entrypoint {entrypoint}")]
  EntrypointMissingChunk { entrypoint: String, before: u32 },
}
