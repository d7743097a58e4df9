//! A plain data form of a chunk graph, for handing graphs built elsewhere to the optimizer and
//! for reporting results.
//!
//! Modules are referenced by their identifier as the graph computes it, e.g. `external "react"`
//! for an external module with request `react`. Chunks are referenced by their position in
//! `chunks`, followed by the positions in `extracted_chunks`.

use arcstr::ArcStr;
use chunkopt_common::{
  ChunkIdx, ConcatenatedModule, ExternalModule, ModuleIdx, ModuleKind, NormalModule, Origin,
  Reason, SourceLocation,
};
use chunkopt_error::BuildResult;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::chunk_graph::ChunkGraph;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
  pub modules: Vec<ModuleSnapshot>,
  pub chunks: Vec<ChunkSnapshot>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub extracted_chunks: Vec<ChunkSnapshot>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub blocks: Vec<BlockSnapshot>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub entrypoints: Vec<EntrypointSnapshot>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleType {
  #[default]
  Normal,
  External,
  Concatenated,
}

impl ModuleType {
  #[allow(clippy::trivially_copy_pass_by_ref)]
  fn is_normal(&self) -> bool {
    *self == Self::Normal
  }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleSnapshot {
  /// The request of normal and external modules, the root module of concatenated ones.
  pub request: String,
  #[serde(rename = "type", default, skip_serializing_if = "ModuleType::is_normal")]
  pub module_type: ModuleType,
  #[serde(default)]
  pub size: u64,
  /// Defaults to the request.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub resource: Option<String>,
  /// The modules concatenated into a concatenated module, root included.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub modules: Vec<InnerModuleSnapshot>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<u32>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub reasons: Vec<ReasonSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InnerModuleSnapshot {
  pub identifier: String,
  pub size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasonSnapshot {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub module: Option<String>,
  pub dependency: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub chunks: Option<Vec<usize>>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkSnapshot {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<u32>,
  #[serde(default)]
  pub modules: Vec<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub parents: Vec<usize>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub entry_module: Option<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub origins: Vec<OriginSnapshot>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub filename_template: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub chunk_reason: Option<String>,
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub extra_async: bool,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct OriginSnapshot {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub module: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub loc: Option<SourceLocation>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub reasons: Vec<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSnapshot {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub module: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub loc: Option<SourceLocation>,
  /// `None` once every chunk implementing the block was removed.
  pub chunks: Option<Vec<usize>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub chunk_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntrypointSnapshot {
  pub name: String,
  pub chunks: Vec<usize>,
}

/// Resolves references while a graph is built from a snapshot. Unknown references are collected
/// instead of aborting at the first one.
struct SnapshotLoader {
  graph: ChunkGraph,
  modules: FxHashMap<String, ModuleIdx>,
  chunks: Vec<ChunkIdx>,
  errors: Vec<anyhow::Error>,
}

impl SnapshotLoader {
  fn module(&mut self, identifier: &str) -> Option<ModuleIdx> {
    let module = self.modules.get(identifier).copied();
    if module.is_none() {
      self.errors.push(anyhow::anyhow!("Snapshot references unknown module {identifier:?}"));
    }
    module
  }

  fn chunk(&mut self, position: usize) -> Option<ChunkIdx> {
    let chunk = self.chunks.get(position).copied();
    if chunk.is_none() {
      self.errors.push(anyhow::anyhow!("Snapshot references unknown chunk #{position}"));
    }
    chunk
  }

  fn optional_module(&mut self, identifier: Option<&String>) -> Option<ModuleIdx> {
    identifier.and_then(|identifier| self.module(identifier))
  }

  fn add_module(&mut self, snapshot: &ModuleSnapshot) {
    let request = ArcStr::from(snapshot.request.as_str());
    let kind: ModuleKind = match snapshot.module_type {
      ModuleType::Normal => {
        let resource = snapshot.resource.as_deref().map_or_else(|| request.clone(), ArcStr::from);
        NormalModule::new(request, resource, snapshot.size).into()
      }
      ModuleType::External => ExternalModule::new(request).into(),
      ModuleType::Concatenated => {
        let inner = snapshot
          .modules
          .iter()
          .map(|inner| (ArcStr::from(inner.identifier.as_str()), inner.size))
          .collect();
        ConcatenatedModule::new(request, inner).into()
      }
    };
    let identifier = kind.identifier().to_string();
    let module = self.graph.add_module(kind);
    self.graph.module_table[module].id = snapshot.id;
    if self.modules.insert(identifier.clone(), module).is_some() {
      self.errors.push(anyhow::anyhow!("Snapshot contains module {identifier:?} twice"));
    }
  }

  fn fill_chunk(&mut self, chunk: ChunkIdx, snapshot: &ChunkSnapshot) {
    for identifier in &snapshot.modules {
      if let Some(module) = self.module(identifier) {
        self.graph.add_module_to_chunk(chunk, module);
      }
    }
    for position in &snapshot.parents {
      if let Some(parent) = self.chunk(*position) {
        self.graph.connect_chunks(parent, chunk);
      }
    }
    let entry_module = self.optional_module(snapshot.entry_module.as_ref());
    let mut origins = Vec::with_capacity(snapshot.origins.len());
    for origin in &snapshot.origins {
      let module = self.optional_module(origin.module.as_ref());
      let mut loaded = Origin::new(module, origin.loc, origin.name.as_deref().map(ArcStr::from));
      loaded.reasons = origin.reasons.iter().map(|reason| ArcStr::from(reason.as_str())).collect();
      origins.push(loaded);
    }

    let chunk = &mut self.graph.chunk_table[chunk];
    chunk.entry_module = entry_module;
    chunk.origins = origins;
    chunk.filename_template = snapshot.filename_template.as_deref().map(ArcStr::from);
    chunk.chunk_reason = snapshot.chunk_reason.as_deref().map(ArcStr::from);
    chunk.extra_async = snapshot.extra_async;
  }

  fn add_reasons(&mut self, module: ModuleIdx, snapshot: &ModuleSnapshot) {
    for reason in &snapshot.reasons {
      let origin = self.optional_module(reason.module.as_ref());
      let mut loaded = Reason::new(origin, ArcStr::from(reason.dependency.as_str()));
      loaded.chunks = reason
        .chunks
        .as_ref()
        .map(|chunks| chunks.iter().filter_map(|position| self.chunk(*position)).collect());
      self.graph.module_table[module].reasons.push(loaded);
    }
  }
}

impl ChunkGraph {
  /// Builds a graph from `snapshot`. Every dangling reference is reported.
  pub fn from_snapshot(snapshot: &GraphSnapshot) -> BuildResult<Self> {
    let mut loader = SnapshotLoader {
      graph: Self::new(),
      modules: FxHashMap::default(),
      chunks: Vec::new(),
      errors: Vec::new(),
    };

    for module in &snapshot.modules {
      loader.add_module(module);
    }

    for (extracted, chunks) in [(false, &snapshot.chunks), (true, &snapshot.extracted_chunks)] {
      for chunk in chunks {
        let idx = loader.graph.create_chunk(chunk.name.as_deref().map(ArcStr::from));
        loader.graph.chunk_table[idx].id = chunk.id;
        if extracted {
          loader.graph.extracted_chunks.push(idx);
        } else {
          loader.graph.chunks.push(idx);
        }
        loader.chunks.push(idx);
      }
    }
    let chunk_snapshots = snapshot.chunks.iter().chain(&snapshot.extracted_chunks);
    for (position, chunk) in chunk_snapshots.enumerate() {
      loader.fill_chunk(loader.chunks[position], chunk);
    }

    for (position, module) in snapshot.modules.iter().enumerate() {
      loader.add_reasons(loader.graph.sorted_modules[position], module);
    }

    for block in &snapshot.blocks {
      let module = loader.optional_module(block.module.as_ref());
      let name = block.name.as_deref().map(ArcStr::from);
      let idx = loader.graph.create_block(name, module, block.loc);
      match &block.chunks {
        Some(chunks) => {
          for position in chunks {
            if let Some(chunk) = loader.chunk(*position) {
              loader.graph.connect_block(chunk, idx);
            }
          }
        }
        None => loader.graph.blocks[idx].chunks = None,
      }
      loader.graph.blocks[idx].chunk_reason = block.chunk_reason.as_deref().map(ArcStr::from);
    }

    for entrypoint in &snapshot.entrypoints {
      let idx = loader.graph.create_entrypoint(ArcStr::from(entrypoint.name.as_str()));
      for position in &entrypoint.chunks {
        if let Some(chunk) = loader.chunk(*position) {
          loader.graph.add_chunk_to_entrypoint(idx, chunk);
        }
      }
    }

    if !loader.errors.is_empty() {
      return Err(loader.errors.into());
    }
    Ok(loader.graph)
  }

  /// Dumps the chunks that are still part of the output, with everything they reference.
  pub fn to_snapshot(&self) -> GraphSnapshot {
    let positions = self
      .chunks
      .iter()
      .chain(&self.extracted_chunks)
      .enumerate()
      .map(|(position, chunk)| (*chunk, position))
      .collect::<FxHashMap<_, _>>();
    let positions_of = |chunks: &[ChunkIdx]| {
      chunks.iter().filter_map(|chunk| positions.get(chunk).copied()).collect::<Vec<_>>()
    };
    let identifier = |module: ModuleIdx| self.identifier(module).to_string();

    let modules = self
      .sorted_modules
      .iter()
      .map(|&module| {
        let module = &self.module_table[module];
        let (request, module_type, resource, inner) = match &module.kind {
          ModuleKind::Normal(normal) => {
            let resource =
              (normal.resource != normal.request).then(|| normal.resource.to_string());
            (normal.request.to_string(), ModuleType::Normal, resource, Vec::new())
          }
          ModuleKind::External(external) => {
            (external.request.to_string(), ModuleType::External, None, Vec::new())
          }
          ModuleKind::Concatenated(concatenated) => {
            let inner = concatenated
              .inner
              .iter()
              .map(|(identifier, size)| InnerModuleSnapshot {
                identifier: identifier.to_string(),
                size: *size,
              })
              .collect();
            (concatenated.root_identifier.to_string(), ModuleType::Concatenated, None, inner)
          }
        };
        ModuleSnapshot {
          request,
          module_type,
          size: module.size(),
          resource,
          modules: inner,
          id: module.id,
          reasons: module
            .reasons
            .iter()
            .map(|reason| ReasonSnapshot {
              module: reason.module.map(identifier),
              dependency: reason.dependency.to_string(),
              chunks: reason.chunks.as_ref().map(|chunks| {
                chunks.iter().filter_map(|chunk| positions.get(chunk).copied()).collect()
              }),
            })
            .collect(),
        }
      })
      .collect();

    let chunk_snapshot = |chunk: &ChunkIdx| {
      let chunk = &self.chunk_table[*chunk];
      ChunkSnapshot {
        name: chunk.name.as_ref().map(ToString::to_string),
        id: chunk.id,
        modules: chunk.modules.iter().map(|module| identifier(*module)).collect(),
        parents: positions_of(&chunk.parents),
        entry_module: chunk.entry_module.map(identifier),
        origins: chunk
          .origins
          .iter()
          .map(|origin| OriginSnapshot {
            module: origin.module.map(identifier),
            loc: origin.loc,
            name: origin.name.as_ref().map(ToString::to_string),
            reasons: origin.reasons.iter().map(ToString::to_string).collect(),
          })
          .collect(),
        filename_template: chunk.filename_template.as_ref().map(ToString::to_string),
        chunk_reason: chunk.chunk_reason.as_ref().map(ToString::to_string),
        extra_async: chunk.extra_async,
      }
    };

    let blocks = self
      .blocks
      .iter()
      .filter(|block| match &block.chunks {
        Some(chunks) => chunks.iter().any(|chunk| positions.contains_key(chunk)),
        None => true,
      })
      .map(|block| BlockSnapshot {
        name: block.name.as_ref().map(ToString::to_string),
        module: block.module.map(identifier),
        loc: block.loc,
        chunks: block.chunks.as_deref().map(positions_of),
        chunk_reason: block.chunk_reason.as_ref().map(ToString::to_string),
      })
      .collect();

    GraphSnapshot {
      modules,
      chunks: self.chunks.iter().map(chunk_snapshot).collect(),
      extracted_chunks: self.extracted_chunks.iter().map(chunk_snapshot).collect(),
      blocks,
      entrypoints: self
        .entrypoints
        .iter()
        .map(|entrypoint| EntrypointSnapshot {
          name: entrypoint.name.to_string(),
          chunks: positions_of(&entrypoint.chunks),
        })
        .collect(),
    }
  }
}
