use std::hash::{BuildHasherDefault, Hash};

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHasher;

pub type FxIndexSet<T> = IndexSet<T, BuildHasherDefault<FxHasher>>;
pub type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

pub trait FxIndexSetExt<T> {
  /// Replaces `old` with every item of `new` at the position `old` occupied. An item occurring
  /// twice keeps its first position. Returns `false` if `old` is not a member.
  fn replace_in_place(&mut self, old: &T, new: impl IntoIterator<Item = T>) -> bool;
}

impl<T: Hash + Eq + Clone> FxIndexSetExt<T> for FxIndexSet<T> {
  fn replace_in_place(&mut self, old: &T, new: impl IntoIterator<Item = T>) -> bool {
    if !self.contains(old) {
      return false;
    }
    let mut new = Some(new);
    let mut rewritten =
      FxIndexSet::with_capacity_and_hasher(self.len(), BuildHasherDefault::default());
    for item in self.drain(..) {
      if &item == old {
        if let Some(new) = new.take() {
          rewritten.extend(new);
        }
      } else {
        rewritten.insert(item);
      }
    }
    *self = rewritten;
    true
  }
}

#[test]
fn test_replace_in_place() {
  let mut set: FxIndexSet<u32> = [1, 2, 3].into_iter().collect();
  assert!(set.replace_in_place(&2, [4, 1, 5]));
  assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![1, 4, 5, 3]);

  let mut set: FxIndexSet<u32> = [1, 2].into_iter().collect();
  assert!(!set.replace_in_place(&7, [8]));
  assert_eq!(set.len(), 2);
}
