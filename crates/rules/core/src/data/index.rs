use std::sync::Arc;

use super::source::{AssetDefinition, DataSource, MoveDefinition, OracleDefinition};
use crate::collections::{ProjectableMap, Revision, VersionedMap};

/// Any indexed definition.
#[derive(Clone, Debug, PartialEq)]
pub enum DataEntry {
    Asset(Arc<AssetDefinition>),
    Move(Arc<MoveDefinition>),
    Oracle(Arc<OracleDefinition>),
}

/// A value tagged with the source that contributed it.
#[derive(Clone, Debug, PartialEq)]
pub struct Sourced<T> {
    pub source: Arc<str>,
    pub priority: i32,
    pub value: T,
    order: u64,
}

/// Every contribution to one id, best first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Candidates {
    entries: Vec<Sourced<DataEntry>>,
}

impl Candidates {
    /// The contribution consumers see: highest priority, then most recent.
    pub fn visible(&self) -> Option<&Sourced<DataEntry>> {
        self.entries.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sourced<DataEntry>> {
        self.entries.iter()
    }

    fn push(&mut self, entry: Sourced<DataEntry>) {
        self.entries.push(entry);
        self.entries.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| b.order.cmp(&a.order))
        });
    }

    fn contains_source(&self, source: &str) -> bool {
        self.entries.iter().any(|e| &*e.source == source)
    }

    fn without_source(&self, source: &str) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|e| &*e.source != source)
                .cloned()
                .collect(),
        }
    }
}

/// Assets, moves and oracles from every loaded source, keyed by id.
///
/// Re-indexing a source replaces its whole contribution in a single revision,
/// so other sources never observe a half-replaced catalog.
#[derive(Debug, Default)]
pub struct DataIndex {
    entries: VersionedMap<String, Candidates>,
    next_order: u64,
}

impl DataIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revision(&self) -> Revision {
        self.entries.revision()
    }

    /// Replaces everything `source` contributed with `data`.
    pub fn index_source(&mut self, source: &str, priority: i32, data: DataSource) {
        let order = self.next_order();
        self.entries.as_single_revision(|map| {
            Self::drop_source(map, source);
            Self::insert_source(map, source, priority, order, data);
        });
    }

    /// Drops every source in `stale`, then indexes each of `fresh`, all in a
    /// single revision.
    pub fn replace_sources<'a>(
        &mut self,
        stale: impl IntoIterator<Item = &'a str>,
        fresh: impl IntoIterator<Item = (String, i32, DataSource)>,
    ) {
        let fresh: Vec<_> = fresh
            .into_iter()
            .map(|(source, priority, data)| (source, priority, self.next_order(), data))
            .collect();
        self.entries.as_single_revision(|map| {
            for source in stale {
                Self::drop_source(map, source);
            }
            for (source, priority, order, data) in fresh {
                Self::drop_source(map, &source);
                Self::insert_source(map, &source, priority, order, data);
            }
        });
    }

    fn next_order(&mut self) -> u64 {
        let order = self.next_order;
        self.next_order += 1;
        order
    }

    fn insert_source(
        map: &mut VersionedMap<String, Candidates>,
        source: &str,
        priority: i32,
        order: u64,
        data: DataSource,
    ) {
        let source: Arc<str> = Arc::from(source);
        let DataSource {
            assets,
            moves,
            oracles,
        } = data;
        let items = assets
            .into_iter()
            .map(|(id, asset)| (id, DataEntry::Asset(Arc::new(asset))))
            .chain(
                moves
                    .into_iter()
                    .map(|(id, mv)| (id, DataEntry::Move(Arc::new(mv)))),
            )
            .chain(
                oracles
                    .into_iter()
                    .map(|(id, oracle)| (id, DataEntry::Oracle(Arc::new(oracle)))),
            );
        for (id, value) in items {
            let mut candidates = map.get(&id).cloned().unwrap_or_default();
            candidates.push(Sourced {
                source: Arc::clone(&source),
                priority,
                value,
                order,
            });
            map.insert(id, candidates);
        }
    }

    /// Removes everything `source` contributed. Returns false if it had nothing indexed.
    pub fn remove_source(&mut self, source: &str) -> bool {
        self.entries
            .as_single_revision(|map| Self::drop_source(map, source))
    }

    fn drop_source(map: &mut VersionedMap<String, Candidates>, source: &str) -> bool {
        let touched: Vec<String> = map
            .iter()
            .filter(|(_, candidates)| candidates.contains_source(source))
            .map(|(id, _)| id.clone())
            .collect();
        for id in &touched {
            let remaining = map
                .get(id)
                .map(|candidates| candidates.without_source(source))
                .unwrap_or_default();
            if remaining.entries.is_empty() {
                map.remove(id);
            } else {
                map.insert(id.clone(), remaining);
            }
        }
        !touched.is_empty()
    }

    /// All contributions for `id`.
    pub fn candidates(&self, id: &str) -> Option<&Candidates> {
        self.entries.get(id)
    }

    pub fn entries(&self) -> &VersionedMap<String, Candidates> {
        &self.entries
    }

    pub fn assets(&self) -> impl ProjectableMap<String, Arc<AssetDefinition>> + '_ {
        self.entries
            .projected(|candidates: &Candidates, _: &String| {
                match &candidates.visible()?.value {
                    DataEntry::Asset(asset) => Some(Arc::clone(asset)),
                    _ => None,
                }
            })
    }

    pub fn moves(&self) -> impl ProjectableMap<String, Arc<MoveDefinition>> + '_ {
        self.entries
            .projected(|candidates: &Candidates, _: &String| {
                match &candidates.visible()?.value {
                    DataEntry::Move(mv) => Some(Arc::clone(mv)),
                    _ => None,
                }
            })
    }

    pub fn oracles(&self) -> impl ProjectableMap<String, Arc<OracleDefinition>> + '_ {
        self.entries
            .projected(|candidates: &Candidates, _: &String| {
                match &candidates.visible()?.value {
                    DataEntry::Oracle(oracle) => Some(Arc::clone(oracle)),
                    _ => None,
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::source::{OracleRow, RollType};

    fn move_def(name: &str) -> MoveDefinition {
        MoveDefinition {
            name: name.into(),
            roll_type: RollType::ActionRoll,
            trigger: String::new(),
            text: String::new(),
        }
    }

    fn source_with_moves(names: &[(&str, &str)]) -> DataSource {
        let mut source = DataSource::default();
        for (id, name) in names {
            source.moves.insert((*id).into(), move_def(name));
        }
        source
    }

    #[test]
    fn higher_priority_wins_and_ties_go_to_the_latest() {
        let mut index = DataIndex::new();
        index.index_source("core", 0, source_with_moves(&[("move:a", "Core A")]));
        index.index_source("homebrew", 10, source_with_moves(&[("move:a", "Brew A")]));
        index.index_source("expansion", 0, source_with_moves(&[("move:a", "Exp A")]));

        assert_eq!(index.moves().get("move:a").unwrap().name, "Brew A");

        index.remove_source("homebrew");
        assert_eq!(index.moves().get("move:a").unwrap().name, "Exp A");
        assert_eq!(index.candidates("move:a").unwrap().iter().count(), 2);
    }

    #[test]
    fn reindexing_a_source_is_a_single_revision() {
        let mut index = DataIndex::new();
        index.index_source("core", 0, source_with_moves(&[("move:a", "A"), ("move:b", "B")]));
        index.index_source("other", 0, source_with_moves(&[("move:z", "Z")]));
        let before = index.revision();

        index.index_source("core", 0, source_with_moves(&[("move:b", "B2"), ("move:c", "C")]));
        assert_eq!(index.revision(), before + 1);

        let moves = index.moves();
        assert!(!moves.contains_key("move:a"));
        assert_eq!(moves.get("move:b").unwrap().name, "B2");
        assert!(moves.contains_key("move:c"));
        assert!(moves.contains_key("move:z"));
        assert_eq!(moves.revision(), index.revision());
    }

    #[test]
    fn replacing_sources_is_a_single_revision() {
        let mut index = DataIndex::new();
        index.index_source("core", 0, source_with_moves(&[("move:a", "A")]));
        index.index_source("brew", 5, source_with_moves(&[("move:b", "B")]));
        index.index_source("old", 5, source_with_moves(&[("move:c", "C")]));
        let before = index.revision();

        index.replace_sources(
            ["brew", "old"],
            [
                ("brew".to_string(), 5, source_with_moves(&[("move:a", "Brew A")])),
                ("new".to_string(), 5, source_with_moves(&[("move:d", "D")])),
            ],
        );
        assert_eq!(index.revision(), before + 1);

        let moves = index.moves();
        assert_eq!(moves.get("move:a").unwrap().name, "Brew A");
        assert!(!moves.contains_key("move:b"));
        assert!(!moves.contains_key("move:c"));
        assert!(moves.contains_key("move:d"));
    }

    #[test]
    fn removing_an_unknown_source_is_a_no_op() {
        let mut index = DataIndex::new();
        index.index_source("core", 0, source_with_moves(&[("move:a", "A")]));
        let before = index.revision();
        assert!(!index.remove_source("missing"));
        assert_eq!(index.revision(), before);
        assert!(index.remove_source("core"));
        assert!(index.entries().is_empty());
    }

    #[test]
    fn projections_split_by_kind() {
        let mut source = source_with_moves(&[("move:a", "A")]);
        source.oracles.insert(
            "oracle:x".into(),
            OracleDefinition {
                name: "X".into(),
                dice: "1d6".into(),
                rows: vec![OracleRow {
                    min: 1,
                    max: 6,
                    result: "yes".into(),
                }],
            },
        );
        let mut index = DataIndex::new();
        index.index_source("core", 0, source);

        assert_eq!(index.moves().len(), 1);
        assert_eq!(index.oracles().len(), 1);
        assert!(index.assets().is_empty());
        assert!(!index.moves().contains_key("oracle:x"));
    }
}
