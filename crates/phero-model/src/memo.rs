//! Per-call memo of named parser models.
//!
//! A symbol enters the memo as `Pending` before its body is synthesized, so a
//! recursive reference back to it resolves to `Reference{name}` instead of
//! recursing. The body replaces the placeholder once it is finished.

use crate::parser_model::{DependencyMap, ParserModel};
use phero_types::SymbolId;
use rustc_hash::FxHashMap;
use tracing::trace;

#[derive(Clone, Debug, PartialEq)]
pub enum MemoEntry {
    Pending,
    Ready(ParserModel),
}

#[derive(Clone, Debug)]
struct Slot {
    name: String,
    entry: MemoEntry,
}

#[derive(Debug, Default)]
pub struct SymbolMemo {
    slots: FxHashMap<SymbolId, Slot>,
    /// Completion order; becomes the dependency-map order.
    completed: Vec<SymbolId>,
}

impl SymbolMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emitted name of a symbol that is pending or ready.
    pub fn lookup(&self, symbol: SymbolId) -> Option<&str> {
        self.slots.get(&symbol).map(|slot| slot.name.as_str())
    }

    /// Insert the placeholder for a symbol about to be synthesized.
    pub fn begin(&mut self, symbol: SymbolId, name: String) {
        trace!(symbol = %symbol, name = %name, "SymbolMemo::begin");
        self.slots.insert(
            symbol,
            Slot {
                name,
                entry: MemoEntry::Pending,
            },
        );
    }

    pub fn complete(&mut self, symbol: SymbolId, model: ParserModel) {
        if let Some(slot) = self.slots.get_mut(&symbol) {
            trace!(symbol = %symbol, name = %slot.name, "SymbolMemo::complete");
            debug_assert!(
                slot.entry == MemoEntry::Pending,
                "symbol synthesized twice"
            );
            slot.entry = MemoEntry::Ready(model);
            self.completed.push(symbol);
        }
    }

    /// Ready models keyed by emitted name, in completion order.
    ///
    /// Entries still pending are left out; a call that returns successfully
    /// never leaves any.
    pub fn into_dependencies(mut self) -> DependencyMap {
        let mut deps = DependencyMap::with_capacity(self.completed.len());
        for symbol in self.completed {
            if let Some(Slot {
                name,
                entry: MemoEntry::Ready(model),
            }) = self.slots.remove(&symbol)
            {
                deps.insert(name, model);
            }
        }
        deps
    }
}
