//! Emitted-name assignment.
//!
//! Downstream code is generated into a single namespace, so every symbol that
//! becomes a dependency or a closure entry needs a name no other symbol uses.
//! Qualified names (`ns.Inner.Color`) are emitted by their last segment.

use crate::error::{ModelExtractionError, Result};
use crate::options::NamePolicy;
use phero_types::{SymbolId, SymbolInfo};
use rustc_hash::FxHashMap;
use tracing::debug;

#[derive(Debug)]
struct Claim {
    symbol: SymbolId,
    module: Option<String>,
}

#[derive(Debug, Default)]
pub struct NameRegistry {
    policy: NamePolicy,
    by_symbol: FxHashMap<SymbolId, String>,
    by_name: FxHashMap<String, Claim>,
}

impl NameRegistry {
    pub fn new(policy: NamePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// The name `symbol` is emitted under, claiming one on first use.
    pub fn name_for(&mut self, symbol: SymbolId, info: &SymbolInfo) -> Result<String> {
        if let Some(name) = self.by_symbol.get(&symbol) {
            return Ok(name.clone());
        }

        let simple = info.simple_name();
        let Some(existing) = self.by_name.get(simple) else {
            return Ok(self.claim(symbol, simple.to_owned(), info));
        };

        let collision = || {
            ModelExtractionError::name_collision(
                symbol,
                simple,
                existing.module.as_deref().unwrap_or("<global>"),
                info.module.as_deref().unwrap_or("<global>"),
            )
        };
        match (self.policy, info.module.as_deref()) {
            (NamePolicy::Reject, _) | (NamePolicy::QualifyByModule, None) => Err(collision()),
            (NamePolicy::QualifyByModule, Some(module)) => {
                let qualified = format!("{module}.{simple}");
                if self.by_name.contains_key(&qualified) {
                    return Err(collision());
                }
                debug!(
                    symbol = %symbol,
                    taken_by = %existing.symbol,
                    name = %qualified,
                    "qualifying colliding name"
                );
                Ok(self.claim(symbol, qualified, info))
            }
        }
    }

    pub fn get(&self, symbol: SymbolId) -> Option<&str> {
        self.by_symbol.get(&symbol).map(String::as_str)
    }

    fn claim(&mut self, symbol: SymbolId, name: String, info: &SymbolInfo) -> String {
        self.by_name.insert(
            name.clone(),
            Claim {
                symbol,
                module: info.module.clone(),
            },
        );
        self.by_symbol.insert(symbol, name.clone());
        name
    }
}
