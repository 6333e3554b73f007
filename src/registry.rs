//! Game id -> factory registry
//!
//! Games are registered explicitly at startup instead of announcing
//! themselves through a global map. Lookup of an unknown id is a typed error.

use std::collections::BTreeMap;

use crate::error::RegistryError;
use crate::games::{BallCatcher, FlappySquare, MiniGame, NumberClicker, QuickTap, TileMemory};
use crate::settings::Settings;

/// Builds a fresh instance from settings and an RNG seed
pub type GameFactory = fn(&Settings, u64) -> Box<dyn MiniGame>;

#[derive(Clone, Default)]
pub struct GameRegistry {
    factories: BTreeMap<&'static str, GameFactory>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding all five bundled games
    pub fn with_builtin_games() -> Self {
        let mut registry = Self::new();
        let builtin: [(&'static str, GameFactory); 5] = [
            (BallCatcher::ID, BallCatcher::create),
            (FlappySquare::ID, FlappySquare::create),
            (NumberClicker::ID, NumberClicker::create),
            (QuickTap::ID, QuickTap::create),
            (TileMemory::ID, TileMemory::create),
        ];
        for (id, factory) in builtin {
            // Ids above are distinct
            let _ = registry.register(id, factory);
        }
        registry
    }

    pub fn register(&mut self, id: &'static str, factory: GameFactory) -> Result<(), RegistryError> {
        if self.factories.contains_key(id) {
            return Err(RegistryError::DuplicateGame { id: id.to_string() });
        }
        self.factories.insert(id, factory);
        log::debug!("Registered game '{}'", id);
        Ok(())
    }

    /// New, un-initialised instance of `id`
    pub fn create(&self, id: &str, settings: &Settings, seed: u64) -> Result<Box<dyn MiniGame>, RegistryError> {
        let factory = self
            .factories
            .get(id)
            .ok_or_else(|| RegistryError::UnknownGame { id: id.to_string() })?;
        Ok(factory(settings, seed))
    }

    /// Registered ids in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for GameRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.factories.keys()).finish()
    }
}
