//! Named factories for network-capable local instances
//!
//! Remote spawns arrive as a type name. The prefab registry turns that name
//! into a fresh local instance; a name with no factory is a content error.

use crate::{Error, Result};
use indexmap::IndexMap;
use relaynet_core::{Quat, Vec3};
use std::fmt;

/// The networking surface every replicated instance exposes
///
/// Rendering and movement logic live behind this trait; the peer only
/// reads and overwrites the pose.
pub trait NetworkBehavior: fmt::Debug + Send {
    fn position(&self) -> Vec3;

    fn set_position(&mut self, position: Vec3);

    fn rotation(&self) -> Quat {
        Quat::IDENTITY
    }
}

/// Plain pose holder, the default prefab body
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Body {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Body {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }
}

impl NetworkBehavior for Body {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }
}

type Factory = Box<dyn Fn() -> Box<dyn NetworkBehavior> + Send>;

/// Type name to factory map
#[derive(Default)]
pub struct PrefabRegistry {
    factories: IndexMap<String, Factory>,
}

impl PrefabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, replacing any previous one under `name`
    pub fn register<F, B>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> B + Send + 'static,
        B: NetworkBehavior + 'static,
    {
        let factory: Factory = Box::new(move || -> Box<dyn NetworkBehavior> { Box::new(factory()) });
        self.factories.insert(name.into(), factory);
        self
    }

    /// Register a prefab backed by a [`Body`] at the origin
    pub fn register_body(&mut self, name: impl Into<String>) -> &mut Self {
        self.register(name, Body::default)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Build a new instance of `name`
    pub fn instantiate(&self, name: &str) -> Result<Box<dyn NetworkBehavior>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| Error::UnknownPrefab(name.to_string()))?;
        Ok(factory())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for PrefabRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.factories.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Spinner {
        body: Body,
        turns: u32,
    }

    impl NetworkBehavior for Spinner {
        fn position(&self) -> Vec3 {
            self.body.position
        }

        fn set_position(&mut self, position: Vec3) {
            self.body.position = position;
            self.turns += 1;
        }
    }

    #[test]
    fn test_instantiate() {
        let mut prefabs = PrefabRegistry::new();
        prefabs.register_body("Cube").register("Spinner", || Spinner {
            body: Body::at(Vec3::new(0.0, 1.0, 0.0)),
            turns: 0,
        });

        assert_eq!(prefabs.len(), 2);
        assert_eq!(prefabs.names().collect::<Vec<_>>(), vec!["Cube", "Spinner"]);

        let mut spinner = prefabs.instantiate("Spinner").unwrap();
        assert_eq!(spinner.position(), Vec3::new(0.0, 1.0, 0.0));
        spinner.set_position(Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(spinner.position().x, 2.0);
        assert_eq!(spinner.rotation(), Quat::IDENTITY);
    }

    #[test]
    fn test_unknown_prefab() {
        let prefabs = PrefabRegistry::new();
        let err = prefabs.instantiate("Ghost").unwrap_err();
        assert!(matches!(err, Error::UnknownPrefab(ref name) if name == "Ghost"));
        assert!(err.is_fatal());
    }
}
