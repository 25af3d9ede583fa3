// src/scatter/catalog.rs
//! Data-driven scatter item catalogs + loader.

use bevy::asset::{io::Reader, AssetLoader, LoadContext};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// ---------- Render refs (data form) ----------

/// Visual representation of an item, resolved by the host when spawning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RenderRef {
    Scene { path: String },
    MeshMaterial { mesh: String, material: Option<String> },
}

// ---------- Items ----------

/// One weighted catalog entry.
///
/// `render: None` is a legal gap item: when selected it consumes a slot along
/// the span without producing an instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScatterItem {
    #[serde(default)]
    pub render: Option<RenderRef>,
    #[serde(default = "default_probability")]
    pub probability: f32,
}

fn default_probability() -> f32 {
    1.0
}

impl Default for ScatterItem {
    fn default() -> Self {
        Self { render: None, probability: 1.0 }
    }
}

impl ScatterItem {
    pub fn scene(path: impl Into<String>, probability: f32) -> Self {
        Self {
            render: Some(RenderRef::Scene { path: path.into() }),
            probability,
        }
    }

    /// A weighted empty slot.
    pub fn gap(probability: f32) -> Self {
        Self { render: None, probability }
    }
}

// ---------- Catalog asset ----------

/// Ordered item list; index in this vector is the `ScatterItemId.0`.
#[derive(Asset, TypePath, Clone, Debug, Default)]
pub struct ScatterCatalog {
    pub items: Vec<ScatterItem>,
}

impl ScatterCatalog {
    pub fn new(items: Vec<ScatterItem>) -> Self {
        Self { items }
    }

    /// Parse a RON item list, rejecting negative probabilities.
    pub fn from_ron_bytes(bytes: &[u8]) -> Result<Self, ScatterCatalogError> {
        let items: Vec<ScatterItem> =
            ron::de::from_bytes(bytes).map_err(|e| ScatterCatalogError::Ron(e.to_string()))?;
        for (index, item) in items.iter().enumerate() {
            if item.probability < 0.0 {
                return Err(ScatterCatalogError::NegativeProbability {
                    index,
                    value: item.probability,
                });
            }
        }
        Ok(Self { items })
    }
}

// ---------- Asset loader for `.scatter.ron` ----------

#[derive(Default)]
pub struct ScatterCatalogLoader;

impl AssetLoader for ScatterCatalogLoader {
    type Asset = ScatterCatalog;
    type Settings = ();
    type Error = ScatterCatalogError;

    fn extensions(&self) -> &[&str] {
        &["scatter.ron"]
    }

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        ScatterCatalog::from_ron_bytes(&bytes)
    }
}

// ---------- Loader errors ----------

#[derive(thiserror::Error, Debug)]
pub enum ScatterCatalogError {
    #[error("I/O while reading catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(String),
    #[error("Item {index} has negative probability {value}")]
    NegativeProbability { index: usize, value: f32 },
}
