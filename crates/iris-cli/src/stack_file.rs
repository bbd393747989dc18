//! Stack documents: the serialized global layers and mask layers.

use std::fs;
use std::path::Path;

use iris_core::MaskStack;
use iris_core::params::{Layer, MaskLayer};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum StackFileError {
    #[error("failed to read stack document: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid stack document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// `{ "layers": [...], "maskLayers": [...] }`. Both lists may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StackDocument {
    pub layers: Vec<Layer>,
    pub mask_layers: Vec<MaskLayer>,
}

impl StackDocument {
    pub fn parse(text: &str) -> Result<Self, StackFileError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, StackFileError> {
        let text = fs::read_to_string(path)?;
        let doc = Self::parse(&text)?;
        tracing::info!(
            path = %path.display(),
            layers = doc.layers.len(),
            mask_layers = doc.mask_layers.len(),
            "loaded stack document"
        );
        Ok(doc)
    }

    /// Mask layers arranged by their stored `order`, with orders renumbered
    /// to match positions.
    pub fn mask_stack(&self) -> MaskStack {
        let mut layers = self.mask_layers.clone();
        layers.sort_by_key(|l| l.mask.order);
        MaskStack::from_layers(layers)
    }
}
