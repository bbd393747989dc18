//! The mask layer stack.
//!
//! Each mask's `order` field mirrors its position here and is rewritten after
//! every structural change.

use serde::{Deserialize, Serialize};

use crate::params::local::LocalAdjustments;
use crate::params::mask::{Mask, MaskLayer};
use crate::stack::{StackError, move_item};

/// Whole-field replacements for a mask layer. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaskLayerUpdate {
    pub name: Option<String>,
    pub visible: Option<bool>,
    pub mask: Option<Mask>,
    pub adjustments: Option<LocalAdjustments>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskStack {
    layers: Vec<MaskLayer>,
    selected_id: Option<String>,
    show_overlay: bool,
}

impl MaskStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing mask layers. Orders are rewritten to match positions.
    pub fn from_layers(layers: Vec<MaskLayer>) -> Self {
        let mut stack = Self {
            layers,
            ..Self::default()
        };
        stack.sync_order();
        stack
    }

    fn sync_order(&mut self) {
        for (i, layer) in self.layers.iter_mut().enumerate() {
            layer.mask.order = i as i32;
        }
    }

    fn index_of(&self, id: &str) -> Result<usize, StackError> {
        self.layers
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| StackError::UnknownLayer(id.to_string()))
    }

    pub fn layers(&self) -> &[MaskLayer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MaskLayer> {
        self.layers.iter()
    }

    /// Append a mask layer at the end of the compositing order.
    pub fn add(&mut self, mut layer: MaskLayer) -> &MaskLayer {
        layer.mask.order = self.layers.len() as i32;
        tracing::debug!(id = %layer.id, kind = ?layer.mask.mask_type(), "mask layer added");
        self.layers.push(layer);
        &self.layers[self.layers.len() - 1]
    }

    /// Remove a mask layer. If it was selected, the first remaining layer
    /// becomes selected.
    pub fn remove(&mut self, id: &str) -> Result<MaskLayer, StackError> {
        let index = self.index_of(id)?;
        let removed = self.layers.remove(index);
        self.sync_order();
        if self.selected_id.as_deref() == Some(id) {
            self.selected_id = self.layers.first().map(|l| l.id.clone());
        }
        Ok(removed)
    }

    /// Replace the fields present in `update`. A replaced mask keeps the
    /// layer's position as its order.
    pub fn update(&mut self, id: &str, update: MaskLayerUpdate) -> Result<&MaskLayer, StackError> {
        let index = self.index_of(id)?;
        let layer = &mut self.layers[index];
        if let Some(name) = update.name {
            layer.name = name;
        }
        if let Some(visible) = update.visible {
            layer.visible = visible;
        }
        if let Some(mut mask) = update.mask {
            mask.order = index as i32;
            layer.mask = mask;
        }
        if let Some(adjustments) = update.adjustments {
            layer.adjustments = adjustments;
        }
        Ok(&*layer)
    }

    pub fn select(&mut self, id: Option<&str>) -> Result<(), StackError> {
        if let Some(id) = id {
            self.index_of(id)?;
        }
        self.selected_id = id.map(str::to_string);
        Ok(())
    }

    pub fn toggle_visibility(&mut self, id: &str) -> Result<bool, StackError> {
        let index = self.index_of(id)?;
        let layer = &mut self.layers[index];
        layer.visible = !layer.visible;
        Ok(layer.visible)
    }

    /// Move the layer at `from` to `to` and renumber every mask's order.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), StackError> {
        move_item(&mut self.layers, from, to)?;
        self.sync_order();
        Ok(())
    }

    /// Remove every mask layer and clear the selection.
    pub fn clear(&mut self) {
        self.layers.clear();
        self.selected_id = None;
    }

    pub fn get(&self, id: &str) -> Option<&MaskLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn selected(&self) -> Option<&MaskLayer> {
        self.selected_id.as_deref().and_then(|id| self.get(id))
    }

    pub fn show_overlay(&self) -> bool {
        self.show_overlay
    }

    pub fn set_show_overlay(&mut self, show: bool) {
        self.show_overlay = show;
    }
}
