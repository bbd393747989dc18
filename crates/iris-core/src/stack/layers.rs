//! The global layer stack.

use serde::{Deserialize, Serialize};

use crate::params::layer::{Layer, LayerAdjustments, LayerKind};
use crate::stack::{StackError, move_item};

/// Id of the layer a fresh or cleared stack starts with.
pub const MAIN_LAYER_ID: &str = "layer-main";
/// Name of that layer.
pub const MAIN_LAYER_NAME: &str = "Main Color";

/// Whole-field replacements for a layer. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayerUpdate {
    pub name: Option<String>,
    pub visible: Option<bool>,
    pub opacity: Option<f32>,
    /// Must be the same kind as the layer's current payload.
    pub adjustments: Option<LayerAdjustments>,
}

/// Ordered global layers plus the editor's selection. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStack {
    layers: Vec<Layer>,
    selected_id: Option<String>,
}

fn main_layer() -> Layer {
    let mut layer = Layer::color(0);
    layer.id = MAIN_LAYER_ID.to_string();
    layer.name = MAIN_LAYER_NAME.to_string();
    layer
}

impl Default for LayerStack {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerStack {
    /// A stack holding only the main color layer, selected.
    pub fn new() -> Self {
        Self {
            layers: vec![main_layer()],
            selected_id: Some(MAIN_LAYER_ID.to_string()),
        }
    }

    /// Wrap existing layers, e.g. from a loaded document. Selects the first.
    pub fn from_layers(layers: Vec<Layer>) -> Result<Self, StackError> {
        let selected_id = layers.first().map(|l| l.id.clone()).ok_or(StackError::Empty)?;
        Ok(Self {
            layers,
            selected_id: Some(selected_id),
        })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }

    fn index_of(&self, id: &str) -> Result<usize, StackError> {
        self.layers
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| StackError::UnknownLayer(id.to_string()))
    }

    /// Append a neutral layer of `kind` named `"<Kind> n"` and select it.
    pub fn add(&mut self, kind: LayerKind) -> &Layer {
        let layer = Layer::new(kind, self.layers.len());
        tracing::debug!(id = %layer.id, name = %layer.name, "layer added");
        self.selected_id = Some(layer.id.clone());
        self.layers.push(layer);
        &self.layers[self.layers.len() - 1]
    }

    /// Remove a layer. The last remaining layer stays; if the removed layer
    /// was selected, the first remaining layer becomes selected.
    pub fn remove(&mut self, id: &str) -> Result<Layer, StackError> {
        let index = self.index_of(id)?;
        if self.layers.len() == 1 {
            return Err(StackError::LastLayer);
        }
        let removed = self.layers.remove(index);
        if self.selected_id.as_deref() == Some(id) {
            self.selected_id = self.layers.first().map(|l| l.id.clone());
        }
        Ok(removed)
    }

    /// Replace the fields present in `update`.
    pub fn update(&mut self, id: &str, update: LayerUpdate) -> Result<&Layer, StackError> {
        let index = self.index_of(id)?;
        let layer = &mut self.layers[index];

        let expected = layer.kind();
        let mismatch = update
            .adjustments
            .as_ref()
            .map(LayerAdjustments::kind)
            .filter(|&found| found != expected);
        if let Some(found) = mismatch {
            return Err(StackError::KindMismatch {
                id: id.to_string(),
                expected,
                found,
            });
        }

        if let Some(name) = update.name {
            layer.name = name;
        }
        if let Some(visible) = update.visible {
            layer.visible = visible;
        }
        if let Some(opacity) = update.opacity {
            layer.opacity = if opacity.is_finite() {
                opacity.clamp(0.0, 1.0)
            } else {
                layer.opacity
            };
        }
        if let Some(adjustments) = update.adjustments {
            layer.adjustments = adjustments;
        }
        Ok(&*layer)
    }

    /// Select a layer, or clear the selection with `None`.
    pub fn select(&mut self, id: Option<&str>) -> Result<(), StackError> {
        if let Some(id) = id {
            self.index_of(id)?;
        }
        self.selected_id = id.map(str::to_string);
        Ok(())
    }

    /// Flip visibility, returning the new value.
    pub fn toggle_visibility(&mut self, id: &str) -> Result<bool, StackError> {
        let index = self.index_of(id)?;
        let layer = &mut self.layers[index];
        layer.visible = !layer.visible;
        Ok(layer.visible)
    }

    /// Move the layer at `from` to position `to`.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), StackError> {
        move_item(&mut self.layers, from, to)
    }

    /// Append a copy with a fresh id named `"<name> (Copy)"`.
    pub fn duplicate(&mut self, id: &str) -> Result<&Layer, StackError> {
        let index = self.index_of(id)?;
        let mut copy = self.layers[index].clone();
        copy.id = crate::params::new_id("layer");
        copy.name = format!("{} (Copy)", copy.name);
        self.layers.push(copy);
        Ok(&self.layers[self.layers.len() - 1])
    }

    /// Reset to a single main color layer.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn get(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    pub fn selected(&self) -> Option<&Layer> {
        self.selected_id.as_deref().and_then(|id| self.get(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::layer::{ColorAdjustments, ColorBalance, CurveAdjustments};

    #[test]
    fn test_new_stack_has_main_layer() {
        let stack = LayerStack::new();
        assert_eq!(stack.len(), 1);
        let main = stack.selected().expect("main layer selected");
        assert_eq!(main.id, MAIN_LAYER_ID);
        assert_eq!(main.name, "Main Color");
        assert_eq!(main.kind(), LayerKind::Color);
    }

    #[test]
    fn test_add_names_by_position_and_selects() {
        let mut stack = LayerStack::new();
        let id = stack.add(LayerKind::Curves).id.clone();
        assert_eq!(stack.get(&id).map(|l| l.name.as_str()), Some("Curves 2"));
        assert_eq!(stack.selected_id(), Some(id.as_str()));
    }

    #[test]
    fn test_cannot_remove_last_layer() {
        let mut stack = LayerStack::new();
        assert_eq!(stack.remove(MAIN_LAYER_ID), Err(StackError::LastLayer));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_remove_selected_falls_back_to_first() {
        let mut stack = LayerStack::new();
        let id = stack.add(LayerKind::Effects).id.clone();
        stack.remove(&id).expect("removable");
        assert_eq!(stack.selected_id(), Some(MAIN_LAYER_ID));
    }

    #[test]
    fn test_remove_unknown_errors() {
        let mut stack = LayerStack::new();
        assert_eq!(
            stack.remove("nope"),
            Err(StackError::UnknownLayer("nope".into()))
        );
    }

    #[test]
    fn test_update_replaces_payload_of_same_kind() {
        let mut stack = LayerStack::new();
        let color = ColorAdjustments {
            exposure: 120.0,
            ..Default::default()
        };
        let update = LayerUpdate {
            opacity: Some(0.5),
            adjustments: Some(LayerAdjustments::Color {
                color,
                balance: ColorBalance::default(),
            }),
            ..Default::default()
        };
        let layer = stack.update(MAIN_LAYER_ID, update).expect("same kind");
        assert_eq!(layer.opacity, 0.5);
        assert!(matches!(
            layer.adjustments,
            LayerAdjustments::Color { color, .. } if color.exposure == 120.0
        ));
    }

    #[test]
    fn test_update_rejects_kind_change() {
        let mut stack = LayerStack::new();
        let update = LayerUpdate {
            adjustments: Some(LayerAdjustments::Curves(CurveAdjustments::default())),
            ..Default::default()
        };
        let err = stack.update(MAIN_LAYER_ID, update).unwrap_err();
        assert!(matches!(err, StackError::KindMismatch { .. }));
    }

    #[test]
    fn test_toggle_and_reorder() {
        let mut stack = LayerStack::new();
        stack.add(LayerKind::Curves);
        stack.add(LayerKind::Effects);
        assert_eq!(stack.toggle_visibility(MAIN_LAYER_ID), Ok(false));

        stack.reorder(0, 2).expect("in range");
        let kinds: Vec<_> = stack.iter().map(Layer::kind).collect();
        assert_eq!(kinds, vec![LayerKind::Curves, LayerKind::Effects, LayerKind::Color]);
        assert!(stack.reorder(0, 5).is_err());
    }

    #[test]
    fn test_duplicate_appends_copy() {
        let mut stack = LayerStack::new();
        let copy = stack.duplicate(MAIN_LAYER_ID).expect("exists").clone();
        assert_ne!(copy.id, MAIN_LAYER_ID);
        assert_eq!(copy.name, "Main Color (Copy)");
        assert_eq!(stack.layers()[1], copy);
    }

    #[test]
    fn test_clear_resets() {
        let mut stack = LayerStack::new();
        stack.add(LayerKind::Selection);
        stack.clear();
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.selected_id(), Some(MAIN_LAYER_ID));
    }

    #[test]
    fn test_select_validates_id() {
        let mut stack = LayerStack::new();
        assert!(stack.select(Some("missing")).is_err());
        stack.select(None).expect("clearing is always valid");
        assert!(stack.selected().is_none());
    }

    #[test]
    fn test_from_layers_rejects_empty() {
        assert_eq!(LayerStack::from_layers(Vec::new()), Err(StackError::Empty));
    }
}
