//! Ordered, owned collections of global layers and mask layers.
//!
//! Records are replaced whole on update: an update carries complete
//! sub-records (a full payload, a full mask) and never patches a nested field
//! in place.

pub mod layers;
pub mod masks;

pub use layers::{LayerStack, LayerUpdate};
pub use masks::{MaskLayerUpdate, MaskStack};

use crate::params::layer::LayerKind;

/// Errors raised by stack operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StackError {
    #[error("no layer with id '{0}'")]
    UnknownLayer(String),
    #[error("layer '{id}' is a {expected:?} layer, got a {found:?} payload")]
    KindMismatch {
        id: String,
        expected: LayerKind,
        found: LayerKind,
    },
    #[error("the last global layer cannot be removed")]
    LastLayer,
    #[error("a layer stack needs at least one layer")]
    Empty,
    #[error("index {index} out of range for {len} layers")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Move the element at `from` so it ends up at `to`.
pub(crate) fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> Result<(), StackError> {
    let len = items.len();
    for index in [from, to] {
        if index >= len {
            return Err(StackError::IndexOutOfRange { index, len });
        }
    }
    if from != to {
        let item = items.remove(from);
        items.insert(to, item);
    }
    Ok(())
}
