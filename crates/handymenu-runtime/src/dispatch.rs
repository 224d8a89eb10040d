//! Handing resolved collections to the menu renderer.

use handymenu_core::Collection;

/// Renderer that shows a collection as a transient menu.
pub trait MenuPresenter {
    /// Called when a key event matched `collection`'s shortcut.
    fn on_shortcut_resolved(&self, collection: &Collection);
}

/// What the key-event source should do with the original event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyDisposition {
    /// The shortcut opened a menu; suppress further delivery.
    Consumed,
    /// Not ours; deliver the event normally.
    PassThrough,
}

impl KeyDisposition {
    /// Whether the event should be suppressed.
    pub fn is_consumed(self) -> bool {
        self == Self::Consumed
    }
}
