//! Host element hooks.

use crate::geometry::FloatRect;

/// The element a context renders for.
///
/// The host owns the context; the context only keeps a weak reference and
/// reports every region it paints.
pub trait CanvasHost {
    /// `rect` is in device pixels and may be larger than what actually changed.
    fn needs_redraw(&self, rect: FloatRect);
}
