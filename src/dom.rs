//! A serializable style-description tree standing in for the browser DOM.
//!
//! The preview renderer produces a [`StyleNode`] tree; the export pipeline
//! clones it, patches styles, and hands it to a rasterizer. Computed-style
//! reads and inline-style writes go through the [`StyleAccess`] trait so the
//! normalization pass can be unit-tested against any tree shape without a
//! real browser.
//!
//! [`Document`] is the off-screen mount registry: the export pipeline
//! appends clones to it for the duration of a capture and must remove them
//! on every exit path, mirroring the "always remove in the same function"
//! discipline the original applied to `document.body`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// Absolute pixel rectangle assigned to a node at build time.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Translate by an offset, keeping dimensions.
    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self { x: self.x + dx, y: self.y + dy, ..*self }
    }
}

/// Inline style overrides on a node. `None` means "not set"; a set value
/// shadows the computed value, as inline styles do in a browser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub background_color: Option<String>,
    pub color: Option<String>,
    /// CSS background-image value: a gradient string or a `url(...)`.
    pub background_image: Option<String>,
    pub background_size: Option<String>,
    pub background_position: Option<String>,
    pub background_repeat: Option<String>,
    pub border_radius: Option<u32>,
    pub opacity: Option<f32>,
    pub z_index: Option<i32>,
    pub position: Option<String>,
    pub left: Option<i32>,
    pub top: Option<i32>,
}

/// One node of the preview tree: a tag for debugging, an optional text run,
/// computed colors as the styling pass resolved them, inline overrides, a
/// layout rectangle, and children.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleNode {
    pub tag: String,
    pub text: Option<String>,
    /// Computed background-color serialization (may be an `oklch(...)` form
    /// or `transparent`; the normalizer rewrites those before capture).
    pub computed_background: String,
    /// Computed text color serialization.
    pub computed_color: String,
    pub style: Style,
    pub rect: Rect,
    pub children: Vec<StyleNode>,
    /// Font scale multiplier for text runs (1 = normal, 2 = title).
    pub scale: u32,
}

impl StyleNode {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            scale: 1,
            ..Default::default()
        }
    }

    /// The effective background color: inline override if present, else the
    /// computed value.
    pub fn effective_background(&self) -> &str {
        self.style
            .background_color
            .as_deref()
            .unwrap_or(&self.computed_background)
    }

    /// The effective text color: inline override if present, else computed.
    pub fn effective_color(&self) -> &str {
        self.style.color.as_deref().unwrap_or(&self.computed_color)
    }

    /// Count of nodes in this subtree, self included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(StyleNode::node_count).sum::<usize>()
    }

    /// Translate this subtree's layout rectangles by an offset.
    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.rect = self.rect.offset(dx, dy);
        for child in &mut self.children {
            child.translate(dx, dy);
        }
    }
}

/// Computed-style reads and inline-style writes, abstracted so the color
/// normalizer can run over any tree representation.
pub trait StyleAccess {
    /// Serialized computed background-color of this node.
    fn background(&self) -> &str;

    /// Serialized computed text color of this node.
    fn color(&self) -> &str;

    /// Overwrite the inline background-color.
    fn set_background(&mut self, value: &str);

    /// Overwrite the inline text color.
    fn set_color(&mut self, value: &str);

    /// Mutable access to child nodes.
    fn children_mut(&mut self) -> &mut [Self]
    where
        Self: Sized;
}

impl StyleAccess for StyleNode {
    fn background(&self) -> &str {
        self.effective_background()
    }

    fn color(&self) -> &str {
        self.effective_color()
    }

    fn set_background(&mut self, value: &str) {
        self.style.background_color = Some(value.to_string());
        // Inline styles feed back into the computed value.
        self.computed_background = value.to_string();
    }

    fn set_color(&mut self, value: &str) {
        self.style.color = Some(value.to_string());
        self.computed_color = value.to_string();
    }

    fn children_mut(&mut self) -> &mut [Self] {
        &mut self.children
    }
}

/// Identifier of a mounted node, handed back by [`Document::mount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MountId(u64);

struct Mounted {
    id: MountId,
    node: StyleNode,
}

/// The single shared mount surface for off-screen capture clones.
///
/// Interior-mutable so concurrent exports can mount independent clones; each
/// export unmounts its own clone on success and failure alike.
#[derive(Default)]
pub struct Document {
    mounts: Mutex<Vec<Mounted>>,
    next_id: AtomicU64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node off-screen. Returns the handle needed to read it back
    /// and to remove it.
    pub fn mount(&self, node: StyleNode) -> MountId {
        let id = MountId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut mounts = self.mounts.lock().unwrap();
        mounts.push(Mounted { id, node });
        id
    }

    /// Snapshot a mounted node by handle.
    pub fn get(&self, id: MountId) -> Option<StyleNode> {
        let mounts = self.mounts.lock().unwrap();
        mounts.iter().find(|m| m.id == id).map(|m| m.node.clone())
    }

    /// Remove a mounted node, returning it if it was present.
    pub fn unmount(&self, id: MountId) -> Option<StyleNode> {
        let mut mounts = self.mounts.lock().unwrap();
        let pos = mounts.iter().position(|m| m.id == id)?;
        Some(mounts.remove(pos).node)
    }

    /// Number of nodes currently mounted.
    pub fn mounted_count(&self) -> usize {
        self.mounts.lock().unwrap().len()
    }
}
