//! Pointer interaction: the page-wide tooltip overlay and its arbitration.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Vertical distance between the pointer and the tooltip anchor.
pub const DEFAULT_TOOLTIP_OFFSET_Y: f64 = 28.0;

/// Identity of one chart instance on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChartId(u64);

impl ChartId {
    /// Allocates a process-unique id.
    #[must_use]
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chart-{}", self.0)
    }
}

/// Pointer position in chart-local and page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
    pub page_x: f64,
    pub page_y: f64,
}

impl PointerPosition {
    /// Position for hosts where the chart origin is the page origin.
    #[must_use]
    pub fn local(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            page_x: x,
            page_y: y,
        }
    }

    #[must_use]
    pub fn with_page(mut self, page_x: f64, page_y: f64) -> Self {
        self.page_x = page_x;
        self.page_y = page_y;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TooltipState {
    pub visible: bool,
    pub text: String,
    pub x: f64,
    pub y: f64,
}

/// Shared tooltip resource seen by chart instances.
///
/// Arbitration is last-enter-wins: `pointer_enter` hands ownership to the
/// caller, and `pointer_move`/`pointer_leave`/`release` from anyone but the
/// current owner are ignored.
pub trait TooltipService {
    fn pointer_enter(&mut self, owner: ChartId, text: String, page_x: f64, page_y: f64);
    fn pointer_move(&mut self, owner: ChartId, page_x: f64, page_y: f64);
    fn pointer_leave(&mut self, owner: ChartId);
    /// Drops ownership without a pointer event (teardown, redraw).
    fn release(&mut self, owner: ChartId);
    fn state(&self) -> TooltipState;
    fn owner(&self) -> Option<ChartId>;
}

/// The single floating overlay of a page.
///
/// The overlay element is created lazily on the first hover and at most one
/// exists at any time; `remount` replaces it.
#[derive(Debug, Clone)]
pub struct TooltipOverlay {
    state: TooltipState,
    owner: Option<ChartId>,
    offset_y: f64,
    mounted: bool,
    mounts: u64,
}

impl Default for TooltipOverlay {
    fn default() -> Self {
        Self::new(DEFAULT_TOOLTIP_OFFSET_Y)
    }
}

impl TooltipOverlay {
    #[must_use]
    pub fn new(offset_y: f64) -> Self {
        Self {
            state: TooltipState::default(),
            owner: None,
            offset_y,
            mounted: false,
            mounts: 0,
        }
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Number of overlay elements created over the overlay's lifetime.
    #[must_use]
    pub fn mount_count(&self) -> u64 {
        self.mounts
    }

    /// Number of overlay elements currently attached; never more than one.
    #[must_use]
    pub fn live_elements(&self) -> usize {
        usize::from(self.mounted)
    }

    /// Replaces the overlay element, removing the previous one first.
    pub fn remount(&mut self) {
        self.unmount();
        self.mount();
    }

    pub fn unmount(&mut self) {
        if self.mounted {
            trace!(owner = ?self.owner, "tooltip overlay removed");
        }
        self.mounted = false;
        self.owner = None;
        self.state = TooltipState::default();
    }

    fn mount(&mut self) {
        if !self.mounted {
            self.mounted = true;
            self.mounts += 1;
            trace!(mounts = self.mounts, "tooltip overlay created");
        }
    }

    fn place(&mut self, page_x: f64, page_y: f64) {
        self.state.x = page_x;
        self.state.y = page_y - self.offset_y;
    }

    fn hide(&mut self) {
        self.state.visible = false;
        self.owner = None;
    }
}

impl TooltipService for TooltipOverlay {
    fn pointer_enter(&mut self, owner: ChartId, text: String, page_x: f64, page_y: f64) {
        self.mount();
        self.owner = Some(owner);
        self.state.visible = true;
        self.state.text = text;
        self.place(page_x, page_y);
    }

    fn pointer_move(&mut self, owner: ChartId, page_x: f64, page_y: f64) {
        if self.owner == Some(owner) {
            self.place(page_x, page_y);
        }
    }

    fn pointer_leave(&mut self, owner: ChartId) {
        if self.owner == Some(owner) {
            self.hide();
        }
    }

    fn release(&mut self, owner: ChartId) {
        if self.owner == Some(owner) {
            self.hide();
        }
    }

    fn state(&self) -> TooltipState {
        self.state.clone()
    }

    fn owner(&self) -> Option<ChartId> {
        self.owner
    }
}

/// Cloneable handle to one overlay shared by every chart of a page.
///
/// Event dispatch is single-threaded, so `Rc<RefCell<_>>` is sufficient.
#[derive(Debug, Clone, Default)]
pub struct SharedTooltip(Rc<RefCell<TooltipOverlay>>);

impl SharedTooltip {
    #[must_use]
    pub fn new(overlay: TooltipOverlay) -> Self {
        Self(Rc::new(RefCell::new(overlay)))
    }

    #[must_use]
    pub fn overlay(&self) -> Ref<'_, TooltipOverlay> {
        self.0.borrow()
    }

    pub fn remount(&self) {
        self.0.borrow_mut().remount();
    }
}

impl TooltipService for SharedTooltip {
    fn pointer_enter(&mut self, owner: ChartId, text: String, page_x: f64, page_y: f64) {
        self.0.borrow_mut().pointer_enter(owner, text, page_x, page_y);
    }

    fn pointer_move(&mut self, owner: ChartId, page_x: f64, page_y: f64) {
        self.0.borrow_mut().pointer_move(owner, page_x, page_y);
    }

    fn pointer_leave(&mut self, owner: ChartId) {
        self.0.borrow_mut().pointer_leave(owner);
    }

    fn release(&mut self, owner: ChartId) {
        self.0.borrow_mut().release(owner);
    }

    fn state(&self) -> TooltipState {
        self.0.borrow().state()
    }

    fn owner(&self) -> Option<ChartId> {
        self.0.borrow().owner()
    }
}
