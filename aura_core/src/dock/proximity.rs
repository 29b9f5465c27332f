//! Proximity-driven dock magnification.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use super::magnify::DockConfig;
use crate::animation::{FrameListener, SpringConfig, SpringField};
use crate::config::ConfigStore;
use crate::constants::DOCK_LABEL_FADE;
use crate::geometry::{Point, Rect};

#[derive(Debug, Clone)]
pub struct DockItem {
    label: String,
    rect: Option<Rect>,
    size: SpringField,
    hovered: bool,
    focused: bool,
}

impl DockItem {
    fn new(label: String, size: f32) -> Self {
        Self {
            label,
            rect: None,
            size: SpringField::at(SpringConfig::DOCK, size),
            hovered: false,
            focused: false,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn rect(&self) -> Option<Rect> {
        self.rect
    }

    pub fn size(&self) -> f32 {
        self.size.value()
    }

    pub fn target_size(&self) -> f32 {
        self.size.target()
    }

    pub fn label_visible(&self) -> bool {
        self.hovered || self.focused
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DockItemFrame {
    pub size: f32,
    pub icon_size: f32,
    pub label_visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DockFrame {
    pub panel_width: f32,
    pub items: Vec<DockItemFrame>,
}

/// A row or column of items that grow as the pointer approaches.
///
/// Input only moves targets. Sizes change in [`FrameListener::on_frame`].
#[derive(Debug)]
pub struct ProximityDock {
    config: DockConfig,
    items: Vec<DockItem>,
    pointer: Option<Point>,
    bounds: Option<Rect>,
    collapsed: bool,
    panel: SpringField,
    shut_down: bool,
}

impl ProximityDock {
    /// Builds the dock with one item per label, in display order.
    pub fn new<I, S>(config: DockConfig, labels: I, collapsed: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (base, _) = config.sizes(collapsed);
        let items: Vec<DockItem> = labels
            .into_iter()
            .map(|label| DockItem::new(label.into(), base))
            .collect();
        debug!(items = items.len(), collapsed, "dock created");
        Self {
            config,
            items,
            pointer: None,
            bounds: None,
            collapsed,
            panel: SpringField::at(SpringConfig::DOCK, config.resting_width(collapsed)),
            shut_down: false,
        }
    }

    pub fn config(&self) -> &DockConfig {
        &self.config
    }

    pub fn items(&self) -> &[DockItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    /// True while a pointer position is known and lies within the bounds,
    /// if bounds have been reported.
    pub fn is_pointer_inside(&self) -> bool {
        match (self.pointer, self.bounds) {
            (Some(p), Some(bounds)) => bounds.contains(p),
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    pub fn pointer_move(&mut self, pointer: Point) {
        self.pointer = Some(pointer);
        self.retarget_all();
    }

    pub fn pointer_leave(&mut self) {
        self.pointer = None;
        self.retarget_all();
    }

    /// Sets the panel's screen rect. Pointers outside it count as absent.
    pub fn set_bounds(&mut self, bounds: Option<Rect>) {
        self.bounds = bounds;
        self.retarget_all();
    }

    /// Records an item's screen rect. `None` forgets it.
    pub fn measure(&mut self, index: usize, rect: Option<Rect>) -> bool {
        let Some(item) = self.items.get_mut(index) else {
            debug!(index, "measure for unknown dock item ignored");
            return false;
        };
        item.rect = rect;
        self.retarget_all();
        true
    }

    pub fn item_enter(&mut self, index: usize) -> bool {
        self.set_flag(index, "enter", |item| item.hovered = true)
    }

    pub fn item_leave(&mut self, index: usize) -> bool {
        self.set_flag(index, "leave", |item| item.hovered = false)
    }

    pub fn item_focus(&mut self, index: usize) -> bool {
        self.set_flag(index, "focus", |item| item.focused = true)
    }

    pub fn item_blur(&mut self, index: usize) -> bool {
        self.set_flag(index, "blur", |item| item.focused = false)
    }

    pub fn set_collapsed(&mut self, collapsed: bool) {
        if self.collapsed == collapsed {
            return;
        }
        self.collapsed = collapsed;
        info!(collapsed, "dock mode changed");
        self.retarget_all();
    }

    /// How long label fades take at the current animation speed.
    pub fn label_fade(&self, store: &ConfigStore) -> Duration {
        store.scaled(DOCK_LABEL_FADE)
    }

    pub fn frame(&self) -> DockFrame {
        DockFrame {
            panel_width: self.panel.value(),
            items: self
                .items
                .iter()
                .map(|item| {
                    let size = item.size();
                    DockItemFrame {
                        size,
                        icon_size: size / 2.0,
                        label_visible: item.label_visible(),
                    }
                })
                .collect(),
        }
    }

    /// Stops reacting to frames.
    pub fn shutdown(&mut self) {
        if !self.shut_down {
            self.shut_down = true;
            debug!("dock shut down");
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    fn set_flag(
        &mut self,
        index: usize,
        event: &'static str,
        apply: impl FnOnce(&mut DockItem),
    ) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                apply(item);
                true
            }
            None => {
                debug!(index, event, "event for unknown dock item ignored");
                false
            }
        }
    }

    fn retarget_all(&mut self) {
        let pointer = if self.is_pointer_inside() {
            self.pointer
        } else {
            None
        };
        for item in &mut self.items {
            let target = self.config.size_for(pointer, item.rect, self.collapsed);
            item.size.retarget(target);
        }
        let width = if pointer.is_some() {
            self.config.hover_width(self.collapsed)
        } else {
            self.config.resting_width(self.collapsed)
        };
        self.panel.retarget(width);
    }
}

impl FrameListener for ProximityDock {
    fn on_frame(&mut self, dt: Duration) {
        if self.shut_down {
            return;
        }
        let secs = dt.as_secs_f32();
        self.panel.tick(secs);
        for item in &mut self.items {
            item.size.tick(secs);
        }
    }

    fn is_idle(&self) -> bool {
        self.shut_down || (self.panel.is_at_rest() && self.items.iter().all(|i| i.size.is_at_rest()))
    }
}
