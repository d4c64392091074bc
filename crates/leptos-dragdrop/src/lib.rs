//! Leptos DragDrop Utilities
//!
//! Simple drag-and-drop for Leptos using mouse events.
//! Uses movement threshold to distinguish click from drag.
//!
//! Generic over the dragged id (`Id`) and the drop target (`T`): callers
//! decode their drop zones into `T` once, when wiring the handlers, and get
//! `(Id, T)` back on drop.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// DnD state signals
pub struct DndSignals<Id, T> {
    pub dragging_id_read: ReadSignal<Option<Id>>,
    pub dragging_id_write: WriteSignal<Option<Id>>,
    pub drop_target_read: ReadSignal<Option<T>>,
    pub drop_target_write: WriteSignal<Option<T>>,
    pub drag_just_ended_read: ReadSignal<bool>,
    pub drag_just_ended_write: WriteSignal<bool>,
    /// Pending item id (mousedown but not yet dragging)
    pub pending_id_read: ReadSignal<Option<Id>>,
    pub pending_id_write: WriteSignal<Option<Id>>,
    /// Start position for movement detection
    pub start_read: ReadSignal<(i32, i32)>,
    pub start_write: WriteSignal<(i32, i32)>,
}

impl<Id, T> Clone for DndSignals<Id, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Id, T> Copy for DndSignals<Id, T> {}

impl<Id, T> DndSignals<Id, T>
where
    Id: Clone + PartialEq + Send + Sync + 'static,
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Whether `id` is the item currently being dragged
    pub fn is_dragging(&self, id: &Id) -> bool {
        self.dragging_id_read.with(|d| d.as_ref() == Some(id))
    }

    /// Whether `target` is the hovered drop target
    pub fn is_target(&self, target: &T) -> bool {
        self.drop_target_read.with(|t| t.as_ref() == Some(target))
    }

    pub fn drag_active(&self) -> bool {
        self.dragging_id_read.with(Option::is_some)
    }
}

/// Movement threshold in pixels to start dragging
const DRAG_THRESHOLD_PX: i32 = 5;

/// True once the pointer moved far enough from `start` to count as a drag
pub fn exceeds_threshold(start: (i32, i32), now: (i32, i32)) -> bool {
    let dx = (now.0 - start.0).abs();
    let dy = (now.1 - start.1).abs();
    dx > DRAG_THRESHOLD_PX || dy > DRAG_THRESHOLD_PX
}

pub fn create_dnd_signals<Id, T>() -> DndSignals<Id, T>
where
    Id: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    let (dragging_id_read, dragging_id_write) = signal(None::<Id>);
    let (drop_target_read, drop_target_write) = signal(None::<T>);
    let (drag_just_ended_read, drag_just_ended_write) = signal(false);
    let (pending_id_read, pending_id_write) = signal(None::<Id>);
    let (start_read, start_write) = signal((0i32, 0i32));
    DndSignals {
        dragging_id_read,
        dragging_id_write,
        drop_target_read,
        drop_target_write,
        drag_just_ended_read,
        drag_just_ended_write,
        pending_id_read,
        pending_id_write,
        start_read,
        start_write,
    }
}

/// End drag operation
pub fn end_drag<Id, T>(dnd: &DndSignals<Id, T>)
where
    Id: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    dnd.dragging_id_write.set(None);
    dnd.drop_target_write.set(None);
    dnd.pending_id_write.set(None);
    dnd.drag_just_ended_write.set(true);

    if let Some(win) = web_sys::window() {
        let clear = dnd.drag_just_ended_write;
        let cb = wasm_bindgen::closure::Closure::<dyn FnMut()>::new(move || {
            clear.set(false);
        });
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), 100);
        cb.forget();
    }
}

/// Create mousedown handler for draggable items
/// Records pending drag with start position
pub fn make_on_mousedown<Id, T>(dnd: DndSignals<Id, T>, item_id: Id) -> impl Fn(web_sys::MouseEvent) + Clone + 'static
where
    Id: Clone + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    move |ev: web_sys::MouseEvent| {
        if ev.button() != 0 {
            return;
        }
        // Inputs and buttons keep their own click behaviour
        if let Some(target) = ev.target() {
            if target.dyn_ref::<web_sys::HtmlInputElement>().is_some() { return; }
            if target.dyn_ref::<web_sys::HtmlButtonElement>().is_some() { return; }
        }
        dnd.pending_id_write.set(Some(item_id.clone()));
        dnd.start_write.set((ev.client_x(), ev.client_y()));
    }
}

/// Bind document mousemove - starts drag if moved enough
fn bind_global_mousemove<Id, T>(dnd: DndSignals<Id, T>)
where
    Id: Clone + Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    use wasm_bindgen::closure::Closure;

    let on_mousemove = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |ev: web_sys::MouseEvent| {
        let pending = dnd.pending_id_read.get_untracked();
        if pending.is_none() || dnd.dragging_id_read.with_untracked(Option::is_some) {
            return;
        }
        if exceeds_threshold(dnd.start_read.get_untracked(), (ev.client_x(), ev.client_y())) {
            dnd.dragging_id_write.set(pending);
        }
    });

    if let Some(doc) = web_sys::window().and_then(|win| win.document()) {
        let _ = doc.add_event_listener_with_callback("mousemove", on_mousemove.as_ref().unchecked_ref());
    }
    on_mousemove.forget();
}

/// Create mouseenter handler for an item that is itself a drop target.
/// Hovering the dragged item over itself selects nothing.
pub fn make_on_item_mouseenter<Id, T>(dnd: DndSignals<Id, T>, item_id: Id, target: T) -> impl Fn(web_sys::MouseEvent) + Clone + 'static
where
    Id: Clone + PartialEq + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    move |_ev: web_sys::MouseEvent| {
        let over_other = dnd
            .dragging_id_read
            .with_untracked(|d| matches!(d, Some(dragging) if *dragging != item_id));
        if over_other {
            dnd.drop_target_write.set(Some(target.clone()));
        }
    }
}

/// Create mouseenter handler for zones
pub fn make_on_zone_mouseenter<Id, T>(dnd: DndSignals<Id, T>, target: T) -> impl Fn(web_sys::MouseEvent) + Clone + 'static
where
    Id: Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_id_read.with_untracked(Option::is_some) {
            dnd.drop_target_write.set(Some(target.clone()));
        }
    }
}

/// Create mouseleave handler
pub fn make_on_mouseleave<Id, T>(dnd: DndSignals<Id, T>) -> impl Fn(web_sys::MouseEvent) + Copy + 'static
where
    Id: Send + Sync + 'static,
    T: Send + Sync + 'static,
{
    move |_ev: web_sys::MouseEvent| {
        if dnd.dragging_id_read.with_untracked(Option::is_some) {
            dnd.drop_target_write.set(None);
        }
    }
}

/// Bind global mouseup handler for drop detection
pub fn bind_global_mouseup<Id, T, F>(dnd: DndSignals<Id, T>, on_drop: F)
where
    Id: Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
    F: Fn(Id, T) + 'static,
{
    use wasm_bindgen::closure::Closure;

    let on_mouseup = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |_ev: web_sys::MouseEvent| {
        let dragging_id = dnd.dragging_id_read.get_untracked();
        let drop_target = dnd.drop_target_read.get_untracked();

        end_drag(&dnd);
        // Plain clicks fall through to the element's click handler
        if let (Some(dragged), Some(target)) = (dragging_id, drop_target) {
            on_drop(dragged, target);
        }
    });

    if let Some(doc) = web_sys::window().and_then(|win| win.document()) {
        let _ = doc.add_event_listener_with_callback("mouseup", on_mouseup.as_ref().unchecked_ref());
    }
    on_mouseup.forget();

    bind_global_mousemove(dnd);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_jitter_is_a_click() {
        assert!(!exceeds_threshold((100, 100), (103, 96)));
        assert!(!exceeds_threshold((0, 0), (5, -5)));
    }

    #[test]
    fn test_movement_past_threshold_starts_drag() {
        assert!(exceeds_threshold((100, 100), (106, 100)));
        assert!(exceeds_threshold((100, 100), (100, 90)));
    }
}
