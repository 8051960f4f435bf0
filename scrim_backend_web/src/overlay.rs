// Copyright 2026 the Scrim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM overlay tree.
//!
//! Proxies are `<button>` elements appended to a `<div>` container. While the
//! overlay is active the container is a sibling of the canvas, inserted into
//! the canvas's parent (or `document.body` for a detached canvas), and
//! covers the canvas. Every DOM listener pushes an
//! [`OverlayEvent`] onto a shared queue that [`DomOverlay`] hands out through
//! [`OverlayBackend::poll_event`]; nothing calls back into the engine from
//! inside a DOM dispatch.

use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::string::ToString;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::{Point, Rect, Vec2};
use scrim_core::backend::{
    GlobalListener, Key, LiveMode, OVERLAY_Z_INDEX, OverlayBackend, OverlayEvent,
    PROXY_TOUCH_SIZE, ProxyEvent, ProxyId, ProxyStyle, TOUCH_HOOK_POSITION, TOUCH_HOOK_SIZE,
    TOUCH_HOOK_TITLE,
};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{
    CssStyleDeclaration, Document, Event, HtmlButtonElement, HtmlCanvasElement, HtmlElement,
    KeyboardEvent, MouseEvent, Node, Window,
};

use crate::px;

type EventQueue = Rc<RefCell<VecDeque<OverlayEvent>>>;
type Listener<E> = Closure<dyn FnMut(E)>;

/// Background of proxies in debug mode.
const DEBUG_FILL: &str = "rgba(255, 255, 255, 0.5)";

/// A `<button>` proxy and the listeners installed on it.
///
/// Dropping the proxy removes its listeners and detaches it from the DOM.
pub struct DomProxy {
    button: HtmlButtonElement,
    listeners: Vec<(&'static str, Listener<Event>)>,
}

impl DomProxy {
    /// Returns the DOM element.
    #[must_use]
    pub fn element(&self) -> &HtmlButtonElement {
        &self.button
    }

    fn listen(&mut self, kind: &'static str, queue: &EventQueue, event: OverlayEvent) {
        let queue = Rc::clone(queue);
        let listener = Closure::wrap(Box::new(move |_: Event| {
            queue.borrow_mut().push_back(event);
        }) as Box<dyn FnMut(Event)>);
        let _ = self
            .button
            .add_event_listener_with_callback(kind, listener.as_ref().unchecked_ref());
        self.listeners.push((kind, listener));
    }
}

impl Drop for DomProxy {
    fn drop(&mut self) {
        for (kind, listener) in &self.listeners {
            let _ = self
                .button
                .remove_event_listener_with_callback(kind, listener.as_ref().unchecked_ref());
        }
        self.button.remove();
    }
}

impl core::fmt::Debug for DomProxy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomProxy")
            .field("button", &"HtmlButtonElement")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// An [`OverlayBackend`] over the browser DOM.
pub struct DomOverlay {
    window: Window,
    document: Document,
    canvas: HtmlCanvasElement,
    container: HtmlElement,
    queue: EventQueue,
    key_down: Listener<KeyboardEvent>,
    pointer_move: Listener<MouseEvent>,
    key_down_registered: bool,
    pointer_move_registered: bool,
    touch_hook: Option<DomProxy>,
}

impl core::fmt::Debug for DomOverlay {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomOverlay")
            .field("container", &"HtmlElement")
            .field("queued", &self.queue.borrow().len())
            .field("key_down_registered", &self.key_down_registered)
            .field("pointer_move_registered", &self.pointer_move_registered)
            .field("touch_hook", &self.touch_hook.is_some())
            .finish_non_exhaustive()
    }
}

impl DomOverlay {
    /// Creates the overlay container for `canvas` in `window`'s document.
    ///
    /// No listener is registered and nothing is inserted into the document
    /// until the engine asks for it.
    ///
    /// # Errors
    ///
    /// Fails if the window has no document or the container cannot be
    /// created.
    pub fn new(window: Window, canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;
        let container: HtmlElement = document.create_element("div")?.unchecked_into();
        let s = container.style();
        let _ = s.set_property("position", "absolute");
        let _ = s.set_property("top", "0");
        let _ = s.set_property("left", "0");
        let _ = s.set_property("width", &px(PROXY_TOUCH_SIZE));
        let _ = s.set_property("height", &px(PROXY_TOUCH_SIZE));
        let _ = s.set_property("z-index", &OVERLAY_Z_INDEX.to_string());

        let queue: EventQueue = Rc::new(RefCell::new(VecDeque::new()));

        let key_down = {
            let queue = Rc::clone(&queue);
            Closure::wrap(Box::new(move |event: KeyboardEvent| {
                let key = if event.key() == "Tab" {
                    Key::Tab
                } else {
                    Key::Other
                };
                queue.borrow_mut().push_back(OverlayEvent::KeyDown(key));
            }) as Box<dyn FnMut(KeyboardEvent)>)
        };
        let pointer_move = {
            let queue = Rc::clone(&queue);
            Closure::wrap(Box::new(move |event: MouseEvent| {
                let movement = Vec2::new(
                    f64::from(event.movement_x()),
                    f64::from(event.movement_y()),
                );
                queue
                    .borrow_mut()
                    .push_back(OverlayEvent::PointerMove(movement));
            }) as Box<dyn FnMut(MouseEvent)>)
        };

        Ok(Self {
            window,
            document,
            canvas,
            container,
            queue,
            key_down,
            pointer_move,
            key_down_registered: false,
            pointer_move_registered: false,
            touch_hook: None,
        })
    }

    /// Returns the overlay container.
    #[must_use]
    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    /// Returns the element the container is inserted into.
    fn container_parent(&self) -> Option<Node> {
        self.canvas
            .parent_node()
            .or_else(|| self.document.body().map(Node::from))
    }

    fn create_button(&self) -> Option<HtmlButtonElement> {
        self.document
            .create_element("button")
            .ok()?
            .dyn_into::<HtmlButtonElement>()
            .ok()
    }
}

fn set_rect(style: &CssStyleDeclaration, rect: Rect) {
    let _ = style.set_property("left", &px(rect.x0));
    let _ = style.set_property("top", &px(rect.y0));
    let _ = style.set_property("width", &px(rect.width()));
    let _ = style.set_property("height", &px(rect.height()));
}

impl OverlayBackend for DomOverlay {
    type Element = DomProxy;

    fn create_proxy(&mut self, id: ProxyId, style: &ProxyStyle) -> Option<DomProxy> {
        let button = self.create_button()?;
        let s = button.style();
        let _ = s.set_property("position", "absolute");
        let _ = s.set_property("width", &px(PROXY_TOUCH_SIZE));
        let _ = s.set_property("height", &px(PROXY_TOUCH_SIZE));
        let _ = s.set_property("z-index", &OVERLAY_Z_INDEX.to_string());
        let _ = s.set_property("border-style", "none");
        if style.debug {
            let _ = s.set_property("background-color", DEBUG_FILL);
            let _ = s.set_property("white-space", "pre");
            let _ = s.set_property("text-align", "left");
        } else {
            let _ = s.set_property("background-color", "transparent");
        }
        let _ = button.set_attribute("aria-live", style.live_mode.as_str());
        let _ = button.set_attribute("aria-relevant", style.relevant.as_str());

        let mut proxy = DomProxy {
            button,
            listeners: Vec::with_capacity(3),
        };
        proxy.listen("click", &self.queue, OverlayEvent::Proxy(id, ProxyEvent::Click));
        proxy.listen("focus", &self.queue, OverlayEvent::Proxy(id, ProxyEvent::Focus));
        proxy.listen("focusout", &self.queue, OverlayEvent::Proxy(id, ProxyEvent::Blur));
        Some(proxy)
    }

    fn destroy_proxy(&mut self, element: DomProxy) {
        drop(element);
    }

    fn attach_proxy(&mut self, element: &DomProxy) {
        let _ = self.container.append_child(&element.button);
    }

    fn detach_proxy(&mut self, element: &DomProxy) {
        element.button.remove();
    }

    fn set_proxy_rect(&mut self, element: &DomProxy, rect: Rect) {
        set_rect(&element.button.style(), rect);
    }

    fn set_title(&mut self, element: &DomProxy, title: &str) {
        element.button.set_title(title);
    }

    fn set_label(&mut self, element: &DomProxy, label: &str) {
        let _ = element.button.set_attribute("aria-label", label);
    }

    fn remove_label(&mut self, element: &DomProxy) {
        let _ = element.button.remove_attribute("aria-label");
    }

    fn set_tab_index(&mut self, element: &DomProxy, tab_index: i32) {
        element.button.set_tab_index(tab_index);
    }

    fn set_kind(&mut self, element: &DomProxy, kind: &str) {
        element.button.set_type(kind);
    }

    fn set_pointer_events(&mut self, element: &DomProxy, pointer_events: &str) {
        let _ = element
            .button
            .style()
            .set_property("pointer-events", pointer_events);
    }

    fn set_live_mode(&mut self, element: &DomProxy, mode: LiveMode) {
        let _ = element.button.set_attribute("aria-live", mode.as_str());
    }

    fn set_debug_text(&mut self, element: &DomProxy, text: &str) {
        element.button.set_inner_text(text);
    }

    fn attach_container(&mut self) {
        if let Some(parent) = self.container_parent() {
            let _ = parent.append_child(&self.container);
        }
    }

    fn detach_container(&mut self) {
        self.container.remove();
    }

    // `rect` is in viewport coordinates. The container shares the canvas's
    // containing block, so it takes the canvas's offset and `rect`'s size.
    fn set_container_rect(&mut self, rect: Rect) {
        let origin = Point::new(
            f64::from(self.canvas.offset_left()),
            f64::from(self.canvas.offset_top()),
        );
        set_rect(
            &self.container.style(),
            Rect::from_origin_size(origin, rect.size()),
        );
    }

    fn listen(&mut self, listener: GlobalListener) {
        match listener {
            GlobalListener::KeyDown if !self.key_down_registered => {
                let _ = self.window.add_event_listener_with_callback(
                    "keydown",
                    self.key_down.as_ref().unchecked_ref(),
                );
                self.key_down_registered = true;
            }
            GlobalListener::PointerMove if !self.pointer_move_registered => {
                let _ = self.document.add_event_listener_with_callback_and_bool(
                    "mousemove",
                    self.pointer_move.as_ref().unchecked_ref(),
                    true,
                );
                self.pointer_move_registered = true;
            }
            _ => {}
        }
    }

    fn unlisten(&mut self, listener: GlobalListener) {
        match listener {
            GlobalListener::KeyDown if self.key_down_registered => {
                let _ = self.window.remove_event_listener_with_callback(
                    "keydown",
                    self.key_down.as_ref().unchecked_ref(),
                );
                self.key_down_registered = false;
            }
            GlobalListener::PointerMove if self.pointer_move_registered => {
                let _ = self.document.remove_event_listener_with_callback_and_bool(
                    "mousemove",
                    self.pointer_move.as_ref().unchecked_ref(),
                    true,
                );
                self.pointer_move_registered = false;
            }
            _ => {}
        }
    }

    fn insert_touch_hook(&mut self) {
        if self.touch_hook.is_some() {
            return;
        }
        let Some(body) = self.document.body() else {
            return;
        };
        let Some(button) = self.create_button() else {
            return;
        };
        let s = button.style();
        let _ = s.set_property("position", "absolute");
        set_rect(
            &s,
            Rect::new(
                TOUCH_HOOK_POSITION,
                TOUCH_HOOK_POSITION,
                TOUCH_HOOK_POSITION + TOUCH_HOOK_SIZE,
                TOUCH_HOOK_POSITION + TOUCH_HOOK_SIZE,
            ),
        );
        let _ = s.set_property("z-index", &OVERLAY_Z_INDEX.to_string());
        let _ = s.set_property("background-color", "#FF0000");
        button.set_title(TOUCH_HOOK_TITLE);

        let mut hook = DomProxy {
            button,
            listeners: Vec::with_capacity(1),
        };
        hook.listen("focus", &self.queue, OverlayEvent::TouchHookFocus);
        let _ = body.append_child(&hook.button);
        self.touch_hook = Some(hook);
    }

    fn remove_touch_hook(&mut self) {
        self.touch_hook = None;
    }

    fn poll_event(&mut self) -> Option<OverlayEvent> {
        self.queue.borrow_mut().pop_front()
    }
}

impl Drop for DomOverlay {
    fn drop(&mut self) {
        self.unlisten(GlobalListener::KeyDown);
        self.unlisten(GlobalListener::PointerMove);
        self.remove_touch_hook();
        self.container.remove();
    }
}
