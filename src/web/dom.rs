//! [`Surface`] over the host page's elements.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::config::ElementIds;
use crate::error::GameError;
use crate::surface::{Layout, Point, Size, Surface};

const KEYFRAMES_ID: &str = "evasive-click-keyframes";

const KEYFRAMES_CSS: &str = "
@keyframes clickEffect {
    0% { transform: scale(0) rotate(0deg); opacity: 1; }
    100% { transform: scale(2) rotate(360deg); opacity: 0; }
}
@keyframes messageFloat {
    0% { transform: translateY(0); }
    50% { transform: translateY(-6px); }
    100% { transform: translateY(0); }
}
";

const EFFECT_STYLE: &str = "position:absolute; width:20px; height:20px; border-radius:50%; background-color:#4ecdc4; pointer-events:none; z-index:1000; animation:clickEffect 0.3s ease-out forwards;";

pub struct DomSurface {
    document: Document,
    target: HtmlElement,
    area: HtmlElement,
    count: Element,
    rate: Element,
    timer: Element,
    taunt: HtmlElement,
    effects: Vec<(u64, Element)>,
}

impl DomSurface {
    /// Look up every required element; the restart control is bound separately
    /// because it is optional.
    pub fn bind(document: &Document, ids: &ElementIds) -> Result<Self, GameError> {
        ensure_keyframes(document)?;
        Ok(Self {
            document: document.clone(),
            target: html_by_id(document, &ids.target)?,
            area: html_by_id(document, &ids.area)?,
            count: element_by_id(document, &ids.count)?,
            rate: element_by_id(document, &ids.rate)?,
            timer: element_by_id(document, &ids.timer)?,
            taunt: html_by_id(document, &ids.taunt)?,
            effects: Vec::new(),
        })
    }

    pub fn target(&self) -> &HtmlElement {
        &self.target
    }

    /// Viewport (client) coordinates to play-area coordinates.
    pub fn area_point(&self, client_x: f64, client_y: f64) -> Point {
        let rect = self.area.get_bounding_client_rect();
        Point::new(client_x - rect.left(), client_y - rect.top())
    }
}

fn element_by_id(document: &Document, id: &str) -> Result<Element, GameError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| GameError::MissingElement(id.to_owned()))
}

fn html_by_id(document: &Document, id: &str) -> Result<HtmlElement, GameError> {
    element_by_id(document, id)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| GameError::WrongElementType(id.to_owned()))
}

fn ensure_keyframes(document: &Document) -> Result<(), GameError> {
    if document.get_element_by_id(KEYFRAMES_ID).is_some() {
        return Ok(());
    }
    let Some(head) = document.head() else {
        log::debug!("no <head>; click effect keyframes not installed");
        return Ok(());
    };
    let style = document.create_element("style")?;
    style.set_id(KEYFRAMES_ID);
    style.set_text_content(Some(KEYFRAMES_CSS));
    head.append_child(&style)?;
    Ok(())
}

fn set_style(el: &HtmlElement, prop: &str, value: &str) {
    el.style().set_property(prop, value).ok();
}

/// Leading number of a CSS length (`"12.5px"` -> 12.5); NaN when absent.
pub(crate) fn parse_px(value: &str) -> f64 {
    value
        .trim()
        .trim_end_matches("px")
        .trim()
        .parse::<f64>()
        .unwrap_or(f64::NAN)
}

impl Surface for DomSurface {
    fn layout(&self) -> Layout {
        let area = self.area.get_bounding_client_rect();
        Layout {
            area: Size::new(area.width(), area.height()),
            // offset sizes ignore the scale transform
            target: Size::new(
                self.target.offset_width() as f64,
                self.target.offset_height() as f64,
            ),
        }
    }

    fn target_offset(&self) -> Point {
        let style = self.target.style();
        let left = style.get_property_value("left").unwrap_or_default();
        if !left.is_empty() && left != "50%" {
            let top = style.get_property_value("top").unwrap_or_default();
            return Point::new(parse_px(&left), parse_px(&top));
        }
        // Not positioned by us yet (or fallback-centered): measure.
        let area = self.area.get_bounding_client_rect();
        let target = self.target.get_bounding_client_rect();
        Point::new(target.left() - area.left(), target.top() - area.top())
    }

    fn place_target(&mut self, at: Point) {
        set_style(&self.target, "left", &format!("{}px", at.x));
        set_style(&self.target, "top", &format!("{}px", at.y));
    }

    fn scale_target(&mut self, scale: f64) {
        if (scale - 1.0).abs() < f64::EPSILON {
            set_style(&self.target, "transform", "");
        } else {
            set_style(&self.target, "transform", &format!("scale({scale})"));
        }
    }

    fn recenter_fallback(&mut self) {
        set_style(&self.target, "left", "50%");
        set_style(&self.target, "top", "50%");
        set_style(&self.target, "transform", "translate(-50%, -50%)");
    }

    fn set_target_enabled(&mut self, enabled: bool) {
        let (events, opacity) = if enabled { ("auto", "1") } else { ("none", "0.5") };
        set_style(&self.target, "pointer-events", events);
        set_style(&self.target, "opacity", opacity);
    }

    fn show_count(&mut self, count: u32) {
        self.count.set_text_content(Some(&count.to_string()));
    }

    fn show_rate(&mut self, text: &str) {
        self.rate.set_text_content(Some(text));
    }

    fn show_elapsed(&mut self, text: &str) {
        self.timer.set_text_content(Some(text));
    }

    fn show_taunt(&mut self, text: &str) {
        self.taunt.set_text_content(Some(text));
        // Restart the float animation: clear it, force a reflow, set it again.
        set_style(&self.taunt, "animation", "none");
        let _ = self.taunt.offset_width();
        set_style(&self.taunt, "animation", "messageFloat 0.5s ease-in-out");
    }

    fn spawn_effect(&mut self, id: u64, at: Point) {
        let Ok(el) = self.document.create_element("div") else {
            return;
        };
        let style = format!("{EFFECT_STYLE} left:{}px; top:{}px;", at.x, at.y);
        el.set_attribute("style", &style).ok();
        if self.area.append_child(&el).is_ok() {
            self.effects.push((id, el));
        }
    }

    fn remove_effect(&mut self, id: u64) {
        self.effects.retain(|(eid, el)| {
            if *eid == id {
                el.remove();
                false
            } else {
                true
            }
        });
    }
}
