//! Everything the controller reads from or writes to the page.
//!
//! The browser implementation lives in `web::dom`; [`HeadlessSurface`] keeps the
//! same state in memory so the game runs (and is tested) without a DOM.

/// Pixel offset inside the play area (top-left of the target).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Measured sizes of the play area and the (unscaled) target.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Layout {
    pub area: Size,
    pub target: Size,
}

impl Layout {
    pub fn is_finite(&self) -> bool {
        [self.area.width, self.area.height, self.target.width, self.target.height]
            .iter()
            .all(|v| v.is_finite())
    }
}

pub trait Surface {
    fn layout(&self) -> Layout;

    /// Current rendered offset of the target. May be NaN if the page's layout
    /// is in a state the surface cannot read.
    fn target_offset(&self) -> Point;

    fn place_target(&mut self, at: Point);
    fn scale_target(&mut self, scale: f64);

    /// Last-resort centering that does not depend on measured sizes.
    fn recenter_fallback(&mut self);

    fn set_target_enabled(&mut self, enabled: bool);

    fn show_count(&mut self, count: u32);
    fn show_rate(&mut self, text: &str);
    fn show_elapsed(&mut self, text: &str);
    fn show_taunt(&mut self, text: &str);

    fn spawn_effect(&mut self, id: u64, at: Point);
    fn remove_effect(&mut self, id: u64);
}

/// In-memory surface: what a page would show, minus the page.
#[derive(Clone, Debug)]
pub struct HeadlessSurface {
    pub layout: Layout,
    pub position: Point,
    pub scale: f64,
    /// Set by [`Surface::recenter_fallback`]; cleared by the next placement.
    pub centered_by_fallback: bool,
    pub enabled: bool,
    pub count: String,
    pub rate: String,
    pub elapsed: String,
    pub taunt: String,
    pub effects: Vec<(u64, Point)>,
    reported_offset: Option<Point>,
}

impl HeadlessSurface {
    pub fn new(area: Size, target: Size) -> Self {
        Self {
            layout: Layout { area, target },
            position: Point::default(),
            scale: 1.0,
            centered_by_fallback: false,
            enabled: true,
            count: String::new(),
            rate: String::new(),
            elapsed: String::new(),
            taunt: String::new(),
            effects: Vec::new(),
            reported_offset: None,
        }
    }

    /// Make [`Surface::target_offset`] report `offset` instead of the placed
    /// position until the next placement (simulates a broken layout read).
    pub fn report_offset(&mut self, offset: Point) {
        self.reported_offset = Some(offset);
    }
}

impl Default for HeadlessSurface {
    /// Roughly the original page: 600x400 area, 150x80 button.
    fn default() -> Self {
        Self::new(Size::new(600.0, 400.0), Size::new(150.0, 80.0))
    }
}

impl Surface for HeadlessSurface {
    fn layout(&self) -> Layout {
        self.layout
    }

    fn target_offset(&self) -> Point {
        self.reported_offset.unwrap_or(self.position)
    }

    fn place_target(&mut self, at: Point) {
        self.position = at;
        self.reported_offset = None;
        self.centered_by_fallback = false;
    }

    fn scale_target(&mut self, scale: f64) {
        self.scale = scale;
    }

    fn recenter_fallback(&mut self) {
        let l = self.layout;
        self.position = Point::new(
            (l.area.width - l.target.width) / 2.0,
            (l.area.height - l.target.height) / 2.0,
        );
        self.scale = 1.0;
        self.reported_offset = None;
        self.centered_by_fallback = true;
    }

    fn set_target_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn show_count(&mut self, count: u32) {
        self.count = count.to_string();
    }

    fn show_rate(&mut self, text: &str) {
        self.rate = text.to_owned();
    }

    fn show_elapsed(&mut self, text: &str) {
        self.elapsed = text.to_owned();
    }

    fn show_taunt(&mut self, text: &str) {
        self.taunt = text.to_owned();
    }

    fn spawn_effect(&mut self, id: u64, at: Point) {
        self.effects.push((id, at));
    }

    fn remove_effect(&mut self, id: u64) {
        self.effects.retain(|(e, _)| *e != id);
    }
}
