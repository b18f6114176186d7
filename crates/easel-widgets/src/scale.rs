//! Stepped zoom for a scaleable view.
//!
//! Zoom levels form a geometric table from `scale0` up to roughly
//! `scale_max`. Zooming moves through the table one step at a time and
//! keeps a chosen point (usually the one under the mouse) fixed on screen.

use thiserror::Error;

/// A position in screen or view coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Called with the new scale and table index whenever the scale changes.
pub type ScaleChanged = Box<dyn FnMut(f64, usize)>;

#[derive(Debug, Error, PartialEq)]
pub enum ScaleError {
    #[error("a zoom table needs at least 3 steps, got {0}")]
    TooFewSteps(usize),
    #[error("zoom range {scale0}..{scale_max} is empty or not positive")]
    BadRange { scale0: f64, scale_max: f64 },
}

/// How to build a [`ScaleModel`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleParams {
    /// Scale at index 0.
    pub scale0: f64,
    /// Scale the table aims for near its top.
    pub scale_max: f64,
    /// Highest index; the table has `steps + 1` entries.
    pub steps: usize,
    /// Starting scale, rounded to the nearest step. Defaults to `scale0`.
    pub init_scale: Option<f64>,
    /// Smallest scale for unscaled overlays. Defaults to `1 / table[steps - 2]`.
    pub unscale_min: Option<f64>,
    /// Largest scale for unscaled overlays. Defaults to `1 / table[2]`.
    pub unscale_max: Option<f64>,
}

impl Default for ScaleParams {
    fn default() -> Self {
        Self {
            scale0: 1.0,
            scale_max: 1000.0,
            steps: 30,
            init_scale: None,
            unscale_min: None,
            unscale_max: None,
        }
    }
}

/// Zoom state of a view: current scale, its table index and the view origin.
///
/// A view point `v` appears on screen at `origin + v * scale`.
pub struct ScaleModel {
    table: Vec<f64>,
    base: f64,
    index: usize,
    init_index: usize,
    scale: f64,
    origin: Point,
    unscale_min: f64,
    unscale_max: f64,
    inv_scale: f64,
    on_scaled: Option<ScaleChanged>,
}

impl ScaleModel {
    pub fn new(params: ScaleParams) -> Result<Self, ScaleError> {
        let ScaleParams { scale0, scale_max, steps, .. } = params;
        if steps < 3 {
            return Err(ScaleError::TooFewSteps(steps));
        }
        if !(scale0 > 0.0 && scale_max > scale0) {
            return Err(ScaleError::BadRange { scale0, scale_max });
        }
        let (table, base) = scale_table(scale0, scale_max, steps);
        let mut model = Self {
            unscale_min: params.unscale_min.unwrap_or(1.0 / table[steps - 2]),
            unscale_max: params.unscale_max.unwrap_or(1.0 / table[2]),
            table,
            base,
            index: 0,
            init_index: 0,
            scale: scale0,
            origin: Point::default(),
            inv_scale: 1.0,
            on_scaled: None,
        };
        model.init_index = model.find_index(params.init_scale.unwrap_or(scale0));
        model.zoom(0, Point::default());
        Ok(model)
    }

    /// The zoom steps, smallest first.
    pub fn table(&self) -> &[f64] {
        &self.table
    }

    pub fn max_index(&self) -> usize {
        self.table.len() - 1
    }

    /// Index of the step nearest to `scale`, clamped to the table.
    pub fn find_index(&self, scale: f64) -> usize {
        let r = ((scale / self.table[0]).ln() / self.base.ln()).round() as i64;
        r.clamp(0, self.max_index() as i64) as usize
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The table value at the current index.
    pub fn step_scale(&self) -> f64 {
        self.table[self.index]
    }

    /// The scale actually applied, which differs from
    /// [`step_scale`](Self::step_scale) after [`set_scale`](Self::set_scale).
    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Scale for overlays that should keep their size while the view zooms.
    pub fn inv_scale(&self) -> f64 {
        self.inv_scale
    }

    pub fn on_scaled(&mut self, callback: impl FnMut(f64, usize) + 'static) {
        self.on_scaled = Some(Box::new(callback));
    }

    pub fn to_screen(&self, view: Point) -> Point {
        Point::new(
            self.origin.x + view.x * self.scale,
            self.origin.y + view.y * self.scale,
        )
    }

    pub fn to_view(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.origin.x) / self.scale,
            (screen.y - self.origin.y) / self.scale,
        )
    }

    /// Move to step `index` (clamped) and return its scale. The view is
    /// not rescaled.
    pub fn step_to(&mut self, index: i64) -> f64 {
        self.index = index.clamp(0, self.max_index() as i64) as usize;
        self.table[self.index]
    }

    /// Move `di` steps (clamped) and return the new step scale.
    pub fn inc_scale(&mut self, di: i64) -> f64 {
        self.step_to(self.index as i64 + di)
    }

    /// Zoom `di` steps about `about`, which stays where it is on screen.
    ///
    /// `di == 0` resets to the initial step with the origin at `about`.
    pub fn zoom(&mut self, di: i64, about: Point) -> f64 {
        if di == 0 {
            let ns = self.step_to(self.init_index as i64);
            self.origin = about;
            return self.apply(ns);
        }
        let ns = self.inc_scale(di);
        self.rescale(ns, about)
    }

    /// Zoom to step `index` about `about`.
    pub fn set_scale_index(&mut self, index: i64, about: Point) -> f64 {
        let ns = self.step_to(index);
        self.rescale(ns, about)
    }

    /// Zoom to exactly `scale`; the index moves to the nearest step.
    pub fn set_scale(&mut self, scale: f64, about: Point) -> f64 {
        self.index = self.find_index(scale);
        self.rescale(scale, about)
    }

    fn rescale(&mut self, ns: f64, about: Point) -> f64 {
        let ratio = ns / self.scale;
        self.origin = Point::new(
            about.x + (self.origin.x - about.x) * ratio,
            about.y + (self.origin.y - about.y) * ratio,
        );
        self.apply(ns)
    }

    fn apply(&mut self, ns: f64) -> f64 {
        let os = self.scale;
        self.scale = ns;
        self.inv_scale = (1.0 / ns).max(self.unscale_min).min(self.unscale_max);
        if ns != os {
            if let Some(callback) = &mut self.on_scaled {
                callback(ns, self.index);
            }
        }
        ns
    }
}

impl std::fmt::Debug for ScaleModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScaleModel")
            .field("index", &self.index)
            .field("scale", &self.scale)
            .field("origin", &self.origin)
            .field("steps", &self.max_index())
            .finish_non_exhaustive()
    }
}

/// `steps + 1` geometric values from `scale0`, snapped to whole numbers
/// where that is within 8%.
fn scale_table(scale0: f64, scale_max: f64, steps: usize) -> (Vec<f64>, f64) {
    let base = 1.0 + (scale_max / scale0).ln() / (steps - 2) as f64;
    let table = (0..=steps)
        .map(|i| {
            let scale = scale0 * base.powi(i as i32);
            let whole = scale.round();
            if scale > 1.8 && (scale - whole).abs() < 0.08 * scale {
                whole
            } else {
                scale
            }
        })
        .collect();
    (table, base)
}

/// Turns wheel ticks into whole zoom steps.
///
/// Each tick adds `sensitivity` in the scroll direction; a step is taken
/// once the total passes a whole number.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelZoom {
    sensitivity: f64,
    pending: f64,
}

impl Default for WheelZoom {
    fn default() -> Self {
        Self::new(0.33)
    }
}

impl WheelZoom {
    pub fn new(sensitivity: f64) -> Self {
        Self {
            sensitivity,
            pending: 0.0,
        }
    }

    /// Record one tick (positive zooms in) and return the steps to take now.
    pub fn scroll(&mut self, delta: f64) -> i64 {
        if delta == 0.0 {
            return 0;
        }
        self.pending += delta.signum() * self.sensitivity;
        let steps = self.pending.trunc();
        self.pending -= steps;
        steps as i64
    }
}
