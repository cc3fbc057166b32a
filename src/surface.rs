//! Drawing surface abstraction and the in-memory pixel implementation.
//!
//! The render engine needs exactly three primitives over a 2-D pixel grid —
//! clear, stroke-line, filled-rect — plus dimension queries. The trait is the
//! injected capability the engine draws through; it never reaches into any
//! ambient drawing context.

/// 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Minimal 2-D drawing capability. Implementations must clip all geometry to
/// their own bounds — out-of-range coordinates are cropped, never a panic.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Fill the whole surface with one color.
    fn clear(&mut self, color: Rgb);

    /// Stroke a line segment with the given stroke width.
    fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, stroke: f32, color: Rgb);

    /// Fill an axis-aligned rectangle with top-left corner (x, y).
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb);
}

/// Row-major RGB pixel buffer. Backs both the test assertions and the
/// terminal front-end.
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; (width * height) as usize],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Count of pixels currently set to `color`.
    pub fn count(&self, color: Rgb) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }

    /// Clamp a float coordinate to a pixel index range [0, limit).
    /// Rounds so that an edge at 50.0 splits cleanly: [0,50) | [50,100).
    fn span(a: f32, b: f32, limit: u32) -> (u32, u32) {
        let lo = a.round().max(0.0) as u32;
        let hi = (b.round().max(0.0) as u32).min(limit);
        (lo.min(limit), hi)
    }

    fn fill_span(&mut self, x0: f32, x1: f32, y0: f32, y1: f32, color: Rgb) {
        let (cx0, cx1) = Self::span(x0, x1, self.width);
        let (cy0, cy1) = Self::span(y0, y1, self.height);
        for y in cy0..cy1 {
            let row = (y * self.width) as usize;
            for x in cx0..cx1 {
                self.pixels[row + x as usize] = color;
            }
        }
    }
}

impl Surface for PixelSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, stroke: f32, color: Rgb) {
        let half = stroke / 2.0;
        if (y0 - y1).abs() < f32::EPSILON {
            // Horizontal — the common case for the pitch indicator.
            let (xa, xb) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
            self.fill_span(xa, xb, y0 - half, y0 + half, color);
            return;
        }
        if (x0 - x1).abs() < f32::EPSILON {
            let (ya, yb) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
            self.fill_span(x0 - half, x0 + half, ya, yb, color);
            return;
        }
        // General case: sample along the segment one step per pixel of length.
        let dx = x1 - x0;
        let dy = y1 - y0;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as u32;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = x0 + dx * t;
            let y = y0 + dy * t;
            self.fill_span(x - half, x + half, y - half, y + half, color);
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        self.fill_span(x, x + w, y, y + h, color);
    }
}
