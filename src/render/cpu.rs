use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::foundation::core::{Affine, LayerImage, Rgba8Premul};
use crate::foundation::error::{StackError, StackResult};
use crate::render::composite::{over_in_place, unpremultiply_rgba8};
use crate::render::surface::Compositor;

/// Environment override for [`CpuCompositorOpts::filter`] (`nearest` or `linear`).
pub const FILTER_ENV: &str = "STACKSPRITE_FILTER";

/// Image sampling used when a surface is drawn under a transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFilter {
    /// Nearest-neighbour; keeps pixel-art slices crisp.
    #[default]
    Nearest,
    /// Bilinear.
    Linear,
}

impl ImageFilter {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" => Some(Self::Nearest),
            "linear" | "bilinear" => Some(Self::Linear),
            _ => None,
        }
    }

    fn sampler(self) -> vello_cpu::peniko::ImageSampler {
        let quality = match self {
            Self::Nearest => vello_cpu::peniko::ImageQuality::Low,
            Self::Linear => vello_cpu::peniko::ImageQuality::Medium,
        };
        vello_cpu::peniko::ImageSampler {
            quality,
            ..vello_cpu::peniko::ImageSampler::default()
        }
    }
}

/// Options for the CPU compositor.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuCompositorOpts {
    pub(crate) filter: ImageFilter,
}

impl CpuCompositorOpts {
    /// Return options with the given sampling filter.
    pub fn with_filter(mut self, filter: ImageFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Defaults, with the filter overridden by `STACKSPRITE_FILTER` when it parses.
    pub fn from_env() -> Self {
        let filter = std::env::var(FILTER_ENV)
            .ok()
            .and_then(|v| ImageFilter::parse(&v))
            .unwrap_or_default();
        Self::default().with_filter(filter)
    }

    pub fn filter(&self) -> ImageFilter {
        self.filter
    }
}

/// A premultiplied RGBA8 surface backed by a `vello_cpu` pixmap.
#[derive(Clone)]
pub struct CpuSurface {
    width: u16,
    height: u16,
    pixmap: Arc<vello_cpu::Pixmap>,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl CpuSurface {
    /// Allocate a transparent surface.
    pub fn new(width: u32, height: u32) -> StackResult<Self> {
        let (w, h) = surface_dims_u16(width, height)?;
        Ok(Self {
            width: w,
            height: h,
            pixmap: Arc::new(vello_cpu::Pixmap::new(w, h)),
        })
    }

    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    fn data_mut(&mut self) -> &mut [u8] {
        Arc::make_mut(&mut self.pixmap).data_as_u8_slice_mut()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = &self.data()[i..i + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: Rgba8Premul) {
        let rgba = color.to_array();
        for px in self.data_mut().chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    pub fn clear(&mut self) {
        self.data_mut().fill(0);
    }

    /// Straight-alpha copy of the pixels, suitable for image encoders.
    pub fn to_rgba8_straight(&self) -> Vec<u8> {
        unpremultiply_rgba8(self.data())
    }

    /// Write the surface as a PNG file.
    pub fn save_png(&self, path: &Path) -> StackResult<()> {
        image::save_buffer_with_format(
            path,
            &self.to_rgba8_straight(),
            self.width(),
            self.height(),
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

/// CPU compositor on `vello_cpu`.
///
/// A batch of draws is encoded into one render context, rasterized into a scratch pixmap the
/// size of the destination and then blended over the destination. Contexts and scratch
/// pixmaps are cached per destination size, up to [`CACHED_SIZES`] sizes, so a sprite that
/// alternates between rebuilding its composite and drawing onto a canvas allocates nothing
/// after the first frame.
pub struct CpuCompositor {
    opts: CpuCompositorOpts,
    ctxs: Vec<vello_cpu::RenderContext>,
    scratch: Vec<vello_cpu::Pixmap>,
    allocations: u64,
}

/// Number of destination sizes whose context and scratch pixmap are kept.
pub const CACHED_SIZES: usize = 4;

impl CpuCompositor {
    pub fn new(opts: CpuCompositorOpts) -> Self {
        Self {
            opts,
            ctxs: Vec::new(),
            scratch: Vec::new(),
            allocations: 0,
        }
    }

    pub fn opts(&self) -> CpuCompositorOpts {
        self.opts
    }

    /// Render contexts and scratch pixmaps allocated so far.
    pub fn allocations(&self) -> u64 {
        self.allocations
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> R,
    ) -> R {
        let mut ctx = match take_sized(&mut self.ctxs, width, height, |c| (c.width(), c.height())) {
            Some(ctx) => ctx,
            None => {
                self.allocations += 1;
                vello_cpu::RenderContext::new(width, height)
            }
        };
        ctx.reset();
        let out = f(&mut ctx);
        // Drop encoded paints so source surfaces are uniquely owned again.
        ctx.reset();
        put_back(&mut self.ctxs, ctx);
        out
    }

    fn take_scratch(&mut self, width: u16, height: u16) -> vello_cpu::Pixmap {
        match take_sized(&mut self.scratch, width, height, |p| (p.width(), p.height())) {
            Some(mut p) => {
                p.data_as_u8_slice_mut().fill(0);
                p
            }
            None => {
                self.allocations += 1;
                vello_cpu::Pixmap::new(width, height)
            }
        }
    }
}

/// Remove and return the cached entry of the given size, if any.
fn take_sized<T>(
    slots: &mut Vec<T>,
    width: u16,
    height: u16,
    size: impl Fn(&T) -> (u16, u16),
) -> Option<T> {
    let i = slots.iter().position(|t| size(t) == (width, height))?;
    Some(slots.remove(i))
}

/// Return an entry to the cache as most recently used, evicting the oldest past the limit.
fn put_back<T>(slots: &mut Vec<T>, item: T) {
    slots.push(item);
    if slots.len() > CACHED_SIZES {
        slots.remove(0);
    }
}

impl Default for CpuCompositor {
    fn default() -> Self {
        Self::new(CpuCompositorOpts::from_env())
    }
}

impl Compositor for CpuCompositor {
    type Surface = CpuSurface;

    fn alloc(&mut self, width: u32, height: u32) -> StackResult<CpuSurface> {
        CpuSurface::new(width, height)
    }

    fn upload(&mut self, image: &LayerImage) -> StackResult<CpuSurface> {
        let (w, h) = surface_dims_u16(image.width, image.height)?;
        let pixmap = pixmap_from_premul_bytes(image.rgba8_premul.as_slice(), w, h)?;
        Ok(CpuSurface {
            width: w,
            height: h,
            pixmap: Arc::new(pixmap),
        })
    }

    fn clear(&mut self, surface: &mut CpuSurface) {
        surface.clear();
    }

    fn surface_size(&self, surface: &CpuSurface) -> (u32, u32) {
        (surface.width(), surface.height())
    }

    fn draw(
        &mut self,
        dst: &mut CpuSurface,
        src: &CpuSurface,
        transform: Affine,
    ) -> StackResult<()> {
        self.draw_batch(dst, &[(src, transform)])
    }

    fn draw_batch(
        &mut self,
        dst: &mut CpuSurface,
        draws: &[(&CpuSurface, Affine)],
    ) -> StackResult<()> {
        if draws.is_empty() {
            return Ok(());
        }
        let (w, h) = (dst.width, dst.height);
        let filter = self.opts.filter;
        let mut scratch = self.take_scratch(w, h);

        self.with_ctx_mut(w, h, |ctx| {
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            for (src, transform) in draws {
                ctx.set_transform(affine_to_cpu(*transform));
                ctx.set_paint(vello_cpu::Image {
                    image: vello_cpu::ImageSource::Pixmap(Arc::clone(&src.pixmap)),
                    sampler: filter.sampler(),
                });
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(src.width),
                    f64::from(src.height),
                ));
            }
            ctx.flush();
            ctx.render_to_pixmap(&mut scratch);
        });

        let res = over_in_place(dst.data_mut(), scratch.data_as_u8_slice());
        put_back(&mut self.scratch, scratch);
        res
    }
}

fn surface_dims_u16(width: u32, height: u32) -> StackResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| StackError::render("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| StackError::render("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(StackError::render("surface dimensions must be > 0"));
    }
    Ok((w, h))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_premul_bytes(bytes: &[u8], w: u16, h: u16) -> StackResult<vello_cpu::Pixmap> {
    if bytes.len() != (w as usize) * (h as usize) * 4 {
        return Err(StackError::render("pixmap byte len mismatch"));
    }
    let mut may_have_opacities = false;
    let mut pixels =
        Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity((w as usize) * (h as usize));
    for px in bytes.chunks_exact(4) {
        may_have_opacities |= px[3] != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
