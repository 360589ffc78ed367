use crate::foundation::core::{Affine, LayerImage};
use crate::foundation::error::StackResult;

/// Rendering-target seam used by [`crate::StackedSprite`].
///
/// Implementations own the pixel storage behind `Surface`. All compositing is premultiplied
/// source-over in call order; transforms map source pixel space into destination pixel space.
pub trait Compositor {
    /// Renderable pixel surface.
    type Surface;

    /// Allocate a blank, fully transparent surface.
    fn alloc(&mut self, width: u32, height: u32) -> StackResult<Self::Surface>;

    /// Upload a CPU-side layer into a renderable surface.
    fn upload(&mut self, image: &LayerImage) -> StackResult<Self::Surface>;

    /// Reset every pixel of `surface` to transparent.
    fn clear(&mut self, surface: &mut Self::Surface);

    /// Surface dimensions in pixels.
    fn surface_size(&self, surface: &Self::Surface) -> (u32, u32);

    /// Draw the whole of `src` over `dst` under `transform`.
    fn draw(
        &mut self,
        dst: &mut Self::Surface,
        src: &Self::Surface,
        transform: Affine,
    ) -> StackResult<()>;

    /// Draw several sources over `dst`, first entry bottom-most.
    fn draw_batch(
        &mut self,
        dst: &mut Self::Surface,
        draws: &[(&Self::Surface, Affine)],
    ) -> StackResult<()> {
        for (src, transform) in draws {
            self.draw(dst, src, *transform)?;
        }
        Ok(())
    }
}
