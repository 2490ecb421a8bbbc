use eframe::egui;

/// Mapping between the on-screen canvas rect and image-space coordinates.
///
/// With a decoded background this is cover scaling: the image is scaled by the
/// larger of the two axis ratios, centered, and the overflow is cropped. Until
/// the image decodes, positions pass through as surface-relative pixels
/// clamped to the surface so pointer math never fails.
#[derive(Clone, Copy, Debug)]
pub struct SurfaceTransform {
    surface: egui::Rect,
    natural: Option<egui::Vec2>,
}

impl SurfaceTransform {
    pub fn new(surface: egui::Rect, natural: Option<egui::Vec2>) -> Self {
        Self { surface, natural }
    }

    /// Screen pixels per image unit.
    pub fn scale(&self) -> f32 {
        match self.natural {
            Some(n) if n.x > 0.0 && n.y > 0.0 => {
                (self.surface.width() / n.x).max(self.surface.height() / n.y)
            }
            _ => 1.0,
        }
    }

    /// Screen position of image-space origin. With cover scaling the scaled
    /// image is centered, so one axis origin typically sits outside the
    /// surface.
    fn origin(&self) -> egui::Pos2 {
        match self.natural {
            Some(n) if n.x > 0.0 && n.y > 0.0 => {
                let s = self.scale();
                self.surface.center() - egui::vec2(n.x * s * 0.5, n.y * s * 0.5)
            }
            _ => self.surface.min,
        }
    }

    pub fn to_image(&self, pos: egui::Pos2) -> egui::Pos2 {
        match self.natural {
            Some(_) => {
                let o = self.origin();
                ((pos - o) / self.scale()).to_pos2()
            }
            None => (pos.clamp(self.surface.min, self.surface.max) - self.surface.min).to_pos2(),
        }
    }

    pub fn to_screen(&self, pos: egui::Pos2) -> egui::Pos2 {
        match self.natural {
            Some(_) => self.origin() + pos.to_vec2() * self.scale(),
            None => self.surface.min + pos.to_vec2(),
        }
    }

    pub fn rect_to_screen(&self, rect: egui::Rect) -> egui::Rect {
        egui::Rect::from_min_max(self.to_screen(rect.min), self.to_screen(rect.max))
    }

    /// Image-space extent, for full-canvas passes like the snap grid.
    pub fn image_extent(&self) -> egui::Rect {
        match self.natural {
            Some(n) => egui::Rect::from_min_size(egui::Pos2::ZERO, n),
            None => egui::Rect::from_min_size(egui::Pos2::ZERO, self.surface.size()),
        }
    }

    /// Screen rect the scaled image occupies, which may overflow the surface.
    pub fn image_screen_rect(&self) -> egui::Rect {
        self.rect_to_screen(self.image_extent())
    }
}
