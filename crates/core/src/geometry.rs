//! Output page geometry and the tablet-to-page coordinate mapping.

use rmpdf_render_core::utils::mm_to_pt;
use rmpdf_types::{Orientation, Rect, Size};

/// Portrait output page width; wider than A4 to match the tablet's aspect.
pub const PAGE_WIDTH_MM: f32 = 222.6264;
pub const PAGE_HEIGHT_MM: f32 = 297.0;

/// Backgrounds are drawn at A4.
pub const BACKGROUND_WIDTH_MM: f32 = 210.0;
pub const BACKGROUND_HEIGHT_MM: f32 = 297.0;

/// Tablet units per point.
pub const TABLET_UNITS_PER_PT: f32 = 2.222;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageGeometry {
    orientation: Orientation,
}

impl PageGeometry {
    pub fn new(orientation: Orientation) -> Self {
        Self { orientation }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Output page size in points.
    pub fn page_size(&self) -> Size {
        self.orientation
            .apply(Size::new(mm_to_pt(PAGE_WIDTH_MM), mm_to_pt(PAGE_HEIGHT_MM)))
    }

    /// Where the background page is drawn, in top-left page coordinates.
    pub fn background_rect(&self) -> Rect {
        let size = self.orientation.apply(Size::new(
            mm_to_pt(BACKGROUND_WIDTH_MM),
            mm_to_pt(BACKGROUND_HEIGHT_MM),
        ));
        Rect::from_size(size)
    }

    /// Maps a tablet point to top-left page coordinates in points. Landscape
    /// pages are captured rotated, so the axes swap and the tablet y axis
    /// runs right to left across the A4 long edge.
    pub fn to_page(&self, x: f32, y: f32) -> (f32, f32) {
        let (px, py) = (x / TABLET_UNITS_PER_PT, y / TABLET_UNITS_PER_PT);
        match self.orientation {
            Orientation::Portrait => (px, py),
            Orientation::Landscape => (mm_to_pt(BACKGROUND_HEIGHT_MM) - py, px),
        }
    }
}
