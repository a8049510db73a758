/// PDF points per millimetre.
pub const POINTS_PER_MM: f32 = 2.83465;

/// Convert a top-left Y coordinate to PDF's bottom-left origin
pub fn flip_y(y: f32, page_height: f32) -> f32 {
    page_height - y
}

pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}
