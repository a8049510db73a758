/// One sampled point of a stroke, in tablet coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub pressure: f32,
    pub tilt: f32,
}

/// One continuous pen path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stroke {
    /// Raw pen code identifying the physical tool.
    pub pen_code: u32,
    pub color_code: u32,
    /// Raw encoded width; one of 1.875, 2.0 or 2.125 on current tablets.
    pub base_width: f32,
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layer {
    pub strokes: Vec<Stroke>,
}

impl Layer {
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}

/// Running maximum of the x and y coordinates seen while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MaxCoordinates {
    pub x: f32,
    pub y: f32,
}

impl MaxCoordinates {
    pub(crate) fn record(&mut self, point: &Point) {
        if point.x > self.x {
            self.x = point.x;
        }
        if point.y > self.y {
            self.y = point.y;
        }
    }
}

/// A decoded stroke file. Immutable once produced by [`crate::decode`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StrokeDocument {
    pub(crate) layers: Vec<Layer>,
    pub(crate) declared_layers: u32,
    pub(crate) max_coordinates: MaxCoordinates,
    pub(crate) truncated: bool,
}

impl StrokeDocument {
    /// Builds a complete document from already decoded layers.
    pub fn from_layers(layers: Vec<Layer>) -> Self {
        let mut max_coordinates = MaxCoordinates::default();
        for point in layers.iter().flat_map(|l| &l.strokes).flat_map(|s| &s.points) {
            max_coordinates.record(point);
        }
        Self {
            declared_layers: layers.len() as u32,
            layers,
            max_coordinates,
            truncated: false,
        }
    }

    /// Layers in file order; layer `n` (1-indexed) is at index `n - 1`.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layers paired with their 1-indexed layer number.
    pub fn numbered_layers(&self) -> impl Iterator<Item = (usize, &Layer)> {
        self.layers.iter().enumerate().map(|(i, layer)| (i + 1, layer))
    }

    /// The layer count stated in the file header.
    pub fn declared_layer_count(&self) -> u32 {
        self.declared_layers
    }

    pub fn stroke_count(&self) -> usize {
        self.layers.iter().map(|l| l.strokes.len()).sum()
    }

    pub fn max_coordinates(&self) -> MaxCoordinates {
        self.max_coordinates
    }

    /// True if the stream ended before every declared record was read. Only
    /// complete strokes are kept in that case.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}
