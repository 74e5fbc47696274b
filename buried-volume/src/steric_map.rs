//! Rendering of the top-view steric map.

use std::io::{Seek, Write};

use image::{ImageOutputFormat, Rgb, RgbImage};

use crate::volume::OccupiedSphere;

/// Side of the square map area, in pixels.
pub(crate) const MAP_SIZE: u32 = 600;
const GUTTER: u32 = 12;
const COLORBAR_WIDTH: u32 = 24;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const OUTLINE: Rgb<u8> = Rgb([0, 0, 0]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColorMap {
    Jet,
    Gray,
}

impl ColorMap {
    pub(crate) fn from_name(name: &str) -> Option<ColorMap> {
        match name {
            "jet" => Some(ColorMap::Jet),
            "gray" | "grey" => Some(ColorMap::Gray),
            _ => None,
        }
    }

    fn sample(self, t: f64) -> Rgb<u8> {
        let t = t.clamp(0.0, 1.0);
        match self {
            ColorMap::Gray => {
                let value = to_byte(t);
                Rgb([value, value, value])
            }
            ColorMap::Jet => jet(t),
        }
    }
}

/// Piecewise linear approximation of the classic jet ramp.
fn jet(t: f64) -> Rgb<u8> {
    let red = (1.5 - (4.0 * t - 3.0).abs()).clamp(0.0, 1.0);
    let green = (1.5 - (4.0 * t - 2.0).abs()).clamp(0.0, 1.0);
    let blue = (1.5 - (4.0 * t - 1.0).abs()).clamp(0.0, 1.0);
    Rgb([to_byte(red), to_byte(green), to_byte(blue)])
}

fn to_byte(channel: f64) -> u8 {
    (channel * 255.0).round() as u8
}

/// Draw the map and its colorbar, then encode the image as PNG into `sink`.
///
/// Each map pixel shows the height of the topmost atom surface above the
/// (x, y) grid point, from -radius (bottom of the ramp, also used where no
/// atom covers the point) to +radius. Points outside the sampling sphere
/// stay on the background.
pub(crate) fn render<W>(
    spheres: &[OccupiedSphere],
    radius: f64,
    color_map: ColorMap,
    sink: &mut W,
) -> Result<(), image::ImageError>
where
    W: Write + Seek,
{
    let width = MAP_SIZE + GUTTER + COLORBAR_WIDTH;
    let mut image = RgbImage::from_pixel(width, MAP_SIZE, BACKGROUND);
    let span = 2.0 * radius;
    let step = span / (MAP_SIZE - 1) as f64;
    for pixel_y in 0..MAP_SIZE {
        let y = radius - pixel_y as f64 * step;
        for pixel_x in 0..MAP_SIZE {
            let x = -radius + pixel_x as f64 * step;
            let from_center = (x * x + y * y).sqrt();
            if from_center > radius {
                continue;
            }
            let color = if from_center > radius - 2.0 * step {
                OUTLINE
            } else {
                let height = steric_height(spheres, x, y).unwrap_or(-radius);
                color_map.sample((height + radius) / span)
            };
            image.put_pixel(pixel_x, pixel_y, color);
        }
    }
    for pixel_y in 0..MAP_SIZE {
        let color = color_map.sample(1.0 - pixel_y as f64 / (MAP_SIZE - 1) as f64);
        for pixel_x in (MAP_SIZE + GUTTER)..width {
            image.put_pixel(pixel_x, pixel_y, color);
        }
    }
    image.write_to(sink, ImageOutputFormat::Png)
}

/// Highest z at which an atom sphere covers the (x, y) grid point.
fn steric_height(spheres: &[OccupiedSphere], x: f64, y: f64) -> Option<f64> {
    spheres
        .iter()
        .filter_map(|sphere| {
            let dx = x - sphere.position[0];
            let dy = y - sphere.position[1];
            let planar = dx * dx + dy * dy;
            let squared_radius = sphere.radius * sphere.radius;
            (planar <= squared_radius)
                .then(|| sphere.position[2] + (squared_radius - planar).sqrt())
        })
        .reduce(f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_float_eq::assert_float_absolute_eq;
    use rstest::rstest;
    use std::io::Cursor;

    #[rstest]
    #[case("jet", Some(ColorMap::Jet))]
    #[case("gray", Some(ColorMap::Gray))]
    #[case("grey", Some(ColorMap::Gray))]
    #[case("viridis", None)]
    #[case("", None)]
    fn test_color_map_names(#[case] name: &str, #[case] expected: Option<ColorMap>) {
        assert_eq!(ColorMap::from_name(name), expected);
    }

    #[rstest]
    #[case(0.0, Rgb([0, 0, 128]))]
    #[case(0.5, Rgb([128, 255, 128]))]
    #[case(1.0, Rgb([128, 0, 0]))]
    fn test_jet_ramp(#[case] t: f64, #[case] expected: Rgb<u8>) {
        assert_eq!(jet(t), expected);
    }

    #[test]
    fn test_steric_height_takes_the_topmost_surface() {
        let spheres = vec![
            OccupiedSphere {
                position: [0.0, 0.0, -1.0],
                radius: 1.0,
            },
            OccupiedSphere {
                position: [0.0, 0.0, 1.0],
                radius: 1.0,
            },
        ];
        assert_float_absolute_eq!(steric_height(&spheres, 0.0, 0.0).unwrap(), 2.0, 1e-12);
        assert_eq!(steric_height(&spheres, 5.0, 0.0), None);
    }

    #[test]
    fn test_render_produces_a_decodable_png() {
        let spheres = vec![OccupiedSphere {
            position: [0.0, 0.0, 0.0],
            radius: 1.8,
        }];
        let mut sink = Cursor::new(Vec::new());
        render(&spheres, 3.5, ColorMap::Jet, &mut sink).unwrap();
        let decoded = image::load_from_memory(sink.get_ref()).unwrap().to_rgb8();
        assert_eq!(
            (decoded.width(), decoded.height()),
            (MAP_SIZE + GUTTER + COLORBAR_WIDTH, MAP_SIZE)
        );
        // The corners are outside the sampling sphere, the middle is not.
        assert_eq!(*decoded.get_pixel(0, 0), BACKGROUND);
        assert_ne!(
            *decoded.get_pixel(MAP_SIZE / 2, MAP_SIZE / 2),
            BACKGROUND
        );
    }
}
