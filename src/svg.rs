use crate::canvas::{Canvas, PathId, PathSeg, PathStyle};
use std::fmt::Write as _;
use std::io;

struct SvgPath {
    segs: Vec<PathSeg>,
    style: Option<PathStyle>,
}

/// Vector sink: records paths and styles and serializes them as an SVG
/// document, the figure's native medium. Nothing is written until the whole
/// figure has grown.
pub struct SvgCanvas {
    width: f64,
    height: f64,
    paths: Vec<Option<SvgPath>>,
}

impl SvgCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            paths: Vec::new(),
        }
    }

    fn path_mut(&mut self, id: PathId) -> io::Result<&mut SvgPath> {
        self.paths
            .get_mut(id)
            .and_then(|slot| slot.as_mut())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such path"))
    }

    pub fn document(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
            self.width, self.height
        );
        for path in self.paths.iter().flatten() {
            let d = path_data(&path.segs);
            match path.style {
                Some(style) => {
                    let _ = writeln!(
                        out,
                        r#"  <path d="{}" stroke="{}" stroke-width="{}" fill="none"/>"#,
                        d,
                        style.stroke.to_style_string(),
                        style.stroke_width
                    );
                }
                None => {
                    let _ = writeln!(out, r#"  <path d="{}" fill="none"/>"#, d);
                }
            }
        }
        out.push_str("</svg>\n");
        out
    }
}

fn path_data(segs: &[PathSeg]) -> String {
    let mut d = String::new();
    for seg in segs {
        match *seg {
            PathSeg::MoveTo(x, y) => {
                let _ = write!(d, "M{x},{y}");
            }
            PathSeg::LineTo(x, y) => {
                let _ = write!(d, "L{x},{y}");
            }
        }
    }
    d
}

impl Canvas for SvgCanvas {
    fn create_path(&mut self, segs: &[PathSeg]) -> io::Result<PathId> {
        self.paths.push(Some(SvgPath {
            segs: segs.to_vec(),
            style: None,
        }));
        Ok(self.paths.len() - 1)
    }

    fn set_path_data(&mut self, id: PathId, segs: &[PathSeg]) -> io::Result<()> {
        let path = self.path_mut(id)?;
        path.segs.clear();
        path.segs.extend_from_slice(segs);
        Ok(())
    }

    fn set_style(&mut self, id: PathId, style: PathStyle) -> io::Result<()> {
        self.path_mut(id)?.style = Some(style);
        Ok(())
    }

    fn remove_path(&mut self, id: PathId) -> io::Result<()> {
        match self.paths.get_mut(id) {
            Some(slot) if slot.is_some() => {
                *slot = None;
                Ok(())
            }
            _ => Err(io::Error::new(io::ErrorKind::NotFound, "no such path")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GrowthEngine;
    use crate::noise::NoiseSource;
    use crate::shade::Shade;

    struct Silent;

    impl NoiseSource for Silent {
        fn sample(&mut self, _divisor: f64) -> f64 {
            0.0
        }
    }

    #[test]
    fn document_wraps_styled_paths() {
        let mut canvas = SvgCanvas::new(200.0, 100.0);
        let id = canvas
            .create_path(&[PathSeg::MoveTo(10.0, 20.0), PathSeg::LineTo(10.0, 5.0)])
            .unwrap();
        canvas
            .set_style(
                id,
                PathStyle {
                    stroke: Shade {
                        hue: 0.25,
                        saturation: 0.5,
                        lightness: 0.25,
                    },
                    stroke_width: 3.0,
                },
            )
            .unwrap();

        let doc = canvas.document();
        assert!(doc.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100">"#));
        assert!(doc.contains(r#"d="M10,20L10,5""#));
        assert!(doc.contains(r#"stroke="hsl(25%, 50%, 25%)""#));
        assert!(doc.contains(r#"stroke-width="3""#));
        assert!(doc.contains(r#"fill="none""#));
        assert!(doc.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn removed_paths_are_not_serialized() {
        let mut canvas = SvgCanvas::new(10.0, 10.0);
        let id = canvas.create_path(&[PathSeg::MoveTo(1.0, 1.0)]).unwrap();
        canvas.remove_path(id).unwrap();
        assert!(!canvas.document().contains("<path"));
    }

    #[test]
    fn one_grown_generation_yields_one_path_per_parent_tip() {
        let mut canvas = SvgCanvas::new(400.0, 400.0);
        let mut engine = GrowthEngine::seeded(400.0, 400.0, 25.0);
        engine
            .grow_one_generation(&mut canvas, &mut Silent)
            .unwrap();
        engine
            .grow_one_generation(&mut canvas, &mut Silent)
            .unwrap();

        // 1 parent in generation one, 4 in generation two.
        assert_eq!(canvas.document().matches("<path").count(), 5);
    }
}
