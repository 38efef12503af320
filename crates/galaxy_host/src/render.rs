//! The rendering interface the interaction loop's `data` output is handed
//! to. `galaxy_core` never names pixels or windows; [`to_layers`] converts
//! the raw [`Value`] into the native shape a `Renderer` actually draws,
//! and it's up to the `Renderer` to decide what to do with it from there.

use galaxy_core::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("data was not a list of layers: {found}")]
    NotALayerList { found: String },
    #[error("layer point was not an (i64, i64) pair: {found}")]
    NotAPoint { found: String },
}

/// Converts a complete `interact` round's `data` value into a list of
/// layers, each a list of `(x, y)` points, the shape every [`Renderer`]
/// draws from.
pub fn to_layers(data: &Value) -> Result<Vec<Vec<(i64, i64)>>, RenderError> {
    let layers = data.to_list().ok_or_else(|| RenderError::NotALayerList {
        found: format!("{data}"),
    })?;
    layers
        .iter()
        .map(|layer| {
            let points = layer.to_list().ok_or_else(|| RenderError::NotALayerList {
                found: format!("{layer}"),
            })?;
            points
                .iter()
                .map(|p| match p {
                    Value::Pair(x, y) => match (x.as_ref(), y.as_ref()) {
                        (Value::Int(x), Value::Int(y)) => Ok((*x, *y)),
                        _ => Err(RenderError::NotAPoint {
                            found: format!("{p}"),
                        }),
                    },
                    _ => Err(RenderError::NotAPoint {
                        found: format!("{p}"),
                    }),
                })
                .collect()
        })
        .collect()
}

/// Something that can display a list of layers, each a list of `(x, y)`
/// points. A real GUI front end is out of scope for this crate; this
/// trait is the seam one would plug into.
pub trait Renderer {
    fn render(&mut self, layers: &[Vec<(i64, i64)>]);
}

/// Renders layers onto a single ASCII grid, one character per layer
/// (`#@?!abcdefghi`, cycling if there are more than 13 layers), mirroring
/// the reference implementation's debug grid dump. Later layers draw over
/// earlier ones at a shared point. Prints nothing for an all-empty frame.
#[derive(Debug, Default)]
pub struct TextRenderer;

const LAYER_CHARS: &str = "#@?!abcdefghi";

impl Renderer for TextRenderer {
    fn render(&mut self, layers: &[Vec<(i64, i64)>]) {
        let mut buffer: std::collections::HashMap<(i64, i64), char> = std::collections::HashMap::new();
        for (layer, c) in layers.iter().zip(LAYER_CHARS.chars().cycle()) {
            for &p in layer {
                buffer.insert(p, c);
            }
        }
        if buffer.is_empty() {
            log::info!("empty frame: no points to render");
            return;
        }

        let xmin = buffer.keys().map(|(x, _)| *x).min().unwrap();
        let xmax = buffer.keys().map(|(x, _)| *x).max().unwrap();
        let ymin = buffer.keys().map(|(_, y)| *y).min().unwrap();
        let ymax = buffer.keys().map(|(_, y)| *y).max().unwrap();
        let w = (xmax - xmin + 1) as usize;
        let h = (ymax - ymin + 1) as usize;

        let mut grid = vec![vec!['.'; w]; h];
        for (&(x, y), &c) in buffer.iter() {
            grid[(y - ymin) as usize][(x - xmin) as usize] = c;
        }

        println!("offset: ({}, {})", -xmin, -ymin);
        for row in grid {
            println!("{}", row.into_iter().collect::<String>());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_layers_converts_nested_lists() {
        let data = Value::from_list(vec![Value::from_list(vec![
            Value::pair(Value::Int(0), Value::Int(0)),
            Value::pair(Value::Int(1), Value::Int(-1)),
        ])]);
        let layers = to_layers(&data).unwrap();
        assert_eq!(layers, vec![vec![(0, 0), (1, -1)]]);
    }

    #[test]
    fn test_to_layers_rejects_non_list() {
        assert!(matches!(
            to_layers(&Value::Int(5)),
            Err(RenderError::NotALayerList { .. })
        ));
    }

    #[test]
    fn test_to_layers_rejects_non_point_element() {
        let data = Value::from_list(vec![Value::from_list(vec![Value::Int(1)])]);
        assert!(matches!(to_layers(&data), Err(RenderError::NotAPoint { .. })));
    }

    #[test]
    fn test_render_draws_a_grid_without_panicking() {
        let mut r = TextRenderer;
        r.render(&[vec![(0, 0), (2, 1)], vec![(1, 1)]]);
    }

    #[test]
    fn test_render_handles_empty_frame() {
        let mut r = TextRenderer;
        r.render(&[]);
    }
}
