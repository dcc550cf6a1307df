//! The process-wide palette registry.

use once_cell::sync::Lazy;

use super::{ColorMapping, Gradient, PaletteError};
use crate::suggest::closest_name;

pub const DEFAULT_PALETTE: &str = "viridis";

/// Names the rendering backends resolve themselves.
pub const STANDARD_PALETTES: &[&str] = &[
    "viridis", "plasma", "inferno", "magma", "cividis", "Spectral", "coolwarm", "rainbow", "jet",
];

const CUSTOM_PALETTES: &[(&str, [&str; 5])] = &[
    ("ocean", ["#03045e", "#0077b6", "#00b4d8", "#90e0ef", "#caf0f8"]),
    ("sunset", ["#4a0a77", "#b5179e", "#f72585", "#fb8500", "#ffcf55"]),
    ("forest", ["#081c15", "#1b4332", "#2d6a4f", "#52b788", "#d8f3dc"]),
    ("galaxy", ["#0d1b2a", "#1b263b", "#415a77", "#778da9", "#e0e1dd"]),
    ("fire", ["#370617", "#9d0208", "#dc2f02", "#f48c06", "#ffba08"]),
];

static CUSTOM_GRADIENTS: Lazy<Vec<(&'static str, Gradient)>> = Lazy::new(|| {
    CUSTOM_PALETTES
        .iter()
        .filter_map(|(name, colors)| match Gradient::from_hex(colors) {
            Ok(gradient) => Some((*name, gradient)),
            Err(err) => {
                log::error!("palette `{name}` is malformed: {err}");
                None
            }
        })
        .collect()
});

/// Every selectable palette name, standard palettes first.
#[must_use]
pub fn palette_names() -> Vec<&'static str> {
    STANDARD_PALETTES
        .iter()
        .copied()
        .chain(CUSTOM_GRADIENTS.iter().map(|(name, _)| *name))
        .collect()
}

#[must_use]
pub fn custom_gradient(name: &str) -> Option<&'static Gradient> {
    CUSTOM_GRADIENTS
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
        .map(|(_, gradient)| gradient)
}

/// Resolves a palette name, ignoring case. The mapping carries the
/// canonical spelling.
pub fn lookup(name: &str) -> Result<ColorMapping, PaletteError> {
    let name = name.trim();
    if let Some((canonical, gradient)) = CUSTOM_GRADIENTS
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
    {
        return Ok(ColorMapping::Custom {
            name: (*canonical).to_owned(),
            gradient: gradient.clone(),
        });
    }
    if let Some(canonical) = STANDARD_PALETTES
        .iter()
        .find(|candidate| candidate.eq_ignore_ascii_case(name))
    {
        return Ok(ColorMapping::Standard {
            name: (*canonical).to_owned(),
        });
    }
    Err(PaletteError::Unknown {
        name: name.to_owned(),
        suggestion: closest_name(name, palette_names()).map(str::to_owned),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    #[test]
    fn lists_standard_then_custom() {
        let names = palette_names();
        assert_eq!(names.len(), 14);
        assert_eq!(names[0], "viridis");
        assert_eq!(names[9], "ocean");
        assert_eq!(names[13], "fire");
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(
            lookup("spectral").unwrap(),
            ColorMapping::Standard {
                name: "Spectral".to_owned()
            }
        );
        let ocean = lookup("Ocean").unwrap();
        assert!(ocean.is_custom());
        assert_eq!(ocean.name(), "ocean");
    }

    #[test]
    fn custom_palettes_have_five_even_stops() {
        let gradient = custom_gradient("fire").expect("fire");
        let positions: Vec<f64> = gradient.stops().iter().map(|stop| stop.position).collect();
        assert_eq!(positions, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(gradient.stops()[0].color, Rgb::from_hex("#370617").unwrap());
    }

    #[test]
    fn unknown_names_get_suggestions() {
        let err = lookup("viridas").unwrap_err();
        assert!(matches!(
            err,
            PaletteError::Unknown { ref suggestion, .. } if suggestion.as_deref() == Some("viridis")
        ));
    }
}
