//! Text frames for a standard three-lamp light.

use crossterm::style::{Color as TermColor, Stylize};
use stoplight_core::{Color, LightError, TrafficLight};

/// One lamp of the housing.
pub(crate) const LIGHT_CIRCLE: &str = "
       ***
   ** ****** **
 * ************ *
* ************** *
* ************** *
 * ************ *
   ** ****** **
       ***
";

/// Terminal color used to draw a lit lamp.
pub(crate) fn term_color(color: Color) -> TermColor {
    match color {
        Color::Green => TermColor::Green,
        Color::Yellow => TermColor::Yellow,
        Color::Red => TermColor::Red,
    }
}

/// Status shown under the housing, e.g. `YELLOW, 3s left`.
pub(crate) fn status_line(light: &TrafficLight) -> Result<String, LightError> {
    Ok(format!("{}, {}s left", light.color()?, light.phase_remaining()?))
}

/// Draw `light` at its current tick: green on top, red at the bottom,
/// with only the active lamp colored, followed by the status line.
pub(crate) fn frame(light: &TrafficLight) -> Result<String, LightError> {
    light.ensure_renderable()?;
    let active = light.color()?;

    let mut lamps: [String; 3] = Default::default();
    for color in Color::ALL {
        lamps[color.slot()] = if color == active {
            LIGHT_CIRCLE.with(term_color(color)).to_string()
        } else {
            LIGHT_CIRCLE.to_string()
        };
    }
    Ok(format!(
        "\n{}\n{}\n{}\n{}",
        lamps[0],
        lamps[1],
        lamps[2],
        status_line(light)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stoplight_core::{LightConfig, LightVariant};

    fn plain(s: &str) -> String {
        // Strip CSI sequences so assertions hold whether or not colors are on.
        let mut out = String::new();
        let mut chars = s.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\u{1b}' {
                for n in chars.by_ref() {
                    if n.is_ascii_alphabetic() {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn frame_has_three_lamps() {
        let light = TrafficLight::with_times(1, 1, 1).unwrap();
        let drawn = plain(&frame(&light).unwrap());
        assert_eq!(drawn.matches(LIGHT_CIRCLE).count(), 3);
    }

    #[test]
    fn active_lamp_follows_the_color() {
        crossterm::style::force_color_output(true);
        let mut light = TrafficLight::with_times(1, 1, 1).unwrap();
        for slot in 0..3 {
            let drawn = frame(&light).unwrap();
            let esc = drawn.find('\u{1b}').expect("active lamp is styled");
            assert_eq!(drawn[..esc].matches(LIGHT_CIRCLE).count(), slot);
            light.tick();
        }
    }

    #[test]
    fn status_line_counts_down_the_phase() {
        let mut light = TrafficLight::with_times(10, 5, 10).unwrap();
        assert_eq!(status_line(&light).unwrap(), "GREEN, 10s left");
        light.set_signal_count(12);
        assert_eq!(status_line(&light).unwrap(), "YELLOW, 3s left");
        light.set_signal_count(24);
        assert_eq!(status_line(&light).unwrap(), "RED, 1s left");
        assert!(plain(&frame(&light).unwrap()).ends_with("RED, 1s left"));
    }

    #[test]
    fn flashing_light_is_not_renderable() {
        let config = LightConfig {
            supported_light_type: LightVariant::Flashing,
            ..LightConfig::new(1, 1, 1)
        };
        let light = TrafficLight::new(&config).unwrap();
        match frame(&light) {
            Err(LightError::UnsupportedLightType { light_type }) => {
                assert_eq!(light_type, LightVariant::Flashing)
            }
            other => panic!("expected UnsupportedLightType, got {:?}", other),
        }
    }
}
