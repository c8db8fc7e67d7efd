//! Interactive collection of the light timings.

use std::io::{self, BufRead, Write};

use crossterm::style::Stylize;
use stoplight_core::{parse_duration, Color, LightConfig};

use super::render::term_color;

const REPEAT_QUESTION: &str = "Do you want the light to display indefinitely, until you exit \
the program? It will only cycle once if you choose No.";

/// Timings accepted at the prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Timing {
    pub green: u32,
    pub yellow: u32,
    pub red: u32,
    pub repeat: bool,
}

impl Timing {
    pub(crate) fn config(&self) -> LightConfig {
        LightConfig::new(
            i64::from(self.green),
            i64::from(self.yellow),
            i64::from(self.red),
        )
    }
}

/// Values already supplied on the command line. `None` fields are asked for.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Preset {
    pub green: Option<u32>,
    pub yellow: Option<u32>,
    pub red: Option<u32>,
    pub repeat: Option<bool>,
}

/// Line-oriented prompt session over any reader/writer pair.
pub(crate) struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub(crate) fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask for every timing not in `preset`.
    ///
    /// Returns `Ok(None)` when the user types `q` or input ends. A zero
    /// total discards the prompted durations and asks for them again.
    pub(crate) fn collect(&mut self, preset: Preset) -> io::Result<Option<Timing>> {
        loop {
            let mut durations = [0u32; 3];
            for color in Color::ALL {
                let fixed = match color {
                    Color::Green => preset.green,
                    Color::Yellow => preset.yellow,
                    Color::Red => preset.red,
                };
                durations[color.slot()] = match fixed {
                    Some(seconds) => seconds,
                    None => match self.duration(color)? {
                        Some(seconds) => seconds,
                        None => return Ok(None),
                    },
                };
            }

            let repeat = match preset.repeat {
                Some(repeat) => repeat,
                None => match self.repeat()? {
                    Some(repeat) => repeat,
                    None => return Ok(None),
                },
            };

            let timing = Timing {
                green: durations[0],
                yellow: durations[1],
                red: durations[2],
                repeat,
            };
            // A full preset was validated before prompting, so this only
            // rejects prompted values.
            if let Err(e) = timing.config().validate() {
                tracing::debug!(error = %e, "rejected timings");
                writeln!(
                    self.output,
                    "{}",
                    "Total light color times must be greater than zero. Please re-enter your color times."
                        .red()
                )?;
                continue;
            }
            return Ok(Some(timing));
        }
    }

    /// Ask for one phase duration until a valid value is typed.
    fn duration(&mut self, color: Color) -> io::Result<Option<u32>> {
        let name = color.as_str().to_ascii_lowercase();
        let question = format!("Enter the number of seconds for the {} light", name);
        loop {
            let Some(answer) = self.ask(&question)? else {
                return Ok(None);
            };
            match parse_duration(&format!("{}_time", name), &answer) {
                Ok(seconds) => return Ok(Some(seconds)),
                Err(e) => {
                    tracing::debug!(error = %e, "rejected duration");
                    let message = format!("{} time must be a non-negative integer.", title(color));
                    writeln!(self.output, "{}", message.red())?;
                }
            }
        }
    }

    /// Ask whether to cycle until exit. Empty input means yes.
    fn repeat(&mut self) -> io::Result<Option<bool>> {
        let question = format!("{} [Y/n]", REPEAT_QUESTION);
        loop {
            let Some(answer) = self.ask(&question)? else {
                return Ok(None);
            };
            match answer.to_ascii_lowercase().as_str() {
                "" | "y" | "yes" => return Ok(Some(true)),
                "n" | "no" => return Ok(Some(false)),
                _ => writeln!(self.output, "Error: '{}' is not one of 'Y', 'n'.", answer)?,
            }
        }
    }

    /// Print `question` and read one trimmed line. `None` on `q` or end of input.
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}: ", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        let answer = line.trim();
        if answer.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        Ok(Some(answer.to_string()))
    }
}

fn title(color: Color) -> &'static str {
    match color {
        Color::Green => "Green",
        Color::Yellow => "Yellow",
        Color::Red => "Red",
    }
}

/// Print the accepted durations, each in its lamp color.
pub(crate) fn write_summary<W: Write>(out: &mut W, timing: &Timing) -> io::Result<()> {
    writeln!(out, "The configurations for colors are:")?;
    for (color, seconds) in [
        (Color::Green, timing.green),
        (Color::Yellow, timing.yellow),
        (Color::Red, timing.red),
    ] {
        let line = format!("{}: {} seconds", color.as_str().to_ascii_lowercase(), seconds);
        writeln!(out, "{}", line.with(term_color(color)))?;
    }
    if timing.repeat {
        writeln!(out, "The traffic light will display indefinitely.")
    } else {
        writeln!(out, "The traffic light will cycle only once.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(input: &str, preset: Preset) -> (Option<Timing>, String) {
        let mut out = Vec::new();
        let timing = Prompter::new(Cursor::new(input.as_bytes()), &mut out)
            .collect(preset)
            .unwrap();
        (timing, String::from_utf8(out).unwrap())
    }

    #[test]
    fn reads_three_durations_and_choice() {
        let (timing, out) = run("10\n5\n10\nn\n", Preset::default());
        assert_eq!(
            timing,
            Some(Timing {
                green: 10,
                yellow: 5,
                red: 10,
                repeat: false
            })
        );
        assert!(out.contains("Enter the number of seconds for the green light"));
        assert!(out.contains("Enter the number of seconds for the yellow light"));
        assert!(out.contains("Enter the number of seconds for the red light"));
        assert!(out.contains("[Y/n]"));
    }

    #[test]
    fn empty_choice_defaults_to_repeat() {
        let (timing, _) = run("1\n1\n1\n\n", Preset::default());
        assert!(timing.unwrap().repeat);
    }

    #[test]
    fn q_quits_at_any_prompt() {
        for input in ["q\n", "1\nQ\n", "1\n1\nq\n", "1\n1\n1\nq\n"] {
            let (timing, _) = run(input, Preset::default());
            assert_eq!(timing, None, "input {:?}", input);
        }
    }

    #[test]
    fn end_of_input_quits() {
        let (timing, _) = run("1\n", Preset::default());
        assert_eq!(timing, None);
    }

    #[test]
    fn invalid_duration_reprompts_same_field() {
        let (timing, out) = run("-1\nabc\n3\n0\n0\nY\n", Preset::default());
        assert_eq!(out.matches("Green time must be a non-negative integer.").count(), 2);
        let timing = timing.unwrap();
        assert_eq!((timing.green, timing.yellow, timing.red), (3, 0, 0));
    }

    #[test]
    fn zero_total_restarts_prompts() {
        let (timing, out) = run("0\n0\n0\nn\n1\n1\n1\nn\n", Preset::default());
        assert!(out.contains("Total light color times must be greater than zero"));
        let timing = timing.unwrap();
        assert_eq!((timing.green, timing.yellow, timing.red), (1, 1, 1));
    }

    #[test]
    fn zero_total_with_partial_preset_asks_only_open_fields() {
        let preset = Preset {
            green: Some(0),
            yellow: Some(0),
            ..Preset::default()
        };
        let (timing, out) = run("0\nn\n2\nn\n", preset);
        assert_eq!(out.matches("greater than zero").count(), 1);
        assert_eq!(out.matches("red light").count(), 2);
        assert!(!out.contains("green light"));
        let timing = timing.unwrap();
        assert_eq!((timing.green, timing.yellow, timing.red), (0, 0, 2));
        assert_eq!(timing.config().validate().unwrap().total(), 2);
    }

    #[test]
    fn bad_choice_is_asked_again() {
        let (timing, out) = run("1\n1\n1\nmaybe\nn\n", Preset::default());
        assert!(out.contains("'maybe' is not one of"));
        assert!(!timing.unwrap().repeat);
    }

    #[test]
    fn preset_fields_are_not_prompted() {
        let preset = Preset {
            green: Some(4),
            red: Some(2),
            repeat: Some(true),
            ..Preset::default()
        };
        let (timing, out) = run("1\n", preset);
        assert!(!out.contains("green light"));
        assert!(!out.contains("[Y/n]"));
        assert_eq!(
            timing,
            Some(Timing {
                green: 4,
                yellow: 1,
                red: 2,
                repeat: true
            })
        );
    }

    #[test]
    fn summary_lists_each_color() {
        let mut out = Vec::new();
        let timing = Timing {
            green: 1,
            yellow: 2,
            red: 3,
            repeat: false,
        };
        write_summary(&mut out, &timing).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("The configurations for colors are:"));
        assert!(out.contains("green: 1 seconds"));
        assert!(out.contains("yellow: 2 seconds"));
        assert!(out.contains("red: 3 seconds"));
        assert!(out.contains("cycle only once"));
    }
}
