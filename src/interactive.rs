//! Prompt-driven front end.
//!
//! Reads answers line by line from any [`BufRead`] and writes prompts to any [`Write`], so the
//! loop runs the same against a terminal or an in-memory script.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context as _;

use crate::foundation::core::Quality;
use crate::foundation::error::PanoResult;
use crate::input::{ALLOWED_EXTENSIONS, validate_input};
use crate::plan::view::ViewParams;

/// Interactive session state.
pub struct Interactive<R, W> {
    input: R,
    out: W,
    defaults: ViewParams,
}

impl<R: BufRead, W: Write> Interactive<R, W> {
    /// Session reading from `input`, prompting on `out`.
    pub fn new(input: R, out: W, defaults: ViewParams) -> Self {
        Self {
            input,
            out,
            defaults,
        }
    }

    /// Recover the reader and writer.
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.out)
    }

    /// Loop until the user quits or input ends.
    ///
    /// `process` receives a validated, resolved source path and the chosen parameters and
    /// returns whether the whole batch succeeded. Its errors are shown and the loop goes on.
    pub fn run<F>(&mut self, mut process: F) -> PanoResult<()>
    where
        F: FnMut(&Path, &ViewParams) -> PanoResult<bool>,
    {
        self.say("panosplit - interactive mode")?;
        self.say(&"=".repeat(50))?;

        loop {
            self.say("\nEnter the panorama path:")?;
            self.say(&format!(
                "   supported formats: {}",
                ALLOWED_EXTENSIONS
                    .iter()
                    .map(|e| format!(".{e}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ))?;
            self.say("   enter 'q' to quit")?;

            let Some(line) = self.ask("> path: ")? else {
                break;
            };
            let raw = line.trim().trim_matches(|c| c == '"' || c == '\'');
            if raw.eq_ignore_ascii_case("q") {
                break;
            }
            if raw.is_empty() {
                self.say("please enter a valid path")?;
                continue;
            }

            let source = match validate_input(&PathBuf::from(raw)) {
                Ok(p) => p,
                Err(e) => {
                    self.say(&e.to_string())?;
                    continue;
                }
            };

            let params = self.choose_params()?;
            let ok = match process(&source, &params) {
                Ok(ok) => ok,
                Err(e) => {
                    self.say(&format!("error: {e}"))?;
                    false
                }
            };
            self.say(if ok {
                "processing succeeded"
            } else {
                "processing failed"
            })?;

            match self.ask("\nProcess another image? (Y/n): ")? {
                Some(answer) if is_no(&answer) => break,
                Some(_) => {}
                None => break,
            }
        }

        self.say("bye")?;
        Ok(())
    }

    fn choose_params(&mut self) -> PanoResult<ViewParams> {
        let d = self.defaults;
        self.say(&format!(
            "\ndefaults: {}x{}, quality={}, FOV={}°x{}°",
            d.width, d.height, d.quality, d.h_fov, d.v_fov
        ))?;
        let answer = self.ask("Use defaults? (Y/n): ")?.unwrap_or_default();
        if is_yes_or_empty(&answer) {
            return Ok(d);
        }

        match self.ask_custom_params()? {
            Some(params) => Ok(params),
            None => {
                self.say("invalid parameter, using defaults")?;
                Ok(d)
            }
        }
    }

    fn ask_custom_params(&mut self) -> PanoResult<Option<ViewParams>> {
        let d = self.defaults;
        let Some(width) = self.ask_number("width", d.width)? else {
            return Ok(None);
        };
        let Some(height) = self.ask_number("height", d.height)? else {
            return Ok(None);
        };
        let Some(quality) = self.ask_number("quality 1-10", d.quality.get())? else {
            return Ok(None);
        };
        let Some(h_fov) = self.ask_number("horizontal FOV", d.h_fov)? else {
            return Ok(None);
        };
        let Some(v_fov) = self.ask_number("vertical FOV", d.v_fov)? else {
            return Ok(None);
        };
        let Ok(quality) = Quality::new(quality) else {
            return Ok(None);
        };
        Ok(Some(ViewParams {
            h_fov,
            v_fov,
            width,
            height,
            quality,
        }))
    }

    /// `Ok(None)` when the answer does not parse; an empty answer keeps the default.
    fn ask_number<T: FromStr + std::fmt::Display>(
        &mut self,
        label: &str,
        default: T,
    ) -> PanoResult<Option<T>> {
        let answer = self
            .ask(&format!("{label} (default {default}): "))?
            .unwrap_or_default();
        let answer = answer.trim();
        if answer.is_empty() {
            return Ok(Some(default));
        }
        Ok(answer.parse().ok())
    }

    /// Prompt and read one line; `None` at end of input.
    fn ask(&mut self, prompt: &str) -> PanoResult<Option<String>> {
        write!(self.out, "{prompt}").context("write prompt")?;
        self.out.flush().context("flush prompt")?;
        let mut line = String::new();
        let n = self.input.read_line(&mut line).context("read answer")?;
        if n == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn say(&mut self, msg: &str) -> PanoResult<()> {
        writeln!(self.out, "{msg}").context("write message")?;
        Ok(())
    }
}

fn is_yes_or_empty(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "" | "y" | "yes")
}

fn is_no(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "n" | "no")
}

#[cfg(test)]
#[path = "../tests/unit/interactive/interactive.rs"]
mod tests;
