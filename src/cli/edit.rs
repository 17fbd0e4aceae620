use inputmask::error::Result;
use inputmask::terminal::Terminal;
use inputmask::widgets::validators::required;
use inputmask::{KeyResult, MaskConfig, MaskedInput};
use serde::Serialize;
use std::io;
use std::process::ExitCode;

#[derive(Debug, Serialize)]
struct Submitted<'a> {
    value: String,
    formatted: &'a str,
    raw: &'a str,
}

pub fn run(config: &MaskConfig, default: Option<&str>, require: bool) -> Result<ExitCode> {
    let mut input = config.build_input("value")?;
    if let Some(default) = default {
        input.set_value(default);
    }
    if require {
        input = input.with_validator(required("A value is required"));
    }

    let prompt = format!("{} › ", input.source());
    let mut terminal = Terminal::new();
    terminal.enter_raw_mode()?;
    let submitted = edit_loop(&mut terminal, &mut input, &prompt);
    terminal.exit_raw_mode()?;

    if !submitted? {
        return Ok(ExitCode::FAILURE);
    }
    let output = Submitted {
        value: input.value(),
        formatted: input.display(),
        raw: input.raw(),
    };
    println!("{}", serde_json::to_string(&output)?);
    Ok(ExitCode::SUCCESS)
}

fn edit_loop(terminal: &mut Terminal, input: &mut MaskedInput, prompt: &str) -> io::Result<bool> {
    let mut error: Option<String> = None;

    loop {
        let mut tail = input.placeholder_tail();
        if let Some(message) = &error {
            tail.push_str("  ");
            tail.push_str(message);
        }
        terminal.render_line(prompt, input.display(), &tail, input.cursor_col())?;

        let key = terminal.read_key()?;
        if key.is_cancel() {
            terminal.finish_line()?;
            return Ok(false);
        }

        match input.on_key(key) {
            KeyResult::Submit => match input.validate() {
                Ok(()) => {
                    terminal.finish_line()?;
                    return Ok(true);
                }
                Err(message) => {
                    tracing::info!(%message, "submit rejected");
                    error = Some(message);
                }
            },
            KeyResult::Handled => error = None,
            KeyResult::NotHandled => {}
        }
    }
}
