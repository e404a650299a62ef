//! Operator prompts.
//!
//! Message texts for each ambiguous outcome plus [`TerminalPrompt`], the
//! interactive [`DecisionProvider`] used when stdin is a terminal.

use std::fmt::Write as _;
use std::io::{self, BufRead, Write};

use annolayer_map::{Choice, DecisionError, DecisionProvider, Outcome, Prompt, PromptKind};

const MISMATCH_TITLE: &str = "Layer Order Mismatch";
const EXTRA_TITLE: &str = "Layer Mismatch";
const FILLED_TITLE: &str = "Layers Added";

/// Everything a prompt shows about one file.
#[derive(Debug, Clone)]
pub struct PromptContext<'a> {
    pub file: &'a str,
    pub outcome: Outcome,
    /// Slot labels, e.g. `islet/islets`.
    pub targets: Vec<String>,
    /// Layer names as found in the file.
    pub original: Vec<&'a str>,
    /// Matched layer per slot, `None` for missing slots.
    pub processed: Vec<Option<&'a str>>,
    /// Layer names as they would be written.
    pub final_order: Vec<&'a str>,
}

/// Build the prompt for `context`.
pub fn build_prompt(kind: PromptKind, context: &PromptContext<'_>) -> Prompt {
    let title = match context.outcome {
        Outcome::ExtraLayers => EXTRA_TITLE,
        Outcome::AutoFilled => FILLED_TITLE,
        _ => MISMATCH_TITLE,
    };
    Prompt {
        kind,
        title: title.to_string(),
        message: build_message(context),
        file: context.file.to_string(),
    }
}

fn build_message(context: &PromptContext<'_>) -> String {
    let processed: Vec<&str> = context
        .processed
        .iter()
        .map(|name| name.unwrap_or("(missing)"))
        .collect();
    let mut message = format!("File: {}\n\n", context.file);
    match context.outcome {
        Outcome::TooFew => {
            message.push_str("File has fewer layers than expected.\n\n");
            push_list(&mut message, "Target Layers", &context.targets);
            push_list(&mut message, "Layers in File", &context.original);
            push_list(&mut message, "After Processing", &processed);
            message.push_str("Continue with next file?");
        }
        Outcome::ExtraLayers => {
            message.push_str("File has more layers than expected.\n\n");
            push_list(&mut message, "Target Layers", &context.targets);
            push_list(&mut message, "Layers in File", &context.original);
            push_list(
                &mut message,
                "Final Layer Order (after processing)",
                &context.final_order,
            );
            message.push_str("The extra layers will be positioned last.\n\nChoose an action:");
        }
        Outcome::AutoFilled => {
            let _ = write!(
                message,
                "File had {} layers; {} are expected. Missing layers were added empty.\n\n",
                context.original.len(),
                context.targets.len()
            );
            push_list(&mut message, "Layers in File", &context.original);
            push_list(&mut message, "Saved Layer Order", &context.final_order);
            message.push_str("Continue with next file?");
        }
        Outcome::ReorderedMatch | Outcome::ExactMatch => {
            message.push_str(
                "The file has the same number of layers as target, but the order does not match.\n\n",
            );
            push_list(&mut message, "Target Order", &context.targets);
            push_list(&mut message, "File Order", &context.original);
            push_list(&mut message, "After Processing", &processed);
            message.push_str("Continue with next file?");
        }
    }
    message
}

fn push_list<S: AsRef<str>>(message: &mut String, heading: &str, items: &[S]) {
    let _ = writeln!(message, "{heading}:");
    if items.is_empty() {
        message.push_str("  (none)\n");
    }
    for (index, item) in items.iter().enumerate() {
        let _ = writeln!(message, "  {}. {}", index + 1, item.as_ref());
    }
    message.push('\n');
}

/// Line-oriented terminal prompt.
///
/// Prompts go to `output`, answers come from `input`. Unrecognized answers
/// are asked again; end of input counts as stop.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr, read answers from stdin.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_choice(&mut self, kind: PromptKind) -> io::Result<Choice> {
        let choices = kind.choices();
        loop {
            let options: Vec<String> = choices
                .iter()
                .enumerate()
                .map(|(index, choice)| format!("{}) {}", index + 1, choice_label(*choice)))
                .collect();
            write!(self.output, "{} > ", options.join("  "))?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(Choice::Stop);
            }
            if let Some(choice) = parse_answer(kind, &line) {
                return Ok(choice);
            }
            writeln!(
                self.output,
                "Please answer with a number from 1 to {}.",
                choices.len()
            )?;
        }
    }
}

impl<R: BufRead, W: Write> DecisionProvider for TerminalPrompt<R, W> {
    fn ask(&mut self, prompt: &Prompt) -> Result<Choice, DecisionError> {
        writeln!(self.output, "\n=== {} ===\n{}\n", prompt.title, prompt.message)?;
        Ok(self.read_choice(prompt.kind)?)
    }
}

fn choice_label(choice: Choice) -> &'static str {
    match choice {
        Choice::Continue => "Continue",
        Choice::Save => "Save and Continue",
        Choice::Skip => "Continue Without Saving",
        Choice::Stop => "Stop Execution",
    }
}

/// Parse an answer: option number, choice name, or y/n for yes/no prompts.
fn parse_answer(kind: PromptKind, line: &str) -> Option<Choice> {
    let answer = line.trim().to_lowercase();
    let choices = kind.choices();
    if let Ok(number) = answer.parse::<usize>() {
        return number.checked_sub(1).and_then(|i| choices.get(i)).copied();
    }
    if kind == PromptKind::YesNo {
        match answer.as_str() {
            "y" | "yes" => return Some(Choice::Continue),
            "n" | "no" => return Some(Choice::Stop),
            _ => {}
        }
    }
    choices.iter().copied().find(|c| c.as_str() == answer)
}
