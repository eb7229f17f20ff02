use std::io::{BufRead, Write};

use itertools::Itertools;

use crate::charset::CharsetCatalog;

pub(crate) const SOURCE_PLACEHOLDER: &str = "Select source charset; must match current view";
pub(crate) const TARGET_PLACEHOLDER: &str = "Select target charset; length must match source set";

/// Ask the user to pick one of several labelled items.
pub trait Chooser {
    /// Returns the index of the chosen item, or `None` if the user dismissed
    /// the choice.
    fn choose(&mut self, placeholder: &str, items: &[String]) -> anyhow::Result<Option<usize>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickerState {
    AwaitingSource,
    AwaitingTarget { source: usize },
    Apply { source: usize, target: usize },
}

/// Two-step selection of a source charset and a target charset.
///
/// Only charsets with the same arity as the chosen source are offered as
/// targets. Dismissing either step resets the picker.
pub struct SwapPicker<'a> {
    catalog: &'a CharsetCatalog,
    state: PickerState,
}

impl<'a> SwapPicker<'a> {
    pub fn new(catalog: &'a CharsetCatalog) -> Self {
        Self {
            catalog,
            state: PickerState::AwaitingSource,
        }
    }

    pub fn state(&self) -> PickerState {
        self.state
    }

    /// Catalog indices offered in the current state.
    fn candidates(&self) -> Vec<usize> {
        match self.state {
            PickerState::AwaitingSource => (0..self.catalog.len()).collect(),
            PickerState::AwaitingTarget { source } => self
                .catalog
                .get(source)
                .map(|charset| self.catalog.indices_with_arity(charset.len()))
                .unwrap_or_default(),
            PickerState::Apply { .. } => Vec::new(),
        }
    }

    /// The placeholder and the labels to show for the current state.
    pub fn prompt(&self) -> (&'static str, Vec<String>) {
        let placeholder = match self.state {
            PickerState::AwaitingTarget { .. } => TARGET_PLACEHOLDER,
            _ => SOURCE_PLACEHOLDER,
        };
        let labels = self
            .candidates()
            .into_iter()
            .filter_map(|index| self.catalog.get(index).ok())
            .map(|charset| charset.label())
            .collect_vec();
        (placeholder, labels)
    }

    /// Feed the answer to the current prompt. `choice` indexes the labels
    /// returned by [`SwapPicker::prompt`].
    pub fn select(&mut self, choice: Option<usize>) -> anyhow::Result<PickerState> {
        let Some(choice) = choice else {
            log::info!("SwapPicker: cancelled in state {:?}", self.state);
            self.state = PickerState::AwaitingSource;
            return Ok(self.state);
        };
        let candidates = self.candidates();
        let index = *candidates.get(choice).ok_or_else(|| {
            anyhow::anyhow!(
                "Choice {choice} is out of range, only {} items were offered",
                candidates.len()
            )
        })?;
        self.state = match self.state {
            PickerState::AwaitingSource => PickerState::AwaitingTarget { source: index },
            PickerState::AwaitingTarget { source } => PickerState::Apply {
                source,
                target: index,
            },
            PickerState::Apply { .. } => {
                return Err(anyhow::anyhow!("SwapPicker: selection is already complete"))
            }
        };
        Ok(self.state)
    }

    /// Drive both steps with `chooser`. Returns the catalog indices of the
    /// source and target charsets, or `None` if either step was dismissed.
    pub fn run(mut self, chooser: &mut dyn Chooser) -> anyhow::Result<Option<(usize, usize)>> {
        loop {
            if let PickerState::Apply { source, target } = self.state {
                return Ok(Some((source, target)));
            }
            let (placeholder, items) = self.prompt();
            let choice = chooser.choose(placeholder, &items)?;
            if self.select(choice)? == PickerState::AwaitingSource {
                return Ok(None);
            }
        }
    }
}

/// A [`Chooser`] that lists numbered items on `output` and reads the chosen
/// number from `input`. A blank line or end of input dismisses the choice.
pub struct LineChooser<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineChooser<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Chooser for LineChooser<R, W> {
    fn choose(&mut self, placeholder: &str, items: &[String]) -> anyhow::Result<Option<usize>> {
        loop {
            writeln!(self.output, "{placeholder}")?;
            for (index, item) in items.iter().enumerate() {
                writeln!(self.output, "{index:>3}  {item}")?;
            }
            write!(self.output, "> ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let line = line.trim();
            if line.is_empty() {
                return Ok(None);
            }
            match line.parse::<usize>() {
                Ok(index) if index < items.len() => return Ok(Some(index)),
                _ => writeln!(self.output, "Invalid choice {line:?}")?,
            }
        }
    }
}
