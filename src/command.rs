use indexmap::IndexMap;
use itertools::Itertools;

use crate::{
    buffer::Buffer,
    engine::Engine,
    picker::{Chooser, SwapPicker},
    swap::PairwiseSwap,
    transformation::Transformation,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CommandArgs {
    pub from: Option<usize>,
    pub to: Option<usize>,
}

pub struct CommandContext<'a> {
    pub engine: &'a Engine,
    pub buffer: &'a mut Buffer,
    pub chooser: &'a mut dyn Chooser,
    pub args: CommandArgs,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Applied {
        transformation: Transformation,
        regions: usize,
        changed: usize,
    },
    Cancelled,
}

pub type CommandHandler = fn(&mut CommandContext) -> anyhow::Result<CommandOutcome>;

/// Command names and their handlers, built once at startup.
pub struct CommandRegistry {
    commands: IndexMap<&'static str, CommandHandler>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        let mut registry = Self {
            commands: IndexMap::new(),
        };
        registry.register("swap_delims", swap_delims);
        registry.register("swap_comment_delims", swap_comment_delims);
        registry.register("swap_chars", swap_chars);
        registry.register("swap_chars_from_to", swap_chars_from_to);
        registry
    }
}

impl CommandRegistry {
    pub fn register(&mut self, name: &'static str, handler: CommandHandler) {
        if self.commands.insert(name, handler).is_some() {
            log::warn!("CommandRegistry: replaced handler of {name:?}");
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.commands.keys().copied()
    }

    pub fn get(&self, name: &str) -> anyhow::Result<CommandHandler> {
        self.commands.get(name).copied().ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown command {name:?}, expected one of: {}",
                self.names().join(", ")
            )
        })
    }

    pub fn run(&self, name: &str, context: &mut CommandContext) -> anyhow::Result<CommandOutcome> {
        let handler = self.get(name)?;
        log::info!("CommandRegistry::run {name} {:?}", context.args);
        let outcome = handler(context)?;
        log::info!("CommandRegistry::run {name} => {outcome:?}");
        Ok(outcome)
    }
}

fn apply(
    context: &mut CommandContext,
    transformation: Transformation,
) -> anyhow::Result<CommandOutcome> {
    // Resolve the mapping before touching the buffer, so that a bad charset
    // pair leaves the document as it was.
    let mapping = transformation.mapping(context.engine)?;
    let regions = context.buffer.regions().len();
    let changed = context.buffer.swap_regions(&mapping)?;
    Ok(CommandOutcome::Applied {
        transformation,
        regions,
        changed,
    })
}

fn swap_delims(context: &mut CommandContext) -> anyhow::Result<CommandOutcome> {
    apply(context, Transformation::Pairwise(PairwiseSwap::Delimiters))
}

fn swap_comment_delims(context: &mut CommandContext) -> anyhow::Result<CommandOutcome> {
    apply(
        context,
        Transformation::Pairwise(PairwiseSwap::CommentDelimiters),
    )
}

fn swap_chars(context: &mut CommandContext) -> anyhow::Result<CommandOutcome> {
    let picked = SwapPicker::new(context.engine.catalog()).run(&mut *context.chooser)?;
    match picked {
        Some((from, to)) => apply(context, Transformation::Charsets { from, to }),
        None => Ok(CommandOutcome::Cancelled),
    }
}

fn swap_chars_from_to(context: &mut CommandContext) -> anyhow::Result<CommandOutcome> {
    let CommandArgs {
        from: Some(from),
        to: Some(to),
    } = context.args
    else {
        return Err(anyhow::anyhow!(
            "swap_chars_from_to needs both a source (--from) and a target (--to) charset index"
        ));
    };
    apply(context, Transformation::Charsets { from, to })
}

#[cfg(test)]
mod test_command {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{charset::CharsetCatalog, picker::test_picker::ScriptedChooser};

    fn run(
        name: &str,
        buffer: &mut Buffer,
        chooser: &mut ScriptedChooser,
        args: CommandArgs,
    ) -> anyhow::Result<CommandOutcome> {
        let engine = Engine::new(CharsetCatalog::default())?;
        CommandRegistry::default().run(
            name,
            &mut CommandContext {
                engine: &engine,
                buffer,
                chooser,
                args,
            },
        )
    }

    #[test]
    fn registered_names() {
        assert_eq!(
            CommandRegistry::default().names().collect_vec(),
            vec![
                "swap_delims",
                "swap_comment_delims",
                "swap_chars",
                "swap_chars_from_to"
            ]
        );
    }

    #[test]
    fn swap_delims() {
        let mut buffer = Buffer::new("a(b)c{d}e");
        let outcome = run(
            "swap_delims",
            &mut buffer,
            &mut ScriptedChooser::default(),
            CommandArgs::default(),
        )
        .unwrap();
        assert_eq!(buffer.content(), "a{b}c(d)e");
        assert_eq!(
            outcome,
            CommandOutcome::Applied {
                transformation: Transformation::Pairwise(PairwiseSwap::Delimiters),
                regions: 1,
                changed: 1,
            }
        );
    }

    #[test]
    fn swap_comment_delims_on_selections() {
        let mut buffer = Buffer::new("{{a}} {{b}}");
        buffer.set_selections(vec![(0..5).into()]).unwrap();
        run(
            "swap_comment_delims",
            &mut buffer,
            &mut ScriptedChooser::default(),
            CommandArgs::default(),
        )
        .unwrap();
        assert_eq!(buffer.content(), "[a] {{b}}");
    }

    #[test]
    fn swap_chars_interactively() {
        let mut buffer = Buffer::new("x(y);z(w)|");
        // `( ) ;` is catalog entry 3; `( ) |` is the second 3-token target.
        let mut chooser = ScriptedChooser::new([Some(3), Some(1)]);
        let outcome = run(
            "swap_chars",
            &mut buffer,
            &mut chooser,
            CommandArgs::default(),
        )
        .unwrap();
        assert_eq!(buffer.content(), "x(y)|z(w)|");
        assert!(matches!(
            outcome,
            CommandOutcome::Applied {
                transformation: Transformation::Charsets { from: 3, to: 4 },
                ..
            }
        ));
    }

    #[test]
    fn swap_chars_cancelled_leaves_buffer_untouched() {
        let mut buffer = Buffer::new("f(x)");
        let mut chooser = ScriptedChooser::new([Some(0), None]);
        let outcome = run(
            "swap_chars",
            &mut buffer,
            &mut chooser,
            CommandArgs::default(),
        )
        .unwrap();
        assert_eq!(outcome, CommandOutcome::Cancelled);
        assert_eq!(buffer.content(), "f(x)");
        assert!(!buffer.undo().unwrap());
    }

    #[test]
    fn swap_chars_from_to() {
        let mut buffer = Buffer::new("foo(bar[baz]qux)");
        run(
            "swap_chars_from_to",
            &mut buffer,
            &mut ScriptedChooser::default(),
            CommandArgs {
                from: Some(0),
                to: Some(2),
            },
        )
        .unwrap();
        assert_eq!(buffer.content(), "foo{bar[baz]qux}");
    }

    #[test]
    fn swap_chars_from_to_arity_mismatch_edits_nothing() {
        let mut buffer = Buffer::new("f(x)");
        let result = run(
            "swap_chars_from_to",
            &mut buffer,
            &mut ScriptedChooser::default(),
            CommandArgs {
                from: Some(0),
                to: Some(3),
            },
        );
        assert!(result.is_err());
        assert_eq!(buffer.content(), "f(x)");
    }

    #[test]
    fn swap_chars_from_to_needs_both_indices() {
        let mut buffer = Buffer::new("f(x)");
        let result = run(
            "swap_chars_from_to",
            &mut buffer,
            &mut ScriptedChooser::default(),
            CommandArgs {
                from: Some(0),
                to: None,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn unknown_command() {
        let error = run(
            "swap_everything",
            &mut Buffer::new(""),
            &mut ScriptedChooser::default(),
            CommandArgs::default(),
        )
        .unwrap_err();
        assert!(error.to_string().contains("swap_delims"));
    }
}
