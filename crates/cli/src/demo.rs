//! The demo command set the CLI runs against.
//!
//! A small game-console style tree: chat, arithmetic, teleports, a
//! permission-gated `stop`, and an `execute` family that re-runs the rest of
//! the line as another player (`execute as <player>`) or as everyone on the
//! roster (`execute everyone`).

use std::fmt;
use std::sync::{Arc, Mutex};

use cmdtree_core::arguments::{
    ArgumentType, boolean, double, get_bool, get_double, get_integer, get_string, greedy_string,
    integer, string,
};
use cmdtree_core::{
    CommandContext, CommandDispatcher, CommandSyntaxError, DispatcherConfig, StringReader,
    Suggestions, SuggestionsBuilder, TreeError, argument, literal,
};
use futures::future::BoxFuture;

/// Everyone `execute everyone` runs as.
pub(crate) const ROSTER: [&str; 3] = ["alice", "bob", "carol"];

/// Who runs a command, and where its output goes.
///
/// Clones share one transcript, so output from forked branches ends up in
/// the same place.
#[derive(Debug, Clone)]
pub(crate) struct Session {
    name: String,
    admin: bool,
    transcript: Arc<Mutex<Vec<String>>>,
}

impl Session {
    pub(crate) fn new(name: impl Into<String>, admin: bool) -> Self {
        Self {
            name: name.into(),
            admin,
            transcript: Arc::default(),
        }
    }

    fn as_player(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            admin: self.admin,
            transcript: Arc::clone(&self.transcript),
        }
    }

    fn emit(&self, line: impl Into<String>) -> Result<(), CommandSyntaxError> {
        let mut lines = self
            .transcript
            .lock()
            .map_err(|_| CommandSyntaxError::custom("transcript is unavailable"))?;
        lines.push(line.into());
        Ok(())
    }

    /// Everything emitted so far.
    pub(crate) fn transcript(&self) -> Vec<String> {
        self.transcript
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }
}

// ── Player names ────────────────────────────────────────────────────────

/// A single-word player name, completed from the [`ROSTER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PlayerArgument;

impl fmt::Display for PlayerArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("player()")
    }
}

impl ArgumentType for PlayerArgument {
    type Value = String;

    fn parse(&self, reader: &mut StringReader) -> Result<String, CommandSyntaxError> {
        let name = reader.read_unquoted_string();
        if name.is_empty() {
            return Err(CommandSyntaxError::custom("Expected a player name")
                .with_position(reader.string(), reader.cursor()));
        }
        Ok(name)
    }

    fn list_suggestions<'a, S: Sync + 'a>(
        &'a self,
        _context: &'a CommandContext<S>,
        mut builder: SuggestionsBuilder,
    ) -> BoxFuture<'a, Suggestions> {
        for name in ROSTER {
            if name.starts_with(builder.remaining_lowercase()) {
                builder.suggest(name);
            }
        }
        builder.build_future()
    }

    fn examples(&self) -> Vec<String> {
        ROSTER.iter().map(|name| (*name).to_string()).collect()
    }
}

// ── Tree ────────────────────────────────────────────────────────────────

/// Build the demo dispatcher.
pub(crate) fn dispatcher(
    config: DispatcherConfig,
) -> Result<CommandDispatcher<Session>, TreeError> {
    let mut d = CommandDispatcher::<Session>::with_config(config);

    d.register(literal("say").then(argument("message", greedy_string()).executes(
        |ctx: &CommandContext<Session>| {
            let message = get_string(ctx, "message")?;
            ctx.source().emit(format!("<{}> {message}", ctx.source().name))?;
            Ok(1)
        },
    )))?;

    d.register(literal("echo").then(argument("text", string()).executes(
        |ctx: &CommandContext<Session>| {
            ctx.source().emit(get_string(ctx, "text")?)?;
            Ok(1)
        },
    )))?;

    d.register(literal("add").then(argument("a", integer()).then(
        argument("b", integer()).executes(|ctx: &CommandContext<Session>| {
            let sum = get_integer(ctx, "a")?.wrapping_add(get_integer(ctx, "b")?);
            ctx.source().emit(sum.to_string())?;
            Ok(sum)
        }),
    )))?;

    d.register(literal("tp").then(argument("x", double()).then(
        argument("y", double())
            .executes(teleport)
            .then(argument("z", double()).executes(teleport)),
    )))?;

    d.register(literal("toggle").then(argument("state", boolean()).executes(
        |ctx: &CommandContext<Session>| {
            let state = get_bool(ctx, "state")?;
            ctx.source().emit(if state { "enabled" } else { "disabled" })?;
            Ok(i32::from(state))
        },
    )))?;

    d.register(literal("whoami").executes(|ctx: &CommandContext<Session>| {
        ctx.source().emit(ctx.source().name.clone())?;
        Ok(1)
    }))?;

    d.register(
        literal("stop")
            .requires(|session: &Session| session.admin)
            .executes(|ctx: &CommandContext<Session>| {
                ctx.source().emit("stopping")?;
                Ok(0)
            }),
    )?;

    let root = d.root();
    let execute = d.register(literal("execute"))?;
    d.register(
        literal("execute")
            .then(literal("as").then(argument("player", PlayerArgument).redirect_with(
                execute,
                |ctx: &CommandContext<Session>| {
                    Ok(ctx.source().as_player(get_string(ctx, "player")?))
                },
            )))
            .then(literal("everyone").fork(execute, |ctx: &CommandContext<Session>| {
                Ok(ROSTER
                    .iter()
                    .map(|name| ctx.source().as_player(*name))
                    .collect())
            }))
            .then(literal("run").redirect(root)),
    )?;

    Ok(d)
}

fn teleport(ctx: &CommandContext<Session>) -> Result<i32, CommandSyntaxError> {
    let x = get_double(ctx, "x")?;
    let y = get_double(ctx, "y")?;
    let z = match ctx.parsed_argument("z") {
        Some(_) => get_double(ctx, "z")?,
        None => 0.0,
    };
    ctx.source()
        .emit(format!("{} moved to ({x}, {y}, {z})", ctx.source().name))?;
    Ok(1)
}

#[cfg(test)]
mod tests {
    use cmdtree_core::codes;
    use futures::executor::block_on;

    use super::*;

    fn run(input: &str, session: &Session) -> Result<i32, CommandSyntaxError> {
        let d = dispatcher(DispatcherConfig::default()).unwrap();
        d.execute_input(input, session.clone())
    }

    #[test]
    fn say_emits_to_transcript() {
        let session = Session::new("alice", false);
        assert_eq!(run("say hello there", &session), Ok(1));
        assert_eq!(session.transcript(), ["<alice> hello there"]);
    }

    #[test]
    fn teleport_defaults_z() {
        let session = Session::new("bob", false);
        assert_eq!(run("tp 1 2.5", &session), Ok(1));
        assert_eq!(run("tp 1 2 3", &session), Ok(1));
        assert_eq!(
            session.transcript(),
            ["bob moved to (1, 2.5, 0)", "bob moved to (1, 2, 3)"]
        );
    }

    #[test]
    fn stop_needs_admin() {
        let err = run("stop", &Session::new("alice", false)).unwrap_err();
        assert!(err.is(codes::DISPATCHER_UNKNOWN_COMMAND));
        assert_eq!(run("stop", &Session::new("root", true)), Ok(0));
    }

    #[test]
    fn execute_as_changes_the_speaker() {
        let session = Session::new("alice", false);
        assert_eq!(run("execute as bob run whoami", &session), Ok(1));
        assert_eq!(session.transcript(), ["bob"]);
    }

    #[test]
    fn execute_everyone_forks_over_roster() {
        let session = Session::new("alice", false);
        assert_eq!(run("execute everyone run say hi", &session), Ok(3));
        assert_eq!(
            session.transcript(),
            ["<alice> hi", "<bob> hi", "<carol> hi"]
        );
    }

    #[test]
    fn player_names_are_completed() {
        let d = dispatcher(DispatcherConfig::default()).unwrap();
        let parse = d.parse("execute as b", Session::new("alice", false));
        let suggestions = block_on(d.completion_suggestions(&parse));
        let texts: Vec<&str> = suggestions.list().iter().map(|s| s.text()).collect();
        assert_eq!(texts, ["bob"]);
    }
}
