//! Completion through the dispatcher: cursor placement, redirects, offsets.

mod common;

use cmdtree_core::arguments::{integer, word};
use cmdtree_core::{CommandDispatcher, StringRange, StringReader, argument, literal};
use common::{assert_suggestions, suggest, suggest_at};
use futures::executor::block_on;

fn foo_bar_baz() -> CommandDispatcher<()> {
    let mut dispatcher = CommandDispatcher::new();
    dispatcher.register(literal("foo")).unwrap();
    dispatcher.register(literal("bar")).unwrap();
    dispatcher.register(literal("baz")).unwrap();
    dispatcher
}

fn parent_with_foo_bar_baz() -> CommandDispatcher<()> {
    let mut dispatcher = CommandDispatcher::new();
    dispatcher
        .register(
            literal("parent")
                .then(literal("foo"))
                .then(literal("bar"))
                .then(literal("baz")),
        )
        .unwrap();
    dispatcher
}

fn suggest_reader(
    dispatcher: &CommandDispatcher<()>,
    reader: StringReader,
) -> cmdtree_core::Suggestions {
    let parse = dispatcher.parse_reader(reader, ());
    block_on(dispatcher.completion_suggestions(&parse))
}

// ─── Root commands ───────────────────────────────────────────────────────────

#[test]
fn root_commands() {
    let dispatcher = foo_bar_baz();
    assert_suggestions(
        &suggest(&dispatcher, ""),
        StringRange::at(0),
        &["bar", "baz", "foo"],
    );
}

#[test]
fn root_commands_with_input_offset() {
    let dispatcher = foo_bar_baz();
    let result = suggest_reader(&dispatcher, StringReader::with_cursor("OOO", 3));
    assert_suggestions(&result, StringRange::at(3), &["bar", "baz", "foo"]);
}

#[test]
fn root_commands_partial() {
    let dispatcher = foo_bar_baz();
    assert_suggestions(
        &suggest(&dispatcher, "b"),
        StringRange::between(0, 1),
        &["bar", "baz"],
    );
}

#[test]
fn root_commands_partial_with_input_offset() {
    let dispatcher = foo_bar_baz();
    let result = suggest_reader(&dispatcher, StringReader::with_cursor("Zb", 1));
    assert_suggestions(&result, StringRange::between(1, 2), &["bar", "baz"]);
}

#[test]
fn literal_matching_is_case_insensitive() {
    let dispatcher = foo_bar_baz();
    assert_suggestions(
        &suggest(&dispatcher, "BA"),
        StringRange::between(0, 2),
        &["bar", "baz"],
    );
}

#[test]
fn hidden_commands_are_not_suggested() {
    let mut dispatcher = foo_bar_baz();
    dispatcher
        .register(literal("bat").requires(|_| false))
        .unwrap();
    assert_suggestions(
        &suggest(&dispatcher, "ba"),
        StringRange::between(0, 2),
        &["bar", "baz"],
    );
}

// ─── Sub commands ────────────────────────────────────────────────────────────

#[test]
fn sub_commands() {
    let dispatcher = parent_with_foo_bar_baz();
    assert_suggestions(
        &suggest(&dispatcher, "parent "),
        StringRange::at(7),
        &["bar", "baz", "foo"],
    );
}

#[test]
fn sub_commands_partial() {
    let dispatcher = parent_with_foo_bar_baz();
    assert_suggestions(
        &suggest(&dispatcher, "parent b"),
        StringRange::between(7, 8),
        &["bar", "baz"],
    );
}

#[test]
fn sub_commands_partial_with_input_offset() {
    let dispatcher = parent_with_foo_bar_baz();
    let result = suggest_reader(&dispatcher, StringReader::with_cursor("junk parent b", 5));
    assert_suggestions(&result, StringRange::between(12, 13), &["bar", "baz"]);
}

#[test]
fn moving_cursor_through_sub_commands() {
    let mut dispatcher = CommandDispatcher::<()>::new();
    dispatcher
        .register(
            literal("parent_one")
                .then(literal("faz"))
                .then(literal("fbz"))
                .then(literal("gaz")),
        )
        .unwrap();
    dispatcher.register(literal("parent_two")).unwrap();

    let input = "parent_one faz ";
    let cases: [(usize, StringRange, &[&str]); 10] = [
        (0, StringRange::at(0), &["parent_one", "parent_two"]),
        (1, StringRange::between(0, 1), &["parent_one", "parent_two"]),
        (7, StringRange::between(0, 7), &["parent_one", "parent_two"]),
        (8, StringRange::between(0, 8), &["parent_one"]),
        (10, StringRange::at(0), &[]),
        (11, StringRange::at(11), &["faz", "fbz", "gaz"]),
        (12, StringRange::between(11, 12), &["faz", "fbz"]),
        (13, StringRange::between(11, 13), &["faz"]),
        (14, StringRange::at(0), &[]),
        (15, StringRange::at(0), &[]),
    ];
    for (cursor, range, expected) in cases {
        assert_suggestions(&suggest_at(&dispatcher, input, cursor), range, expected);
    }
}

// ─── Redirects ───────────────────────────────────────────────────────────────

fn actual_with_redirect() -> CommandDispatcher<()> {
    let mut dispatcher = CommandDispatcher::new();
    let actual = dispatcher
        .register(literal("actual").then(literal("sub")))
        .unwrap();
    dispatcher
        .register(literal("redirect").redirect(actual))
        .unwrap();
    dispatcher
}

#[test]
fn redirect() {
    let dispatcher = actual_with_redirect();
    assert_suggestions(
        &suggest(&dispatcher, "redirect "),
        StringRange::at(9),
        &["sub"],
    );
}

#[test]
fn redirect_partial() {
    let dispatcher = actual_with_redirect();
    assert_suggestions(
        &suggest(&dispatcher, "redirect s"),
        StringRange::between(9, 10),
        &["sub"],
    );
}

#[test]
fn redirect_partial_with_input_offset() {
    let dispatcher = actual_with_redirect();
    let result = suggest_reader(&dispatcher, StringReader::with_cursor("/redirect s", 1));
    assert_suggestions(&result, StringRange::between(10, 11), &["sub"]);
}

#[test]
fn moving_cursor_through_redirect() {
    let mut dispatcher = CommandDispatcher::<()>::new();
    let actual_one = dispatcher
        .register(
            literal("actual_one")
                .then(literal("faz"))
                .then(literal("fbz"))
                .then(literal("gaz")),
        )
        .unwrap();
    dispatcher.register(literal("actual_two")).unwrap();
    dispatcher
        .register(literal("redirect_one").redirect(actual_one))
        .unwrap();
    dispatcher
        .register(literal("redirect_two").redirect(actual_one))
        .unwrap();

    let input = "redirect_one faz ";
    let cases: [(usize, StringRange, &[&str]); 9] = [
        (
            0,
            StringRange::at(0),
            &["actual_one", "actual_two", "redirect_one", "redirect_two"],
        ),
        (9, StringRange::between(0, 9), &["redirect_one", "redirect_two"]),
        (10, StringRange::between(0, 10), &["redirect_one"]),
        (12, StringRange::at(0), &[]),
        (13, StringRange::at(13), &["faz", "fbz", "gaz"]),
        (14, StringRange::between(13, 14), &["faz", "fbz"]),
        (15, StringRange::between(13, 15), &["faz"]),
        (16, StringRange::at(0), &[]),
        (17, StringRange::at(0), &[]),
    ];
    for (cursor, range, expected) in cases {
        assert_suggestions(&suggest_at(&dispatcher, input, cursor), range, expected);
    }
}

#[test]
fn redirect_lots() {
    let mut dispatcher = CommandDispatcher::<()>::new();
    let lp = dispatcher.register(literal("redirect")).unwrap();
    dispatcher
        .register(
            literal("redirect")
                .then(literal("loop").then(argument("loop", integer()).redirect(lp))),
        )
        .unwrap();

    assert_suggestions(
        &suggest(&dispatcher, "redirect loop 1 loop 02 loop 003 "),
        StringRange::at(33),
        &["loop"],
    );
}

#[test]
fn execute_simulation() {
    let mut dispatcher = CommandDispatcher::<()>::new();
    let execute = dispatcher.register(literal("execute")).unwrap();
    dispatcher
        .register(
            literal("execute")
                .then(literal("as").then(argument("name", word()).redirect(execute)))
                .then(literal("store").then(argument("name", word()).redirect(execute)))
                .then(literal("run").executes(|_| Ok(0))),
        )
        .unwrap();

    assert!(suggest(&dispatcher, "execute as Dinnerbone as").is_empty());
}

#[test]
fn execute_simulation_partial() {
    let mut dispatcher = CommandDispatcher::<()>::new();
    let execute = dispatcher.register(literal("execute")).unwrap();
    dispatcher
        .register(
            literal("execute")
                .then(
                    literal("as")
                        .then(literal("bar").redirect(execute))
                        .then(literal("baz").redirect(execute)),
                )
                .then(literal("store").then(argument("name", word()).redirect(execute)))
                .then(literal("run").executes(|_| Ok(0))),
        )
        .unwrap();

    assert_suggestions(
        &suggest(&dispatcher, "execute as bar as "),
        StringRange::at(18),
        &["bar", "baz"],
    );
}

// ─── Arguments ───────────────────────────────────────────────────────────────

#[test]
fn argument_types_contribute_suggestions() {
    let mut dispatcher = CommandDispatcher::<()>::new();
    dispatcher
        .register(
            literal("toggle")
                .then(argument("state", cmdtree_core::arguments::boolean()).executes(|_| Ok(1))),
        )
        .unwrap();

    assert_suggestions(
        &suggest(&dispatcher, "toggle "),
        StringRange::at(7),
        &["false", "true"],
    );
    assert_suggestions(
        &suggest(&dispatcher, "toggle T"),
        StringRange::between(7, 8),
        &["true"],
    );
}

#[test]
fn literal_and_argument_siblings_are_merged() {
    let mut dispatcher = CommandDispatcher::<()>::new();
    dispatcher
        .register(
            literal("set")
                .then(literal("tick"))
                .then(argument("on", cmdtree_core::arguments::boolean())),
        )
        .unwrap();

    assert_suggestions(
        &suggest(&dispatcher, "set t"),
        StringRange::between(4, 5),
        &["tick", "true"],
    );
}
