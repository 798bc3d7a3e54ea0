//! Usage strings for a tree exercising every grouping rule.

use cmdtree_core::{CommandDispatcher, NodeId, StringReader, literal};

fn ok() -> cmdtree_core::Command<()> {
    cmdtree_core::command(|_| Ok(0))
}

fn subject() -> CommandDispatcher<()> {
    let mut d = CommandDispatcher::new();
    d.register(
        literal("a")
            .then(
                literal("1")
                    .then(literal("i").executes_command(ok()))
                    .then(literal("ii").executes_command(ok())),
            )
            .then(
                literal("2")
                    .then(literal("i").executes_command(ok()))
                    .then(literal("ii").executes_command(ok())),
            ),
    )
    .unwrap();
    d.register(literal("b").then(literal("1").executes_command(ok())))
        .unwrap();
    d.register(literal("c").executes_command(ok())).unwrap();
    d.register(literal("d").requires(|_| false).executes_command(ok()))
        .unwrap();
    d.register(
        literal("e").executes_command(ok()).then(
            literal("1")
                .executes_command(ok())
                .then(literal("i").executes_command(ok()))
                .then(literal("ii").executes_command(ok())),
        ),
    )
    .unwrap();
    d.register(
        literal("f")
            .then(
                literal("1")
                    .then(literal("i").executes_command(ok()))
                    .then(literal("ii").executes_command(ok()).requires(|_| false)),
            )
            .then(
                literal("2")
                    .then(literal("i").executes_command(ok()).requires(|_| false))
                    .then(literal("ii").executes_command(ok())),
            ),
    )
    .unwrap();
    d.register(
        literal("g")
            .executes_command(ok())
            .then(literal("1").then(literal("i").executes_command(ok()))),
    )
    .unwrap();
    d.register(
        literal("h")
            .executes_command(ok())
            .then(literal("1").then(literal("i").executes_command(ok())))
            .then(literal("2").then(literal("i").then(literal("ii").executes_command(ok()))))
            .then(literal("3").executes_command(ok())),
    )
    .unwrap();
    d.register(
        literal("i")
            .executes_command(ok())
            .then(literal("1").executes_command(ok()))
            .then(literal("2").executes_command(ok())),
    )
    .unwrap();
    let root = d.root();
    d.register(literal("j").redirect(root)).unwrap();
    let h = node(&d, "h");
    d.register(literal("k").redirect(h)).unwrap();
    d
}

/// The last node matched by parsing `command`.
fn node(dispatcher: &CommandDispatcher<()>, command: &str) -> NodeId {
    node_from(dispatcher, StringReader::new(command))
}

fn node_from(dispatcher: &CommandDispatcher<()>, reader: StringReader) -> NodeId {
    let parse = dispatcher.parse_reader(reader, ());
    parse
        .context()
        .nodes()
        .last()
        .map(|parsed| parsed.node)
        .unwrap()
}

fn smart(dispatcher: &CommandDispatcher<()>, at: NodeId) -> Vec<(NodeId, String)> {
    dispatcher.smart_usage(at, &()).into_iter().collect()
}

#[test]
fn all_usage_without_commands() {
    let dispatcher = CommandDispatcher::<()>::new();
    assert!(dispatcher.all_usage(dispatcher.root(), &(), true).is_empty());
}

#[test]
fn smart_usage_without_commands() {
    let dispatcher = CommandDispatcher::<()>::new();
    assert!(dispatcher.smart_usage(dispatcher.root(), &()).is_empty());
}

#[test]
fn all_usage_of_root() {
    let dispatcher = subject();
    assert_eq!(
        dispatcher.all_usage(dispatcher.root(), &(), true),
        [
            "a 1 i", "a 1 ii", "a 2 i", "a 2 ii", "b 1", "c", "e", "e 1", "e 1 i", "e 1 ii",
            "f 1 i", "f 2 ii", "g", "g 1 i", "h", "h 1 i", "h 2 i ii", "h 3", "i", "i 1", "i 2",
            "j ...", "k -> h",
        ]
    );
}

#[test]
fn smart_usage_of_root() {
    let dispatcher = subject();
    let expected: Vec<(NodeId, String)> = [
        ("a", "a (1|2)"),
        ("b", "b 1"),
        ("c", "c"),
        ("e", "e [1]"),
        ("f", "f (1|2)"),
        ("g", "g [1]"),
        ("h", "h [1|2|3]"),
        ("i", "i [1|2]"),
        ("j", "j ..."),
        ("k", "k -> h"),
    ]
    .into_iter()
    .map(|(name, usage)| (node(&dispatcher, name), usage.to_string()))
    .collect();
    assert_eq!(smart(&dispatcher, dispatcher.root()), expected);
}

#[test]
fn smart_usage_of_h() {
    let dispatcher = subject();
    let expected = vec![
        (node(&dispatcher, "h 1"), "[1] i".to_string()),
        (node(&dispatcher, "h 2"), "[2] i ii".to_string()),
        (node(&dispatcher, "h 3"), "[3]".to_string()),
    ];
    assert_eq!(smart(&dispatcher, node(&dispatcher, "h")), expected);
}

#[test]
fn smart_usage_of_offset_h() {
    let dispatcher = subject();
    let h = node_from(&dispatcher, StringReader::with_cursor("/|/|/h", 5));
    let usage = smart(&dispatcher, h);
    assert_eq!(usage.len(), 3);
    assert_eq!(usage[0], (node(&dispatcher, "h 1"), "[1] i".to_string()));
    assert_eq!(usage[2], (node(&dispatcher, "h 3"), "[3]".to_string()));
}
