//! Integration tests for editor crate

use livepage_dom::parse;
use livepage_editor::{
    serialize_document, ClickOutcome, EditSession, EditorConfig, EditorError, MemoryBackend,
    Mode, OverlayMatcher, ReorderOp, StaticLayout,
};

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8" />
<title>Demo</title>
<script src="head.js"></script>
</head>
<body class="page">
<header class="site-header"><h1 class="site-title">Website Name</h1></header>
<main class="site-main">
  <section class="hero"><h2>Hero</h2><p>Intro</p></section>
  <section id="about" class="content-card"><p>About</p></section>
  <script>inline()</script>
</main>
<footer class="site-footer"><p>Footer</p></footer>
<script src="script.js"></script>
</body>
</html>
"#;

fn session_with(config: EditorConfig) -> (EditSession, MemoryBackend) {
    let backend = MemoryBackend::new().with_project("demo", PAGE, "");
    let mut session = EditSession::new(config);
    session.open(&backend, "demo", Mode::Edit).unwrap();
    (session, backend)
}

fn session() -> (EditSession, MemoryBackend) {
    session_with(EditorConfig::default())
}

fn select(session: &mut EditSession, selector: &str) {
    let node = session.document().unwrap().query(selector).unwrap();
    session.select(Some(node), &StaticLayout::default()).unwrap();
}

fn serialized(session: &EditSession) -> String {
    serialize_document(session.document().unwrap(), &OverlayMatcher::default())
}

#[test]
fn test_mutations_then_undos_restore_pristine() {
    let (mut session, _) = session();
    let pristine = serialized(&session);

    select(&mut session, "#about");
    session.move_selected(ReorderOp::Up).unwrap();
    session.indent_selected().unwrap_err(); // first child now, nothing to indent into
    select(&mut session, ".hero");
    session.indent_selected().unwrap();
    session.outdent_selected().unwrap();
    session.add_element(Some("aside")).unwrap();
    select(&mut session, "footer");
    session.delete_selected().unwrap();
    assert!(session.set_title("Changed").unwrap());

    let pushed = session.history().len() - 1;
    assert_eq!(pushed, 6);
    for _ in 0..pushed {
        session.undo().unwrap();
    }
    assert_eq!(serialized(&session), pristine);
    assert!(matches!(session.undo(), Err(EditorError::History(_))));
}

#[test]
fn test_history_cap_through_session() {
    let config = EditorConfig {
        history_limit: 3,
        ..EditorConfig::default()
    };
    let (mut session, _) = session_with(config);
    select(&mut session, "footer");
    for _ in 0..5 {
        session.move_selected(ReorderOp::ToFirst).unwrap();
        session.move_selected(ReorderOp::ToLast).unwrap();
        assert!(session.history().len() <= 3);
    }
    assert_eq!(session.history().len(), 3);
    session.undo().unwrap();
    session.undo().unwrap();
    assert!(session.undo().is_err());
}

#[test]
fn test_noop_operations_do_not_push_history() {
    let (mut session, _) = session();

    select(&mut session, "header");
    assert!(session.indent_selected().is_err());
    assert!(matches!(
        session.outdent_selected(),
        Err(EditorError::Reorder(_))
    ));
    assert!(!session.move_selected(ReorderOp::Up).unwrap());
    assert!(!session.move_selected(ReorderOp::ToFirst).unwrap());

    select(&mut session, "footer");
    assert!(!session.move_selected(ReorderOp::Down).unwrap());
    assert!(!session.move_selected(ReorderOp::ToLast).unwrap());

    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_selected_script_never_moves() {
    let (mut session, _) = session();
    let doc = session.document().unwrap();
    let main = doc.query("main").unwrap();
    let script = doc
        .element_children(main)
        .into_iter()
        .find(|c| doc.is_tag(*c, "script"))
        .unwrap();
    session.select(Some(script), &StaticLayout::default()).unwrap();
    let err = session.move_selected(ReorderOp::ToFirst).unwrap_err();
    assert_eq!(err.notice(), "Script elements cannot be moved");
    assert_eq!(session.history().len(), 1);
}

#[test]
fn test_scripts_stay_trailing_under_reorders() {
    let (mut session, _) = session();
    select(&mut session, ".hero");
    for op in [
        ReorderOp::ToLast,
        ReorderOp::Up,
        ReorderOp::Down,
        ReorderOp::Down,
        ReorderOp::ToFirst,
        ReorderOp::ToLast,
    ] {
        session.move_selected(op).unwrap();
        let doc = session.document().unwrap();
        let main = doc.query("main").unwrap();
        let children = doc.element_children(main);
        let first_script = children
            .iter()
            .position(|c| doc.is_tag(*c, "script"))
            .unwrap();
        assert!(children[first_script..]
            .iter()
            .all(|c| doc.is_tag(*c, "script")));
    }
}

#[test]
fn test_saved_markup_is_stable_and_scripts_last() {
    let (mut session, mut backend) = session();
    select(&mut session, "#about");
    session.move_selected(ReorderOp::ToFirst).unwrap();
    let saved = session.save_markup(&mut backend).unwrap();

    // every script, head ones included, sits right before </body>
    let tail = "\n\n<script src=\"head.js\"></script>\n<script>inline()</script>\n<script src=\"script.js\"></script>\n  </body>\n</html>\n";
    assert!(saved.ends_with(tail), "{}", saved);

    let reparsed = parse(&saved).unwrap();
    let once = serialize_document(&reparsed, &OverlayMatcher::default());
    let twice = serialize_document(&parse(&once).unwrap(), &OverlayMatcher::default());
    assert_eq!(once, twice);
    assert!(once.contains("<body class=\"page\">"));
}

#[test]
fn test_deleted_node_is_unreachable() {
    let (mut session, _) = session();
    let about = session.document().unwrap().get_element_by_id("about").unwrap();
    select(&mut session, "#about");
    session.delete_selected().unwrap();

    assert_eq!(session.selected(), None);
    let doc = session.document().unwrap();
    assert!(!doc.contains(about));
    assert!(session.registry().outline_for(doc, about).is_none());
    assert!(session.outline().iter().all(|entry| entry.node != about));

    // a click on the dead id is ignored
    let outcome = session.click(about, &StaticLayout::default()).unwrap();
    assert_eq!(outcome, ClickOutcome::Ignored);
}

#[test]
fn test_clicks_after_undo_are_intercepted() {
    let (mut session, _) = session();
    select(&mut session, "footer");
    session.move_selected(ReorderOp::ToFirst).unwrap();
    session.undo().unwrap();

    let h1 = session.document().unwrap().query("h1").unwrap();
    let outcome = session.click(h1, &StaticLayout::default()).unwrap();
    assert!(matches!(outcome, ClickOutcome::Selected { node, .. } if node == h1));
    assert_eq!(session.selected_entry().unwrap().label, "<h1> .site-title");
}

#[test]
fn test_preview_mode_ignores_clicks() {
    let backend = MemoryBackend::new().with_project("demo", PAGE, "");
    let mut session = EditSession::default();
    session.open(&backend, "demo", Mode::Preview).unwrap();
    let h1 = session.document().unwrap().query("h1").unwrap();
    assert_eq!(
        session.click(h1, &StaticLayout::default()).unwrap(),
        ClickOutcome::Ignored
    );
    assert_eq!(session.selected(), None);
}
