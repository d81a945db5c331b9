#![allow(clippy::float_cmp)]

use super::*;
use crate::surface::display_list::{DisplayList, DrawOp};
use crate::testkit::{
    Demo, DemoEvent, DemoEventKind, DemoInput, DemoInputKind, DemoModel, Journal, Recorder, entries, init_tracing,
    journal,
};
use crate::widget::Container;

// =============================================================
// Helpers
// =============================================================

fn tree(width: f64, height: f64) -> RegionTree<Demo> {
    tree_with(Config::default(), width, height)
}

fn tree_with(config: Config, width: f64, height: f64) -> RegionTree<Demo> {
    init_tracing();
    RegionTree::new(config, Container::new("root"), DisplayList::new(width, height), ()).unwrap()
}

fn recorder(name: &'static str, j: &Journal) -> Recorder {
    Recorder::new(name, j).inputs(&[DemoInputKind::Click]).events(&[DemoEventKind::Ping])
}

fn click() -> DemoInput {
    DemoInput::Click(Point::new(1.0, 1.0))
}

// =============================================================
// Setup
// =============================================================

#[test]
fn zero_sized_surface_is_rejected() {
    let err = RegionTree::<Demo>::new(Config::default(), Container::new("root"), DisplayList::new(0.0, 10.0), ())
        .err()
        .unwrap();
    assert!(matches!(err, SetupError::EmptySurface(_)));
}

#[test]
fn new_tree_has_only_root() {
    let t = tree(100.0, 100.0);
    assert_eq!(t.len(), 1);
    assert_eq!(t.root(), RegionId::ROOT);
    assert_eq!(t.key(RegionId::ROOT), Some(&RegionKey::from("root")));
    assert_eq!(t.bounds(RegionId::ROOT), Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
}

// =============================================================
// Adoption
// =============================================================

#[test]
fn adopt_assigns_auto_keys_per_parent() {
    let mut t = tree(100.0, 100.0);
    let a = t.adopt(RegionId::ROOT, 0.0, 0.0, Region::new(10.0, 10.0, Container::new("a")), None).unwrap();
    let b = t.adopt(RegionId::ROOT, 10.0, 0.0, Region::new(10.0, 10.0, Container::new("b")), None).unwrap();
    let c = t.adopt(a, 0.0, 0.0, Region::new(5.0, 5.0, Container::new("c")), None).unwrap();

    assert_eq!(t.key(a), Some(&RegionKey::Auto(0)));
    assert_eq!(t.key(b), Some(&RegionKey::Auto(1)));
    assert_eq!(t.key(c), Some(&RegionKey::Auto(0)));
    assert_eq!(t.children(RegionId::ROOT), &[a, b]);
    assert_eq!(t.parent(c), Some(a));
    assert_eq!(t.parent(RegionId::ROOT), None);
}

#[test]
fn auto_key_skips_names_taken_explicitly() {
    let mut t = tree(100.0, 100.0);
    t.adopt(RegionId::ROOT, 0.0, 0.0, Region::new(10.0, 10.0, Container::new("a")), Some(RegionKey::Auto(0))).unwrap();
    let b = t.adopt(RegionId::ROOT, 0.0, 0.0, Region::new(10.0, 10.0, Container::new("b")), None).unwrap();
    assert_eq!(t.key(b), Some(&RegionKey::Auto(1)));
}

#[test]
fn named_child_is_found_by_key() {
    let mut t = tree(100.0, 100.0);
    let grid = Region::new(50.0, 50.0, Container::new("grid"));
    let grid = t.adopt(RegionId::ROOT, 0.0, 0.0, grid, Some("grid".into())).unwrap();
    assert_eq!(t.child(RegionId::ROOT, &"grid".into()), Some(grid));
    assert_eq!(t.child(RegionId::ROOT, &"palette".into()), None);
}

#[test]
fn duplicate_sibling_key_is_rejected() {
    let mut t = tree(100.0, 100.0);
    t.adopt(RegionId::ROOT, 0.0, 0.0, Region::new(10.0, 10.0, Container::new("a")), Some("x".into())).unwrap();
    let b = Region::new(10.0, 10.0, Container::new("b"));
    let err = t.adopt(RegionId::ROOT, 20.0, 0.0, b, Some("x".into())).unwrap_err();
    assert!(matches!(err, RegionError::DuplicateKey { parent, .. } if parent == RegionId::ROOT));
    assert_eq!(t.len(), 2);
}

#[test]
fn same_key_under_different_parents_is_allowed() {
    let mut t = tree(100.0, 100.0);
    let a = t.adopt(RegionId::ROOT, 0.0, 0.0, Region::new(50.0, 50.0, Container::new("a")), Some("x".into())).unwrap();
    assert!(t.adopt(a, 0.0, 0.0, Region::new(10.0, 10.0, Container::new("b")), Some("x".into())).is_ok());
}

#[test]
fn child_must_fit_inside_parent() {
    let mut t = tree(100.0, 100.0);
    let err = t.adopt(RegionId::ROOT, 60.0, 0.0, Region::new(50.0, 10.0, Container::new("wide")), None).unwrap_err();
    assert!(matches!(err, RegionError::OutOfBounds { .. }));
    let err = t.adopt(RegionId::ROOT, -1.0, 0.0, Region::new(10.0, 10.0, Container::new("left")), None).unwrap_err();
    assert!(matches!(err, RegionError::OutOfBounds { .. }));
    assert_eq!(t.len(), 1);
}

#[test]
fn malformed_sizes_are_rejected() {
    let mut t = tree(100.0, 100.0);
    for (w, h) in [(-40.0, -40.0), (10.0, -1.0), (0.0, 10.0), (f64::NAN, 10.0), (10.0, f64::INFINITY)] {
        let err = t.adopt(RegionId::ROOT, 50.0, 50.0, Region::new(w, h, Container::new("bad")), None).unwrap_err();
        assert!(matches!(err, RegionError::InvalidSize(_)), "{w}x{h} accepted");
    }
    assert_eq!(t.len(), 1);
    assert!(t.children(RegionId::ROOT).is_empty());
}

#[test]
fn child_touching_parent_edges_fits() {
    let mut t = tree(100.0, 100.0);
    assert!(t.adopt(RegionId::ROOT, 50.0, 50.0, Region::new(50.0, 50.0, Container::new("corner")), None).is_ok());
}

#[test]
fn adopt_under_unknown_parent_fails() {
    let mut t = tree(100.0, 100.0);
    let err = t.adopt(RegionId(7), 0.0, 0.0, Region::new(1.0, 1.0, Container::new("x")), None).unwrap_err();
    assert!(matches!(err, RegionError::UnknownRegion(RegionId(7))));
}

// =============================================================
// Geometry
// =============================================================

#[test]
fn contains_point_is_inclusive_in_parent_space() {
    let mut t = tree(200.0, 200.0);
    let r = t.adopt(RegionId::ROOT, 10.0, 20.0, Region::new(30.0, 40.0, Container::new("r")), None).unwrap();
    assert!(t.contains_point(r, Point::new(10.0, 20.0)));
    assert!(t.contains_point(r, Point::new(40.0, 60.0)));
    assert!(!t.contains_point(r, Point::new(40.1, 60.0)));
    assert!(!t.contains_point(r, Point::new(9.9, 30.0)));
}

#[test]
fn localize_accounts_for_every_ancestor() {
    let mut t = tree(200.0, 200.0);
    let outer = t.adopt(RegionId::ROOT, 100.0, 0.0, Region::new(100.0, 100.0, Container::new("outer")), None).unwrap();
    let inner = t.adopt(outer, 10.0, 20.0, Region::new(50.0, 50.0, Container::new("inner")), None).unwrap();

    assert_eq!(t.to_parent_space(inner, Point::new(115.0, 25.0)), Some(Point::new(15.0, 25.0)));
    assert_eq!(t.localize(inner, Point::new(115.0, 25.0)), Some(Point::new(5.0, 5.0)));
    assert_eq!(t.localize(inner, Point::new(50.0, 25.0)), None);
}

// =============================================================
// Kinds
// =============================================================

#[test]
fn subtree_kinds_are_unioned_in_first_seen_order() {
    let j = journal();
    let mut t = tree(100.0, 100.0);
    let a = Recorder::new("a", &j).events(&[DemoEventKind::Note]);
    let b = Recorder::new("b", &j).events(&[DemoEventKind::Ping, DemoEventKind::Note]);
    let c = Recorder::new("c", &j).inputs(&[DemoInputKind::Key]);
    let a = t.adopt(RegionId::ROOT, 0.0, 0.0, Region::new(50.0, 50.0, a), None).unwrap();
    t.adopt(a, 0.0, 0.0, Region::new(10.0, 10.0, b), None).unwrap();
    t.adopt(RegionId::ROOT, 50.0, 0.0, Region::new(10.0, 10.0, c), None).unwrap();

    assert_eq!(t.event_kinds(RegionId::ROOT), vec![DemoEventKind::Note, DemoEventKind::Ping]);
    assert_eq!(t.event_kinds(a), vec![DemoEventKind::Note, DemoEventKind::Ping]);
    assert_eq!(t.input_kinds(RegionId::ROOT), vec![DemoInputKind::Key]);
    assert!(t.input_kinds(a).is_empty());
}

// =============================================================
// Dispatch
// =============================================================

#[test]
fn broadcast_visits_parent_then_children_in_adoption_order() {
    let j = journal();
    let model = DemoModel::default();
    let mut t = tree(100.0, 100.0);
    let p = t.adopt(RegionId::ROOT, 0.0, 0.0, Region::new(100.0, 100.0, recorder("p", &j)), None).unwrap();
    let x = t.adopt(p, 0.0, 0.0, Region::new(10.0, 10.0, recorder("x", &j)), None).unwrap();
    t.adopt(p, 20.0, 0.0, Region::new(10.0, 10.0, recorder("y", &j)), None).unwrap();
    t.adopt(x, 0.0, 0.0, Region::new(5.0, 5.0, recorder("x1", &j)), None).unwrap();

    t.dispatch_event(&model, &DemoEvent::Ping(1));
    assert_eq!(entries(&j), vec!["p:Ping(1)", "x:Ping(1)", "x1:Ping(1)", "y:Ping(1)"]);
}

#[test]
fn broadcast_ignores_containment() {
    let j = journal();
    let model = DemoModel::default();
    let mut t = tree(100.0, 100.0);
    t.adopt(RegionId::ROOT, 80.0, 80.0, Region::new(10.0, 10.0, recorder("far", &j)), None).unwrap();

    t.dispatch_input(&model, &click());
    assert_eq!(entries(&j), vec!["far:Click(Point { x: 1.0, y: 1.0 })"]);
}

#[test]
fn regions_without_the_kind_are_skipped() {
    let j = journal();
    let model = DemoModel::default();
    let mut t = tree(100.0, 100.0);
    let a = t.adopt(RegionId::ROOT, 0.0, 0.0, Region::new(50.0, 50.0, Recorder::new("a", &j)), None).unwrap();
    t.adopt(a, 0.0, 0.0, Region::new(10.0, 10.0, Recorder::new("b", &j).inputs(&[DemoInputKind::Key])), None).unwrap();

    t.dispatch_input(&model, &click());
    assert!(entries(&j).is_empty());
    t.dispatch_input(&model, &DemoInput::Key('k'));
    assert_eq!(entries(&j), vec!["b:Key('k')"]);
}

#[test]
fn unknown_handler_does_not_stop_broadcast() {
    let j = journal();
    let model = DemoModel::default();
    let mut t = tree(100.0, 100.0);
    let a = Region::new(50.0, 50.0, recorder("a", &j).unrecognizing());
    let a = t.adopt(RegionId::ROOT, 0.0, 0.0, a, None).unwrap();
    t.adopt(a, 0.0, 0.0, Region::new(10.0, 10.0, recorder("b", &j)), None).unwrap();

    t.dispatch_event(&model, &DemoEvent::Ping(0));
    assert_eq!(entries(&j), vec!["a:Ping(0)", "b:Ping(0)"]);
}

#[test]
fn bubbled_events_are_handed_to_the_caller_in_order() {
    let j = journal();
    let model = DemoModel::default();
    let mut t = tree(100.0, 100.0);
    let a = Region::new(50.0, 50.0, recorder("a", &j).bubbling(DemoEvent::Note("a")));
    let a = t.adopt(RegionId::ROOT, 0.0, 0.0, a, None).unwrap();
    t.adopt(a, 0.0, 0.0, Region::new(10.0, 10.0, recorder("b", &j).bubbling(DemoEvent::Note("b"))), None).unwrap();

    let out = t.dispatch_input(&model, &click());
    assert_eq!(out, vec![DemoEvent::Note("a"), DemoEvent::Note("b")]);
}

#[test]
fn bubbled_events_are_not_redelivered_downward() {
    let j = journal();
    let model = DemoModel::default();
    let mut t = tree(100.0, 100.0);
    t.adopt(
        RegionId::ROOT,
        0.0,
        0.0,
        Region::new(10.0, 10.0, recorder("a", &j).events(&[DemoEventKind::Note]).bubbling(DemoEvent::Note("a"))),
        None,
    )
    .unwrap();

    t.dispatch_input(&model, &click());
    assert_eq!(entries(&j).len(), 1);
}

// =============================================================
// Render
// =============================================================

fn texts(ops: &[DrawOp]) -> Vec<String> {
    ops.iter()
        .filter_map(|op| match op {
            DrawOp::FillText { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn children_render_before_their_container() {
    let j = journal();
    let model = DemoModel::default();
    let mut t = tree(100.0, 100.0);
    let p = t.adopt(RegionId::ROOT, 0.0, 0.0, Region::new(100.0, 100.0, recorder("p", &j)), None).unwrap();
    t.adopt(p, 0.0, 0.0, Region::new(10.0, 10.0, recorder("x", &j)), None).unwrap();
    t.adopt(p, 20.0, 0.0, Region::new(10.0, 10.0, recorder("y", &j)), None).unwrap();

    let pass = t.render(&model).unwrap();
    assert_eq!(pass.outcome, RenderOutcome::Redrawn);
    assert_eq!(entries(&j), vec!["render:x", "render:y", "render:p"]);
    assert_eq!(texts(t.surface().ops()), vec!["x", "y", "p"]);
}

#[test]
fn regions_render_in_translated_space() {
    let j = journal();
    let model = DemoModel::default();
    let mut t = tree(100.0, 100.0);
    t.adopt(RegionId::ROOT, 30.0, 40.0, Region::new(10.0, 10.0, recorder("r", &j)), None).unwrap();

    t.render(&model).unwrap();
    let ops = t.surface().ops();
    let at = ops.iter().position(|op| *op == DrawOp::Translate { x: 30.0, y: 40.0 }).unwrap();
    assert_eq!(ops[at - 1], DrawOp::Save);
    assert_eq!(ops[at + 1], DrawOp::FillText { text: "r".into(), x: 0.0, y: 0.0 });
    assert_eq!(ops[at + 2], DrawOp::Restore);
}

#[test]
fn unchanged_fingerprint_reuses_cached_frame() {
    let j = journal();
    let mut model = DemoModel::default();
    let mut t = tree(100.0, 100.0);
    t.adopt(RegionId::ROOT, 0.0, 0.0, Region::new(10.0, 10.0, recorder("r", &j)), None).unwrap();

    assert_eq!(t.render(&model).unwrap().outcome, RenderOutcome::Redrawn);
    let first = t.surface().ops().to_vec();
    assert_eq!(t.render(&model).unwrap().outcome, RenderOutcome::Reused);
    assert_eq!(t.surface().ops(), first.as_slice());
    model.version += 1;
    assert_eq!(t.render(&model).unwrap().outcome, RenderOutcome::Redrawn);

    assert_eq!(entries(&j), vec!["render:r", "render:r"]);
    assert_eq!(t.cache().redraws(), 2);
    assert_eq!(t.cache().reuses(), 1);
}

#[test]
fn adopting_invalidates_the_cached_frame() {
    let j = journal();
    let model = DemoModel::default();
    let mut t = tree(100.0, 100.0);
    t.render(&model).unwrap();
    t.adopt(RegionId::ROOT, 0.0, 0.0, Region::new(10.0, 10.0, recorder("late", &j)), None).unwrap();
    assert_eq!(t.render(&model).unwrap().outcome, RenderOutcome::Redrawn);
    assert_eq!(entries(&j), vec!["render:late"]);
}

#[test]
fn debug_mode_outlines_and_labels_every_region() {
    let config = Config { debug: true, ..Config::default() };
    let model = DemoModel::default();
    let mut t = tree_with(config, 100.0, 100.0);
    let a = Region::new(40.0, 30.0, Container::new("a"));
    let a = t.adopt(RegionId::ROOT, 0.0, 0.0, a, Some("grid".into())).unwrap();
    t.adopt(a, 0.0, 0.0, Region::new(10.0, 10.0, Container::new("b")), None).unwrap();

    t.render(&model).unwrap();
    let ops = t.surface().ops();
    assert_eq!(texts(ops), vec!["#0", "grid", "root"]);
    assert!(ops.contains(&DrawOp::StrokeRect { x: 0.0, y: 0.0, width: 40.0, height: 30.0 }));
    assert!(ops.contains(&DrawOp::StrokeStyle(DEBUG_OUTLINE_COLOR.into())));
}

#[test]
fn render_without_debug_draws_no_outlines() {
    let model = DemoModel::default();
    let mut t = tree(100.0, 100.0);
    t.adopt(RegionId::ROOT, 0.0, 0.0, Region::new(40.0, 30.0, Container::new("a")), None).unwrap();
    t.render(&model).unwrap();
    assert!(texts(t.surface().ops()).is_empty());
}

struct Eraser;

impl Widget<Demo> for Eraser {
    fn render(&self, canvas: &mut dyn Canvas, _cx: &mut RegionCx<'_, Demo>) -> Result<(), SurfaceError> {
        canvas.clear_rect(0.0, 0.0, 100.0, 100.0);
        Ok(())
    }
}

#[test]
fn clear_inside_a_child_keeps_sibling_drawing() {
    let j = journal();
    let model = DemoModel::default();
    let mut t = tree(100.0, 100.0);
    t.adopt(RegionId::ROOT, 0.0, 0.0, Region::new(40.0, 40.0, recorder("a", &j)), None).unwrap();
    t.adopt(RegionId::ROOT, 50.0, 50.0, Region::new(50.0, 50.0, Eraser), None).unwrap();

    t.render(&model).unwrap();
    let ops = t.surface().ops().to_vec();
    assert_eq!(texts(&ops), vec!["a"]);
    assert!(ops.contains(&DrawOp::ClearRect { x: 0.0, y: 0.0, width: 100.0, height: 100.0 }));
    let saves = ops.iter().filter(|op| **op == DrawOp::Save).count();
    let restores = ops.iter().filter(|op| **op == DrawOp::Restore).count();
    assert_eq!(saves, 3);
    assert_eq!(saves, restores);

    assert_eq!(t.render(&model).unwrap().outcome, RenderOutcome::Reused);
    assert_eq!(t.surface().ops(), ops.as_slice());
}
