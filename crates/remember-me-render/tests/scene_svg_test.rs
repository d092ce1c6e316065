use remember_me_core::{
    ChartConfig, ChartRenderer, ChartSession, FilterDimension, FilterSelection, RecordId,
};
use remember_me_render::{SceneRenderer, SvgRenderOptions};
use std::path::PathBuf;

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

fn load() -> ChartSession {
    let path = workspace_root()
        .join("fixtures")
        .join("portraits")
        .join("portraits_sample.csv");
    futures::executor::block_on(ChartSession::load(path, ChartConfig::default()))
        .expect("fixture loads")
}

#[test]
fn every_dimension_keeps_one_dot_per_record() {
    let mut session = load();
    let mut scene = SceneRenderer::new(session.config().clone());
    session.present(&mut scene);

    for dimension in FilterDimension::ALL {
        let id = session.select(FilterSelection::Dimension(dimension), &mut scene);
        assert_eq!(scene.dots().len(), 13, "{dimension}");
        let svg = scene.render_svg(&SvgRenderOptions::default()).unwrap();
        assert_eq!(svg.matches("<circle ").count(), 13, "{dimension}");
        for label in dimension.labels() {
            assert!(svg.contains(&format!(">{label}</text>")), "{dimension}: {label}");
        }
        session.transition_complete(id, &mut scene);
        assert!(scene.interactions_armed());
    }
}

#[test]
fn returning_to_timeline_lands_on_the_first_draw() {
    let mut session = load();
    let mut scene = SceneRenderer::new(session.config().clone());
    session.present(&mut scene);
    let first: Vec<_> = scene.dots().map(|d| (d.record_id, d.to)).collect();

    session.select(FilterSelection::Dimension(FilterDimension::Sitter), &mut scene);
    session.select(FilterSelection::None, &mut scene);
    let back: Vec<_> = scene.dots().map(|d| (d.record_id, d.to)).collect();
    assert_eq!(first, back);

    // The return trip starts where the sitter layout left each dot.
    let sitter = session.compute_layout(remember_me_core::LayoutMode::Categorical(
        FilterDimension::Sitter,
    ));
    for dot in scene.dots() {
        let p = sitter.point(dot.record_id).unwrap();
        assert_eq!(dot.from, (p.x, p.y));
    }
}

#[test]
fn superseded_transition_does_not_rearm_hover() {
    let mut session = load();
    let mut scene = SceneRenderer::new(session.config().clone());
    session.present(&mut scene);
    let stale = session.select(FilterSelection::Dimension(FilterDimension::Gender), &mut scene);
    session.select(FilterSelection::Dimension(FilterDimension::Size), &mut scene);

    // A host that forwards completions blindly still cannot re-arm a superseded transition.
    scene.rebind_interactions(stale);
    assert!(scene.hover(RecordId(0)).is_none());
    let svg = scene.render_svg(&SvgRenderOptions::default()).unwrap();
    assert!(!svg.contains("<title>"));
}
