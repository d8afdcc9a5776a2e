use super::*;

#[test]
fn counter_and_slider_bounds() {
    let payload = FramePayload::parse("QUJD");
    let update = DisplayUpdate {
        frame_index: 0,
        frame_count: 3,
        payload: &payload,
    };
    assert_eq!(update.counter_label(), "1 / 3");
    assert_eq!(update.slider_max(), 2);

    let last = DisplayUpdate {
        frame_index: 2,
        ..update
    };
    assert_eq!(last.counter_label(), "3 / 3");
}

#[test]
fn recording_renderer_keeps_call_order() {
    let payload = FramePayload::parse("/static/animation/frame_004.png");
    let mut r = RecordingRenderer::new();
    r.clear();
    r.show_details(&AnimationDetails {
        title: "Spiral".into(),
        description: String::new(),
        frame_count: 5,
    });
    r.show_frame(&DisplayUpdate {
        frame_index: 4,
        frame_count: 5,
        payload: &payload,
    })
    .unwrap();
    r.show_notice(&Notice::error("late failure"));

    assert_eq!(r.events().len(), 4);
    assert_eq!(r.events()[0], RenderEvent::Cleared);
    assert_eq!(
        r.events()[2],
        RenderEvent::Frame {
            index: 4,
            count: 5,
            src: "/static/animation/frame_004.png".into(),
        }
    );
    assert_eq!(r.frame_indices(), vec![4]);
    assert_eq!(r.notices(), vec![&Notice::error("late failure")]);

    r.reset();
    assert!(r.events().is_empty());
}

#[test]
fn boxed_renderers_forward() {
    let payload = FramePayload::parse("QUJD");
    let mut boxed: Box<dyn FrameRenderer> = Box::new(LogRenderer);
    boxed
        .show_frame(&DisplayUpdate {
            frame_index: 0,
            frame_count: 1,
            payload: &payload,
        })
        .unwrap();
    boxed.show_notice(&Notice::warning("nothing to show"));
}
