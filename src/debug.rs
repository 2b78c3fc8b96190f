use crate::math::Point2d;
#[cfg(feature = "debug")]
use serde_json::json;

/// The most entries a single debug frame will hold.
#[cfg(feature = "debug")]
const MAX_FRAME_ENTRIES: usize = 4096;

#[cfg(feature = "debug")]
thread_local!(
    static DEBUG_FRAME: std::cell::RefCell<Vec<serde_json::Value>> = Default::default();
);

#[allow(unused)]
pub fn debug_line(name: &str, p1: Point2d, p2: Point2d) {
    #[cfg(feature = "debug")]
    DEBUG_FRAME.with(|frame| {
        let mut frame = frame.borrow_mut();
        if frame.len() < MAX_FRAME_ENTRIES {
            frame.push(json!({
                "type": "line",
                "name": name,
                "p1": [p1.x, p1.y],
                "p2": [p2.x, p2.y],
            }))
        }
    })
}

/// Discards anything recorded since the last frame was taken.
#[cfg(feature = "debug")]
pub fn clear_debug_frame() {
    DEBUG_FRAME.with(|frame| frame.borrow_mut().clear())
}

#[cfg(feature = "debug")]
pub fn take_debug_frame() -> serde_json::Value {
    json!(DEBUG_FRAME.with(|frame| frame.take()))
}
