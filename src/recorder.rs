//! Stroke capture from a pointer device.

use anyhow::{Result, anyhow};
use evdev::{AbsoluteAxisCode, Device, EventType, KeyCode, SynchronizationCode};
use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::input;
use crate::stroke::Point;

/// Accumulates pointer events into strokes: contact-down opens a stroke,
/// each synced position while in contact appends a normalized point stamped
/// with elapsed milliseconds, contact-up completes the stroke.
#[derive(Debug)]
pub struct StrokeRecorder {
    // normalization
    x_min: i32,
    x_max: i32,
    y_min: i32,
    y_max: i32,
    // time
    start_instant: Instant,
    // pen state
    cur_x: f32,
    cur_y: f32,
    seen_x: bool,
    seen_y: bool,
    down: bool,
    current: Vec<Point>,
}

impl Default for StrokeRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self {
            x_min: 0,
            x_max: 4096,
            y_min: 0,
            y_max: 4096,
            start_instant: Instant::now(),
            cur_x: 0.0,
            cur_y: 0.0,
            seen_x: false,
            seen_y: false,
            down: false,
            current: Vec::new(),
        }
    }

    pub fn set_norm_ranges(&mut self, x_min: i32, x_max: i32, y_min: i32, y_max: i32) {
        self.x_min = x_min;
        self.x_max = x_max.max(x_min + 1);
        self.y_min = y_min;
        self.y_max = y_max.max(y_min + 1);
    }

    fn now_ms(&self) -> u64 {
        self.start_instant.elapsed().as_millis() as u64
    }

    /// Contact transition. Returns the completed stroke on release.
    pub fn on_contact(&mut self, down: bool) -> Option<Vec<Point>> {
        if down {
            self.down = true;
            self.current.clear();
            None
        } else if self.down {
            self.down = false;
            Some(std::mem::take(&mut self.current))
        } else {
            None
        }
    }

    pub fn on_pos_x(&mut self, raw: i32) {
        self.cur_x =
            ((raw - self.x_min) as f32 / (self.x_max - self.x_min) as f32).clamp(0.0, 1.0);
        self.seen_x = true;
    }

    pub fn on_pos_y(&mut self, raw: i32) {
        self.cur_y =
            ((raw - self.y_min) as f32 / (self.y_max - self.y_min) as f32).clamp(0.0, 1.0);
        self.seen_y = true;
    }

    /// Frame boundary: sample the current position into the open stroke.
    pub fn on_syn_report(&mut self) {
        if self.down && self.seen_x && self.seen_y {
            self.current.push(Point {
                x: self.cur_x,
                y: self.cur_y,
                t_ms: self.now_ms(),
            });
        }
    }
}

fn contact_button(code: u16) -> bool {
    code == KeyCode::BTN_TOUCH.0 || code == KeyCode::BTN_TOOL_PEN.0 || code == KeyCode::BTN_LEFT.0
}

/// Blocking capture loop: reads one device until `stop` is set, returning
/// every completed stroke with at least two points.
pub fn capture_strokes(device_path: Option<&str>, stop: &AtomicBool) -> Result<Vec<Vec<Point>>> {
    let path = match device_path {
        Some(p) => p.to_string(),
        None => {
            let devices = input::discover_pointer_devices();
            devices
                .first()
                .map(|d| d.path.clone())
                .ok_or_else(|| anyhow!("no absolute pointer devices detected"))?
        }
    };
    let mut dev = Device::open(&path)
        .map_err(|e| anyhow!("failed to open {path}: {e}"))?;
    let _ = dev.set_nonblocking(true);
    info!("recording from {path}; lift the pointer to finish a stroke, Ctrl-C to stop");

    let mut recorder = StrokeRecorder::new();
    let mut strokes: Vec<Vec<Point>> = vec![];

    while !stop.load(Ordering::Relaxed) {
        let mut any_event = false;
        if let Ok(events) = dev.fetch_events() {
            for ev in events {
                any_event = true;
                if ev.event_type() == EventType::ABSOLUTE {
                    match ev.code() {
                        c if c == AbsoluteAxisCode::ABS_X.0 => recorder.on_pos_x(ev.value()),
                        c if c == AbsoluteAxisCode::ABS_Y.0 => recorder.on_pos_y(ev.value()),
                        _ => {}
                    }
                } else if ev.event_type() == EventType::KEY {
                    if contact_button(ev.code()) {
                        if let Some(stroke) = recorder.on_contact(ev.value() != 0) {
                            if stroke.len() > 1 {
                                info!("captured stroke with {} points", stroke.len());
                                strokes.push(stroke);
                            } else {
                                warn!("discarded stroke with fewer than 2 points");
                            }
                        }
                    }
                } else if ev.event_type() == EventType::SYNCHRONIZATION
                    && ev.code() == SynchronizationCode::SYN_REPORT.0
                {
                    recorder.on_syn_report();
                }
            }
        }
        if !any_event {
            std::thread::sleep(Duration::from_millis(4));
        }
    }

    Ok(strokes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_stroke_between_contact_events() {
        let mut rec = StrokeRecorder::new();
        assert!(rec.on_contact(true).is_none());

        rec.on_pos_x(0);
        rec.on_pos_y(2048);
        rec.on_syn_report();
        rec.on_pos_x(4096);
        rec.on_syn_report();

        let stroke = rec.on_contact(false).expect("release completes the stroke");
        assert_eq!(stroke.len(), 2);
        assert_eq!(stroke[0].x, 0.0);
        assert_eq!(stroke[0].y, 0.5);
        assert_eq!(stroke[1].x, 1.0);
    }

    #[test]
    fn ignores_frames_without_contact_or_position() {
        let mut rec = StrokeRecorder::new();
        // position unknown: nothing sampled yet
        rec.on_contact(true);
        rec.on_syn_report();
        assert_eq!(rec.on_contact(false).unwrap().len(), 0);

        // pen up: frames don't record
        rec.on_pos_x(100);
        rec.on_pos_y(100);
        rec.on_syn_report();
        assert!(rec.on_contact(false).is_none());
    }

    #[test]
    fn normalization_clamps_out_of_range_values() {
        let mut rec = StrokeRecorder::new();
        rec.set_norm_ranges(0, 1000, 0, 1000);
        rec.on_contact(true);
        rec.on_pos_x(-50);
        rec.on_pos_y(2000);
        rec.on_syn_report();
        let stroke = rec.on_contact(false).unwrap();
        assert_eq!((stroke[0].x, stroke[0].y), (0.0, 1.0));
    }

    #[test]
    fn recognizes_all_contact_buttons() {
        assert!(contact_button(KeyCode::BTN_TOUCH.0));
        assert!(contact_button(KeyCode::BTN_TOOL_PEN.0));
        assert!(contact_button(KeyCode::BTN_LEFT.0));
        assert!(!contact_button(KeyCode::KEY_A.0));
    }
}
