//! Pointer device discovery & event stream (evdev 0.13.2 compatible)

use evdev::{AbsoluteAxisCode, Device, EventType, KeyCode};

#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub path: String,
    pub name: String,
}

/// Scans /dev/input for absolute-pointer devices (pen tablets, touch
/// screens): X/Y absolute axes plus a contact button.
pub fn discover_pointer_devices() -> Vec<DeviceInfo> {
    let mut out = vec![];
    if let Ok(rd) = std::fs::read_dir("/dev/input") {
        for e in rd.flatten() {
            let p = e.path();
            if p.file_name()
                .and_then(|s| s.to_str())
                .map(|s| s.starts_with("event"))
                .unwrap_or(false)
            {
                if let Ok(dev) = Device::open(&p) {
                    if is_pointer(&dev) {
                        out.push(DeviceInfo {
                            path: p.display().to_string(),
                            name: dev.name().unwrap_or("unknown").to_string(),
                        });
                    }
                }
            }
        }
    }
    out
}

fn is_pointer(dev: &Device) -> bool {
    let has_abs = dev.supported_events().contains(EventType::ABSOLUTE);
    let axes = dev.supported_absolute_axes();
    let has_xy = axes.map_or(false, |a| {
        a.contains(AbsoluteAxisCode::ABS_X) && a.contains(AbsoluteAxisCode::ABS_Y)
    });
    let keys = dev.supported_keys();
    let has_contact = keys.map_or(false, |k| {
        k.contains(KeyCode::BTN_TOUCH)
            || k.contains(KeyCode::BTN_TOOL_PEN)
            || k.contains(KeyCode::BTN_LEFT)
    });
    has_abs && has_xy && has_contact
}
