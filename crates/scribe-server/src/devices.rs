use scribe_core::{AudioDevice, DeviceKind};

/// Audio input devices offered to the source selector.
///
/// Capture happens in the clients, not in this server; a stable default
/// entry is enough for the selector. TODO: surface the devices reported
/// by connected clients once the ingestion protocol carries them.
pub fn list() -> Vec<AudioDevice> {
    vec![AudioDevice {
        device_id: "default".to_string(),
        label: "Default Audio Input".to_string(),
        kind: DeviceKind::AudioInput,
        group_id: None,
    }]
}
