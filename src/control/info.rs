//! Static host information passed with `-info`.
//!
//! Parsed once at startup and read-only afterwards. Fields the host leaves
//! out fall back to their defaults.

use serde::Deserialize;

/// Host application and device inventory.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Info {
    pub application: ApplicationInfo,
    pub plugin: PluginInfo,
    pub device_pixel_ratio: u32,
    pub colors: Colors,
    pub devices: Vec<DeviceInfo>,
}

impl Info {
    /// Find a device by id.
    pub fn device(&self, id: &str) -> Option<&DeviceInfo> {
        self.devices.iter().find(|d| d.id == id)
    }
}

/// The host application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicationInfo {
    pub font: String,
    pub language: String,
    pub platform: String,
    pub platform_version: String,
    pub version: String,
}

/// This plugin as the host knows it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PluginInfo {
    pub uuid: String,
    pub version: String,
}

/// Theme colors, as CSS hex strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Colors {
    pub button_pressed_background_color: String,
    pub button_pressed_border_color: String,
    pub button_pressed_text_color: String,
    pub disabled_color: String,
    pub highlight_color: String,
    pub mouse_down_color: String,
}

/// A connected device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeviceInfo {
    pub id: String,
    pub name: String,
    pub size: DeviceSize,
    /// Host-defined device model number.
    #[serde(rename = "type")]
    pub device_type: u32,
}

/// Key grid dimensions of a device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeviceSize {
    pub columns: u32,
    pub rows: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r##"{
        "application": {
            "font": ".AppleSystemUIFont",
            "language": "en",
            "platform": "mac",
            "platformVersion": "14.2.1",
            "version": "6.4.0.19310"
        },
        "plugin": { "uuid": "com.x.plugin", "version": "1.0.0" },
        "devicePixelRatio": 2,
        "colors": {
            "buttonPressedBackgroundColor": "#303030FF",
            "buttonPressedBorderColor": "#646464FF",
            "buttonPressedTextColor": "#969696FF",
            "disabledColor": "#F7821B59",
            "highlightColor": "#F7821BFF",
            "mouseDownColor": "#CF6304FF"
        },
        "devices": [
            { "id": "D1", "name": "Deck +", "size": { "columns": 4, "rows": 2 }, "type": 7 }
        ]
    }"##;

    #[test]
    fn test_parse_full_document() {
        let info: Info = serde_json::from_str(FULL).unwrap();

        assert_eq!(info.application.platform_version, "14.2.1");
        assert_eq!(info.plugin.uuid, "com.x.plugin");
        assert_eq!(info.device_pixel_ratio, 2);
        assert_eq!(info.colors.highlight_color, "#F7821BFF");
        assert_eq!(info.devices.len(), 1);
        assert_eq!(info.devices[0].size, DeviceSize { columns: 4, rows: 2 });
        assert_eq!(info.devices[0].device_type, 7);
    }

    #[test]
    fn test_device_lookup() {
        let info: Info = serde_json::from_str(FULL).unwrap();

        assert_eq!(info.device("D1").unwrap().name, "Deck +");
        assert!(info.device("missing").is_none());
    }

    #[test]
    fn test_missing_fields_default() {
        let info: Info = serde_json::from_str("{}").unwrap();
        assert_eq!(info, Info::default());
    }
}
