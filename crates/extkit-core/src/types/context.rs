//! Context handle and device configuration

use serde::{Deserialize, Serialize};

/// Bits of [`Configuration::ui_mode`] that carry the UI mode type.
/// The remaining bits (night mode and friends) are ignored by mode gating.
pub const UI_MODE_TYPE_MASK: u32 = 0x0f;

/// Kind of device surface the UI is currently shown on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiModeType {
    #[default]
    Undefined,
    Normal,
    Desk,
    Car,
    Television,
    Appliance,
    Watch,
    VrHeadset,
}

impl UiModeType {
    /// Decode the mode type from raw `ui_mode` bits, ignoring non-type bits
    pub fn from_raw(ui_mode: u32) -> Self {
        match ui_mode & UI_MODE_TYPE_MASK {
            1 => UiModeType::Normal,
            2 => UiModeType::Desk,
            3 => UiModeType::Car,
            4 => UiModeType::Television,
            5 => UiModeType::Appliance,
            6 => UiModeType::Watch,
            7 => UiModeType::VrHeadset,
            _ => UiModeType::Undefined,
        }
    }

    pub fn as_raw(&self) -> u32 {
        match self {
            UiModeType::Undefined => 0,
            UiModeType::Normal => 1,
            UiModeType::Desk => 2,
            UiModeType::Car => 3,
            UiModeType::Television => 4,
            UiModeType::Appliance => 5,
            UiModeType::Watch => 6,
            UiModeType::VrHeadset => 7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UiModeType::Undefined => "undefined",
            UiModeType::Normal => "normal",
            UiModeType::Desk => "desk",
            UiModeType::Car => "car",
            UiModeType::Television => "television",
            UiModeType::Appliance => "appliance",
            UiModeType::Watch => "watch",
            UiModeType::VrHeadset => "vr_headset",
        }
    }
}

impl std::fmt::Display for UiModeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Device configuration as broadcast by a [`ConfigurationController`](crate::ConfigurationController)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Configuration {
    /// Raw UI mode bits (type in the low nibble)
    pub ui_mode: u32,
}

impl Configuration {
    pub fn new(ui_mode: u32) -> Self {
        Self { ui_mode }
    }

    /// Configuration whose UI mode type is `mode`, with no other mode bits set
    pub fn with_ui_mode_type(mode: UiModeType) -> Self {
        Self { ui_mode: mode.as_raw() }
    }

    /// The UI mode type, masked out of the raw bits
    pub fn ui_mode_type(&self) -> UiModeType {
        UiModeType::from_raw(self.ui_mode)
    }
}

/// Handle to the environment a value was created in
///
/// Extensions hand out either the context of the plugin that currently
/// provides their value, or the default context they were created with.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Context {
    /// Package the context belongs to
    pub package_name: String,
    /// Device configuration at the time the context was created
    #[serde(default)]
    pub configuration: Configuration,
}

impl Context {
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            configuration: Configuration::default(),
        }
    }

    /// Set the configuration
    pub fn with_configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = configuration;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ui_mode_type_masks_extra_bits() {
        // 0x20 is the "night yes" bit, it must not affect the type
        assert_eq!(UiModeType::from_raw(0x23), UiModeType::Car);
        assert_eq!(UiModeType::from_raw(0x11), UiModeType::Normal);
        assert_eq!(UiModeType::from_raw(0x0f), UiModeType::Undefined);
    }

    #[test]
    fn test_ui_mode_type_raw_roundtrip() {
        for raw in 0..=7 {
            assert_eq!(UiModeType::from_raw(raw).as_raw(), raw);
        }
    }

    #[test]
    fn test_configuration_ui_mode_type() {
        let config = Configuration::new(0x34);
        assert_eq!(config.ui_mode_type(), UiModeType::Television);

        let config = Configuration::with_ui_mode_type(UiModeType::Desk);
        assert_eq!(config.ui_mode, 2);
    }

    #[test]
    fn test_context_builder() {
        let ctx = Context::new("com.example.systemui")
            .with_configuration(Configuration::with_ui_mode_type(UiModeType::Watch));
        assert_eq!(ctx.package_name, "com.example.systemui");
        assert_eq!(ctx.configuration.ui_mode_type(), UiModeType::Watch);
    }

    #[test]
    fn test_ui_mode_type_serde() {
        let json = serde_json::to_string(&UiModeType::VrHeadset).unwrap();
        assert_eq!(json, "\"vr_headset\"");
        assert_eq!(UiModeType::VrHeadset.to_string(), "vr_headset");
    }
}
