//! The fixed device set.
//!
//! The store holds exactly one record per device in this set. Names are
//! immutable; the Cyrillic label from the reference build is the database
//! key, while the CLI also accepts an ASCII slug for convenience.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::DkError;

/// One of the fixed devices tracked by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceName {
    /// Камеры
    #[value(alias = "Камеры")]
    Cameras,
    /// Микроконтроллера
    #[value(alias = "Микроконтроллера")]
    Microcontroller,
    /// Датчик движения
    #[value(alias = "Датчик движения")]
    MotionSensor,
    /// Термометр
    #[value(alias = "Термометр")]
    Thermometer,
}

impl DeviceName {
    /// Every device in the fixed set, in display order.
    pub const ALL: [Self; 4] = [
        Self::Cameras,
        Self::Microcontroller,
        Self::MotionSensor,
        Self::Thermometer,
    ];

    /// Canonical label, used as the database key.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cameras => "Камеры",
            Self::Microcontroller => "Микроконтроллера",
            Self::MotionSensor => "Датчик движения",
            Self::Thermometer => "Термометр",
        }
    }

    /// ASCII slug accepted on the command line.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Cameras => "cameras",
            Self::Microcontroller => "microcontroller",
            Self::MotionSensor => "motion-sensor",
            Self::Thermometer => "thermometer",
        }
    }

    /// Built-in default description, restored by `reset_text` and seeded
    /// into every new row.
    #[must_use]
    pub const fn default_text(self) -> &'static str {
        match self {
            Self::Cameras => {
                "Характеристики камер:\n• Разрешение\n• Фокусное расстояние\n• Чувствительность"
            }
            Self::Microcontroller => {
                "Характеристики микроконтроллера:\n• Архитектура\n• Частота\n• Память"
            }
            Self::MotionSensor => {
                "Характеристики датчика:\n• Дальность\n• Угол обзора\n• Чувствительность"
            }
            Self::Thermometer => {
                "Характеристики термометра:\n• Диапазон\n• Точность\n• Время отклика"
            }
        }
    }

    /// Looks up a device by its database key (the canonical label).
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.label() == label)
    }
}

impl FromStr for DeviceName {
    type Err = DkError;

    /// Accepts the canonical label or the ASCII slug.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.label() == s || d.slug() == s)
            .ok_or_else(|| DkError::UnknownDevice {
                name: s.to_string(),
            })
    }
}

impl fmt::Display for DeviceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
