//! Language tags and month-index display formatting

use chrono::Month;
use serde::{Deserialize, Serialize};

/// Supported display languages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

impl Language {
    /// Normalize a raw language tag (`es`, `ES`, `es-MX`, ...); unknown → `En`
    pub fn normalize(raw: Option<&str>) -> Self {
        let tag = raw.unwrap_or_default().trim().to_ascii_lowercase();
        match tag.split(['-', '_']).next() {
            Some("es") => Language::Es,
            _ => Language::En,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }
}

/// Month name length
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthStyle {
    Short,
    #[default]
    Long,
}

/// Options for [`format_month_index`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthFormat {
    pub style: MonthStyle,
    pub with_prefix_dash: bool,
}

impl MonthFormat {
    pub fn long() -> Self {
        Self::default()
    }

    pub fn short() -> Self {
        Self {
            style: MonthStyle::Short,
            with_prefix_dash: false,
        }
    }

    pub fn with_prefix_dash(mut self) -> Self {
        self.with_prefix_dash = true;
        self
    }
}

const SPANISH_MONTHS: [&str; 12] = [
    "enero", "febrero", "marzo", "abril", "mayo", "junio",
    "julio", "agosto", "septiembre", "octubre", "noviembre", "diciembre",
];

fn month_name(month0: u32, language: Language, style: MonthStyle) -> String {
    let name: String = match language {
        Language::En => Month::try_from(month0 as u8 + 1)
            .map(|m| m.name().to_string())
            .unwrap_or_default(),
        Language::Es => SPANISH_MONTHS[month0 as usize].to_string(),
    };
    match style {
        MonthStyle::Long => name,
        MonthStyle::Short => name.chars().take(3).collect(),
    }
}

/// Display string for a 0-based month index, relative to year 0.
///
/// Indices outside 0..12 roll into adjacent years (negative ones backwards).
/// Non-finite indices produce an empty string.
pub fn format_month_index(month_index: f64, language: Language, format: MonthFormat) -> String {
    if !month_index.is_finite() {
        return String::new();
    }
    let index = month_index.floor() as i64;
    let month0 = index.rem_euclid(12) as u32;
    let year = index.div_euclid(12);

    let label = format!("{} {}", month_name(month0, language, format.style), year);
    if format.with_prefix_dash {
        format!("- {label}")
    } else {
        label
    }
}
