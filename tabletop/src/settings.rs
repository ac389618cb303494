//! Table settings and feel-tuning constants.
//!
//! Settings arrive from the host as an opaque, possibly partial or malformed
//! JSON record. Each field is read, defaulted and clamped independently, so
//! one bad field never discards the rest.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::{
    geometry::{Size, TableShape},
    perimeter::{evenly_spaced, normalize_param},
};

pub const MIN_SEATS: usize = 1;
pub const MAX_SEATS: usize = 8;
pub const DEFAULT_SEATS: usize = 4;
pub const MIN_DECKS: usize = 1;
pub const MAX_DECKS: usize = 8;
pub const MIN_DISPLAY_SCALE: f32 = 0.5;
pub const MAX_DISPLAY_SCALE: f32 = 2.0;
const MAX_STYLE_LENGTH: usize = 32;
/// Upper bound for the slide loop counts in [`Tuning`].
pub const MAX_SLIDE_COUNT: usize = 64;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutPreset {
    #[default]
    Standard,
    Solitaire,
    Grid,
}

impl LayoutPreset {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" | "default" => Some(Self::Standard),
            "solitaire" | "klondike" => Some(Self::Solitaire),
            "grid" => Some(Self::Grid),
            _ => None,
        }
    }
}

impl fmt::Display for LayoutPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutPreset::Standard => write!(f, "standard"),
            LayoutPreset::Solitaire => write!(f, "solitaire"),
            LayoutPreset::Grid => write!(f, "grid"),
        }
    }
}

/// Persisted table settings.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct TableSettings {
    pub shape: TableShape,
    pub seat_count: usize,
    /// One perimeter parameter per seat, each in `[0, 1)`.
    pub seat_params: Vec<f32>,
    pub deck_count: usize,
    pub include_jokers: bool,
    pub preset: LayoutPreset,
    pub reset_face_down: bool,
    /// Presentation only; the core passes it through untouched.
    pub visual_style: String,
    pub display_scale: f32,
    pub tuning: Tuning,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            shape: TableShape::Rectangle,
            seat_count: DEFAULT_SEATS,
            seat_params: evenly_spaced(DEFAULT_SEATS),
            deck_count: 1,
            include_jokers: false,
            preset: LayoutPreset::Standard,
            reset_face_down: true,
            visual_style: "classic".to_string(),
            display_scale: 1.0,
            tuning: Tuning::default(),
        }
    }
}

impl TableSettings {
    /// Parse settings text. Unparseable text yields the defaults.
    #[must_use]
    pub fn from_json_str(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(record) => Self::from_record(&record),
            Err(e) => {
                log::warn!("Settings are not valid JSON, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Build settings from an opaque record, defaulting field by field.
    #[must_use]
    pub fn from_record(record: &Value) -> Self {
        let defaults = Self::default();
        let Some(record) = record.as_object() else {
            log::warn!("Settings record is not an object, using defaults");
            return defaults;
        };

        let shape = read_str(record, "table_shape")
            .and_then(|s| TableShape::parse(&s))
            .unwrap_or(defaults.shape);
        let seat_count = read_number(record, "seat_count")
            .map(|n| (n.round().max(0.0) as usize).clamp(MIN_SEATS, MAX_SEATS))
            .unwrap_or(defaults.seat_count);
        let seat_params = read_params(record, "seat_params", seat_count)
            .unwrap_or_else(|| evenly_spaced(seat_count));
        let deck_count = read_number(record, "deck_count")
            .map(|n| (n.round().max(0.0) as usize).clamp(MIN_DECKS, MAX_DECKS))
            .unwrap_or(defaults.deck_count);
        let include_jokers = read_bool(record, "jokers").unwrap_or(defaults.include_jokers);
        let preset = read_str(record, "preset")
            .and_then(|s| LayoutPreset::parse(&s))
            .unwrap_or(defaults.preset);
        let reset_face_down =
            read_bool(record, "reset_face_down").unwrap_or(defaults.reset_face_down);
        let visual_style = read_str(record, "visual_style")
            .map(|s| s.trim().chars().take(MAX_STYLE_LENGTH).collect::<String>())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.visual_style);
        let display_scale = read_number(record, "display_scale")
            .map(|n| (n as f32).clamp(MIN_DISPLAY_SCALE, MAX_DISPLAY_SCALE))
            .unwrap_or(defaults.display_scale);
        let tuning = record
            .get("tuning")
            .map(Tuning::from_record)
            .unwrap_or(defaults.tuning);

        Self {
            shape,
            seat_count,
            seat_params,
            deck_count,
            include_jokers,
            preset,
            reset_face_down,
            visual_style,
            display_scale,
            tuning,
        }
    }
}

/// Pixel and timing constants that shape how gestures feel.
///
/// Only their structural role matters; the magnitudes are configuration.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Tuning {
    pub card_width: f32,
    pub card_height: f32,
    /// Gap between side-by-side stacks in the built layouts.
    pub stack_gap_px: f32,
    /// Pointer travel that turns a press into a drag.
    pub drag_threshold_px: f32,
    /// How long the secondary button must stay down before a slide starts.
    pub hold_delay_ms: f64,
    /// Pointer travel that starts a slide before the delay elapses.
    pub slide_start_px: f32,
    /// Travel between consecutive peels while sliding.
    pub slide_spacing_px: f32,
    pub slide_jitter_px: f32,
    pub slide_min_separation_px: f32,
    pub slide_max_attempts: usize,
    pub slide_max_peels_per_event: usize,
    /// Minimum arc length between neighbouring seats.
    pub min_seat_gap_px: f32,
    pub hand_zone_width: f32,
    pub hand_zone_height: f32,
    /// How far inside the boundary a seat's hand zone is centered.
    pub hand_zone_inset_px: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            card_width: 70.0,
            card_height: 98.0,
            stack_gap_px: 24.0,
            drag_threshold_px: 5.0,
            hold_delay_ms: 220.0,
            slide_start_px: 8.0,
            slide_spacing_px: 34.0,
            slide_jitter_px: 4.0,
            slide_min_separation_px: 22.0,
            slide_max_attempts: 6,
            slide_max_peels_per_event: 4,
            min_seat_gap_px: 90.0,
            hand_zone_width: 260.0,
            hand_zone_height: 120.0,
            hand_zone_inset_px: 70.0,
        }
    }
}

impl Tuning {
    #[must_use]
    pub fn footprint(&self) -> Size {
        Size::new(self.card_width, self.card_height)
    }

    #[must_use]
    pub fn hand_zone(&self) -> Size {
        Size::new(self.hand_zone_width, self.hand_zone_height)
    }

    /// Read tuning overrides; anything missing, negative or non-numeric
    /// keeps its default.
    #[must_use]
    pub fn from_record(record: &Value) -> Self {
        let mut tuning = Self::default();
        let Some(record) = record.as_object() else {
            return tuning;
        };
        let positive = |key: &str, fallback: f32| -> f32 {
            read_number(record, key)
                .map(|n| n as f32)
                .filter(|n| *n > 0.0 && n.is_finite())
                .unwrap_or(fallback)
        };
        let non_negative = |key: &str, fallback: f32| -> f32 {
            read_number(record, key)
                .map(|n| n as f32)
                .filter(|n| *n >= 0.0 && n.is_finite())
                .unwrap_or(fallback)
        };
        let count = |key: &str, fallback: usize| -> usize {
            read_number(record, key)
                .filter(|n| *n >= 1.0)
                .map(|n| (n.round() as usize).min(MAX_SLIDE_COUNT))
                .unwrap_or(fallback)
        };

        tuning.card_width = positive("card_width", tuning.card_width);
        tuning.card_height = positive("card_height", tuning.card_height);
        tuning.stack_gap_px = non_negative("stack_gap_px", tuning.stack_gap_px);
        tuning.drag_threshold_px = non_negative("drag_threshold_px", tuning.drag_threshold_px);
        tuning.hold_delay_ms = read_number(record, "hold_delay_ms")
            .filter(|n| *n >= 0.0 && n.is_finite())
            .unwrap_or(tuning.hold_delay_ms);
        tuning.slide_start_px = non_negative("slide_start_px", tuning.slide_start_px);
        tuning.slide_spacing_px = positive("slide_spacing_px", tuning.slide_spacing_px);
        tuning.slide_jitter_px = non_negative("slide_jitter_px", tuning.slide_jitter_px);
        tuning.slide_min_separation_px =
            non_negative("slide_min_separation_px", tuning.slide_min_separation_px);
        tuning.slide_max_attempts = count("slide_max_attempts", tuning.slide_max_attempts);
        tuning.slide_max_peels_per_event =
            count("slide_max_peels_per_event", tuning.slide_max_peels_per_event);
        tuning.min_seat_gap_px = non_negative("min_seat_gap_px", tuning.min_seat_gap_px);
        tuning.hand_zone_width = positive("hand_zone_width", tuning.hand_zone_width);
        tuning.hand_zone_height = positive("hand_zone_height", tuning.hand_zone_height);
        tuning.hand_zone_inset_px = non_negative("hand_zone_inset_px", tuning.hand_zone_inset_px);
        tuning
    }
}

fn read_number(record: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = match record.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match value {
        Some(n) if n.is_finite() => Some(n),
        _ => {
            log::warn!("Ignoring malformed settings field `{key}`");
            None
        }
    }
}

fn read_bool(record: &Map<String, Value>, key: &str) -> Option<bool> {
    let value = match record.get(key)? {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    };
    if value.is_none() {
        log::warn!("Ignoring malformed settings field `{key}`");
    }
    value
}

fn read_str(record: &Map<String, Value>, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.clone()),
        _ => {
            log::warn!("Ignoring malformed settings field `{key}`");
            None
        }
    }
}

fn read_params(record: &Map<String, Value>, key: &str, seat_count: usize) -> Option<Vec<f32>> {
    let values = record.get(key)?.as_array()?;
    if values.len() != seat_count {
        log::warn!(
            "Settings field `{key}` has {} entries for {seat_count} seats, respacing",
            values.len()
        );
        return None;
    }
    values
        .iter()
        .map(|v| v.as_f64().filter(|n| n.is_finite()).map(|n| normalize_param(n as f32)))
        .collect()
}
