//! Element and preset records for the overlay timer's `~Lv2~` import format.
//!
//! Field order of the structs below is the serialized key order. Optional keys
//! are skipped when absent, so the same struct covers both the "self" layout and
//! the placeholder-target layout.

use crate::utils::{fixed1_token, format_js_number, to_fixed1};
use crate::{build_countdown_values, round1, CountdownStep};
use log::{debug, info};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::value::RawValue;
use std::fmt;

/// Literal marker the overlay tool expects in front of an imported preset.
pub const EXPORT_PREFIX: &str = "~Lv2~";

/// Element colors (ABGR)
pub mod colors {
    pub const BACKGROUND: u32 = 3355443200;
    pub const GREEN: u32 = 3355508480;
    pub const YELLOW: u32 = 3355508735;
    pub const RED: u32 = 3355443455;
}

const ELEMENT_TYPE: u8 = 1;
const FILL_INTENSITY: f64 = 0.5;
const REF_ACTOR_TYPE_SELF: u8 = 1;
const COMPARISON_TYPE_PLACEHOLDER: u8 = 5;

/// Number written with exactly one decimal place (`0` becomes `0.0`), unless a
/// browser would print it in exponent form (`1e-7`, `1e+21`).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Fixed1(pub f64);

impl Serialize for Fixed1 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = RawValue::from_string(fixed1_token(self.0)).map_err(serde::ser::Error::custom)?;
        raw.serialize(serializer)
    }
}

/// Number written the way a browser's JSON encoder writes it (`1122`, `1.5`, `1e-7`).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct JsNumber(pub f64);

impl Serialize for JsNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw =
            RawValue::from_string(format_js_number(self.0)).map_err(serde::ser::Error::custom)?;
        raw.serialize(serializer)
    }
}

/// Which actors the element tracks the status on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TargetSelection {
    #[default]
    SelfTarget,
    Party,
    PartyFirst,
    TanksOnly,
    HealersOnly,
    TanksAndHealers,
    DpsPair,
    DpsAll,
}

impl TargetSelection {
    pub const ALL: [TargetSelection; 8] = [
        TargetSelection::SelfTarget,
        TargetSelection::Party,
        TargetSelection::PartyFirst,
        TargetSelection::TanksOnly,
        TargetSelection::HealersOnly,
        TargetSelection::TanksAndHealers,
        TargetSelection::DpsPair,
        TargetSelection::DpsAll,
    ];

    /// Form option value.
    pub fn value(self) -> &'static str {
        match self {
            TargetSelection::SelfTarget => "self",
            TargetSelection::Party => "1-8",
            TargetSelection::PartyFirst => "1",
            TargetSelection::TanksOnly => "t1t2",
            TargetSelection::HealersOnly => "h1h2",
            TargetSelection::TanksAndHealers => "t1t2h1h2",
            TargetSelection::DpsPair => "d1d2",
            TargetSelection::DpsAll => "d1d2d3d4",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TargetSelection::SelfTarget => "Self",
            TargetSelection::Party => "Party <1> - <8>",
            TargetSelection::PartyFirst => "Party <1>",
            TargetSelection::TanksOnly => "Tanks <t1> <t2>",
            TargetSelection::HealersOnly => "Healers <h1> <h2>",
            TargetSelection::TanksAndHealers => "Tanks & healers <t1> <t2> <h1> <h2>",
            TargetSelection::DpsPair => "DPS <d1> <d2>",
            TargetSelection::DpsAll => "DPS <d1> - <d4>",
        }
    }

    /// Unknown values select `SelfTarget`.
    pub fn from_value(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.value() == value.trim())
            .unwrap_or_default()
    }

    /// Placeholder tokens substituted by the overlay tool; `None` for self.
    pub fn placeholders(self) -> Option<&'static [&'static str]> {
        match self {
            TargetSelection::SelfTarget => None,
            TargetSelection::Party => Some(&[
                "<1>", "<2>", "<3>", "<4>", "<5>", "<6>", "<7>", "<8>",
            ]),
            TargetSelection::PartyFirst => Some(&["<1>"]),
            TargetSelection::TanksOnly => Some(&["<t1>", "<t2>"]),
            TargetSelection::HealersOnly => Some(&["<h1>", "<h2>"]),
            TargetSelection::TanksAndHealers => Some(&["<t1>", "<t2>", "<h1>", "<h2>"]),
            TargetSelection::DpsPair => Some(&["<d1>", "<d2>"]),
            TargetSelection::DpsAll => Some(&["<d1>", "<d2>", "<d3>", "<d4>"]),
        }
    }
}

/// One countdown marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: u8,
    pub radius: Fixed1,
    #[serde(rename = "Filled")]
    pub filled: bool,
    pub fill_intensity: f64,
    #[serde(rename = "overlayBGColor")]
    pub overlay_bg_color: u32,
    pub overlay_text_color: u32,
    pub overlay_v_offset: Fixed1,
    pub overlay_f_scale: Fixed1,
    pub thicc: Fixed1,
    pub overlay_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_actor_placeholder: Option<Vec<String>>,
    pub ref_actor_require_buff: bool,
    pub ref_actor_buff_id: Vec<JsNumber>,
    pub ref_actor_use_buff_time: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_actor_type: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_actor_buff_time_min: Option<Fixed1>,
    pub ref_actor_buff_time_max: Fixed1,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_actor_comparison_type: Option<u8>,
}

/// Top-level preset imported by the overlay tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Group")]
    pub group: String,
    #[serde(rename = "ZoneLockH")]
    pub zone_lock: Vec<JsNumber>,
    #[serde(rename = "ElementsL")]
    pub elements: Vec<ElementRecord>,
}

/// Validated form values for one generate action.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetRequest {
    pub preset_name: String,
    pub group_name: String,
    pub zone_id: f64,
    pub status_id: f64,
    pub start_seconds: i64,
    pub sub_second_threshold: Option<i64>,
    pub overlay_v_offset: f64,
    pub overlay_f_scale: f64,
    pub target: TargetSelection,
}

/// Green above 2s, yellow above 1s, red for the last second.
pub fn overlay_color_for(value: f64) -> u32 {
    if value > 2.0 {
        colors::GREEN
    } else if value > 1.0 {
        colors::YELLOW
    } else {
        colors::RED
    }
}

/// Label shown for a countdown value: `"3"` for whole seconds, `"2.9"` otherwise.
pub fn display_name(step: &CountdownStep) -> String {
    if step.is_whole_value() {
        format!("{}", step.value.round() as i64)
    } else {
        to_fixed1(step.value)
    }
}

/// Build the element for one countdown step.
///
/// An empty placeholder list is treated like `None` (self target).
pub fn build_element(
    step: &CountdownStep,
    status_id: f64,
    overlay_v_offset: f64,
    overlay_f_scale: f64,
    placeholders: Option<&[&str]>,
) -> ElementRecord {
    let placeholders = placeholders.filter(|p| !p.is_empty());
    let is_self = placeholders.is_none();
    let name = display_name(step);

    let max = round1(step.value);
    let min = round1(step.value - step.granularity.as_f64());
    let ref_actor_buff_time_min = if min < 0.0 { None } else { Some(Fixed1(min)) };

    ElementRecord {
        overlay_text: name.clone(),
        name,
        kind: ELEMENT_TYPE,
        radius: Fixed1(0.0),
        filled: false,
        fill_intensity: FILL_INTENSITY,
        overlay_bg_color: colors::BACKGROUND,
        overlay_text_color: overlay_color_for(step.value),
        overlay_v_offset: Fixed1(overlay_v_offset),
        overlay_f_scale: Fixed1(overlay_f_scale),
        thicc: Fixed1(0.0),
        ref_actor_placeholder: placeholders.map(|p| p.iter().map(|s| s.to_string()).collect()),
        ref_actor_require_buff: true,
        ref_actor_buff_id: vec![JsNumber(status_id)],
        ref_actor_use_buff_time: true,
        ref_actor_type: is_self.then_some(REF_ACTOR_TYPE_SELF),
        ref_actor_buff_time_min,
        ref_actor_buff_time_max: Fixed1(max),
        ref_actor_comparison_type: (!is_self).then_some(COMPARISON_TYPE_PLACEHOLDER),
    }
}

/// Assemble the preset for a validated request.
pub fn build_preset(request: &PresetRequest) -> PresetRecord {
    let steps = build_countdown_values(request.start_seconds, request.sub_second_threshold);
    let placeholders = request.target.placeholders();
    let elements = steps
        .iter()
        .map(|step| {
            build_element(
                step,
                request.status_id,
                request.overlay_v_offset,
                request.overlay_f_scale,
                placeholders,
            )
        })
        .collect();

    PresetRecord {
        name: request.preset_name.clone(),
        group: request.group_name.clone(),
        zone_lock: vec![JsNumber(request.zone_id)],
        elements,
    }
}

/// Minified JSON with the `~Lv2~` marker in front.
pub fn encode_preset(preset: &PresetRecord) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(preset)?;
    Ok(format!("{}{}", EXPORT_PREFIX, json))
}

/// Build and encode in one step.
pub fn generate(request: &PresetRequest) -> Result<String, serde_json::Error> {
    let preset = build_preset(request);
    let encoded = encode_preset(&preset)?;
    info!(
        "Generated preset '{}' with {} elements ({} bytes)",
        preset.name,
        preset.elements.len(),
        encoded.len()
    );
    Ok(encoded)
}

#[derive(Debug)]
pub enum DecodeError {
    MissingPrefix,
    Malformed(serde_json::Error),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::MissingPrefix => {
                write!(f, "Text does not start with {}", EXPORT_PREFIX)
            }
            DecodeError::Malformed(e) => write!(f, "Preset body is not valid: {}", e),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::MissingPrefix => None,
            DecodeError::Malformed(e) => Some(e),
        }
    }
}

/// Parse an exported string back into a preset.
pub fn decode_preset(text: &str) -> Result<PresetRecord, DecodeError> {
    let body = text
        .trim()
        .strip_prefix(EXPORT_PREFIX)
        .ok_or(DecodeError::MissingPrefix)?;
    let preset: PresetRecord = serde_json::from_str(body).map_err(DecodeError::Malformed)?;
    debug!("Decoded preset '{}' ({} elements)", preset.name, preset.elements.len());
    Ok(preset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn keys(element: &ElementRecord) -> Vec<String> {
        // serde_json::Value sorts keys, so read them from the text instead
        let json = serde_json::to_string(element).unwrap();
        let map: serde_json::Map<String, Value> = serde_json::from_str(&json).unwrap();
        let mut found: Vec<(usize, String)> = map
            .keys()
            .map(|k| (json.find(&format!("\"{}\":", k)).unwrap(), k.clone()))
            .collect();
        found.sort();
        found.into_iter().map(|(_, k)| k).collect()
    }

    #[test]
    fn self_element_field_order() {
        let element = build_element(&CountdownStep::whole(3.0), 1234.0, 2.0, 1.5, None);
        assert_eq!(
            keys(&element),
            vec![
                "Name",
                "type",
                "radius",
                "Filled",
                "fillIntensity",
                "overlayBGColor",
                "overlayTextColor",
                "overlayVOffset",
                "overlayFScale",
                "thicc",
                "overlayText",
                "refActorRequireBuff",
                "refActorBuffId",
                "refActorUseBuffTime",
                "refActorType",
                "refActorBuffTimeMin",
                "refActorBuffTimeMax",
            ]
        );
    }

    #[test]
    fn placeholder_element_field_order() {
        let element = build_element(
            &CountdownStep::whole(3.0),
            1234.0,
            2.0,
            1.5,
            TargetSelection::TanksOnly.placeholders(),
        );
        assert_eq!(
            keys(&element),
            vec![
                "Name",
                "type",
                "radius",
                "Filled",
                "fillIntensity",
                "overlayBGColor",
                "overlayTextColor",
                "overlayVOffset",
                "overlayFScale",
                "thicc",
                "overlayText",
                "refActorPlaceholder",
                "refActorRequireBuff",
                "refActorBuffId",
                "refActorUseBuffTime",
                "refActorBuffTimeMin",
                "refActorBuffTimeMax",
                "refActorComparisonType",
            ]
        );
        assert_eq!(
            element.ref_actor_placeholder,
            Some(vec!["<t1>".to_string(), "<t2>".to_string()])
        );
        assert_eq!(element.ref_actor_type, None);
        assert_eq!(element.ref_actor_comparison_type, Some(5));
    }

    #[test]
    fn empty_placeholder_list_counts_as_self() {
        let element = build_element(&CountdownStep::whole(1.0), 1.0, 0.0, 1.0, Some(&[]));
        assert_eq!(element.ref_actor_placeholder, None);
        assert_eq!(element.ref_actor_type, Some(1));
        assert_eq!(element.ref_actor_comparison_type, None);
    }

    #[test]
    fn negative_lower_bound_drops_min_field() {
        let element = build_element(&CountdownStep::whole(0.5), 1.0, 0.0, 1.0, None);
        assert_eq!(element.ref_actor_buff_time_min, None);
        assert_eq!(element.ref_actor_buff_time_max, Fixed1(0.5));
        let json = serde_json::to_string(&element).unwrap();
        assert!(!json.contains("refActorBuffTimeMin"));
        assert!(json.contains("\"refActorBuffTimeMax\":0.5"));
    }

    #[test]
    fn zero_lower_bound_keeps_min_field() {
        let element = build_element(&CountdownStep::tenth(0.1), 1.0, 0.0, 1.0, None);
        assert_eq!(element.ref_actor_buff_time_min, Some(Fixed1(0.0)));
        let json = serde_json::to_string(&element).unwrap();
        assert!(json.contains("\"refActorBuffTimeMin\":0.0,\"refActorBuffTimeMax\":0.1"));
    }

    #[test]
    fn names_and_colors_follow_value() {
        let green = build_element(&CountdownStep::whole(3.0), 1.0, 0.0, 1.0, None);
        assert_eq!(green.name, "3");
        assert_eq!(green.overlay_text, "3");
        assert_eq!(green.overlay_text_color, colors::GREEN);

        let yellow = build_element(&CountdownStep::tenth(1.5), 1.0, 0.0, 1.0, None);
        assert_eq!(yellow.name, "1.5");
        assert_eq!(yellow.overlay_text_color, colors::YELLOW);

        let edge = build_element(&CountdownStep::whole(2.0), 1.0, 0.0, 1.0, None);
        assert_eq!(edge.overlay_text_color, colors::YELLOW);

        let red = build_element(&CountdownStep::tenth(1.0), 1.0, 0.0, 1.0, None);
        assert_eq!(red.name, "1");
        assert_eq!(red.overlay_text_color, colors::RED);
    }

    #[test]
    fn fixed_fields_use_one_decimal() {
        let element = build_element(&CountdownStep::whole(3.0), 1234.0, 2.0, 1.25, None);
        let json = serde_json::to_string(&element).unwrap();
        assert!(json.contains("\"radius\":0.0,"));
        assert!(json.contains("\"fillIntensity\":0.5,"));
        assert!(json.contains("\"overlayVOffset\":2.0,"));
        assert!(json.contains("\"overlayFScale\":1.3,"));
        assert!(json.contains("\"thicc\":0.0,"));
        assert!(json.contains("\"refActorBuffId\":[1234],"));
        assert!(json.contains("\"refActorBuffTimeMin\":2.0,\"refActorBuffTimeMax\":3.0"));
    }

    #[test]
    fn exponent_numbers_keep_browser_notation() {
        let element = build_element(&CountdownStep::whole(3.0), 1e-7, 1e-7, 1e21, None);
        let json = serde_json::to_string(&element).unwrap();
        assert!(json.contains("\"overlayVOffset\":1e-7,\"overlayFScale\":1e+21,"));
        assert!(json.contains("\"refActorBuffId\":[1e-7],"));

        let back: ElementRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, element);
    }

    #[test]
    fn non_finite_number_fails_to_encode() {
        let element = build_element(&CountdownStep::whole(3.0), 1.0, f64::NAN, 1.0, None);
        assert!(serde_json::to_string(&element).is_err());
    }

    #[test]
    fn target_selection_values_round_trip() {
        for target in TargetSelection::ALL {
            assert_eq!(TargetSelection::from_value(target.value()), target);
        }
        assert_eq!(TargetSelection::from_value(""), TargetSelection::SelfTarget);
        assert_eq!(TargetSelection::Party.placeholders().map(|p| p.len()), Some(8));
        assert_eq!(TargetSelection::PartyFirst.placeholders(), Some(&["<1>"][..]));
        assert_eq!(TargetSelection::SelfTarget.placeholders(), None);
    }

    #[test]
    fn decode_rejects_missing_prefix() {
        assert!(matches!(
            decode_preset("{\"Name\":\"x\"}"),
            Err(DecodeError::MissingPrefix)
        ));
        assert!(matches!(
            decode_preset("~Lv2~{not json"),
            Err(DecodeError::Malformed(_))
        ));
    }
}
