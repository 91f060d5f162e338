//! Insight composition.
//!
//! `compose` turns one raw [`ClassifierResponse`] into the immutable,
//! display-ready [`ScanInsight`] the surface renders. It is a pure
//! function: no I/O, no clock, no randomness. Composing the same
//! response twice yields structurally identical insights, which lets
//! the surface re-derive state from cache instead of re-fetching.

use serde::Serialize;

use crate::classify::ClassifierResponse;
use crate::guard;
use crate::material;

/// The fully composed result of classifying one captured item.
///
/// Created once per successful classification, owned by the lifecycle
/// while in `Result`, discarded on rescan.
///
/// Invariants: `confidence_percent` is 0..=100; `co2_impact_label` and
/// `carbon_footprint` never contain "NaN" or a negative quantity.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScanInsight {
    pub display_item_name: String,
    pub recyclable: bool,
    pub confidence_percent: u8,
    pub co2_impact_label: String,
    pub carbon_footprint: String,
    pub material_label: String,
    pub summary: String,
    pub steps_text: String,
    pub center_prompt: String,
    pub callout_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<[f64; 4]>,
    pub used_fallback_model: bool,
}

const GENERIC_CENTER_PROMPT: &str =
    "Open the EcoSort guide to see nearby recycling and drop-off locations.";

/// Compose a display-ready insight from a raw service response.
///
/// Unmatched item types degrade to generic copy around the title-cased
/// raw name; malformed numerics are coerced by the guards. This never
/// fails: a partially broken response still produces a renderable
/// insight.
pub fn compose(response: &ClassifierResponse) -> ScanInsight {
    let display_item_name = material::format_item_name(&response.item_type);
    let profile = material::classify(&response.item_type);
    let label = profile
        .map(|p| p.label.to_string())
        .unwrap_or_else(|| display_item_name.clone());

    let recyclable = response.recyclable;
    let impact = guard::sanitize_impact(response.co2_impact);

    let summary = match profile {
        Some(p) if recyclable => p.recyclable_summary.to_string(),
        Some(p) => p.non_recyclable_summary.to_string(),
        None if recyclable => format!("{label} can be recycled after a quick clean."),
        None => format!("{label} needs special handling to stay out of recycling bins."),
    };

    let steps_text = match profile {
        Some(p) if recyclable => p.recycle_steps.to_string(),
        Some(p) => p.dispose_steps.to_string(),
        None if recyclable => format!(
            "Clean the {} and place it with your recyclables.",
            display_item_name.to_lowercase()
        ),
        None => format!(
            "Dispose of the {} according to local guidance.",
            display_item_name.to_lowercase()
        ),
    };

    let center_prompt = profile
        .map(|p| p.center_prompt.to_string())
        .unwrap_or_else(|| GENERIC_CENTER_PROMPT.to_string());

    let callout_text = if recyclable {
        format!("{label} ready to recycle")
    } else {
        format!("{label} needs special handling")
    };

    ScanInsight {
        display_item_name,
        recyclable,
        confidence_percent: guard::sanitize_confidence(response.confidence),
        co2_impact_label: guard::impact_label(impact, recyclable),
        carbon_footprint: guard::footprint_label(impact),
        material_label: label,
        summary,
        steps_text,
        center_prompt,
        callout_text,
        bounding_box: promote_bbox(response.bbox.as_deref()),
        used_fallback_model: response.fallback_model,
    }
}

/// A wire bbox is usable only when it carries at least four values.
fn promote_bbox(bbox: Option<&[f64]>) -> Option<[f64; 4]> {
    match bbox {
        Some([x1, y1, x2, y2, ..]) => Some([*x1, *y1, *x2, *y2]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(item_type: &str, recyclable: bool) -> ClassifierResponse {
        ClassifierResponse {
            item_type: item_type.to_string(),
            confidence: 0.91,
            recyclable,
            co2_impact: 0.3,
            bbox: None,
            fallback_model: false,
            image_path: None,
        }
    }

    #[test]
    fn known_material_uses_profile_copy() {
        let insight = compose(&response("plastic_bottle", true));
        assert_eq!(insight.display_item_name, "Plastic Bottle");
        assert_eq!(insight.material_label, "Plastic packaging");
        assert_eq!(insight.callout_text, "Plastic packaging ready to recycle");
        assert!(insight.summary.contains("widely accepted curbside"));
        assert!(insight.steps_text.contains("Rinse the plastic"));
        assert_eq!(insight.confidence_percent, 91);
    }

    #[test]
    fn non_recyclable_branch_selects_disposal_copy() {
        let insight = compose(&response("plastic clamshell", false));
        assert!(insight.summary.contains("stay out of the recycling bin"));
        assert!(insight.steps_text.contains("Bag it with household waste"));
        assert_eq!(
            insight.callout_text,
            "Plastic packaging needs special handling"
        );
    }

    #[test]
    fn unknown_material_still_yields_usable_guidance() {
        let insight = compose(&response("unknown-alien-material", true));
        assert_eq!(insight.display_item_name, "Unknown Alien Material");
        assert_eq!(insight.material_label, "Unknown Alien Material");
        assert!(!insight.summary.is_empty());
        assert!(!insight.steps_text.is_empty());
        assert!(insight
            .steps_text
            .contains("Clean the unknown alien material"));
        assert_eq!(insight.center_prompt, GENERIC_CENTER_PROMPT);
    }

    #[test]
    fn compose_is_idempotent() {
        let mut r = response("glass jar", true);
        r.bbox = Some(vec![0.1, 0.2, 0.8, 0.9]);
        r.co2_impact = 1.234;
        assert_eq!(compose(&r), compose(&r));
    }

    #[test]
    fn malformed_numerics_are_coerced_not_fatal() {
        let mut r = response("tin can", false);
        r.confidence = f64::NAN;
        r.co2_impact = -3.0;
        let insight = compose(&r);
        assert_eq!(insight.confidence_percent, 0);
        assert_eq!(insight.co2_impact_label, "Dispose responsibly");
        assert_eq!(insight.carbon_footprint, "Trace CO₂ impact");
    }

    #[test]
    fn short_bbox_is_dropped_long_bbox_is_truncated() {
        let mut r = response("plastic bottle", true);
        r.bbox = Some(vec![0.1, 0.2, 0.3]);
        assert!(compose(&r).bounding_box.is_none());

        r.bbox = Some(vec![0.1, 0.2, 0.8, 0.9, 0.99]);
        assert_eq!(compose(&r).bounding_box, Some([0.1, 0.2, 0.8, 0.9]));
    }

    #[test]
    fn fallback_model_flag_is_carried() {
        let mut r = response("styrofoam tray", false);
        r.fallback_model = true;
        assert!(compose(&r).used_fallback_model);
    }
}
