//! Material rule engine.
//!
//! Maps a raw item-type string from the Classifier Service to a static
//! material profile via an ordered, case-insensitive pattern list.
//!
//! The list order is load-bearing: the first matching rule wins, and
//! several rules share keywords on purpose. Callers that get `None`
//! back must fall back to generic guidance (see `insight::compose`);
//! an unseen item type is never an error.

use std::sync::OnceLock;

use regex::Regex;

/// Static guidance record for one waste-material category.
///
/// Profiles are compiled once at first use and live for the process
/// lifetime. All copy is display-ready.
#[derive(Debug)]
pub struct MaterialProfile {
    pub pattern: Regex,
    pub label: &'static str,
    pub recyclable_summary: &'static str,
    pub non_recyclable_summary: &'static str,
    pub recycle_steps: &'static str,
    pub dispose_steps: &'static str,
    pub center_prompt: &'static str,
}

/// Ordered profile list. First match wins.
///
/// Overlap notes:
/// - "bottle" matches both Plastic and Glass; Plastic is first, so a
///   "plastic bottle" resolves to Plastic and a bare "bottle" does too.
/// - "can" appears only in the Metal rule, but "container" is claimed
///   by Plastic ahead of everything else.
/// E-waste sits after the packaging rules because its keywords are
/// distinct (battery, phone, cable, ...) and never collide with them.
fn profiles() -> &'static [MaterialProfile] {
    static PROFILES: OnceLock<Vec<MaterialProfile>> = OnceLock::new();
    PROFILES.get_or_init(|| {
        let rule = |pattern: &str| {
            // Patterns are static literals; a failure here is a build defect.
            Regex::new(&format!("(?i){pattern}")).expect("static material pattern")
        };
        vec![
            MaterialProfile {
                pattern: rule("(plastic|pet|hdpe|ldpe|poly|bottle|clamshell|cup|container)"),
                label: "Plastic packaging",
                recyclable_summary: "Plastic packaging detected. Clean PET and HDPE items are widely accepted curbside.",
                non_recyclable_summary: "Plastic packaging detected. This variant should stay out of the recycling bin to prevent contamination.",
                recycle_steps: "Rinse the plastic, remove films or caps, let it dry, and sort with plastics #1-2.",
                dispose_steps: "Bag it with household waste or use specialty drop-offs that accept mixed plastics.",
                center_prompt: "Check supermarket film-collection bins or municipal plastic drop-off depots.",
            },
            MaterialProfile {
                // "bottle" overlaps with Plastic above; Plastic wins on ambiguity.
                pattern: rule("(glass|bottle|jar)"),
                label: "Glass container",
                recyclable_summary: "Glass container detected. Rinsed bottles and jars can be recycled repeatedly.",
                non_recyclable_summary: "Glass detected. Tempered or treated glass needs a specialist drop-off site.",
                recycle_steps: "Remove lids, rinse thoroughly, and sort by color if your center requests it.",
                dispose_steps: "Wrap safely and take it to a civic amenity site or follow local disposal rules.",
                center_prompt: "Use local bottle banks or glass igloos for quick drop-off points.",
            },
            MaterialProfile {
                pattern: rule("(paper|cardboard|carton|box|newspaper|magazine)"),
                label: "Paper & cardboard",
                recyclable_summary: "Paper product detected. Keep it dry and flat for easy curbside recycling.",
                non_recyclable_summary: "Paper detected. Waxed or food-soiled paper should avoid the recycling stream.",
                recycle_steps: "Flatten boxes, remove tape, and stack clean paper together before recycling.",
                dispose_steps: "Place soiled paper in the trash or compost if accepted locally.",
                center_prompt: "Community recycling centers accept bundled cardboard and paper bales.",
            },
            MaterialProfile {
                pattern: rule("(metal|aluminum|steel|tin|can)"),
                label: "Metal packaging",
                recyclable_summary: "Metal packaging detected. Clean cans and lids recycle endlessly.",
                non_recyclable_summary: "Metal detected. Greasy or sharp metals need special handling.",
                recycle_steps: "Rinse cans, remove labels if possible, and crush lightly to save space.",
                dispose_steps: "Wrap sharp edges and take to scrap metal or household waste facilities.",
                center_prompt: "Drop cans at curbside bins or local scrap yards for redemption.",
            },
            MaterialProfile {
                pattern: rule("(battery|phone|laptop|electronic|cable|charger)"),
                label: "Electronic waste",
                recyclable_summary: "Electronic item detected. Route it through an e-waste program for safe recovery.",
                non_recyclable_summary: "Electronic item detected. Never place electronics in regular bins.",
                recycle_steps: "Store data securely, remove batteries, and take it to a certified e-waste center.",
                dispose_steps: "Bring it to municipal e-waste days or retailer take-back programs.",
                center_prompt: "Use EcoSort's finder to locate certified e-waste recycling partners.",
            },
            MaterialProfile {
                pattern: rule("(organic|food|compost|banana|apple|yard|garden|coffee|tea)"),
                label: "Organic material",
                recyclable_summary: "Organic material detected. Composting keeps nutrients in the cycle.",
                non_recyclable_summary: "Organic waste detected. Keep it separate from recyclables to avoid contamination.",
                recycle_steps: "Collect with other food scraps and place in a green/compost bin or backyard composter.",
                dispose_steps: "Seal and send with municipal organics or general waste if composting isn't available.",
                center_prompt: "Check community gardens or municipal composting programs nearby.",
            },
            MaterialProfile {
                pattern: rule("(textile|fabric|clothing|cloth|garment)"),
                label: "Textiles",
                recyclable_summary: "Textile detected. Donate or recycle fabric to extend its life.",
                non_recyclable_summary: "Textile detected. Damaged fabrics should be routed through textile recovery programs.",
                recycle_steps: "Wash, bag, and deliver to textile donation or recycling drop-offs.",
                dispose_steps: "Repurpose as cleaning rags or bring to textile-specific collection bins.",
                center_prompt: "Search for clothing donation bins or textile recovery hubs in your area.",
            },
        ]
    })
}

/// Classify a raw item-type string against the ordered rule list.
///
/// Returns the first matching profile, or `None` when nothing matches.
pub fn classify(item_type: &str) -> Option<&'static MaterialProfile> {
    profiles()
        .iter()
        .find(|profile| profile.pattern.is_match(item_type))
}

/// Normalize a raw item-type string for display.
///
/// Underscores and hyphens become spaces, runs of whitespace collapse,
/// and each word is title-cased. Empty input renders as "Item".
pub fn format_item_name(raw: &str) -> String {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    let separators = SEPARATORS.get_or_init(|| Regex::new(r"[_\-\s]+").expect("static pattern"));

    let spaced = separators.replace_all(raw, " ");
    let words: Vec<String> = spaced
        .trim()
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();

    if words.is_empty() {
        "Item".to_string()
    } else {
        words.join(" ")
    }
}
