use crate::models::TrainingExample;

/// Example complaints the profile strategy builds department profiles from
const BUILTIN_EXAMPLES: &[(&str, &str)] = &[
    (
        "power outage and electricity failure in my area",
        "State Electricity Board",
    ),
    ("no water supply for three days", "State Water Supply"),
    (
        "garbage and waste not collected on main street",
        "District Waste Management",
    ),
    (
        "potholes and broken road needs repair",
        "State Public Works",
    ),
    (
        "street lights are not working in the city center",
        "State Electricity Board",
    ),
    (
        "leaking pipe causing water wastage in Mumbai",
        "State Water Supply",
    ),
    (
        "transformer exploded, immediate help needed in Delhi",
        "State Electricity Board",
    ),
    ("sewage overflow on the highway", "State Public Works"),
    (
        "traffic signal is broken at the main intersection",
        "Central Transport Authority",
    ),
];

/// The built-in labelled corpus
pub fn builtin_examples() -> Vec<TrainingExample> {
    BUILTIN_EXAMPLES
        .iter()
        .map(|(text, department)| TrainingExample::new(*text, *department))
        .collect()
}
