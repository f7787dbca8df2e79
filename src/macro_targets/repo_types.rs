use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::{
    error::AppResult,
    overrides::CoachEditable,
    versioning::{RecordKind, Versioned},
};

pub const COACH_OVERRIDE: &str = "coach_override";

/// Which formula produced a macro target. System generations record the
/// formula name; coach overrides are marked explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FormulaUsed {
    CoachOverride,
    System(String),
}

impl From<String> for FormulaUsed {
    fn from(s: String) -> Self {
        if s == COACH_OVERRIDE {
            FormulaUsed::CoachOverride
        } else {
            FormulaUsed::System(s)
        }
    }
}

impl From<FormulaUsed> for String {
    fn from(f: FormulaUsed) -> Self {
        match f {
            FormulaUsed::CoachOverride => COACH_OVERRIDE.to_string(),
            FormulaUsed::System(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroTarget {
    pub bmr: i32,
    pub tdee: i32,
    pub calorie_target: i32,
    pub protein_g: i32,
    pub carbs_g: i32,
    pub fat_g: i32,
    pub formula_used: FormulaUsed,
    pub explanation: String,
}

impl Versioned for MacroTarget {
    const KIND: RecordKind = RecordKind::MacroTargets;
}

impl CoachEditable for MacroTarget {
    /// Overrides change targets only; the energy-expenditure baseline is
    /// inherited, or zero when the client has no macro record yet.
    fn carried_forward(previous: Option<&Self>) -> AppResult<Map<String, Value>> {
        let (bmr, tdee) = previous.map_or((0, 0), |p| (p.bmr, p.tdee));
        let mut fields = Map::new();
        fields.insert("bmr".into(), json!(bmr));
        fields.insert("tdee".into(), json!(tdee));
        Ok(fields)
    }
}
