//! Reusable test content.

use chrono::{DateTime, TimeZone, Utc};

pub const DEPLOYMENT: &str = "TEST-24-1";
pub const PROGRAM: &str = "TEST";

/// Two packages sharing `id1`; the French one has the tutorial and one item
/// the content tree does not have.
pub const TEST_24_1: &str = r#"
name = "TEST-24-1"
number = 1

[[packages]]
name = "TEST-24-1-en"
language = "en"
groups = ["default"]
intro = "id0"

  [[packages.playlists]]
  category = "2-0"
  title = "Health"
  items = ["id1", "id2"]

[[packages]]
name = "TEST-24-1-fr"
language = "fr"
groups = ["default", "north"]
has_tutorial = true

  [[packages.playlists]]
  category = "2-0"
  items = ["id1", "missing"]
"#;

/// Same deployment with feedback hidden in English.
pub const TEST_24_1_HIDDEN_FEEDBACK: &str = r#"
name = "TEST-24-1"
number = 1

[[packages]]
name = "TEST-24-1-en"
language = "en"
user_feedback_hidden = true

  [[packages.playlists]]
  category = "2-0"
  items = ["id1"]
"#;

/// Messages present in the content tree
pub const MESSAGES: [&str; 3] = ["id0", "id1", "id2"];

/// Every numbered system prompt either generation asks for
pub const SYSTEM_PROMPTS: [&str; 35] = [
    "0", "1", "2", "3", "4", "5", "6", "7", "9", "10", "11", "16", "17", "18", "19", "20", "21",
    "22", "23", "24", "25", "26", "28", "29", "33", "37", "38", "41", "53", "54", "61", "62", "63",
    "65", "80",
];

/// Category prompt pairs in the shared prompt pool
pub const CATEGORIES: [&str; 3] = ["2-0", "9-0", "$0-1"];

pub const V1_FIRMWARE: [&str; 2] = ["r1215.img", "r1221.img"];
pub const V2_FIRMWARE_LABEL: &str = "v2.1.0\n";

pub const RECIPIENTS_CSV: &str = "\
RecipientId,LanguageCode,Variant,Deployments
r1,en,,1
r2,fr,,2
r3,en,,1
";

pub const RECIPIENTS_MAP_CSV: &str = "\
RecipientId,Directory
r1,village-one
r3,village-two
";

/// Fixed build clock so markers and stamps are predictable
pub fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 5, 10, 15, 30).unwrap()
}
