use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotoType {
    Front,
    Side,
    Back,
}

impl PhotoType {
    pub fn as_str(self) -> &'static str {
        match self {
            PhotoType::Front => "front",
            PhotoType::Side => "side",
            PhotoType::Back => "back",
        }
    }
}

impl FromStr for PhotoType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "front" => Ok(PhotoType::Front),
            "side" => Ok(PhotoType::Side),
            "back" => Ok(PhotoType::Back),
            other => Err(format!("unknown photo type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressPhoto {
    pub photo_type: PhotoType,
    pub storage_path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckIn {
    pub id: Uuid,
    pub user_id: Uuid,
    pub week_number: i32,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
    pub photos: Vec<ProgressPhoto>,
}

#[derive(Debug, FromRow)]
pub struct CheckInRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub week_number: i32,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, FromRow)]
pub struct PhotoRow {
    pub check_in_id: Uuid,
    pub photo_type: String,
    pub storage_path: String,
}
