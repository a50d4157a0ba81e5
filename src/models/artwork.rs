use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Artwork types. Stored as TEXT using the variant name, serialized the same
/// way on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "PascalCase")]
pub enum ArtType {
    Unknown,
    Painting,
    Drawing,
    Sculpture,
    Print,
    Photography,
    Digital,
    MixedMedia,
    Video,
    Textile,
    Ceramic,
    Glass,
    Sound,
    Street,
    Illustration,
}

impl ArtType {
    pub const ALL: &'static [ArtType] = &[
        ArtType::Unknown,
        ArtType::Painting,
        ArtType::Drawing,
        ArtType::Sculpture,
        ArtType::Print,
        ArtType::Photography,
        ArtType::Digital,
        ArtType::MixedMedia,
        ArtType::Video,
        ArtType::Textile,
        ArtType::Ceramic,
        ArtType::Glass,
        ArtType::Sound,
        ArtType::Street,
        ArtType::Illustration,
    ];
}

impl Default for ArtType {
    fn default() -> Self {
        ArtType::Unknown
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Artwork {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub art_type: ArtType,
    pub image_url: Option<String>,
    pub artist_id: Uuid,
    pub category_id: Option<Uuid>,
}
