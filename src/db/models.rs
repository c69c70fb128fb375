use bson::{doc, Bson, Document};
use mongodb::results::{DeleteResult, InsertOneResult, UpdateResult};
use serde::{Deserialize, Serialize};

/// Acknowledgment of an insert, decoupled from the driver's result type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    /// Hex representation of the newly assigned `_id`.
    pub inserted_id: String,
}

impl From<InsertOneResult> for InsertAck {
    fn from(result: InsertOneResult) -> Self {
        Self {
            acknowledged: true,
            inserted_id: inserted_id_hex(result.inserted_id),
        }
    }
}

/// Store-assigned ids are ObjectIds; anything else (caller-supplied `_id`)
/// falls back to its display form.
fn inserted_id_hex(id: Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        other => other.to_string(),
    }
}

/// Acknowledgment of an update (merge-patch or review append).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub matched_count: u64,
    pub modified_count: u64,
}

impl From<UpdateResult> for UpdateAck {
    fn from(result: UpdateResult) -> Self {
        Self {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        }
    }
}

/// Acknowledgment of a delete. A zero count is a successful no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub deleted_count: u64,
}

impl From<DeleteResult> for DeleteAck {
    fn from(result: DeleteResult) -> Self {
        Self {
            deleted_count: result.deleted_count,
        }
    }
}

/// Optional filters accepted by `GET /services`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceFilter {
    /// Exact-match category.
    pub category: Option<String>,
    /// Inclusive lower bound on price.
    pub min: Option<i64>,
    /// Inclusive upper bound on price.
    pub max: Option<i64>,
}

impl ServiceFilter {
    /// Assemble the MongoDB filter document.
    ///
    /// The price range supports three shapes: both bounds, lower-only and
    /// upper-only. With neither bound set, no price clause is emitted.
    pub fn to_document(&self) -> Document {
        let mut filter = Document::new();
        if let Some(category) = &self.category {
            filter.insert("category", category);
        }
        let price = match (self.min, self.max) {
            (Some(min), Some(max)) => Some(doc! { "$gte": min, "$lte": max }),
            (Some(min), None) => Some(doc! { "$gte": min }),
            (None, Some(max)) => Some(doc! { "$lte": max }),
            (None, None) => None,
        };
        if let Some(price) = price {
            filter.insert("price", price);
        }
        filter
    }
}
