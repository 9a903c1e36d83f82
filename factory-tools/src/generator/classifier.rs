use crate::models::ModelDefinition;

/// Whether a column gets a generated value.
///
/// The model fills in its incrementing key, its timestamps and its soft delete marker
/// itself, so those are left out.
pub fn is_fakeable(field: &str, model: &ModelDefinition) -> bool {
    if model.incrementing && field == model.primary_key {
        return false;
    }

    if model.timestamps && (field == model.created_at || field == model.updated_at) {
        return false;
    }

    if model.soft_deletes && field == model.deleted_at {
        return false;
    }

    true
}
