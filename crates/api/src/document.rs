//! Loading the persisted budget document.

use std::io::ErrorKind;
use std::path::Path;

use pbudget_core::BudgetSnapshot;
use pbudget_shared::{AppError, AppResult};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

/// The budget document as read from disk, validated against the wire shape.
///
/// The raw JSON is kept so `/budget` serves the document exactly as stored.
#[derive(Debug, Clone)]
pub struct BudgetDocument {
    raw: Value,
    items: usize,
}

impl BudgetDocument {
    /// Validates a parsed JSON value as a budget document.
    pub fn from_value(raw: Value) -> AppResult<Self> {
        let snapshot = BudgetSnapshot::deserialize(&raw)
            .map_err(|e| AppError::Validation(format!("invalid budget document: {e}")))?;

        Ok(Self {
            raw,
            items: snapshot.len(),
        })
    }

    /// The document as stored.
    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Number of budget items in the document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items
    }

    /// Whether the document lists no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items == 0
    }
}

/// Reads and validates the budget document at `path`.
pub async fn load_budget_document(path: impl AsRef<Path>) -> AppResult<BudgetDocument> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => AppError::NotFound(path.display().to_string()),
        _ => AppError::Internal(format!("{}: {e}", path.display())),
    })?;

    let raw: Value = serde_json::from_slice(&bytes)
        .map_err(|e| AppError::Validation(format!("{}: {e}", path.display())))?;
    let document = BudgetDocument::from_value(raw)?;

    info!(path = %path.display(), items = document.len(), "budget document loaded");
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[tokio::test]
    async fn test_load_valid_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"myBudget": [{{"title": "Rent", "budget": 1200}}, {{"title": "Food", "budget": 400}}]}}"#
        )
        .unwrap();

        let document = load_budget_document(file.path()).await.unwrap();

        assert_eq!(document.len(), 2);
        assert_eq!(document.raw()["myBudget"][0]["title"], "Rent");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();

        let err = load_budget_document(dir.path().join("budget.json"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_invalid_json_is_validation_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = load_budget_document(file.path()).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_wrong_shape_is_validation_error() {
        let err = BudgetDocument::from_value(json!({"myBudget": [{"title": "Rent"}]})).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
