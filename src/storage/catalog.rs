use std::path::PathBuf;

use anyhow::Result;
use thiserror::Error;
use tracing::info;

use super::{
    document::{read_document, write_document},
    entities::Category,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("category value must not be empty")]
    EmptyValue,
    #[error("category {0:?} already exists")]
    Duplicate(String),
    #[error("category {0:?} doesn't exist")]
    Unknown(String),
}

/// Categories a new profile starts with.
const DEFAULT_CATEGORIES: [(&str, &str, &str); 6] = [
    ("work", "업무", "bg-primary/10 text-primary"),
    ("study", "공부", "bg-accent/10 text-accent"),
    (
        "exercise",
        "운동",
        "bg-green-500/10 text-green-700 dark:text-green-400",
    ),
    (
        "meal",
        "식사",
        "bg-orange-500/10 text-orange-700 dark:text-orange-400",
    ),
    (
        "rest",
        "휴식",
        "bg-purple-500/10 text-purple-700 dark:text-purple-400",
    ),
    ("other", "기타", "bg-muted text-muted-foreground"),
];

/// The set of categories of one profile. Values are unique and never change once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES
                .iter()
                .map(|(value, label, color)| Category::new(*value, *label, *color))
                .collect(),
        }
    }
}

impl CategoryCatalog {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|v| v.value.as_str())
    }

    pub fn find(&self, value: &str) -> Option<&Category> {
        self.categories.iter().find(|v| v.value == value)
    }

    /// Display name of a category. Blocks may reference deleted categories, those are shown by
    /// their raw value.
    pub fn label_for<'a>(&'a self, value: &'a str) -> &'a str {
        self.find(value).map_or(value, |v| v.label.as_str())
    }

    pub fn create(&mut self, category: Category) -> Result<(), CatalogError> {
        let value = category.value.trim();
        if value.is_empty() {
            return Err(CatalogError::EmptyValue);
        }
        if self.find(value).is_some() {
            return Err(CatalogError::Duplicate(value.to_string()));
        }
        self.categories.push(Category {
            value: value.to_string(),
            ..category
        });
        Ok(())
    }

    /// Changes how a category looks. The value stays the same.
    pub fn rename(
        &mut self,
        value: &str,
        label: Option<String>,
        color: Option<String>,
    ) -> Result<(), CatalogError> {
        let category = self
            .categories
            .iter_mut()
            .find(|v| v.value == value)
            .ok_or_else(|| CatalogError::Unknown(value.to_string()))?;
        if let Some(label) = label {
            category.label = label;
        }
        if let Some(color) = color {
            category.color = color;
        }
        Ok(())
    }

    /// Removes a category. Blocks that reference it are left as they are.
    pub fn delete(&mut self, value: &str) -> Result<Category, CatalogError> {
        let index = self
            .categories
            .iter()
            .position(|v| v.value == value)
            .ok_or_else(|| CatalogError::Unknown(value.to_string()))?;
        Ok(self.categories.remove(index))
    }
}

/// Stores [CategoryCatalog] of a profile in `categories.json`.
pub struct CategoryStorage {
    path: PathBuf,
}

impl CategoryStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// A profile without a catalog gets the default categories.
    pub async fn load(&self) -> Result<CategoryCatalog> {
        match read_document::<Vec<Category>>(&self.path).await? {
            Some(categories) => Ok(CategoryCatalog::new(categories)),
            None => {
                info!("No categories in {:?}, using defaults", self.path);
                Ok(CategoryCatalog::default())
            }
        }
    }

    pub async fn save(&self, catalog: &CategoryCatalog) -> Result<()> {
        write_document(&self.path, &catalog.categories).await
    }
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_defaults() {
        let catalog = CategoryCatalog::default();
        assert_eq!(
            catalog.keys().collect::<Vec<_>>(),
            vec!["work", "study", "exercise", "meal", "rest", "other"]
        );
        assert_eq!(catalog.label_for("work"), "업무");
    }

    #[test]
    fn test_label_falls_back_to_value() {
        let catalog = CategoryCatalog::default();
        assert_eq!(catalog.label_for("reading"), "reading");
    }

    #[test]
    fn test_create_rejects_duplicates_and_empty() {
        let mut catalog = CategoryCatalog::default();
        assert_eq!(
            catalog.create(Category::new("work", "Work", "")),
            Err(CatalogError::Duplicate("work".into()))
        );
        assert_eq!(
            catalog.create(Category::new("  ", "Blank", "")),
            Err(CatalogError::EmptyValue)
        );
        catalog.create(Category::new(" reading ", "독서", "bg-pink-500/10")).unwrap();
        assert_eq!(catalog.label_for("reading"), "독서");
    }

    #[test]
    fn test_rename_keeps_value() {
        let mut catalog = CategoryCatalog::default();
        catalog.rename("work", Some("Work".into()), None).unwrap();

        let work = catalog.find("work").unwrap();
        assert_eq!(work.label, "Work");
        assert_eq!(work.color, "bg-primary/10 text-primary");
        assert_eq!(
            catalog.rename("missing", None, None),
            Err(CatalogError::Unknown("missing".into()))
        );
    }

    #[test]
    fn test_delete() {
        let mut catalog = CategoryCatalog::default();
        let removed = catalog.delete("meal").unwrap();
        assert_eq!(removed.label, "식사");
        assert!(catalog.find("meal").is_none());
        assert_eq!(catalog.label_for("meal"), "meal");
        assert!(catalog.delete("meal").is_err());
    }

    #[tokio::test]
    async fn test_storage_defaults_then_persists() -> Result<()> {
        let dir = tempdir()?;
        let storage = CategoryStorage::new(dir.path().join("categories.json"));

        let mut catalog = storage.load().await?;
        assert_eq!(catalog, CategoryCatalog::default());

        catalog.delete("other")?;
        storage.save(&catalog).await?;

        let loaded = storage.load().await?;
        assert_eq!(loaded.categories().len(), 5);
        assert!(loaded.find("other").is_none());
        Ok(())
    }
}
