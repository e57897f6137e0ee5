use anyhow::Result;
use clap::Subcommand;
use tracing::info;

use crate::storage::{
    catalog::{CategoryCatalog, CategoryStorage},
    entities::Category,
};

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    #[command(about = "List categories")]
    List,
    #[command(about = "Create a category")]
    Add {
        #[arg(help = "Stable value blocks refer to. Can't be changed later")]
        value: String,
        #[arg(help = "Display name")]
        label: String,
        #[arg(long, short, default_value = "bg-muted text-muted-foreground")]
        color: String,
    },
    #[command(about = "Change label or color of a category")]
    Rename {
        value: String,
        #[arg(long, short)]
        label: Option<String>,
        #[arg(long, short)]
        color: Option<String>,
    },
    #[command(about = "Delete a category. Blocks using it are kept")]
    Remove { value: String },
}

/// Applies a command to the catalog. Returns whether the catalog changed.
pub fn apply_category_command(
    catalog: &mut CategoryCatalog,
    command: CategoryCommand,
) -> Result<bool> {
    match command {
        CategoryCommand::List => Ok(false),
        CategoryCommand::Add {
            value,
            label,
            color,
        } => {
            catalog.create(Category::new(value, label, color))?;
            Ok(true)
        }
        CategoryCommand::Rename {
            value,
            label,
            color,
        } => {
            catalog.rename(&value, label, color)?;
            Ok(true)
        }
        CategoryCommand::Remove { value } => {
            let removed = catalog.delete(&value)?;
            info!("Removed category {removed:?}");
            Ok(true)
        }
    }
}

pub async fn process_category_command(
    storage: &CategoryStorage,
    command: CategoryCommand,
) -> Result<()> {
    let mut catalog = storage.load().await?;
    if apply_category_command(&mut catalog, command)? {
        storage.save(&catalog).await?;
    }
    for category in catalog.categories() {
        println!("{}\t{}\t{}", category.value, category.label, category.color);
    }
    Ok(())
}
