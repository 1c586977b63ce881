//! Seed the catalog with demo data.
//!
//! Reads a YAML catalog (or the built-in demo catalog), validates it before
//! touching the database, then inserts categories and sarees when the
//! catalog is empty. Each saree gets a placeholder SVG image written to
//! `UPLOAD_DIR`. The default site settings row is inserted if missing.
//!
//! # File format
//!
//! ```yaml
//! categories:
//!   - name: Kanchipuram Silk
//!     description: Temple-border silks from Tamil Nadu.
//! sarees:
//!   - name: Kanchipuram Royal Maroon
//!     category: Kanchipuram Silk
//!     price: "8999"
//!     color: maroon
//!     description: Pure zari Kanchipuram silk saree.
//! ```

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

use silk_saree_admin::db::{
    CategoryInput, CategoryRepository, RepositoryError, SareeInput, SareeRepository,
    SettingsRepository,
};
use silk_saree_core::charts::{ChartError, Color};
use silk_saree_core::{CategoryId, Price, PriceError, Slug, SlugError};

use super::{ConnectError, connect};

const DEMO_CATALOG: &str = r##"
categories:
  - name: Kanchipuram Silk
    description: Temple-border silks woven in Kanchipuram, Tamil Nadu.
  - name: Banarasi Silk
    description: Brocade silks from Varanasi with gold and silver zari.
sarees:
  - name: Kanchipuram Royal Maroon
    category: Kanchipuram Silk
    price: "8999"
    color: maroon
    description: Pure zari Kanchipuram silk saree with rich pallu and traditional motifs.
  - name: Banarasi Emerald Weave
    category: Banarasi Silk
    price: "7499"
    color: "#0f6b4a"
    description: Handwoven Banarasi silk saree in emerald green with intricate golden work.
"##;

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Could not read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid catalog YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{0} validation errors found")]
    Invalid(usize),

    #[error("Invalid slug: {0}")]
    Slug(#[from] SlugError),

    #[error("Invalid price: {0}")]
    Price(#[from] PriceError),

    #[error("Invalid colour: {0}")]
    Color(#[from] ChartError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// A catalog to seed.
#[derive(Debug, Deserialize)]
pub struct SeedCatalog {
    #[serde(default)]
    pub categories: Vec<SeedCategory>,
    #[serde(default)]
    pub sarees: Vec<SeedSaree>,
}

#[derive(Debug, Deserialize)]
pub struct SeedCategory {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct SeedSaree {
    pub name: String,
    /// Name of a category in the same file.
    pub category: Option<String>,
    pub price: String,
    pub description: String,
    /// Placeholder image colour (name or `#rrggbb`).
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    "maroon".to_owned()
}

/// Check a catalog, returning one message per problem.
#[must_use]
pub fn validate_catalog(catalog: &SeedCatalog) -> Vec<String> {
    let mut errors = Vec::new();

    for category in &catalog.categories {
        if let Err(e) = Slug::from_name(&category.name) {
            errors.push(format!("category {:?}: {e}", category.name));
        }
    }

    for saree in &catalog.sarees {
        if saree.name.trim().is_empty() {
            errors.push("saree with an empty name".to_owned());
        }
        if saree.description.trim().is_empty() {
            errors.push(format!("saree {:?}: description is required", saree.name));
        }
        if let Err(e) = Price::parse_amount(&saree.price) {
            errors.push(format!("saree {:?}: {e}", saree.name));
        }
        if let Err(e) = Color::parse(&saree.color) {
            errors.push(format!("saree {:?}: {e}", saree.name));
        }
        if let Some(category) = &saree.category
            && !catalog.categories.iter().any(|c| &c.name == category)
        {
            errors.push(format!(
                "saree {:?}: unknown category {category:?}",
                saree.name
            ));
        }
    }

    errors
}

/// Seed the catalog from `file`, or from the built-in demo catalog.
pub async fn run(file: Option<&Path>) -> Result<(), SeedError> {
    let content = match file {
        Some(path) => {
            info!(path = %path.display(), "Loading catalog from file");
            tokio::fs::read_to_string(path).await?
        }
        None => DEMO_CATALOG.to_owned(),
    };

    // Read and validate YAML before connecting to database
    let catalog: SeedCatalog = serde_yaml::from_str(&content)?;
    let errors = validate_catalog(&catalog);
    if !errors.is_empty() {
        error!("Catalog validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(SeedError::Invalid(errors.len()));
    }

    let pool = connect().await?;

    if SettingsRepository::new(&pool).ensure_default().await? {
        info!("Inserted default site settings");
    }

    let sarees = SareeRepository::new(&pool);
    let existing = sarees.list().await?;
    if !existing.is_empty() {
        info!(
            count = existing.len(),
            "Catalog already has sarees, skipping demo data"
        );
        return Ok(());
    }

    let category_ids = seed_categories(&CategoryRepository::new(&pool), &catalog).await?;

    let upload_dir = upload_dir();
    tokio::fs::create_dir_all(&upload_dir).await?;

    for saree in &catalog.sarees {
        let slug = Slug::from_name(&saree.name)?;
        let image_filename = format!("demo_{}.svg", slug.as_str().replace('-', "_"));
        let color = Color::parse(&saree.color)?;
        tokio::fs::write(
            upload_dir.join(&image_filename),
            placeholder_svg(&saree.name, color),
        )
        .await?;

        let price = Price::parse_amount(&saree.price)?;
        let created = sarees
            .create(&SareeInput {
                category_id: saree
                    .category
                    .as_ref()
                    .and_then(|name| category_ids.get(name).copied()),
                name: saree.name.trim().to_owned(),
                price,
                description: saree.description.trim().to_owned(),
                image_filename,
            })
            .await?;
        info!(id = %created.id, name = %created.name, "Seeded saree");
    }

    info!(
        categories = category_ids.len(),
        sarees = catalog.sarees.len(),
        "Seeding complete!"
    );
    Ok(())
}

/// Insert missing categories, returning the id for every category name.
async fn seed_categories(
    repo: &CategoryRepository<'_>,
    catalog: &SeedCatalog,
) -> Result<HashMap<String, CategoryId>, SeedError> {
    let mut ids: HashMap<String, CategoryId> = repo
        .list()
        .await?
        .into_iter()
        .map(|c| (c.name, c.id))
        .collect();

    for category in &catalog.categories {
        if ids.contains_key(&category.name) {
            continue;
        }
        let created = repo
            .create(&CategoryInput {
                name: category.name.clone(),
                slug: Slug::from_name(&category.name)?,
                description: category.description.trim().to_owned(),
            })
            .await?;
        info!(id = %created.id, name = %created.name, "Seeded category");
        ids.insert(created.name, created.id);
    }

    Ok(ids)
}

fn upload_dir() -> PathBuf {
    std::env::var("UPLOAD_DIR")
        .ok()
        .filter(|v| !v.is_empty())
        .map_or_else(|| PathBuf::from("uploads"), PathBuf::from)
}

/// A portrait placeholder image with the saree's name.
fn placeholder_svg(name: &str, color: Color) -> String {
    const WIDTH: u32 = 300;
    const HEIGHT: u32 = 400;

    let lines = wrap_words(name, 16);
    let line_height = 28;
    let first_y = i64::from(HEIGHT / 2)
        - i64::try_from(lines.len().saturating_sub(1) * line_height / 2).unwrap_or(0);

    let mut text = String::new();
    for (i, line) in lines.iter().enumerate() {
        let y = first_y + i64::try_from(i * line_height).unwrap_or(0);
        let _ = write!(
            text,
            r##"<text x="{}" y="{y}" text-anchor="middle" font-family="Georgia, serif" font-size="22" fill="#ffffff">{}</text>"##,
            WIDTH / 2,
            escape_xml(line)
        );
    }

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}"><rect width="{WIDTH}" height="{HEIGHT}" fill="{color}"/><rect x="12" y="12" width="{}" height="{}" fill="none" stroke="#ffd700" stroke-width="4"/>{text}</svg>"##,
        WIDTH - 24,
        HEIGHT - 24,
    )
}

/// Greedy word wrap to lines of at most `width` characters.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for word in text.split_whitespace() {
        match lines.last_mut() {
            Some(line) if line.chars().count() + 1 + word.chars().count() <= width => {
                line.push(' ');
                line.push_str(word);
            }
            _ => lines.push(word.to_owned()),
        }
    }
    lines
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_catalog_is_valid() {
        let catalog: SeedCatalog = serde_yaml::from_str(DEMO_CATALOG).unwrap();
        assert!(validate_catalog(&catalog).is_empty());
        assert_eq!(catalog.sarees.len(), 2);
        assert_eq!(catalog.sarees[0].name, "Kanchipuram Royal Maroon");
        assert_eq!(catalog.sarees[0].price, "8999");
        assert_eq!(catalog.sarees[1].name, "Banarasi Emerald Weave");
        assert_eq!(catalog.sarees[1].price, "7499");
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let catalog: SeedCatalog = serde_yaml::from_str(
            r#"
categories:
  - name: "!!!"
sarees:
  - name: Mysore Crepe
    category: Mysore
    price: "-5"
    color: chartreuse
    description: ""
"#,
        )
        .unwrap();

        let errors = validate_catalog(&catalog);
        assert_eq!(errors.len(), 5, "{errors:?}");
        assert!(errors.iter().any(|e| e.contains("unknown category")));
    }

    #[test]
    fn test_placeholder_svg_escapes_name() {
        let svg = placeholder_svg("Silk & Zari <Gold>", Color::MAROON);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("fill=\"#800000\""));
        assert!(svg.contains("Silk &amp; Zari"));
        assert!(!svg.contains("<Gold>"));
    }

    #[test]
    fn test_wrap_words() {
        assert_eq!(
            wrap_words("Kanchipuram Royal Maroon", 16),
            vec!["Kanchipuram", "Royal Maroon"]
        );
        assert!(wrap_words("   ", 16).is_empty());
    }
}
