//! CSV export with a dynamically-sized column set.

use std::fs;
use std::path::Path;
use tracing::info;

use crate::models::AdDetail;
use crate::utils::error::Result;

const FIXED_COLUMNS: [&str; 7] = [
    "id",
    "title",
    "description",
    "price",
    "location",
    "date",
    "image_url",
];

/// Writes one row per record. The schema is the union of columns across
/// all records: indexed `image_url_N` / `detail_N` columns run up to the
/// per-run maxima, and a record lacking a column gets an empty cell rather
/// than a shifted row. An empty record set still produces the header.
pub fn write_csv<P: AsRef<Path>>(records: &[AdDetail], path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let max_images = records.iter().map(|r| r.images.len()).max().unwrap_or(0);
    let max_attributes = records.iter().map(|r| r.attributes.len()).max().unwrap_or(0);

    let mut writer = csv::Writer::from_path(path)?;

    let mut header: Vec<String> = FIXED_COLUMNS.iter().map(|c| c.to_string()).collect();
    for i in 1..=max_images {
        header.push(format!("image_url_{i}"));
    }
    for i in 1..=max_attributes {
        header.push(format!("detail_{i}"));
    }
    writer.write_record(&header)?;

    for record in records {
        let mut row: Vec<String> = vec![
            record.id.clone(),
            record.title.clone(),
            record.description.clone().unwrap_or_default(),
            record.price.clone().unwrap_or_default(),
            record.location.clone().unwrap_or_default(),
            record.date.clone().unwrap_or_default(),
            record.primary_image().unwrap_or_default().to_string(),
        ];
        for i in 0..max_images {
            row.push(record.images.get(i).cloned().unwrap_or_default());
        }
        for i in 0..max_attributes {
            row.push(record.attributes.get(i).cloned().unwrap_or_default());
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}
