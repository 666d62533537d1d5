use std::path::{Path, PathBuf};

use crate::models::airplane::{Airplane, AirplaneDetail, AirplaneImage, AirplanePatch, AirplaneRequest};
use crate::models::Resource;
use crate::utils::error::{constraint_violation, AppError, AppResult, ConstraintViolation};
use log::info;
use rocket::fs::TempFile;
use sqlx::MySqlPool;
use uuid::Uuid;
use validator::Validate;

const SELECT_AIRPLANE: &str = r#"
    SELECT id, name, `rows`, seats_in_row, image, airplane_type_id AS airplane_type
    FROM airplanes
"#;

pub struct AirplaneService {
    pool: MySqlPool,
}

fn map_write_error(err: sqlx::Error, airplane_type_id: i32) -> AppError {
    match constraint_violation(&err) {
        Some(ConstraintViolation::Unique) => {
            AppError::field("name", "airplane with this name already exists.")
        }
        Some(ConstraintViolation::ForeignKey(_)) => {
            Resource::AirplaneType.missing_reference("airplane_type", airplane_type_id)
        }
        _ => err.into(),
    }
}

/// Lowercase ASCII slug: runs of anything but letters and digits become one `-`
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Relative storage path for an uploaded airplane picture
pub fn airplane_image_path(airplane_name: &str, extension: &str) -> PathBuf {
    Path::new("upload")
        .join("airplane")
        .join(format!("{}-{}.{}", slugify(airplane_name), Uuid::new_v4(), extension))
}

impl AirplaneService {
    pub fn new(pool: MySqlPool) -> Self {
        AirplaneService { pool }
    }

    pub async fn list_airplanes(&self) -> AppResult<Vec<AirplaneDetail>> {
        let airplanes = sqlx::query_as::<_, Airplane>(&format!("{} ORDER BY name", SELECT_AIRPLANE))
            .fetch_all(&self.pool)
            .await?;
        Ok(airplanes.into_iter().map(AirplaneDetail::from).collect())
    }

    async fn find_airplane(&self, id: i32) -> AppResult<Airplane> {
        sqlx::query_as::<_, Airplane>(&format!("{} WHERE id = ?", SELECT_AIRPLANE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Resource::Airplane.not_found())
    }

    pub async fn get_airplane(&self, id: i32) -> AppResult<AirplaneDetail> {
        Ok(self.find_airplane(id).await?.into())
    }

    pub async fn create_airplane(&self, request: AirplaneRequest) -> AppResult<AirplaneDetail> {
        request.validate()?;

        let result = sqlx::query(
            "INSERT INTO airplanes (name, `rows`, seats_in_row, airplane_type_id) VALUES (?, ?, ?, ?)",
        )
        .bind(&request.name)
        .bind(request.rows)
        .bind(request.seats_in_row)
        .bind(request.airplane_type)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, request.airplane_type))?;

        Ok(Airplane {
            id: result.last_insert_id() as i32,
            name: request.name,
            rows: request.rows,
            seats_in_row: request.seats_in_row,
            image: None,
            airplane_type: request.airplane_type,
        }
        .into())
    }

    // The image is managed through upload_image only
    pub async fn update_airplane(&self, id: i32, request: AirplaneRequest) -> AppResult<AirplaneDetail> {
        request.validate()?;
        let current = self.find_airplane(id).await?;

        sqlx::query(
            "UPDATE airplanes SET name = ?, `rows` = ?, seats_in_row = ?, airplane_type_id = ? WHERE id = ?",
        )
        .bind(&request.name)
        .bind(request.rows)
        .bind(request.seats_in_row)
        .bind(request.airplane_type)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, request.airplane_type))?;

        Ok(Airplane {
            id,
            name: request.name,
            rows: request.rows,
            seats_in_row: request.seats_in_row,
            image: current.image,
            airplane_type: request.airplane_type,
        }
        .into())
    }

    pub async fn patch_airplane(&self, id: i32, patch: AirplanePatch) -> AppResult<AirplaneDetail> {
        let current = self.find_airplane(id).await?;
        self.update_airplane(id, patch.merge(current)).await
    }

    // Flights flown by the airplane stay, with no airplane assigned
    pub async fn delete_airplane(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM airplanes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Resource::Airplane.not_found());
        }
        Ok(())
    }

    /// Stores an image/* upload under `media_root` and records its relative path
    pub async fn upload_image(
        &self,
        id: i32,
        file: &mut TempFile<'_>,
        media_root: &Path,
    ) -> AppResult<AirplaneImage> {
        let airplane = self.find_airplane(id).await?;

        let extension = match file.content_type() {
            Some(content_type) if content_type.top() == "image" => content_type
                .extension()
                .map(|ext| ext.to_string())
                .unwrap_or_else(|| content_type.sub().to_string()),
            _ => {
                return Err(AppError::Unprocessable(
                    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.".into(),
                ))
            }
        };

        let relative = airplane_image_path(&airplane.name, &extension);
        let destination = media_root.join(&relative);
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        }
        file.copy_to(&destination)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let image = relative.to_string_lossy().replace('\\', "/");
        sqlx::query("UPDATE airplanes SET image = ? WHERE id = ?")
            .bind(&image)
            .bind(id)
            .execute(&self.pool)
            .await?;

        info!("Stored image for airplane {} at {}", id, image);
        Ok(AirplaneImage {
            id,
            image: Some(image),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_collapses_separators() {
        assert_eq!(slugify("Boeing 737 MAX"), "boeing-737-max");
        assert_eq!(slugify("  A--320 "), "a-320");
    }

    #[test]
    fn image_path_keeps_slug_and_extension() {
        let path = airplane_image_path("Boeing 737", "png");
        let name = path.file_name().unwrap().to_string_lossy().to_string();

        assert!(path.starts_with("upload/airplane"));
        assert!(name.starts_with("boeing-737-"));
        assert!(name.ends_with(".png"));
    }
}
