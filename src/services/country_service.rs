use crate::models::country::{Country, CountryPatch, CountryRequest};
use crate::models::Resource;
use crate::utils::error::{constraint_violation, AppError, AppResult, ConstraintViolation};
use sqlx::MySqlPool;
use validator::Validate;

pub struct CountryService {
    pool: MySqlPool,
}

fn map_write_error(err: sqlx::Error) -> AppError {
    match constraint_violation(&err) {
        Some(ConstraintViolation::Unique) => {
            AppError::field("name", "country with this name already exists.")
        }
        _ => err.into(),
    }
}

impl CountryService {
    pub fn new(pool: MySqlPool) -> Self {
        CountryService { pool }
    }

    pub async fn list_countries(&self) -> AppResult<Vec<Country>> {
        let countries = sqlx::query_as::<_, Country>("SELECT id, name FROM countries ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(countries)
    }

    pub async fn get_country(&self, id: i32) -> AppResult<Country> {
        sqlx::query_as::<_, Country>("SELECT id, name FROM countries WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Resource::Country.not_found())
    }

    pub async fn create_country(&self, request: CountryRequest) -> AppResult<Country> {
        request.validate()?;

        let result = sqlx::query("INSERT INTO countries (name) VALUES (?)")
            .bind(&request.name)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(Country {
            id: result.last_insert_id() as i32,
            name: request.name,
        })
    }

    pub async fn update_country(&self, id: i32, request: CountryRequest) -> AppResult<Country> {
        request.validate()?;
        self.get_country(id).await?;

        sqlx::query("UPDATE countries SET name = ? WHERE id = ?")
            .bind(&request.name)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(Country {
            id,
            name: request.name,
        })
    }

    pub async fn patch_country(&self, id: i32, patch: CountryPatch) -> AppResult<Country> {
        let current = self.get_country(id).await?;
        self.update_country(id, patch.merge(current)).await
    }

    // Cities of the country go with it
    pub async fn delete_country(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM countries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Resource::Country.not_found());
        }
        Ok(())
    }
}
