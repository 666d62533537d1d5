use crate::models::city::{City, CityDetail, CityPatch, CityRequest};
use crate::models::Resource;
use crate::utils::error::{constraint_violation, AppError, AppResult, ConstraintViolation};
use sqlx::MySqlPool;
use validator::Validate;

const SELECT_CITY_DETAIL: &str = r#"
    SELECT c.id, c.name, co.name AS country
    FROM cities c
    JOIN countries co ON co.id = c.country_id
"#;

pub struct CityService {
    pool: MySqlPool,
}

fn map_write_error(err: sqlx::Error, country_id: i32) -> AppError {
    match constraint_violation(&err) {
        Some(ConstraintViolation::Unique) => {
            AppError::field("name", "city with this name already exists.")
        }
        Some(ConstraintViolation::ForeignKey(_)) => {
            Resource::Country.missing_reference("country", country_id)
        }
        _ => err.into(),
    }
}

impl CityService {
    pub fn new(pool: MySqlPool) -> Self {
        CityService { pool }
    }

    pub async fn list_cities(&self) -> AppResult<Vec<CityDetail>> {
        let cities = sqlx::query_as::<_, CityDetail>(&format!("{} ORDER BY c.name", SELECT_CITY_DETAIL))
            .fetch_all(&self.pool)
            .await?;
        Ok(cities)
    }

    pub async fn get_city(&self, id: i32) -> AppResult<CityDetail> {
        sqlx::query_as::<_, CityDetail>(&format!("{} WHERE c.id = ?", SELECT_CITY_DETAIL))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Resource::City.not_found())
    }

    pub async fn create_city(&self, request: CityRequest) -> AppResult<City> {
        request.validate()?;

        let result = sqlx::query("INSERT INTO cities (name, country_id) VALUES (?, ?)")
            .bind(&request.name)
            .bind(request.country)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, request.country))?;

        Ok(City {
            id: result.last_insert_id() as i32,
            name: request.name,
            country: request.country,
        })
    }

    pub async fn update_city(&self, id: i32, request: CityRequest) -> AppResult<City> {
        request.validate()?;
        self.get_city(id).await?;

        sqlx::query("UPDATE cities SET name = ?, country_id = ? WHERE id = ?")
            .bind(&request.name)
            .bind(request.country)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, request.country))?;

        Ok(City {
            id,
            name: request.name,
            country: request.country,
        })
    }

    pub async fn patch_city(&self, id: i32, patch: CityPatch) -> AppResult<City> {
        let current = sqlx::query_as::<_, City>("SELECT id, name, country_id AS country FROM cities WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Resource::City.not_found())?;
        self.update_city(id, patch.merge(current)).await
    }

    // Airports near the city keep existing with no closest city
    pub async fn delete_city(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM cities WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Resource::City.not_found());
        }
        Ok(())
    }
}
