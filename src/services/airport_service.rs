use crate::models::airport::{Airport, AirportDetail, AirportPatch, AirportRequest};
use crate::models::Resource;
use crate::utils::error::{constraint_violation, AppError, AppResult, ConstraintViolation};
use sqlx::MySqlPool;
use validator::Validate;

const SELECT_AIRPORT_DETAIL: &str = r#"
    SELECT a.id, a.name, c.name AS closest_big_city
    FROM airports a
    LEFT JOIN cities c ON c.id = a.closest_big_city_id
"#;

pub struct AirportService {
    pool: MySqlPool,
}

fn map_write_error(err: sqlx::Error, city_id: i32) -> AppError {
    match constraint_violation(&err) {
        Some(ConstraintViolation::Unique) => {
            AppError::field("name", "airport with this name already exists.")
        }
        Some(ConstraintViolation::ForeignKey(_)) => {
            Resource::City.missing_reference("closest_big_city", city_id)
        }
        _ => err.into(),
    }
}

impl AirportService {
    pub fn new(pool: MySqlPool) -> Self {
        AirportService { pool }
    }

    pub async fn list_airports(&self) -> AppResult<Vec<AirportDetail>> {
        let airports =
            sqlx::query_as::<_, AirportDetail>(&format!("{} ORDER BY a.name", SELECT_AIRPORT_DETAIL))
                .fetch_all(&self.pool)
                .await?;
        Ok(airports)
    }

    pub async fn get_airport(&self, id: i32) -> AppResult<AirportDetail> {
        sqlx::query_as::<_, AirportDetail>(&format!("{} WHERE a.id = ?", SELECT_AIRPORT_DETAIL))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Resource::Airport.not_found())
    }

    pub async fn create_airport(&self, request: AirportRequest) -> AppResult<Airport> {
        request.validate()?;

        let result = sqlx::query("INSERT INTO airports (name, closest_big_city_id) VALUES (?, ?)")
            .bind(&request.name)
            .bind(request.closest_big_city)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, request.closest_big_city))?;

        Ok(Airport {
            id: result.last_insert_id() as i32,
            name: request.name,
            closest_big_city: Some(request.closest_big_city),
        })
    }

    pub async fn update_airport(&self, id: i32, request: AirportRequest) -> AppResult<Airport> {
        request.validate()?;
        self.get_airport(id).await?;

        sqlx::query("UPDATE airports SET name = ?, closest_big_city_id = ? WHERE id = ?")
            .bind(&request.name)
            .bind(request.closest_big_city)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, request.closest_big_city))?;

        Ok(Airport {
            id,
            name: request.name,
            closest_big_city: Some(request.closest_big_city),
        })
    }

    pub async fn patch_airport(&self, id: i32, patch: AirportPatch) -> AppResult<Airport> {
        let current = sqlx::query_as::<_, Airport>(
            "SELECT id, name, closest_big_city_id AS closest_big_city FROM airports WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Resource::Airport.not_found())?;
        self.update_airport(id, patch.merge(current)?).await
    }

    // Routes touching the airport are removed with it
    pub async fn delete_airport(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM airports WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Resource::Airport.not_found());
        }
        Ok(())
    }
}
