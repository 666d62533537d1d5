use crate::models::airplane_type::{AirplaneType, AirplaneTypePatch, AirplaneTypeRequest};
use crate::models::Resource;
use crate::utils::error::{constraint_violation, AppError, AppResult, ConstraintViolation};
use sqlx::MySqlPool;
use validator::Validate;

pub struct AirplaneTypeService {
    pool: MySqlPool,
}

fn map_write_error(err: sqlx::Error) -> AppError {
    match constraint_violation(&err) {
        Some(ConstraintViolation::Unique) => {
            AppError::field("name", "airplane type with this name already exists.")
        }
        _ => err.into(),
    }
}

impl AirplaneTypeService {
    pub fn new(pool: MySqlPool) -> Self {
        AirplaneTypeService { pool }
    }

    pub async fn list_airplane_types(&self) -> AppResult<Vec<AirplaneType>> {
        let types =
            sqlx::query_as::<_, AirplaneType>("SELECT id, name FROM airplane_types ORDER BY name")
                .fetch_all(&self.pool)
                .await?;
        Ok(types)
    }

    pub async fn get_airplane_type(&self, id: i32) -> AppResult<AirplaneType> {
        sqlx::query_as::<_, AirplaneType>("SELECT id, name FROM airplane_types WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Resource::AirplaneType.not_found())
    }

    pub async fn create_airplane_type(&self, request: AirplaneTypeRequest) -> AppResult<AirplaneType> {
        request.validate()?;

        let result = sqlx::query("INSERT INTO airplane_types (name) VALUES (?)")
            .bind(&request.name)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(AirplaneType {
            id: result.last_insert_id() as i32,
            name: request.name,
        })
    }

    pub async fn update_airplane_type(
        &self,
        id: i32,
        request: AirplaneTypeRequest,
    ) -> AppResult<AirplaneType> {
        request.validate()?;
        self.get_airplane_type(id).await?;

        sqlx::query("UPDATE airplane_types SET name = ? WHERE id = ?")
            .bind(&request.name)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        Ok(AirplaneType {
            id,
            name: request.name,
        })
    }

    pub async fn patch_airplane_type(&self, id: i32, patch: AirplaneTypePatch) -> AppResult<AirplaneType> {
        let current = self.get_airplane_type(id).await?;
        self.update_airplane_type(id, patch.merge(current)).await
    }

    pub async fn delete_airplane_type(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM airplane_types WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Resource::AirplaneType.not_found());
        }
        Ok(())
    }
}
