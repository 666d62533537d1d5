use crate::models::crew::{Crew, CrewDetail, CrewPatch, CrewRequest, FlightShortList};
use crate::models::route::route_label;
use crate::models::Resource;
use crate::utils::error::AppResult;
use sqlx::MySqlPool;
use validator::Validate;

pub struct CrewService {
    pool: MySqlPool,
}

#[derive(sqlx::FromRow)]
struct CrewFlightRow {
    route_id: i32,
    source_name: String,
    destination_name: String,
}

impl CrewService {
    pub fn new(pool: MySqlPool) -> Self {
        CrewService { pool }
    }

    pub async fn list_crews(&self) -> AppResult<Vec<CrewDetail>> {
        let crews = sqlx::query_as::<_, Crew>("SELECT id, first_name, last_name FROM crews ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(crews.into_iter().map(CrewDetail::from).collect())
    }

    pub async fn get_crew(&self, id: i32) -> AppResult<CrewDetail> {
        let crew = sqlx::query_as::<_, Crew>("SELECT id, first_name, last_name FROM crews WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Resource::Crew.not_found())?;
        Ok(crew.into())
    }

    pub async fn create_crew(&self, request: CrewRequest) -> AppResult<CrewDetail> {
        request.validate()?;

        let result = sqlx::query("INSERT INTO crews (first_name, last_name) VALUES (?, ?)")
            .bind(&request.first_name)
            .bind(&request.last_name)
            .execute(&self.pool)
            .await?;

        Ok(Crew {
            id: result.last_insert_id() as i32,
            first_name: request.first_name,
            last_name: request.last_name,
        }
        .into())
    }

    pub async fn update_crew(&self, id: i32, request: CrewRequest) -> AppResult<CrewDetail> {
        request.validate()?;
        self.get_crew(id).await?;

        sqlx::query("UPDATE crews SET first_name = ?, last_name = ? WHERE id = ?")
            .bind(&request.first_name)
            .bind(&request.last_name)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(Crew {
            id,
            first_name: request.first_name,
            last_name: request.last_name,
        }
        .into())
    }

    pub async fn patch_crew(&self, id: i32, patch: CrewPatch) -> AppResult<CrewDetail> {
        let current = self.get_crew(id).await?;
        self.update_crew(id, patch.merge(current)).await
    }

    pub async fn delete_crew(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM crews WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Resource::Crew.not_found());
        }
        Ok(())
    }

    /// Flights staffed by the crew member, each labelled by its route
    pub async fn list_crew_flights(&self, id: i32) -> AppResult<Vec<FlightShortList>> {
        self.get_crew(id).await?;

        let rows = sqlx::query_as::<_, CrewFlightRow>(
            r#"
            SELECT r.id AS route_id, src.name AS source_name, dst.name AS destination_name
            FROM flight_crews fc
            JOIN flights f ON f.id = fc.flight_id
            JOIN routes r ON r.id = f.route_id
            JOIN airports src ON src.id = r.source_id
            JOIN airports dst ON dst.id = r.destination_id
            WHERE fc.crew_id = ?
            ORDER BY f.departure_time DESC, f.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| FlightShortList {
                flight: route_label(row.route_id, &row.source_name, &row.destination_name),
            })
            .collect())
    }
}
