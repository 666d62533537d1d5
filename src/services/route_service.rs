use crate::models::route::{Route, RouteDetail, RoutePatch, RouteRequest};
use crate::models::Resource;
use crate::utils::error::{constraint_violation, AppError, AppResult, ConstraintViolation};
use sqlx::MySqlPool;
use validator::Validate;

const SELECT_ROUTE_DETAIL: &str = r#"
    SELECT r.id, src.name AS source, dst.name AS destination, r.distance
    FROM routes r
    JOIN airports src ON src.id = r.source_id
    JOIN airports dst ON dst.id = r.destination_id
"#;

pub const DUPLICATE_ROUTE_MESSAGE: &str = "The fields source, destination must make a unique set.";

pub struct RouteService {
    pool: MySqlPool,
}

fn map_write_error(err: sqlx::Error, request: &RouteRequest) -> AppError {
    match constraint_violation(&err) {
        Some(ConstraintViolation::Unique) => AppError::non_field(DUPLICATE_ROUTE_MESSAGE),
        // raised by the routes_distinct_endpoints_* triggers
        Some(ConstraintViolation::Signal(message)) => AppError::non_field(message),
        Some(ConstraintViolation::ForeignKey(message)) => {
            if message.contains("routes_destination_id_fk") {
                Resource::Airport.missing_reference("destination", request.destination)
            } else {
                Resource::Airport.missing_reference("source", request.source)
            }
        }
        _ => err.into(),
    }
}

impl RouteService {
    pub fn new(pool: MySqlPool) -> Self {
        RouteService { pool }
    }

    pub async fn list_routes(&self) -> AppResult<Vec<RouteDetail>> {
        let routes = sqlx::query_as::<_, RouteDetail>(&format!("{} ORDER BY r.id", SELECT_ROUTE_DETAIL))
            .fetch_all(&self.pool)
            .await?;
        Ok(routes)
    }

    pub async fn get_route(&self, id: i32) -> AppResult<RouteDetail> {
        sqlx::query_as::<_, RouteDetail>(&format!("{} WHERE r.id = ?", SELECT_ROUTE_DETAIL))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Resource::Route.not_found())
    }

    pub async fn create_route(&self, request: RouteRequest) -> AppResult<Route> {
        request.validate()?;

        let result = sqlx::query(
            "INSERT INTO routes (source_id, destination_id, distance) VALUES (?, ?, ?)",
        )
        .bind(request.source)
        .bind(request.destination)
        .bind(request.distance)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &request))?;

        Ok(Route {
            id: result.last_insert_id() as i32,
            source: request.source,
            destination: request.destination,
            distance: request.distance,
        })
    }

    pub async fn update_route(&self, id: i32, request: RouteRequest) -> AppResult<Route> {
        request.validate()?;
        self.get_route(id).await?;

        sqlx::query(
            "UPDATE routes SET source_id = ?, destination_id = ?, distance = ? WHERE id = ?",
        )
        .bind(request.source)
        .bind(request.destination)
        .bind(request.distance)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &request))?;

        Ok(Route {
            id,
            source: request.source,
            destination: request.destination,
            distance: request.distance,
        })
    }

    pub async fn patch_route(&self, id: i32, patch: RoutePatch) -> AppResult<Route> {
        let current = sqlx::query_as::<_, Route>(
            "SELECT id, source_id AS source, destination_id AS destination, distance FROM routes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Resource::Route.not_found())?;
        self.update_route(id, patch.merge(current)).await
    }

    // Flights on the route, and their tickets, are removed with it
    pub async fn delete_route(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM routes WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Resource::Route.not_found());
        }
        Ok(())
    }
}
