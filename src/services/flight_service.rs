use std::collections::HashMap;

use crate::models::flight::{
    Flight, FlightDetail, FlightFilter, FlightListItem, FlightPatch, FlightRequest, FlightRow,
    ARRIVAL_BEFORE_DEPARTURE_MESSAGE,
};
use crate::models::Resource;
use crate::utils::error::{constraint_violation, AppError, AppResult, ConstraintViolation};
use chrono::NaiveDateTime;
use log::info;
use sqlx::{MySql, MySqlConnection, MySqlPool, QueryBuilder};
use validator::Validate;

const SELECT_FLIGHT: &str = r#"
    SELECT
        f.id,
        f.route_id,
        src.name AS source_name,
        dst.name AS destination_name,
        a.name AS airplane_name,
        a.`rows` AS airplane_rows,
        a.seats_in_row AS airplane_seats_in_row,
        f.departure_time,
        f.arrival_time,
        (SELECT COUNT(*) FROM tickets t WHERE t.flight_id = f.id) AS tickets_issued
    FROM flights f
    JOIN routes r ON r.id = f.route_id
    JOIN airports src ON src.id = r.source_id
    JOIN airports dst ON dst.id = r.destination_id
    LEFT JOIN airplanes a ON a.id = f.airplane_id
"#;

pub const DUPLICATE_FLIGHT_MESSAGE: &str =
    "The fields route, airplane, departure_time must make a unique set.";

#[derive(sqlx::FromRow)]
struct FlightCrewRow {
    flight_id: i32,
    first_name: String,
    last_name: String,
}

pub struct FlightService {
    pool: MySqlPool,
}

fn map_write_error(err: sqlx::Error, request: &FlightRequest) -> AppError {
    match constraint_violation(&err) {
        Some(ConstraintViolation::Unique) => AppError::non_field(DUPLICATE_FLIGHT_MESSAGE),
        Some(ConstraintViolation::Check) => AppError::non_field(ARRIVAL_BEFORE_DEPARTURE_MESSAGE),
        Some(ConstraintViolation::ForeignKey(message)) => {
            if message.contains("flights_route_id_fk") {
                Resource::Route.missing_reference("route", request.route)
            } else if message.contains("flights_airplane_id_fk") {
                Resource::Airplane.missing_reference("airplane", request.airplane.unwrap_or_default())
            } else {
                AppError::field("crews", "Invalid pk - crew does not exist.")
            }
        }
        _ => err.into(),
    }
}

fn unique_crews(crews: &[i32]) -> Vec<i32> {
    let mut crews = crews.to_vec();
    crews.sort_unstable();
    crews.dedup();
    crews
}

async fn insert_flight_crews(
    conn: &mut MySqlConnection,
    flight_id: i32,
    crews: &[i32],
    request: &FlightRequest,
) -> AppResult<()> {
    for crew_id in crews {
        sqlx::query("INSERT INTO flight_crews (flight_id, crew_id) VALUES (?, ?)")
            .bind(flight_id)
            .bind(crew_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| match constraint_violation(&e) {
                Some(ConstraintViolation::ForeignKey(_)) => {
                    Resource::Crew.missing_reference("crews", *crew_id)
                }
                _ => map_write_error(e, request),
            })?;
    }
    Ok(())
}

impl FlightService {
    pub fn new(pool: MySqlPool) -> Self {
        FlightService { pool }
    }

    // Crew full names per flight, for the given flights only
    async fn crews_by_flight(&self, flight_ids: &[i32]) -> AppResult<HashMap<i32, Vec<String>>> {
        let mut crews: HashMap<i32, Vec<String>> = HashMap::new();
        if flight_ids.is_empty() {
            return Ok(crews);
        }

        let mut builder = QueryBuilder::<MySql>::new(
            "SELECT fc.flight_id, c.first_name, c.last_name \
             FROM flight_crews fc JOIN crews c ON c.id = fc.crew_id \
             WHERE fc.flight_id IN (",
        );
        let mut separated = builder.separated(", ");
        for id in flight_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY c.id");

        let rows = builder
            .build_query_as::<FlightCrewRow>()
            .fetch_all(&self.pool)
            .await?;

        for row in rows {
            crews
                .entry(row.flight_id)
                .or_default()
                .push(format!("{} {}", row.first_name, row.last_name));
        }
        Ok(crews)
    }

    /// Flights matching the filter, newest departure first, with the number
    /// of seats still free on each
    pub async fn list_flights(&self, filter: FlightFilter) -> AppResult<Vec<FlightListItem>> {
        let mut builder = QueryBuilder::<MySql>::new(SELECT_FLIGHT);
        builder.push(" WHERE 1 = 1");

        if let Some(date) = filter.start_departure_date {
            builder.push(" AND DATE(f.departure_time) >= ").push_bind(date);
        }
        if let Some(date) = filter.end_departure_date {
            builder.push(" AND DATE(f.departure_time) <= ").push_bind(date);
        }
        if let Some(date) = filter.start_arrival_date {
            builder.push(" AND DATE(f.arrival_time) >= ").push_bind(date);
        }
        if let Some(date) = filter.end_arrival_date {
            builder.push(" AND DATE(f.arrival_time) <= ").push_bind(date);
        }
        if let Some(source) = filter.source {
            builder.push(" AND LOWER(src.name) = LOWER(").push_bind(source).push(")");
        }
        if let Some(destination) = filter.destination {
            builder.push(" AND LOWER(dst.name) = LOWER(").push_bind(destination).push(")");
        }
        builder.push(" ORDER BY f.departure_time DESC, f.id");

        let rows = builder
            .build_query_as::<FlightRow>()
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
        let mut crews = self.crews_by_flight(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let flight_crews = crews.remove(&row.id).unwrap_or_default();
                row.into_list_item(flight_crews)
            })
            .collect())
    }

    async fn find_flight(&self, id: i32) -> AppResult<FlightRow> {
        sqlx::query_as::<_, FlightRow>(&format!("{} WHERE f.id = ?", SELECT_FLIGHT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Resource::Flight.not_found())
    }

    pub async fn get_flight(&self, id: i32) -> AppResult<FlightDetail> {
        let row = self.find_flight(id).await?;
        let mut crews = self.crews_by_flight(&[id]).await?;
        Ok(row.into_detail(crews.remove(&id).unwrap_or_default()))
    }

    pub async fn create_flight(&self, request: FlightRequest) -> AppResult<Flight> {
        request.validate()?;
        let crews = unique_crews(&request.crews);

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO flights (route_id, airplane_id, departure_time, arrival_time)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(request.route)
        .bind(request.airplane)
        .bind(request.departure_time)
        .bind(request.arrival_time)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, &request))?;

        let flight_id = result.last_insert_id() as i32;
        insert_flight_crews(&mut *tx, flight_id, &crews, &request).await?;

        tx.commit().await?;
        info!("Scheduled flight {} on route {}", flight_id, request.route);

        Ok(Flight {
            id: flight_id,
            route: request.route,
            crews,
            airplane: request.airplane,
            departure_time: request.departure_time,
            arrival_time: request.arrival_time,
        })
    }

    /// Replaces every attribute of the flight, crew set included
    pub async fn update_flight(&self, id: i32, request: FlightRequest) -> AppResult<Flight> {
        request.validate()?;
        self.find_flight(id).await?;
        let crews = unique_crews(&request.crews);

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE flights
            SET route_id = ?, airplane_id = ?, departure_time = ?, arrival_time = ?
            WHERE id = ?
            "#,
        )
        .bind(request.route)
        .bind(request.airplane)
        .bind(request.departure_time)
        .bind(request.arrival_time)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, &request))?;

        sqlx::query("DELETE FROM flight_crews WHERE flight_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_flight_crews(&mut *tx, id, &crews, &request).await?;

        tx.commit().await?;

        Ok(Flight {
            id,
            route: request.route,
            crews,
            airplane: request.airplane,
            departure_time: request.departure_time,
            arrival_time: request.arrival_time,
        })
    }

    /// Stored attributes of the flight with crew ids, as written by staff
    async fn find_flight_record(&self, id: i32) -> AppResult<Flight> {
        let (route, airplane, departure_time, arrival_time) =
            sqlx::query_as::<_, (i32, Option<i32>, NaiveDateTime, NaiveDateTime)>(
                "SELECT route_id, airplane_id, departure_time, arrival_time FROM flights WHERE id = ?",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Resource::Flight.not_found())?;

        let crews = sqlx::query_scalar::<_, i32>(
            "SELECT crew_id FROM flight_crews WHERE flight_id = ? ORDER BY crew_id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Flight {
            id,
            route,
            crews,
            airplane,
            departure_time,
            arrival_time,
        })
    }

    pub async fn patch_flight(&self, id: i32, patch: FlightPatch) -> AppResult<Flight> {
        let current = self.find_flight_record(id).await?;
        self.update_flight(id, patch.merge(current)).await
    }

    // Tickets on the flight are removed with it
    pub async fn delete_flight(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM flights WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Resource::Flight.not_found());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crew_ids_are_deduplicated() {
        assert_eq!(unique_crews(&[3, 1, 3, 2, 1]), vec![1, 2, 3]);
    }
}
