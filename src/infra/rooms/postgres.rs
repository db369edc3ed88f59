//! Postgres-backed room store (schema-only; DB I/O not wired).
//!
//! The scheduler's resync path expects active requests and room state to be
//! persisted by the surrounding application; these migrations define the
//! tables that application is expected to maintain.

/// Postgres room store. Schema definitions only.
pub struct PostgresRoomStore;

impl PostgresRoomStore {
    /// Returns SQL migration statements for the room and request tables.
    #[must_use]
    pub fn migrations() -> &'static [&'static str] {
        &[
            r"
CREATE TABLE IF NOT EXISTS hvac_rooms (
    room_id INTEGER PRIMARY KEY,
    baseline_temp DOUBLE PRECISION NOT NULL,
    current_temp DOUBLE PRECISION NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
",
            r"
CREATE TABLE IF NOT EXISTS hvac_requests (
    request_id BIGSERIAL PRIMARY KEY,
    room_id INTEGER NOT NULL REFERENCES hvac_rooms(room_id),
    mode TEXT NOT NULL,
    fan_speed TEXT NOT NULL,
    target_temp DOUBLE PRECISION NOT NULL,
    priority SMALLINT NOT NULL,
    request_time_min BIGINT NOT NULL,
    assigned_unit INTEGER,
    active BOOLEAN NOT NULL DEFAULT TRUE
);
",
            r"
CREATE UNIQUE INDEX IF NOT EXISTS hvac_requests_one_active_per_room
    ON hvac_requests (room_id) WHERE active;
",
            r"
CREATE TABLE IF NOT EXISTS hvac_usage_records (
    record_id TEXT PRIMARY KEY,
    room_id INTEGER NOT NULL,
    unit_id INTEGER NOT NULL,
    request_time_min BIGINT NOT NULL,
    service_start_min BIGINT NOT NULL,
    service_end_min BIGINT NOT NULL,
    duration_min BIGINT NOT NULL,
    fan_speed TEXT NOT NULL,
    mode TEXT NOT NULL,
    target_temp DOUBLE PRECISION NOT NULL,
    temp_delta DOUBLE PRECISION NOT NULL,
    energy DOUBLE PRECISION NOT NULL,
    cost DOUBLE PRECISION NOT NULL,
    rate DOUBLE PRECISION NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_cover_rooms_requests_and_usage() {
        let sql = PostgresRoomStore::migrations().join("\n");
        assert!(sql.contains("hvac_rooms"));
        assert!(sql.contains("hvac_requests"));
        assert!(sql.contains("hvac_usage_records"));
        assert!(sql.contains("one_active_per_room"));
    }
}
