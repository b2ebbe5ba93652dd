use chrono::{NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{BookingType, PaymentMethod, Reservation, ReservationStatus};

const RESERVATION_COLUMNS: &str = "id, venue_id, name, email, phone, date, time, guests, \
     male_guests, female_guests, booking_type, payment_method, status, table_number, \
     special_requests, add_ons, coupon_code, total_amount, created_at, updated_at";

pub fn create_reservation(conn: &Connection, r: &Reservation) -> anyhow::Result<()> {
    let add_ons = if r.add_ons.is_empty() {
        None
    } else {
        Some(serde_json::to_string(&r.add_ons)?)
    };

    conn.execute(
        "INSERT INTO reservations (id, venue_id, name, email, phone, date, time, guests,
             male_guests, female_guests, booking_type, payment_method, status, table_number,
             special_requests, add_ons, coupon_code, total_amount, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
        params![
            r.id,
            r.venue_id,
            r.name,
            r.email,
            r.phone,
            r.date.format("%Y-%m-%d").to_string(),
            r.time,
            r.guests,
            r.male_guests,
            r.female_guests,
            r.booking_type.as_str(),
            r.payment_method.as_str(),
            r.status.as_str(),
            r.table_number,
            r.special_requests,
            add_ons,
            r.coupon_code,
            r.total_amount,
            r.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            r.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ],
    )?;
    Ok(())
}

pub fn get_reservation(
    conn: &Connection,
    venue_id: &str,
    id: &str,
) -> anyhow::Result<Option<Reservation>> {
    let sql = format!(
        "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE venue_id = ?1 AND id = ?2"
    );
    let result = conn.query_row(&sql, params![venue_id, id], |row| Ok(parse_reservation_row(row)));

    match result {
        Ok(reservation) => Ok(Some(reservation?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn list_reservations(
    conn: &Connection,
    venue_id: &str,
    status_filter: Option<&str>,
    limit: i64,
) -> anyhow::Result<Vec<Reservation>> {
    let (sql, params_vec): (String, Vec<Box<dyn rusqlite::types::ToSql>>) = match status_filter {
        Some(status) => (
            format!(
                "SELECT {RESERVATION_COLUMNS} FROM reservations \
                 WHERE venue_id = ?1 AND status = ?2 \
                 ORDER BY date DESC, created_at DESC LIMIT ?3"
            ),
            vec![
                Box::new(venue_id.to_string()) as Box<dyn rusqlite::types::ToSql>,
                Box::new(status.to_string()),
                Box::new(limit),
            ],
        ),
        None => (
            format!(
                "SELECT {RESERVATION_COLUMNS} FROM reservations \
                 WHERE venue_id = ?1 \
                 ORDER BY date DESC, created_at DESC LIMIT ?2"
            ),
            vec![
                Box::new(venue_id.to_string()) as Box<dyn rusqlite::types::ToSql>,
                Box::new(limit),
            ],
        ),
    };

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), |row| Ok(parse_reservation_row(row)))?;

    let mut reservations = vec![];
    for row in rows {
        reservations.push(row??);
    }
    Ok(reservations)
}

/// Updates the status and `updated_at` of one reservation and nothing else.
/// Returns false when no row matched.
pub fn update_reservation_status(
    conn: &Connection,
    venue_id: &str,
    id: &str,
    status: ReservationStatus,
) -> anyhow::Result<bool> {
    let now = Utc::now()
        .naive_utc()
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();
    let count = conn.execute(
        "UPDATE reservations SET status = ?1, updated_at = ?2 WHERE venue_id = ?3 AND id = ?4",
        params![status.as_str(), now, venue_id, id],
    )?;
    Ok(count > 0)
}

pub fn assign_table_number(
    conn: &Connection,
    venue_id: &str,
    id: &str,
    table_number: &str,
) -> anyhow::Result<bool> {
    let now = Utc::now()
        .naive_utc()
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();
    let count = conn.execute(
        "UPDATE reservations SET table_number = ?1, updated_at = ?2 WHERE venue_id = ?3 AND id = ?4",
        params![table_number, now, venue_id, id],
    )?;
    Ok(count > 0)
}

pub struct StatusCounts {
    pub pending: i64,
    pub confirmed: i64,
    pub cancelled: i64,
    pub completed: i64,
}

pub fn get_status_counts(conn: &Connection, venue_id: &str) -> anyhow::Result<StatusCounts> {
    let mut stmt = conn.prepare(
        "SELECT status, COUNT(*) FROM reservations WHERE venue_id = ?1 GROUP BY status",
    )?;
    let rows = stmt.query_map(params![venue_id], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?;

    let mut counts = StatusCounts {
        pending: 0,
        confirmed: 0,
        cancelled: 0,
        completed: 0,
    };
    for row in rows {
        let (status, count) = row?;
        match ReservationStatus::parse(&status) {
            ReservationStatus::Pending => counts.pending = count,
            ReservationStatus::Confirmed => counts.confirmed = count,
            ReservationStatus::Cancelled => counts.cancelled = count,
            ReservationStatus::Completed => counts.completed = count,
        }
    }
    Ok(counts)
}

fn parse_reservation_row(row: &rusqlite::Row) -> anyhow::Result<Reservation> {
    let id: String = row.get(0)?;
    let venue_id: String = row.get(1)?;
    let name: String = row.get(2)?;
    let email: String = row.get(3)?;
    let phone: String = row.get(4)?;
    let date_str: String = row.get(5)?;
    let time: String = row.get(6)?;
    let guests: i32 = row.get(7)?;
    let male_guests: Option<i32> = row.get(8)?;
    let female_guests: Option<i32> = row.get(9)?;
    let booking_type_str: String = row.get(10)?;
    let payment_method_str: String = row.get(11)?;
    let status_str: String = row.get(12)?;
    let table_number: Option<String> = row.get(13)?;
    let special_requests: Option<String> = row.get(14)?;
    let add_ons_json: Option<String> = row.get(15)?;
    let coupon_code: Option<String> = row.get(16)?;
    let total_amount: Option<f64> = row.get(17)?;
    let created_at_str: String = row.get(18)?;
    let updated_at_str: String = row.get(19)?;

    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .unwrap_or_else(|_| Utc::now().date_naive());
    let created_at = NaiveDateTime::parse_from_str(&created_at_str, "%Y-%m-%d %H:%M:%S")
        .unwrap_or_else(|_| Utc::now().naive_utc());
    let updated_at = NaiveDateTime::parse_from_str(&updated_at_str, "%Y-%m-%d %H:%M:%S")
        .unwrap_or_else(|_| Utc::now().naive_utc());
    let add_ons: Vec<String> = add_ons_json
        .as_deref()
        .and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default();

    Ok(Reservation {
        id,
        venue_id,
        name,
        email,
        phone,
        date,
        time,
        guests,
        male_guests,
        female_guests,
        booking_type: BookingType::parse(&booking_type_str),
        payment_method: PaymentMethod::parse(&payment_method_str),
        status: ReservationStatus::parse(&status_str),
        table_number,
        special_requests,
        add_ons,
        coupon_code,
        total_amount,
        created_at,
        updated_at,
    })
}
