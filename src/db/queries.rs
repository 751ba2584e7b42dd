//! Database queries for schools, trips, suppliers, excursions and bookings

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    clean_optional, Booking, BookingExcursion, BookingInput, Excursion, ExcursionInput,
    ProviderStatus, School, SchoolInput, Supplier, SupplierInput, Trip, TripInput,
};

const SCHOOL_COLUMNS: &str = r#"
    id, name, address, city, postcode, phone, email,
    website, contact_person, notes, created_at, updated_at
"#;

const TRIP_COLUMNS: &str = r#"
    id, title, destination, description, duration_days, base_price,
    max_participants, departure_date, return_date, itinerary,
    created_at, updated_at
"#;

const SUPPLIER_COLUMNS: &str = r#"
    id, name, contact_person, email, phone, address, city, postcode,
    website, specialties, notes, category, focus, approx_price,
    notes_for_groups, travel_time, transport_mode, created_at, updated_at
"#;

const EXCURSION_COLUMNS: &str = r#"
    id, trip_id, supplier_id, name, description, price,
    duration_hours, max_participants, created_at, updated_at
"#;

const BOOKING_COLUMNS: &str = r#"
    id, school_id, trip_id, status, participant_count, free_pax,
    total_price, special_requirements, contact_email, contact_phone,
    notes, contact_name, created_at, updated_at
"#;

const BOOKING_EXCURSION_COLUMNS: &str = r#"
    id, booking_id, excursion_id, participant_count, total_price,
    provider_status, provider_notes, provider_contact_date,
    created_at, updated_at
"#;

/// Delete one row by id from a fixed table name
async fn delete_by_id(pool: &PgPool, table: &'static str, id: Uuid) -> Result<()> {
    let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", table))
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }
    Ok(())
}

// ==================== schools ====================

/// All schools, alphabetical
pub async fn list_schools(pool: &PgPool) -> Result<Vec<School>> {
    let schools = sqlx::query_as::<_, School>(&format!(
        "SELECT {} FROM schools ORDER BY name",
        SCHOOL_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(schools)
}

pub async fn get_school(pool: &PgPool, id: Uuid) -> Result<School> {
    sqlx::query_as::<_, School>(&format!("SELECT {} FROM schools WHERE id = $1", SCHOOL_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn insert_school(pool: &PgPool, input: &SchoolInput) -> Result<School> {
    let school = sqlx::query_as::<_, School>(&format!(
        r#"
        INSERT INTO schools (name, address, city, postcode, phone, email, website, contact_person, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {}
        "#,
        SCHOOL_COLUMNS
    ))
    .bind(input.name.trim())
    .bind(input.address.trim())
    .bind(input.city.trim())
    .bind(input.postcode.trim())
    .bind(input.phone.trim())
    .bind(input.email.trim())
    .bind(clean_optional(&input.website))
    .bind(clean_optional(&input.contact_person))
    .bind(clean_optional(&input.notes))
    .fetch_one(pool)
    .await?;

    Ok(school)
}

pub async fn update_school(pool: &PgPool, id: Uuid, input: &SchoolInput) -> Result<School> {
    sqlx::query_as::<_, School>(&format!(
        r#"
        UPDATE schools SET
            name = $2, address = $3, city = $4, postcode = $5, phone = $6,
            email = $7, website = $8, contact_person = $9, notes = $10,
            updated_at = now()
        WHERE id = $1
        RETURNING {}
        "#,
        SCHOOL_COLUMNS
    ))
    .bind(id)
    .bind(input.name.trim())
    .bind(input.address.trim())
    .bind(input.city.trim())
    .bind(input.postcode.trim())
    .bind(input.phone.trim())
    .bind(input.email.trim())
    .bind(clean_optional(&input.website))
    .bind(clean_optional(&input.contact_person))
    .bind(clean_optional(&input.notes))
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

pub async fn delete_school(pool: &PgPool, id: Uuid) -> Result<()> {
    delete_by_id(pool, "schools", id).await
}

// ==================== trips ====================

/// All trips, soonest departure first
pub async fn list_trips(pool: &PgPool) -> Result<Vec<Trip>> {
    let trips = sqlx::query_as::<_, Trip>(&format!(
        "SELECT {} FROM trips ORDER BY departure_date",
        TRIP_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(trips)
}

pub async fn get_trip(pool: &PgPool, id: Uuid) -> Result<Trip> {
    sqlx::query_as::<_, Trip>(&format!("SELECT {} FROM trips WHERE id = $1", TRIP_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn insert_trip(pool: &PgPool, input: &TripInput) -> Result<Trip> {
    let trip = sqlx::query_as::<_, Trip>(&format!(
        r#"
        INSERT INTO trips (
            title, destination, description, duration_days, base_price,
            max_participants, departure_date, return_date, itinerary
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING {}
        "#,
        TRIP_COLUMNS
    ))
    .bind(input.title.trim())
    .bind(input.destination.trim())
    .bind(clean_optional(&input.description))
    .bind(input.duration_days)
    .bind(input.base_price)
    .bind(input.max_participants)
    .bind(input.departure_date)
    .bind(input.return_date)
    .bind(clean_optional(&input.itinerary))
    .fetch_one(pool)
    .await?;

    Ok(trip)
}

pub async fn update_trip(pool: &PgPool, id: Uuid, input: &TripInput) -> Result<Trip> {
    sqlx::query_as::<_, Trip>(&format!(
        r#"
        UPDATE trips SET
            title = $2, destination = $3, description = $4, duration_days = $5,
            base_price = $6, max_participants = $7, departure_date = $8,
            return_date = $9, itinerary = $10, updated_at = now()
        WHERE id = $1
        RETURNING {}
        "#,
        TRIP_COLUMNS
    ))
    .bind(id)
    .bind(input.title.trim())
    .bind(input.destination.trim())
    .bind(clean_optional(&input.description))
    .bind(input.duration_days)
    .bind(input.base_price)
    .bind(input.max_participants)
    .bind(input.departure_date)
    .bind(input.return_date)
    .bind(clean_optional(&input.itinerary))
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

pub async fn delete_trip(pool: &PgPool, id: Uuid) -> Result<()> {
    delete_by_id(pool, "trips", id).await
}

// ==================== suppliers ====================

/// All suppliers, alphabetical
pub async fn list_suppliers(pool: &PgPool) -> Result<Vec<Supplier>> {
    let suppliers = sqlx::query_as::<_, Supplier>(&format!(
        "SELECT {} FROM suppliers ORDER BY name",
        SUPPLIER_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(suppliers)
}

pub async fn get_supplier(pool: &PgPool, id: Uuid) -> Result<Supplier> {
    sqlx::query_as::<_, Supplier>(&format!(
        "SELECT {} FROM suppliers WHERE id = $1",
        SUPPLIER_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

pub async fn insert_supplier(pool: &PgPool, input: &SupplierInput) -> Result<Supplier> {
    let supplier = sqlx::query_as::<_, Supplier>(&format!(
        r#"
        INSERT INTO suppliers (
            name, contact_person, email, phone, address, city, postcode,
            website, specialties, notes, category, focus, approx_price,
            notes_for_groups, travel_time, transport_mode
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
        RETURNING {}
        "#,
        SUPPLIER_COLUMNS
    ))
    .bind(input.name.trim())
    .bind(clean_optional(&input.contact_person))
    .bind(input.email.trim())
    .bind(input.phone.trim())
    .bind(clean_optional(&input.address))
    .bind(clean_optional(&input.city))
    .bind(clean_optional(&input.postcode))
    .bind(clean_optional(&input.website))
    .bind(clean_optional(&input.specialties))
    .bind(clean_optional(&input.notes))
    .bind(clean_optional(&input.category))
    .bind(clean_optional(&input.focus))
    .bind(clean_optional(&input.approx_price))
    .bind(clean_optional(&input.notes_for_groups))
    .bind(clean_optional(&input.travel_time))
    .bind(clean_optional(&input.transport_mode))
    .fetch_one(pool)
    .await?;

    Ok(supplier)
}

pub async fn update_supplier(pool: &PgPool, id: Uuid, input: &SupplierInput) -> Result<Supplier> {
    sqlx::query_as::<_, Supplier>(&format!(
        r#"
        UPDATE suppliers SET
            name = $2, contact_person = $3, email = $4, phone = $5, address = $6,
            city = $7, postcode = $8, website = $9, specialties = $10, notes = $11,
            category = $12, focus = $13, approx_price = $14, notes_for_groups = $15,
            travel_time = $16, transport_mode = $17, updated_at = now()
        WHERE id = $1
        RETURNING {}
        "#,
        SUPPLIER_COLUMNS
    ))
    .bind(id)
    .bind(input.name.trim())
    .bind(clean_optional(&input.contact_person))
    .bind(input.email.trim())
    .bind(input.phone.trim())
    .bind(clean_optional(&input.address))
    .bind(clean_optional(&input.city))
    .bind(clean_optional(&input.postcode))
    .bind(clean_optional(&input.website))
    .bind(clean_optional(&input.specialties))
    .bind(clean_optional(&input.notes))
    .bind(clean_optional(&input.category))
    .bind(clean_optional(&input.focus))
    .bind(clean_optional(&input.approx_price))
    .bind(clean_optional(&input.notes_for_groups))
    .bind(clean_optional(&input.travel_time))
    .bind(clean_optional(&input.transport_mode))
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

pub async fn delete_supplier(pool: &PgPool, id: Uuid) -> Result<()> {
    delete_by_id(pool, "suppliers", id).await
}

// ==================== excursions ====================

pub async fn list_excursions(pool: &PgPool) -> Result<Vec<Excursion>> {
    let excursions = sqlx::query_as::<_, Excursion>(&format!(
        "SELECT {} FROM excursions ORDER BY name",
        EXCURSION_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(excursions)
}

pub async fn list_excursions_for_trip(pool: &PgPool, trip_id: Uuid) -> Result<Vec<Excursion>> {
    let excursions = sqlx::query_as::<_, Excursion>(&format!(
        "SELECT {} FROM excursions WHERE trip_id = $1 ORDER BY name",
        EXCURSION_COLUMNS
    ))
    .bind(trip_id)
    .fetch_all(pool)
    .await?;

    Ok(excursions)
}

pub async fn list_excursions_for_supplier(pool: &PgPool, supplier_id: Uuid) -> Result<Vec<Excursion>> {
    let excursions = sqlx::query_as::<_, Excursion>(&format!(
        "SELECT {} FROM excursions WHERE supplier_id = $1 ORDER BY name",
        EXCURSION_COLUMNS
    ))
    .bind(supplier_id)
    .fetch_all(pool)
    .await?;

    Ok(excursions)
}

pub async fn get_excursion(pool: &PgPool, id: Uuid) -> Result<Excursion> {
    sqlx::query_as::<_, Excursion>(&format!(
        "SELECT {} FROM excursions WHERE id = $1",
        EXCURSION_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

pub async fn insert_excursion(pool: &PgPool, input: &ExcursionInput) -> Result<Excursion> {
    let excursion = sqlx::query_as::<_, Excursion>(&format!(
        r#"
        INSERT INTO excursions (
            trip_id, supplier_id, name, description, price, duration_hours, max_participants
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {}
        "#,
        EXCURSION_COLUMNS
    ))
    .bind(input.trip_id)
    .bind(input.supplier_id)
    .bind(input.name.trim())
    .bind(clean_optional(&input.description))
    .bind(input.price)
    .bind(input.duration_hours)
    .bind(input.max_participants)
    .fetch_one(pool)
    .await?;

    Ok(excursion)
}

pub async fn update_excursion(pool: &PgPool, id: Uuid, input: &ExcursionInput) -> Result<Excursion> {
    sqlx::query_as::<_, Excursion>(&format!(
        r#"
        UPDATE excursions SET
            trip_id = $2, supplier_id = $3, name = $4, description = $5, price = $6,
            duration_hours = $7, max_participants = $8, updated_at = now()
        WHERE id = $1
        RETURNING {}
        "#,
        EXCURSION_COLUMNS
    ))
    .bind(id)
    .bind(input.trip_id)
    .bind(input.supplier_id)
    .bind(input.name.trim())
    .bind(clean_optional(&input.description))
    .bind(input.price)
    .bind(input.duration_hours)
    .bind(input.max_participants)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

pub async fn delete_excursion(pool: &PgPool, id: Uuid) -> Result<()> {
    delete_by_id(pool, "excursions", id).await
}

// ==================== bookings ====================

/// All bookings, newest first
pub async fn list_bookings(pool: &PgPool) -> Result<Vec<Booking>> {
    let bookings = sqlx::query_as::<_, Booking>(&format!(
        "SELECT {} FROM bookings ORDER BY created_at DESC",
        BOOKING_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

pub async fn list_bookings_for_school(pool: &PgPool, school_id: Uuid) -> Result<Vec<Booking>> {
    let bookings = sqlx::query_as::<_, Booking>(&format!(
        "SELECT {} FROM bookings WHERE school_id = $1 ORDER BY created_at DESC",
        BOOKING_COLUMNS
    ))
    .bind(school_id)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

pub async fn list_bookings_for_trip(pool: &PgPool, trip_id: Uuid) -> Result<Vec<Booking>> {
    let bookings = sqlx::query_as::<_, Booking>(&format!(
        "SELECT {} FROM bookings WHERE trip_id = $1 ORDER BY created_at DESC",
        BOOKING_COLUMNS
    ))
    .bind(trip_id)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

pub async fn get_booking(pool: &PgPool, id: Uuid) -> Result<Booking> {
    sqlx::query_as::<_, Booking>(&format!("SELECT {} FROM bookings WHERE id = $1", BOOKING_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn insert_booking(pool: &PgPool, input: &BookingInput) -> Result<Booking> {
    let booking = sqlx::query_as::<_, Booking>(&format!(
        r#"
        INSERT INTO bookings (
            school_id, trip_id, status, participant_count, free_pax, total_price,
            special_requirements, contact_email, contact_phone, notes, contact_name
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING {}
        "#,
        BOOKING_COLUMNS
    ))
    .bind(input.school_id)
    .bind(input.trip_id)
    .bind(input.status.as_str())
    .bind(input.participant_count)
    .bind(input.free_pax)
    .bind(input.total_price)
    .bind(clean_optional(&input.special_requirements))
    .bind(input.contact_email.trim())
    .bind(input.contact_phone.trim())
    .bind(clean_optional(&input.notes))
    .bind(clean_optional(&input.contact_name))
    .fetch_one(pool)
    .await?;

    Ok(booking)
}

pub async fn update_booking(pool: &PgPool, id: Uuid, input: &BookingInput) -> Result<Booking> {
    sqlx::query_as::<_, Booking>(&format!(
        r#"
        UPDATE bookings SET
            school_id = $2, trip_id = $3, status = $4, participant_count = $5,
            free_pax = $6, total_price = $7, special_requirements = $8,
            contact_email = $9, contact_phone = $10, notes = $11, contact_name = $12,
            updated_at = now()
        WHERE id = $1
        RETURNING {}
        "#,
        BOOKING_COLUMNS
    ))
    .bind(id)
    .bind(input.school_id)
    .bind(input.trip_id)
    .bind(input.status.as_str())
    .bind(input.participant_count)
    .bind(input.free_pax)
    .bind(input.total_price)
    .bind(clean_optional(&input.special_requirements))
    .bind(input.contact_email.trim())
    .bind(input.contact_phone.trim())
    .bind(clean_optional(&input.notes))
    .bind(clean_optional(&input.contact_name))
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}

pub async fn delete_booking(pool: &PgPool, id: Uuid) -> Result<()> {
    delete_by_id(pool, "bookings", id).await
}

// ==================== booking excursions ====================

pub async fn list_booking_excursions(pool: &PgPool, booking_id: Uuid) -> Result<Vec<BookingExcursion>> {
    let rows = sqlx::query_as::<_, BookingExcursion>(&format!(
        "SELECT {} FROM booking_excursions WHERE booking_id = $1 ORDER BY created_at",
        BOOKING_EXCURSION_COLUMNS
    ))
    .bind(booking_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Record progress with the excursion provider
pub async fn update_provider_status(
    pool: &PgPool,
    booking_id: Uuid,
    booking_excursion_id: Uuid,
    status: ProviderStatus,
    notes: Option<String>,
) -> Result<BookingExcursion> {
    sqlx::query_as::<_, BookingExcursion>(&format!(
        r#"
        UPDATE booking_excursions SET
            provider_status = $3,
            provider_notes = COALESCE($4, provider_notes),
            provider_contact_date = CASE WHEN $3 = 'not_contacted' THEN provider_contact_date ELSE CURRENT_DATE END,
            updated_at = now()
        WHERE id = $2 AND booking_id = $1
        RETURNING {}
        "#,
        BOOKING_EXCURSION_COLUMNS
    ))
    .bind(booking_id)
    .bind(booking_excursion_id)
    .bind(status.as_str())
    .bind(notes)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound)
}
