//! [`Property`]-related HTTP API.

use std::str::FromStr;

use axum::{extract::Path, Extension, Json};
use common::{Amount, DateTime};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use service::{
    command,
    domain::{bed, property, room, Bed, Property, Room},
    query, Command as _,
};

use crate::error::{AsError as _, Error, PropertyError};

/// Saves a whole [`Property`] document.
///
/// Creates the [`Property`] if it doesn't exist yet, minting its public code
/// and slug, and replaces its room/bed tree wholesale otherwise.
///
/// # Errors
///
/// If the document is invalid, or the command fails to execute.
pub async fn save(
    Extension(service): Extension<crate::Service>,
    Path(id): Path<property::Id>,
    Json(doc): Json<SaveRequest>,
) -> Result<Json<PropertyDoc>, Error> {
    let property = doc.into_domain(id)?;
    let saved = service
        .execute(command::SaveProperty::from(property))
        .await
        .map_err(|e| e.into_error())?;
    Ok(Json(PropertyDoc::from(saved)))
}

/// Patches top-level details of a [`Property`].
///
/// Rooms, beds and derived counters are out of reach of this endpoint.
///
/// # Errors
///
/// If the document is invalid, the [`Property`] doesn't exist, or the command
/// fails to execute.
pub async fn update_details(
    Extension(service): Extension<crate::Service>,
    Path(id): Path<property::Id>,
    Json(doc): Json<PatchRequest>,
) -> Result<StatusCode, Error> {
    let patch = doc.into_domain(id)?;
    service
        .execute(command::UpdatePropertyDetails::from(patch))
        .await
        .map_err(|e| e.into_error())?;
    Ok(StatusCode::NO_CONTENT)
}

/// Returns a [`Property`] by its internal ID.
///
/// # Errors
///
/// If the [`Property`] doesn't exist, or the query fails to execute.
pub async fn by_id(
    Extension(service): Extension<crate::Service>,
    Path(id): Path<property::Id>,
) -> Result<Json<PropertyDoc>, Error> {
    respond(
        service
            .execute(query::property::ById::by(id))
            .await
            .map_err(|e| e.into_error())?,
    )
}

/// Returns a [`Property`] by its unique slug.
///
/// # Errors
///
/// If the [`Property`] doesn't exist, or the query fails to execute.
pub async fn by_slug(
    Extension(service): Extension<crate::Service>,
    Path(slug): Path<String>,
) -> Result<Json<PropertyDoc>, Error> {
    // A string not in the normalized form cannot identify anything.
    let Ok(slug) = property::Slug::from_str(&slug) else {
        return Err(PropertyError::NotExists.into());
    };
    respond(
        service
            .execute(query::property::BySlug::by(slug))
            .await
            .map_err(|e| e.into_error())?,
    )
}

/// Returns a [`Property`] by its public code.
///
/// # Errors
///
/// If the [`Property`] doesn't exist, or the query fails to execute.
pub async fn by_code(
    Extension(service): Extension<crate::Service>,
    Path(code): Path<String>,
) -> Result<Json<PropertyDoc>, Error> {
    let Ok(code) = property::Code::from_str(&code) else {
        return Err(PropertyError::NotExists.into());
    };
    respond(
        service
            .execute(query::property::ByCode::by(code))
            .await
            .map_err(|e| e.into_error())?,
    )
}

/// Renders the queried [`Property`], if found.
fn respond(found: Option<Property>) -> Result<Json<PropertyDoc>, Error> {
    found
        .map(|p| Json(PropertyDoc::from(p)))
        .ok_or_else(|| PropertyError::NotExists.into())
}

/// Parses a required document field into its domain form.
fn parse_field<T: FromStr>(
    value: String,
    field: &'static str,
) -> Result<T, Error> {
    value.parse().map_err(|_| Error::invalid(field))
}

/// Parses an optional document field into its domain form.
fn parse_opt_field<T: FromStr>(
    value: Option<String>,
    field: &'static str,
) -> Result<Option<T>, Error> {
    value
        .map(|v| v.parse().map_err(|_| Error::invalid(field)))
        .transpose()
}

/// Default of the `isActive` document field.
const fn default_active() -> bool {
    true
}

/// Whole-document save request of a [`Property`].
///
/// Derived fields are absent on purpose: whatever the client would send for
/// them is recomputed server-side anyway.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    /// ID of the owning vendor.
    pub vendor_id: property::VendorId,

    /// Display name of the property.
    pub name: String,

    /// Short nick name of the property, if any.
    #[serde(default)]
    pub pg_nick_name: Option<String>,

    /// Gender the property accepts.
    pub gender: String,

    /// Kind of the property.
    #[serde(rename = "type")]
    pub kind: String,

    /// City the property is located in.
    pub city: String,

    /// State the property is located in.
    pub state: String,

    /// Area the property is located in.
    pub area: String,

    /// Postal code of the property.
    pub pincode: String,

    /// Contact phone of the property, if any.
    #[serde(default)]
    pub contact_phone: Option<String>,

    /// Contact email of the property, if any.
    #[serde(default)]
    pub contact_email: Option<String>,

    /// IDs of referenced amenities.
    #[serde(default)]
    pub amenity_ids: Vec<property::AmenityId>,

    /// Main image URL of the property, if any.
    #[serde(default)]
    pub main_image: Option<String>,

    /// Additional photo URLs of the property.
    #[serde(default)]
    pub common_photos: Vec<String>,

    /// Rooms of the property.
    #[serde(default)]
    pub rooms: Vec<RoomInput>,
}

impl SaveRequest {
    /// Builds a domain [`Property`] out of this request.
    ///
    /// Derived fields are left zeroed, as the save recomputes them before
    /// persisting.
    fn into_domain(self, id: property::Id) -> Result<Property, Error> {
        Ok(Property {
            id,
            code: None,
            slug: None,
            vendor_id: self.vendor_id,
            name: parse_field(self.name, "name")?,
            nick_name: parse_opt_field(self.pg_nick_name, "pgNickName")?,
            gender: parse_field(self.gender, "gender")?,
            kind: parse_field(self.kind, "type")?,
            city: parse_field(self.city, "city")?,
            state: parse_field(self.state, "state")?,
            area: parse_field(self.area, "area")?,
            pincode: parse_field(self.pincode, "pincode")?,
            contact_phone: parse_opt_field(
                self.contact_phone,
                "contactPhone",
            )?,
            contact_email: parse_opt_field(
                self.contact_email,
                "contactEmail",
            )?,
            amenity_ids: self.amenity_ids,
            main_image: parse_opt_field(self.main_image, "mainImage")?,
            common_photos: self
                .common_photos
                .into_iter()
                .map(|url| parse_field(url, "commonPhotos"))
                .collect::<Result<_, _>>()?,
            images: vec![],
            total_rooms: 0,
            total_beds: 0,
            occupied_beds: 0,
            available_beds: 0,
            beds_on_notice: 0,
            beds_on_book: 0,
            monthly_revenue: Amount::ZERO,
            rooms: self
                .rooms
                .into_iter()
                .map(RoomInput::into_domain)
                .collect::<Result<_, _>>()?,
            created_at: DateTime::now().coerce(),
        })
    }
}

/// Room of a [`SaveRequest`].
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInput {
    /// Number of the room.
    pub room_number: String,

    /// Authored name of the room, if any.
    #[serde(default)]
    pub name: Option<String>,

    /// Number of tenants sharing the room.
    pub no_of_sharing: u8,

    /// Air conditioning type of the room.
    pub ac_type: String,

    /// Bed size of the room.
    pub bed_size: String,

    /// Bathroom type of the room, if specified.
    #[serde(default)]
    pub bathroom_type: Option<String>,

    /// Whether the room has a balcony.
    #[serde(default)]
    pub balcony: bool,

    /// Free-text description of the room, if any.
    #[serde(default)]
    pub description: Option<String>,

    /// Free-text amenities of the room.
    #[serde(default)]
    pub amenities: Vec<String>,

    /// Monthly rent per bed in the room.
    pub rent: Amount,

    /// Soft-delete flag of the room.
    #[serde(default = "default_active")]
    pub is_active: bool,

    /// Beds of the room.
    #[serde(default)]
    pub beds: Vec<BedInput>,
}

impl RoomInput {
    /// Builds a domain [`Room`] out of this document.
    fn into_domain(self) -> Result<Room, Error> {
        let sharing = room::Sharing::new(self.no_of_sharing)
            .ok_or_else(|| Error::invalid("noOfSharing"))?;
        let ac_type = parse_field(self.ac_type, "acType")?;
        Ok(Room {
            number: parse_field(self.room_number, "roomNumber")?,
            name: parse_opt_field(self.name, "name")?,
            display_name: room::DisplayName::derive(sharing, ac_type),
            sharing,
            ac_type,
            bed_size: parse_field(self.bed_size, "bedSize")?,
            bathroom_type: parse_opt_field(
                self.bathroom_type,
                "bathroomType",
            )?,
            balcony: self.balcony,
            description: parse_opt_field(self.description, "description")?,
            amenities: self
                .amenities
                .into_iter()
                .map(|a| parse_field(a, "amenities"))
                .collect::<Result<_, _>>()?,
            rent: self.rent,
            total_beds: 0,
            occupied_beds: 0,
            available_beds: 0,
            on_notice_beds: 0,
            on_book_beds: 0,
            is_active: self.is_active,
            beds: self
                .beds
                .into_iter()
                .map(BedInput::into_domain)
                .collect::<Result<_, _>>()?,
        })
    }
}

/// Bed of a [`RoomInput`].
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BedInput {
    /// Number of the bed, unique within its room.
    pub bed_number: String,

    /// Occupancy status of the bed.
    pub status: String,

    /// Reference to the occupying student, if any.
    #[serde(default)]
    pub student_id: Option<String>,

    /// Name of the occupying student, if any.
    #[serde(default)]
    pub student_name: Option<String>,

    /// Date and time when the rent is next due, if relevant.
    #[serde(default)]
    pub rent_due_date: Option<bed::RentDueDateTime>,

    /// Date and time when the vacating notice was given, if any.
    #[serde(default)]
    pub notice_date: Option<bed::NoticeDateTime>,

    /// Date and time when the bed was booked, if it was.
    #[serde(default)]
    pub booking_date: Option<bed::BookingDateTime>,
}

impl BedInput {
    /// Builds a domain [`Bed`] out of this document.
    fn into_domain(self) -> Result<Bed, Error> {
        Ok(Bed {
            number: parse_field(self.bed_number, "bedNumber")?,
            status: parse_field(self.status, "status")?,
            student_id: parse_opt_field(self.student_id, "studentId")?,
            student_name: parse_opt_field(self.student_name, "studentName")?,
            rent_due_at: self.rent_due_date,
            notice_at: self.notice_date,
            booked_at: self.booking_date,
        })
    }
}

/// Details patch request of a [`Property`].
///
/// Absent fields are left untouched.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchRequest {
    /// New display name, if changing.
    #[serde(default)]
    pub name: Option<String>,

    /// New nick name, if changing.
    #[serde(default)]
    pub pg_nick_name: Option<String>,

    /// New accepted gender, if changing.
    #[serde(default)]
    pub gender: Option<String>,

    /// New kind, if changing.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    /// New city, if changing.
    #[serde(default)]
    pub city: Option<String>,

    /// New state, if changing.
    #[serde(default)]
    pub state: Option<String>,

    /// New area, if changing.
    #[serde(default)]
    pub area: Option<String>,

    /// New postal code, if changing.
    #[serde(default)]
    pub pincode: Option<String>,

    /// New contact phone, if changing.
    #[serde(default)]
    pub contact_phone: Option<String>,

    /// New contact email, if changing.
    #[serde(default)]
    pub contact_email: Option<String>,
}

impl PatchRequest {
    /// Builds a domain [`property::Patch`] out of this request.
    ///
    /// The slug is never authored by a client: the patching command recomputes
    /// it itself whenever the patch renames the [`Property`].
    fn into_domain(
        self,
        id: property::Id,
    ) -> Result<property::Patch, Error> {
        let mut patch = property::Patch::new(id);
        patch.name = parse_opt_field(self.name, "name")?;
        patch.nick_name = parse_opt_field(self.pg_nick_name, "pgNickName")?;
        patch.gender = parse_opt_field(self.gender, "gender")?;
        patch.kind = parse_opt_field(self.kind, "type")?;
        patch.city = parse_opt_field(self.city, "city")?;
        patch.state = parse_opt_field(self.state, "state")?;
        patch.area = parse_opt_field(self.area, "area")?;
        patch.pincode = parse_opt_field(self.pincode, "pincode")?;
        patch.contact_phone =
            parse_opt_field(self.contact_phone, "contactPhone")?;
        patch.contact_email =
            parse_opt_field(self.contact_email, "contactEmail")?;
        Ok(patch)
    }
}

/// Rendered [`Property`] document.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDoc {
    /// Internal ID of the property.
    pub id: property::Id,

    /// Public `PG-<sequence>` code of the property.
    pub property_id: Option<String>,

    /// URL-safe unique slug of the property.
    pub slug: Option<String>,

    /// ID of the owning vendor.
    pub vendor_id: property::VendorId,

    /// Display name of the property.
    pub name: String,

    /// Short nick name of the property, if any.
    pub pg_nick_name: Option<String>,

    /// Gender the property accepts.
    pub gender: String,

    /// Kind of the property.
    #[serde(rename = "type")]
    pub kind: String,

    /// City the property is located in.
    pub city: String,

    /// State the property is located in.
    pub state: String,

    /// Area the property is located in.
    pub area: String,

    /// Postal code of the property.
    pub pincode: String,

    /// Contact phone of the property, if any.
    pub contact_phone: Option<String>,

    /// Contact email of the property, if any.
    pub contact_email: Option<String>,

    /// IDs of referenced amenities.
    pub amenity_ids: Vec<property::AmenityId>,

    /// Main image URL of the property, if any.
    pub main_image: Option<String>,

    /// Additional photo URLs of the property.
    pub common_photos: Vec<String>,

    /// Derived gallery of the property.
    pub images: Vec<String>,

    /// Derived count of active rooms.
    pub total_rooms: u32,

    /// Derived count of all beds in active rooms.
    pub total_beds: u32,

    /// Derived count of occupied beds in active rooms.
    pub occupied_beds: u32,

    /// Derived count of available beds in active rooms.
    pub available_beds: u32,

    /// Derived count of beds on notice in active rooms.
    pub beds_on_notice: u32,

    /// Derived count of booked beds in active rooms.
    pub beds_on_book: u32,

    /// Derived monthly revenue of the property.
    pub monthly_revenue: Amount,

    /// Rooms of the property.
    pub rooms: Vec<RoomDoc>,

    /// Date and time when the property was created.
    pub created_at: property::CreationDateTime,
}

impl From<Property> for PropertyDoc {
    fn from(p: Property) -> Self {
        Self {
            id: p.id,
            property_id: p.code.map(|c| c.to_string()),
            slug: p.slug.map(|s| s.to_string()),
            vendor_id: p.vendor_id,
            name: p.name.to_string(),
            pg_nick_name: p.nick_name.map(|n| n.to_string()),
            gender: p.gender.as_str().to_owned(),
            kind: p.kind.as_str().to_owned(),
            city: p.city.to_string(),
            state: p.state.to_string(),
            area: p.area.to_string(),
            pincode: p.pincode.to_string(),
            contact_phone: p.contact_phone.map(|v| v.to_string()),
            contact_email: p.contact_email.map(|v| v.to_string()),
            amenity_ids: p.amenity_ids,
            main_image: p.main_image.map(|v| v.to_string()),
            common_photos: p
                .common_photos
                .into_iter()
                .map(|v| v.to_string())
                .collect(),
            images: p.images.into_iter().map(|v| v.to_string()).collect(),
            total_rooms: p.total_rooms,
            total_beds: p.total_beds,
            occupied_beds: p.occupied_beds,
            available_beds: p.available_beds,
            beds_on_notice: p.beds_on_notice,
            beds_on_book: p.beds_on_book,
            monthly_revenue: p.monthly_revenue,
            rooms: p.rooms.into_iter().map(RoomDoc::from).collect(),
            created_at: p.created_at,
        }
    }
}

/// Rendered [`Room`] of a [`PropertyDoc`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDoc {
    /// Number of the room.
    pub room_number: String,

    /// Authored name of the room, if any.
    pub name: Option<String>,

    /// Derived `"{sharing}-Sharing-{acType}"` display name of the room.
    pub display_name: String,

    /// Number of tenants sharing the room.
    pub no_of_sharing: u8,

    /// Air conditioning type of the room.
    pub ac_type: String,

    /// Bed size of the room.
    pub bed_size: String,

    /// Bathroom type of the room, if specified.
    pub bathroom_type: Option<String>,

    /// Whether the room has a balcony.
    pub balcony: bool,

    /// Free-text description of the room, if any.
    pub description: Option<String>,

    /// Free-text amenities of the room.
    pub amenities: Vec<String>,

    /// Monthly rent per bed in the room.
    pub rent: Amount,

    /// Derived count of all beds in the room.
    pub total_beds: u32,

    /// Derived count of occupied beds in the room.
    pub occupied_beds: u32,

    /// Derived count of available beds in the room.
    pub available_beds: u32,

    /// Derived count of beds on notice in the room.
    pub on_notice_beds: u32,

    /// Derived count of booked beds in the room.
    pub on_book_beds: u32,

    /// Soft-delete flag of the room.
    pub is_active: bool,

    /// Beds of the room.
    pub beds: Vec<BedDoc>,
}

impl From<Room> for RoomDoc {
    fn from(r: Room) -> Self {
        Self {
            room_number: r.number.to_string(),
            name: r.name.map(|n| n.to_string()),
            display_name: r.display_name.to_string(),
            no_of_sharing: r.sharing.get(),
            ac_type: r.ac_type.as_str().to_owned(),
            bed_size: r.bed_size.as_str().to_owned(),
            bathroom_type: r.bathroom_type.map(|v| v.to_string()),
            balcony: r.balcony,
            description: r.description.map(|v| v.to_string()),
            amenities: r.amenities.into_iter().map(|v| v.to_string()).collect(),
            rent: r.rent,
            total_beds: r.total_beds,
            occupied_beds: r.occupied_beds,
            available_beds: r.available_beds,
            on_notice_beds: r.on_notice_beds,
            on_book_beds: r.on_book_beds,
            is_active: r.is_active,
            beds: r.beds.into_iter().map(BedDoc::from).collect(),
        }
    }
}

/// Rendered [`Bed`] of a [`RoomDoc`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BedDoc {
    /// Number of the bed, unique within its room.
    pub bed_number: String,

    /// Occupancy status of the bed.
    pub status: String,

    /// Reference to the occupying student, if any.
    pub student_id: Option<String>,

    /// Name of the occupying student, if any.
    pub student_name: Option<String>,

    /// Date and time when the rent is next due, if relevant.
    pub rent_due_date: Option<bed::RentDueDateTime>,

    /// Date and time when the vacating notice was given, if any.
    pub notice_date: Option<bed::NoticeDateTime>,

    /// Date and time when the bed was booked, if it was.
    pub booking_date: Option<bed::BookingDateTime>,
}

impl From<Bed> for BedDoc {
    fn from(b: Bed) -> Self {
        Self {
            bed_number: b.number.to_string(),
            status: b.status.as_str().to_owned(),
            student_id: b.student_id.map(|v| v.to_string()),
            student_name: b.student_name.map(|v| v.to_string()),
            rent_due_date: b.rent_due_at,
            notice_date: b.notice_at,
            booking_date: b.booked_at,
        }
    }
}
