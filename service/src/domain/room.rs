//! [`Room`] definitions.

use std::str::FromStr;

use common::{define_kind, Amount};
use derive_more::{AsRef, Display};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

use super::{bed, Bed};

/// Room of a [`Property`], owning an ordered list of [`Bed`]s.
///
/// [`Property`]: crate::domain::Property
#[derive(Clone, Debug)]
pub struct Room {
    /// [`Number`] of this [`Room`].
    pub number: Number,

    /// Authored [`Name`] of this [`Room`], if any.
    ///
    /// Informational only, not involved in any derivation.
    pub name: Option<Name>,

    /// [`DisplayName`] of this [`Room`].
    ///
    /// Derived from [`Sharing`] and [`AcType`], never authored directly.
    pub display_name: DisplayName,

    /// [`Sharing`] configuration of this [`Room`].
    pub sharing: Sharing,

    /// [`AcType`] of this [`Room`].
    pub ac_type: AcType,

    /// [`BedSize`] of this [`Room`].
    pub bed_size: BedSize,

    /// [`BathroomType`] of this [`Room`], if specified.
    pub bathroom_type: Option<BathroomType>,

    /// Whether this [`Room`] has a balcony.
    pub balcony: bool,

    /// Free-text [`Description`] of this [`Room`], if any.
    pub description: Option<Description>,

    /// Free-text amenities of this [`Room`].
    pub amenities: Vec<Amenity>,

    /// Monthly rent per [`Bed`] in this [`Room`].
    pub rent: Amount,

    /// Derived count of all [`Bed`]s in this [`Room`].
    pub total_beds: BedCount,

    /// Derived count of occupied [`Bed`]s in this [`Room`].
    pub occupied_beds: BedCount,

    /// Derived count of available [`Bed`]s in this [`Room`].
    pub available_beds: BedCount,

    /// Derived count of [`Bed`]s with a vacating notice in this [`Room`].
    pub on_notice_beds: BedCount,

    /// Derived count of booked [`Bed`]s in this [`Room`].
    pub on_book_beds: BedCount,

    /// Soft-delete flag of this [`Room`].
    ///
    /// Inactive rooms are kept, but excluded from all property aggregates.
    pub is_active: bool,

    /// Ordered [`Bed`]s owned by this [`Room`].
    pub beds: Vec<Bed>,
}

impl Room {
    /// Recomputes all the derived fields of this [`Room`] from its live
    /// [`Bed`] list.
    ///
    /// `total_beds` is always the length of [`Room::beds`], never whatever was
    /// stored in the field before.
    pub fn recount(&mut self) {
        self.display_name = DisplayName::derive(self.sharing, self.ac_type);

        let mut occupied = 0;
        let mut available = 0;
        let mut on_notice = 0;
        let mut on_book = 0;
        for b in &self.beds {
            match b.status {
                bed::Status::Occupied => occupied += 1,
                bed::Status::Available => available += 1,
                bed::Status::Notice => on_notice += 1,
                bed::Status::OnBook => on_book += 1,
                bed::Status::Maintenance => {}
            }
        }

        self.total_beds = as_count(self.beds.len());
        self.occupied_beds = occupied;
        self.available_beds = available;
        self.on_notice_beds = on_notice;
        self.on_book_beds = on_book;
    }

    /// Returns the monthly revenue of this [`Room`]: its rent, once per
    /// rent-generating [`Bed`].
    #[must_use]
    pub fn revenue(&self) -> Amount {
        self.beds
            .iter()
            .filter(|b| b.generates_revenue())
            .map(|_| self.rent)
            .sum()
    }
}

/// Count of [`Bed`]s.
pub type BedCount = u32;

/// Converts a live array length into a [`BedCount`].
pub(crate) fn as_count(len: usize) -> BedCount {
    BedCount::try_from(len).expect("bed count overflow")
}

define_kind! {
    #[doc = "Air conditioning type of a [`Room`]."]
    enum AcType {
        #[doc = "Air conditioned."]
        Ac = "AC",

        #[doc = "Not air conditioned."]
        NonAc = "Non AC",
    }
}

define_kind! {
    #[doc = "Bed size of a [`Room`]."]
    enum BedSize {
        #[doc = "Single bed."]
        Single = "Single",

        #[doc = "Double bed."]
        Double = "Double",

        #[doc = "Any other bed size."]
        Other = "Other",
    }
}

/// Number of tenants sharing a [`Room`].
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Sharing(u8);

impl Sharing {
    /// Minimum supported [`Sharing`].
    pub const MIN: u8 = 1;

    /// Maximum supported [`Sharing`].
    pub const MAX: u8 = 7;

    /// Creates a new [`Sharing`] if the given `num` is within the supported
    /// range.
    #[must_use]
    pub fn new(num: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&num).then_some(Self(num))
    }

    /// Returns the inner value of this [`Sharing`].
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

/// [`DisplayName`] of a [`Room`].
///
/// Always the `"{sharing}-Sharing-{ac_type}"` form, recomputed on every save.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct DisplayName(String);

impl DisplayName {
    /// Derives the [`DisplayName`] from the given [`Sharing`] and [`AcType`].
    #[must_use]
    pub fn derive(sharing: Sharing, ac_type: AcType) -> Self {
        Self(format!("{sharing}-Sharing-{ac_type}"))
    }
}

/// Authored name of a [`Room`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 256
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `room::Name`")
    }
}

/// Number of a [`Room`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Number(String);

impl Number {
    /// Creates a new [`Number`] if the given `num` is valid.
    #[must_use]
    pub fn new(num: impl Into<String>) -> Option<Self> {
        let num = num.into();
        Self::check(&num).then_some(Self(num))
    }

    /// Checks whether the given `num` is a valid [`Number`].
    fn check(num: impl AsRef<str>) -> bool {
        let num = num.as_ref();
        num.trim() == num && !num.is_empty() && num.len() <= 64
    }
}

impl FromStr for Number {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `room::Number`")
    }
}

/// Bathroom type of a [`Room`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct BathroomType(String);

impl BathroomType {
    /// Creates a new [`BathroomType`] if the given `ty` is valid.
    #[must_use]
    pub fn new(ty: impl Into<String>) -> Option<Self> {
        let ty = ty.into();
        Self::check(&ty).then_some(Self(ty))
    }

    /// Checks whether the given `ty` is a valid [`BathroomType`].
    fn check(ty: impl AsRef<str>) -> bool {
        let ty = ty.as_ref();
        ty.trim() == ty && !ty.is_empty() && ty.len() <= 128
    }
}

impl FromStr for BathroomType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `BathroomType`")
    }
}

/// Free-text description of a [`Room`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Description(String);

impl Description {
    /// Creates a new [`Description`] if the given `text` is valid.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        Self::check(&text).then_some(Self(text))
    }

    /// Checks whether the given `text` is a valid [`Description`].
    fn check(text: impl AsRef<str>) -> bool {
        let text = text.as_ref();
        !text.trim().is_empty() && text.len() <= 4096
    }
}

impl FromStr for Description {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Description`")
    }
}

/// Free-text amenity of a [`Room`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct Amenity(String);

impl Amenity {
    /// Creates a new [`Amenity`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Amenity`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 128
    }
}

impl FromStr for Amenity {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Amenity`")
    }
}

#[cfg(test)]
mod spec {
    use common::Amount;

    use crate::domain::bed;

    use super::{AcType, BedSize, DisplayName, Number, Room, Sharing};

    fn bed(number: &str, status: bed::Status) -> bed::Bed {
        bed::Bed {
            number: bed::Number::new(number).unwrap(),
            status,
            student_id: None,
            student_name: None,
            rent_due_at: None,
            notice_at: None,
            booked_at: None,
        }
    }

    fn room(statuses: &[bed::Status]) -> Room {
        Room {
            number: Number::new("101").unwrap(),
            name: None,
            // Deliberately wrong, `recount` must overwrite it.
            display_name: DisplayName::derive(
                Sharing::new(1).unwrap(),
                AcType::NonAc,
            ),
            sharing: Sharing::new(3).unwrap(),
            ac_type: AcType::Ac,
            bed_size: BedSize::Single,
            bathroom_type: None,
            balcony: false,
            description: None,
            amenities: vec![],
            rent: Amount::from(5000),
            total_beds: 99,
            occupied_beds: 99,
            available_beds: 99,
            on_notice_beds: 99,
            on_book_beds: 99,
            is_active: true,
            beds: statuses
                .iter()
                .enumerate()
                .map(|(i, s)| bed(&format!("B{i}"), *s))
                .collect(),
        }
    }

    #[test]
    fn recount_derives_counters_from_live_beds() {
        use bed::Status::{Available, Maintenance, Notice, Occupied, OnBook};

        let mut r = room(&[Occupied, Available, Notice, OnBook, Maintenance]);
        r.recount();

        assert_eq!(r.total_beds, 5);
        assert_eq!(r.occupied_beds, 1);
        assert_eq!(r.available_beds, 1);
        assert_eq!(r.on_notice_beds, 1);
        assert_eq!(r.on_book_beds, 1);
    }

    #[test]
    fn recount_overwrites_authored_display_name() {
        let mut r = room(&[]);
        r.recount();

        assert_eq!(AsRef::<str>::as_ref(&r.display_name), "3-Sharing-AC");
    }

    #[test]
    fn revenue_counts_occupied_and_notice_only() {
        use bed::Status::{Available, Notice, Occupied, OnBook};

        let r = room(&[Occupied, Notice, Available, OnBook]);

        assert_eq!(r.revenue(), Amount::from(10000));
    }
}
