//! [`Bed`] definitions.

use std::str::FromStr;

use common::{define_kind, unit, DateTimeOf};
use derive_more::{AsRef, Display};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

/// Single rentable bed inside a [`Room`].
///
/// A [`Bed`] never exists outside a [`Room`] and is never deleted on its own:
/// it goes away only when its [`Room`] does.
///
/// [`Room`]: crate::domain::Room
#[derive(Clone, Debug)]
pub struct Bed {
    /// [`Number`] of this [`Bed`], unique within its room.
    pub number: Number,

    /// Occupancy [`Status`] of this [`Bed`].
    pub status: Status,

    /// Reference to the occupying student, if any.
    ///
    /// Informational only, no foreign-key constraint is enforced here.
    pub student_id: Option<StudentId>,

    /// Name of the occupying student, if any.
    pub student_name: Option<StudentName>,

    /// [`DateTime`] when the rent is next due, if relevant.
    ///
    /// [`DateTime`]: common::DateTime
    pub rent_due_at: Option<RentDueDateTime>,

    /// [`DateTime`] when the vacating notice was given, if any.
    ///
    /// [`DateTime`]: common::DateTime
    pub notice_at: Option<NoticeDateTime>,

    /// [`DateTime`] when this [`Bed`] was booked, if it was.
    ///
    /// [`DateTime`]: common::DateTime
    pub booked_at: Option<BookingDateTime>,
}

impl Bed {
    /// Indicates whether this [`Bed`] currently generates rent.
    ///
    /// A tenant on notice still occupies the bed and owes rent, while a booked
    /// bed is only reserved and doesn't pay yet.
    #[must_use]
    pub fn generates_revenue(&self) -> bool {
        self.status.generates_revenue()
    }
}

define_kind! {
    #[doc = "Occupancy status of a [`Bed`]."]
    enum Status {
        #[doc = "Free and rentable."]
        Available = "available",

        #[doc = "Occupied by a paying tenant."]
        Occupied = "occupied",

        #[doc = "Out of service."]
        Maintenance = "maintenance",

        #[doc = "Occupied, but the tenant has given a vacating notice."]
        Notice = "notice",

        #[doc = "Reserved by a booking, not yet moved in."]
        OnBook = "onbook",
    }
}

impl Status {
    /// Indicates whether a [`Bed`] in this [`Status`] generates rent.
    #[must_use]
    pub fn generates_revenue(self) -> bool {
        matches!(self, Self::Occupied | Self::Notice)
    }
}

/// Number of a [`Bed`].
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
        Self::new(s).ok_or("invalid `bed::Number`")
    }
}

/// Reference to a student occupying a [`Bed`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct StudentId(String);

impl StudentId {
    /// Creates a new [`StudentId`] if the given `id` is valid.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        Self::check(&id).then_some(Self(id))
    }

    /// Checks whether the given `id` is a valid [`StudentId`].
    fn check(id: impl AsRef<str>) -> bool {
        let id = id.as_ref();
        id.trim() == id && !id.is_empty() && id.len() <= 128
    }
}

impl FromStr for StudentId {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `StudentId`")
    }
}

/// Name of a student occupying a [`Bed`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
#[as_ref(forward)]
pub struct StudentName(String);

impl StudentName {
    /// Creates a new [`StudentName`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`StudentName`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 256
    }
}

impl FromStr for StudentName {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `StudentName`")
    }
}

/// [`DateTime`] when the rent for a [`Bed`] is next due.
///
/// [`DateTime`]: common::DateTime
pub type RentDueDateTime = DateTimeOf<(Bed, unit::RentDue)>;

/// [`DateTime`] when the vacating notice for a [`Bed`] was given.
///
/// [`DateTime`]: common::DateTime
pub type NoticeDateTime = DateTimeOf<(Bed, unit::Notice)>;

/// [`DateTime`] when a [`Bed`] was booked.
///
/// [`DateTime`]: common::DateTime
pub type BookingDateTime = DateTimeOf<(Bed, unit::Booking)>;

#[cfg(test)]
mod spec {
    use super::Status;

    #[test]
    fn wire_spellings_are_exact() {
        assert_eq!(Status::Available.as_str(), "available");
        assert_eq!(Status::Occupied.as_str(), "occupied");
        assert_eq!(Status::Maintenance.as_str(), "maintenance");
        assert_eq!(Status::Notice.as_str(), "notice");
        assert_eq!(Status::OnBook.as_str(), "onbook");

        assert_eq!("onbook".parse::<Status>().unwrap(), Status::OnBook);
        assert!("ONBOOK".parse::<Status>().is_err());
    }

    #[test]
    fn revenue_statuses() {
        assert!(Status::Occupied.generates_revenue());
        assert!(Status::Notice.generates_revenue());

        assert!(!Status::Available.generates_revenue());
        assert!(!Status::Maintenance.generates_revenue());
        assert!(!Status::OnBook.generates_revenue());
    }
}
